use std::fs;
use std::io::{BufRead, Write};

use anyhow::Result;
use chrono::{DateTime, Local};

use super::{local_time, Console};
use crate::cli::ApplyArgs;
use crate::constants::display::DETAIL_TIME_FORMAT;
use crate::registry::Registry;

pub fn run<R: BufRead, W: Write>(
    registry: &Registry,
    args: &ApplyArgs,
    console: &mut Console<R, W>,
) -> Result<()> {
    let plan = registry.plan_apply(&args.identifier)?;
    let record = &plan.record;

    writeln!(console.out, "Applying configuration: {}", record.name)?;
    writeln!(console.out, "   ID: {}", record.id)?;
    if !record.description.is_empty() {
        writeln!(console.out, "   Description: {}", record.description)?;
    }
    writeln!(console.out, "   Target: {}", plan.target.display())?;
    match &plan.backup {
        Some(backup) => {
            writeln!(console.out, "   Backup: {}", backup.display())?;
            if let Ok(meta) = fs::metadata(&plan.target) {
                let modified = meta
                    .modified()
                    .map(|t| DateTime::<Local>::from(t).format(DETAIL_TIME_FORMAT).to_string())
                    .unwrap_or_else(|_| "unknown".to_string());
                writeln!(console.out, "   Current file: {} bytes, modified {modified}", meta.len())?;
            }
        }
        None => writeln!(console.out, "   Current: no existing settings file found")?,
    }
    if let Ok(meta) = fs::metadata(&plan.source) {
        writeln!(
            console.out,
            "   New file: {} bytes, created {}",
            meta.len(),
            local_time(&record.created_at, DETAIL_TIME_FORMAT)
        )?;
    }
    writeln!(console.out)?;

    if args.dry_run {
        writeln!(console.out, "DRY RUN MODE - No changes will be made")?;
        if let Some(backup) = &plan.backup {
            writeln!(console.out, "Would create backup: {}", backup.display())?;
        }
        writeln!(
            console.out,
            "Would copy: {} -> {}",
            plan.source.display(),
            plan.target.display()
        )?;
        return Ok(());
    }

    if args.confirm && !args.force {
        let question = if plan.backup.is_some() {
            "This will replace your current settings. Continue?"
        } else {
            "No existing settings file found. Continue?"
        };
        if !console.confirm(question)? {
            writeln!(console.out, "Operation cancelled")?;
            return Ok(());
        }
    }

    writeln!(console.out, "Applying configuration...")?;
    let applied = registry.apply(&record.id)?;

    writeln!(console.out, "Configuration '{}' applied successfully!", applied.record.name)?;
    writeln!(console.out)?;
    if let Some(backup) = &applied.backup {
        writeln!(console.out, "Backup saved: {}", backup.display())?;
        writeln!(
            console.out,
            "To roll back: mv {} {}",
            backup.display(),
            applied.target.display()
        )?;
    }
    writeln!(console.out, "Restart the application to see the changes")?;
    Ok(())
}
