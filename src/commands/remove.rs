use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use super::{file_size_label, local_time, pluralize, Console};
use crate::cli::RemoveArgs;
use crate::constants::display::DETAIL_TIME_FORMAT;
use crate::registry::Registry;

pub fn run<R: BufRead, W: Write>(
    registry: &mut Registry,
    args: &RemoveArgs,
    console: &mut Console<R, W>,
) -> Result<()> {
    let plan = registry.plan_remove(&args.identifier)?;
    let record = &plan.record;

    writeln!(console.out, "Configuration to remove:")?;
    writeln!(console.out, "   ID: {}", record.id)?;
    writeln!(console.out, "   Name: {}", record.name)?;
    if !record.description.is_empty() {
        writeln!(console.out, "   Description: {}", record.description)?;
    }
    writeln!(console.out, "   Created: {}", local_time(&record.created_at, DETAIL_TIME_FORMAT))?;
    writeln!(console.out, "   File: {}", plan.file.display())?;
    if plan.file_exists {
        writeln!(console.out, "   Size: {}", file_size_label(&plan.file))?;
    }
    writeln!(console.out)?;

    if args.dry_run {
        writeln!(console.out, "DRY RUN MODE - No changes will be made")?;
        if plan.file_exists {
            writeln!(console.out, "Would remove file: {}", plan.file.display())?;
        }
        writeln!(console.out, "Would remove from configuration list: {}", record.name)?;
        return Ok(());
    }

    if !args.force {
        writeln!(console.out, "Warning: this action cannot be undone!")?;
        writeln!(console.out, "   The configuration file will be permanently deleted.")?;
        writeln!(console.out)?;

        if !console.confirm(&format!("Are you sure you want to remove '{}'?", record.name))? {
            writeln!(console.out, "Operation cancelled")?;
            return Ok(());
        }
        let typed = console
            .ask("Type the configuration name to confirm: ")
            .context("failed to read confirmation")?;
        if typed != record.name {
            writeln!(console.out, "Configuration name did not match. Operation cancelled")?;
            return Ok(());
        }
    }

    writeln!(console.out, "Removing configuration '{}'...", record.name)?;
    let removed = registry
        .remove(&record.id)
        .context("failed to remove configuration")?;
    writeln!(console.out, "Configuration '{}' removed successfully!", removed.name)?;
    writeln!(console.out)?;

    let remaining = registry.list().len();
    if remaining > 0 {
        writeln!(console.out, "{remaining} configuration{} remaining", pluralize(remaining))?;
        writeln!(console.out, "Use 'claude-switch list' to see remaining configurations")?;
    } else {
        writeln!(console.out, "No configurations remaining")?;
        writeln!(console.out, "Use 'claude-switch add' to create a new configuration")?;
    }
    Ok(())
}
