use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use super::{file_size_label, local_time, pluralize, Console};
use crate::cli::ListArgs;
use crate::constants::display::{MAX_DESCRIPTION_LEN, TABLE_TIME_FORMAT};
use crate::registry::{ConfigRecord, Registry};

const HEADERS: [&str; 6] = ["", "ID", "NAME", "DESCRIPTION", "CREATED", "SIZE"];

pub fn run<R: BufRead, W: Write>(
    registry: &Registry,
    args: &ListArgs,
    console: &mut Console<R, W>,
) -> Result<()> {
    let records = registry.list();

    if args.json {
        let json = serde_json::to_string_pretty(records).context("failed to serialize configurations")?;
        writeln!(console.out, "{json}")?;
        return Ok(());
    }

    if records.is_empty() {
        writeln!(console.out, "No configurations found.")?;
        writeln!(console.out)?;
        writeln!(console.out, "Use 'claude-switch add' to create your first configuration")?;
        return Ok(());
    }

    let active = registry.active_ids();
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| row(record, active.contains(&record.id), args.detailed))
        .collect();

    writeln!(
        console.out,
        "Found {} configuration{}:\n",
        records.len(),
        pluralize(records.len())
    )?;
    write!(console.out, "{}", render_table(&HEADERS, &rows))?;
    writeln!(console.out)?;
    if !active.is_empty() {
        writeln!(console.out, "* matches the current {}", registry.paths().target().display())?;
    }
    writeln!(console.out, "Use 'claude-switch apply <name>' to switch to a configuration")?;
    writeln!(console.out, "Use 'claude-switch remove <name>' to delete a configuration")?;
    if !args.detailed {
        writeln!(console.out, "Use '--detailed' to see full IDs and descriptions")?;
    }
    Ok(())
}

fn row(record: &ConfigRecord, active: bool, detailed: bool) -> Vec<String> {
    let id = if detailed || record.short_id().len() == record.id.len() {
        record.id.clone()
    } else {
        format!("{}...", record.short_id())
    };

    let description = if record.description.is_empty() {
        "-".to_string()
    } else if detailed {
        record.description.clone()
    } else {
        truncate(&record.description, MAX_DESCRIPTION_LEN)
    };

    vec![
        if active { "*" } else { "" }.to_string(),
        id,
        record.name.clone(),
        description,
        local_time(&record.created_at, TABLE_TIME_FORMAT),
        file_size_label(&record.file_path),
    ]
}

/// Cut to `max` characters, ending in "..." when shortened
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Left-aligned columns separated by two spaces, header underlined
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let mut out = table_line(headers.iter().copied(), &widths);
    out.push_str(&table_line(rule.iter().map(String::as_str), &widths));
    for row in rows {
        out.push_str(&table_line(row.iter().map(String::as_str), &widths));
    }
    out
}

fn table_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let line = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    format!("{}\n", line.trim_end())
}
