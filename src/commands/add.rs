use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use tempfile::NamedTempFile;

use super::{error_chain, local_time, Console};
use crate::cli::AddArgs;
use crate::constants::{display::DETAIL_TIME_FORMAT, DEFAULT_TEMPLATE};
use crate::editor::Editor;
use crate::registry::Registry;
use crate::{storage, validation};

pub fn run<R: BufRead, W: Write>(
    registry: &mut Registry,
    args: &AddArgs,
    editor: &Editor,
    console: &mut Console<R, W>,
) -> Result<()> {
    let scratch = seed_scratch_file(registry).context("failed to create temporary config file")?;

    writeln!(console.out, "Creating new configuration...")?;
    writeln!(console.out, "Opening {} for file: {}", editor.program(), scratch.path().display())?;
    writeln!(console.out, "  - Edit the JSON configuration as needed")?;
    writeln!(console.out, "  - Save and close the editor to continue")?;
    writeln!(console.out, "  - Press Ctrl+C to cancel")?;
    writeln!(console.out)?;

    loop {
        editor.open(scratch.path()).context("editor failed")?;

        let content = storage::read(scratch.path())?;
        match validation::validate(&content) {
            Ok(()) => break,
            Err(err) => {
                writeln!(console.out, "Invalid JSON in edited file: {}", error_chain(&err))?;
                if !console.confirm("Do you want to edit again?")? {
                    bail!("configuration creation cancelled due to invalid JSON");
                }
            }
        }
    }

    let name = match &args.name {
        Some(name) => name.clone(),
        None => console
            .ask("Enter configuration name: ")
            .context("failed to get configuration name")?,
    };
    let description = match &args.description {
        Some(description) => description.clone(),
        None => console.ask("Enter description (optional): ").unwrap_or_default(),
    };

    let record = registry
        .add_from_file(scratch.path(), &name, &description)
        .context("failed to add configuration")?;

    writeln!(console.out)?;
    writeln!(console.out, "Configuration added successfully!")?;
    writeln!(console.out, "   ID: {}", record.id)?;
    writeln!(console.out, "   Name: {}", record.name)?;
    if !record.description.is_empty() {
        writeln!(console.out, "   Description: {}", record.description)?;
    }
    writeln!(console.out, "   Created: {}", local_time(&record.created_at, DETAIL_TIME_FORMAT))?;
    writeln!(console.out)?;
    writeln!(
        console.out,
        "Use 'claude-switch apply {}' to switch to this configuration",
        record.name
    )?;
    Ok(())
}

/// Temp file pre-filled with the current settings, or a template when none exist
fn seed_scratch_file(registry: &Registry) -> Result<NamedTempFile> {
    let scratch = tempfile::Builder::new()
        .prefix("claude-settings-")
        .suffix(".json")
        .tempfile()?;

    let target = registry.paths().target();
    if storage::file_exists(target) {
        storage::safe_copy(target, scratch.path()).context("failed to copy current settings")?;
    } else {
        storage::atomic_write(scratch.path(), DEFAULT_TEMPLATE.as_bytes())
            .context("failed to create default settings")?;
    }
    Ok(scratch)
}
