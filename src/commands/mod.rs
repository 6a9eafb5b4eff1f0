//! Command handlers
//!
//! Each handler takes an opened [`Registry`] and a [`Console`], prints its
//! own report and returns an error for anything that should end the process
//! with a non-zero status.

mod add;
mod apply;
mod console;
mod list;
mod remove;
mod validate;

pub use console::Console;

use std::error::Error as StdError;
use std::io;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, Utc};
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::editor::Editor;
use crate::registry::{Registry, RegistryPaths};
use crate::storage;

/// Open the registry and run the parsed command against stdin/stdout
pub fn dispatch(cli: Cli) -> Result<()> {
    let paths = cli.registry_paths()?;
    debug!(root = %paths.root().display(), target = %paths.target().display(), "Resolved paths");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock());

    match cli.command {
        Command::Add(args) => {
            require_target_dir(&paths)?;
            let editor = Editor::resolve()?;
            let mut registry = open_registry(paths)?;
            add::run(&mut registry, &args, &editor, &mut console)
        }
        Command::List(args) => list::run(&open_registry(paths)?, &args, &mut console),
        Command::Apply(args) => {
            require_target_dir(&paths)?;
            apply::run(&open_registry(paths)?, &args, &mut console)
        }
        Command::Remove(args) => remove::run(&mut open_registry(paths)?, &args, &mut console),
        Command::Validate(args) => validate::run(&open_registry(paths)?, &args, &mut console),
    }
}

fn open_registry(paths: RegistryPaths) -> Result<Registry> {
    Registry::open(paths).context("failed to initialize config manager")
}

/// The settings file's directory must already exist; its absence means the
/// application is not installed
fn require_target_dir(paths: &RegistryPaths) -> Result<()> {
    let Some(dir) = paths.target().parent().filter(|d| !d.as_os_str().is_empty()) else {
        return Ok(());
    };
    if !dir.is_dir() {
        bail!(
            "settings directory not found at {}. Please install the application first",
            dir.display()
        );
    }
    Ok(())
}

/// `outer: inner: innermost` for a typed error and its sources
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    anyhow::Chain::new(err)
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(": ")
}

fn local_time(ts: &DateTime<Utc>, format: &str) -> String {
    ts.with_timezone(&Local).format(format).to_string()
}

/// Human-readable file size, or "unknown" if the file cannot be read
fn file_size_label(path: &Path) -> String {
    match storage::file_size(path) {
        Ok(size) => format_size(size),
        Err(_) => "unknown".to_string(),
    }
}

fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if size < KB {
        format!("{size} B")
    } else if size < MB {
        format!("{:.1} KB", size as f64 / KB as f64)
    } else {
        format!("{:.1} MB", size as f64 / MB as f64)
    }
}

fn pluralize(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}
