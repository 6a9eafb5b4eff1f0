//! Command-line surface (clap derive)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::constants::env;
use crate::registry::{paths, RegistryPaths};

#[derive(Debug, Parser)]
#[command(
    name = "claude-switch",
    version,
    about = "Manage named snapshots of your settings.json and switch between them",
    long_about = "Keep several settings.json configurations side by side and switch between them.\n\n\
                  Every configuration is validated as a JSON object before it is stored and again \
                  before it is applied. Applying backs up the current settings file first."
)]
pub struct Cli {
    /// Directory holding the registry metadata and stored configurations
    #[arg(long, global = true, env = env::ROOT, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Settings file that `apply` writes to
    #[arg(long, global = true, env = env::TARGET, value_name = "FILE")]
    pub target: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a new configuration by editing a copy of the current settings
    Add(AddArgs),

    /// List all saved configurations
    #[command(visible_aliases = ["ls", "show"])]
    List(ListArgs),

    /// Apply a configuration to the settings file
    Apply(ApplyArgs),

    /// Remove a saved configuration
    #[command(visible_aliases = ["rm", "delete", "del"])]
    Remove(RemoveArgs),

    /// Validate stored configuration files
    Validate(ValidateArgs),
}

#[derive(Debug, Args, Default)]
pub struct AddArgs {
    /// Configuration name (prompted for when omitted)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Configuration description
    #[arg(short, long)]
    pub description: Option<String>,
}

#[derive(Debug, Args, Default)]
pub struct ListArgs {
    /// Show full IDs and descriptions
    #[arg(short, long)]
    pub detailed: bool,

    /// Output the metadata as JSON
    #[arg(short, long)]
    pub json: bool,
}

#[derive(Debug, Args, Default)]
pub struct ApplyArgs {
    /// Configuration name or ID
    #[arg(value_name = "NAME_OR_ID")]
    pub identifier: String,

    /// Prompt for confirmation before applying
    #[arg(short, long)]
    pub confirm: bool,

    /// Never prompt, even with --confirm
    #[arg(short, long)]
    pub force: bool,

    /// Show what would be done without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

#[derive(Debug, Args, Default)]
pub struct RemoveArgs {
    /// Configuration name or ID
    #[arg(value_name = "NAME_OR_ID")]
    pub identifier: String,

    /// Remove without confirmation prompts
    #[arg(short, long)]
    pub force: bool,

    /// Show what would be removed without making changes
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

#[derive(Debug, Args, Default)]
pub struct ValidateArgs {
    /// Configuration name or ID (all configurations when omitted)
    #[arg(value_name = "NAME_OR_ID")]
    pub identifier: Option<String>,

    /// Show IDs, file paths and other details
    #[arg(short, long)]
    pub verbose: bool,

    /// Validate all configurations
    #[arg(short, long)]
    pub all: bool,
}

impl Cli {
    /// Resolve registry locations from flags, environment and defaults
    pub fn registry_paths(&self) -> Result<RegistryPaths> {
        let root = match &self.root {
            Some(root) => root.clone(),
            None => paths::default_root().context("failed to get user home directory")?,
        };
        let target = match &self.target {
            Some(target) => target.clone(),
            None => paths::default_target().context("failed to get user home directory")?,
        };
        Ok(RegistryPaths::new(root, target))
    }
}
