//! External editor bridge used by `add`
//!
//! Resolution order: `$EDITOR`, `$VISUAL`, then the first platform fallback
//! found on `PATH`. The editor runs with inherited stdio and we block until it
//! exits.

use std::env;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use thiserror::Error;
use tracing::{debug, info};

use crate::constants;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("no editor found; set the $EDITOR environment variable or install a default editor")]
    NotAvailable,

    #[error("failed to launch editor '{program}'")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("editor '{program}' exited with {status}")]
    Failed { program: String, status: ExitStatus },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    program: String,
    args: Vec<String>,
}

impl Editor {
    /// Resolve from the process environment
    pub fn resolve() -> Result<Self, EditorError> {
        Self::resolve_with(|key| env::var(key).ok(), env::var_os("PATH"))
    }

    fn resolve_with(
        var: impl Fn(&str) -> Option<String>,
        path_var: Option<OsString>,
    ) -> Result<Self, EditorError> {
        for key in constants::env::EDITOR_VARS {
            if let Some(editor) = var(*key).as_deref().and_then(Self::from_command) {
                debug!(var = %key, program = %editor.program, "Using editor from environment");
                return Ok(editor);
            }
        }

        let path_var = path_var.unwrap_or_default();
        constants::editor::FALLBACKS
            .iter()
            .find(|program| find_in_path(program, &path_var).is_some())
            .map(|program| Editor {
                program: (*program).to_string(),
                args: Vec::new(),
            })
            .ok_or(EditorError::NotAvailable)
    }

    /// Turn a preference into program and arguments
    ///
    /// A value naming an existing file is used whole, so paths with spaces
    /// work unquoted. Anything else is split on whitespace (`code --wait`).
    pub(crate) fn from_command(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if Path::new(raw).is_file() {
            return Some(Editor {
                program: raw.to_string(),
                args: Vec::new(),
            });
        }

        let mut parts = raw.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Editor {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the editor on `file` and wait for it to exit
    pub fn open(&self, file: &Path) -> Result<(), EditorError> {
        info!(program = %self.program, file = %file.display(), "Opening editor");
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(file)
            .status()
            .map_err(|source| EditorError::Launch {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(EditorError::Failed {
                program: self.program.clone(),
                status,
            });
        }
        Ok(())
    }
}

fn find_in_path(program: &str, path_var: &OsString) -> Option<PathBuf> {
    env::split_paths(path_var)
        .flat_map(|dir| {
            [
                dir.join(program),
                dir.join(format!("{program}{}", env::consts::EXE_SUFFIX)),
            ]
        })
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
