//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// Registry storage layout (relative to the registry root)
pub mod storage {
    /// Default registry root directory name under the user's home
    pub const APP_DIR: &str = ".claude-switch";

    /// Subdirectory holding one content file per record
    pub const CONFIGS_DIR: &str = "configs";

    /// Metadata document listing every record
    pub const METADATA_FILENAME: &str = "config.json";

    /// Extension of per-record content files
    pub const RECORD_EXTENSION: &str = "json";
}

/// Target settings file managed by `apply`
pub mod target {
    /// Directory of the consuming application under the user's home
    pub const APP_DIR: &str = ".claude";

    /// Settings file inside that directory
    pub const FILENAME: &str = "settings.json";

    /// Suffix appended to the target path for the single backup slot
    pub const BACKUP_SUFFIX: &str = ".backup";
}

/// Environment variables read by the CLI shell
pub mod env {
    /// Overrides the registry root
    pub const ROOT: &str = "CLAUDE_SWITCH_ROOT";

    /// Overrides the target settings file
    pub const TARGET: &str = "CLAUDE_SWITCH_TARGET";

    /// Tracing level filter (trace, debug, info, warn, error)
    pub const LOG_LEVEL: &str = "LOG_LEVEL";

    /// Editor preferences, checked in order
    pub const EDITOR_VARS: &[&str] = &["EDITOR", "VISUAL"];
}

/// Editor fallbacks searched on PATH when no preference is set
pub mod editor {
    #[cfg(target_os = "windows")]
    pub const FALLBACKS: &[&str] = &["code", "notepad++", "notepad"];

    #[cfg(target_os = "macos")]
    pub const FALLBACKS: &[&str] = &["code", "vim", "nano", "emacs"];

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    pub const FALLBACKS: &[&str] = &["code", "vim", "nano", "emacs", "gedit"];
}

/// Listing and display constants
pub mod display {
    /// Characters of the identity shown in the compact listing
    pub const SHORT_ID_LEN: usize = 8;

    /// Maximum description width in the compact listing
    pub const MAX_DESCRIPTION_LEN: usize = 40;

    /// Timestamp format for tables
    pub const TABLE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

    /// Timestamp format for detail views
    pub const DETAIL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
}

/// Seed content for `add` when no target file exists yet
pub const DEFAULT_TEMPLATE: &str = r#"{
  "theme": "dark",
  "fontSize": 14,
  "editorSettings": {
    "tabSize": 2,
    "wordWrap": true
  }
}
"#;
