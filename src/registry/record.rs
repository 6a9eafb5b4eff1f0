//! One entry of the metadata document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::display::SHORT_ID_LEN;

/// A named snapshot of the target settings file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    /// Absolute path of the stored content
    pub file_path: PathBuf,
}

impl ConfigRecord {
    /// Leading characters of the identity, as shown in compact listings
    pub fn short_id(&self) -> &str {
        self.id
            .char_indices()
            .nth(SHORT_ID_LEN)
            .map_or(self.id.as_str(), |(idx, _)| &self.id[..idx])
    }
}
