//! Persisted application settings

use serde::{Deserialize, Serialize};

/// Settings record, persisted under its own key alongside the collections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub organization: String,
    /// Maximum number of entries a reconciled timeline may contain
    pub timeline_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            organization: "Assetflow".to_string(),
            timeline_limit: 200,
        }
    }
}
