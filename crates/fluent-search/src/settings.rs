//! Settings document for search managers.
//!
//! ```yaml
//! indexes:
//!   web: content_web_index
//!   master: content_master_index
//! default_database: web
//! on_failure: empty_result
//! display: 20
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};
use crate::manager::{FailurePolicy, IndexLookup, DEFAULT_DATABASE};
use crate::paging::DEFAULT_DISPLAY;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Database name to index name.
    pub indexes: IndexLookup,
    pub default_database: String,
    pub on_failure: FailurePolicy,
    /// Default page size.
    pub display: i32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            indexes: IndexLookup::default(),
            default_database: DEFAULT_DATABASE.to_string(),
            on_failure: FailurePolicy::default(),
            display: DEFAULT_DISPLAY,
        }
    }
}

impl SearchSettings {
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        serde_yaml::from_str(source).map_err(|e| SearchError::Settings(e.to_string()))
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        serde_json::from_str(source).map_err(|e| SearchError::Settings(e.to_string()))
    }

    /// Loads a `.yaml`, `.yml` or `.json` settings file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| SearchError::Settings(format!("{}: {}", path.display(), e)))?;

        let settings = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&source)?,
            Some("json") => Self::from_json_str(&source)?,
            _ => {
                return Err(SearchError::Settings(format!(
                    "{}: unsupported settings format",
                    path.display()
                )))
            }
        };

        tracing::debug!(
            path = %path.display(),
            indexes = settings.indexes.len(),
            "loaded search settings"
        );
        Ok(settings)
    }
}
