//! Error types for the fluent-search crate.

use thiserror::Error;

/// Errors raised while configuring or executing a search.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    /// A required argument was empty.
    #[error("argument '{name}' cannot be null or empty")]
    EmptyArgument { name: &'static str },

    /// A sort or facet key does not name a simple property of the record type.
    #[error("'{field}' is not a property of {type_name}; expression refers to a method or field")]
    NotAProperty {
        type_name: &'static str,
        field: String,
    },

    /// Invalid regular expression pattern.
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// The current database has no index configured for it.
    #[error("no index configured for database '{database}'")]
    UnknownDatabase { database: String },

    /// The underlying index failed.
    #[error(transparent)]
    Index(#[from] IndexError),

    /// Settings could not be loaded.
    #[error("invalid settings: {0}")]
    Settings(String),
}

/// Failure reported by a search index collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexError {
    /// Name of the index that failed, when known.
    pub index: Option<String>,
    /// Human-readable description.
    pub message: String,
}

impl IndexError {
    /// Creates an error that is not tied to a named index.
    pub fn new(message: impl Into<String>) -> Self {
        IndexError {
            index: None,
            message: message.into(),
        }
    }

    /// Creates an error for a named index.
    pub fn for_index(index: impl Into<String>, message: impl Into<String>) -> Self {
        IndexError {
            index: Some(index.into()),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for IndexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.index {
            Some(index) => write!(f, "index error ({}): {}", index, self.message),
            None => write!(f, "index error: {}", self.message),
        }
    }
}

impl std::error::Error for IndexError {}

/// Result type for fluent-search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_error_display() {
        assert_eq!(IndexError::new("offline").to_string(), "index error: offline");
        assert_eq!(
            IndexError::for_index("content_web_index", "offline").to_string(),
            "index error (content_web_index): offline"
        );
    }

    #[test]
    fn search_error_wraps_index_error() {
        let err: SearchError = IndexError::new("boom").into();
        assert!(matches!(err, SearchError::Index(_)));
        assert_eq!(err.to_string(), "index error: boom");
    }

    #[test]
    fn not_a_property_message() {
        let err = SearchError::NotAProperty {
            type_name: "Article",
            field: "summary()".to_string(),
        };
        assert!(err.to_string().contains("not a property of Article"));
    }
}
