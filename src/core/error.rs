//! Error type shared by loading, ordering, and rendering.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can abort a translation run.
#[derive(Error, Debug)]
pub enum Error {
    /// Template file missing or unreadable
    #[error("unable to open cloud formation template {}: {}", path.display(), source)]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content is neither YAML nor JSON
    #[error("unable to parse cloud formation template {} (yaml: {}; json: {})", path.display(), yaml, json)]
    Format {
        path: PathBuf,
        yaml: String,
        json: String,
    },

    /// Document parsed but has no usable resources section
    #[error("invalid template: {0}")]
    Parse(String),

    /// A table resource is missing a field or has one of the wrong shape
    #[error("resource '{resource}': {message}")]
    Schema { resource: String, message: String },

    /// `DependsOn` edges form a cycle and cycles are rejected
    #[error("dependency cycle detected: {}", path.join(" -> "))]
    Cycle { path: Vec<String> },
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a schema error for a resource.
    pub fn schema(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Process exit code for this error.
    ///
    /// 254 and 253 are what a shell sees for exit statuses -2 and -3.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::FileAccess { .. } => 254,
            Self::Format { .. } => 253,
            Self::Parse(_) | Self::Schema { .. } | Self::Cycle { .. } => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_distinct() {
        let file = Error::FileAccess {
            path: PathBuf::from("missing.template"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        let format = Error::Format {
            path: PathBuf::from("bad.template"),
            yaml: "y".into(),
            json: "j".into(),
        };
        assert_eq!(file.exit_code(), 254);
        assert_eq!(format.exit_code(), 253);
        assert_eq!(Error::schema("t", "x").exit_code(), 1);
        assert_eq!(Error::Parse("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_messages_name_the_file() {
        let err = Error::FileAccess {
            path: PathBuf::from("missing.template"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("missing.template"));
    }

    #[test]
    fn test_cycle_message() {
        let err = Error::Cycle {
            path: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "dependency cycle detected: a -> b -> a");
    }
}
