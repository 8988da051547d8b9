//! Error types shared by the index, renderer and resolver

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the content engine
#[derive(Error, Debug)]
pub enum Error {
    #[error("{post}: missing required front-matter field `{field}`")]
    MetadataMissing { post: String, field: &'static str },

    #[error("{post}: invalid date `{value}`, expected YYYY.MM.DD")]
    InvalidDate { post: String, value: String },

    #[error("Index unavailable at {path:?}: {reason}")]
    IndexUnavailable { path: PathBuf, reason: String },

    #[error("Index at {path:?} has version {found}, expected {expected}")]
    IndexVersion {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    #[error("Post not found: {id}")]
    SourceFileMissing { id: String },

    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach the post id to a metadata error raised before the id was known
    pub(crate) fn for_post(self, id: &str) -> Self {
        match self {
            Error::MetadataMissing { field, .. } => Error::MetadataMissing {
                post: id.to_string(),
                field,
            },
            Error::InvalidDate { value, .. } => Error::InvalidDate {
                post: id.to_string(),
                value,
            },
            other => other,
        }
    }

    /// Whether the caller should treat this as "index unavailable"
    pub fn is_index_unavailable(&self) -> bool {
        matches!(
            self,
            Error::IndexUnavailable { .. } | Error::IndexVersion { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
