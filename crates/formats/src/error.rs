//! Asset loading errors.

use std::path::PathBuf;

use scene::components::ColorParseError;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// Failed to read an asset file from disk.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The payload is not valid JSON or does not match the expected shape.
    #[error("failed to parse {what}: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("expected GeoJSON FeatureCollection")]
    NotAFeatureCollection,

    #[error("invalid feature at index {index}: {reason}")]
    InvalidFeature { index: usize, reason: String },

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid {what}: {reason}")]
    Invalid { what: &'static str, reason: String },

    #[error(transparent)]
    Color(#[from] ColorParseError),
}

impl AssetError {
    pub(crate) fn json(what: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| AssetError::Json { what, source }
    }
}
