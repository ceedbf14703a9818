use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the decision core and its collaborator adapters.
///
/// None of these ever stop the frame loop; handlers turn them into spoken
/// fallbacks and move on.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("{0} is not available")]
    Unavailable(&'static str),

    #[error("ocr failed: {0}")]
    Ocr(String),

    #[error("analysis failed: {0}")]
    Analysis(String),

    #[error("analysis timed out after {0:?}")]
    AnalysisTimeout(std::time::Duration),

    #[error("{0} channel closed")]
    ChannelClosed(&'static str),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
