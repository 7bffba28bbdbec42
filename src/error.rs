use std::path::PathBuf;

/// Failures at the file boundary. Record-level problems never surface here;
/// they are skipped where they occur.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected layout in {}: {reason}", path.display())]
    Shape { path: PathBuf, reason: String },

    #[error("invalid pattern built from tables: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
