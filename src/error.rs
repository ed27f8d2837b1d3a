use std::io;
use std::path::PathBuf;

/// Every failure in this program is fatal at the point of detection;
/// variants exist so the final diagnostic can name what went wrong.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Lexical, structural, or semantic violation in the scene text.
    #[error("line {line}: {message}")]
    Format { line: usize, message: String },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: io::Error,
    },

    #[error("{0}")]
    Config(String),

    #[error("scene defines more than {limit} {kind} objects")]
    CapacityExceeded { kind: &'static str, limit: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
