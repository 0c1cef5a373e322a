use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NemdError {
    #[error("{}: {source}", file.display())]
    Io {
        file: PathBuf,
        source: std::io::Error,
    },
    #[error("{}:{line}: {msg}", file.display())]
    Parse {
        file: PathBuf,
        line: usize,
        msg: String,
    },
    #[error("unexpected layout in {}: {msg}", file.display())]
    Format { file: PathBuf, msg: String },
    #[error("quantity '{0}' was not loaded")]
    MissingQuantity(String),
    #[error("empty averaging window: {0}")]
    EmptyWindow(String),
    #[error("length mismatch: {0}")]
    LengthMismatch(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("{}: npy error: {msg}", file.display())]
    Npy { file: PathBuf, msg: String },
}

pub type NemdResult<T> = Result<T, NemdError>;

impl NemdError {
    /// Adapter for `map_err` that attaches the file an I/O error came from.
    pub fn io(path: &Path) -> impl FnOnce(std::io::Error) -> NemdError {
        let file = path.to_path_buf();
        move |source| NemdError::Io { file, source }
    }
}
