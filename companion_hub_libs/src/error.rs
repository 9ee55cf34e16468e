use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HubError>;

#[derive(Debug, Error)]
pub enum HubError {
    #[error("I/O error on {}: {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to (de)serialize JSON data: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("invalid name: {0}")]
    InvalidNameError(String),
}

/// Attach the path that was being accessed to an [`std::io::Error`].
pub trait IoContext<T> {
    fn at(self, path: &Path) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at(self, path: &Path) -> Result<T> {
        self.map_err(|source| HubError::IoError {
            path: path.to_path_buf(),
            source,
        })
    }
}
