use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state directory not usable: {0}")]
    StateDir(std::path::PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
