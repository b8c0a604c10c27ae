use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to create cache directory '{0}': {1}")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Cache path exists but is not a directory: '{0}'")]
    NotADirectory(PathBuf),

    #[error("Failed to read cache file '{0}': {1}")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to decode cache file '{0}': {1}")]
    Decode(PathBuf, #[source] serde_json::Error),

    #[error("Failed to encode observation records: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to write temporary cache file in '{0}': {1}")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Failed to move temporary cache file into place at '{0}': {1}")]
    Persist(PathBuf, #[source] tempfile::PersistError),

    #[error("Failed to list cache directory '{0}': {1}")]
    ListDir(PathBuf, #[source] std::io::Error),

    #[error("Background task failed to complete: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}
