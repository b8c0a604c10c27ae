use crate::cache::error::CacheError;
use log::info;
use std::io;
use std::path::Path;

/// Makes sure `path` exists and is a directory, creating it (and any parents) if missing.
pub async fn ensure_cache_dir_exists(path: &Path) -> Result<(), CacheError> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(CacheError::NotADirectory(path.to_path_buf()));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating cache directory: {}", path.display());
            tokio::fs::create_dir_all(path)
                .await
                .map_err(|e| CacheError::CacheDirCreation(path.to_path_buf(), e))
        }
        Err(e) => Err(CacheError::CacheDirCreation(path.to_path_buf(), e)),
    }
}
