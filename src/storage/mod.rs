use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use tokio::fs;

const PARTIAL_SUFFIX: &str = ".part";

/// The folder downloaded archives are written into.
#[derive(Clone, Debug)]
pub struct DownloadStore {
    dir: PathBuf,
}

impl DownloadStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the download folder if needed; safe to call repeatedly.
    pub async fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir).await
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Write `bytes` to `file_name`, replacing any previous file of that name.
    ///
    /// Data lands in a hidden sibling first and is renamed into place, so an
    /// interrupted write never leaves a truncated archive under the final name.
    pub async fn write_replacing(&self, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        self.ensure_dir().await?;
        let target = self.path_for(file_name);
        let staging = self.path_for(&format!(".{file_name}{PARTIAL_SUFFIX}"));
        if let Err(err) = fs::write(&staging, bytes).await {
            let _ = fs::remove_file(&staging).await;
            return Err(err);
        }
        if let Err(err) = fs::rename(&staging, &target).await {
            let _ = fs::remove_file(&staging).await;
            return Err(err);
        }
        debug!("stored {} bytes at {}", bytes.len(), target.display());
        Ok(target)
    }
}
