use std::path::PathBuf;
use std::sync::Arc;

use log::{info, warn};
use thiserror::Error;

use crate::catalog::models::usable_download_url;
use crate::networking::{FetchError, Transport};
use crate::storage::DownloadStore;

pub mod filename;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("no valid download URL")]
    NoUrl,

    #[error(transparent)]
    Transport(#[from] FetchError),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Terminal state of one download action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadResult {
    Succeeded(PathBuf),
    Failed(String),
    NoUrl,
}

impl From<Result<PathBuf, DownloadError>> for DownloadResult {
    fn from(result: Result<PathBuf, DownloadError>) -> Self {
        match result {
            Ok(path) => DownloadResult::Succeeded(path),
            Err(DownloadError::NoUrl) => DownloadResult::NoUrl,
            Err(err) => DownloadResult::Failed(err.to_string()),
        }
    }
}

pub struct Downloader<T> {
    transport: Arc<T>,
    store: DownloadStore,
}

impl<T: Transport> Downloader<T> {
    pub fn new(transport: Arc<T>, store: DownloadStore) -> Self {
        Self { transport, store }
    }

    pub fn store(&self) -> &DownloadStore {
        &self.store
    }

    /// Fetch `url` once and save it as `<download dir>/<name><ext>`.
    pub async fn download(&self, url: &str, destination_name: &str) -> DownloadResult {
        let result = self.try_download(url, destination_name).await;
        match &result {
            Ok(path) => info!("downloaded {destination_name} to {}", path.display()),
            Err(DownloadError::NoUrl) => info!("{destination_name}: no download URL"),
            Err(err) => warn!("download of {destination_name} failed: {err}"),
        }
        result.into()
    }

    async fn try_download(&self, url: &str, destination_name: &str) -> Result<PathBuf, DownloadError> {
        let url = usable_download_url(url).ok_or(DownloadError::NoUrl)?;
        self.store
            .ensure_dir()
            .await
            .map_err(|source| DownloadError::Write {
                path: self.store.dir().to_path_buf(),
                source,
            })?;

        info!("downloading {destination_name} from {url}");
        let body = self.transport.get(url).await?;

        let file_name = filename::target_file_name(destination_name, url);
        self.store
            .write_replacing(&file_name, &body)
            .await
            .map_err(|source| DownloadError::Write {
                path: self.store.path_for(&file_name),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::networking::testing::{MockReply, MockTransport};

    fn downloader(transport: MockTransport, dir: &TempDir) -> Downloader<MockTransport> {
        Downloader::new(
            Arc::new(transport),
            DownloadStore::new(dir.path().join("downloads")),
        )
    }

    #[tokio::test]
    async fn sentinel_urls_never_reach_the_network() {
        let dir = TempDir::new().unwrap();
        let downloader = downloader(MockTransport::new(), &dir);

        for url in ["", "na", "NA", "n/a", "N/A", "  N/a  "] {
            assert_eq!(downloader.download(url, "Foo").await, DownloadResult::NoUrl);
        }
        assert_eq!(downloader.transport.calls(), 0);
    }

    #[tokio::test]
    async fn writes_body_using_url_extension() {
        let dir = TempDir::new().unwrap();
        let transport = MockTransport::new()
            .respond("http://x/files/foo.bin", MockReply::Body(b"\x00\x01binary".to_vec()));
        let downloader = downloader(transport, &dir);

        let result = downloader.download("http://x/files/foo.bin", "Bar").await;

        let expected = dir.path().join("downloads").join("Bar.bin");
        assert_eq!(result, DownloadResult::Succeeded(expected.clone()));
        assert_eq!(std::fs::read(expected).unwrap(), b"\x00\x01binary");
    }

    #[tokio::test]
    async fn second_download_overwrites_first() {
        let dir = TempDir::new().unwrap();
        let transport = MockTransport::new()
            .respond("http://x/foo.bin", MockReply::Body(b"a much longer first body".to_vec()))
            .respond("http://x/foo.bin", MockReply::Body(b"second".to_vec()));
        let downloader = downloader(transport, &dir);

        downloader.download("http://x/foo.bin", "Bar").await;
        let result = downloader.download("http://x/foo.bin", "Bar").await;

        let DownloadResult::Succeeded(path) = result else {
            panic!("expected success, got {result:?}");
        };
        assert_eq!(std::fs::read(path).unwrap(), b"second");
        assert_eq!(downloader.transport.calls(), 2);
    }

    #[tokio::test]
    async fn url_without_suffix_defaults_to_zip() {
        let dir = TempDir::new().unwrap();
        let transport =
            MockTransport::new().respond("http://x/download", MockReply::Body(b"PK".to_vec()));
        let downloader = downloader(transport, &dir);

        let result = downloader.download("http://x/download", "Foo").await;

        assert_eq!(
            result,
            DownloadResult::Succeeded(dir.path().join("downloads").join("Foo.zip"))
        );
    }

    #[tokio::test]
    async fn http_error_is_reported_as_failure() {
        let dir = TempDir::new().unwrap();
        let transport = MockTransport::new().respond("http://x/y.zip", MockReply::Status(503));
        let downloader = downloader(transport, &dir);

        let result = downloader.download("http://x/y.zip", "Foo").await;

        match result {
            DownloadResult::Failed(reason) => assert!(reason.contains("503"), "{reason}"),
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(!dir.path().join("downloads").join("Foo.zip").exists());
    }

    #[tokio::test]
    async fn unwritable_directory_is_a_write_failure() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("downloads");
        std::fs::write(&blocker, b"a file where the folder should be").unwrap();
        let transport = MockTransport::new().respond("http://x/y.zip", MockReply::Body(b"PK".to_vec()));
        let downloader = downloader(transport, &dir);

        let result = downloader.try_download("http://x/y.zip", "Foo").await;

        assert!(matches!(result, Err(DownloadError::Write { .. })));
    }

    #[tokio::test]
    async fn unsafe_names_stay_inside_download_dir() {
        let dir = TempDir::new().unwrap();
        let transport =
            MockTransport::new().respond("http://x/y.zip", MockReply::Body(b"PK".to_vec()));
        let downloader = downloader(transport, &dir);

        let result = downloader.download("http://x/y.zip", "../escape").await;

        let DownloadResult::Succeeded(path) = result else {
            panic!("expected success, got {result:?}");
        };
        assert_eq!(path.parent(), Some(dir.path().join("downloads").as_path()));
        assert_eq!(path.file_name().unwrap(), "_escape.zip");
    }
}
