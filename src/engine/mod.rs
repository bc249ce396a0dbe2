use std::path::PathBuf;
use std::sync::Arc;

use log::{error, info, warn};
use tokio::sync::mpsc;

use crate::catalog;
use crate::downloads::Downloader;
use crate::engine::state::{EngineRequest, EngineUpdate, download_name};
use crate::images;
use crate::networking::Transport;
use crate::storage::DownloadStore;

pub mod state;

/// Performs catalog, image and download work and reports results as updates.
pub struct CatalogEngine<T> {
    transport: Arc<T>,
    downloader: Downloader<T>,
}

impl<T: Transport> CatalogEngine<T> {
    pub fn new(transport: Arc<T>, download_dir: PathBuf) -> Self {
        let downloader = Downloader::new(transport.clone(), DownloadStore::new(download_dir));
        Self {
            transport,
            downloader,
        }
    }

    pub fn download_dir(&self) -> PathBuf {
        self.downloader.store().dir().to_path_buf()
    }

    /// Run one request to completion. Every request sends at most one update.
    pub async fn handle_request(
        &self,
        request: EngineRequest,
        updates: &mpsc::UnboundedSender<EngineUpdate>,
    ) {
        match request {
            EngineRequest::LoadCatalog(source) => {
                let update = match catalog::load(self.transport.as_ref(), &source).await {
                    Ok(catalog) => EngineUpdate::CatalogLoaded(catalog),
                    Err(err) => {
                        error!("catalog load from {source} failed: {err}");
                        EngineUpdate::CatalogFailed(err.to_string())
                    }
                };
                let _ = updates.send(update);
            }
            EngineRequest::ResolveImage {
                target,
                location,
                size,
            } => {
                let image =
                    images::resolve_image(self.transport.as_ref(), location.as_deref(), size)
                        .await;
                let _ = updates.send(EngineUpdate::ImageReady { target, image });
            }
            EngineRequest::Download(app) => {
                let name = download_name(&app);
                let result = self.downloader.download(&app.download_url, &name).await;
                let _ = updates.send(EngineUpdate::DownloadFinished { name, result });
            }
            EngineRequest::OpenDownloadFolder => self.open_download_folder().await,
        }
    }

    async fn open_download_folder(&self) {
        let store = self.downloader.store();
        if let Err(err) = store.ensure_dir().await {
            warn!(
                "cannot create download folder {}: {err}",
                store.dir().display()
            );
            return;
        }
        let dir = store.dir().to_path_buf();
        info!("opening download folder {}", dir.display());
        match tokio::task::spawn_blocking(move || open::that(&dir)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!("failed to open download folder: {err}"),
            Err(err) => warn!("failed to open download folder: {err}"),
        }
    }
}
