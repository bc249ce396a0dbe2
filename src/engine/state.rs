use std::sync::Arc;

use chrono::{DateTime, Local};
use log::debug;

use crate::catalog::{AppRecord, Catalog, ManifestSource};
use crate::downloads::DownloadResult;
use crate::images::{ImageSize, ResolvedImage};

const MAX_NOTICES: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutMode {
    /// Category buttons along the top, cover tiles in a grid.
    Grid,
    /// Category sidebar with one row per app.
    List,
}

// Actions triggered by the user from the UI layer.
#[derive(Clone, Debug)]
pub enum UserAction {
    Reload,
    UseManifest(ManifestSource),
    SelectCategory(String),
    SetLayout(LayoutMode),
    OpenDetails(AppRecord),
    CloseDetails,
    Download(AppRecord),
    OpenDownloadFolder,
}

/// Identifies which widget a resolved image belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageTarget {
    Cover { generation: u64, index: usize },
    Banner { generation: u64 },
}

/// Work the engine performs off the UI thread.
#[derive(Clone, Debug)]
pub enum EngineRequest {
    LoadCatalog(ManifestSource),
    ResolveImage {
        target: ImageTarget,
        location: Option<String>,
        size: ImageSize,
    },
    Download(AppRecord),
    OpenDownloadFolder,
}

/// Results reported back by the engine.
#[derive(Debug)]
pub enum EngineUpdate {
    CatalogLoaded(Catalog),
    CatalogFailed(String),
    ImageReady {
        target: ImageTarget,
        image: ResolvedImage,
    },
    DownloadFinished {
        name: String,
        result: DownloadResult,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DownloadState {
    Idle,
    Requesting { name: String },
}

/// Outcome of a finished download, kept for the status strip.
#[derive(Clone, Debug)]
pub struct DownloadNotice {
    pub name: String,
    pub result: DownloadResult,
    pub at: DateTime<Local>,
}

/// The central source of truth for the UI.
///
/// Every user action and engine update goes through [`BrowserState::handle`]
/// or [`BrowserState::apply`], which return the engine work to schedule.
#[derive(Debug)]
pub struct BrowserState {
    pub source: ManifestSource,
    pub load: LoadState,
    pub catalog: Arc<Catalog>,
    pub selected: Option<String>,
    pub layout: LayoutMode,
    pub detail: Option<AppRecord>,
    pub download: DownloadState,
    pub notices: Vec<DownloadNotice>,
    view_generation: u64,
    detail_generation: u64,
}

impl BrowserState {
    pub fn new(source: ManifestSource) -> Self {
        Self {
            source,
            load: LoadState::Loading,
            catalog: Arc::new(Catalog::default()),
            selected: None,
            layout: LayoutMode::Grid,
            detail: None,
            download: DownloadState::Idle,
            notices: Vec::new(),
            view_generation: 0,
            detail_generation: 0,
        }
    }

    /// Requests to issue once at startup.
    pub fn start(&mut self) -> Vec<EngineRequest> {
        self.begin_load()
    }

    pub fn handle(&mut self, action: UserAction) -> Vec<EngineRequest> {
        debug!("action: {action:?}");
        match action {
            UserAction::Reload => {
                if self.is_loading() {
                    return Vec::new();
                }
                self.begin_load()
            }
            UserAction::UseManifest(source) => {
                if self.is_loading() {
                    return Vec::new();
                }
                self.source = source;
                self.begin_load()
            }
            UserAction::SelectCategory(category) => self.select(Some(category)),
            UserAction::SetLayout(layout) => {
                if self.layout == layout {
                    return Vec::new();
                }
                self.layout = layout;
                self.select(self.selected.clone())
            }
            UserAction::OpenDetails(app) => {
                self.detail_generation += 1;
                let request = EngineRequest::ResolveImage {
                    target: ImageTarget::Banner {
                        generation: self.detail_generation,
                    },
                    location: app.banner_or_cover().map(str::to_owned),
                    size: ImageSize::BANNER,
                };
                self.detail = Some(app);
                vec![request]
            }
            UserAction::CloseDetails => {
                self.detail = None;
                self.detail_generation += 1;
                Vec::new()
            }
            UserAction::Download(app) => {
                if self.is_downloading() {
                    return Vec::new();
                }
                let name = download_name(&app);
                if app.download().is_none() {
                    self.push_notice(name, DownloadResult::NoUrl);
                    return Vec::new();
                }
                self.download = DownloadState::Requesting { name };
                vec![EngineRequest::Download(app)]
            }
            UserAction::OpenDownloadFolder => vec![EngineRequest::OpenDownloadFolder],
        }
    }

    pub fn apply(&mut self, update: EngineUpdate) -> Vec<EngineRequest> {
        match update {
            EngineUpdate::CatalogLoaded(catalog) => {
                self.load = LoadState::Loaded;
                let first = catalog.first_category().map(str::to_owned);
                self.catalog = Arc::new(catalog);
                self.select(first)
            }
            EngineUpdate::CatalogFailed(reason) => {
                self.load = LoadState::Failed(reason);
                self.catalog = Arc::new(Catalog::default());
                Vec::new()
            }
            EngineUpdate::ImageReady { .. } => Vec::new(),
            EngineUpdate::DownloadFinished { name, result } => {
                self.download = DownloadState::Idle;
                self.push_notice(name, result);
                Vec::new()
            }
        }
    }

    pub fn visible_apps(&self) -> &[AppRecord] {
        match &self.selected {
            Some(category) => self.catalog.apps_in(category),
            None => &[],
        }
    }

    /// Whether an image result still belongs to what is on screen.
    pub fn is_current(&self, target: ImageTarget) -> bool {
        match target {
            ImageTarget::Cover { generation, index } => {
                generation == self.view_generation
                    && self.layout == LayoutMode::Grid
                    && index < self.visible_apps().len()
            }
            ImageTarget::Banner { generation } => {
                generation == self.detail_generation && self.detail.is_some()
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.load == LoadState::Loading
    }

    pub fn is_downloading(&self) -> bool {
        matches!(self.download, DownloadState::Requesting { .. })
    }

    pub fn cover_target(&self, index: usize) -> ImageTarget {
        ImageTarget::Cover {
            generation: self.view_generation,
            index,
        }
    }

    pub fn banner_target(&self) -> ImageTarget {
        ImageTarget::Banner {
            generation: self.detail_generation,
        }
    }

    fn begin_load(&mut self) -> Vec<EngineRequest> {
        self.load = LoadState::Loading;
        self.catalog = Arc::new(Catalog::default());
        self.selected = None;
        self.detail = None;
        self.view_generation += 1;
        self.detail_generation += 1;
        vec![EngineRequest::LoadCatalog(self.source.clone())]
    }

    // Replaces the displayed set wholesale; covers of the previous view are invalidated.
    fn select(&mut self, category: Option<String>) -> Vec<EngineRequest> {
        self.selected = category;
        self.view_generation += 1;
        if self.layout != LayoutMode::Grid {
            return Vec::new();
        }
        let generation = self.view_generation;
        self.visible_apps()
            .iter()
            .enumerate()
            .map(|(index, app)| EngineRequest::ResolveImage {
                target: ImageTarget::Cover { generation, index },
                location: app.cover().map(str::to_owned),
                size: ImageSize::COVER,
            })
            .collect()
    }

    fn push_notice(&mut self, name: String, result: DownloadResult) {
        self.notices.push(DownloadNotice {
            name,
            result,
            at: Local::now(),
        });
        if self.notices.len() > MAX_NOTICES {
            let overflow = self.notices.len() - MAX_NOTICES;
            self.notices.drain(..overflow);
        }
    }
}

/// Name used both for the saved file and for status messages.
pub fn download_name(app: &AppRecord) -> String {
    let name = app.name.trim();
    if name.is_empty() {
        "Unknown".to_owned()
    } else {
        name.to_owned()
    }
}
