use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;
use log::{info, warn};
use thiserror::Error;

use crate::networking::{self, FetchError, Transport};

pub mod models;

pub use self::models::AppRecord;
use self::models::ManifestDocument;

/// Where the manifest is read from: an HTTP(S) endpoint or a file on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ManifestSource {
    Remote(String),
    Local(PathBuf),
}

impl ManifestSource {
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if networking::is_remote(location) {
            ManifestSource::Remote(location.to_owned())
        } else {
            ManifestSource::Local(PathBuf::from(location))
        }
    }
}

impl fmt::Display for ManifestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestSource::Remote(url) => f.write_str(url),
            ManifestSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not fetch catalog: {0}")]
    Fetch(#[from] FetchError),

    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parsed manifest: categories in manifest order, each with its apps in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    categories: IndexMap<String, Vec<AppRecord>>,
}

impl Catalog {
    pub fn from_json(bytes: &[u8]) -> Result<Self, LoadError> {
        let document: ManifestDocument = serde_json::from_slice(bytes)?;
        Ok(Self {
            categories: document.categories,
        })
    }

    pub fn list_categories(&self) -> Vec<&str> {
        self.categories.keys().map(String::as_str).collect()
    }

    /// Apps of a category; unknown categories yield an empty slice.
    pub fn apps_in(&self, category: &str) -> &[AppRecord] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn first_category(&self) -> Option<&str> {
        self.categories.keys().next().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn app_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}

/// Fetch and parse the manifest in a single attempt.
pub async fn load<T: Transport>(
    transport: &T,
    source: &ManifestSource,
) -> Result<Catalog, LoadError> {
    info!("loading catalog from {source}");
    let fetched = match source {
        ManifestSource::Remote(url) => transport.get(url).await,
        ManifestSource::Local(path) => networking::read_file(path).await,
    };
    let bytes = fetched.inspect_err(|err| warn!("catalog fetch failed: {err}"))?;
    let catalog =
        Catalog::from_json(&bytes).inspect_err(|err| warn!("catalog parse failed: {err}"))?;
    info!(
        "catalog loaded: {} categories, {} apps",
        catalog.categories.len(),
        catalog.app_count()
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::networking::testing::{MockReply, MockTransport};

    const MANIFEST: &str = r#"{
        "categories": {
            "Homebrew": [{"name": "Zeta"}, {"name": "Alpha"}],
            "Emulators": [],
            "Games": [{"name": "Foo", "version": "1.0", "download_url": "http://x/y.zip"}]
        }
    }"#;

    #[test]
    fn parses_remote_and_local_sources() {
        assert_eq!(
            ManifestSource::parse(" https://host/apps.json "),
            ManifestSource::Remote("https://host/apps.json".into())
        );
        assert_eq!(
            ManifestSource::parse("catalog/apps.json"),
            ManifestSource::Local(PathBuf::from("catalog/apps.json"))
        );
    }

    #[test]
    fn categories_keep_manifest_order() {
        let catalog = Catalog::from_json(MANIFEST.as_bytes()).unwrap();
        assert_eq!(
            catalog.list_categories(),
            vec!["Homebrew", "Emulators", "Games"]
        );
        assert_eq!(catalog.first_category(), Some("Homebrew"));
        let names: Vec<_> = catalog
            .apps_in("Homebrew")
            .iter()
            .map(|app| app.name.as_str())
            .collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
        assert_eq!(catalog.app_count(), 3);
    }

    #[test]
    fn unknown_or_empty_categories_are_empty() {
        let catalog = Catalog::from_json(MANIFEST.as_bytes()).unwrap();
        assert!(catalog.apps_in("Emulators").is_empty());
        assert!(catalog.apps_in("Missing").is_empty());
        assert!(Catalog::default().apps_in("Games").is_empty());
    }

    #[test]
    fn missing_or_null_categories_yield_empty_catalog() {
        assert!(Catalog::from_json(b"{}").unwrap().is_empty());
        assert!(Catalog::from_json(br#"{"categories": null}"#).unwrap().is_empty());
    }

    #[test]
    fn null_category_reads_as_empty() {
        let catalog =
            Catalog::from_json(br#"{"categories": {"Games": [{"name": "Foo"}], "Tools": null}}"#)
                .unwrap();

        assert_eq!(catalog.list_categories(), vec!["Games", "Tools"]);
        assert_eq!(catalog.apps_in("Games").len(), 1);
        assert!(catalog.apps_in("Tools").is_empty());
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        assert!(matches!(
            Catalog::from_json(b"<html>oops</html>"),
            Err(LoadError::Parse(_))
        ));
        assert!(matches!(
            Catalog::from_json(br#"{"categories": []}"#),
            Err(LoadError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn loads_remote_manifest() {
        let transport = MockTransport::new().respond(
            "http://host/apps.json",
            MockReply::Body(MANIFEST.as_bytes().to_vec()),
        );
        let source = ManifestSource::parse("http://host/apps.json");
        let catalog = load(&transport, &source).await.unwrap();
        assert_eq!(catalog.list_categories().len(), 3);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn server_error_is_a_load_error() {
        let transport =
            MockTransport::new().respond("http://host/apps.json", MockReply::Status(500));
        let source = ManifestSource::parse("http://host/apps.json");
        let result = load(&transport, &source).await;
        assert!(matches!(
            result,
            Err(LoadError::Fetch(FetchError::Status { status: 500, .. }))
        ));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn transport_failure_is_a_load_error() {
        let transport = MockTransport::new().respond(
            "http://host/apps.json",
            MockReply::Fail("connection refused".into()),
        );
        let source = ManifestSource::parse("http://host/apps.json");
        let err = load(&transport, &source).await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn loads_local_manifest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("apps.json");
        std::fs::write(&path, MANIFEST).unwrap();

        let transport = MockTransport::new();
        let catalog = load(&transport, &ManifestSource::Local(path)).await.unwrap();
        assert_eq!(catalog.apps_in("Games")[0].entry_label(), "Foo (v1.0)");
        assert_eq!(transport.calls(), 0);
    }
}
