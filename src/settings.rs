use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::ManifestSource;
use crate::env;

pub const DEFAULT_MANIFEST: &str =
    "https://raw.githubusercontent.com/Nugetinc/SwitchDownloader/refs/heads/main/apps.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration resolved from the command line.
#[derive(Clone, Debug)]
pub struct Settings {
    pub manifest: ManifestSource,
    pub download_dir: PathBuf,
    pub request_timeout: Duration,
}

impl Settings {
    pub fn new(
        manifest: Option<&str>,
        download_dir: Option<PathBuf>,
        timeout_secs: Option<u64>,
    ) -> Self {
        let manifest = manifest
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_MANIFEST);
        let timeout = timeout_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Self {
            manifest: ManifestSource::parse(manifest),
            download_dir: download_dir.unwrap_or_else(env::downloads_dir),
            request_timeout: Duration::from_secs(timeout),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_manifest() {
        let settings = Settings::default();
        assert_eq!(
            settings.manifest,
            ManifestSource::Remote(DEFAULT_MANIFEST.to_owned())
        );
        assert_eq!(settings.download_dir, env::downloads_dir());
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn blank_overrides_fall_back_to_defaults() {
        let settings = Settings::new(Some("   "), None, Some(0));
        assert_eq!(
            settings.manifest,
            ManifestSource::Remote(DEFAULT_MANIFEST.to_owned())
        );
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn local_manifest_override_is_a_path() {
        let settings = Settings::new(Some("./apps.json"), Some("/tmp/dl".into()), Some(5));
        assert_eq!(
            settings.manifest,
            ManifestSource::Local(PathBuf::from("./apps.json"))
        );
        assert_eq!(settings.download_dir, PathBuf::from("/tmp/dl"));
        assert_eq!(settings.request_timeout, Duration::from_secs(5));
    }
}
