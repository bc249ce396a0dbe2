use std::env;
use std::path::PathBuf;

/// Returns the root directory used by the browser for its own data.
pub fn default_app_dir() -> PathBuf {
    let base = match env::consts::OS {
        "windows" => env::var_os("LOCALAPPDATA")
            .or_else(|| env::var_os("APPDATA"))
            .map(PathBuf::from),
        "macos" => env::var_os("HOME")
            .map(PathBuf::from)
            .map(|home| home.join("Library").join("Application Support")),
        _ => env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                env::var_os("HOME")
                    .map(PathBuf::from)
                    .map(|home| home.join(".local").join("share"))
            }),
    }
    .unwrap_or_else(|| PathBuf::from("."));

    base.join("catalog-browser")
}

pub fn downloads_dir() -> PathBuf {
    default_app_dir().join("downloads")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downloads_live_under_app_dir() {
        let downloads = downloads_dir();
        assert!(downloads.starts_with(default_app_dir()));
        assert_eq!(
            downloads.file_name().and_then(|name| name.to_str()),
            Some("downloads")
        );
    }
}
