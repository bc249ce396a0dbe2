//! Target file names for downloaded archives.
//!
//! The name is `<app name><ext>`, where the extension comes from the last
//! path segment of the download URL. App names are made safe for every
//! supported filesystem without otherwise altering them.

use reqwest::Url;

pub const DEFAULT_EXTENSION: &str = ".zip";
const FALLBACK_STEM: &str = "Unknown";
const RESERVED_DEVICE_NAMES: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Build the on-disk file name for an app download.
#[must_use]
pub fn target_file_name(app_name: &str, url: &str) -> String {
    let ext = extension_from_url(url).unwrap_or_else(|| DEFAULT_EXTENSION.to_owned());
    format!("{}{ext}", sanitize_stem(app_name))
}

/// Suffix of the URL's last path segment including the dot, e.g. `.bin`.
pub(crate) fn extension_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let last_segment = parsed.path_segments()?.next_back()?;
    let dot_index = last_segment.rfind('.')?;
    // `.hidden` style segments have no stem and therefore no extension.
    if dot_index == 0 {
        return None;
    }
    let ext = &last_segment[dot_index..];
    if ext.len() <= 1 {
        return None;
    }
    Some(ext.chars().map(filesystem_safe).collect())
}

fn filesystem_safe(ch: char) -> char {
    match ch {
        '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
        c if c.is_control() => '_',
        c => c,
    }
}

pub(crate) fn sanitize_stem(name: &str) -> String {
    let mapped: String = name.trim().chars().map(filesystem_safe).collect();
    let trimmed = mapped.trim_end_matches(['.', ' ']).trim_start_matches('.');
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '_') {
        return FALLBACK_STEM.to_owned();
    }
    let device = trimmed.split('.').next().unwrap_or(trimmed);
    if RESERVED_DEVICE_NAMES
        .iter()
        .any(|reserved| device.eq_ignore_ascii_case(reserved))
    {
        return format!("_{trimmed}");
    }
    trimmed.to_owned()
}
