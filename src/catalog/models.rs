use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

const UNNAMED_APP: &str = "Unnamed App";
const UNKNOWN_VERSION: &str = "?";
const UNKNOWN_AUTHOR: &str = "Unknown";
const NO_URL_SENTINELS: [&str; 2] = ["na", "n/a"];

/// Wire shape of the manifest document.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ManifestDocument {
    #[serde(default, deserialize_with = "lenient_categories")]
    pub categories: IndexMap<String, Vec<AppRecord>>,
}

/// One application entry within a category.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct AppRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub author: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cover_url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub banner_url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub download_url: String,
}

impl AppRecord {
    pub fn display_name(&self) -> &str {
        non_blank(&self.name).unwrap_or(UNNAMED_APP)
    }

    pub fn display_version(&self) -> &str {
        non_blank(&self.version).unwrap_or(UNKNOWN_VERSION)
    }

    pub fn display_author(&self) -> &str {
        non_blank(&self.author).unwrap_or(UNKNOWN_AUTHOR)
    }

    /// Label used by the list layout, e.g. `Foo (v1.0)`.
    pub fn entry_label(&self) -> String {
        match non_blank(&self.version) {
            Some(version) => format!("{} (v{version})", self.display_name()),
            None => self.display_name().to_owned(),
        }
    }

    pub fn cover(&self) -> Option<&str> {
        non_blank(&self.cover_url)
    }

    /// Banner image for the detail view, falling back to the cover.
    pub fn banner_or_cover(&self) -> Option<&str> {
        non_blank(&self.banner_url).or_else(|| self.cover())
    }

    /// The download URL, or `None` when the entry has nothing to download.
    pub fn download(&self) -> Option<&str> {
        usable_download_url(&self.download_url)
    }
}

/// Trim a download URL and reject empty values and "not available" markers.
#[must_use]
pub fn usable_download_url(url: &str) -> Option<&str> {
    let trimmed = url.trim();
    if trimmed.is_empty()
        || NO_URL_SENTINELS
            .iter()
            .any(|sentinel| trimmed.eq_ignore_ascii_case(sentinel))
    {
        None
    } else {
        Some(trimmed)
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

// A null category map, or a null category within it, reads as empty.
fn lenient_categories<'de, D>(
    deserializer: D,
) -> Result<IndexMap<String, Vec<AppRecord>>, D::Error>
where
    D: Deserializer<'de>,
{
    let categories = Option::<IndexMap<String, Option<Vec<AppRecord>>>>::deserialize(deserializer)?;
    Ok(categories
        .unwrap_or_default()
        .into_iter()
        .map(|(name, apps)| (name, apps.unwrap_or_default()))
        .collect())
}

// Manifests in the wild carry versions like `1.2` as bare numbers.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string, found {other}"
        ))),
    }
}
