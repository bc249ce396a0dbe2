use crate::engine::state::LayoutMode;

use super::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Ukrainian,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Ukrainian];

    pub const fn display_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Ukrainian => "Українська",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct I18n {
    language: Language,
}

impl I18n {
    #[must_use]
    pub const fn new(language: Language) -> Self {
        Self { language }
    }

    fn pick<'a>(self, english: &'a str, ukrainian: &'a str) -> &'a str {
        match self.language {
            Language::English => english,
            Language::Ukrainian => ukrainian,
        }
    }

    pub fn theme_label(self, theme: Theme) -> &'static str {
        match (theme, self.language) {
            (Theme::Dark, Language::English) => "Dark",
            (Theme::Dark, Language::Ukrainian) => "Темна",
            (Theme::Light, Language::English) => "Light",
            (Theme::Light, Language::Ukrainian) => "Світла",
        }
    }

    pub fn layout_label(self, layout: LayoutMode) -> &'static str {
        match (layout, self.language) {
            (LayoutMode::Grid, Language::English) => "Grid",
            (LayoutMode::Grid, Language::Ukrainian) => "Сітка",
            (LayoutMode::List, Language::English) => "List",
            (LayoutMode::List, Language::Ukrainian) => "Список",
        }
    }

    pub fn heading(self) -> &'static str {
        self.pick("Catalog Browser", "Каталог застосунків")
    }

    pub fn tagline(self) -> &'static str {
        self.pick(
            "Browse and download apps from a catalog",
            "Переглядайте та завантажуйте застосунки з каталогу",
        )
    }

    pub fn app_version(self, version: &str) -> String {
        match self.language {
            Language::English => format!("Browser v{version}"),
            Language::Ukrainian => format!("Версія v{version}"),
        }
    }

    pub fn reload_button(self) -> &'static str {
        self.pick("Reload", "Оновити")
    }

    pub fn open_manifest_button(self) -> &'static str {
        self.pick("Open manifest...", "Відкрити маніфест...")
    }

    pub fn manifest_dialog_title(self) -> &'static str {
        self.pick("Choose a catalog manifest", "Оберіть маніфест каталогу")
    }

    pub fn open_folder_button(self) -> &'static str {
        self.pick("Open downloads", "Відкрити завантаження")
    }

    pub fn source_label(self, source: &str) -> String {
        match self.language {
            Language::English => format!("Source: {source}"),
            Language::Ukrainian => format!("Джерело: {source}"),
        }
    }

    pub fn saving_to(self, path: &str) -> String {
        match self.language {
            Language::English => format!("Saving to {path}"),
            Language::Ukrainian => format!("Збереження до {path}"),
        }
    }

    pub fn loading(self) -> &'static str {
        self.pick("Loading catalog...", "Завантаження каталогу...")
    }

    pub fn load_failed(self, err: &str) -> String {
        match self.language {
            Language::English => format!("Failed to load store: {err}"),
            Language::Ukrainian => format!("Не вдалося завантажити каталог: {err}"),
        }
    }

    pub fn no_categories(self) -> &'static str {
        self.pick(
            "The catalog has no categories.",
            "У каталозі немає категорій.",
        )
    }

    pub fn categories_heading(self) -> &'static str {
        self.pick("Categories", "Категорії")
    }

    pub fn empty_category(self) -> &'static str {
        self.pick(
            "No apps in this category yet.",
            "У цій категорії поки немає застосунків.",
        )
    }

    pub fn app_count(self, count: usize) -> String {
        match self.language {
            Language::English if count == 1 => "1 app".to_owned(),
            Language::English => format!("{count} apps"),
            Language::Ukrainian => format!("Застосунків: {count}"),
        }
    }

    pub fn details_fallback_title(self) -> &'static str {
        self.pick("App Details", "Деталі застосунку")
    }

    pub fn no_banner(self) -> &'static str {
        self.pick("[No Banner]", "[Немає банера]")
    }

    pub fn version_and_author(self, version: &str, author: &str) -> String {
        match self.language {
            Language::English => format!("Version: {version} | By: {author}"),
            Language::Ukrainian => format!("Версія: {version} | Автор: {author}"),
        }
    }

    pub fn download_button(self) -> &'static str {
        self.pick("Download", "Завантажити")
    }

    pub fn close_button(self) -> &'static str {
        self.pick("Close", "Закрити")
    }

    pub fn downloading(self, name: &str) -> String {
        match self.language {
            Language::English => format!("Downloading {name}..."),
            Language::Ukrainian => format!("Завантаження {name}..."),
        }
    }

    pub fn downloaded(self, name: &str) -> String {
        match self.language {
            Language::English => format!("Downloaded {name}!"),
            Language::Ukrainian => format!("{name} завантажено!"),
        }
    }

    pub fn download_failed(self, name: &str, reason: &str) -> String {
        match self.language {
            Language::English => format!("Failed to download {name}: {reason}"),
            Language::Ukrainian => format!("Не вдалося завантажити {name}: {reason}"),
        }
    }

    pub fn no_download_url(self, name: &str) -> String {
        match self.language {
            Language::English => format!("{name} has no valid download URL!"),
            Language::Ukrainian => format!("{name} не має дійсного посилання для завантаження!"),
        }
    }

    pub fn no_activity(self) -> &'static str {
        self.pick("No downloads yet.", "Завантажень ще не було.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_messages_match_classic_wording() {
        let i18n = I18n::new(Language::English);
        assert_eq!(i18n.downloaded("Foo"), "Downloaded Foo!");
        assert_eq!(
            i18n.no_download_url("Bar"),
            "Bar has no valid download URL!"
        );
        assert_eq!(
            i18n.download_failed("Baz", "HTTP 404"),
            "Failed to download Baz: HTTP 404"
        );
    }

    #[test]
    fn app_count_pluralises_in_english() {
        let i18n = I18n::new(Language::English);
        assert_eq!(i18n.app_count(1), "1 app");
        assert_eq!(i18n.app_count(3), "3 apps");
    }
}
