use std::collections::HashMap;
use std::sync::Arc;

use eframe::egui::{
    self, Align, Color32, CornerRadius, Frame, Layout, Margin, RichText, Stroke, TextureHandle,
    TextureOptions, Vec2, epaint::Shadow,
};
use log::{debug, error, warn};
use tokio::runtime::{Builder, Runtime};
use tokio::sync::mpsc;

use crate::catalog::{AppRecord, ManifestSource};
use crate::downloads::DownloadResult;
use crate::engine::CatalogEngine;
use crate::engine::state::{
    BrowserState, DownloadNotice, DownloadState, EngineRequest, EngineUpdate, ImageTarget,
    LayoutMode, LoadState, UserAction, download_name,
};
use crate::images::{ImageSize, PLACEHOLDER_RGB, ResolvedImage};
use crate::networking::HttpTransport;
use crate::settings::Settings;

mod i18n;
use self::i18n::{I18n, Language};

const COVER_COLUMNS: usize = 4;
const DETAIL_WINDOW_WIDTH: f32 = 650.0;
const DESCRIPTION_PREVIEW_CHARS: usize = 160;
const SIDEBAR_WIDTH: f32 = 220.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Theme {
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ThemePalette {
    bg: Color32,
    panel: Color32,
    surface: Color32,
    surface_elev: Color32,
    border: Color32,
    border_strong: Color32,
    text_primary: Color32,
    text_muted: Color32,
    text_faint: Color32,
    accent: Color32,
    accent_soft: Color32,
    accent_glow: Color32,
    danger: Color32,
}

impl ThemePalette {
    const fn dark() -> Self {
        Self {
            bg: Color32::from_rgb(11, 14, 19),
            panel: Color32::from_rgb(17, 22, 29),
            surface: Color32::from_rgb(24, 31, 39),
            surface_elev: Color32::from_rgb(29, 37, 47),
            border: Color32::from_rgb(45, 57, 72),
            border_strong: Color32::from_rgb(63, 79, 97),
            text_primary: Color32::from_rgb(228, 235, 244),
            text_muted: Color32::from_rgb(167, 182, 197),
            text_faint: Color32::from_rgb(129, 143, 158),
            accent: Color32::from_rgb(88, 166, 255),
            accent_soft: Color32::from_rgb(48, 96, 160),
            accent_glow: Color32::from_rgb(150, 200, 255),
            danger: Color32::from_rgb(239, 117, 117),
        }
    }

    const fn light() -> Self {
        Self {
            bg: Color32::from_rgb(240, 245, 252),
            panel: Color32::from_rgb(226, 234, 243),
            surface: Color32::from_rgb(245, 249, 255),
            surface_elev: Color32::from_rgb(255, 255, 255),
            border: Color32::from_rgb(195, 205, 221),
            border_strong: Color32::from_rgb(172, 186, 206),
            text_primary: Color32::from_rgb(28, 38, 52),
            text_muted: Color32::from_rgb(80, 99, 121),
            text_faint: Color32::from_rgb(116, 135, 155),
            accent: Color32::from_rgb(31, 111, 235),
            accent_soft: Color32::from_rgb(160, 196, 250),
            accent_glow: Color32::from_rgb(20, 90, 200),
            danger: Color32::from_rgb(219, 83, 83),
        }
    }
}

impl Theme {
    const fn palette(self) -> ThemePalette {
        match self {
            Theme::Dark => ThemePalette::dark(),
            Theme::Light => ThemePalette::light(),
        }
    }
}

fn tint(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_premultiplied(color.r(), color.g(), color.b(), alpha)
}

const LOCALE_LANGUAGE_CODES: [(&[&str], Language); 2] = [
    (&["uk", "ua", "ukr"], Language::Ukrainian),
    (&["en", "eng"], Language::English),
];

fn parse_locale_token(token: &str) -> Option<Language> {
    let normalized = token
        .split(['.', '@'])
        .next()
        .unwrap_or(token)
        .replace('-', "_")
        .to_ascii_lowercase();
    let language_code = normalized.split('_').next().unwrap_or(&normalized);

    LOCALE_LANGUAGE_CODES.iter().find_map(|(codes, language)| {
        codes
            .iter()
            .any(|code| *code == language_code)
            .then_some(*language)
    })
}

fn detect_system_language() -> Language {
    for var in ["LC_ALL", "LANGUAGE", "LANG"] {
        if let Ok(value) = std::env::var(var) {
            for token in value.split(':') {
                if let Some(language) = parse_locale_token(token) {
                    return language;
                }
            }
        }
    }

    Language::English
}

fn section_frame(colors: &ThemePalette) -> Frame {
    Frame::NONE
        .fill(colors.surface)
        .stroke(Stroke::new(1.0, colors.border))
        .corner_radius(CornerRadius::same(14))
        .inner_margin(Margin::same(14))
}

fn elevated_frame(colors: &ThemePalette) -> Frame {
    Frame::NONE
        .fill(colors.surface_elev)
        .stroke(Stroke::new(1.0, colors.border_strong))
        .corner_radius(CornerRadius::same(12))
        .inner_margin(Margin::symmetric(12, 10))
        .shadow(Shadow {
            offset: [0, 2],
            blur: 10,
            spread: 0,
            color: Color32::from_black_alpha(70),
        })
}

fn badge_frame(color: Color32) -> Frame {
    Frame::NONE
        .fill(tint(color, 32))
        .stroke(Stroke::new(1.0, color))
        .corner_radius(CornerRadius::same(255))
        .inner_margin(Margin::symmetric(10, 4))
}

fn primary_cta_button(
    label: impl Into<egui::WidgetText>,
    colors: &ThemePalette,
    min_width: f32,
) -> egui::Button<'_> {
    egui::Button::new(label)
        .fill(colors.accent_soft)
        .stroke(Stroke::new(1.0, colors.accent))
        .min_size(Vec2::new(min_width, 34.0))
}

fn secondary_button(
    label: impl Into<egui::WidgetText>,
    colors: &ThemePalette,
) -> egui::Button<'_> {
    egui::Button::new(label)
        .fill(colors.surface_elev)
        .stroke(Stroke::new(1.0, colors.border_strong))
        .min_size(Vec2::new(110.0, 30.0))
}

fn apply_theme(ctx: &egui::Context, colors: &ThemePalette) {
    let is_dark = colors == &ThemePalette::dark();
    let mut visuals = if is_dark {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };
    visuals.panel_fill = colors.bg;
    visuals.window_fill = colors.surface;
    visuals.override_text_color = Some(colors.text_primary);
    visuals.hyperlink_color = colors.accent_glow;
    for widget in [
        &mut visuals.widgets.noninteractive,
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
    ] {
        widget.corner_radius = CornerRadius::same(10);
    }
    visuals.widgets.noninteractive.bg_fill = colors.surface;
    visuals.widgets.inactive.bg_fill = colors.surface_elev;
    visuals.widgets.hovered.bg_fill = colors.accent_soft;
    visuals.widgets.active.bg_fill = colors.accent;
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, colors.border);
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, colors.border_strong);
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.3, colors.accent);
    visuals.widgets.active.bg_stroke = Stroke::new(1.5, colors.accent_glow);
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, colors.text_muted);
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, colors.text_muted);
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, colors.text_primary);
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, colors.text_primary);
    visuals.selection.bg_fill = colors.accent;
    visuals.selection.stroke = Stroke::new(1.0, colors.accent_glow);
    ctx.set_visuals(visuals);

    ctx.style_mut(|style| {
        style.spacing.item_spacing = Vec2::new(12.0, 12.0);
        style.spacing.button_padding = Vec2::new(14.0, 8.0);
    });
}

fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_owned();
    }
    let mut out: String = text.chars().take(max_len).collect();
    out.push_str("...");
    out
}

fn display_size(size: ImageSize) -> Vec2 {
    Vec2::new(size.width as f32, size.height as f32)
}

fn placeholder_color() -> Color32 {
    let [r, g, b] = PLACEHOLDER_RGB;
    Color32::from_rgb(r, g, b)
}

fn load_texture(ctx: &egui::Context, target: ImageTarget, image: &ResolvedImage) -> TextureHandle {
    let pixels = egui::ColorImage::from_rgba_unmultiplied(
        [image.size.width as usize, image.size.height as usize],
        &image.rgba,
    );
    ctx.load_texture(format!("{target:?}"), pixels, TextureOptions::LINEAR)
}

/// Localised status line for a finished download and whether it is an error.
fn notice_text(i18n: I18n, notice: &DownloadNotice) -> (String, bool) {
    match &notice.result {
        DownloadResult::Succeeded(_) => (i18n.downloaded(&notice.name), false),
        DownloadResult::Failed(reason) => (i18n.download_failed(&notice.name, reason), true),
        DownloadResult::NoUrl => (i18n.no_download_url(&notice.name), true),
    }
}

fn build_runtime() -> Arc<Runtime> {
    match Runtime::new() {
        Ok(rt) => Arc::new(rt),
        Err(err) => {
            warn!(
                "ui: failed to create multithreaded runtime ({}); trying single-threaded runtime",
                err
            );
            match Builder::new_current_thread().enable_all().build() {
                Ok(rt) => Arc::new(rt),
                Err(fallback_err) => {
                    error!(
                        "ui: failed to create any Tokio runtime ({}); terminating",
                        fallback_err
                    );
                    std::process::exit(1);
                }
            }
        }
    }
}

pub struct CatalogApp {
    runtime: Arc<Runtime>,
    engine: Arc<CatalogEngine<HttpTransport>>,
    updates_rx: mpsc::UnboundedReceiver<EngineUpdate>,
    updates_tx: mpsc::UnboundedSender<EngineUpdate>,
    ctx: egui::Context,
    state: BrowserState,
    // Textures live exactly as long as the view that displays them.
    textures: HashMap<ImageTarget, TextureHandle>,
    app_version: &'static str,
    language: Language,
    theme: Theme,
}

impl CatalogApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        let runtime = build_runtime();
        let transport = Arc::new(HttpTransport::new(settings.request_timeout));
        let engine = Arc::new(CatalogEngine::new(transport, settings.download_dir.clone()));
        let (tx, rx) = mpsc::unbounded_channel();

        let mut app = Self {
            runtime,
            engine,
            updates_rx: rx,
            updates_tx: tx,
            ctx: cc.egui_ctx.clone(),
            state: BrowserState::new(settings.manifest),
            textures: HashMap::new(),
            app_version: env!("CARGO_PKG_VERSION"),
            language: detect_system_language(),
            theme: Theme::Dark,
        };
        let requests = app.state.start();
        app.submit(requests);
        app
    }

    fn colors(&self) -> ThemePalette {
        self.theme.palette()
    }

    fn i18n(&self) -> I18n {
        I18n::new(self.language)
    }

    fn submit(&self, requests: Vec<EngineRequest>) {
        for request in requests {
            let engine = self.engine.clone();
            let tx = self.updates_tx.clone();
            let ctx = self.ctx.clone();
            self.runtime.spawn(async move {
                engine.handle_request(request, &tx).await;
                ctx.request_repaint();
            });
        }
    }

    fn dispatch(&mut self, action: UserAction) {
        let requests = self.state.handle(action);
        self.prune_textures();
        self.submit(requests);
    }

    fn prune_textures(&mut self) {
        let state = &self.state;
        self.textures.retain(|target, _| state.is_current(*target));
    }

    fn sync_updates(&mut self, ctx: &egui::Context) {
        while let Ok(update) = self.updates_rx.try_recv() {
            match update {
                EngineUpdate::ImageReady { target, image } => {
                    if self.state.is_current(target) {
                        let texture = load_texture(ctx, target, &image);
                        self.textures.insert(target, texture);
                    } else {
                        debug!("dropping stale image for {target:?}");
                    }
                }
                other => {
                    let requests = self.state.apply(other);
                    self.prune_textures();
                    self.submit(requests);
                }
            }
        }
    }

    fn render_top_bar(
        &mut self,
        ui: &mut egui::Ui,
        colors: &ThemePalette,
        i18n: I18n,
        actions: &mut Vec<UserAction>,
    ) {
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.heading(RichText::new(i18n.heading()).color(colors.accent));
                ui.label(RichText::new(i18n.tagline()).color(colors.text_muted));
            });
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                egui::ComboBox::from_id_salt("language_combo")
                    .selected_text(self.language.display_name())
                    .show_ui(ui, |ui| {
                        for language in Language::ALL {
                            ui.selectable_value(
                                &mut self.language,
                                language,
                                language.display_name(),
                            );
                        }
                    });
                egui::ComboBox::from_id_salt("theme_combo")
                    .selected_text(i18n.theme_label(self.theme))
                    .show_ui(ui, |ui| {
                        for theme in [Theme::Dark, Theme::Light] {
                            ui.selectable_value(&mut self.theme, theme, i18n.theme_label(theme));
                        }
                    });
                let mut layout = self.state.layout;
                egui::ComboBox::from_id_salt("layout_combo")
                    .selected_text(i18n.layout_label(layout))
                    .show_ui(ui, |ui| {
                        for option in [LayoutMode::Grid, LayoutMode::List] {
                            ui.selectable_value(&mut layout, option, i18n.layout_label(option));
                        }
                    });
                if layout != self.state.layout {
                    actions.push(UserAction::SetLayout(layout));
                }

                ui.add_space(8.0);
                if ui
                    .add(secondary_button(i18n.open_folder_button(), colors))
                    .clicked()
                {
                    actions.push(UserAction::OpenDownloadFolder);
                }
                let idle = !self.state.is_loading();
                if ui
                    .add_enabled(idle, secondary_button(i18n.open_manifest_button(), colors))
                    .clicked()
                    && let Some(path) = rfd::FileDialog::new()
                        .set_title(i18n.manifest_dialog_title())
                        .add_filter("JSON", &["json"])
                        .pick_file()
                {
                    actions.push(UserAction::UseManifest(ManifestSource::Local(path)));
                }
                if ui
                    .add_enabled(idle, primary_cta_button(i18n.reload_button(), colors, 96.0))
                    .clicked()
                {
                    actions.push(UserAction::Reload);
                }
            });
        });
    }

    fn render_bottom_bar(&self, ui: &mut egui::Ui, colors: &ThemePalette, i18n: I18n) {
        ui.horizontal_wrapped(|ui| {
            badge_frame(colors.border_strong).show(ui, |ui| {
                ui.label(
                    RichText::new(i18n.app_version(self.app_version))
                        .color(colors.text_primary)
                        .small(),
                );
            });
            ui.label(
                RichText::new(i18n.source_label(&self.state.source.to_string()))
                    .color(colors.text_faint)
                    .small(),
            );
            ui.label(
                RichText::new(i18n.saving_to(&self.engine.download_dir().display().to_string()))
                    .color(colors.text_faint)
                    .small(),
            );
        });

        ui.add_space(4.0);
        if let DownloadState::Requesting { name } = &self.state.download {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(i18n.downloading(name));
            });
        }
        if self.state.notices.is_empty() {
            if !self.state.is_downloading() {
                ui.label(RichText::new(i18n.no_activity()).color(colors.text_faint).small());
            }
            return;
        }
        for notice in self.state.notices.iter().rev() {
            let (text, is_error) = notice_text(i18n, notice);
            let color = if is_error {
                colors.danger
            } else {
                colors.accent
            };
            let line = format!("[{}] {text}", notice.at.format("%H:%M:%S"));
            let response = ui.colored_label(color, line);
            if let DownloadResult::Succeeded(path) = &notice.result {
                response.on_hover_text(path.display().to_string());
            }
        }
    }

    fn render_category_strip(
        &self,
        ui: &mut egui::Ui,
        colors: &ThemePalette,
        actions: &mut Vec<UserAction>,
    ) {
        egui::ScrollArea::horizontal()
            .id_salt("category_strip")
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    for category in self.state.catalog.list_categories() {
                        let selected = self.state.selected.as_deref() == Some(category);
                        let button = if selected {
                            primary_cta_button(category.to_owned(), colors, 120.0)
                        } else {
                            secondary_button(category.to_owned(), colors)
                                .min_size(Vec2::new(120.0, 34.0))
                        };
                        if ui.add(button).clicked() && !selected {
                            actions.push(UserAction::SelectCategory(category.to_owned()));
                        }
                    }
                });
            });
    }

    fn render_sidebar(
        &self,
        ui: &mut egui::Ui,
        colors: &ThemePalette,
        i18n: I18n,
        actions: &mut Vec<UserAction>,
    ) {
        ui.heading(i18n.categories_heading());
        ui.separator();
        egui::ScrollArea::vertical().show(ui, |ui| {
            for category in self.state.catalog.list_categories() {
                let selected = self.state.selected.as_deref() == Some(category);
                let count = self.state.catalog.apps_in(category).len();
                let label = RichText::new(category).strong();
                let response = ui.selectable_label(selected, label);
                ui.label(
                    RichText::new(i18n.app_count(count))
                        .color(colors.text_faint)
                        .small(),
                );
                if response.clicked() && !selected {
                    actions.push(UserAction::SelectCategory(category.to_owned()));
                }
            }
        });
    }

    fn render_catalog(
        &self,
        ui: &mut egui::Ui,
        colors: &ThemePalette,
        i18n: I18n,
        actions: &mut Vec<UserAction>,
    ) {
        match &self.state.load {
            LoadState::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(i18n.loading());
                });
                return;
            }
            LoadState::Failed(err) => {
                section_frame(colors).show(ui, |ui| {
                    ui.colored_label(colors.danger, i18n.load_failed(err));
                });
                return;
            }
            LoadState::Loaded => {}
        }

        if self.state.catalog.is_empty() {
            ui.label(RichText::new(i18n.no_categories()).color(colors.text_muted));
            return;
        }

        if self.state.layout == LayoutMode::Grid {
            self.render_category_strip(ui, colors, actions);
            ui.separator();
        }

        let apps = self.state.visible_apps();
        if apps.is_empty() {
            ui.add_space(40.0);
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(i18n.empty_category()).size(16.0));
            });
            return;
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| match self.state.layout {
                LayoutMode::Grid => self.render_cover_grid(ui, colors, apps, actions),
                LayoutMode::List => self.render_app_list(ui, colors, i18n, apps, actions),
            });
    }

    fn render_cover_grid(
        &self,
        ui: &mut egui::Ui,
        colors: &ThemePalette,
        apps: &[AppRecord],
        actions: &mut Vec<UserAction>,
    ) {
        let cover_size = display_size(ImageSize::COVER);
        egui::Grid::new("cover_grid")
            .spacing([20.0, 20.0])
            .show(ui, |ui| {
                for (index, app) in apps.iter().enumerate() {
                    elevated_frame(colors).show(ui, |ui| {
                        ui.vertical(|ui| {
                            let target = self.state.cover_target(index);
                            let clicked = match self.textures.get(&target) {
                                Some(texture) => ui
                                    .add(
                                        egui::Button::image(
                                            egui::Image::from_texture(texture)
                                                .fit_to_exact_size(cover_size),
                                        )
                                        .frame(false),
                                    )
                                    .clicked(),
                                None => {
                                    let (rect, response) =
                                        ui.allocate_exact_size(cover_size, egui::Sense::click());
                                    ui.painter().rect_filled(
                                        rect,
                                        CornerRadius::same(8),
                                        placeholder_color(),
                                    );
                                    ui.put(rect, egui::Spinner::new());
                                    response.clicked()
                                }
                            };
                            ui.set_max_width(cover_size.x);
                            ui.label(RichText::new(app.entry_label()).strong());
                            if clicked {
                                actions.push(UserAction::OpenDetails(app.clone()));
                            }
                        });
                    });
                    if (index + 1) % COVER_COLUMNS == 0 {
                        ui.end_row();
                    }
                }
            });
    }

    fn render_app_list(
        &self,
        ui: &mut egui::Ui,
        colors: &ThemePalette,
        i18n: I18n,
        apps: &[AppRecord],
        actions: &mut Vec<UserAction>,
    ) {
        let busy = self.state.is_downloading();
        for app in apps {
            elevated_frame(colors).show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        if ui
                            .link(RichText::new(app.entry_label()).strong().size(16.0))
                            .clicked()
                        {
                            actions.push(UserAction::OpenDetails(app.clone()));
                        }
                        if !app.description.trim().is_empty() {
                            ui.label(
                                RichText::new(truncate_text(
                                    app.description.trim(),
                                    DESCRIPTION_PREVIEW_CHARS,
                                ))
                                .color(colors.text_muted),
                            );
                        }
                    });
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui
                            .add_enabled(
                                !busy,
                                primary_cta_button(i18n.download_button(), colors, 110.0),
                            )
                            .clicked()
                        {
                            actions.push(UserAction::Download(app.clone()));
                        }
                    });
                });
            });
        }
    }

    fn render_detail_window(
        &self,
        ctx: &egui::Context,
        colors: &ThemePalette,
        i18n: I18n,
        actions: &mut Vec<UserAction>,
    ) {
        let Some(app) = &self.state.detail else {
            return;
        };
        let title = if app.name.trim().is_empty() {
            i18n.details_fallback_title().to_owned()
        } else {
            app.display_name().to_owned()
        };
        let banner_size = display_size(ImageSize::BANNER);
        let mut open = true;
        let mut close_requested = false;

        egui::Window::new(title)
            .id(egui::Id::new("app_detail_window"))
            .collapsible(false)
            .resizable(true)
            .default_width(DETAIL_WINDOW_WIDTH)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    match self.textures.get(&self.state.banner_target()) {
                        Some(texture) if app.banner_or_cover().is_some() => {
                            ui.add(
                                egui::Image::from_texture(texture).fit_to_exact_size(banner_size),
                            );
                        }
                        Some(_) => {
                            ui.label(RichText::new(i18n.no_banner()).color(colors.text_faint));
                        }
                        None => {
                            let (rect, _) =
                                ui.allocate_exact_size(banner_size, egui::Sense::hover());
                            ui.painter().rect_filled(
                                rect,
                                CornerRadius::same(8),
                                placeholder_color(),
                            );
                            ui.put(rect, egui::Spinner::new());
                        }
                    }
                    ui.add_space(6.0);
                    ui.label(RichText::new(app.display_name()).size(20.0).strong());
                });
                if !app.description.trim().is_empty() {
                    ui.add(egui::Label::new(app.description.trim()).wrap());
                }
                ui.label(
                    RichText::new(
                        i18n.version_and_author(app.display_version(), app.display_author()),
                    )
                    .color(colors.text_muted),
                );
                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    let busy = self.state.is_downloading();
                    if ui
                        .add_enabled(
                            !busy,
                            primary_cta_button(i18n.download_button(), colors, 140.0),
                        )
                        .clicked()
                    {
                        actions.push(UserAction::Download(app.clone()));
                    }
                    if ui.add(secondary_button(i18n.close_button(), colors)).clicked() {
                        close_requested = true;
                    }
                    if let DownloadState::Requesting { name } = &self.state.download {
                        ui.spinner();
                        ui.label(i18n.downloading(name));
                    }
                });
                let name = download_name(app);
                if let Some(notice) = self.state.notices.iter().rev().find(|n| n.name == name) {
                    let (text, is_error) = notice_text(i18n, notice);
                    let color = if is_error {
                        colors.danger
                    } else {
                        colors.accent
                    };
                    ui.colored_label(color, text);
                }
            });

        if !open || close_requested {
            actions.push(UserAction::CloseDetails);
        }
    }
}

impl eframe::App for CatalogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.sync_updates(ctx);

        let colors = self.colors();
        apply_theme(ctx, &colors);
        let mut actions = Vec::new();

        let top_bar_i18n = self.i18n();
        egui::TopBottomPanel::top("top_bar")
            .frame(
                Frame::NONE
                    .fill(colors.panel)
                    .stroke(Stroke::new(1.0, colors.border))
                    .inner_margin(Margin::symmetric(16, 12)),
            )
            .show(ctx, |ui| {
                self.render_top_bar(ui, &colors, top_bar_i18n, &mut actions);
            });

        let i18n = self.i18n();
        egui::TopBottomPanel::bottom("bottom_bar")
            .frame(
                Frame::NONE
                    .fill(colors.panel)
                    .stroke(Stroke::new(1.0, colors.border))
                    .inner_margin(Margin::symmetric(16, 10)),
            )
            .show(ctx, |ui| {
                self.render_bottom_bar(ui, &colors, i18n);
            });

        let show_sidebar = self.state.layout == LayoutMode::List
            && self.state.load == LoadState::Loaded
            && !self.state.catalog.is_empty();
        if show_sidebar {
            egui::SidePanel::left("category_sidebar")
                .resizable(false)
                .exact_width(SIDEBAR_WIDTH)
                .frame(
                    Frame::NONE
                        .fill(colors.panel)
                        .stroke(Stroke::new(1.0, colors.border))
                        .inner_margin(Margin::same(12)),
                )
                .show(ctx, |ui| {
                    self.render_sidebar(ui, &colors, i18n, &mut actions);
                });
        }

        egui::CentralPanel::default()
            .frame(
                Frame::NONE
                    .fill(colors.bg)
                    .inner_margin(Margin::symmetric(14, 12)),
            )
            .show(ctx, |ui| {
                self.render_catalog(ui, &colors, i18n, &mut actions);
            });

        self.render_detail_window(ctx, &colors, i18n, &mut actions);

        for action in actions {
            self.dispatch(action);
        }
    }
}
