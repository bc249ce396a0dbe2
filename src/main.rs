use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;
use log::info;

use crate::settings::Settings;

mod catalog;
mod downloads;
mod engine;
mod env;
mod images;
mod networking;
mod settings;
mod storage;
mod ui;

#[derive(Parser, Debug)]
#[command(
    name = "Catalog Browser",
    author,
    version,
    about = "Browse an app catalog manifest and download its entries"
)]
struct Cli {
    /// Manifest location: an http(s) URL or a path to a local JSON file.
    #[arg(long, value_name = "URL|PATH")]
    manifest: Option<String>,

    /// Folder that receives downloaded files.
    #[arg(long, value_name = "DIR")]
    download_dir: Option<PathBuf>,

    /// Per-request network timeout in seconds.
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Print the browser version and exit without starting the UI.
    #[arg(long)]
    version_only: bool,
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if cli.version_only {
        println!("Catalog Browser {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let settings = Settings::new(cli.manifest.as_deref(), cli.download_dir, cli.timeout_secs);
    info!(
        "starting with manifest {} and download folder {}",
        settings.manifest,
        settings.download_dir.display()
    );

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_icon(app_icon())
            .with_inner_size(eframe::egui::vec2(1240.0, 760.0))
            .with_maximized(true),
        ..Default::default()
    };
    eframe::run_native(
        "Catalog Browser",
        options,
        Box::new(move |cc| Ok(Box::new(ui::CatalogApp::new(cc, settings)))),
    )
}

const ICON_SIDE: u32 = 32;

/// Procedural icon: a dark tile with a 2x2 grid of accent squares.
fn app_icon() -> eframe::egui::IconData {
    let background = [20, 24, 32, 255];
    let accent = [88, 166, 255, 255];
    let mut rgba = Vec::with_capacity((ICON_SIDE * ICON_SIDE * 4) as usize);
    for y in 0..ICON_SIDE {
        for x in 0..ICON_SIDE {
            let in_cell = |v: u32| (5..14).contains(&v) || (18..27).contains(&v);
            let pixel = if in_cell(x) && in_cell(y) {
                accent
            } else {
                background
            };
            rgba.extend_from_slice(&pixel);
        }
    }
    eframe::egui::IconData {
        rgba,
        width: ICON_SIDE,
        height: ICON_SIDE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_accepts_manifest_overrides() {
        let cli = Cli::parse_from([
            "catalog-browser",
            "--manifest",
            "./apps.json",
            "--download-dir",
            "/tmp/out",
            "--timeout-secs",
            "5",
        ]);
        assert_eq!(cli.manifest.as_deref(), Some("./apps.json"));
        assert_eq!(cli.download_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(cli.timeout_secs, Some(5));
        assert!(!cli.version_only);
    }

    #[test]
    fn icon_is_square_rgba() {
        let icon = app_icon();
        assert_eq!(icon.width, ICON_SIDE);
        assert_eq!(icon.rgba.len(), (ICON_SIDE * ICON_SIDE * 4) as usize);
    }
}
