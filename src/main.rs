use anyhow::{Context, Result};
use codash::dashboard::shell::DashboardApp;
use codash::logging;
use codash::prefs::PrefStore;
use eframe::egui;
use std::path::PathBuf;

fn prefs_path() -> Result<PathBuf> {
    let dir = dirs_next::config_dir()
        .context("could not determine the user configuration directory")?
        .join("codash");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("could not create {}", dir.display()))?;
    Ok(dir.join("prefs.json"))
}

fn main() -> Result<()> {
    logging::init(std::env::args().any(|a| a == "--debug"));

    let path = prefs_path()?;
    tracing::info!("loading preferences from {}", path.display());
    let store = PrefStore::load(&path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 700.0])
            .with_min_inner_size([800.0, 500.0])
            .with_title("Co-Dash"),
        ..Default::default()
    };
    eframe::run_native(
        "Co-Dash",
        options,
        Box::new(move |_cc| Box::new(DashboardApp::new(store))),
    )
    .map_err(|err| anyhow::anyhow!("failed to start the dashboard: {err}"))
}
