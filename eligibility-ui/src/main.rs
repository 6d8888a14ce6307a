// Desktop entry point for the eligibility checker
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod navbar;
mod state_manager;

use anyhow::Context;
use eligibility_core::{EligibilityConfig, RulesHttpClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = EligibilityConfig::load(None).context("Failed to load configuration")?;
    let client = RulesHttpClient::from_config(&config.api)
        .context("Failed to create rules service client")?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([720.0, 560.0])
            .with_title("Eligibility Checker"),
        ..Default::default()
    };

    eframe::run_native(
        "Eligibility Checker",
        native_options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Ok(Box::new(app::EligibilityApp::new(cc, client, config)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Failed to start eframe: {e}"))
}
