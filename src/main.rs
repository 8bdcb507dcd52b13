use anyhow::{anyhow, Context};
use eframe::CreationContext;
use fieler::app::FielerApp;
use fieler::config::load_config;
use fieler::utils::telemetry::init_tracing;
use tokio::runtime::Runtime;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = load_config()?;
    let runtime = Runtime::new().context("Failed to start async runtime")?;
    let app = FielerApp::new(config, runtime)?;

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([640.0, 720.0])
            .with_min_inner_size([420.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Fieler",
        options,
        Box::new(move |_cc: &CreationContext| Box::new(app)),
    )
    .map_err(|e| anyhow!("Window closed with error: {e}"))
}
