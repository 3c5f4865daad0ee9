mod app;
mod config;
mod knowledge;

use std::sync::Arc;

use anyhow::{Result, anyhow};
use clap::Parser;
use log::info;

use config::{Args, Config};
use knowledge::{HttpKnowledgeApi, KnowledgeApi};

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::try_from(Args::parse())?;
    let api: Arc<dyn KnowledgeApi> = Arc::new(HttpKnowledgeApi::new(
        &config.api_url,
        config.request_timeout,
    )?);
    info!("using knowledge backend at {}", config.api_url);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Knowledge Graph",
        options,
        Box::new(move |cc| Ok(Box::new(app::ConceptGraphApp::new(cc, config, api)))),
    )
    .map_err(|error| anyhow!("failed to run the UI: {error}"))
}
