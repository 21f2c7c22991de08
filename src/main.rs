mod analysis;
mod app;
mod chat;
mod commands;
mod composer;
mod config;
mod core;
mod display;
mod folders;
mod input;
mod language;
mod pipeline;
mod providers;
mod suggest;
mod workspace;

use crate::app::Application;
use crate::config::Config;
use crate::core::error::AssistantError;
use crate::pipeline::Pipeline;
use crate::providers::openai::OpenAIProvider;
use crate::workspace::Workspace;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<(), AssistantError> {
    let config = Config::load()?;
    let provider = OpenAIProvider::with_endpoint(config.base_url())?;
    let pipeline = Pipeline::new(Arc::new(provider), config.pipeline_options());
    let workspace = Workspace::new(config.settings());

    let mut app = Application::new(pipeline, commands::create_command_registry(), workspace);
    app.run().await
}

fn main() {
    init_tracing();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            display::display_error(&format!("Failed to start runtime: {}", err));
            std::process::exit(1);
        }
    };

    if let Err(err) = runtime.block_on(run()) {
        display::display_error(&err.to_string());
        std::process::exit(1);
    }
}
