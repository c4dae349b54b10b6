mod bindings;
mod chart;
mod color;
mod config;
mod data;
mod error;
mod server;
mod state;
mod widgets;

use anyhow::Result;

use config::DashboardConfig;
use state::AppState;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DashboardConfig::load()
        .inspect_err(|e| log::error!("Failed to load configuration: {e}"))?;

    // No data, no dashboard: a load failure aborts before anything is served.
    let dataset = data::loader::load_file(&config.data_path)
        .inspect_err(|e| log::error!("Failed to load dataset: {e:#}"))?;

    let state = AppState::new(dataset, &config);
    server::serve(state, &config.bind_address()).await
}
