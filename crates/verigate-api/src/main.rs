mod admission;
mod api_doc;
mod error;
mod handlers;
mod services;
mod setup;
mod state;
mod telemetry;

use verigate_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    let (_state, router) = setup::initialize_app(config.clone()).await?;

    setup::server::start_server(&config, router).await?;

    Ok(())
}
