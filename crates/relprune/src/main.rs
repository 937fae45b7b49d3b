//! Main entry point for relprune.

use anyhow::{anyhow, Context};
use relprune::{AppError, Purger};
use relprune_api::{user_agent, DiscordClient, ReqwestTransport};
use relprune_common::{init_logging, timed};
use relprune_config::ConfigLoader;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::from_env()
        .load()
        .context("failed to load configuration")?;

    init_logging(&config.logging.to_logging_config()).map_err(|e| anyhow!(e))?;

    info!("Starting relprune");

    let transport = ReqwestTransport::from_config(&config.discord, user_agent())?;
    let client = DiscordClient::from_config(transport, &config);
    let purger = Purger::new(client, &config);

    let (outcome, elapsed) = timed(purger.run()).await;
    info!("Execution time: {:.2} seconds", elapsed.as_secs_f64());

    match outcome {
        Ok(summary) => {
            info!("{summary}");
            Ok(())
        }
        Err(AppError::InvalidToken) => {
            error!("{}", AppError::InvalidToken);
            Ok(())
        }
        Err(e) => {
            error!("Run aborted: {e}");
            Err(e.into())
        }
    }
}
