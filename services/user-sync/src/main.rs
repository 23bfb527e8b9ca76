use anyhow::Result;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use common::database::{health_check, init_pool};
use user_sync::{HttpUserClient, SyncCoordinator, TcpProbe, UserRepository, settings::Settings};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting user sync runner");

    let settings = Settings::new()?;

    // Open the local store
    let pool = init_pool(&settings.store.database_config()).await?;
    if !health_check(&pool).await? {
        anyhow::bail!("Failed to open local user store");
    }
    let store = UserRepository::new(pool);
    store.init_schema().await?;

    let api = HttpUserClient::new(&settings.api.base_url, settings.api.timeout())?;
    let probe = TcpProbe::from_base_url(
        &settings.api.base_url,
        settings.reachability.probe_timeout(),
    )?;

    let coordinator = SyncCoordinator::new(store, api, probe);

    match coordinator.refresh_list().await {
        Ok(outcome) => {
            if let Some(warning) = outcome.warning() {
                warn!("{}", warning);
                if let Some(cached_at) = coordinator.store().last_cached_at().await? {
                    info!("Showing users cached at {}", cached_at);
                }
            }
            info!("{} users available locally", outcome.records().len());
        }
        Err(e) => error!("User list refresh failed: {}", e),
    }

    Ok(())
}
