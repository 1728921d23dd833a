use portfolio_config::Config;
use portfolio_di::Provide;
use portfolio_email_contracts::EmailService;
use portfolio_rate_limit_memory::MemoryRateLimitStore;
use portfolio_utils::portfolio_version;
use tracing::{info, warn};

use crate::{
    email,
    environment::{types::RestServer, ConfigProvider, Provider},
};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Starting portfolio {}", portfolio_version());

    let config_provider = ConfigProvider::new(&config)?;

    let email = email::connect(&config.email)?;
    info!("Verifying smtp connection");
    match email.ping().await {
        Ok(()) => info!("SMTP ready"),
        Err(err) => warn!("SMTP verification failed: {err:#}"),
    }

    let rate_limit_store = MemoryRateLimitStore::default();

    let mut provider = Provider::new(config_provider, email, rate_limit_store);
    let server: RestServer = provider.provide();
    server.serve().await
}
