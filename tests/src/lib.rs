//! Harness for end-to-end runs of the driver against the mock catalog.
use catalog_load::prelude::*;
use mock_service::{Catalog, MockConfig};
use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub const TENANTS: [&str; 3] = ["company-a", "company-b", "company-c"];

pub fn init() {
    static ONCE_LOCK: OnceLock<()> = OnceLock::new();

    ONCE_LOCK.get_or_init(|| {
        let _ = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("catalog_load=debug,mock_service=info")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Start a catalog on an ephemeral port and return it with its base url.
pub async fn start_catalog(config: MockConfig) -> anyhow::Result<(Arc<Catalog>, String)> {
    let catalog = Catalog::new(config);
    let addr = mock_service::spawn("127.0.0.1:0".parse()?, catalog.clone()).await?;
    Ok((catalog, format!("http://{addr}")))
}

/// An address nothing is listening on.
pub async fn closed_addr() -> anyhow::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(addr)
}

pub fn driver_config(base_url: &str, scenarios: Vec<ScenarioConfig>) -> anyhow::Result<DriverConfig> {
    Ok(DriverConfig::default()
        .base_url(base_url)?
        .tenants(TENANTS)
        .scenarios(scenarios))
}
