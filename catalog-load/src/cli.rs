use crate::report::OutputFormat;
use catalog_load_core::{ConfigError, DriverConfig, ScenarioConfig, DEFAULT_BASE_URL};
use clap::Parser;
#[cfg(feature = "metrics")]
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

/// Command line for the `catalog-load` binary.
///
/// ```ignore
/// $ catalog-load -u http://localhost:5000 -t company-a -t company-b
/// $ catalog-load -s "Smoke:50:5" -s "Paced:500:50:200" --timeout 5s -o json
/// ```
#[derive(Parser, Debug)]
#[command(name = "catalog-load", version, about = "Load test a multi-tenant product catalog")]
pub struct LoadCli {
    /// Base url of the catalog service.
    #[arg(short = 'u', long, default_value = DEFAULT_BASE_URL)]
    pub base_url: Url,

    /// Tenant slug to spread traffic over. Repeat for several; defaults to three demo tenants.
    #[arg(short = 't', long = "tenant")]
    pub tenants: Vec<String>,

    /// Overall timeout for each request.
    #[arg(long, default_value = "30s", value_parser = humantime::parse_duration)]
    pub timeout: Duration,

    /// Scenario as NAME:REQUESTS:CONCURRENCY[:TPS]. Repeat to run several in order; replaces
    /// the default escalating profile.
    #[arg(short = 's', long = "scenario")]
    pub scenarios: Vec<ScenarioConfig>,

    /// Report format written to stdout.
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Serve Prometheus metrics on this address while the run is in progress.
    #[cfg(feature = "metrics")]
    #[arg(long)]
    pub metrics_addr: Option<SocketAddr>,
}

impl LoadCli {
    pub fn into_config(self) -> Result<DriverConfig, ConfigError> {
        let mut config = DriverConfig::default().timeout(self.timeout);
        config.base_url = self.base_url;

        if !self.tenants.is_empty() {
            config = config.tenants(self.tenants);
        }
        if !self.scenarios.is_empty() {
            config = config.scenarios(self.scenarios);
        }

        config.validate()?;
        Ok(config)
    }
}
