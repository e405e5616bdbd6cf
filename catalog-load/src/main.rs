use catalog_load::prelude::*;
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

// NOTE: Requests interleave on a single thread; the load is I/O bound.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = LoadCli::parse();

    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("catalog_load=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    #[cfg(feature = "metrics")]
    if let Some(addr) = cli.metrics_addr {
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()?;
        tracing::info!("Serving metrics on {addr}");
    }

    let mut sink = ConsoleSink::stdout(cli.output);
    let config = cli.into_config()?;

    Sequencer::connect(&config)?.run(&mut sink).await?;

    Ok(())
}
