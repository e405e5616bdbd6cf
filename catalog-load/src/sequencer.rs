use crate::error::DriverError;
use crate::plan::TrafficPlan;
use crate::report::ReportSink;
use crate::scenario::ScenarioRunner;
use crate::transport::{HttpTransport, Transport};
use catalog_load_core::{DriverConfig, ScenarioConfig, ScenarioReport};
use std::sync::Arc;
use std::time::SystemTime;
#[allow(unused)]
use tracing::{debug, error, info, instrument, warn};

/// Runs an ordered list of scenarios over one shared transport.
///
/// Scenarios never overlap: the next one starts only after the previous report has been handed
/// to the sink. The transport is closed exactly once when the sequence ends, on success or error.
pub struct Sequencer<T> {
    runner: ScenarioRunner<T>,
    scenarios: Vec<ScenarioConfig>,
    target: String,
}

impl Sequencer<HttpTransport> {
    /// Build the shared HTTP transport described by `config`.
    pub fn connect(config: &DriverConfig) -> Result<Self, DriverError> {
        config.validate()?;
        let transport = HttpTransport::from_config(config)?;
        Self::new(Arc::new(transport), config)
    }
}

impl<T> Sequencer<T>
where
    T: Transport + Send + Sync + 'static,
{
    pub fn new(transport: Arc<T>, config: &DriverConfig) -> Result<Self, DriverError> {
        let plan = TrafficPlan::new(config.tenants.clone(), config.mix)?;
        Ok(Self {
            runner: ScenarioRunner::new(transport, plan),
            scenarios: config.scenarios.clone(),
            target: config.base_url.to_string(),
        })
    }

    #[instrument(name = "sequence", skip_all, fields(target = %self.target))]
    pub async fn run<S: ReportSink>(
        mut self,
        sink: &mut S,
    ) -> Result<Vec<ScenarioReport>, DriverError> {
        sink.run_started(&self.target, SystemTime::now());

        let res = self.run_scenarios(sink).await;

        debug!("Closing transport");
        self.runner.transport().close().await;

        match &res {
            Ok(reports) => {
                info!("Completed {} scenarios", reports.len());
                sink.run_finished(SystemTime::now());
            }
            Err(err) => error!("Sequence aborted: {err}"),
        }

        res
    }

    async fn run_scenarios<S: ReportSink>(
        &mut self,
        sink: &mut S,
    ) -> Result<Vec<ScenarioReport>, DriverError> {
        let mut reports = Vec::with_capacity(self.scenarios.len());
        for config in &self.scenarios {
            sink.scenario_started(config);
            let report = self.runner.run(config).await?;
            sink.scenario_finished(&report);
            reports.push(report);
        }
        Ok(reports)
    }
}
