//! Bounded-concurrency scenario runner.
//!
//! A scenario issues exactly `num_requests` requests. Every request is its own tokio task; a
//! shared [`CapacityLimiter`] keeps at most `concurrency` of them in flight. Outcomes land in a
//! lock-free bucket that is emptied at the start and drained at the end of each run.
use crate::error::DriverError;
use crate::limiter::CapacityLimiter;
use crate::plan::TrafficPlan;
use crate::transport::Transport;
use catalog_load_core::{RequestOutcome, ScenarioConfig, ScenarioReport};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use metrics_util::AtomicBucket;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
#[allow(unused)]
use tracing::{debug, error, info, instrument, trace, warn, Instrument};

pub struct ScenarioRunner<T> {
    transport: Arc<T>,
    plan: Arc<TrafficPlan>,
    outcomes: Arc<AtomicBucket<RequestOutcome>>,
}

impl<T> ScenarioRunner<T>
where
    T: Transport + Send + Sync + 'static,
{
    pub fn new(transport: Arc<T>, plan: TrafficPlan) -> Self {
        Self {
            transport,
            plan: Arc::new(plan),
            outcomes: Arc::new(AtomicBucket::new()),
        }
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Run one scenario to completion and aggregate its outcomes.
    ///
    /// Individual request failures only show up in the report. An error here means the scenario
    /// itself could not be carried out (invalid config, a work unit that never finished).
    #[instrument(name = "scenario", skip_all, fields(name = %config.name))]
    pub async fn run(&mut self, config: &ScenarioConfig) -> Result<ScenarioReport, DriverError> {
        config.validate().map_err(DriverError::InvalidScenario)?;
        info!(
            "Running {} requests with concurrency {}",
            config.num_requests, config.concurrency
        );

        self.outcomes.clear();
        let limiter = CapacityLimiter::new(config.concurrency);
        let pacer = config.tps.map(|tps| Arc::new(rate_limiter(tps)));

        let start = Instant::now();

        let tasks: Vec<JoinHandle<Result<(), DriverError>>> = (0..config.num_requests)
            .map(|_| {
                tokio::spawn(
                    work_unit(
                        self.transport.clone(),
                        self.plan.clone(),
                        limiter.clone(),
                        pacer.clone(),
                        self.outcomes.clone(),
                    )
                    .in_current_span(),
                )
            })
            .collect();

        let mut failure = None;
        for task in tasks {
            let res = match task.await {
                Ok(res) => res,
                Err(err) => Err(err.into()),
            };
            // NOTE: Keep joining so no work unit outlives the scenario.
            if let Err(err) = res {
                error!("Work unit failed: {err}");
                failure.get_or_insert(err);
            }
        }

        let elapsed = start.elapsed();

        let mut outcomes = Vec::with_capacity(config.num_requests);
        self.outcomes
            .clear_with(|chunk| outcomes.extend_from_slice(chunk));

        if let Some(err) = failure {
            return Err(err);
        }

        let report = ScenarioReport::new(config, &outcomes, elapsed)
            .with_peak_in_flight(limiter.peak_in_flight());

        info!(
            "Scenario complete: {}/{} succeeded in {:.2}s",
            report.successes,
            report.num_requests,
            elapsed.as_secs_f64()
        );

        Ok(report)
    }
}

/// One virtual user issuing one request.
async fn work_unit<T>(
    transport: Arc<T>,
    plan: Arc<TrafficPlan>,
    limiter: CapacityLimiter,
    pacer: Option<Arc<DefaultDirectRateLimiter>>,
    outcomes: Arc<AtomicBucket<RequestOutcome>>,
) -> Result<(), DriverError>
where
    T: Transport + Send + Sync + 'static,
{
    if let Some(pacer) = pacer {
        pacer.until_ready().await;
    }

    let slot = limiter.acquire().await?;

    let request = {
        let mut rng = rand::thread_rng();
        plan.draw(&mut rng)
    };
    trace!("Dispatching {} for {}", request.endpoint(), request.tenant());

    let outcome = request.execute(transport.as_ref()).await;
    drop(slot);

    outcomes.push(outcome);
    Ok(())
}

fn rate_limiter(tps: NonZeroU32) -> DefaultDirectRateLimiter {
    RateLimiter::direct(Quota::per_second(tps).allow_burst(NonZeroU32::MIN))
}
