use crate::error::TransportError;
use catalog_load_core::{Endpoint, RequestOutcome};
use std::future::Future;
use std::time::Instant;
#[allow(unused_imports)]
use tracing::{debug, error, info, trace, warn};

/// Times one transport call and turns its result into a [`RequestOutcome`].
///
/// The clock starts right before `request` is first polled and stops when it resolves, whether
/// with a status or an error. Errors are absorbed here; callers only ever see an outcome.
pub(crate) async fn transaction<F>(endpoint: Endpoint, request: F) -> RequestOutcome
where
    F: Future<Output = Result<u16, TransportError>>,
{
    let start = Instant::now();
    let res = request.await;
    let elapsed = start.elapsed();

    let outcome = match res {
        Ok(status) => {
            trace!("{endpoint} -> {status} in {elapsed:?}");
            RequestOutcome::completed(endpoint, status, elapsed)
        }
        Err(err) => {
            debug!("{endpoint} failed after {elapsed:?}: {err}");
            RequestOutcome::failed(endpoint, elapsed)
        }
    };

    record(&outcome);
    outcome
}

#[cfg(feature = "metrics")]
fn record(outcome: &RequestOutcome) {
    let labels = outcome.endpoint().labels();

    metrics::describe_histogram!(labels.latency, metrics::Unit::Milliseconds, "");
    metrics::histogram!(labels.latency).record(outcome.response_time_ms());

    if outcome.success() {
        metrics::counter!(labels.success).increment(1);
    } else {
        metrics::counter!(labels.error).increment(1);
    }
}

#[cfg(not(feature = "metrics"))]
fn record(_outcome: &RequestOutcome) {}
