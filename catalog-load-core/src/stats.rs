use crate::{RequestOutcome, ScenarioConfig, MIN_SAMPLES_P50, MIN_SAMPLES_P95};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Aggregate statistics for one completed scenario.
///
/// Built from the full outcome collection once every work unit has finished. Building a report
/// twice from the same outcomes yields identical numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub num_requests: usize,
    pub concurrency: usize,
    pub successes: usize,
    pub failures: usize,
    /// Percentage of `num_requests` that succeeded.
    pub success_rate: f64,
    #[serde(rename = "elapsed_secs", serialize_with = "secs_f64")]
    pub elapsed: Duration,
    /// Requests per second over the whole scenario.
    pub throughput: f64,
    /// Latency over successful requests only.
    pub latency: LatencySummary,
    /// Per-endpoint success ratio, ordered by endpoint label.
    pub endpoints: Vec<EndpointSummary>,
    /// Highest number of requests observed in flight at once.
    pub peak_in_flight: usize,
}

impl ScenarioReport {
    pub fn new(config: &ScenarioConfig, outcomes: &[RequestOutcome], elapsed: Duration) -> Self {
        let successes = outcomes.iter().filter(|o| o.success()).count();
        let failures = outcomes.len() - successes;

        let success_rate = percentage(successes, config.num_requests);

        let elapsed_secs = elapsed.as_secs_f64();
        let throughput = if elapsed_secs > 0. {
            config.num_requests as f64 / elapsed_secs
        } else {
            0.
        };

        let latencies: Vec<f64> = outcomes
            .iter()
            .filter(|o| o.success())
            .map(RequestOutcome::response_time_ms)
            .collect();

        Self {
            name: config.name.clone(),
            num_requests: config.num_requests,
            concurrency: config.concurrency,
            successes,
            failures,
            success_rate,
            elapsed,
            throughput,
            latency: LatencySummary::from_samples(&latencies),
            endpoints: EndpointSummary::group(outcomes),
            peak_in_flight: 0,
        }
    }

    pub fn with_peak_in_flight(mut self, peak_in_flight: usize) -> Self {
        self.peak_in_flight = peak_in_flight;
        self
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Results for {}:", self.name)?;
        writeln!(f, "  Total Requests: {}", self.num_requests)?;
        writeln!(f, "  Successful: {}", self.successes)?;
        writeln!(f, "  Failed: {}", self.failures)?;
        writeln!(f, "  Success Rate: {:.2}%", self.success_rate)?;
        writeln!(f, "  Total Time: {:.2}s", self.elapsed.as_secs_f64())?;
        writeln!(f, "  Requests/sec: {:.2}", self.throughput)?;
        writeln!(
            f,
            "  Peak In-Flight: {}/{}",
            self.peak_in_flight, self.concurrency
        )?;
        writeln!(f)?;
        writeln!(f, "Response Times (successful requests):")?;
        write!(f, "{}", self.latency)?;
        writeln!(f)?;
        writeln!(f, "Results by Endpoint:")?;
        for endpoint in &self.endpoints {
            writeln!(f, "  {endpoint}")?;
        }
        Ok(())
    }
}

/// Latency distribution in milliseconds. Every field is zero when there are no samples.
///
/// Quantiles use nearest-rank without interpolation: the value at 1-based rank
/// `ceil(p/100 * n)` of the sorted samples. The median on an even count is therefore the lower
/// of the two middle values. `p50_ms` stays zero below two samples and `p95_ms` below twenty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LatencySummary {
    pub mean_ms: f64,
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

impl LatencySummary {
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);

        let p50_ms = if sorted.len() >= MIN_SAMPLES_P50 {
            nearest_rank(&sorted, 50)
        } else {
            0.
        };
        let p95_ms = if sorted.len() >= MIN_SAMPLES_P95 {
            nearest_rank(&sorted, 95)
        } else {
            0.
        };

        Self {
            mean_ms: statistical::mean(&sorted),
            p50_ms,
            p95_ms,
            min_ms: sorted[0],
            max_ms: sorted[sorted.len() - 1],
        }
    }
}

impl fmt::Display for LatencySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Average: {:.2}ms", self.mean_ms)?;
        writeln!(f, "  Median (p50): {:.2}ms", self.p50_ms)?;
        writeln!(f, "  95th percentile: {:.2}ms", self.p95_ms)?;
        writeln!(f, "  Min: {:.2}ms", self.min_ms)?;
        writeln!(f, "  Max: {:.2}ms", self.max_ms)
    }
}

/// Value at 1-based rank `ceil(percent/100 * len)`. `sorted` must be non-empty and ascending.
fn nearest_rank(sorted: &[f64], percent: usize) -> f64 {
    let rank = (sorted.len() * percent).div_ceil(100).max(1);
    sorted[rank.min(sorted.len()) - 1]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointSummary {
    pub endpoint: &'static str,
    pub successes: usize,
    pub total: usize,
}

impl EndpointSummary {
    /// Groups outcomes by endpoint label. Endpoints with no outcomes are omitted.
    pub fn group(outcomes: &[RequestOutcome]) -> Vec<Self> {
        let mut groups: BTreeMap<&'static str, (usize, usize)> = BTreeMap::new();
        for outcome in outcomes {
            let (successes, total) = groups.entry(outcome.endpoint().label()).or_default();
            *total += 1;
            if outcome.success() {
                *successes += 1;
            }
        }

        groups
            .into_iter()
            .map(|(endpoint, (successes, total))| Self {
                endpoint,
                successes,
                total,
            })
            .collect()
    }

    pub fn success_rate(&self) -> f64 {
        percentage(self.successes, self.total)
    }
}

impl fmt::Display for EndpointSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}/{} ({:.1}%)",
            self.endpoint,
            self.successes,
            self.total,
            self.success_rate()
        )
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.
    } else {
        part as f64 / whole as f64 * 100.
    }
}

fn secs_f64<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64())
}
