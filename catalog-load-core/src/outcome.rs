use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// The fixed set of catalog operations the driver exercises.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Endpoint {
    ListProducts,
    GetProduct,
    CreateProduct,
}

impl Endpoint {
    pub const ALL: [Endpoint; 3] = [
        Endpoint::ListProducts,
        Endpoint::GetProduct,
        Endpoint::CreateProduct,
    ];

    /// Human-facing label, also used to order per-endpoint output.
    pub fn label(&self) -> &'static str {
        match self {
            Endpoint::ListProducts => "GET /api/products",
            Endpoint::GetProduct => "GET /api/products/{id}",
            Endpoint::CreateProduct => "POST /api/products",
        }
    }

    /// Status code that counts as success for this operation.
    pub fn expected_status(&self) -> u16 {
        match self {
            Endpoint::ListProducts | Endpoint::GetProduct => 200,
            Endpoint::CreateProduct => 201,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of a single HTTP call. Immutable once built.
///
/// A `status_code` of [`RequestOutcome::NO_STATUS`] means the request failed before any status
/// was received (connection refused, timeout, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestOutcome {
    endpoint: Endpoint,
    status_code: u16,
    response_time_ms: f64,
    success: bool,
}

impl RequestOutcome {
    pub const NO_STATUS: u16 = 0;

    pub fn completed(endpoint: Endpoint, status_code: u16, elapsed: Duration) -> Self {
        Self {
            endpoint,
            status_code,
            response_time_ms: as_millis_f64(elapsed),
            success: status_code == endpoint.expected_status(),
        }
    }

    pub fn failed(endpoint: Endpoint, elapsed: Duration) -> Self {
        Self {
            endpoint,
            status_code: Self::NO_STATUS,
            response_time_ms: as_millis_f64(elapsed),
            success: false,
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn response_time_ms(&self) -> f64 {
        self.response_time_ms
    }

    pub fn success(&self) -> bool {
        self.success
    }
}

fn as_millis_f64(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1_000.
}
