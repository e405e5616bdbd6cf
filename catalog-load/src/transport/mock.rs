use super::{ApiRequest, Transport};
use crate::error::TransportError;
use reqwest::Method;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Instrumented in-memory transport.
///
/// Answers 200 for reads and 201 for writes unless told to fail, and records how many requests
/// were in flight at once.
#[derive(Default)]
pub(crate) struct MockTransport {
    latency: Duration,
    fail: bool,
    status: Option<u16>,
    in_flight: AtomicUsize,
    pub peak_in_flight: AtomicUsize,
    pub calls: AtomicUsize,
    pub closes: AtomicUsize,
    pub requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn instant() -> Self {
        Self::default()
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn peak(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<u16, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        } else {
            tokio::task::yield_now().await;
        }

        let status = match request.method {
            Method::POST => 201,
            _ => 200,
        };
        self.requests
            .lock()
            .expect("mock request log poisoned")
            .push(request);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail {
            Err(TransportError::Connect("connection refused".to_string()))
        } else {
            Ok(self.status.unwrap_or(status))
        }
    }

    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}
