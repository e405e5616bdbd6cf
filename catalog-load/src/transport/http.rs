use super::{ApiRequest, Transport};
use crate::error::{DriverError, TransportError};
use arc_swap::ArcSwapOption;
use catalog_load_core::{DriverConfig, TENANT_HEADER};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
#[allow(unused)]
use tracing::{debug, error, info, trace, warn};

const JSON: &str = "application/json";

/// [`Transport`] over a single pooled `reqwest` client.
///
/// The client sits behind an `ArcSwapOption` so `close` can drop the pool while requests that
/// already loaded it finish on their own handle.
pub struct HttpTransport {
    client: ArcSwapOption<Client>,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, DriverError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DriverError::ClientBuild)?;

        Ok(Self {
            client: ArcSwapOption::from_pointee(client),
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &DriverConfig) -> Result<Self, DriverError> {
        Self::new(&config.base_url, config.timeout)
    }

    pub fn is_closed(&self) -> bool {
        self.client.load().is_none()
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<u16, TransportError> {
        let client: Arc<Client> = self.client.load_full().ok_or(TransportError::Closed)?;

        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = client
            .request(request.method, url)
            .header(ACCEPT, JSON)
            .header(TENANT_HEADER, request.tenant);

        if let Some(body) = &request.body {
            builder = builder.header(CONTENT_TYPE, JSON).json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();

        // NOTE: Drain the body so the connection goes back to the pool.
        if let Err(err) = response.bytes().await {
            debug!("Discarding unreadable response body: {err}");
        }

        Ok(status)
    }

    async fn close(&self) {
        if self.client.swap(None).is_some() {
            info!("HTTP transport closed");
        }
    }
}
