use crate::{
    Endpoint, DEFAULT_BASE_URL, DEFAULT_CREATE_WEIGHT, DEFAULT_GET_BY_ID_WEIGHT,
    DEFAULT_LIST_WEIGHT, DEFAULT_REQUEST_TIMEOUT, DEFAULT_SCENARIOS, DEFAULT_TENANTS,
};
use serde::Serialize;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const WEIGHT_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("scenario `{0}` must issue at least one request")]
    NoRequests(String),

    #[error("scenario `{0}` must allow at least one request in flight")]
    NoConcurrency(String),

    #[error("at least one tenant is required")]
    NoTenants,

    #[error("operation weights must be non-negative and sum to 1, got {0}, {1}, {2}")]
    InvalidWeights(f64, f64, f64),

    #[error("invalid scenario `{0}`, expected NAME:REQUESTS:CONCURRENCY[:TPS]")]
    ScenarioSyntax(String),

    #[error("invalid base url: {0}")]
    BaseUrl(#[from] url::ParseError),
}

/// One (request-count, concurrency) load step.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScenarioConfig {
    pub name: String,
    pub num_requests: usize,
    pub concurrency: usize,
    /// Optional dispatch rate cap. `None` means requests go out as fast as slots free up.
    pub tps: Option<NonZeroU32>,
}

impl ScenarioConfig {
    pub fn new(name: &str, num_requests: usize, concurrency: usize) -> Self {
        Self {
            name: name.to_string(),
            num_requests,
            concurrency,
            tps: None,
        }
    }

    pub fn tps(mut self, tps: NonZeroU32) -> Self {
        self.tps = Some(tps);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_requests == 0 {
            return Err(ConfigError::NoRequests(self.name.clone()));
        }
        if self.concurrency == 0 {
            return Err(ConfigError::NoConcurrency(self.name.clone()));
        }
        Ok(())
    }
}

/// Parses `NAME:REQUESTS:CONCURRENCY[:TPS]`.
impl FromStr for ScenarioConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let syntax = || ConfigError::ScenarioSyntax(s.to_string());

        let parts: Vec<&str> = s.split(':').collect();
        let (name, requests, concurrency, tps) = match parts.as_slice() {
            [name, requests, concurrency] => (*name, *requests, *concurrency, None),
            [name, requests, concurrency, tps] => (*name, *requests, *concurrency, Some(*tps)),
            _ => return Err(syntax()),
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(syntax());
        }

        let num_requests = requests.trim().parse().map_err(|_| syntax())?;
        let concurrency = concurrency.trim().parse().map_err(|_| syntax())?;
        let tps = tps
            .map(|t| t.trim().parse::<NonZeroU32>().map_err(|_| syntax()))
            .transpose()?;

        let config = ScenarioConfig {
            name: name.to_string(),
            num_requests,
            concurrency,
            tps,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Cumulative-weight policy used to choose an operation per request.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct OperationMix {
    list: f64,
    get_by_id: f64,
    create: f64,
}

impl OperationMix {
    pub fn new(list: f64, get_by_id: f64, create: f64) -> Result<Self, ConfigError> {
        let weights = [list, get_by_id, create];
        let total: f64 = weights.iter().sum();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.)
            || (total - 1.).abs() > WEIGHT_TOLERANCE
        {
            return Err(ConfigError::InvalidWeights(list, get_by_id, create));
        }

        Ok(Self {
            list,
            get_by_id,
            create,
        })
    }

    /// Maps a uniform draw in `[0, 1)` onto the weight bands.
    pub fn pick(&self, draw: f64) -> Endpoint {
        if draw < self.list {
            Endpoint::ListProducts
        } else if draw < self.list + self.get_by_id {
            Endpoint::GetProduct
        } else {
            Endpoint::CreateProduct
        }
    }

    pub fn weight(&self, endpoint: Endpoint) -> f64 {
        match endpoint {
            Endpoint::ListProducts => self.list,
            Endpoint::GetProduct => self.get_by_id,
            Endpoint::CreateProduct => self.create,
        }
    }
}

impl Default for OperationMix {
    fn default() -> Self {
        Self {
            list: DEFAULT_LIST_WEIGHT,
            get_by_id: DEFAULT_GET_BY_ID_WEIGHT,
            create: DEFAULT_CREATE_WEIGHT,
        }
    }
}

/// Everything needed to drive a full run against one target.
#[derive(Clone, Debug)]
pub struct DriverConfig {
    pub base_url: Url,
    pub tenants: Vec<String>,
    pub timeout: Duration,
    pub mix: OperationMix,
    pub scenarios: Vec<ScenarioConfig>,
}

impl DriverConfig {
    pub fn base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = Url::parse(base_url)?;
        Ok(self)
    }

    pub fn tenants<I, S>(mut self, tenants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tenants = tenants.into_iter().map(Into::into).collect();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn mix(mut self, mix: OperationMix) -> Self {
        self.mix = mix;
        self
    }

    pub fn scenarios(mut self, scenarios: Vec<ScenarioConfig>) -> Self {
        self.scenarios = scenarios;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tenants.is_empty() {
            return Err(ConfigError::NoTenants);
        }
        self.scenarios.iter().try_for_each(ScenarioConfig::validate)
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid url"),
            tenants: DEFAULT_TENANTS.iter().map(|t| t.to_string()).collect(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            mix: OperationMix::default(),
            scenarios: DEFAULT_SCENARIOS
                .iter()
                .map(|(name, requests, concurrency)| {
                    ScenarioConfig::new(name, *requests, *concurrency)
                })
                .collect(),
        }
    }
}
