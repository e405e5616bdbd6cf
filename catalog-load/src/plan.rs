use crate::endpoint::{NewProduct, PlannedRequest};
use catalog_load_core::{ConfigError, Endpoint, OperationMix, MAX_PRODUCT_ID};
use rand::seq::SliceRandom;
use rand::Rng;

/// Traffic shape shared by every work unit: which tenants exist and how operations are weighted.
///
/// Each draw is independent; nothing is coordinated between requests.
#[derive(Debug, Clone)]
pub struct TrafficPlan {
    tenants: Vec<String>,
    mix: OperationMix,
}

impl TrafficPlan {
    pub fn new(tenants: Vec<String>, mix: OperationMix) -> Result<Self, ConfigError> {
        if tenants.is_empty() {
            return Err(ConfigError::NoTenants);
        }
        Ok(Self { tenants, mix })
    }

    pub fn tenants(&self) -> &[String] {
        &self.tenants
    }

    pub fn mix(&self) -> OperationMix {
        self.mix
    }

    /// Pick a tenant uniformly, then an operation by weight band, then its arguments.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> PlannedRequest {
        let tenant = self
            .tenants
            .choose(rng)
            .cloned()
            .unwrap_or_default();

        match self.mix.pick(rng.gen::<f64>()) {
            Endpoint::ListProducts => PlannedRequest::List { tenant },
            Endpoint::GetProduct => PlannedRequest::Get {
                tenant,
                product_id: rng.gen_range(1..=MAX_PRODUCT_ID).to_string(),
            },
            Endpoint::CreateProduct => PlannedRequest::Create {
                tenant,
                product: NewProduct::random(rng),
            },
        }
    }
}
