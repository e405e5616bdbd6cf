use crate::Endpoint;

/// Metric names recorded for every request to one endpoint.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TransactionLabels {
    pub success: &'static str,
    pub error: &'static str,
    pub latency: &'static str,
}

#[macro_export]
macro_rules! generate_labels {
    ($base_name:expr) => {
        $crate::TransactionLabels {
            success: concat!(stringify!($base_name), "_success"),
            error: concat!(stringify!($base_name), "_error"),
            latency: concat!(stringify!($base_name), "_latency_ms"),
        }
    };
}

/// Gauge tracking requests dispatched but not yet completed.
pub const IN_FLIGHT_GAUGE: &str = "catalog_load_in_flight";

impl Endpoint {
    pub fn labels(&self) -> TransactionLabels {
        match self {
            Endpoint::ListProducts => generate_labels!(catalog_load_list_products),
            Endpoint::GetProduct => generate_labels!(catalog_load_get_product),
            Endpoint::CreateProduct => generate_labels!(catalog_load_create_product),
        }
    }
}
