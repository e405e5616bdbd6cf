//! The three catalog operations.
//!
//! Each operation issues exactly one request and always yields a [`RequestOutcome`]; transport
//! failures are folded into the outcome with status code 0.
use crate::transaction::transaction;
use crate::transport::{ApiRequest, Transport};
use catalog_load_core::{Endpoint, RequestOutcome, PRODUCTS_PATH};
use rand::Rng;
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

const PRODUCT_DESCRIPTION: &str = "Product generated during load testing";
const PRODUCT_CATEGORY: &str = "Electronics";

/// Payload for `POST /api/products`. Prices are integer minor units.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: u32,
    pub stock_quantity: u32,
    pub category: String,
    pub sku: String,
}

impl NewProduct {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let epoch_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();

        Self {
            name: format!("Load Test Product {}", rng.gen_range(1..=100_000)),
            description: PRODUCT_DESCRIPTION.to_string(),
            price: rng.gen_range(10_000..=100_000),
            stock_quantity: rng.gen_range(10..=100),
            category: PRODUCT_CATEGORY.to_string(),
            sku: format!("SKU-{epoch_ms}-{}", rng.gen_range(1..=1000)),
        }
    }
}

/// `GET /api/products`
pub async fn list_products<T: Transport>(transport: &T, tenant: &str) -> RequestOutcome {
    let request = ApiRequest::get(PRODUCTS_PATH, tenant);
    transaction(Endpoint::ListProducts, transport.send(request)).await
}

/// `GET /api/products/{id}`
pub async fn get_product<T: Transport>(
    transport: &T,
    tenant: &str,
    product_id: &str,
) -> RequestOutcome {
    let request = ApiRequest::get(format!("{PRODUCTS_PATH}/{product_id}"), tenant);
    transaction(Endpoint::GetProduct, transport.send(request)).await
}

/// `POST /api/products`
pub async fn create_product<T: Transport>(
    transport: &T,
    tenant: &str,
    product: NewProduct,
) -> RequestOutcome {
    let request = ApiRequest::post(PRODUCTS_PATH, tenant, product);
    transaction(Endpoint::CreateProduct, transport.send(request)).await
}

/// A request with every random choice already made.
///
/// Drawing happens up front so no RNG handle lives across a suspension point.
#[derive(Debug, Clone, PartialEq)]
pub enum PlannedRequest {
    List {
        tenant: String,
    },
    Get {
        tenant: String,
        product_id: String,
    },
    Create {
        tenant: String,
        product: NewProduct,
    },
}

impl PlannedRequest {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            PlannedRequest::List { .. } => Endpoint::ListProducts,
            PlannedRequest::Get { .. } => Endpoint::GetProduct,
            PlannedRequest::Create { .. } => Endpoint::CreateProduct,
        }
    }

    pub fn tenant(&self) -> &str {
        match self {
            PlannedRequest::List { tenant }
            | PlannedRequest::Get { tenant, .. }
            | PlannedRequest::Create { tenant, .. } => tenant,
        }
    }

    pub async fn execute<T: Transport>(self, transport: &T) -> RequestOutcome {
        match self {
            PlannedRequest::List { tenant } => list_products(transport, &tenant).await,
            PlannedRequest::Get { tenant, product_id } => {
                get_product(transport, &tenant, &product_id).await
            }
            PlannedRequest::Create { tenant, product } => {
                create_product(transport, &tenant, product).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use reqwest::Method;

    #[test]
    fn random_product_ranges() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let product = NewProduct::random(&mut rng);
            assert!((10_000..=100_000).contains(&product.price));
            assert!((10..=100).contains(&product.stock_quantity));
            assert!(product.name.starts_with("Load Test Product "));
            assert_eq!(product.category, "Electronics");

            let parts: Vec<&str> = product.sku.split('-').collect();
            assert_eq!(parts.len(), 3);
            assert_eq!(parts[0], "SKU");
            let suffix: u32 = parts[2].parse().unwrap();
            assert!((1..=1000).contains(&suffix));
        }
    }

    #[test]
    fn product_serializes_camel_case() {
        let product = NewProduct::random(&mut SmallRng::seed_from_u64(1));
        let json = serde_json::to_value(&product).unwrap();
        assert!(json.get("stockQuantity").is_some());
        assert!(json.get("stock_quantity").is_none());
        assert!(json["price"].is_u64());
    }

    #[tokio::test]
    async fn operations_build_expected_requests() {
        let transport = MockTransport::instant();

        let list = list_products(&transport, "company-a").await;
        let get = get_product(&transport, "company-b", "42").await;
        let product = NewProduct::random(&mut SmallRng::seed_from_u64(3));
        let create = create_product(&transport, "company-c", product.clone()).await;

        assert!(list.success() && get.success() && create.success());
        assert_eq!(create.status_code(), 201);

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests[0], ApiRequest::get("/api/products", "company-a"));
        assert_eq!(requests[1], ApiRequest::get("/api/products/42", "company-b"));
        assert_eq!(requests[2].method, Method::POST);
        assert_eq!(requests[2].path, "/api/products");
        assert_eq!(requests[2].body, Some(product));
    }

    #[tokio::test]
    async fn failures_never_escape() {
        let transport = MockTransport::failing();

        let outcome = PlannedRequest::List {
            tenant: "company-a".to_string(),
        }
        .execute(&transport)
        .await;

        assert_eq!(outcome.endpoint(), Endpoint::ListProducts);
        assert_eq!(outcome.status_code(), 0);
        assert!(!outcome.success());
    }

    #[tokio::test]
    async fn wrong_status_is_a_failure() {
        let transport = MockTransport::status(404);
        let outcome = get_product(&transport, "company-a", "7").await;
        assert_eq!(outcome.status_code(), 404);
        assert!(!outcome.success());
    }
}
