//! In-process stand-in for the multi-tenant product catalog.
//!
//! Products `1..=SEEDED_PRODUCTS` exist for every tenant; anything created through
//! `POST /api/products` is stored per tenant. Requests without an `X-Tenant-Slug` header are
//! rejected with 400.
use axum::{
    debug_handler,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::num::NonZeroU64;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, RwLock,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::debug;

pub const SEEDED_PRODUCTS: u64 = 1000;
const TENANT_HEADER: &str = "x-tenant-slug";

#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Added to every request before it is answered.
    pub delay: Duration,
    /// Answer every n-th request with 503.
    pub fail_every: Option<NonZeroU64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: u64,
    pub stock_quantity: u64,
    pub category: String,
    pub sku: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    #[serde(flatten)]
    pub details: NewProduct,
}

#[derive(Default)]
pub struct Catalog {
    config: MockConfig,
    products: RwLock<HashMap<String, Vec<Product>>>,
    next_id: AtomicU64,
    requests: AtomicU64,
}

impl Catalog {
    pub fn new(config: MockConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            next_id: AtomicU64::new(SEEDED_PRODUCTS + 1),
            ..Self::default()
        })
    }

    /// Total requests received, including rejected ones.
    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Products created for `tenant` since startup.
    pub fn created(&self, tenant: &str) -> usize {
        self.products
            .read()
            .map(|products| products.get(tenant).map_or(0, Vec::len))
            .unwrap_or_default()
    }

    async fn admit(&self, headers: &HeaderMap) -> Result<String, StatusCode> {
        let count = self.requests.fetch_add(1, Ordering::Relaxed) + 1;
        if !self.config.delay.is_zero() {
            tokio::time::sleep(self.config.delay).await;
        }

        if let Some(every) = self.config.fail_every {
            if count % every.get() == 0 {
                debug!("Injecting failure for request {count}");
                return Err(StatusCode::SERVICE_UNAVAILABLE);
            }
        }

        headers
            .get(TENANT_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or(StatusCode::BAD_REQUEST)
    }
}

pub fn app(catalog: Arc<Catalog>) -> Router {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/products/:id", get(get_product))
        .layer(TraceLayer::new_for_http())
        .with_state(catalog)
}

/// Serve on an already-bound listener until the task is dropped.
pub async fn serve(listener: TcpListener, catalog: Arc<Catalog>) -> anyhow::Result<()> {
    axum::serve(listener, app(catalog)).await?;
    Ok(())
}

/// Bind `addr`, spawn the server and return the bound address.
pub async fn spawn(addr: SocketAddr, catalog: Arc<Catalog>) -> anyhow::Result<SocketAddr> {
    let listener = TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(err) = serve(listener, catalog).await {
            tracing::error!("Mock catalog stopped: {err}");
        }
    });
    Ok(local)
}

#[debug_handler]
async fn list_products(
    State(catalog): State<Arc<Catalog>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Product>>, StatusCode> {
    let tenant = catalog.admit(&headers).await?;
    let products = catalog
        .products
        .read()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(products.get(&tenant).cloned().unwrap_or_default()))
}

#[debug_handler]
async fn get_product(
    State(catalog): State<Arc<Catalog>>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Result<Json<Product>, StatusCode> {
    let tenant = catalog.admit(&headers).await?;

    if (1..=SEEDED_PRODUCTS).contains(&id) {
        return Ok(Json(seeded(id)));
    }

    let products = catalog
        .products
        .read()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    products
        .get(&tenant)
        .and_then(|list| list.iter().find(|p| p.id == id))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

#[debug_handler]
async fn create_product(
    State(catalog): State<Arc<Catalog>>,
    headers: HeaderMap,
    Json(details): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>), StatusCode> {
    let tenant = catalog.admit(&headers).await?;

    if details.name.is_empty() || details.sku.is_empty() || details.price == 0 {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }

    let product = Product {
        id: catalog.next_id.fetch_add(1, Ordering::Relaxed),
        details,
    };

    catalog
        .products
        .write()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .entry(tenant)
        .or_default()
        .push(product.clone());

    Ok((StatusCode::CREATED, Json(product)))
}

fn seeded(id: u64) -> Product {
    Product {
        id,
        details: NewProduct {
            name: format!("Seeded Product {id}"),
            description: "Seeded catalog entry".to_string(),
            price: 10_000 + id,
            stock_quantity: 50,
            category: "Electronics".to_string(),
            sku: format!("SEED-{id}"),
        },
    }
}
