use std::time::Duration;

/// Target used when no base URL is supplied.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Tenant slugs used when none are supplied.
pub const DEFAULT_TENANTS: [&str; 3] = ["company-a", "company-b", "company-c"];

/// Overall per-request timeout enforced by the transport.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Share of requests that list the catalog.
pub const DEFAULT_LIST_WEIGHT: f64 = 0.5;
/// Share of requests that fetch a single product.
pub const DEFAULT_GET_BY_ID_WEIGHT: f64 = 0.3;
/// Share of requests that create a product.
pub const DEFAULT_CREATE_WEIGHT: f64 = 0.2;

/// Escalating load profile run when no scenarios are supplied: (name, requests, concurrency).
pub const DEFAULT_SCENARIOS: [(&str, usize, usize); 4] = [
    ("Low Concurrency Test", 100, 10),
    ("Medium Concurrency Test", 500, 50),
    ("High Concurrency Test", 1000, 100),
    ("Stress Test", 2000, 200),
];

/// Product ids are drawn uniformly from `1..=MAX_PRODUCT_ID`.
pub const MAX_PRODUCT_ID: u32 = 1000;

/// Minimum successful samples before a median is reported.
pub const MIN_SAMPLES_P50: usize = 2;
/// Minimum successful samples before a 95th percentile is reported.
pub const MIN_SAMPLES_P95: usize = 20;

pub const TENANT_HEADER: &str = "X-Tenant-Slug";
pub const PRODUCTS_PATH: &str = "/api/products";
