use catalog_load::endpoint::{create_product, get_product, list_products, NewProduct};
use catalog_load::prelude::*;
use catalog_load_tests::*;
use mock_service::MockConfig;
use std::num::NonZeroU64;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

fn text_sink() -> ConsoleSink<Vec<u8>> {
    ConsoleSink::new(OutputFormat::Text, Vec::new())
}

#[tokio::test]
async fn sequence_against_catalog() -> anyhow::Result<()> {
    init();
    let (catalog, base_url) = start_catalog(MockConfig::default()).await?;
    let config = driver_config(
        &base_url,
        vec![
            ScenarioConfig::new("Low Concurrency Test", 100, 10),
            ScenarioConfig::new("Medium Concurrency Test", 200, 20),
        ],
    )?;

    let mut sink = text_sink();
    let reports = Sequencer::connect(&config)?.run(&mut sink).await?;

    assert_eq!(reports.len(), 2);
    for (report, expected) in reports.iter().zip([100, 200]) {
        assert_eq!(report.num_requests, expected);
        assert_eq!(report.successes, expected);
        assert_eq!(report.failures, 0);
        assert_eq!(report.success_rate, 100.);
        assert!(report.throughput > 0.);
        assert!(report.peak_in_flight <= report.concurrency);
        assert!(report.latency.max_ms >= report.latency.min_ms);
        assert!(report.latency.p95_ms > 0.);
    }
    assert_eq!(catalog.requests(), 300);

    let created: usize = TENANTS.iter().map(|t| catalog.created(t)).sum();
    let create_successes: usize = reports
        .iter()
        .flat_map(|r| &r.endpoints)
        .filter(|e| e.endpoint == Endpoint::CreateProduct.label())
        .map(|e| e.successes)
        .sum();
    assert_eq!(created, create_successes);

    let out = String::from_utf8(sink.into_inner())?;
    assert!(out.contains("Running: Low Concurrency Test"));
    assert!(out.contains("Results for Medium Concurrency Test:"));
    assert!(out.contains("All tests completed!"));
    Ok(())
}

#[tokio::test]
async fn unreachable_target_fails_every_request() -> anyhow::Result<()> {
    init();
    let addr = closed_addr().await?;
    let config = driver_config(
        &format!("http://{addr}"),
        vec![ScenarioConfig::new("Nobody Home", 30, 5)],
    )?
    .timeout(Duration::from_secs(2));

    let reports = Sequencer::connect(&config)?.run(&mut text_sink()).await?;

    let report = &reports[0];
    assert_eq!(report.successes, 0);
    assert_eq!(report.failures, 30);
    assert_eq!(report.success_rate, 0.);
    assert_eq!(report.latency.mean_ms, 0.);
    assert_eq!(report.latency.max_ms, 0.);
    assert_eq!(report.endpoints.iter().map(|e| e.total).sum::<usize>(), 30);
    Ok(())
}

#[tokio::test]
async fn server_errors_are_counted_not_raised() -> anyhow::Result<()> {
    init();
    let (catalog, base_url) = start_catalog(MockConfig {
        fail_every: NonZeroU64::new(4),
        ..MockConfig::default()
    })
    .await?;
    let config = driver_config(&base_url, vec![ScenarioConfig::new("Flaky", 40, 4)])?;

    let reports = Sequencer::connect(&config)?.run(&mut text_sink()).await?;

    assert_eq!(catalog.requests(), 40);
    assert_eq!(reports[0].successes, 30);
    assert_eq!(reports[0].failures, 10);
    assert_eq!(reports[0].success_rate, 75.);
    Ok(())
}

#[tokio::test]
async fn transport_closed_after_sequence() -> anyhow::Result<()> {
    init();
    let (_catalog, base_url) = start_catalog(MockConfig::default()).await?;
    let config = driver_config(&base_url, vec![ScenarioConfig::new("Short", 5, 5)])?;

    let transport = Arc::new(HttpTransport::from_config(&config)?);
    Sequencer::new(transport.clone(), &config)?
        .run(&mut text_sink())
        .await?;

    assert!(transport.is_closed());
    let outcome = list_products(transport.as_ref(), "company-a").await;
    assert_eq!(outcome.status_code(), 0);
    Ok(())
}

#[tokio::test]
async fn operations_hit_expected_routes() -> anyhow::Result<()> {
    init();
    let (catalog, base_url) = start_catalog(MockConfig::default()).await?;
    let transport = HttpTransport::new(&Url::parse(&base_url)?, Duration::from_secs(5))?;

    let listed = list_products(&transport, "company-a").await;
    assert_eq!(listed.status_code(), 200);
    assert!(listed.success());

    let fetched = get_product(&transport, "company-a", "1000").await;
    assert_eq!(fetched.status_code(), 200);

    let missing = get_product(&transport, "company-a", "1000000").await;
    assert_eq!(missing.status_code(), 404);
    assert!(!missing.success());

    let product = NewProduct {
        name: "Load Test Product 1".to_string(),
        description: "Product generated during load testing".to_string(),
        price: 12_345,
        stock_quantity: 10,
        category: "Electronics".to_string(),
        sku: "SKU-1-1".to_string(),
    };
    let created = create_product(&transport, "company-b", product).await;
    assert_eq!(created.status_code(), 201);
    assert!(created.success());
    assert_eq!(catalog.created("company-b"), 1);
    assert_eq!(catalog.created("company-a"), 0);

    // The catalog rejects requests that carry no tenant.
    let anonymous = list_products(&transport, "").await;
    assert_eq!(anonymous.status_code(), 400);
    Ok(())
}

#[tokio::test]
async fn timeout_becomes_failed_outcome() -> anyhow::Result<()> {
    init();
    let (_catalog, base_url) = start_catalog(MockConfig {
        delay: Duration::from_millis(500),
        ..MockConfig::default()
    })
    .await?;
    let transport = HttpTransport::new(&Url::parse(&base_url)?, Duration::from_millis(100))?;

    let outcome = list_products(&transport, "company-a").await;

    assert_eq!(outcome.status_code(), 0);
    assert!(!outcome.success());
    assert!(outcome.response_time_ms() >= 100.);
    assert!(outcome.response_time_ms() < 500.);
    Ok(())
}

#[tokio::test]
async fn json_report_lines() -> anyhow::Result<()> {
    init();
    let (_catalog, base_url) = start_catalog(MockConfig::default()).await?;
    let config = driver_config(
        &base_url,
        vec![
            ScenarioConfig::new("One", 10, 2),
            ScenarioConfig::new("Two", 10, 5),
        ],
    )?;

    let mut sink = ConsoleSink::new(OutputFormat::Json, Vec::new());
    Sequencer::connect(&config)?.run(&mut sink).await?;

    let out = String::from_utf8(sink.into_inner())?;
    let events: Vec<String> = out
        .lines()
        .map(|line| -> anyhow::Result<String> {
            let value: serde_json::Value = serde_json::from_str(line)?;
            Ok(value["event"].as_str().unwrap_or_default().to_string())
        })
        .collect::<anyhow::Result<_>>()?;

    assert_eq!(
        events,
        [
            "run_started",
            "scenario_started",
            "scenario_finished",
            "scenario_started",
            "scenario_finished",
            "run_finished"
        ]
    );
    Ok(())
}
