//! End-to-end scrape runs against a mock search endpoint

use crate::{create_test_client, create_test_config};
use shelf_scout::crawler::{CollectingObserver, Paginator, ScrapeEvent, StopReason};
use shelf_scout::output::{write_products_csv, CsvSink, DatasetSink, MemoryDiagnostics};
use shelf_scout::record::{normalize_all, PriceRange, RatingCategory, ReviewCategory};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING_PAGE: &str = r##"
<html><body>
<div class="s-main-slot">
    <div data-component-type="s-search-result" data-asin="B0TRAIN01">
        <h2><a class="a-link-normal" href="/Wooden-Train-Set/dp/B0TRAIN01/ref=sr_1_1"><span>Wooden Train Set</span></a></h2>
        <span class="a-price"><span class="a-price-whole">1,299.</span></span>
        <span class="a-icon-alt">4.6 out of 5 stars</span>
        <a href="/dp/B0TRAIN01#customerReviews"><span>2,345</span></a>
    </div>
    <div data-component-type="s-search-result" data-asin="B0KITE002">
        <h2><a class="a-link-normal" href="/Rainbow-Kite/dp/B0KITE002/ref=sr_1_2"><span>Rainbow Kite</span></a></h2>
        <span class="a-price"><span class="a-price-whole">349</span></span>
        <i aria-label="3.8 out of 5 stars"><span>3.8</span></i>
        <a href="/dp/B0KITE002#customerReviews"><span>27</span></a>
    </div>
    <div data-component-type="s-search-result" data-asin="">
        <div class="sponsored-banner">Sponsored</div>
    </div>
    <div data-component-type="s-search-result" data-asin="B0PUZZLE3">
        <h2><span>Jigsaw Puzzle</span></h2>
    </div>
</div>
</body></html>
"##;

const CAPTCHA_PAGE: &str = r#"
<html><body>
<form action="/errors/validateCaptcha"><p>Type the characters you see below</p></form>
</body></html>
"#;

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(body)
}

#[tokio::test]
async fn test_run_stops_when_circuit_opens() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .and(query_param("ref", "sr_pg_1"))
        .respond_with(html(LISTING_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .and(query_param("page", "3"))
        .respond_with(html(CAPTCHA_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .and(query_param("page", "4"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .and(query_param("page", "5"))
        .respond_with(html(LISTING_PAGE))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let (client, _sleeper) = create_test_client(&config);
    let observer = Arc::new(CollectingObserver::default());
    let diagnostics = Arc::new(MemoryDiagnostics::default());

    let paginator = Paginator::new(client, &config)
        .expect("Failed to create paginator")
        .with_observer(observer.clone())
        .with_diagnostics(diagnostics.clone());

    let outcome = paginator.run(10, 100).await;

    assert_eq!(outcome.stop_reason, StopReason::CircuitOpen);
    assert_eq!(outcome.pages_visited, 4);
    assert_eq!(outcome.pages_failed, 3);

    let names: Vec<&str> = outcome.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Wooden Train Set", "Rainbow Kite", "Jigsaw Puzzle"]);

    let train = &outcome.records[0];
    assert_eq!(
        train.url,
        format!(
            "{}/Wooden-Train-Set/dp/B0TRAIN01/ref=sr_1_1",
            mock_server.uri()
        )
    );
    assert_eq!(train.price, Some(1299.0));
    assert_eq!(train.rating, Some(4.6));
    assert_eq!(train.review_count, Some(2345));

    let kite = &outcome.records[1];
    assert_eq!(kite.price, Some(349.0));
    assert_eq!(kite.rating, Some(3.8));
    assert_eq!(kite.review_count, Some(27));

    let puzzle = &outcome.records[2];
    assert_eq!(puzzle.url, "");
    assert_eq!(puzzle.price, None);
    assert_eq!(puzzle.rating, None);
    assert_eq!(puzzle.review_count, None);

    // The captcha page is kept for inspection
    let saved = diagnostics.pages();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].0, 3);
    assert!(saved[0].1.contains("validateCaptcha"));

    let events = observer.events();
    assert!(events
        .iter()
        .any(|e| matches!(e, ScrapeEvent::CircuitOpened { consecutive_failures: 3 })));
    assert!(events
        .iter()
        .any(|e| matches!(e, ScrapeEvent::ProductSkipped { page: 1, position: 2 })));
}

#[tokio::test]
async fn test_run_respects_max_products_across_pages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .and(query_param("k", "toys and gifts"))
        .respond_with(html(LISTING_PAGE))
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let (client, _sleeper) = create_test_client(&config);
    let paginator = Paginator::new(client, &config).expect("Failed to create paginator");

    let outcome = paginator.run(10, 4).await;

    assert_eq!(outcome.stop_reason, StopReason::ProductLimit);
    assert_eq!(outcome.pages_visited, 2);
    assert_eq!(outcome.records.len(), 4);
    assert_eq!(outcome.records[3].name, "Wooden Train Set");

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].url.query(), Some("k=toys+and+gifts&page=2&ref=sr_pg_2"));
}

#[tokio::test]
async fn test_scraped_records_flow_into_datasets() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(html(LISTING_PAGE))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let (client, _sleeper) = create_test_client(&config);
    let paginator = Paginator::new(client, &config).expect("Failed to create paginator");
    let outcome = paginator.run(1, 100).await;
    assert_eq!(outcome.stop_reason, StopReason::PageLimit);

    let analytics = normalize_all(&outcome.records);
    assert_eq!(analytics.len(), 3);

    assert_eq!(analytics[0].price_range, PriceRange::From1000To2000);
    assert_eq!(analytics[0].rating_category, RatingCategory::Excellent);
    assert_eq!(analytics[0].review_category, ReviewCategory::VeryPopular);

    assert_eq!(analytics[1].price_range, PriceRange::Under500);
    assert_eq!(analytics[1].rating_category, RatingCategory::Good);
    assert_eq!(analytics[1].review_category, ReviewCategory::Some);

    assert_eq!(analytics[2].price_range, PriceRange::NoPrice);
    assert_eq!(analytics[2].rating_category, RatingCategory::NoRating);
    assert_eq!(analytics[2].review_category, ReviewCategory::NoReviews);
    assert!(!analytics[2].has_price && !analytics[2].has_rating && !analytics[2].has_reviews);

    let dir = TempDir::new().unwrap();
    let products_path = dir.path().join("products.csv");
    let analytics_path = dir.path().join("analytics.csv");

    write_products_csv(&products_path, &outcome.records).unwrap();
    CsvSink::new(&analytics_path).write(&analytics).unwrap();

    let mut reader = csv::Reader::from_path(&analytics_path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "Product_Name");
    assert_eq!(&headers[5], "Price_Range");

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(&rows[1][0], "Rainbow Kite");
    assert_eq!(&rows[1][5], "Under 500");
    assert_eq!(&rows[2][3], "0");

    let products = std::fs::read_to_string(&products_path).unwrap();
    assert_eq!(products.lines().count(), 4);
}

#[tokio::test]
async fn test_redirected_page_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/landing"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/landing"))
        .respond_with(html(LISTING_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let (client, _sleeper) = create_test_client(&config);
    let observer = Arc::new(CollectingObserver::default());
    let paginator = Paginator::new(client, &config)
        .expect("Failed to create paginator")
        .with_observer(observer.clone());

    let outcome = paginator.run(1, 100).await;

    assert_eq!(outcome.records.len(), 3);
    assert!(observer.events().contains(&ScrapeEvent::PageRedirected {
        page: 1,
        final_url: format!("{}/landing", mock_server.uri()),
    }));
}
