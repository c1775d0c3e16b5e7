//! RequestClient retry behaviour against a mock server

use crate::{create_test_client, create_test_config};
use shelf_scout::crawler::FetchError;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_success_on_first_attempt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let (client, sleeper) = create_test_client(&config);

    let page = client
        .get(&format!("{}/s?k=toys", mock_server.uri()))
        .await
        .expect("Fetch should succeed");

    assert_eq!(page.body, "<html>ok</html>");
    // Only the politeness delay before the single attempt
    assert_eq!(sleeper.recorded(), vec![Duration::ZERO]);
}

#[tokio::test]
async fn test_persistent_503_uses_exactly_three_attempts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let (client, sleeper) = create_test_client(&config);

    let failure = client
        .get(&format!("{}/s", mock_server.uri()))
        .await
        .expect_err("Fetch should fail");

    assert_eq!(failure.attempts, 3);
    assert_eq!(failure.last_error, FetchError::HttpStatus(503));

    // politeness, backoff, politeness, backoff, politeness, backoff
    let sleeps = sleeper.recorded();
    assert_eq!(sleeps.len(), 6);
    for (attempt, backoff) in sleeps.iter().skip(1).step_by(2).enumerate() {
        let base = 2f64.powi(attempt as i32);
        let secs = backoff.as_secs_f64();
        assert!(
            secs >= base + 1.0 && secs <= base + 3.0,
            "backoff {} out of range for attempt {}",
            secs,
            attempt
        );
    }

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn test_recovers_after_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>second</html>"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let (client, sleeper) = create_test_client(&config);

    let page = client
        .get(&format!("{}/s", mock_server.uri()))
        .await
        .expect("Second attempt should succeed");

    assert_eq!(page.body, "<html>second</html>");
    assert_eq!(
        sleeper.recorded(),
        vec![Duration::ZERO, Duration::from_secs(1), Duration::ZERO]
    );
}

#[tokio::test]
async fn test_non_200_success_status_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(204))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let (client, sleeper) = create_test_client(&config);

    let failure = client
        .get(&format!("{}/s", mock_server.uri()))
        .await
        .expect_err("204 is not a usable page");

    assert_eq!(failure.last_error, FetchError::HttpStatus(204));
    assert_eq!(
        sleeper.recorded(),
        vec![
            Duration::ZERO,
            Duration::from_secs(1),
            Duration::ZERO,
            Duration::from_secs(2),
            Duration::ZERO,
            Duration::from_secs(4),
        ]
    );
}

#[tokio::test]
async fn test_connection_failure_skips_final_backoff() {
    // Reserve a free port, then release it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let config = create_test_config(&uri);
    let (client, sleeper) = create_test_client(&config);

    let failure = client
        .get(&format!("{}/s", uri))
        .await
        .expect_err("Nothing is listening");

    // The underlying error is kept, not replaced by a canned message
    match &failure.last_error {
        FetchError::Network(message) => {
            assert!(message.contains(&format!("{}/s", uri)), "{}", message)
        }
        other => panic!("expected a network error, got {:?}", other),
    }
    assert_eq!(
        sleeper.recorded(),
        vec![
            Duration::ZERO,
            Duration::from_secs(1),
            Duration::ZERO,
            Duration::from_secs(2),
            Duration::ZERO,
        ]
    );
}

#[tokio::test]
async fn test_timeout_is_a_network_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html>too late</html>")
                .set_delay(Duration::from_secs(3)),
        )
        .expect(3)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri());
    config.request.timeout_secs = 1;
    let (client, sleeper) = create_test_client(&config);

    let failure = client
        .get(&format!("{}/s", mock_server.uri()))
        .await
        .expect_err("Every attempt should time out");

    assert_eq!(failure.attempts, 3);
    assert_eq!(failure.last_error, FetchError::Timeout);
    assert_eq!(
        sleeper.recorded(),
        vec![
            Duration::ZERO,
            Duration::from_secs(1),
            Duration::ZERO,
            Duration::from_secs(2),
            Duration::ZERO,
        ]
    );
}
