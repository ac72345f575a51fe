mod common;

use std::time::Duration;
use status_probe::http::{Fetcher, HttpFetcher};
use status_probe::utils::config::FetchConfig;
use status_probe::utils::error::FetchError;

#[test]
fn test_get_returns_status_and_unread_body() {
    let host = common::serve_once(common::ok_response("ready"));
    let fetcher = HttpFetcher::new().unwrap();

    let response = fetcher.get(&format!("{}/status", host)).unwrap();

    assert_eq!(response.status(), 200);
    assert!(response.is_success());
    assert!(response.url().ends_with("/status"));
    assert_eq!(response.text().unwrap(), "ready");
}

#[test]
fn test_non_success_status_is_returned() {
    let host = common::serve_once(
        "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
    );
    let fetcher = HttpFetcher::new().unwrap();

    let response = fetcher.get(&format!("{}/status", host)).unwrap();

    assert_eq!(response.status(), 503);
    assert!(!response.is_success());
}

#[test]
fn test_refused_connection_is_connect_error() {
    let host = common::closed_port();
    let fetcher = HttpFetcher::new().unwrap();

    match fetcher.get(&format!("{}/status", host)) {
        Err(FetchError::Connect(_)) => {}
        other => panic!("Expected Connect error, got {:?}", other),
    }
}

#[test]
fn test_slow_server_is_timeout_error() {
    let host = common::silent_server(Duration::from_secs(3));
    let fetcher = HttpFetcher::with_timeout(Duration::from_millis(300)).unwrap();

    match fetcher.get(&format!("{}/status", host)) {
        Err(error) => {
            assert!(error.is_timeout(), "expected timeout, got {:?}", error);
            assert!(error.is_connection_failure());
        }
        Ok(response) => panic!("Expected timeout, got {:?}", response),
    }
}

#[test]
fn test_fetcher_from_config() {
    let fetcher = HttpFetcher::with_config(&FetchConfig { timeout_secs: 2 }).unwrap();
    assert_eq!(fetcher.timeout(), Duration::from_secs(2));
}
