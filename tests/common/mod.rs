//! Test utilities and helper functions for the nico_list test suite

use mockito::{Matcher, Mock, ServerGuard};
use nico_list::{FetchConfig, FetchConfigBuilder, ListingFetcher, RequestRetrier, build_http_client};
use serde_json::json;
use std::time::Duration;

/// A timestamp inside the default date window
#[allow(dead_code)]
pub const JAN_2024: &str = "2024-01-15T12:00:00+09:00";

/// Builds a listing page body from `(id, registeredAt, comments)` triples
#[allow(dead_code)]
pub fn listing_body(items: &[(&str, &str, i64)]) -> String {
    let items: Vec<serde_json::Value> = items
        .iter()
        .map(|(id, registered_at, comments)| {
            json!({
                "series": null,
                "essential": {
                    "type": "essential",
                    "id": id,
                    "title": format!("video {id}"),
                    "registeredAt": registered_at,
                    "count": { "view": 100, "comment": comments, "mylist": 0, "like": 0 },
                    "isPaymentRequired": false
                }
            })
        })
        .collect();
    json!({
        "meta": { "status": 200 },
        "data": { "totalCount": items.len(), "items": items }
    })
    .to_string()
}

/// Builds (without creating) a mock for one listing page of a user
#[allow(dead_code)]
pub fn page_mock(server: &mut ServerGuard, user_id: &str, page: u32, status: usize, body: &str) -> Mock {
    server
        .mock("GET", format!("/users/{user_id}/videos").as_str())
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("pageSize".into(), "100".into()),
            Matcher::UrlEncoded("page".into(), page.to_string()),
        ]))
        .match_header("x-frontend-id", "6")
        .match_header("accept", "*/*")
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
}

/// Mocks one listing page for a user, expected to be hit once
#[allow(dead_code)]
pub async fn mock_page(
    server: &mut ServerGuard,
    user_id: &str,
    page: u32,
    status: usize,
    body: &str,
) -> Mock {
    page_mock(server, user_id, page, status, body)
        .create_async()
        .await
}

/// Builds (without creating) a mock answering every page of a user with `status`
#[allow(dead_code)]
pub fn user_mock(server: &mut ServerGuard, user_id: &str, status: usize) -> Mock {
    server
        .mock("GET", format!("/users/{user_id}/videos").as_str())
        .match_query(Matcher::Any)
        .with_status(status)
}

/// Config pointed at the mock server, with fast failure settings
#[allow(dead_code)]
pub fn test_config(base_url: &str) -> FetchConfigBuilder {
    FetchConfig::builder()
        .base_url(base_url)
        .retries(2)
        .request_timeout(Duration::from_secs(5))
}

/// Listing fetcher without request spacing
#[allow(dead_code)]
pub fn test_fetcher(config: &FetchConfig) -> ListingFetcher {
    let retrier = RequestRetrier::new(
        build_http_client().unwrap(),
        None,
        config.request_timeout(),
        config.retries(),
    );
    ListingFetcher::new(retrier, config)
}
