//! Integration tests for the HTTP API.
//!
//! These tests drive the full router against an in-memory SQLite repository
//! and assert on the response envelope, including the empty-list quirk
//! (HTTP 200 with `meta.http_status = 204`).
//!
//! This test requires the `sqlite` feature flag.

#![cfg(feature = "sqlite")]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use rates_hex::{RatesService, inbound::HttpServer};
use rates_repo::SqliteRepo;
use tower::ServiceExt;

async fn create_test_app() -> Router {
    let repo = SqliteRepo::new("sqlite::memory:", 1).await.unwrap();
    let service = RatesService::new(repo);
    HttpServer::new(service).router()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Creates a currency through the API and returns its id.
async fn create_currency(app: &Router, name: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/v1/currencies",
            &format!(r#"{{"name": "{name}"}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    json["data"]["id"].as_i64().unwrap()
}

/// Creates a conversion through the API and returns the response status
/// and body.
async fn create_conversion(
    app: &Router,
    from: i64,
    to: i64,
    rate: f64,
) -> (StatusCode, serde_json::Value) {
    let body = format!(
        r#"{{"currency_id_from": {from}, "currency_id_to": {to}, "rate": {rate}}}"#
    );
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/v1/conversions", &body))
        .await
        .unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn healthz_answers_ok() {
    let app = create_test_app().await;

    let response = app.oneshot(get_request("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn unmatched_route_gets_json_404() {
    let app = create_test_app().await;

    let response = app.oneshot(get_request("/v2/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["message"], "path not found");
    assert_eq!(json["meta"]["http_status"], 404);
}

#[tokio::test]
async fn create_currency_returns_201_envelope() {
    let app = create_test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/v1/currencies",
            r#"{"name": "USD"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "USD");
    assert!(json["data"]["id"].as_i64().unwrap() > 0);
    assert_eq!(json["meta"]["http_status"], 201);
}

#[tokio::test]
async fn empty_list_is_200_with_204_marker() {
    let app = create_test_app().await;

    let response = app.oneshot(get_request("/v1/currencies")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["meta"]["http_status"], 204);
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
    // Pagination fields are omitted on the empty page.
    assert!(json["meta"].get("total").is_none());
}

#[tokio::test]
async fn list_currencies_carries_pagination_meta() {
    let app = create_test_app().await;
    for name in ["USD", "IDR", "EUR"] {
        create_currency(&app, name).await;
    }

    let response = app
        .oneshot(get_request("/v1/currencies?limit=2&offset=0"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
    assert_eq!(json["meta"]["total"], 3);
    assert_eq!(json["meta"]["limit"], 2);
    assert_eq!(json["meta"]["offset"], 0);
    assert_eq!(json["meta"]["http_status"], 200);
}

#[tokio::test]
async fn malformed_limit_falls_back_to_default() {
    let app = create_test_app().await;
    create_currency(&app, "USD").await;

    let response = app
        .oneshot(get_request("/v1/currencies?limit=abc"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["meta"]["limit"], 10);
}

#[tokio::test]
async fn malformed_path_id_is_invalid_parameter() {
    let app = create_test_app().await;

    let response = app.oneshot(get_request("/v1/currencies/abc")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["errors"][0]["code"], 10111);
    assert_eq!(json["meta"]["http_status"], 422);
}

#[tokio::test]
async fn missing_currency_is_404_catalog_entry() {
    let app = create_test_app().await;

    let response = app.oneshot(get_request("/v1/currencies/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["errors"][0]["code"], 10213);
}

#[tokio::test]
async fn malformed_json_body_is_invalid_parameter() {
    let app = create_test_app().await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/v1/currencies",
            r#"{"name": 12"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = body_json(response).await;
    assert_eq!(json["errors"][0]["code"], 10111);
}

#[tokio::test]
async fn update_currency_returns_fresh_record() {
    let app = create_test_app().await;
    let id = create_currency(&app, "USDD").await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::PATCH,
            &format!("/v1/currencies/{id}"),
            r#"{"name": "USD"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "USD");
    assert_eq!(json["data"]["id"], id);
}

#[tokio::test]
async fn update_missing_currency_is_404() {
    let app = create_test_app().await;

    let response = app
        .oneshot(json_request(
            Method::PATCH,
            "/v1/currencies/999",
            r#"{"name": "USD"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn conversion_create_and_duplicate_detection() {
    let app = create_test_app().await;
    let usd = create_currency(&app, "USD").await;
    let idr = create_currency(&app, "IDR").await;

    let (status, json) = create_conversion(&app, usd, idr, 15000.0).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["rate"], 15000.0);

    // Same pair again, requested in the reverse direction.
    let (status, json) = create_conversion(&app, idr, usd, 1.0 / 15000.0).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["errors"][0]["code"], 10202);
    assert_eq!(json["errors"][0]["message"], "Record conflict");
}

#[tokio::test]
async fn conversion_create_with_unknown_currency_is_bad_request() {
    let app = create_test_app().await;
    let usd = create_currency(&app, "USD").await;

    let (status, json) = create_conversion(&app, usd, 999, 2.0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["errors"][0]["code"], 10005);
}

#[tokio::test]
async fn list_conversions_pair_filter_matches_either_direction() {
    let app = create_test_app().await;
    let usd = create_currency(&app, "USD").await;
    let idr = create_currency(&app, "IDR").await;
    let eur = create_currency(&app, "EUR").await;

    create_conversion(&app, usd, idr, 15000.0).await;
    create_conversion(&app, eur, usd, 1.1).await;

    let uri = format!("/v1/conversions?currency_id_from={idr}&currency_id_to={usd}");
    let response = app.oneshot(get_request(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["meta"]["total"], 1);
    assert_eq!(json["data"][0]["currency_id_from"], usd);
    assert_eq!(json["data"][0]["currency_id_to"], idr);
}

#[tokio::test]
async fn convert_currencies_round_trip() {
    let app = create_test_app().await;
    let usd = create_currency(&app, "USD").await;
    let idr = create_currency(&app, "IDR").await;
    create_conversion(&app, usd, idr, 15000.0).await;

    let body = format!(
        r#"{{"currency_id_from": {usd}, "currency_id_to": {idr}, "amount": 2}}"#
    );
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/v1/convert-currencies", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["result"], 30000.0);

    // Reverse direction divides by the stored rate.
    let body = format!(
        r#"{{"currency_id_from": {idr}, "currency_id_to": {usd}, "amount": 30000}}"#
    );
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/v1/convert-currencies", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["result"], 2.0);
}

#[tokio::test]
async fn convert_unknown_pair_is_404() {
    let app = create_test_app().await;
    let usd = create_currency(&app, "USD").await;
    let idr = create_currency(&app, "IDR").await;

    let body = format!(
        r#"{{"currency_id_from": {usd}, "currency_id_to": {idr}, "amount": 2}}"#
    );
    let response = app
        .oneshot(json_request(Method::POST, "/v1/convert-currencies", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["errors"][0]["code"], 10213);
}
