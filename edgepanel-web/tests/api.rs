use std::{sync::Arc, time::Duration};

use edgepanel_backend::{EdgeDbDataSource, MemoryExecutor, HEALTH_CHECK_QUERY};
use edgepanel_util_health::Health;
use edgepanel_web::{HttpApi, HttpApiState};
use hyper::{Body, Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

fn mock_state() -> (MemoryExecutor, HttpApiState) {
    let executor = MemoryExecutor::new();
    let health = Health::new();
    let datasource = EdgeDbDataSource::new(Arc::new(executor.clone()), health.clone());

    (
        executor,
        HttpApiState::new(Arc::new(datasource), health, Duration::from_millis(10)),
    )
}

async fn send(state: HttpApiState, req: Request<Body>) -> (StatusCode, Value) {
    let res = HttpApi::router(state).oneshot(req).await.unwrap();
    let status = res.status();
    let body = hyper::body::to_bytes(res.into_body()).await.unwrap();

    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_query_endpoint() {
    let (executor, state) = mock_state();
    executor
        .set_data(
            "select Reading { value } filter .region = 'east'",
            vec![json!({"value": 42})],
        )
        .unwrap();

    let (status, body) = send(
        state,
        post(
            "/api/v1/query",
            json!({
                "queries": [{"refId": "A", "queryText": "select Reading { value } filter .region = '$region'"}],
                "variables": [{"name": "region", "value": "east"}]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["responses"]["A"]["frames"][0]["fields"][0],
        json!({"name": "value", "values": {"type": "float64", "values": [42.0]}})
    );
}

#[tokio::test]
async fn test_query_endpoint_reports_errors_per_query() {
    let (_, state) = mock_state();

    let (status, body) = send(
        state,
        post(
            "/api/v1/query",
            json!({"queries": [{"refId": "A", "queryText": "select nothing"}]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["responses"]["A"]["error"],
        json!("Unknown query: select nothing")
    );
}

#[tokio::test]
async fn test_query_endpoint_malformed_query_fails_alone() {
    let (executor, state) = mock_state();
    executor.set_data("select 1", vec![json!({"n": 1})]).unwrap();

    let (status, body) = send(
        state,
        post(
            "/api/v1/query",
            json!({
                "queries": [
                    {"refId": "A", "queryText": "select 1"},
                    {"refId": "B", "queryText": 5}
                ]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["responses"]["A"]["frames"][0]["fields"][0]["name"],
        json!("n")
    );
    assert_eq!(body["responses"]["A"].get("error"), None);
    assert_eq!(
        body["responses"]["B"]["error"],
        json!("Failed to parse query: invalid type: integer `5`, expected a string")
    );
}

#[tokio::test]
async fn test_query_endpoint_accepts_any_variable_shape() {
    let (executor, state) = mock_state();
    executor
        .set_data("select Reading filter .ok = true", vec![])
        .unwrap();

    let (status, body) = send(
        state,
        post(
            "/api/v1/query",
            json!({
                "queries": [{"refId": "A", "queryText": "select Reading filter .ok = $ok"}],
                "variables": [
                    {"name": "unused", "value": null},
                    {"name": "ok", "value": true},
                    {"name": "mixed", "value": ["a", 1]}
                ]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["responses"]["A"].get("error"), None);
    assert_eq!(
        executor.executed().unwrap(),
        vec!["select Reading filter .ok = true".to_string()]
    );
}

#[tokio::test]
async fn test_render_endpoint_reports_malformed_query() {
    let (_, state) = mock_state();

    let (status, body) = send(
        state,
        post(
            "/api/v1/render",
            json!({
                "queries": [
                    {"refId": "A", "queryText": "select 1"},
                    {"refId": "B", "queryText": {"text": "select 2"}}
                ]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["queries"],
        json!([{"refId": "A", "queryText": "select 1"}])
    );
    assert!(body["errors"]["B"]
        .as_str()
        .unwrap()
        .starts_with("Failed to parse query"));
}

#[tokio::test]
async fn test_render_endpoint() {
    let (executor, state) = mock_state();

    let (status, body) = send(
        state,
        post(
            "/api/v1/render",
            json!({
                "queries": [{"refId": "A", "queryText": "select {${host}}"}],
                "variables": [{"name": "host", "value": ["a", "b"], "multi": true}]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"queries": [{"refId": "A", "queryText": "select {'a','b'}"}]})
    );
    assert!(executor.executed().unwrap().is_empty());
}

#[tokio::test]
async fn test_health_endpoints() {
    let (executor, state) = mock_state();
    executor.set_data(HEALTH_CHECK_QUERY, vec![json!(4)]).unwrap();

    let (status, body) = send(state.clone(), get("/api/v1/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("ok"));

    let (status, body) = send(state, get("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["healthy"], json!(true));
    assert_eq!(body["subsystems"]["edgedb"]["healthy"], json!(true));
}

#[tokio::test]
async fn test_health_endpoint_unhealthy() {
    let (executor, state) = mock_state();
    executor
        .set_error(HEALTH_CHECK_QUERY, "connection refused")
        .unwrap();

    let (status, body) = send(state.clone(), get("/api/v1/health")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], json!("error"));

    let (status, _) = send(state, get("/api/health")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_health_unavailable_until_checked() {
    let (executor, state) = mock_state();
    executor.set_data(HEALTH_CHECK_QUERY, vec![json!(4)]).unwrap();

    let (status, body) = send(state.clone(), get("/api/health")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, json!({"healthy": false, "subsystems": {}}));

    let (status, body) = send(state, get("/api/health?refresh=true")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["healthy"], json!(true));
    assert_eq!(
        body["subsystems"]["edgedb"]["message"],
        json!("Data source is working: `select 2+2;` == `4`")
    );
}

#[tokio::test]
async fn test_stream_subscribe_denied() {
    let (_, state) = mock_state();

    let (status, body) = send(state, get("/api/v1/stream/other")).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({"status": "permission_denied"}));
}

#[tokio::test]
async fn test_stream_publish_denied() {
    let (_, state) = mock_state();

    let (status, body) = send(state, post("/api/v1/stream/stream", json!({"a": 1}))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({"status": "permission_denied"}));
}

#[tokio::test]
async fn test_stream_subscribe_sends_events() {
    let (_, state) = mock_state();

    let res = HttpApi::router(state)
        .oneshot(get("/api/v1/stream/stream"))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "text/event-stream");

    let mut body = res.into_body();
    let chunk = loop {
        let chunk = hyper::body::HttpBody::data(&mut body).await.unwrap().unwrap();
        if !chunk.is_empty() {
            break chunk;
        }
    };

    let chunk = String::from_utf8(chunk.to_vec()).unwrap();
    assert!(chunk.starts_with("data: "));
    assert!(chunk.contains(r#""name":"values""#));
}

#[tokio::test]
async fn test_non_existant_endpoint() {
    let (_, state) = mock_state();

    let (status, _) = send(state, get("/non-existant")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_start_and_terminate() {
    let (_, state) = mock_state();

    let api = HttpApi::start("127.0.0.1:0".parse().unwrap(), state)
        .await
        .unwrap();

    assert!(api.healthy());
    assert_ne!(api.local_addr().port(), 0);

    api.terminate().await.unwrap();
}
