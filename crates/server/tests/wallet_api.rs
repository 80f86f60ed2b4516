use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tower::ServiceExt;
use uuid::Uuid;

use engine::Engine;
use server::{INSUFFICIENT_BALANCE, ServerState, WALLET_NOT_FOUND};

async fn engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

async fn app() -> Router {
    server::router(ServerState {
        engine: Arc::new(engine().await),
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_wallet(app: &Router) -> String {
    let (status, body) = send(app, "POST", "/wallet", None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

fn messages(body: &Value) -> Vec<String> {
    body["message"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m.as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn create_returns_empty_wallet() {
    let app = app().await;

    let (status, body) = send(&app, "POST", "/wallet", None).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(Uuid::parse_str(body["id"].as_str().unwrap()).is_ok());
    assert_eq!(body["balance"], json!(0.0));
    assert!(body["createdAt"].is_string());
    assert!(body["updatedAt"].is_string());
}

#[tokio::test]
async fn create_accepts_trailing_slash() {
    let app = app().await;

    let (status, _) = send(&app, "POST", "/wallet/", None).await;

    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn top_up_and_charge_update_balance() {
    let app = app().await;
    let id = create_wallet(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/wallet/topup/{id}"),
        Some(json!({ "amount": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["balance"], json!(100.0));
    assert_eq!(body["id"], json!(id));

    let (status, body) = send(
        &app,
        "POST",
        &format!("/wallet/charge/{id}"),
        Some(json!({ "amount": 40.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["balance"], json!(59.5));
}

#[tokio::test]
async fn top_up_rounds_to_cents() {
    let app = app().await;
    let id = create_wallet(&app).await;
    let uri = format!("/wallet/topup/{id}");

    send(&app, "POST", &uri, Some(json!({ "amount": 100 }))).await;
    let (status, body) = send(&app, "POST", &uri, Some(json!({ "amount": 10.999 }))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["balance"], json!(111.0));
}

#[tokio::test]
async fn unknown_wallet_is_404() {
    let app = app().await;
    let id = Uuid::new_v4();

    for uri in [
        format!("/wallet/topup/{id}"),
        format!("/wallet/charge/{id}"),
    ] {
        let (status, body) = send(&app, "POST", &uri, Some(json!({ "amount": 10 }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["statusCode"], json!(404));
        assert_eq!(body["message"], json!(WALLET_NOT_FOUND));
        assert_eq!(body["error"], json!("Not Found"));
    }

    let (status, body) = send(&app, "GET", &format!("/wallet/transactions/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!(WALLET_NOT_FOUND));
}

#[tokio::test]
async fn overdraft_is_400_and_balance_is_kept() {
    let app = app().await;
    let id = create_wallet(&app).await;
    send(
        &app,
        "POST",
        &format!("/wallet/topup/{id}"),
        Some(json!({ "amount": 100 })),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/wallet/charge/{id}"),
        Some(json!({ "amount": 1000 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["statusCode"], json!(400));
    assert_eq!(body["message"], json!(INSUFFICIENT_BALANCE));
    assert_eq!(body["error"], json!("Bad Request"));

    let (_, history) = send(&app, "GET", &format!("/wallet/transactions/{id}"), None).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_amounts_are_rejected() {
    let app = app().await;
    let id = create_wallet(&app).await;
    let uri = format!("/wallet/topup/{id}");

    let cases = [
        (json!({ "amount": -50 }), vec!["amount must be a positive number"]),
        (json!({ "amount": 0 }), vec!["amount must be a positive number"]),
        (
            json!({ "amount": "invalid" }),
            vec![
                "amount must be a positive number",
                "amount must be a number conforming to the specified constraints",
            ],
        ),
        (
            json!({}),
            vec![
                "amount must be a positive number",
                "amount must be a number conforming to the specified constraints",
            ],
        ),
        (
            json!({ "invalidField": 100 }),
            vec![
                "property invalidField should not exist",
                "amount must be a positive number",
                "amount must be a number conforming to the specified constraints",
            ],
        ),
        (
            json!({ "amount": 0.001 }),
            vec!["amount must not be less than 0.01"],
        ),
    ];

    for (payload, expected) in cases {
        let (status, body) = send(&app, "POST", &uri, Some(payload.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
        assert_eq!(body["statusCode"], json!(400));
        assert_eq!(messages(&body), expected, "{payload}");
    }

    let (_, history) = send(&app, "GET", &format!("/wallet/transactions/{id}"), None).await;
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn charge_validates_like_top_up() {
    let app = app().await;
    let id = create_wallet(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/wallet/charge/{id}"),
        Some(json!({ "amount": -1 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(messages(&body), vec!["amount must be a positive number"]);
}

#[tokio::test]
async fn malformed_id_is_400() {
    let app = app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/wallet/topup/invalid-uuid",
        Some(json!({ "amount": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(messages(&body), vec!["id must be a UUID"]);

    let (status, body) = send(&app, "GET", "/wallet/transactions/invalid-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(messages(&body), vec!["id must be a UUID"]);
}

#[tokio::test]
async fn malformed_id_is_reported_before_the_body() {
    let app = app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/wallet/charge/not-a-uuid",
        Some(json!({ "amount": -3, "note": "x" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(messages(&body), vec!["id must be a UUID"]);
    assert_eq!(body["fields"][0]["field"], json!("id"));
    assert_eq!(body["fields"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn numeric_string_amounts_are_coerced() {
    let app = app().await;
    let id = create_wallet(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/wallet/topup/{id}"),
        Some(json!({ "amount": "12" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["balance"], json!(12.0));

    let (status, body) = send(
        &app,
        "POST",
        &format!("/wallet/charge/{id}"),
        Some(json!({ "amount": "2.50" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["balance"], json!(9.5));

    let (_, history) = send(&app, "GET", &format!("/wallet/transactions/{id}"), None).await;
    assert_eq!(history[1]["amount"], json!(12.0));
}

#[tokio::test]
async fn malformed_json_is_400() {
    let app = app().await;
    let id = create_wallet(&app).await;

    let request = Request::builder()
        .method("POST")
        .uri(format!("/wallet/topup/{id}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"amount\": "))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["statusCode"], json!(400));
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn transactions_are_listed_newest_first() {
    let app = app().await;
    let id = create_wallet(&app).await;

    send(
        &app,
        "POST",
        &format!("/wallet/topup/{id}"),
        Some(json!({ "amount": 100 })),
    )
    .await;
    send(
        &app,
        "POST",
        &format!("/wallet/charge/{id}"),
        Some(json!({ "amount": 50 })),
    )
    .await;

    let (status, body) = send(&app, "GET", &format!("/wallet/transactions/{id}"), None).await;

    assert_eq!(status, StatusCode::OK);
    let history = body.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["type"], json!("CHARGE"));
    assert_eq!(history[0]["amount"], json!(50.0));
    assert_eq!(history[0]["walletId"], json!(id));
    assert_eq!(history[1]["type"], json!("TOP_UP"));
    assert_eq!(history[1]["amount"], json!(100.0));
}

#[tokio::test]
async fn fresh_wallet_has_empty_history() {
    let app = app().await;
    let id = create_wallet(&app).await;

    let (status, body) = send(&app, "GET", &format!("/wallet/transactions/{id}"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn cors_mirrors_request_origin() {
    let app = app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/wallet")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    let headers = response.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[tokio::test]
async fn serves_over_tcp() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = server::spawn_with_listener(engine().await, listener).unwrap();

    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "POST /wallet HTTP/1.1\r\nHost: {addr}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 201"), "{response}");
    assert!(response.contains("\"balance\":0.0"), "{response}");
}
