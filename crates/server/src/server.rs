use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use std::sync::Arc;

use crate::wallets;
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Mirrors the request origin back, so credentialed browser requests work
/// from any front-end.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::PUT,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
        ])
        .allow_credentials(true)
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/wallet", post(wallets::create))
        .route("/wallet/", post(wallets::create))
        .route("/wallet/topup/{id}", post(wallets::top_up))
        .route("/wallet/charge/{id}", post(wallets::charge))
        .route("/wallet/transactions/{id}", get(wallets::transactions))
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
