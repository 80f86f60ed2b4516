//! Wallet API endpoints.

use api_types::{
    transaction::{Transaction, TransactionType},
    wallet::Wallet,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::MoneyCents;
use serde_json::Value;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, validation};

fn map_wallet(wallet: engine::Wallet) -> Wallet {
    Wallet {
        id: wallet.id,
        balance: wallet.balance.to_major(),
        created_at: wallet.created_at,
        updated_at: wallet.updated_at,
    }
}

fn map_kind(kind: engine::TransactionKind) -> TransactionType {
    match kind {
        engine::TransactionKind::TopUp => TransactionType::TopUp,
        engine::TransactionKind::Charge => TransactionType::Charge,
    }
}

fn map_transaction(tx: engine::Transaction) -> Transaction {
    Transaction {
        id: tx.id,
        amount: tx.amount.to_major(),
        kind: map_kind(tx.kind),
        wallet_id: tx.wallet_id,
        created_at: tx.created_at,
    }
}

/// Parses the `{id}` path segment, then the `{ "amount": n }` body.
///
/// A malformed id is reported on its own, before the body is looked at.
fn amount_request(
    raw_id: &str,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(Uuid, MoneyCents), ServerError> {
    let wallet_id = validation::wallet_id(raw_id)?;
    let Json(body) = payload.map_err(|rejection| ServerError::Generic(rejection.body_text()))?;
    let input = validation::amount_body(&body)?;

    Ok((wallet_id, input.amount))
}

pub async fn create(State(state): State<ServerState>) -> Result<(StatusCode, Json<Wallet>), ServerError> {
    let wallet = state.engine.create_wallet().await?;
    tracing::debug!(wallet_id = %wallet.id, "wallet created");

    Ok((StatusCode::CREATED, Json(map_wallet(wallet))))
}

pub async fn top_up(
    State(state): State<ServerState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Wallet>), ServerError> {
    let (wallet_id, amount) = amount_request(&raw_id, payload)?;
    let wallet = state.engine.top_up_cents(wallet_id, amount).await?;
    tracing::debug!(%wallet_id, %amount, balance = %wallet.balance, "wallet topped up");

    Ok((StatusCode::CREATED, Json(map_wallet(wallet))))
}

pub async fn charge(
    State(state): State<ServerState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Wallet>), ServerError> {
    let (wallet_id, amount) = amount_request(&raw_id, payload)?;
    let wallet = state.engine.charge_cents(wallet_id, amount).await?;
    tracing::debug!(%wallet_id, %amount, balance = %wallet.balance, "wallet charged");

    Ok((StatusCode::CREATED, Json(map_wallet(wallet))))
}

pub async fn transactions(
    State(state): State<ServerState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Vec<Transaction>>, ServerError> {
    let wallet_id = validation::wallet_id(&raw_id)?;
    let transactions = state
        .engine
        .transactions(wallet_id)
        .await?
        .into_iter()
        .map(map_transaction)
        .collect();

    Ok(Json(transactions))
}
