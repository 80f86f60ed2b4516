use api_types::error::{ErrorBody, ErrorMessage, FieldError};
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use server::{ServerState, router, run_with_listener, spawn_with_listener};

mod server;
mod validation;
mod wallets;

pub const WALLET_NOT_FOUND: &str = "User not found";
pub const INSUFFICIENT_BALANCE: &str = "Insufficient balance";

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Validation(Vec<FieldError>),
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::InsufficientFunds(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidId(_) => StatusCode::BAD_REQUEST,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::KeyNotFound(_) => WALLET_NOT_FOUND.to_string(),
        EngineError::InsufficientFunds(_) => INSUFFICIENT_BALANCE.to_string(),
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "Internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, message, fields) = match self {
            ServerError::Engine(err) => {
                let status = status_for_engine_error(&err);
                let message = ErrorMessage::Text(message_for_engine_error(err));
                (status, message, Vec::new())
            }
            ServerError::Validation(fields) => {
                let messages = fields
                    .iter()
                    .flat_map(|field| field.errors.iter().cloned())
                    .collect();
                (StatusCode::BAD_REQUEST, ErrorMessage::List(messages), fields)
            }
            ServerError::Generic(err) => {
                (StatusCode::BAD_REQUEST, ErrorMessage::Text(err), Vec::new())
            }
        };

        let body = ErrorBody {
            status_code: status.as_u16(),
            message,
            error: status.canonical_reason().unwrap_or_default().to_string(),
            fields,
        };
        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<Vec<FieldError>> for ServerError {
    fn from(value: Vec<FieldError>) -> Self {
        Self::Validation(value)
    }
}
