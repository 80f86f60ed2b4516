//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`KeyNotFound`] thrown when a wallet does not exist.
//! - [`InsufficientFunds`] thrown when a charge exceeds the wallet balance.
//! - [`InvalidAmount`] thrown when an amount cannot be represented in cents.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`InsufficientFunds`]: EngineError::InsufficientFunds
//!  [`InvalidAmount`]: EngineError::InvalidAmount
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
