//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API.

use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}

/// Require a rounded amount to be at least one cent.
pub(crate) fn require_positive(amount: MoneyCents) -> ResultEngine<MoneyCents> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidAmount(
            "amount must be at least 0.01".to_string(),
        ));
    }
    Ok(amount)
}
