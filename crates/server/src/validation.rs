//! Boundary validation for wallet requests.
//!
//! Every check returns the full list of field errors instead of stopping at
//! the first one, so clients can fix a request in one round trip.

use api_types::error::FieldError;
use engine::MoneyCents;
use serde_json::Value;
use uuid::Uuid;

pub(crate) const AMOUNT_POSITIVE: &str = "amount must be a positive number";
pub(crate) const AMOUNT_NUMBER: &str =
    "amount must be a number conforming to the specified constraints";
pub(crate) const AMOUNT_MIN: &str = "amount must not be less than 0.01";
pub(crate) const ID_UUID: &str = "id must be a UUID";

const HYPHENATED_UUID_LEN: usize = 36;

/// Body of a top-up or charge, rounded to cents and known to be positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct AmountInput {
    pub amount: MoneyCents,
}

/// Validates a wallet id path segment (hyphenated UUID only).
pub(crate) fn wallet_id(raw: &str) -> Result<Uuid, Vec<FieldError>> {
    Uuid::parse_str(raw)
        .ok()
        .filter(|_| raw.len() == HYPHENATED_UUID_LEN)
        .ok_or_else(|| vec![FieldError::new("id", vec![ID_UUID.to_string()])])
}

/// Validates a `{ "amount": number }` body.
///
/// Unknown properties are rejected, `amount` must be a number greater than
/// zero that is still positive once rounded to cents. Numeric strings such
/// as `"12.50"` are coerced to numbers.
pub(crate) fn amount_body(body: &Value) -> Result<AmountInput, Vec<FieldError>> {
    let Some(object) = body.as_object() else {
        return Err(vec![FieldError::new(
            "body",
            vec!["body must be a JSON object".to_string()],
        )]);
    };

    let mut errors: Vec<FieldError> = object
        .keys()
        .filter(|key| key.as_str() != "amount")
        .map(|key| FieldError::new(key.clone(), vec![format!("property {key} should not exist")]))
        .collect();

    let amount = object.get("amount").and_then(coerce_number);

    let rounded = match amount {
        None => {
            errors.push(field("amount", &[AMOUNT_POSITIVE, AMOUNT_NUMBER]));
            None
        }
        Some(amount) if amount <= 0.0 => {
            errors.push(field("amount", &[AMOUNT_POSITIVE]));
            None
        }
        Some(amount) => match MoneyCents::from_major(amount) {
            Ok(cents) if cents.is_positive() => Some(cents),
            Ok(_) => {
                errors.push(field("amount", &[AMOUNT_MIN]));
                None
            }
            Err(_) => {
                errors.push(field("amount", &[AMOUNT_NUMBER]));
                None
            }
        },
    };

    match rounded {
        Some(amount) if errors.is_empty() => Ok(AmountInput { amount }),
        _ => Err(errors),
    }
}

/// Reads a JSON number, or a string holding one.
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite()),
        _ => None,
    }
}

fn field(name: &str, messages: &[&str]) -> FieldError {
    FieldError::new(name, messages.iter().map(ToString::to_string).collect())
}
