use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod wallet {
    use super::*;

    /// Wallet as returned by every wallet endpoint.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Wallet {
        pub id: Uuid,
        /// Balance in major units, always with at most 2 decimals.
        pub balance: f64,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum TransactionType {
        TopUp,
        Charge,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Transaction {
        pub id: Uuid,
        /// Positive amount in major units; the direction is given by `type`.
        pub amount: f64,
        #[serde(rename = "type")]
        pub kind: TransactionType,
        pub wallet_id: Uuid,
        pub created_at: DateTime<Utc>,
    }
}

pub mod error {
    use super::*;

    /// Validation failures for a single request field.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FieldError {
        pub field: String,
        pub errors: Vec<String>,
    }

    impl FieldError {
        pub fn new(field: impl Into<String>, errors: Vec<String>) -> Self {
            Self {
                field: field.into(),
                errors,
            }
        }
    }

    /// `message` is a single string for domain errors and a list of
    /// per-field messages for validation errors.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum ErrorMessage {
        Text(String),
        List(Vec<String>),
    }

    /// Body returned by every failed request.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ErrorBody {
        pub status_code: u16,
        pub message: ErrorMessage,
        /// Reason phrase of the status code, e.g. `"Not Found"`.
        pub error: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub fields: Vec<FieldError>,
    }
}
