//! The module contains `Wallet` struct and its storage entity.

use chrono::{DateTime, Utc};

use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, util::parse_uuid};

/// A wallet.
///
/// A wallet holds a single non-negative balance. The balance only changes
/// through top-ups and charges, each of which appends a
/// [`Transaction`](crate::Transaction) to the wallet's ledger.
#[derive(Clone, Debug, PartialEq)]
pub struct Wallet {
    /// Stable identifier for this wallet, generated once at creation.
    pub id: Uuid,
    pub balance: MoneyCents,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every balance mutation.
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    /// Creates an empty wallet stamped with `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            balance: MoneyCents::ZERO,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub balance: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Wallet> for ActiveModel {
    fn from(value: &Wallet) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            balance: ActiveValue::Set(value.balance.cents()),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for Wallet {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "wallet")?,
            balance: MoneyCents::new(model.balance),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
