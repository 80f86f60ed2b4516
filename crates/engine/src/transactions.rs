//! Transaction primitives.
//!
//! A `Transaction` is the ledger record of a single balance mutation. Rows
//! are append-only: they are inserted in the same DB transaction that
//! updates the wallet balance and never updated afterwards.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionKind {
    TopUp,
    Charge,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopUp => "TOP_UP",
            Self::Charge => "CHARGE",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "TOP_UP" => Ok(Self::TopUp),
            "CHARGE" => Ok(Self::Charge),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub kind: TransactionKind,
    /// Always positive; the direction is given by `kind`.
    pub amount: MoneyCents,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        wallet_id: Uuid,
        kind: TransactionKind,
        amount: MoneyCents,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount must be > 0".to_string(),
            ));
        }
        Ok(Self {
            // v7 ids sort by creation time, which keeps history ordering
            // stable when two rows share a timestamp.
            id: Uuid::now_v7(),
            wallet_id,
            kind,
            amount,
            created_at,
        })
    }

    /// Effect of this transaction on the wallet balance.
    pub fn signed_amount(&self) -> MoneyCents {
        match self.kind {
            TransactionKind::TopUp => self.amount,
            TransactionKind::Charge => MoneyCents::ZERO - self.amount,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub wallet_id: String,
    pub kind: String,
    pub amount_minor: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::WalletId",
        to = "super::wallets::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Wallets,
}

impl Related<super::wallets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            wallet_id: ActiveValue::Set(tx.wallet_id.to_string()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount.cents()),
            created_at: ActiveValue::Set(tx.created_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "transaction")?,
            wallet_id: parse_uuid(&model.wallet_id, "wallet")?,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount: MoneyCents::new(model.amount_minor),
            created_at: model.created_at,
        })
    }
}
