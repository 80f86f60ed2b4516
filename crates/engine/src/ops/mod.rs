use sea_orm::{ConnectionTrait, DatabaseConnection, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Wallet};

mod audit;
mod ledger;
mod transactions;
mod wallets;

pub use audit::BalanceAudit;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The ledger engine.
///
/// Holds no in-memory state besides the connection pool: the database is the
/// single source of truth and its transactions are the only concurrency
/// control.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Load a wallet or fail with `KeyNotFound`.
    async fn require_wallet<C>(&self, db: &C, wallet_id: Uuid) -> ResultEngine<Wallet>
    where
        C: ConnectionTrait,
    {
        let model = crate::wallets::Entity::find_by_id(wallet_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("wallet not exists".to_string()))?;
        Wallet::try_from(model)
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
