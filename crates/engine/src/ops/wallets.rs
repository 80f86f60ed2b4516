use chrono::Utc;
use uuid::Uuid;

use sea_orm::{QueryFilter, TransactionTrait, prelude::*};

use crate::{ResultEngine, Wallet, transactions, wallets};

use super::{Engine, with_tx};

impl Engine {
    /// Creates a new wallet with a zero balance.
    pub async fn create_wallet(&self) -> ResultEngine<Wallet> {
        let wallet = Wallet::new(Utc::now());
        wallets::ActiveModel::from(&wallet)
            .insert(&self.database)
            .await?;
        Ok(wallet)
    }

    /// Return a wallet snapshot from DB.
    pub async fn wallet(&self, wallet_id: Uuid) -> ResultEngine<Wallet> {
        self.require_wallet(&self.database, wallet_id).await
    }

    /// Deletes a wallet together with its whole ledger.
    ///
    /// Ledger operations never delete wallets; this is meant for operators
    /// and test fixtures.
    pub async fn delete_wallet(&self, wallet_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_wallet(&db_tx, wallet_id).await?;

            transactions::Entity::delete_many()
                .filter(transactions::Column::WalletId.eq(wallet_id.to_string()))
                .exec(&db_tx)
                .await?;
            wallets::Entity::delete_by_id(wallet_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
