use uuid::Uuid;

use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{ResultEngine, Transaction, transactions};

use super::{Engine, with_tx};

impl Engine {
    /// Lists the ledger of a wallet, newest first.
    ///
    /// Ordering is `(created_at DESC, id DESC)`; ids are time-ordered, so the
    /// second key only breaks ties between rows sharing a timestamp.
    pub async fn transactions(&self, wallet_id: Uuid) -> ResultEngine<Vec<Transaction>> {
        with_tx!(self, |db_tx| {
            self.require_wallet(&db_tx, wallet_id).await?;

            transactions::Entity::find()
                .filter(transactions::Column::WalletId.eq(wallet_id.to_string()))
                .order_by_desc(transactions::Column::CreatedAt)
                .order_by_desc(transactions::Column::Id)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Transaction::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }
}
