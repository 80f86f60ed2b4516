use uuid::Uuid;

use sea_orm::{QueryFilter, TransactionTrait, prelude::*};

use crate::{EngineError, MoneyCents, ResultEngine, Transaction, transactions};

use super::{Engine, with_tx};

/// Result of reconciling a wallet balance against its ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BalanceAudit {
    pub wallet_id: Uuid,
    /// Balance stored on the wallet row.
    pub balance: MoneyCents,
    /// Sum of all top-ups minus all charges.
    pub ledger_balance: MoneyCents,
    pub transactions: usize,
}

impl BalanceAudit {
    pub fn is_consistent(&self) -> bool {
        self.balance == self.ledger_balance
    }

    /// Amount the stored balance is off by (`balance - ledger_balance`).
    pub fn drift(&self) -> MoneyCents {
        self.balance - self.ledger_balance
    }
}

impl Engine {
    /// Recomputes a wallet balance from its ledger and compares it with the
    /// stored one.
    ///
    /// Both are read in the same DB transaction, so a consistent store
    /// always reports `is_consistent() == true`.
    pub async fn audit_wallet(&self, wallet_id: Uuid) -> ResultEngine<BalanceAudit> {
        with_tx!(self, |db_tx| {
            let wallet = self.require_wallet(&db_tx, wallet_id).await?;

            let models = transactions::Entity::find()
                .filter(transactions::Column::WalletId.eq(wallet_id.to_string()))
                .all(&db_tx)
                .await?;
            let count = models.len();

            let mut ledger_balance = MoneyCents::ZERO;
            for model in models {
                let tx = Transaction::try_from(model)?;
                ledger_balance = ledger_balance
                    .checked_add(tx.signed_amount())
                    .ok_or_else(|| EngineError::InvalidAmount("ledger sum overflow".to_string()))?;
            }

            Ok(BalanceAudit {
                wallet_id,
                balance: wallet.balance,
                ledger_balance,
                transactions: count,
            })
        })
    }
}
