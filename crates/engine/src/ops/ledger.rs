use chrono::Utc;
use uuid::Uuid;

use sea_orm::{QueryFilter, TransactionTrait, prelude::*, sea_query::Expr};

use crate::{
    EngineError, MoneyCents, ResultEngine, Transaction, TransactionKind, Wallet, transactions,
    util::require_positive, wallets,
};

use super::{Engine, with_tx};

impl Engine {
    /// Adds funds to a wallet.
    ///
    /// `amount` is rounded to cents (ties away from zero) before anything is
    /// written, e.g. `10.999` becomes `11.00`. The balance update and the
    /// `TOP_UP` ledger row are committed together.
    pub async fn top_up(&self, wallet_id: Uuid, amount: f64) -> ResultEngine<Wallet> {
        self.top_up_cents(wallet_id, MoneyCents::from_major(amount)?)
            .await
    }

    /// Adds an already rounded amount to a wallet.
    pub async fn top_up_cents(&self, wallet_id: Uuid, amount: MoneyCents) -> ResultEngine<Wallet> {
        self.apply(wallet_id, TransactionKind::TopUp, amount).await
    }

    /// Deducts funds from a wallet.
    ///
    /// Fails with `InsufficientFunds` when the rounded amount exceeds the
    /// balance; in that case neither the balance nor the ledger change.
    pub async fn charge(&self, wallet_id: Uuid, amount: f64) -> ResultEngine<Wallet> {
        self.charge_cents(wallet_id, MoneyCents::from_major(amount)?)
            .await
    }

    /// Deducts an already rounded amount from a wallet.
    pub async fn charge_cents(&self, wallet_id: Uuid, amount: MoneyCents) -> ResultEngine<Wallet> {
        self.apply(wallet_id, TransactionKind::Charge, amount).await
    }

    async fn apply(
        &self,
        wallet_id: Uuid,
        kind: TransactionKind,
        amount: MoneyCents,
    ) -> ResultEngine<Wallet> {
        let amount = require_positive(amount)?;
        let now = Utc::now();
        let wallet_key = wallet_id.to_string();

        with_tx!(self, |db_tx| {
            let wallet = self.require_wallet(&db_tx, wallet_id).await?;

            let update = wallets::Entity::update_many()
                .col_expr(wallets::Column::UpdatedAt, Expr::value(now))
                .filter(wallets::Column::Id.eq(wallet_key.clone()));

            let update = match kind {
                TransactionKind::TopUp => {
                    if wallet.balance.checked_add(amount).is_none() {
                        return Err(EngineError::InvalidAmount(
                            "balance would overflow".to_string(),
                        ));
                    }
                    update.col_expr(
                        wallets::Column::Balance,
                        Expr::col(wallets::Column::Balance).add(amount.cents()),
                    )
                }
                TransactionKind::Charge => {
                    if wallet.balance < amount {
                        return Err(insufficient(&wallet, amount));
                    }
                    // Guarded write: a concurrent charge that drained the
                    // wallet after our read makes this match zero rows.
                    update
                        .col_expr(
                            wallets::Column::Balance,
                            Expr::col(wallets::Column::Balance).sub(amount.cents()),
                        )
                        .filter(wallets::Column::Balance.gte(amount.cents()))
                }
            };

            let updated = update.exec(&db_tx).await?;
            if updated.rows_affected == 0 {
                return Err(match kind {
                    TransactionKind::TopUp => {
                        EngineError::KeyNotFound("wallet not exists".to_string())
                    }
                    TransactionKind::Charge => insufficient(&wallet, amount),
                });
            }

            let tx = Transaction::new(wallet_id, kind, amount, now)?;
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;

            self.require_wallet(&db_tx, wallet_id).await
        })
    }
}

fn insufficient(wallet: &Wallet, amount: MoneyCents) -> EngineError {
    EngineError::InsufficientFunds(format!(
        "wallet {} has {}, requested {}",
        wallet.id, wallet.balance, amount
    ))
}
