//! Wallet ledger engine.
//!
//! The engine owns the balance-mutation protocol: every top-up or charge
//! updates the wallet balance and appends a [`Transaction`] inside a single
//! database transaction, so the balance and its ledger never diverge.

pub use error::EngineError;
pub use money::MoneyCents;
pub use ops::{BalanceAudit, Engine, EngineBuilder};
pub use transactions::{Transaction, TransactionKind};
pub use wallets::Wallet;

mod error;
mod money;
mod ops;
pub mod transactions;
mod util;
pub mod wallets;

type ResultEngine<T> = Result<T, EngineError>;
