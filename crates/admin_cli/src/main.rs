use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{Engine, EngineError, Wallet};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "tally_admin")]
#[command(about = "Admin utilities for Tally (inspect and repair wallets)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./tally.db?mode=rwc")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Wallet(WalletArgs),
    /// Add funds to a wallet.
    Topup(AmountArgs),
    /// Take funds from a wallet; fails if the balance does not cover it.
    Charge(AmountArgs),
    /// List a wallet's transactions, newest first.
    Transactions(IdArgs),
    /// Compare the stored balance with the sum of the ledger.
    Audit(IdArgs),
}

#[derive(Args, Debug)]
struct WalletArgs {
    #[command(subcommand)]
    command: WalletCommand,
}

#[derive(Subcommand, Debug)]
enum WalletCommand {
    Create,
    Show(IdArgs),
    /// Remove a wallet together with its transactions.
    Delete(IdArgs),
}

#[derive(Args, Debug)]
struct IdArgs {
    id: Uuid,
}

#[derive(Args, Debug)]
struct AmountArgs {
    id: Uuid,
    amount: f64,
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

fn print_wallet(wallet: &Wallet) {
    println!("wallet:  {}", wallet.id);
    println!("balance: {}", wallet.balance);
    println!("created: {}", wallet.created_at.to_rfc3339());
    println!("updated: {}", wallet.updated_at.to_rfc3339());
}

async fn run(engine: &Engine, command: Command) -> Result<(), EngineError> {
    match command {
        Command::Wallet(WalletArgs {
            command: WalletCommand::Create,
        }) => {
            let wallet = engine.create_wallet().await?;
            println!("created wallet: {}", wallet.id);
        }
        Command::Wallet(WalletArgs {
            command: WalletCommand::Show(args),
        }) => print_wallet(&engine.wallet(args.id).await?),
        Command::Wallet(WalletArgs {
            command: WalletCommand::Delete(args),
        }) => {
            engine.delete_wallet(args.id).await?;
            println!("deleted wallet: {}", args.id);
        }
        Command::Topup(args) => {
            let wallet = engine.top_up(args.id, args.amount).await?;
            println!("balance: {}", wallet.balance);
        }
        Command::Charge(args) => {
            let wallet = engine.charge(args.id, args.amount).await?;
            println!("balance: {}", wallet.balance);
        }
        Command::Transactions(args) => {
            for tx in engine.transactions(args.id).await? {
                println!(
                    "{}  {:<7} {:>12}  {}",
                    tx.created_at.to_rfc3339(),
                    tx.kind.as_str(),
                    tx.amount.to_string(),
                    tx.id
                );
            }
        }
        Command::Audit(args) => {
            let audit = engine.audit_wallet(args.id).await?;
            println!("balance:      {}", audit.balance);
            println!("ledger:       {}", audit.ledger_balance);
            println!("transactions: {}", audit.transactions);
            if !audit.is_consistent() {
                eprintln!("balance drift: {}", audit.drift());
                std::process::exit(3);
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match run(&engine, cli.command).await {
        Ok(()) => Ok(()),
        Err(err @ (EngineError::KeyNotFound(_) | EngineError::InvalidId(_))) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
        Err(err @ (EngineError::InsufficientFunds(_) | EngineError::InvalidAmount(_))) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
        Err(err) => Err(err.into()),
    }
}
