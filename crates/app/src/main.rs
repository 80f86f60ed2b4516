use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "tally={level},server={level},engine={level},tower_http={level}",
            level = settings.app.level
        ))
        .init();

    let server = settings.server;
    let db = parse_database(&server.database).await.map_err(|err| {
        tracing::error!("failed to initialize database: {err}");
        err
    })?;

    let engine = engine::Engine::builder().database(db).build().await?;

    let addr = format!("{}:{}", server.bind, server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|err| {
        tracing::error!("failed to bind server listener on {addr}: {err}");
        err
    })?;

    server::run_with_listener(engine, listener).await?;

    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    tracing::info!("connecting to {url}");
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
