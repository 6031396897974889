use anyhow::Context;
use hexmarket::{config::Config, db, seed};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load .env (if present) so DATABASE_URL from file is visible
    let _ = dotenvy::dotenv();

    let mut config = Config::from_env().context("error with configuration")?;
    // seeding always needs the schema
    config.run_migrations = true;

    let db = db::connect(&config).await.context("failed to connect to database")?;
    let summary = seed::seed_demo_catalog(&db).await?;

    tracing::info!(
        startups = summary.startups,
        tokens = summary.tokens,
        "Seed finished"
    );
    Ok(())
}
