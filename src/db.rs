use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use crate::config::Config;

fn is_in_memory(url: &str) -> bool {
    url.starts_with("sqlite::memory:") || url.contains("mode=memory")
}

/// Connects to `config.database_url` and applies pending migrations if configured.
pub async fn connect(config: &Config) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options.sqlx_logging(false);

    // Every pooled connection to an in-memory SQLite URL would see its own empty database
    if is_in_memory(&config.database_url) {
        options.max_connections(1).min_connections(1);
    }

    let backend = if config.database_url.starts_with("postgres") {
        "PostgreSQL"
    } else {
        "SQLite"
    };
    tracing::info!("Connecting to database ({})", backend);

    let db = Database::connect(options).await?;

    if config.run_migrations {
        tracing::info!("Applying pending migrations");
        Migrator::up(&db, None).await?;
    }

    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_in_memory_sqlite_urls() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite:file:hex?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite:./hexmarket.sqlite?mode=rwc"));
        assert!(!is_in_memory("postgres://localhost/hex"));
    }
}
