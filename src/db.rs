use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use crate::{config::AppConfig, migration::Migrator};

/// Create a SeaORM connection pool.
pub async fn create_orm_conn(config: &AppConfig) -> Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(config.database_url.clone());
    // An in-memory SQLite database lives and dies with its connection.
    let max_connections = if config.database_url.contains(":memory:") {
        1
    } else {
        config.max_connections
    };
    opts.max_connections(max_connections)
        .sqlx_logging(config.sql_logging);
    let conn = Database::connect(opts).await?;
    tracing::debug!(max_connections, "database connected");
    Ok(conn)
}

/// Apply every pending migration.
pub async fn run_migrations(conn: &DatabaseConnection) -> Result<()> {
    Migrator::up(conn, None).await?;
    Ok(())
}
