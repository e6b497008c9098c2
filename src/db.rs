use crate::config::Config;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

pub async fn connect(url: &str, config: &Config) -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(url)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Every logical collection shares one table. `seq` keeps insertion order,
    // `id` is the store-assigned document identifier.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            collection TEXT NOT NULL,
            body TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_documents_collection
        ON documents(collection, seq)
        "#,
    )
    .execute(pool)
    .await?;

    // Identifiers are assigned once and never rewritten.
    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS trg_documents_id_immutable
        BEFORE UPDATE OF id ON documents
        BEGIN
            SELECT RAISE(ABORT, 'document id is immutable');
        END;
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database migrations completed");
    Ok(())
}
