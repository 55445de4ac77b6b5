//! Database bootstrap: create the database and the `goats` table, reset the fixture.

use crate::gateway::{Gateway, MemoryGateway, PgGateway};
use crate::model::FIXTURE_GOATS;
use crate::settings::{Settings, StoreKind};
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;
use std::sync::Arc;

const GOATS_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS goats (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        age INT NOT NULL
    )
"#;

/// Create the `goats` table if it does not exist.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(GOATS_DDL).execute(pool).await?;
    Ok(())
}

/// Empty the table, restart ids at 1 and insert [`FIXTURE_GOATS`] in one transaction.
pub async fn reset_fixture(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("TRUNCATE goats RESTART IDENTITY")
        .execute(&mut *tx)
        .await?;
    for (name, age) in FIXTURE_GOATS {
        sqlx::query("INSERT INTO goats(name, age) VALUES ($1, $2)")
            .bind(name)
            .bind(age)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    tracing::info!(rows = FIXTURE_GOATS.len(), "goats fixture loaded");
    Ok(())
}

/// Build the gateway selected by `settings.store`.
///
/// Postgres: create the database and table if needed, then reset the fixture
/// when `settings.seed` is set. Memory: always starts with [`FIXTURE_GOATS`].
pub async fn open_gateway(settings: &Settings) -> Result<Arc<dyn Gateway>, sqlx::Error> {
    match settings.store {
        StoreKind::Postgres => {
            ensure_database_exists(&settings.database_url).await?;
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .connect(&settings.database_url)
                .await?;
            ensure_schema(&pool).await?;
            if settings.seed {
                reset_fixture(&pool).await?;
            }
            Ok(Arc::new(PgGateway::new(pool)))
        }
        StoreKind::Memory => {
            tracing::info!(rows = FIXTURE_GOATS.len(), "using in-memory goat table");
            Ok(Arc::new(MemoryGateway::with_goats(FIXTURE_GOATS)))
        }
    }
}

/// Connect to the `postgres` maintenance database and create the target database when missing.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), sqlx::Error> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| sqlx::Error::Configuration("DATABASE_URL: no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres", base), db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
