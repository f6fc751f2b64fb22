//! SQLite repository adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use rates_types::{
    Conversion, ConversionParams, Currency, CurrencyParams, RatesRepository, RepoError,
};

use crate::types::{DbConversion, DbCurrency, check_single_row, create_error};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        // Run migration from migration file
        let ddl = include_str!("../migrations/0001_create_tables.sql");
        sqlx::query(ddl).execute(&pool).await?;
        tracing::debug!("SQLite migrations applied");

        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl RatesRepository for SqliteRepo {
    async fn create_currency(
        &self,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<Currency, RepoError> {
        let now_str = now.to_rfc3339();

        let result =
            sqlx::query(r#"INSERT INTO currencies (name, created_at, updated_at) VALUES (?, ?, ?)"#)
                .bind(name)
                .bind(&now_str)
                .bind(&now_str)
                .execute(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(Currency {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn update_currency(
        &self,
        id: i64,
        name: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        let result = sqlx::query(r#"UPDATE currencies SET name = ?, updated_at = ? WHERE id = ?"#)
            .bind(name)
            .bind(updated_at.to_rfc3339())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        check_single_row(result.rows_affected())
    }

    async fn delete_currency(&self, id: i64) -> Result<(), RepoError> {
        let result = sqlx::query(r#"DELETE FROM currencies WHERE id = ?"#)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        check_single_row(result.rows_affected())
    }

    async fn get_currency(&self, id: i64) -> Result<Option<Currency>, RepoError> {
        let row: Option<DbCurrency> = sqlx::query_as(
            r#"SELECT id, name, created_at, updated_at FROM currencies WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbCurrency::into_domain).transpose()
    }

    async fn list_currencies(
        &self,
        params: &CurrencyParams,
    ) -> Result<(Vec<Currency>, i64), RepoError> {
        let (total, rows): (i64, Vec<DbCurrency>) = if params.query.is_empty() {
            let total = sqlx::query_scalar(r#"SELECT COUNT(id) FROM currencies"#)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

            let rows = sqlx::query_as(
                r#"SELECT id, name, created_at, updated_at FROM currencies LIMIT ? OFFSET ?"#,
            )
            .bind(params.limit)
            .bind(params.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

            (total, rows)
        } else {
            let pattern = format!("%{}%", params.query);

            let total = sqlx::query_scalar(r#"SELECT COUNT(id) FROM currencies WHERE name LIKE ?"#)
                .bind(&pattern)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

            let rows = sqlx::query_as(
                r#"SELECT id, name, created_at, updated_at FROM currencies WHERE name LIKE ? LIMIT ? OFFSET ?"#,
            )
            .bind(&pattern)
            .bind(params.limit)
            .bind(params.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

            (total, rows)
        };

        let currencies = rows
            .into_iter()
            .map(DbCurrency::into_domain)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((currencies, total))
    }

    async fn create_conversion(
        &self,
        currency_id_from: i64,
        currency_id_to: i64,
        rate: f64,
        now: DateTime<Utc>,
    ) -> Result<Conversion, RepoError> {
        let now_str = now.to_rfc3339();

        let result = sqlx::query(
            r#"INSERT INTO conversions (currency_id_from, currency_id_to, rate, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(currency_id_from)
        .bind(currency_id_to)
        .bind(rate)
        .bind(&now_str)
        .bind(&now_str)
        .execute(&self.pool)
        .await
        .map_err(create_error)?;

        Ok(Conversion {
            id: result.last_insert_rowid(),
            currency_id_from,
            currency_id_to,
            rate,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update_conversion(
        &self,
        id: i64,
        rate: f64,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        let result = sqlx::query(r#"UPDATE conversions SET rate = ?, updated_at = ? WHERE id = ?"#)
            .bind(rate)
            .bind(updated_at.to_rfc3339())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        check_single_row(result.rows_affected())
    }

    async fn delete_conversion(&self, id: i64) -> Result<(), RepoError> {
        let result = sqlx::query(r#"DELETE FROM conversions WHERE id = ?"#)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        check_single_row(result.rows_affected())
    }

    async fn get_conversion(&self, id: i64) -> Result<Option<Conversion>, RepoError> {
        let row: Option<DbConversion> = sqlx::query_as(
            r#"SELECT id, currency_id_from, currency_id_to, rate, created_at, updated_at
               FROM conversions WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbConversion::into_domain).transpose()
    }

    async fn list_conversions(
        &self,
        params: &ConversionParams,
    ) -> Result<(Vec<Conversion>, i64), RepoError> {
        let (total, rows): (i64, Vec<DbConversion>) = if let Some((from, to)) = params.pair() {
            let total = sqlx::query_scalar(
                r#"SELECT COUNT(id) FROM conversions
                   WHERE (currency_id_from = ? AND currency_id_to = ?)
                      OR (currency_id_from = ? AND currency_id_to = ?)"#,
            )
            .bind(from)
            .bind(to)
            .bind(to)
            .bind(from)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

            let rows = sqlx::query_as(
                r#"SELECT id, currency_id_from, currency_id_to, rate, created_at, updated_at
                   FROM conversions
                   WHERE (currency_id_from = ? AND currency_id_to = ?)
                      OR (currency_id_from = ? AND currency_id_to = ?)
                   LIMIT ? OFFSET ?"#,
            )
            .bind(from)
            .bind(to)
            .bind(to)
            .bind(from)
            .bind(params.limit)
            .bind(params.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

            (total, rows)
        } else {
            let total = sqlx::query_scalar(r#"SELECT COUNT(id) FROM conversions"#)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

            let rows = sqlx::query_as(
                r#"SELECT id, currency_id_from, currency_id_to, rate, created_at, updated_at
                   FROM conversions LIMIT ? OFFSET ?"#,
            )
            .bind(params.limit)
            .bind(params.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

            (total, rows)
        };

        let conversions = rows
            .into_iter()
            .map(DbConversion::into_domain)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((conversions, total))
    }
}
