//! PostgreSQL repository adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use rates_types::{
    Conversion, ConversionParams, Currency, CurrencyParams, RatesRepository, RepoError,
};

use crate::types::{DbConversion, DbCurrency, check_single_row, create_error};

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository implementation.
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

/// Runs all database migrations.
async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    execute_migration(
        pool,
        include_str!("../migrations/0001_create_tables_pg.sql"),
        "0001",
    )
    .await?;

    Ok(())
}

impl PostgresRepo {
    /// Creates a new PostgreSQL repository with automatic migration.
    pub async fn new(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        run_migrations(&pool).await?;
        tracing::debug!("PostgreSQL migrations applied");
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl RatesRepository for PostgresRepo {
    async fn create_currency(
        &self,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<Currency, RepoError> {
        let id: i64 = sqlx::query_scalar(
            r#"INSERT INTO currencies (name, created_at, updated_at) VALUES ($1, $2, $3) RETURNING id"#,
        )
        .bind(name)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(Currency {
            id,
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
        let result =
            sqlx::query(r#"UPDATE currencies SET name = $1, updated_at = $2 WHERE id = $3"#)
                .bind(name)
                .bind(updated_at)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        check_single_row(result.rows_affected())
    }

    async fn delete_currency(&self, id: i64) -> Result<(), RepoError> {
        let result = sqlx::query(r#"DELETE FROM currencies WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        check_single_row(result.rows_affected())
    }

    async fn get_currency(&self, id: i64) -> Result<Option<Currency>, RepoError> {
        let row: Option<DbCurrency> = sqlx::query_as(
            r#"SELECT id, name, created_at, updated_at FROM currencies WHERE id = $1"#,
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
                r#"SELECT id, name, created_at, updated_at FROM currencies LIMIT $1 OFFSET $2"#,
            )
            .bind(params.limit)
            .bind(params.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

            (total, rows)
        } else {
            let pattern = format!("%{}%", params.query);

            let total =
                sqlx::query_scalar(r#"SELECT COUNT(id) FROM currencies WHERE name LIKE $1"#)
                    .bind(&pattern)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| RepoError::Database(e.to_string()))?;

            let rows = sqlx::query_as(
                r#"SELECT id, name, created_at, updated_at FROM currencies WHERE name LIKE $1 LIMIT $2 OFFSET $3"#,
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
        let id: i64 = sqlx::query_scalar(
            r#"INSERT INTO conversions (currency_id_from, currency_id_to, rate, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5) RETURNING id"#,
        )
        .bind(currency_id_from)
        .bind(currency_id_to)
        .bind(rate)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(create_error)?;

        Ok(Conversion {
            id,
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
        let result =
            sqlx::query(r#"UPDATE conversions SET rate = $1, updated_at = $2 WHERE id = $3"#)
                .bind(rate)
                .bind(updated_at)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        check_single_row(result.rows_affected())
    }

    async fn delete_conversion(&self, id: i64) -> Result<(), RepoError> {
        let result = sqlx::query(r#"DELETE FROM conversions WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        check_single_row(result.rows_affected())
    }

    async fn get_conversion(&self, id: i64) -> Result<Option<Conversion>, RepoError> {
        let row: Option<DbConversion> = sqlx::query_as(
            r#"SELECT id, currency_id_from, currency_id_to, rate, created_at, updated_at
               FROM conversions WHERE id = $1"#,
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
                   WHERE (currency_id_from = $1 AND currency_id_to = $2)
                      OR (currency_id_from = $2 AND currency_id_to = $1)"#,
            )
            .bind(from)
            .bind(to)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

            let rows = sqlx::query_as(
                r#"SELECT id, currency_id_from, currency_id_to, rate, created_at, updated_at
                   FROM conversions
                   WHERE (currency_id_from = $1 AND currency_id_to = $2)
                      OR (currency_id_from = $2 AND currency_id_to = $1)
                   LIMIT $3 OFFSET $4"#,
            )
            .bind(from)
            .bind(to)
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
                   FROM conversions LIMIT $1 OFFSET $2"#,
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
