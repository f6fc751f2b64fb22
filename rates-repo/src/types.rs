//! Shared database types with feature-gated fields for SQLite and PostgreSQL.

use sqlx::FromRow;

use rates_types::{Conversion, Currency, RepoError};

use chrono::{DateTime, Utc};

// ─────────────────────────────────────────────────────────────────────────────
// Database row structs (derive FromRow for automatic mapping)
// ─────────────────────────────────────────────────────────────────────────────

/// Currency row from database.
#[derive(FromRow)]
pub struct DbCurrency {
    pub id: i64,
    pub name: String,

    #[cfg(not(feature = "sqlite"))]
    pub created_at: DateTime<Utc>,
    #[cfg(feature = "sqlite")]
    pub created_at: String,

    #[cfg(not(feature = "sqlite"))]
    pub updated_at: DateTime<Utc>,
    #[cfg(feature = "sqlite")]
    pub updated_at: String,
}

impl DbCurrency {
    pub fn into_domain(self) -> Result<Currency, RepoError> {
        Ok(Currency {
            id: self.id,
            name: self.name,
            created_at: parse_timestamp(self.created_at)?,
            updated_at: parse_timestamp(self.updated_at)?,
        })
    }
}

/// Conversion row from database.
#[derive(FromRow)]
pub struct DbConversion {
    pub id: i64,
    pub currency_id_from: i64,
    pub currency_id_to: i64,
    pub rate: f64,

    #[cfg(not(feature = "sqlite"))]
    pub created_at: DateTime<Utc>,
    #[cfg(feature = "sqlite")]
    pub created_at: String,

    #[cfg(not(feature = "sqlite"))]
    pub updated_at: DateTime<Utc>,
    #[cfg(feature = "sqlite")]
    pub updated_at: String,
}

impl DbConversion {
    pub fn into_domain(self) -> Result<Conversion, RepoError> {
        Ok(Conversion {
            id: self.id,
            currency_id_from: self.currency_id_from,
            currency_id_to: self.currency_id_to,
            rate: self.rate,
            created_at: parse_timestamp(self.created_at)?,
            updated_at: parse_timestamp(self.updated_at)?,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared adapter helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Maps one-row statement outcomes to the repository contract.
pub(crate) fn check_single_row(affected: u64) -> Result<(), RepoError> {
    match affected {
        1 => Ok(()),
        0 => Err(RepoError::NotFound),
        n => Err(RepoError::Anomaly { affected: n }),
    }
}

/// Maps insert failures, surfacing pair-uniqueness violations as conflicts.
pub(crate) fn create_error(e: sqlx::Error) -> RepoError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return RepoError::Conflict("Duplicate entry".into());
        }
    }
    RepoError::Database(e.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Timestamp conversion helpers
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "sqlite")]
fn parse_timestamp(raw: String) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepoError::Database(format!("invalid timestamp {raw:?}: {e}")))
}

#[cfg(not(feature = "sqlite"))]
fn parse_timestamp(raw: DateTime<Utc>) -> Result<DateTime<Utc>, RepoError> {
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_single_row_accepts_exactly_one() {
        assert!(check_single_row(1).is_ok());
    }

    #[test]
    fn check_single_row_zero_rows_is_not_found() {
        assert!(matches!(check_single_row(0), Err(RepoError::NotFound)));
    }

    #[test]
    fn check_single_row_multiple_rows_is_anomaly() {
        assert!(matches!(
            check_single_row(3),
            Err(RepoError::Anomaly { affected: 3 })
        ));
    }
}
