//! Repository port trait.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (Postgres, SQLite) will implement this trait.

use chrono::{DateTime, Utc};

use crate::domain::{Conversion, Currency};
use crate::dto::{ConversionParams, CurrencyParams};
use crate::error::RepoError;

/// The main repository port for currency and conversion-rate storage.
///
/// List operations return the requested page together with the total count
/// of rows matching the same filter, ignoring pagination. Update and delete
/// must affect exactly one row: zero rows is `NotFound`, more than one is
/// reported as an `Anomaly`.
#[async_trait::async_trait]
pub trait RatesRepository: Send + Sync + 'static {
    // ─────────────────────────────────────────────────────────────────────────
    // Currency Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Inserts a currency and returns it with its assigned identifier.
    async fn create_currency(
        &self,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<Currency, RepoError>;

    /// Renames a currency.
    async fn update_currency(
        &self,
        id: i64,
        name: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepoError>;

    /// Deletes a currency. Not reachable from any HTTP endpoint.
    async fn delete_currency(&self, id: i64) -> Result<(), RepoError>;

    /// Gets a currency by ID.
    async fn get_currency(&self, id: i64) -> Result<Option<Currency>, RepoError>;

    /// Lists currencies with an optional name filter, plus the total count.
    async fn list_currencies(
        &self,
        params: &CurrencyParams,
    ) -> Result<(Vec<Currency>, i64), RepoError>;

    // ─────────────────────────────────────────────────────────────────────────
    // Conversion Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Inserts a conversion-rate record and returns it with its identifier.
    ///
    /// The storage schema enforces uniqueness of the canonicalized
    /// (min, max) currency pair; a violation surfaces as `Conflict`.
    async fn create_conversion(
        &self,
        currency_id_from: i64,
        currency_id_to: i64,
        rate: f64,
        now: DateTime<Utc>,
    ) -> Result<Conversion, RepoError>;

    /// Changes the rate of a conversion record.
    async fn update_conversion(
        &self,
        id: i64,
        rate: f64,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepoError>;

    /// Deletes a conversion record. Not reachable from any HTTP endpoint.
    async fn delete_conversion(&self, id: i64) -> Result<(), RepoError>;

    /// Gets a conversion record by ID.
    async fn get_conversion(&self, id: i64) -> Result<Option<Conversion>, RepoError>;

    /// Lists conversion records, plus the total count.
    ///
    /// When `params` carries a currency pair, matching is direction-agnostic:
    /// (from = A AND to = B) OR (from = B AND to = A).
    async fn list_conversions(
        &self,
        params: &ConversionParams,
    ) -> Result<(Vec<Conversion>, i64), RepoError>;
}
