//! Rates Application Service
//!
//! Orchestrates the currency, conversion and convert-currencies use cases
//! through the repository port. Contains NO infrastructure logic - pure
//! business orchestration.

use chrono::Utc;

use rates_types::{
    AppError, Conversion, ConversionParams, ConvertCurrencies, CreateConversionRequest,
    CreateCurrencyRequest, Currency, CurrencyParams, RatesRepository, UpdateConversionRequest,
    UpdateCurrencyRequest,
};

/// Application service for the rates API.
///
/// Generic over `R: RatesRepository` - the adapter is injected at compile time.
/// This enables:
/// - Swapping repositories without code changes
/// - Testing with an in-memory repo
/// - Compile-time checks for port implementation
pub struct RatesService<R: RatesRepository> {
    repo: R,
}

impl<R: RatesRepository> RatesService<R> {
    /// Creates a new rates service with the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Currency Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Creates a new currency, stamping both timestamps.
    pub async fn create_currency(
        &self,
        req: CreateCurrencyRequest,
    ) -> Result<Currency, AppError> {
        if req.name.trim().is_empty() {
            return Err(AppError::NullParam("name".into()));
        }

        self.repo
            .create_currency(&req.name, Utc::now())
            .await
            .map_err(Into::into)
    }

    /// Gets a currency by ID.
    pub async fn get_currency(&self, id: i64) -> Result<Currency, AppError> {
        self.repo
            .get_currency(id)
            .await
            .map_err(Into::into)
            .and_then(|opt| opt.ok_or_else(|| AppError::NotFound(format!("Currency {}", id))))
    }

    /// Lists currencies with the total matching count.
    pub async fn list_currencies(
        &self,
        params: &CurrencyParams,
    ) -> Result<(Vec<Currency>, i64), AppError> {
        self.repo.list_currencies(params).await.map_err(Into::into)
    }

    /// Renames a currency and returns the freshly persisted record.
    pub async fn update_currency(
        &self,
        id: i64,
        req: UpdateCurrencyRequest,
    ) -> Result<Currency, AppError> {
        if req.name.trim().is_empty() {
            return Err(AppError::NullParam("name".into()));
        }

        self.repo.update_currency(id, &req.name, Utc::now()).await?;
        self.get_currency(id).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Conversion Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Creates a conversion-rate record.
    ///
    /// Both referenced currencies must exist, and no record may already
    /// cover the pair in either direction. The pre-insert duplicate check is
    /// advisory; the storage layer's unique index on the canonicalized pair
    /// is the authoritative guard under concurrent creates.
    pub async fn create_conversion(
        &self,
        req: CreateConversionRequest,
    ) -> Result<Conversion, AppError> {
        if self.repo.get_currency(req.currency_id_from).await?.is_none() {
            return Err(AppError::BadRequest(format!(
                "currency_id_from {} does not exist",
                req.currency_id_from
            )));
        }

        if self.repo.get_currency(req.currency_id_to).await?.is_none() {
            return Err(AppError::BadRequest(format!(
                "currency_id_to {} does not exist",
                req.currency_id_to
            )));
        }

        let params = ConversionParams::for_pair(req.currency_id_from, req.currency_id_to);
        let (_, total) = self.repo.list_conversions(&params).await?;
        if total > 0 {
            return Err(AppError::Conflict("Duplicate entry".into()));
        }

        self.repo
            .create_conversion(
                req.currency_id_from,
                req.currency_id_to,
                req.rate,
                Utc::now(),
            )
            .await
            .map_err(Into::into)
    }

    /// Gets a conversion record by ID.
    pub async fn get_conversion(&self, id: i64) -> Result<Conversion, AppError> {
        self.repo
            .get_conversion(id)
            .await
            .map_err(Into::into)
            .and_then(|opt| opt.ok_or_else(|| AppError::NotFound(format!("Conversion {}", id))))
    }

    /// Lists conversion records with the total matching count.
    pub async fn list_conversions(
        &self,
        params: &ConversionParams,
    ) -> Result<(Vec<Conversion>, i64), AppError> {
        self.repo.list_conversions(params).await.map_err(Into::into)
    }

    /// Changes the rate of a conversion record and returns the fresh record.
    ///
    /// Referenced currencies are not re-validated; only the rate and the
    /// updated timestamp change.
    pub async fn update_conversion(
        &self,
        id: i64,
        req: UpdateConversionRequest,
    ) -> Result<Conversion, AppError> {
        self.repo.update_conversion(id, req.rate, Utc::now()).await?;
        self.get_conversion(id).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Convert Currencies
    // ─────────────────────────────────────────────────────────────────────────

    /// Converts an amount between two currencies.
    ///
    /// Looks up the pair direction-agnostically: a stored (A, B) record
    /// answers both (A, B) and (B, A) requests, with the inverse arithmetic
    /// for the reverse direction. If more than one record matches (the
    /// uniqueness invariant was violated) the first returned record wins;
    /// behavior for ties is undefined.
    pub async fn convert(
        &self,
        mut req: ConvertCurrencies,
    ) -> Result<ConvertCurrencies, AppError> {
        let params = ConversionParams::for_pair(req.currency_id_from, req.currency_id_to);
        let (conversions, _) = self.repo.list_conversions(&params).await?;

        let Some(conversion) = conversions.first() else {
            return Err(AppError::NotFound(format!(
                "no conversion for pair ({}, {})",
                req.currency_id_from, req.currency_id_to
            )));
        };

        req.result = conversion.convert(req.currency_id_from, req.amount);
        Ok(req)
    }
}
