//! Data Transfer Objects (DTOs) for requests and list parameters.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Currency DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create a new currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCurrencyRequest {
    pub name: String,
}

/// Request to rename an existing currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCurrencyRequest {
    pub name: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversion DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create a conversion-rate record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateConversionRequest {
    pub currency_id_from: i64,
    pub currency_id_to: i64,
    pub rate: f64,
}

/// Request to change the rate of an existing conversion record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateConversionRequest {
    pub rate: f64,
}

/// Convert-an-amount request/response body.
///
/// Ephemeral - never persisted. The endpoint echoes the body back with
/// `result` filled in by the convert use case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertCurrencies {
    pub currency_id_from: i64,
    pub currency_id_to: i64,
    pub amount: f64,
    #[serde(default)]
    pub result: f64,
}

// ─────────────────────────────────────────────────────────────────────────────
// List parameters
// ─────────────────────────────────────────────────────────────────────────────

/// Pagination and filter parameters for listing currencies.
#[derive(Debug, Clone)]
pub struct CurrencyParams {
    pub limit: i64,
    pub offset: i64,
    /// Substring filter on the currency name; empty means no filter.
    pub query: String,
}

impl Default for CurrencyParams {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
            query: String::new(),
        }
    }
}

/// Pagination and filter parameters for listing conversions.
///
/// When both currency ids are given, the list is restricted to records
/// covering that pair in either direction.
#[derive(Debug, Clone)]
pub struct ConversionParams {
    pub limit: i64,
    pub offset: i64,
    pub currency_id_from: Option<i64>,
    pub currency_id_to: Option<i64>,
}

impl ConversionParams {
    /// Parameters used by the internal direction-agnostic pair lookup.
    pub fn for_pair(currency_id_from: i64, currency_id_to: i64) -> Self {
        Self {
            limit: 10,
            offset: 0,
            currency_id_from: Some(currency_id_from),
            currency_id_to: Some(currency_id_to),
        }
    }

    /// Returns the pair filter when both sides are present.
    pub fn pair(&self) -> Option<(i64, i64)> {
        match (self.currency_id_from, self.currency_id_to) {
            (Some(from), Some(to)) => Some((from, to)),
            _ => None,
        }
    }
}

impl Default for ConversionParams {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
            currency_id_from: None,
            currency_id_to: None,
        }
    }
}
