//! HTTP request handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use rates_types::{
    ConversionParams, ConvertCurrencies, CreateConversionRequest, CreateCurrencyRequest,
    CurrencyParams, RatesRepository, UpdateConversionRequest, UpdateCurrencyRequest,
};
use rates_types::AppError;

use super::params::QueryParams;
use super::response::{self, Meta};
use crate::RatesService;

/// Application state shared across handlers.
pub struct AppState<R: RatesRepository> {
    pub service: RatesService<R>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = response::error(&self.0);
        (status, Json(body)).into_response()
    }
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::InvalidParameter(format!("invalid id {raw:?}")))
}

fn decode<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => Err(AppError::InvalidParameter(rejection.body_text())),
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    "ok"
}

/// Fallback for unmatched routes.
pub async fn path_not_found() -> impl IntoResponse {
    let meta = Meta::with_status(StatusCode::NOT_FOUND);
    (
        StatusCode::NOT_FOUND,
        Json(response::message("path not found", meta)),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Currencies
// ─────────────────────────────────────────────────────────────────────────────

/// List currencies with pagination and an optional name filter.
#[tracing::instrument(skip(state, query))]
pub async fn list_currencies<R: RatesRepository>(
    State(state): State<Arc<AppState<R>>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, ApiError> {
    let helper = QueryParams::new(query);
    let params = CurrencyParams {
        limit: helper.get_i64("limit", 10),
        offset: helper.get_i64("offset", 0),
        query: helper.get_str("query", ""),
    };

    let (currencies, total) = state.service.list_currencies(&params).await?;

    // Empty pages stay HTTP 200; the no-content marker travels in the meta.
    if currencies.is_empty() {
        let meta = Meta::with_status(StatusCode::NO_CONTENT);
        return Ok(Json(response::success(currencies, meta)));
    }

    let meta = Meta::paginated(StatusCode::OK, params.offset, params.limit, total);
    Ok(Json(response::success(currencies, meta)))
}

/// Get currency by ID.
#[tracing::instrument(skip(state), fields(currency_id = %id))]
pub async fn get_currency<R: RatesRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;

    let currency = state.service.get_currency(id).await?;
    Ok(Json(response::success(
        currency,
        Meta::with_status(StatusCode::OK),
    )))
}

/// Create a new currency.
#[tracing::instrument(skip(state, payload))]
pub async fn create_currency<R: RatesRepository>(
    State(state): State<Arc<AppState<R>>>,
    payload: Result<Json<CreateCurrencyRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = decode(payload)?;

    let currency = state.service.create_currency(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(response::success(
            currency,
            Meta::with_status(StatusCode::CREATED),
        )),
    ))
}

/// Rename a currency and return the freshly persisted record.
#[tracing::instrument(skip(state, payload), fields(currency_id = %id))]
pub async fn update_currency<R: RatesRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateCurrencyRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let req = decode(payload)?;

    let currency = state.service.update_currency(id, req).await?;
    Ok(Json(response::success(
        currency,
        Meta::with_status(StatusCode::OK),
    )))
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversions
// ─────────────────────────────────────────────────────────────────────────────

/// List conversion records, optionally filtered by a currency pair
/// (matched in either direction).
#[tracing::instrument(skip(state, query))]
pub async fn list_conversions<R: RatesRepository>(
    State(state): State<Arc<AppState<R>>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, ApiError> {
    let helper = QueryParams::new(query);
    let from = helper.get_i64("currency_id_from", 0);
    let to = helper.get_i64("currency_id_to", 0);
    let params = ConversionParams {
        limit: helper.get_i64("limit", 10),
        offset: helper.get_i64("offset", 0),
        currency_id_from: (from != 0).then_some(from),
        currency_id_to: (to != 0).then_some(to),
    };

    let (conversions, total) = state.service.list_conversions(&params).await?;

    if conversions.is_empty() {
        let meta = Meta::with_status(StatusCode::NO_CONTENT);
        return Ok(Json(response::success(conversions, meta)));
    }

    let meta = Meta::paginated(StatusCode::OK, params.offset, params.limit, total);
    Ok(Json(response::success(conversions, meta)))
}

/// Get conversion record by ID.
#[tracing::instrument(skip(state), fields(conversion_id = %id))]
pub async fn get_conversion<R: RatesRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;

    let conversion = state.service.get_conversion(id).await?;
    Ok(Json(response::success(
        conversion,
        Meta::with_status(StatusCode::OK),
    )))
}

/// Create a conversion-rate record.
#[tracing::instrument(skip(state, payload))]
pub async fn create_conversion<R: RatesRepository>(
    State(state): State<Arc<AppState<R>>>,
    payload: Result<Json<CreateConversionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = decode(payload)?;

    let conversion = state.service.create_conversion(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(response::success(
            conversion,
            Meta::with_status(StatusCode::CREATED),
        )),
    ))
}

/// Change the rate of a conversion record and return the fresh record.
#[tracing::instrument(skip(state, payload), fields(conversion_id = %id))]
pub async fn update_conversion<R: RatesRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateConversionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let req = decode(payload)?;

    let conversion = state.service.update_conversion(id, req).await?;
    Ok(Json(response::success(
        conversion,
        Meta::with_status(StatusCode::OK),
    )))
}

// ─────────────────────────────────────────────────────────────────────────────
// Convert Currencies
// ─────────────────────────────────────────────────────────────────────────────

/// Convert an amount between two currencies; echoes the body with `result`
/// filled in.
#[tracing::instrument(skip(state, payload))]
pub async fn convert_currencies<R: RatesRepository>(
    State(state): State<Arc<AppState<R>>>,
    payload: Result<Json<ConvertCurrencies>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let req = decode(payload)?;

    let converted = state.service.convert(req).await?;
    Ok(Json(response::success(
        converted,
        Meta::with_status(StatusCode::OK),
    )))
}
