//! Uniform JSON response envelope.
//!
//! Every endpoint answers with the same body shape: `data`/`message` plus
//! `meta` on success, `errors` plus `meta` on failure. Errors are mapped to
//! a fixed catalog of (message, code, HTTP status) entries as a pure
//! function of the typed `AppError` variant.

use axum::http::StatusCode;
use serde::Serialize;

use rates_types::AppError;

/// Pagination and status metadata carried in every envelope.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Meta {
    pub http_status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<serde_json::Value>,
}

impl Meta {
    /// Metadata carrying only an HTTP status.
    pub fn with_status(status: StatusCode) -> Self {
        Self {
            http_status: status.as_u16(),
            ..Default::default()
        }
    }

    /// Metadata for a paginated page.
    pub fn paginated(status: StatusCode, offset: i64, limit: i64, total: i64) -> Self {
        Self {
            http_status: status.as_u16(),
            offset: Some(offset),
            limit: Some(limit),
            total: Some(total),
            ..Default::default()
        }
    }
}

/// Error detail inside an error envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub message: String,
    pub code: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// The envelope itself.
#[derive(Debug, Serialize)]
pub struct ResponseBody<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorInfo>>,
    pub meta: Meta,
}

/// Builds a success envelope.
pub fn success<T: Serialize>(data: T, meta: Meta) -> ResponseBody<T> {
    ResponseBody {
        data: Some(data),
        message: None,
        errors: None,
        meta,
    }
}

/// Builds a data-less envelope carrying only a message, for the 404 fallback.
pub fn message(text: &str, meta: Meta) -> ResponseBody<()> {
    ResponseBody {
        data: None,
        message: Some(text.to_string()),
        errors: None,
        meta,
    }
}

/// Builds an error envelope and the HTTP status to send it with.
pub fn error(err: &AppError) -> (StatusCode, ResponseBody<()>) {
    let (message, code, status) = catalog(err);

    let body = ResponseBody {
        data: None,
        message: None,
        errors: Some(vec![ErrorInfo {
            message,
            code,
            field: None,
        }]),
        meta: Meta::with_status(status),
    };

    (status, body)
}

/// The error catalog: (message, numeric code, HTTP status) per error kind.
///
/// Client-addressable failures carry the error's own text; the rest answer
/// with the catalog's fixed wording.
fn catalog(err: &AppError) -> (String, u32, StatusCode) {
    match err {
        AppError::BadRequest(_) => (err.to_string(), 10005, StatusCode::BAD_REQUEST),
        AppError::NotFound(_) => (err.to_string(), 10213, StatusCode::NOT_FOUND),
        AppError::Conflict(_) => ("Record conflict".into(), 10202, StatusCode::CONFLICT),
        AppError::InvalidParameter(_) => (
            "Invalid parameter".into(),
            10111,
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        AppError::NullParam(_) => (err.to_string(), 10212, StatusCode::UNPROCESSABLE_ENTITY),
        AppError::UnsupportedMediaType => (
            "File type not supported".into(),
            71001,
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ),
        AppError::Internal(_) => (
            "Unexpected server error".into(),
            10000,
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_maps_each_kind() {
        let cases = [
            (AppError::Internal("boom".into()), 10000, 500),
            (AppError::Conflict("Duplicate entry".into()), 10202, 409),
            (AppError::InvalidParameter("id".into()), 10111, 422),
            (AppError::BadRequest("Bad Request".into()), 10005, 400),
            (AppError::NotFound("Not Found".into()), 10213, 404),
            (AppError::NullParam("name".into()), 10212, 422),
            (AppError::UnsupportedMediaType, 71001, 415),
        ];

        for (err, code, status) in cases {
            let (got_msg, got_code, got_status) = catalog(&err);
            assert_eq!(got_code, code, "{err:?}");
            assert_eq!(got_status.as_u16(), status, "{err:?}");
            assert!(!got_msg.is_empty());
        }
    }

    #[test]
    fn internal_errors_hide_their_text() {
        let (_, body) = error(&AppError::Internal("connection refused".into()));
        let errors = body.errors.unwrap();
        assert_eq!(errors[0].message, "Unexpected server error");
        assert_eq!(body.meta.http_status, 500);
    }

    #[test]
    fn row_count_anomaly_surfaces_as_server_error() {
        let err = AppError::from(rates_types::RepoError::Anomaly { affected: 2 });
        let (status, body) = error(&err);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let errors = body.errors.unwrap();
        assert_eq!(errors[0].code, 10000);
        assert_eq!(errors[0].message, "Unexpected server error");
    }

    #[test]
    fn not_found_carries_its_text() {
        let (status, body) = error(&AppError::NotFound("Currency 7".into()));
        assert_eq!(status, StatusCode::NOT_FOUND);
        let errors = body.errors.unwrap();
        assert_eq!(errors[0].message, "Not Found: Currency 7");
    }

    #[test]
    fn empty_meta_fields_are_omitted() {
        let body = success(42, Meta::with_status(StatusCode::OK));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["meta"]["http_status"], 200);
        assert!(json["meta"].get("offset").is_none());
        assert!(json["meta"].get("total").is_none());
    }
}
