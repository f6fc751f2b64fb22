//! Typed query-string getters with silent fallback.
//!
//! Malformed query parameters never fail a request; a value that is absent
//! or does not parse as the requested type behaves as if it were omitted
//! and the caller's default is returned.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// Helper over a request's decoded query parameters.
pub struct QueryParams {
    values: HashMap<String, String>,
}

impl QueryParams {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Gets a string parameter, or the default when absent.
    pub fn get_str(&self, name: &str, default: &str) -> String {
        match self.values.get(name) {
            Some(v) if !v.is_empty() => v.clone(),
            _ => default.to_string(),
        }
    }

    /// Gets an integer parameter, or the default when absent or malformed.
    pub fn get_i64(&self, name: &str, default: i64) -> i64 {
        self.values
            .get(name)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Gets a float parameter, or the default when absent or malformed.
    pub fn get_f64(&self, name: &str, default: f64) -> f64 {
        self.values
            .get(name)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Gets a boolean parameter, or the default when absent or malformed.
    pub fn get_bool(&self, name: &str, default: bool) -> bool {
        self.values
            .get(name)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Gets an RFC 3339 date parameter, or the default when absent or
    /// malformed.
    pub fn get_date(
        &self,
        name: &str,
        default: Option<DateTime<Utc>>,
    ) -> Option<DateTime<Utc>> {
        match self.values.get(name) {
            Some(v) => DateTime::parse_from_rfc3339(v)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or(default),
            None => default,
        }
    }
}
