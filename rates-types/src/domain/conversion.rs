//! Conversion-rate domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored directional exchange-rate record between two currencies.
///
/// `rate` is expressed in units of the "to" currency per unit of the "from"
/// currency. A record is stored with a specific direction but is matched
/// bidirectionally: a lookup for (A, B) also matches a stored (B, A), in
/// which case the inverse arithmetic applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub id: i64,
    pub currency_id_from: i64,
    pub currency_id_to: i64,
    pub rate: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversion {
    /// Returns true if this record covers the unordered pair {from, to}.
    pub fn matches_pair(&self, currency_id_from: i64, currency_id_to: i64) -> bool {
        (self.currency_id_from == currency_id_from && self.currency_id_to == currency_id_to)
            || (self.currency_id_from == currency_id_to && self.currency_id_to == currency_id_from)
    }

    /// Converts `amount` out of the given source currency using this record.
    ///
    /// Multiplies when the stored direction matches the requested one,
    /// divides when the record was stored in the reverse direction.
    pub fn convert(&self, currency_id_from: i64, amount: f64) -> f64 {
        if self.currency_id_from == currency_id_from {
            amount * self.rate
        } else {
            amount / self.rate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(from: i64, to: i64, rate: f64) -> Conversion {
        let now = Utc::now();
        Conversion {
            id: 1,
            currency_id_from: from,
            currency_id_to: to,
            rate,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn convert_forward_multiplies() {
        let c = record(1, 2, 15000.0);
        assert_eq!(c.convert(1, 2.0), 30000.0);
    }

    #[test]
    fn convert_reverse_divides() {
        let c = record(1, 2, 15000.0);
        assert_eq!(c.convert(2, 30000.0), 2.0);
    }

    #[test]
    fn matches_pair_is_direction_agnostic() {
        let c = record(1, 2, 0.5);
        assert!(c.matches_pair(1, 2));
        assert!(c.matches_pair(2, 1));
        assert!(!c.matches_pair(1, 3));
    }
}
