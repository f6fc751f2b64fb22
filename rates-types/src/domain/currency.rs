//! Currency domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A currency known to the service.
///
/// The identifier is assigned by the storage engine on insert. Rows are
/// never physically deleted through any exposed endpoint; `delete` exists
/// only on the repository port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
