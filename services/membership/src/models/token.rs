//! Session token model

use serde::{Deserialize, Serialize};

/// A session credential issued at login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub token: String,
    /// Issuance time in epoch seconds
    pub timestamp: i64,
    pub username: String,
}
