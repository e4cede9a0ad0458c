//! Request payloads accepted by the membership operations
//!
//! Missing fields deserialize as empty strings and are reported as blank.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub username: String,
    pub name: String,
    /// Date of birth, `YYYY-MM-DD`
    pub dob: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of operations that only need the session token
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TokenRequest {
    pub token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnrollRequest {
    pub token: String,
    pub date: String,
    pub timings: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PayDueRequest {
    pub token: String,
    pub due_details: DueDetails,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DueDetails {
    /// Billing month of the due, `YYYY-MM`
    pub date: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateRequest {
    pub token: String,
    pub timings: String,
}
