//! User model and related functionality

use serde::{Deserialize, Serialize};

use super::due::{Due, OutstandingDue};

/// A studio member, keyed by `username`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub name: String,
    /// Age at signup, never re-validated
    pub age: i32,
    /// Hex SHA-256 of the plaintext password
    pub password_hash: String,
    pub time_slot: String,
    pub enrolled: bool,
    pub enrolled_date: String,
    /// Oldest first, one entry per consecutive month
    pub dues_list: Vec<Due>,
}

impl User {
    /// A freshly signed-up member with no enrollment and a single due
    pub fn new(
        username: String,
        name: String,
        age: i32,
        password_hash: String,
        first_due: Due,
    ) -> Self {
        Self {
            username,
            name,
            age,
            password_hash,
            time_slot: String::new(),
            enrolled: false,
            enrolled_date: String::new(),
            dues_list: vec![first_due],
        }
    }

    /// Dues that still have to be paid, in list order
    pub fn outstanding_dues(&self) -> Vec<OutstandingDue> {
        self.dues_list
            .iter()
            .filter(|due| !due.is_paid())
            .map(OutstandingDue::from)
            .collect()
    }
}

/// What a logged-in member sees about themselves
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetails {
    pub name: String,
    pub is_enrolled: bool,
    pub time_slot: String,
    pub dues_list: Vec<OutstandingDue>,
}

impl From<&User> for MemberDetails {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            is_enrolled: user.enrolled,
            time_slot: user.time_slot.clone(),
            dues_list: user.outstanding_dues(),
        }
    }
}
