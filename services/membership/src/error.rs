//! Errors returned by membership operations

use thiserror::Error;

use crate::repositories::StoreError;

/// Broad category of a [`MembershipError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-range input
    Validation,
    /// Unknown username or wrong password
    Auth,
    /// Missing or expired session token
    Token,
    /// The request clashes with existing state
    Conflict,
    /// A storage backend failed
    Internal,
}

/// Failure of a membership operation
///
/// The `Display` strings are the messages shown to members.
#[derive(Error, Debug)]
pub enum MembershipError {
    #[error("One or more of the fields is empty")]
    EmptyField,

    #[error("Invalid date of birth, expected YYYY-MM-DD")]
    InvalidDateOfBirth,

    #[error("Age is not between 18 and 65, you are not allowed")]
    AgeNotAllowed,

    #[error("Invalid username, only use letters, numbers and underscores")]
    InvalidUsername,

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Username not found")]
    UnknownUsername,

    #[error("Wrong password")]
    WrongPassword,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Already chose this timeslot")]
    TimeSlotUnchanged,

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl MembershipError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MembershipError::EmptyField
            | MembershipError::InvalidDateOfBirth
            | MembershipError::AgeNotAllowed
            | MembershipError::InvalidUsername => ErrorKind::Validation,
            MembershipError::UnknownUsername | MembershipError::WrongPassword => ErrorKind::Auth,
            MembershipError::InvalidToken => ErrorKind::Token,
            MembershipError::UsernameTaken | MembershipError::TimeSlotUnchanged => {
                ErrorKind::Conflict
            }
            MembershipError::Store(_) => ErrorKind::Internal,
        }
    }
}

pub type MembershipResult<T> = Result<T, MembershipError>;
