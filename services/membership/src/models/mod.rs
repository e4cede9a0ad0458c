//! Membership service models

pub mod due;
pub mod requests;
pub mod token;
pub mod user;

// Re-export for convenience
pub use due::{BillingMonth, Due, DueStatus, MONTHLY_DUE_AMOUNT, OutstandingDue};
pub use requests::{
    DueDetails, EnrollRequest, LoginRequest, PayDueRequest, SignupRequest, TokenRequest,
    UpdateRequest,
};
pub use token::Token;
pub use user::{MemberDetails, User};
