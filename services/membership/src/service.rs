//! Member lifecycle and dues bookkeeping
//!
//! [`MembershipService`] implements signup, login/logout, enrollment and dues
//! payment on top of the injected [`UserStore`], [`TokenStore`] and [`Clock`].

use std::sync::Arc;

use tracing::{info, warn};

use crate::clock::Clock;
use crate::credentials;
use crate::dues;
use crate::error::{MembershipError, MembershipResult};
use crate::models::{
    BillingMonth, Due, EnrollRequest, LoginRequest, MemberDetails, PayDueRequest, SignupRequest,
    Token, TokenRequest, UpdateRequest, User,
};
use crate::repositories::{TokenStore, UserStore};
use crate::validation;

/// Result of a logout that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// The token existed and has been revoked
    LoggedOut,
    /// No such token, nothing to do
    AlreadyLoggedOut,
}

impl LogoutOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            LogoutOutcome::LoggedOut => "Success",
            LogoutOutcome::AlreadyLoggedOut => "Already logged out",
        }
    }
}

/// Membership operations over explicit stores
#[derive(Clone)]
pub struct MembershipService {
    users: Arc<dyn UserStore>,
    tokens: Arc<dyn TokenStore>,
    clock: Arc<dyn Clock>,
}

impl MembershipService {
    pub fn new(
        users: Arc<dyn UserStore>,
        tokens: Arc<dyn TokenStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            tokens,
            clock,
        }
    }

    fn now_seconds(&self) -> i64 {
        self.clock.now().timestamp()
    }

    fn current_month(&self) -> BillingMonth {
        BillingMonth::containing(self.clock.now().date_naive())
    }

    /// Register a new member with one unpaid due for the current month
    pub async fn signup(&self, request: &SignupRequest) -> MembershipResult<()> {
        if validation::any_blank(&[
            request.username.as_str(),
            request.name.as_str(),
            request.dob.as_str(),
            request.password.as_str(),
        ]) {
            return Err(MembershipError::EmptyField);
        }

        let dob = validation::parse_date_of_birth(&request.dob)
            .ok_or(MembershipError::InvalidDateOfBirth)?;
        let age = validation::age_on(dob, self.clock.now().date_naive());
        if !validation::is_allowed_age(age) {
            return Err(MembershipError::AgeNotAllowed);
        }

        if !validation::is_valid_username(&request.username) {
            return Err(MembershipError::InvalidUsername);
        }

        if self.users.find(&request.username).await?.is_some() {
            return Err(MembershipError::UsernameTaken);
        }

        let user = User::new(
            request.username.clone(),
            request.name.clone(),
            age,
            credentials::hash_password(&request.password),
            Due::unpaid(self.current_month()),
        );

        // The store still guards against a signup racing this one.
        if !self.users.insert(&user).await? {
            return Err(MembershipError::UsernameTaken);
        }

        info!("Signed up new member: {}", user.username);
        Ok(())
    }

    /// Authenticate and return the member's live session token
    ///
    /// A token is reused while it is valid; otherwise a new one replaces it.
    /// Missing monthly dues are backfilled on every successful login.
    pub async fn login(&self, request: &LoginRequest) -> MembershipResult<String> {
        if validation::any_blank(&[request.username.as_str(), request.password.as_str()]) {
            return Err(MembershipError::EmptyField);
        }

        info!("Login attempt for user: {}", request.username);

        let Some(user) = self.users.find(&request.username).await? else {
            warn!("Login attempt for unknown user: {}", request.username);
            return Err(MembershipError::UnknownUsername);
        };

        if credentials::hash_password(&request.password) != user.password_hash {
            warn!("Wrong password for user: {}", user.username);
            return Err(MembershipError::WrongPassword);
        }

        let now = self.now_seconds();
        let token = match self.tokens.find_by_username(&user.username).await? {
            Some(existing) if !credentials::is_expired(existing.timestamp, now) => existing.token,
            _ => {
                let issued = Token {
                    token: credentials::generate_token(&user.username, now),
                    timestamp: now,
                    username: user.username.clone(),
                };
                self.tokens.replace_for_user(&issued).await?;
                info!("Issued new session token for user: {}", user.username);
                issued.token
            }
        };

        self.backfill_dues(&user).await?;

        Ok(token)
    }

    async fn backfill_dues(&self, user: &User) -> MembershipResult<()> {
        let missing = dues::missing_dues(&user.dues_list, self.current_month());
        if missing.is_empty() {
            return Ok(());
        }

        info!(
            "Adding {} monthly due(s) for user: {}",
            missing.len(),
            user.username
        );
        self.users.append_dues(&user.username, &missing).await?;
        Ok(())
    }

    /// Resolve a token to its owner's username
    ///
    /// Expired tokens are deleted on sight.
    async fn authenticate(&self, token: &str) -> MembershipResult<String> {
        let stored = self
            .tokens
            .find_by_token(token)
            .await?
            .ok_or(MembershipError::InvalidToken)?;

        if credentials::is_expired(stored.timestamp, self.now_seconds()) {
            warn!("Rejected expired token of user: {}", stored.username);
            self.tokens.delete(&stored.token).await?;
            return Err(MembershipError::InvalidToken);
        }

        Ok(stored.username)
    }

    async fn authenticated_user(&self, token: &str) -> MembershipResult<User> {
        let username = self.authenticate(token).await?;
        // A token whose owner vanished is as good as no token.
        self.users
            .find(&username)
            .await?
            .ok_or(MembershipError::InvalidToken)
    }

    /// Revoke a session token
    pub async fn logout(&self, request: &TokenRequest) -> MembershipResult<LogoutOutcome> {
        let Some(stored) = self.tokens.find_by_token(&request.token).await? else {
            return Ok(LogoutOutcome::AlreadyLoggedOut);
        };

        self.tokens.delete(&stored.token).await?;

        if credentials::is_expired(stored.timestamp, self.now_seconds()) {
            return Err(MembershipError::InvalidToken);
        }

        info!("Logged out user: {}", stored.username);
        Ok(LogoutOutcome::LoggedOut)
    }

    /// Profile and outstanding dues of the token's owner
    pub async fn user_details(&self, request: &TokenRequest) -> MembershipResult<MemberDetails> {
        let user = self.authenticated_user(&request.token).await?;
        Ok(MemberDetails::from(&user))
    }

    /// Enroll the member in a class time slot
    pub async fn enroll(&self, request: &EnrollRequest) -> MembershipResult<()> {
        if validation::any_blank(&[
            request.token.as_str(),
            request.date.as_str(),
            request.timings.as_str(),
        ]) {
            return Err(MembershipError::EmptyField);
        }

        let username = self.authenticate(&request.token).await?;
        self.users
            .enroll(&username, &request.date, &request.timings)
            .await?;

        info!("Enrolled user {} in slot {}", username, request.timings);
        Ok(())
    }

    /// Mark the member's due for the given month as paid
    ///
    /// Succeeds even when no due matches the month.
    pub async fn pay_due(&self, request: &PayDueRequest) -> MembershipResult<()> {
        let username = self.authenticate(&request.token).await?;

        let paid = match request.due_details.date.parse::<BillingMonth>() {
            Ok(month) => self.users.mark_due_paid(&username, month).await?,
            Err(_) => false,
        };

        if paid {
            info!(
                "Recorded payment of {} due for user: {}",
                request.due_details.date, username
            );
        } else {
            info!(
                "No {} due to pay for user: {}",
                request.due_details.date, username
            );
        }
        Ok(())
    }

    /// Move an enrolled member to another time slot
    pub async fn update(&self, request: &UpdateRequest) -> MembershipResult<()> {
        if validation::any_blank(&[request.token.as_str(), request.timings.as_str()]) {
            return Err(MembershipError::EmptyField);
        }

        let user = self.authenticated_user(&request.token).await?;
        if user.time_slot == request.timings {
            return Err(MembershipError::TimeSlotUnchanged);
        }

        self.users
            .set_time_slot(&user.username, &request.timings)
            .await?;

        info!("Moved user {} to slot {}", user.username, request.timings);
        Ok(())
    }
}
