//! Membership service routes

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::{
    error::{ErrorKind, MembershipError},
    models::{
        EnrollRequest, LoginRequest, PayDueRequest, SignupRequest, TokenRequest, UpdateRequest,
    },
    state::AppState,
};

const SUCCESS: &str = "Success";

/// Create the router for the membership service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/user-details", post(user_details))
        .route("/enroll", post(enroll))
        .route("/pay-due", post(pay_due))
        .route("/update", post(update))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "membership-service"
    }))
}

/// Member signup endpoint
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    state.membership.signup(&payload).await?;
    Ok((StatusCode::CREATED, Json(json!({ "status": SUCCESS }))))
}

/// Member login endpoint
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let throttle = &state.login_throttle;
    if !throttle.is_allowed(&payload.username).await {
        warn!("Refused throttled login for user: {}", payload.username);
        return Err(ApiError::TooManyAttempts);
    }

    match state.membership.login(&payload).await {
        Ok(token) => {
            throttle.record_success(&payload.username).await;
            Ok(Json(json!({ "status": SUCCESS, "token": token })))
        }
        Err(e) => {
            if matches!(e, MembershipError::WrongPassword) {
                throttle.record_failure(&payload.username).await;
            }
            Err(e.into())
        }
    }
}

/// Logout endpoint
pub async fn logout(
    State(state): State<AppState>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let outcome = state.membership.logout(&payload).await?;
    Ok(Json(json!({ "status": outcome.message() })))
}

/// Profile and outstanding dues of the logged-in member
pub async fn user_details(
    State(state): State<AppState>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let details = state.membership.user_details(&payload).await?;
    Ok(Json(json!({ "status": SUCCESS, "userDetails": details })))
}

/// Class enrollment endpoint
pub async fn enroll(
    State(state): State<AppState>,
    payload: Result<Json<EnrollRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    state.membership.enroll(&payload).await?;
    Ok(Json(json!({ "status": SUCCESS })))
}

/// Due payment endpoint
pub async fn pay_due(
    State(state): State<AppState>,
    payload: Result<Json<PayDueRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    state.membership.pay_due(&payload).await?;
    Ok(Json(json!({ "status": SUCCESS })))
}

/// Time slot change endpoint
pub async fn update(
    State(state): State<AppState>,
    payload: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    state.membership.update(&payload).await?;
    Ok(Json(json!({ "status": SUCCESS })))
}

/// Error type for the membership routes
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Membership(#[from] MembershipError),

    #[error("Too many failed login attempts, try again later")]
    TooManyAttempts,

    #[error("{}", .0.body_text())]
    InvalidBody(#[from] JsonRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::TooManyAttempts => (StatusCode::TOO_MANY_REQUESTS, self.to_string()),
            ApiError::InvalidBody(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Membership(e) => match e.kind() {
                ErrorKind::Validation => (StatusCode::BAD_REQUEST, e.to_string()),
                ErrorKind::Auth | ErrorKind::Token => (StatusCode::UNAUTHORIZED, e.to_string()),
                ErrorKind::Conflict => (StatusCode::CONFLICT, e.to_string()),
                ErrorKind::Internal => {
                    error!("Membership operation failed: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
        };

        (status, Json(json!({ "status": message }))).into_response()
    }
}
