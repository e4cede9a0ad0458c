//! Application state shared across handlers

use crate::service::MembershipService;
use crate::throttle::LoginThrottle;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub membership: MembershipService,
    pub login_throttle: LoginThrottle,
}
