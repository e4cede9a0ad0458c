//! Studio membership service
//!
//! Signup, login sessions, class enrollment and monthly dues for a yoga
//! studio. [`service::MembershipService`] holds the rules; [`routes`] exposes
//! them over HTTP; [`repositories`] provides the storage backends.

pub mod clock;
pub mod credentials;
pub mod dues;
pub mod error;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod service;
pub mod settings;
pub mod state;
pub mod throttle;
pub mod validation;
