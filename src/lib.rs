//! Client-side core for the ParkEase parking marketplace: session persistence,
//! a thin typed API client over the backend, the phone-first authentication
//! flow, and the route guards the UI shells build on.
//!
//! The three pieces fit together through [`SessionStore`]: the store is the
//! single source of truth for the bearer token and cached profile, the
//! [`ApiClient`] reads the token at send time and clears the store on an
//! unauthorized response, and [`AuthFlow`] writes into it when a login or
//! signup succeeds.

pub mod api;
pub mod config;
pub mod error;
pub mod flow;
pub mod guards;
pub mod session;

pub use api::types;
pub use api::ApiClient;
pub use config::AppConfig;
pub use error::ApiError;
pub use flow::{meets_password_policy, normalize_phone, AuthFlow, AuthStep, OtpBranch};
pub use guards::{require_auth, require_operator, require_seller, GuardDecision};
pub use session::{
    FileSessionStorage, MemorySessionStorage, PersistedSession, SessionStorage, SessionStore,
};
