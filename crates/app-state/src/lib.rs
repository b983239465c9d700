//! Application state for Lido
//!
//! This crate tracks the authentication session and the signed-in user's
//! profile. Authentication and profile records live in an external backend;
//! the traits in [`session`] are the seams to it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod session;

pub use session::{
    fallback_profile, AuthBackend, AuthBackendError, AuthEvent, AuthSnapshot, AuthUser,
    Credentials, ProfileLoader, ProfileStore, RetryPolicy, Role, SessionError, SessionState,
    SignUpParams, StoreError, UserMetadata, UserProfile,
};
