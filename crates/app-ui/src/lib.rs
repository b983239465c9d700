//! User interface layer for Lido
//!
//! This crate holds the navigation model: every view of the app as a
//! [`Route`], the [`Router`] parsing locations into routes, and the
//! [`RouteGuard`] deciding what a route shows for the current session.
//!
//! # Example
//!
//! ```rust
//! use app_state::AuthSnapshot;
//! use app_ui::{GuardDecision, Route, RouteGuard, Router};
//!
//! let router = Router::new();
//! let route = router.match_path("/detalhes?id=42");
//! assert_eq!(route, Route::CourseDetail { id: Some("42".to_string()) });
//!
//! // Course pages are public
//! let decision = RouteGuard::evaluate(&route, &AuthSnapshot::signed_out());
//! assert_eq!(decision, GuardDecision::Render);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod navigation;

pub use navigation::{GuardDecision, Route, RouteAccess, RouteGuard, RouteParams, Router};
