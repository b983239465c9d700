//! Navigation system for Lido
//!
//! This module provides:
//! - Route definitions with deep linking support
//! - A path router that parses locations back into routes
//! - The route guard deciding whether a view may render for the current session

use app_state::{AuthSnapshot, Role};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Route Parameters
// =============================================================================

/// Parameters for a route
pub type RouteParams = HashMap<String, String>;

// =============================================================================
// Route Definitions
// =============================================================================

/// All possible routes in the application
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "route", content = "params")]
pub enum Route {
    // Public catalog
    /// Landing page
    Landing,
    /// Course catalog
    Courses,
    /// Course detail page
    CourseDetail {
        /// Course ID
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },

    // Authentication
    /// Sign in / sign up
    Login,

    // Student area
    /// Student dashboard
    Dashboard,
    /// Lesson player
    Player {
        /// Course ID
        #[serde(skip_serializing_if = "Option::is_none")]
        course_id: Option<String>,
    },
    /// Own profile
    Profile,
    /// Purchased courses
    Library,
    /// Certificates and badges
    Achievements,
    /// Community feed
    Community,
    /// Live sessions
    Live,
    /// Talent board
    Talents,

    // Creator area
    /// Creator studio
    Creator,
    /// Course editor; no ID creates a new course
    EditCourse {
        /// Course ID
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },

    // Administration
    /// Admin console
    Admin,

    /// Unknown location
    NotFound,
}

impl Default for Route {
    fn default() -> Self {
        Route::Landing
    }
}

/// Who may open a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteAccess {
    /// Anyone
    Public,
    /// Only visitors without a session
    PublicOnly,
    /// Signed-in users
    Authenticated,
    /// Signed-in administrators
    AdminOnly,
}

fn with_id(path: &str, id: &Option<String>) -> String {
    match id {
        Some(id) => format!("{}?id={}", path, urlencoding::encode(id)),
        None => path.to_string(),
    }
}

impl Route {
    /// Get the URL path for this route
    pub fn to_path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Courses => "/cursos".to_string(),
            Route::CourseDetail { id } => with_id("/detalhes", id),
            Route::Login => "/login".to_string(),
            Route::Dashboard => "/painel".to_string(),
            Route::Player { course_id } => with_id("/player", course_id),
            Route::Profile => "/perfil".to_string(),
            Route::Library => "/biblioteca".to_string(),
            Route::Achievements => "/conquistas".to_string(),
            Route::Community => "/comunidade".to_string(),
            Route::Live => "/live".to_string(),
            Route::Talents => "/talentos".to_string(),
            Route::Creator => "/criador".to_string(),
            Route::EditCourse { id } => with_id("/editar-curso", id),
            Route::Admin => "/admin".to_string(),
            Route::NotFound => "/not-found".to_string(),
        }
    }

    /// Access level of this route
    pub fn access(&self) -> RouteAccess {
        match self {
            Route::Landing | Route::Courses | Route::CourseDetail { .. } | Route::NotFound => {
                RouteAccess::Public
            }
            Route::Login => RouteAccess::PublicOnly,
            Route::Admin => RouteAccess::AdminOnly,
            _ => RouteAccess::Authenticated,
        }
    }

    /// Check if this route requires authentication
    pub fn requires_auth(&self) -> bool {
        matches!(
            self.access(),
            RouteAccess::Authenticated | RouteAccess::AdminOnly
        )
    }

    /// Whether the main navbar is shown; full-screen views hide it
    pub fn shows_navbar(&self) -> bool {
        !matches!(self, Route::Login | Route::Player { .. } | Route::Live)
    }

    /// Get a display title for this route
    pub fn title(&self) -> &'static str {
        match self {
            Route::Landing => "Início",
            Route::Courses => "Cursos",
            Route::CourseDetail { .. } => "Detalhes do curso",
            Route::Login => "Entrar",
            Route::Dashboard => "Painel",
            Route::Player { .. } => "Aula",
            Route::Profile => "Perfil",
            Route::Library => "Biblioteca",
            Route::Achievements => "Conquistas",
            Route::Community => "Comunidade",
            Route::Live => "Ao vivo",
            Route::Talents => "Talentos",
            Route::Creator => "Estúdio do criador",
            Route::EditCourse { id: Some(_) } => "Editar curso",
            Route::EditCourse { id: None } => "Novo curso",
            Route::Admin => "Administração",
            Route::NotFound => "Página não encontrada",
        }
    }
}

// =============================================================================
// Route Guard
// =============================================================================

/// Outcome of guarding a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session state is unresolved; show the loading indicator
    ShowLoading,
    /// Render the requested view
    Render,
    /// Replace the location with another route
    Redirect(Route),
}

/// Decides whether a route may render for the current session
///
/// # Example
///
/// ```
/// use app_state::AuthSnapshot;
/// use app_ui::navigation::{GuardDecision, Route, RouteGuard};
///
/// let decision = RouteGuard::evaluate(&Route::Dashboard, &AuthSnapshot::signed_out());
/// assert_eq!(decision, GuardDecision::Redirect(Route::Login));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGuard;

impl RouteGuard {
    /// Evaluate `route` against `auth`
    pub fn evaluate(route: &Route, auth: &AuthSnapshot) -> GuardDecision {
        let decision = match route.access() {
            RouteAccess::Public => GuardDecision::Render,
            RouteAccess::PublicOnly => {
                if auth.loading {
                    GuardDecision::ShowLoading
                } else if auth.is_authenticated() {
                    GuardDecision::Redirect(Route::Landing)
                } else {
                    GuardDecision::Render
                }
            }
            access => Self::evaluate_private(access, auth),
        };

        if let GuardDecision::Redirect(target) = &decision {
            tracing::debug!(from = %route.to_path(), to = %target.to_path(), "route redirected");
        }
        decision
    }

    fn evaluate_private(access: RouteAccess, auth: &AuthSnapshot) -> GuardDecision {
        if auth.loading {
            return GuardDecision::ShowLoading;
        }
        if !auth.is_authenticated() {
            return GuardDecision::Redirect(Route::Login);
        }

        let Some(user) = &auth.user else {
            return GuardDecision::ShowLoading;
        };

        if access == RouteAccess::AdminOnly && user.role != Role::Admin {
            return GuardDecision::Redirect(Route::Dashboard);
        }
        GuardDecision::Render
    }
}

// =============================================================================
// Router
// =============================================================================

/// Route pattern for matching
struct RoutePattern {
    /// Literal path
    path: &'static str,
    /// Route builder
    builder: fn(&RouteParams) -> Route,
}

/// URL Router for parsing paths to routes
pub struct Router {
    /// Route patterns
    patterns: Vec<RoutePattern>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Create a new router with all routes
    pub fn new() -> Self {
        let mut router = Self {
            patterns: Vec::new(),
        };

        router.add_route("/", |_| Route::Landing);
        router.add_route("/cursos", |_| Route::Courses);
        router.add_route("/detalhes", |params| Route::CourseDetail {
            id: params.get("id").cloned(),
        });
        router.add_route("/login", |_| Route::Login);
        router.add_route("/painel", |_| Route::Dashboard);
        router.add_route("/player", |params| Route::Player {
            course_id: params.get("id").cloned(),
        });
        router.add_route("/perfil", |_| Route::Profile);
        router.add_route("/biblioteca", |_| Route::Library);
        router.add_route("/conquistas", |_| Route::Achievements);
        router.add_route("/comunidade", |_| Route::Community);
        router.add_route("/live", |_| Route::Live);
        router.add_route("/talentos", |_| Route::Talents);
        router.add_route("/criador", |_| Route::Creator);
        router.add_route("/editar-curso", |params| Route::EditCourse {
            id: params.get("id").cloned(),
        });
        router.add_route("/admin", |_| Route::Admin);

        router
    }

    /// Add a route pattern
    fn add_route(&mut self, path: &'static str, builder: fn(&RouteParams) -> Route) {
        self.patterns.push(RoutePattern { path, builder });
    }

    /// Match a path to a route
    ///
    /// Accepts plain paths as well as hash locations (`#/detalhes?id=1`).
    pub fn match_path(&self, path: &str) -> Route {
        let path = path.strip_prefix('#').unwrap_or(path);
        let (pathname, query) = match path.split_once('?') {
            Some((pathname, query)) => (pathname, Some(query)),
            None => (path, None),
        };

        let trimmed = pathname.trim_end_matches('/');
        let pathname = if trimmed.is_empty() { "/" } else { trimmed };

        let Some(pattern) = self.patterns.iter().find(|p| p.path == pathname) else {
            return Route::NotFound;
        };

        let mut params = RouteParams::new();
        parse_query(query, &mut params);
        (pattern.builder)(&params)
    }
}

/// Parse query string into params
fn parse_query(query: Option<&str>, params: &mut RouteParams) {
    if let Some(query) = query {
        for pair in query.split('&') {
            if let Some((key, value)) = pair.split_once('=') {
                if let Ok(decoded) = urlencoding::decode(value) {
                    params.insert(key.to_string(), decoded.into_owned());
                }
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
