use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_cookies::Cookies;

use crate::{
    models::{principal::Principal, user::Role},
    services::session,
    state::AppState,
};

/// Paths under this prefix authorize themselves; the gate never touches
/// them.
const API_PREFIX: &str = "/api";

/// Path fragments that mark a per-user account section.
const ACCOUNT_SECTIONS: [&str; 10] = [
    "/dashboard",
    "/profile",
    "/orders",
    "/addresses",
    "/subscriptions",
    "/payment-methods",
    "/wallet",
    "/notifications",
    "/support",
    "/settings",
];

/// What a request path demands from the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RoutePolicy {
    /// Whether the path requires an authenticated principal at all.
    protected: bool,
    /// Whether the path belongs to an administrative section.
    admin_only: bool,
    /// Whether the path belongs to a seller section.
    seller_section: bool,
    /// The username segment for per-user account pages.
    owner: Option<String>,
}

/// The gate's verdict for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateDecision {
    /// The request proceeds untouched.
    Allow,
    /// No usable credential; the caller must sign in.
    ToLogin,
    /// Authenticated but not authorized; send home, never back to login.
    ToHome,
}

/// Classifies a request path against the protected-area patterns.
fn classify(path: &str) -> RoutePolicy {
    if path == API_PREFIX || path.starts_with("/api/") {
        return RoutePolicy {
            protected: false,
            admin_only: false,
            seller_section: false,
            owner: None,
        };
    }

    let admin_only = path.starts_with("/admin") || path.contains("/admin/");
    let seller_section = path.starts_with("/seller") || path.contains("/seller/");
    let account = ACCOUNT_SECTIONS.iter().any(|section| path.contains(section));
    let protected = admin_only || seller_section || account;

    RoutePolicy {
        protected,
        admin_only,
        seller_section,
        owner: if protected { owner_segment(path) } else { None },
    }
}

/// Extracts the first path segment when it names the account owner rather
/// than a shared section root.
fn owner_segment(path: &str) -> Option<String> {
    let mut segments = path.trim_start_matches('/').split('/');
    let first = segments.next().filter(|segment| !segment.is_empty())?;
    // A lone segment is a section root, not an owned page.
    segments.next()?;

    if first == "admin" || first == "seller" {
        return None;
    }
    if ACCOUNT_SECTIONS.iter().any(|section| &section[1..] == first) {
        return None;
    }

    Some(first.to_string())
}

/// Applies the authorization rules to a classified path and the verified
/// principal, if any.
fn decide(policy: &RoutePolicy, principal: Option<&Principal>) -> GateDecision {
    if !policy.protected {
        return GateDecision::Allow;
    }

    let Some(principal) = principal else {
        return GateDecision::ToLogin;
    };

    // Admin bypasses role and ownership checks on every protected path.
    if principal.role == Role::Admin {
        return GateDecision::Allow;
    }

    if policy.admin_only {
        return GateDecision::ToHome;
    }

    if policy.seller_section && principal.role != Role::Seller {
        return GateDecision::ToHome;
    }

    if let Some(owner) = &policy.owner {
        if owner != &principal.username {
            return GateDecision::ToHome;
        }
    }

    GateDecision::Allow
}

/// The route authorization gate.
///
/// Runs in front of every page route. Unprotected paths pass through
/// untouched; protected paths require a verified principal with the
/// right role and ownership, or the request is redirected. Any failure
/// along the verification path (bad token, vanished user, database
/// error) ends in a redirect, never in access.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
///
/// # Returns
///
/// A `Response`.
pub async fn route_gate(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let policy = classify(request.uri().path());
    if !policy.protected {
        return next.run(request).await;
    }

    let Some(cookie) = cookies.get(session::SESSION_COOKIE) else {
        tracing::debug!("No session cookie for protected path: {}", request.uri().path());
        return Redirect::to("/login").into_response();
    };

    let Some(claims) = session::verify_credential(&state.keys, cookie.value()) else {
        return Redirect::to("/login").into_response();
    };

    let principal = match session::resolve_principal(&state.db, &claims).await {
        Ok(principal) => principal,
        Err(e) => {
            tracing::error!("❌ Principal resolution failed: {}", e);
            return Redirect::to("/login").into_response();
        }
    };

    match decide(&policy, principal.as_ref()) {
        GateDecision::Allow => {
            if let Some(principal) = principal {
                request.extensions_mut().insert(principal);
            }
            next.run(request).await
        }
        GateDecision::ToLogin => Redirect::to("/login").into_response(),
        GateDecision::ToHome => {
            tracing::debug!(
                "Insufficient privilege for path: {}",
                request.uri().path()
            );
            Redirect::to("/").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn principal(username: &str, role: Role) -> Principal {
        Principal {
            user_id: Uuid::new_v4(),
            role,
            username: username.to_string(),
            name: username.to_string(),
            avatar_url: None,
        }
    }

    #[test]
    fn api_paths_are_never_gated() {
        assert!(!classify("/api/auth/login").protected);
        assert!(!classify("/api/products").protected);
        assert!(!classify("/api").protected);
    }

    #[test]
    fn public_paths_are_open() {
        for path in ["/", "/login", "/register", "/products/123", "/about"] {
            let policy = classify(path);
            assert!(!policy.protected, "{path} should be open");
            assert_eq!(decide(&policy, None), GateDecision::Allow);
        }
    }

    #[test]
    fn protected_paths_without_credential_go_to_login() {
        for path in [
            "/admin/users",
            "/seller/products",
            "/alice/dashboard",
            "/alice/orders/42",
            "/settings",
            "/alice/admin/users",
        ] {
            let policy = classify(path);
            assert!(policy.protected, "{path} should be protected");
            assert_eq!(decide(&policy, None), GateDecision::ToLogin, "{path}");
        }
    }

    #[test]
    fn admin_sections_require_admin() {
        let policy = classify("/admin/users");
        assert!(policy.admin_only);

        let seller = principal("sally", Role::Seller);
        let buyer = principal("bob", Role::Buyer);
        let admin = principal("root", Role::Admin);

        // Authenticated but unauthorized users go home, not to login.
        assert_eq!(decide(&policy, Some(&seller)), GateDecision::ToHome);
        assert_eq!(decide(&policy, Some(&buyer)), GateDecision::ToHome);
        assert_eq!(decide(&policy, Some(&admin)), GateDecision::Allow);
    }

    #[test]
    fn seller_sections_admit_sellers_and_admins() {
        let policy = classify("/seller/products");
        assert!(policy.seller_section);

        assert_eq!(
            decide(&policy, Some(&principal("sally", Role::Seller))),
            GateDecision::Allow
        );
        assert_eq!(
            decide(&policy, Some(&principal("root", Role::Admin))),
            GateDecision::Allow
        );
        assert_eq!(
            decide(&policy, Some(&principal("bob", Role::Buyer))),
            GateDecision::ToHome
        );
    }

    #[test]
    fn owned_pages_require_matching_username() {
        let policy = classify("/bob/dashboard");
        assert_eq!(policy.owner.as_deref(), Some("bob"));

        // alice (buyer) asking for bob's dashboard goes home.
        assert_eq!(
            decide(&policy, Some(&principal("alice", Role::Buyer))),
            GateDecision::ToHome
        );
        assert_eq!(
            decide(&policy, Some(&principal("bob", Role::Buyer))),
            GateDecision::Allow
        );
    }

    #[test]
    fn admin_bypasses_ownership_and_role_checks() {
        let root = principal("root", Role::Admin);

        assert_eq!(
            decide(&classify("/alice/seller/products"), Some(&root)),
            GateDecision::Allow
        );
        assert_eq!(
            decide(&classify("/alice/dashboard"), Some(&root)),
            GateDecision::Allow
        );
        assert_eq!(
            decide(&classify("/alice/admin/users"), Some(&root)),
            GateDecision::Allow
        );
    }

    #[test]
    fn nested_admin_paths_stay_admin_only() {
        let policy = classify("/alice/admin/users");
        assert!(policy.admin_only);
        assert_eq!(policy.owner.as_deref(), Some("alice"));

        // Even the page owner needs the admin role here.
        assert_eq!(
            decide(&policy, Some(&principal("alice", Role::Buyer))),
            GateDecision::ToHome
        );
    }

    #[test]
    fn section_roots_have_no_owner() {
        assert_eq!(classify("/dashboard").owner, None);
        assert_eq!(classify("/orders/42").owner, None);
        assert_eq!(classify("/seller/products").owner, None);
        assert_eq!(classify("/payment-methods/2").owner, None);
    }
}
