use chrono::{Duration, Utc};
use deadpool_postgres::Pool;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tower_cookies::cookie::time;
use tower_cookies::{Cookie, Cookies};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{principal::Principal, session::Claims},
    repositories::user as user_repo,
    state::AppState,
};

/// The name of the cookie carrying the session credential.
///
/// Issuance and verification both go through this constant so the two
/// sides can never disagree on the cookie name.
pub const SESSION_COOKIE: &str = "session";

/// Signing and verification keys derived once from the configured secret.
///
/// Built at startup and carried in the application state; never mutated
/// afterwards.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    /// Derives the key pair from the server secret.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// Signs a session credential for the given user.
///
/// # Arguments
///
/// * `keys` - The process-wide signing keys.
/// * `user_id` - The ID of the user the credential is bound to.
/// * `ttl_days` - How long the credential stays valid.
///
/// # Returns
///
/// A `Result` containing the signed token string.
pub fn sign_credential(keys: &SessionKeys, user_id: Uuid, ttl_days: i64) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::days(ttl_days)).timestamp() as usize,
    };

    encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
        .map_err(|e| AppError::Internal(format!("Credential signing failed: {}", e)))
}

/// Verifies a session credential and returns its claims.
///
/// Missing, malformed, expired, and wrongly-signed tokens are all the
/// same outcome: no identity. None of them is an error.
///
/// # Arguments
///
/// * `keys` - The process-wide signing keys.
/// * `token` - The token string extracted from the request cookie.
///
/// # Returns
///
/// The decoded claims, or `None` if the credential is not valid.
pub fn verify_credential(keys: &SessionKeys, token: &str) -> Option<Claims> {
    match decode::<Claims>(token, &keys.decoding, &Validation::new(Algorithm::HS256)) {
        Ok(data) => Some(data.claims),
        Err(e) => {
            tracing::debug!("Session credential rejected: {}", e);
            None
        }
    }
}

/// Resolves the principal behind a verified credential.
///
/// # Arguments
///
/// * `db` - The database connection pool.
/// * `claims` - Claims recovered from a verified credential.
///
/// # Returns
///
/// `Ok(None)` when the subject is unparsable or the user no longer
/// exists; both are equivalent to carrying no credential at all. Only
/// infrastructure failures surface as `Err`.
pub async fn resolve_principal(db: &Pool, claims: &Claims) -> Result<Option<Principal>> {
    let Ok(user_id) = Uuid::parse_str(&claims.sub) else {
        tracing::debug!("Session subject is not a valid user id");
        return Ok(None);
    };

    let user = match user_repo::find_by_id(db, &user_id).await? {
        Some(user) => user,
        None => {
            tracing::debug!("Session subject no longer exists: {}", user_id);
            return Ok(None);
        }
    };

    Ok(Some(Principal::from_user(&user)))
}

/// Issues a session for the given user and attaches it to the response.
///
/// If signing fails no cookie is set; the failure is a server
/// configuration problem, not a user-facing one.
///
/// # Arguments
///
/// * `cookies` - The response cookie jar.
/// * `state` - The application state.
/// * `user_id` - The ID of the user the session is issued for.
///
/// # Returns
///
/// A `Result<()>`.
pub fn issue(cookies: &Cookies, state: &AppState, user_id: Uuid) -> Result<()> {
    let ttl_days = state.config.session_duration_days;
    let token = sign_credential(&state.keys, user_id, ttl_days)?;

    cookies.add(session_cookie(token, ttl_days, state.config.is_production));
    tracing::debug!("🔑 Session issued for user: {}", user_id);
    Ok(())
}

/// Deletes the session cookie.
///
/// Idempotent: terminating an absent session is a no-op.
///
/// # Arguments
///
/// * `cookies` - The response cookie jar.
pub fn terminate(cookies: &Cookies) {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_max_age(time::Duration::seconds(0));
    cookie.set_path("/");
    cookies.remove(cookie);
}

/// Builds the session cookie with its transport flags.
fn session_cookie(value: String, max_age_days: i64, is_production: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, value);
    cookie.set_http_only(true);
    if is_production {
        cookie.set_secure(true);
    }
    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookie.set_max_age(time::Duration::seconds(max_age_days * 86400));
    cookie.set_path("/");
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> SessionKeys {
        SessionKeys::new(b"unit-test-secret")
    }

    #[test]
    fn round_trip_preserves_subject() {
        let keys = keys();
        let user_id = Uuid::new_v4();

        let token = sign_credential(&keys, user_id, 7).unwrap();
        let claims = verify_credential(&keys, &token).expect("fresh token must verify");

        assert_eq!(claims.sub, user_id.to_string());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_yields_no_identity() {
        let keys = keys();
        let now = Utc::now();

        // A token issued nine days ago with a seven-day ttl.
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: (now - Duration::days(9)).timestamp() as usize,
            exp: (now - Duration::days(2)).timestamp() as usize,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding).unwrap();

        assert!(verify_credential(&keys, &token).is_none());
    }

    #[test]
    fn foreign_signature_yields_no_identity() {
        let token = sign_credential(&keys(), Uuid::new_v4(), 7).unwrap();
        let other = SessionKeys::new(b"a-different-secret");

        assert!(verify_credential(&other, &token).is_none());
    }

    #[test]
    fn malformed_token_yields_no_identity() {
        assert!(verify_credential(&keys(), "not-a-token").is_none());
        assert!(verify_credential(&keys(), "").is_none());
    }

    #[test]
    fn tampered_payload_yields_no_identity() {
        let keys = keys();
        let token = sign_credential(&keys, Uuid::new_v4(), 7).unwrap();

        // Swap the payload segment for one signed under another subject.
        let other_token = sign_credential(&keys, Uuid::new_v4(), 7).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other_token.split('.').collect();
        parts[1] = other_parts[1];
        let spliced = parts.join(".");

        assert!(verify_credential(&keys, &spliced).is_none());
    }

    #[test]
    fn session_cookie_flags() {
        let cookie = session_cookie("token-value".to_string(), 7, false);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(7 * 86400)));
        assert_ne!(cookie.secure(), Some(true));

        let production = session_cookie("token-value".to_string(), 7, true);
        assert_eq!(production.secure(), Some(true));
    }
}
