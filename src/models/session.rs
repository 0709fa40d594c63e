use serde::{Deserialize, Serialize};

/// Claims embedded in every session credential issued by the server.
///
/// Role and username are not embedded; they are resolved from the user
/// record on each request, so a promotion or demotion takes effect
/// before the token expires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Standard JWT subject: the user id as a string.
    pub sub: String,
    /// Issued-at (Unix timestamp, seconds).
    pub iat: usize,
    /// Expiry (Unix timestamp, seconds).
    pub exp: usize,
}
