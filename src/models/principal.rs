use serde::Serialize;
use uuid::Uuid;

use crate::models::user::{Role, User};

/// The resolved identity behind a verified session credential.
///
/// A `Principal` is only ever derived from a verified token plus a user
/// lookup; handlers receive it, they never build one. The password hash
/// is stripped before the record leaves the resolution path.
#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    /// The ID of the user this principal resolves to.
    pub user_id: Uuid,
    /// The user's role.
    pub role: Role,
    /// The user's username.
    pub username: String,
    /// The user's display name.
    pub name: String,
    /// The user's avatar image URL.
    pub avatar_url: Option<String>,
}

impl Principal {
    /// Builds a principal from a user record, dropping credential fields.
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
            username: user.username.clone(),
            name: user.name.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}
