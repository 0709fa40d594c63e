use chrono::{DateTime, Utc};
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The role a user holds in the marketplace.
///
/// This is a closed enumeration: every authorization decision in the
/// system compares against these three values and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSql, FromSql)]
#[postgres(name = "user_role")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, bypasses per-user ownership checks.
    #[postgres(name = "admin")]
    Admin,
    /// May manage a storefront in addition to buying.
    #[postgres(name = "seller")]
    Seller,
    /// Default role for new accounts.
    #[postgres(name = "buyer")]
    Buyer,
}

impl Role {
    /// Parses a role from its lowercase wire name.
    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "admin" => Some(Role::Admin),
            "seller" => Some(Role::Seller),
            "buyer" => Some(Role::Buyer),
            _ => None,
        }
    }

    /// Returns the lowercase wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Seller => "seller",
            Role::Buyer => "buyer",
        }
    }
}

/// Represents a user in the system.
#[derive(Clone, Debug)]
pub struct User {
    /// The unique identifier for the user.
    pub id: Uuid,
    /// The user's display name.
    pub name: String,
    /// The user's username.
    pub username: String,
    /// The user's email address.
    pub email: Option<String>,
    /// The user's hashed password.
    pub password: String,
    /// The user's role.
    pub role: Role,
    /// The user's avatar image URL.
    pub avatar_url: Option<String>,
    /// The timestamp when the user was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the user was last updated.
    pub updated_at: DateTime<Utc>,
    /// Whether the user is active.
    pub is_active: bool,
}
