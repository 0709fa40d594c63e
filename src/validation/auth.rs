use crate::error::{AppError, Result};
use crate::models::user::Role;

/// Validates a username.
///
/// # Arguments
///
/// * `username` - The username to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the username is valid.
pub fn validate_username(username: &str) -> Result<()> {
    if username.len() < 3 {
        return Err(AppError::Validation(
            "Username must be at least 3 characters long".to_string(),
        ));
    }

    if username.len() > 64 {
        return Err(AppError::Validation(
            "Username must be at most 64 characters".to_string(),
        ));
    }

    if !username.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(AppError::Validation(
            "Username can only contain letters, numbers, underscores, and hyphens".to_string(),
        ));
    }

    Ok(())
}

/// Validates a password.
///
/// # Arguments
///
/// * `password` - The password to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the password is valid.
pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters long".to_string(),
        ));
    }

    if password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be at most 128 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates a display name.
pub fn validate_display_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("Name cannot be empty".to_string()));
    }

    if name.len() > 128 {
        return Err(AppError::Validation(
            "Name must be at most 128 characters".to_string(),
        ));
    }

    Ok(())
}

/// Parses the role requested at registration.
///
/// Accounts default to `buyer`. The admin role can never be requested
/// through the public registration form.
pub fn parse_requested_role(role: Option<&str>) -> Result<Role> {
    let Some(role) = role else {
        return Ok(Role::Buyer);
    };

    match Role::parse(role) {
        Some(Role::Admin) | None => Err(AppError::Validation(
            "Role must be either 'buyer' or 'seller'".to_string(),
        )),
        Some(role) => Ok(role),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("al").is_err());
        assert!(validate_username("alice smith").is_err());
        assert!(validate_username(&"a".repeat(65)).is_err());
        assert!(validate_username("alice_the-2nd").is_ok());
    }

    #[test]
    fn password_rules() {
        assert!(validate_password("longenough").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"p".repeat(129)).is_err());
    }

    #[test]
    fn display_name_rules() {
        assert!(validate_display_name("Alice").is_ok());
        assert!(validate_display_name("   ").is_err());
    }

    #[test]
    fn requested_role_never_grants_admin() {
        assert_eq!(parse_requested_role(None).unwrap(), Role::Buyer);
        assert_eq!(parse_requested_role(Some("buyer")).unwrap(), Role::Buyer);
        assert_eq!(parse_requested_role(Some("seller")).unwrap(), Role::Seller);
        assert!(parse_requested_role(Some("admin")).is_err());
        assert!(parse_requested_role(Some("superuser")).is_err());
    }
}
