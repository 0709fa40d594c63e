use crate::error::{AppError, Result};
use crate::models::user::{Role, User};
use crate::repositories::user as user_repo;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder,
};
use deadpool_postgres::Pool;
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroize;

/// The memory cost for Argon2 in MB.
const ARGON2_MEMORY_MB: u32 = 19;
/// The number of iterations for Argon2.
const ARGON2_ITERATIONS: u32 = 3;
/// The parallelism factor for Argon2.
const ARGON2_PARALLELISM: u32 = 4;

/// Hashes a password using Argon2id.
///
/// # Arguments
///
/// * `password` - The password to hash.
///
/// # Returns
///
/// A `Result` containing the hashed password.
fn hash_password(password: &str) -> Result<String> {
    let mut password_bytes = password.as_bytes().to_vec();

    let mut salt_bytes = [0u8; 16];
    OsRng.fill_bytes(&mut salt_bytes);

    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AppError::Internal(format!("Salt encoding error: {}", e)))?;

    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        ParamsBuilder::new()
            .m_cost(ARGON2_MEMORY_MB * 1024)
            .t_cost(ARGON2_ITERATIONS)
            .p_cost(ARGON2_PARALLELISM)
            .build()
            .map_err(|e| AppError::Internal(format!("Argon2 params: {}", e)))?,
    );

    let password_hash = argon2
        .hash_password(&password_bytes, &salt)
        .map_err(|e| AppError::Internal(format!("Argon2 hash error: {}", e)))?
        .to_string();

    password_bytes.zeroize();
    tracing::debug!("Password hashed successfully with Argon2");
    Ok(password_hash)
}

/// Verifies a password against a hash.
///
/// # Arguments
///
/// * `password` - The password to verify.
/// * `hash` - The hash to verify against.
///
/// # Returns
///
/// A `Result` containing `true` if the password is valid, `false` otherwise.
fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let mut password_bytes = password.as_bytes().to_vec();
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Hash parse error: {}", e)))?;
    let argon2 = Argon2::default();
    let result = argon2
        .verify_password(&password_bytes, &parsed_hash)
        .is_ok();

    password_bytes.zeroize();
    tracing::debug!("Password verification completed");
    Ok(result)
}

/// Creates a new user account.
///
/// # Arguments
///
/// * `db` - The database connection pool.
/// * `name` - The user's display name.
/// * `username` - The user's username.
/// * `email` - The user's email address, if provided.
/// * `password` - The user's password.
/// * `role` - The role the account is created with.
///
/// # Returns
///
/// A `Result` containing the created `User`.
pub async fn create_user(
    db: &Pool,
    name: &str,
    username: &str,
    email: Option<&str>,
    password: &str,
    role: Role,
) -> Result<User> {
    tracing::debug!("🔐 Creating user: {}", username);

    if user_repo::find_by_username(db, username).await?.is_some() {
        return Err(AppError::Validation("Username is already taken".to_string()));
    }

    let hashed_password = hash_password(password)?;

    let user = user_repo::create_user(db, name, username, email, &hashed_password, role).await?;

    tracing::info!("✅ User created with ID: {}", user.id);
    Ok(user)
}

/// Authenticates a user by username and password.
///
/// Unknown usernames and wrong passwords produce the same error so a
/// caller cannot probe which accounts exist.
///
/// # Arguments
///
/// * `db` - The database connection pool.
/// * `username` - The user's username.
/// * `password` - The user's password.
///
/// # Returns
///
/// A `Result` containing the authenticated `User`.
pub async fn authenticate_user(db: &Pool, username: &str, password: &str) -> Result<User> {
    tracing::debug!("🔐 Authenticating user: {}", username);

    let user = user_repo::find_by_username(db, username)
        .await?
        .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

    if !verify_password(password, &user.password)? {
        return Err(AppError::Authentication(
            "Invalid username or password".to_string(),
        ));
    }

    tracing::info!("✅ User authenticated: {}", user.id);

    Ok(user)
}
