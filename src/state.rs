use deadpool_postgres::Pool;
use crate::config::Config;
use crate::error::Result;
use crate::services::session::SessionKeys;

/// The application's state.
///
/// Constructed once at startup and cloned into every handler and
/// middleware; nothing in here is mutated at runtime.
#[derive(Clone)]
pub struct AppState {
    /// The database connection pool.
    pub db: Pool,
    /// The application's configuration.
    pub config: Config,
    /// The session signing and verification keys.
    pub keys: SessionKeys,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub fn new(config: &Config) -> Result<Self> {
        let db = crate::db::create_pool(&config.database_url)?;
        tracing::info!("✅ PostgreSQL pool initialized");

        let keys = SessionKeys::new(&config.session_secret);
        tracing::info!("✅ Session keys derived");

        Ok(AppState {
            db,
            config: config.clone(),
            keys,
        })
    }
}
