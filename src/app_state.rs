//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use time::Duration;

use crate::{
    Error,
    auth::{DEFAULT_TOKEN_LIFETIME, PasswordHash, TokenKeys},
    db::initialize,
};

/// The settings that control how users authenticate.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// The secret used to sign session tokens.
    pub jwt_secret: String,

    /// How long a session token stays valid after it is issued.
    pub token_lifetime: Duration,

    /// The bcrypt cost used when hashing new passwords.
    pub bcrypt_cost: u32,

    /// Whether changing a password requires the current password.
    pub require_current_password: bool,
}

impl AuthConfig {
    /// Create a config with the default token lifetime, hashing cost and
    /// password policy.
    pub fn new(jwt_secret: &str) -> Self {
        Self {
            jwt_secret: jwt_secret.to_owned(),
            token_lifetime: DEFAULT_TOKEN_LIFETIME,
            bcrypt_cost: PasswordHash::DEFAULT_COST,
            require_current_password: false,
        }
    }
}

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The keys for signing and verifying session tokens.
    pub token_keys: TokenKeys,

    /// How long a session token stays valid after it is issued.
    pub token_lifetime: Duration,

    /// The bcrypt cost used when hashing new passwords.
    pub bcrypt_cost: u32,

    /// Whether changing a password requires the current password.
    pub require_current_password: bool,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, config: AuthConfig) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            token_keys: TokenKeys::from_secret(&config.jwt_secret),
            token_lifetime: config.token_lifetime,
            bcrypt_cost: config.bcrypt_cost,
            require_current_password: config.require_current_password,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}
