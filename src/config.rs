//! Command line and environment configuration for the server.

use std::net::{IpAddr, Ipv4Addr};

use clap::Parser;
use time::Duration;

use crate::{AuthConfig, PasswordHash};

/// The REST API server for Budget Buddy.
///
/// Every option may also be set with the environment variable named in its help text.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// File path to the application SQLite database.
    #[arg(long, env = "DB_PATH")]
    pub db_path: String,

    /// The address to serve the API from.
    #[arg(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// The secret used to sign session tokens.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true, value_parser = parse_secret)]
    pub jwt_secret: String,

    /// How many days a session token stays valid.
    #[arg(long, env = "TOKEN_LIFETIME_DAYS", default_value_t = 30, value_parser = clap::value_parser!(u16).range(1..))]
    pub token_lifetime_days: u16,

    /// Require the current password when a user changes their password.
    #[arg(long, env = "REQUIRE_CURRENT_PASSWORD")]
    pub require_current_password: bool,

    /// The bcrypt cost for hashing new passwords.
    #[arg(long, env = "BCRYPT_COST", default_value_t = PasswordHash::DEFAULT_COST, value_parser = clap::value_parser!(u32).range(4..=31))]
    pub bcrypt_cost: u32,

    /// A browser origin that may call the API, e.g. `http://localhost:5173`.
    /// May be given more than once. Any origin is allowed if none are given.
    #[arg(long = "cors-origin", env = "CORS_ORIGIN", value_delimiter = ',')]
    pub cors_origins: Vec<String>,

    /// Directory containing an SSL certificate `cert.pem` and key `key.pem`.
    /// The server speaks plain HTTP when this is not set.
    #[arg(long, env = "CERT_PATH")]
    pub cert_path: Option<String>,
}

impl Config {
    /// The settings used to build the [crate::AppState].
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            jwt_secret: self.jwt_secret.clone(),
            token_lifetime: Duration::days(i64::from(self.token_lifetime_days)),
            bcrypt_cost: self.bcrypt_cost,
            require_current_password: self.require_current_password,
        }
    }
}

fn parse_secret(secret: &str) -> Result<String, String> {
    if secret.trim().is_empty() {
        return Err("the JWT secret must not be empty".to_owned());
    }

    Ok(secret.to_owned())
}
