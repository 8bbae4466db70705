//! The endpoint for logging in with an email and password.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error, RawPassword,
    auth::{TokenKeys, encode_token},
    db::lock_connection,
    extract::{ApiJson, require},
    user::{UserProfile, get_user_by_email},
};

/// The state needed to log in a user.
#[derive(Clone)]
pub struct LogInState {
    /// The keys for signing session tokens.
    pub token_keys: TokenKeys,
    /// How long a session token stays valid after it is issued.
    pub token_lifetime: Duration,
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            token_keys: state.token_keys.clone(),
            token_lifetime: state.token_lifetime,
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The credentials entered when logging in.
#[derive(Debug, Deserialize)]
pub struct LogInForm {
    /// Email entered during log-in.
    pub email: Option<String>,
    /// Password entered during log-in.
    pub password: Option<String>,
}

/// A session token together with the profile of the user it belongs to.
#[derive(Debug, Serialize, Deserialize)]
pub struct LogInResponse {
    /// The bearer token to send with later requests.
    pub token: String,
    /// The user who logged in.
    #[serde(flatten)]
    pub user: UserProfile,
}

/// Handler for log-in requests.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The email or password is missing.
/// - The email does not belong to a registered user.
/// - The password is not correct.
/// - An internal error occurred when verifying the password or signing the token.
///
/// An unknown email and a wrong password both give [Error::InvalidCredentials].
pub async fn log_in(
    State(state): State<LogInState>,
    ApiJson(form): ApiJson<LogInForm>,
) -> Result<Json<LogInResponse>, Error> {
    let email = require(form.email, "email")?;
    let password = RawPassword::new(&require(form.password, "password")?)?;

    let user = {
        let connection = lock_connection(&state.db_connection)?;

        match get_user_by_email(email.trim(), &connection) {
            Ok(user) => user,
            Err(Error::NotFound) => return Err(Error::InvalidCredentials),
            Err(error) => return Err(error),
        }
    };

    if !user.password_hash.verify(&password)? {
        return Err(Error::InvalidCredentials);
    }

    let token = encode_token(user.id, state.token_lifetime, &state.token_keys)?;

    tracing::info!("User {} logged in", user.id);

    Ok(Json(LogInResponse {
        token,
        user: UserProfile::from(&user),
    }))
}
