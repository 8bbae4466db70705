//! The endpoint for registering new users.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, PasswordHash, RawPassword,
    db::lock_connection,
    extract::{ApiJson, require},
    user::{UserProfile, Username, create_user, parse_email},
};

/// The state needed to register a user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The bcrypt cost used when hashing the password.
    pub bcrypt_cost: u32,
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            bcrypt_cost: state.bcrypt_cost,
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The data for registering a user.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    /// The name shown in the app.
    pub username: Option<String>,
    /// The address the user will log in with.
    pub email: Option<String>,
    /// The plain text password.
    pub password: Option<String>,
}

/// A route handler for registering a new user.
///
/// Responds with 201 and the new user's public profile. The password hash is
/// never part of the response.
///
/// # Errors
///
/// Returns a:
/// - [Error::Validation] if a field is missing or invalid,
/// - [Error::DuplicateEmail] if the email is already registered.
pub async fn register_user(
    State(state): State<RegistrationState>,
    ApiJson(form): ApiJson<RegisterForm>,
) -> Result<(StatusCode, Json<UserProfile>), Error> {
    let username = Username::new(&require(form.username, "username")?)?;
    let email = parse_email(&require(form.email, "email")?)?;
    let password = RawPassword::new(&require(form.password, "password")?)?;

    let password_hash = PasswordHash::new(&password, state.bcrypt_cost)?;

    let connection = lock_connection(&state.db_connection)?;
    let user = create_user(username, email, password_hash, &connection)?;

    tracing::info!("Registered user {}", user.id);

    Ok((StatusCode::CREATED, Json(UserProfile::from(&user))))
}
