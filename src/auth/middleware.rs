//! Authentication middleware that validates bearer tokens.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::{TokenKeys, decode_token},
    db::lock_connection,
    user::{UserID, get_user_by_id},
};

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The keys for verifying session tokens.
    pub token_keys: TokenKeys,
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            token_keys: state.token_keys.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Middleware function that checks for a valid bearer token.
/// The user ID is placed into request and then the request executed normally if the token is
/// valid and the user still exists, otherwise a 401 JSON error is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    let user_id = match authenticate(&state, &request) {
        Ok(user_id) => user_id,
        Err(error) => return error.into_response(),
    };

    let (mut parts, body) = request.into_parts();
    parts.extensions.insert(user_id);
    let request = Request::from_parts(parts, body);

    next.run(request).await
}

fn authenticate(state: &AuthState, request: &Request) -> Result<UserID, Error> {
    let bearer = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(Error::Unauthenticated)?;

    let claims = decode_token(bearer.token(), &state.token_keys)?;

    let connection = lock_connection(&state.db_connection)?;
    match get_user_by_id(claims.id, &connection) {
        Ok(user) => Ok(user.id),
        Err(Error::NotFound) => {
            tracing::debug!("Token for unknown user {}", claims.id);
            Err(Error::Unauthenticated)
        }
        Err(error) => Err(error),
    }
}
