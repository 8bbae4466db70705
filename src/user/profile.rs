//! Endpoints for reading and changing the logged-in user's account.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, PasswordHash, RawPassword,
    db::{DatabaseState, lock_connection},
    extract::{ApiJson, require},
    user::{
        UserID, UserProfile, Username, get_user_by_id, parse_email, update_password,
        update_profile,
    },
};

/// A plain confirmation message.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// The human readable message.
    pub message: String,
}

/// Route handler that returns the profile of the logged-in user.
pub async fn get_me(
    State(state): State<DatabaseState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<UserProfile>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let user = get_user_by_id(user_id, &connection)?;

    Ok(Json(UserProfile::from(&user)))
}

/// The fields a user may change on their profile.
///
/// Only the username and email can be changed here.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    /// The new display name.
    pub username: Option<String>,
    /// The new login email.
    pub email: Option<String>,
}

/// Route handler for changing the username and/or email of the logged-in user.
///
/// # Errors
///
/// Returns a:
/// - [Error::Validation] if neither field is given or a field is invalid,
/// - [Error::DuplicateEmail] if the new email belongs to another user.
pub async fn update_profile_endpoint(
    State(state): State<DatabaseState>,
    Extension(user_id): Extension<UserID>,
    ApiJson(form): ApiJson<ProfileForm>,
) -> Result<Json<UserProfile>, Error> {
    if form.username.is_none() && form.email.is_none() {
        return Err(Error::Validation(
            "provide a username or email to update".to_owned(),
        ));
    }

    let username = form.username.as_deref().map(Username::new).transpose()?;
    let email = form.email.as_deref().map(parse_email).transpose()?;

    let connection = lock_connection(&state.db_connection)?;
    let user = update_profile(user_id, username.as_ref(), email.as_ref(), &connection)?;

    Ok(Json(UserProfile::from(&user)))
}

/// The state needed to change a password.
#[derive(Debug, Clone)]
pub struct ChangePasswordState {
    /// The bcrypt cost used when hashing the new password.
    pub bcrypt_cost: u32,
    /// Whether the current password must be supplied and verified.
    pub require_current_password: bool,
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ChangePasswordState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            bcrypt_cost: state.bcrypt_cost,
            require_current_password: state.require_current_password,
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The body of a password change request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordForm {
    /// The password to switch to.
    pub new_password: Option<String>,
    /// The password in use now. Only checked when the server requires it.
    pub current_password: Option<String>,
}

/// Route handler for changing the password of the logged-in user.
///
/// # Errors
///
/// Returns a:
/// - [Error::Validation] if the new password is missing or empty,
/// - [Error::InvalidCredentials] if the server requires the current password
///   and it is missing or wrong.
pub async fn change_password(
    State(state): State<ChangePasswordState>,
    Extension(user_id): Extension<UserID>,
    ApiJson(form): ApiJson<ChangePasswordForm>,
) -> Result<Json<MessageResponse>, Error> {
    let new_password = RawPassword::new(&require(form.new_password, "newPassword")?)?;

    if state.require_current_password {
        let current_password = form
            .current_password
            .as_deref()
            .map(RawPassword::new)
            .transpose()
            .map_err(|_| Error::InvalidCredentials)?
            .ok_or(Error::InvalidCredentials)?;

        let user = {
            let connection = lock_connection(&state.db_connection)?;
            get_user_by_id(user_id, &connection)?
        };

        if !user.password_hash.verify(&current_password)? {
            return Err(Error::InvalidCredentials);
        }
    }

    let password_hash = PasswordHash::new(&new_password, state.bcrypt_cost)?;

    let connection = lock_connection(&state.db_connection)?;
    update_password(user_id, &password_hash, &connection)?;

    tracing::info!("User {user_id} changed their password");

    Ok(Json(MessageResponse {
        message: "Password changed successfully".to_owned(),
    }))
}

#[cfg(test)]
mod profile_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;

    use crate::{
        Error, PasswordHash, RawPassword,
        db::{DatabaseState, initialize},
        extract::ApiJson,
        user::{User, Username, create_user, get_user_by_id, parse_email},
    };

    use super::{
        ChangePasswordForm, ChangePasswordState, ProfileForm, change_password, get_me,
        update_profile_endpoint,
    };

    fn get_connection_with_users() -> (Arc<Mutex<Connection>>, User, User) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let ana = create_user(
            Username::new("ana").unwrap(),
            parse_email("a@x.com").unwrap(),
            PasswordHash::from_raw_password("pw1", 4).unwrap(),
            &connection,
        )
        .unwrap();
        let bo = create_user(
            Username::new("bo").unwrap(),
            parse_email("b@x.com").unwrap(),
            PasswordHash::from_raw_password("pw2", 4).unwrap(),
            &connection,
        )
        .unwrap();

        (Arc::new(Mutex::new(connection)), ana, bo)
    }

    fn password_state(
        db_connection: Arc<Mutex<Connection>>,
        require_current_password: bool,
    ) -> ChangePasswordState {
        ChangePasswordState {
            bcrypt_cost: 4,
            require_current_password,
            db_connection,
        }
    }

    fn password_form(new_password: &str, current_password: Option<&str>) -> ChangePasswordForm {
        ChangePasswordForm {
            new_password: Some(new_password.to_owned()),
            current_password: current_password.map(str::to_owned),
        }
    }

    fn password_matches(db_connection: &Mutex<Connection>, user: &User, password: &str) -> bool {
        let connection = db_connection.lock().unwrap();
        get_user_by_id(user.id, &connection)
            .unwrap()
            .password_hash
            .verify(&RawPassword::new(password).unwrap())
            .unwrap()
    }

    #[tokio::test]
    async fn me_returns_own_profile() {
        let (db_connection, ana, _) = get_connection_with_users();

        let Json(profile) = get_me(State(DatabaseState { db_connection }), Extension(ana.id))
            .await
            .unwrap();

        assert_eq!(profile.id, ana.id);
        assert_eq!(profile.username, "ana");
    }

    #[tokio::test]
    async fn update_profile_changes_username() {
        let (db_connection, ana, _) = get_connection_with_users();

        let Json(profile) = update_profile_endpoint(
            State(DatabaseState { db_connection }),
            Extension(ana.id),
            ApiJson(ProfileForm {
                username: Some("Ana M".to_owned()),
                email: None,
            }),
        )
        .await
        .unwrap();

        assert_eq!(profile.username, "Ana M");
        assert_eq!(profile.email, "a@x.com");
    }

    #[tokio::test]
    async fn update_profile_rejects_taken_email() {
        let (db_connection, ana, _) = get_connection_with_users();

        let response = update_profile_endpoint(
            State(DatabaseState { db_connection }),
            Extension(ana.id),
            ApiJson(ProfileForm {
                username: None,
                email: Some("b@x.com".to_owned()),
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_profile_requires_a_field() {
        let (db_connection, ana, _) = get_connection_with_users();

        let result = update_profile_endpoint(
            State(DatabaseState { db_connection }),
            Extension(ana.id),
            ApiJson(ProfileForm {
                username: None,
                email: None,
            }),
        )
        .await;

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn change_password_without_current_password() {
        let (db_connection, ana, bo) = get_connection_with_users();
        let state = password_state(db_connection.clone(), false);

        change_password(
            State(state),
            Extension(ana.id),
            ApiJson(password_form("new-pw", None)),
        )
        .await
        .unwrap();

        assert!(password_matches(&db_connection, &ana, "new-pw"));
        assert!(!password_matches(&db_connection, &ana, "pw1"));
        assert!(password_matches(&db_connection, &bo, "pw2"));
    }

    #[tokio::test]
    async fn change_password_rejects_empty_password() {
        let (db_connection, ana, _) = get_connection_with_users();
        let state = password_state(db_connection, false);

        let result = change_password(
            State(state),
            Extension(ana.id),
            ApiJson(password_form("", None)),
        )
        .await;

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn change_password_policy_requires_current_password() {
        let (db_connection, ana, _) = get_connection_with_users();
        let state = password_state(db_connection.clone(), true);

        let missing = change_password(
            State(state.clone()),
            Extension(ana.id),
            ApiJson(password_form("new-pw", None)),
        )
        .await;
        let wrong = change_password(
            State(state),
            Extension(ana.id),
            ApiJson(password_form("new-pw", Some("nope"))),
        )
        .await;

        assert!(matches!(missing, Err(Error::InvalidCredentials)));
        assert!(matches!(wrong, Err(Error::InvalidCredentials)));
        assert!(password_matches(&db_connection, &ana, "pw1"));
    }

    #[tokio::test]
    async fn change_password_policy_accepts_correct_current_password() {
        let (db_connection, ana, _) = get_connection_with_users();
        let state = password_state(db_connection.clone(), true);

        change_password(
            State(state),
            Extension(ana.id),
            ApiJson(password_form("new-pw", Some("pw1"))),
        )
        .await
        .unwrap();

        assert!(password_matches(&db_connection, &ana, "new-pw"));
    }
}
