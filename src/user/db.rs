//! Code for creating the user table and reading and writing users.

use email_address::EmailAddress;
use rusqlite::{Connection, Row};

use crate::{
    Error, PasswordHash,
    user::{User, UserID, Username},
};

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns a:
/// - [Error::DuplicateEmail] if `email` is already registered,
/// - [Error::SqlError] if some other SQL related error occurred.
pub fn create_user(
    username: Username,
    email: EmailAddress,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    connection.execute(
        "INSERT INTO user (username, email, password) VALUES (?1, ?2, ?3)",
        (username.as_ref(), email.as_str(), password_hash.as_ref()),
    )?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(User {
        id,
        username,
        email,
        password_hash,
    })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the store.
pub fn get_user_by_id(user_id: UserID, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, username, email, password FROM user WHERE id = :id")?
        .query_row(&[(":id", &user_id.as_i64())], map_row)
        .map_err(|error| error.into())
}

/// Get the user registered with exactly `email`.
///
/// # Errors
///
/// Returns [Error::NotFound] if no user has this email.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, username, email, password FROM user WHERE email = :email")?
        .query_row(&[(":email", &email)], map_row)
        .map_err(|error| error.into())
}

/// Overwrite the username and/or email of a user, leaving `None` fields unchanged.
///
/// # Errors
///
/// Returns a:
/// - [Error::NotFound] if the user does not exist,
/// - [Error::DuplicateEmail] if the new email belongs to another user.
pub fn update_profile(
    user_id: UserID,
    username: Option<&Username>,
    email: Option<&EmailAddress>,
    connection: &Connection,
) -> Result<User, Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET username = COALESCE(?1, username), email = COALESCE(?2, email)
         WHERE id = ?3",
        (
            username.map(|username| username.as_ref()),
            email.map(|email| email.as_str()),
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    get_user_by_id(user_id, connection)
}

/// Replace the stored password hash of a user.
///
/// # Errors
///
/// Returns [Error::NotFound] if the user does not exist.
pub fn update_password(
    user_id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash.as_ref(), user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_id = row.get(0)?;
    let raw_username: String = row.get(1)?;
    let raw_email: String = row.get(2)?;
    let raw_password_hash: String = row.get(3)?;

    Ok(User {
        id: UserID::new(raw_id),
        username: Username::new_unchecked(&raw_username),
        email: EmailAddress::new_unchecked(raw_email),
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
    })
}
