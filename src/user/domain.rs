//! The user model and the public projection that is safe to send to clients.

use std::{fmt::Display, str::FromStr};

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::{Error, PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserID(i64);

impl UserID {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A display name, trimmed and guaranteed not to be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// Create a username from `name` with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// Returns an [Error::Validation] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            Err(Error::Validation("username cannot be empty".to_owned()))
        } else {
            Ok(Self(trimmed.to_owned()))
        }
    }

    /// Create a username without any validation.
    ///
    /// The caller should ensure `name` came from [Username::new], e.g. a database row.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Check that `raw_email` is a syntactically valid email address.
///
/// Surrounding whitespace is ignored, but case is preserved: two addresses
/// that differ only in case belong to different users.
///
/// # Errors
///
/// Returns an [Error::Validation] if the address is malformed.
pub fn parse_email(raw_email: &str) -> Result<EmailAddress, Error> {
    EmailAddress::from_str(raw_email.trim())
        .map_err(|error| Error::Validation(format!("invalid email address: {error}")))
}

/// A registered user of the application.
///
/// This type carries the password hash and therefore is never serialized.
/// Convert it into a [UserProfile] before sending it to a client.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The name shown in the app.
    pub username: Username,
    /// The address the user logs in with.
    pub email: EmailAddress,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// The public projection of a [User].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The user's ID in the application database.
    pub id: UserID,
    /// The name shown in the app.
    pub username: String,
    /// The address the user logs in with.
    pub email: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.as_ref().to_owned(),
            email: user.email.as_str().to_owned(),
        }
    }
}
