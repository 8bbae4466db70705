//! Password types.
//!
//! `RawPassword` wraps a plain text password supplied by a client.
//! `PasswordHash` converts a `RawPassword` into a salted and hashed password.

use std::fmt::Display;

use bcrypt::{hash, verify};
use serde::Deserialize;

use crate::Error;

/// A plain text password that has been checked for emptiness, but not yet hashed.
///
/// This struct can be used to construct a [PasswordHash].
#[derive(Clone, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct RawPassword(String);

impl RawPassword {
    /// Create a new password from a string.
    ///
    /// # Errors
    ///
    /// This function will return an error if the password is empty.
    pub fn new(raw_password_string: &str) -> Result<Self, Error> {
        if raw_password_string.is_empty() {
            Err(Error::Validation("password cannot be empty".to_owned()))
        } else {
            Ok(Self(raw_password_string.to_owned()))
        }
    }

    /// The plain text password.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RawPassword {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RawPassword::new(&value)
    }
}

// Keep passwords out of debug logs.
impl std::fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RawPassword").field(&"********").finish()
    }
}

impl Display for RawPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", str::repeat("*", 8))
    }
}

/// A salted and hashed password.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// An alias for the default encryption cost for hashing passwords.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Create a hashed password from a raw password with the specified `cost`.
    ///
    /// `cost` increases the rounds of hashing and therefore the time needed to verify a password.
    /// A value of at least 12 is recommended. Pass in [PasswordHash::DEFAULT_COST] to use the recommended cost.
    ///
    /// # Errors
    ///
    /// This function will return an error if the password could not be hashed.
    pub fn new(password: &RawPassword, cost: u32) -> Result<Self, Error> {
        match hash(&password.0, cost) {
            Ok(password_hash) => Ok(Self(password_hash)),
            Err(e) => Err(Error::HashingError(e.to_string())),
        }
    }

    /// Create a new `PasswordHash` without any validation.
    ///
    /// The caller should ensure that `raw_password_hash` is a valid password hash.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if an invalid hash is provided it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_owned())
    }

    /// Try to create a password hash from a raw password string.
    ///
    /// This is a convenience function that removes the need to manually create
    /// the intermediate `RawPassword` type.
    pub fn from_raw_password(raw_password: &str, cost: u32) -> Result<Self, Error> {
        let password = RawPassword::new(raw_password)?;
        PasswordHash::new(&password, cost)
    }

    /// Check that `password` matches the stored password.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if the stored hash is malformed.
    pub fn verify(&self, password: &RawPassword) -> Result<bool, Error> {
        verify(&password.0, &self.0).map_err(|error| Error::HashingError(error.to_string()))
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
