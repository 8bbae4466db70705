//! Schema setup and shared access to the application's SQLite database.

use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::FromRef;
use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    AppState, Error, category::create_category_table, transaction::create_transaction_table,
    user::create_user_table,
};

/// Create the tables for users, categories and transactions if they do not
/// already exist.
///
/// # Errors
///
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Acquire the database connection.
///
/// # Errors
///
/// Returns [Error::DatabaseLockError] if the mutex was poisoned.
pub fn lock_connection(
    db_connection: &Mutex<Connection>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
}

/// The state needed by endpoints that only touch the database.
#[derive(Debug, Clone)]
pub struct DatabaseState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DatabaseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
