//! Ownership and consistency rules for transactions.

use rusqlite::Connection;

use crate::{
    Error,
    category::{Category, CategoryName, find_category_by_name},
    database_id::TransactionId,
    transaction::{
        NewTransaction, Transaction, TransactionChanges, TransactionDraft, TransactionFilter,
        TransactionForm, TransactionQuery, delete_transaction_row, get_transaction,
        insert_transaction, query_transactions, update_transaction_row,
    },
    user::UserID,
};

/// Find the category of `user_id` called `name`.
///
/// Categories of other users are never matched.
///
/// # Errors
///
/// Returns [Error::CategoryNotFound] if the user has no category with this name.
pub fn resolve_category(
    user_id: UserID,
    name: &CategoryName,
    connection: &Connection,
) -> Result<Category, Error> {
    find_category_by_name(user_id, name, connection)?
        .ok_or_else(|| Error::CategoryNotFound(name.to_string()))
}

/// Create a transaction for `user_id` from a request body.
///
/// # Errors
///
/// Returns a:
/// - [Error::Validation] if a required field is missing or a field is invalid,
/// - [Error::CategoryNotFound] if the user has no category with the given name.
pub fn create_transaction(
    user_id: UserID,
    form: TransactionForm,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let draft = TransactionDraft::try_from(form)?;
    let category = resolve_category(user_id, &draft.category, connection)?;

    let new_transaction = NewTransaction {
        kind: draft.kind,
        category_id: category.id,
        amount: draft.amount,
        date: draft.date,
        description: draft.description,
    };

    insert_transaction(user_id, &new_transaction, connection)
}

/// List the transactions of `user_id` that match `filter`, newest first.
///
/// Filtering by a category name the user does not have, or by an unknown
/// type, gives an empty list.
pub fn list_transactions(
    user_id: UserID,
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let Some(query) = build_query(user_id, filter, connection)? else {
        return Ok(Vec::new());
    };

    query_transactions(user_id, &query, connection)
}

/// Convert `filter` into a store query, resolving the category name.
///
/// Returns `None` when the filter names a category the user does not have
/// or a type that does not exist.
pub fn build_query(
    user_id: UserID,
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Option<TransactionQuery>, Error> {
    if filter.matches_nothing {
        return Ok(None);
    }

    let category_id = match &filter.category {
        Some(name) => match find_category_by_name(user_id, name, connection)? {
            Some(category) => Some(category.id),
            None => return Ok(None),
        },
        None => None,
    };

    Ok(Some(TransactionQuery {
        start_date: filter.start_date,
        end_date: filter.end_date,
        kind: filter.kind,
        category_id,
    }))
}

/// Get a transaction, checking that it belongs to `user_id`.
///
/// # Errors
///
/// Returns a:
/// - [Error::NotFound] if the transaction does not exist,
/// - [Error::Forbidden] if it belongs to another user.
pub fn get_owned_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = get_transaction(transaction_id, connection)?;

    if transaction.user_id != user_id {
        tracing::warn!(
            "User {user_id} tried to access transaction {transaction_id} owned by user {}",
            transaction.user_id
        );
        return Err(Error::Forbidden);
    }

    Ok(transaction)
}

/// Apply the supplied fields of `form` to a transaction owned by `user_id`.
///
/// A new category name is resolved against the user's own categories.
///
/// # Errors
///
/// Returns a:
/// - [Error::NotFound] or [Error::Forbidden] as for [get_owned_transaction],
/// - [Error::Validation] if a supplied field is invalid,
/// - [Error::CategoryNotFound] if the user has no category with the new name.
pub fn update_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    form: TransactionForm,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let mut transaction = get_owned_transaction(transaction_id, user_id, connection)?;
    let changes = TransactionChanges::try_from(form)?;

    if let Some(name) = changes.category {
        transaction.category_id = resolve_category(user_id, &name, connection)?.id;
    }

    if let Some(kind) = changes.kind {
        transaction.kind = kind;
    }

    if let Some(amount) = changes.amount {
        transaction.amount = amount;
    }

    if let Some(date) = changes.date {
        transaction.date = date;
    }

    if let Some(description) = changes.description {
        transaction.description = description;
    }

    update_transaction_row(&transaction, connection)?;

    get_transaction(transaction_id, connection)
}

/// Permanently delete a transaction owned by `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] or [Error::Forbidden] as for [get_owned_transaction].
pub fn delete_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    get_owned_transaction(transaction_id, user_id, connection)?;

    delete_transaction_row(transaction_id, connection)
}
