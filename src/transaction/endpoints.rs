//! Route handlers for transactions.

use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{
    Error,
    database_id::TransactionId,
    db::{DatabaseState, lock_connection},
    extract::{ApiJson, ApiPath, ApiQuery},
    transaction::{
        Transaction, TransactionFilter, TransactionFilterQuery, TransactionForm,
        create_transaction, delete_transaction, list_transactions, update_transaction,
    },
    user::{MessageResponse, UserID},
};

/// A route handler for creating a new transaction.
pub async fn create_transaction_endpoint(
    State(state): State<DatabaseState>,
    Extension(user_id): Extension<UserID>,
    ApiJson(form): ApiJson<TransactionForm>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let connection = lock_connection(&state.db_connection)?;
    let transaction = create_transaction(user_id, form, &connection)?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// A route handler for listing the logged-in user's transactions, newest first.
pub async fn list_transactions_endpoint(
    State(state): State<DatabaseState>,
    Extension(user_id): Extension<UserID>,
    ApiQuery(query): ApiQuery<TransactionFilterQuery>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let filter = TransactionFilter::try_from(query)?;
    let connection = lock_connection(&state.db_connection)?;

    list_transactions(user_id, &filter, &connection).map(Json)
}

/// A route handler for changing some or all fields of a transaction.
pub async fn update_transaction_endpoint(
    State(state): State<DatabaseState>,
    Extension(user_id): Extension<UserID>,
    ApiPath(transaction_id): ApiPath<TransactionId>,
    ApiJson(form): ApiJson<TransactionForm>,
) -> Result<Json<Transaction>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    update_transaction(transaction_id, user_id, form, &connection).map(Json)
}

/// A route handler for deleting a transaction.
pub async fn delete_transaction_endpoint(
    State(state): State<DatabaseState>,
    Extension(user_id): Extension<UserID>,
    ApiPath(transaction_id): ApiPath<TransactionId>,
) -> Result<Json<MessageResponse>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    delete_transaction(transaction_id, user_id, &connection)?;

    Ok(Json(MessageResponse {
        message: "Transaction removed".to_owned(),
    }))
}
