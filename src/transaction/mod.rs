//! Transactions: dated, typed amounts of money in one of the user's categories.

mod db;
mod domain;
mod endpoints;
mod service;

pub use db::{
    TransactionQuery, count_transactions_in_category, create_transaction_table,
    delete_transaction_row, get_transaction, insert_transaction, query_transactions,
    update_transaction_row,
};
pub use domain::{
    NewTransaction, Transaction, TransactionChanges, TransactionDraft, TransactionFilter,
    TransactionFilterQuery, TransactionForm, parse_date,
};
pub use endpoints::{
    create_transaction_endpoint, delete_transaction_endpoint, list_transactions_endpoint,
    update_transaction_endpoint,
};
pub use service::{
    build_query, create_transaction, delete_transaction, list_transactions, update_transaction,
};
