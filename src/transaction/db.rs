//! Database operations for transactions.

use rusqlite::{Connection, Row, params_from_iter, types::Value};
use time::{Date, OffsetDateTime};

use crate::{
    Error, TransactionType,
    category::CategoryName,
    database_id::{CategoryId, TransactionId},
    transaction::{NewTransaction, Transaction},
    user::UserID,
};

/// Create the transaction table and indexes.
///
/// `category_id` has no foreign key. Whether a category may be deleted is
/// decided by the category service.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            type TEXT NOT NULL,
            category_id INTEGER NOT NULL,
            amount REAL NOT NULL,
            date TEXT NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);
        CREATE INDEX IF NOT EXISTS idx_transaction_category_id ON \"transaction\"(category_id);",
    )?;

    Ok(())
}

const SELECT_TRANSACTION: &str = "SELECT \"transaction\".id, \"transaction\".user_id, \
    \"transaction\".type, \"transaction\".category_id, category.name, \"transaction\".amount, \
    \"transaction\".date, \"transaction\".description, \"transaction\".created_at \
    FROM \"transaction\" LEFT JOIN category ON \"transaction\".category_id = category.id";

/// Insert a transaction for `user_id`, stamped with the current time.
///
/// The caller must make sure the category belongs to `user_id`.
pub fn insert_transaction(
    user_id: UserID,
    transaction: &NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection.execute(
        "INSERT INTO \"transaction\" (user_id, type, category_id, amount, date, description, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        (
            user_id.as_i64(),
            transaction.kind,
            transaction.category_id,
            transaction.amount,
            transaction.date,
            transaction.description.as_deref(),
            OffsetDateTime::now_utc(),
        ),
    )?;

    get_transaction(connection.last_insert_rowid(), connection)
}

/// Retrieve a transaction by its ID.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no transaction with `id`.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    connection
        .prepare(&format!("{SELECT_TRANSACTION} WHERE \"transaction\".id = :id"))?
        .query_row(&[(":id", &id)], map_transaction_row)
        .map_err(|error| error.into())
}

/// Filters applied by [query_transactions]. `None` fields do not filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    /// The earliest date to include, inclusive.
    pub start_date: Option<Date>,
    /// The latest date to include, inclusive.
    pub end_date: Option<Date>,
    /// Only include this type.
    pub kind: Option<TransactionType>,
    /// Only include transactions in this category.
    pub category_id: Option<CategoryId>,
}

/// Get the transactions of `user_id` matching every filter in `query`.
///
/// Transactions are sorted newest date first, and then by most recently recorded.
pub fn query_transactions(
    user_id: UserID,
    query: &TransactionQuery,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut where_clause = vec!["\"transaction\".user_id = ?".to_owned()];
    let mut params = vec![Value::Integer(user_id.as_i64())];

    if let Some(start_date) = query.start_date {
        where_clause.push("\"transaction\".date >= ?".to_owned());
        params.push(Value::Text(start_date.to_string()));
    }

    if let Some(end_date) = query.end_date {
        where_clause.push("\"transaction\".date <= ?".to_owned());
        params.push(Value::Text(end_date.to_string()));
    }

    if let Some(kind) = query.kind {
        where_clause.push("\"transaction\".type = ?".to_owned());
        params.push(Value::Text(kind.as_str().to_owned()));
    }

    if let Some(category_id) = query.category_id {
        where_clause.push("\"transaction\".category_id = ?".to_owned());
        params.push(Value::Integer(category_id));
    }

    let sql = format!(
        "{SELECT_TRANSACTION} WHERE {} \
        ORDER BY \"transaction\".date DESC, \"transaction\".created_at DESC, \"transaction\".id DESC",
        where_clause.join(" AND ")
    );

    connection
        .prepare(&sql)?
        .query_map(params_from_iter(params), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(|error| error.into()))
        .collect()
}

/// Overwrite the editable fields of a transaction.
///
/// # Errors
///
/// Returns [Error::NotFound] if the transaction does not exist.
pub fn update_transaction_row(
    transaction: &Transaction,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE \"transaction\" SET type = ?1, category_id = ?2, amount = ?3, date = ?4, description = ?5
         WHERE id = ?6",
        (
            transaction.kind,
            transaction.category_id,
            transaction.amount,
            transaction.date,
            transaction.description.as_deref(),
            transaction.id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete a transaction by ID.
///
/// # Errors
///
/// Returns [Error::NotFound] if the transaction does not exist.
pub fn delete_transaction_row(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Count the transactions of `user_id` that use the category `category_id`.
pub fn count_transactions_in_category(
    user_id: UserID,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<usize, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM \"transaction\" WHERE user_id = ?1 AND category_id = ?2",
            (user_id.as_i64(), category_id),
            |row| row.get::<_, i64>(0),
        )
        .map(|count| usize::try_from(count).unwrap_or_default())
        .map_err(|error| error.into())
}

/// Map a row selected with the columns of [SELECT_TRANSACTION] to a [Transaction].
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let category = row
        .get::<usize, Option<String>>(4)?
        .map(|name| CategoryName::new_unchecked(&name));

    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        kind: row.get(2)?,
        category_id: row.get(3)?,
        category,
        amount: row.get(5)?,
        date: row.get(6)?,
        description: row.get(7)?,
        created_at: row.get(8)?,
    })
}

#[cfg(test)]
mod transaction_query_tests {
    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        Error, PasswordHash, TransactionType,
        category::{Category, CategoryName, insert_category},
        db::initialize,
        user::{UserID, Username, create_user, parse_email},
    };

    use super::{
        NewTransaction, TransactionQuery, count_transactions_in_category, delete_transaction_row,
        get_transaction, insert_transaction, query_transactions, update_transaction_row,
    };

    fn get_test_db_connection() -> (Connection, UserID, Category) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        let user_id = create_user(
            Username::new_unchecked("ana"),
            parse_email("a@x.com").unwrap(),
            PasswordHash::new_unchecked("hash"),
            &connection,
        )
        .unwrap()
        .id;
        let category = insert_category(
            user_id,
            CategoryName::new_unchecked("food"),
            TransactionType::Expense,
            &connection,
        )
        .unwrap();

        (connection, user_id, category)
    }

    fn new_transaction(
        kind: TransactionType,
        category_id: i64,
        amount: f64,
        date: Date,
    ) -> NewTransaction {
        NewTransaction {
            kind,
            category_id,
            amount,
            date,
            description: None,
        }
    }

    #[test]
    fn insert_transaction_succeeds() {
        let (connection, user_id, category) = get_test_db_connection();
        let new = NewTransaction {
            description: Some("lunch".to_owned()),
            ..new_transaction(
                TransactionType::Expense,
                category.id,
                50.0,
                date!(2024 - 01 - 01),
            )
        };

        let transaction = insert_transaction(user_id, &new, &connection).unwrap();

        assert!(transaction.id > 0);
        assert_eq!(transaction.user_id, user_id);
        assert_eq!(transaction.kind, TransactionType::Expense);
        assert_eq!(transaction.category_id, category.id);
        assert_eq!(transaction.category, Some(category.name));
        assert_eq!(transaction.amount, 50.0);
        assert_eq!(transaction.date, date!(2024 - 01 - 01));
        assert_eq!(transaction.description.as_deref(), Some("lunch"));
    }

    #[test]
    fn get_transaction_fails_on_missing_id() {
        let (connection, _, _) = get_test_db_connection();

        assert_eq!(get_transaction(1337, &connection), Err(Error::NotFound));
    }

    #[test]
    fn query_filters_by_date_range_inclusive() {
        let (connection, user_id, category) = get_test_db_connection();
        let dates = [
            date!(2023 - 12 - 31),
            date!(2024 - 01 - 01),
            date!(2024 - 01 - 31),
            date!(2024 - 02 - 01),
        ];
        for date in dates {
            let new = new_transaction(TransactionType::Expense, category.id, 1.0, date);
            insert_transaction(user_id, &new, &connection).unwrap();
        }

        let got = query_transactions(
            user_id,
            &TransactionQuery {
                start_date: Some(date!(2024 - 01 - 01)),
                end_date: Some(date!(2024 - 01 - 31)),
                ..Default::default()
            },
            &connection,
        )
        .unwrap();

        let got_dates: Vec<Date> = got.iter().map(|transaction| transaction.date).collect();
        assert_eq!(got_dates, [date!(2024 - 01 - 31), date!(2024 - 01 - 01)]);
    }

    #[test]
    fn query_filters_by_type_and_category() {
        let (connection, user_id, food) = get_test_db_connection();
        let salary = insert_category(
            user_id,
            CategoryName::new_unchecked("salary"),
            TransactionType::Income,
            &connection,
        )
        .unwrap();
        let today = date!(2024 - 01 - 01);
        let lunch = insert_transaction(
            user_id,
            &new_transaction(TransactionType::Expense, food.id, 10.0, today),
            &connection,
        )
        .unwrap();
        let pay = insert_transaction(
            user_id,
            &new_transaction(TransactionType::Income, salary.id, 100.0, today),
            &connection,
        )
        .unwrap();

        let incomes = query_transactions(
            user_id,
            &TransactionQuery {
                kind: Some(TransactionType::Income),
                ..Default::default()
            },
            &connection,
        )
        .unwrap();
        let food_only = query_transactions(
            user_id,
            &TransactionQuery {
                category_id: Some(food.id),
                ..Default::default()
            },
            &connection,
        )
        .unwrap();

        assert_eq!(incomes, vec![pay]);
        assert_eq!(food_only, vec![lunch]);
    }

    #[test]
    fn query_only_returns_own_transactions() {
        let (connection, user_id, category) = get_test_db_connection();
        let other_user = create_user(
            Username::new_unchecked("bo"),
            parse_email("b@x.com").unwrap(),
            PasswordHash::new_unchecked("hash"),
            &connection,
        )
        .unwrap()
        .id;
        insert_transaction(
            user_id,
            &new_transaction(
                TransactionType::Expense,
                category.id,
                1.0,
                date!(2024 - 01 - 01),
            ),
            &connection,
        )
        .unwrap();

        let got = query_transactions(other_user, &TransactionQuery::default(), &connection);

        assert_eq!(got, Ok(vec![]));
    }

    #[test]
    fn query_orders_same_day_by_most_recent_first() {
        let (connection, user_id, category) = get_test_db_connection();
        let today = date!(2024 - 01 - 01);
        let first = insert_transaction(
            user_id,
            &new_transaction(TransactionType::Expense, category.id, 1.0, today),
            &connection,
        )
        .unwrap();
        let second = insert_transaction(
            user_id,
            &new_transaction(TransactionType::Expense, category.id, 2.0, today),
            &connection,
        )
        .unwrap();

        let got = query_transactions(user_id, &TransactionQuery::default(), &connection).unwrap();

        assert_eq!(got, vec![second, first]);
    }

    #[test]
    fn update_transaction_row_succeeds() {
        let (connection, user_id, category) = get_test_db_connection();
        let mut transaction = insert_transaction(
            user_id,
            &new_transaction(
                TransactionType::Expense,
                category.id,
                1.0,
                date!(2024 - 01 - 01),
            ),
            &connection,
        )
        .unwrap();
        transaction.amount = 99.5;
        transaction.description = Some("updated".to_owned());

        update_transaction_row(&transaction, &connection).unwrap();

        assert_eq!(get_transaction(transaction.id, &connection), Ok(transaction));
    }

    #[test]
    fn delete_transaction_row_fails_on_missing_id() {
        let (connection, _, _) = get_test_db_connection();

        assert_eq!(delete_transaction_row(42, &connection), Err(Error::NotFound));
    }

    #[test]
    fn count_transactions_in_category_counts_references() {
        let (connection, user_id, category) = get_test_db_connection();
        assert_eq!(
            count_transactions_in_category(user_id, category.id, &connection),
            Ok(0)
        );

        let transaction = insert_transaction(
            user_id,
            &new_transaction(
                TransactionType::Expense,
                category.id,
                1.0,
                date!(2024 - 01 - 01),
            ),
            &connection,
        )
        .unwrap();

        assert_eq!(
            count_transactions_in_category(user_id, category.id, &connection),
            Ok(1)
        );

        delete_transaction_row(transaction.id, &connection).unwrap();

        assert_eq!(
            count_transactions_in_category(user_id, category.id, &connection),
            Ok(0)
        );
    }
}
