//! A lenient view of stored transactions for building reports.

use rusqlite::{Connection, Row, params_from_iter, types::Value};
use time::Date;

use crate::{
    Error, TransactionType,
    transaction::{TransactionQuery, parse_date},
    user::UserID,
};

/// One transaction as seen by the reports.
///
/// Reports never fail on malformed stored data: a bad amount reads as 0,
/// a bad date as `None` and an unknown type as `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    /// When the transaction happened, if the stored date could be read.
    pub date: Option<Date>,
    /// Whether money came in or went out, if the stored type is known.
    pub kind: Option<TransactionType>,
    /// The amount of money. Always finite.
    pub amount: f64,
    /// The current name of the category, if it still exists.
    pub category: Option<String>,
    /// A text description of what the transaction was for.
    pub description: Option<String>,
}

/// Load the entries of `user_id` that match `query`, newest first.
///
/// Type and category are matched in SQL. Date bounds are checked after the
/// dates have been parsed, so an entry without a readable date is left out
/// whenever a bound is set.
pub fn load_report_entries(
    user_id: UserID,
    query: &TransactionQuery,
    connection: &Connection,
) -> Result<Vec<ReportEntry>, Error> {
    let mut where_clause = vec!["\"transaction\".user_id = ?".to_owned()];
    let mut params = vec![Value::Integer(user_id.as_i64())];

    if let Some(kind) = query.kind {
        where_clause.push("lower(trim(\"transaction\".type)) = ?".to_owned());
        params.push(Value::Text(kind.as_str().to_owned()));
    }

    if let Some(category_id) = query.category_id {
        where_clause.push("\"transaction\".category_id = ?".to_owned());
        params.push(Value::Integer(category_id));
    }

    let sql = format!(
        "SELECT \"transaction\".date, \"transaction\".type, \"transaction\".amount, \
        category.name, \"transaction\".description \
        FROM \"transaction\" LEFT JOIN category ON \"transaction\".category_id = category.id \
        WHERE {} \
        ORDER BY \"transaction\".date DESC, \"transaction\".created_at DESC, \"transaction\".id DESC",
        where_clause.join(" AND ")
    );

    let entries = connection
        .prepare(&sql)?
        .query_map(params_from_iter(params), map_entry_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(entries
        .into_iter()
        .filter(|entry| is_within_dates(entry.date, query.start_date, query.end_date))
        .collect())
}

fn is_within_dates(date: Option<Date>, start_date: Option<Date>, end_date: Option<Date>) -> bool {
    if start_date.is_none() && end_date.is_none() {
        return true;
    }

    let Some(date) = date else {
        return false;
    };

    start_date.is_none_or(|start_date| date >= start_date)
        && end_date.is_none_or(|end_date| date <= end_date)
}

fn map_entry_row(row: &Row) -> Result<ReportEntry, rusqlite::Error> {
    let date = match row.get::<_, Value>(0)? {
        Value::Text(text) => parse_date(&text).ok(),
        _ => None,
    };

    let kind = match row.get::<_, Value>(1)? {
        Value::Text(text) => text.parse::<TransactionType>().ok(),
        _ => None,
    };

    let amount = match row.get::<_, Value>(2)? {
        Value::Real(amount) => amount,
        Value::Integer(amount) => amount as f64,
        Value::Text(text) => text.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };

    Ok(ReportEntry {
        date,
        kind,
        amount: if amount.is_finite() { amount } else { 0.0 },
        category: row.get(3)?,
        description: row.get(4)?,
    })
}

#[cfg(test)]
mod report_entry_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        PasswordHash, TransactionType,
        category::{CategoryName, insert_category},
        db::initialize,
        transaction::{NewTransaction, TransactionQuery, insert_transaction},
        user::{UserID, Username, create_user, parse_email},
    };

    use super::{ReportEntry, load_report_entries};

    fn get_test_connection() -> (Connection, UserID, i64) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let user_id = create_user(
            Username::new_unchecked("ana"),
            parse_email("a@x.com").unwrap(),
            PasswordHash::new_unchecked("hash"),
            &connection,
        )
        .unwrap()
        .id;
        let category_id = insert_category(
            user_id,
            CategoryName::new_unchecked("food"),
            TransactionType::Expense,
            &connection,
        )
        .unwrap()
        .id;

        (connection, user_id, category_id)
    }

    fn insert_raw(
        connection: &Connection,
        user_id: UserID,
        category_id: i64,
        kind: &str,
        amount: &str,
        date: &str,
    ) {
        connection
            .execute(
                "INSERT INTO \"transaction\" (user_id, type, category_id, amount, date, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, '2024-01-01T00:00:00Z')",
                (user_id.as_i64(), kind, category_id, amount, date),
            )
            .unwrap();
    }

    #[test]
    fn reads_valid_transactions() {
        let (connection, user_id, category_id) = get_test_connection();
        insert_transaction(
            user_id,
            &NewTransaction {
                kind: TransactionType::Expense,
                category_id,
                amount: 50.0,
                date: date!(2024 - 01 - 01),
                description: Some("lunch".to_owned()),
            },
            &connection,
        )
        .unwrap();

        let entries = load_report_entries(user_id, &TransactionQuery::default(), &connection);

        assert_eq!(
            entries,
            Ok(vec![ReportEntry {
                date: Some(date!(2024 - 01 - 01)),
                kind: Some(TransactionType::Expense),
                amount: 50.0,
                category: Some("food".to_owned()),
                description: Some("lunch".to_owned()),
            }])
        );
    }

    #[test]
    fn malformed_values_do_not_fail() {
        let (connection, user_id, category_id) = get_test_connection();
        insert_raw(&connection, user_id, category_id, "expense", "lots", "someday");
        insert_raw(&connection, user_id, 999, "gift", "12", "2024-02-01");

        let entries =
            load_report_entries(user_id, &TransactionQuery::default(), &connection).unwrap();

        assert_eq!(entries.len(), 2);
        let bad_amount = entries.iter().find(|entry| entry.date.is_none()).unwrap();
        assert_eq!(bad_amount.amount, 0.0);
        let bad_kind = entries.iter().find(|entry| entry.kind.is_none()).unwrap();
        assert_eq!(bad_kind.amount, 12.0);
        assert_eq!(bad_kind.category, None);
    }

    #[test]
    fn unreadable_dates_are_excluded_by_date_bounds() {
        let (connection, user_id, category_id) = get_test_connection();
        insert_raw(&connection, user_id, category_id, "expense", "1", "someday");
        insert_raw(&connection, user_id, category_id, "expense", "2", "2024-01-15");
        insert_raw(&connection, user_id, category_id, "expense", "3", "2024-03-01");

        let entries = load_report_entries(
            user_id,
            &TransactionQuery {
                end_date: Some(date!(2024 - 01 - 31)),
                ..Default::default()
            },
            &connection,
        )
        .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].amount, 2.0);
    }

    #[test]
    fn filters_by_type_and_category() {
        let (connection, user_id, category_id) = get_test_connection();
        insert_raw(&connection, user_id, category_id, "Income", "1", "2024-01-01");
        insert_raw(&connection, user_id, category_id, "expense", "2", "2024-01-01");
        insert_raw(&connection, user_id, 999, "expense", "3", "2024-01-01");

        let entries = load_report_entries(
            user_id,
            &TransactionQuery {
                kind: Some(TransactionType::Expense),
                category_id: Some(category_id),
                ..Default::default()
            },
            &connection,
        )
        .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].amount, 2.0);
    }
}
