//! Route handlers for the report summary, chart data and CSV export.

use axum::{
    Extension, Json,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    db::{DatabaseState, lock_connection},
    extract::ApiQuery,
    report::{
        CategoryTotal, ReportEntry, Totals, expenses_by_category, load_report_entries, totals,
        write_csv,
    },
    transaction::{TransactionFilter, TransactionFilterQuery, build_query},
    user::UserID,
};

/// The file name suggested to browsers for CSV exports.
pub const CSV_FILE_NAME: &str = "BudgetBuddy_Report.csv";

/// The response body of the summary endpoint.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ReportSummary {
    /// Income, expense and balance.
    #[serde(flatten)]
    pub totals: Totals,
    /// How many transactions matched the filters.
    pub count: usize,
}

/// The response body of the chart endpoint.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ChartData {
    /// Always `["Income", "Expense"]`.
    pub labels: [String; 2],
    /// The income and expense totals, in the order of `labels`.
    pub values: [f64; 2],
    /// Expenses per category, largest first.
    pub categories: Vec<CategoryTotal>,
}

fn load_filtered_entries(
    user_id: UserID,
    query: TransactionFilterQuery,
    connection: &Connection,
) -> Result<Vec<ReportEntry>, Error> {
    let filter = TransactionFilter::try_from(query)?;

    match build_query(user_id, &filter, connection)? {
        Some(query) => load_report_entries(user_id, &query, connection),
        None => Ok(Vec::new()),
    }
}

/// A route handler for the totals of the logged-in user's filtered transactions.
pub async fn get_report_summary(
    State(state): State<DatabaseState>,
    Extension(user_id): Extension<UserID>,
    ApiQuery(query): ApiQuery<TransactionFilterQuery>,
) -> Result<Json<ReportSummary>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let entries = load_filtered_entries(user_id, query, &connection)?;

    Ok(Json(ReportSummary {
        totals: totals(&entries),
        count: entries.len(),
    }))
}

/// A route handler for the data behind the income/expense doughnut chart.
pub async fn get_report_chart(
    State(state): State<DatabaseState>,
    Extension(user_id): Extension<UserID>,
    ApiQuery(query): ApiQuery<TransactionFilterQuery>,
) -> Result<Json<ChartData>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let entries = load_filtered_entries(user_id, query, &connection)?;
    let totals = totals(&entries);

    Ok(Json(ChartData {
        labels: ["Income".to_owned(), "Expense".to_owned()],
        values: [totals.income, totals.expense],
        categories: expenses_by_category(&entries),
    }))
}

/// A route handler that downloads the filtered transactions as a CSV file.
pub async fn export_report_csv(
    State(state): State<DatabaseState>,
    Extension(user_id): Extension<UserID>,
    ApiQuery(query): ApiQuery<TransactionFilterQuery>,
) -> Result<Response, Error> {
    let entries = {
        let connection = lock_connection(&state.db_connection)?;
        load_filtered_entries(user_id, query, &connection)?
    };

    let csv = write_csv(&entries)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{CSV_FILE_NAME}\""),
            ),
        ],
        csv,
    )
        .into_response())
}
