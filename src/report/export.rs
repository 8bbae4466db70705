//! CSV rendering of report entries.

use csv::WriterBuilder;
use serde::Serialize;

use crate::{
    Error,
    report::{NO_CATEGORY, ReportEntry},
};

const CSV_HEADER: [&str; 5] = ["Date", "Type", "Category", "Amount", "Description"];

#[derive(Serialize)]
struct CsvRow<'a> {
    date: String,
    kind: &'a str,
    category: &'a str,
    amount: f64,
    description: &'a str,
}

impl<'a> From<&'a ReportEntry> for CsvRow<'a> {
    fn from(entry: &'a ReportEntry) -> Self {
        Self {
            date: entry.date.map(|date| date.to_string()).unwrap_or_default(),
            kind: entry.kind.map(|kind| kind.as_str()).unwrap_or_default(),
            category: entry.category.as_deref().unwrap_or(NO_CATEGORY),
            amount: entry.amount,
            description: entry.description.as_deref().unwrap_or_default(),
        }
    }
}

/// Render `entries` as a CSV document with a header row.
///
/// # Errors
///
/// Returns [Error::ExportError] if a row could not be written.
pub fn write_csv(entries: &[ReportEntry]) -> Result<Vec<u8>, Error> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);

    writer
        .write_record(CSV_HEADER)
        .map_err(|error| Error::ExportError(error.to_string()))?;

    for entry in entries {
        writer
            .serialize(CsvRow::from(entry))
            .map_err(|error| Error::ExportError(error.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::ExportError(error.to_string()))
}

#[cfg(test)]
mod csv_export_tests {
    use time::macros::date;

    use crate::{TransactionType, report::ReportEntry};

    use super::write_csv;

    #[test]
    fn empty_report_has_header_only() {
        let csv = write_csv(&[]).unwrap();

        assert_eq!(
            String::from_utf8(csv).unwrap(),
            "Date,Type,Category,Amount,Description\n"
        );
    }

    #[test]
    fn writes_one_row_per_entry() {
        let entries = [
            ReportEntry {
                date: Some(date!(2024 - 01 - 01)),
                kind: Some(TransactionType::Expense),
                amount: 50.0,
                category: Some("food".to_owned()),
                description: Some("lunch, with Bo".to_owned()),
            },
            ReportEntry {
                date: None,
                kind: Some(TransactionType::Income),
                amount: 12.5,
                category: None,
                description: None,
            },
        ];

        let csv = String::from_utf8(write_csv(&entries).unwrap()).unwrap();

        assert_eq!(
            csv,
            "Date,Type,Category,Amount,Description\n\
            2024-01-01,expense,food,50.0,\"lunch, with Bo\"\n\
            ,income,No Category,12.5,\n"
        );
    }
}
