//! Reports: totals, chart data and CSV exports of the user's transactions.

mod endpoints;
mod entry;
mod export;
mod totals;

pub use endpoints::{export_report_csv, get_report_chart, get_report_summary};
pub use entry::{ReportEntry, load_report_entries};
pub use export::write_csv;
pub use totals::{CategoryTotal, NO_CATEGORY, Totals, expenses_by_category, totals};
