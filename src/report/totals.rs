//! Totals and breakdowns computed from report entries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{TransactionType, report::ReportEntry};

/// The name used for entries whose category no longer exists.
pub const NO_CATEGORY: &str = "No Category";

/// Income and expense totals of a set of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    /// The sum of all income amounts.
    pub income: f64,
    /// The sum of all expense amounts.
    pub expense: f64,
    /// `income - expense`.
    pub balance: f64,
}

/// Compute the totals of `entries`.
///
/// The result does not depend on the order of `entries`. Entries with an
/// unknown type count towards neither side.
pub fn totals(entries: &[ReportEntry]) -> Totals {
    let income = sum_of_type(entries, TransactionType::Income);
    let expense = sum_of_type(entries, TransactionType::Expense);

    Totals {
        income,
        expense,
        balance: income - expense,
    }
}

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// The category name, or [NO_CATEGORY].
    pub name: String,
    /// The sum of the expense amounts in the category.
    pub total: f64,
}

/// Sum the expenses of `entries` per category, largest total first.
///
/// Ties are broken by name.
pub fn expenses_by_category(entries: &[ReportEntry]) -> Vec<CategoryTotal> {
    let mut amounts_by_category: BTreeMap<&str, Vec<f64>> = BTreeMap::new();

    for entry in entries
        .iter()
        .filter(|entry| entry.kind == Some(TransactionType::Expense))
    {
        let name = entry.category.as_deref().unwrap_or(NO_CATEGORY);
        amounts_by_category
            .entry(name)
            .or_default()
            .push(entry.amount);
    }

    let mut category_totals: Vec<CategoryTotal> = amounts_by_category
        .into_iter()
        .map(|(name, amounts)| CategoryTotal {
            name: name.to_owned(),
            total: stable_sum(amounts),
        })
        .collect();

    category_totals.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.name.cmp(&b.name)));

    category_totals
}

fn sum_of_type(entries: &[ReportEntry], kind: TransactionType) -> f64 {
    stable_sum(
        entries
            .iter()
            .filter(|entry| entry.kind == Some(kind))
            .map(|entry| entry.amount)
            .collect(),
    )
}

/// Floating point addition is not associative, so amounts are summed in
/// sorted order to get the same result for any input order.
fn stable_sum(mut amounts: Vec<f64>) -> f64 {
    amounts.retain(|amount| amount.is_finite());
    amounts.sort_by(f64::total_cmp);

    amounts.into_iter().sum()
}
