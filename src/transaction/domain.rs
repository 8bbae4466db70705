//! Transaction models and the parsing of transaction request data.

use serde::{Deserialize, Serialize};
use time::{
    Date, OffsetDateTime,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::{
    Error, TransactionType,
    category::CategoryName,
    database_id::{CategoryId, TransactionId},
    extract::require,
    user::UserID,
};

/// Calendar dates in requests and responses, e.g. "2024-01-31".
pub const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

pub(crate) mod date_format {
    //! Serializes a [time::Date] as "YYYY-MM-DD".
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    use super::DATE_FORMAT;

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = date
            .format(DATE_FORMAT)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Date::parse(&s, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// An income or expense recorded by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user who owns the transaction.
    pub user_id: UserID,
    /// Whether money came in or went out.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The ID of the category the transaction belongs to.
    pub category_id: CategoryId,
    /// The current name of the category.
    ///
    /// Looked up when the transaction is read. `None` if the category no longer exists.
    pub category: Option<CategoryName>,
    /// The amount of money, always positive.
    pub amount: f64,
    /// When the transaction happened.
    #[serde(with = "date_format")]
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: Option<String>,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The validated data for inserting a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Whether money came in or went out.
    pub kind: TransactionType,
    /// The category, already resolved and checked to belong to the user.
    pub category_id: CategoryId,
    /// The amount of money, always positive.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: Option<String>,
}

/// An amount as sent by a client, either a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    /// e.g. `50` or `12.5`
    Number(f64),
    /// e.g. `"50"` or `"12.50"`
    Text(String),
}

impl AmountInput {
    /// Convert the input to a positive, finite amount.
    ///
    /// # Errors
    ///
    /// Returns an [Error::Validation] if the input is not a number, or is zero or negative.
    pub fn parse(&self) -> Result<f64, Error> {
        let amount = match self {
            AmountInput::Number(amount) => *amount,
            AmountInput::Text(text) => text.trim().parse::<f64>().map_err(|_| {
                Error::Validation(format!("\"{text}\" is not a valid amount"))
            })?,
        };

        if amount.is_finite() && amount > 0.0 {
            Ok(amount)
        } else {
            Err(Error::Validation(
                "amount must be a number greater than zero".to_owned(),
            ))
        }
    }
}

/// Parse a date given as "YYYY-MM-DD" or as an RFC 3339 date-time.
///
/// Only the date part of a date-time is kept.
///
/// # Errors
///
/// Returns an [Error::Validation] if `raw_date` is in neither format.
pub fn parse_date(raw_date: &str) -> Result<Date, Error> {
    let raw_date = raw_date.trim();

    if let Ok(date) = Date::parse(raw_date, DATE_FORMAT) {
        return Ok(date);
    }

    OffsetDateTime::parse(raw_date, &Rfc3339)
        .map(|date_time| date_time.date())
        .map_err(|_| {
            Error::Validation(format!(
                "\"{raw_date}\" is not a valid date, expected YYYY-MM-DD"
            ))
        })
}

/// Trim a description, treating an empty description as no description.
pub fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

/// The request body for creating or updating a transaction.
///
/// All fields except `description` are required when creating. When
/// updating, any subset may be given.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionForm {
    /// "income" or "expense" in any case.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// The name of one of the user's categories.
    pub category: Option<String>,
    /// A positive number or numeric string.
    pub amount: Option<AmountInput>,
    /// "YYYY-MM-DD" or an RFC 3339 date-time.
    pub date: Option<String>,
    /// Free text. An empty string clears the description on update.
    pub description: Option<String>,
}

/// A validated transaction body whose category has not been resolved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    /// Whether money came in or went out.
    pub kind: TransactionType,
    /// The normalized category name.
    pub category: CategoryName,
    /// The amount of money, always positive.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: Option<String>,
}

impl TryFrom<TransactionForm> for TransactionDraft {
    type Error = Error;

    fn try_from(form: TransactionForm) -> Result<Self, Self::Error> {
        Ok(Self {
            kind: require(form.kind, "type")?.parse()?,
            category: CategoryName::new(&require(form.category, "category")?)?,
            amount: require(form.amount, "amount")?.parse()?,
            date: parse_date(&require(form.date, "date")?)?,
            description: normalize_description(form.description),
        })
    }
}

/// The validated fields of a partial transaction update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionChanges {
    /// The new type.
    pub kind: Option<TransactionType>,
    /// The normalized name of the new category.
    pub category: Option<CategoryName>,
    /// The new amount.
    pub amount: Option<f64>,
    /// The new date.
    pub date: Option<Date>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
}

impl TryFrom<TransactionForm> for TransactionChanges {
    type Error = Error;

    fn try_from(form: TransactionForm) -> Result<Self, Self::Error> {
        Ok(Self {
            kind: form
                .kind
                .map(|kind| kind.parse::<TransactionType>())
                .transpose()?,
            category: form
                .category
                .map(|name| CategoryName::new(&name))
                .transpose()?,
            amount: form.amount.map(|amount| amount.parse()).transpose()?,
            date: form.date.map(|date| parse_date(&date)).transpose()?,
            description: form
                .description
                .map(|description| normalize_description(Some(description))),
        })
    }
}

/// The query string for listing transactions and building reports.
///
/// `All` (in any case) or an empty value for `type` or `category` means no filter.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilterQuery {
    /// The earliest date to include, inclusive.
    pub start_date: Option<String>,
    /// The latest date to include, inclusive.
    pub end_date: Option<String>,
    /// Only include this type.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Only include transactions in the category with this name.
    pub category: Option<String>,
}

/// Validated filters for listing transactions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// The earliest date to include, inclusive.
    pub start_date: Option<Date>,
    /// The latest date to include, inclusive.
    pub end_date: Option<Date>,
    /// Only include this type.
    pub kind: Option<TransactionType>,
    /// Only include transactions in the category with this name.
    pub category: Option<CategoryName>,
    /// Set when a filter value names a type that does not exist, so no transaction can match.
    pub matches_nothing: bool,
}

/// `None` for a missing, empty or "All" filter value.
fn filter_value(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case("all"))
}

impl TryFrom<TransactionFilterQuery> for TransactionFilter {
    type Error = Error;

    fn try_from(query: TransactionFilterQuery) -> Result<Self, Self::Error> {
        let start_date = filter_value(query.start_date)
            .map(|date| parse_date(&date))
            .transpose()?;
        let end_date = filter_value(query.end_date)
            .map(|date| parse_date(&date))
            .transpose()?;

        let (kind, matches_nothing) = match filter_value(query.kind) {
            Some(kind) => match kind.parse::<TransactionType>() {
                Ok(kind) => (Some(kind), false),
                Err(_) => (None, true),
            },
            None => (None, false),
        };

        Ok(Self {
            start_date,
            end_date,
            kind,
            category: filter_value(query.category)
                .map(|name| CategoryName::new(&name))
                .transpose()?,
            matches_nothing,
        })
    }
}
