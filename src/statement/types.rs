//! Statement value objects
//!
//! The statement endpoints have shipped camelCase, snake_case and a few
//! legacy field names over time; every spelling is accepted on input and
//! camelCase is written back out.

use crate::error::{Error, Result};
use crate::pagination::{Page, PagedResult};
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Currency assumed when a transaction omits it
pub const DEFAULT_CURRENCY: &str = "KES";

// ============================================================================
// Transaction Type
// ============================================================================

/// Direction of a transaction
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionType {
    #[default]
    Debit,
    Credit,
    /// Any other value the API sends, kept verbatim
    Other(String),
}

impl From<String> for TransactionType {
    fn from(value: String) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "DEBIT" => Self::Debit,
            "CREDIT" => Self::Credit,
            _ => Self::Other(value),
        }
    }
}

impl From<TransactionType> for String {
    fn from(value: TransactionType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debit => f.write_str("DEBIT"),
            Self::Credit => f.write_str("CREDIT"),
            Self::Other(value) => f.write_str(value),
        }
    }
}

// ============================================================================
// Transaction
// ============================================================================

/// One booked transaction from an account statement
///
/// Deserialization accepts every field spelling the API has used. For each
/// field the first non-null spelling wins; a null or missing field takes its
/// default. Only the booking date is required.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub transaction_id: String,

    /// Booking date
    pub date: DateTime<Utc>,

    pub amount: f64,

    pub currency: String,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    pub counterparty: Option<String>,

    pub description: Option<String>,

    pub reference: Option<String>,

    /// Balance after the transaction
    pub balance: Option<f64>,
}

impl Transaction {
    /// Build a transaction from one raw payload object
    pub fn from_value(value: &Value) -> Result<Self> {
        let map = value
            .as_object()
            .ok_or_else(|| Error::decode(format!("transaction must be an object, got {value}")))?;
        let first = |keys: &[&'static str]| {
            keys.iter()
                .find_map(|k| map.get(*k).filter(|v| !v.is_null()).map(|v| (*k, v)))
        };
        let text = |keys: &[&'static str]| {
            first(keys)
                .map(|(k, v)| field_text(k, v))
                .transpose()
        };
        let number = |keys: &[&'static str]| {
            first(keys)
                .map(|(k, v)| field_number(k, v))
                .transpose()
        };

        let date = match first(&["date", "bookingDate", "booking_date"]) {
            Some((key, Value::String(raw))) => parse_datetime(raw)
                .ok_or_else(|| Error::decode(format!("invalid {key} '{raw}'")))?,
            Some((key, other)) => {
                return Err(Error::decode(format!("{key} must be a string, got {other}")))
            }
            None => return Err(Error::decode("transaction has no booking date")),
        };

        Ok(Self {
            transaction_id: text(&["transactionId", "transaction_id", "id"])?.unwrap_or_default(),
            date,
            amount: number(&["amount"])?.unwrap_or_default(),
            currency: text(&["currency"])?.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            transaction_type: text(&["type", "transactionType", "transaction_type"])?
                .map(TransactionType::from)
                .unwrap_or_default(),
            counterparty: text(&["counterparty", "counterParty", "counter_party"])?,
            description: text(&["description", "narrative"])?,
            reference: text(&["reference", "referenceNumber", "reference_number"])?,
            balance: number(&["balance"])?,
        })
    }

    /// Check if the transaction is a debit
    pub fn is_debit(&self) -> bool {
        self.transaction_type == TransactionType::Debit
    }

    /// Check if the transaction is a credit
    pub fn is_credit(&self) -> bool {
        self.transaction_type == TransactionType::Credit
    }
}

impl<'de> Deserialize<'de> for Transaction {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// Totals over the transactions of one statement page
impl PagedResult<Transaction> {
    /// Credit transactions of this page
    pub fn credits(&self) -> impl Iterator<Item = &Transaction> {
        self.items().iter().filter(|t| t.is_credit())
    }

    /// Debit transactions of this page
    pub fn debits(&self) -> impl Iterator<Item = &Transaction> {
        self.items().iter().filter(|t| t.is_debit())
    }

    /// Sum of credit amounts
    pub fn total_credits(&self) -> f64 {
        self.credits().map(|t| t.amount).sum()
    }

    /// Sum of debit amounts
    pub fn total_debits(&self) -> f64 {
        self.debits().map(|t| t.amount).sum()
    }
}

// ============================================================================
// Statement Query
// ============================================================================

/// Account and booking-date range a statement covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementQuery {
    #[serde(alias = "account_number")]
    pub account_number: String,
    #[serde(alias = "booking_date_greater_than", alias = "startDate")]
    pub booking_date_greater_than: NaiveDate,
    #[serde(alias = "booking_date_less_than", alias = "endDate")]
    pub booking_date_less_than: NaiveDate,
}

impl StatementQuery {
    /// Create a query for an explicit date range
    pub fn new(account_number: impl Into<String>, from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            account_number: account_number.into(),
            booking_date_greater_than: from,
            booking_date_less_than: to,
        }
    }

    /// Query the last `days` days up to today
    ///
    /// Fails with `Error::InvalidArgument` when the start date would fall
    /// outside the supported calendar.
    pub fn for_last_days(account_number: impl Into<String>, days: u32) -> Result<Self> {
        let today = Utc::now().date_naive();
        let from = today
            .checked_sub_days(Days::new(u64::from(days)))
            .ok_or_else(|| {
                Error::invalid_argument(format!("{days} days back from {today} is out of range"))
            })?;
        Ok(Self::new(account_number, from, today))
    }

    /// Query the current calendar month
    pub fn for_current_month(account_number: impl Into<String>) -> Self {
        let (first, last) = month_bounds(Utc::now().date_naive());
        Self::new(account_number, first, last)
    }

    /// Request parameters for the statement endpoint
    pub fn to_params(&self) -> [(&'static str, String); 2] {
        [
            (
                "bookingDateGreaterThan",
                self.booking_date_greater_than.format("%Y-%m-%d").to_string(),
            ),
            (
                "bookingDateLessThan",
                self.booking_date_less_than.format("%Y-%m-%d").to_string(),
            ),
        ]
    }
}

/// First and last day of the month containing `date`
pub(crate) fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let next_month = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    let last = next_month
        .and_then(|d| d.pred_opt())
        .unwrap_or(first);
    (first, last)
}

/// Parse a booking date as sent on the command line or in config
///
/// Accepts `YYYY-MM-DD` and the compact `YYYYMMDD`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y%m%d"))
        .ok()
}

// ============================================================================
// Statement Page (wire format)
// ============================================================================

/// One page of a statement response as the API returns it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementPage {
    #[serde(default, alias = "items", alias = "content")]
    pub transactions: Vec<Transaction>,

    #[serde(default, alias = "total_elements", alias = "total")]
    pub total_elements: Option<u64>,

    #[serde(default, alias = "account_number")]
    pub account_number: Option<String>,
}

impl StatementPage {
    /// Attach the requested window
    ///
    /// A missing total falls back to the number of transactions returned.
    pub fn into_paged_result(self, page: Page) -> PagedResult<Transaction> {
        let total = self
            .total_elements
            .unwrap_or(self.transactions.len() as u64);
        PagedResult::of(self.transactions, total, page)
    }
}

// ============================================================================
// Field parsers
// ============================================================================

fn field_text(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(Error::decode(format!(
            "{key} must be a string or number, got {other}"
        ))),
    }
}

fn field_number(key: &str, value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| Error::decode(format!("{key} '{n}' is out of range"))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| Error::decode(format!("invalid {key} '{s}'"))),
        other => Err(Error::decode(format!("{key} must be a number, got {other}"))),
    }
}

/// Parse the date formats seen in statement payloads
pub(crate) fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    parse_date(raw).and_then(|d| d.and_hms_opt(0, 0, 0)).map(|dt| dt.and_utc())
}
