//! Tests for the statement module

use super::types::{month_bounds, parse_datetime};
use super::*;
use crate::error::{ApiErrorKind, Error};
use crate::http::{HttpClient, HttpClientConfig};
use crate::pagination::Page;
use crate::types::BackoffType;
use chrono::{NaiveDate, TimeZone, Utc};
use futures::TryStreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn page(from: i64, size: i64) -> Page {
    Page::of(from, size).unwrap()
}

fn client(base_url: &str) -> StatementClient {
    let config = HttpClientConfig::builder()
        .base_url(base_url)
        .max_retries(0)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_millis(10),
        )
        .build();
    StatementClient::new(HttpClient::with_config(config).unwrap())
}

fn query() -> StatementQuery {
    StatementQuery::new("1234567890", date(2024, 1, 1), date(2024, 1, 31))
}

fn txn(id: u32) -> serde_json::Value {
    json!({
        "transactionId": format!("T{id}"),
        "date": "2024-01-15T10:30:00Z",
        "amount": 100.0,
        "type": "DEBIT"
    })
}

// ============================================================================
// Transaction
// ============================================================================

#[test]
fn test_transaction_camel_case() {
    let t: Transaction = serde_json::from_value(json!({
        "transactionId": "T1",
        "date": "2024-01-15T10:30:00Z",
        "amount": 2500.5,
        "currency": "USD",
        "type": "CREDIT",
        "counterparty": "ACME Ltd",
        "description": "Invoice 42",
        "reference": "REF-1",
        "balance": 10000
    }))
    .unwrap();

    assert_eq!(t.transaction_id, "T1");
    assert_eq!(t.date, Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap());
    assert_eq!(t.amount, 2500.5);
    assert_eq!(t.currency, "USD");
    assert!(t.is_credit());
    assert!(!t.is_debit());
    assert_eq!(t.counterparty.as_deref(), Some("ACME Ltd"));
    assert_eq!(t.description.as_deref(), Some("Invoice 42"));
    assert_eq!(t.reference.as_deref(), Some("REF-1"));
    assert_eq!(t.balance, Some(10000.0));
}

#[test]
fn test_transaction_snake_case_and_legacy_names() {
    let t: Transaction = serde_json::from_value(json!({
        "id": 987,
        "booking_date": "2024-02-01",
        "amount": "12.75",
        "transaction_type": "credit",
        "counter_party": "Jane",
        "narrative": "Refund",
        "reference_number": "R9",
        "balance": "50.25"
    }))
    .unwrap();

    assert_eq!(t.transaction_id, "987");
    assert_eq!(t.date, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
    assert_eq!(t.amount, 12.75);
    assert!(t.is_credit());
    assert_eq!(t.counterparty.as_deref(), Some("Jane"));
    assert_eq!(t.description.as_deref(), Some("Refund"));
    assert_eq!(t.reference.as_deref(), Some("R9"));
    assert_eq!(t.balance, Some(50.25));
}

#[test]
fn test_transaction_defaults() {
    let t: Transaction = serde_json::from_value(json!({
        "bookingDate": "2024-03-10 08:00:00"
    }))
    .unwrap();

    assert_eq!(t.transaction_id, "");
    assert_eq!(t.amount, 0.0);
    assert_eq!(t.currency, DEFAULT_CURRENCY);
    assert_eq!(t.transaction_type, TransactionType::Debit);
    assert!(t.counterparty.is_none());
    assert!(t.description.is_none());
    assert!(t.reference.is_none());
    assert!(t.balance.is_none());
}

#[test]
fn test_transaction_first_spelling_wins() {
    let t: Transaction = serde_json::from_value(json!({
        "id": "legacy",
        "transactionId": "T1",
        "date": null,
        "bookingDate": "2024-01-01",
        "description": null,
        "narrative": "Salary"
    }))
    .unwrap();

    assert_eq!(t.transaction_id, "T1");
    assert_eq!(t.date, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    assert_eq!(t.description.as_deref(), Some("Salary"));
}

#[test]
fn test_transaction_null_fields_take_defaults() {
    let t: Transaction = serde_json::from_value(json!({
        "transactionId": "1",
        "date": "2024-01-01",
        "amount": null,
        "currency": null,
        "type": null,
        "balance": null
    }))
    .unwrap();

    assert_eq!(t.amount, 0.0);
    assert_eq!(t.currency, DEFAULT_CURRENCY);
    assert_eq!(t.transaction_type, TransactionType::Debit);
    assert!(t.balance.is_none());
}

#[test]
fn test_transaction_from_value_rejects_non_object() {
    assert!(matches!(
        Transaction::from_value(&json!(["T1"])),
        Err(Error::Decode { .. })
    ));
}

#[test]
fn test_transaction_missing_date_is_error() {
    let result = serde_json::from_value::<Transaction>(json!({ "transactionId": "T1" }));
    assert!(result.is_err());
}

#[test]
fn test_transaction_bad_amount_is_error() {
    let result = serde_json::from_value::<Transaction>(json!({
        "date": "2024-01-01",
        "amount": "lots"
    }));
    assert!(result.is_err());
}

#[test]
fn test_transaction_serializes_camel_case() {
    let t: Transaction = serde_json::from_value(txn(1)).unwrap();
    let value = serde_json::to_value(&t).unwrap();

    assert_eq!(value["transactionId"], "T1");
    assert_eq!(value["type"], "DEBIT");
    assert_eq!(value["currency"], "KES");
    assert!(value.get("transaction_id").is_none());
}

#[test_case("DEBIT", TransactionType::Debit ; "upper debit")]
#[test_case("credit", TransactionType::Credit ; "lower credit")]
#[test_case("REVERSAL", TransactionType::Other("REVERSAL".into()) ; "other kept verbatim")]
fn test_transaction_type_from_string(raw: &str, expected: TransactionType) {
    assert_eq!(TransactionType::from(raw.to_string()), expected);
}

#[test]
fn test_transaction_type_display() {
    assert_eq!(TransactionType::Debit.to_string(), "DEBIT");
    assert_eq!(TransactionType::Credit.to_string(), "CREDIT");
    assert_eq!(TransactionType::Other("FEE".into()).to_string(), "FEE");
}

#[test]
fn test_parse_datetime_formats() {
    let expected = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
    assert_eq!(parse_datetime("2024-05-06T07:08:09Z"), Some(expected));
    assert_eq!(parse_datetime("2024-05-06T10:08:09+03:00"), Some(expected));
    assert_eq!(parse_datetime("2024-05-06T07:08:09"), Some(expected));
    assert_eq!(parse_datetime("2024-05-06 07:08:09"), Some(expected));
    assert!(parse_datetime("yesterday").is_none());
}

// ============================================================================
// Statement Query
// ============================================================================

#[test]
fn test_query_params() {
    let params = query().to_params();
    assert_eq!(params[0], ("bookingDateGreaterThan", "2024-01-01".to_string()));
    assert_eq!(params[1], ("bookingDateLessThan", "2024-01-31".to_string()));
}

#[test]
fn test_query_deserialize_aliases() {
    let q: StatementQuery = serde_json::from_value(json!({
        "account_number": "42",
        "startDate": "2024-01-01",
        "endDate": "2024-01-31"
    }))
    .unwrap();
    assert_eq!(q, StatementQuery::new("42", date(2024, 1, 1), date(2024, 1, 31)));
}

#[test]
fn test_query_for_last_days() {
    let q = StatementQuery::for_last_days("42", 7).unwrap();
    let today = Utc::now().date_naive();
    assert_eq!(q.booking_date_less_than, today);
    assert_eq!(q.booking_date_greater_than, today - chrono::Duration::days(7));
}

#[test]
fn test_query_for_last_days_out_of_range() {
    let result = StatementQuery::for_last_days("42", u32::MAX);
    assert!(matches!(result, Err(Error::InvalidArgument { .. })));
}

#[test]
fn test_query_for_current_month() {
    let q = StatementQuery::for_current_month("42");
    let today = Utc::now().date_naive();
    assert!(q.booking_date_greater_than <= today);
    assert!(today <= q.booking_date_less_than);
    assert_eq!(q.booking_date_greater_than, month_bounds(today).0);
}

#[test_case(date(2024, 2, 14), date(2024, 2, 1), date(2024, 2, 29) ; "leap february")]
#[test_case(date(2023, 2, 1), date(2023, 2, 1), date(2023, 2, 28) ; "plain february")]
#[test_case(date(2024, 12, 31), date(2024, 12, 1), date(2024, 12, 31) ; "december rollover")]
#[test_case(date(2024, 4, 30), date(2024, 4, 1), date(2024, 4, 30) ; "thirty day month")]
fn test_month_bounds(day: NaiveDate, first: NaiveDate, last: NaiveDate) {
    assert_eq!(month_bounds(day), (first, last));
}

#[test]
fn test_parse_date() {
    assert_eq!(parse_date("2024-01-31"), Some(date(2024, 1, 31)));
    assert_eq!(parse_date("20240131"), Some(date(2024, 1, 31)));
    assert_eq!(parse_date("31/01/2024"), None);
}

// ============================================================================
// Statement Page
// ============================================================================

#[test]
fn test_statement_page_aliases() {
    let wire: StatementPage = serde_json::from_value(json!({
        "content": [txn(1), txn(2)],
        "total": 10
    }))
    .unwrap();
    assert_eq!(wire.transactions.len(), 2);
    assert_eq!(wire.total_elements, Some(10));

    let wire: StatementPage = serde_json::from_value(json!({
        "items": [txn(1)],
        "total_elements": 1,
        "account_number": "42"
    }))
    .unwrap();
    assert_eq!(wire.transactions.len(), 1);
    assert_eq!(wire.account_number.as_deref(), Some("42"));
}

#[test]
fn test_statement_page_missing_total_uses_item_count() {
    let wire: StatementPage =
        serde_json::from_value(json!({ "transactions": [txn(1), txn(2), txn(3)] })).unwrap();
    let result = wire.into_paged_result(page(0, 20));

    assert_eq!(result.total_elements(), 3);
    assert!(!result.has_next());
}

#[test]
fn test_paged_result_credit_debit_totals() {
    let wire: StatementPage = serde_json::from_value(json!({
        "transactions": [
            { "date": "2024-01-01", "amount": 100.0, "type": "CREDIT" },
            { "date": "2024-01-02", "amount": "40.5", "type": "debit" },
            { "date": "2024-01-03", "amount": 9.5 },
            { "date": "2024-01-04", "amount": 50, "type": "credit" },
            { "date": "2024-01-05", "amount": 7, "type": "REVERSAL" }
        ],
        "totalElements": 5
    }))
    .unwrap();
    let result = wire.into_paged_result(Page::default());

    assert_eq!(result.credits().count(), 2);
    assert_eq!(result.debits().count(), 2);
    assert_eq!(result.total_credits(), 150.0);
    assert_eq!(result.total_debits(), 50.0);
}

#[test]
fn test_statement_page_empty_body() {
    let wire: StatementPage = serde_json::from_value(json!({})).unwrap();
    let result = wire.into_paged_result(Page::default());
    assert!(result.is_empty());
    assert_eq!(result.total_elements(), 0);
}

// ============================================================================
// Statement Client
// ============================================================================

#[test]
fn test_statements_path() {
    assert_eq!(
        StatementClient::statements_path(" 42 ").unwrap(),
        "/accounts/42/statements"
    );
    assert!(matches!(
        StatementClient::statements_path(""),
        Err(Error::InvalidArgument { .. })
    ));
    assert!(StatementClient::statements_path("4/2").is_err());
}

#[tokio::test]
async fn test_fetch_statements_sends_window_and_range() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/accounts/1234567890/statements"))
        .and(query_param("bookingDateGreaterThan", "2024-01-01"))
        .and(query_param("bookingDateLessThan", "2024-01-31"))
        .and(query_param("from", "20"))
        .and(query_param("size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transactions": [txn(21), txn(22)],
            "totalElements": 22
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server.uri())
        .fetch_statements(&query(), page(20, 10))
        .await
        .unwrap();

    assert_eq!(result.size(), 2);
    assert_eq!(result.total_elements(), 22);
    assert_eq!(result.page(), page(20, 10));
    assert!(result.is_last());
    assert_eq!(result.items()[0].transaction_id, "T21");
}

#[tokio::test]
async fn test_fetch_statements_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/accounts/1234567890/statements"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errorCode": "INVALID_ACCOUNT",
            "errorMessage": "Account not found"
        })))
        .mount(&server)
        .await;

    let err = client(&server.uri())
        .fetch_statements(&query(), Page::default())
        .await
        .unwrap_err();

    assert_eq!(err.api_kind(), Some(ApiErrorKind::InvalidAccount));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_statements_stream_walks_all_pages() {
    let server = MockServer::start().await;

    for (from, ids) in [(0u32, vec![1, 2]), (2, vec![3, 4]), (4, vec![5])] {
        Mock::given(method("GET"))
            .and(path("/accounts/1234567890/statements"))
            .and(query_param("from", from.to_string()))
            .and(query_param("size", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "transactions": ids.iter().map(|id| txn(*id)).collect::<Vec<_>>(),
                "totalElements": 5
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let ids: Vec<String> = client(&server.uri())
        .statements(query(), page(0, 2))
        .map_ok(|t| t.transaction_id)
        .try_collect()
        .await
        .unwrap();

    assert_eq!(ids, vec!["T1", "T2", "T3", "T4", "T5"]);
}

#[tokio::test]
async fn test_fetcher_drives_collect_all() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/accounts/1234567890/statements"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [txn(1), txn(2)],
            "total": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = client(&server.uri()).fetcher(query());
    assert_eq!(fetcher.query(), &query());

    let all = crate::pagination::collect_all(fetcher, Page::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}
