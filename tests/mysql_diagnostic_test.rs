// Diagnostic runs against a live MySQL fixture database
// Run with: DATABASE_URL=mysql://... cargo test -- --ignored

mod common;

use std::fs;

use hbs_maintenance::config::DiagnosticConfig;
use hbs_maintenance::db::DiagnosticConnection;
use hbs_maintenance::diagnostic::run;
use serde_json::{json, Value};
use serial_test::serial;
use tempfile::TempDir;

async fn run_against_fixture() -> (TempDir, Value) {
    let database_url = common::load_fixture().await;
    let dir = TempDir::new().unwrap();
    let config = DiagnosticConfig {
        database_url,
        output_path: dir.path().join("db_diagnostic.json"),
    };

    run(&config).await.expect("Diagnostic run failed");

    let written = fs::read_to_string(&config.output_path).unwrap();
    (dir, serde_json::from_str(&written).unwrap())
}

fn ids(rows: &Value) -> Vec<i64> {
    let mut ids: Vec<i64> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["id"].as_i64().unwrap())
        .collect();
    ids.sort();
    ids
}

#[tokio::test]
#[serial]
#[ignore = "requires a MySQL test database"]
async fn test_document_has_three_arrays() {
    let (_dir, doc) = run_against_fixture().await;

    let keys: Vec<_> = doc.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, ["hotels", "sbh2_room_types", "expensive_bookings"]);
    assert_eq!(ids(&doc["hotels"]), vec![1, 2, 3]);
}

#[tokio::test]
#[serial]
#[ignore = "requires a MySQL test database"]
async fn test_sbh2_filter_and_decimal_strings() {
    let (_dir, doc) = run_against_fixture().await;

    // Default MySQL collations compare case-insensitively, so 'sbh2' matches too
    assert_eq!(ids(&doc["sbh2_room_types"]), vec![10, 11, 30]);

    let deluxe = doc["sbh2_room_types"]
        .as_array()
        .unwrap()
        .iter()
        .find(|row| row["id"] == 10)
        .unwrap();
    assert_eq!(deluxe["price_per_night"], json!("18500.00"));
    assert_eq!(deluxe["hotel"], json!("SBH2 Residency"));
}

#[tokio::test]
#[serial]
#[ignore = "requires a MySQL test database"]
async fn test_expensive_bookings_exact_match() {
    let (_dir, doc) = run_against_fixture().await;

    assert_eq!(ids(&doc["expensive_bookings"]), vec![100, 102]);
    let booking = doc["expensive_bookings"]
        .as_array()
        .unwrap()
        .iter()
        .find(|row| row["id"] == 102)
        .unwrap();
    assert_eq!(booking["hotel"], json!("Lakeview Inn"));
    assert_eq!(booking["room"], json!("Suite"));
    assert_eq!(booking["hotel_id"], json!(2));
    assert_eq!(booking["room_type_id"], json!(20));
}

#[tokio::test]
#[serial]
#[ignore = "requires a MySQL test database"]
async fn test_dates_become_strings() {
    let database_url = common::load_fixture().await;
    let mut conn = DiagnosticConnection::connect(&database_url).await.unwrap();

    let rows = conn
        .fetch_records("SELECT check_in_date, NULL AS missing FROM bookings WHERE id = 100")
        .await
        .unwrap();
    conn.close().await;

    assert_eq!(rows[0]["check_in_date"], json!("2025-01-15"));
    assert_eq!(rows[0]["missing"], Value::Null);
}
