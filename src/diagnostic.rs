//! Diagnostic dump of the hotel booking database
//!
//! Runs three fixed read-only queries and writes their rows, keyed by query
//! label, to a pretty-printed JSON file. Nothing is written unless every query
//! succeeds.
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{error, info, instrument};

use crate::config::DiagnosticConfig;
use crate::db::{DbError, DiagnosticConnection, RowRecord};

#[derive(Debug, thiserror::Error)]
pub enum DiagnosticError {
    #[error("Failed to connect to database: {0}")]
    Connection(#[source] DbError),
    #[error("Query '{label}' failed: {source}")]
    Query {
        label: &'static str,
        #[source]
        source: DbError,
    },
    #[error("Failed to serialize diagnostic report: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct DiagnosticQuery {
    pub label: &'static str,
    pub sql: &'static str,
}

pub const HOTELS_QUERY: DiagnosticQuery = DiagnosticQuery {
    label: "hotels",
    sql: "SELECT id, name FROM hotels",
};

pub const SBH2_ROOM_TYPES_QUERY: DiagnosticQuery = DiagnosticQuery {
    label: "sbh2_room_types",
    sql: r#"
        SELECT rt.id, rt.name, rt.price_per_night, h.name AS hotel
        FROM room_types rt
        JOIN hotels h ON rt.hotel_id = h.id
        WHERE h.name LIKE '%SBH2%'
    "#,
};

pub const EXPENSIVE_BOOKINGS_QUERY: DiagnosticQuery = DiagnosticQuery {
    label: "expensive_bookings",
    sql: r#"
        SELECT b.id, h.name AS hotel, rt.name AS room, b.total_price, b.hotel_id, b.room_type_id
        FROM bookings b
        JOIN hotels h ON b.hotel_id = h.id
        JOIN room_types rt ON b.room_type_id = rt.id
        WHERE b.total_price = 18500
    "#,
};

/// Run order, which is also the key order of the written document
pub const DIAGNOSTIC_QUERIES: [DiagnosticQuery; 3] =
    [HOTELS_QUERY, SBH2_ROOM_TYPES_QUERY, EXPENSIVE_BOOKINGS_QUERY];

/// Rows are kept in the order the database returned them; no query sorts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiagnosticReport {
    pub hotels: Vec<RowRecord>,
    pub sbh2_room_types: Vec<RowRecord>,
    pub expensive_bookings: Vec<RowRecord>,
}

/// Where diagnostic rows come from.
///
/// `close` consumes the source, so it can run at most once.
#[allow(async_fn_in_trait)]
pub trait RecordSource {
    async fn fetch_records(&mut self, sql: &str) -> Result<Vec<RowRecord>, DbError>;

    async fn close(self);
}

impl RecordSource for DiagnosticConnection {
    async fn fetch_records(&mut self, sql: &str) -> Result<Vec<RowRecord>, DbError> {
        DiagnosticConnection::fetch_records(self, sql).await
    }

    async fn close(self) {
        DiagnosticConnection::close(self).await
    }
}

async fn run_query<S: RecordSource>(
    source: &mut S,
    query: DiagnosticQuery,
) -> Result<Vec<RowRecord>, DiagnosticError> {
    let rows = source
        .fetch_records(query.sql)
        .await
        .map_err(|source| DiagnosticError::Query {
            label: query.label,
            source,
        })?;

    info!(label = query.label, rows = rows.len(), "Query complete");
    Ok(rows)
}

/// Run the three diagnostic queries in order, stopping at the first failure.
pub async fn collect_report<S: RecordSource>(
    source: &mut S,
) -> Result<DiagnosticReport, DiagnosticError> {
    Ok(DiagnosticReport {
        hotels: run_query(source, HOTELS_QUERY).await?,
        sbh2_room_types: run_query(source, SBH2_ROOM_TYPES_QUERY).await?,
        expensive_bookings: run_query(source, EXPENSIVE_BOOKINGS_QUERY).await?,
    })
}

/// Serialize with four-space indentation, then write in one go so a
/// serialization failure leaves no file behind.
pub fn write_report(report: &DiagnosticReport, path: &Path) -> Result<(), DiagnosticError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    report.serialize(&mut serializer)?;

    fs::write(path, buf).map_err(|source| DiagnosticError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Collect and write the report, then close `source` whatever the outcome.
#[instrument(skip_all, fields(path = %path.display()))]
pub async fn run_diagnostic<S: RecordSource>(
    mut source: S,
    path: &Path,
) -> Result<DiagnosticReport, DiagnosticError> {
    let outcome = async {
        let report = collect_report(&mut source).await?;
        write_report(&report, path)?;
        Ok::<_, DiagnosticError>(report)
    }
    .await;

    source.close().await;
    outcome
}

/// Connect using `config` and run the full diagnostic.
pub async fn run(config: &DiagnosticConfig) -> Result<DiagnosticReport, DiagnosticError> {
    info!("Connecting to {}", config.redacted_url());
    let conn = DiagnosticConnection::connect(&config.database_url)
        .await
        .map_err(DiagnosticError::Connection)?;

    run_diagnostic(conn, &config.output_path).await
}

/// Run the diagnostic, reporting the outcome on stdout.
///
/// Failures of any kind are logged and printed, never returned: the caller
/// always exits normally.
pub async fn run_and_report(config: &DiagnosticConfig) -> Option<DiagnosticReport> {
    match run(config).await {
        Ok(report) => {
            println!(
                "Diagnostic complete. Results written to {}",
                config.output_path.display()
            );
            Some(report)
        }
        Err(e) => {
            error!(error = %e, "Diagnostic failed");
            println!("Error: {e}");
            None
        }
    }
}
