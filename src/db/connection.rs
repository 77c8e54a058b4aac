use sqlx::{Connection, MySqlConnection};
use tracing::{debug, instrument, warn};

use crate::db::{row_to_record, DbError, RowRecord};

/// A single MySQL connection held for one diagnostic run
pub struct DiagnosticConnection {
    conn: MySqlConnection,
}

impl DiagnosticConnection {
    #[instrument(skip(database_url))]
    pub async fn connect(database_url: &str) -> Result<Self, DbError> {
        let conn = MySqlConnection::connect(database_url).await?;
        debug!("Database connection established");
        Ok(Self { conn })
    }

    #[instrument(skip(self))]
    pub async fn fetch_records(&mut self, sql: &str) -> Result<Vec<RowRecord>, DbError> {
        let rows = sqlx::query(sql).fetch_all(&mut self.conn).await?;
        debug!("Fetched {} rows", rows.len());

        rows.iter().map(row_to_record).collect()
    }

    /// Close the connection, sending COM_QUIT. A failed close is only logged.
    pub async fn close(self) {
        if let Err(e) = self.conn.close().await {
            warn!(error = %e, "Failed to close database connection cleanly");
        } else {
            debug!("Database connection closed");
        }
    }
}
