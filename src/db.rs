pub mod connection;
pub mod error;
pub mod record;

pub use connection::DiagnosticConnection;
pub use error::DbError;
pub use record::{row_to_record, RowRecord};
