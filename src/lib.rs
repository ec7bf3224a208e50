mod columns;
mod credential;
mod dashboard;
mod decode;
mod error;
mod input;
mod record;
mod reduce;
mod scope;
mod session;

pub mod config;
pub mod mock;
pub mod report;

pub use columns::{Field, Measure};
pub use credential::{
    authenticate, credentials_from_table, fallback_credentials, load_credentials, Credential,
    ADMIN_NAME,
};
pub use dashboard::{Dashboard, Rankings};
pub use decode::{decode, decode_strict};
pub use error::{Error, Result};
pub use input::{export_url, ReaderSource, SheetSource, Source};
pub use record::{load_records, parse_number, records_from_table, Record};
pub use reduce::{Entry, Reduce, DEFAULT_LIMIT};
pub use scope::{client_options, Scope, GLOBAL};
pub use session::{Refresh, Refresher, Session, Snapshot};

/// A decoded line of a CSV document.
pub type Row = csv::StringRecord;
