use std::io;
use std::result;

use thiserror::Error;

/// An error found somewhere between fetching a document and rendering its
/// rankings.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("could not fetch data: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Only raised by the strict decoder, the lenient one flushes the field.
    #[error("quoted field opened in row {row} is never closed")]
    UnterminatedQuote { row: usize },

    #[error("Invalid Name or Api Key. Please try again.")]
    InvalidCredentials,

    #[error("unknown encoding label: {0}")]
    UnknownEncoding(String),

    #[error("requested column that was not found: {0}")]
    UnknownField(String),

    #[error("could not render template: {0}")]
    Template(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = result::Result<T, Error>;
