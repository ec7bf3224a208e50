use encoding::{DecoderTrap, Encoding, EncodingRef};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;

/// Base address of a spreadsheet's CSV export.
pub const SHEET_EXPORT_URL: &str = "https://docs.google.com/spreadsheets/d";

/// Turns the raw bytes of a document into text. Bytes that are invalid for
/// the given encoding are replaced instead of failing the whole document.
fn decode_bytes(data: &[u8], encoding: EncodingRef) -> String {
    // with DecoderTrap::Replace decoding can't fail
    encoding
        .decode(data, DecoderTrap::Replace)
        .unwrap_or_else(|_| String::from_utf8_lossy(data).into_owned())
}

/// Somewhere the text of a CSV document can be fetched from.
///
/// Implementors are shared with the background refresher, hence the bounds.
pub trait Source: Send + Sync {
    /// Retrieves the whole document.
    fn fetch(&self) -> Result<String>;

    /// Human readable location, for logs.
    fn describe(&self) -> String;
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn fetch(&self) -> Result<String> {
        (**self).fetch()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// A document stored in the local filesystem.
pub struct ReaderSource {
    path: PathBuf,
    encoding: EncodingRef,
}

impl ReaderSource {
    pub fn from_path<P: AsRef<Path>>(path: P, encoding: EncodingRef) -> ReaderSource {
        ReaderSource {
            path: path.as_ref().to_path_buf(),
            encoding,
        }
    }
}

impl Source for ReaderSource {
    fn fetch(&self) -> Result<String> {
        let data = fs::read(&self.path)?;

        debug!(path = ?self.path, bytes = data.len(), "read file");

        Ok(decode_bytes(&data, self.encoding))
    }

    fn describe(&self) -> String {
        self.path.to_string_lossy().to_string()
    }
}

/// One tab of a published spreadsheet, downloaded as CSV.
pub struct SheetSource {
    url: String,
    client: reqwest::blocking::Client,
    encoding: EncodingRef,
}

impl SheetSource {
    pub fn from_url(url: &str, encoding: EncodingRef) -> SheetSource {
        SheetSource {
            url: url.to_string(),
            client: reqwest::blocking::Client::new(),
            encoding,
        }
    }

    /// The export of tab `gid` of spreadsheet `sheet_id`.
    pub fn export(sheet_id: &str, gid: &str, encoding: EncodingRef) -> SheetSource {
        SheetSource::from_url(&export_url(sheet_id, gid), encoding)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

pub fn export_url(sheet_id: &str, gid: &str) -> String {
    format!("{}/{}/export?format=csv&gid={}", SHEET_EXPORT_URL, sheet_id, gid)
}

impl Source for SheetSource {
    fn fetch(&self) -> Result<String> {
        let response = self.client.get(&self.url).send()?.error_for_status()?;
        let data = response.bytes()?;

        debug!(url = %self.url, bytes = data.len(), "downloaded sheet");

        Ok(decode_bytes(&data, self.encoding))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
