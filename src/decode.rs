//! Turns raw comma separated text into rows of fields.
//!
//! Rows may have any number of fields and any input decodes to something,
//! possibly nothing. Row 0 is not treated specially here.
use std::iter::Peekable;
use std::mem;
use std::str::Chars;

use tracing::debug;

use crate::{Error, Row};
use crate::error::Result;

struct Scanner<'a> {
    chars: Peekable<Chars<'a>>,
    rows: Vec<Row>,
    row: Row,
    field: String,
    quoted: bool,
    quote_row: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Scanner<'a> {
        Scanner {
            chars: text.chars().peekable(),
            rows: Vec::new(),
            row: Row::new(),
            field: String::new(),
            quoted: false,
            quote_row: 0,
        }
    }

    fn end_field(&mut self) {
        self.row.push_field(&self.field);
        self.field.clear();
    }

    /// Closes the current row unless there is nothing in it, which is what
    /// keeps blank lines out of the output.
    fn end_row(&mut self) {
        if !self.field.is_empty() || !self.row.is_empty() {
            self.end_field();
            self.rows.push(mem::replace(&mut self.row, Row::new()));
        }
    }

    fn run(mut self) -> (Vec<Row>, Option<usize>) {
        while let Some(c) = self.chars.next() {
            if self.quoted {
                match c {
                    '"' if self.chars.peek() == Some(&'"') => {
                        self.field.push('"');
                        self.chars.next();
                    }
                    '"' => self.quoted = false,
                    _ => self.field.push(c),
                }
            } else {
                match c {
                    '"' => {
                        self.quoted = true;
                        self.quote_row = self.rows.len() + 1;
                    }
                    ',' => self.end_field(),
                    '\r' | '\n' => {
                        self.end_row();

                        if c == '\r' && self.chars.peek() == Some(&'\n') {
                            self.chars.next();
                        }
                    }
                    _ => self.field.push(c),
                }
            }
        }

        let unterminated = if self.quoted { Some(self.quote_row) } else { None };

        self.end_row();

        (self.rows, unterminated)
    }
}

/// Decodes the whole text into rows. Never fails: an unterminated quote
/// swallows the rest of the input as the content of the last field.
pub fn decode(text: &str) -> Vec<Row> {
    let (rows, unterminated) = Scanner::new(text).run();

    if let Some(row) = unterminated {
        debug!(row, "quoted field never closed, flushing it as is");
    }

    debug!(rows = rows.len(), "decoded table");

    rows
}

/// Same rules as [`decode`] but refuses input that ends inside a quoted
/// field.
pub fn decode_strict(text: &str) -> Result<Vec<Row>> {
    match Scanner::new(text).run() {
        (_, Some(row)) => Err(Error::UnterminatedQuote { row }),
        (rows, None) => Ok(rows),
    }
}
