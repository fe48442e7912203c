//! Header-driven TSV reader
//!
//! The first non-empty line names the columns. Each following non-empty line
//! is split on tabs and must carry at least as many fields as the header;
//! trailing extras are dropped.

use crate::core::io::{InputReader, LineIterator};
use crate::core::{DataFormatError, Result, SvAnnotateError};
use memchr::memchr_iter;
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Split a line on tab characters
pub fn split_fields(line: &str) -> Vec<&str> {
    let bytes = line.as_bytes();
    let mut fields = Vec::with_capacity(16);
    let mut start = 0;
    for tab in memchr_iter(b'\t', bytes) {
        fields.push(&line[start..tab]);
        start = tab + 1;
    }
    fields.push(&line[start..]);
    fields
}

/// One data row borrowed from the reader's line buffer
#[derive(Debug)]
pub struct TsvRecord<'a> {
    line: usize,
    fields: Vec<&'a str>,
}

impl<'a> TsvRecord<'a> {
    /// 1-based line number in the source
    pub fn line(&self) -> usize {
        self.line
    }

    /// Field values, one per header column
    pub fn fields(&self) -> &[&'a str] {
        &self.fields
    }

    pub fn get(&self, index: usize) -> &'a str {
        self.fields[index]
    }

    /// Parse the field at `index` as an integer, `column` names it in errors
    pub fn parse_int(&self, index: usize, column: &str) -> std::result::Result<i64, DataFormatError> {
        let value = self.fields[index];
        value
            .trim()
            .parse::<i64>()
            .map_err(|_| DataFormatError::invalid_integer(column, value, self.line))
    }
}

/// TSV table reader with named columns
pub struct TsvReader<R: BufRead> {
    lines: LineIterator<R>,
    headers: Vec<String>,
    source: PathBuf,
}

impl TsvReader<InputReader> {
    /// Open a (possibly compressed) TSV file and read its header
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = InputReader::open(path).map_err(|e| SvAnnotateError::file_access(path, e))?;
        Self::with_source(reader, path)
    }
}

impl<R: BufRead> TsvReader<R> {
    /// Read the header from an in-memory or already opened stream
    pub fn new(reader: R) -> Result<Self> {
        Self::with_source(reader, "<stream>")
    }

    fn with_source(reader: R, source: impl Into<PathBuf>) -> Result<Self> {
        let source = source.into();
        let mut lines = LineIterator::new(reader);
        let headers: Vec<String> = loop {
            match lines.next_line() {
                None => return Err(DataFormatError::EmptyInput.into()),
                Some(Err(e)) => return Err(SvAnnotateError::file_access(source, e)),
                Some(Ok(line)) if line.is_empty() => continue,
                Some(Ok(line)) => break split_fields(line).into_iter().map(String::from).collect(),
            }
        };

        Ok(Self {
            lines,
            headers,
            source,
        })
    }

    /// Column names in source order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Index of a required column
    pub fn column(&self, name: &str) -> std::result::Result<usize, DataFormatError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DataFormatError::missing_column(name))
    }

    /// Read the next data row, skipping blank lines
    pub fn next_record(&mut self) -> Result<Option<TsvRecord<'_>>> {
        let expected = self.headers.len();
        loop {
            match self.lines.next_line() {
                None => return Ok(None),
                Some(Err(e)) => return Err(SvAnnotateError::file_access(&self.source, e)),
                Some(Ok(line)) if line.is_empty() => continue,
                Some(Ok(_)) => break,
            }
        }

        let line = self.lines.line_number();
        let mut fields = split_fields(self.lines.current());
        if fields.len() < expected {
            return Err(DataFormatError::TooFewFields {
                line,
                expected,
                found: fields.len(),
            }
            .into());
        }
        fields.truncate(expected);
        Ok(Some(TsvRecord { line, fields }))
    }
}
