//! Input opening and line reading
//!
//! Inputs may be plain text, gzip or bzip2. The format is chosen from the
//! file extension first and the leading magic bytes second.

use bzip2::read::BzDecoder;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Default buffer size for BufReader (128KB)
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Compression format of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    /// Plain text (uncompressed)
    Plain,
    /// Gzip or bgzip compressed (.gz)
    Gzip,
    /// Bzip2 compressed (.bz2)
    Bzip2,
}

impl CompressionFormat {
    /// Classify from the first bytes of a file
    pub fn from_magic(magic: &[u8]) -> Self {
        if magic.len() >= 2 && magic[0] == 0x1f && magic[1] == 0x8b {
            CompressionFormat::Gzip
        } else if magic.len() >= 3 && &magic[..3] == b"BZh" {
            CompressionFormat::Bzip2
        } else {
            CompressionFormat::Plain
        }
    }
}

/// Detect compression format from file path and/or content
pub fn detect_compression(path: &Path) -> io::Result<CompressionFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("gz") => return Ok(CompressionFormat::Gzip),
        Some("bz2") => return Ok(CompressionFormat::Bzip2),
        _ => {}
    }

    let mut file = File::open(path)?;
    let mut magic = [0u8; 3];
    let mut filled = 0;
    // short reads are legal, keep going until EOF or 3 bytes
    while filled < magic.len() {
        let n = file.read(&mut magic[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(CompressionFormat::from_magic(&magic[..filled]))
}

/// Buffered reader over a possibly compressed input file
pub enum InputReader {
    Plain(BufReader<File>),
    Gzip(BufReader<MultiGzDecoder<File>>),
    Bzip2(BufReader<BzDecoder<File>>),
}

impl InputReader {
    /// Open `path`, detecting its compression format
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let format = detect_compression(path)?;
        let file = File::open(path)?;

        Ok(match format {
            CompressionFormat::Plain => {
                InputReader::Plain(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file))
            }
            CompressionFormat::Gzip => InputReader::Gzip(BufReader::with_capacity(
                DEFAULT_BUFFER_SIZE,
                MultiGzDecoder::new(file),
            )),
            CompressionFormat::Bzip2 => InputReader::Bzip2(BufReader::with_capacity(
                DEFAULT_BUFFER_SIZE,
                BzDecoder::new(file),
            )),
        })
    }

    pub fn format(&self) -> CompressionFormat {
        match self {
            InputReader::Plain(_) => CompressionFormat::Plain,
            InputReader::Gzip(_) => CompressionFormat::Gzip,
            InputReader::Bzip2(_) => CompressionFormat::Bzip2,
        }
    }
}

impl Read for InputReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            InputReader::Plain(reader) => reader.read(buf),
            InputReader::Gzip(reader) => reader.read(buf),
            InputReader::Bzip2(reader) => reader.read(buf),
        }
    }
}

impl BufRead for InputReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            InputReader::Plain(reader) => reader.fill_buf(),
            InputReader::Gzip(reader) => reader.fill_buf(),
            InputReader::Bzip2(reader) => reader.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            InputReader::Plain(reader) => reader.consume(amt),
            InputReader::Gzip(reader) => reader.consume(amt),
            InputReader::Bzip2(reader) => reader.consume(amt),
        }
    }
}

/// Line iterator that reuses a buffer to avoid allocations
pub struct LineIterator<R: BufRead> {
    reader: R,
    buffer: String,
    line_number: usize,
}

impl<R: BufRead> LineIterator<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::with_capacity(1024),
            line_number: 0,
        }
    }

    /// Read the next line into the internal buffer
    /// Returns None at EOF, Some(Ok(&str)) on success, Some(Err) on error
    pub fn next_line(&mut self) -> Option<io::Result<&str>> {
        self.buffer.clear();
        match self.reader.read_line(&mut self.buffer) {
            Ok(0) => None, // EOF
            Ok(_) => {
                self.line_number += 1;
                if self.buffer.ends_with('\n') {
                    self.buffer.pop();
                    if self.buffer.ends_with('\r') {
                        self.buffer.pop();
                    }
                }
                Some(Ok(&self.buffer))
            }
            Err(e) => Some(Err(e)),
        }
    }

    /// The line most recently returned by `next_line`
    pub fn current(&self) -> &str {
        &self.buffer
    }

    /// 1-based number of the line most recently returned
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}
