//! Core annotation functionality
//!
//! This module contains the gene interval index, the variant annotator
//! and the shared error and input plumbing.

mod annotator;
mod error;
mod index;
pub mod io;

pub use annotator::{
    query_spans, validate_variants, AnnotateConfig, AnnotationStats, QuerySpan, VariantAnnotator,
    DEFAULT_PAD, DEFAULT_WINDOW, VARIANT_COLUMNS,
};
pub use error::{
    DataFormatError, Result, SvAnnotateError,
    EXIT_COMMAND_LINE_ERROR, EXIT_FILE_IO_ERROR, EXIT_TSV_FILE_ERROR,
};
pub use index::{GeneAnnotation, GeneHit, GeneIndex, GeneIndexBuilder, GeneInterval, Tier, ANNOTATION_COLUMNS};
pub use io::{detect_compression, CompressionFormat, InputReader, LineIterator, DEFAULT_BUFFER_SIZE};
