//! File format adapters
//!
//! Tab-separated tables with a header row, used for both the annotation
//! and the variant inputs.

pub mod tsv;

pub use tsv::{split_fields, TsvReader, TsvRecord};
