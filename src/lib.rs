//! svannotate - tiered gene annotation of structural variants
//!
//! Reads a table of gene regions tagged with tiers, pads them and indexes
//! them per chromosome, then annotates each structural variant breakend
//! pair with the genes it overlaps, grouped by tier.
//!
//! # Example
//!
//! ```ignore
//! use svannotate::{GeneIndex, VariantAnnotator};
//!
//! // Build the padded gene index
//! let index = GeneIndex::from_path(2000, "genes.tsv")?;
//!
//! // Annotate variants to stdout
//! let annotator = VariantAnnotator::new(&index, 50);
//! annotator.annotate_path("variants.tsv", &mut std::io::stdout().lock())?;
//! ```

pub mod core;
pub mod formats;

// Re-export commonly used types
pub use crate::core::{
    AnnotateConfig, AnnotationStats, DataFormatError, GeneAnnotation, GeneHit, GeneIndex,
    Result, SvAnnotateError, Tier, VariantAnnotator, DEFAULT_PAD, DEFAULT_WINDOW,
};
pub use crate::formats::tsv;
