//! Interval index over padded gene regions
//!
//! Uses rust-lapper for O(log n + k) overlap queries, one Lapper per
//! chromosome. Intervals are closed on both ends. Signed coordinates are
//! mapped onto `u64` with an order-preserving transform so that padded
//! starts may fall below zero.

use crate::core::{DataFormatError, Result};
use crate::formats::tsv::TsvReader;
use log::{debug, info};
use rust_lapper::{Interval, Lapper};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::io::BufRead;
use std::path::Path;

/// Columns every annotation table must carry
pub const ANNOTATION_COLUMNS: [&str; 5] = ["chrom", "start", "end", "gene", "tier"];

/// Opaque grouping label of a gene annotation
///
/// Tiers carry no priority semantics, only an ordering used to lay out
/// output columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tier(pub i64);

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payload stored in each interval
///
/// Ordered by tier first so that a sorted set of hits is already grouped
/// by tier with genes alphabetical inside each group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GeneHit {
    pub tier: Tier,
    pub gene: String,
}

/// One row of the annotation table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneAnnotation {
    pub chrom: String,
    pub start: i64,
    pub end: i64,
    pub gene: String,
    pub tier: Tier,
}

/// Type alias for gene intervals
pub type GeneInterval = Interval<u64, GeneHit>;

const SIGN_BIT: u64 = 1 << 63;

/// Map a signed coordinate onto `u64`, keeping order
#[inline]
fn encode(pos: i64) -> u64 {
    (pos as u64) ^ SIGN_BIT
}

#[inline]
fn decode(key: u64) -> i64 {
    (key ^ SIGN_BIT) as i64
}

/// Collects padded intervals per chromosome until the index is frozen
#[derive(Debug, Default)]
pub struct GeneIndexBuilder {
    padding: i64,
    pending: HashMap<String, Vec<GeneInterval>>,
    tiers: BTreeSet<Tier>,
}

impl GeneIndexBuilder {
    pub fn new(padding: i64) -> Self {
        Self {
            padding,
            ..Self::default()
        }
    }

    /// Pad an annotation and queue it under its chromosome
    ///
    /// Coordinates given in the wrong order are swapped before padding.
    /// Table input never reaches this with `end < start`: `from_reader`
    /// rejects such rows as `InvertedInterval` first.
    pub fn insert(&mut self, annotation: GeneAnnotation) {
        let low = annotation.start.min(annotation.end);
        let high = annotation.start.max(annotation.end);
        let start = low.saturating_sub(self.padding);
        let end = high.saturating_add(self.padding);

        self.tiers.insert(annotation.tier);
        self.pending
            .entry(annotation.chrom)
            .or_default()
            .push(Interval {
                start: encode(start),
                stop: encode(end).saturating_add(1),
                val: GeneHit {
                    tier: annotation.tier,
                    gene: annotation.gene,
                },
            });
    }

    /// Build one Lapper per chromosome
    pub fn finish(self) -> GeneIndex {
        let maps = self
            .pending
            .into_iter()
            .map(|(chrom, intervals)| (chrom, Lapper::new(intervals)))
            .collect();

        GeneIndex {
            maps,
            tiers: self.tiers,
        }
    }
}

/// Gene index organized by chromosome
///
/// Read-only once built.
pub struct GeneIndex {
    /// Chromosome -> interval tree (using Lapper)
    maps: HashMap<String, Lapper<u64, GeneHit>>,
    /// Every tier seen while building
    tiers: BTreeSet<Tier>,
}

impl GeneIndex {
    /// Build from already parsed annotations
    ///
    /// Accepts `end < start` and indexes the swapped span, see
    /// `GeneIndexBuilder::insert`.
    pub fn from_annotations<I>(padding: i64, annotations: I) -> Self
    where
        I: IntoIterator<Item = GeneAnnotation>,
    {
        let mut builder = GeneIndexBuilder::new(padding);
        for annotation in annotations {
            builder.insert(annotation);
        }
        builder.finish()
    }

    /// Build from an annotation table
    ///
    /// The first malformed row aborts the build.
    pub fn from_reader<R: BufRead>(padding: i64, mut reader: TsvReader<R>) -> Result<Self> {
        let [chrom_col, start_col, end_col, gene_col, tier_col] = {
            let mut cols = [0usize; 5];
            for (slot, name) in cols.iter_mut().zip(ANNOTATION_COLUMNS) {
                *slot = reader.column(name)?;
            }
            cols
        };

        let mut builder = GeneIndexBuilder::new(padding);
        let mut rows = 0usize;
        while let Some(record) = reader.next_record()? {
            let tier = record.parse_int(tier_col, "tier")?;
            let start = record.parse_int(start_col, "start")?;
            let end = record.parse_int(end_col, "end")?;
            if end < start {
                return Err(DataFormatError::InvertedInterval {
                    line: record.line(),
                    start,
                    end,
                }
                .into());
            }

            builder.insert(GeneAnnotation {
                chrom: record.get(chrom_col).to_string(),
                start,
                end,
                gene: record.get(gene_col).to_string(),
                tier: Tier(tier),
            });
            rows += 1;
        }

        let index = builder.finish();
        debug!(
            "Indexed {} annotation rows on {} chromosomes across {} tiers",
            rows,
            index.maps.len(),
            index.tiers.len()
        );
        Ok(index)
    }

    /// Build from a (possibly compressed) annotation file
    pub fn from_path<P: AsRef<Path>>(padding: i64, path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Reading annotations from {:?} (padding {})", path, padding);
        Self::from_reader(padding, TsvReader::from_path(path)?)
    }

    /// Genes whose padded interval intersects `[start, end]`
    ///
    /// Both ends are inclusive, for the query and for the stored padded
    /// interval: a gene padded to `[S-P, E+P]` is hit by `[E+P, E+P]`.
    /// A half-open store of `[S-P, E+P)` would miss that point. Unknown
    /// chromosomes and inverted spans yield an empty set.
    pub fn query(&self, chrom: &str, start: i64, end: i64) -> BTreeSet<&GeneHit> {
        if start > end {
            return BTreeSet::new();
        }

        match self.maps.get(chrom) {
            Some(lapper) => lapper
                .find(encode(start), encode(end).saturating_add(1))
                .map(|iv| &iv.val)
                .collect(),
            None => BTreeSet::new(),
        }
    }

    /// Padded closed spans stored for `gene` on `chrom`
    pub fn gene_spans(&self, chrom: &str, gene: &str) -> Vec<(i64, i64)> {
        self.maps
            .get(chrom)
            .map(|lapper| {
                lapper
                    .iter()
                    .filter(|iv| iv.val.gene == gene)
                    .map(|iv| (decode(iv.start), decode(iv.stop - 1)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Distinct tiers in ascending order
    pub fn tiers(&self) -> &BTreeSet<Tier> {
        &self.tiers
    }

    /// Check if a chromosome exists in the index
    pub fn has_chrom(&self, chrom: &str) -> bool {
        self.maps.contains_key(chrom)
    }

    /// Get all chromosome names
    pub fn chroms(&self) -> impl Iterator<Item = &str> {
        self.maps.keys().map(|s| s.as_str())
    }

    /// Get the number of intervals for a chromosome
    pub fn interval_count(&self, chrom: &str) -> usize {
        self.maps.get(chrom).map(|l| l.len()).unwrap_or(0)
    }

    /// Get total number of intervals across all chromosomes
    pub fn total_intervals(&self) -> usize {
        self.maps.values().map(|l| l.len()).sum()
    }
}
