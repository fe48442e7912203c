//! Variant annotation against the gene index
//!
//! Each variant row is turned into one output row: its own fields followed
//! by a presence flag and a gene list per tier.

use crate::core::index::{GeneHit, GeneIndex, Tier};
use crate::core::{Result, SvAnnotateError};
use crate::formats::tsv::TsvReader;
use log::{debug, info};
use std::collections::{BTreeSet, HashSet};
use std::io::{BufRead, Write};
use std::path::Path;

/// Bases of padding added either side of each gene
pub const DEFAULT_PAD: i64 = 2000;

/// Window width around each breakend of a cross-chromosome variant
pub const DEFAULT_WINDOW: i64 = 50;

/// Columns every variant table must carry
pub const VARIANT_COLUMNS: [&str; 4] = ["chr1", "pos1", "chr2", "pos2"];

/// Run parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotateConfig {
    pub padding: i64,
    pub window: i64,
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PAD,
            window: DEFAULT_WINDOW,
        }
    }
}

impl AnnotateConfig {
    pub fn validate(&self) -> Result<()> {
        if self.padding < 0 {
            return Err(SvAnnotateError::InvalidConfiguration(format!(
                "padding must be non-negative, got {}",
                self.padding
            )));
        }
        if self.window < 0 {
            return Err(SvAnnotateError::InvalidConfiguration(format!(
                "window must be non-negative, got {}",
                self.window
            )));
        }
        Ok(())
    }
}

/// A closed genomic span to look up in the index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuerySpan<'a> {
    pub chrom: &'a str,
    pub start: i64,
    pub end: i64,
}

/// Spans to query for one variant
///
/// Same-chromosome variants cover everything between the breakends, in
/// either order. Otherwise each breakend gets its own window of
/// `[pos - half, pos + half - 1]`, clamped at zero on the left.
pub fn query_spans<'a>(
    chr1: &'a str,
    pos1: i64,
    chr2: &'a str,
    pos2: i64,
    half_window: i64,
) -> Vec<QuerySpan<'a>> {
    if chr1 == chr2 {
        return vec![QuerySpan {
            chrom: chr1,
            start: pos1.min(pos2),
            end: pos1.max(pos2),
        }];
    }

    [(chr1, pos1), (chr2, pos2)]
        .into_iter()
        .map(|(chrom, pos)| QuerySpan {
            chrom,
            start: pos.saturating_sub(half_window).max(0),
            end: pos.saturating_add(half_window - 1),
        })
        .collect()
}

/// Counters reported after a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationStats {
    pub total: usize,
    pub with_hits: usize,
    pub cross_chrom: usize,
}

/// Annotates variants against a built index
pub struct VariantAnnotator<'a> {
    index: &'a GeneIndex,
    tiers: Vec<Tier>,
    half_window: i64,
}

impl<'a> VariantAnnotator<'a> {
    pub fn new(index: &'a GeneIndex, window: i64) -> Self {
        Self {
            index,
            tiers: index.tiers().iter().copied().collect(),
            half_window: window / 2,
        }
    }

    /// Tiers in output order
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Variant columns followed by `tierN` / `tierN genes` per tier
    pub fn header(&self, fieldnames: &[String]) -> Vec<String> {
        let mut header = fieldnames.to_vec();
        for tier in &self.tiers {
            header.push(format!("tier{}", tier));
            header.push(format!("tier{} genes", tier));
        }
        header
    }

    /// Union of index hits over every span of the variant
    pub fn overlaps(&self, chr1: &str, pos1: i64, chr2: &str, pos2: i64) -> BTreeSet<&'a GeneHit> {
        let index = self.index;
        query_spans(chr1, pos1, chr2, pos2, self.half_window)
            .into_iter()
            .flat_map(|span| index.query(span.chrom, span.start, span.end))
            .collect()
    }

    /// Flag and gene list pair for each known tier
    pub fn tier_columns(&self, hits: &BTreeSet<&GeneHit>) -> Vec<String> {
        let mut columns = Vec::with_capacity(self.tiers.len() * 2);
        for tier in &self.tiers {
            // hits are ordered by tier, then gene
            let genes: Vec<&str> = hits
                .iter()
                .filter(|hit| hit.tier == *tier)
                .map(|hit| hit.gene.as_str())
                .collect();
            if genes.is_empty() {
                columns.push("0".to_string());
                columns.push(String::new());
            } else {
                columns.push("1".to_string());
                columns.push(genes.join(";"));
            }
        }
        columns
    }

    /// Annotate a variant table, writing the header and one row per variant
    pub fn annotate_reader<R: BufRead, W: Write>(
        &self,
        mut reader: TsvReader<R>,
        out: &mut W,
    ) -> Result<AnnotationStats> {
        let [chr1_col, pos1_col, chr2_col, pos2_col] = variant_columns(&reader)?;

        write_row(out, self.header(reader.headers()).iter().map(String::as_str))?;

        let mut stats = AnnotationStats::default();
        let mut unannotated: HashSet<String> = HashSet::new();
        while let Some(record) = reader.next_record()? {
            let chr1 = record.get(chr1_col);
            let pos1 = record.parse_int(pos1_col, "pos1")?;
            let chr2 = record.get(chr2_col);
            let pos2 = record.parse_int(pos2_col, "pos2")?;

            for chrom in [chr1, chr2] {
                if !self.index.has_chrom(chrom) && unannotated.insert(chrom.to_string()) {
                    debug!("No annotations on chromosome {}", chrom);
                }
            }

            let hits = self.overlaps(chr1, pos1, chr2, pos2);
            stats.total += 1;
            if chr1 != chr2 {
                stats.cross_chrom += 1;
            }
            if !hits.is_empty() {
                stats.with_hits += 1;
            }

            let tier_columns = self.tier_columns(&hits);
            let mut row: Vec<&str> = record.fields().to_vec();
            row.extend(tier_columns.iter().map(String::as_str));
            write_row(out, row)?;
        }

        out.flush().map_err(SvAnnotateError::Output)?;
        Ok(stats)
    }

    /// Annotate a (possibly compressed) variant file
    ///
    /// The file is read twice: a first pass checks every row so that a
    /// malformed table fails before anything reaches `out`.
    pub fn annotate_path<P: AsRef<Path>, W: Write>(&self, path: P, out: &mut W) -> Result<AnnotationStats> {
        let path = path.as_ref();
        let rows = validate_variants(TsvReader::from_path(path)?)?;
        info!("Annotating {} variants from {:?}", rows, path);
        let stats = self.annotate_reader(TsvReader::from_path(path)?, out)?;
        info!(
            "Annotated {} variants ({} with hits, {} cross-chromosome)",
            stats.total, stats.with_hits, stats.cross_chrom
        );
        Ok(stats)
    }
}

fn variant_columns<R: BufRead>(reader: &TsvReader<R>) -> Result<[usize; 4]> {
    let mut cols = [0usize; 4];
    for (slot, name) in cols.iter_mut().zip(VARIANT_COLUMNS) {
        *slot = reader.column(name)?;
    }
    Ok(cols)
}

/// Check required columns, field counts and breakend positions of a
/// variant table without annotating it, returning the row count
pub fn validate_variants<R: BufRead>(mut reader: TsvReader<R>) -> Result<usize> {
    let [_, pos1_col, _, pos2_col] = variant_columns(&reader)?;
    let mut rows = 0usize;
    while let Some(record) = reader.next_record()? {
        record.parse_int(pos1_col, "pos1")?;
        record.parse_int(pos2_col, "pos2")?;
        rows += 1;
    }
    Ok(rows)
}

fn write_row<'f, W, I>(out: &mut W, fields: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'f str>,
{
    let mut first = true;
    for field in fields {
        if !first {
            out.write_all(b"\t").map_err(SvAnnotateError::Output)?;
        }
        out.write_all(field.as_bytes()).map_err(SvAnnotateError::Output)?;
        first = false;
    }
    out.write_all(b"\n").map_err(SvAnnotateError::Output)
}
