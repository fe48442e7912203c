//! End-to-end tests for the svannotate binary
//!
//! Runs the compiled binary over temporary input files and checks stdout
//! and exit statuses.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::{NamedTempFile, TempDir};

const ANNOTATIONS: &str = "\
chrom\tstart\tend\tgene\ttier
chr17\t7661779\t7687538\tTP53\t1
chr17\t43044295\t43125483\tBRCA1\t1
chr12\t25205246\t25250929\tKRAS\t2
chr8\t127735434\t127742951\tMYC\t3
";

const VARIANTS: &str = "\
id\tchr1\tpos1\tchr2\tpos2\tsupport
sv1\tchr17\t7000000\tchr17\t44000000\t12
sv2\tchr12\t25250950\tchr8\t127735400\t5
sv3\tchr1\t100\tchr1\t200\t3
";

const EXPECTED: &str = "\
id\tchr1\tpos1\tchr2\tpos2\tsupport\ttier1\ttier1 genes\ttier2\ttier2 genes\ttier3\ttier3 genes
sv1\tchr17\t7000000\tchr17\t44000000\t12\t1\tBRCA1;TP53\t0\t\t0\t
sv2\tchr12\t25250950\tchr8\t127735400\t5\t0\t\t1\tKRAS\t1\tMYC
sv3\tchr1\t100\tchr1\t200\t3\t0\t\t0\t\t0\t
";

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn svannotate(args: &[&str], annotations: &Path, variants: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_svannotate"))
        .args(args)
        .arg("--annotations")
        .arg(annotations)
        .arg(variants)
        .output()
        .expect("failed to run svannotate")
}

#[test]
fn test_annotates_variants() {
    let annotations = write_temp(ANNOTATIONS);
    let variants = write_temp(VARIANTS);

    let output = svannotate(&[], annotations.path(), variants.path());
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8(output.stdout).unwrap(), EXPECTED);
}

#[test]
fn test_output_is_reproducible() {
    let annotations = write_temp(ANNOTATIONS);
    let variants = write_temp(VARIANTS);

    let first = svannotate(&[], annotations.path(), variants.path());
    let second = svannotate(&[], annotations.path(), variants.path());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_pad_and_window_options() {
    // sv2 breakends sit 21 and 34 bases outside KRAS and MYC
    let annotations = write_temp(ANNOTATIONS);
    let variants = write_temp(VARIANTS);

    let output = svannotate(&["--pad", "0", "--window", "2"], annotations.path(), variants.path());
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let sv2 = stdout.lines().find(|l| l.starts_with("sv2")).unwrap();
    assert_eq!(sv2, "sv2\tchr12\t25250950\tchr8\t127735400\t5\t0\t\t0\t\t0\t");
}

#[test]
fn test_gzip_annotations() {
    let dir = TempDir::new().unwrap();
    let gz_path = dir.path().join("genes.tsv.gz");
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(ANNOTATIONS.as_bytes()).unwrap();
    std::fs::write(&gz_path, encoder.finish().unwrap()).unwrap();
    let variants = write_temp(VARIANTS);

    let output = svannotate(&[], &gz_path, variants.path());
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), EXPECTED);
}

#[test]
fn test_log_file_written() {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("run.log");
    let annotations = write_temp(ANNOTATIONS);
    let variants = write_temp(VARIANTS);

    let output = svannotate(&["--log", log_path.to_str().unwrap()], annotations.path(), variants.path());
    assert!(output.status.success());
    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(log.contains("computation started"));
    assert!(log.contains("command line:"));
}

#[test]
fn test_missing_input_is_configuration_error() {
    let annotations = write_temp(ANNOTATIONS);
    let output = svannotate(&[], annotations.path(), Path::new("/nonexistent/variants.tsv"));
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("svannotate ERROR:"));
}

#[test]
fn test_negative_padding_rejected() {
    let annotations = write_temp(ANNOTATIONS);
    let variants = write_temp(VARIANTS);
    let output = svannotate(&["--pad", "-5"], annotations.path(), variants.path());
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_malformed_annotation_is_data_error() {
    let annotations = write_temp("chrom\tstart\tend\tgene\ttier\nchr1\t10\t20\tA\tfirst\n");
    let variants = write_temp(VARIANTS);
    let output = svannotate(&[], annotations.path(), variants.path());
    assert_eq!(output.status.code(), Some(3));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_missing_variant_column_is_data_error() {
    let annotations = write_temp(ANNOTATIONS);
    let variants = write_temp("chr1\tpos1\tchr2\nchr1\t1\tchr1\n");
    let output = svannotate(&[], annotations.path(), variants.path());
    assert_eq!(output.status.code(), Some(3));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_bad_variant_row_after_good_rows_writes_nothing() {
    let annotations = write_temp("chrom\tstart\tend\tgene\ttier\nchr1\t1\t100\tA\t1\n");
    let variants = write_temp("chr1\tpos1\tchr2\tpos2\nchr1\t10\tchr1\t20\nchr1\t10\tchr1\tten\n");
    let output = svannotate(&[], annotations.path(), variants.path());
    assert_eq!(output.status.code(), Some(3));
    assert!(output.stdout.is_empty(), "stdout: {}", String::from_utf8_lossy(&output.stdout));
}

#[test]
fn test_unreadable_variants_is_file_error() {
    let annotations = write_temp(ANNOTATIONS);
    let dir = TempDir::new().unwrap();
    let output = svannotate(&[], annotations.path(), dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("svannotate ERROR:"));
}
