//! svannotate CLI entry point
//!
//! Annotates structural variant breakends with overlapping tiered genes.

use anyhow::Context;
use clap::Parser;
use log::{error, info, LevelFilter};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;
use svannotate::core::{
    AnnotateConfig, GeneIndex, SvAnnotateError, VariantAnnotator, DEFAULT_PAD, DEFAULT_WINDOW,
    EXIT_FILE_IO_ERROR,
};

const PROGRAM_NAME: &str = "svannotate";

#[derive(Parser)]
#[command(name = "svannotate")]
#[command(about = "Annotate structural variant breakends with overlapping tiered genes")]
#[command(version)]
struct Cli {
    /// Record program progress in LOG_FILE
    #[arg(long = "log", value_name = "LOG_FILE")]
    log: Option<PathBuf>,

    /// Annotation file (chrom, start, end, gene, tier)
    #[arg(long = "annotations", value_name = "ANNOTATIONS")]
    annotations: PathBuf,

    /// Number of bases of padding on either side of gene
    #[arg(long = "pad", value_name = "PAD", default_value_t = DEFAULT_PAD, allow_negative_numbers = true)]
    pad: i64,

    /// Window size for cross chromosome breakends
    #[arg(long = "window", value_name = "WINDOW", default_value_t = DEFAULT_WINDOW, allow_negative_numbers = true)]
    window: i64,

    /// Input TSV file of variants (chr1, pos1, chr2, pos2, ...)
    #[arg(value_name = "TSV_FILE")]
    tsv_file: PathBuf,
}

impl Cli {
    fn config(&self) -> AnnotateConfig {
        AnnotateConfig {
            padding: self.pad,
            window: self.window,
        }
    }
}

/// Log to LOG_FILE at debug level when given, otherwise follow RUST_LOG
fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("could not create log file {:?}", path))?;
            env_logger::Builder::new()
                .filter_level(LevelFilter::Debug)
                .target(env_logger::Target::Pipe(Box::new(file)))
                .format(|buf, record| {
                    writeln!(buf, "{} {} - {}", buf.timestamp_seconds(), record.level(), record.args())
                })
                .try_init()?;
            info!("computation started");
            info!("command line: {}", std::env::args().collect::<Vec<_>>().join(" "));
        }
        None => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
                .try_init()?;
        }
    }
    Ok(())
}

fn exit_with_error(err: &SvAnnotateError) -> ! {
    error!("{}", err);
    eprintln!("{} ERROR: {}, exiting", PROGRAM_NAME, err);
    process::exit(err.exit_code());
}

fn run(cli: &Cli) -> svannotate::Result<()> {
    let config = cli.config();
    config.validate()?;
    for path in [&cli.annotations, &cli.tsv_file] {
        if !path.exists() {
            return Err(SvAnnotateError::InvalidConfiguration(format!(
                "input file {:?} does not exist",
                path
            )));
        }
    }

    let start = Instant::now();
    let index = GeneIndex::from_path(config.padding, &cli.annotations)?;
    info!(
        "Indexed {} intervals in {:.2}s",
        index.total_intervals(),
        start.elapsed().as_secs_f64()
    );

    let annotator = VariantAnnotator::new(&index, config.window);
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    annotator.annotate_path(&cli.tsv_file, &mut out)?;

    info!("computation finished in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log.as_deref()) {
        eprintln!("{} ERROR: {:#}, exiting", PROGRAM_NAME, e);
        process::exit(EXIT_FILE_IO_ERROR);
    }

    if let Err(err) = run(&cli) {
        exit_with_error(&err);
    }
}
