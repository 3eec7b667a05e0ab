//! # vcf2tsv
//!
//! Convert VCF files to TSV tables, with optional snpEff ANN expansion.
//!
//! ## Quick Start
//!
//! ```bash
//! # One row per variant, samples as columns
//! vcf2tsv sample.vcf.gz --header
//!
//! # One row per variant and sample, with ANN columns
//! vcf2tsv sample.vcf.gz -f long -h -a
//! ```
//!
//! Records are flattened by `bcftools query`, which must be on `PATH`
//! (or given with `--bcftools` / `VCF2TSV_BCFTOOLS`).

use clap::{ArgAction, Parser, ValueEnum};
use env_logger::Env;
use log::info;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process;

use vcf2tsv::convert_vcf::convert_vcf_to_tsv;
use vcf2tsv::extract_ann_fields::TranscriptHandling;
use vcf2tsv::flatten_vcf::{BcftoolsQuery, DEFAULT_BCFTOOLS};
use vcf2tsv::run_layout::{ConvertOptions, OutputFormat};

#[derive(Parser)]
#[command(
    name = "vcf2tsv",
    version,
    about = "🧬 Convert VCF files to TSV format",
    long_about = "Convert a VCF file to a tab-separated table on stdout. Records are flattened with `bcftools query`; each INFO key becomes a column, and sample FORMAT values are laid out either as columns (wide) or as one row per sample (long).",
    disable_help_flag = true,
    after_help = "EXAMPLES:
    Wide table with header:
      vcf2tsv sample.vcf.gz -h > sample.tsv

    Long table with snpEff annotations:
      vcf2tsv sample.vcf.gz -f long -h -a

    Every ANN transcript on its own row:
      vcf2tsv sample.vcf.gz -a -t split"
)]
struct Cli {
    /// Path to VCF file (plain or .vcf.gz)
    #[arg(value_name = "VCF")]
    vcf: PathBuf,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value_t = OutputFormatCli::Wide)]
    format: OutputFormatCli,

    /// Print header line
    #[arg(short = 'h', long = "header")]
    header: bool,

    /// Expand snpEff ANN annotations
    #[arg(short = 'a', long = "ann")]
    ann: bool,

    /// How to handle multiple ANN entries per variant
    #[arg(short = 't', long = "transcript-handling", value_enum, default_value_t = TranscriptHandlingCli::First)]
    transcript_handling: TranscriptHandlingCli,

    /// bcftools executable used to flatten records
    #[arg(long = "bcftools", env = "VCF2TSV_BCFTOOLS", default_value = DEFAULT_BCFTOOLS)]
    bcftools: String,

    /// Verbose output (progress on stderr)
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Print help
    #[arg(long = "help", action = ArgAction::Help)]
    help: Option<bool>,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormatCli {
    /// One row per variant, samples as columns
    #[value(name = "wide")]
    Wide,
    /// One row per variant and sample
    #[value(name = "long")]
    Long,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum TranscriptHandlingCli {
    /// Keep the first ANN entry only
    #[value(name = "first")]
    First,
    /// Split every ANN entry into separate rows
    #[value(name = "split")]
    Split,
}

impl From<OutputFormatCli> for OutputFormat {
    fn from(cli: OutputFormatCli) -> Self {
        match cli {
            OutputFormatCli::Wide => OutputFormat::Wide,
            OutputFormatCli::Long => OutputFormat::Long,
        }
    }
}

impl From<TranscriptHandlingCli> for TranscriptHandling {
    fn from(cli: TranscriptHandlingCli) -> Self {
        match cli {
            TranscriptHandlingCli::First => TranscriptHandling::FirstOnly,
            TranscriptHandlingCli::Split => TranscriptHandling::SplitRows,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let options = ConvertOptions {
        format: OutputFormat::from(cli.format),
        print_header: cli.header,
        expand_ann: cli.ann,
        transcript_handling: TranscriptHandling::from(cli.transcript_handling),
    };

    info!("🧬 vcf2tsv starting");
    info!("📁 Input file: {}", cli.vcf.display());
    info!(
        "🔧 Format: {}, ANN: {}, transcripts: {}",
        match options.format {
            OutputFormat::Wide => "wide",
            OutputFormat::Long => "long",
        },
        if options.expand_ann { "expanded" } else { "off" },
        match options.transcript_handling {
            TranscriptHandling::FirstOnly => "first only",
            TranscriptHandling::SplitRows => "split rows",
        }
    );

    let flattener = BcftoolsQuery::new(cli.bcftools);
    let stdout = io::stdout();
    let out = BufWriter::new(stdout.lock());

    match convert_vcf_to_tsv(&cli.vcf, options, &flattener, out) {
        Ok(summary) => {
            info!(
                "🎉 Done: {} variants, {} rows written",
                summary.variants, summary.rows
            );
        }
        // Downstream reader went away (e.g. `| head`); nothing left to report
        Err(e) if e.is_broken_pipe() => {}
        Err(e) => {
            eprintln!("❌ Error: {e}");
            process::exit(e.exit_code());
        }
    }
}
