use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "gespscan", version, about = "TCGA GESP expression profiling CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch counts, run differential expression and labeling per
    /// indication, then build the aggregate reports.
    Run(RunArgs),
    /// Rebuild the aggregate reports from tables written by a previous run.
    Report(ReportArgs),
    /// Inspect the reference inputs.
    Geneset(GenesetArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[arg(long)]
    pub out: PathBuf,

    #[arg(
        long,
        num_args = 1..,
        help = "TCGA project codes to profile (default: built-in list)"
    )]
    pub projects: Vec<String>,

    #[arg(
        long,
        help = "Read <PROJECT>.counts.tsv[.gz] from this directory instead of downloading"
    )]
    pub counts_dir: Option<PathBuf>,

    #[arg(long, help = "GESP reference TSV overriding the built-in list")]
    pub gesp: Option<PathBuf>,

    #[arg(
        long,
        num_args = 1..,
        help = "Pathway collection GMT files overriding the built-in three"
    )]
    pub gmt: Vec<PathBuf>,

    #[arg(long, help = "Sample sheet TSV (barcode metadata)")]
    pub sample_sheet: Option<PathBuf>,

    #[arg(long, default_value = "https://api.gdc.cancer.gov")]
    pub gdc_endpoint: String,

    #[arg(long, default_value_t = 10, help = "Minimum normal samples per indication")]
    pub min_normals: usize,

    #[arg(long, default_value_t = 1.0, help = "Absolute log2 fold-change cutoff")]
    pub lfc_cutoff: f64,

    #[arg(long, default_value_t = 0.01, help = "FDR cutoff")]
    pub fdr_cutoff: f64,

    #[arg(
        long,
        default_value_t = 0.25,
        help = "Quantile of per-gene mean expression below which genes are dropped"
    )]
    pub filter_quantile: f64,

    #[arg(long, default_value_t = 1000, help = "Gene permutations per enrichment test")]
    pub permutations: usize,

    #[arg(long, default_value_t = 7, help = "RNG seed for enrichment permutations")]
    pub seed: u64,

    #[arg(long, default_value_t = false, help = "Skip chart rendering")]
    pub no_plots: bool,

    #[arg(long, default_value_t = 0, help = "Number of threads (0 = auto)")]
    pub threads: usize,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[arg(long, help = "Output directory of a previous run")]
    pub out: PathBuf,

    #[arg(long, num_args = 1..)]
    pub gmt: Vec<PathBuf>,

    #[arg(long, default_value_t = 1000)]
    pub permutations: usize,

    #[arg(long, default_value_t = 7)]
    pub seed: u64,

    #[arg(long, default_value_t = false)]
    pub no_plots: bool,

    #[arg(long, default_value_t = 0)]
    pub threads: usize,
}

#[derive(Debug, Args)]
pub struct GenesetArgs {
    #[command(subcommand)]
    pub command: GenesetCommand,
}

#[derive(Debug, Subcommand)]
pub enum GenesetCommand {
    Show(GenesetShowArgs),
}

#[derive(Debug, Args)]
pub struct GenesetShowArgs {
    #[arg(long, help = "GESP reference TSV overriding the built-in list")]
    pub gesp: Option<PathBuf>,

    #[arg(long, default_value_t = false, help = "Also list the pathway collections")]
    pub collections: bool,
}
