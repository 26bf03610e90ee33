use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::OutlierMode;

#[derive(Debug, Parser)]
#[command(
    name = "kira-pseudotimeqc",
    version,
    about = "Trajectory and pseudotime quality diagnostics for single-cell embeddings"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Evaluate every embedding under <input>/embeddings and rank them.
    Run(RunArgs),
    /// Load and check inputs without computing any metric.
    Validate(ValidateArgs),
    /// Score and rank a precomputed metrics table.
    Score(ScoreArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[arg(long, help = "Input directory (10x MTX plus embeddings/)")]
    pub input: PathBuf,

    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, help = "Calibration file (JSON) overriding the default thresholds")]
    pub thresholds: Option<PathBuf>,

    #[arg(long, help = "Neighbours for the connectivity check")]
    pub k_connectivity: Option<usize>,

    #[arg(long, help = "Neighbours for the similarity preservation check")]
    pub k_preservation: Option<usize>,

    #[arg(long, help = "Permutations for the homogeneity test")]
    pub permutations: Option<usize>,

    #[arg(long, help = "Seed for the homogeneity permutations")]
    pub seed: Option<u64>,

    #[arg(long, value_enum)]
    pub outlier_mode: Option<OutlierModeArg>,

    #[arg(long, help = "Density grid bin width, in embedding units")]
    pub bin_width: Option<f64>,

    #[arg(long, default_value_t = false)]
    pub skip_homogeneity: bool,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false)]
    pub tsv: bool,

    #[arg(long, default_value_t = 0, help = "Number of threads (0 = auto)")]
    pub threads: usize,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(long, help = "Input directory (10x MTX plus embeddings/)")]
    pub input: PathBuf,

    #[arg(long)]
    pub thresholds: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ScoreArgs {
    #[arg(long, help = "Metrics TSV: embedding, DCcheck, SimiRetain, GOF, USHAPE")]
    pub metrics: PathBuf,

    #[arg(long)]
    pub thresholds: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutlierModeArg {
    Neutral,
    Asymmetric,
}

impl From<OutlierModeArg> for OutlierMode {
    fn from(arg: OutlierModeArg) -> Self {
        match arg {
            OutlierModeArg::Neutral => OutlierMode::Neutral,
            OutlierModeArg::Asymmetric => OutlierMode::Asymmetric,
        }
    }
}
