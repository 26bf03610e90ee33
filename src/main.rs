use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use kira_pseudotimeqc::cli::{Cli, Commands, RunArgs};
use kira_pseudotimeqc::config::EvalConfig;
use kira_pseudotimeqc::ctx::Ctx;
use kira_pseudotimeqc::io;
use kira_pseudotimeqc::pipeline::Pipeline;
use kira_pseudotimeqc::scores::{rank_scores, score_table};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            let config = run_config(&args)?;
            // Without an explicit format flag both reports are written.
            let (json, tsv) = if args.json || args.tsv {
                (args.json, args.tsv)
            } else {
                (true, true)
            };
            let mut ctx = Ctx::new(
                args.input,
                args.out,
                config,
                json,
                tsv,
                env!("CARGO_PKG_VERSION"),
            );
            ctx.threads = args.threads;
            ctx.run_homogeneity = !args.skip_homogeneity;

            Pipeline::full().run(&mut ctx)?;
            print_summary(&ctx)?;
        }
        Commands::Validate(args) => {
            let config = load_config(args.thresholds.as_deref())?;
            let mut ctx = Ctx::new(
                args.input,
                PathBuf::from("."),
                config,
                false,
                false,
                env!("CARGO_PKG_VERSION"),
            );
            Pipeline::validate_only().run(&mut ctx)?;
            print_validate_summary(&ctx);
        }
        Commands::Score(args) => {
            let config = load_config(args.thresholds.as_deref())?;
            let rows = io::metrics_table::read_metrics_tsv(&args.metrics)?;
            let scores = score_table(&rows, &config.scoring)
                .with_context(|| format!("failed to score {}", args.metrics.display()))?;
            let ranking = rank_scores(&scores);
            print!("{}", io::summary::format_ranking(&ranking)?);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EvalConfig> {
    let config = match path {
        Some(p) => EvalConfig::from_json_file(p)?,
        None => EvalConfig::default_v1(),
    };
    config.validate()?;
    Ok(config)
}

fn run_config(args: &RunArgs) -> Result<EvalConfig> {
    let mut config = load_config(args.thresholds.as_deref())?;
    if let Some(k) = args.k_connectivity {
        config.connectivity.k_neighbors = k;
    }
    if let Some(k) = args.k_preservation {
        config.preservation.k_neighbors = k;
    }
    if let Some(b) = args.permutations {
        config.homogeneity.num_permutations = b;
    }
    if let Some(seed) = args.seed {
        config.homogeneity.seed = seed;
    }
    if let Some(mode) = args.outlier_mode {
        config.ambiguity.outlier_mode = mode.into();
    }
    if let Some(w) = args.bin_width {
        config.density.bin_width = w;
    }
    config.validate()?;
    Ok(config)
}

fn print_summary(ctx: &Ctx) -> Result<()> {
    let summary = io::summary::format_summary(ctx)?;
    print!("{}", summary);
    if !ctx.warnings.is_empty() {
        println!("warnings:");
        for warning in &ctx.warnings {
            println!("- {}", warning);
        }
    }
    Ok(())
}

fn print_validate_summary(ctx: &Ctx) {
    println!("kira-pseudotimeqc validate ok");
    println!("genes: {}", ctx.input_meta.genes.unwrap_or(0));
    println!("cells: {}", ctx.input_meta.cells.unwrap_or(0));
    println!("nnz: {}", ctx.input_meta.nnz.unwrap_or(0));
    println!("embeddings: {}", ctx.embeddings.len());
    for e in &ctx.embeddings {
        println!(
            "- {}\t{} cells\ttrajectory={}",
            e.label,
            e.embedding.len(),
            e.trajectory.is_some()
        );
    }
    if !ctx.warnings.is_empty() {
        println!("warnings:");
        for warning in &ctx.warnings {
            println!("- {}", warning);
        }
    }
}
