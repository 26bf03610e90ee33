use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::ctx::Ctx;
use crate::io::{fmt_opt_bool, fmt_opt_f64};
use crate::scores::{MetricsRow, RankedScore};

pub const METRICS_HEADER: &str =
    "embedding\tDCcheck\tSimiRetain\tGOF\tUSHAPE\tscore\trecommendation\trank";

/// One row per embedding, in rank order.
pub fn write_metrics_tsv<W: Write>(
    w: &mut W,
    rows: &[MetricsRow],
    ranking: &[RankedScore],
) -> Result<()> {
    writeln!(w, "{}", METRICS_HEADER)?;
    for ranked in ranking {
        let r = &ranked.result;
        let Some(m) = rows.iter().find(|m| m.embedding == r.embedding) else {
            bail!("no metrics for embedding '{}'", r.embedding);
        };
        let rank = ranked
            .rank
            .map(|v| v.to_string())
            .unwrap_or_else(|| "NA".to_string());
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            r.embedding,
            fmt_opt_bool(m.dc_check),
            fmt_opt_f64(m.simi_retain),
            fmt_opt_f64(m.gof),
            fmt_opt_f64(m.ushape),
            fmt_opt_f64(r.score),
            r.recommendation.as_str(),
            rank
        )?;
    }
    Ok(())
}

pub fn write_tsv(path: &Path, ctx: &Ctx) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    let rows: Vec<MetricsRow> = ctx.evaluations.iter().map(|e| e.metrics()).collect();
    write_metrics_tsv(&mut w, &rows, &ctx.ranking)?;
    w.flush()?;
    Ok(())
}

/// `embedding cell_id preserved ambiguous`, NA where the check did not run.
pub fn write_cells_tsv(path: &Path, ctx: &Ctx) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    writeln!(w, "embedding\tcell_id\tpreserved\tambiguous")?;

    for (input, eval) in ctx.embeddings.iter().zip(&ctx.evaluations) {
        if input.label != eval.label {
            bail!(
                "evaluation order mismatch: '{}' vs '{}'",
                input.label,
                eval.label
            );
        }
        let cells = input.embedding.cells();
        let preserved = eval.preservation.as_ref().map(|p| &p.per_cell_flags);
        let ambiguous = eval.ambiguity.as_ref().map(|a| &a.per_cell_flags);
        for (i, cell) in cells.iter().enumerate() {
            writeln!(
                w,
                "{}\t{}\t{}\t{}",
                input.label,
                cell,
                fmt_opt_bool(preserved.map(|f| f[i])),
                fmt_opt_bool(ambiguous.map(|f| f[i]))
            )?;
        }
    }
    w.flush()?;
    Ok(())
}
