use std::fmt::Write;

use anyhow::Result;

use crate::ctx::Ctx;
use crate::io::fmt_opt_f64;
use crate::scores::RankedScore;

pub fn format_summary(ctx: &Ctx) -> Result<String> {
    let version = env!("CARGO_PKG_VERSION");
    let genes = ctx.input_meta.genes.unwrap_or(0);
    let cells = ctx.input_meta.cells.unwrap_or(0);

    let mut out = String::new();
    writeln!(out, "kira-pseudotimeqc v{}", version)?;
    writeln!(
        out,
        "Input: {} genes, {} cells, {} embeddings",
        genes,
        cells,
        ctx.embeddings.len()
    )?;

    if let Some(h) = &ctx.highdim {
        let homogeneity = match &h.homogeneity {
            Some(r) => format!("{} (p={:.4})", r.decision.as_str(), r.p_value),
            None => "skipped".to_string(),
        };
        writeln!(
            out,
            "Expression: {}, {}",
            h.connectivity.label.as_str(),
            homogeneity
        )?;
    }
    if ctx.advisories.is_empty() {
        writeln!(out, "Advisories: none")?;
    } else {
        writeln!(out, "Advisories: {}", ctx.advisories.join("; "))?;
    }

    out.push_str(&format_ranking(&ctx.ranking)?);
    Ok(out)
}

pub fn format_ranking(ranking: &[RankedScore]) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "rank\tembedding\tscore\trecommendation")?;
    for r in ranking {
        let rank = r
            .rank
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "{}\t{}\t{}\t{}",
            rank,
            r.result.embedding,
            fmt_opt_f64(r.result.score),
            r.result.recommendation.as_str()
        )?;
    }
    Ok(out)
}
