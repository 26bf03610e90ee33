use std::path::Path;

use anyhow::{Context, Result};

use crate::checks::{AmbiguityResult, ClusterCheckResult, DensityResult, HomogeneityResult, PreservationResult};
use crate::ctx::Ctx;
use crate::schema::v1::{
    Ambiguity, ClusterSeparation, Connectivity, Contributions, Density, EmbeddingReport, HighDim,
    Homogeneity, InputMeta, LineageAmbiguity, Metrics, Preservation, PseudotimeQcV1, Score,
    StageError,
};

pub fn build_report(ctx: &Ctx) -> Result<PseudotimeQcV1> {
    let input_meta = InputMeta {
        genes: ctx.input_meta.genes,
        cells: ctx.input_meta.cells,
        nnz: ctx.input_meta.nnz,
        embeddings: ctx.embeddings.iter().map(|e| e.label.clone()).collect(),
    };

    let highdim = ctx.highdim.as_ref().map(|h| HighDim {
        connectivity: connectivity_report(&h.connectivity),
        homogeneity: h
            .homogeneity
            .as_ref()
            .map(|r| homogeneity_report(r, ctx)),
        advisories: ctx.advisories.clone(),
    });

    let embeddings = ctx
        .evaluations
        .iter()
        .map(|e| {
            let m = e.metrics();
            EmbeddingReport {
                label: e.label.clone(),
                metrics: Metrics {
                    dc_check: m.dc_check,
                    simi_retain: m.simi_retain,
                    gof: m.gof,
                    ushape: m.ushape,
                },
                connectivity: e.connectivity.as_ref().map(connectivity_report),
                preservation: e.preservation.as_ref().map(preservation_report),
                density: e.density.as_ref().map(density_report),
                ambiguity: e.ambiguity.as_ref().map(ambiguity_report),
                errors: e
                    .errors
                    .iter()
                    .map(|err| StageError {
                        stage: err.stage.to_string(),
                        message: err.message.clone(),
                    })
                    .collect(),
            }
        })
        .collect();

    let scores = ctx
        .ranking
        .iter()
        .map(|r| Score {
            embedding: r.result.embedding.clone(),
            score: r.result.score,
            recommendation: r.result.recommendation.as_str().to_string(),
            rank: r.rank,
            contributions: r.result.contributions.as_ref().map(|c| Contributions {
                dc_check: c.dc_check,
                simi_retain: c.simi_retain,
                gof: c.gof,
                ushape: c.ushape,
            }),
            missing: r.result.missing.iter().map(|s| s.to_string()).collect(),
        })
        .collect();

    Ok(PseudotimeQcV1 {
        tool: "kira-pseudotimeqc".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        schema_version: "v1".to_string(),
        input_meta,
        config: ctx.config.clone(),
        highdim,
        embeddings,
        scores,
        warnings: ctx.warnings.clone(),
    })
}

pub fn write_json(path: &Path, report: &PseudotimeQcV1) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn connectivity_report(c: &ClusterCheckResult) -> Connectivity {
    Connectivity {
        label: c.label.as_str().to_string(),
        connected: c.connected,
        n_components: c.n_components,
        n_major: c.n_major,
        n_groups: c.n_groups,
        separations: c
            .separations
            .iter()
            .map(|s| ClusterSeparation {
                a: s.a,
                b: s.b,
                min_distance: s.min_distance,
                within_scale: s.within_scale,
                ratio: s.ratio.is_finite().then_some(s.ratio),
                separated: s.separated,
            })
            .collect(),
    }
}

fn homogeneity_report(h: &HomogeneityResult, ctx: &Ctx) -> Homogeneity {
    Homogeneity {
        statistic: h.statistic,
        p_value: h.p_value,
        decision: h.decision.as_str().to_string(),
        num_permutations: h.null_distribution.len(),
        seed: ctx.config.homogeneity.seed,
    }
}

fn preservation_report(p: &PreservationResult) -> Preservation {
    Preservation {
        good_rate: p.good_rate,
        preserved_cells: p.per_cell_flags.iter().filter(|&&f| f).count(),
        cells: p.per_cell_flags.len(),
    }
}

fn density_report(d: &DensityResult) -> Density {
    Density {
        occupied_rate: d.occupied_rate,
        occupied_bins: d.occupied_bins,
        candidate_bins: d.candidate_bins,
        grid_cols: d.grid_cols,
        grid_rows: d.grid_rows,
    }
}

fn ambiguity_report(a: &AmbiguityResult) -> Ambiguity {
    Ambiguity {
        ambpct: a.ambpct,
        flagged_memberships: a.flagged_memberships,
        total_memberships: a.total_memberships,
        excluded_cells: a.excluded_cells,
        lineages: a
            .lineages
            .iter()
            .map(|l| LineageAmbiguity {
                lineage: l.lineage.clone(),
                curve_length: l.curve_length,
                cells: l.cells,
                folded: l.folded,
                outliers: l.outliers,
                ambiguous: l.ambiguous,
            })
            .collect(),
    }
}
