use tracing::debug;

use crate::config::ScoreWeights;
use crate::error::{EvalResult, precondition};
use crate::scores::{MetricsRow, RankedScore, Recommendation, ScoreContributions, ScoreResult};

/// Additive score: rates above their midpoint add, ambiguity subtracts,
/// and a disconnected embedding takes a penalty larger than any positive total.
pub fn score_row(row: &MetricsRow, weights: &ScoreWeights) -> EvalResult<ScoreResult> {
    for (name, value) in [
        ("SimiRetain", row.simi_retain),
        ("GOF", row.gof),
        ("USHAPE", row.ushape),
    ] {
        if let Some(v) = value {
            if !(0.0..=1.0).contains(&v) {
                return Err(precondition(format!(
                    "{} for embedding '{}' must be a rate in [0, 1], got {}",
                    name, row.embedding, v
                )));
            }
        }
    }

    let mut missing = Vec::new();
    if row.dc_check.is_none() {
        missing.push("DCcheck");
    }
    if row.simi_retain.is_none() {
        missing.push("SimiRetain");
    }
    if row.gof.is_none() {
        missing.push("GOF");
    }
    if row.ushape.is_none() {
        missing.push("USHAPE");
    }

    let (Some(dc), Some(simi), Some(gof), Some(ushape)) =
        (row.dc_check, row.simi_retain, row.gof, row.ushape)
    else {
        debug!(embedding = %row.embedding, missing = ?missing, "score_incomplete");
        return Ok(ScoreResult {
            embedding: row.embedding.clone(),
            score: None,
            recommendation: Recommendation::Incomplete,
            contributions: None,
            missing,
        });
    };

    let contributions = ScoreContributions {
        dc_check: if dc { 0.0 } else { -weights.disconnect_penalty },
        simi_retain: simi - weights.simi_midpoint,
        gof: gof - weights.gof_midpoint,
        ushape: -weights.ushape_weight * ushape,
    };
    let score = contributions.dc_check
        + contributions.simi_retain
        + contributions.gof
        + contributions.ushape;
    let recommendation = if score > 0.0 {
        Recommendation::Recommended
    } else {
        Recommendation::NonRecommended
    };

    Ok(ScoreResult {
        embedding: row.embedding.clone(),
        score: Some(score),
        recommendation,
        contributions: Some(contributions),
        missing,
    })
}

pub fn score_table(rows: &[MetricsRow], weights: &ScoreWeights) -> EvalResult<Vec<ScoreResult>> {
    rows.iter().map(|r| score_row(r, weights)).collect()
}

/// Orders by descending score (ties keep input order); incomplete rows go last, unranked.
pub fn rank_scores(results: &[ScoreResult]) -> Vec<RankedScore> {
    let mut order: Vec<usize> = (0..results.len()).collect();
    order.sort_by(|&a, &b| match (results[a].score, results[b].score) {
        (Some(x), Some(y)) => y.total_cmp(&x).then(a.cmp(&b)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.cmp(&b),
    });

    let mut next = 1usize;
    order
        .into_iter()
        .map(|i| {
            let rank = results[i].score.map(|_| {
                let r = next;
                next += 1;
                r
            });
            RankedScore {
                rank,
                result: results[i].clone(),
            }
        })
        .collect()
}
