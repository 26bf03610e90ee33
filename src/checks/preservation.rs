use tracing::info;

use crate::config::PreservationParams;
use crate::error::{EvalResult, configuration, precondition};
use crate::math::knn::knn_with_ties;
use crate::math::stats::fraction;
use crate::model::{Embedding, ExpressionMatrix};

#[derive(Debug, Clone, PartialEq)]
pub struct PreservationResult {
    /// Fraction of cells whose high-dimensional neighbourhood survives the projection.
    pub good_rate: f64,
    /// One flag per embedding cell, in embedding order.
    pub per_cell_flags: Vec<bool>,
    pub per_cell_overlap: Vec<f64>,
}

/// Compares each cell's kNN set in expression space with its kNN set in the embedding.
///
/// `cluster_labels` are indexed by expression row. When given, high-dimensional
/// neighbours from another cluster weigh `cross_cluster_weight` instead of 1.
pub fn check_preservation(
    expression: &ExpressionMatrix,
    embedding: &Embedding,
    cluster_labels: Option<&[usize]>,
    params: &PreservationParams,
) -> EvalResult<PreservationResult> {
    let k = params.k_neighbors;
    if k == 0 {
        return Err(configuration("preservation.k_neighbors must be >= 1"));
    }
    if let Some(labels) = cluster_labels {
        if labels.len() != expression.n_cells() {
            return Err(precondition(format!(
                "cluster labels ({}) do not match expression cells ({})",
                labels.len(),
                expression.n_cells()
            )));
        }
    }
    let n = embedding.len();
    if n < k + 1 {
        return Err(precondition(format!(
            "preservation check needs at least {} cells for k_neighbors={}, got {}",
            k + 1,
            k,
            n
        )));
    }

    let rows = expression.rows_for(embedding.cells())?;
    let high = expression.values().select_rows(&rows);
    let high_nb = knn_with_ties(&high.view(), k)?;
    let low_nb = knn_with_ties(&embedding.points(), k)?;

    let weight = |i: usize, j: usize| -> f64 {
        match cluster_labels {
            Some(labels) if labels[rows[i]] != labels[rows[j]] => params.cross_cluster_weight,
            _ => 1.0,
        }
    };

    let mut per_cell_overlap = Vec::with_capacity(n);
    let mut per_cell_flags = Vec::with_capacity(n);
    let mut in_low = vec![false; n];
    for i in 0..n {
        for nb in &low_nb[i] {
            in_low[nb.index] = true;
        }
        let mut total = 0.0;
        let mut shared = 0.0;
        for nb in &high_nb[i] {
            let w = weight(i, nb.index);
            total += w;
            if in_low[nb.index] {
                shared += w;
            }
        }
        for nb in &low_nb[i] {
            in_low[nb.index] = false;
        }
        let overlap = if total > 0.0 { shared / total } else { 0.0 };
        per_cell_overlap.push(overlap);
        per_cell_flags.push(overlap > params.min_overlap);
    }

    let preserved = per_cell_flags.iter().filter(|&&f| f).count();
    let good_rate = fraction(preserved, n);
    info!(cells = n, preserved, good_rate, "preservation_checked");

    Ok(PreservationResult {
        good_rate,
        per_cell_flags,
        per_cell_overlap,
    })
}
