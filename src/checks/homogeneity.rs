//! Permutation test for any non-random cell-to-cell structure.
//!
//! The statistic is the share of total variance carried by the leading principal
//! component. Shuffling every gene independently across cells keeps each gene's
//! marginal distribution and destroys gene-gene covariance, so structured data sits
//! above the permutation null.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
#[cfg(feature = "mt")]
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::HomogeneityParams;
use crate::error::{EvalResult, configuration, degenerate, precondition};
use crate::math::points::DenseMatrix;

/// Null statistics within this relative distance of the observed one count as ties.
const STAT_REL_EPS: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomogeneityDecision {
    /// Indistinguishable from the permutation null; unsuitable for trajectory inference.
    Homogeneous,
    Structured,
}

impl HomogeneityDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Homogeneous => "homogeneous",
            Self::Structured => "structured",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HomogeneityResult {
    pub statistic: f64,
    pub p_value: f64,
    pub decision: HomogeneityDecision,
    pub null_distribution: Vec<f64>,
}

pub fn test_homogeneity(
    expression: &DenseMatrix,
    params: &HomogeneityParams,
) -> EvalResult<HomogeneityResult> {
    if params.num_permutations == 0 {
        return Err(configuration("homogeneity.num_permutations must be >= 1"));
    }
    if expression.n_rows() < 3 {
        return Err(precondition(format!(
            "homogeneity test needs at least 3 cells, got {}",
            expression.n_rows()
        )));
    }
    if expression.n_cols() < 2 {
        return Err(precondition(format!(
            "homogeneity test needs at least 2 genes, got {}",
            expression.n_cols()
        )));
    }

    let centered = center_columns(expression);
    let statistic = leading_variance_share(&centered, params)?;

    let permuted_stat = |b: usize| -> EvalResult<f64> {
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        rng.set_stream(b as u64);
        let mut permuted = centered.clone();
        for j in 0..permuted.n_cols() {
            let mut col = permuted.column(j);
            col.shuffle(&mut rng);
            permuted.set_column(j, &col);
        }
        leading_variance_share(&permuted, params)
    };

    #[cfg(feature = "mt")]
    let null: Vec<EvalResult<f64>> = (0..params.num_permutations)
        .into_par_iter()
        .map(permuted_stat)
        .collect();
    #[cfg(not(feature = "mt"))]
    let null: Vec<EvalResult<f64>> = (0..params.num_permutations).map(permuted_stat).collect();
    let null_distribution = null.into_iter().collect::<EvalResult<Vec<f64>>>()?;

    let cutoff = statistic - STAT_REL_EPS * statistic.abs();
    let exceed = null_distribution.iter().filter(|&&s| s >= cutoff).count();
    let p_value = (1 + exceed) as f64 / (1 + null_distribution.len()) as f64;
    let decision = if p_value > params.alpha {
        HomogeneityDecision::Homogeneous
    } else {
        HomogeneityDecision::Structured
    };
    info!(
        statistic,
        p_value,
        permutations = params.num_permutations,
        decision = decision.as_str(),
        "homogeneity_tested"
    );

    Ok(HomogeneityResult {
        statistic,
        p_value,
        decision,
        null_distribution,
    })
}

fn center_columns(m: &DenseMatrix) -> DenseMatrix {
    let n = m.n_rows();
    let mut out = m.clone();
    for j in 0..m.n_cols() {
        let mean = (0..n).map(|i| m.get(i, j)).sum::<f64>() / n as f64;
        for i in 0..n {
            out.set(i, j, m.get(i, j) - mean);
        }
    }
    out
}

/// Leading eigenvalue of the covariance over its trace, by power iteration on X^T X.
pub fn leading_variance_share(centered: &DenseMatrix, params: &HomogeneityParams) -> EvalResult<f64> {
    let n = centered.n_rows();
    let g = centered.n_cols();
    let total: f64 = centered.as_slice().iter().map(|v| v * v).sum();
    if !(total > 0.0) {
        return Err(degenerate("expression has zero total variance"));
    }

    // Start from per-gene spread with a fixed tilt so the start is never orthogonal to PC1.
    let mut v: Vec<f64> = (0..g)
        .map(|j| {
            let ss: f64 = (0..n).map(|i| centered.get(i, j).powi(2)).sum();
            ss.sqrt() + 1e-3 * (j + 1) as f64 / g as f64
        })
        .collect();
    normalize(&mut v);

    let mut lambda = 0.0;
    for iter in 0..params.power_iterations {
        let w = gram_apply(centered, &v);
        let norm = w.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm == 0.0 {
            lambda = 0.0;
            break;
        }
        v = w.into_iter().map(|x| x / norm).collect();
        let converged = (norm - lambda).abs() <= params.tolerance * norm;
        lambda = norm;
        if converged {
            debug!(iter, lambda, "power_iteration_converged");
            break;
        }
    }
    Ok(lambda / total)
}

/// X^T (X v); row products run in parallel, the accumulation stays sequential.
fn gram_apply(x: &DenseMatrix, v: &[f64]) -> Vec<f64> {
    let row_dot = |i: usize| -> f64 { x.row(i).iter().zip(v).map(|(a, b)| a * b).sum() };

    #[cfg(feature = "mt")]
    let u: Vec<f64> = (0..x.n_rows()).into_par_iter().map(row_dot).collect();
    #[cfg(not(feature = "mt"))]
    let u: Vec<f64> = (0..x.n_rows()).map(row_dot).collect();

    let mut w = vec![0.0; x.n_cols()];
    for (i, &ui) in u.iter().enumerate() {
        for (wj, &xij) in w.iter_mut().zip(x.row(i)) {
            *wj += ui * xij;
        }
    }
    w
}

fn normalize(v: &mut [f64]) {
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}
