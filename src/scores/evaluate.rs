use std::collections::HashSet;

#[cfg(feature = "mt")]
use rayon::prelude::*;
use tracing::{info, warn};

use crate::checks::{
    AmbiguityResult, ClusterCheckResult, DensityResult, HomogeneityDecision, HomogeneityResult,
    PreservationResult,
    check_connectivity, check_preservation, detect_ambiguous, evaluate_density, test_homogeneity,
};
use crate::config::EvalConfig;
use crate::error::{EvalError, EvalResult, precondition};
use crate::model::{Embedding, ExpressionMatrix, FittedCurve, PseudotimeTable, TrajectoryObject};
use crate::scores::MetricsRow;

/// Dataset-level checks, computed once and shared read-only by every embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct HighDimSummary {
    pub connectivity: ClusterCheckResult,
    pub homogeneity: Option<HomogeneityResult>,
}

impl HighDimSummary {
    /// Cluster label per expression row.
    pub fn cluster_labels(&self) -> &[usize] {
        &self.connectivity.labels
    }
}

#[derive(Debug, Clone)]
pub struct EmbeddingInput {
    pub label: String,
    pub embedding: Embedding,
    pub trajectory: Option<TrajectoryObject>,
}

impl EmbeddingInput {
    pub fn new(label: impl Into<String>, embedding: Embedding) -> Self {
        Self {
            label: label.into(),
            embedding,
            trajectory: None,
        }
    }

    pub fn with_trajectory(
        mut self,
        pseudotime: PseudotimeTable,
        curve: FittedCurve,
    ) -> EvalResult<Self> {
        let trajectory = TrajectoryObject::new(self.embedding.clone(), pseudotime, curve)
            .map_err(|e| annotate(&self.label, e))?;
        self.trajectory = Some(trajectory);
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StageError {
    pub stage: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingEvaluation {
    pub label: String,
    pub connectivity: Option<ClusterCheckResult>,
    pub preservation: Option<PreservationResult>,
    pub density: Option<DensityResult>,
    pub ambiguity: Option<AmbiguityResult>,
    pub errors: Vec<StageError>,
}

impl EmbeddingEvaluation {
    pub fn metrics(&self) -> MetricsRow {
        MetricsRow {
            embedding: self.label.clone(),
            dc_check: self.connectivity.as_ref().map(|c| c.connected),
            simi_retain: self.preservation.as_ref().map(|p| p.good_rate),
            gof: self.density.as_ref().map(|d| d.occupied_rate),
            ushape: self.ambiguity.as_ref().map(|a| a.ambpct),
        }
    }
}

/// Fail-fast pass over configuration and inputs, before any expensive computation.
pub fn validate_inputs(
    expression: &ExpressionMatrix,
    inputs: &[EmbeddingInput],
    config: &EvalConfig,
) -> EvalResult<()> {
    config.validate()?;

    let k_conn = config.connectivity.k_neighbors;
    let k_pres = config.preservation.k_neighbors;
    let n = expression.n_cells();
    if n < k_conn + 1 {
        return Err(precondition(format!(
            "expression has {} cells; connectivity.k_neighbors={} needs at least {}",
            n,
            k_conn,
            k_conn + 1
        )));
    }

    let mut labels = HashSet::new();
    for input in inputs {
        if !labels.insert(input.label.as_str()) {
            return Err(precondition(format!(
                "duplicate embedding label '{}'",
                input.label
            )));
        }
        expression
            .rows_for(input.embedding.cells())
            .map_err(|e| annotate(&input.label, e))?;
        let m = input.embedding.len();
        let k = k_conn.max(k_pres);
        if m < k + 1 {
            return Err(precondition(format!(
                "embedding '{}' has {} cells; k_neighbors={} needs at least {}",
                input.label,
                m,
                k,
                k + 1
            )));
        }
    }
    Ok(())
}

/// Connectivity failures are fatal; a failed homogeneity test is returned
/// alongside the summary so the run can continue without it.
pub fn evaluate_highdim(
    expression: &ExpressionMatrix,
    config: &EvalConfig,
    run_homogeneity: bool,
) -> EvalResult<(HighDimSummary, Option<EvalError>)> {
    let connectivity = check_connectivity(&expression.values().view(), &config.connectivity)?;
    let (homogeneity, homogeneity_error) = if run_homogeneity {
        match test_homogeneity(expression.values(), &config.homogeneity) {
            Ok(result) => (Some(result), None),
            Err(err) => (None, Some(err)),
        }
    } else {
        (None, None)
    };
    Ok((
        HighDimSummary {
            connectivity,
            homogeneity,
        },
        homogeneity_error,
    ))
}

/// Dataset-level notes: a disconnected or structureless expression space makes a
/// single continuous trajectory questionable before any embedding is examined.
pub fn dataset_advisories(summary: &HighDimSummary) -> Vec<String> {
    let mut out = Vec::new();
    let c = &summary.connectivity;
    if !c.connected {
        out.push(format!(
            "expression space splits into {} separated groups; a single connected trajectory may not apply",
            c.n_groups
        ));
    }
    if let Some(h) = &summary.homogeneity {
        if h.decision == HomogeneityDecision::Homogeneous {
            out.push(format!(
                "expression is indistinguishable from a homogeneous population (p={:.4}); trajectory inference may be unsuitable",
                h.p_value
            ));
        }
    }
    out
}

/// Runs the low-dimensional connectivity, preservation, density and ambiguity
/// checks for one embedding. A failing check leaves its metric empty and records why.
pub fn evaluate_embedding(
    expression: &ExpressionMatrix,
    shared: &HighDimSummary,
    input: &EmbeddingInput,
    config: &EvalConfig,
) -> EmbeddingEvaluation {
    let mut errors = Vec::new();
    let label = input.label.as_str();

    let connectivity = record(
        label,
        "connectivity",
        check_connectivity(&input.embedding.points(), &config.connectivity),
        &mut errors,
    );
    let preservation = record(
        label,
        "preservation",
        check_preservation(
            expression,
            &input.embedding,
            Some(shared.cluster_labels()),
            &config.preservation,
        ),
        &mut errors,
    );
    let density = record(
        label,
        "density",
        evaluate_density(&input.embedding, &config.density),
        &mut errors,
    );
    let ambiguity = match &input.trajectory {
        Some(trajectory) => record(
            label,
            "ambiguity",
            detect_ambiguous(trajectory, &config.ambiguity),
            &mut errors,
        ),
        None => {
            errors.push(StageError {
                stage: "ambiguity",
                message: "no trajectory fit supplied".to_string(),
            });
            None
        }
    };

    info!(
        embedding = label,
        errors = errors.len(),
        "embedding_evaluated"
    );
    EmbeddingEvaluation {
        label: input.label.clone(),
        connectivity,
        preservation,
        density,
        ambiguity,
        errors,
    }
}

/// Evaluates every embedding independently; results keep the input order.
pub fn evaluate_all(
    expression: &ExpressionMatrix,
    shared: &HighDimSummary,
    inputs: &[EmbeddingInput],
    config: &EvalConfig,
) -> Vec<EmbeddingEvaluation> {
    #[cfg(feature = "mt")]
    let out = inputs
        .par_iter()
        .map(|input| evaluate_embedding(expression, shared, input, config))
        .collect();

    #[cfg(not(feature = "mt"))]
    let out = inputs
        .iter()
        .map(|input| evaluate_embedding(expression, shared, input, config))
        .collect();

    out
}

fn record<T>(
    label: &str,
    stage: &'static str,
    result: EvalResult<T>,
    errors: &mut Vec<StageError>,
) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(err) => {
            warn!(embedding = label, stage, error = %err, "metric_unavailable");
            errors.push(StageError {
                stage,
                message: err.to_string(),
            });
            None
        }
    }
}

fn annotate(label: &str, err: EvalError) -> EvalError {
    match err {
        EvalError::Precondition(m) => EvalError::Precondition(format!("embedding '{}': {}", label, m)),
        EvalError::NumericalDegeneracy(m) => {
            EvalError::NumericalDegeneracy(format!("embedding '{}': {}", label, m))
        }
        EvalError::Configuration(m) => EvalError::Configuration(format!("embedding '{}': {}", label, m)),
    }
}
