//! Flags cells whose projection onto the fitted trajectory is unreliable.
//!
//! A cell is ambiguous when either
//! - its nearest-segment assignment competes with a non-adjacent, far-away part of the
//!   same lineage (the curve folds back on itself), or
//! - its residual is an outlier among cells at a similar arc-length position.

use tracing::{debug, info};

use crate::config::{AmbiguityParams, OutlierMode};
use crate::error::{EvalResult, configuration, degenerate, precondition};
use crate::math::geometry::project_onto_segment;
use crate::math::stats::{MAD_SCALE, fraction, mad, median, upper_mad};
use crate::model::{LineageCurve, TrajectoryObject};

/// Residuals at or below this fraction of max(1, curve length) count as lying on the curve.
const ON_CURVE_REL_EPS: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
pub struct CellProjection {
    /// Embedding row of the cell.
    pub cell: usize,
    pub segment: usize,
    pub arc_position: f64,
    /// Perpendicular distance, positive on the left of the curve direction.
    pub residual: f64,
    pub folded: bool,
    pub outlier: bool,
    pub ambiguous: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineageAmbiguity {
    pub lineage: String,
    pub curve_length: f64,
    pub cells: usize,
    pub folded: usize,
    pub outliers: usize,
    pub ambiguous: usize,
    pub projections: Vec<CellProjection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AmbiguityResult {
    /// Ambiguous (cell, lineage) memberships over all memberships.
    pub ambpct: f64,
    /// One flag per embedding cell; set when the cell is ambiguous on any lineage.
    pub per_cell_flags: Vec<bool>,
    pub flagged_memberships: usize,
    pub total_memberships: usize,
    /// Embedding cells without a defined pseudotime on any lineage.
    pub excluded_cells: usize,
    pub lineages: Vec<LineageAmbiguity>,
}

pub fn detect_ambiguous(
    trajectory: &TrajectoryObject,
    params: &AmbiguityParams,
) -> EvalResult<AmbiguityResult> {
    if params.local_window < 3 {
        return Err(configuration("ambiguity.local_window must be >= 3"));
    }
    let pseudotime = trajectory.pseudotime();
    let coords = trajectory.embedding().coords();

    let mut per_cell_flags = vec![false; coords.len()];
    let mut assigned_anywhere = vec![false; coords.len()];
    let mut lineages = Vec::with_capacity(pseudotime.lineages().len());
    let mut flagged_memberships = 0usize;
    let mut total_memberships = 0usize;

    for (li, name) in pseudotime.lineages().iter().enumerate() {
        let rows = pseudotime.assigned_rows(li);
        if rows.is_empty() {
            debug!(lineage = %name, "lineage_without_cells");
            continue;
        }
        let curve = trajectory.lineage_curve(li);
        let cells: Vec<usize> = rows.iter().map(|&r| trajectory.embedding_row(r)).collect();
        let summary = evaluate_lineage(name, curve, &cells, coords, params)?;

        for p in &summary.projections {
            assigned_anywhere[p.cell] = true;
            if p.ambiguous {
                per_cell_flags[p.cell] = true;
            }
        }
        flagged_memberships += summary.ambiguous;
        total_memberships += summary.cells;
        info!(
            lineage = %name,
            cells = summary.cells,
            folded = summary.folded,
            outliers = summary.outliers,
            ambiguous = summary.ambiguous,
            "lineage_projected"
        );
        lineages.push(summary);
    }

    if total_memberships == 0 {
        return Err(precondition("no cell has a defined pseudotime on any lineage"));
    }
    let excluded_cells = assigned_anywhere.iter().filter(|&&a| !a).count();
    let ambpct = fraction(flagged_memberships, total_memberships);
    info!(
        flagged_memberships,
        total_memberships, excluded_cells, ambpct, "ambiguity_detected"
    );

    Ok(AmbiguityResult {
        ambpct,
        per_cell_flags,
        flagged_memberships,
        total_memberships,
        excluded_cells,
        lineages,
    })
}

fn evaluate_lineage(
    name: &str,
    curve: &LineageCurve,
    cells: &[usize],
    coords: &[[f64; 2]],
    params: &AmbiguityParams,
) -> EvalResult<LineageAmbiguity> {
    let length = curve.total_length();
    if !(length > 0.0) {
        return Err(degenerate(format!(
            "curve for lineage '{}' has zero length but {} assigned cells",
            name,
            cells.len()
        )));
    }
    let starts = curve.cumulative_starts();
    let fold_min_arc = params.fold_min_arc_fraction * length;

    let mut projections: Vec<CellProjection> = cells
        .iter()
        .map(|&cell| project_cell(cell, coords[cell], curve, &starts, params.fold_ratio, fold_min_arc))
        .collect();

    flag_outliers(&mut projections, length, params);

    let on_curve = ON_CURVE_REL_EPS * length.max(1.0);
    let mut folded = 0usize;
    let mut outliers = 0usize;
    let mut ambiguous = 0usize;
    for p in projections.iter_mut() {
        if p.residual.abs() <= on_curve {
            p.folded = false;
            p.outlier = false;
        }
        p.ambiguous = p.folded || p.outlier;
        folded += p.folded as usize;
        outliers += p.outlier as usize;
        ambiguous += p.ambiguous as usize;
    }

    Ok(LineageAmbiguity {
        lineage: name.to_string(),
        curve_length: length,
        cells: projections.len(),
        folded,
        outliers,
        ambiguous,
        projections,
    })
}

fn project_cell(
    cell: usize,
    p: [f64; 2],
    curve: &LineageCurve,
    starts: &[f64],
    fold_ratio: f64,
    fold_min_arc: f64,
) -> CellProjection {
    let projections: Vec<_> = curve
        .segments
        .iter()
        .map(|s| project_onto_segment(p, s.start, s.end))
        .collect();

    let mut best = 0usize;
    for (i, proj) in projections.iter().enumerate().skip(1) {
        if proj.distance < projections[best].distance {
            best = i;
        }
    }
    let arc_of = |i: usize| starts[i] + projections[i].t * curve.segments[i].length();
    let arc_position = arc_of(best);

    // A non-adjacent segment far along the curve competes with the winner.
    let limit = fold_ratio * projections[best].distance;
    let folded = projections.iter().enumerate().any(|(i, proj)| {
        i.abs_diff(best) > 1
            && proj.distance <= limit
            && (arc_of(i) - arc_position).abs() >= fold_min_arc
    });

    CellProjection {
        cell,
        segment: best,
        arc_position,
        residual: projections[best].signed_distance,
        folded,
        outlier: false,
        ambiguous: false,
    }
}

fn flag_outliers(projections: &mut [CellProjection], length: f64, params: &AmbiguityParams) {
    let m = projections.len();
    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| {
        projections[a]
            .arc_position
            .total_cmp(&projections[b].arc_position)
            .then_with(|| projections[a].cell.cmp(&projections[b].cell))
    });

    let value = |p: &CellProjection| match params.outlier_mode {
        OutlierMode::Neutral => p.residual,
        OutlierMode::Asymmetric => p.residual.abs(),
    };
    let ordered: Vec<f64> = order.iter().map(|&i| value(&projections[i])).collect();

    let w = params.local_window.min(m);
    let floor = params.residual_floor_fraction * length;
    let mut window = Vec::with_capacity(w);
    for (rank, &idx) in order.iter().enumerate() {
        let lo = rank.saturating_sub(w / 2).min(m - w);
        window.clear();
        window.extend_from_slice(&ordered[lo..lo + w]);
        let med = median(&mut window);
        let x = ordered[rank];
        let outlier = match params.outlier_mode {
            OutlierMode::Neutral => {
                let spread = mad(&mut window, med);
                let scale = (MAD_SCALE * spread).max(floor);
                (x - med).abs() > params.mad_multiplier * scale
            }
            OutlierMode::Asymmetric => {
                let spread = upper_mad(&window, med);
                let scale = (MAD_SCALE * spread).max(floor);
                x - med > params.mad_multiplier * scale
            }
        };
        projections[idx].outlier = outlier;
    }
}
