use tracing::info;

use crate::config::DensityParams;
use crate::error::{EvalResult, configuration, precondition};
use crate::math::geometry::{bounding_box, convex_hull, distance, hull_contains};
use crate::model::Embedding;

#[derive(Debug, Clone, PartialEq)]
pub struct DensityResult {
    /// Occupied grid cells over grid cells spanning the data's convex support.
    pub occupied_rate: f64,
    pub occupied_bins: usize,
    pub candidate_bins: usize,
    pub grid_cols: usize,
    pub grid_rows: usize,
}

pub fn evaluate_density(embedding: &Embedding, params: &DensityParams) -> EvalResult<DensityResult> {
    let w = params.bin_width;
    if !(w > 0.0 && w.is_finite()) {
        return Err(configuration(format!(
            "density.bin_width must be finite and positive, got {}",
            w
        )));
    }
    let coords = embedding.coords();
    let (min, max) =
        bounding_box(coords).ok_or_else(|| precondition("density evaluation on empty embedding"))?;

    if min == max {
        info!(cells = coords.len(), "density_all_cells_coincide");
        return Ok(DensityResult {
            occupied_rate: 1.0,
            occupied_bins: 1,
            candidate_bins: 1,
            grid_cols: 1,
            grid_rows: 1,
        });
    }

    let cols_f = ((max[0] - min[0]) / w).floor() + 1.0;
    let rows_f = ((max[1] - min[1]) / w).floor() + 1.0;
    if !(cols_f * rows_f <= params.max_bins as f64) {
        return Err(configuration(format!(
            "density grid of {} x {} bins exceeds max_bins={}; increase bin_width",
            cols_f, rows_f, params.max_bins
        )));
    }
    let cols = cols_f as usize;
    let rows = rows_f as usize;
    let total_bins = cols * rows;

    let hull = convex_hull(coords);
    let bin_of = |p: [f64; 2]| {
        let ix = (((p[0] - min[0]) / w).floor().max(0.0) as usize).min(cols - 1);
        let iy = (((p[1] - min[1]) / w).floor().max(0.0) as usize).min(rows - 1);
        iy * cols + ix
    };
    let mut counts = vec![0usize; total_bins];
    for &p in coords {
        counts[bin_of(p)] += 1;
    }

    // Collinear cells have no area; their support is the segment between the extremes.
    let mut on_segment = vec![false; if hull.len() < 3 { total_bins } else { 0 }];
    if let &[a, b] = hull.as_slice() {
        let steps = (distance(a, b) / (0.5 * w)).ceil() as usize;
        for s in 0..=steps {
            let t = s as f64 / steps as f64;
            on_segment[bin_of([a[0] + t * (b[0] - a[0]), a[1] + t * (b[1] - a[1])])] = true;
        }
    }

    let mut candidate_bins = 0usize;
    let mut occupied_bins = 0usize;
    for iy in 0..rows {
        for ix in 0..cols {
            let bin = iy * cols + ix;
            let count = counts[bin];
            let center = [
                min[0] + (ix as f64 + 0.5) * w,
                min[1] + (iy as f64 + 0.5) * w,
            ];
            let supported = if hull.len() < 3 {
                on_segment[bin]
            } else {
                hull_contains(&hull, center)
            };
            if count > 0 || supported {
                candidate_bins += 1;
                if count >= params.min_cells_per_bin {
                    occupied_bins += 1;
                }
            }
        }
    }

    let occupied_rate = occupied_bins as f64 / candidate_bins as f64;
    info!(
        cells = coords.len(),
        occupied_bins, candidate_bins, occupied_rate, "density_evaluated"
    );

    Ok(DensityResult {
        occupied_rate,
        occupied_bins,
        candidate_bins,
        grid_cols: cols,
        grid_rows: rows,
    })
}
