use std::cmp::Ordering;

#[cfg(feature = "mt")]
use rayon::prelude::*;

use crate::error::{EvalResult, configuration, precondition};
use crate::math::points::PointView;

/// Relative tolerance under which a distance counts as tied with the k-th one.
pub const TIE_REL_EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f64,
}

/// k nearest neighbours of every point, extended with all points tied at the k-th distance.
///
/// Each list is sorted by (distance, index) and never contains the query point itself.
pub fn knn_with_ties(points: &PointView<'_>, k: usize) -> EvalResult<Vec<Vec<Neighbor>>> {
    if k == 0 {
        return Err(configuration("k_neighbors must be >= 1"));
    }
    let n = points.len();
    if n < k + 1 {
        return Err(precondition(format!(
            "need at least {} cells for k_neighbors={}, got {}",
            k + 1,
            k,
            n
        )));
    }

    #[cfg(feature = "mt")]
    let out = (0..n)
        .into_par_iter()
        .map(|i| neighbors_of(points, i, k))
        .collect();

    #[cfg(not(feature = "mt"))]
    let out = (0..n).map(|i| neighbors_of(points, i, k)).collect();

    Ok(out)
}

/// Distance to the k-th neighbour (the farthest member of the untied set).
pub fn kth_distance(neighbors: &[Neighbor], k: usize) -> f64 {
    neighbors
        .get(k.saturating_sub(1))
        .or_else(|| neighbors.last())
        .map(|n| n.distance)
        .unwrap_or(0.0)
}

fn neighbors_of(points: &PointView<'_>, i: usize, k: usize) -> Vec<Neighbor> {
    let query = points.point(i);
    let mut candidates: Vec<Neighbor> = (0..points.len())
        .filter(|&j| j != i)
        .map(|j| Neighbor {
            index: j,
            distance: crate::math::points::euclidean(query, points.point(j)),
        })
        .collect();

    candidates.select_nth_unstable_by(k - 1, by_distance_then_index);
    let kth = candidates[k - 1].distance;
    let cutoff = kth + TIE_REL_EPS * kth;
    candidates.retain(|c| c.distance <= cutoff);
    candidates.sort_by(by_distance_then_index);
    candidates
}

fn by_distance_then_index(a: &Neighbor, b: &Neighbor) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| a.index.cmp(&b.index))
}
