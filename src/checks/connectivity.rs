//! Decides whether a point cloud is one connected structure or several separated groups.
//!
//! Components of the kNN graph are only candidate clusters: uneven sampling of a
//! continuum also breaks the graph apart. Two components count as distinct groups only
//! when the gap between them is large relative to their own kNN spacing.

#[cfg(feature = "mt")]
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::ConnectivityParams;
use crate::error::{EvalResult, configuration, precondition};
use crate::math::graph::{UnionFind, knn_components};
use crate::math::knn::{knn_with_ties, kth_distance};
use crate::math::points::PointView;
use crate::math::stats::median;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureLabel {
    SingleStructure,
    MultiCluster,
}

impl StructureLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleStructure => "single_structure",
            Self::MultiCluster => "multi_cluster",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSeparation {
    pub a: usize,
    pub b: usize,
    pub min_distance: f64,
    pub within_scale: f64,
    /// `f64::INFINITY` when both clusters have zero internal spacing.
    pub ratio: f64,
    pub separated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterCheckResult {
    pub label: StructureLabel,
    pub connected: bool,
    pub n_points: usize,
    pub n_components: usize,
    pub n_major: usize,
    pub n_groups: usize,
    /// Group id per point; noise points inherit the group of their nearest major component.
    pub labels: Vec<usize>,
    /// Median k-th neighbour distance per major component.
    pub within_scales: Vec<f64>,
    pub separations: Vec<ClusterSeparation>,
}

pub fn check_connectivity(
    points: &PointView<'_>,
    params: &ConnectivityParams,
) -> EvalResult<ClusterCheckResult> {
    let k = params.k_neighbors;
    if k == 0 {
        return Err(configuration("connectivity.k_neighbors must be >= 1"));
    }
    let n = points.len();
    if n < k + 1 {
        return Err(precondition(format!(
            "connectivity check needs at least {} points for k_neighbors={}, got {}",
            k + 1,
            k,
            n
        )));
    }

    let neighbors = knn_with_ties(points, k)?;
    let (components, n_components) = knn_components(&neighbors);

    let mut sizes = vec![0usize; n_components];
    for &c in &components {
        sizes[c] += 1;
    }
    let min_size = params
        .min_cluster_size
        .max((params.min_cluster_fraction * n as f64).ceil() as usize);
    let mut major: Vec<usize> = (0..n_components).filter(|&c| sizes[c] >= min_size).collect();
    if major.is_empty() {
        major = (0..n_components).collect();
    }
    let mut major_of_component = vec![None; n_components];
    for (m, &c) in major.iter().enumerate() {
        major_of_component[c] = Some(m);
    }
    let major_of_point: Vec<Option<usize>> =
        components.iter().map(|&c| major_of_component[c]).collect();
    let n_major = major.len();

    let mut kth_by_major: Vec<Vec<f64>> = vec![Vec::new(); n_major];
    for (i, m) in major_of_point.iter().enumerate() {
        if let Some(m) = m {
            kth_by_major[*m].push(kth_distance(&neighbors[i], k));
        }
    }
    let within_scales: Vec<f64> = kth_by_major.iter_mut().map(|v| median(v)).collect();

    let between = min_between(points, &major_of_point, n_major);

    let mut separations = Vec::new();
    let mut uf = UnionFind::new(n_major);
    for a in 0..n_major {
        for b in (a + 1)..n_major {
            let min_distance = between[a][b];
            let within_scale = within_scales[a].max(within_scales[b]);
            let ratio = if within_scale > 0.0 {
                min_distance / within_scale
            } else if min_distance > 0.0 {
                f64::INFINITY
            } else {
                0.0
            };
            let separated = ratio > params.separation_ratio;
            if !separated {
                uf.union(a, b);
            }
            debug!(a, b, min_distance, within_scale, ratio, separated, "cluster_pair");
            separations.push(ClusterSeparation {
                a,
                b,
                min_distance,
                within_scale,
                ratio,
                separated,
            });
        }
    }
    let (group_of_major, n_groups) = uf.labels();

    let mut labels = vec![0usize; n];
    for i in 0..n {
        let m = match major_of_point[i] {
            Some(m) => m,
            None => nearest_major(points, i, &major_of_point),
        };
        labels[i] = group_of_major[m];
    }

    let connected = n_groups == 1;
    let label = if connected {
        StructureLabel::SingleStructure
    } else {
        StructureLabel::MultiCluster
    };
    info!(
        n_points = n,
        n_components,
        n_major,
        n_groups,
        connected,
        "connectivity_checked"
    );

    Ok(ClusterCheckResult {
        label,
        connected,
        n_points: n,
        n_components,
        n_major,
        n_groups,
        labels,
        within_scales,
        separations,
    })
}

/// Minimum distance between every pair of major components.
fn min_between(
    points: &PointView<'_>,
    major_of_point: &[Option<usize>],
    n_major: usize,
) -> Vec<Vec<f64>> {
    let row_mins = |i: usize| -> Option<(usize, Vec<f64>)> {
        let mi = major_of_point[i]?;
        let mut mins = vec![f64::INFINITY; n_major];
        for j in 0..points.len() {
            if let Some(mj) = major_of_point[j] {
                if mj != mi {
                    let d = points.distance(i, j);
                    if d < mins[mj] {
                        mins[mj] = d;
                    }
                }
            }
        }
        Some((mi, mins))
    };

    let mut between = vec![vec![f64::INFINITY; n_major]; n_major];
    if n_major < 2 {
        return between;
    }

    #[cfg(feature = "mt")]
    let rows: Vec<Option<(usize, Vec<f64>)>> = (0..points.len()).into_par_iter().map(row_mins).collect();
    #[cfg(not(feature = "mt"))]
    let rows: Vec<Option<(usize, Vec<f64>)>> = (0..points.len()).map(row_mins).collect();

    for (mi, mins) in rows.into_iter().flatten() {
        for (mj, d) in mins.into_iter().enumerate() {
            if d < between[mi][mj] {
                between[mi][mj] = d;
                between[mj][mi] = d;
            }
        }
    }
    between
}

fn nearest_major(points: &PointView<'_>, i: usize, major_of_point: &[Option<usize>]) -> usize {
    let mut best = (f64::INFINITY, 0usize);
    for (j, m) in major_of_point.iter().enumerate() {
        if let Some(m) = m {
            let d = points.distance(i, j);
            if d < best.0 {
                best = (d, *m);
            }
        }
    }
    best.1
}
