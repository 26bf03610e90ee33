use kira_pseudotimeqc::EvalError;
use kira_pseudotimeqc::checks::{StructureLabel, check_connectivity};
use kira_pseudotimeqc::config::ConnectivityParams;
use kira_pseudotimeqc::math::points::PointView;

fn grid(side: usize, offset: [f64; 2]) -> Vec<[f64; 2]> {
    let mut out = Vec::new();
    for i in 0..side {
        for j in 0..side {
            out.push([offset[0] + i as f64, offset[1] + j as f64]);
        }
    }
    out
}

#[test]
fn single_blob_is_connected() {
    let pts = grid(10, [0.0, 0.0]);
    let res = check_connectivity(&PointView::from_xy(&pts), &ConnectivityParams::default()).unwrap();
    assert!(res.connected);
    assert_eq!(res.label, StructureLabel::SingleStructure);
    assert_eq!(res.n_components, 1);
    assert_eq!(res.n_groups, 1);
    assert!(res.labels.iter().all(|&l| l == 0));
}

#[test]
fn distant_blobs_are_disconnected() {
    let mut pts = grid(5, [0.0, 0.0]);
    pts.extend(grid(5, [100.0, 0.0]));
    let res = check_connectivity(&PointView::from_xy(&pts), &ConnectivityParams::default()).unwrap();
    assert!(!res.connected);
    assert_eq!(res.label, StructureLabel::MultiCluster);
    assert_eq!(res.n_major, 2);
    assert_eq!(res.n_groups, 2);
    assert_eq!(res.separations.len(), 1);
    assert!(res.separations[0].separated);
    assert!(res.labels[..25].iter().all(|&l| l == res.labels[0]));
    assert!(res.labels[25..].iter().all(|&l| l == res.labels[25]));
    assert_ne!(res.labels[0], res.labels[25]);
}

#[test]
fn small_sampling_gap_stays_one_structure() {
    // 5x5 grids with a gap of 3: separate kNN components, but the gap is only about
    // twice the within-grid neighbour spacing.
    let mut pts = grid(5, [0.0, 0.0]);
    pts.extend(grid(5, [7.0, 0.0]));
    let res = check_connectivity(&PointView::from_xy(&pts), &ConnectivityParams::default()).unwrap();
    assert_eq!(res.n_components, 2);
    assert_eq!(res.n_groups, 1);
    assert!(res.connected);
    assert!(!res.separations[0].separated);
}

#[test]
fn too_few_points_is_a_precondition_failure() {
    let pts = grid(2, [0.0, 0.0]);
    let err = check_connectivity(&PointView::from_xy(&pts), &ConnectivityParams::default())
        .unwrap_err();
    assert!(matches!(err, EvalError::Precondition(_)));
}

#[test]
fn small_components_attach_to_nearest_group() {
    let mut pts = grid(5, [0.0, 0.0]);
    pts.extend(grid(5, [100.0, 0.0]));
    // two stragglers near the second blob, too few to form a cluster
    pts.push([110.0, 0.0]);
    pts.push([110.0, 1.0]);
    let params = ConnectivityParams {
        k_neighbors: 1,
        ..ConnectivityParams::default()
    };
    let res = check_connectivity(&PointView::from_xy(&pts), &params).unwrap();
    assert_eq!(res.n_major, 2);
    assert_eq!(res.labels[50], res.labels[25]);
    assert_eq!(res.labels[51], res.labels[25]);
}
