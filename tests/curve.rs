use kira_pseudotimeqc::model::{FittedCurve, curve_segments};

#[test]
fn segments_from_points() {
    assert!(curve_segments(&[]).is_empty());

    let single = curve_segments(&[[1.0, 2.0]]);
    assert_eq!(single.len(), 1);
    assert_eq!(single[0].length(), 0.0);

    let repeated = curve_segments(&[[0.0, 0.0], [0.0, 0.0], [3.0, 4.0]]);
    assert_eq!(repeated.len(), 1);
    assert_eq!(repeated[0].length(), 5.0);

    let path = curve_segments(&[[0.0, 0.0], [3.0, 4.0], [3.0, 10.0]]);
    assert_eq!(path.len(), 2);
}

#[test]
fn arc_length_bookkeeping() {
    let curve = FittedCurve::from_points(vec![(
        "L1".to_string(),
        vec![[0.0, 0.0], [3.0, 4.0], [3.0, 10.0]],
    )])
    .unwrap();
    let l1 = curve.get("L1").unwrap();
    assert_eq!(l1.total_length(), 11.0);
    assert_eq!(l1.cumulative_starts(), vec![0.0, 5.0]);
    assert!(curve.get("L2").is_none());
}

#[test]
fn duplicate_lineage_is_rejected() {
    let res = FittedCurve::from_points(vec![
        ("L1".to_string(), vec![[0.0, 0.0], [1.0, 0.0]]),
        ("L1".to_string(), vec![[0.0, 0.0], [0.0, 1.0]]),
    ]);
    assert!(res.is_err());
}
