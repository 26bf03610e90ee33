use kira_pseudotimeqc::EvalError;
use kira_pseudotimeqc::math::knn::{knn_with_ties, kth_distance};
use kira_pseudotimeqc::math::points::PointView;

fn line(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64).collect()
}

#[test]
fn ties_at_kth_distance_are_kept() {
    let data = line(5);
    let view = PointView::new(&data, 1).unwrap();
    let nb = knn_with_ties(&view, 1).unwrap();

    let idx: Vec<usize> = nb[2].iter().map(|n| n.index).collect();
    assert_eq!(idx, vec![1, 3]);
    let idx: Vec<usize> = nb[0].iter().map(|n| n.index).collect();
    assert_eq!(idx, vec![1]);
}

#[test]
fn neighbours_sorted_and_exclude_self() {
    let data = line(8);
    let view = PointView::new(&data, 1).unwrap();
    let nb = knn_with_ties(&view, 3).unwrap();
    for (i, list) in nb.iter().enumerate() {
        assert!(list.len() >= 3);
        assert!(list.iter().all(|n| n.index != i));
        assert!(list.windows(2).all(|w| w[0].distance <= w[1].distance));
    }
    // point 4: 3 and 5 at 1, then 2 and 6 tied at 2
    assert_eq!(nb[4].len(), 4);
    assert_eq!(kth_distance(&nb[4], 3), 2.0);
}

#[test]
fn invalid_k_is_rejected() {
    let data = line(3);
    let view = PointView::new(&data, 1).unwrap();
    assert!(matches!(
        knn_with_ties(&view, 0),
        Err(EvalError::Configuration(_))
    ));
    assert!(matches!(
        knn_with_ties(&view, 3),
        Err(EvalError::Precondition(_))
    ));
}

#[test]
fn point_view_rejects_ragged_buffer() {
    let data = vec![1.0, 2.0, 3.0];
    assert!(PointView::new(&data, 2).is_err());
    assert!(PointView::new(&data, 0).is_err());
}
