use kira_pseudotimeqc::EvalError;
use kira_pseudotimeqc::checks::check_preservation;
use kira_pseudotimeqc::config::PreservationParams;
use kira_pseudotimeqc::math::points::DenseMatrix;
use kira_pseudotimeqc::model::{Embedding, ExpressionMatrix};

fn cell_ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("c{}", i)).collect()
}

fn scattered(n: usize) -> Vec<[f64; 2]> {
    (0..n)
        .map(|i| {
            [
                ((i * 37) % 101) as f64 / 10.0,
                ((i * 53) % 97) as f64 / 10.0,
            ]
        })
        .collect()
}

fn expression_from(points: &[[f64; 2]]) -> ExpressionMatrix {
    let rows: Vec<Vec<f64>> = points.iter().map(|p| vec![p[0], p[1]]).collect();
    ExpressionMatrix::new(
        cell_ids(points.len()),
        vec!["g1".to_string(), "g2".to_string()],
        DenseMatrix::from_rows(&rows).unwrap(),
    )
    .unwrap()
}

#[test]
fn rigid_motion_preserves_every_neighbourhood() {
    let pts = scattered(30);
    let expr = expression_from(&pts);
    let rotated: Vec<[f64; 2]> = pts.iter().map(|p| [5.0 - p[1], p[0] + 3.0]).collect();
    let emb = Embedding::new(cell_ids(30), rotated).unwrap();

    let res = check_preservation(&expr, &emb, None, &PreservationParams::default()).unwrap();
    assert_eq!(res.good_rate, 1.0);
    assert_eq!(res.per_cell_flags.len(), 30);
}

#[test]
fn scrambled_layout_loses_neighbourhoods() {
    let line: Vec<[f64; 2]> = (0..30).map(|i| [i as f64, 0.0]).collect();
    let expr = expression_from(&line);
    let scrambled: Vec<[f64; 2]> = (0..30).map(|i| [((i * 7) % 30) as f64, 0.0]).collect();
    let emb = Embedding::new(cell_ids(30), scrambled).unwrap();

    let res = check_preservation(&expr, &emb, None, &PreservationParams::default()).unwrap();
    assert!(res.good_rate < 1.0);
    // cell 15 keeps only its neighbours at offsets 4 and 5
    assert!(!res.per_cell_flags[15]);
}

#[test]
fn embedding_order_may_differ_from_expression() {
    let pts = scattered(20);
    let expr = expression_from(&pts);
    let mut ids = cell_ids(20);
    let mut coords = pts.clone();
    ids.reverse();
    coords.reverse();
    let emb = Embedding::new(ids, coords).unwrap();

    let params = PreservationParams {
        k_neighbors: 5,
        ..PreservationParams::default()
    };
    let res = check_preservation(&expr, &emb, None, &params).unwrap();
    assert_eq!(res.good_rate, 1.0);
}

#[test]
fn unknown_embedding_cell_is_rejected() {
    let pts = scattered(20);
    let expr = expression_from(&pts);
    let mut ids = cell_ids(20);
    ids[3] = "stranger".to_string();
    let emb = Embedding::new(ids, pts).unwrap();
    let err = check_preservation(&expr, &emb, None, &PreservationParams::default()).unwrap_err();
    assert!(matches!(err, EvalError::Precondition(_)));
}
