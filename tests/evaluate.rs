use kira_pseudotimeqc::EvalError;
use kira_pseudotimeqc::checks::HomogeneityDecision;
use kira_pseudotimeqc::config::EvalConfig;
use kira_pseudotimeqc::math::points::DenseMatrix;
use kira_pseudotimeqc::model::{Embedding, ExpressionMatrix, FittedCurve, PseudotimeTable};
use kira_pseudotimeqc::scores::{
    EmbeddingInput, Recommendation, dataset_advisories, evaluate_all, evaluate_highdim,
    rank_scores, score_table, validate_inputs,
};

const N: usize = 40;

fn cell_ids() -> Vec<String> {
    (0..N).map(|i| format!("cell{}", i)).collect()
}

/// Cells spread evenly along one expression direction.
fn line_expression() -> ExpressionMatrix {
    let rows: Vec<Vec<f64>> = (0..N)
        .map(|i| {
            let t = i as f64;
            vec![t, 2.0 * t, 0.5 * t]
        })
        .collect();
    ExpressionMatrix::new(
        cell_ids(),
        vec!["g1".into(), "g2".into(), "g3".into()],
        DenseMatrix::from_rows(&rows).unwrap(),
    )
    .unwrap()
}

fn with_line_trajectory(label: &str, coords: Vec<[f64; 2]>) -> EmbeddingInput {
    let curve: Vec<[f64; 2]> = vec![coords[0], coords[N - 1]];
    let embedding = Embedding::new(cell_ids(), coords).unwrap();
    let pt = PseudotimeTable::new(
        cell_ids(),
        vec!["L1".into()],
        (0..N).map(|i| vec![Some(i as f64)]).collect(),
    )
    .unwrap();
    let curve = FittedCurve::from_points(vec![("L1".into(), curve)]).unwrap();
    EmbeddingInput::new(label, embedding)
        .with_trajectory(pt, curve)
        .unwrap()
}

fn faithful() -> EmbeddingInput {
    with_line_trajectory("faithful", (0..N).map(|i| [i as f64, 0.0]).collect())
}

fn split() -> EmbeddingInput {
    with_line_trajectory(
        "split",
        (0..N)
            .map(|i| {
                let x = if i < N / 2 { i as f64 } else { i as f64 + 100.0 };
                [x, 0.0]
            })
            .collect(),
    )
}

#[test]
fn line_expression_is_one_structured_population() {
    let (summary, homogeneity_error) =
        evaluate_highdim(&line_expression(), &EvalConfig::default_v1(), true).unwrap();
    assert!(homogeneity_error.is_none());
    assert!(summary.connectivity.connected);
    let h = summary.homogeneity.as_ref().unwrap();
    assert_eq!(h.decision, HomogeneityDecision::Structured);
    assert!(dataset_advisories(&summary).is_empty());
}

#[test]
fn failed_homogeneity_is_returned_beside_connectivity() {
    let rows: Vec<Vec<f64>> = (0..N).map(|i| vec![i as f64]).collect();
    let expr = ExpressionMatrix::new(
        cell_ids(),
        vec!["g1".into()],
        DenseMatrix::from_rows(&rows).unwrap(),
    )
    .unwrap();
    let cfg = EvalConfig::default_v1();

    let (summary, err) = evaluate_highdim(&expr, &cfg, true).unwrap();
    assert!(summary.connectivity.connected);
    assert!(summary.homogeneity.is_none());
    assert!(matches!(err, Some(EvalError::Precondition(_))));

    let (skipped, err) = evaluate_highdim(&expr, &cfg, false).unwrap();
    assert!(skipped.homogeneity.is_none());
    assert!(err.is_none());
}

#[test]
fn faithful_embedding_beats_split_embedding() {
    let expr = line_expression();
    let mut cfg = EvalConfig::default_v1();
    cfg.density.bin_width = 1.0;
    let inputs = vec![split(), faithful()];
    validate_inputs(&expr, &inputs, &cfg).unwrap();

    let (shared, _) = evaluate_highdim(&expr, &cfg, false).unwrap();
    let evals = evaluate_all(&expr, &shared, &inputs, &cfg);
    assert_eq!(evals[0].label, "split");
    assert_eq!(evals[1].label, "faithful");

    let good = evals[1].metrics();
    assert_eq!(good.dc_check, Some(true));
    assert_eq!(good.simi_retain, Some(1.0));
    assert_eq!(good.gof, Some(1.0));
    assert_eq!(good.ushape, Some(0.0));

    let bad = evals[0].metrics();
    assert_eq!(bad.dc_check, Some(false));

    let rows: Vec<_> = evals.iter().map(|e| e.metrics()).collect();
    let ranked = rank_scores(&score_table(&rows, &cfg.scoring).unwrap());
    assert_eq!(ranked[0].result.embedding, "faithful");
    assert_eq!(ranked[0].result.recommendation, Recommendation::Recommended);
    assert_eq!(ranked[1].result.recommendation, Recommendation::NonRecommended);
}

#[test]
fn embedding_without_trajectory_is_incomplete() {
    let expr = line_expression();
    let cfg = EvalConfig::default_v1();
    let coords: Vec<[f64; 2]> = (0..N).map(|i| [i as f64, 0.0]).collect();
    let input = EmbeddingInput::new("bare", Embedding::new(cell_ids(), coords).unwrap());

    let (shared, _) = evaluate_highdim(&expr, &cfg, false).unwrap();
    let evals = evaluate_all(&expr, &shared, &[input], &cfg);
    let m = evals[0].metrics();
    assert_eq!(m.ushape, None);
    assert!(m.simi_retain.is_some());
    assert!(evals[0].errors.iter().any(|e| e.stage == "ambiguity"));

    let scores = score_table(&[m], &cfg.scoring).unwrap();
    assert_eq!(scores[0].recommendation, Recommendation::Incomplete);
}

#[test]
fn separated_expression_raises_advisory() {
    let rows: Vec<Vec<f64>> = (0..N)
        .map(|i| {
            let t = if i < N / 2 { i as f64 } else { i as f64 + 500.0 };
            vec![t, 0.5 * t]
        })
        .collect();
    let expr = ExpressionMatrix::new(
        cell_ids(),
        vec!["g1".into(), "g2".into()],
        DenseMatrix::from_rows(&rows).unwrap(),
    )
    .unwrap();
    let (summary, _) = evaluate_highdim(&expr, &EvalConfig::default_v1(), false).unwrap();
    assert!(!summary.connectivity.connected);
    let advisories = dataset_advisories(&summary);
    assert_eq!(advisories.len(), 1);
    assert!(advisories[0].contains("separated groups"));
}

#[test]
fn validation_rejects_bad_collections() {
    let expr = line_expression();
    let cfg = EvalConfig::default_v1();

    let dup = vec![faithful(), faithful()];
    assert!(matches!(
        validate_inputs(&expr, &dup, &cfg),
        Err(EvalError::Precondition(_))
    ));

    let mut ids = cell_ids();
    ids[0] = "ghost".into();
    let coords: Vec<[f64; 2]> = (0..N).map(|i| [i as f64, 0.0]).collect();
    let stray = vec![EmbeddingInput::new("stray", Embedding::new(ids, coords).unwrap())];
    assert!(matches!(
        validate_inputs(&expr, &stray, &cfg),
        Err(EvalError::Precondition(_))
    ));

    let mut bad_cfg = cfg.clone();
    bad_cfg.density.bin_width = -1.0;
    assert!(matches!(
        validate_inputs(&expr, &[faithful()], &bad_cfg),
        Err(EvalError::Configuration(_))
    ));
}

#[test]
fn trajectory_cells_must_exist_in_embedding() {
    let coords: Vec<[f64; 2]> = (0..N).map(|i| [i as f64, 0.0]).collect();
    let embedding = Embedding::new(cell_ids(), coords).unwrap();
    let pt = PseudotimeTable::new(
        vec!["elsewhere".into()],
        vec!["L1".into()],
        vec![vec![Some(0.0)]],
    )
    .unwrap();
    let curve =
        FittedCurve::from_points(vec![("L1".into(), vec![[0.0, 0.0], [1.0, 0.0]])]).unwrap();
    let err = EmbeddingInput::new("x", embedding)
        .with_trajectory(pt, curve)
        .unwrap_err();
    assert!(matches!(err, EvalError::Precondition(_)));
}
