use kira_pseudotimeqc::EvalError;
use kira_pseudotimeqc::config::ScoreWeights;
use kira_pseudotimeqc::scores::{MetricsRow, Recommendation, rank_scores, score_row, score_table};

fn row(name: &str, dc: bool, simi: f64, gof: f64, ushape: f64) -> MetricsRow {
    MetricsRow {
        embedding: name.to_string(),
        dc_check: Some(dc),
        simi_retain: Some(simi),
        gof: Some(gof),
        ushape: Some(ushape),
    }
}

#[test]
fn disconnection_outweighs_perfect_rates() {
    let res = score_row(&row("e", false, 1.0, 1.0, 0.0), &ScoreWeights::default()).unwrap();
    assert!(res.score.unwrap() <= 0.0);
    assert_eq!(res.recommendation, Recommendation::NonRecommended);
}

#[test]
fn good_connected_embedding_is_recommended() {
    let res = score_row(&row("e", true, 0.9, 0.9, 0.05), &ScoreWeights::default()).unwrap();
    assert!((res.score.unwrap() - 0.75).abs() < 1e-12);
    assert_eq!(res.recommendation, Recommendation::Recommended);
    let c = res.contributions.unwrap();
    assert_eq!(c.dc_check, 0.0);
    assert!((c.ushape + 0.05).abs() < 1e-12);
}

#[test]
fn zero_score_is_not_recommended() {
    let res = score_row(&row("e", true, 0.5, 0.5, 0.0), &ScoreWeights::default()).unwrap();
    assert_eq!(res.score, Some(0.0));
    assert_eq!(res.recommendation, Recommendation::NonRecommended);
}

#[test]
fn ranking_orders_by_score() {
    let rows = vec![
        row("e1", true, 0.9, 0.8, 0.1),
        row("e2", false, 0.95, 0.9, 0.0),
        row("e3", true, 0.6, 0.6, 0.1),
    ];
    let scores = score_table(&rows, &ScoreWeights::default()).unwrap();
    let ranked = rank_scores(&scores);
    let order: Vec<&str> = ranked.iter().map(|r| r.result.embedding.as_str()).collect();
    assert_eq!(order, vec!["e1", "e3", "e2"]);
    assert_eq!(
        ranked.iter().map(|r| r.rank).collect::<Vec<_>>(),
        vec![Some(1), Some(2), Some(3)]
    );
    assert_eq!(ranked[2].result.recommendation, Recommendation::NonRecommended);
    assert_eq!(ranked[0].result.recommendation, Recommendation::Recommended);
}

#[test]
fn weak_rates_and_high_ambiguity_rank_last() {
    let rows = vec![
        row("emb1", true, 0.9, 0.8, 0.05),
        row("emb2", true, 0.6, 0.3, 0.4),
        row("emb3", true, 0.85, 0.75, 0.1),
    ];
    let scores = score_table(&rows, &ScoreWeights::default()).unwrap();
    assert!((scores[0].score.unwrap() - 0.65).abs() < 1e-12);
    assert!((scores[1].score.unwrap() + 0.5).abs() < 1e-12);
    assert!((scores[2].score.unwrap() - 0.5).abs() < 1e-12);
    assert_eq!(scores[1].recommendation, Recommendation::NonRecommended);

    let ranked = rank_scores(&scores);
    assert_eq!(ranked[0].result.embedding, "emb1");
    assert_eq!(ranked[0].rank, Some(1));
    assert_eq!(ranked[2].result.embedding, "emb2");
    assert_eq!(ranked[2].rank, Some(3));
}

#[test]
fn missing_metric_is_incomplete_and_unranked() {
    let mut partial = row("partial", true, 0.9, 0.9, 0.0);
    partial.gof = None;
    let rows = vec![partial, row("full", true, 0.6, 0.6, 0.0)];
    let scores = score_table(&rows, &ScoreWeights::default()).unwrap();
    assert_eq!(scores[0].recommendation, Recommendation::Incomplete);
    assert_eq!(scores[0].score, None);
    assert_eq!(scores[0].missing, vec!["GOF"]);

    let ranked = rank_scores(&scores);
    assert_eq!(ranked[0].result.embedding, "full");
    assert_eq!(ranked[0].rank, Some(1));
    assert_eq!(ranked[1].rank, None);
}

#[test]
fn equal_scores_keep_input_order() {
    let rows = vec![
        row("b", true, 0.7, 0.7, 0.0),
        row("a", true, 0.7, 0.7, 0.0),
    ];
    let ranked = rank_scores(&score_table(&rows, &ScoreWeights::default()).unwrap());
    assert_eq!(ranked[0].result.embedding, "b");
    assert_eq!(ranked[1].result.embedding, "a");
}

#[test]
fn out_of_range_rate_is_rejected() {
    let err = score_row(&row("e", true, 1.5, 0.5, 0.0), &ScoreWeights::default()).unwrap_err();
    assert!(matches!(err, EvalError::Precondition(_)));
}

#[test]
fn recommendation_labels() {
    assert_eq!(Recommendation::Recommended.as_str(), "Recommended");
    assert_eq!(Recommendation::NonRecommended.as_str(), "Non-recommended");
    assert_eq!(Recommendation::Incomplete.as_str(), "Incomplete");
}
