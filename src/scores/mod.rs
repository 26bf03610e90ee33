pub mod evaluate;
pub mod score;

pub use evaluate::{
    EmbeddingEvaluation, EmbeddingInput, HighDimSummary, StageError, dataset_advisories, evaluate_all,
    evaluate_embedding, evaluate_highdim, validate_inputs,
};
pub use score::{rank_scores, score_row, score_table};

/// The four per-embedding metrics; `None` marks a metric that could not be computed.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsRow {
    pub embedding: String,
    pub dc_check: Option<bool>,
    pub simi_retain: Option<f64>,
    pub gof: Option<f64>,
    pub ushape: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    Recommended,
    NonRecommended,
    Incomplete,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recommended => "Recommended",
            Self::NonRecommended => "Non-recommended",
            Self::Incomplete => "Incomplete",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreContributions {
    pub dc_check: f64,
    pub simi_retain: f64,
    pub gof: f64,
    pub ushape: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub embedding: String,
    pub score: Option<f64>,
    pub recommendation: Recommendation,
    pub contributions: Option<ScoreContributions>,
    pub missing: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedScore {
    /// 1-based; `None` for incomplete rows.
    pub rank: Option<usize>,
    pub result: ScoreResult,
}
