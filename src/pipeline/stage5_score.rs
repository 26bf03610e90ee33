use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::scores::{MetricsRow, rank_scores, score_table};

pub struct Stage5Score;

impl Stage5Score {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage5Score {
    fn name(&self) -> &'static str {
        "stage5_score"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let rows: Vec<MetricsRow> = ctx.evaluations.iter().map(|e| e.metrics()).collect();
        let scores = score_table(&rows, &ctx.config.scoring).context("scoring failed")?;
        let ranking = rank_scores(&scores);
        for r in &ranking {
            info!(
                embedding = %r.result.embedding,
                score = r.result.score,
                rank = r.rank,
                recommendation = r.result.recommendation.as_str(),
                "embedding_scored"
            );
        }
        ctx.scores = scores;
        ctx.ranking = ranking;
        Ok(())
    }
}
