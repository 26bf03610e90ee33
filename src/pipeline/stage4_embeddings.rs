use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::{Stage, with_threads};
use crate::scores::evaluate_all;

pub struct Stage4Embeddings;

impl Stage4Embeddings {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Embeddings {
    fn name(&self) -> &'static str {
        "stage4_embeddings"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let expression = ctx.expression()?;
        let shared = ctx.highdim()?;
        let evaluations = with_threads(ctx.threads, || {
            evaluate_all(expression, shared, &ctx.embeddings, &ctx.config)
        })?;

        let failed = evaluations.iter().filter(|e| !e.errors.is_empty()).count();
        info!(
            embeddings = evaluations.len(),
            with_errors = failed,
            "embeddings_evaluated"
        );
        for eval in &evaluations {
            for err in &eval.errors {
                ctx.warnings.push(format!(
                    "embedding '{}': {} unavailable: {}",
                    eval.label, err.stage, err.message
                ));
            }
        }
        ctx.evaluations = evaluations;
        Ok(())
    }
}
