use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::scores::validate_inputs;

pub struct Stage2Validate;

impl Stage2Validate {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Validate {
    fn name(&self) -> &'static str {
        "stage2_validate"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let expression = ctx.expression()?;
        validate_inputs(expression, &ctx.embeddings, &ctx.config)
            .context("input validation failed")?;
        info!(
            cells = expression.n_cells(),
            genes = expression.n_genes(),
            embeddings = ctx.embeddings.len(),
            "inputs_valid"
        );
        Ok(())
    }
}
