use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::pipeline::{Stage, with_threads};
use crate::scores::{dataset_advisories, evaluate_highdim};

pub struct Stage3HighDim;

impl Stage3HighDim {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage3HighDim {
    fn name(&self) -> &'static str {
        "stage3_highdim"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let expression = ctx.expression()?;
        let config = &ctx.config;
        let run_homogeneity = ctx.run_homogeneity;

        let (summary, homogeneity_error) = with_threads(ctx.threads, || {
            evaluate_highdim(expression, config, run_homogeneity)
        })?
        .context("expression connectivity check failed")?;

        if let Some(err) = homogeneity_error {
            warn!(error = %err, "homogeneity_unavailable");
            ctx.warnings
                .push(format!("homogeneity test unavailable: {}", err));
        }

        let advisories = dataset_advisories(&summary);
        for advisory in &advisories {
            warn!(advisory = %advisory, "dataset_advisory");
        }
        info!(
            structure = summary.connectivity.label.as_str(),
            groups = summary.connectivity.n_groups,
            homogeneity = summary.homogeneity.as_ref().map(|h| h.decision.as_str()),
            "highdim_ready"
        );
        ctx.advisories = advisories;
        ctx.highdim = Some(summary);
        Ok(())
    }
}
