use std::time::Instant;

use anyhow::Result;
use tracing::{info, warn};

use crate::ctx::Ctx;

pub mod stage0_scaffold;
pub mod stage1_input;
pub mod stage2_validate;
pub mod stage3_highdim;
pub mod stage4_embeddings;
pub mod stage5_score;
pub mod stage6_output;

pub trait Stage {
    fn name(&self) -> &'static str;
    fn run(&self, ctx: &mut Ctx) -> Result<()>;
}

pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Stages 0 to 6.
    pub fn full() -> Self {
        Self::new(vec![
            Box::new(stage0_scaffold::Stage0Scaffold::new()),
            Box::new(stage1_input::Stage1Input::new()),
            Box::new(stage2_validate::Stage2Validate::new()),
            Box::new(stage3_highdim::Stage3HighDim::new()),
            Box::new(stage4_embeddings::Stage4Embeddings::new()),
            Box::new(stage5_score::Stage5Score::new()),
            Box::new(stage6_output::Stage6Output::new()),
        ])
    }

    pub fn validate_only() -> Self {
        Self::new(vec![
            Box::new(stage1_input::Stage1Input::new()),
            Box::new(stage2_validate::Stage2Validate::new()),
        ])
    }

    pub fn run(&self, ctx: &mut Ctx) -> Result<()> {
        for stage in &self.stages {
            let start = Instant::now();
            info!(stage = stage.name(), "stage started");
            if let Err(err) = stage.run(ctx) {
                let elapsed_ms = start.elapsed().as_millis();
                warn!(
                    stage = stage.name(),
                    elapsed_ms = elapsed_ms as u64,
                    "stage failed"
                );
                return Err(err);
            }
            let elapsed_ms = start.elapsed().as_millis();
            info!(
                stage = stage.name(),
                elapsed_ms = elapsed_ms as u64,
                "stage finished"
            );
        }
        Ok(())
    }
}

/// Runs `f` on a pool of `threads` workers (0 = rayon's default).
#[cfg(feature = "mt")]
pub(crate) fn with_threads<T, F>(threads: usize, f: F) -> Result<T>
where
    F: FnOnce() -> T + Send,
    T: Send,
{
    if threads == 0 {
        return Ok(f());
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build thread pool: {}", e))?;
    Ok(pool.install(f))
}

#[cfg(not(feature = "mt"))]
pub(crate) fn with_threads<T, F>(threads: usize, f: F) -> Result<T>
where
    F: FnOnce() -> T + Send,
    T: Send,
{
    let _ = threads;
    Ok(f())
}
