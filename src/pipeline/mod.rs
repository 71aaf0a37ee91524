use anyhow::Result;
use std::time::Instant;
use tracing::{info, warn};

use crate::ctx::Ctx;

pub mod stage0_scaffold;
pub mod stage1_fetch;
pub mod stage2_filter;
pub mod stage3_diffexp;
pub mod stage4_label;
pub mod stage5_output;
pub mod stage6_matrix;
pub mod stage7_charts;
pub mod stage8_enrichment;

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

    /// Build the per-indication pipeline.
    pub fn indication() -> Self {
        Self::new(vec![
            Box::new(stage0_scaffold::Stage0Scaffold::new()),
            Box::new(stage1_fetch::Stage1Fetch::new()),
            Box::new(stage2_filter::Stage2Filter::new()),
            Box::new(stage3_diffexp::Stage3DiffExp::new()),
            Box::new(stage4_label::Stage4Label::new()),
            Box::new(stage5_output::Stage5Output::new()),
        ])
    }

    /// Build the aggregate pipeline that runs over the written tables.
    pub fn aggregate() -> Self {
        Self::new(vec![
            Box::new(stage6_matrix::Stage6Matrix::new()),
            Box::new(stage7_charts::Stage7Charts::new()),
            Box::new(stage8_enrichment::Stage8Enrichment::new()),
        ])
    }

    pub fn run(&self, ctx: &mut Ctx) -> Result<()> {
        for stage in &self.stages {
            let start = Instant::now();
            info!(stage = stage.name(), project = %ctx.project, "stage started");
            if let Err(err) = stage.run(ctx) {
                let elapsed_ms = start.elapsed().as_millis();
                warn!(
                    stage = stage.name(),
                    project = %ctx.project,
                    elapsed_ms = elapsed_ms as u64,
                    "stage failed"
                );
                return Err(err);
            }
            let elapsed_ms = start.elapsed().as_millis();
            info!(
                stage = stage.name(),
                project = %ctx.project,
                elapsed_ms = elapsed_ms as u64,
                "stage finished"
            );
        }
        Ok(())
    }
}
