use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::diffexp::wald::nb_wald;
use crate::diffexp::DeOutcome;
use crate::pipeline::Stage;

pub struct Stage3DiffExp;

impl Stage3DiffExp {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage3DiffExp {
    fn name(&self) -> &'static str {
        "stage3_diffexp"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let counts = ctx.counts.as_ref().context("counts not loaded")?;

        // Data-sufficiency guard, not an error: thin-normal cohorts are
        // recorded as skipped and the run moves on.
        if ctx.normal_idx.len() < ctx.min_normals {
            warn!(
                project = %ctx.project,
                normals = ctx.normal_idx.len(),
                required = ctx.min_normals,
                "too few normal samples; skipping indication"
            );
            ctx.warnings.push(format!(
                "{}: skipped ({} normal samples, need {})",
                ctx.project,
                ctx.normal_idx.len(),
                ctx.min_normals
            ));
            ctx.de_outcome = Some(DeOutcome::Skipped {
                n_normal: ctx.normal_idx.len(),
            });
            return Ok(());
        }

        let table = nb_wald(&ctx.project, counts, &ctx.tumor_idx, &ctx.normal_idx)?;
        info!(
            project = %ctx.project,
            genes = table.records.len(),
            "differential_expression_done"
        );
        ctx.de_outcome = Some(DeOutcome::Table(table));
        Ok(())
    }
}
