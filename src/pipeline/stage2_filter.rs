use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::expr::normalize::{filter_by_quantile, normalize, size_factors};
use crate::pipeline::Stage;

pub struct Stage2Filter;

impl Stage2Filter {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Filter {
    fn name(&self) -> &'static str {
        "stage2_filter"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let counts = ctx.counts.as_ref().context("counts not loaded")?;

        let factors = size_factors(counts)
            .with_context(|| format!("{}: size factor estimation failed", ctx.project))?;
        let normed = normalize(counts, &factors)?;
        let (filtered, removed) = filter_by_quantile(&normed, ctx.filter_quantile)?;

        info!(
            project = %ctx.project,
            kept = filtered.n_genes(),
            removed,
            "expression_filtered"
        );

        ctx.counts = Some(filtered);
        Ok(())
    }
}
