use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::report::matrix::FoldChangeMatrix;
use crate::report::{barchart, heatmap};

pub struct Stage7Charts;

impl Stage7Charts {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage7Charts {
    fn name(&self) -> &'static str {
        "stage7_charts"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        if !ctx.plots {
            info!("plot rendering disabled");
            return Ok(());
        }
        if ctx.report.indications.iter().all(|s| s.skipped) {
            info!("every indication skipped; nothing to chart");
            return Ok(());
        }

        barchart::render_counts_bar(&ctx.report.indications, &ctx.output.barchart())?;
        info!(path = %ctx.output.barchart().display(), "bar_chart_written");

        // The heatmap re-reads the matrix file the previous stage wrote, so
        // a reporting-only invocation behaves identically.
        let matrix = FoldChangeMatrix::read_tsv(&ctx.output.matrix())?;
        heatmap::render_heatmap(&matrix, &ctx.output.heatmap())?;
        info!(path = %ctx.output.heatmap().display(), "heatmap_written");
        Ok(())
    }
}
