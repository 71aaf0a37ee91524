use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::io::{self, tables};
use crate::pipeline::Stage;

pub struct Stage5Output;

impl Stage5Output {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage5Output {
    fn name(&self) -> &'static str {
        "stage5_output"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        // Skipped indications leave no files behind.
        if ctx.is_skipped() {
            info!(project = %ctx.project, "skipped indication; no outputs");
            return Ok(());
        }

        let outcome = ctx.de_outcome.as_ref().context("DE outcome missing")?;
        let table = outcome.table().context("DE table missing")?;
        let labeled = ctx.labeled.as_ref().context("labeled table missing")?;

        tables::write_de_table(&ctx.output.de_table(&ctx.project), table)?;
        tables::write_labeled_table(&ctx.output.labeled_table(&ctx.project), labeled)?;
        io::write_json(
            &ctx.output.indication_summary(&ctx.project),
            &ctx.build_indication_summary(),
        )?;

        info!(
            project = %ctx.project,
            de_table = %ctx.output.de_table(&ctx.project).display(),
            "indication_outputs_written"
        );
        Ok(())
    }
}
