use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::geneset;
use crate::label::{count_labels, label_table};
use crate::pipeline::Stage;

pub struct Stage4Label;

impl Stage4Label {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Label {
    fn name(&self) -> &'static str {
        "stage4_label"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        if ctx.is_skipped() {
            return Ok(());
        }

        if ctx.gesp.is_none() {
            ctx.gesp = Some(match &ctx.gesp_path {
                Some(path) => geneset::load_tsv(path)?,
                None => geneset::load_builtin()?,
            });
        }
        let gesp = ctx.gesp.as_ref().context("GESP list missing")?;

        let outcome = ctx.de_outcome.as_ref().context("DE outcome missing")?;
        let table = outcome.table().context("DE table missing")?;

        let labeled = label_table(table, gesp, ctx.lfc_cutoff, ctx.fdr_cutoff);
        if labeled.is_empty() {
            ctx.warnings.push(format!(
                "{}: no GESP genes survived the join",
                ctx.project
            ));
        }
        let (up, down, ns) = count_labels(&labeled);
        info!(
            project = %ctx.project,
            gesp_rows = labeled.len(),
            up,
            down,
            not_significant = ns,
            "gesp_labeling_done"
        );

        ctx.labeled = Some(labeled);
        Ok(())
    }
}
