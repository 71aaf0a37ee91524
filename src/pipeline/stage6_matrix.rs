use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::io::tables;
use crate::pipeline::Stage;
use crate::report::matrix::FoldChangeMatrix;

pub struct Stage6Matrix;

impl Stage6Matrix {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage6Matrix {
    fn name(&self) -> &'static str {
        "stage6_matrix"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let mut labeled = Vec::new();
        for s in ctx.report.indications.iter().filter(|s| !s.skipped) {
            let path = ctx.output.labeled_table(&s.project);
            labeled.push((s.project.clone(), tables::read_labeled_table(&path)?));
        }
        if labeled.is_empty() {
            ctx.warnings
                .push("no indications produced results; matrix not written".to_string());
            info!("fold_change_matrix_empty");
            return Ok(());
        }

        let matrix = FoldChangeMatrix::from_labeled(&labeled)?;
        matrix.write_tsv(&ctx.output.matrix())?;
        info!(
            genes = matrix.n_genes(),
            projects = matrix.n_projects(),
            path = %ctx.output.matrix().display(),
            "fold_change_matrix_written"
        );
        Ok(())
    }
}
