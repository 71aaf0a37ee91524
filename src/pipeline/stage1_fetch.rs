use std::io::BufRead;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::ctx::{Ctx, SampleSheetRow};
use crate::expr::CountMatrix;
use crate::gdc::{split_groups, GdcClient};
use crate::pipeline::Stage;

pub struct Stage1Fetch;

impl Stage1Fetch {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Fetch {
    fn name(&self) -> &'static str {
        "stage1_fetch"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let counts = match &ctx.counts_dir {
            Some(dir) => load_local_counts(dir, &ctx.project)?,
            None => {
                let client = GdcClient::new(&ctx.gdc_endpoint)?;
                client.fetch_count_matrix(&ctx.project)?
            }
        };

        // STAR outputs can repeat a symbol across gene ids; keep the first
        // row so every downstream table has one row per gene.
        let (index, dup_warnings) = counts.gene_index();
        let counts = if index.len() != counts.n_genes() {
            ctx.warnings.extend(dup_warnings);
            let mut keep: Vec<usize> = index.into_values().collect();
            keep.sort_unstable();
            counts.subset_genes(&keep)
        } else {
            counts
        };

        let (tumor_idx, normal_idx) = split_groups(&counts.samples);
        let n_other = counts.n_samples() - tumor_idx.len() - normal_idx.len();
        if tumor_idx.is_empty() {
            bail!("{}: no tumor samples in cohort", ctx.project);
        }
        if n_other > 0 {
            ctx.warnings.push(format!(
                "{}: {} samples with unrecognized sample-type codes excluded",
                ctx.project, n_other
            ));
        }

        info!(
            project = %ctx.project,
            genes = counts.n_genes(),
            tumor = tumor_idx.len(),
            normal = normal_idx.len(),
            excluded = n_other,
            "cohort_loaded"
        );

        if let Some(path) = &ctx.sample_sheet_path {
            let rows = load_sample_sheet(path)?;
            info!(project = %ctx.project, rows = rows.len(), "sample_sheet_loaded");
            ctx.sample_sheet = Some(rows);
        }

        ctx.counts = Some(counts);
        ctx.tumor_idx = tumor_idx;
        ctx.normal_idx = normal_idx;
        Ok(())
    }
}

fn load_local_counts(dir: &Path, project: &str) -> Result<CountMatrix> {
    let plain = dir.join(format!("{}.counts.tsv", project));
    let gz = dir.join(format!("{}.counts.tsv.gz", project));
    let path = if plain.exists() {
        plain
    } else if gz.exists() {
        gz
    } else {
        bail!(
            "no counts file for {} under {} (expected {}.counts.tsv[.gz])",
            project,
            dir.display(),
            project
        );
    };
    CountMatrix::from_tsv(&path)
}

/// Sample sheet: header line, then barcode plus free-form metadata columns.
/// Carried on the context for provenance; nothing downstream reads it.
fn load_sample_sheet(path: &Path) -> Result<Vec<SampleSheetRow>> {
    let reader = crate::io::open_maybe_gz(path)
        .with_context(|| format!("failed to open sample sheet {}", path.display()))?;
    let reader = std::io::BufReader::new(reader);
    let mut rows = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if idx == 0 || line.trim().is_empty() {
            continue;
        }
        let mut fields = line.trim_end().split('\t');
        let barcode = fields
            .next()
            .with_context(|| format!("{}:{} empty sample sheet row", path.display(), idx + 1))?
            .to_string();
        rows.push(SampleSheetRow {
            barcode,
            columns: fields.map(|f| f.to_string()).collect(),
        });
    }
    Ok(rows)
}
