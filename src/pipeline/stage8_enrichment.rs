use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::geneset::gmt::{self, GmtCollection};
use crate::gsea::{run_collection, RankedList};
use crate::io::tables;
use crate::pipeline::Stage;
use crate::report::enrichment::{build_report_rows, write_report, ProjectEnrichment};

pub struct Stage8Enrichment;

impl Stage8Enrichment {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage8Enrichment {
    fn name(&self) -> &'static str {
        "stage8_enrichment"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let collections: Vec<GmtCollection> = if ctx.gmt_paths.is_empty() {
            gmt::load_builtin_collections()?
        } else {
            ctx.gmt_paths
                .iter()
                .map(|p| gmt::load_gmt(p))
                .collect::<Result<_>>()?
        };

        let mut projects = Vec::new();
        for s in ctx.report.indications.iter().filter(|s| !s.skipped) {
            let path = ctx.output.de_table(&s.project);
            let table = tables::read_de_table(&path, &s.project)?;
            let ranked = RankedList::from_de_table(&table);

            let mut per_collection = Vec::with_capacity(collections.len());
            for c in &collections {
                let results = run_collection(&ranked, c, ctx.permutations, ctx.seed)?;
                info!(
                    project = %s.project,
                    collection = %c.name,
                    scored_sets = results.len(),
                    "enrichment_scored"
                );
                per_collection.push((c.name.clone(), results));
            }
            projects.push(ProjectEnrichment {
                project: s.project.clone(),
                collections: per_collection,
            });
        }

        if projects.is_empty() {
            ctx.warnings
                .push("no indications produced results; enrichment reports not written".to_string());
            return Ok(());
        }

        for c in &collections {
            let rows = build_report_rows(&c.name, &projects);
            let path = ctx.output.enrichment(&c.name);
            write_report(&path, &c.name, &rows)?;
            info!(collection = %c.name, path = %path.display(), "enrichment_report_written");
        }
        Ok(())
    }
}
