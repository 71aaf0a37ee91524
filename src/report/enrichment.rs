//! Per-collection enrichment report tables.
//!
//! Each collection gets one table with one row per indication, carrying the
//! selected up- and down-regulated pathway and its score.

use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::gsea::EnrichmentResult;

/// The deck tables select the third-ranked pathway in each direction, and
/// the down column of the KEGG table is taken from the Hallmark ranking.
/// TODO: confirm with the deck owner whether rank 3 and the Hallmark-sourced
/// KEGG down row are intentional before changing either.
pub const REPORT_RANK: usize = 3;

pub const HALLMARK: &str = "hallmark";
pub const KEGG: &str = "kegg_legacy";

/// All collection results for one indication, each sorted by descending NES.
pub struct ProjectEnrichment {
    pub project: String,
    pub collections: Vec<(String, Vec<EnrichmentResult>)>,
}

impl ProjectEnrichment {
    fn results_for(&self, collection: &str) -> Option<&[EnrichmentResult]> {
        self.collections
            .iter()
            .find(|(name, _)| name == collection)
            .map(|(_, r)| r.as_slice())
    }
}

#[derive(Debug, Clone)]
pub struct ReportRow {
    pub project: String,
    pub up: Option<EnrichmentResult>,
    pub down: Option<EnrichmentResult>,
}

/// Rank is 1-based from the top (descending NES) or from the bottom.
pub fn pick_ranked(
    results: &[EnrichmentResult],
    rank: usize,
    from_top: bool,
) -> Option<EnrichmentResult> {
    if rank == 0 || results.len() < rank {
        return None;
    }
    let idx = if from_top {
        rank - 1
    } else {
        results.len() - rank
    };
    Some(results[idx].clone())
}

pub fn build_report_rows(
    collection: &str,
    projects: &[ProjectEnrichment],
) -> Vec<ReportRow> {
    projects
        .iter()
        .map(|p| {
            let own = p.results_for(collection).unwrap_or(&[]);
            let down_source = if collection == KEGG {
                p.results_for(HALLMARK).unwrap_or(own)
            } else {
                own
            };
            ReportRow {
                project: p.project.clone(),
                up: pick_ranked(own, REPORT_RANK, true),
                down: pick_ranked(down_source, REPORT_RANK, false),
            }
        })
        .collect()
}

pub fn write_report(path: &Path, collection: &str, rows: &[ReportRow]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    writeln!(
        w,
        "project\tcollection\tup_pathway\tup_nes\tup_p\tdown_pathway\tdown_nes\tdown_p"
    )?;
    for row in rows {
        write!(w, "{}\t{}", row.project, collection)?;
        match &row.up {
            Some(r) => write!(w, "\t{}\t{:.4}\t{:.4}", r.set_name, r.nes, r.p_value)?,
            None => write!(w, "\tNA\tNA\tNA")?,
        }
        match &row.down {
            Some(r) => writeln!(w, "\t{}\t{:.4}\t{:.4}", r.set_name, r.nes, r.p_value)?,
            None => writeln!(w, "\tNA\tNA\tNA")?,
        }
    }
    Ok(())
}
