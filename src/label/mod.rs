//! Joining differential-expression results against the GESP reference list
//! and classifying each gene by the fixed thresholds.

use serde::{Deserialize, Serialize};

use crate::diffexp::DeTable;
use crate::geneset::GespList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Regulation {
    Up,
    Down,
    NotSignificant,
}

impl Regulation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Regulation::Up => "up",
            Regulation::Down => "down",
            Regulation::NotSignificant => "not-significant",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "up" => Some(Regulation::Up),
            "down" => Some(Regulation::Down),
            "not-significant" => Some(Regulation::NotSignificant),
            _ => None,
        }
    }
}

/// Up iff log2FC > cutoff and FDR below threshold; Down mirrors it; all
/// other records are NotSignificant. The three labels partition every input.
pub fn classify(log2_fold_change: f64, fdr: f64, lfc_cutoff: f64, fdr_cutoff: f64) -> Regulation {
    if log2_fold_change > lfc_cutoff && fdr < fdr_cutoff {
        Regulation::Up
    } else if log2_fold_change < -lfc_cutoff && fdr < fdr_cutoff {
        Regulation::Down
    } else {
        Regulation::NotSignificant
    }
}

/// One labeled, annotation-enriched GESP row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledGene {
    pub gene: String,
    pub log2_fold_change: f64,
    pub fdr: f64,
    pub regulation: Regulation,
    pub enzyme_class: String,
    pub gene_family: String,
}

/// Join a DE table with the reference list, keeping only surface-flagged
/// genes. Genes absent from the list drop out silently. Output is sorted by
/// descending log2 fold-change.
pub fn label_table(
    table: &DeTable,
    gesp: &GespList,
    lfc_cutoff: f64,
    fdr_cutoff: f64,
) -> Vec<LabeledGene> {
    let mut labeled: Vec<LabeledGene> = table
        .records
        .iter()
        .filter_map(|r| {
            let entry = gesp.get(&r.gene)?;
            if !entry.surface {
                return None;
            }
            Some(LabeledGene {
                gene: r.gene.clone(),
                log2_fold_change: r.log2_fold_change,
                fdr: r.fdr,
                regulation: classify(r.log2_fold_change, r.fdr, lfc_cutoff, fdr_cutoff),
                enzyme_class: entry.enzyme_class.clone(),
                gene_family: entry.gene_family.clone(),
            })
        })
        .collect();

    labeled.sort_by(|a, b| {
        b.log2_fold_change
            .partial_cmp(&a.log2_fold_change)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    labeled
}

/// Up/down/not-significant counts over a labeled table.
pub fn count_labels(labeled: &[LabeledGene]) -> (usize, usize, usize) {
    let mut up = 0;
    let mut down = 0;
    let mut ns = 0;
    for l in labeled {
        match l.regulation {
            Regulation::Up => up += 1,
            Regulation::Down => down += 1,
            Regulation::NotSignificant => ns += 1,
        }
    }
    (up, down, ns)
}
