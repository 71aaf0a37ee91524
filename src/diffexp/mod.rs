pub mod fdr;
pub mod wald;

use serde::{Deserialize, Serialize};

/// One gene's tumor-vs-normal test result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeRecord {
    pub gene: String,
    pub base_mean: f64,
    pub log2_fold_change: f64,
    pub statistic: f64,
    pub p_value: f64,
    pub fdr: f64,
}

/// Full differential-expression table for one indication, one row per gene.
#[derive(Debug, Clone)]
pub struct DeTable {
    pub project: String,
    pub n_tumor: usize,
    pub n_normal: usize,
    pub records: Vec<DeRecord>,
}

/// Outcome of the per-indication test. An indication with too few normal
/// samples is skipped, not failed: downstream stages pass it over.
#[derive(Debug, Clone)]
pub enum DeOutcome {
    Table(DeTable),
    Skipped { n_normal: usize },
}

impl DeOutcome {
    pub fn table(&self) -> Option<&DeTable> {
        match self {
            DeOutcome::Table(t) => Some(t),
            DeOutcome::Skipped { .. } => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, DeOutcome::Skipped { .. })
    }
}
