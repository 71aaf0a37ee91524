use std::path::{Path, PathBuf};

use crate::diffexp::DeOutcome;
use crate::expr::CountMatrix;
use crate::geneset::GespList;
use crate::label::LabeledGene;
use crate::schema::v1::{IndicationSummary, RunSummaryV1, Thresholds};

/// One row of the optional sample sheet. Loaded and counted, nothing more.
#[derive(Debug, Clone)]
pub struct SampleSheetRow {
    pub barcode: String,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
}

impl OutputPaths {
    pub fn de_table(&self, project: &str) -> PathBuf {
        self.out_dir.join(format!("{}.de_table.tsv", project))
    }

    pub fn labeled_table(&self, project: &str) -> PathBuf {
        self.out_dir.join(format!("{}.gesp_labeled.tsv", project))
    }

    pub fn indication_summary(&self, project: &str) -> PathBuf {
        self.out_dir.join(format!("{}.summary.json", project))
    }

    pub fn matrix(&self) -> PathBuf {
        self.out_dir.join("gesp_log2fc_matrix.tsv")
    }

    pub fn barchart(&self) -> PathBuf {
        self.out_dir.join("gesp_counts_bar.svg")
    }

    pub fn heatmap(&self) -> PathBuf {
        self.out_dir.join("gesp_heatmap.svg")
    }

    pub fn enrichment(&self, collection: &str) -> PathBuf {
        self.out_dir.join(format!("enrichment_{}.tsv", collection))
    }

    pub fn run_summary(&self) -> PathBuf {
        self.out_dir.join("run_summary.json")
    }
}

/// State threaded through the stages. One `Ctx` is built per indication;
/// a master `Ctx` (empty project) accumulates the per-indication summaries
/// and drives the aggregate stages.
#[derive(Debug)]
pub struct Ctx {
    pub project: String,

    // inputs
    pub counts_dir: Option<PathBuf>,
    pub gdc_endpoint: String,
    pub gesp_path: Option<PathBuf>,
    pub gmt_paths: Vec<PathBuf>,
    pub sample_sheet_path: Option<PathBuf>,

    // knobs
    pub min_normals: usize,
    pub lfc_cutoff: f64,
    pub fdr_cutoff: f64,
    pub filter_quantile: f64,
    pub permutations: usize,
    pub seed: u64,
    pub plots: bool,

    // per-indication state
    pub counts: Option<CountMatrix>,
    pub tumor_idx: Vec<usize>,
    pub normal_idx: Vec<usize>,
    pub sample_sheet: Option<Vec<SampleSheetRow>>,
    pub gesp: Option<GespList>,
    pub de_outcome: Option<DeOutcome>,
    pub labeled: Option<Vec<LabeledGene>>,

    pub warnings: Vec<String>,
    pub output: OutputPaths,
    pub report: RunSummaryV1,
}

impl Ctx {
    pub fn new(project: &str, out_dir: &Path, tool_version: &str) -> Self {
        let thresholds = Thresholds {
            lfc_cutoff: 1.0,
            fdr_cutoff: 0.01,
            min_normals: 10,
            filter_quantile: 0.25,
        };
        Self {
            project: project.to_string(),
            counts_dir: None,
            gdc_endpoint: "https://api.gdc.cancer.gov".to_string(),
            gesp_path: None,
            gmt_paths: Vec::new(),
            sample_sheet_path: None,
            min_normals: thresholds.min_normals,
            lfc_cutoff: thresholds.lfc_cutoff,
            fdr_cutoff: thresholds.fdr_cutoff,
            filter_quantile: thresholds.filter_quantile,
            permutations: 1000,
            seed: 7,
            plots: true,
            counts: None,
            tumor_idx: Vec::new(),
            normal_idx: Vec::new(),
            sample_sheet: None,
            gesp: None,
            de_outcome: None,
            labeled: None,
            warnings: Vec::new(),
            output: OutputPaths {
                out_dir: out_dir.to_path_buf(),
            },
            report: RunSummaryV1::new(tool_version, thresholds),
        }
    }

    /// Keep the serialized thresholds in sync after CLI overrides.
    pub fn sync_thresholds(&mut self) {
        self.report.thresholds = Thresholds {
            lfc_cutoff: self.lfc_cutoff,
            fdr_cutoff: self.fdr_cutoff,
            min_normals: self.min_normals,
            filter_quantile: self.filter_quantile,
        };
    }

    pub fn is_skipped(&self) -> bool {
        self.de_outcome
            .as_ref()
            .map(|o| o.is_skipped())
            .unwrap_or(false)
    }

    pub fn build_indication_summary(&self) -> IndicationSummary {
        if self.is_skipped() {
            return IndicationSummary::skipped(
                &self.project,
                self.tumor_idx.len(),
                self.normal_idx.len(),
            );
        }
        let genes_tested = self
            .de_outcome
            .as_ref()
            .and_then(|o| o.table())
            .map(|t| t.records.len())
            .unwrap_or(0);
        let labeled = self.labeled.as_deref().unwrap_or(&[]);
        let (n_up, n_down, n_not_significant) = crate::label::count_labels(labeled);
        IndicationSummary {
            project: self.project.clone(),
            n_tumor: self.tumor_idx.len(),
            n_normal: self.normal_idx.len(),
            skipped: false,
            genes_tested,
            gesp_rows: labeled.len(),
            n_up,
            n_down,
            n_not_significant,
        }
    }
}
