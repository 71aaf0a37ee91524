use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thresholds {
    pub lfc_cutoff: f64,
    pub fdr_cutoff: f64,
    pub min_normals: usize,
    pub filter_quantile: f64,
}

/// Per-indication outcome carried into the aggregate stages and the run
/// summary JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicationSummary {
    pub project: String,
    pub n_tumor: usize,
    pub n_normal: usize,
    pub skipped: bool,
    pub genes_tested: usize,
    pub gesp_rows: usize,
    pub n_up: usize,
    pub n_down: usize,
    pub n_not_significant: usize,
}

impl IndicationSummary {
    pub fn skipped(project: &str, n_tumor: usize, n_normal: usize) -> Self {
        Self {
            project: project.to_string(),
            n_tumor,
            n_normal,
            skipped: true,
            genes_tested: 0,
            gesp_rows: 0,
            n_up: 0,
            n_down: 0,
            n_not_significant: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummaryV1 {
    pub tool: String,
    pub version: String,
    pub schema_version: String,
    pub thresholds: Thresholds,
    pub indications: Vec<IndicationSummary>,
    pub warnings: Vec<String>,
}

impl RunSummaryV1 {
    pub fn new(tool_version: &str, thresholds: Thresholds) -> Self {
        Self {
            tool: "gespscan".to_string(),
            version: tool_version.to_string(),
            schema_version: "v1".to_string(),
            thresholds,
            indications: Vec::new(),
            warnings: Vec::new(),
        }
    }
}
