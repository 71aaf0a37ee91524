//! Read-only client for the GDC portal.
//!
//! One query per indication against the `files` endpoint, then one download
//! per matching STAR counts file. No caching and no retry: a failed request
//! fails the run.

use std::io::Read;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::expr::CountMatrix;

const DATA_TYPE: &str = "Gene Expression Quantification";
const WORKFLOW_TYPE: &str = "STAR - Counts";
const PAGE_SIZE: usize = 2000;

/// Tumor/normal grouping derived from the TCGA barcode sample-type code
/// (field four, first two digits): 01-09 tumor, 10-19 normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleGroup {
    Tumor,
    Normal,
    Other,
}

pub fn sample_group(barcode: &str) -> SampleGroup {
    let code = barcode
        .split('-')
        .nth(3)
        .and_then(|f| f.get(0..2))
        .and_then(|c| c.parse::<u8>().ok());
    match code {
        Some(1..=9) => SampleGroup::Tumor,
        Some(10..=19) => SampleGroup::Normal,
        _ => SampleGroup::Other,
    }
}

/// Column indices of tumor and normal samples; everything else (control
/// analytes, malformed barcodes) is left out of both groups.
pub fn split_groups(samples: &[String]) -> (Vec<usize>, Vec<usize>) {
    let mut tumor = Vec::new();
    let mut normal = Vec::new();
    for (j, barcode) in samples.iter().enumerate() {
        match sample_group(barcode) {
            SampleGroup::Tumor => tumor.push(j),
            SampleGroup::Normal => normal.push(j),
            SampleGroup::Other => {}
        }
    }
    (tumor, normal)
}

pub struct GdcClient {
    http: reqwest::blocking::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct FilesResponse {
    data: FilesData,
}

#[derive(Debug, Deserialize)]
struct FilesData {
    hits: Vec<FileHit>,
}

#[derive(Debug, Deserialize)]
struct FileHit {
    file_id: String,
    #[serde(default)]
    associated_entities: Vec<AssociatedEntity>,
}

#[derive(Debug, Deserialize)]
struct AssociatedEntity {
    entity_submitter_id: String,
}

impl GdcClient {
    pub fn new(endpoint: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(600))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// List open-access STAR counts files for one project, with the sample
    /// barcode each file belongs to.
    pub fn files_for_project(&self, project: &str) -> Result<Vec<(String, String)>> {
        let filters = json!({
            "op": "and",
            "content": [
                {"op": "in", "content": {"field": "cases.project.project_id", "value": [project]}},
                {"op": "in", "content": {"field": "data_type", "value": [DATA_TYPE]}},
                {"op": "in", "content": {"field": "analysis.workflow_type", "value": [WORKFLOW_TYPE]}},
                {"op": "in", "content": {"field": "access", "value": ["open"]}}
            ]
        });
        let body = json!({
            "filters": filters,
            "fields": "file_id,associated_entities.entity_submitter_id",
            "format": "JSON",
            "size": PAGE_SIZE.to_string(),
        });

        let url = format!("{}/files", self.endpoint);
        let response: FilesResponse = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .with_context(|| format!("GDC files query failed for {}", project))?
            .error_for_status()
            .with_context(|| format!("GDC files query rejected for {}", project))?
            .json()
            .with_context(|| format!("GDC files response unreadable for {}", project))?;

        let mut files = Vec::with_capacity(response.data.hits.len());
        for hit in response.data.hits {
            let barcode = hit
                .associated_entities
                .first()
                .map(|e| e.entity_submitter_id.clone())
                .with_context(|| format!("file {} has no associated entity", hit.file_id))?;
            files.push((hit.file_id, barcode));
        }
        if files.is_empty() {
            bail!("GDC returned no STAR counts files for {}", project);
        }
        Ok(files)
    }

    /// Download one STAR counts file and return (gene symbols, unstranded
    /// counts) in file order.
    pub fn download_counts(&self, file_id: &str) -> Result<(Vec<String>, Vec<f64>)> {
        let url = format!("{}/data/{}", self.endpoint, file_id);
        let bytes = self
            .http
            .get(&url)
            .send()
            .with_context(|| format!("download failed for file {}", file_id))?
            .error_for_status()
            .with_context(|| format!("download rejected for file {}", file_id))?
            .bytes()
            .with_context(|| format!("download body unreadable for file {}", file_id))?;

        let text = decode_text(&bytes)
            .with_context(|| format!("counts file {} not decodable", file_id))?;
        parse_star_counts(&text).with_context(|| format!("counts file {} malformed", file_id))
    }

    /// Assemble the full count matrix for one project. Every file must list
    /// genes in the same order (GDC STAR outputs do).
    pub fn fetch_count_matrix(&self, project: &str) -> Result<CountMatrix> {
        let files = self.files_for_project(project)?;
        info!(project, n_files = files.len(), "gdc_files_listed");

        let mut genes: Option<Vec<String>> = None;
        let mut columns = Vec::with_capacity(files.len());
        for (file_id, barcode) in files {
            let (file_genes, counts) = self.download_counts(&file_id)?;
            match &genes {
                None => genes = Some(file_genes),
                Some(expected) => {
                    if *expected != file_genes {
                        bail!(
                            "file {} gene order differs from the first file of {}",
                            file_id,
                            project
                        );
                    }
                }
            }
            columns.push((barcode, counts));
        }

        let genes = genes.context("no files downloaded")?;
        CountMatrix::from_columns(genes, columns)
    }
}

fn decode_text(bytes: &[u8]) -> Result<String> {
    if bytes.starts_with(&[0x1f, 0x8b]) {
        let mut decoder = flate2::read::GzDecoder::new(bytes);
        let mut text = String::new();
        decoder.read_to_string(&mut text)?;
        Ok(text)
    } else {
        Ok(String::from_utf8(bytes.to_vec())?)
    }
}

/// STAR counts layout: comment lines, a `gene_id ...` header, four `N_*`
/// summary rows, then one row per gene with the unstranded count in column
/// four.
fn parse_star_counts(text: &str) -> Result<(Vec<String>, Vec<f64>)> {
    let mut genes = Vec::new();
    let mut counts = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim_end();
        if trimmed.is_empty()
            || trimmed.starts_with('#')
            || trimmed.starts_with("gene_id")
            || trimmed.starts_with("N_")
        {
            continue;
        }
        let fields: Vec<&str> = trimmed.split('\t').collect();
        if fields.len() < 4 {
            bail!("line {}: expected at least 4 columns", idx + 1);
        }
        let symbol = fields[1];
        let count: f64 = fields[3]
            .parse()
            .with_context(|| format!("line {}: non-numeric count '{}'", idx + 1, fields[3]))?;
        genes.push(symbol.to_string());
        counts.push(count);
    }
    if genes.is_empty() {
        bail!("no gene rows found");
    }
    Ok((genes, counts))
}
