pub mod gmt;

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};

/// One row of the curated GESP reference list.
#[derive(Debug, Clone)]
pub struct GespEntry {
    pub symbol: String,
    pub surface: bool,
    pub enzyme_class: String,
    pub gene_family: String,
}

/// The curated surface-protein gene list, loaded once per run and never
/// mutated.
#[derive(Debug, Clone)]
pub struct GespList {
    pub version: String,
    pub entries: Vec<GespEntry>,
    index: HashMap<String, usize>,
}

impl GespList {
    pub fn get(&self, symbol: &str) -> Option<&GespEntry> {
        self.index.get(symbol).map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn n_surface(&self) -> usize {
        self.entries.iter().filter(|e| e.surface).count()
    }
}

pub fn load_builtin() -> Result<GespList> {
    let content = include_str!("../../assets/gesp_v1.tsv");
    parse_gesp_tsv(content, "built-in v1")
}

pub fn load_tsv(path: &Path) -> Result<GespList> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read GESP TSV {}", path.display()))?;
    parse_gesp_tsv(&content, &path.display().to_string())
}

fn parse_gesp_tsv(content: &str, source: &str) -> Result<GespList> {
    let mut entries = Vec::new();
    let mut index = HashMap::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = trimmed.split('\t').collect();
        if parts.len() != 4 {
            bail!("{}:{} malformed TSV (expected 4 columns)", source, line_no);
        }
        let symbol = parts[0].trim();
        if symbol.is_empty() {
            bail!("{}:{} empty gene symbol", source, line_no);
        }
        let surface = match parts[1].trim() {
            "yes" => true,
            "no" => false,
            other => bail!(
                "{}:{} surface flag must be yes/no, got '{}'",
                source,
                line_no,
                other
            ),
        };
        if index.contains_key(symbol) {
            bail!("{}:{} duplicate gene symbol '{}'", source, line_no, symbol);
        }
        index.insert(symbol.to_string(), entries.len());
        entries.push(GespEntry {
            symbol: symbol.to_string(),
            surface,
            enzyme_class: parts[2].trim().to_string(),
            gene_family: parts[3].trim().to_string(),
        });
    }

    if entries.is_empty() {
        bail!("{}: no GESP entries parsed", source);
    }

    Ok(GespList {
        version: "v1".to_string(),
        entries,
        index,
    })
}

/// The fixed indication list the profiling loop walks.
pub fn builtin_projects() -> Vec<String> {
    include_str!("../../assets/tcga_projects.tsv")
        .lines()
        .filter(|l| !l.trim().is_empty() && !l.starts_with('#'))
        .filter_map(|l| l.split('\t').next())
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_list_parses() {
        let list = load_builtin().unwrap();
        assert!(list.len() > 50);
        assert!(list.n_surface() < list.len());
        let egfr = list.get("EGFR").unwrap();
        assert!(egfr.surface);
        assert_eq!(egfr.enzyme_class, "kinase");
    }

    #[test]
    fn builtin_projects_are_tcga_codes() {
        let projects = builtin_projects();
        assert!(projects.len() >= 10);
        assert!(projects.iter().all(|p| p.starts_with("TCGA-")));
    }

    #[test]
    fn malformed_rows_are_rejected() {
        assert!(parse_gesp_tsv("EGFR\tyes\tkinase\n", "t").is_err());
        assert!(parse_gesp_tsv("EGFR\tmaybe\tkinase\trtk\n", "t").is_err());
        assert!(
            parse_gesp_tsv("EGFR\tyes\tkinase\trtk\nEGFR\tyes\tkinase\trtk\n", "t").is_err()
        );
    }
}
