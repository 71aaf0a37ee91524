//! GMT pathway-collection parsing.
//!
//! One set per line: name, description, then tab-separated member symbols.

use std::path::Path;

use anyhow::{bail, Context, Result};

#[derive(Debug, Clone)]
pub struct GeneSet {
    pub name: String,
    pub description: String,
    pub genes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct GmtCollection {
    pub name: String,
    pub sets: Vec<GeneSet>,
}

pub fn parse_gmt(content: &str, source: &str) -> Result<Vec<GeneSet>> {
    let mut sets = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim_end();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut parts = trimmed.split('\t');
        let name = parts.next().unwrap_or_default();
        let description = parts.next().unwrap_or_default();
        if name.is_empty() {
            bail!("{}:{} missing set name", source, line_no);
        }
        let genes: Vec<String> = parts
            .filter(|g| !g.is_empty())
            .map(|g| g.to_string())
            .collect();
        if genes.is_empty() {
            bail!("{}:{} set '{}' has no genes", source, line_no, name);
        }
        sets.push(GeneSet {
            name: name.to_string(),
            description: description.to_string(),
            genes,
        });
    }
    if sets.is_empty() {
        bail!("{}: no gene sets parsed", source);
    }
    Ok(sets)
}

pub fn load_gmt(path: &Path) -> Result<GmtCollection> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read GMT {}", path.display()))?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("collection")
        .to_string();
    Ok(GmtCollection {
        sets: parse_gmt(&content, &path.display().to_string())?,
        name: stem,
    })
}

/// The three built-in trimmed collections, in reporting order.
pub fn load_builtin_collections() -> Result<Vec<GmtCollection>> {
    let sources = [
        ("hallmark", include_str!("../../assets/genesets/hallmark.gmt")),
        (
            "kegg_legacy",
            include_str!("../../assets/genesets/kegg_legacy.gmt"),
        ),
        ("reactome", include_str!("../../assets/genesets/reactome.gmt")),
    ];
    let mut collections = Vec::with_capacity(sources.len());
    for (name, content) in sources {
        collections.push(GmtCollection {
            name: name.to_string(),
            sets: parse_gmt(content, name)?,
        });
    }
    Ok(collections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sets_in_order() {
        let sets = parse_gmt(
            "SET_A\tdesc\tG1\tG2\nSET_B\tdesc\tX1\tX2\tX3\n",
            "test",
        )
        .unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].name, "SET_A");
        assert_eq!(sets[0].genes, vec!["G1", "G2"]);
        assert_eq!(sets[1].genes.len(), 3);
    }

    #[test]
    fn empty_set_is_rejected() {
        assert!(parse_gmt("SET_A\tdesc\n", "test").is_err());
    }

    #[test]
    fn builtin_collections_parse() {
        let collections = load_builtin_collections().unwrap();
        assert_eq!(collections.len(), 3);
        assert_eq!(collections[0].name, "hallmark");
        assert_eq!(collections[1].name, "kegg_legacy");
        assert_eq!(collections[2].name, "reactome");
        for c in &collections {
            assert!(c.sets.len() >= 10, "{} too small", c.name);
        }
    }
}
