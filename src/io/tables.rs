//! Flat-file readers and writers for the per-indication tables.
//!
//! The aggregate reporting stages consume these files rather than in-memory
//! state, so a `report` invocation over a finished output directory behaves
//! exactly like the tail of a `run`.

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::diffexp::{DeRecord, DeTable};
use crate::label::{LabeledGene, Regulation};

const DE_HEADER: &str = "gene\tbase_mean\tlog2_fold_change\tstatistic\tp_value\tfdr";
const LABELED_HEADER: &str = "gene\tlog2_fold_change\tfdr\tregulation\tenzyme_class\tgene_family";

pub fn write_de_table(path: &Path, table: &DeTable) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    writeln!(w, "{}", DE_HEADER)?;
    for r in &table.records {
        writeln!(
            w,
            "{}\t{:.4}\t{:.6}\t{:.6}\t{:.6e}\t{:.6e}",
            r.gene, r.base_mean, r.log2_fold_change, r.statistic, r.p_value, r.fdr
        )?;
    }
    Ok(())
}

pub fn read_de_table(path: &Path, project: &str) -> Result<DeTable> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let header = lines.next().context("empty DE table")??;
    if header != DE_HEADER {
        bail!("{}: unexpected DE table header", path.display());
    }

    let mut records = Vec::new();
    for (idx, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 6 {
            bail!("{}:{} expected 6 columns", path.display(), idx + 2);
        }
        records.push(DeRecord {
            gene: fields[0].to_string(),
            base_mean: parse_field(fields[1], path, idx)?,
            log2_fold_change: parse_field(fields[2], path, idx)?,
            statistic: parse_field(fields[3], path, idx)?,
            p_value: parse_field(fields[4], path, idx)?,
            fdr: parse_field(fields[5], path, idx)?,
        });
    }

    Ok(DeTable {
        project: project.to_string(),
        n_tumor: 0,
        n_normal: 0,
        records,
    })
}

pub fn write_labeled_table(path: &Path, labeled: &[LabeledGene]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    writeln!(w, "{}", LABELED_HEADER)?;
    for l in labeled {
        writeln!(
            w,
            "{}\t{:.6}\t{:.6e}\t{}\t{}\t{}",
            l.gene,
            l.log2_fold_change,
            l.fdr,
            l.regulation.as_str(),
            l.enzyme_class,
            l.gene_family
        )?;
    }
    Ok(())
}

pub fn read_labeled_table(path: &Path) -> Result<Vec<LabeledGene>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let header = lines.next().context("empty labeled table")??;
    if header != LABELED_HEADER {
        bail!("{}: unexpected labeled table header", path.display());
    }

    let mut labeled = Vec::new();
    for (idx, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != 6 {
            bail!("{}:{} expected 6 columns", path.display(), idx + 2);
        }
        let regulation = Regulation::parse(fields[3]).with_context(|| {
            format!("{}:{} unknown regulation '{}'", path.display(), idx + 2, fields[3])
        })?;
        labeled.push(LabeledGene {
            gene: fields[0].to_string(),
            log2_fold_change: parse_field(fields[1], path, idx)?,
            fdr: parse_field(fields[2], path, idx)?,
            regulation,
            enzyme_class: fields[4].to_string(),
            gene_family: fields[5].to_string(),
        });
    }
    Ok(labeled)
}

fn parse_field(s: &str, path: &Path, idx: usize) -> Result<f64> {
    s.parse()
        .with_context(|| format!("{}:{} non-numeric field '{}'", path.display(), idx + 2, s))
}
