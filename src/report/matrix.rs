//! The cross-indication fold-change matrix.
//!
//! Genes by projects, one log2 fold-change or explicit NA per cell. Built by
//! reshaping the concatenation of the per-indication labeled tables; long
//! and wide forms round-trip.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::label::LabeledGene;

const NA: &str = "NA";

#[derive(Debug, Clone, PartialEq)]
pub struct LongRecord {
    pub gene: String,
    pub project: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FoldChangeMatrix {
    pub genes: Vec<String>,
    pub projects: Vec<String>,
    values: Vec<Option<f64>>,
}

impl FoldChangeMatrix {
    pub fn get(&self, gene: usize, project: usize) -> Option<f64> {
        self.values[gene * self.projects.len() + project]
    }

    pub fn n_genes(&self) -> usize {
        self.genes.len()
    }

    pub fn n_projects(&self) -> usize {
        self.projects.len()
    }

    /// Gene rows with NA imputed to zero, for distance computations.
    pub fn imputed_rows(&self) -> Vec<Vec<f64>> {
        (0..self.genes.len())
            .map(|i| {
                (0..self.projects.len())
                    .map(|j| self.get(i, j).unwrap_or(0.0))
                    .collect()
            })
            .collect()
    }

    /// Project columns with NA imputed to zero.
    pub fn imputed_cols(&self) -> Vec<Vec<f64>> {
        (0..self.projects.len())
            .map(|j| {
                (0..self.genes.len())
                    .map(|i| self.get(i, j).unwrap_or(0.0))
                    .collect()
            })
            .collect()
    }

    /// Assemble from per-indication labeled tables. Gene order is the sorted
    /// union; a gene appearing twice in one table is a data error.
    pub fn from_labeled(tables: &[(String, Vec<LabeledGene>)]) -> Result<Self> {
        let mut gene_union: Vec<String> = Vec::new();
        {
            let mut seen = HashMap::new();
            for (_, rows) in tables {
                for r in rows {
                    if seen.insert(r.gene.clone(), ()).is_none() {
                        gene_union.push(r.gene.clone());
                    }
                }
            }
        }
        gene_union.sort();
        let gene_pos: HashMap<&str, usize> = gene_union
            .iter()
            .enumerate()
            .map(|(i, g)| (g.as_str(), i))
            .collect();

        let projects: Vec<String> = tables.iter().map(|(p, _)| p.clone()).collect();
        let mut values = vec![None; gene_union.len() * projects.len()];
        for (j, (project, rows)) in tables.iter().enumerate() {
            for r in rows {
                let i = gene_pos[r.gene.as_str()];
                let slot = &mut values[i * projects.len() + j];
                if slot.is_some() {
                    bail!("{}: gene {} appears twice", project, r.gene);
                }
                *slot = Some(r.log2_fold_change);
            }
        }

        Ok(Self {
            genes: gene_union,
            projects,
            values,
        })
    }

    pub fn to_long(&self) -> Vec<LongRecord> {
        let mut records = Vec::with_capacity(self.genes.len() * self.projects.len());
        for (i, gene) in self.genes.iter().enumerate() {
            for (j, project) in self.projects.iter().enumerate() {
                records.push(LongRecord {
                    gene: gene.clone(),
                    project: project.clone(),
                    value: self.get(i, j),
                });
            }
        }
        records
    }

    /// Rebuild the wide form from long records. Requires exactly one record
    /// per gene-project pair.
    pub fn from_long(records: &[LongRecord]) -> Result<Self> {
        let mut genes = Vec::new();
        let mut projects = Vec::new();
        let mut gene_pos = HashMap::new();
        let mut project_pos = HashMap::new();
        for r in records {
            if !gene_pos.contains_key(&r.gene) {
                gene_pos.insert(r.gene.clone(), genes.len());
                genes.push(r.gene.clone());
            }
            if !project_pos.contains_key(&r.project) {
                project_pos.insert(r.project.clone(), projects.len());
                projects.push(r.project.clone());
            }
        }

        let mut values = vec![None; genes.len() * projects.len()];
        let mut filled = vec![false; values.len()];
        for r in records {
            let idx = gene_pos[&r.gene] * projects.len() + project_pos[&r.project];
            if filled[idx] {
                bail!("duplicate cell for {} / {}", r.gene, r.project);
            }
            filled[idx] = true;
            values[idx] = r.value;
        }
        if filled.iter().any(|f| !f) {
            bail!("long records do not cover every gene-project pair");
        }

        Ok(Self {
            genes,
            projects,
            values,
        })
    }

    pub fn write_tsv(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let mut w = BufWriter::new(file);
        write!(w, "gene")?;
        for p in &self.projects {
            write!(w, "\t{}", p)?;
        }
        writeln!(w)?;
        for (i, gene) in self.genes.iter().enumerate() {
            write!(w, "{}", gene)?;
            for j in 0..self.projects.len() {
                match self.get(i, j) {
                    Some(v) => write!(w, "\t{:.6}", v)?,
                    None => write!(w, "\t{}", NA)?,
                }
            }
            writeln!(w)?;
        }
        Ok(())
    }

    pub fn read_tsv(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let header = lines.next().context("empty matrix file")??;
        let mut fields = header.trim_end().split('\t');
        if fields.next() != Some("gene") {
            bail!("{}: unexpected matrix header", path.display());
        }
        let projects: Vec<String> = fields.map(|s| s.to_string()).collect();
        if projects.is_empty() {
            bail!("{}: matrix has no project columns", path.display());
        }

        let mut genes = Vec::new();
        let mut values = Vec::new();
        for (idx, line) in lines.enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.trim_end().split('\t').collect();
            if fields.len() != projects.len() + 1 {
                bail!("{}:{} wrong column count", path.display(), idx + 2);
            }
            genes.push(fields[0].to_string());
            for f in &fields[1..] {
                if *f == NA {
                    values.push(None);
                } else {
                    let v: f64 = f.parse().with_context(|| {
                        format!("{}:{} non-numeric cell '{}'", path.display(), idx + 2, f)
                    })?;
                    values.push(Some(v));
                }
            }
        }

        Ok(Self {
            genes,
            projects,
            values,
        })
    }
}
