pub mod normalize;

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use anyhow::{bail, Context, Result};

/// Dense genes × samples count matrix for one indication.
///
/// Values are stored row-major; TCGA cohorts stay small enough (tens of
/// thousands of genes, hundreds of samples) that sparsity is not worth the
/// indexing overhead here.
#[derive(Debug, Clone)]
pub struct CountMatrix {
    pub genes: Vec<String>,
    pub samples: Vec<String>,
    data: Vec<f64>,
}

impl CountMatrix {
    pub fn new(genes: Vec<String>, samples: Vec<String>, data: Vec<f64>) -> Result<Self> {
        if data.len() != genes.len() * samples.len() {
            bail!(
                "count matrix size mismatch: {} values for {} genes x {} samples",
                data.len(),
                genes.len(),
                samples.len()
            );
        }
        Ok(Self {
            genes,
            samples,
            data,
        })
    }

    /// Assemble a matrix from per-sample count columns. Every column must
    /// cover the same genes in the same order.
    pub fn from_columns(genes: Vec<String>, columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
        let n_genes = genes.len();
        let n_samples = columns.len();
        let mut samples = Vec::with_capacity(n_samples);
        let mut data = vec![0.0; n_genes * n_samples];
        for (j, (barcode, counts)) in columns.into_iter().enumerate() {
            if counts.len() != n_genes {
                bail!(
                    "sample {} has {} genes, expected {}",
                    barcode,
                    counts.len(),
                    n_genes
                );
            }
            for (i, v) in counts.into_iter().enumerate() {
                data[i * n_samples + j] = v;
            }
            samples.push(barcode);
        }
        Ok(Self {
            genes,
            samples,
            data,
        })
    }

    pub fn n_genes(&self) -> usize {
        self.genes.len()
    }

    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn get(&self, gene: usize, sample: usize) -> f64 {
        self.data[gene * self.n_samples() + sample]
    }

    pub fn row(&self, gene: usize) -> &[f64] {
        let n = self.n_samples();
        &self.data[gene * n..(gene + 1) * n]
    }

    pub fn col_sums(&self) -> Vec<f64> {
        let n_samples = self.n_samples();
        let mut sums = vec![0.0; n_samples];
        for i in 0..self.n_genes() {
            let row = self.row(i);
            for (j, v) in row.iter().enumerate() {
                sums[j] += v;
            }
        }
        sums
    }

    /// First-win index of gene symbol to row. Duplicate symbols are reported
    /// so the caller can surface them as warnings.
    pub fn gene_index(&self) -> (HashMap<String, usize>, Vec<String>) {
        let mut index = HashMap::new();
        let mut warnings = Vec::new();
        for (i, symbol) in self.genes.iter().enumerate() {
            if let Some(first) = index.get(symbol) {
                warnings.push(format!(
                    "duplicate gene symbol '{}' at row {} (kept first at row {})",
                    symbol,
                    i + 1,
                    first + 1
                ));
            } else {
                index.insert(symbol.clone(), i);
            }
        }
        (index, warnings)
    }

    /// Keep only the given gene rows, in the given order.
    pub fn subset_genes(&self, keep: &[usize]) -> CountMatrix {
        let n_samples = self.n_samples();
        let mut genes = Vec::with_capacity(keep.len());
        let mut data = Vec::with_capacity(keep.len() * n_samples);
        for &i in keep {
            genes.push(self.genes[i].clone());
            data.extend_from_slice(self.row(i));
        }
        CountMatrix {
            genes,
            samples: self.samples.clone(),
            data,
        }
    }

    /// Read a counts TSV: first column gene symbols, first row sample
    /// barcodes. Gzip input is handled transparently.
    pub fn from_tsv(path: &Path) -> Result<Self> {
        let reader = crate::io::open_maybe_gz(path)
            .with_context(|| format!("failed to open counts file {}", path.display()))?;
        let reader = std::io::BufReader::new(reader);
        let mut lines = reader.lines();

        let header = lines
            .next()
            .context("empty counts file")?
            .context("failed to read counts header")?;
        let samples: Vec<String> = header
            .trim_end()
            .split('\t')
            .skip(1)
            .map(|s| s.to_string())
            .collect();
        if samples.is_empty() {
            bail!("counts file {} has no sample columns", path.display());
        }

        let mut genes = Vec::new();
        let mut data = Vec::new();
        for (idx, line) in lines.enumerate() {
            let line = line?;
            let trimmed = line.trim_end();
            if trimmed.is_empty() {
                continue;
            }
            let mut fields = trimmed.split('\t');
            let symbol = fields.next().unwrap_or_default();
            if symbol.is_empty() {
                bail!("{}:{} missing gene symbol", path.display(), idx + 2);
            }
            genes.push(symbol.to_string());
            let mut n = 0usize;
            for f in fields {
                let v: f64 = f.parse().with_context(|| {
                    format!("{}:{} non-numeric count '{}'", path.display(), idx + 2, f)
                })?;
                data.push(v);
                n += 1;
            }
            if n != samples.len() {
                bail!(
                    "{}:{} has {} counts, expected {}",
                    path.display(),
                    idx + 2,
                    n,
                    samples.len()
                );
            }
        }

        CountMatrix::new(genes, samples, data)
    }
}
