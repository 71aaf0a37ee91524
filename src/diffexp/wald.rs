//! Negative-binomial Wald test, tumor vs normal.
//!
//! Per-gene method-of-moments dispersion with a delta-method standard error
//! on the log2 fold-change. Counts are expected to be size-factor normalized
//! before calling in here.

use anyhow::{bail, Result};
use rayon::prelude::*;
use statrs::distribution::{ContinuousCDF, Normal};

use crate::diffexp::fdr::benjamini_hochberg;
use crate::diffexp::{DeRecord, DeTable};
use crate::expr::CountMatrix;

const PSEUDOCOUNT: f64 = 0.5;

pub fn nb_wald(
    project: &str,
    normed: &CountMatrix,
    tumor_idx: &[usize],
    normal_idx: &[usize],
) -> Result<DeTable> {
    if tumor_idx.len() < 2 || normal_idx.len() < 2 {
        bail!(
            "{}: need at least 2 samples per group, got {} tumor / {} normal",
            project,
            tumor_idx.len(),
            normal_idx.len()
        );
    }
    let n_samples = normed.n_samples();
    for &j in tumor_idx.iter().chain(normal_idx.iter()) {
        if j >= n_samples {
            bail!("{}: sample index {} out of range", project, j);
        }
    }

    let normal =
        Normal::new(0.0, 1.0).map_err(|e| anyhow::anyhow!("unit normal unavailable: {}", e))?;
    let mut records: Vec<DeRecord> = (0..normed.n_genes())
        .into_par_iter()
        .map(|i| test_gene(normed, i, tumor_idx, normal_idx, &normal))
        .collect();

    let raw_p: Vec<f64> = records.iter().map(|r| r.p_value).collect();
    let q = benjamini_hochberg(&raw_p);
    for (r, q) in records.iter_mut().zip(q) {
        r.fdr = q;
    }

    Ok(DeTable {
        project: project.to_string(),
        n_tumor: tumor_idx.len(),
        n_normal: normal_idx.len(),
        records,
    })
}

fn test_gene(
    normed: &CountMatrix,
    gene: usize,
    tumor_idx: &[usize],
    normal_idx: &[usize],
    unit: &Normal,
) -> DeRecord {
    let row = normed.row(gene);
    let n_samples = row.len() as f64;

    let mu_t: f64 = tumor_idx.iter().map(|&j| row[j]).sum::<f64>() / tumor_idx.len() as f64;
    let mu_n: f64 = normal_idx.iter().map(|&j| row[j]).sum::<f64>() / normal_idx.len() as f64;
    let base_mean = row.iter().sum::<f64>() / n_samples;

    let log2fc = ((mu_t + PSEUDOCOUNT) / (mu_n + PSEUDOCOUNT)).log2();

    let variance = if row.len() > 1 {
        row.iter().map(|&x| (x - base_mean).powi(2)).sum::<f64>() / (n_samples - 1.0)
    } else {
        0.0
    };
    // NB dispersion by method of moments: alpha = (var - mu) / mu^2
    let alpha = if base_mean > 0.0 {
        ((variance - base_mean) / (base_mean * base_mean)).clamp(1e-8, 1e8)
    } else {
        1e-8
    };

    // Var(X) = mu + alpha * mu^2; SE of log2FC by the delta method.
    let var_t = mu_t + alpha * mu_t * mu_t;
    let var_n = mu_n + alpha * mu_n * mu_n;
    let se_t = (var_t / tumor_idx.len() as f64).sqrt();
    let se_n = (var_n / normal_idx.len() as f64).sqrt();
    let se_log2fc = ((se_t / (mu_t + PSEUDOCOUNT)).powi(2) + (se_n / (mu_n + PSEUDOCOUNT)).powi(2))
        .sqrt()
        / std::f64::consts::LN_2;

    let (statistic, p_value) = if se_log2fc > 1e-15 {
        let z = log2fc / se_log2fc;
        let p = 2.0 * (1.0 - unit.cdf(z.abs()));
        (z, p.min(1.0))
    } else {
        (0.0, 1.0)
    };

    DeRecord {
        gene: normed.genes[gene].clone(),
        base_mean,
        log2_fold_change: log2fc,
        statistic,
        p_value,
        fdr: 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4 genes x 8 samples (4 normal then 4 tumor): one up, one down, two flat.
    fn fixture() -> (CountMatrix, Vec<usize>, Vec<usize>) {
        let m = CountMatrix::new(
            vec!["UP".into(), "DOWN".into(), "FLAT1".into(), "FLAT2".into()],
            (0..8).map(|i| format!("S{}", i)).collect(),
            vec![
                10.0, 12.0, 11.0, 9.0, 210.0, 195.0, 205.0, 190.0, //
                200.0, 190.0, 210.0, 205.0, 10.0, 12.0, 9.0, 11.0, //
                100.0, 103.0, 97.0, 99.0, 101.0, 98.0, 102.0, 100.0, //
                50.0, 52.0, 48.0, 49.0, 51.0, 50.0, 49.0, 50.0,
            ],
        )
        .unwrap();
        let normal = vec![0, 1, 2, 3];
        let tumor = vec![4, 5, 6, 7];
        (m, tumor, normal)
    }

    #[test]
    fn detects_direction() {
        let (m, tumor, normal) = fixture();
        let table = nb_wald("TCGA-TEST", &m, &tumor, &normal).unwrap();
        let up = table.records.iter().find(|r| r.gene == "UP").unwrap();
        let down = table.records.iter().find(|r| r.gene == "DOWN").unwrap();
        assert!(up.log2_fold_change > 2.0, "log2fc={}", up.log2_fold_change);
        assert!(
            down.log2_fold_change < -2.0,
            "log2fc={}",
            down.log2_fold_change
        );
        assert!(up.p_value < 0.05);
        assert!(down.p_value < 0.05);
    }

    #[test]
    fn flat_genes_stay_insignificant() {
        let (m, tumor, normal) = fixture();
        let table = nb_wald("TCGA-TEST", &m, &tumor, &normal).unwrap();
        for gene in ["FLAT1", "FLAT2"] {
            let r = table.records.iter().find(|r| r.gene == gene).unwrap();
            assert!(r.p_value > 0.05, "{} p={}", gene, r.p_value);
        }
    }

    #[test]
    fn fdr_filled_and_bounded() {
        let (m, tumor, normal) = fixture();
        let table = nb_wald("TCGA-TEST", &m, &tumor, &normal).unwrap();
        for r in &table.records {
            assert!(r.fdr >= r.p_value - 1e-12);
            assert!(r.fdr <= 1.0);
        }
    }

    #[test]
    fn tiny_groups_are_rejected() {
        let (m, tumor, _) = fixture();
        assert!(nb_wald("TCGA-TEST", &m, &tumor, &[0]).is_err());
    }
}
