//! Library-size normalization and expression filtering.
//!
//! Median-of-ratios size factors in the DESeq style: each sample's factor is
//! the median ratio of its counts to the per-gene geometric mean, computed
//! over genes expressed in every sample.

use anyhow::{bail, Result};

use crate::expr::CountMatrix;

pub fn size_factors(counts: &CountMatrix) -> Result<Vec<f64>> {
    let n_genes = counts.n_genes();
    let n_samples = counts.n_samples();
    if n_genes == 0 || n_samples == 0 {
        bail!("cannot compute size factors for an empty matrix");
    }

    // log geometric mean per gene, over all-positive genes only
    let mut log_means = vec![f64::NAN; n_genes];
    for i in 0..n_genes {
        let row = counts.row(i);
        if row.iter().all(|&v| v > 0.0) {
            log_means[i] = row.iter().map(|v| v.ln()).sum::<f64>() / n_samples as f64;
        }
    }

    let mut factors = Vec::with_capacity(n_samples);
    for j in 0..n_samples {
        let mut ratios: Vec<f64> = (0..n_genes)
            .filter(|&i| log_means[i].is_finite())
            .map(|i| counts.get(i, j).ln() - log_means[i])
            .collect();
        if ratios.is_empty() {
            bail!("no gene is expressed in every sample; cannot normalize");
        }
        ratios.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let mid = ratios.len() / 2;
        let median = if ratios.len() % 2 == 1 {
            ratios[mid]
        } else {
            (ratios[mid - 1] + ratios[mid]) / 2.0
        };
        factors.push(median.exp());
    }
    Ok(factors)
}

/// Divide each sample column by its size factor.
pub fn normalize(counts: &CountMatrix, factors: &[f64]) -> Result<CountMatrix> {
    let n_samples = counts.n_samples();
    if factors.len() != n_samples {
        bail!(
            "{} size factors for {} samples",
            factors.len(),
            n_samples
        );
    }
    if factors.iter().any(|&f| !(f > 0.0)) {
        bail!("non-positive size factor");
    }
    let mut data = Vec::with_capacity(counts.n_genes() * n_samples);
    for i in 0..counts.n_genes() {
        let row = counts.row(i);
        for (j, v) in row.iter().enumerate() {
            data.push(v / factors[j]);
        }
    }
    CountMatrix::new(counts.genes.clone(), counts.samples.clone(), data)
}

/// Drop genes whose mean normalized count falls below the given quantile of
/// all per-gene means. Returns the filtered matrix and the number of genes
/// removed.
pub fn filter_by_quantile(counts: &CountMatrix, quantile: f64) -> Result<(CountMatrix, usize)> {
    if !(0.0..1.0).contains(&quantile) {
        bail!("filter quantile must be in [0, 1), got {}", quantile);
    }
    let n_genes = counts.n_genes();
    let n_samples = counts.n_samples() as f64;
    let means: Vec<f64> = (0..n_genes)
        .map(|i| counts.row(i).iter().sum::<f64>() / n_samples)
        .collect();

    let mut sorted = means.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let cut_idx = ((sorted.len() as f64) * quantile).floor() as usize;
    let cut = sorted[cut_idx.min(sorted.len() - 1)];

    let keep: Vec<usize> = (0..n_genes).filter(|&i| means[i] > cut).collect();
    if keep.is_empty() {
        bail!("quantile filter removed every gene");
    }
    let removed = n_genes - keep.len();
    Ok((counts.subset_genes(&keep), removed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn proportional() -> CountMatrix {
        // Sample 2 is exactly double sample 1; sample 3 is half.
        CountMatrix::new(
            vec!["G1".into(), "G2".into(), "G3".into()],
            vec!["S1".into(), "S2".into(), "S3".into()],
            vec![
                10.0, 20.0, 5.0, //
                40.0, 80.0, 20.0, //
                100.0, 200.0, 50.0,
            ],
        )
        .unwrap()
    }

    #[test]
    fn size_factors_track_library_scale() {
        let m = proportional();
        let sf = size_factors(&m).unwrap();
        assert_relative_eq!(sf[1] / sf[0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(sf[2] / sf[0], 0.5, epsilon = 1e-9);
    }

    #[test]
    fn normalization_equalizes_proportional_libraries() {
        let m = proportional();
        let sf = size_factors(&m).unwrap();
        let n = normalize(&m, &sf).unwrap();
        for i in 0..n.n_genes() {
            let row = n.row(i);
            assert_relative_eq!(row[0], row[1], epsilon = 1e-9);
            assert_relative_eq!(row[0], row[2], epsilon = 1e-9);
        }
    }

    #[test]
    fn quantile_filter_drops_low_tail() {
        let m = CountMatrix::new(
            vec!["LO".into(), "MID".into(), "HI".into(), "TOP".into()],
            vec!["S1".into(), "S2".into()],
            vec![
                0.0, 1.0, //
                10.0, 10.0, //
                50.0, 50.0, //
                90.0, 110.0,
            ],
        )
        .unwrap();
        let (filtered, removed) = filter_by_quantile(&m, 0.25).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(
            filtered.genes,
            vec!["MID".to_string(), "HI".to_string(), "TOP".to_string()]
        );
    }

    #[test]
    fn quantile_filter_rejects_bad_quantile() {
        let m = proportional();
        assert!(filter_by_quantile(&m, 1.0).is_err());
    }
}
