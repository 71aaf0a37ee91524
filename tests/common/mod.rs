use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Genes used by the synthetic cohorts: a mix of surface-protein panel
/// members and pathway filler so enrichment has sets to score.
pub const UP_GENES: &[&str] = &[
    "EGFR", "ERBB2", "ERBB3", "MET", "KIT", "PDGFRA", "FGFR2", "FGFR3", "IGF1R", "AXL", "EPHA2",
];
pub const DOWN_GENES: &[&str] = &[
    "VIM", "FN1", "MMP14", "ADAM12", "ITGB6", "ITGA11", "SPARC",
];
pub const FLAT_GENES: &[&str] = &[
    "MKI67", "BIRC5", "AURKA", "CCNB1", "CDK1", "MCM2", "PCNA", "MSLN", "CA9", "EPCAM", "MUC1",
    "CLDN18", "TACSTD2", "FOLR1", "KRAS", "BRAF", "MAPK1", "AKT1", "PIK3CA", "TP53", "MYC",
    "LDHA", "HK2", "PGK1", "STAT1", "IRF1", "TFRC", "STEAP1", "GPC3", "NECTIN4",
];

fn barcode(project_tag: &str, i: usize, tumor: bool) -> String {
    let sample_type = if tumor { "01A" } else { "11A" };
    format!("TCGA-{}-{:04}-{}-11R-A001-07", project_tag, i, sample_type)
}

/// Deterministic per-cell jitter so replicates differ without a RNG.
fn jitter(gene_idx: usize, sample_idx: usize) -> f64 {
    ((gene_idx * 31 + sample_idx * 17) % 7) as f64
}

/// Write `<project>.counts.tsv` with `n_tumor` tumor and `n_normal` normal
/// columns. Up genes run 4x higher in tumor, down genes 4x lower.
pub fn write_counts(dir: &Path, project: &str, n_tumor: usize, n_normal: usize) {
    let tag = project.rsplit('-').next().unwrap_or("XX").to_string();
    let mut genes: Vec<(&str, f64, f64)> = Vec::new();
    for (k, g) in UP_GENES.iter().enumerate() {
        let base = 80.0 + 10.0 * k as f64;
        genes.push((g, 4.0 * base, base));
    }
    for (k, g) in DOWN_GENES.iter().enumerate() {
        let base = 120.0 + 10.0 * k as f64;
        genes.push((g, base / 4.0, base));
    }
    for (k, g) in FLAT_GENES.iter().enumerate() {
        let base = 60.0 + 12.0 * k as f64;
        genes.push((g, base, base));
    }

    let mut out = String::from("gene");
    for i in 0..n_tumor {
        write!(out, "\t{}", barcode(&tag, i, true)).unwrap();
    }
    for i in 0..n_normal {
        write!(out, "\t{}", barcode(&tag, n_tumor + i, false)).unwrap();
    }
    out.push('\n');

    for (gi, (gene, tumor_mean, normal_mean)) in genes.iter().enumerate() {
        out.push_str(gene);
        for j in 0..n_tumor {
            write!(out, "\t{:.1}", tumor_mean + jitter(gi, j)).unwrap();
        }
        for j in 0..n_normal {
            write!(out, "\t{:.1}", normal_mean + jitter(gi, n_tumor + j)).unwrap();
        }
        out.push('\n');
    }

    fs::write(dir.join(format!("{}.counts.tsv", project)), out).unwrap();
}
