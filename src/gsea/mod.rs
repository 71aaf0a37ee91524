//! Preranked gene-set enrichment.
//!
//! Weighted Kolmogorov-Smirnov running score over a fold-change ranking,
//! with a gene-permutation null and sign-matched normalization (NES).

use std::collections::HashSet;

use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::diffexp::DeTable;
use crate::geneset::gmt::GmtCollection;

pub const MIN_SET_SIZE: usize = 5;

/// Genes sorted by descending ranking metric (log2 fold-change).
#[derive(Debug, Clone)]
pub struct RankedList {
    pub genes: Vec<String>,
    pub scores: Vec<f64>,
}

impl RankedList {
    pub fn from_de_table(table: &DeTable) -> Self {
        let mut pairs: Vec<(String, f64)> = table
            .records
            .iter()
            .map(|r| (r.gene.clone(), r.log2_fold_change))
            .collect();
        pairs.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        let (genes, scores) = pairs.into_iter().unzip();
        Self { genes, scores }
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct EnrichmentResult {
    pub set_name: String,
    /// Member genes present in the ranking.
    pub size: usize,
    pub es: f64,
    pub nes: f64,
    pub p_value: f64,
}

/// Score every set of one collection against a ranking. Results are sorted
/// by descending NES. Sets with fewer than [`MIN_SET_SIZE`] matched genes
/// are dropped.
pub fn run_collection(
    ranked: &RankedList,
    collection: &GmtCollection,
    permutations: usize,
    seed: u64,
) -> Result<Vec<EnrichmentResult>> {
    if ranked.is_empty() {
        bail!("empty ranking for collection {}", collection.name);
    }
    if permutations == 0 {
        bail!("permutations must be positive");
    }

    let mut results: Vec<EnrichmentResult> = collection
        .sets
        .par_iter()
        .enumerate()
        .filter_map(|(set_idx, set)| {
            let members: HashSet<&str> = set.genes.iter().map(|g| g.as_str()).collect();
            let hits: Vec<usize> = ranked
                .genes
                .iter()
                .enumerate()
                .filter(|(_, g)| members.contains(g.as_str()))
                .map(|(i, _)| i)
                .collect();
            if hits.len() < MIN_SET_SIZE {
                return None;
            }
            // Each set gets its own deterministic stream so rayon ordering
            // cannot change the results.
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(set_idx as u64));
            Some(score_set(ranked, &set.name, &hits, permutations, &mut rng))
        })
        .collect();

    results.sort_by(|a, b| b.nes.partial_cmp(&a.nes).unwrap_or(std::cmp::Ordering::Equal));
    Ok(results)
}

fn score_set(
    ranked: &RankedList,
    name: &str,
    hits: &[usize],
    permutations: usize,
    rng: &mut StdRng,
) -> EnrichmentResult {
    let es = enrichment_score(&ranked.scores, hits);

    let n = ranked.len();
    let mut same_sign = Vec::with_capacity(permutations);
    for _ in 0..permutations {
        let mut perm = rand::seq::index::sample(rng, n, hits.len()).into_vec();
        perm.sort_unstable();
        let null_es = enrichment_score(&ranked.scores, &perm);
        if null_es.signum() == es.signum() {
            same_sign.push(null_es.abs());
        }
    }

    let (nes, p_value) = if same_sign.is_empty() {
        (0.0, 1.0)
    } else {
        let mean_null: f64 = same_sign.iter().sum::<f64>() / same_sign.len() as f64;
        let nes = if mean_null > 0.0 { es / mean_null } else { 0.0 };
        let exceed = same_sign.iter().filter(|&&v| v >= es.abs()).count();
        let p = (exceed + 1) as f64 / (same_sign.len() + 1) as f64;
        (nes, p)
    };

    EnrichmentResult {
        set_name: name.to_string(),
        size: hits.len(),
        es,
        nes,
        p_value,
    }
}

/// Signed maximum deviation of the weighted running sum. `hits` must be
/// sorted ascending.
fn enrichment_score(scores: &[f64], hits: &[usize]) -> f64 {
    let n = scores.len();
    let n_hits = hits.len();
    if n_hits == 0 || n_hits >= n {
        return 0.0;
    }

    let weight_total: f64 = hits.iter().map(|&i| scores[i].abs()).sum();
    let miss_step = 1.0 / (n - n_hits) as f64;

    let mut running = 0.0;
    let mut best: f64 = 0.0;
    let mut hit_cursor = 0;
    for i in 0..n {
        if hit_cursor < n_hits && hits[hit_cursor] == i {
            running += if weight_total > 0.0 {
                scores[i].abs() / weight_total
            } else {
                1.0 / n_hits as f64
            };
            hit_cursor += 1;
        } else {
            running -= miss_step;
        }
        if running.abs() > best.abs() {
            best = running;
        }
    }
    best
}
