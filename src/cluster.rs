//! Hierarchical clustering for heatmap row/column ordering.
//!
//! Average linkage over Euclidean distances. Inputs are small (the GESP
//! panel by the indication list), so the quadratic distance matrix and the
//! cubic merge loop are fine.

/// Dendrogram leaf order for the given observations. Missing values must be
/// imputed by the caller before clustering.
pub fn leaf_order(observations: &[Vec<f64>]) -> Vec<usize> {
    let n = observations.len();
    if n <= 2 {
        return (0..n).collect();
    }

    let dist = distance_matrix(observations);

    // Active clusters, each carrying its member leaves in dendrogram order.
    let mut clusters: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();
    let mut active: Vec<bool> = vec![true; n];
    let mut merged = clusters.len();

    while merged > 1 {
        let mut best = (0usize, 0usize, f64::INFINITY);
        for a in 0..clusters.len() {
            if !active[a] {
                continue;
            }
            for b in (a + 1)..clusters.len() {
                if !active[b] {
                    continue;
                }
                let d = average_linkage(&clusters[a], &clusters[b], &dist, n);
                if d < best.2 {
                    best = (a, b, d);
                }
            }
        }
        let (a, b, _) = best;
        let mut joined = std::mem::take(&mut clusters[a]);
        joined.append(&mut clusters[b]);
        active[b] = false;
        clusters[a] = joined;
        merged -= 1;
    }

    clusters
        .into_iter()
        .zip(active)
        .find(|(_, alive)| *alive)
        .map(|(members, _)| members)
        .unwrap_or_else(|| (0..n).collect())
}

fn distance_matrix(observations: &[Vec<f64>]) -> Vec<f64> {
    let n = observations.len();
    let mut dist = vec![0.0; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = euclidean(&observations[i], &observations[j]);
            dist[i * n + j] = d;
            dist[j * n + i] = d;
        }
    }
    dist
}

fn average_linkage(a: &[usize], b: &[usize], dist: &[f64], n: usize) -> f64 {
    let mut sum = 0.0;
    for &i in a {
        for &j in b {
            sum += dist[i * n + j];
        }
    }
    sum / (a.len() * b.len()) as f64
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivial_sizes_pass_through() {
        assert!(leaf_order(&[]).is_empty());
        assert_eq!(leaf_order(&[vec![1.0]]), vec![0]);
        assert_eq!(leaf_order(&[vec![1.0], vec![2.0]]), vec![0, 1]);
    }

    #[test]
    fn order_is_a_permutation() {
        let rows = vec![
            vec![0.0, 0.1],
            vec![5.0, 5.2],
            vec![0.2, 0.0],
            vec![5.1, 4.9],
            vec![10.0, 10.0],
        ];
        let mut order = leaf_order(&rows);
        assert_eq!(order.len(), 5);
        order.sort_unstable();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn near_neighbors_end_up_adjacent() {
        let rows = vec![
            vec![0.0, 0.0],
            vec![10.0, 10.0],
            vec![0.1, 0.1],
            vec![10.1, 9.9],
        ];
        let order = leaf_order(&rows);
        let pos = |i: usize| order.iter().position(|&x| x == i).unwrap();
        assert_eq!(pos(0).abs_diff(pos(2)), 1);
        assert_eq!(pos(1).abs_diff(pos(3)), 1);
    }
}
