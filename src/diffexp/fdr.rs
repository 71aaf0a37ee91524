//! Benjamini-Hochberg false discovery rate correction.

/// Adjusted p-values in the input order. q[i] = min over ranks >= rank(i) of
/// p * n / rank, capped at 1.
pub fn benjamini_hochberg(p_values: &[f64]) -> Vec<f64> {
    let n = p_values.len();
    if n == 0 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        p_values[a]
            .partial_cmp(&p_values[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let n_f = n as f64;
    let mut q_sorted = vec![0.0; n];
    q_sorted[n - 1] = p_values[order[n - 1]].min(1.0);
    for i in (0..n - 1).rev() {
        let rank = (i + 1) as f64;
        let adjusted = p_values[order[i]] * n_f / rank;
        q_sorted[i] = adjusted.min(q_sorted[i + 1]).min(1.0);
    }

    let mut q = vec![0.0; n];
    for (i, &orig) in order.iter().enumerate() {
        q[orig] = q_sorted[i];
    }
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn known_values() {
        // p = [0.005, 0.01, 0.02, 0.04, 0.1], n = 5
        let q = benjamini_hochberg(&[0.005, 0.01, 0.02, 0.04, 0.1]);
        assert_relative_eq!(q[0], 0.025, epsilon = 1e-12);
        assert_relative_eq!(q[1], 0.025, epsilon = 1e-12);
        assert_relative_eq!(q[2], 1.0 / 30.0, epsilon = 1e-12);
        assert_relative_eq!(q[3], 0.05, epsilon = 1e-12);
        assert_relative_eq!(q[4], 0.1, epsilon = 1e-12);
    }

    #[test]
    fn unsorted_input_restores_order() {
        let q = benjamini_hochberg(&[0.04, 0.005, 0.1]);
        assert_relative_eq!(q[1], 0.015, epsilon = 1e-12);
        assert!(q[0] >= q[1]);
        assert_relative_eq!(q[2], 0.1, epsilon = 1e-12);
    }

    #[test]
    fn bounded_by_one() {
        let q = benjamini_hochberg(&[0.5, 0.9, 0.99]);
        assert!(q.iter().all(|&v| v <= 1.0));
    }

    #[test]
    fn empty_is_empty() {
        assert!(benjamini_hochberg(&[]).is_empty());
    }
}
