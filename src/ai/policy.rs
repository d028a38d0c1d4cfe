use rand::Rng;

/// Softmax over `values` scaled by the inverse temperature `beta`.
pub fn softmax(values: &[f64], beta: f64) -> Vec<f64> {
    // Shift by the largest raw value before scaling: every exponent is <= 0.
    let max_val = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut probs: Vec<f64> = values
        .iter()
        .map(|&v| {
            let shifted = v - max_val;
            if shifted == 0.0 {
                1.0
            } else {
                (beta * shifted).exp()
            }
        })
        .collect();
    let sum: f64 = probs.iter().sum();
    for p in &mut probs {
        *p /= sum;
    }

    probs
}

/// Sample an index from a categorical distribution defined by `probs`.
pub fn sample_categorical<R: Rng + ?Sized>(probs: &[f64], rng: &mut R) -> usize {
    let r: f64 = rng.random_range(0.0..1.0);
    let mut cumulative = 0.0;
    for (i, &p) in probs.iter().enumerate() {
        cumulative += p;
        if r < cumulative {
            return i;
        }
    }
    // Rounding left `cumulative` just under 1: fall back to the last
    // index with non-zero mass.
    probs.iter().rposition(|&p| p > 0.0).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_softmax_sums_to_one() {
        for beta in [0.0, 0.5, 5.0, 50.0] {
            let probs = softmax(&[0.3, -1.2, 0.9], beta);
            let sum: f64 = probs.iter().sum();
            assert!((sum - 1.0).abs() < 1e-12, "beta = {beta}, sum = {sum}");
            assert!(probs.iter().all(|&p| p >= 0.0));
        }
    }

    #[test]
    fn test_softmax_zero_beta_is_uniform() {
        let probs = softmax(&[10.0, -3.0], 0.0);
        assert!((probs[0] - 0.5).abs() < 1e-12);
        assert!((probs[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_softmax_large_values_do_not_overflow() {
        let probs = softmax(&[1000.0, 999.0], 1000.0);
        assert!(probs.iter().all(|p| p.is_finite()));
        let sum: f64 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!(probs[0] > 0.999);
    }

    #[test]
    fn test_softmax_huge_beta_stays_finite() {
        let probs = softmax(&[2.0, 1.0], 1e308);
        assert_eq!(probs, vec![1.0, 0.0]);

        let probs = softmax(&[1e308, -1e308, 1e308], f64::MAX);
        assert!(probs.iter().all(|p| p.is_finite()));
        let sum: f64 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert_eq!(probs[1], 0.0);
    }

    #[test]
    fn test_sample_after_huge_beta_picks_best() {
        let probs = softmax(&[0.0, 3.0], 1e300);
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..50 {
            assert_eq!(sample_categorical(&probs, &mut rng), 1);
        }
    }

    #[test]
    fn test_softmax_prefers_higher_value() {
        let probs = softmax(&[1.0, 0.0], 5.0);
        assert!(probs[0] > probs[1]);
        let expected = 1.0 / (1.0 + (-5.0f64).exp());
        assert!((probs[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_sample_categorical_degenerate() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(sample_categorical(&[0.0, 1.0, 0.0], &mut rng), 1);
        }
    }

    #[test]
    fn test_sample_categorical_in_range() {
        let mut rng = StdRng::seed_from_u64(2);
        let probs = [0.25, 0.25, 0.5];
        for _ in 0..1000 {
            assert!(sample_categorical(&probs, &mut rng) < probs.len());
        }
    }

    #[test]
    fn test_sample_categorical_is_deterministic_under_seed() {
        let probs = [0.3, 0.7];
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        let xs: Vec<usize> = (0..64).map(|_| sample_categorical(&probs, &mut a)).collect();
        let ys: Vec<usize> = (0..64).map(|_| sample_categorical(&probs, &mut b)).collect();
        assert_eq!(xs, ys);
    }
}
