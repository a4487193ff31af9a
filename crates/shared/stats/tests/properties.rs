//! Randomized checks of the statistics kernel invariants

use barn_stats::{
    DEFAULT_CONFIDENCE, expected_shortfall, momentum, returns, trend, value_at_risk, volatility,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_walk(rng: &mut StdRng, len: usize) -> Vec<f64> {
    let mut price = rng.gen_range(1.0..1000.0);
    (0..len)
        .map(|_| {
            price *= 1.0 + rng.gen_range(-0.05..0.05);
            price
        })
        .collect()
}

#[test]
fn test_short_series_have_zero_risk() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..100 {
        let len = rng.gen_range(0..2);
        let prices: Vec<f64> = (0..len).map(|_| rng.gen_range(1.0..100.0)).collect();

        assert_eq!(volatility(&prices), 0.0);
        assert_eq!(value_at_risk(&prices, DEFAULT_CONFIDENCE).abs(), 0.0);
        assert_eq!(expected_shortfall(&prices, DEFAULT_CONFIDENCE), 0.0);
        assert_eq!(trend(&prices), 0.0);
    }
}

#[test]
fn test_functions_have_no_hidden_state() {
    let mut rng = StdRng::seed_from_u64(11);
    let prices = random_walk(&mut rng, 64);

    let baseline = (
        volatility(&prices),
        trend(&prices),
        value_at_risk(&prices, 0.95),
        momentum(&prices),
    );

    for _ in 0..25 {
        // Interleave unrelated calls to make sure nothing leaks between them
        let other = random_walk(&mut rng, 16);
        let _ = volatility(&other);

        assert_eq!(
            baseline,
            (
                volatility(&prices),
                trend(&prices),
                value_at_risk(&prices, 0.95),
                momentum(&prices),
            )
        );
    }
}

#[test]
fn test_var_is_bounded_by_observed_returns() {
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..200 {
        let len = rng.gen_range(2..80);
        let prices = random_walk(&mut rng, len);
        let r = returns(&prices).unwrap();

        let lo = r.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = r.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let var = value_at_risk(&prices, 0.95);

        assert!(var >= lo - 1e-12 && var <= hi + 1e-12);
        assert!(volatility(&prices) >= 0.0);
        assert!(expected_shortfall(&prices, 0.95) <= var + 1e-12);
    }
}
