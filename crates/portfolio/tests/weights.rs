//! Randomized checks of the optimizer output

use barn_core::Position;
use barn_portfolio::{OptimizerConfig, PortfolioOptimizer};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn random_portfolio(rng: &mut StdRng, config: OptimizerConfig) -> PortfolioOptimizer {
    let mut optimizer = PortfolioOptimizer::new(config);
    let tokens = rng.gen_range(1..8);

    for t in 0..tokens {
        let token = format!("T{t}");
        let amount = rng.gen_range(0.1..100.0);
        let mut price: f64 = rng.gen_range(1.0..1000.0);
        let drift = rng.gen_range(-0.01..0.01);
        let periods = rng.gen_range(1..60);

        for _ in 0..periods {
            price *= 1.0 + drift + rng.gen_range(-0.03..0.03);
            optimizer.update_position(Position::new(token.clone(), amount, price, price));
        }
    }

    optimizer
}

#[test]
fn test_weights_sum_to_one_within_bounds() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(2024);

    for _ in 0..100 {
        let optimizer = random_portfolio(&mut rng, OptimizerConfig::default());
        let n = optimizer.positions().count();
        let weights = optimizer.optimize().unwrap();

        assert_eq!(weights.len(), n);
        assert!(weights.is_normalized(1e-6), "total = {}", weights.total());
        for (_, w) in weights.iter() {
            assert!((0.0..=1.0 + 1e-12).contains(w));
        }
    }
}

#[test]
fn test_unconstrained_weights_sum_to_one() {
    let mut rng = StdRng::seed_from_u64(77);

    for _ in 0..100 {
        let config = OptimizerConfig::default()
            .with_min_position_size(None)
            .with_risk_free_rate(0.01);
        let optimizer = random_portfolio(&mut rng, config);
        let weights = optimizer.optimize().unwrap();

        assert!(weights.is_normalized(1e-6));
        assert!(weights.iter().all(|(_, w)| *w >= 0.0 && *w <= 1.0 + 1e-12));
    }
}

#[test]
fn test_rebalancing_after_optimization_closes_drift() {
    let mut rng = StdRng::seed_from_u64(5);
    let optimizer = random_portfolio(&mut rng, OptimizerConfig::default());
    let target = optimizer.optimize().unwrap();
    let total = optimizer.total_value();

    for trade in optimizer.rebalancing_trades(&target) {
        let position = optimizer.position(&trade.token).unwrap();
        let new_value =
            (position.amount + trade.action.sign() * trade.amount) * position.current_price;
        assert!((new_value / total - target.weight(&trade.token)).abs() < 1e-9);
    }
}
