//! Randomized checks of the market state invariants

use barn_core::MarketSignal;
use barn_market_state::{MarketAnalyzer, MarketStateAggregator, MarketStateConfig, RiskScorer};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_risk_score_stays_in_unit_interval() {
    let scorer = RiskScorer::default();
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..500 {
        let len = rng.gen_range(2..120);
        let prices: Vec<f64> = (0..len).map(|_| rng.gen_range(0.0..1e6)).collect();
        let volumes: Vec<f64> = (0..len).map(|_| rng.gen_range(0.0..1e9)).collect();

        let score = scorer.score(&prices, &volumes).risk_score;
        assert!((0.0..=1.0).contains(&score), "score {score} out of range");
    }
}

#[test]
fn test_window_is_bounded_under_random_feed() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut agg = MarketStateAggregator::new(25);
    let tokens = ["BTC", "ETH", "SOL"];

    for _ in 0..1000 {
        let token = tokens[rng.gen_range(0..tokens.len())];
        agg.update(&MarketSignal::new(token, rng.gen_range(1.0..100.0), 1.0));
    }

    for token in tokens {
        assert!(agg.snapshot(token).observations <= 25);
    }
}

#[tokio::test]
async fn test_candidates_match_risk_factors() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(99);
    let mut analyzer = MarketAnalyzer::new(MarketStateConfig::default().with_risk_threshold(0.5));

    let mut analysis = None;
    for i in 0..200 {
        let token = format!("T{}", i % 8);
        let signal = MarketSignal::new(token, rng.gen_range(10.0..20.0), rng.gen_range(0.0..5.0));
        analysis = Some(analyzer.process_signal(&signal).await.unwrap());
    }
    let analysis = analysis.unwrap();

    assert_eq!(analysis.risk_factors.len(), 8);
    for candidate in &analysis.trading_signals {
        let score = analysis.risk_factors[&candidate.token].risk_score;
        assert!(score < 0.5);
        assert!((candidate.confidence - (1.0 - score)).abs() < 1e-12);
    }
    let below = analysis
        .risk_factors
        .values()
        .filter(|f| f.risk_score < 0.5)
        .count();
    assert_eq!(below, analysis.trading_signals.len());
}
