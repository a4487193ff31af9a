//! Market Feed - Simulated market data source
//!
//! Random-walks a price per token and packages each step as a
//! [`MarketData`] tick, carrying the return series seen so far and a fixed
//! holding per token. Seeded feeds are reproducible.

use barn_agents::MarketData;
use barn_core::{MarketSignal, Token};
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketFeedConfig {
    /// Starting price per token
    pub initial_prices: BTreeMap<Token, f64>,
    /// Value held per token, reported with every tick
    pub holdings: BTreeMap<Token, f64>,
    /// Maximum relative price move per tick (0.01 = 1%)
    pub price_volatility: f64,
    /// Volume range sampled per tick
    pub min_volume: f64,
    pub max_volume: f64,
    /// Return points kept per token
    pub max_returns: usize,
}

impl Default for MarketFeedConfig {
    fn default() -> Self {
        let initial_prices = BTreeMap::from([
            ("BTC".to_string(), 50_000.0),
            ("ETH".to_string(), 3_000.0),
        ]);
        let holdings = BTreeMap::from([
            ("BTC".to_string(), 5_000.0),
            ("ETH".to_string(), 5_000.0),
        ]);

        Self {
            initial_prices,
            holdings,
            price_volatility: 0.01,
            min_volume: 100.0,
            max_volume: 10_000.0,
            max_returns: 100,
        }
    }
}

pub struct MarketFeed {
    config: MarketFeedConfig,
    prices: BTreeMap<Token, f64>,
    returns: BTreeMap<Token, VecDeque<f64>>,
    rng: StdRng,
    ticks: i64,
}

impl MarketFeed {
    pub fn new(config: MarketFeedConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create with a specific seed for reproducible runs
    pub fn with_seed(config: MarketFeedConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: MarketFeedConfig, rng: StdRng) -> Self {
        Self {
            prices: config.initial_prices.clone(),
            returns: BTreeMap::new(),
            config,
            rng,
            ticks: 0,
        }
    }

    pub fn price(&self, token: &str) -> Option<f64> {
        self.prices.get(token).copied()
    }

    /// Next tick, or `None` when the feed has no tokens
    ///
    /// Tokens are visited round-robin in name order. Timestamps advance one
    /// second per tick.
    pub fn next_tick(&mut self) -> Option<MarketData> {
        if self.prices.is_empty() {
            return None;
        }

        let index = (self.ticks as usize) % self.prices.len();
        let token = self.prices.keys().nth(index)?.clone();
        let current = self.prices.get(&token).copied()?;

        let change: f64 = self.rng.gen_range(-1.0..=1.0);
        let step = self.config.price_volatility * change;
        let price = current * (1.0 + step);
        self.prices.insert(token.clone(), price);

        let series = self.returns.entry(token.clone()).or_default();
        series.push_back(step);
        while series.len() > self.config.max_returns.max(1) {
            series.pop_front();
        }

        let volume = if self.config.max_volume > self.config.min_volume {
            self.rng.gen_range(self.config.min_volume..self.config.max_volume)
        } else {
            self.config.min_volume
        };

        let timestamp = Utc::now() + Duration::seconds(self.ticks);
        self.ticks += 1;

        let signal = MarketSignal::new(token, price, volume).with_timestamp(timestamp);
        Some(MarketData {
            signal,
            portfolio: self.config.holdings.clone(),
            historical_returns: self
                .returns
                .iter()
                .map(|(token, series)| (token.clone(), series.iter().copied().collect()))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_robin_over_tokens() {
        let mut feed = MarketFeed::with_seed(MarketFeedConfig::default(), 42);

        let first = feed.next_tick().unwrap();
        let second = feed.next_tick().unwrap();
        let third = feed.next_tick().unwrap();

        assert_eq!(first.signal.token, "BTC");
        assert_eq!(second.signal.token, "ETH");
        assert_eq!(third.signal.token, "BTC");
        assert_eq!(third.historical_returns["BTC"].len(), 2);
    }

    #[test]
    fn test_random_walk_stays_bounded() {
        let config = MarketFeedConfig {
            initial_prices: BTreeMap::from([("TEST".to_string(), 100.0)]),
            ..Default::default()
        };
        let mut feed = MarketFeed::with_seed(config, 7);

        let mut last = 100.0;
        for _ in 0..50 {
            let tick = feed.next_tick().unwrap();
            assert!(tick.signal.price > 0.0);
            assert!((tick.signal.price / last - 1.0).abs() <= 0.01 + 1e-12);
            assert!(tick.signal.volume >= 100.0 && tick.signal.volume < 10_000.0);
            last = tick.signal.price;
        }
    }

    #[test]
    fn test_same_seed_same_prices() {
        let mut a = MarketFeed::with_seed(MarketFeedConfig::default(), 3);
        let mut b = MarketFeed::with_seed(MarketFeedConfig::default(), 3);

        for _ in 0..10 {
            assert_eq!(a.next_tick().unwrap().signal.price, b.next_tick().unwrap().signal.price);
        }
    }

    #[test]
    fn test_return_series_is_capped() {
        let config = MarketFeedConfig {
            initial_prices: BTreeMap::from([("TEST".to_string(), 100.0)]),
            max_returns: 5,
            ..Default::default()
        };
        let mut feed = MarketFeed::with_seed(config, 1);

        let mut tick = None;
        for _ in 0..20 {
            tick = feed.next_tick();
        }
        assert_eq!(tick.unwrap().historical_returns["TEST"].len(), 5);
    }

    #[test]
    fn test_capped_series_keeps_latest_returns_in_order() {
        let config = MarketFeedConfig {
            initial_prices: BTreeMap::from([("TEST".to_string(), 100.0)]),
            max_returns: 3,
            ..Default::default()
        };
        let mut feed = MarketFeed::with_seed(config, 9);

        let mut previous = 100.0;
        let mut steps = Vec::new();
        let mut last = None;
        for _ in 0..8 {
            let tick = feed.next_tick().unwrap();
            steps.push(tick.signal.price / previous - 1.0);
            previous = tick.signal.price;
            last = Some(tick);
        }

        let series = &last.unwrap().historical_returns["TEST"];
        assert_eq!(series.len(), 3);
        for (kept, expected) in series.iter().zip(&steps[5..]) {
            assert!((kept - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_empty_feed() {
        let config = MarketFeedConfig {
            initial_prices: BTreeMap::new(),
            ..Default::default()
        };
        assert!(MarketFeed::with_seed(config, 1).next_tick().is_none());
    }
}
