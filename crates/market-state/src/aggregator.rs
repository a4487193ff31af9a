//! Market State Aggregator
//!
//! Keeps a bounded, per-token window of recent observations. The window is
//! FIFO: once it is full, every update evicts the oldest observation.
//!
//! Observations are appended in call order. The signal timestamp is carried
//! along but never used for ordering, so a late signal still lands at the
//! back of the window.

use barn_core::{MarketSignal, Observation, Token};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Default number of observations kept per token
pub const DEFAULT_WINDOW_SIZE: usize = 100;

/// State of one token at a point in time
///
/// A token that was never observed has `observations == 0` and no `latest`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSnapshot {
    pub token: Token,
    pub observations: usize,
    pub latest: Option<Observation>,
}

impl TokenSnapshot {
    pub fn empty(token: impl Into<Token>) -> Self {
        Self {
            token: token.into(),
            observations: 0,
            latest: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_none()
    }
}

/// Read-only copy of every token's window, taken at one instant
///
/// Shared between the concurrent market analysis tasks.
#[derive(Debug, Clone, Default)]
pub struct MarketSnapshot {
    histories: BTreeMap<Token, Vec<Observation>>,
}

impl MarketSnapshot {
    /// Tokens with at least one observation, in token order
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.histories
            .iter()
            .filter(|(_, h)| !h.is_empty())
            .map(|(t, _)| t)
    }

    pub fn history(&self, token: &str) -> &[Observation] {
        self.histories.get(token).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn prices(&self, token: &str) -> Vec<f64> {
        self.history(token).iter().map(|o| o.price).collect()
    }

    pub fn volumes(&self, token: &str) -> Vec<f64> {
        self.history(token).iter().map(|o| o.volume).collect()
    }

    pub fn latest(&self, token: &str) -> Option<&Observation> {
        self.history(token).last()
    }
}

/// Per-token bounded observation windows
#[derive(Debug, Clone)]
pub struct MarketStateAggregator {
    window_size: usize,
    state: HashMap<Token, VecDeque<Observation>>,
}

impl MarketStateAggregator {
    /// Create an aggregator keeping at most `window_size` observations per
    /// token (minimum 1)
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size: window_size.max(1),
            state: HashMap::new(),
        }
    }

    /// Append the signal's observation, evicting the oldest beyond the window
    pub fn update(&mut self, signal: &MarketSignal) {
        let window = self.state.entry(signal.token.clone()).or_default();
        window.push_back(signal.observation());

        while window.len() > self.window_size {
            window.pop_front();
        }

        debug!(
            "[MARKET] {} price={} volume={} window={}/{}",
            signal.token,
            signal.price,
            signal.volume,
            window.len(),
            self.window_size
        );
    }

    /// Most recent observation for a token, or the empty snapshot
    pub fn snapshot(&self, token: &str) -> TokenSnapshot {
        match self.state.get(token) {
            Some(window) if !window.is_empty() => TokenSnapshot {
                token: token.to_string(),
                observations: window.len(),
                latest: window.back().cloned(),
            },
            _ => TokenSnapshot::empty(token),
        }
    }

    /// Copy every window for read-only analysis
    pub fn snapshot_all(&self) -> MarketSnapshot {
        MarketSnapshot {
            histories: self
                .state
                .iter()
                .map(|(token, window)| (token.clone(), window.iter().cloned().collect()))
                .collect(),
        }
    }

    /// Observation window for a token, oldest first
    pub fn history(&self, token: &str) -> Option<&VecDeque<Observation>> {
        self.state.get(token)
    }

    pub fn prices(&self, token: &str) -> Vec<f64> {
        self.state
            .get(token)
            .map(|w| w.iter().map(|o| o.price).collect())
            .unwrap_or_default()
    }

    pub fn volumes(&self, token: &str) -> Vec<f64> {
        self.state
            .get(token)
            .map(|w| w.iter().map(|o| o.volume).collect())
            .unwrap_or_default()
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn token_count(&self) -> usize {
        self.state.len()
    }
}

impl Default for MarketStateAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}
