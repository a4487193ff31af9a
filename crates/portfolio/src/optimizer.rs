//! Portfolio Optimizer
//!
//! Holds the current positions and a bounded price history per token, and
//! turns them into target allocation weights and rebalancing trades.
//!
//! ## Flow
//!
//! ```text
//! update_position ──► positions + price history (max_history_length)
//!                              │
//!                              ▼
//! optimize ──► ReturnMatrix ──► μ, Σ ──► SharpeSolver ──► AllocationWeights
//!                                                              │
//! rebalancing_trades ◄─────────────────────────────────────────┘
//! ```

use crate::error::{Error, Result};
use crate::rebalance::{DEFAULT_REBALANCE_THRESHOLD, drifts};
use crate::returns::ReturnMatrix;
use crate::solver::{SharpeSolver, SolverConfig, SolverOutcome};
use barn_core::{AllocationWeights, Position, RebalanceTrade, Token};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// Configuration for the Portfolio Optimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Price points kept per token
    pub max_history_length: usize,
    /// Weight drift that triggers a rebalancing trade (strictly greater)
    pub rebalance_threshold: f64,
    /// Minimum weight of every held token, if any
    pub min_position_size: Option<f64>,
    /// Risk-free rate subtracted from the expected portfolio return
    pub risk_free_rate: f64,
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_history_length: 1000,
            rebalance_threshold: DEFAULT_REBALANCE_THRESHOLD,
            min_position_size: Some(0.05),
            risk_free_rate: 0.0,
            max_iterations: 1000,
            tolerance: 1e-10,
        }
    }
}

impl OptimizerConfig {
    /// Builder: Set the risk-free rate
    pub fn with_risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = rate;
        self
    }

    /// Builder: Set or remove the minimum position size
    pub fn with_min_position_size(mut self, min: Option<f64>) -> Self {
        self.min_position_size = min;
        self
    }

    pub(crate) fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            risk_free_rate: self.risk_free_rate,
            lower_bound: self.min_position_size.unwrap_or(0.0),
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
        }
    }
}

/// Solve for weights over an already-built return matrix
///
/// Shared by the optimizer and callers that hold return series directly.
pub fn optimize_returns(
    matrix: &ReturnMatrix,
    config: &OptimizerConfig,
) -> Result<AllocationWeights> {
    if matrix.is_empty() {
        return Ok(AllocationWeights::new());
    }

    let mean = matrix.mean_returns();
    let cov = matrix.covariance();

    match SharpeSolver::new(&mean, &cov, config.solver_config()).solve() {
        SolverOutcome::Converged {
            weights,
            iterations,
            objective,
        } => {
            debug!(
                "[PORTFOLIO] converged in {} iterations, ratio={:.6}",
                iterations, objective
            );
            Ok(matrix
                .tokens()
                .iter()
                .cloned()
                .zip(weights.iter().copied())
                .collect())
        }
        SolverOutcome::Failed {
            reason, iterations, ..
        } => {
            warn!(
                "[PORTFOLIO] optimization failed after {} iterations: {}",
                iterations, reason
            );
            Err(Error::OptimizationNonConvergence { reason, iterations })
        }
    }
}

pub struct PortfolioOptimizer {
    config: OptimizerConfig,
    /// Latest position per token
    positions: BTreeMap<Token, Position>,
    /// Price history per token, oldest first
    history: BTreeMap<Token, VecDeque<f64>>,
}

impl PortfolioOptimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self {
            config,
            positions: BTreeMap::new(),
            history: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Supersede the token's position and record its current price
    pub fn update_position(&mut self, position: Position) {
        let max = self.config.max_history_length.max(1);
        let prices = self.history.entry(position.token.clone()).or_default();
        prices.push_back(position.current_price);
        while prices.len() > max {
            prices.pop_front();
        }

        debug!(
            "[PORTFOLIO] {} amount={} price={} history={}",
            position.token,
            position.amount,
            position.current_price,
            prices.len()
        );

        self.positions.insert(position.token.clone(), position);
    }

    pub fn position(&self, token: &str) -> Option<&Position> {
        self.positions.get(token)
    }

    pub fn positions(&self) -> impl Iterator<Item = &Position> {
        self.positions.values()
    }

    /// Price history of a token, oldest first
    pub fn price_history(&self, token: &str) -> Option<&VecDeque<f64>> {
        self.history.get(token)
    }

    /// Total value of all positions at their current prices
    pub fn total_value(&self) -> f64 {
        self.positions.values().map(Position::market_value).sum()
    }

    /// Target weights maximizing the risk-adjusted return
    ///
    /// No positions yields empty weights. A solver failure is an error,
    /// never an unconverged allocation.
    pub fn optimize(&self) -> Result<AllocationWeights> {
        let histories: Vec<(Token, Vec<f64>)> = self
            .positions
            .keys()
            .map(|token| {
                let prices = self
                    .history
                    .get(token)
                    .map(|h| h.iter().copied().collect())
                    .unwrap_or_default();
                (token.clone(), prices)
            })
            .collect();

        let matrix = ReturnMatrix::from_prices(
            histories
                .iter()
                .map(|(token, prices)| (token.clone(), prices.as_slice())),
        );

        let weights = optimize_returns(&matrix, &self.config)?;
        info!(
            "[PORTFOLIO] optimized {} positions over {} periods",
            weights.len(),
            matrix.periods()
        );
        Ok(weights)
    }

    /// Trades moving each held token to its target weight
    ///
    /// Amounts are in token units at the current price. Held tokens missing
    /// from `target` are sold down to zero.
    pub fn rebalancing_trades(&self, target: &AllocationWeights) -> Vec<RebalanceTrade> {
        for token in target.iter().map(|(t, _)| t) {
            if !self.positions.contains_key(token) {
                debug!("[PORTFOLIO] target for unheld token {} ignored", token);
            }
        }

        let values: BTreeMap<Token, f64> = self
            .positions
            .iter()
            .map(|(token, p)| (token.clone(), p.market_value()))
            .collect();

        drifts(&values, target, self.config.rebalance_threshold)
            .into_iter()
            .filter_map(|drift| {
                let price = self.positions.get(&drift.token)?.current_price;
                if price <= 0.0 {
                    return None;
                }
                Some(RebalanceTrade::from_delta(drift.token.clone(), drift.delta_value() / price))
            })
            .collect()
    }
}

impl Default for PortfolioOptimizer {
    fn default() -> Self {
        Self::new(OptimizerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barn_core::TradeAction;

    fn feed(optimizer: &mut PortfolioOptimizer, token: &str, amount: f64, prices: &[f64]) {
        for &price in prices {
            optimizer.update_position(Position::new(token, amount, prices[0], price));
        }
    }

    #[test]
    fn test_no_positions_yields_empty_weights() {
        let optimizer = PortfolioOptimizer::default();
        assert!(optimizer.optimize().unwrap().is_empty());
    }

    #[test]
    fn test_update_position_supersedes() {
        let mut optimizer = PortfolioOptimizer::default();
        optimizer.update_position(Position::new("ETH", 1.0, 2000.0, 2000.0));
        optimizer.update_position(Position::new("ETH", 3.0, 2000.0, 2100.0));

        assert_eq!(optimizer.position("ETH").unwrap().amount, 3.0);
        assert_eq!(optimizer.positions().count(), 1);
        assert_eq!(
            optimizer.price_history("ETH").unwrap().iter().copied().collect::<Vec<_>>(),
            vec![2000.0, 2100.0]
        );
    }

    #[test]
    fn test_history_is_capped() {
        let mut optimizer = PortfolioOptimizer::new(OptimizerConfig {
            max_history_length: 3,
            ..Default::default()
        });
        feed(&mut optimizer, "BTC", 1.0, &[1.0, 2.0, 3.0, 4.0, 5.0]);

        let history: Vec<f64> = optimizer.price_history("BTC").unwrap().iter().copied().collect();
        assert_eq!(history, vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_single_price_positions_use_placeholder() {
        let mut optimizer = PortfolioOptimizer::default();
        optimizer.update_position(Position::new("A", 1.0, 10.0, 10.0));
        optimizer.update_position(Position::new("B", 1.0, 20.0, 20.0));

        let weights = optimizer.optimize().unwrap();
        assert!((weights.weight("A") - 0.5).abs() < 1e-12);
        assert!((weights.weight("B") - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_weights_respect_min_position_size() {
        let mut optimizer = PortfolioOptimizer::default();
        feed(&mut optimizer, "UP", 1.0, &[100.0, 103.0, 105.0, 109.0, 110.0]);
        feed(&mut optimizer, "DOWN", 1.0, &[100.0, 97.0, 98.0, 94.0, 93.0]);

        let weights = optimizer.optimize().unwrap();
        assert!(weights.is_normalized(1e-6));
        assert!(weights.weight("DOWN") >= 0.05 - 1e-9);
        assert!(weights.weight("UP") > weights.weight("DOWN"));
    }

    #[test]
    fn test_infeasible_minimum_is_an_error() {
        let mut optimizer = PortfolioOptimizer::new(
            OptimizerConfig::default().with_min_position_size(Some(0.6)),
        );
        feed(&mut optimizer, "A", 1.0, &[1.0, 1.1]);
        feed(&mut optimizer, "B", 1.0, &[1.0, 0.9]);

        match optimizer.optimize() {
            Err(Error::OptimizationNonConvergence { reason, .. }) => {
                assert_eq!(reason, crate::solver::FailureReason::Infeasible)
            }
            other => panic!("expected non-convergence, got {other:?}"),
        }
    }

    #[test]
    fn test_rebalancing_trades_in_token_units() {
        let mut optimizer = PortfolioOptimizer::default();
        optimizer.update_position(Position::new("ETH", 10.0, 100.0, 100.0));
        optimizer.update_position(Position::new("BTC", 1.0, 1000.0, 1000.0));

        // 1000 / 1000 split; move to 75 / 25
        let target: AllocationWeights =
            [("ETH".to_string(), 0.75), ("BTC".to_string(), 0.25)].into_iter().collect();
        let trades = optimizer.rebalancing_trades(&target);

        assert_eq!(trades.len(), 2);
        let eth = trades.iter().find(|t| t.token == "ETH").unwrap();
        assert_eq!(eth.action, TradeAction::Buy);
        assert!((eth.amount - 5.0).abs() < 1e-12);

        let btc = trades.iter().find(|t| t.token == "BTC").unwrap();
        assert_eq!(btc.action, TradeAction::Sell);
        assert!((btc.amount - 0.5).abs() < 1e-12);
    }
}
