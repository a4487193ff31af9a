//! Service contract
//!
//! Request-level operations for an outer API layer. None of them touch the
//! orchestrator's state.

use crate::error::{Error, Result};
use barn_core::{Token, TradeAction};
use barn_ports::{ExecutionVenue, TradeOrder};
use barn_stats::{returns, sharpe_ratio, volatility};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessmentResponse {
    pub volatility: f64,
    pub sharpe_ratio: f64,
    /// `1 / (1 + sharpe_ratio)`; above 1 for losing series, infinite once
    /// the Sharpe ratio reaches -1
    pub risk_score: f64,
}

/// Volatility, Sharpe ratio (risk-free rate 0) and risk score of a price series
///
/// Fewer than 2 prices give zero volatility and Sharpe ratio, so a risk
/// score of 1. A Sharpe ratio at or below -1 has no finite score and
/// reports infinity.
pub fn assess_risk(prices: &[f64]) -> RiskAssessmentResponse {
    let volatility = volatility(prices);
    let sharpe_ratio = returns(prices)
        .map(|r| sharpe_ratio(&r, 0.0))
        .unwrap_or(0.0);

    let denominator = 1.0 + sharpe_ratio;
    let risk_score = if denominator > 0.0 {
        1.0 / denominator
    } else {
        f64::INFINITY
    };

    RiskAssessmentResponse {
        volatility,
        sharpe_ratio,
        risk_score,
    }
}

/// Blend the allocation toward equal weights
///
/// Each token's new value is `total × ((1 − tolerance) / n + tolerance × w)`,
/// where `w` is its current weight. Tolerance 1 keeps the allocation,
/// tolerance 0 splits it evenly. The total value is preserved.
pub fn optimize_portfolio(
    allocation: &BTreeMap<Token, f64>,
    risk_tolerance: f64,
) -> Result<BTreeMap<Token, f64>> {
    if !(0.0..=1.0).contains(&risk_tolerance) {
        return Err(Error::InvalidRiskTolerance(risk_tolerance));
    }
    if allocation.is_empty() {
        return Err(Error::EmptyAllocation);
    }

    let total: f64 = allocation.values().sum();
    if total.is_nan() || total <= 0.0 {
        return Err(Error::InvalidAllocationTotal(total));
    }

    let equal = (1.0 - risk_tolerance) / allocation.len() as f64;
    Ok(allocation
        .iter()
        .map(|(token, value)| {
            let weight = value / total;
            (token.clone(), total * (equal + risk_tolerance * weight))
        })
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeExecutionResponse {
    pub status: ExecutionStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

impl TradeExecutionResponse {
    fn error(message: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Error,
            message: message.into(),
            transaction_id: None,
        }
    }
}

/// Execute one trade through `venue`
///
/// Never fails: an unknown action or a venue rejection comes back as an
/// `error` response without a transaction id.
pub async fn execute_trade(
    venue: &dyn ExecutionVenue,
    token: &str,
    amount: f64,
    action: &str,
) -> TradeExecutionResponse {
    let action: TradeAction = match action.parse() {
        Ok(action) => action,
        Err(e) => {
            warn!("[VENUE] rejected trade on {}: {}", token, e);
            return TradeExecutionResponse::error(e.to_string());
        }
    };

    let order = TradeOrder::new(token, action, amount);
    match venue.execute(&order).await {
        Ok(receipt) => {
            let verb = match action {
                TradeAction::Buy => "bought",
                TradeAction::Sell => "sold",
            };
            info!(
                "[VENUE] {} {} {} via {} ({})",
                action,
                amount,
                token,
                venue.name(),
                receipt.transaction_id
            );
            TradeExecutionResponse {
                status: ExecutionStatus::Success,
                message: format!("Successfully {} {} of {}", verb, amount, token),
                transaction_id: Some(receipt.transaction_id),
            }
        }
        Err(e) => {
            warn!("[VENUE] {} failed: {}", venue.name(), e);
            TradeExecutionResponse::error(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barn_agents::SimulatedVenue;

    #[test]
    fn test_assess_risk_scenario() {
        let response = assess_risk(&[100.0, 102.0, 98.0, 103.0, 101.0]);

        assert!((response.volatility - 0.0349272).abs() < 1e-6);
        assert!((response.sharpe_ratio - 0.0886648).abs() < 1e-6);
        assert!((response.risk_score - 0.918557).abs() < 1e-5);
    }

    #[test]
    fn test_assess_risk_short_series() {
        let response = assess_risk(&[100.0]);
        assert_eq!(response.volatility, 0.0);
        assert_eq!(response.sharpe_ratio, 0.0);
        assert_eq!(response.risk_score, 1.0);
    }

    #[test]
    fn test_assess_risk_mild_loss_exceeds_one() {
        let response = assess_risk(&[100.0, 101.0, 99.0, 100.0, 98.5]);

        assert!((response.sharpe_ratio + 0.2657366).abs() < 1e-6);
        assert!((response.risk_score - 1.3619092).abs() < 1e-6);
        assert!((response.risk_score - 1.0 / (1.0 + response.sharpe_ratio)).abs() < 1e-12);
    }

    #[test]
    fn test_assess_risk_steady_loss_is_unbounded() {
        // Steady losses: sharpe well below -1
        let response = assess_risk(&[100.0, 99.0, 97.0, 94.0, 90.0]);
        assert!(response.sharpe_ratio < -1.0);
        assert!(response.risk_score.is_infinite());
    }

    #[test]
    fn test_optimize_portfolio_blend() {
        let allocation = BTreeMap::from([("BTC".to_string(), 750.0), ("ETH".to_string(), 250.0)]);

        let result = optimize_portfolio(&allocation, 0.5).unwrap();
        // 1000 × (0.25 + 0.5 × 0.75) and 1000 × (0.25 + 0.5 × 0.25)
        assert!((result["BTC"] - 625.0).abs() < 1e-9);
        assert!((result["ETH"] - 375.0).abs() < 1e-9);
        assert!((result.values().sum::<f64>() - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_optimize_portfolio_extremes() {
        let allocation = BTreeMap::from([("BTC".to_string(), 900.0), ("ETH".to_string(), 100.0)]);

        let kept = optimize_portfolio(&allocation, 1.0).unwrap();
        assert!((kept["BTC"] - 900.0).abs() < 1e-9);

        let even = optimize_portfolio(&allocation, 0.0).unwrap();
        assert!((even["BTC"] - 500.0).abs() < 1e-9);
        assert!((even["ETH"] - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_optimize_portfolio_rejects_bad_input() {
        let allocation = BTreeMap::from([("BTC".to_string(), 1.0)]);
        assert!(matches!(
            optimize_portfolio(&allocation, 1.5),
            Err(Error::InvalidRiskTolerance(_))
        ));
        assert!(matches!(
            optimize_portfolio(&BTreeMap::new(), 0.5),
            Err(Error::EmptyAllocation)
        ));

        let zero = BTreeMap::from([("BTC".to_string(), 0.0)]);
        assert!(matches!(
            optimize_portfolio(&zero, 0.5),
            Err(Error::InvalidAllocationTotal(_))
        ));
    }

    #[tokio::test]
    async fn test_execute_trade_success() {
        let venue = SimulatedVenue::new();
        let response = execute_trade(&venue, "ETH", 2.0, "buy").await;

        assert_eq!(response.status, ExecutionStatus::Success);
        assert_eq!(response.message, "Successfully bought 2 of ETH");
        assert_eq!(response.transaction_id.as_deref(), Some("tx_0"));
    }

    #[tokio::test]
    async fn test_execute_trade_invalid_action() {
        let venue = SimulatedVenue::new();
        let response = execute_trade(&venue, "ETH", 2.0, "invalid").await;

        assert_eq!(response.status, ExecutionStatus::Error);
        assert_eq!(response.message, "Invalid action 'invalid'. Use \"buy\" or \"sell\".");
        assert!(response.transaction_id.is_none());

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "error");
        assert!(json.get("transaction_id").is_none());
    }

    #[tokio::test]
    async fn test_execute_trade_venue_rejection() {
        let venue = SimulatedVenue::new();
        let response = execute_trade(&venue, "ETH", -1.0, "sell").await;

        assert_eq!(response.status, ExecutionStatus::Error);
        assert!(response.transaction_id.is_none());
    }
}
