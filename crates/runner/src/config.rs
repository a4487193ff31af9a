//! Pipeline configuration
//!
//! Every field is optional in a serialized document; missing values take
//! their defaults.

use barn_agents::{PortfolioAgentConfig, RiskAnalysisConfig, TradingConfig};
use serde::{Deserialize, Serialize};

pub const RISK_ANALYZER: &str = "risk_analyzer";
pub const TRADER: &str = "trader";
pub const PORTFOLIO_MANAGER: &str = "portfolio_manager";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub risk_analysis: RiskAnalysisConfig,
    pub trading: TradingConfig,
    pub portfolio: PortfolioAgentConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();

        assert_eq!(config.risk_analysis.market.window_size, 100);
        assert_eq!(config.risk_analysis.market.scorer.risk_threshold, 0.7);
        assert_eq!(config.risk_analysis.market.base_liquidity, 1_000_000.0);
        assert_eq!(config.risk_analysis.risk_manager.risk_window_days, 30);
        assert_eq!(config.trading.max_risk_threshold, 0.8);
        assert_eq!(config.trading.base_position_size, 1.0);
        assert_eq!(config.portfolio.optimizer.rebalance_threshold, 0.01);
        assert_eq!(config.portfolio.optimizer.max_history_length, 1000);
        assert_eq!(config.portfolio.optimizer.min_position_size, None);
    }

    #[test]
    fn test_partial_document() {
        let json = r#"{
            "trading": { "max_risk_threshold": 0.5 },
            "risk_analysis": { "market": { "window_size": 20 } }
        }"#;
        let config: PipelineConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.trading.max_risk_threshold, 0.5);
        assert_eq!(config.trading.base_position_size, 1.0);
        assert_eq!(config.risk_analysis.market.window_size, 20);
        assert_eq!(config.risk_analysis.market.scorer.volatility_weight, 0.7);
        assert_eq!(config.risk_analysis.risk_free_rate, 0.01);
    }
}
