//! Risk Manager
//!
//! Tracks a rolling, time-bounded history of risk metrics per token and:
//! - Scores each entry with a weighted composite risk
//! - Compares the latest score against per-token limits
//! - Reports trends and momentum across the history

use crate::parameters::RiskManagerConfig;
use crate::report::{
    GlobalRiskMetrics, RiskBreach, RiskReport, TokenRiskMetrics, TrendAnalysis, TrendDirection,
};
use barn_core::{RiskMetrics, Timestamp, Token};
use barn_ports::{Clock, SystemClock};
use barn_stats::{mean, momentum, std_dev, trend};
use chrono::TimeDelta;
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

pub struct RiskManager {
    config: RiskManagerConfig,
    clock: Arc<dyn Clock>,
    /// Per-token metrics, oldest first
    history: HashMap<Token, VecDeque<RiskMetrics>>,
    /// Per-token composite risk limits
    limits: HashMap<Token, f64>,
    last_update: Option<Timestamp>,
}

impl RiskManager {
    pub fn new(config: RiskManagerConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Create a manager that evaluates its history window against `clock`
    pub fn with_clock(config: RiskManagerConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            history: HashMap::new(),
            limits: HashMap::new(),
            last_update: None,
        }
    }

    pub fn config(&self) -> &RiskManagerConfig {
        &self.config
    }

    /// Append metrics and evict entries older than the window
    ///
    /// A negative window counts as 0 days. A window reaching past the
    /// representable time range keeps everything.
    pub fn update_metrics(&mut self, metrics: RiskMetrics) {
        let now = self.clock.now();
        let cutoff = TimeDelta::try_days(self.config.risk_window_days.max(0))
            .and_then(|window| now.checked_sub_signed(window));
        let token = metrics.token.clone();

        let entries = self.history.entry(token.clone()).or_default();
        entries.push_back(metrics);

        let before = entries.len();
        if let Some(cutoff) = cutoff {
            entries.retain(|m| m.timestamp >= cutoff);
        }
        let evicted = before - entries.len();

        self.last_update = Some(now);

        if evicted > 0 {
            debug!(
                "[RISK] {}: evicted {} entries older than {} days",
                token, evicted, self.config.risk_window_days
            );
        }
    }

    /// Set the composite risk limit for a token
    pub fn set_risk_limit(&mut self, token: &str, limit: f64) {
        info!("[RISK] {} limit set to {:.4}", token, limit);
        self.limits.insert(token.to_string(), limit);
    }

    pub fn clear_risk_limit(&mut self, token: &str) -> Option<f64> {
        self.limits.remove(token)
    }

    pub fn risk_limit(&self, token: &str) -> Option<f64> {
        self.limits.get(token).copied()
    }

    /// Weighted sum of the normalized risk components
    ///
    /// Not clamped: illiquid or extreme inputs can push the score above 1.
    pub fn composite_risk(&self, metrics: &RiskMetrics) -> f64 {
        let w = &self.config.weights;

        let volatility = (metrics.volatility * 10.0).min(1.0);
        let var = (metrics.var.abs() * 5.0).min(1.0);
        let shortfall = (metrics.expected_shortfall.abs() * 5.0).min(1.0);
        let liquidity = 1.0 - metrics.liquidity_score;

        w.volatility * volatility
            + w.var * var
            + w.expected_shortfall * shortfall
            + w.liquidity * liquidity
    }

    /// Most recent metrics for a token
    pub fn latest(&self, token: &str) -> Option<&RiskMetrics> {
        self.history.get(token).and_then(|h| h.back())
    }

    pub fn history(&self, token: &str) -> Option<&VecDeque<RiskMetrics>> {
        self.history.get(token)
    }

    pub fn last_update(&self) -> Option<Timestamp> {
        self.last_update
    }

    /// Compare the latest composite risk against the token's limit
    ///
    /// No limit means no breach, however high the risk.
    pub fn check_breach(&self, token: &str) -> Option<RiskBreach> {
        let limit = self.risk_limit(token)?;
        let latest = self.latest(token)?;
        let level = self.composite_risk(latest);

        if level <= limit {
            return None;
        }

        warn!(
            "[RISK] {} breach: risk {:.4} > limit {:.4}",
            token, level, limit
        );

        Some(RiskBreach {
            token: token.to_string(),
            level,
            limit,
            breach_amount: level - limit,
            timestamp: self.clock.now(),
        })
    }

    /// Per-token metrics, breaches, trends and a global summary
    pub fn risk_report(&self) -> RiskReport {
        let tracked: BTreeMap<&Token, &VecDeque<RiskMetrics>> = self
            .history
            .iter()
            .filter(|(_, h)| !h.is_empty())
            .collect();

        let mut token_metrics = BTreeMap::new();
        let mut trend_analysis = BTreeMap::new();
        let mut breaches = Vec::new();
        let mut latest_risks = Vec::with_capacity(tracked.len());

        for (token, entries) in tracked {
            let Some(recent) = entries.back() else {
                continue;
            };

            let risks: Vec<f64> = entries.iter().map(|m| self.composite_risk(m)).collect();
            let volatilities: Vec<f64> = entries.iter().map(|m| m.volatility).collect();
            let vars: Vec<f64> = entries.iter().map(|m| m.var).collect();
            let current_risk = self.composite_risk(recent);
            latest_risks.push(current_risk);

            token_metrics.insert(
                token.clone(),
                TokenRiskMetrics {
                    current_risk,
                    volatility_trend: trend(&volatilities),
                    var_trend: trend(&vars),
                    momentum: momentum(&risks),
                    liquidity_score: recent.liquidity_score,
                    metrics_timestamp: recent.timestamp,
                },
            );

            trend_analysis.insert(token.clone(), analyze_trend(&risks));

            if let Some(breach) = self.check_breach(token) {
                breaches.push(breach);
            }
        }

        RiskReport {
            timestamp: self.clock.now(),
            global: global_metrics(&latest_risks),
            token_metrics,
            breaches,
            trend_analysis,
        }
    }
}

impl Default for RiskManager {
    fn default() -> Self {
        Self::new(RiskManagerConfig::default())
    }
}

fn analyze_trend(risks: &[f64]) -> TrendAnalysis {
    if risks.len() < 2 {
        return TrendAnalysis::InsufficientData;
    }

    let slope = trend(risks);
    TrendAnalysis::Trend {
        direction: if slope > 0.0 {
            TrendDirection::Increasing
        } else {
            TrendDirection::Decreasing
        },
        strength: slope.abs(),
        momentum: momentum(risks),
    }
}

fn global_metrics(risks: &[f64]) -> GlobalRiskMetrics {
    let Some(average_risk) = mean(risks) else {
        return GlobalRiskMetrics::default();
    };

    GlobalRiskMetrics {
        average_risk,
        max_risk: risks.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        risk_concentration: std_dev(risks),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barn_ports::FixedClock;
    use chrono::{TimeZone, Utc};

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn manager() -> RiskManager {
        RiskManager::with_clock(
            RiskManagerConfig::default(),
            Arc::new(FixedClock::new(now())),
        )
    }

    fn metrics(token: &str, volatility: f64, liquidity: f64) -> RiskMetrics {
        RiskMetrics::new(token, volatility, -0.02, -0.03, liquidity).at(now())
    }

    #[test]
    fn test_composite_risk_weights() {
        let manager = manager();
        let m = RiskMetrics::new("ETH", 0.05, -0.1, -0.3, 0.8);

        // 0.3 * 0.5 + 0.3 * 0.5 + 0.2 * 1.0 + 0.2 * 0.2
        assert!((manager.composite_risk(&m) - 0.54).abs() < 1e-12);
    }

    #[test]
    fn test_composite_risk_is_not_clamped() {
        let manager = manager();
        let m = RiskMetrics::new("ETH", 1.0, -1.0, -1.0, -2.0);

        // 0.3 + 0.3 + 0.2 + 0.2 * 3
        assert!((manager.composite_risk(&m) - 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_no_breach_without_limit() {
        let mut manager = manager();
        manager.update_metrics(RiskMetrics::new("ETH", 5.0, -5.0, -5.0, -10.0).at(now()));

        assert!(manager.composite_risk(manager.latest("ETH").unwrap()) > 1.0);
        assert!(manager.check_breach("ETH").is_none());
    }

    #[test]
    fn test_breach_above_limit() {
        let mut manager = manager();
        manager.update_metrics(RiskMetrics::new("ETH", 0.05, -0.1, -0.3, 0.8).at(now()));
        manager.set_risk_limit("ETH", 0.5);

        let breach = manager.check_breach("ETH").unwrap();
        assert_eq!(breach.token, "ETH");
        assert_eq!(breach.limit, 0.5);
        assert!((breach.level - 0.54).abs() < 1e-12);
        assert!((breach.breach_amount - 0.04).abs() < 1e-12);
        assert_eq!(breach.timestamp, now());

        manager.set_risk_limit("ETH", 0.6);
        assert!(manager.check_breach("ETH").is_none());

        manager.set_risk_limit("ETH", 0.5);
        assert_eq!(manager.clear_risk_limit("ETH"), Some(0.5));
        assert!(manager.check_breach("ETH").is_none());
    }

    #[test]
    fn test_window_eviction() {
        let mut manager = manager();
        manager.update_metrics(metrics("ETH", 0.01, 0.9).at(now() - TimeDelta::days(31)));
        manager.update_metrics(metrics("ETH", 0.02, 0.9).at(now() - TimeDelta::days(29)));
        manager.update_metrics(metrics("ETH", 0.03, 0.9));

        let history = manager.history("ETH").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].volatility, 0.02);
        assert_eq!(manager.last_update(), Some(now()));
    }

    fn manager_with_window(days: i64) -> RiskManager {
        RiskManager::with_clock(
            RiskManagerConfig {
                risk_window_days: days,
                ..Default::default()
            },
            Arc::new(FixedClock::new(now())),
        )
    }

    #[test]
    fn test_huge_window_keeps_everything() {
        let mut manager = manager_with_window(1_000_000_000);
        manager.update_metrics(metrics("ETH", 0.01, 0.9).at(now() - TimeDelta::days(10_000)));
        manager.update_metrics(metrics("ETH", 0.02, 0.9));

        assert_eq!(manager.history("ETH").unwrap().len(), 2);
    }

    #[test]
    fn test_negative_window_counts_as_zero() {
        let mut manager = manager_with_window(-1);
        manager.update_metrics(metrics("ETH", 0.01, 0.9).at(now() - TimeDelta::days(1)));
        manager.update_metrics(metrics("ETH", 0.02, 0.9));

        let history = manager.history("ETH").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].volatility, 0.02);
    }

    #[test]
    fn test_report_global_metrics() {
        let mut manager = manager();
        // Liquidity-only risk: 0.2 * (1 - l)
        manager.update_metrics(RiskMetrics::new("A", 0.0, 0.0, 0.0, 1.0).at(now()));
        manager.update_metrics(RiskMetrics::new("B", 0.0, 0.0, 0.0, 0.0).at(now()));

        let report = manager.risk_report();
        assert!((report.global.average_risk - 0.1).abs() < 1e-12);
        assert!((report.global.max_risk - 0.2).abs() < 1e-12);
        assert!((report.global.risk_concentration - 0.1).abs() < 1e-12);
        assert_eq!(report.token_metrics.len(), 2);
        assert!(report.breaches.is_empty());
        assert_eq!(report.trend_analysis["A"], TrendAnalysis::InsufficientData);
    }

    #[test]
    fn test_report_trends() {
        let mut manager = manager();
        manager.set_risk_limit("ETH", 0.1);
        for i in 0..4 {
            let vol = 0.01 * (i + 1) as f64;
            manager.update_metrics(
                metrics("ETH", vol, 0.9).at(now() - TimeDelta::hours(4 - i as i64)),
            );
        }

        let report = manager.risk_report();
        let eth = &report.token_metrics["ETH"];
        assert!((eth.volatility_trend - 0.01).abs() < 1e-12);
        assert!(eth.var_trend.abs() < 1e-12);
        assert_eq!(eth.liquidity_score, 0.9);
        assert_eq!(eth.metrics_timestamp, now() - TimeDelta::hours(1));

        match report.trend_analysis["ETH"] {
            TrendAnalysis::Trend {
                direction,
                strength,
                ..
            } => {
                assert_eq!(direction, TrendDirection::Increasing);
                // Composite slope is 0.3 * 10 * 0.01
                assert!((strength - 0.03).abs() < 1e-12);
            }
            TrendAnalysis::InsufficientData => panic!("expected a trend"),
        }

        assert_eq!(report.breaches.len(), 1);
        assert_eq!(report.breaches[0].token, "ETH");
    }

    #[test]
    fn test_empty_report() {
        let report = manager().risk_report();
        assert_eq!(report.global, GlobalRiskMetrics::default());
        assert!(report.token_metrics.is_empty());
    }
}
