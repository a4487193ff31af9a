use barn_core::{Token, TradeAction};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Pipeline stages of one orchestrator tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    RiskAnalysis,
    TradeDecision,
    PortfolioUpdate,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::RiskAnalysis => "risk_analysis",
            Stage::TradeDecision => "trade_decision",
            Stage::PortfolioUpdate => "portfolio_update",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured events reported while a tick runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PipelineEvent {
    TickStarted {
        tick_id: Uuid,
        token: Token,
    },
    StageCompleted {
        tick_id: Uuid,
        stage: Stage,
    },
    RiskBreach {
        tick_id: Uuid,
        token: Token,
        level: f64,
        limit: f64,
    },
    TradeExecuted {
        tick_id: Uuid,
        token: Token,
        action: TradeAction,
        size: f64,
        transaction_id: String,
    },
    TradeHeld {
        tick_id: Uuid,
        token: Token,
        reason: String,
    },
    TickCompleted {
        tick_id: Uuid,
    },
    TickFailed {
        tick_id: Uuid,
        stage: Stage,
        error: String,
    },
}

impl PipelineEvent {
    /// Tick this event belongs to
    pub fn tick_id(&self) -> Uuid {
        match self {
            PipelineEvent::TickStarted { tick_id, .. }
            | PipelineEvent::StageCompleted { tick_id, .. }
            | PipelineEvent::RiskBreach { tick_id, .. }
            | PipelineEvent::TradeExecuted { tick_id, .. }
            | PipelineEvent::TradeHeld { tick_id, .. }
            | PipelineEvent::TickCompleted { tick_id }
            | PipelineEvent::TickFailed { tick_id, .. } => *tick_id,
        }
    }
}

/// Port for structured event reporting
///
/// Passed explicitly to the orchestrator; nothing in the pipeline reaches for
/// a global logger.
pub trait PipelineObserver: Send + Sync {
    fn on_event(&self, event: &PipelineEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::RiskAnalysis.as_str(), "risk_analysis");
        assert_eq!(Stage::TradeDecision.to_string(), "trade_decision");
        assert_eq!(Stage::PortfolioUpdate.as_str(), "portfolio_update");
    }

    #[test]
    fn test_event_tick_id() {
        let tick_id = Uuid::new_v4();
        let event = PipelineEvent::TickFailed {
            tick_id,
            stage: Stage::PortfolioUpdate,
            error: "boom".to_string(),
        };
        assert_eq!(event.tick_id(), tick_id);
    }
}
