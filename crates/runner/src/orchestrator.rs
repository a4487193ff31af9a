//! Orchestrator - one pipeline pass per market data tick
//!
//! ```text
//! MarketData ──► on_market_data (all agents)
//!      │
//!      ├──► RiskAnalysisAgent ──► RiskAssessment ──────┐
//!      │                               │               │
//!      │                 risk_score, price_trend       │
//!      │                               ▼               │
//!      ├──────────────────────► TradingAgent ──► TradeDecision
//!      │                                               │
//!      └──► PortfolioAgent ──► PortfolioUpdate ────────┴──► TickResult
//! ```
//!
//! A failing stage ends the tick with an error; no partial result is
//! returned. Every step is reported to the observer.

use crate::config::{PORTFOLIO_MANAGER, PipelineConfig, RISK_ANALYZER, TRADER};
use crate::error::{Error, Result};
use crate::observer::LogObserver;
use barn_agents::{
    Agent, MarketData, PortfolioAgent, PortfolioInput, PortfolioUpdate, RiskAnalysisAgent,
    RiskAssessment, SimulatedVenue, TradeDecision, TradeSignal, TradingAgent,
};
use barn_ports::{ExecutionVenue, PipelineEvent, PipelineObserver, Stage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Outputs of one completed tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickResult {
    pub tick_id: Uuid,
    pub risk_analysis: RiskAssessment,
    pub trade_decision: TradeDecision,
    pub portfolio_update: PortfolioUpdate,
}

pub struct Orchestrator {
    risk_analyzer: RiskAnalysisAgent,
    trader: TradingAgent,
    portfolio_manager: PortfolioAgent,
    observer: Arc<dyn PipelineObserver>,
    ticks_completed: u64,
}

impl Orchestrator {
    /// Pipeline over a [`SimulatedVenue`], reporting to the log
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_venue(config, Arc::new(SimulatedVenue::new()), Arc::new(LogObserver))
    }

    pub fn with_venue(
        config: PipelineConfig,
        venue: Arc<dyn ExecutionVenue>,
        observer: Arc<dyn PipelineObserver>,
    ) -> Self {
        Self::from_agents(
            RiskAnalysisAgent::new(RISK_ANALYZER, config.risk_analysis),
            TradingAgent::new(TRADER, config.trading, venue),
            PortfolioAgent::new(PORTFOLIO_MANAGER, config.portfolio),
            observer,
        )
    }

    /// Assemble from prepared agents
    pub fn from_agents(
        risk_analyzer: RiskAnalysisAgent,
        trader: TradingAgent,
        portfolio_manager: PortfolioAgent,
        observer: Arc<dyn PipelineObserver>,
    ) -> Self {
        Self {
            risk_analyzer,
            trader,
            portfolio_manager,
            observer,
            ticks_completed: 0,
        }
    }

    /// Builder: Replace the observer
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn risk_analyzer(&self) -> &RiskAnalysisAgent {
        &self.risk_analyzer
    }

    pub fn risk_analyzer_mut(&mut self) -> &mut RiskAnalysisAgent {
        &mut self.risk_analyzer
    }

    pub fn trader(&self) -> &TradingAgent {
        &self.trader
    }

    pub fn portfolio_manager(&self) -> &PortfolioAgent {
        &self.portfolio_manager
    }

    pub fn ticks_completed(&self) -> u64 {
        self.ticks_completed
    }

    /// Run every agent over one tick of market data
    pub async fn run(&mut self, data: MarketData) -> Result<TickResult> {
        let tick_id = Uuid::new_v4();
        self.emit(PipelineEvent::TickStarted {
            tick_id,
            token: data.signal.token.clone(),
        });

        self.risk_analyzer.on_market_data(&data);
        self.trader.on_market_data(&data);
        self.portfolio_manager.on_market_data(&data);

        let MarketData {
            signal,
            portfolio,
            historical_returns,
        } = data;

        // Risk analysis
        self.risk_analyzer.update_state(signal);
        let risk_analysis = match self.risk_analyzer.run().await {
            Ok(assessment) => assessment,
            Err(e) => return Err(self.fail(tick_id, Stage::RiskAnalysis, e)),
        };
        if let Some(breach) = &risk_analysis.breach {
            self.emit(PipelineEvent::RiskBreach {
                tick_id,
                token: breach.token.clone(),
                level: breach.level,
                limit: breach.limit,
            });
        }
        self.emit(PipelineEvent::StageCompleted {
            tick_id,
            stage: Stage::RiskAnalysis,
        });

        // Trade decision
        let mut trade_signal = TradeSignal::new(
            risk_analysis.token.clone(),
            risk_analysis.risk_score,
            risk_analysis.price_trend,
        );
        if let Some(price) = self.trader.reference_price(&risk_analysis.token) {
            trade_signal = trade_signal.with_reference_price(price);
        }
        self.trader.update_state(trade_signal);
        let trade_decision = match self.trader.run().await {
            Ok(decision) => decision,
            Err(e) => return Err(self.fail(tick_id, Stage::TradeDecision, e)),
        };
        match &trade_decision {
            TradeDecision::Executed(trade) => self.emit(PipelineEvent::TradeExecuted {
                tick_id,
                token: trade.token.clone(),
                action: trade.action,
                size: trade.size,
                transaction_id: trade.transaction_id.clone(),
            }),
            TradeDecision::Hold { token, reason } => self.emit(PipelineEvent::TradeHeld {
                tick_id,
                token: token.clone(),
                reason: reason.clone(),
            }),
        }
        self.emit(PipelineEvent::StageCompleted {
            tick_id,
            stage: Stage::TradeDecision,
        });

        // Portfolio update
        self.portfolio_manager.update_state(PortfolioInput {
            current_allocation: portfolio,
            historical_returns,
        });
        let portfolio_update = match self.portfolio_manager.run().await {
            Ok(update) => update,
            Err(e) => return Err(self.fail(tick_id, Stage::PortfolioUpdate, e)),
        };
        self.emit(PipelineEvent::StageCompleted {
            tick_id,
            stage: Stage::PortfolioUpdate,
        });

        self.ticks_completed += 1;
        self.emit(PipelineEvent::TickCompleted { tick_id });

        Ok(TickResult {
            tick_id,
            risk_analysis,
            trade_decision,
            portfolio_update,
        })
    }

    fn emit(&self, event: PipelineEvent) {
        self.observer.on_event(&event);
    }

    fn fail(&self, tick_id: Uuid, stage: Stage, error: barn_agents::Error) -> Error {
        self.emit(PipelineEvent::TickFailed {
            tick_id,
            stage,
            error: error.to_string(),
        });
        Error::Agent(error)
    }
}
