//! Pipeline observers
//!
//! [`LogObserver`] writes events to the `log` facade, [`RecordingObserver`]
//! keeps them in memory for later inspection.

use barn_ports::{PipelineEvent, PipelineObserver};
use log::{debug, error, info, warn};
use std::sync::Mutex;

/// Writes every event as one log line
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl PipelineObserver for LogObserver {
    fn on_event(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::TickStarted { tick_id, token } => {
                debug!("[ORCHESTRATOR] tick {} started for {}", tick_id, token)
            }
            PipelineEvent::StageCompleted { tick_id, stage } => {
                debug!("[ORCHESTRATOR] tick {} {} done", tick_id, stage)
            }
            PipelineEvent::RiskBreach {
                tick_id,
                token,
                level,
                limit,
            } => warn!(
                "[ORCHESTRATOR] tick {} risk breach on {}: {:.4} > {:.4}",
                tick_id, token, level, limit
            ),
            PipelineEvent::TradeExecuted {
                tick_id,
                token,
                action,
                size,
                transaction_id,
            } => info!(
                "[ORCHESTRATOR] tick {} {} {} {:.4} ({})",
                tick_id, action, token, size, transaction_id
            ),
            PipelineEvent::TradeHeld {
                tick_id,
                token,
                reason,
            } => info!("[ORCHESTRATOR] tick {} hold {}: {}", tick_id, token, reason),
            PipelineEvent::TickCompleted { tick_id } => {
                info!("[ORCHESTRATOR] tick {} completed", tick_id)
            }
            PipelineEvent::TickFailed {
                tick_id,
                stage,
                error,
            } => error!(
                "[ORCHESTRATOR] tick {} failed in {}: {}",
                tick_id, stage, error
            ),
        }
    }
}

/// Keeps every event in arrival order
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<PipelineEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events seen so far
    pub fn events(&self) -> Vec<PipelineEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn clear(&self) {
        match self.events.lock() {
            Ok(mut events) => events.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}
