//! Coarse progress notifications for a valuation job

use std::sync::Mutex;

use chrono::Utc;
use serde::Serialize;

/// Milestones reported during a valuation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStage {
    Initialization,
    DataPreparation,
    CalculationStart,
    CalculationMidpoint,
    Finalization,
    Completed,
    Error,
}

impl ProgressStage {
    pub fn percentage(self) -> u8 {
        match self {
            ProgressStage::Initialization => 0,
            ProgressStage::DataPreparation => 10,
            ProgressStage::CalculationStart => 25,
            ProgressStage::CalculationMidpoint => 60,
            ProgressStage::Finalization => 90,
            ProgressStage::Completed => 100,
            ProgressStage::Error => 0,
        }
    }
}

/// One progress notification
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    #[serde(rename = "job_id")]
    pub job_id: String,
    pub stage: ProgressStage,
    pub percentage: u8,
    pub message: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    pub processed_employees: usize,
    pub total_employees: usize,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub completed: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

impl ProgressUpdate {
    pub fn new(job_id: &str, stage: ProgressStage, message: impl Into<String>) -> Self {
        Self {
            job_id: job_id.to_string(),
            stage,
            percentage: stage.percentage(),
            message: message.into(),
            timestamp: Utc::now().timestamp_millis(),
            processed_employees: 0,
            total_employees: 0,
            completed: stage == ProgressStage::Completed,
            error: stage == ProgressStage::Error,
        }
    }

    pub fn with_counts(mut self, processed: usize, total: usize) -> Self {
        self.processed_employees = processed;
        self.total_employees = total;
        self
    }
}

/// Receiver of progress notifications
pub trait ProgressSink: Sync {
    fn notify(&self, update: ProgressUpdate);
}

/// Sink that discards every update
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn notify(&self, _update: ProgressUpdate) {}
}

/// Sink that writes updates to the log
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn notify(&self, update: ProgressUpdate) {
        if update.error {
            log::error!("[{}] valuation failed: {}", update.job_id, update.message);
        } else {
            log::info!(
                "[{}] {:>3}% {:?}: {}",
                update.job_id,
                update.percentage,
                update.stage,
                update.message
            );
        }
    }
}

/// Sink that keeps every update in memory
#[derive(Default)]
pub struct RecordingProgress {
    updates: Mutex<Vec<ProgressUpdate>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<ProgressUpdate> {
        self.updates.lock().map(|u| u.clone()).unwrap_or_default()
    }

    pub fn stages(&self) -> Vec<ProgressStage> {
        self.updates().iter().map(|u| u.stage).collect()
    }
}

impl ProgressSink for RecordingProgress {
    fn notify(&self, update: ProgressUpdate) {
        if let Ok(mut updates) = self.updates.lock() {
            updates.push(update);
        }
    }
}
