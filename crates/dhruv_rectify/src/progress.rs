//! Progress reporting during a search.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    Started,
    Running,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEvent {
    pub status: ProgressStatus,
    /// Fraction done in [0, 1].
    pub progress: f64,
    pub stage: String,
}

impl ProgressEvent {
    pub(crate) fn new(status: ProgressStatus, progress: f64, stage: impl Into<String>) -> Self {
        Self {
            status,
            progress: progress.clamp(0.0, 1.0),
            stage: stage.into(),
        }
    }
}

/// Receives progress events. Called from the searching thread only.
pub trait ProgressSink {
    fn report(&self, event: &ProgressEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _event: &ProgressEvent) {}
}

/// Logs each event at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&self, event: &ProgressEvent) {
        tracing::info!(
            status = ?event.status,
            progress = event.progress,
            stage = %event.stage,
            "rectification progress"
        );
    }
}

impl<F> ProgressSink for F
where
    F: Fn(&ProgressEvent),
{
    fn report(&self, event: &ProgressEvent) {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn closures_are_sinks() {
        let seen = RefCell::new(Vec::new());
        let sink = |e: &ProgressEvent| seen.borrow_mut().push(e.status);
        sink.report(&ProgressEvent::new(ProgressStatus::Started, 0.0, "start"));
        sink.report(&ProgressEvent::new(ProgressStatus::Completed, 1.0, "done"));
        assert_eq!(*seen.borrow(), vec![ProgressStatus::Started, ProgressStatus::Completed]);
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(ProgressEvent::new(ProgressStatus::Running, 1.7, "x").progress, 1.0);
    }
}
