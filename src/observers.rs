use crate::status::{MissionStatus, StatusTransition};

/// Trait for mission status observation
pub trait MissionObserver {
    /// Called after a mission or delivery changed status
    fn on_status_change(&self, subject: &str, transition: &StatusTransition);
}

/// Logs every status change that occurs
#[derive(Debug)]
pub struct TransitionLogger;

impl MissionObserver for TransitionLogger {
    fn on_status_change(&self, subject: &str, transition: &StatusTransition) {
        tracing::info!(
            subject,
            from = %transition.from,
            to = %transition.to,
            event = ?transition.event,
            "mission transition"
        );
    }
}

/// Raises a warning when a mission ends in failure
#[derive(Debug)]
pub struct FailureAlarm;

impl MissionObserver for FailureAlarm {
    fn on_status_change(&self, subject: &str, transition: &StatusTransition) {
        if transition.to == MissionStatus::Failed {
            tracing::warn!(subject, "mission aborted before launch");
        }
    }
}
