use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MissionError;

/// Lifecycle state shared by missions and deliveries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    /// Resources are reserved, the ship has not left yet
    #[default]
    Preparing,
    /// The ship is underway
    InProgress,
    /// Resources were handed back
    Completed,
    /// The ship could not leave
    Failed,
}

impl MissionStatus {
    /// Resolve the state reached when `event` happens in this state.
    ///
    /// Returns `None` when the pair has no transition. Completed and Failed
    /// have no outgoing transitions.
    #[must_use]
    pub fn next(self, event: MissionEvent) -> Option<Self> {
        match (self, event) {
            (Self::Preparing, MissionEvent::Launch) | (Self::InProgress, MissionEvent::Reassign) => {
                Some(Self::InProgress)
            }
            (Self::Preparing, MissionEvent::Abort) => Some(Self::Failed),
            (Self::InProgress, MissionEvent::Complete) => Some(Self::Completed),
            _ => None,
        }
    }

    /// Whether no further transition can leave this state
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Preparing => "Preparing",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        };
        f.write_str(label)
    }
}

/// Events that move a mission through its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionEvent {
    /// The ship took off
    Launch,
    /// The ship could not take off
    Abort,
    /// The mission moved to another ship while underway
    Reassign,
    /// The mission ended and resources came back
    Complete,
}

/// A recorded status change
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StatusTransition {
    /// The status before the transition
    pub from: MissionStatus,
    /// The status after the transition
    pub to: MissionStatus,
    /// The event that triggered the transition
    pub event: MissionEvent,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

/// Current status plus the transitions that led to it
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Lifecycle {
    /// Current status
    status: MissionStatus,
    /// Every transition applied so far, oldest first
    history: Vec<StatusTransition>,
}

impl Lifecycle {
    /// Start a lifecycle in `Preparing`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status
    #[must_use]
    pub fn status(&self) -> MissionStatus {
        self.status
    }

    /// Transitions applied so far, oldest first
    #[must_use]
    pub fn history(&self) -> &[StatusTransition] {
        &self.history
    }

    /// Apply `event`, recording the transition.
    ///
    /// # Errors
    ///
    /// Returns `MissionError::InvalidState` carrying the current status when
    /// the event has no transition from it. The lifecycle is left unchanged.
    pub fn apply(&mut self, event: MissionEvent) -> Result<StatusTransition, MissionError> {
        let from = self.status;
        let to = from.next(event).ok_or(MissionError::InvalidState(from))?;

        let transition = StatusTransition { from, to, event, timestamp: Utc::now() };
        self.status = to;
        self.history.push(transition.clone());

        Ok(transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        assert_eq!(MissionStatus::Preparing.next(MissionEvent::Launch), Some(MissionStatus::InProgress));
        assert_eq!(MissionStatus::Preparing.next(MissionEvent::Abort), Some(MissionStatus::Failed));
        assert_eq!(
            MissionStatus::InProgress.next(MissionEvent::Complete),
            Some(MissionStatus::Completed)
        );
        assert_eq!(
            MissionStatus::InProgress.next(MissionEvent::Reassign),
            Some(MissionStatus::InProgress)
        );
    }

    #[test]
    fn test_terminal_states_have_no_exit() {
        for event in
            [MissionEvent::Launch, MissionEvent::Abort, MissionEvent::Reassign, MissionEvent::Complete]
        {
            assert_eq!(MissionStatus::Completed.next(event), None);
            assert_eq!(MissionStatus::Failed.next(event), None);
        }
    }

    #[test]
    fn test_invalid_event_leaves_lifecycle_unchanged() {
        let mut lifecycle = Lifecycle::new();

        let result = lifecycle.apply(MissionEvent::Complete);
        assert_eq!(result, Err(MissionError::InvalidState(MissionStatus::Preparing)));
        assert_eq!(lifecycle.status(), MissionStatus::Preparing);
        assert!(lifecycle.history().is_empty());
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_history_tracking() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.apply(MissionEvent::Launch).expect("launch from preparing");
        lifecycle.apply(MissionEvent::Complete).expect("complete from in progress");

        assert_eq!(lifecycle.status(), MissionStatus::Completed);
        assert_eq!(lifecycle.history().len(), 2);

        let first = lifecycle.history().first().expect("history should have an entry");
        assert_eq!(first.from, MissionStatus::Preparing);
        assert_eq!(first.to, MissionStatus::InProgress);
        assert_eq!(first.event, MissionEvent::Launch);
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(MissionStatus::InProgress.to_string(), "In Progress");
        assert_eq!(MissionStatus::Failed.to_string(), "Failed");
    }
}
