//! CSV action state machine (process/analyze).
//!
//! Ensures only one action runs at a time per ingest session.

/// Slot state for serializing process and analyze actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionState {
    #[default]
    Idle,
    BusyProcess,
    BusyAnalyze,
}

impl ActionState {
    /// True if a process action can be started.
    pub fn can_start_process(self) -> bool {
        matches!(self, ActionState::Idle)
    }

    /// True if an analyze action can be started.
    pub fn can_start_analyze(self) -> bool {
        matches!(self, ActionState::Idle)
    }

    /// True while either action is in flight.
    pub fn is_busy(self) -> bool {
        !matches!(self, ActionState::Idle)
    }

    /// State after the in-flight action finishes, successfully or not.
    pub fn on_action_done(self) -> Self {
        ActionState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_allows_all_actions() {
        let s = ActionState::Idle;
        assert!(s.can_start_process());
        assert!(s.can_start_analyze());
        assert!(!s.is_busy());
    }

    #[test]
    fn busy_process_blocks_actions() {
        let s = ActionState::BusyProcess;
        assert!(!s.can_start_process());
        assert!(!s.can_start_analyze());
        assert!(s.is_busy());
    }

    #[test]
    fn busy_analyze_blocks_actions() {
        let s = ActionState::BusyAnalyze;
        assert!(!s.can_start_process());
        assert!(!s.can_start_analyze());
    }

    #[test]
    fn action_done_transitions_to_idle() {
        assert_eq!(ActionState::BusyProcess.on_action_done(), ActionState::Idle);
        assert_eq!(ActionState::BusyAnalyze.on_action_done(), ActionState::Idle);
    }
}
