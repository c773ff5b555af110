use std::collections::VecDeque;

use log::debug;

use super::{Command, HistoryEntry};
use crate::error::CommandError;
use crate::state::CanvasState;

/// Undo stack of executed commands. There is no redo; the oldest entries are
/// dropped once `limit` is reached.
///
/// Continuous edits (a pan drag, a slider drag) are bracketed by
/// [`History::begin_merge`] and [`History::end_merge`]. Inside one bracket,
/// [`History::execute_merged`] folds same-kind commands into the first entry
/// of the bracket; entries never merge across brackets.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
    /// A merge bracket is open
    merging: bool,
    /// The newest entry was pushed inside the open bracket
    merge_target: bool,
}

impl Default for History {
    fn default() -> Self {
        Self::new(100)
    }
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit: limit.max(1),
            merging: false,
            merge_target: false,
        }
    }

    /// Execute a command against `state` and record its entry
    pub fn execute(&mut self, state: &mut CanvasState, command: Command) -> Result<(), CommandError> {
        if let Some(entry) = command.execute(state)? {
            self.push(entry);
        }
        Ok(())
    }

    /// Start a continuous edit. The next merged command opens a new entry.
    pub fn begin_merge(&mut self) {
        self.merging = true;
        self.merge_target = false;
    }

    pub fn end_merge(&mut self) {
        self.merging = false;
        self.merge_target = false;
    }

    /// Like [`Self::execute`], but inside a merge bracket a command of the same
    /// kind as the bracket's entry is folded into it, so one undo returns to the
    /// value before the edit started. Outside a bracket this is `execute`.
    pub fn execute_merged(&mut self, state: &mut CanvasState, command: Command) -> Result<(), CommandError> {
        let Some(entry) = command.execute(state)? else {
            return Ok(());
        };
        let fold = self.merge_target && self.entries.back().is_some_and(|last| last.same_kind(&entry));
        if !fold {
            self.push(entry);
            self.merge_target = self.merging;
        }
        Ok(())
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        if self.entries.len() == self.limit {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
        self.merge_target = false;
    }

    /// Undo the newest entry. Returns false when there is nothing to undo.
    pub fn undo(&mut self, state: &mut CanvasState) -> bool {
        self.merge_target = false;
        match self.entries.pop_back() {
            Some(entry) => {
                entry.undo(state);
                true
            }
            None => {
                debug!("Nothing to undo");
                false
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.merge_target = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SettingsPatch;
    use egui::Vec2;

    #[test]
    fn test_limit_drops_oldest() {
        let mut state = CanvasState::default();
        let mut history = History::new(3);
        for _ in 0..5 {
            history.execute(&mut state, Command::ToggleGrayscale).unwrap();
        }
        assert_eq!(history.len(), 3);
        while history.undo(&mut state) {}
        // Back to the state after the second toggle, the oldest one kept
        assert!(!state.settings().grayscale());
    }

    fn brightness(value: f32) -> Command {
        Command::UpdateSettings(SettingsPatch {
            brightness: Some(value),
            ..SettingsPatch::default()
        })
    }

    #[test]
    fn test_merged_edits_undo_in_one_step() {
        let mut state = CanvasState::default();
        let mut history = History::default();
        history.begin_merge();
        for value in [110.0, 120.0, 130.0] {
            let patch = SettingsPatch {
                brightness: Some(value),
                ..SettingsPatch::default()
            };
            history.execute_merged(&mut state, Command::UpdateSettings(patch)).unwrap();
        }
        history.end_merge();
        assert_eq!(history.len(), 1);
        assert_eq!(state.settings().brightness(), 130.0);
        assert!(history.undo(&mut state));
        assert_eq!(state.settings().brightness(), 100.0);
        assert!(!history.undo(&mut state));
    }

    #[test]
    fn test_separate_pan_drags_undo_separately() {
        let mut state = CanvasState::default();
        let mut history = History::default();

        history.begin_merge();
        history.execute_merged(&mut state, Command::MovePan(Vec2::new(4.0, 0.0))).unwrap();
        history.execute_merged(&mut state, Command::MovePan(Vec2::new(6.0, 0.0))).unwrap();
        history.end_merge();

        history.begin_merge();
        history.execute_merged(&mut state, Command::MovePan(Vec2::new(5.0, 0.0))).unwrap();
        history.end_merge();

        assert_eq!(history.len(), 2);
        assert!(history.undo(&mut state));
        assert_eq!(state.settings().pan(), Vec2::new(10.0, 0.0));
        assert!(history.undo(&mut state));
        assert_eq!(state.settings().pan(), Vec2::ZERO);
    }

    #[test]
    fn test_late_first_change_opens_its_own_entry() {
        let mut state = CanvasState::default();
        let mut history = History::default();
        history.begin_merge();
        history.execute_merged(&mut state, brightness(120.0)).unwrap();
        history.end_merge();

        // The second drag starts without a value change on its first frame
        history.begin_merge();
        history.execute_merged(&mut state, brightness(140.0)).unwrap();
        history.execute_merged(&mut state, brightness(150.0)).unwrap();
        history.end_merge();

        assert_eq!(history.len(), 2);
        assert!(history.undo(&mut state));
        assert_eq!(state.settings().brightness(), 120.0);
    }

    #[test]
    fn test_merge_outside_bracket_records_each_command() {
        let mut state = CanvasState::default();
        let mut history = History::default();
        history.execute_merged(&mut state, brightness(110.0)).unwrap();
        history.execute_merged(&mut state, brightness(120.0)).unwrap();
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_other_command_splits_an_open_bracket() {
        let mut state = CanvasState::default();
        let mut history = History::default();
        history.begin_merge();
        history.execute_merged(&mut state, Command::MovePan(Vec2::new(1.0, 0.0))).unwrap();
        history.execute(&mut state, Command::ToggleGrayscale).unwrap();
        history.execute_merged(&mut state, Command::MovePan(Vec2::new(1.0, 0.0))).unwrap();
        history.end_merge();
        assert_eq!(history.len(), 3);
    }
}
