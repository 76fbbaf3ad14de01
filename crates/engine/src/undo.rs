use std::collections::VecDeque;

use watchlog_core::Command;

/// Which history stack a mutation's inverse lands on. User-initiated
/// mutations and redo replays push onto the undo stack; undo replays push
/// onto the redo stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackTarget {
    Undo,
    Redo,
}

impl StackTarget {
    pub fn opposite(self) -> Self {
        match self {
            Self::Undo => Self::Redo,
            Self::Redo => Self::Undo,
        }
    }
}

/// The paired undo/redo history. Both stacks are LIFO; depth is unbounded
/// unless a max depth is set, in which case the oldest undo entries are
/// dropped first. The redo stack never needs its own bound since redo
/// entries only ever come from popped undo entries.
pub struct CommandStack {
    undo: VecDeque<Command>,
    redo: VecDeque<Command>,
    max_depth: Option<usize>,
}

impl CommandStack {
    pub fn new() -> Self {
        Self {
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            max_depth: None,
        }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            max_depth: Some(max_depth),
        }
    }

    pub fn push(&mut self, target: StackTarget, command: Command) {
        match target {
            StackTarget::Undo => {
                self.undo.push_back(command);
                // Enforce depth limit by dropping the oldest entry
                if let Some(max_depth) = self.max_depth
                    && self.undo.len() > max_depth
                {
                    self.undo.pop_front();
                }
            }
            StackTarget::Redo => self.redo.push_back(command),
        }
    }

    pub fn pop(&mut self, target: StackTarget) -> Option<Command> {
        match target {
            StackTarget::Undo => self.undo.pop_back(),
            StackTarget::Redo => self.redo.pop_back(),
        }
    }

    pub fn clear_redo(&mut self) {
        self.redo.clear();
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }
}

impl Default for CommandStack {
    fn default() -> Self {
        Self::new()
    }
}
