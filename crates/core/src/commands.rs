use crate::records::{Record, RecordKind};

/// What a command does to its record when executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    Update,
    Delete,
}

impl Action {
    /// String name of the action for logging.
    pub fn name(self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }
}

/// A single invertible mutation: an action plus the full record state it
/// applies. Executing a command while capturing the prior row yields the
/// inverse command, so the same type flows through both history stacks.
/// History lives only in memory and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub action: Action,
    pub record: Record,
}

impl Command {
    pub fn new(action: Action, record: Record) -> Self {
        Self { action, record }
    }

    pub fn kind(&self) -> RecordKind {
        self.record.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Webcomic;

    #[test]
    fn command_reports_record_kind() {
        let command = Command::new(
            Action::Delete,
            Record::Webcomic(Webcomic {
                id: Some(1),
                name: "Lackadaisy".into(),
                last_updated: None,
            }),
        );

        assert_eq!(command.kind(), RecordKind::Webcomic);
        assert_eq!(command.action.name(), "Delete");
    }
}
