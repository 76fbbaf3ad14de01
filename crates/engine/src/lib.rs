pub mod error;
pub mod guard;
pub mod undo;

pub use error::EngineError;
pub use guard::{format_fetch_token, parse_fetch_token, FetchGuard};
pub use undo::{CommandStack, StackTarget};

use chrono::{DateTime, SubsecRound, Utc};
use tracing::debug;

use watchlog_core::{Action, Command, Record, RecordKind};
use watchlog_storage::{SqliteStore, Store};

/// What a replayed history entry did.
#[derive(Debug)]
pub enum Replay {
    Applied(Record),
    Empty,
}

/// Single-writer core: every mutation funnels through one execution path
/// that persists the change and pushes its inverse onto a history stack.
pub struct Engine {
    store: SqliteStore,
    stacks: CommandStack,
    guard: FetchGuard,
}

impl Engine {
    pub fn new(store: SqliteStore) -> Self {
        Self {
            store,
            stacks: CommandStack::new(),
            guard: FetchGuard::new(),
        }
    }

    /// Like `new`, but caps the undo history at `depth` commands, dropping
    /// the oldest entries once the cap is reached.
    pub fn with_undo_depth(store: SqliteStore, depth: usize) -> Self {
        Self {
            store,
            stacks: CommandStack::with_max_depth(depth),
            guard: FetchGuard::new(),
        }
    }

    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SqliteStore {
        &mut self.store
    }

    pub fn undo_depth(&self) -> usize {
        self.stacks.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.stacks.redo_depth()
    }

    pub fn last_fetch(&self) -> DateTime<Utc> {
        self.guard.last_fetch()
    }

    // ========================================================================
    // Listings
    // ========================================================================

    /// List every record of one kind and move the fetch marker. The returned
    /// token is what clients echo back in later mutations.
    pub fn fetch(&mut self, kind: RecordKind) -> Result<(Vec<Record>, DateTime<Utc>), EngineError> {
        let records = self.store.list(kind)?;
        let token = self.guard.record_fetch();
        debug!(kind = %kind, count = records.len(), "listed records");
        Ok((records, token))
    }

    // ========================================================================
    // User Mutations
    // ========================================================================

    /// Persist a client-submitted record: an add when it carries no id, a
    /// full-row update when it does. Stamps `last_updated`, pushes the
    /// inverse onto the undo stack, and clears the redo stack.
    pub fn submit(
        &mut self,
        mut record: Record,
        token: Option<DateTime<Utc>>,
    ) -> Result<Record, EngineError> {
        self.guard.check(token)?;

        record.set_last_updated(Utc::now().trunc_subsecs(6));
        let action = match record.id() {
            None => Action::Add,
            Some(_) => Action::Update,
        };
        let stored = self.execute(Command::new(action, record), StackTarget::Undo)?;
        self.stacks.clear_redo();
        Ok(stored)
    }

    /// Delete a record by id, pushing an add of the captured row onto the
    /// undo stack and clearing the redo stack.
    pub fn remove(
        &mut self,
        kind: RecordKind,
        id: i64,
        token: Option<DateTime<Utc>>,
    ) -> Result<Record, EngineError> {
        self.guard.check(token)?;

        let current = self
            .store
            .get(kind, id)?
            .ok_or(EngineError::NotFound { kind, id })?;
        let removed = self.execute(Command::new(Action::Delete, current), StackTarget::Undo)?;
        self.stacks.clear_redo();
        Ok(removed)
    }

    // ========================================================================
    // Undo / Redo
    // ========================================================================

    /// Replay the most recent undo entry. Returns `Empty` when there is
    /// nothing to undo; the redo stack is left untouched either way.
    pub fn undo(&mut self, token: Option<DateTime<Utc>>) -> Result<Replay, EngineError> {
        self.guard.check(token)?;
        self.replay(StackTarget::Undo)
    }

    /// Replay the most recent redo entry. Returns `Empty` when there is
    /// nothing to redo.
    pub fn redo(&mut self, token: Option<DateTime<Utc>>) -> Result<Replay, EngineError> {
        self.guard.check(token)?;
        self.replay(StackTarget::Redo)
    }

    fn replay(&mut self, source: StackTarget) -> Result<Replay, EngineError> {
        let command = match self.stacks.pop(source) {
            Some(command) => command,
            None => return Ok(Replay::Empty),
        };

        match self.execute(command.clone(), source.opposite()) {
            Ok(record) => Ok(Replay::Applied(record)),
            Err(err) => {
                // Put the entry back so a failed replay leaves history intact.
                self.stacks.push(source, command);
                Err(err)
            }
        }
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// The single execution path for every mutation, user-initiated or
    /// replayed. Captures the prior row, persists the change, and only then
    /// pushes the inverse command onto `target`, so a failed mutation leaves
    /// both stacks untouched.
    fn execute(&mut self, command: Command, target: StackTarget) -> Result<Record, EngineError> {
        let Command { action, record } = command;
        let kind = record.kind();

        match action {
            Action::Add => {
                let stored = self.store.insert(record)?;
                self.stacks
                    .push(target, Command::new(Action::Delete, stored.clone()));
                debug!(kind = %kind, id = ?stored.id(), action = Action::Add.name(), "executed command");
                Ok(stored)
            }
            Action::Update => {
                let id = record.id().ok_or(EngineError::MissingId { kind })?;
                let prior = self
                    .store
                    .get(kind, id)?
                    .ok_or(EngineError::NotFound { kind, id })?;
                let stored = self.store.replace(record)?;
                self.stacks
                    .push(target, Command::new(Action::Update, prior));
                debug!(kind = %kind, id, action = Action::Update.name(), "executed command");
                Ok(stored)
            }
            Action::Delete => {
                let id = record.id().ok_or(EngineError::MissingId { kind })?;
                let prior = self
                    .store
                    .get(kind, id)?
                    .ok_or(EngineError::NotFound { kind, id })?;
                self.store.delete(kind, id)?;
                self.stacks
                    .push(target, Command::new(Action::Add, prior.clone()));
                debug!(kind = %kind, id, action = Action::Delete.name(), "executed command");
                Ok(prior)
            }
        }
    }
}
