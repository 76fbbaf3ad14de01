pub mod commands;
pub mod records;

pub use commands::{Action, Command};
pub use records::{Movie, Record, RecordKind, Show, Webcomic};
