//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod command_executor;
pub mod history_repository;
pub mod interactive;

pub use command_executor::{CommandExecutor, CommandOutput, CommandRequest, ExecError, ExecResult};
pub use history_repository::{HistoryRepository, HistoryStoreError};
pub use interactive::{
    Answer, InteractiveCommand, InteractiveError, InteractiveReport, InteractiveRunner,
    RunnerState,
};
