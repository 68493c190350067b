//! Test doubles for driving use cases without hosts or subprocesses

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;

use regex::Regex;

use crate::domain::entities::DeployHistory;
use crate::domain::ports::{
    Answer, CommandExecutor, CommandOutput, CommandRequest, ExecResult, HistoryRepository,
    HistoryStoreError, InteractiveCommand, InteractiveError, InteractiveReport, InteractiveRunner,
    RunnerState,
};

/// Records every request; answers from a table of exact command lines.
///
/// Unknown commands succeed with empty output.
#[derive(Default)]
pub struct RecordingExecutor {
    responses: HashMap<String, CommandOutput>,
    requests: RefCell<Vec<CommandRequest>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, command: &str, stdout: &str) -> Self {
        self.responses.insert(
            command.to_string(),
            CommandOutput {
                code: Some(0),
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        );
        self
    }

    pub fn fail(mut self, command: &str, code: i32, stderr: &str) -> Self {
        self.responses.insert(
            command.to_string(),
            CommandOutput {
                code: Some(code),
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
        );
        self
    }

    pub fn requests(&self) -> Vec<CommandRequest> {
        self.requests.borrow().clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|r| r.command.clone())
            .collect()
    }

    pub fn ran(&self, command: &str) -> bool {
        self.requests.borrow().iter().any(|r| r.command == command)
    }
}

impl CommandExecutor for RecordingExecutor {
    fn location(&self) -> String {
        "recording".to_string()
    }

    fn execute(&self, request: &CommandRequest) -> ExecResult<CommandOutput> {
        self.requests.borrow_mut().push(request.clone());
        Ok(self
            .responses
            .get(&request.command)
            .cloned()
            .unwrap_or(CommandOutput {
                code: Some(0),
                stdout: String::new(),
                stderr: String::new(),
            }))
    }
}

/// Interactive runner that never spawns anything
pub struct ScriptedRunner {
    outcome: Result<InteractiveReport, InteractiveError>,
    calls: RefCell<Vec<InteractiveCommand>>,
    answers_seen: RefCell<Vec<Vec<String>>>,
}

impl ScriptedRunner {
    pub fn succeeding() -> Self {
        Self::with_outcome(Ok(InteractiveReport {
            matched_prompts: vec![],
            final_state: RunnerState::ExitedSuccess,
        }))
    }

    pub fn failing(code: u32) -> Self {
        Self::with_outcome(Err(InteractiveError::Exited {
            command: "scripted".to_string(),
            code,
            signal: None,
        }))
    }

    pub fn timing_out() -> Self {
        Self::with_outcome(Err(InteractiveError::TimedOut {
            command: "scripted".to_string(),
            after: Duration::from_secs(1800),
        }))
    }

    fn with_outcome(outcome: Result<InteractiveReport, InteractiveError>) -> Self {
        Self {
            outcome,
            calls: RefCell::new(vec![]),
            answers_seen: RefCell::new(vec![]),
        }
    }

    pub fn calls(&self) -> Vec<InteractiveCommand> {
        self.calls.borrow().clone()
    }

    /// Redacted answers passed on each call
    pub fn answers_seen(&self) -> Vec<Vec<String>> {
        self.answers_seen.borrow().clone()
    }
}

impl InteractiveRunner for ScriptedRunner {
    fn run(
        &self,
        command: &InteractiveCommand,
        _prompts: &[Regex],
        answers: &[Answer],
        _timeout: Duration,
        sink: &mut dyn Write,
    ) -> Result<InteractiveReport, InteractiveError> {
        self.calls.borrow_mut().push(command.clone());
        self.answers_seen
            .borrow_mut()
            .push(answers.iter().map(|a| a.redacted().to_string()).collect());
        let _ = writeln!(sink, "[local] run: {}", command.display_line());
        self.outcome.clone()
    }
}

/// History files kept in memory, keyed by path
#[derive(Default)]
pub struct InMemoryHistory {
    files: RefCell<HashMap<String, DeployHistory>>,
    corrupted: RefCell<Vec<String>>,
    saves: RefCell<usize>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: &str, history: DeployHistory) -> Self {
        self.files.borrow_mut().insert(path.to_string(), history);
        self
    }

    /// Loads of `path` fail as if the file were unreadable
    pub fn with_corrupted(self, path: &str) -> Self {
        self.corrupted.borrow_mut().push(path.to_string());
        self
    }

    pub fn get(&self, path: &str) -> Option<DeployHistory> {
        self.files.borrow().get(path).cloned()
    }

    /// Replace a file behind the caller's back
    pub fn overwrite(&self, path: &str, history: DeployHistory) {
        self.files.borrow_mut().insert(path.to_string(), history);
    }

    pub fn saves(&self) -> usize {
        *self.saves.borrow()
    }
}

impl HistoryRepository for InMemoryHistory {
    fn load(&self, path: &str) -> Result<Option<DeployHistory>, HistoryStoreError> {
        if self.corrupted.borrow().iter().any(|p| p == path) {
            return Err(HistoryStoreError::Corrupted {
                path: path.to_string(),
                message: "unreadable".to_string(),
            });
        }
        Ok(self.files.borrow().get(path).cloned())
    }

    fn save(&self, history: &DeployHistory, path: &str) -> Result<(), HistoryStoreError> {
        *self.saves.borrow_mut() += 1;
        self.corrupted.borrow_mut().retain(|p| p != path);
        self.files
            .borrow_mut()
            .insert(path.to_string(), history.clone());
        Ok(())
    }
}
