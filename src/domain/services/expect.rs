//! Prompt matcher for interactive runs
//!
//! Accumulates subprocess output and reports which prompt patterns it
//! matched. Matching follows the usual expect rules: the earliest match in
//! the buffer wins, ties go to the pattern listed first, and matched text is
//! consumed so one prompt is never answered twice.

use regex::Regex;

use crate::domain::ports::RunnerState;

/// Unmatched output kept for matching
const MAX_BUFFER: usize = 64 * 1024;

#[derive(Debug)]
pub struct ExpectMachine<'a> {
    prompts: &'a [Regex],
    buffer: String,
    /// Trailing bytes of an incomplete UTF-8 sequence
    pending: Vec<u8>,
    state: RunnerState,
    matched: Vec<usize>,
}

impl<'a> ExpectMachine<'a> {
    pub fn new(prompts: &'a [Regex]) -> Self {
        Self {
            prompts,
            buffer: String::new(),
            pending: Vec::new(),
            state: RunnerState::Running,
            matched: Vec::new(),
        }
    }

    pub fn state(&self) -> &RunnerState {
        &self.state
    }

    /// Every prompt index matched so far, in order
    pub fn matched(&self) -> &[usize] {
        &self.matched
    }

    /// Feed a chunk of output; returns the prompts it completed, in order.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<usize> {
        if self.state.is_terminal() {
            return Vec::new();
        }
        self.state = RunnerState::Running;
        self.decode(bytes);

        let mut hits = Vec::new();
        while let Some((index, end)) = self.earliest_match() {
            self.buffer.drain(..end);
            self.matched.push(index);
            self.state = RunnerState::MatchedPrompt(index);
            hits.push(index);
        }
        self.trim();
        hits
    }

    /// The subprocess exited
    pub fn exited(&mut self, code: u32, signal: Option<String>) -> &RunnerState {
        self.state = if code == 0 && signal.is_none() {
            RunnerState::ExitedSuccess
        } else {
            RunnerState::ExitedFailure { code, signal }
        };
        &self.state
    }

    /// No prompt matched within the timeout window
    pub fn timed_out(&mut self) {
        self.state = RunnerState::TimedOut;
    }

    fn decode(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
        let cut = match std::str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(_) => self.pending.len(),
        };
        let rest = self.pending.split_off(cut);
        self.buffer.push_str(&String::from_utf8_lossy(&self.pending));
        self.pending = rest;
    }

    fn earliest_match(&self) -> Option<(usize, usize)> {
        self.prompts
            .iter()
            .enumerate()
            .filter_map(|(index, re)| {
                re.find_iter(&self.buffer)
                    .find(|m| !m.as_str().is_empty())
                    .map(|m| (m.start(), index, m.end()))
            })
            .min_by_key(|&(start, index, _)| (start, index))
            .map(|(_, index, end)| (index, end))
    }

    fn trim(&mut self) {
        if self.buffer.len() <= MAX_BUFFER {
            return;
        }
        let mut cut = self.buffer.len() - MAX_BUFFER;
        while !self.buffer.is_char_boundary(cut) {
            cut += 1;
        }
        self.buffer.drain(..cut);
    }
}
