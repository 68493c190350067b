//! PTY-backed interactive runner
//!
//! Spawns the command inside a pseudo-terminal so that tools which insist on
//! a terminal for questions (ssh host-key confirmation, password prompts)
//! behave as they would for a person. A reader thread forwards PTY output
//! over a channel; the calling thread matches prompts, answers them, and
//! enforces the per-prompt timeout.

use std::io::{Read, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use portable_pty::{native_pty_system, Child, ChildKiller, CommandBuilder, PtySize};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    Answer, InteractiveCommand, InteractiveError, InteractiveReport, InteractiveRunner,
    RunnerState,
};
use crate::domain::services::ExpectMachine;

enum ReadEvent {
    Data(Vec<u8>),
    Eof,
}

/// Runs interactive commands in a pseudo-terminal
#[derive(Debug, Clone, Copy)]
pub struct PtyRunner {
    size: PtySize,
}

impl Default for PtyRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl PtyRunner {
    pub fn new() -> Self {
        Self {
            // wide enough that rsync progress lines are not wrapped mid-prompt
            size: PtySize {
                rows: 48,
                cols: 200,
                pixel_width: 0,
                pixel_height: 0,
            },
        }
    }
}

impl InteractiveRunner for PtyRunner {
    fn run(
        &self,
        command: &InteractiveCommand,
        prompts: &[Regex],
        answers: &[Answer],
        timeout: Duration,
        sink: &mut dyn Write,
    ) -> Result<InteractiveReport, InteractiveError> {
        let line = command.display_line();
        let io_err = |e: std::io::Error| InteractiveError::Io {
            command: line.clone(),
            message: e.to_string(),
        };
        let spawn_err = |e: anyhow::Error| InteractiveError::Spawn {
            command: line.clone(),
            message: e.to_string(),
        };

        info!("[local] {}", line);
        writeln!(sink, "[local] run: {}", line).map_err(io_err)?;
        sink.flush().map_err(io_err)?;

        let pair = native_pty_system().openpty(self.size).map_err(spawn_err)?;

        let mut builder = CommandBuilder::new(&command.program);
        builder.args(&command.args);
        // portable-pty defaults to $HOME when no directory is given
        let cwd = match &command.cwd {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().map_err(io_err)?,
        };
        builder.cwd(cwd);

        let mut child = pair.slave.spawn_command(builder).map_err(spawn_err)?;
        // only the child may hold the slave end, otherwise EOF never arrives
        drop(pair.slave);

        let mut reader = pair.master.try_clone_reader().map_err(spawn_err)?;
        let mut writer = pair.master.take_writer().map_err(spawn_err)?;

        let (tx, rx) = mpsc::channel();
        let reader_thread = thread::spawn(move || {
            let mut buf = [0u8; 4096];
            loop {
                match reader.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        if tx.send(ReadEvent::Data(buf[..n].to_vec())).is_err() {
                            return;
                        }
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                    // Linux reports EIO on the master once the child side closes
                    Err(_) => break,
                }
            }
            let _ = tx.send(ReadEvent::Eof);
        });

        let mut machine = ExpectMachine::new(prompts);
        let mut deadline = Instant::now() + timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match rx.recv_timeout(remaining) {
                Ok(ReadEvent::Data(bytes)) => {
                    sink.write_all(&bytes).map_err(io_err)?;
                    sink.flush().map_err(io_err)?;

                    for index in machine.feed(&bytes) {
                        deadline = Instant::now() + timeout;
                        match answers.get(index) {
                            Some(answer) => {
                                debug!(
                                    prompt = index,
                                    answer = answer.redacted(),
                                    "answering prompt"
                                );
                                writer
                                    .write_all(format!("{}\n", answer.reveal()).as_bytes())
                                    .map_err(io_err)?;
                                writer.flush().map_err(io_err)?;
                            }
                            None => debug!(prompt = index, "prompt matched without an answer"),
                        }
                    }
                }
                Ok(ReadEvent::Eof) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {
                    machine.timed_out();
                    warn!(
                        "[local] no prompt matched within {}s, killing: {}",
                        timeout.as_secs(),
                        line
                    );
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(InteractiveError::TimedOut {
                        command: line.clone(),
                        after: timeout,
                    });
                }
            }
        }

        let status = child.wait().map_err(io_err)?;
        drop(writer);
        drop(pair.master);
        let _ = reader_thread.join();

        let signal = exit_signal(&status);
        let state = machine.exited(status.exit_code(), signal).clone();
        match state {
            RunnerState::ExitedSuccess => Ok(InteractiveReport {
                matched_prompts: machine.matched().to_vec(),
                final_state: state,
            }),
            RunnerState::ExitedFailure { code, signal } => Err(InteractiveError::Exited {
                command: line.clone(),
                code,
                signal,
            }),
            other => Err(InteractiveError::Io {
                command: line.clone(),
                message: format!("unexpected runner state {:?}", other),
            }),
        }
    }
}

/// Name of the signal that ended the child.
///
/// portable-pty 0.8 keeps the signal private; its `Display` output is
/// `Terminated by <signal>` in that case.
fn exit_signal(status: &portable_pty::ExitStatus) -> Option<String> {
    if status.success() {
        return None;
    }
    status
        .to_string()
        .strip_prefix("Terminated by ")
        .map(str::to_string)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> InteractiveCommand {
        InteractiveCommand::new("sh").arg("-c").arg(script)
    }

    fn ssh_prompts() -> Vec<Regex> {
        vec![
            Regex::new("Are you sure you want to continue connecting").unwrap(),
            Regex::new(".* password:").unwrap(),
        ]
    }

    #[test]
    fn answers_prompts_in_order_and_succeeds() {
        let script = r#"printf 'Are you sure you want to continue connecting (yes/no)? '
read confirm
printf "deploy@web1's password: "
read pass
[ "$confirm" = yes ] && [ "$pass" = secret ]"#;
        let answers = [Answer::line("yes"), Answer::line("secret")];
        let mut out = Vec::new();

        let report = PtyRunner::new()
            .run(
                &sh(script),
                &ssh_prompts(),
                &answers,
                Duration::from_secs(20),
                &mut out,
            )
            .unwrap();

        assert_eq!(report.matched_prompts, vec![0, 1]);
        assert_eq!(report.final_state, RunnerState::ExitedSuccess);
        let transcript = String::from_utf8_lossy(&out);
        assert!(transcript.starts_with("[local] run: sh -c "));
        assert!(transcript.contains("continue connecting"));
    }

    #[test]
    fn nonzero_exit_is_a_failure_with_status() {
        let err = PtyRunner::new()
            .run(
                &sh("echo sending; exit 23"),
                &ssh_prompts(),
                &[],
                Duration::from_secs(20),
                &mut Vec::new(),
            )
            .unwrap_err();
        match err {
            InteractiveError::Exited { code, .. } => assert_eq!(code, 23),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn death_by_signal_reports_the_signal() {
        let err = PtyRunner::new()
            .run(
                &sh("kill -TERM $$"),
                &ssh_prompts(),
                &[],
                Duration::from_secs(20),
                &mut Vec::new(),
            )
            .unwrap_err();
        match err {
            InteractiveError::Exited { signal, .. } => assert!(signal.is_some()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn exit_signal_reads_the_status() {
        assert_eq!(exit_signal(&portable_pty::ExitStatus::with_exit_code(0)), None);
        assert_eq!(exit_signal(&portable_pty::ExitStatus::with_exit_code(3)), None);
        assert_eq!(
            exit_signal(&portable_pty::ExitStatus::with_signal("Terminated")).as_deref(),
            Some("Terminated")
        );
    }

    #[test]
    fn silence_past_the_timeout_is_fatal() {
        let err = PtyRunner::new()
            .run(
                &sh("sleep 10"),
                &ssh_prompts(),
                &[],
                Duration::from_millis(300),
                &mut Vec::new(),
            )
            .unwrap_err();
        assert!(matches!(err, InteractiveError::TimedOut { .. }));
    }

    #[test]
    fn missing_program_is_an_error() {
        let result = PtyRunner::new().run(
            &InteractiveCommand::new("/nonexistent/gitship-tool"),
            &[],
            &[],
            Duration::from_secs(5),
            &mut Vec::new(),
        );
        assert!(result.is_err());
    }
}
