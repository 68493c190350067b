//! Per-invocation deploy context
//!
//! Created once per deploy and passed down the call chain. Facts discovered
//! about the target while deploying (its home directory) are resolved lazily
//! and cached here, never in process-wide state.

use std::cell::OnceCell;
use std::path::PathBuf;
use std::time::Duration;

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::domain::ports::{Answer, CommandExecutor, InteractiveError};
use crate::domain::value_objects::HostIdentity;
use crate::error::{DeployError, DeployResult};

/// Default per-prompt timeout for interactive transfers
pub const DEFAULT_INTERACTIVE_TIMEOUT: Duration = Duration::from_secs(1800);

/// Prompts the ssh transport may stop at, in answer order
const TRANSPORT_PROMPTS: [&str; 2] = ["Are you sure you want to continue connecting", ".* password:"];

#[derive(Debug)]
pub struct DeployContext {
    target: HostIdentity,
    local_user: String,
    local_tmpdir: PathBuf,
    password: Option<SecretString>,
    interactive_timeout: Duration,
    remote_home: OnceCell<String>,
}

impl DeployContext {
    pub fn new(
        target: HostIdentity,
        local_user: impl Into<String>,
        local_tmpdir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            target,
            local_user: local_user.into(),
            local_tmpdir: local_tmpdir.into(),
            password: None,
            interactive_timeout: DEFAULT_INTERACTIVE_TIMEOUT,
            remote_home: OnceCell::new(),
        }
    }

    /// Password typed at the transport's password prompt
    pub fn with_password(mut self, password: SecretString) -> Self {
        self.password = Some(password);
        self
    }

    pub fn with_interactive_timeout(mut self, timeout: Duration) -> Self {
        self.interactive_timeout = timeout;
        self
    }

    pub fn target(&self) -> &HostIdentity {
        &self.target
    }

    pub fn local_user(&self) -> &str {
        &self.local_user
    }

    pub fn interactive_timeout(&self) -> Duration {
        self.interactive_timeout
    }

    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    /// `<tmp>/<local user>/deploy/<host>/<user>/<port>/git`
    ///
    /// Dedicated to the mirror staging clones of this target; anything else
    /// placed here is pruned.
    pub fn staging_root(&self) -> PathBuf {
        self.local_tmpdir
            .join(&self.local_user)
            .join("deploy")
            .join(self.target.host())
            .join(self.target.user())
            .join(self.target.port().to_string())
            .join("git")
    }

    /// `<tmp>/<local user>/push/<host>/port-<port>/<user>`
    pub fn push_clone_parent(&self) -> PathBuf {
        self.local_tmpdir
            .join(&self.local_user)
            .join("push")
            .join(self.target.host())
            .join(format!("port-{}", self.target.port()))
            .join(self.target.user())
    }

    /// Home directory of the deploy user on the target, asked for once
    pub fn remote_home<E: CommandExecutor>(&self, remote: &E) -> DeployResult<&str> {
        if let Some(home) = self.remote_home.get() {
            return Ok(home.as_str());
        }
        let home = remote.run("pwd").map_err(|source| DeployError::Remote {
            host: self.target.to_string(),
            source,
        })?;
        debug!("[{}] home directory is {}", self.target, home);
        Ok(self.remote_home.get_or_init(|| home).as_str())
    }

    /// Patterns for host-key confirmation and password prompts
    pub fn transport_prompts(&self) -> Vec<Regex> {
        TRANSPORT_PROMPTS
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect()
    }

    /// Answers matching `transport_prompts` by position.
    ///
    /// Without a password only the host-key question is answered.
    pub fn transport_answers(&self) -> Vec<Answer> {
        let mut answers = vec![Answer::line("yes")];
        if let Some(password) = &self.password {
            answers.push(Answer::secret(SecretString::from(
                password.expose_secret().to_string(),
            )));
        }
        answers
    }
}

/// Map a failed interactive transfer into the deploy error taxonomy
pub(crate) fn transfer_error(destination: &str, err: InteractiveError) -> DeployError {
    match err {
        InteractiveError::TimedOut { after, .. } => DeployError::InteractiveTimeout {
            destination: destination.to_string(),
            seconds: after.as_secs(),
        },
        source => DeployError::TransferFailed {
            destination: destination.to_string(),
            source,
        },
    }
}

/// Join a remote path onto a base, leaving absolute paths alone
pub fn remote_join(base: &str, path: &str) -> String {
    if path.starts_with('/') {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::RecordingExecutor;

    fn context() -> DeployContext {
        DeployContext::new(HostIdentity::new("deploy", "web1", 2222), "alice", "/tmp")
    }

    #[test]
    fn staging_root_is_keyed_by_target() {
        assert_eq!(
            context().staging_root(),
            PathBuf::from("/tmp/alice/deploy/web1/deploy/2222/git")
        );
    }

    #[test]
    fn push_clones_live_apart_from_staging() {
        assert_eq!(
            context().push_clone_parent(),
            PathBuf::from("/tmp/alice/push/web1/port-2222/deploy")
        );
    }

    #[test]
    fn remote_home_is_resolved_once() {
        let remote = RecordingExecutor::new().respond("pwd", "/home/deploy\n");
        let ctx = context();

        assert_eq!(ctx.remote_home(&remote).unwrap(), "/home/deploy");
        assert_eq!(ctx.remote_home(&remote).unwrap(), "/home/deploy");
        assert_eq!(remote.commands(), vec!["pwd"]);
    }

    #[test]
    fn remote_home_failure_is_a_remote_error() {
        let remote = RecordingExecutor::new().fail("pwd", 255, "Connection refused");
        let err = context().remote_home(&remote).unwrap_err();
        assert!(matches!(err, DeployError::Remote { .. }));
    }

    #[test]
    fn transport_prompts_compile() {
        assert_eq!(context().transport_prompts().len(), TRANSPORT_PROMPTS.len());
    }

    #[test]
    fn answers_follow_prompt_order() {
        let ctx = context().with_password(SecretString::from("s3cret".to_string()));
        let answers = ctx.transport_answers();
        assert_eq!(answers[0].reveal(), "yes");
        assert_eq!(answers[1].reveal(), "s3cret");
        assert_eq!(answers[1].redacted(), "********");
    }

    #[test]
    fn password_prompt_unanswered_without_password() {
        assert_eq!(context().transport_answers().len(), 1);
    }

    #[test]
    fn timeouts_keep_their_own_error() {
        let err = transfer_error(
            "deploy@web1:git",
            InteractiveError::TimedOut {
                command: "rsync".to_string(),
                after: Duration::from_secs(1800),
            },
        );
        assert!(matches!(err, DeployError::InteractiveTimeout { seconds: 1800, .. }));

        let err = transfer_error(
            "deploy@web1:git",
            InteractiveError::Exited {
                command: "rsync".to_string(),
                code: 12,
                signal: None,
            },
        );
        assert!(matches!(err, DeployError::TransferFailed { .. }));
        assert!(err.to_string().contains("exit status 12"));
    }

    #[test]
    fn remote_join_rules() {
        assert_eq!(remote_join("/home/deploy", "git"), "/home/deploy/git");
        assert_eq!(remote_join("/home/deploy/", "opt/app"), "/home/deploy/opt/app");
        assert_eq!(remote_join("/home/deploy", "/srv/app"), "/srv/app");
        assert_eq!(remote_join("", "git"), "git");
    }
}
