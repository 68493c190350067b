//! Host identity value object - who we connect as, where, and on which port.

use std::fmt;

use crate::error::DeployError;

/// Default SSH port
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Execution identity on a target host.
///
/// Parsed from `host`, `user@host`, `host:port` or `user@host:port`.
/// IPv6 literals must be bracketed (`user@[::1]:2222`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostIdentity {
    user: String,
    host: String,
    port: u16,
}

impl HostIdentity {
    pub fn new(user: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            user: user.into(),
            host: host.into(),
            port,
        }
    }

    /// Parse a host string, filling in the user and port when omitted.
    pub fn parse(input: &str, default_user: &str, default_port: u16) -> Result<Self, DeployError> {
        let invalid = |reason: &str| DeployError::InvalidHost {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty host"));
        }

        let (user, rest) = match trimmed.rsplit_once('@') {
            Some((u, r)) if !u.is_empty() => (u.to_string(), r),
            Some(_) => return Err(invalid("empty user before '@'")),
            None => (default_user.to_string(), trimmed),
        };

        let (host, port) = if let Some(bracketed) = rest.strip_prefix('[') {
            let (host, after) = bracketed
                .split_once(']')
                .ok_or_else(|| invalid("unterminated '[' in IPv6 host"))?;
            match after.strip_prefix(':') {
                Some(p) => (host, Some(p)),
                None if after.is_empty() => (host, None),
                None => return Err(invalid("unexpected text after IPv6 host")),
            }
        } else {
            match rest.split_once(':') {
                Some((h, p)) => (h, Some(p)),
                None => (rest, None),
            }
        };

        if host.is_empty() {
            return Err(invalid("empty host name"));
        }

        let port = match port {
            Some(p) => p
                .parse::<u16>()
                .map_err(|_| invalid(&format!("invalid port '{}'", p)))?,
            None => default_port,
        };

        Ok(Self::new(user, host, port))
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `user@host` for `host:path` style arguments; IPv6 hosts are bracketed
    pub fn user_at_host(&self) -> String {
        if self.host.contains(':') {
            format!("{}@[{}]", self.user, self.host)
        } else {
            format!("{}@{}", self.user, self.host)
        }
    }

    /// `user@host` as the ssh destination argument, never bracketed
    pub fn ssh_destination(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }

    /// `ssh://user@host:port` URL prefix for git remotes
    pub fn ssh_url(&self, absolute_path: &str) -> String {
        let host = if self.host.contains(':') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        format!(
            "ssh://{}@{}:{}/{}",
            self.user,
            host,
            self.port,
            absolute_path.trim_start_matches('/')
        )
    }
}

impl fmt::Display for HostIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.user_at_host(), self.port)
    }
}
