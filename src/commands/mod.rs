//! Command handlers
//!
//! Each handler turns parsed arguments plus configuration into a use case
//! call and renders the result.

pub mod check_local;
pub mod history;
pub mod mirror;
pub mod push;

use std::time::Duration;

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use secrecy::{ExposeSecret, SecretString};

use gitship::application::{CheckoutGuard, DeployContext};
use gitship::config::Config;
use gitship::domain::value_objects::HostIdentity;
use gitship::infrastructure::LocalShell;
use gitship::presentation::cli::{GuardArgs, HostArgs};

/// Everything a remote command needs to know about where it deploys
pub fn deploy_context(args: &HostArgs, config: &Config) -> Result<DeployContext> {
    let local_user = LocalShell::new()
        .whoami()
        .context("cannot determine the local user")?;
    let default_user = config.ssh.user.as_deref().unwrap_or(&local_user);
    let target = HostIdentity::parse(&args.host, default_user, config.ssh.port)?;

    let mut ctx = DeployContext::new(target, local_user, config.tmpdir())
        .with_interactive_timeout(Duration::from_secs(config.interactive.timeout_secs));
    if let Some(password) = password(args, config)? {
        ctx = ctx.with_password(password);
    }
    Ok(ctx)
}

fn password(args: &HostArgs, config: &Config) -> Result<Option<SecretString>> {
    if args.ask_password {
        if !std::io::stdin().is_terminal() {
            anyhow::bail!("--ask-password needs an interactive terminal");
        }
        let typed = dialoguer::Password::new()
            .with_prompt(format!("ssh password for {}", args.host))
            .interact()
            .context("cannot read the ssh password")?;
        return Ok(Some(SecretString::from(typed)));
    }
    Ok(config
        .ssh_password
        .as_ref()
        .map(|p| SecretString::from(p.expose_secret().to_string())))
}

/// Refuse to go on when the current checkout fails a requested guard
pub fn run_guards(guards: &GuardArgs) -> Result<()> {
    if !guards.require_clean && guards.require_up_to_date.is_none() {
        return Ok(());
    }
    let cwd = std::env::current_dir()?;
    let guard = CheckoutGuard::new(LocalShell::new());
    if let Some(against) = &guards.require_up_to_date {
        guard.ensure_up_to_date(&cwd, against)?;
    }
    if guards.require_clean {
        guard.ensure_clean(&cwd)?;
    }
    Ok(())
}
