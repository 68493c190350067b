//! Command-line definition

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// gitship - deploy git revisions to remote hosts
#[derive(Parser, Debug)]
#[command(name = "gitship")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./gitship.toml, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Refresh a local staging clone and rsync it to the host
    Mirror(MirrorArgs),

    /// Push a branch into a bare repository on the host whose hook checks it out
    Push(PushArgs),

    /// Show the most recent deploys recorded on the host
    History(HistoryArgs),

    /// Check that a local checkout is up to date and/or clean
    CheckLocal(CheckLocalArgs),
}

/// Target host selection shared by remote commands
#[derive(Args, Debug, Clone)]
pub struct HostArgs {
    /// Target as user@host[:port]
    #[arg(long = "host", value_name = "USER@HOST[:PORT]")]
    pub host: String,

    /// Prompt for the ssh password instead of relying on keys
    #[arg(long)]
    pub ask_password: bool,
}

/// Checks on the checkout gitship is run from, before deploying
#[derive(Args, Debug, Clone, Default)]
pub struct GuardArgs {
    /// Refuse to deploy from a checkout with uncommitted changes
    #[arg(long)]
    pub require_clean: bool,

    /// Refuse to deploy from a checkout that is behind REF
    #[arg(long, value_name = "REF")]
    pub require_up_to_date: Option<String>,
}

#[derive(Args, Debug)]
pub struct MirrorArgs {
    /// URL of the git repository
    pub repo_url: String,

    /// Directory name of the clone
    pub repo_dir: String,

    #[command(flatten)]
    pub target: HostArgs,

    /// Branch, tag or commit to deploy
    #[arg(long)]
    pub refspec: Option<String>,

    /// Home directory on the host (default: the login directory)
    #[arg(long)]
    pub home: Option<String>,

    /// Directory under the home that receives clones
    #[arg(long)]
    pub base_dir: Option<String>,

    /// Record the deploy in <home>/.deploy/git/history.yml
    #[arg(long)]
    pub save_history: bool,

    /// Keep files on the host that are gone from the source
    #[arg(long)]
    pub no_delete: bool,

    #[command(flatten)]
    pub guards: GuardArgs,
}

#[derive(Args, Debug)]
pub struct PushArgs {
    /// URL of the git repository
    pub repo_url: String,

    /// Name of the checkout directory on the host
    pub dest_name: String,

    #[command(flatten)]
    pub target: HostArgs,

    /// Branch to deploy
    #[arg(long)]
    pub branch: Option<String>,

    /// Parent directory of the checkout, relative to the home unless absolute
    #[arg(long)]
    pub dest_base_path: Option<String>,

    #[command(flatten)]
    pub guards: GuardArgs,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Directory name of the deployed clone
    pub repo_dir: String,

    #[command(flatten)]
    pub target: HostArgs,

    /// Number of deploys to show
    #[arg(long, default_value_t = crate::application::DEFAULT_LIMIT)]
    pub limit: usize,

    /// Home directory on the host (default: the login directory)
    #[arg(long)]
    pub home: Option<String>,
}

#[derive(Args, Debug)]
pub struct CheckLocalArgs {
    /// Checkout to inspect
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    /// Fail if REF has commits the checkout lacks
    #[arg(long, value_name = "REF")]
    pub against: Option<String>,

    /// Fail if the checkout has uncommitted changes
    #[arg(long)]
    pub clean: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_mirror() {
        let cli = Cli::try_parse_from([
            "gitship",
            "-v",
            "mirror",
            "https://example/app.git",
            "app",
            "--host",
            "deploy@web1:2222",
            "--refspec",
            "main",
            "--save-history",
            "--no-delete",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Mirror(args) => {
                assert_eq!(args.repo_dir, "app");
                assert_eq!(args.target.host, "deploy@web1:2222");
                assert_eq!(args.refspec.as_deref(), Some("main"));
                assert!(args.save_history);
                assert!(args.no_delete);
                assert!(!args.guards.require_clean);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_push_with_guards() {
        let cli = Cli::try_parse_from([
            "gitship",
            "push",
            "https://example/app.git",
            "app",
            "--host",
            "web1",
            "--branch",
            "prod",
            "--require-clean",
            "--require-up-to-date",
            "origin/master",
        ])
        .unwrap();

        match cli.command {
            Commands::Push(args) => {
                assert_eq!(args.branch.as_deref(), Some("prod"));
                assert!(args.guards.require_clean);
                assert_eq!(
                    args.guards.require_up_to_date.as_deref(),
                    Some("origin/master")
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn history_limit_defaults_to_ten() {
        let cli =
            Cli::try_parse_from(["gitship", "history", "app", "--host", "web1", "--json"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::History(args) => assert_eq!(args.limit, 10),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn remote_commands_require_a_host() {
        assert!(Cli::try_parse_from(["gitship", "mirror", "url", "app"]).is_err());
    }
}
