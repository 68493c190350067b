//! Local staging clones
//!
//! A staging clone is the local working tree transferred to a target. Every
//! refresh fetches from origin and hard-resets to the requested ref, so only
//! commits that exist upstream can ever be deployed.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};

use crate::domain::ports::{CommandExecutor, ExecError};
use crate::domain::value_objects::shell_quote;
use crate::error::{DeployError, DeployResult};

/// A refreshed mirror staging clone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingClone {
    pub path: PathBuf,
    /// `git log -n1 --pretty=fuller` of the checked-out revision
    pub fuller_log: String,
    /// True when this refresh had to clone from scratch
    pub cloned: bool,
    /// Stale sibling entries removed from the staging root
    pub pruned: Vec<String>,
}

pub struct LocalStagingManager<L> {
    local: L,
}

impl<L: CommandExecutor> LocalStagingManager<L> {
    pub fn new(local: L) -> Self {
        Self { local }
    }

    /// Fail unless every tool resolves on the local `PATH`
    pub fn ensure_tools(&self, tools: &[&str]) -> DeployResult<()> {
        for tool in tools {
            let lookup = format!("command -v {} >/dev/null 2>&1", shell_quote(tool));
            if !self.local.succeeds(&lookup) {
                return Err(DeployError::ToolMissing {
                    tool: tool.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Bring `<staging_root>/<repo_dir>` to exactly `origin/<refspec>`.
    ///
    /// Every other entry that was under `staging_root` before the refresh is
    /// deleted afterwards, so the root must hold nothing but staging clones.
    pub fn ensure_fresh(
        &self,
        repo_url: &str,
        repo_dir: &str,
        refspec: &str,
        staging_root: &Path,
    ) -> DeployResult<StagingClone> {
        ensure_dir_name(repo_dir)?;
        fs::create_dir_all(staging_root)?;
        let before = list_entries(staging_root)?;

        let path = staging_root.join(repo_dir);
        let cloned = !path.is_dir();
        if cloned {
            info!("[local] cloning {} into {}", repo_url, path.display());
            self.git(
                &path,
                staging_root,
                &format!("git clone {} {}", shell_quote(repo_url), shell_quote(repo_dir)),
            )?;
        }

        self.git(&path, &path, "git fetch")?;
        self.git(
            &path,
            &path,
            &format!("git reset --hard {}", shell_quote(&format!("origin/{}", refspec))),
        )?;
        self.git(&path, &path, "git submodule update --init --recursive")?;
        let fuller_log = self.git(&path, &path, "git log -n1 --pretty=fuller")?;

        let mut pruned = Vec::new();
        for entry in before.into_iter().filter(|name| name != repo_dir) {
            let stale = staging_root.join(&entry);
            debug!("[local] pruning stale staging entry {}", stale.display());
            if stale.is_dir() && !stale.is_symlink() {
                fs::remove_dir_all(&stale)?;
            } else {
                fs::remove_file(&stale)?;
            }
            pruned.push(entry);
        }

        Ok(StagingClone {
            path,
            fuller_log,
            cloned,
            pruned,
        })
    }

    /// Keep `<parent>/<dir_name>` checked out at `origin/<branch>`.
    ///
    /// Unlike `ensure_fresh`, siblings are left alone and submodules are not
    /// touched; the clone is only ever a push source.
    pub fn ensure_checkout(
        &self,
        repo_url: &str,
        dir_name: &str,
        branch: &str,
        parent: &Path,
    ) -> DeployResult<PathBuf> {
        ensure_dir_name(dir_name)?;
        let path = parent.join(dir_name);
        if !path.join(".git").exists() {
            fs::create_dir_all(parent)?;
            info!("[local] cloning {} into {}", repo_url, path.display());
            self.git(
                &path,
                parent,
                &format!("git clone -q {} {}", shell_quote(repo_url), shell_quote(dir_name)),
            )?;
            self.git(&path, &path, &format!("git checkout -q {}", shell_quote(branch)))?;
        }

        self.git(&path, &path, "git fetch -q origin")?;
        self.git(
            &path,
            &path,
            &format!("git reset -q --hard {}", shell_quote(&format!("origin/{}", branch))),
        )?;
        Ok(path)
    }

    fn git(&self, clone: &Path, cwd: &Path, command: &str) -> DeployResult<String> {
        self.local
            .run_in(cwd, command)
            .map_err(|source: ExecError| DeployError::StagingRefreshFailed {
                path: clone.to_path_buf(),
                source,
            })
    }
}

/// Clone directories are a single plain name: pruning compares entry names
/// against it, and `..` or `a/b` would escape the staging root.
fn ensure_dir_name(name: &str) -> DeployResult<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(c)), None) if c.to_str() == Some(name) => Ok(()),
        _ => Err(DeployError::InvalidDirName {
            name: name.to_string(),
        }),
    }
}

fn list_entries(dir: &Path) -> DeployResult<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        names.push(entry?.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}
