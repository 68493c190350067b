//! Mirror Options

/// What to deploy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorRequest {
    /// Upstream repository URL
    pub repo_url: String,
    /// Directory name of the clone, locally and on the target
    pub repo_dir: String,
    /// Branch, tag or commit to deploy (resolved as `origin/<refspec>`)
    pub refspec: String,
}

impl MirrorRequest {
    pub fn new(
        repo_url: impl Into<String>,
        repo_dir: impl Into<String>,
        refspec: impl Into<String>,
    ) -> Self {
        Self {
            repo_url: repo_url.into(),
            repo_dir: repo_dir.into(),
            refspec: refspec.into(),
        }
    }
}

/// How to deploy it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorOptions {
    /// Home on the target; the login directory when unset
    pub home: Option<String>,
    /// Directory under `home` that receives the clones
    pub base_dir: String,
    /// Keep `<home>/.deploy/git/history.yml` up to date
    pub save_history: bool,
    /// Remove files on the target that are gone from the source
    pub delete_extraneous: bool,
}

impl Default for MirrorOptions {
    fn default() -> Self {
        Self {
            home: None,
            base_dir: "git".to_string(),
            save_history: false,
            delete_extraneous: true,
        }
    }
}
