//! Push Options

/// What to push and where it lands on the target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushRequest {
    pub repo_url: String,
    /// Upstream branch to deploy; also the branch pushed on the target
    pub branch: String,
    /// Name of the checkout directory and of the bare repository
    pub dest_name: String,
    /// Parent of the checkout, relative to the target home unless absolute
    pub dest_base_path: String,
}

impl PushRequest {
    pub fn new(
        repo_url: impl Into<String>,
        branch: impl Into<String>,
        dest_name: impl Into<String>,
    ) -> Self {
        Self {
            repo_url: repo_url.into(),
            branch: branch.into(),
            dest_name: dest_name.into(),
            dest_base_path: "opt".to_string(),
        }
    }

    pub fn with_dest_base_path(mut self, path: impl Into<String>) -> Self {
        self.dest_base_path = path.into();
        self
    }
}
