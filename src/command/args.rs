#[derive(clap::Args, Debug, Clone, Default)]
pub struct AddArgs {
    /// Registry id of the new devbox
    pub id: String,

    /// Container image (falls back to `image` in the config file)
    #[arg(short, long)]
    pub image: Option<String>,

    /// Sandbox name used by the runtime (defaults to the id)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Free-form description shown by `devbox list`
    #[arg(short, long)]
    pub description: Option<String>,

    /// Shell opened by `devbox shell` (falls back to `shell` in the config file, then sh)
    #[arg(short, long)]
    pub shell: Option<String>,

    /// User inside the sandbox
    #[arg(short, long)]
    pub user: Option<String>,

    /// Kubeconfig for a cluster devbox (requires --namespace)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub kubeconfig: Option<String>,

    /// Kubernetes namespace; makes this a cluster devbox
    #[arg(long)]
    pub namespace: Option<String>,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct CategoryArgs {
    /// Only provision these configuration categories (repeatable)
    #[arg(long = "include", value_name = "CATEGORY")]
    pub include: Vec<String>,

    /// Skip these configuration categories (repeatable)
    #[arg(long = "exclude", value_name = "CATEGORY")]
    pub exclude: Vec<String>,
}
