use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::command;
use crate::command::args::{AddArgs, CategoryArgs};
use crate::config::{Config, Settings};

#[derive(Parser)]
#[command(name = "devbox")]
#[command(about = "Register, run and provision development sandboxes on docker or Kubernetes")]
#[command(after_help = "Run 'devbox init' once before registering devboxes.")]
pub struct Cli {
    /// State file to use (default: ~/.devbox.state.yaml)
    #[arg(long, global = true, value_name = "PATH", value_hint = clap::ValueHint::FilePath)]
    state: Option<String>,

    /// Print the runtime commands instead of running them
    #[arg(long, global = true)]
    dry_run: bool,

    /// Print runtime commands before running them and log to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty state file
    Init {
        /// Overwrite an existing state file
        #[arg(short, long)]
        force: bool,
    },

    /// Register a devbox and make it the active context
    Add(AddArgs),

    /// Forget a devbox (does not stop it)
    #[command(visible_alias = "rm")]
    Remove {
        /// Registry id of the devbox
        id: String,
    },

    /// List registered devboxes
    #[command(visible_alias = "ls")]
    List {
        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show, set or clear the active devbox
    #[command(visible_alias = "ctx")]
    Context {
        /// Devbox to make active
        #[arg(conflicts_with = "unset")]
        id: Option<String>,

        /// Clear the active devbox
        #[arg(long)]
        unset: bool,
    },

    /// Start devboxes (defaults to the active one)
    Start {
        ids: Vec<String>,
    },

    /// Stop devboxes (defaults to the active one)
    Stop {
        ids: Vec<String>,
    },

    /// Open an interactive shell in a devbox
    #[command(visible_alias = "sh")]
    Shell {
        /// Devbox to attach to (defaults to the active one)
        id: Option<String>,

        /// Shell to run instead of the devbox's configured shell
        #[arg(short, long)]
        shell: Option<String>,
    },

    /// Copy a local file or directory into a devbox
    #[command(visible_alias = "cp")]
    Copy {
        /// Local source path
        #[arg(value_hint = clap::ValueHint::AnyPath)]
        src: PathBuf,

        /// Destination path inside the devbox
        dst: String,

        /// Devbox to copy into (defaults to the active one)
        #[arg(long)]
        id: Option<String>,
    },

    /// Copy local configuration (dotfiles) into devboxes
    Setup {
        /// Devboxes to provision (defaults to the active one)
        ids: Vec<String>,

        #[command(flatten)]
        categories: CategoryArgs,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let settings = Settings::resolve(config, cli.state.as_deref(), cli.dry_run, cli.verbose)?;

    match cli.command {
        Commands::Init { force } => command::init::run(&settings, force),
        Commands::Add(args) => command::add::run(&settings, &args),
        Commands::Remove { id } => command::remove::run(&settings, &id),
        Commands::List { json } => command::list::run(&settings, json),
        Commands::Context { id, unset } => command::context::run(&settings, id.as_deref(), unset),
        Commands::Start { ids } => command::start::run(&settings, &ids),
        Commands::Stop { ids } => command::stop::run(&settings, &ids),
        Commands::Shell { id, shell } => {
            command::shell::run(&settings, id.as_deref(), shell.as_deref())
        }
        Commands::Copy { src, dst, id } => command::copy::run(&settings, id.as_deref(), &src, &dst),
        Commands::Setup { ids, categories } => command::setup::run(&settings, &ids, &categories),
    }
}
