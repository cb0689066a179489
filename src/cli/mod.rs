//! Command-line interface for `bugtrack`.
//!
//! This module provides the CLI parsing and command routing using clap.

pub mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use bugtrack_lib::BugError;
use bugtrack_lib::users::{Permission, User};

use crate::config::{self, CliOverrides, ResolvedConfig};
use crate::logging;

/// `bugtrack` (bt) - Terminal bug tracker.
#[derive(Parser, Debug)]
#[command(name = "bt")]
#[command(
    author,
    version,
    about = "Terminal bug tracker over a flat text file",
    long_about = None,
    after_help = "Every command reloads and rewrites the bug file in full. Single writer only."
)]
pub struct Cli {
    /// Output format: text (default) or json
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Append diagnostics to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Emit diagnostics as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Workspace root (default: current directory)
    #[arg(long, global = true, env = "BUGTRACK_ROOT", value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Bug file, relative to the root unless absolute
    #[arg(long, global = true, env = "BUGTRACK_DATA_FILE", value_name = "PATH")]
    pub data_file: Option<PathBuf>,

    /// Account file, relative to the root unless absolute
    #[arg(long, global = true, env = "BUGTRACK_USERS_FILE", value_name = "PATH")]
    pub users_file: Option<PathBuf>,

    /// Username to act as
    #[arg(short = 'u', long, global = true, env = "BUGTRACK_USER")]
    pub user: Option<String>,

    /// Password for --user
    #[arg(long, global = true, env = "BUGTRACK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a bugtrack workspace
    Init(InitArgs),

    /// Create a new bug
    Create(CreateArgs),

    /// List all bugs
    List(ListArgs),

    /// Show bug details
    Show {
        /// Bug ID
        id: u32,
    },

    /// Change one field of a bug
    Update(UpdateArgs),

    /// Change the status of a bug
    Status {
        /// Bug ID
        id: u32,
        /// New status (NEW, IN_PROGRESS, RESOLVED, CLOSED)
        status: String,
    },

    /// Delete a bug
    Delete {
        /// Bug ID
        id: u32,
    },

    /// Add a comment to a bug
    Comment {
        /// Bug ID
        id: u32,
        /// Comment text
        text: String,
    },

    /// Search bugs by keyword, status, priority or assignee
    Search(SearchArgs),

    /// Counts by status, priority and assignee
    Stats,

    /// Manage user accounts
    User(UserCommand),

    /// Check the bug file and account file for problems
    Doctor,

    /// Show version information
    Version(VersionArgs),

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug, Default)]
pub struct CreateArgs {
    /// Bug title
    pub title: Option<String>,

    /// Bug title (alternative to positional)
    #[arg(long = "title", conflicts_with = "title")]
    pub title_flag: Option<String>,

    /// Bug description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Initial status; unrecognized text becomes NEW
    #[arg(short, long)]
    pub status: Option<String>,

    /// Priority; unrecognized text becomes LOW
    #[arg(short, long)]
    pub priority: Option<String>,

    /// Assignee name
    #[arg(short, long)]
    pub assignee: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Sort by priority or status (stable)
    #[arg(long)]
    pub sort: Option<String>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Bug ID
    pub id: u32,

    /// Field: title, description, status, priority, assigned_to (or 1-5)
    pub field: String,

    /// New value
    pub value: String,
}

#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Case-insensitive text to find in title or description
    pub keyword: Option<String>,

    /// Only bugs with this status
    #[arg(short, long)]
    pub status: Option<String>,

    /// Only bugs with this priority
    #[arg(short, long)]
    pub priority: Option<String>,

    /// Only bugs whose assignee contains this text
    #[arg(short, long)]
    pub assignee: Option<String>,

    /// Sort by priority or status (stable)
    #[arg(long)]
    pub sort: Option<String>,
}

#[derive(Args, Debug)]
pub struct UserCommand {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum UserSubcommand {
    /// Register a new account (password from --password)
    Signup {
        /// Username
        username: String,
        /// Role: developer, tester, project_manager, admin
        #[arg(short, long, default_value = "developer")]
        role: String,
    },

    /// List accounts
    List,

    /// Remove an account
    Remove {
        /// Username
        username: String,
    },

    /// Show the logged-in account
    Whoami,
}

#[derive(Args, Debug, Default)]
pub struct VersionArgs {
    /// Print only the version number
    #[arg(long)]
    pub short: bool,
}

impl Cli {
    #[must_use]
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            root: self.root.clone(),
            data_file: self.data_file.clone(),
            users_file: self.users_file.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
        }
    }
}

/// Log in with the `--user` / `--password` pair and check `permission`.
///
/// # Errors
///
/// Returns `NotAuthenticated` if credentials are missing,
/// `InvalidCredentials` if they do not match, or `AccessDenied` if the
/// role lacks the permission.
pub fn authorize(
    config: &ResolvedConfig,
    overrides: &CliOverrides,
    permission: Option<Permission>,
) -> bugtrack_lib::Result<User> {
    let (Some(username), Some(password)) = (&overrides.user, &overrides.password) else {
        return Err(BugError::NotAuthenticated);
    };

    let users = config.user_store()?;
    let user = users.authenticate(username, password)?.clone();
    if let Some(permission) = permission {
        user.require(permission)?;
    }
    tracing::debug!("Authenticated {} as {}", user.username, user.role);
    Ok(user)
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref(), cli.log_json)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    let Some(command) = cli.command.as_ref() else {
        println!("bt - Terminal bug tracker. Use --help for usage.");
        return Ok(());
    };
    tracing::debug!("Running {}", command.name());

    // Commands that need no workspace.
    match command {
        Commands::Version(args) => {
            commands::version::execute(args, cli.json)?;
            return Ok(());
        }
        Commands::Completions { shell } => {
            commands::completions::execute(*shell);
            return Ok(());
        }
        _ => {}
    }

    let overrides = cli.overrides();
    let config = config::resolve(&overrides)?;
    let json = cli.json;
    let login = |permission: Permission| authorize(&config, &overrides, Some(permission));

    match command {
        Commands::Init(args) => commands::init::execute(&config, args, json)?,
        Commands::Create(args) => {
            login(Permission::AddBug)?;
            commands::create::execute(&config, args, json)?;
        }
        Commands::List(args) => {
            login(Permission::ViewBugs)?;
            commands::list::execute(&config, args, json)?;
        }
        Commands::Show { id } => {
            login(Permission::ViewBugs)?;
            commands::show::execute(&config, *id, json)?;
        }
        Commands::Update(args) => {
            login(Permission::EditBug)?;
            commands::update::execute(&config, args, json)?;
        }
        Commands::Status { id, status } => {
            login(Permission::ChangeStatus)?;
            commands::update::execute_status(&config, *id, status, json)?;
        }
        Commands::Delete { id } => {
            login(Permission::DeleteBug)?;
            commands::delete::execute(&config, *id, json)?;
        }
        Commands::Comment { id, text } => {
            login(Permission::Comment)?;
            commands::comment::execute(&config, *id, text, json)?;
        }
        Commands::Search(args) => {
            login(Permission::Search)?;
            commands::search::execute(&config, args, json)?;
        }
        Commands::Stats => {
            login(Permission::ViewStats)?;
            commands::stats::execute(&config, json)?;
        }
        Commands::User(user) => {
            commands::user::execute(&config, &overrides, &user.command, json)?;
        }
        Commands::Doctor => commands::doctor::execute(&config, json)?,
        Commands::Version(_) | Commands::Completions { .. } => {}
    }

    Ok(())
}

impl Commands {
    const fn name(&self) -> &'static str {
        match self {
            Self::Init(_) => "init",
            Self::Create(_) => "create",
            Self::List(_) => "list",
            Self::Show { .. } => "show",
            Self::Update(_) => "update",
            Self::Status { .. } => "status",
            Self::Delete { .. } => "delete",
            Self::Comment { .. } => "comment",
            Self::Search(_) => "search",
            Self::Stats => "stats",
            Self::User(user) => match user.command {
                UserSubcommand::Signup { .. } => "user signup",
                UserSubcommand::List => "user list",
                UserSubcommand::Remove { .. } => "user remove",
                UserSubcommand::Whoami => "user whoami",
            },
            Self::Doctor => "doctor",
            Self::Version(_) => "version",
            Self::Completions { .. } => "completions",
        }
    }
}
