//! User account commands.
//!
//! `signup` is open to anyone and picks the role. Listing and removing
//! accounts needs the admin role.

use std::str::FromStr;

use bugtrack_lib::users::{Permission, Role};
use bugtrack_lib::{BugError, Result};

use crate::cli::{UserSubcommand, authorize};
use crate::config::{CliOverrides, ResolvedConfig};
use crate::format::UserSummary;

/// Execute a user subcommand.
///
/// # Errors
///
/// Returns an error if credentials are missing or wrong, the role lacks
/// permission, or the account file cannot be read or written.
pub fn execute(
    config: &ResolvedConfig,
    overrides: &CliOverrides,
    command: &UserSubcommand,
    json: bool,
) -> Result<()> {
    match command {
        UserSubcommand::Signup { username, role } => {
            signup(config, overrides, username, role, json)
        }
        UserSubcommand::List => list(config, overrides, json),
        UserSubcommand::Remove { username } => remove(config, overrides, username, json),
        UserSubcommand::Whoami => {
            let user = authorize(config, overrides, None)?;
            if json {
                return super::print_json(&UserSummary::from(&user));
            }
            println!("{} ({})", user.username, user.role);
            Ok(())
        }
    }
}

fn signup(
    config: &ResolvedConfig,
    overrides: &CliOverrides,
    username: &str,
    role: &str,
    json: bool,
) -> Result<()> {
    let role = Role::from_str(role)?;
    let password = overrides
        .password
        .as_deref()
        .ok_or_else(|| BugError::validation("password", "required (pass --password)"))?;

    let mut users = config.user_store()?;
    let summary = UserSummary::from(users.sign_up(username, password, role)?);
    users.save()?;

    if json {
        return super::print_json(&summary);
    }
    println!("Registered {} as {}", summary.username, summary.role);
    Ok(())
}

fn list(config: &ResolvedConfig, overrides: &CliOverrides, json: bool) -> Result<()> {
    authorize(config, overrides, Some(Permission::ManageUsers))?;
    let users = config.user_store()?;
    let summaries: Vec<UserSummary> = users.users().iter().map(UserSummary::from).collect();

    if json {
        return super::print_json(&summaries);
    }
    for user in &summaries {
        println!(
            "{:<20} {:<16} {}",
            user.username,
            user.role.as_str(),
            user.created_at.format("%Y-%m-%d")
        );
    }
    println!("\n{} account(s)", summaries.len());
    Ok(())
}

fn remove(
    config: &ResolvedConfig,
    overrides: &CliOverrides,
    username: &str,
    json: bool,
) -> Result<()> {
    let admin = authorize(config, overrides, Some(Permission::ManageUsers))?;
    if admin.username.eq_ignore_ascii_case(username.trim()) {
        return Err(BugError::validation(
            "username",
            "cannot remove the account you are logged in as",
        ));
    }

    let mut users = config.user_store()?;
    if !users.remove(username) {
        return Err(BugError::UserNotFound {
            username: username.to_string(),
        });
    }
    users.save()?;
    tracing::info!("Removed user {username}");

    if json {
        return super::print_json(&serde_json::json!({ "removed": username }));
    }
    println!("Removed user {username}");
    Ok(())
}
