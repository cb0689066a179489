//! Version command implementation.

use bugtrack_lib::Result;
use serde::Serialize;

use crate::cli::VersionArgs;

#[derive(Serialize)]
struct VersionOutput<'a> {
    version: &'a str,
    build: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    commit: Option<&'a str>,
}

fn short_commit(commit: &str) -> String {
    commit.trim().chars().take(7).collect()
}

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(args: &VersionArgs, json: bool) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");

    if args.short {
        println!("{version}");
        return Ok(());
    }

    let build = if cfg!(debug_assertions) {
        "dev"
    } else {
        "release"
    };
    // Set by packagers that build from a git checkout.
    let commit = option_env!("BUGTRACK_GIT_SHA").filter(|s| !s.trim().is_empty());

    if json {
        return super::print_json(&VersionOutput {
            version,
            build,
            commit,
        });
    }

    let mut line = format!("bt version {version} ({build})");
    if let Some(commit) = commit {
        let short = short_commit(commit);
        line.push_str(&format!(" ({short})"));
    }
    println!("{line}");
    Ok(())
}
