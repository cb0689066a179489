use std::fs;
use std::path::{Path, PathBuf};

use bugtrack_lib::{BugError, Result};
use serde::Serialize;

use crate::cli::InitArgs;
use crate::config::{CONFIG_DIR, FileConfig, ResolvedConfig, render_file_config};

#[derive(Serialize)]
struct InitOutput<'a> {
    root: &'a Path,
    config_file: &'a Path,
    data_file: &'a Path,
    users_file: &'a Path,
}

/// Store paths inside the root relative to it so the workspace can move.
fn relative_to_root(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
}

/// Execute the init command.
///
/// # Errors
///
/// Returns `AlreadyInitialized` if a config file exists and `--force` is
/// not set, or an error if the files cannot be written.
pub fn execute(config: &ResolvedConfig, args: &InitArgs, json: bool) -> Result<()> {
    let config_path = config.config_path();
    if config_path.exists() && !args.force {
        return Err(BugError::AlreadyInitialized { path: config_path });
    }

    let meta_dir = config.root.join(CONFIG_DIR);
    fs::create_dir_all(&meta_dir)?;

    let file_config = FileConfig {
        data_file: Some(relative_to_root(&config.data_file, &config.root)),
        users_file: Some(relative_to_root(&config.users_file, &config.root)),
    };
    let body = render_file_config(&file_config)?;
    fs::write(
        &config_path,
        format!("# bugtrack workspace configuration\n{body}"),
    )?;

    // Password digests stay out of version control.
    let gitignore_path = meta_dir.join(".gitignore");
    if !gitignore_path.exists() {
        fs::write(gitignore_path, "users.json\n*.tmp\n")?;
    }

    let store = config.record_store();
    if !store.path().exists() {
        super::ensure_persisted(store.save_all(&[]), &store)?;
    }

    tracing::info!("Initialized workspace at {}", config.root.display());

    if json {
        return super::print_json(&InitOutput {
            root: &config.root,
            config_file: &config_path,
            data_file: &config.data_file,
            users_file: &config.users_file,
        });
    }

    println!("Initialized bugtrack workspace in {}", config.root.display());
    println!("  bug file: {}", config.data_file.display());
    Ok(())
}
