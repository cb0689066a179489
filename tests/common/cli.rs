//! Run the `bt` binary inside an isolated temporary workspace.
//!
//! Every invocation sets the working directory and clears the
//! `BUGTRACK_*` variables so tests never see the caller's environment.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use assert_cmd::Command;
use tempfile::TempDir;

pub const PASSWORD: &str = "secret";

const ENV_VARS: [&str; 5] = [
    "BUGTRACK_ROOT",
    "BUGTRACK_DATA_FILE",
    "BUGTRACK_USERS_FILE",
    "BUGTRACK_USER",
    "BUGTRACK_PASSWORD",
];

pub struct BtWorkspace {
    _temp_dir: TempDir,
    pub root: PathBuf,
}

impl BtWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let root = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// Initialized workspace with one account per role, all using [`PASSWORD`].
    pub fn with_accounts() -> Self {
        let workspace = Self::new();
        let init = run_bt(&workspace, ["init"], "init");
        assert!(init.status.success(), "init failed: {}", init.stderr);
        for (name, role) in [
            ("dev", "developer"),
            ("qa", "tester"),
            ("pm", "project_manager"),
            ("root", "admin"),
        ] {
            let out = run_bt(
                &workspace,
                ["user", "signup", name, "--role", role, "--password", PASSWORD],
                "signup",
            );
            assert!(out.status.success(), "signup {name} failed: {}", out.stderr);
        }
        workspace
    }

    pub fn data_file(&self) -> PathBuf {
        self.root.join("data").join("bugs.txt")
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// A `bt` command with a clean environment, run from the root.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_bt"));
        cmd.current_dir(&self.root);
        for var in ENV_VARS {
            cmd.env_remove(var);
        }
        cmd.env_remove("RUST_LOG");
        cmd
    }
}

impl Default for BtWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct CmdOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

fn finish(mut cmd: Command, label: &str) -> CmdOutput {
    let output = cmd
        .output()
        .unwrap_or_else(|e| panic!("{label}: failed to run bt: {e}"));
    CmdOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

/// Run `bt` without credentials.
pub fn run_bt<I, S>(workspace: &BtWorkspace, args: I, label: &str) -> CmdOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = workspace.command();
    cmd.args(args);
    finish(cmd, label)
}

/// Run `bt` logged in as `user`, passing credentials through the environment.
pub fn run_bt_as<I, S>(workspace: &BtWorkspace, user: &str, args: I, label: &str) -> CmdOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = workspace.command();
    cmd.env("BUGTRACK_USER", user)
        .env("BUGTRACK_PASSWORD", PASSWORD)
        .args(args);
    finish(cmd, label)
}

/// Parse stdout of a `--json` invocation.
pub fn parse_json(output: &CmdOutput) -> serde_json::Value {
    serde_json::from_str(&output.stdout)
        .unwrap_or_else(|e| panic!("invalid JSON ({e}): {}", output.stdout))
}
