//! `bugtrack` - Terminal bug tracker
//!
//! This crate provides the `bt` command-line tool on top of
//! [`bugtrack_lib`], which owns the bug record store and query engine.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Workspace configuration and path resolution
//! - [`format`] - Output formatting (text, JSON)
//! - [`logging`] - Tracing subscriber setup
//! - [`validation`] - Input checks applied before records reach the store

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod format;
pub mod logging;
pub mod validation;

pub use bugtrack_lib::{error, model, query, stats, store, users};
pub use bugtrack_lib::{BugError, Result};

/// Run the CLI application.
///
/// This is the main entry point called from `main()`.
///
/// # Errors
///
/// Returns an error if command execution fails.
pub fn run() -> anyhow::Result<()> {
    cli::run()
}
