//! `bugtrack` (bt) - Terminal bug tracker
//!
//! Bugs live in a plain comma-delimited text file that every command
//! reloads and rewrites in full. No daemon, no database, no locking.

use bugtrack::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
