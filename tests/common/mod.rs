//! Shared helpers for `bt` integration tests.

#![allow(dead_code)]

pub mod cli;
