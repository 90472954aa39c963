//! Interview Coach Service Library
//!
//! Environment configuration and the terminal front end for practice
//! sessions. The `coach` binary is a thin wrapper around this library.

pub mod config;
pub mod console;
