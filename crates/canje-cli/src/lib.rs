//! Library side of the `canje` command-line validator.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod types;
