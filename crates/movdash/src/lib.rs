//! movdash command line application

pub mod cli;
pub mod commands;
pub mod watch;

pub use cli::{Args, Command};
