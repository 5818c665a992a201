//! Line-oriented command interpreter for the retail simulation.
//!
//! Each input line is one whitespace-separated command; each command answers
//! with exactly one output line.

pub mod command;
pub mod config;
pub mod render;
pub mod session;

pub use command::{Command, CommandError};
pub use config::CliArgs;
pub use session::{Interpreter, run_script};
