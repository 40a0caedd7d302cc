//! CLI module - argument parsing, step rendering and command dispatch

pub mod answers;
pub mod args;
pub mod commands;
pub mod flow;
pub mod helpers;
pub mod output;
pub mod prompt;

pub use args::{Cli, Commands, GlobalOpts, OutputFormat};
pub use flow::{drive, Intent, StepRenderer};
