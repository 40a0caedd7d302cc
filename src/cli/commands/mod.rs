//! CLI command implementations

pub mod utils;

pub mod completions;
pub mod lookup;
pub mod onboard;
pub mod profile;
pub mod register;
