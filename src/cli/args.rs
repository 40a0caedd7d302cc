//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs,
    lookup::LookupCommands,
    onboard::OnboardArgs,
    profile::ProfileArgs,
    register::RegisterArgs,
};
use crate::core::Config;

#[derive(Parser)]
#[command(name = "signup")]
#[command(author, version, about = "Registration and profile wizards")]
#[command(long_about = "Three-step registration and profile wizards with per-step validation, backed by a country and dial-code lookup service.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Base URL of the country lookup API
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Read lookup data from saved codes.json / countries.json instead of the API
    #[arg(long, global = true)]
    pub reference_dir: Option<PathBuf>,
}

impl GlobalOpts {
    /// Layered configuration with command-line overrides on top
    pub fn config(&self) -> miette::Result<Config> {
        let mut config = Config::load()?;
        config.merge(Config {
            api_base: self.api_base.clone(),
            reference_dir: self.reference_dir.clone(),
        });
        Ok(config)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the registration wizard (phone, confirmation code, email)
    Register(RegisterArgs),

    /// Run the profile wizard (personal data, contacts, delivery address)
    Profile(ProfileArgs),

    /// Registration followed by a profile seeded from it
    Onboard(OnboardArgs),

    /// Query the country and dial-code lookup service
    #[command(subcommand)]
    Lookup(LookupCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// YAML for submissions, plain lines for lookups
    #[default]
    Auto,
    /// YAML format
    Yaml,
    /// JSON format (for programming)
    Json,
    /// Markdown tables
    Md,
}
