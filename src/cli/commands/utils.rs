//! Shared utilities for the wizard commands

use console::style;
use miette::Result;
use std::path::PathBuf;
use tracing::info;

use crate::cli::answers::{Answers, AnswersRenderer};
use crate::cli::flow::{drive, StepRenderer};
use crate::cli::output::format_submissions;
use crate::cli::prompt::PromptRenderer;
use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::wizard::{Submission, WizardController};

/// Options shared by every wizard command
#[derive(clap::Args, Debug, Clone)]
pub struct FlowArgs {
    /// Answer the steps from a YAML file instead of prompting
    #[arg(long, short = 'a')]
    pub answers: Option<PathBuf>,

    /// Print the password in the final submission
    #[arg(long)]
    pub show_secrets: bool,
}

impl FlowArgs {
    pub fn load_answers(&self) -> Result<Option<Answers>> {
        match &self.answers {
            Some(path) => Ok(Some(Answers::load(path)?)),
            None => Ok(None),
        }
    }
}

/// Load reference data, then run the flow with the appropriate renderer
pub fn run_flow(
    mut controller: WizardController,
    answers: Option<&Answers>,
    config: &Config,
    global: &GlobalOpts,
) -> Result<Option<Submission>> {
    let flow = controller.flow();
    let service = config.lookup_service();

    // A failed fetch is fatal to the flow: stop before the first step
    controller.load_reference_data(service.as_ref())?;

    let mut renderer: Box<dyn StepRenderer> = match answers {
        Some(answers) => Box::new(AnswersRenderer::new(answers, flow, global.quiet)),
        None => {
            if !console::user_attended() {
                return Err(miette::miette!(
                    help = "Pass --answers <FILE> to run without a terminal",
                    "The {} wizard needs an interactive terminal",
                    flow
                ));
            }
            Box::new(PromptRenderer::new(global.quiet))
        }
    };

    let submission = drive(&mut controller, renderer.as_mut())?;
    match &submission {
        Some(_) => info!(flow = %flow, "flow completed"),
        None => {
            if !global.quiet {
                eprintln!("{} {} cancelled", style("!").yellow(), flow.title());
            }
        }
    }
    Ok(submission)
}

/// Print completed flows' payloads to stdout
pub fn emit(submissions: &[Submission], args: &FlowArgs, global: &GlobalOpts) -> Result<()> {
    let shown: Vec<Submission> = submissions
        .iter()
        .map(|s| if args.show_secrets { s.clone() } else { s.redacted() })
        .collect();
    if !global.quiet {
        for submission in submissions {
            eprintln!(
                "{} {} complete",
                style("✓").green(),
                submission.flow.title()
            );
        }
    }
    let text = format_submissions(&shown, global.format)?;
    println!("{}", text.trim_end());
    Ok(())
}
