//! `signup register` command - Run the registration wizard

use miette::Result;

use crate::cli::commands::utils::{emit, run_flow, FlowArgs};
use crate::cli::GlobalOpts;
use crate::core::wizard::WizardController;

#[derive(clap::Args, Debug)]
pub struct RegisterArgs {
    #[command(flatten)]
    pub flow: FlowArgs,
}

pub fn run(args: RegisterArgs, global: &GlobalOpts) -> Result<()> {
    let config = global.config()?;
    let answers = args.flow.load_answers()?;

    let submission = run_flow(
        WizardController::registration(),
        answers.as_ref(),
        &config,
        global,
    )?;

    match submission {
        Some(submission) => emit(&[submission], &args.flow, global),
        None => Ok(()),
    }
}
