//! `signup profile` command - Run the profile wizard

use miette::Result;

use crate::cli::commands::utils::{emit, run_flow, FlowArgs};
use crate::cli::GlobalOpts;
use crate::core::wizard::{ProfileSeed, WizardController};

#[derive(clap::Args, Debug)]
pub struct ProfileArgs {
    /// Email confirmed during registration
    #[arg(long)]
    pub email: String,

    /// Phone number confirmed during registration, e.g. "+33 5551234"
    #[arg(long)]
    pub phone: String,

    #[command(flatten)]
    pub flow: FlowArgs,
}

pub fn run(args: ProfileArgs, global: &GlobalOpts) -> Result<()> {
    let config = global.config()?;
    let answers = args.flow.load_answers()?;

    let seed = ProfileSeed {
        email: args.email,
        phone_number: args.phone,
    };

    let submission = run_flow(
        WizardController::profile(seed),
        answers.as_ref(),
        &config,
        global,
    )?;

    match submission {
        Some(submission) => emit(&[submission], &args.flow, global),
        None => Ok(()),
    }
}
