//! `signup onboard` command - Registration followed by profile completion
//!
//! The registered email and phone number seed the profile flow's contact
//! step, the way the profile form is reached after signing up.

use miette::Result;
use tracing::debug;

use crate::cli::commands::utils::{emit, run_flow, FlowArgs};
use crate::cli::GlobalOpts;
use crate::core::wizard::WizardController;

#[derive(clap::Args, Debug)]
pub struct OnboardArgs {
    #[command(flatten)]
    pub flow: FlowArgs,
}

pub fn run(args: OnboardArgs, global: &GlobalOpts) -> Result<()> {
    let config = global.config()?;
    let answers = args.flow.load_answers()?;

    let Some(registration) = run_flow(
        WizardController::registration(),
        answers.as_ref(),
        &config,
        global,
    )?
    else {
        return Ok(());
    };

    let seed = registration.profile_seed();
    debug!(email = %seed.email, phone = %seed.phone_number, "seeding profile");

    let Some(profile) = run_flow(
        WizardController::profile(seed),
        answers.as_ref(),
        &config,
        global,
    )?
    else {
        return Ok(());
    };

    emit(&[registration, profile], &args.flow, global)
}
