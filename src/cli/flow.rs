//! Driver loop connecting a step renderer to a wizard controller

use miette::Result;
use tracing::debug;

use crate::core::wizard::{Advance, Submission, WizardController, WizardError};
use crate::schema::ValidationError;

/// What the user asked for after a step was rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Next,
    Back,
    Quit,
}

/// Presents steps and collects field values
///
/// Renderers hold no wizard state of their own; everything they show comes
/// from the controller and everything they collect goes through
/// [`WizardController::set_field`].
pub trait StepRenderer {
    /// Show the current step and store the values entered for it
    fn render(&mut self, controller: &mut WizardController) -> Result<Intent>;

    /// A step was rejected; returning an error aborts the flow
    fn rejected(&mut self, controller: &WizardController, rejection: &ValidationError) -> Result<()>;
}

/// Run a flow to completion. `None` means the user quit.
pub fn drive(
    controller: &mut WizardController,
    renderer: &mut dyn StepRenderer,
) -> Result<Option<Submission>> {
    loop {
        match renderer.render(controller)? {
            Intent::Quit => {
                debug!(flow = %controller.flow(), step = controller.current_step(), "quit");
                return Ok(None);
            }
            Intent::Back => {
                controller.retreat();
            }
            Intent::Next => match controller.advance() {
                Ok(Advance::Moved { .. }) => {}
                Ok(Advance::AtTerminal) => return controller.finalize().map(Some).map_err(Into::into),
                Err(WizardError::Rejected(rejection)) => renderer.rejected(controller, &rejection)?,
                Err(e) => return Err(e.into()),
            },
        }
    }
}
