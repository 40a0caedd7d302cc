//! Interactive step renderer built on dialoguer prompts

use chrono::NaiveDate;
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password, Select};
use miette::{IntoDiagnostic, Result};

use crate::cli::flow::{Intent, StepRenderer};
use crate::cli::helpers::progress_dots;
use crate::core::field::{Field, FieldValue};
use crate::core::flow::Flow;
use crate::core::wizard::WizardController;
use crate::schema::ValidationError;

const PRIVACY_NOTICE: &str = "We take privacy issues seriously. You can be sure that your \
                              personal data is securely protected.";

const TERMS_URL: &str = "https://en.wikipedia.org/wiki/Terms_of_service";

/// Renders each step as a series of terminal prompts
pub struct PromptRenderer {
    theme: ColorfulTheme,
    show_privacy_notice: bool,
    quit: bool,
}

impl PromptRenderer {
    pub fn new(quiet: bool) -> Self {
        Self {
            theme: ColorfulTheme::default(),
            show_privacy_notice: !quiet,
            quit: false,
        }
    }

    fn header(&mut self, controller: &WizardController) {
        let flow = controller.flow();
        let step = controller.current_step();

        println!();
        println!("{}", progress_dots(step));
        println!();
        println!("{} {}", style("◆").cyan(), style(flow.title()).bold());
        println!("{}", style(flow.subtitle()).dim());
        println!("{}", style("─".repeat(50)).dim());

        if flow == Flow::Registration {
            match step {
                0 if self.show_privacy_notice => {
                    println!("{} {}", style("🔒").dim(), PRIVACY_NOTICE);
                    self.show_privacy_notice = false;
                }
                1 | 2 => {
                    if let Some(banner) = controller.confirmation_banner() {
                        let status = if step == 1 {
                            style("Number not confirmed yet".to_string()).yellow()
                        } else {
                            style("✓ Number confirmed".to_string()).green()
                        };
                        println!("{}  {}", style(banner).bold(), status);
                    }
                }
                _ => {}
            }
        }

        println!();
        println!("{}", style(flow.step_heading(step)).underlined());
    }

    /// Fields to ask for: only the failing ones after a rejection
    fn fields_to_prompt(controller: &WizardController) -> Vec<Field> {
        let group = controller.current_group();
        let failing: Vec<Field> = group
            .iter()
            .copied()
            .filter(|f| controller.error(*f).is_some())
            .collect();
        if failing.is_empty() {
            group.to_vec()
        } else {
            failing
        }
    }

    fn prompt_field(&self, controller: &WizardController, field: Field) -> Result<FieldValue> {
        if let Some(message) = controller.error(field) {
            println!("  {} {}", style("✗").red(), style(message).red());
        }
        let current = controller.text(field).to_string();
        let prompt = field.label();

        match field {
            Field::Agreement => {
                let agreed = Confirm::with_theme(&self.theme)
                    .with_prompt(format!("{} ({})", prompt, style(TERMS_URL).dim()))
                    .default(controller.value(field).is_some_and(FieldValue::as_flag))
                    .interact()
                    .into_diagnostic()?;
                Ok(FieldValue::Flag(agreed))
            }

            Field::DialCode => {
                let options = controller.dial_code_options();
                self.select_or_input(prompt, options.iter().map(String::as_str).collect(), &current, false)
            }

            // Birth place starts unselected, like an empty first option
            Field::BirthPlace => {
                let options = controller.country_options();
                self.select_or_input(prompt, options, &current, true)
            }

            Field::Country => {
                let options = controller.country_options();
                self.select_or_input(prompt, options, controller.effective_country(), false)
            }

            Field::City => {
                let options = controller.city_options();
                self.select_or_input(prompt, options.iter().map(String::as_str).collect(), &current, false)
            }

            Field::Password => {
                let value = Password::with_theme(&self.theme)
                    .with_prompt(prompt)
                    .allow_empty_password(true)
                    .interact()
                    .into_diagnostic()?;
                Ok(FieldValue::Text(value))
            }

            Field::BirthDate => {
                let value: String = Input::with_theme(&self.theme)
                    .with_prompt(format!("{} (YYYY-MM-DD)", prompt))
                    .with_initial_text(current)
                    .allow_empty(true)
                    .validate_with(|input: &String| -> std::result::Result<(), String> {
                        if input.is_empty() {
                            return Ok(());
                        }
                        NaiveDate::parse_from_str(input, "%Y-%m-%d")
                            .map(|_| ())
                            .map_err(|_| "Enter a date like 1990-04-25".to_string())
                    })
                    .interact_text()
                    .into_diagnostic()?;
                Ok(FieldValue::Text(value))
            }

            _ => self.input(prompt, &current),
        }
    }

    fn input(&self, prompt: &str, current: &str) -> Result<FieldValue> {
        let value: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .with_initial_text(current)
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;
        Ok(FieldValue::Text(value.trim().to_string()))
    }

    /// A picker over `options`, or free text when there is nothing to pick from
    fn select_or_input(
        &self,
        prompt: &str,
        options: Vec<&str>,
        current: &str,
        blank_first: bool,
    ) -> Result<FieldValue> {
        if options.is_empty() {
            return self.input(prompt, current);
        }
        let (items, default_idx) = picker_items(options, current, blank_first);
        let selection = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(&items)
            .default(default_idx)
            .max_length(12)
            .interact()
            .into_diagnostic()?;
        Ok(FieldValue::text(items[selection]))
    }

    /// Leave the step: the registration code step can go back to edit the number
    fn navigation(&self, controller: &WizardController) -> Result<Intent> {
        let flow = controller.flow();
        let step = controller.current_step();
        let action = flow.action_label(step);

        if flow == Flow::Registration && step == 1 {
            let items = [action, "Edit number"];
            let selection = Select::with_theme(&self.theme)
                .items(&items)
                .default(0)
                .interact()
                .into_diagnostic()?;
            return Ok(if selection == 0 { Intent::Next } else { Intent::Back });
        }

        println!("{}", style(format!("[ {} ]", action)).cyan());
        Ok(Intent::Next)
    }
}

/// Picker entries and the preselected index. With `blank_first` an empty
/// entry leads the list and is preselected until something was chosen.
fn picker_items<'a>(options: Vec<&'a str>, current: &str, blank_first: bool) -> (Vec<&'a str>, usize) {
    let mut items = options;
    if blank_first {
        items.insert(0, "");
    }
    let default_idx = items.iter().position(|o| *o == current).unwrap_or(0);
    (items, default_idx)
}

impl StepRenderer for PromptRenderer {
    fn render(&mut self, controller: &mut WizardController) -> Result<Intent> {
        if self.quit {
            return Ok(Intent::Quit);
        }
        self.header(controller);

        for field in Self::fields_to_prompt(controller) {
            let value = self.prompt_field(controller, field)?;
            controller.set_field(field, value)?;
        }

        self.navigation(controller)
    }

    fn rejected(&mut self, _: &WizardController, rejection: &ValidationError) -> Result<()> {
        println!();
        println!("{} {}", style("!").yellow(), rejection);
        for violation in rejection.violations() {
            println!("  {} {}", style(violation.field.label()).bold(), style(&violation.message).red());
        }

        let retry = Confirm::with_theme(&self.theme)
            .with_prompt("Correct and retry?")
            .default(true)
            .interact()
            .into_diagnostic()?;
        self.quit = !retry;
        Ok(())
    }
}
