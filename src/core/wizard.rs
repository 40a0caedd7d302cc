//! Wizard controller: step state machine with validation gating
//!
//! A controller owns the [`WizardState`] of one running flow together with
//! the flow's reference data. Forward navigation validates only the fields
//! of the current step; backward navigation is always allowed. Fields of
//! other steps are never re-checked, even when they hold stale values.

use miette::Diagnostic;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::field::{Field, FieldValue};
use crate::core::flow::Flow;
use crate::core::lookup::{LookupError, LookupService, ReferenceData};
use crate::schema::validator::{ValidationError, Validator};

/// Mutable state of a running flow
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardState {
    pub current_step: usize,
    pub fields: BTreeMap<Field, FieldValue>,
    /// Messages from the last check, only for fields that failed it
    pub errors: BTreeMap<Field, String>,
}

/// Reference data as seen by a running flow
#[derive(Debug, Clone, Default)]
pub enum ReferenceState {
    /// Not loaded yet; option lists are empty but the flow is usable
    #[default]
    Pending,
    Ready(ReferenceData),
    /// Loading failed; the flow cannot progress
    Failed(String),
}

/// Values a profile flow starts with, usually from a finished registration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileSeed {
    pub email: String,
    pub phone_number: String,
}

/// Successful forward navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved { from: usize, to: usize },
    /// The terminal step passed; the flow may be finalized
    AtTerminal,
}

/// Payload handed out when a flow completes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub flow: Flow,
    pub fields: BTreeMap<Field, FieldValue>,
}

impl Submission {
    pub fn text(&self, field: Field) -> &str {
        self.fields.get(&field).map(|v| v.as_text()).unwrap_or("")
    }

    /// Copy with the password masked, for display
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if let Some(value) = copy.fields.get_mut(&Field::Password) {
            if !value.is_empty() {
                *value = FieldValue::text("********");
            }
        }
        copy
    }

    /// Seed for a profile flow following this registration
    pub fn profile_seed(&self) -> ProfileSeed {
        let dial = self.text(Field::DialCode);
        let phone = self.text(Field::PhoneNumber);
        let phone_number = if dial.is_empty() {
            phone.to_string()
        } else {
            format!("{} {}", dial, phone)
        };
        ProfileSeed {
            email: self.text(Field::Email).to_string(),
            phone_number,
        }
    }
}

/// Errors that can occur while driving a flow
#[derive(Debug, Error, Diagnostic)]
pub enum WizardError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Rejected(#[from] ValidationError),

    #[error("Reference data unavailable: {0}")]
    #[diagnostic(
        code(signup::wizard::reference_unavailable),
        help("Check your network connection or pass --reference-dir with saved responses")
    )]
    ReferenceUnavailable(String),

    #[error("Cannot finalize from step {} of {}", .step + 1, .total)]
    #[diagnostic(code(signup::wizard::not_at_terminal))]
    NotAtTerminal { step: usize, total: usize },

    #[error("Field {field} is not part of the {flow} flow")]
    #[diagnostic(code(signup::wizard::unknown_field))]
    UnknownField { field: Field, flow: Flow },
}

/// Drives one flow's step progression
#[derive(Debug, Clone)]
pub struct WizardController {
    flow: Flow,
    state: WizardState,
    validator: Validator,
    reference: ReferenceState,
}

impl WizardController {
    /// A fresh flow at step 0 with every field empty
    pub fn new(flow: Flow) -> Self {
        let fields = flow.fields().map(|f| (f, f.empty_value())).collect();
        Self {
            flow,
            state: WizardState {
                current_step: 0,
                fields,
                errors: BTreeMap::new(),
            },
            validator: Validator::for_flow(flow),
            reference: ReferenceState::Pending,
        }
    }

    pub fn registration() -> Self {
        Self::new(Flow::Registration)
    }

    /// A profile flow with contact fields pre-filled from `seed`
    pub fn profile(seed: ProfileSeed) -> Self {
        let mut controller = Self::new(Flow::Profile);
        controller.write(Field::Email, FieldValue::Text(seed.email));
        controller.write(Field::PhoneNumber, FieldValue::Text(seed.phone_number));
        controller
    }

    pub fn flow(&self) -> Flow {
        self.flow
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn current_step(&self) -> usize {
        self.state.current_step
    }

    pub fn is_terminal(&self) -> bool {
        self.state.current_step == self.flow.terminal_step()
    }

    /// Fields of the current step, in focus order
    pub fn current_group(&self) -> &'static [Field] {
        self.flow.group(self.state.current_step)
    }

    pub fn value(&self, field: Field) -> Option<&FieldValue> {
        self.state.fields.get(&field)
    }

    pub fn text(&self, field: Field) -> &str {
        self.value(field).map(|v| v.as_text()).unwrap_or("")
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.state.errors.get(&field).map(String::as_str)
    }

    pub fn reference(&self) -> &ReferenceState {
        &self.reference
    }

    /// Install reference data loaded elsewhere
    pub fn set_reference(&mut self, reference: ReferenceState) {
        self.reference = reference;
    }

    /// Fetch this flow's reference data; a failure blocks the flow
    pub fn load_reference_data(&mut self, service: &dyn LookupService) -> Result<(), LookupError> {
        match crate::core::lookup::load_reference_data(self.flow, service) {
            Ok(data) => {
                self.reference = ReferenceState::Ready(data);
                Ok(())
            }
            Err(e) => {
                warn!(flow = %self.flow, error = %e, "reference data failed to load");
                self.reference = ReferenceState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Store a value; nothing is validated
    pub fn set_field(
        &mut self,
        field: Field,
        value: impl Into<FieldValue>,
    ) -> Result<(), WizardError> {
        if !self.state.fields.contains_key(&field) {
            return Err(WizardError::UnknownField {
                field,
                flow: self.flow,
            });
        }
        self.write(field, value.into());
        Ok(())
    }

    fn write(&mut self, field: Field, value: FieldValue) {
        self.state.fields.insert(field, value);
    }

    fn ensure_reference(&self) -> Result<(), WizardError> {
        match &self.reference {
            ReferenceState::Failed(message) => {
                Err(WizardError::ReferenceUnavailable(message.clone()))
            }
            _ => Ok(()),
        }
    }

    /// Validate the current step's group, recording its errors
    fn check_current(&mut self) -> Result<(), ValidationError> {
        let step = self.state.current_step;
        for field in self.flow.group(step) {
            self.state.errors.remove(field);
        }
        let result = self.validator.validate_step(step, &self.effective_fields());
        if let Err(rejection) = &result {
            for violation in rejection.violations() {
                self.state
                    .errors
                    .insert(violation.field, violation.message.clone());
            }
            warn!(
                flow = %self.flow,
                step,
                failures = rejection.violations().len(),
                "step rejected"
            );
        }
        result
    }

    /// Move forward if every field of the current step passes
    pub fn advance(&mut self) -> Result<Advance, WizardError> {
        self.ensure_reference()?;
        self.check_current()?;

        if self.is_terminal() {
            return Ok(Advance::AtTerminal);
        }

        let from = self.state.current_step;
        let to = from + 1;
        self.state.current_step = to;
        debug!(flow = %self.flow, from, to, "advanced");
        Ok(Advance::Moved { from, to })
    }

    /// Move back one step without validating; stays at 0
    pub fn retreat(&mut self) -> usize {
        let from = self.state.current_step;
        self.state.current_step = from.saturating_sub(1);
        debug!(flow = %self.flow, from, to = self.state.current_step, "retreated");
        self.state.current_step
    }

    /// Complete the flow; only the terminal step can finalize
    pub fn finalize(&mut self) -> Result<Submission, WizardError> {
        if !self.is_terminal() {
            return Err(WizardError::NotAtTerminal {
                step: self.state.current_step,
                total: self.flow.terminal_step() + 1,
            });
        }
        self.ensure_reference()?;
        self.check_current()?;
        debug!(flow = %self.flow, "finalized");
        Ok(Submission {
            flow: self.flow,
            fields: self.effective_fields(),
        })
    }

    /// Delivery country, falling back to the birth country while none was chosen
    pub fn effective_country(&self) -> &str {
        match self.text(Field::Country) {
            "" if self.flow == Flow::Profile => self.text(Field::BirthPlace),
            country => country,
        }
    }

    /// Stored fields with derived defaults applied; the stored values are untouched
    fn effective_fields(&self) -> BTreeMap<Field, FieldValue> {
        let mut fields = self.state.fields.clone();
        if self.flow == Flow::Profile {
            fields.insert(Field::Country, FieldValue::text(self.effective_country()));
        }
        fields
    }

    /// Read-only "dial code + number" line shown once the number was entered
    pub fn confirmation_banner(&self) -> Option<String> {
        if self.flow != Flow::Registration || self.state.current_step == 0 {
            return None;
        }
        Some(format!(
            "{} {}",
            self.text(Field::DialCode),
            self.text(Field::PhoneNumber)
        ))
    }

    fn data(&self) -> Option<&ReferenceData> {
        match &self.reference {
            ReferenceState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn dial_code_options(&self) -> &[String] {
        self.data().map(|d| d.dial_codes.as_slice()).unwrap_or(&[])
    }

    /// Every known country, independent of the birth place
    pub fn country_options(&self) -> Vec<&str> {
        self.data()
            .map(|d| d.countries.countries().collect())
            .unwrap_or_default()
    }

    /// Cities of the effective country; empty when it is unknown
    pub fn city_options(&self) -> &[String] {
        let country = self.effective_country();
        self.data()
            .map(|d| d.countries.cities(country))
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lookup::{CountryCityIndex, CountryRecord, DialCodeList};

    fn index() -> CountryCityIndex {
        CountryCityIndex::new(vec![
            CountryRecord {
                country: "France".to_string(),
                cities: vec!["Lyon".to_string(), "Paris".to_string()],
            },
            CountryRecord {
                country: "Spain".to_string(),
                cities: vec!["Madrid".to_string()],
            },
        ])
    }

    fn ready(controller: &mut WizardController) {
        controller.set_reference(ReferenceState::Ready(ReferenceData {
            dial_codes: DialCodeList::new(vec!["+33".to_string(), "+1".to_string()]),
            countries: index(),
        }));
    }

    fn seeded_profile() -> WizardController {
        let mut c = WizardController::profile(ProfileSeed {
            email: "a@b.com".to_string(),
            phone_number: "+123".to_string(),
        });
        ready(&mut c);
        c
    }

    fn fill_profile_step0(c: &mut WizardController) {
        c.set_field(Field::Agreement, true).unwrap();
        c.set_field(Field::FirstName, "Ada").unwrap();
        c.set_field(Field::SecondName, "Lovelace").unwrap();
        c.set_field(Field::BirthDate, "1815-12-10").unwrap();
        c.set_field(Field::BirthPlace, "France").unwrap();
    }

    #[test]
    fn test_registration_happy_path() {
        let mut c = WizardController::registration();
        ready(&mut c);
        c.set_field(Field::DialCode, "+33").unwrap();
        c.set_field(Field::PhoneNumber, "5551234").unwrap();
        assert_eq!(c.advance().unwrap(), Advance::Moved { from: 0, to: 1 });
        c.set_field(Field::ConfirmationCode, "1234").unwrap();
        assert_eq!(c.advance().unwrap(), Advance::Moved { from: 1, to: 2 });
        c.set_field(Field::Email, "a@b.com").unwrap();
        c.set_field(Field::Password, "hunter22").unwrap();
        assert_eq!(c.advance().unwrap(), Advance::AtTerminal);
        assert_eq!(c.current_step(), 2);

        let submission = c.finalize().unwrap();
        assert_eq!(submission.flow, Flow::Registration);
        assert_eq!(submission.text(Field::PhoneNumber), "5551234");
        assert_eq!(submission.redacted().text(Field::Password), "********");
    }

    #[test]
    fn test_rejection_keeps_step_and_sets_errors() {
        let mut c = WizardController::registration();
        c.set_field(Field::PhoneNumber, "555-1234").unwrap();
        let err = c.advance().unwrap_err();
        let WizardError::Rejected(rejection) = err else {
            panic!("expected rejection");
        };
        assert_eq!(rejection.focus(), Some(Field::PhoneNumber));
        assert_eq!(c.current_step(), 0);
        assert_eq!(
            c.error(Field::PhoneNumber),
            Some("Phone number must contain only digits")
        );
        assert_eq!(c.error(Field::DialCode), None);
    }

    #[test]
    fn test_phone_number_rules() {
        for (input, ok) in [("5551234", true), ("", false), ("55a1234", false), ("+5551234", false)] {
            let mut c = WizardController::registration();
            c.set_field(Field::PhoneNumber, input).unwrap();
            assert_eq!(c.advance().is_ok(), ok, "{input:?}");
        }
    }

    #[test]
    fn test_confirmation_code_only_1234() {
        for code in ["0000", "12345", "", " 1234"] {
            let mut c = WizardController::registration();
            c.set_field(Field::PhoneNumber, "5551234").unwrap();
            c.advance().unwrap();
            c.set_field(Field::ConfirmationCode, code).unwrap();
            assert!(c.advance().is_err());
            assert_eq!(c.error(Field::ConfirmationCode), Some("Code is incorrect, try 1234"));
            assert_eq!(c.current_step(), 1);
        }
    }

    #[test]
    fn test_advance_does_not_touch_other_fields() {
        let mut c = WizardController::registration();
        c.set_field(Field::PhoneNumber, "5551234").unwrap();
        c.set_field(Field::Email, "not an email").unwrap();
        let before = c.state().fields.clone();
        c.advance().unwrap();
        assert_eq!(c.state().fields, before);
        assert_eq!(c.error(Field::Email), None);
    }

    #[test]
    fn test_profile_advance_does_not_touch_other_fields() {
        let mut c = seeded_profile();
        fill_profile_step0(&mut c);
        for _ in 0..2 {
            let before = c.state().fields.clone();
            c.advance().unwrap();
            assert_eq!(c.state().fields, before);
        }
        assert_eq!(c.current_step(), 2);
        assert_eq!(c.text(Field::Country), "");
    }

    #[test]
    fn test_country_default_counts_for_validation() {
        let mut c = seeded_profile();
        fill_profile_step0(&mut c);
        c.advance().unwrap();
        c.advance().unwrap();
        c.set_field(Field::Address, "1 Rue de Rivoli").unwrap();
        c.set_field(Field::City, "Paris").unwrap();
        assert_eq!(c.advance().unwrap(), Advance::AtTerminal);
        assert_eq!(c.error(Field::Country), None);
        c.set_field(Field::BirthPlace, "").unwrap();
        assert!(c.advance().is_err());
        assert_eq!(
            c.error(Field::Country),
            Some("String must contain at least 1 character(s)")
        );
    }

    #[test]
    fn test_stale_invalid_fields_outside_group_do_not_block() {
        let mut c = WizardController::registration();
        c.set_field(Field::PhoneNumber, "5551234").unwrap();
        c.advance().unwrap();
        // Break step 0 while sitting on step 1
        c.set_field(Field::PhoneNumber, "abc").unwrap();
        c.set_field(Field::ConfirmationCode, "1234").unwrap();
        assert!(c.advance().is_ok());
        assert_eq!(c.current_step(), 2);
    }

    #[test]
    fn test_retreat_then_advance_clears_stale_errors() {
        let mut c = WizardController::registration();
        c.set_field(Field::PhoneNumber, "x").unwrap();
        assert!(c.advance().is_err());
        assert!(c.error(Field::PhoneNumber).is_some());
        c.set_field(Field::PhoneNumber, "5551234").unwrap();
        c.advance().unwrap();
        assert_eq!(c.retreat(), 0);
        assert_eq!(c.advance().unwrap(), Advance::Moved { from: 0, to: 1 });
        assert!(c.state().errors.is_empty());
    }

    #[test]
    fn test_retreat_bounded_at_zero() {
        let mut c = WizardController::registration();
        assert_eq!(c.retreat(), 0);
        assert_eq!(c.retreat(), 0);
    }

    #[test]
    fn test_finalize_requires_terminal_step() {
        let mut c = WizardController::registration();
        let err = c.finalize().unwrap_err();
        assert!(matches!(err, WizardError::NotAtTerminal { step: 0, total: 3 }));
        assert_eq!(err.to_string(), "Cannot finalize from step 1 of 3");
    }

    #[test]
    fn test_finalize_revalidates_terminal_group() {
        let mut c = WizardController::registration();
        c.set_field(Field::PhoneNumber, "5551234").unwrap();
        c.advance().unwrap();
        c.set_field(Field::ConfirmationCode, "1234").unwrap();
        c.advance().unwrap();
        c.set_field(Field::Email, "a@b.com").unwrap();
        c.set_field(Field::Password, "short").unwrap();
        assert!(matches!(c.finalize(), Err(WizardError::Rejected(_))));
        assert_eq!(
            c.error(Field::Password),
            Some("String must contain at least 8 character(s)")
        );
    }

    #[test]
    fn test_confirmation_banner() {
        let mut c = WizardController::registration();
        c.set_field(Field::DialCode, "+33").unwrap();
        c.set_field(Field::PhoneNumber, "5551234").unwrap();
        assert_eq!(c.confirmation_banner(), None);
        let before = c.state().fields.clone();
        c.advance().unwrap();
        assert_eq!(c.confirmation_banner().as_deref(), Some("+33 5551234"));
        assert_eq!(c.state().fields, before);
    }

    #[test]
    fn test_agreement_required() {
        let mut c = seeded_profile();
        fill_profile_step0(&mut c);
        c.set_field(Field::Agreement, false).unwrap();
        let err = c.advance().unwrap_err();
        assert!(matches!(err, WizardError::Rejected(_)));
        assert_eq!(c.error(Field::Agreement), Some("You must accept Terms and Use"));
        assert_eq!(c.state().errors.len(), 1);
        assert_eq!(c.current_step(), 0);
    }

    #[test]
    fn test_profile_seed_visible_on_step1() {
        let mut c = seeded_profile();
        fill_profile_step0(&mut c);
        c.advance().unwrap();
        assert_eq!(c.current_group()[0], Field::Email);
        assert_eq!(c.text(Field::Email), "a@b.com");
        assert_eq!(c.text(Field::PhoneNumber), "+123");
        assert_eq!(c.advance().unwrap(), Advance::Moved { from: 1, to: 2 });
    }

    #[test]
    fn test_country_defaults_to_birth_place() {
        let mut c = seeded_profile();
        fill_profile_step0(&mut c);
        c.advance().unwrap();
        c.advance().unwrap();
        assert_eq!(c.effective_country(), "France");
        assert_eq!(c.text(Field::Country), "");
        assert_eq!(c.city_options(), &["Lyon".to_string(), "Paris".to_string()]);
        assert_eq!(c.country_options(), vec!["France", "Spain"]);
    }

    #[test]
    fn test_chosen_country_not_overwritten() {
        let mut c = seeded_profile();
        fill_profile_step0(&mut c);
        c.set_field(Field::Country, "Spain").unwrap();
        c.advance().unwrap();
        c.advance().unwrap();
        assert_eq!(c.text(Field::Country), "Spain");
        assert_eq!(c.city_options(), &["Madrid".to_string()]);
    }

    #[test]
    fn test_unknown_country_has_no_cities() {
        let mut c = seeded_profile();
        c.set_field(Field::Country, "France").unwrap();
        assert_eq!(c.city_options().len(), 2);
        c.set_field(Field::Country, "Atlantis").unwrap();
        assert!(c.city_options().is_empty());
        c.set_field(Field::Country, "").unwrap();
        assert!(c.city_options().is_empty());
    }

    #[test]
    fn test_pending_reference_serves_empty_options() {
        let c = WizardController::profile(ProfileSeed::default());
        assert!(c.country_options().is_empty());
        assert!(c.city_options().is_empty());
        assert!(c.dial_code_options().is_empty());
    }

    #[test]
    fn test_failed_reference_blocks_progress() {
        let mut c = WizardController::registration();
        c.set_reference(ReferenceState::Failed("offline".to_string()));
        c.set_field(Field::PhoneNumber, "5551234").unwrap();
        let err = c.advance().unwrap_err();
        assert_eq!(err.to_string(), "Reference data unavailable: offline");
        assert_eq!(c.current_step(), 0);
    }

    #[test]
    fn test_set_field_outside_flow() {
        let mut c = WizardController::registration();
        let err = c.set_field(Field::City, "Paris").unwrap_err();
        assert!(matches!(err, WizardError::UnknownField { field: Field::City, .. }));
    }

    #[test]
    fn test_profile_full_run() {
        let mut c = seeded_profile();
        fill_profile_step0(&mut c);
        c.advance().unwrap();
        c.set_field(Field::SkypeName, "@ada").unwrap();
        c.advance().unwrap();
        c.set_field(Field::Address, "1 Rue de Rivoli").unwrap();
        c.set_field(Field::City, "Paris").unwrap();
        assert_eq!(c.advance().unwrap(), Advance::AtTerminal);
        let submission = c.finalize().unwrap();
        assert_eq!(submission.text(Field::Country), "France");
        assert_eq!(submission.text(Field::ZipCode), "");
        assert_eq!(submission.fields.len(), Flow::Profile.fields().count());
    }

    #[test]
    fn test_profile_seed_from_registration() {
        let submission = Submission {
            flow: Flow::Registration,
            fields: BTreeMap::from([
                (Field::DialCode, FieldValue::text("+33")),
                (Field::PhoneNumber, FieldValue::text("5551234")),
                (Field::Email, FieldValue::text("a@b.com")),
            ]),
        };
        let seed = submission.profile_seed();
        assert_eq!(seed.phone_number, "+33 5551234");
        assert_eq!(seed.email, "a@b.com");
    }
}
