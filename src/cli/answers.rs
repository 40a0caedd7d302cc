//! Non-interactive renderer fed from an answers file
//!
//! An answers file is YAML with one optional section per flow, mapping field
//! wire names to values:
//!
//! ```yaml
//! registration:
//!   dialCode: "+33"
//!   phoneNumber: "5551234"
//!   confirmationCode: "1234"
//! profile:
//!   agreement: true
//!   city: Paris
//! ```

use console::style;
use miette::{Diagnostic, Result};
use serde::Deserialize;
use serde_yml::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::cli::flow::{Intent, StepRenderer};
use crate::core::field::{Field, FieldValue};
use crate::core::flow::Flow;
use crate::core::wizard::WizardController;
use crate::schema::ValidationError;

#[derive(Debug, Error, Diagnostic)]
pub enum AnswersError {
    #[error("Cannot read answers file {path}: {source}")]
    #[diagnostic(code(signup::answers::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid answers file {path}: {message}")]
    #[diagnostic(code(signup::answers::parse))]
    Parse { path: PathBuf, message: String },

    #[error("Unsupported value for {field}: expected text or true/false")]
    #[diagnostic(code(signup::answers::value))]
    BadValue { field: Field },

    #[error("Unquoted number for {field}")]
    #[diagnostic(
        code(signup::answers::unquoted),
        help("Numbers drop a leading '+' or '0'; quote the value, e.g. {field}: \"+33\"")
    )]
    UnquotedNumber { field: Field },

    #[error("Field {field} is not part of the {flow} flow")]
    #[diagnostic(code(signup::answers::wrong_flow))]
    NotInFlow { field: Field, flow: Flow },

    #[error(transparent)]
    #[diagnostic(
        code(signup::answers::unknown_field),
        help("Field names are camelCase, e.g. phoneNumber or zipCode")
    )]
    UnknownField(#[from] crate::core::field::UnknownField),

    #[error("{0}")]
    #[diagnostic(
        code(signup::answers::rejected),
        help("Fix the answers file and run again")
    )]
    Rejected(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AnswersFile {
    registration: BTreeMap<String, Value>,
    profile: BTreeMap<String, Value>,
}

/// Prepared answers for both flows
#[derive(Debug, Default, Clone)]
pub struct Answers {
    registration: BTreeMap<Field, FieldValue>,
    profile: BTreeMap<Field, FieldValue>,
}

impl Answers {
    pub fn load(path: &Path) -> std::result::Result<Self, AnswersError> {
        let contents = std::fs::read_to_string(path).map_err(|source| AnswersError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|e| match e {
            AnswersError::Parse { message, .. } => AnswersError::Parse {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    pub fn parse(contents: &str) -> std::result::Result<Self, AnswersError> {
        let file: AnswersFile = serde_yml::from_str(contents).map_err(|e| AnswersError::Parse {
            path: PathBuf::new(),
            message: e.to_string(),
        })?;
        Ok(Self {
            registration: convert(Flow::Registration, file.registration)?,
            profile: convert(Flow::Profile, file.profile)?,
        })
    }

    pub fn for_flow(&self, flow: Flow) -> &BTreeMap<Field, FieldValue> {
        match flow {
            Flow::Registration => &self.registration,
            Flow::Profile => &self.profile,
        }
    }
}

fn convert(
    flow: Flow,
    raw: BTreeMap<String, Value>,
) -> std::result::Result<BTreeMap<Field, FieldValue>, AnswersError> {
    raw.into_iter()
        .map(|(name, value)| {
            let field: Field = name.parse()?;
            if !flow.fields().any(|f| f == field) {
                return Err(AnswersError::NotInFlow { field, flow });
            }
            let value = match value {
                Value::Bool(b) => FieldValue::Flag(b),
                Value::String(s) => FieldValue::Text(s),
                // YAML has already turned `+33` into 33; the original text is gone
                Value::Number(_) => return Err(AnswersError::UnquotedNumber { field }),
                Value::Null => field.empty_value(),
                _ => return Err(AnswersError::BadValue { field }),
            };
            Ok((field, value))
        })
        .collect()
}

/// Applies the answers of each step, then moves on
pub struct AnswersRenderer {
    values: BTreeMap<Field, FieldValue>,
    quiet: bool,
}

impl AnswersRenderer {
    pub fn new(answers: &Answers, flow: Flow, quiet: bool) -> Self {
        Self {
            values: answers.for_flow(flow).clone(),
            quiet,
        }
    }
}

impl StepRenderer for AnswersRenderer {
    fn render(&mut self, controller: &mut WizardController) -> Result<Intent> {
        for field in controller.current_group() {
            if let Some(value) = self.values.get(field) {
                controller.set_field(*field, value.clone())?;
            }
        }
        if !self.quiet {
            eprintln!(
                "{} {} step {} answered",
                style("→").cyan(),
                controller.flow().title(),
                controller.current_step() + 1
            );
        }
        Ok(Intent::Next)
    }

    fn rejected(&mut self, _: &WizardController, rejection: &ValidationError) -> Result<()> {
        for violation in rejection.violations() {
            eprintln!(
                "  {} {}: {}",
                style("✗").red(),
                violation.field,
                violation.message
            );
        }
        Err(AnswersError::Rejected(rejection.to_string()).into())
    }
}
