//! Schema system - per-flow rule tables and step validation

pub mod registry;
pub mod rules;
pub mod validator;

pub use registry::{SchemaRegistry, CONFIRMATION_CODE};
pub use rules::{Rule, RuleSet};
pub use validator::{FieldViolation, ValidationError, Validator};
