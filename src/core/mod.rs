//! Core module - wizard state, reference data and configuration

pub mod config;
pub mod field;
pub mod flow;
pub mod lookup;
pub mod wizard;

pub use config::{Config, ConfigError};
pub use field::{Field, FieldValue, UnknownField};
pub use flow::{Flow, STEP_COUNT};
pub use lookup::{
    load_reference_data, CountryCityIndex, CountryRecord, DialCodeList, FileLookup, HttpLookup,
    LookupError, LookupService, ReferenceData,
};
pub use wizard::{
    Advance, ProfileSeed, ReferenceState, Submission, WizardController, WizardError, WizardState,
};
