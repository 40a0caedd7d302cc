//! Rule tables for each flow

use std::collections::HashMap;

use crate::core::field::Field;
use crate::core::flow::Flow;
use crate::schema::rules::{Rule, RuleSet};

/// The only code the confirmation step accepts
pub const CONFIRMATION_CODE: &str = "1234";

const DIGITS_ONLY: &str = "Phone number must contain only digits";

/// Field rules for one flow
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    flow: Flow,
    rules: HashMap<Field, RuleSet>,
}

impl SchemaRegistry {
    /// Build the rule table for `flow`
    pub fn for_flow(flow: Flow) -> Self {
        let rules = match flow {
            Flow::Registration => registration(),
            Flow::Profile => profile(),
        };
        Self { flow, rules }
    }

    pub fn flow(&self) -> Flow {
        self.flow
    }

    /// Rules of `field`; fields without a table entry accept anything
    pub fn get(&self, field: Field) -> Option<&RuleSet> {
        self.rules.get(&field)
    }

    pub fn has_rules(&self, field: Field) -> bool {
        self.rules.contains_key(&field)
    }
}

fn registration() -> HashMap<Field, RuleSet> {
    HashMap::from([
        (Field::DialCode, RuleSet::any()),
        (
            Field::PhoneNumber,
            RuleSet::new(vec![Rule::length(1, 15), Rule::pattern(r"^\d+$", DIGITS_ONLY)]),
        ),
        (
            Field::ConfirmationCode,
            RuleSet::new(vec![Rule::literal(
                CONFIRMATION_CODE,
                format!("Code is incorrect, try {}", CONFIRMATION_CODE),
            )]),
        ),
        (Field::Email, RuleSet::new(vec![Rule::Email])),
        (Field::Password, RuleSet::new(vec![Rule::min_length(8)])),
    ])
}

fn profile() -> HashMap<Field, RuleSet> {
    let required = || RuleSet::new(vec![Rule::NonEmpty]);
    let optional = || RuleSet::new(vec![Rule::Optional]);

    HashMap::from([
        (
            Field::Agreement,
            RuleSet::new(vec![Rule::literal(true, "You must accept Terms and Use")]),
        ),
        (Field::FirstName, required()),
        (Field::SecondName, required()),
        (Field::BirthDate, required()),
        (Field::BirthPlace, required()),
        (Field::Email, RuleSet::new(vec![Rule::Email])),
        (
            Field::PhoneNumber,
            RuleSet::new(vec![
                Rule::length(1, 15),
                Rule::pattern(r"^\+(\d|\s)*$", DIGITS_ONLY),
            ]),
        ),
        (Field::SkypeName, optional()),
        (Field::FacebookProfile, optional()),
        (Field::Address, required()),
        (Field::City, required()),
        (Field::Country, required()),
        (Field::ZipCode, RuleSet::any()),
        (Field::Optional, optional()),
    ])
}
