//! The two wizard flows and their step layouts

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::field::Field;

/// Number of steps in every flow
pub const STEP_COUNT: usize = 3;

/// Which wizard is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
    Registration,
    Profile,
}

impl Flow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flow::Registration => "registration",
            Flow::Profile => "profile",
        }
    }

    /// Heading shown above the steps
    pub fn title(&self) -> &'static str {
        match self {
            Flow::Registration => "Registration",
            Flow::Profile => "Profile info",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            Flow::Registration => {
                "Fill in the registration data. It will take a couple of minutes.\n\
                 All you need is a phone number and e-mail"
            }
            Flow::Profile => {
                "Fill in the data for profile. It will take a couple of minutes.\n\
                 You only need a passport"
            }
        }
    }

    /// Fields gating progression out of `step`, in focus order
    pub fn group(&self, step: usize) -> &'static [Field] {
        match (self, step) {
            (Flow::Registration, 0) => &[Field::DialCode, Field::PhoneNumber],
            (Flow::Registration, 1) => &[Field::ConfirmationCode],
            (Flow::Registration, 2) => &[Field::Email, Field::Password],
            (Flow::Profile, 0) => &[
                Field::Agreement,
                Field::FirstName,
                Field::SecondName,
                Field::BirthDate,
                Field::BirthPlace,
            ],
            (Flow::Profile, 1) => &[
                Field::Email,
                Field::PhoneNumber,
                Field::SkypeName,
                Field::FacebookProfile,
            ],
            (Flow::Profile, 2) => &[
                Field::Address,
                Field::City,
                Field::Country,
                Field::ZipCode,
                Field::Optional,
            ],
            _ => &[],
        }
    }

    /// All fields of the flow, step by step
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        (0..STEP_COUNT).flat_map(move |step| self.group(step).iter().copied())
    }

    pub fn terminal_step(&self) -> usize {
        STEP_COUNT - 1
    }

    /// Section heading for a step
    pub fn step_heading(&self, step: usize) -> &'static str {
        match (self, step) {
            (Flow::Registration, 0) => "Enter your phone number",
            (Flow::Registration, 1) => "Confirm phone number with code from sms message",
            (Flow::Registration, 2) => "Enter your email and set a password",
            (Flow::Profile, 0) => "Personal data (specify exactly as in your passport)",
            (Flow::Profile, 1) => "Contacts and social network",
            (Flow::Profile, 2) => "Delivery address",
            _ => "",
        }
    }

    /// Label of the button that leaves a step
    pub fn action_label(&self, step: usize) -> &'static str {
        match (self, step) {
            (Flow::Registration, 0) => "Send Code",
            (Flow::Registration, 1) => "Confirm",
            (Flow::Registration, _) => "Register Now",
            (Flow::Profile, 2) => "Save",
            (Flow::Profile, _) => "Go Next →",
        }
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
