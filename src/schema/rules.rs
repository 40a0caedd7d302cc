//! Field rules and their evaluation

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::field::FieldValue;

/// Matches the address shape accepted by common web form validators.
/// Leading dots and consecutive dots are rejected separately.
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@([A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$")
        .expect("email pattern is valid")
});

/// A single check applied to a field value
#[derive(Debug, Clone)]
pub enum Rule {
    /// At least one character
    NonEmpty,
    /// Character count within bounds
    Length { min: Option<usize>, max: Option<usize> },
    /// Whole value must match
    Pattern { regex: Regex, message: String },
    /// Value must equal exactly
    Literal { expected: FieldValue, message: String },
    /// Syntactically valid email address
    Email,
    /// Empty values skip every other rule of the field
    Optional,
}

impl Rule {
    pub fn length(min: usize, max: usize) -> Self {
        Rule::Length {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn min_length(min: usize) -> Self {
        Rule::Length {
            min: Some(min),
            max: None,
        }
    }

    /// Panics on an invalid pattern; rule tables are static
    pub fn pattern(pattern: &str, message: impl Into<String>) -> Self {
        Rule::Pattern {
            regex: Regex::new(pattern).expect("rule pattern is valid"),
            message: message.into(),
        }
    }

    pub fn literal(expected: impl Into<FieldValue>, message: impl Into<String>) -> Self {
        Rule::Literal {
            expected: expected.into(),
            message: message.into(),
        }
    }

    /// Check `value`, returning the failure message
    pub fn check(&self, value: &FieldValue) -> Result<(), String> {
        match self {
            Rule::NonEmpty => {
                if value.as_text().is_empty() {
                    Err(too_short(1))
                } else {
                    Ok(())
                }
            }
            Rule::Length { min, max } => {
                let len = value.as_text().chars().count();
                if let Some(min) = min {
                    if len < *min {
                        return Err(too_short(*min));
                    }
                }
                if let Some(max) = max {
                    if len > *max {
                        return Err(format!(
                            "String must contain at most {} character(s)",
                            max
                        ));
                    }
                }
                Ok(())
            }
            Rule::Pattern { regex, message } => {
                if regex.is_match(value.as_text()) {
                    Ok(())
                } else {
                    Err(message.clone())
                }
            }
            Rule::Literal { expected, message } => {
                if value == expected {
                    Ok(())
                } else {
                    Err(message.clone())
                }
            }
            Rule::Email => {
                if is_email(value.as_text()) {
                    Ok(())
                } else {
                    Err("Invalid email".to_string())
                }
            }
            Rule::Optional => Ok(()),
        }
    }
}

fn too_short(min: usize) -> String {
    format!("String must contain at least {} character(s)", min)
}

fn is_email(s: &str) -> bool {
    !s.starts_with('.') && !s.contains("..") && EMAIL.is_match(s)
}

/// Ordered rules for one field
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// A field that accepts any value
    pub fn any() -> Self {
        Self::default()
    }

    pub fn is_optional(&self) -> bool {
        self.rules.iter().any(|r| matches!(r, Rule::Optional))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// First failing rule's message, in declaration order
    pub fn evaluate(&self, value: &FieldValue) -> Result<(), String> {
        if self.is_optional() && value.is_empty() {
            return Ok(());
        }
        self.rules.iter().try_for_each(|rule| rule.check(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> FieldValue {
        FieldValue::text(s)
    }

    #[test]
    fn test_non_empty() {
        assert!(Rule::NonEmpty.check(&text("x")).is_ok());
        assert_eq!(
            Rule::NonEmpty.check(&text("")).unwrap_err(),
            "String must contain at least 1 character(s)"
        );
    }

    #[test]
    fn test_length_counts_chars() {
        let rule = Rule::length(1, 3);
        assert!(rule.check(&text("été")).is_ok());
        assert_eq!(
            rule.check(&text("abcd")).unwrap_err(),
            "String must contain at most 3 character(s)"
        );
        assert_eq!(
            Rule::min_length(8).check(&text("short")).unwrap_err(),
            "String must contain at least 8 character(s)"
        );
    }

    #[test]
    fn test_pattern() {
        let rule = Rule::pattern(r"^\d+$", "digits only");
        assert!(rule.check(&text("5551234")).is_ok());
        assert_eq!(rule.check(&text("555-1234")).unwrap_err(), "digits only");
    }

    #[test]
    fn test_literal_text_and_flag() {
        let code = Rule::literal("1234", "wrong");
        assert!(code.check(&text("1234")).is_ok());
        assert!(code.check(&text("12345")).is_err());

        let agree = Rule::literal(true, "must agree");
        assert!(agree.check(&FieldValue::Flag(true)).is_ok());
        assert_eq!(agree.check(&FieldValue::Flag(false)).unwrap_err(), "must agree");
        assert!(agree.check(&text("true")).is_err());
    }

    #[test]
    fn test_email() {
        for ok in ["a@b.com", "first.last+tag@mail.example.org", "O'Neil@x.io"] {
            assert!(Rule::Email.check(&text(ok)).is_ok(), "{ok}");
        }
        for bad in ["", "a@b", "@b.com", ".a@b.com", "a..b@c.com", "a@b.c", "a b@c.com"] {
            assert_eq!(Rule::Email.check(&text(bad)).unwrap_err(), "Invalid email", "{bad}");
        }
    }

    #[test]
    fn test_optional_skips_rules_when_empty() {
        let set = RuleSet::new(vec![Rule::Optional, Rule::min_length(3)]);
        assert!(set.evaluate(&text("")).is_ok());
        assert!(set.evaluate(&text("ab")).is_err());
        assert!(set.evaluate(&text("abc")).is_ok());
    }

    #[test]
    fn test_first_failure_wins() {
        let set = RuleSet::new(vec![
            Rule::length(1, 15),
            Rule::pattern(r"^\d+$", "digits only"),
        ]);
        assert_eq!(
            set.evaluate(&text("")).unwrap_err(),
            "String must contain at least 1 character(s)"
        );
        assert_eq!(set.evaluate(&text("12a")).unwrap_err(), "digits only");
    }

    #[test]
    fn test_any_accepts_empty() {
        assert!(RuleSet::any().evaluate(&text("")).is_ok());
    }
}
