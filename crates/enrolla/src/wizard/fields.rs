//! Per-field validation rules for the booking wizard.
//!
//! Each wizard step declares its inputs as [`FieldSpec`]s; a [`FieldKind`]
//! carries the rule and the user-facing recovery message for each way it can
//! fail. Validation is synchronous and recomputed on every pass; results are
//! never persisted.

use std::sync::OnceLock;

use regex::Regex;

/// Conservative email shape: `local@domain.tld`, no embedded whitespace.
fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid pattern"))
}

/// Allow-list for phone input: digits, spaces, `+`, `-`, parentheses.
fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9\s()+-]+$").expect("valid pattern"))
}

/// The validation rule attached to one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Must be non-empty after trimming.
    Required,
    /// A person's name: required, and at least two characters after
    /// trimming, with distinct messages for the two failures.
    FullName,
    /// Required, then checked against the conservative email shape, with
    /// distinct messages for the two failures.
    Email,
    /// Optional: empty is always valid, but anything typed must match the
    /// phone allow-list.
    Phone,
    /// Free text, always valid (notes, PO numbers).
    Optional,
}

impl FieldKind {
    /// Validate one raw input value.
    pub fn validate(&self, raw: &str) -> FieldOutcome {
        let value = raw.trim();
        match self {
            Self::Required => {
                if value.is_empty() {
                    FieldOutcome::invalid("This field is required")
                } else {
                    FieldOutcome::valid()
                }
            }
            Self::FullName => {
                if value.is_empty() {
                    FieldOutcome::invalid("Please enter your name so we know who to expect")
                } else if value.chars().count() < 2 {
                    FieldOutcome::invalid("Please enter your full name (at least 2 characters)")
                } else {
                    FieldOutcome::valid()
                }
            }
            Self::Email => {
                if value.is_empty() {
                    FieldOutcome::invalid(
                        "We need your email to send you course details and confirmation",
                    )
                } else if !email_pattern().is_match(value) {
                    FieldOutcome::invalid("Please check your email format (e.g., name@example.com)")
                } else {
                    FieldOutcome::valid()
                }
            }
            Self::Phone => {
                if value.is_empty() || phone_pattern().is_match(value) {
                    FieldOutcome::valid()
                } else {
                    FieldOutcome::invalid("Please enter a valid phone number (e.g., +1 555-123-4567)")
                }
            }
            Self::Optional => FieldOutcome::valid(),
        }
    }
}

/// The result of validating one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOutcome {
    /// Whether the value passed.
    pub valid: bool,
    /// Recovery message when it did not.
    pub message: Option<String>,
}

impl FieldOutcome {
    /// A passing outcome.
    pub fn valid() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    /// A failing outcome with a recovery message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }
}

/// One input in a wizard step.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Control name on the surface.
    pub name: String,
    /// Label used in the summary projection.
    pub label: String,
    /// Validation rule.
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Create a field spec.
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
        }
    }
}

/// A failed field with its surfaced message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Control name of the failing field.
    pub field: String,
    /// The recovery message attached to it.
    pub message: String,
}

/// The outcome of validating one whole step.
///
/// Every failing field is reported, not just the first; the controller
/// highlights them all and moves focus to the first in surface order.
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    errors: Vec<FieldError>,
}

impl StepReport {
    /// A report with no failures.
    pub fn valid() -> Self {
        Self::default()
    }

    /// Record a failure.
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Whether the step passed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// All failures, in field order.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// The field focus should move to: the first failing one.
    pub fn first_invalid(&self) -> Option<&str> {
        self.errors.first().map(|e| e.field.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_whitespace() {
        assert!(FieldKind::Required.validate("Acme Corp").valid);
        let outcome = FieldKind::Required.validate("   ");
        assert!(!outcome.valid);
        assert_eq!(outcome.message.as_deref(), Some("This field is required"));
    }

    #[test]
    fn test_full_name_distinguishes_failures() {
        let missing = FieldKind::FullName.validate("");
        assert!(missing.message.unwrap().contains("enter your name"));

        let short = FieldKind::FullName.validate(" A ");
        assert!(short.message.unwrap().contains("at least 2 characters"));

        assert!(FieldKind::FullName.validate("Ada Lovelace").valid);
    }

    #[test]
    fn test_email_shape() {
        assert!(FieldKind::Email.validate("a@b.co").valid);
        assert!(FieldKind::Email.validate("name+tag@example.com").valid);

        for bad in ["not-an-email", "a @b.co", "a@b", "@b.co", "a@.co x"] {
            let outcome = FieldKind::Email.validate(bad);
            assert!(!outcome.valid, "{bad} should fail");
            assert!(outcome.message.unwrap().contains("email format"));
        }

        let empty = FieldKind::Email.validate("");
        assert!(empty.message.unwrap().contains("need your email"));
    }

    #[test]
    fn test_phone_is_optional_but_constrained() {
        assert!(FieldKind::Phone.validate("").valid);
        assert!(FieldKind::Phone.validate("+1 (555) 123-4567").valid);

        let outcome = FieldKind::Phone.validate("call me");
        assert!(!outcome.valid);
        assert!(outcome.message.unwrap().contains("valid phone number"));
    }

    #[test]
    fn test_optional_accepts_anything() {
        assert!(FieldKind::Optional.validate("").valid);
        assert!(FieldKind::Optional.validate("PO-2291").valid);
    }

    #[test]
    fn test_report_collects_every_failure() {
        let mut report = StepReport::valid();
        assert!(report.is_valid());

        report.add_error("name", "Please enter your name so we know who to expect");
        report.add_error("email", "We need your email");
        assert!(!report.is_valid());
        assert_eq!(report.errors().len(), 2);
        assert_eq!(report.first_invalid(), Some("name"));
    }
}
