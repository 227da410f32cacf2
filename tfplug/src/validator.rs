//! Attribute validators
//!
//! Validators inspect a single configured value and push error diagnostics.
//! Null and unknown values pass through untouched; requiredness is the
//! schema's concern.

use crate::types::{AttributePath, Diagnostic, Dynamic};

pub trait Validator: Send + Sync {
    fn validate(&self, value: &Dynamic, attribute_path: &str, diagnostics: &mut Vec<Diagnostic>);
}

/// Requires the value to be one of a fixed set of strings.
pub struct OneOfValidator {
    allowed: Vec<String>,
}

impl OneOfValidator {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validator for OneOfValidator {
    fn validate(&self, value: &Dynamic, attribute_path: &str, diagnostics: &mut Vec<Diagnostic>) {
        if let Some(s) = value.as_string() {
            if !self.allowed.iter().any(|a| a == s) {
                diagnostics.push(
                    Diagnostic::error(
                        format!("Invalid value for {}", attribute_path),
                        format!("Value '{}' must be one of: {}", s, self.allowed.join(", ")),
                    )
                    .with_attribute(AttributePath::new(attribute_path)),
                );
            }
        }
    }
}

pub struct StringLengthValidator {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl Validator for StringLengthValidator {
    fn validate(&self, value: &Dynamic, attribute_path: &str, diagnostics: &mut Vec<Diagnostic>) {
        if let Some(s) = value.as_string() {
            if let Some(min) = self.min {
                if s.len() < min {
                    diagnostics.push(
                        Diagnostic::error(
                            format!("{} must have minimum length of {}", attribute_path, min),
                            format!("Got length {}", s.len()),
                        )
                        .with_attribute(AttributePath::new(attribute_path)),
                    );
                }
            }
            if let Some(max) = self.max {
                if s.len() > max {
                    diagnostics.push(
                        Diagnostic::error(
                            format!("{} must have maximum length of {}", attribute_path, max),
                            format!("Got length {}", s.len()),
                        )
                        .with_attribute(AttributePath::new(attribute_path)),
                    );
                }
            }
        }
    }
}

pub struct StringPatternValidator {
    pub pattern: regex::Regex,
    pub description: String,
}

impl Validator for StringPatternValidator {
    fn validate(&self, value: &Dynamic, attribute_path: &str, diagnostics: &mut Vec<Diagnostic>) {
        if let Some(s) = value.as_string() {
            if !self.pattern.is_match(s) {
                diagnostics.push(
                    Diagnostic::error(
                        format!("{} must match {}", attribute_path, self.description),
                        format!("Value '{}' does not match pattern", s),
                    )
                    .with_attribute(AttributePath::new(attribute_path)),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::has_errors;

    #[test]
    fn one_of_accepts_listed_value() {
        let validator = OneOfValidator::new(["GENDER_UNSPECIFIED", "GENDER_FEMALE", "GENDER_MALE"]);

        let mut diags = Vec::new();
        validator.validate(
            &Dynamic::String("GENDER_FEMALE".to_string()),
            "gender",
            &mut diags,
        );

        assert!(diags.is_empty());
    }

    #[test]
    fn one_of_rejects_unlisted_value() {
        let validator = OneOfValidator::new(["GENDER_UNSPECIFIED", "GENDER_FEMALE"]);

        let mut diags = Vec::new();
        validator.validate(
            &Dynamic::String("GENDER_OTHER".to_string()),
            "gender",
            &mut diags,
        );

        assert!(has_errors(&diags));
        assert!(diags[0].detail.contains("GENDER_UNSPECIFIED"));
    }

    #[test]
    fn one_of_ignores_null() {
        let validator = OneOfValidator::new(["a", "b"]);

        let mut diags = Vec::new();
        validator.validate(&Dynamic::Null, "field", &mut diags);

        assert!(diags.is_empty());
    }

    #[test]
    fn string_length_rejects_out_of_bounds() {
        let validator = StringLengthValidator {
            min: Some(1),
            max: Some(200),
        };

        let mut diags = Vec::new();
        validator.validate(&Dynamic::String(String::new()), "user_name", &mut diags);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].summary.contains("minimum length"));

        let mut diags = Vec::new();
        validator.validate(
            &Dynamic::String("x".repeat(201)),
            "user_name",
            &mut diags,
        );
        assert_eq!(diags.len(), 1);
        assert!(diags[0].summary.contains("maximum length"));
    }

    #[test]
    fn string_pattern_checks_value() {
        let validator = StringPatternValidator {
            pattern: regex::Regex::new(r"^\+[0-9]+$").unwrap(),
            description: "an E.164 phone number".to_string(),
        };

        let mut diags = Vec::new();
        validator.validate(&Dynamic::String("+41791234567".to_string()), "phone", &mut diags);
        assert!(diags.is_empty());

        validator.validate(&Dynamic::String("0791234567".to_string()), "phone", &mut diags);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].summary.contains("E.164"));
    }
}
