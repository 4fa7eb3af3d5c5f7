//! Explicit input validation. Each input type composes these helpers in a
//! `validate()` function returning either its DTO or every field error.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", summary(.0))]
pub struct ValidationErrors(Vec<FieldError>);

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// Trims `value` and requires between 1 and `max` characters.
pub fn required_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    max: usize,
) -> String {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len == 0 {
        errors.push(field, "must not be empty");
    } else if len > max {
        errors.push(field, format!("must be at most {max} characters"));
    }
    trimmed.to_string()
}

/// Trims `value`; blank becomes `None`. Longer than `max` characters is an error.
pub fn optional_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Option<String> {
    let trimmed = value.map(str::trim).filter(|v| !v.is_empty())?;
    if trimmed.chars().count() > max {
        errors.push(field, format!("must be at most {max} characters"));
    }
    Some(trimmed.to_string())
}

pub fn positive(errors: &mut ValidationErrors, field: &'static str, value: i32) -> i32 {
    if value <= 0 {
        errors.push(field, "must be positive");
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims_and_bounds_length() {
        let mut errors = ValidationErrors::default();
        assert_eq!(required_text(&mut errors, "name", "  Ana  ", 255), "Ana");
        assert!(errors.is_empty());

        required_text(&mut errors, "name", "   ", 255);
        required_text(&mut errors, "name", &"x".repeat(256), 255);
        assert_eq!(errors.fields().len(), 2);
        assert_eq!(errors.fields()[0].message, "must not be empty");
        assert_eq!(errors.fields()[1].message, "must be at most 255 characters");
    }

    #[test]
    fn optional_text_blank_is_none() {
        let mut errors = ValidationErrors::default();
        assert_eq!(optional_text(&mut errors, "title", Some("  "), 10), None);
        assert_eq!(optional_text(&mut errors, "title", None, 10), None);
        assert_eq!(
            optional_text(&mut errors, "title", Some(" Scrim "), 10),
            Some("Scrim".to_string())
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn finish_reports_every_field() {
        let mut errors = ValidationErrors::default();
        errors.push("a", "bad");
        errors.push("b", "worse");
        let err = errors.finish(()).unwrap_err();
        assert_eq!(err.to_string(), "a bad; b worse");
    }
}
