//! Validation utilities for consumption submissions
//!
//! The submission form is checked locally before anything is sent to the
//! record store; the store re-validates the resulting [`NewRecord`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{NewRecord, ProductionLine};

/// Message shown when any required form field is empty
pub const MISSING_FIELDS_MESSAGE: &str = "Please fill all required fields";

/// Validation failure for a submission or record
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{}", MISSING_FIELDS_MESSAGE)]
    MissingRequiredFields,

    #[error("Unknown production line: {0}")]
    UnknownLine(String),

    #[error("{field} must be a non-negative whole number, got '{value}'")]
    InvalidQuantity { field: &'static str, value: String },

    #[error("{message}")]
    Invalid { field: String, message: String },
}

impl ValidationError {
    /// Name of the offending field, when there is a single one
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::MissingRequiredFields => None,
            ValidationError::UnknownLine(_) => Some("line"),
            ValidationError::InvalidQuantity { field, .. } => Some(*field),
            ValidationError::Invalid { field, .. } => Some(field.as_str()),
        }
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        match fields.into_iter().next() {
            Some((field, errs)) => {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                ValidationError::Invalid {
                    field: field.to_string(),
                    message,
                }
            }
            None => ValidationError::MissingRequiredFields,
        }
    }
}

/// Raw values of the consumption entry form, exactly as typed
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionForm {
    pub production_line: String,
    pub shift_leader: String,
    pub rippon_amount: String,
    pub label_amount: String,
    #[serde(default)]
    pub notes: String,
}

impl SubmissionForm {
    /// Required fields: line, shift leader, rippon amount and label amount
    pub fn has_required_fields(&self) -> bool {
        [
            &self.production_line,
            &self.shift_leader,
            &self.rippon_amount,
            &self.label_amount,
        ]
        .iter()
        .all(|v| !v.trim().is_empty())
    }

    /// Validate the form and turn it into a record ready for the store
    pub fn to_new_record(&self) -> Result<NewRecord, ValidationError> {
        if !self.has_required_fields() {
            return Err(ValidationError::MissingRequiredFields);
        }

        let line: ProductionLine = self.production_line.parse()?;
        let rippon = parse_quantity("rippon", &self.rippon_amount)?;
        let labels = parse_quantity("labels", &self.label_amount)?;

        NewRecord {
            line,
            shift_leader: self.shift_leader.clone(),
            rippon,
            labels,
            notes: Some(self.notes.clone()),
        }
        .prepare()
    }
}

/// Parse a non-negative whole quantity
pub fn parse_quantity(field: &'static str, value: &str) -> Result<i32, ValidationError> {
    value
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|q| *q >= 0)
        .ok_or_else(|| ValidationError::InvalidQuantity {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> SubmissionForm {
        SubmissionForm {
            production_line: "Line 4".to_string(),
            shift_leader: "Malee".to_string(),
            rippon_amount: "3".to_string(),
            label_amount: "12".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_valid_form() {
        let record = form().to_new_record().unwrap();
        assert_eq!(record.line, ProductionLine::Line4);
        assert_eq!(record.shift_leader, "Malee");
        assert_eq!(record.rippon, 3);
        assert_eq!(record.labels, 12);
        assert_eq!(record.notes, None);
    }

    #[test]
    fn test_empty_shift_leader_is_missing_field() {
        let f = SubmissionForm {
            shift_leader: String::new(),
            ..form()
        };
        assert_eq!(f.to_new_record(), Err(ValidationError::MissingRequiredFields));
    }

    #[test]
    fn test_each_required_field() {
        let cases = [
            SubmissionForm { production_line: String::new(), ..form() },
            SubmissionForm { shift_leader: "  ".to_string(), ..form() },
            SubmissionForm { rippon_amount: String::new(), ..form() },
            SubmissionForm { label_amount: String::new(), ..form() },
        ];
        for f in cases {
            assert!(!f.has_required_fields());
        }
    }

    #[test]
    fn test_notes_optional_and_kept() {
        let f = SubmissionForm {
            notes: "roll jammed".to_string(),
            ..form()
        };
        let record = f.to_new_record().unwrap();
        assert_eq!(record.notes.as_deref(), Some("roll jammed"));
    }

    #[test]
    fn test_zero_amount_is_allowed() {
        let f = SubmissionForm {
            rippon_amount: "0".to_string(),
            ..form()
        };
        assert_eq!(f.to_new_record().unwrap().rippon, 0);
    }

    #[test]
    fn test_invalid_amounts() {
        assert!(parse_quantity("rippon", "-2").is_err());
        assert!(parse_quantity("rippon", "abc").is_err());
        assert!(parse_quantity("rippon", "1.5").is_err());
        assert_eq!(parse_quantity("rippon", " 8 ").unwrap(), 8);
    }

    #[test]
    fn test_unknown_line() {
        let f = SubmissionForm {
            production_line: "Line 5".to_string(),
            ..form()
        };
        assert_eq!(
            f.to_new_record(),
            Err(ValidationError::UnknownLine("Line 5".to_string()))
        );
    }

    #[test]
    fn test_missing_fields_message() {
        assert_eq!(
            ValidationError::MissingRequiredFields.to_string(),
            "Please fill all required fields"
        );
    }
}
