//! Validation helpers for `bugtrack`.
//!
//! The bug file format does no escaping, so any text that reaches the
//! store must be free of the field delimiter and line breaks. These
//! routines check input up front and return structured validation
//! errors without touching storage.

use bugtrack_lib::ValidationError;
use bugtrack_lib::flatfile::{COMMENT_DELIMITER, FIELD_DELIMITER};
use bugtrack_lib::model::{BugField, BugRecord};

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 2_000;
pub const MAX_ASSIGNEE_LEN: usize = 100;
pub const MAX_COMMENT_LEN: usize = 1_000;

/// Validates bug records before they are written.
pub struct BugValidator;

impl BugValidator {
    /// Validate a record and return all validation errors found.
    ///
    /// # Errors
    ///
    /// Returns a `Vec<ValidationError>` if any validation rules are violated.
    pub fn validate(bug: &BugRecord) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if bug.id == 0 {
            errors.push(ValidationError::new("id", "must be a positive integer"));
        }

        for field in [BugField::Title, BugField::Description, BugField::AssignedTo] {
            if let Err(err) = validate_field_value(field, bug.field_value(field)) {
                errors.push(err);
            }
        }

        for comment in &bug.comments {
            if let Err(mut comment_errors) = CommentValidator::validate(comment) {
                errors.append(&mut comment_errors);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Validate the new value for a single-field update.
///
/// Status and priority text is not checked here; it is coerced on write.
///
/// # Errors
///
/// Returns a `ValidationError` naming the field if the value is blank,
/// too long, or contains a delimiter.
pub fn validate_field_value(field: BugField, value: &str) -> Result<(), ValidationError> {
    let max_len = match field {
        BugField::Title => MAX_TITLE_LEN,
        BugField::Description => MAX_DESCRIPTION_LEN,
        BugField::AssignedTo => MAX_ASSIGNEE_LEN,
        BugField::Status | BugField::Priority => return Ok(()),
    };
    check_text(field.as_str(), value, max_len, &[FIELD_DELIMITER])
}

/// Validates comment text.
pub struct CommentValidator;

impl CommentValidator {
    /// Validate a comment and return all validation errors found.
    ///
    /// # Errors
    ///
    /// Returns a `Vec<ValidationError>` if any validation rules are violated.
    pub fn validate(text: &str) -> Result<(), Vec<ValidationError>> {
        check_text(
            "comment",
            text,
            MAX_COMMENT_LEN,
            &[FIELD_DELIMITER, COMMENT_DELIMITER],
        )
        .map_err(|err| vec![err])
    }
}

fn check_text(
    field: &str,
    value: &str,
    max_len: usize,
    forbidden: &[&str],
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "cannot be empty"));
    }
    if value.chars().count() > max_len {
        return Err(ValidationError::new(
            field,
            format!("exceeds {max_len} characters"),
        ));
    }
    if value.contains(['\n', '\r']) {
        return Err(ValidationError::new(field, "cannot contain line breaks"));
    }
    if let Some(delimiter) = forbidden.iter().find(|d| value.contains(**d)) {
        return Err(ValidationError::new(
            field,
            format!("cannot contain '{delimiter}'"),
        ));
    }
    Ok(())
}
