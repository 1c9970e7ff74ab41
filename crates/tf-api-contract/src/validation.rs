//! Validation helpers for API contract types

use chrono::NaiveDateTime;
use validator::Validate;

use crate::error::ApiContractError;
use crate::types::{LoginRequest, RegisterRequest, TaskDraft};

/// Validate a task create/update payload.
///
/// A blank title is reported as [`ApiContractError::EmptyTitle`] before
/// the schema length checks run, so the user-facing message stays
/// stable; a whitespace-only title would otherwise slip past the
/// length validator.
pub fn validate_task_draft(draft: &TaskDraft) -> Result<(), ApiContractError> {
    if draft.title.trim().is_empty() {
        return Err(ApiContractError::EmptyTitle);
    }
    draft.validate()?;
    Ok(())
}

/// Validate a login request
pub fn validate_login_request(request: &LoginRequest) -> Result<(), ApiContractError> {
    request.validate()?;
    Ok(())
}

/// Validate a registration request
pub fn validate_register_request(request: &RegisterRequest) -> Result<(), ApiContractError> {
    request.validate()?;
    Ok(())
}

/// Normalize a `datetime-local` form value into a wire timestamp.
///
/// Form inputs carry minute precision (`2026-03-01T09:30`); the remote
/// service expects full seconds. An empty or whitespace-only value means
/// no deadline.
pub fn parse_deadline_input(input: &str) -> Result<Option<NaiveDateTime>, ApiContractError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let candidate = if trimmed.len() == 16 {
        format!("{trimmed}:00")
    } else {
        trimmed.to_string()
    };

    NaiveDateTime::parse_from_str(&candidate, "%Y-%m-%dT%H:%M:%S")
        .map(Some)
        .map_err(|_| ApiContractError::InvalidDeadline(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TaskPriority, TaskStatus};

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            description: String::new(),
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            deadline: None,
            user_id: 1,
        }
    }

    #[test]
    fn rejects_empty_and_whitespace_titles() {
        assert!(validate_task_draft(&draft("")).is_err());
        assert!(matches!(
            validate_task_draft(&draft("   ")),
            Err(ApiContractError::EmptyTitle)
        ));
        assert!(validate_task_draft(&draft("Ship it")).is_ok());
    }

    #[test]
    fn rejects_overlong_description() {
        let mut d = draft("ok");
        d.description = "x".repeat(1001);
        assert!(validate_task_draft(&d).is_err());
    }

    #[test]
    fn deadline_input_gains_seconds() {
        let parsed = parse_deadline_input("2026-03-01T09:30").unwrap().unwrap();
        assert_eq!(parsed.to_string(), "2026-03-01 09:30:00");

        // Already fully specified values pass through unchanged.
        let parsed = parse_deadline_input("2026-03-01T09:30:45").unwrap().unwrap();
        assert_eq!(parsed.to_string(), "2026-03-01 09:30:45");
    }

    #[test]
    fn empty_deadline_means_none() {
        assert_eq!(parse_deadline_input("").unwrap(), None);
        assert_eq!(parse_deadline_input("  ").unwrap(), None);
        assert!(parse_deadline_input("next tuesday").is_err());
    }
}
