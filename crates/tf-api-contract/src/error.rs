// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Error types for API contract validation and parsing

use thiserror::Error;

/// Errors that can occur while validating or parsing contract values
#[derive(Debug, Error)]
pub enum ApiContractError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid task status: {0}")]
    InvalidTaskStatus(String),

    #[error("Invalid task priority: {0}")]
    InvalidTaskPriority(String),

    #[error("Invalid deadline: {0}")]
    InvalidDeadline(String),

    #[error("Task title is required")]
    EmptyTitle,
}
