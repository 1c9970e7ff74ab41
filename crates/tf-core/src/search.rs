// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Search mode selection
//!
//! The active search mode decides which server-side strategy produces
//! the authoritative task set. Each mode carries its own parameters;
//! switching modes never mixes leftover parameters from another mode.

use chrono::NaiveDateTime;
use std::fmt;

use tf_api_contract::{SearchCriteria, TaskPriority, TaskStatus};

/// Server-side search strategy plus its parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SearchMode {
    /// Every task belonging to the user.
    #[default]
    All,
    /// Tasks matching exactly one status.
    Status(TaskStatus),
    /// Tasks matching exactly one priority.
    Priority(TaskPriority),
    /// Tasks whose title or description contains the keyword.
    Keyword(String),
    /// Composite filter with pagination.
    Advanced(AdvancedQuery),
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::All => write!(f, "all"),
            SearchMode::Status(status) => write!(f, "status={status}"),
            SearchMode::Priority(priority) => write!(f, "priority={priority}"),
            SearchMode::Keyword(keyword) => write!(f, "keyword={keyword:?}"),
            SearchMode::Advanced(_) => write!(f, "advanced"),
        }
    }
}

/// Parameters for the advanced (composite) search mode
#[derive(Debug, Clone, PartialEq)]
pub struct AdvancedQuery {
    pub keyword: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub deadline_from: Option<NaiveDateTime>,
    pub deadline_to: Option<NaiveDateTime>,
    pub page: u32,
    pub size: u32,
}

impl Default for AdvancedQuery {
    fn default() -> Self {
        Self {
            keyword: None,
            status: None,
            priority: None,
            deadline_from: None,
            deadline_to: None,
            page: 0,
            size: 50,
        }
    }
}

impl AdvancedQuery {
    /// Bind the query to a user, producing the wire criteria. Blank
    /// keywords are dropped rather than sent as empty strings.
    pub fn to_criteria(&self, user_id: i64) -> SearchCriteria {
        SearchCriteria {
            user_id,
            keyword: self
                .keyword
                .as_ref()
                .map(|k| k.trim())
                .filter(|k| !k.is_empty())
                .map(String::from),
            status: self.status,
            priority: self.priority,
            deadline_from: self.deadline_from,
            deadline_to: self.deadline_to,
            page: self.page,
            size: self.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mode_is_all() {
        assert_eq!(SearchMode::default(), SearchMode::All);
    }

    #[test]
    fn blank_keyword_is_dropped_from_criteria() {
        let query = AdvancedQuery {
            keyword: Some("   ".to_string()),
            status: Some(TaskStatus::Todo),
            ..AdvancedQuery::default()
        };
        let criteria = query.to_criteria(9);
        assert_eq!(criteria.keyword, None);
        assert_eq!(criteria.status, Some(TaskStatus::Todo));
        assert_eq!(criteria.user_id, 9);
        assert_eq!((criteria.page, criteria.size), (0, 50));
    }
}
