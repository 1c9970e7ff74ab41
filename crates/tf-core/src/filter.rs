// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Client-side quick filters
//!
//! Quick filters narrow the authoritative task set for display without
//! touching the network. They are orthogonal to the active search mode:
//! a server-side keyword search can still be narrowed to HIGH priority
//! locally.

use serde::{Deserialize, Serialize};
use tf_api_contract::{Task, TaskPriority, TaskStatus};

/// Independent status/priority predicates; `None` means "all" for that
/// dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickFilters {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

impl QuickFilters {
    pub fn matches(&self, task: &Task) -> bool {
        self.status.map_or(true, |s| task.status == s)
            && self.priority.map_or(true, |p| task.priority == p)
    }

    pub fn is_identity(&self) -> bool {
        self.status.is_none() && self.priority.is_none()
    }
}

/// Compute the displayed subset of the authoritative set.
pub fn filter_tasks(tasks: &[Task], filters: &QuickFilters) -> Vec<Task> {
    tasks.iter().filter(|t| filters.matches(t)).cloned().collect()
}
