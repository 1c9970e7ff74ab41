// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! TaskFlow client core
//!
//! The controller logic behind the TaskFlow client: an authenticated
//! session with file persistence, a search controller that owns the
//! authoritative task set, client-side quick filters over that set, a
//! mutation coordinator that resynchronizes after every write, and a
//! service health monitor with automatic degraded/recovered transitions.
//!
//! All remote access goes through the [`TaskGateway`] trait from
//! `tf-client-api`, so the controller runs unchanged against the
//! production REST client or the in-process mock.
//!
//! [`TaskGateway`]: tf_client_api::TaskGateway

pub mod controller;
pub mod error;
pub mod filter;
pub mod health;
pub mod search;
pub mod session;
pub mod stats;

pub use controller::{TaskController, TaskInput};
pub use error::ControllerError;
pub use filter::{filter_tasks, QuickFilters};
pub use health::{HealthMonitor, ServiceHealth};
pub use search::{AdvancedQuery, SearchMode};
pub use session::{JsonFileStorage, MemoryStorage, Session, SessionStorage, StoreError};
pub use stats::TaskStats;
