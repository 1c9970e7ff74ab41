// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Abstract gateway interface for the TaskFlow remote API
//!
//! The controller in `tf-core` is written against the [`TaskGateway`]
//! trait rather than a concrete HTTP client, so the production REST
//! client and the in-process mock used by tests are interchangeable.
//! The gateway itself is stateless: the bearer token is passed per call
//! and owned by the session store.

pub mod error;

pub use error::*;

use async_trait::async_trait;
use tf_api_contract::{
    AuthResponse, LoginRequest, RegisterRequest, SearchCriteria, Task, TaskDraft, TaskPage,
    TaskPriority, TaskStatus,
};

/// Authenticated request/response interface to the remote TaskFlow API.
///
/// Search calls return the server-side view of the user's task set;
/// write calls return the stored record. Callers are expected to refresh
/// their authoritative set after a write rather than patching locally.
#[async_trait]
pub trait TaskGateway: Send + Sync {
    /// `POST /auth/login`
    async fn login(&self, request: &LoginRequest) -> GatewayResult<AuthResponse>;

    /// `POST /auth/register`
    async fn register(&self, request: &RegisterRequest) -> GatewayResult<AuthResponse>;

    /// `GET /api/search/user/{userId}` for the user's full task set.
    async fn user_tasks(&self, token: &str, user_id: i64) -> GatewayResult<Vec<Task>>;

    /// `GET /api/search/user/{userId}/status?status=`
    async fn tasks_by_status(
        &self,
        token: &str,
        user_id: i64,
        status: TaskStatus,
    ) -> GatewayResult<Vec<Task>>;

    /// `GET /api/search/user/{userId}/priority?priority=`
    async fn tasks_by_priority(
        &self,
        token: &str,
        user_id: i64,
        priority: TaskPriority,
    ) -> GatewayResult<Vec<Task>>;

    /// `GET /api/search/user/{userId}/keyword?keyword=`
    async fn tasks_by_keyword(
        &self,
        token: &str,
        user_id: i64,
        keyword: &str,
    ) -> GatewayResult<Vec<Task>>;

    /// `POST /api/search/advanced`: composite filter, paged result.
    async fn advanced_search(
        &self,
        token: &str,
        criteria: &SearchCriteria,
    ) -> GatewayResult<TaskPage>;

    /// `POST /api/search/sync/{userId}`: server-side re-derivation
    /// (overdue marking); callers re-fetch afterwards.
    async fn sync_tasks(&self, token: &str, user_id: i64) -> GatewayResult<()>;

    /// `POST /api/tasks`
    async fn create_task(&self, token: &str, draft: &TaskDraft) -> GatewayResult<Task>;

    /// `PUT /api/tasks/{id}?userId=`: full-record replace.
    async fn update_task(
        &self,
        token: &str,
        task_id: i64,
        user_id: i64,
        draft: &TaskDraft,
    ) -> GatewayResult<Task>;

    /// `PATCH /api/tasks/{id}/status?userId=&status=`: partial update.
    async fn update_task_status(
        &self,
        token: &str,
        task_id: i64,
        user_id: i64,
        status: TaskStatus,
    ) -> GatewayResult<Task>;

    /// `DELETE /api/tasks/{id}?userId=`
    async fn delete_task(&self, token: &str, task_id: i64, user_id: i64) -> GatewayResult<()>;
}
