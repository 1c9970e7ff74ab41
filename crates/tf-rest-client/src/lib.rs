// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! REST API client for the TaskFlow service
//!
//! This crate provides the production HTTP client for the remote
//! TaskFlow API: authentication, the search endpoints, and task
//! mutations, with every response classified into the gateway error
//! taxonomy (success / degraded / unauthorized / rejected).
//!
//! The crate is intentionally lightweight so third-party software can
//! talk to the API without pulling in the controller stack; it
//! implements the [`TaskGateway`] trait for use by `tf-core`.

pub mod client;

pub use client::*;

use async_trait::async_trait;
use tf_api_contract::{
    AuthResponse, LoginRequest, RegisterRequest, SearchCriteria, Task, TaskDraft, TaskPage,
    TaskPriority, TaskStatus,
};
use tf_client_api::{GatewayResult, TaskGateway};

#[async_trait]
impl TaskGateway for client::RestClient {
    async fn login(&self, request: &LoginRequest) -> GatewayResult<AuthResponse> {
        self.login(request).await
    }

    async fn register(&self, request: &RegisterRequest) -> GatewayResult<AuthResponse> {
        self.register(request).await
    }

    async fn user_tasks(&self, token: &str, user_id: i64) -> GatewayResult<Vec<Task>> {
        self.user_tasks(token, user_id).await
    }

    async fn tasks_by_status(
        &self,
        token: &str,
        user_id: i64,
        status: TaskStatus,
    ) -> GatewayResult<Vec<Task>> {
        self.tasks_by_status(token, user_id, status).await
    }

    async fn tasks_by_priority(
        &self,
        token: &str,
        user_id: i64,
        priority: TaskPriority,
    ) -> GatewayResult<Vec<Task>> {
        self.tasks_by_priority(token, user_id, priority).await
    }

    async fn tasks_by_keyword(
        &self,
        token: &str,
        user_id: i64,
        keyword: &str,
    ) -> GatewayResult<Vec<Task>> {
        self.tasks_by_keyword(token, user_id, keyword).await
    }

    async fn advanced_search(
        &self,
        token: &str,
        criteria: &SearchCriteria,
    ) -> GatewayResult<TaskPage> {
        self.advanced_search(token, criteria).await
    }

    async fn sync_tasks(&self, token: &str, user_id: i64) -> GatewayResult<()> {
        self.sync_tasks(token, user_id).await
    }

    async fn create_task(&self, token: &str, draft: &TaskDraft) -> GatewayResult<Task> {
        self.create_task(token, draft).await
    }

    async fn update_task(
        &self,
        token: &str,
        task_id: i64,
        user_id: i64,
        draft: &TaskDraft,
    ) -> GatewayResult<Task> {
        self.update_task(token, task_id, user_id, draft).await
    }

    async fn update_task_status(
        &self,
        token: &str,
        task_id: i64,
        user_id: i64,
        status: TaskStatus,
    ) -> GatewayResult<Task> {
        self.update_task_status(token, task_id, user_id, status).await
    }

    async fn delete_task(&self, token: &str, task_id: i64, user_id: i64) -> GatewayResult<()> {
        self.delete_task(token, task_id, user_id).await
    }
}
