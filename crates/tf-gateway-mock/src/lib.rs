// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Mock gateway implementing the TaskGateway trait for testing
//!
//! Simulates the remote TaskFlow API in process: an in-memory user and
//! task store with the same derivation rules the real service applies
//! (overdue marking on persist and on sync), plus hooks for injecting
//! failures and delays so controller error paths and races can be
//! exercised deterministically.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use tf_api_contract::{
    AuthResponse, LoginRequest, RegisterRequest, SearchCriteria, Task, TaskDraft, TaskPage,
    TaskPriority, TaskStatus, User,
};
use tf_client_api::{GatewayError, GatewayResult, TaskGateway};

struct MockUser {
    user: User,
    password: String,
}

#[derive(Default)]
struct MockState {
    users: Vec<MockUser>,
    tasks: BTreeMap<i64, Task>,
    tokens: Vec<String>,
    next_user_id: i64,
    next_task_id: i64,
    calls: Vec<String>,
    failures: VecDeque<GatewayError>,
    delays: VecDeque<Duration>,
}

/// In-memory stand-in for the remote TaskFlow API
#[derive(Clone)]
pub struct MockGateway {
    state: Arc<RwLock<MockState>>,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MockState {
                next_user_id: 1,
                next_task_id: 1,
                ..MockState::default()
            })),
        }
    }

    /// Register a user directly, bypassing the API surface.
    pub async fn seed_user(&self, username: &str, email: &str, password: &str) -> User {
        let mut state = self.state.write().await;
        let user = User {
            id: state.next_user_id,
            username: username.to_string(),
            email: email.to_string(),
        };
        state.next_user_id += 1;
        state.users.push(MockUser {
            user: user.clone(),
            password: password.to_string(),
        });
        user
    }

    /// Insert a task directly, applying the service's persist-time
    /// overdue derivation.
    pub async fn insert_task(&self, mut task: Task) -> Task {
        let mut state = self.state.write().await;
        derive_overdue(&mut task);
        state.next_task_id = state.next_task_id.max(task.id + 1);
        state.tasks.insert(task.id, task.clone());
        task
    }

    /// Mint a valid bearer token without going through login.
    pub async fn issue_token(&self, user_id: i64) -> String {
        let token = format!("token-{user_id}");
        self.state.write().await.tokens.push(token.clone());
        token
    }

    /// Invalidate every outstanding token; subsequent calls answer 401.
    pub async fn revoke_tokens(&self) {
        self.state.write().await.tokens.clear();
    }

    /// Queue an error returned by the next gateway call (FIFO).
    pub async fn push_failure(&self, error: GatewayError) {
        self.state.write().await.failures.push_back(error);
    }

    /// Queue a delay applied before the next gateway call completes.
    pub async fn push_delay(&self, delay: Duration) {
        self.state.write().await.delays.push_back(delay);
    }

    /// Operation names recorded so far, in call order.
    pub async fn calls(&self) -> Vec<String> {
        self.state.read().await.calls.clone()
    }

    pub async fn clear_calls(&self) {
        self.state.write().await.calls.clear();
    }

    /// Snapshot of the stored tasks, ordered by id.
    pub async fn stored_tasks(&self) -> Vec<Task> {
        self.state.read().await.tasks.values().cloned().collect()
    }

    /// Record the call, then apply any queued delay or failure.
    async fn enter(&self, name: String) -> GatewayResult<()> {
        let (delay, failure) = {
            let mut state = self.state.write().await;
            state.calls.push(name);
            (state.delays.pop_front(), state.failures.pop_front())
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn check_token(&self, token: &str) -> GatewayResult<()> {
        if self.state.read().await.tokens.iter().any(|t| t == token) {
            Ok(())
        } else {
            Err(GatewayError::Unauthorized)
        }
    }

    async fn tasks_matching<F>(&self, user_id: i64, predicate: F) -> Vec<Task>
    where
        F: Fn(&Task) -> bool,
    {
        self.state
            .read()
            .await
            .tasks
            .values()
            .filter(|t| t.user_id == user_id && predicate(t))
            .cloned()
            .collect()
    }
}

fn derive_overdue(task: &mut Task) {
    let now = Utc::now().naive_utc();
    if task.is_overdue(now) {
        task.status = TaskStatus::Overdue;
    }
}

fn rejected(status: u16, message: &str) -> GatewayError {
    GatewayError::Rejected {
        status,
        detail: serde_json::json!({ "message": message }).to_string(),
    }
}

#[async_trait]
impl TaskGateway for MockGateway {
    async fn login(&self, request: &LoginRequest) -> GatewayResult<AuthResponse> {
        self.enter("login".to_string()).await?;
        let state = self.state.read().await;
        let found = state
            .users
            .iter()
            .find(|u| u.user.email == request.email && u.password == request.password)
            .map(|u| u.user.clone());
        drop(state);

        match found {
            Some(user) => {
                let token = self.issue_token(user.id).await;
                Ok(AuthResponse { user, token })
            }
            None => Err(rejected(400, "Invalid email or password")),
        }
    }

    async fn register(&self, request: &RegisterRequest) -> GatewayResult<AuthResponse> {
        self.enter("register".to_string()).await?;
        {
            let state = self.state.read().await;
            if state.users.iter().any(|u| u.user.email == request.email) {
                return Err(rejected(400, "A user with this email already exists"));
            }
        }
        let user = self
            .seed_user(&request.username, &request.email, &request.password)
            .await;
        let token = self.issue_token(user.id).await;
        Ok(AuthResponse { user, token })
    }

    async fn user_tasks(&self, token: &str, user_id: i64) -> GatewayResult<Vec<Task>> {
        self.enter("user_tasks".to_string()).await?;
        self.check_token(token).await?;
        Ok(self.tasks_matching(user_id, |_| true).await)
    }

    async fn tasks_by_status(
        &self,
        token: &str,
        user_id: i64,
        status: TaskStatus,
    ) -> GatewayResult<Vec<Task>> {
        self.enter(format!("tasks_by_status:{status}")).await?;
        self.check_token(token).await?;
        Ok(self.tasks_matching(user_id, |t| t.status == status).await)
    }

    async fn tasks_by_priority(
        &self,
        token: &str,
        user_id: i64,
        priority: TaskPriority,
    ) -> GatewayResult<Vec<Task>> {
        self.enter(format!("tasks_by_priority:{priority}")).await?;
        self.check_token(token).await?;
        Ok(self.tasks_matching(user_id, |t| t.priority == priority).await)
    }

    async fn tasks_by_keyword(
        &self,
        token: &str,
        user_id: i64,
        keyword: &str,
    ) -> GatewayResult<Vec<Task>> {
        self.enter(format!("tasks_by_keyword:{keyword}")).await?;
        self.check_token(token).await?;
        let needle = keyword.to_lowercase();
        Ok(self
            .tasks_matching(user_id, |t| {
                t.title.to_lowercase().contains(&needle)
                    || t.description.to_lowercase().contains(&needle)
            })
            .await)
    }

    async fn advanced_search(
        &self,
        token: &str,
        criteria: &SearchCriteria,
    ) -> GatewayResult<TaskPage> {
        self.enter("advanced_search".to_string()).await?;
        self.check_token(token).await?;
        let needle = criteria.keyword.as_ref().map(|k| k.to_lowercase());
        let content = self
            .tasks_matching(criteria.user_id, |t| {
                let keyword_hit = needle.as_ref().map_or(true, |n| {
                    t.title.to_lowercase().contains(n) || t.description.to_lowercase().contains(n)
                });
                let status_hit = criteria.status.map_or(true, |s| t.status == s);
                let priority_hit = criteria.priority.map_or(true, |p| t.priority == p);
                let from_hit = criteria
                    .deadline_from
                    .map_or(true, |from| t.deadline.map_or(false, |d| d >= from));
                let to_hit = criteria
                    .deadline_to
                    .map_or(true, |to| t.deadline.map_or(false, |d| d <= to));
                keyword_hit && status_hit && priority_hit && from_hit && to_hit
            })
            .await;
        let total = content.len() as u64;
        Ok(TaskPage {
            content,
            total_elements: Some(total),
            total_pages: Some(1),
        })
    }

    async fn sync_tasks(&self, token: &str, user_id: i64) -> GatewayResult<()> {
        self.enter("sync_tasks".to_string()).await?;
        self.check_token(token).await?;
        let mut state = self.state.write().await;
        for task in state.tasks.values_mut().filter(|t| t.user_id == user_id) {
            derive_overdue(task);
        }
        Ok(())
    }

    async fn create_task(&self, token: &str, draft: &TaskDraft) -> GatewayResult<Task> {
        self.enter("create_task".to_string()).await?;
        self.check_token(token).await?;
        if draft.title.trim().is_empty() {
            return Err(rejected(400, "Title is required"));
        }
        let mut state = self.state.write().await;
        let now = Utc::now().naive_utc();
        let mut task = Task {
            id: state.next_task_id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            status: draft.status,
            priority: draft.priority,
            user_id: draft.user_id,
            deadline: draft.deadline,
            created_at: now,
            updated_at: now,
        };
        derive_overdue(&mut task);
        state.next_task_id += 1;
        state.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update_task(
        &self,
        token: &str,
        task_id: i64,
        user_id: i64,
        draft: &TaskDraft,
    ) -> GatewayResult<Task> {
        self.enter(format!("update_task:{task_id}")).await?;
        self.check_token(token).await?;
        let mut state = self.state.write().await;
        match state.tasks.get_mut(&task_id).filter(|t| t.user_id == user_id) {
            Some(task) => {
                task.title = draft.title.clone();
                task.description = draft.description.clone();
                task.status = draft.status;
                task.priority = draft.priority;
                task.deadline = draft.deadline;
                task.updated_at = Utc::now().naive_utc();
                derive_overdue(task);
                Ok(task.clone())
            }
            None => Err(rejected(404, "Task not found")),
        }
    }

    async fn update_task_status(
        &self,
        token: &str,
        task_id: i64,
        user_id: i64,
        status: TaskStatus,
    ) -> GatewayResult<Task> {
        self.enter(format!("update_task_status:{task_id}:{status}")).await?;
        self.check_token(token).await?;
        let mut state = self.state.write().await;
        match state.tasks.get_mut(&task_id).filter(|t| t.user_id == user_id) {
            Some(task) => {
                task.status = status;
                task.updated_at = Utc::now().naive_utc();
                derive_overdue(task);
                Ok(task.clone())
            }
            None => Err(rejected(404, "Task not found")),
        }
    }

    async fn delete_task(&self, token: &str, task_id: i64, user_id: i64) -> GatewayResult<()> {
        self.enter(format!("delete_task:{task_id}")).await?;
        self.check_token(token).await?;
        let mut state = self.state.write().await;
        let exists = state.tasks.get(&task_id).map_or(false, |t| t.user_id == user_id);
        if exists {
            state.tasks.remove(&task_id);
            Ok(())
        } else {
            Err(rejected(404, "Task not found"))
        }
    }
}
