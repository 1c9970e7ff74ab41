// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Task search-and-synchronization controller
//!
//! Owns the authoritative task set and every path that can change it:
//! the active search mode, the mutation operations (each followed by a
//! forced resynchronization), and the session lifecycle. Remote
//! failures are classified by the gateway and handled here: outages
//! drive the health monitor, a 401 tears the session down, rejections
//! surface a one-shot message.
//!
//! Searches issued concurrently are fenced by a monotonic sequence
//! number: a result that was overtaken by a newer search is discarded
//! instead of overwriting the authoritative set.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use tf_api_contract::{
    parse_deadline_input, validate_login_request, validate_register_request, validate_task_draft,
    AuthResponse, LoginRequest, RegisterRequest, Task, TaskDraft, TaskPriority, TaskStatus, User,
};
use tf_client_api::{GatewayError, TaskGateway};

use crate::error::ControllerError;
use crate::filter::{filter_tasks, QuickFilters};
use crate::health::{HealthMonitor, ServiceHealth};
use crate::search::SearchMode;
use crate::session::{Session, SessionStorage};
use crate::stats::TaskStats;

/// Form-level input for creating or editing a task.
///
/// The deadline is the raw `datetime-local` string; normalization to a
/// wire timestamp happens on dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskInput {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub deadline: String,
}

impl TaskInput {
    /// A fresh form: TODO / MEDIUM, no deadline.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            deadline: String::new(),
        }
    }
}

struct ControllerState {
    session: Option<Session>,
    storage: Box<dyn SessionStorage>,
    search: SearchMode,
    filters: QuickFilters,
    tasks: Vec<Task>,
    last_error: Option<String>,
    search_seq: u64,
}

/// The task search-and-synchronization controller
#[derive(Clone)]
pub struct TaskController {
    gateway: Arc<dyn TaskGateway>,
    health: HealthMonitor,
    state: Arc<RwLock<ControllerState>>,
}

impl TaskController {
    pub fn new(gateway: Arc<dyn TaskGateway>, storage: Box<dyn SessionStorage>) -> Self {
        Self::with_recovery_delay(gateway, storage, HealthMonitor::DEFAULT_RECOVERY_DELAY)
    }

    /// Controller with a custom health-recovery delay (shortened in
    /// tests).
    pub fn with_recovery_delay(
        gateway: Arc<dyn TaskGateway>,
        storage: Box<dyn SessionStorage>,
        recovery_delay: Duration,
    ) -> Self {
        Self {
            gateway,
            health: HealthMonitor::new(recovery_delay),
            state: Arc::new(RwLock::new(ControllerState {
                session: None,
                storage,
                search: SearchMode::All,
                filters: QuickFilters::default(),
                tasks: Vec::new(),
                last_error: None,
                search_seq: 0,
            })),
        }
    }

    // Session lifecycle

    /// Restore a persisted session, if any, and fetch the task set.
    ///
    /// A failed initial fetch does not undo the restore (unless it was
    /// a 401, which tears the session down); its effects are recorded
    /// on the controller state like any other search failure.
    pub async fn restore(&self) -> Result<Option<User>, ControllerError> {
        let restored = {
            let mut s = self.state.write().await;
            let session = s.storage.load()?;
            s.session = session.clone();
            session
        };
        match restored {
            Some(session) => {
                info!(user_id = session.user.id, "session restored");
                if self.run_search().await.is_err() {
                    debug!("initial fetch after session restore failed");
                }
                Ok(self.current_user().await)
            }
            None => Ok(None),
        }
    }

    /// Authenticate, persist the session, and fetch the task set.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ControllerError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        if let Err(e) = validate_login_request(&request) {
            return Err(self.refuse(e.to_string()).await);
        }

        match self.gateway.login(&request).await {
            Ok(AuthResponse { user, token }) => {
                {
                    let mut s = self.state.write().await;
                    let session = Session {
                        user: user.clone(),
                        token,
                    };
                    s.storage.save(&session)?;
                    s.session = Some(session);
                    s.search = SearchMode::All;
                    s.filters = QuickFilters::default();
                    s.tasks.clear();
                    s.last_error = None;
                }
                info!(user_id = user.id, "signed in");
                self.run_search().await?;
                Ok(user)
            }
            Err(error) => Err(self
                .note_failure(error, "Authentication Service", "Authentication error")
                .await),
        }
    }

    /// Create an account. Registration does not sign the user in; the
    /// flow returns to the login step.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, ControllerError> {
        let request = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        if let Err(e) = validate_register_request(&request) {
            return Err(self.refuse(e.to_string()).await);
        }

        match self.gateway.register(&request).await {
            Ok(AuthResponse { user, .. }) => {
                info!(user_id = user.id, "account registered");
                Ok(user)
            }
            Err(error) => Err(self
                .note_failure(error, "Authentication Service", "Registration error")
                .await),
        }
    }

    /// Clear the session, the persisted record, and all search state.
    pub async fn logout(&self) -> Result<(), ControllerError> {
        let mut s = self.state.write().await;
        s.storage.clear()?;
        s.session = None;
        s.tasks.clear();
        s.search = SearchMode::All;
        s.filters = QuickFilters::default();
        s.last_error = None;
        info!("signed out");
        Ok(())
    }

    // Search controller

    /// Re-run the active search and replace the authoritative set.
    pub async fn run_search(&self) -> Result<(), ControllerError> {
        let (token, user_id, mode, seq) = {
            let mut s = self.state.write().await;
            let (token, user_id) = match &s.session {
                Some(session) => (session.token.clone(), session.user.id),
                None => return Err(ControllerError::NotAuthenticated),
            };
            if let SearchMode::Keyword(keyword) = &s.search {
                // A blank keyword issues no request at all.
                if keyword.trim().is_empty() {
                    return Ok(());
                }
            }
            s.search_seq += 1;
            (token, user_id, s.search.clone(), s.search_seq)
        };

        debug!(%mode, seq, "running search");

        let outcome = match &mode {
            SearchMode::All => self.gateway.user_tasks(&token, user_id).await,
            SearchMode::Status(status) => {
                self.gateway.tasks_by_status(&token, user_id, *status).await
            }
            SearchMode::Priority(priority) => {
                self.gateway.tasks_by_priority(&token, user_id, *priority).await
            }
            SearchMode::Keyword(keyword) => {
                self.gateway.tasks_by_keyword(&token, user_id, keyword).await
            }
            SearchMode::Advanced(query) => self
                .gateway
                .advanced_search(&token, &query.to_criteria(user_id))
                .await
                .map(|page| page.content),
        };

        {
            let mut s = self.state.write().await;
            if s.search_seq != seq {
                debug!(seq, current = s.search_seq, "discarding stale search result");
                return Ok(());
            }
            match &outcome {
                Ok(tasks) => {
                    s.tasks = tasks.clone();
                    s.last_error = None;
                }
                Err(error) => {
                    // The full fetch clears the view on an outage; a
                    // failed narrower search keeps the previous set.
                    if error.is_outage() && mode == SearchMode::All {
                        s.tasks.clear();
                    }
                }
            }
        }

        match outcome {
            Ok(_) => {
                self.health.report_online();
                Ok(())
            }
            Err(error) => Err(self
                .note_failure(error, "Search Service", "Error loading tasks")
                .await),
        }
    }

    /// Select a search mode without running it.
    pub async fn set_search_mode(&self, mode: SearchMode) {
        self.state.write().await.search = mode;
    }

    /// Select a search mode and run it immediately.
    pub async fn search(&self, mode: SearchMode) -> Result<(), ControllerError> {
        self.set_search_mode(mode).await;
        self.run_search().await
    }

    /// Drop all search parameters, return to ALL mode, and re-fetch.
    pub async fn reset_search(&self) -> Result<(), ControllerError> {
        self.set_search_mode(SearchMode::All).await;
        self.run_search().await
    }

    // Mutation coordinator

    /// Trigger server-side re-derivation, then re-run the active search.
    pub async fn resync(&self) -> Result<(), ControllerError> {
        let (token, user_id) = self.credentials().await?;
        if let Err(error) = self.gateway.sync_tasks(&token, user_id).await {
            return Err(self.note_failure(error, "Sync Service", "Sync error").await);
        }
        self.run_search().await
    }

    pub async fn create_task(&self, input: TaskInput) -> Result<(), ControllerError> {
        self.ensure_online()?;
        let (token, user_id) = self.credentials().await?;
        let draft = self.build_draft(input, user_id).await?;

        match self.gateway.create_task(&token, &draft).await {
            Ok(task) => {
                info!(task_id = task.id, "task created");
                self.resync().await
            }
            Err(error) => Err(self
                .note_failure(error, "Task Service", "Error creating task")
                .await),
        }
    }

    /// Full-record update of an existing task.
    pub async fn update_task(&self, task_id: i64, input: TaskInput) -> Result<(), ControllerError> {
        self.ensure_online()?;
        let (token, user_id) = self.credentials().await?;
        let draft = self.build_draft(input, user_id).await?;

        match self.gateway.update_task(&token, task_id, user_id, &draft).await {
            Ok(_) => {
                info!(task_id, "task updated");
                self.resync().await
            }
            Err(error) => Err(self
                .note_failure(error, "Task Service", "Error updating task")
                .await),
        }
    }

    /// Status-only change, as a partial update.
    ///
    /// An id that is not in the current authoritative set is silently
    /// ignored: the view the user acted on no longer contains it.
    pub async fn change_status(
        &self,
        task_id: i64,
        status: TaskStatus,
    ) -> Result<(), ControllerError> {
        self.ensure_online()?;
        let (token, user_id) = self.credentials().await?;

        let known = self.state.read().await.tasks.iter().any(|t| t.id == task_id);
        if !known {
            debug!(task_id, "status change for task outside the current set; ignoring");
            return Ok(());
        }

        match self
            .gateway
            .update_task_status(&token, task_id, user_id, status)
            .await
        {
            Ok(_) => self.resync().await,
            Err(error) => Err(self
                .note_failure(error, "Task Service", "Error changing status")
                .await),
        }
    }

    /// Priority-only change, implemented as a full-record replace of
    /// the task as currently known. An unknown id is a no-op.
    pub async fn change_priority(
        &self,
        task_id: i64,
        priority: TaskPriority,
    ) -> Result<(), ControllerError> {
        self.ensure_online()?;
        let (token, user_id) = self.credentials().await?;

        let draft = {
            let s = self.state.read().await;
            s.tasks.iter().find(|t| t.id == task_id).map(|task| {
                let mut draft = task.to_draft();
                draft.priority = priority;
                draft
            })
        };
        let Some(draft) = draft else {
            debug!(task_id, "priority change for task outside the current set; ignoring");
            return Ok(());
        };

        match self.gateway.update_task(&token, task_id, user_id, &draft).await {
            Ok(_) => self.resync().await,
            Err(error) => Err(self
                .note_failure(error, "Task Service", "Error changing priority")
                .await),
        }
    }

    /// Delete a task. Without `confirmed` no request is issued and the
    /// authoritative set is untouched.
    pub async fn delete_task(&self, task_id: i64, confirmed: bool) -> Result<(), ControllerError> {
        if !confirmed {
            debug!(task_id, "delete not confirmed; no request issued");
            return Ok(());
        }
        self.ensure_online()?;
        let (token, user_id) = self.credentials().await?;

        match self.gateway.delete_task(&token, task_id, user_id).await {
            Ok(()) => {
                info!(task_id, "task deleted");
                self.resync().await
            }
            Err(error) => Err(self
                .note_failure(error, "Task Service", "Error deleting task")
                .await),
        }
    }

    // Quick filters and views

    pub async fn set_status_filter(&self, status: Option<TaskStatus>) {
        self.state.write().await.filters.status = status;
    }

    pub async fn set_priority_filter(&self, priority: Option<TaskPriority>) {
        self.state.write().await.filters.priority = priority;
    }

    pub async fn quick_filters(&self) -> QuickFilters {
        self.state.read().await.filters
    }

    /// The authoritative set, as last confirmed by the gateway.
    pub async fn tasks(&self) -> Vec<Task> {
        self.state.read().await.tasks.clone()
    }

    /// The displayed subset: authoritative set narrowed by the quick
    /// filters.
    pub async fn visible_tasks(&self) -> Vec<Task> {
        let s = self.state.read().await;
        filter_tasks(&s.tasks, &s.filters)
    }

    pub async fn stats(&self) -> TaskStats {
        TaskStats::collect(&self.state.read().await.tasks)
    }

    // Read accessors

    pub async fn current_user(&self) -> Option<User> {
        self.state.read().await.session.as_ref().map(|s| s.user.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.session.is_some()
    }

    pub async fn search_mode(&self) -> SearchMode {
        self.state.read().await.search.clone()
    }

    pub fn health(&self) -> ServiceHealth {
        self.health.health()
    }

    /// The message a UI should currently display: the outage notice
    /// while the monitor is offline, the last one-shot error otherwise.
    pub async fn error_message(&self) -> Option<String> {
        if let Some(notice) = self.health.notice() {
            return Some(notice);
        }
        self.state.read().await.last_error.clone()
    }

    // Private helper methods

    async fn credentials(&self) -> Result<(String, i64), ControllerError> {
        let s = self.state.read().await;
        let session = s.session.as_ref().ok_or(ControllerError::NotAuthenticated)?;
        Ok((session.token.clone(), session.user.id))
    }

    /// Destructive operations are refused while the service is
    /// considered offline; reads may still be attempted.
    fn ensure_online(&self) -> Result<(), ControllerError> {
        if self.health.is_online() {
            Ok(())
        } else {
            Err(ControllerError::ServiceOffline)
        }
    }

    async fn build_draft(
        &self,
        input: TaskInput,
        user_id: i64,
    ) -> Result<TaskDraft, ControllerError> {
        let deadline = match parse_deadline_input(&input.deadline) {
            Ok(deadline) => deadline,
            Err(e) => return Err(self.refuse(e.to_string()).await),
        };
        let draft = TaskDraft {
            title: input.title.trim().to_string(),
            description: input.description,
            status: input.status,
            priority: input.priority,
            deadline,
            user_id,
        };
        if let Err(e) = validate_task_draft(&draft) {
            return Err(self.refuse(e.to_string()).await);
        }
        Ok(draft)
    }

    /// Record a local refusal message and build the matching error.
    async fn refuse(&self, message: String) -> ControllerError {
        self.set_error(Some(message.clone())).await;
        ControllerError::Validation(message)
    }

    async fn set_error(&self, message: Option<String>) {
        self.state.write().await.last_error = message;
    }

    /// Apply the side effects of a classified gateway failure and wrap
    /// it for the caller.
    async fn note_failure(
        &self,
        error: GatewayError,
        service: &str,
        context: &str,
    ) -> ControllerError {
        match &error {
            GatewayError::Transport(detail) => {
                warn!(%detail, service, "transport failure");
                self.health.report_outage(format!(
                    "{service} is temporarily unavailable. Please try again later."
                ));
                self.set_error(None).await;
            }
            GatewayError::Degraded { message } => {
                self.health
                    .report_outage(format!("{service} unavailable: {message}"));
                self.set_error(None).await;
            }
            GatewayError::Unauthorized => {
                self.teardown_session().await;
                self.set_error(Some(
                    "Authorization error. Please sign in again.".to_string(),
                ))
                .await;
            }
            GatewayError::Rejected { status, .. } => {
                let detail = error.rejection_message().unwrap_or_default();
                warn!(status, %detail, service, "request rejected");
                self.set_error(Some(format!("{context}: {detail}"))).await;
            }
        }
        ControllerError::Gateway(error)
    }

    /// Local session teardown after a 401.
    async fn teardown_session(&self) {
        let mut s = self.state.write().await;
        if let Err(error) = s.storage.clear() {
            warn!(%error, "failed to clear persisted session");
        }
        s.session = None;
        s.tasks.clear();
        s.search = SearchMode::All;
        s.filters = QuickFilters::default();
    }
}
