// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Main REST API client implementation

use reqwest::{Client as HttpClient, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use tf_api_contract::*;
use tf_client_api::{GatewayError, GatewayResult};
use url::Url;

/// REST API client for the TaskFlow service.
///
/// Holds no session state; the bearer token is supplied per call.
#[derive(Debug, Clone)]
pub struct RestClient {
    http_client: HttpClient,
    base_url: Url,
}

impl RestClient {
    /// Create a new REST client
    pub fn new(base_url: Url) -> Self {
        let http_client = HttpClient::builder()
            .user_agent("taskflow-cli/0.1")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            base_url,
        }
    }

    /// Create a client from a base URL string
    pub fn from_url(base_url: &str) -> GatewayResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| GatewayError::Transport(format!("invalid base URL: {e}")))?;
        Ok(Self::new(base_url))
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `POST /auth/login`
    pub async fn login(&self, request: &LoginRequest) -> GatewayResult<AuthResponse> {
        self.request(Method::POST, "/auth/login", None, &[], Some(request)).await
    }

    /// `POST /auth/register`
    pub async fn register(&self, request: &RegisterRequest) -> GatewayResult<AuthResponse> {
        self.request(Method::POST, "/auth/register", None, &[], Some(request)).await
    }

    /// `GET /api/search/user/{userId}`
    pub async fn user_tasks(&self, token: &str, user_id: i64) -> GatewayResult<Vec<Task>> {
        let path = format!("/api/search/user/{user_id}");
        self.get(&path, token, &[]).await
    }

    /// `GET /api/search/user/{userId}/status?status=`
    pub async fn tasks_by_status(
        &self,
        token: &str,
        user_id: i64,
        status: TaskStatus,
    ) -> GatewayResult<Vec<Task>> {
        let path = format!("/api/search/user/{user_id}/status");
        self.get(&path, token, &[("status", status.as_str().to_string())]).await
    }

    /// `GET /api/search/user/{userId}/priority?priority=`
    pub async fn tasks_by_priority(
        &self,
        token: &str,
        user_id: i64,
        priority: TaskPriority,
    ) -> GatewayResult<Vec<Task>> {
        let path = format!("/api/search/user/{user_id}/priority");
        self.get(&path, token, &[("priority", priority.as_str().to_string())]).await
    }

    /// `GET /api/search/user/{userId}/keyword?keyword=`
    pub async fn tasks_by_keyword(
        &self,
        token: &str,
        user_id: i64,
        keyword: &str,
    ) -> GatewayResult<Vec<Task>> {
        let path = format!("/api/search/user/{user_id}/keyword");
        self.get(&path, token, &[("keyword", keyword.to_string())]).await
    }

    /// `POST /api/search/advanced`
    pub async fn advanced_search(
        &self,
        token: &str,
        criteria: &SearchCriteria,
    ) -> GatewayResult<TaskPage> {
        self.request(Method::POST, "/api/search/advanced", Some(token), &[], Some(criteria))
            .await
    }

    /// `POST /api/search/sync/{userId}`
    ///
    /// The service answers with a plain-text confirmation; only the
    /// status classification matters here.
    pub async fn sync_tasks(&self, token: &str, user_id: i64) -> GatewayResult<()> {
        let path = format!("/api/search/sync/{user_id}");
        self.request_unit(Method::POST, &path, Some(token), &[]).await
    }

    /// `POST /api/tasks`
    pub async fn create_task(&self, token: &str, draft: &TaskDraft) -> GatewayResult<Task> {
        self.request(Method::POST, "/api/tasks", Some(token), &[], Some(draft)).await
    }

    /// `PUT /api/tasks/{id}?userId=`
    pub async fn update_task(
        &self,
        token: &str,
        task_id: i64,
        user_id: i64,
        draft: &TaskDraft,
    ) -> GatewayResult<Task> {
        let path = format!("/api/tasks/{task_id}");
        self.request(
            Method::PUT,
            &path,
            Some(token),
            &[("userId", user_id.to_string())],
            Some(draft),
        )
        .await
    }

    /// `PATCH /api/tasks/{id}/status?userId=&status=`
    pub async fn update_task_status(
        &self,
        token: &str,
        task_id: i64,
        user_id: i64,
        status: TaskStatus,
    ) -> GatewayResult<Task> {
        let path = format!("/api/tasks/{task_id}/status");
        self.request(
            Method::PATCH,
            &path,
            Some(token),
            &[
                ("userId", user_id.to_string()),
                ("status", status.as_str().to_string()),
            ],
            None::<&()>,
        )
        .await
    }

    /// `DELETE /api/tasks/{id}?userId=`
    ///
    /// Like sync, the body is a plain-text confirmation.
    pub async fn delete_task(&self, token: &str, task_id: i64, user_id: i64) -> GatewayResult<()> {
        let path = format!("/api/tasks/{task_id}");
        self.request_unit(
            Method::DELETE,
            &path,
            Some(token),
            &[("userId", user_id.to_string())],
        )
        .await
    }

    // Private helper methods

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        query: &[(&str, String)],
    ) -> GatewayResult<T> {
        self.request(Method::GET, path, Some(token), query, None::<&()>).await
    }

    async fn request<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> GatewayResult<T> {
        let response = self.send(method, path, token, query, body).await?;
        let text = Self::classify(response).await?;
        serde_json::from_str(&text)
            .map_err(|e| GatewayError::Transport(format!("invalid response body: {e}")))
    }

    async fn request_unit(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        query: &[(&str, String)],
    ) -> GatewayResult<()> {
        let response = self.send(method, path, token, query, None::<&()>).await?;
        Self::classify(response).await.map(|_| ())
    }

    async fn send<B: serde::Serialize>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> GatewayResult<Response> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| GatewayError::Transport(format!("invalid request path: {e}")))?;

        tracing::debug!(%method, %url, "dispatching gateway request");

        let mut request = self
            .http_client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        request
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))
    }

    /// Classify a response per the error taxonomy and return the raw
    /// success body.
    async fn classify(response: Response) -> GatewayResult<String> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if status.is_success() {
            return Ok(text);
        }

        match status {
            StatusCode::SERVICE_UNAVAILABLE => {
                let message = serde_json::from_str::<ServiceFallback>(&text)
                    .map(|fallback| fallback.message)
                    .unwrap_or_else(|_| {
                        "Service is temporarily unavailable. Please try again later.".to_string()
                    });
                Err(GatewayError::Degraded { message })
            }
            StatusCode::UNAUTHORIZED => Err(GatewayError::Unauthorized),
            _ => Err(GatewayError::Rejected {
                status: status.as_u16(),
                detail: text,
            }),
        }
    }
}
