// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Controller behavior against the in-process mock gateway.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use tf_api_contract::{Task, TaskPriority, TaskStatus, User};
use tf_client_api::GatewayError;
use tf_core::{
    ControllerError, MemoryStorage, SearchMode, ServiceHealth, Session, SessionStorage,
    TaskController, TaskInput,
};
use tf_gateway_mock::MockGateway;

const RECOVERY: Duration = Duration::from_secs(5);

fn ts(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").unwrap()
}

fn task(id: i64, user_id: i64, title: &str, status: TaskStatus, priority: TaskPriority) -> Task {
    Task {
        id,
        title: title.to_string(),
        description: String::new(),
        status,
        priority,
        user_id,
        deadline: None,
        created_at: ts("2026-02-01T08:00:00"),
        updated_at: ts("2026-02-01T08:00:00"),
    }
}

async fn setup() -> (MockGateway, TaskController, User) {
    let gateway = MockGateway::new();
    let user = gateway.seed_user("alice", "a@x.com", "p").await;
    let controller = TaskController::with_recovery_delay(
        Arc::new(gateway.clone()),
        Box::new(MemoryStorage::new()),
        RECOVERY,
    );
    (gateway, controller, user)
}

async fn setup_signed_in() -> (MockGateway, TaskController, User) {
    let (gateway, controller, user) = setup().await;
    controller.login("a@x.com", "p").await.unwrap();
    gateway.clear_calls().await;
    (gateway, controller, user)
}

#[tokio::test]
async fn login_populates_session_and_fetches_all_tasks() {
    let (gateway, controller, user) = setup().await;

    let signed_in = controller.login("a@x.com", "p").await.unwrap();
    assert_eq!(signed_in.id, user.id);
    assert_eq!(controller.current_user().await, Some(user));
    assert_eq!(controller.search_mode().await, SearchMode::All);

    // The ALL-mode fetch ran and found nothing: empty state, no error.
    let calls = gateway.calls().await;
    assert_eq!(calls, vec!["login".to_string(), "user_tasks".to_string()]);
    assert!(controller.tasks().await.is_empty());
    assert_eq!(controller.error_message().await, None);
    assert_eq!(controller.health(), ServiceHealth::Online);
}

#[tokio::test]
async fn failed_login_leaves_no_session() {
    let (gateway, controller, _) = setup().await;

    let err = controller.login("a@x.com", "wrong").await.unwrap_err();
    assert!(matches!(err, ControllerError::Gateway(GatewayError::Rejected { .. })));
    assert!(!controller.is_authenticated().await);
    assert!(controller
        .error_message()
        .await
        .unwrap()
        .starts_with("Authentication error"));

    // Only the login call went out.
    assert_eq!(gateway.calls().await, vec!["login".to_string()]);
}

#[tokio::test]
async fn register_does_not_create_a_session() {
    let (gateway, controller, _) = setup().await;

    let user = controller.register("bob", "b@x.com", "pw").await.unwrap();
    assert_eq!(user.username, "bob");
    assert!(!controller.is_authenticated().await);
    assert_eq!(gateway.calls().await, vec!["register".to_string()]);
}

#[tokio::test]
async fn quick_filters_narrow_the_view_without_requests() {
    let (gateway, controller, user) = setup().await;
    gateway
        .insert_task(task(1, user.id, "a", TaskStatus::Todo, TaskPriority::Low))
        .await;
    gateway
        .insert_task(task(2, user.id, "b", TaskStatus::Todo, TaskPriority::High))
        .await;
    gateway
        .insert_task(task(3, user.id, "c", TaskStatus::Done, TaskPriority::High))
        .await;

    controller.login("a@x.com", "p").await.unwrap();
    gateway.clear_calls().await;

    controller.set_status_filter(Some(TaskStatus::Todo)).await;
    controller.set_priority_filter(Some(TaskPriority::High)).await;

    let visible: Vec<i64> = controller.visible_tasks().await.iter().map(|t| t.id).collect();
    assert_eq!(visible, vec![2]);
    // The authoritative set is untouched and nothing hit the gateway.
    assert_eq!(controller.tasks().await.len(), 3);
    assert!(gateway.calls().await.is_empty());
}

#[tokio::test]
async fn mutation_resyncs_through_the_active_search() {
    let (gateway, controller, user) = setup_signed_in().await;
    gateway
        .insert_task(task(10, user.id, "keep", TaskStatus::Todo, TaskPriority::Medium))
        .await;

    controller.search(SearchMode::Status(TaskStatus::Todo)).await.unwrap();
    gateway.clear_calls().await;

    // Create a DONE task while the TODO search is active: the new task
    // must not appear in the authoritative set, because the resync
    // re-runs the active search rather than patching locally.
    let mut input = TaskInput::new("finished thing");
    input.status = TaskStatus::Done;
    controller.create_task(input).await.unwrap();

    let calls = gateway.calls().await;
    assert_eq!(
        calls,
        vec![
            "create_task".to_string(),
            "sync_tasks".to_string(),
            "tasks_by_status:TODO".to_string(),
        ]
    );

    let ids: Vec<i64> = controller.tasks().await.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![10]);
    // Both tasks exist server-side.
    assert_eq!(gateway.stored_tasks().await.len(), 2);
}

#[tokio::test]
async fn empty_title_is_rejected_before_any_request() {
    let (gateway, controller, _) = setup_signed_in().await;

    let err = controller.create_task(TaskInput::new("   ")).await.unwrap_err();
    assert!(matches!(err, ControllerError::Validation(_)));
    assert_eq!(
        controller.error_message().await.as_deref(),
        Some("Task title is required")
    );
    assert!(gateway.calls().await.is_empty());
}

#[tokio::test]
async fn deadline_input_is_normalized_to_full_seconds() {
    let (gateway, controller, _) = setup_signed_in().await;

    let mut input = TaskInput::new("with deadline");
    input.deadline = "2026-03-01T09:30".to_string();
    controller.create_task(input).await.unwrap();

    let stored = gateway.stored_tasks().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].deadline, Some(ts("2026-03-01T09:30:00")));

    // An empty deadline field transmits no deadline at all.
    controller.create_task(TaskInput::new("without deadline")).await.unwrap();
    let stored = gateway.stored_tasks().await;
    assert_eq!(stored[1].deadline, None);
}

#[tokio::test]
async fn status_change_on_unknown_id_is_a_noop() {
    let (gateway, controller, _) = setup_signed_in().await;

    controller.change_status(999, TaskStatus::Done).await.unwrap();
    assert!(gateway.calls().await.is_empty());
    assert_eq!(controller.error_message().await, None);
}

#[tokio::test]
async fn priority_change_replaces_the_full_record() {
    let (gateway, controller, user) = setup_signed_in().await;
    gateway
        .insert_task(task(5, user.id, "tune me", TaskStatus::InProgress, TaskPriority::Low))
        .await;
    controller.run_search().await.unwrap();
    gateway.clear_calls().await;

    controller.change_priority(5, TaskPriority::Urgent).await.unwrap();

    let calls = gateway.calls().await;
    assert_eq!(calls[0], "update_task:5");

    let stored = gateway.stored_tasks().await;
    assert_eq!(stored[0].priority, TaskPriority::Urgent);
    // Everything else carried over from the known record.
    assert_eq!(stored[0].title, "tune me");
    assert_eq!(stored[0].status, TaskStatus::InProgress);

    // Unknown ids produce no traffic.
    gateway.clear_calls().await;
    controller.change_priority(999, TaskPriority::Low).await.unwrap();
    assert!(gateway.calls().await.is_empty());
}

#[tokio::test]
async fn unconfirmed_delete_issues_no_request() {
    let (gateway, controller, user) = setup_signed_in().await;
    gateway
        .insert_task(task(7, user.id, "stays", TaskStatus::Todo, TaskPriority::Medium))
        .await;
    controller.run_search().await.unwrap();
    gateway.clear_calls().await;

    controller.delete_task(7, false).await.unwrap();
    assert!(gateway.calls().await.is_empty());
    assert_eq!(controller.tasks().await.len(), 1);

    controller.delete_task(7, true).await.unwrap();
    assert!(gateway.stored_tasks().await.is_empty());
    assert!(controller.tasks().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn degraded_search_goes_offline_and_recovers() {
    let (gateway, controller, _) = setup_signed_in().await;

    gateway
        .push_failure(GatewayError::Degraded {
            message: "Search Service is temporarily unavailable. Please try again later."
                .to_string(),
        })
        .await;

    assert!(controller.run_search().await.is_err());
    assert_eq!(controller.health(), ServiceHealth::Offline);
    let notice = controller.error_message().await.unwrap();
    assert!(notice.contains("Search Service"));
    // The failed full fetch empties the view.
    assert!(controller.tasks().await.is_empty());

    tokio::time::sleep(RECOVERY + Duration::from_millis(10)).await;
    assert_eq!(controller.health(), ServiceHealth::Online);
    assert_eq!(controller.error_message().await, None);
}

#[tokio::test(start_paused = true)]
async fn second_failure_rearms_the_recovery_timer() {
    let (gateway, controller, _) = setup_signed_in().await;

    gateway
        .push_failure(GatewayError::Transport("connection refused".to_string()))
        .await;
    assert!(controller.run_search().await.is_err());
    assert_eq!(controller.health(), ServiceHealth::Offline);

    tokio::time::sleep(Duration::from_secs(3)).await;
    gateway
        .push_failure(GatewayError::Transport("connection refused".to_string()))
        .await;
    assert!(controller.run_search().await.is_err());

    // Three more seconds in: the first timer's deadline has passed but
    // the re-armed one has not.
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(controller.health(), ServiceHealth::Offline);

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(controller.health(), ServiceHealth::Online);
}

#[tokio::test]
async fn mutations_are_refused_while_offline() {
    let (gateway, controller, _) = setup_signed_in().await;

    gateway
        .push_failure(GatewayError::Transport("connection refused".to_string()))
        .await;
    assert!(controller.run_search().await.is_err());
    assert_eq!(controller.health(), ServiceHealth::Offline);
    gateway.clear_calls().await;

    let err = controller.create_task(TaskInput::new("blocked")).await.unwrap_err();
    assert!(matches!(err, ControllerError::ServiceOffline));
    let err = controller.delete_task(1, true).await.unwrap_err();
    assert!(matches!(err, ControllerError::ServiceOffline));
    assert!(gateway.calls().await.is_empty());

    // Reads may still be attempted while offline.
    assert!(controller.run_search().await.is_ok());
}

#[tokio::test]
async fn unauthorized_tears_down_the_session_everywhere() {
    let (gateway, controller, user) = setup_signed_in().await;
    gateway
        .insert_task(task(1, user.id, "t", TaskStatus::Todo, TaskPriority::Low))
        .await;
    controller.run_search().await.unwrap();

    gateway.revoke_tokens().await;
    let err = controller.run_search().await.unwrap_err();
    assert!(matches!(err, ControllerError::Gateway(GatewayError::Unauthorized)));

    assert!(!controller.is_authenticated().await);
    assert!(controller.tasks().await.is_empty());
    assert_eq!(
        controller.error_message().await.as_deref(),
        Some("Authorization error. Please sign in again.")
    );
    // Health is unaffected: a 401 is not an outage.
    assert_eq!(controller.health(), ServiceHealth::Online);

    // Until a fresh login, nothing reaches the gateway.
    gateway.clear_calls().await;
    let err = controller.create_task(TaskInput::new("nope")).await.unwrap_err();
    assert!(matches!(err, ControllerError::NotAuthenticated));
    assert!(gateway.calls().await.is_empty());
}

#[tokio::test]
async fn reset_search_returns_to_all_mode() {
    let (gateway, controller, user) = setup_signed_in().await;
    gateway
        .insert_task(task(1, user.id, "alpha", TaskStatus::Todo, TaskPriority::Low))
        .await;
    gateway
        .insert_task(task(2, user.id, "beta", TaskStatus::Done, TaskPriority::Low))
        .await;

    controller.search(SearchMode::Keyword("alpha".to_string())).await.unwrap();
    assert_eq!(controller.tasks().await.len(), 1);

    controller.reset_search().await.unwrap();
    assert_eq!(controller.search_mode().await, SearchMode::All);
    assert_eq!(controller.tasks().await.len(), 2);
}

#[tokio::test]
async fn advanced_search_combines_predicates() {
    let (gateway, controller, user) = setup_signed_in().await;
    gateway
        .insert_task(task(1, user.id, "report draft", TaskStatus::Todo, TaskPriority::High))
        .await;
    gateway
        .insert_task(task(2, user.id, "report final", TaskStatus::Done, TaskPriority::High))
        .await;
    gateway
        .insert_task(task(3, user.id, "errand", TaskStatus::Todo, TaskPriority::High))
        .await;

    let query = tf_core::AdvancedQuery {
        keyword: Some("report".to_string()),
        status: Some(TaskStatus::Todo),
        ..tf_core::AdvancedQuery::default()
    };
    controller.search(SearchMode::Advanced(query)).await.unwrap();

    let ids: Vec<i64> = controller.tasks().await.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1]);
    assert_eq!(gateway.calls().await, vec!["advanced_search".to_string()]);
}

#[tokio::test]
async fn blank_keyword_search_issues_no_request() {
    let (gateway, controller, _) = setup_signed_in().await;

    controller.search(SearchMode::Keyword("   ".to_string())).await.unwrap();
    assert!(gateway.calls().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn stale_search_result_never_overwrites_a_newer_one() {
    let (gateway, controller, user) = setup_signed_in().await;
    gateway
        .insert_task(task(1, user.id, "report", TaskStatus::Todo, TaskPriority::Low))
        .await;
    gateway
        .insert_task(task(2, user.id, "errand", TaskStatus::Todo, TaskPriority::Low))
        .await;

    // The full fetch stalls on the wire; a keyword search overtakes it.
    gateway.push_delay(Duration::from_secs(5)).await;
    let slow = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.run_search().await })
    };
    tokio::task::yield_now().await;

    controller.search(SearchMode::Keyword("report".to_string())).await.unwrap();
    let ids: Vec<i64> = controller.tasks().await.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1]);

    // The stalled fetch completes afterwards and is discarded.
    slow.await.unwrap().unwrap();
    let ids: Vec<i64> = controller.tasks().await.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1]);
}

#[tokio::test]
async fn restore_rehydrates_the_session_and_fetches() {
    let gateway = MockGateway::new();
    let user = gateway.seed_user("alice", "a@x.com", "p").await;
    let token = gateway.issue_token(user.id).await;
    gateway
        .insert_task(task(1, user.id, "persisted", TaskStatus::Todo, TaskPriority::Low))
        .await;

    let storage = MemoryStorage::new();
    storage
        .save(&Session {
            user: user.clone(),
            token,
        })
        .unwrap();

    let controller = TaskController::with_recovery_delay(
        Arc::new(gateway.clone()),
        Box::new(storage),
        RECOVERY,
    );

    let restored = controller.restore().await.unwrap();
    assert_eq!(restored, Some(user));
    assert_eq!(controller.tasks().await.len(), 1);
}

#[tokio::test]
async fn restore_with_revoked_token_ends_signed_out() {
    let gateway = MockGateway::new();
    let user = gateway.seed_user("alice", "a@x.com", "p").await;

    let storage = MemoryStorage::new();
    storage
        .save(&Session {
            user,
            token: "expired".to_string(),
        })
        .unwrap();

    let controller = TaskController::with_recovery_delay(
        Arc::new(gateway.clone()),
        Box::new(storage),
        RECOVERY,
    );

    let restored = controller.restore().await.unwrap();
    assert_eq!(restored, None);
    assert!(!controller.is_authenticated().await);
}

#[tokio::test]
async fn logout_clears_session_and_search_state() {
    let (gateway, controller, user) = setup_signed_in().await;
    gateway
        .insert_task(task(1, user.id, "t", TaskStatus::Todo, TaskPriority::Low))
        .await;
    controller.search(SearchMode::Keyword("t".to_string())).await.unwrap();
    controller.set_status_filter(Some(TaskStatus::Todo)).await;

    controller.logout().await.unwrap();

    assert!(!controller.is_authenticated().await);
    assert!(controller.tasks().await.is_empty());
    assert_eq!(controller.search_mode().await, SearchMode::All);
    assert!(controller.quick_filters().await.is_identity());

    let err = controller.run_search().await.unwrap_err();
    assert!(matches!(err, ControllerError::NotAuthenticated));
}

#[tokio::test]
async fn rejected_mutation_keeps_the_authoritative_set() {
    let (gateway, controller, user) = setup_signed_in().await;
    gateway
        .insert_task(task(1, user.id, "t", TaskStatus::Todo, TaskPriority::Low))
        .await;
    controller.run_search().await.unwrap();
    gateway.clear_calls().await;

    gateway
        .push_failure(GatewayError::Rejected {
            status: 500,
            detail: "boom".to_string(),
        })
        .await;

    let err = controller.create_task(TaskInput::new("new")).await.unwrap_err();
    assert!(matches!(err, ControllerError::Gateway(GatewayError::Rejected { .. })));
    // No resync happened and the set is untouched.
    assert_eq!(gateway.calls().await, vec!["create_task".to_string()]);
    assert_eq!(controller.tasks().await.len(), 1);
    assert_eq!(controller.health(), ServiceHealth::Online);
    assert!(controller
        .error_message()
        .await
        .unwrap()
        .starts_with("Error creating task"));
}
