use super::*;
use crate::net::api::ApiError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use time::macros::datetime;

// =========================================================================
// MockApi
// =========================================================================

#[derive(Default)]
struct MockInner {
    create: VecDeque<Result<Option<User>, ApiError>>,
    list: VecDeque<Result<Vec<User>, ApiError>>,
    delete: VecDeque<Result<(), ApiError>>,
    submitted: Vec<FormData>,
    loading_during_call: Vec<bool>,
    gate: Option<LoadingGate>,
}

#[derive(Clone, Default)]
struct MockApi {
    inner: Arc<Mutex<MockInner>>,
}

impl MockApi {
    fn observing(gate: &LoadingGate) -> Self {
        let api = Self::default();
        api.inner.lock().unwrap().gate = Some(gate.clone());
        api
    }

    fn push_create(&self, result: Result<Option<User>, ApiError>) {
        self.inner.lock().unwrap().create.push_back(result);
    }

    fn push_list(&self, result: Result<Vec<User>, ApiError>) {
        self.inner.lock().unwrap().list.push_back(result);
    }

    fn push_delete(&self, result: Result<(), ApiError>) {
        self.inner.lock().unwrap().delete.push_back(result);
    }

    fn submitted(&self) -> Vec<FormData> {
        self.inner.lock().unwrap().submitted.clone()
    }

    fn loading_during_call(&self) -> Vec<bool> {
        self.inner.lock().unwrap().loading_during_call.clone()
    }

    fn record_loading(inner: &mut MockInner) {
        let loading = inner.gate.as_ref().is_some_and(LoadingGate::is_loading);
        inner.loading_during_call.push(loading);
    }
}

fn unscripted() -> ApiError {
    ApiError::Request("unscripted call".into())
}

#[async_trait::async_trait]
impl UsersApi for MockApi {
    async fn create_user(&self, form: &FormData) -> Result<Option<User>, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        Self::record_loading(&mut inner);
        inner.submitted.push(form.clone());
        inner.create.pop_front().unwrap_or_else(|| Err(unscripted()))
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let mut inner = self.inner.lock().unwrap();
        Self::record_loading(&mut inner);
        inner.list.pop_front().unwrap_or_else(|| Err(unscripted()))
    }

    async fn delete_users(&self) -> Result<(), ApiError> {
        let mut inner = self.inner.lock().unwrap();
        Self::record_loading(&mut inner);
        inner.delete.pop_front().unwrap_or_else(|| Err(unscripted()))
    }
}

// =========================================================================
// helpers
// =========================================================================

const TTL: Duration = Duration::from_millis(3000);

fn user(id: i64, username: &str) -> User {
    User { id, username: username.into(), created_at: datetime!(2025-02-01 09:30:00 UTC) }
}

fn controller_with(api: &MockApi, gate: &LoadingGate) -> FormController<MockApi> {
    FormController::new(api.clone(), StatusNotifier::new(TTL), gate.clone())
}

fn setup() -> (MockApi, LoadingGate, FormController<MockApi>) {
    let gate = LoadingGate::new();
    let api = MockApi::observing(&gate);
    let controller = controller_with(&api, &gate);
    (api, gate, controller)
}

fn fill(controller: &mut FormController<MockApi>, username: &str, password: &str) {
    controller.on_field_change(FormField::Username, username);
    controller.on_field_change(FormField::Password, password);
}

async fn seed_users(api: &MockApi, controller: &mut FormController<MockApi>, users: Vec<User>) {
    api.push_list(Ok(users));
    assert_eq!(controller.fetch_all().await, Outcome::Succeeded);
}

// =========================================================================
// submit
// =========================================================================

#[tokio::test(start_paused = true)]
async fn submit_success_resets_form_and_keeps_users() {
    let (api, _gate, mut controller) = setup();
    seed_users(&api, &mut controller, vec![user(9, "zoe")]).await;

    fill(&mut controller, "alice", "secret");
    api.push_create(Ok(Some(user(1, "alice"))));

    assert_eq!(controller.submit().await, Outcome::Succeeded);
    assert_eq!(controller.message().as_deref(), Some(MSG_USER_ADDED));
    assert_eq!(controller.form(), &FormData::default());
    assert_eq!(controller.users(), &[user(9, "zoe")]);
    assert_eq!(
        api.submitted(),
        vec![FormData { username: "alice".into(), password: "secret".into() }]
    );
}

#[tokio::test(start_paused = true)]
async fn submit_failure_keeps_form() {
    let (api, _gate, mut controller) = setup();
    fill(&mut controller, "alice", "secret");
    api.push_create(Err(ApiError::Status { status: 409, body: "taken".into() }));

    assert_eq!(controller.submit().await, Outcome::Failed);
    assert_eq!(controller.message().as_deref(), Some(MSG_ADD_FAILED));
    assert_eq!(controller.form().username, "alice");
    assert_eq!(controller.form().password, "secret");
}

#[tokio::test(start_paused = true)]
async fn submit_without_created_record_still_succeeds() {
    let (api, _gate, mut controller) = setup();
    fill(&mut controller, "alice", "secret");
    api.push_create(Ok(None));

    assert_eq!(controller.submit().await, Outcome::Succeeded);
    assert_eq!(controller.message().as_deref(), Some(MSG_USER_ADDED));
    assert_eq!(controller.form(), &FormData::default());
}

#[tokio::test(start_paused = true)]
async fn submit_does_not_merge_created_record() {
    let (api, _gate, mut controller) = setup();
    fill(&mut controller, "alice", "secret");
    api.push_create(Ok(Some(user(1, "alice"))));

    controller.submit().await;
    assert!(controller.users().is_empty());
}

// =========================================================================
// fetch_all
// =========================================================================

#[tokio::test(start_paused = true)]
async fn fetch_all_keeps_response_order() {
    let (api, _gate, mut controller) = setup();
    let users = vec![user(3, "c"), user(1, "a"), user(2, "b")];
    api.push_list(Ok(users.clone()));

    assert_eq!(controller.fetch_all().await, Outcome::Succeeded);
    assert_eq!(controller.users(), users.as_slice());
    assert_eq!(controller.message().as_deref(), Some(MSG_USERS_LOADED));
}

#[tokio::test(start_paused = true)]
async fn fetch_all_empty_reports_none_found() {
    let (api, _gate, mut controller) = setup();
    seed_users(&api, &mut controller, vec![user(1, "a")]).await;

    api.push_list(Ok(Vec::new()));
    assert_eq!(controller.fetch_all().await, Outcome::Succeeded);
    assert!(controller.users().is_empty());
    assert_eq!(controller.message().as_deref(), Some(MSG_USERS_NOT_FOUND));
}

#[tokio::test(start_paused = true)]
async fn fetch_all_failure_keeps_stale_list() {
    let (api, _gate, mut controller) = setup();
    seed_users(&api, &mut controller, vec![user(1, "a"), user(2, "b")]).await;

    api.push_list(Err(ApiError::Request("connection refused".into())));
    assert_eq!(controller.fetch_all().await, Outcome::Failed);
    assert_eq!(controller.users().len(), 2);
    assert_eq!(controller.message().as_deref(), Some(MSG_LOAD_FAILED));
}

#[tokio::test(start_paused = true)]
async fn fetch_all_replaces_rather_than_appends() {
    let (api, _gate, mut controller) = setup();
    seed_users(&api, &mut controller, vec![user(1, "a")]).await;
    seed_users(&api, &mut controller, vec![user(2, "b")]).await;
    assert_eq!(controller.users(), &[user(2, "b")]);
}

// =========================================================================
// delete_all
// =========================================================================

#[tokio::test(start_paused = true)]
async fn delete_all_empties_list() {
    let (api, _gate, mut controller) = setup();
    seed_users(&api, &mut controller, vec![user(1, "a"), user(2, "b")]).await;

    api.push_delete(Ok(()));
    assert_eq!(controller.delete_all().await, Outcome::Succeeded);
    assert!(controller.users().is_empty());
    assert_eq!(controller.message().as_deref(), Some(MSG_USERS_DELETED));
}

#[tokio::test(start_paused = true)]
async fn delete_all_on_empty_list_still_reports_success() {
    let (api, _gate, mut controller) = setup();
    api.push_delete(Ok(()));
    assert_eq!(controller.delete_all().await, Outcome::Succeeded);
    assert_eq!(controller.message().as_deref(), Some(MSG_USERS_DELETED));
}

#[tokio::test(start_paused = true)]
async fn delete_all_network_failure_keeps_list() {
    let (api, _gate, mut controller) = setup();
    seed_users(&api, &mut controller, vec![user(1, "a")]).await;

    api.push_delete(Err(ApiError::Request("network unreachable".into())));
    assert_eq!(controller.delete_all().await, Outcome::Failed);
    assert_eq!(controller.users(), &[user(1, "a")]);
    assert_eq!(controller.message().as_deref(), Some(MSG_DELETE_FAILED));
}

// =========================================================================
// loading gate
// =========================================================================

#[tokio::test(start_paused = true)]
async fn loading_spans_each_request_only() {
    let (api, gate, mut controller) = setup();
    assert!(!controller.is_loading());

    fill(&mut controller, "alice", "secret");
    api.push_create(Ok(Some(user(1, "alice"))));
    api.push_list(Err(ApiError::Request("down".into())));
    api.push_delete(Ok(()));

    controller.submit().await;
    assert!(!gate.is_loading());
    controller.fetch_all().await;
    assert!(!gate.is_loading());
    controller.delete_all().await;
    assert!(!gate.is_loading());

    assert_eq!(api.loading_during_call(), vec![true, true, true]);
    assert!(!controller.view().loading);
}

// =========================================================================
// status message lifecycle
// =========================================================================

#[tokio::test(start_paused = true)]
async fn outcome_message_auto_clears() {
    let (api, _gate, mut controller) = setup();
    api.push_list(Ok(Vec::new()));
    controller.fetch_all().await;

    tokio::time::sleep(Duration::from_millis(2900)).await;
    assert_eq!(controller.message().as_deref(), Some(MSG_USERS_NOT_FOUND));

    tokio::time::sleep(Duration::from_millis(200)).await;
    tokio::task::yield_now().await;
    assert_eq!(controller.message(), None);
}

#[tokio::test(start_paused = true)]
async fn later_action_supersedes_message() {
    let (api, _gate, mut controller) = setup();
    api.push_list(Ok(vec![user(1, "a")]));
    api.push_delete(Err(ApiError::Request("down".into())));

    controller.fetch_all().await;
    tokio::time::sleep(Duration::from_millis(2000)).await;
    controller.delete_all().await;

    tokio::time::sleep(Duration::from_millis(1500)).await;
    tokio::task::yield_now().await;
    assert_eq!(controller.message().as_deref(), Some(MSG_DELETE_FAILED));
    // Stale list and failure message diverge.
    assert_eq!(controller.users().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn view_snapshot_reflects_state() {
    let (api, _gate, mut controller) = setup();
    controller.on_field_change(FormField::Username, "bob");
    seed_users(&api, &mut controller, vec![user(4, "dan")]).await;

    let view = controller.view();
    assert_eq!(view.form.username, "bob");
    assert_eq!(view.users, vec![user(4, "dan")]);
    assert_eq!(view.message.as_deref(), Some(MSG_USERS_LOADED));
    assert!(!view.loading);
}
