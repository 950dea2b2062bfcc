use std::cell::RefCell;
use std::collections::VecDeque;

use async_trait::async_trait;
use futures::executor::block_on;
use serde_json::{Value, json};
use taskdeck_core::client::{HttpRequest, HttpResponse, Method, Transport};
use taskdeck_core::config::Config;
use taskdeck_core::controller::{BannerKind, FormEdit, ViewStatus};
use taskdeck_core::error::TaskError;
use taskdeck_core::query::{QueryEdit, StatusFilter};
use taskdeck_core::session::TaskSession;
use taskdeck_shared::{TaskId, TaskStatus};
use tracing_subscriber::EnvFilter;

type Hook = Box<dyn FnOnce()>;

#[derive(Default)]
struct Recorder {
    requests: RefCell<Vec<HttpRequest>>,
    replies: RefCell<VecDeque<Result<HttpResponse, String>>>,
    /// Runs while the next request is outstanding, i.e. before its reply
    /// is delivered.
    while_pending: RefCell<Option<Hook>>,
}

impl Recorder {
    fn reply(self, status: u16, body: Value) -> Self {
        self.replies.borrow_mut().push_back(Ok(HttpResponse {
            status,
            status_text: String::new(),
            body: body.to_string(),
        }));
        self
    }

    fn reply_raw(self, status: u16, status_text: &str, body: &str) -> Self {
        self.replies.borrow_mut().push_back(Ok(HttpResponse {
            status,
            status_text: status_text.to_string(),
            body: body.to_string(),
        }));
        self
    }

    fn fail(self, reason: &str) -> Self {
        self.replies.borrow_mut().push_back(Err(reason.to_string()));
        self
    }
}

#[async_trait(?Send)]
impl Transport for Recorder {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, String> {
        self.requests.borrow_mut().push(request);
        let hook = self.while_pending.borrow_mut().take();
        if let Some(hook) = hook {
            hook();
        }
        self.replies.borrow_mut().pop_front().unwrap_or_else(|| {
            Ok(HttpResponse {
                status: 200,
                status_text: "OK".to_string(),
                body: "[]".to_string(),
            })
        })
    }
}

fn session(recorder: Recorder) -> TaskSession<Recorder> {
    session_with(recorder, &[])
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

fn session_with(recorder: Recorder, overrides: &[(&str, &str)]) -> TaskSession<Recorder> {
    init_tracing();
    let cfg = Config::from_overrides(
        overrides
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string())),
    )
    .expect("config");
    taskdeck_core::connect(recorder, cfg)
}

fn requests(s: &TaskSession<Recorder>) -> Vec<HttpRequest> {
    s.client().transport().requests.borrow().clone()
}

fn two_tasks() -> Value {
    json!({
        "items": [
            {"id": 41, "title": "Buy milk", "status": "todo"},
            {"id": 42, "title": "Ship MVP", "status": "done"}
        ],
        "total": 2,
        "page": 1,
        "pageSize": 10
    })
}

#[test]
fn create_success_closes_form_and_refetches_once() {
    let s = session(
        Recorder::default()
            .reply(200, two_tasks())
            .reply(201, json!({"id": 43, "title": "Test", "status": "todo"}))
            .reply(200, two_tasks()),
    );
    block_on(s.refresh());

    s.update(|c| c.open_create());
    s.update(|c| c.edit_form(FormEdit::Title("Test".into())));
    block_on(s.submit()).expect("submit");

    let sent = requests(&s);
    let methods: Vec<Method> = sent.iter().map(|r| r.method).collect();
    assert_eq!(methods, vec![Method::Get, Method::Post, Method::Get]);

    let body: Value = serde_json::from_str(sent[1].body.as_deref().expect("body")).expect("json");
    assert_eq!(body, json!({"title": "Test", "description": "", "status": "todo"}));
    assert_eq!(sent[1].url, "/v1/tasks");

    assert!(s.read(|c| c.form().is_none()));
    assert_eq!(s.read(|c| c.view().status), ViewStatus::Success);
}

#[test]
fn create_rejected_keeps_form_open_with_server_message() {
    let s = session(
        Recorder::default()
            .reply(200, two_tasks())
            .reply(400, json!({"message": "title required"})),
    );
    block_on(s.refresh());

    s.update(|c| c.open_create());
    s.update(|c| c.edit_form(FormEdit::Title("Test".into())));
    let err = block_on(s.submit()).expect_err("should fail");
    assert!(matches!(err, TaskError::Request { status: 400, .. }));

    assert_eq!(requests(&s).len(), 2, "no refetch after a failed save");
    let form = s.read(|c| c.form().cloned()).expect("form still open");
    assert_eq!(form.error.as_deref(), Some("title required"));
    assert_eq!(form.title, "Test");
    assert!(!form.busy);
}

#[test]
fn empty_title_is_rejected_before_any_request() {
    let s = session(Recorder::default());
    s.update(|c| c.open_create());
    let err = block_on(s.submit()).expect_err("validation");
    assert!(matches!(err, TaskError::Validation(_)));
    assert!(requests(&s).is_empty());
}

#[test]
fn confirmed_delete_sends_one_delete_for_the_task() {
    let s = session(
        Recorder::default()
            .reply(200, two_tasks())
            .reply_raw(204, "No Content", ""),
    );
    block_on(s.refresh());

    let mut prompt_seen = String::new();
    block_on(s.delete(&TaskId::from(42), |prompt| {
        prompt_seen = prompt.to_string();
        true
    }))
    .expect("delete");

    assert_eq!(prompt_seen, "Delete task: \"Ship MVP\"?");
    let deletes: Vec<HttpRequest> = requests(&s)
        .into_iter()
        .filter(|r| r.method == Method::Delete)
        .collect();
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].url, "/v1/tasks/42");

    let banner = s.read(|c| c.banner().cloned()).expect("banner");
    assert_eq!(banner.kind, BannerKind::Success);
}

#[test]
fn declined_delete_sends_nothing() {
    let s = session(Recorder::default());
    block_on(s.delete(&TaskId::from(42), |_| false)).expect("declined is not an error");
    assert!(requests(&s).is_empty());
    assert!(s.read(|c| c.banner().is_none()));
}

#[test]
fn failed_delete_shows_error_banner_and_keeps_rows() {
    let s = session(
        Recorder::default()
            .reply(200, two_tasks())
            .reply_raw(404, "Not Found", r#"{"detail":"Not Found"}"#),
    );
    block_on(s.refresh());
    let _ = block_on(s.delete(&TaskId::from(42), |_| true));

    let banner = s.read(|c| c.banner().cloned()).expect("banner");
    assert_eq!(banner.kind, BannerKind::Error);
    assert_eq!(banner.message, "Not Found");
    assert_eq!(s.read(|c| c.view().rows.len()), 2);
    assert_eq!(requests(&s).len(), 2);
}

#[test]
fn transport_failure_becomes_error_state() {
    let s = session(Recorder::default().fail("connection refused"));
    block_on(s.refresh());
    match s.read(|c| c.view().status) {
        ViewStatus::Error(message) => assert!(message.contains("connection refused")),
        other => panic!("expected error state, got {other:?}"),
    }
}

#[test]
fn undecodable_list_body_degrades_to_empty() {
    let s = session(Recorder::default().reply_raw(200, "OK", "<html>oops</html>"));
    block_on(s.refresh());
    let view = s.read(|c| c.view());
    assert_eq!(view.status, ViewStatus::Empty);
    assert_eq!(view.total, 0);
}

#[test]
fn server_mode_sends_filters_as_query_parameters() {
    let s = session(Recorder::default());
    block_on(s.refresh());
    block_on(s.edit_query(QueryEdit::SetStatus(StatusFilter::Only(TaskStatus::Done))));
    block_on(s.edit_query(QueryEdit::AddTag("home".into())));

    let urls: Vec<String> = requests(&s).into_iter().map(|r| r.url).collect();
    assert_eq!(urls[0], "/v1/tasks?page=1&pageSize=10");
    assert_eq!(urls[1], "/v1/tasks?page=1&pageSize=10&status=done");
    assert_eq!(urls[2], "/v1/tasks?page=1&pageSize=10&status=done&tags=home");
}

#[test]
fn debounced_search_issues_a_single_fetch() {
    let s = session(Recorder::default());
    block_on(s.refresh());

    let tickets: Vec<_> = ["a", "ab", "abc"]
        .into_iter()
        .map(|text| s.search_input(text.to_string()))
        .collect();
    for ticket in tickets {
        block_on(s.settle_search(ticket));
    }

    let sent = requests(&s);
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].url, "/v1/tasks?page=1&pageSize=10&search=abc");
}

#[test]
fn edit_loads_fresh_copy_then_patches_by_id() {
    let s = session_with(
        Recorder::default()
            .reply(200, two_tasks())
            .reply(200, json!({"task_id": 42, "title": "Ship MVP v2", "status": "in_progress"}))
            .reply(200, json!({"task_id": 42, "title": "Ship MVP v2", "status": "done"})),
        &[("TASKDECK_API_BASE_URL", "http://api.local"), ("api.trailing_slash", "true")],
    );
    block_on(s.refresh());
    block_on(s.open_edit(&TaskId::from(42)));

    assert_eq!(s.read(|c| c.form().map(|f| f.title.clone())).as_deref(), Some("Ship MVP v2"));
    s.update(|c| c.edit_form(FormEdit::Status(TaskStatus::Done)));
    block_on(s.submit()).expect("update");

    let sent = requests(&s);
    assert_eq!(sent[1].method, Method::Get);
    assert_eq!(sent[1].url, "http://api.local/v1/tasks/42/");
    assert_eq!(sent[2].method, Method::Patch);
    assert_eq!(sent[2].url, "http://api.local/v1/tasks/42/");
    let patch: Value = serde_json::from_str(sent[2].body.as_deref().expect("body")).expect("json");
    assert_eq!(patch["status"], "done");
    assert_eq!(patch["title"], "Ship MVP v2");
}

#[test]
fn local_mode_fetches_once_and_filters_in_memory() {
    let s = session_with(
        Recorder::default().reply(
            200,
            json!([
                {"_id": "a", "title": "Buy milk", "status": "todo"},
                {"_id": "b", "title": "Ship MVP", "status": "done"}
            ]),
        ),
        &[("TASKDECK_FILTER_MODE", "local")],
    );
    block_on(s.refresh());
    block_on(s.edit_query(QueryEdit::SetStatus(StatusFilter::Only(TaskStatus::Done))));

    let sent = requests(&s);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].url, "/v1/tasks");

    let view = s.read(|c| c.view());
    assert_eq!(view.total, 1);
    assert_eq!(view.rows[0].title, "Ship MVP");
    assert!(!view.controls.prev_enabled && !view.controls.next_enabled);
}

#[test]
fn edit_load_resolving_after_new_task_keeps_the_new_form() {
    let s = session(
        Recorder::default()
            .reply(200, two_tasks())
            .reply(200, json!({"id": 42, "title": "Ship MVP", "status": "done"})),
    );
    block_on(s.refresh());

    let user = s.clone();
    *s.client().transport().while_pending.borrow_mut() = Some(Box::new(move || {
        user.update(|c| c.open_create());
        user.update(|c| c.edit_form(FormEdit::Title("typed while loading".into())));
    }));
    block_on(s.open_edit(&TaskId::from(42)));

    let form = s.read(|c| c.form().cloned()).expect("form");
    assert!(!form.is_edit());
    assert_eq!(form.title, "typed while loading");
}

#[test]
fn deleting_the_last_row_of_the_last_page_steps_back_a_page() {
    let row = |id: u64| json!({"id": id, "title": format!("task {id}"), "status": "todo"});
    let s = session(
        Recorder::default()
            .reply(200, json!({"items": [row(1)], "total": 21, "page": 1, "pageSize": 10}))
            .reply(200, json!({"items": [row(21)], "total": 21, "page": 3, "pageSize": 10}))
            .reply_raw(204, "No Content", "")
            .reply(200, json!({"items": [], "total": 20, "page": 3, "pageSize": 10}))
            .reply(200, json!({"items": [row(11), row(20)], "total": 20, "page": 2, "pageSize": 10})),
    );
    block_on(s.refresh());
    block_on(s.edit_query(QueryEdit::SetPage(3)));
    block_on(s.delete(&TaskId::from(21), |_| true)).expect("delete");

    let urls: Vec<String> = requests(&s).into_iter().map(|r| r.url).collect();
    assert_eq!(urls[3], "/v1/tasks?page=3&pageSize=10");
    assert_eq!(urls[4], "/v1/tasks?page=2&pageSize=10");
    assert_eq!(urls.len(), 5);

    let view = s.read(|c| c.view());
    assert_eq!(s.read(|c| c.query().page), 2);
    assert_eq!(view.status, ViewStatus::Success);
    assert_eq!(view.controls.label(), "Page 2 of 2");
}
