use taskdeck_shared::{TaskCreate, TaskDto, TaskId, TaskPatch, TaskPriority, TaskStatus};
use tracing::{debug, info, warn};

use crate::cache::QueryCache;
use crate::config::{Config, FilterMode};
use crate::debounce::{DebounceTicket, Debouncer};
use crate::envelope::Envelope;
use crate::error::{Result, TaskError};
use crate::filter::filter_and_page;
use crate::pagination::{PageControls, total_pages};
use crate::query::{QueryEdit, TaskQuery};
use crate::task::{push_tag_unique, split_tags};

/// Cache key for the unfiltered collection in local mode.
const FULL_LIST_KEY: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewStatus {
    Loading,
    Success,
    Error(String),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Loading,
    Ready,
    Failed(String),
}

/// What the list area renders.
#[derive(Debug, Clone, PartialEq)]
pub struct ListView {
    pub status: ViewStatus,
    /// Rows to show. While loading these are the previous results.
    pub rows: Vec<TaskDto>,
    pub total: u64,
    pub controls: PageControls,
    pub is_fetching: bool,
}

/// A list request the caller must perform and report back through
/// [`TaskViewController::finish_fetch`].
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub generation: u64,
    pub key: String,
    /// `None` requests the whole collection.
    pub query: Option<TaskQuery>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(TaskId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskForm {
    pub mode: FormMode,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Option<TaskPriority>,
    pub tags: Vec<String>,
    pub tag_input: String,
    pub error: Option<String>,
    pub busy: bool,
    session: u64,
}

impl TaskForm {
    fn blank(session: u64) -> Self {
        Self {
            mode: FormMode::Create,
            title: String::new(),
            description: String::new(),
            status: TaskStatus::Todo,
            priority: None,
            tags: vec![],
            tag_input: String::new(),
            error: None,
            busy: false,
            session,
        }
    }

    fn seeded(task: &TaskDto, session: u64) -> Self {
        Self {
            mode: FormMode::Edit(task.id.clone()),
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            status: task.status,
            priority: task.priority,
            tags: task.tags.clone(),
            ..Self::blank(session)
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    pub fn heading(&self) -> &'static str {
        if self.is_edit() { "Edit Task" } else { "New Task" }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_edit() { "Save changes" } else { "Create task" }
    }

    pub fn can_submit(&self) -> bool {
        !self.title.trim().is_empty() && !self.busy
    }

    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(TaskError::Validation("Title is required".to_string()));
        }
        if self.busy {
            return Err(TaskError::Validation("A save is already in progress".to_string()));
        }
        Ok(())
    }

    fn to_mutation(&self) -> Mutation {
        let title = self.title.trim().to_string();
        match &self.mode {
            FormMode::Create => Mutation::Create(TaskCreate {
                title,
                description: self.description.clone(),
                status: self.status,
                tags: self.tags.clone(),
                priority: self.priority,
            }),
            FormMode::Edit(id) => Mutation::Update(
                id.clone(),
                TaskPatch {
                    title: Some(title),
                    description: Some(self.description.clone()),
                    status: Some(self.status),
                    tags: Some(self.tags.clone()),
                    priority: self.priority,
                },
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEdit {
    Title(String),
    Description(String),
    Status(TaskStatus),
    Priority(Option<TaskPriority>),
    TagInput(String),
    /// Commit the current tag input.
    AddTag,
    RemoveTag(String),
    DismissError,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Create(TaskCreate),
    Update(TaskId, TaskPatch),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MutationTicket {
    pub form_session: u64,
    pub mutation: Mutation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub id: u64,
    pub kind: BannerKind,
    pub title: String,
    pub message: String,
}

/// Owns the query, cache, fetch generations, form and banner state of the
/// task screen. It performs no I/O: fetches and mutations are handed out
/// as tickets and their outcomes fed back in.
#[derive(Debug)]
pub struct TaskViewController {
    mode: FilterMode,
    page_sizes: Vec<u32>,
    query: TaskQuery,
    query_revision: u64,
    search: Debouncer<String>,
    search_draft: String,
    cache: QueryCache,
    generation: u64,
    phase: Phase,
    displayed: Option<Envelope>,
    form: Option<TaskForm>,
    form_sessions: u64,
    deleting: Option<TaskId>,
    banner: Option<Banner>,
    banner_seq: u64,
}

impl TaskViewController {
    pub fn new(config: &Config) -> Self {
        Self {
            mode: config.list.filter_mode,
            page_sizes: config.list.page_sizes.clone(),
            query: TaskQuery::with_page_size(config.list.default_page_size),
            query_revision: 0,
            search: Debouncer::new(config.ui.search_debounce_ms),
            search_draft: String::new(),
            cache: QueryCache::new(),
            generation: 0,
            phase: Phase::Loading,
            displayed: None,
            form: None,
            form_sessions: 0,
            deleting: None,
            banner: None,
            banner_seq: 0,
        }
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn page_sizes(&self) -> &[u32] {
        &self.page_sizes
    }

    pub fn query(&self) -> &TaskQuery {
        &self.query
    }

    /// Number of query updates applied so far.
    pub fn query_revision(&self) -> u64 {
        self.query_revision
    }

    /// Text currently in the search box (may be ahead of the query).
    pub fn search_draft(&self) -> &str {
        &self.search_draft
    }

    pub fn search_quiet_ms(&self) -> u32 {
        self.search.quiet_ms()
    }

    // ---- query -------------------------------------------------------

    pub fn apply_edit(&mut self, edit: QueryEdit) -> bool {
        if let QueryEdit::Clear = edit {
            self.search.cancel();
            self.search_draft.clear();
        }
        let next = self.query.apply(edit, &self.page_sizes);
        self.query_revision += 1;
        let changed = next != self.query;
        debug!(changed, page = next.page, "query edited");
        self.query = next;
        changed
    }

    /// Record a keystroke in the search box. The returned ticket must be
    /// passed to [`settle_search`](Self::settle_search) once the quiet
    /// window has elapsed.
    pub fn search_input(&mut self, text: String) -> DebounceTicket {
        self.search_draft = text.clone();
        self.search.push(text)
    }

    /// Apply the debounced search value if `ticket` is still the latest.
    pub fn settle_search(&mut self, ticket: DebounceTicket) -> bool {
        match self.search.settle(ticket) {
            Some(value) => self.apply_edit(QueryEdit::SetSearch(value)),
            None => false,
        }
    }

    // ---- fetching ----------------------------------------------------

    fn fetch_key(&self) -> String {
        match self.mode {
            FilterMode::Server => self.query.cache_key(),
            FilterMode::Local => FULL_LIST_KEY.to_string(),
        }
    }

    /// Start a list fetch for the current query, or serve it from a fresh
    /// cache entry (returning `None`).
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        let key = self.fetch_key();
        if let Some(hit) = self.cache.fresh(&key) {
            debug!(key = %key, "list served from cache");
            self.displayed = Some(hit.clone());
            self.phase = Phase::Ready;
            // Any fetch still in flight is for a query we have left.
            self.generation += 1;
            return None;
        }

        self.generation += 1;
        self.phase = Phase::Loading;
        info!(generation = self.generation, key = %key, "fetching task list");
        Some(FetchTicket {
            generation: self.generation,
            key,
            query: match self.mode {
                FilterMode::Server => Some(self.query.clone()),
                FilterMode::Local => None,
            },
        })
    }

    /// Apply a fetch outcome. Returns `false` (and changes nothing) when a
    /// newer fetch has been issued since `ticket`.
    pub fn finish_fetch(&mut self, ticket: FetchTicket, result: Result<Envelope>) -> bool {
        if ticket.generation != self.generation {
            warn!(
                generation = ticket.generation,
                latest = self.generation,
                "discarding stale list response"
            );
            return false;
        }

        match result {
            Ok(envelope) => {
                debug!(items = envelope.items.len(), total = envelope.total, "list applied");
                self.cache.store(ticket.key, envelope.clone());
                self.displayed = Some(envelope);
                self.phase = Phase::Ready;
            }
            Err(err) => {
                warn!(error = %err, "list fetch failed");
                self.phase = Phase::Failed(err.banner_message());
            }
        }
        true
    }

    /// Mark cached lists stale so the next `begin_fetch` goes to the
    /// network.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    fn current_page(&self) -> Envelope {
        let Some(source) = self.displayed.as_ref() else {
            return Envelope {
                page_size: self.query.page_size,
                ..Envelope::empty()
            };
        };
        match self.mode {
            FilterMode::Server => source.clone(),
            FilterMode::Local => filter_and_page(&source.items, &self.query),
        }
    }

    pub fn view(&self) -> ListView {
        let page = self.current_page();
        let controls = PageControls::new(self.query.page, self.query.page_size, page.total);
        let (status, rows) = match &self.phase {
            Phase::Loading => (ViewStatus::Loading, page.items),
            Phase::Failed(message) => (ViewStatus::Error(message.clone()), vec![]),
            Phase::Ready if page.items.is_empty() => (ViewStatus::Empty, vec![]),
            Phase::Ready => (ViewStatus::Success, page.items),
        };
        ListView {
            status,
            rows,
            total: page.total,
            controls,
            is_fetching: self.phase == Phase::Loading,
        }
    }

    /// Pull the page back inside `1..=total_pages` once a loaded list
    /// shows it has run past the end (e.g. the last row of the last page
    /// was deleted). Returns `true` when the query changed and the list
    /// should be fetched again.
    pub fn clamp_page(&mut self) -> bool {
        if self.phase != Phase::Ready {
            return false;
        }
        let last = total_pages(self.current_page().total, self.query.page_size);
        if self.query.page <= last {
            return false;
        }
        debug!(from = self.query.page, to = last, "page past the end, clamping");
        self.query.page = last;
        self.query_revision += 1;
        true
    }

    pub fn find_row(&self, id: &TaskId) -> Option<TaskDto> {
        self.current_page().items.into_iter().find(|t| &t.id == id)
    }

    // ---- form --------------------------------------------------------

    pub fn form(&self) -> Option<&TaskForm> {
        self.form.as_ref()
    }

    fn next_form_session(&mut self) -> u64 {
        self.form_sessions += 1;
        self.form_sessions
    }

    pub fn open_create(&mut self) {
        let session = self.next_form_session();
        self.form = Some(TaskForm::blank(session));
    }

    pub fn open_edit(&mut self, task: &TaskDto) {
        let session = self.next_form_session();
        debug!(id = %task.id, "opening edit form");
        self.form = Some(TaskForm::seeded(task, session));
    }

    /// Reserve a form session for an edit form whose task is still being
    /// loaded. Pass it to [`finish_open_edit`](Self::finish_open_edit).
    pub fn begin_open_edit(&mut self) -> u64 {
        self.next_form_session()
    }

    /// Open the edit form reserved by `token`, unless another form was
    /// opened or closed while the task loaded.
    pub fn finish_open_edit(&mut self, token: u64, task: &TaskDto) -> bool {
        if token != self.form_sessions {
            debug!(id = %task.id, "edit form superseded while loading");
            return false;
        }
        debug!(id = %task.id, "opening edit form");
        self.form = Some(TaskForm::seeded(task, token));
        true
    }

    /// Close without saving. An in-flight save still completes, but its
    /// result no longer touches the form.
    pub fn close_form(&mut self) {
        self.next_form_session();
        self.form = None;
    }

    pub fn edit_form(&mut self, edit: FormEdit) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        match edit {
            FormEdit::Title(title) => form.title = title,
            FormEdit::Description(description) => form.description = description,
            FormEdit::Status(status) => form.status = status,
            FormEdit::Priority(priority) => form.priority = priority,
            FormEdit::TagInput(input) => form.tag_input = input,
            FormEdit::AddTag => {
                let input = std::mem::take(&mut form.tag_input);
                for tag in split_tags(&input) {
                    push_tag_unique(&mut form.tags, &tag);
                }
            }
            FormEdit::RemoveTag(tag) => form.tags.retain(|t| t != &tag),
            FormEdit::DismissError => form.error = None,
        }
    }

    /// Validate the open form and mark it busy. Validation failures never
    /// produce a ticket, so nothing reaches the network.
    pub fn begin_submit(&mut self) -> Result<MutationTicket> {
        let Some(form) = self.form.as_mut() else {
            return Err(TaskError::Validation("No task form is open".to_string()));
        };
        form.validate()?;
        form.busy = true;
        form.error = None;
        Ok(MutationTicket {
            form_session: form.session,
            mutation: form.to_mutation(),
        })
    }

    /// Apply a save outcome. Returns `true` when the list was invalidated
    /// and should be refetched.
    pub fn finish_submit(&mut self, form_session: u64, result: Result<TaskDto>) -> bool {
        let same_form = self
            .form
            .as_ref()
            .is_some_and(|form| form.session == form_session);

        match result {
            Ok(task) => {
                info!(id = %task.id, "save succeeded");
                if same_form {
                    self.form = None;
                }
                self.invalidate();
                true
            }
            Err(err) => {
                if let Some(form) = self.form.as_mut().filter(|_| same_form) {
                    form.busy = false;
                    form.error = Some(err.banner_message());
                } else {
                    debug!(error = %err, "save failed after its form closed");
                }
                false
            }
        }
    }

    // ---- delete ------------------------------------------------------

    pub fn delete_prompt(task: &TaskDto) -> String {
        format!("Delete task: \"{}\"?", task.title)
    }

    pub fn is_deleting(&self, id: &TaskId) -> bool {
        self.deleting.as_ref() == Some(id)
    }

    /// Returns the id to delete only when the user confirmed.
    pub fn begin_delete(&mut self, id: &TaskId, confirmed: bool) -> Option<TaskId> {
        if !confirmed {
            debug!(id = %id, "delete declined");
            return None;
        }
        self.deleting = Some(id.clone());
        Some(id.clone())
    }

    /// Returns `true` when the list was invalidated.
    pub fn finish_delete(&mut self, id: &TaskId, result: Result<()>) -> bool {
        if self.deleting.as_ref() == Some(id) {
            self.deleting = None;
        }
        match result {
            Ok(()) => {
                self.show_banner(BannerKind::Success, "Task deleted", "The task was removed.");
                self.invalidate();
                true
            }
            Err(err) => {
                let message = err.banner_message();
                self.show_banner(BannerKind::Error, "Could not delete task", &message);
                false
            }
        }
    }

    // ---- banners -----------------------------------------------------

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn show_banner(&mut self, kind: BannerKind, title: &str, message: &str) -> u64 {
        self.banner_seq += 1;
        self.banner = Some(Banner {
            id: self.banner_seq,
            kind,
            title: title.to_string(),
            message: message.to_string(),
        });
        self.banner_seq
    }

    /// Dismiss banner `id`; a newer banner is left alone.
    pub fn dismiss_banner(&mut self, id: u64) {
        if self.banner.as_ref().is_some_and(|b| b.id == id) {
            self.banner = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::StatusFilter;

    fn controller(mode: FilterMode) -> TaskViewController {
        let mut cfg = Config::defaults().unwrap();
        cfg.list.filter_mode = mode;
        TaskViewController::new(&cfg)
    }

    fn task(id: u64, title: &str, status: TaskStatus) -> TaskDto {
        TaskDto {
            id: TaskId::from(id),
            title: title.to_string(),
            description: None,
            status,
            tags: vec![],
            priority: None,
            due_date: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn envelope(items: Vec<TaskDto>) -> Envelope {
        Envelope {
            total: items.len() as u64,
            page: 1,
            page_size: 10,
            items,
        }
    }

    #[test]
    fn starts_loading_then_success_or_empty() {
        let mut c = controller(FilterMode::Server);
        assert_eq!(c.view().status, ViewStatus::Loading);

        let ticket = c.begin_fetch().unwrap();
        assert!(c.finish_fetch(ticket, Ok(envelope(vec![task(1, "a", TaskStatus::Todo)]))));
        assert_eq!(c.view().status, ViewStatus::Success);

        c.apply_edit(QueryEdit::SetSearch("zzz".into()));
        let ticket = c.begin_fetch().unwrap();
        assert_eq!(c.view().status, ViewStatus::Loading);
        assert_eq!(c.view().rows.len(), 1, "previous rows stay visible while loading");
        c.finish_fetch(ticket, Ok(envelope(vec![])));
        assert_eq!(c.view().status, ViewStatus::Empty);
    }

    #[test]
    fn fetch_error_replaces_rows_with_message() {
        let mut c = controller(FilterMode::Server);
        let t = c.begin_fetch().unwrap();
        c.finish_fetch(t, Ok(envelope(vec![task(1, "a", TaskStatus::Todo)])));

        c.invalidate();
        let t = c.begin_fetch().unwrap();
        c.finish_fetch(
            t,
            Err(TaskError::Request {
                status: 500,
                message: "boom".into(),
            }),
        );
        let view = c.view();
        assert_eq!(view.status, ViewStatus::Error("boom".into()));
        assert!(view.rows.is_empty());
    }

    #[test]
    fn older_response_resolving_late_is_discarded() {
        let mut c = controller(FilterMode::Server);
        let first = c.begin_fetch().unwrap();
        c.apply_edit(QueryEdit::SetStatus(StatusFilter::Only(TaskStatus::Done)));
        let second = c.begin_fetch().unwrap();

        assert!(c.finish_fetch(second, Ok(envelope(vec![task(2, "Ship MVP", TaskStatus::Done)]))));
        assert!(!c.finish_fetch(first, Ok(envelope(vec![task(1, "Buy milk", TaskStatus::Todo)]))));

        let rows = c.view().rows;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Ship MVP");
    }

    #[test]
    fn fresh_cache_hit_skips_the_network_until_invalidated() {
        let mut c = controller(FilterMode::Server);
        let t = c.begin_fetch().unwrap();
        c.finish_fetch(t, Ok(envelope(vec![task(1, "a", TaskStatus::Todo)])));

        c.apply_edit(QueryEdit::SetPage(2));
        let t = c.begin_fetch().unwrap();
        c.finish_fetch(t, Ok(envelope(vec![])));

        c.apply_edit(QueryEdit::SetPage(1));
        assert!(c.begin_fetch().is_none());
        assert_eq!(c.view().status, ViewStatus::Success);

        c.invalidate();
        assert!(c.begin_fetch().is_some());
    }

    #[test]
    fn cache_hit_retires_the_fetch_in_flight() {
        let mut c = controller(FilterMode::Server);
        let t = c.begin_fetch().unwrap();
        c.finish_fetch(t, Ok(envelope(vec![task(1, "page one row", TaskStatus::Todo)])));

        c.apply_edit(QueryEdit::SetPage(2));
        let in_flight = c.begin_fetch().unwrap();

        c.apply_edit(QueryEdit::SetPage(1));
        assert!(c.begin_fetch().is_none());

        assert!(!c.finish_fetch(in_flight, Ok(envelope(vec![task(2, "page two row", TaskStatus::Todo)]))));
        assert_eq!(c.query().page, 1);
        assert_eq!(c.view().rows[0].title, "page one row");
    }

    #[test]
    fn page_past_the_end_is_clamped_after_load() {
        let mut c = controller(FilterMode::Server);
        c.apply_edit(QueryEdit::SetPage(3));
        let t = c.begin_fetch().unwrap();
        assert!(!c.clamp_page(), "nothing to clamp while loading");

        c.finish_fetch(
            t,
            Ok(Envelope {
                items: vec![],
                total: 20,
                page: 3,
                page_size: 10,
            }),
        );
        assert!(c.clamp_page());
        assert_eq!(c.query().page, 2);
        assert!(!c.clamp_page());
        assert!(c.begin_fetch().is_some());
    }

    #[test]
    fn empty_collection_keeps_page_one() {
        let mut c = controller(FilterMode::Server);
        let t = c.begin_fetch().unwrap();
        c.finish_fetch(t, Ok(envelope(vec![])));
        assert!(!c.clamp_page());
        assert_eq!(c.query().page, 1);
    }

    #[test]
    fn late_edit_load_does_not_replace_a_newer_form() {
        let mut c = controller(FilterMode::Server);
        let loading = c.begin_open_edit();
        c.open_create();
        c.edit_form(FormEdit::Title("typed".into()));

        assert!(!c.finish_open_edit(loading, &task(7, "A", TaskStatus::Todo)));
        let form = c.form().unwrap();
        assert!(!form.is_edit());
        assert_eq!(form.title, "typed");

        let loading = c.begin_open_edit();
        c.close_form();
        assert!(!c.finish_open_edit(loading, &task(7, "A", TaskStatus::Todo)));
        assert!(c.form().is_none());

        let loading = c.begin_open_edit();
        assert!(c.finish_open_edit(loading, &task(7, "A", TaskStatus::Todo)));
        assert_eq!(c.form().unwrap().title, "A");
    }

    #[test]
    fn local_mode_refilters_without_refetching() {
        let mut c = controller(FilterMode::Local);
        let t = c.begin_fetch().unwrap();
        assert_eq!(t.query, None);
        c.finish_fetch(
            t,
            Ok(envelope(vec![task(1, "Buy milk", TaskStatus::Todo), task(2, "Ship MVP", TaskStatus::Done)])),
        );

        c.apply_edit(QueryEdit::SetStatus(StatusFilter::Only(TaskStatus::Done)));
        assert!(c.begin_fetch().is_none());
        let view = c.view();
        assert_eq!(view.total, 1);
        assert_eq!(view.rows[0].title, "Ship MVP");

        c.apply_edit(QueryEdit::SetSearch("nothing".into()));
        assert!(c.begin_fetch().is_none());
        assert_eq!(c.view().status, ViewStatus::Empty);
    }

    #[test]
    fn debounced_search_updates_query_once() {
        let mut c = controller(FilterMode::Server);
        let before = c.query_revision();
        let tickets: Vec<_> = ["a", "ab", "abc"].iter().map(|s| c.search_input(s.to_string())).collect();
        assert_eq!(c.search_draft(), "abc");

        let applied = tickets.into_iter().filter(|t| c.settle_search(*t)).count();
        assert_eq!(applied, 1);
        assert_eq!(c.query_revision(), before + 1);
        assert_eq!(c.query().search, "abc");
    }

    #[test]
    fn empty_title_never_yields_a_ticket() {
        let mut c = controller(FilterMode::Server);
        c.open_create();
        c.edit_form(FormEdit::Title("   ".into()));
        assert!(!c.form().unwrap().can_submit());
        assert!(matches!(c.begin_submit(), Err(TaskError::Validation(_))));
        assert!(!c.form().unwrap().busy);
    }

    #[test]
    fn busy_form_cannot_submit_twice() {
        let mut c = controller(FilterMode::Server);
        c.open_create();
        c.edit_form(FormEdit::Title("Test".into()));
        let ticket = c.begin_submit().unwrap();
        assert!(matches!(ticket.mutation, Mutation::Create(ref p) if p.title == "Test"));
        assert!(!c.form().unwrap().can_submit());
        assert!(c.begin_submit().is_err());
    }

    #[test]
    fn failed_save_keeps_form_and_input() {
        let mut c = controller(FilterMode::Server);
        c.open_create();
        c.edit_form(FormEdit::Title("Test".into()));
        c.edit_form(FormEdit::Description("details".into()));
        let ticket = c.begin_submit().unwrap();

        let refetch = c.finish_submit(
            ticket.form_session,
            Err(TaskError::Request {
                status: 400,
                message: "title required".into(),
            }),
        );
        assert!(!refetch);
        let form = c.form().unwrap();
        assert_eq!(form.error.as_deref(), Some("title required"));
        assert_eq!(form.description, "details");
        assert!(form.can_submit());
    }

    #[test]
    fn late_result_after_close_does_not_touch_a_new_form() {
        let mut c = controller(FilterMode::Server);
        c.open_create();
        c.edit_form(FormEdit::Title("first".into()));
        let ticket = c.begin_submit().unwrap();
        c.close_form();
        c.open_create();

        c.finish_submit(
            ticket.form_session,
            Err(TaskError::Network("offline".into())),
        );
        assert_eq!(c.form().unwrap().error, None);

        assert!(c.finish_submit(ticket.form_session, Ok(task(9, "first", TaskStatus::Todo))));
        assert!(c.form().is_some(), "newer form stays open");
    }

    #[test]
    fn edit_form_seeds_from_task_and_builds_patch() {
        let mut c = controller(FilterMode::Server);
        let mut existing = task(42, "Ship MVP", TaskStatus::InProgress);
        existing.tags = vec!["release".into()];
        c.open_edit(&existing);

        let form = c.form().unwrap();
        assert_eq!(form.heading(), "Edit Task");
        assert_eq!(form.title, "Ship MVP");

        c.edit_form(FormEdit::TagInput(" urgent, release ".into()));
        c.edit_form(FormEdit::AddTag);
        c.edit_form(FormEdit::Status(TaskStatus::Done));
        let ticket = c.begin_submit().unwrap();
        match ticket.mutation {
            Mutation::Update(id, patch) => {
                assert_eq!(id, TaskId::from(42));
                assert_eq!(patch.status, Some(TaskStatus::Done));
                assert_eq!(patch.tags, Some(vec!["release".into(), "urgent".into()]));
            }
            other => panic!("unexpected mutation {other:?}"),
        }
    }

    #[test]
    fn delete_outcomes_set_banners() {
        let mut c = controller(FilterMode::Server);
        let id = TaskId::from(42);
        assert_eq!(c.begin_delete(&id, false), None);

        assert_eq!(c.begin_delete(&id, true), Some(id.clone()));
        assert!(c.is_deleting(&id));
        assert!(!c.finish_delete(&id, Err(TaskError::Network("down".into()))));
        assert_eq!(c.banner().unwrap().kind, BannerKind::Error);

        c.begin_delete(&id, true);
        assert!(c.finish_delete(&id, Ok(())));
        let banner = c.banner().unwrap().clone();
        assert_eq!(banner.kind, BannerKind::Success);

        c.dismiss_banner(banner.id - 1);
        assert!(c.banner().is_some(), "stale dismiss ignored");
        c.dismiss_banner(banner.id);
        assert!(c.banner().is_none());
    }
}
