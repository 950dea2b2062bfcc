use std::cell::RefCell;
use std::rc::Rc;

use taskdeck_shared::TaskId;
use tracing::{debug, warn};

use crate::client::{TaskClient, Transport};
use crate::controller::{Mutation, TaskViewController};
use crate::debounce::DebounceTicket;
use crate::error::Result;
use crate::query::QueryEdit;

/// Couples a [`TaskViewController`] with a [`TaskClient`] on a single
/// threaded event loop.
///
/// The controller is never borrowed across an `.await`, so overlapping
/// operations (a refetch racing a save, say) interleave safely; the
/// controller's generation counter decides which list response wins.
pub struct TaskSession<T> {
    client: Rc<TaskClient<T>>,
    controller: Rc<RefCell<TaskViewController>>,
    on_change: Rc<dyn Fn()>,
}

impl<T> Clone for TaskSession<T> {
    fn clone(&self) -> Self {
        Self {
            client: Rc::clone(&self.client),
            controller: Rc::clone(&self.controller),
            on_change: Rc::clone(&self.on_change),
        }
    }
}

impl<T: Transport> TaskSession<T> {
    pub fn new(client: TaskClient<T>) -> Self {
        let controller = TaskViewController::new(client.config());
        Self {
            client: Rc::new(client),
            controller: Rc::new(RefCell::new(controller)),
            on_change: Rc::new(|| {}),
        }
    }

    /// Called after every state change, e.g. to schedule a re-render.
    pub fn with_listener(mut self, listener: impl Fn() + 'static) -> Self {
        self.on_change = Rc::new(listener);
        self
    }

    pub fn client(&self) -> &TaskClient<T> {
        &self.client
    }

    pub fn read<R>(&self, f: impl FnOnce(&TaskViewController) -> R) -> R {
        f(&*self.controller.borrow())
    }

    /// Mutate the controller synchronously and notify the listener.
    pub fn update<R>(&self, f: impl FnOnce(&mut TaskViewController) -> R) -> R {
        let out = {
            let mut controller = self.controller.borrow_mut();
            f(&mut *controller)
        };
        (self.on_change)();
        out
    }

    /// Fetch the list for the current query unless a fresh cached copy
    /// exists. A page that turns out to be past the end is clamped and
    /// fetched again.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self) {
        loop {
            if let Some(ticket) = self.update(TaskViewController::begin_fetch) {
                let result = self.client.list(ticket.query.as_ref()).await;
                if !self.update(|c| c.finish_fetch(ticket, result)) {
                    return;
                }
            }
            if !self.update(TaskViewController::clamp_page) {
                return;
            }
        }
    }

    pub async fn edit_query(&self, edit: QueryEdit) {
        self.update(|c| c.apply_edit(edit));
        self.refresh().await;
    }

    pub fn search_input(&self, text: String) -> DebounceTicket {
        self.update(|c| c.search_input(text))
    }

    /// Timer callback for a search keystroke.
    pub async fn settle_search(&self, ticket: DebounceTicket) {
        if self.update(|c| c.settle_search(ticket)) {
            self.refresh().await;
        }
    }

    /// Open the edit form for `id`, preferring a freshly fetched copy and
    /// falling back to the row on screen.
    #[tracing::instrument(skip(self, id), fields(id = %id))]
    pub async fn open_edit(&self, id: &TaskId) {
        let token = self.update(TaskViewController::begin_open_edit);
        let row = self.read(|c| c.find_row(id));
        let task = match self.client.get(id).await {
            Ok(task) => Some(task),
            Err(err) => {
                warn!(error = %err, "could not load task, using list row");
                row
            }
        };
        match task {
            Some(task) => {
                self.update(|c| c.finish_open_edit(token, &task));
            }
            None => warn!("task is neither loadable nor on screen"),
        }
    }

    /// Save the open form. Validation errors are returned without any
    /// request being sent; server errors land in the form's banner.
    #[tracing::instrument(skip(self))]
    pub async fn submit(&self) -> Result<()> {
        let ticket = self.update(TaskViewController::begin_submit)?;
        let result = match &ticket.mutation {
            Mutation::Create(payload) => self.client.create(payload).await,
            Mutation::Update(id, patch) => self.client.update(id, patch).await,
        };
        let outcome = result.as_ref().map(|_| ()).map_err(Clone::clone);
        if self.update(|c| c.finish_submit(ticket.form_session, result)) {
            self.refresh().await;
        }
        outcome
    }

    /// Delete `id` after asking `confirm` with a yes/no prompt.
    #[tracing::instrument(skip(self, id, confirm), fields(id = %id))]
    pub async fn delete(&self, id: &TaskId, confirm: impl FnOnce(&str) -> bool) -> Result<()> {
        let prompt = self
            .read(|c| c.find_row(id))
            .map(|task| TaskViewController::delete_prompt(&task))
            .unwrap_or_else(|| format!("Delete task {id}?"));

        let confirmed = confirm(&prompt);
        let Some(id) = self.update(|c| c.begin_delete(id, confirmed)) else {
            debug!("delete cancelled by user");
            return Ok(());
        };

        let result = self.client.remove(&id).await;
        let outcome = result.clone();
        if self.update(|c| c.finish_delete(&id, result)) {
            self.refresh().await;
        }
        outcome
    }

    /// Dismiss banner `id` (used by both the close button and the
    /// auto-dismiss timer).
    pub fn dismiss_banner(&self, id: u64) {
        self.update(|c| c.dismiss_banner(id));
    }
}
