use std::collections::BTreeSet;

use gloo::timers::future::TimeoutFuture;
use taskdeck_core::controller::{
  BannerKind,
  FormEdit
};
use taskdeck_core::query::{
  QueryEdit,
  StatusFilter
};
use taskdeck_shared::TaskId;
use wasm_bindgen_futures::spawn_local;
use yew::{
  Callback,
  Html,
  function_component,
  html,
  use_effect_with,
  use_force_update,
  use_memo
};

use crate::api::{
  FetchTransport,
  Session,
  load_config
};
use crate::components::{
  AlertBanner,
  FilterBar,
  PaginationBar,
  TaskList,
  TaskModal
};

fn session_callback<IN: 'static>(
  session: &Option<Session>,
  f: impl Fn(&Session, IN) + 'static
) -> Callback<IN> {
  let session = session.clone();
  Callback::from(move |input| {
    if let Some(session) = &session {
      f(session, input);
    }
  })
}

fn spawn_query_edit(
  session: &Session,
  edit: QueryEdit
) {
  let session = session.clone();
  spawn_local(async move {
    session.edit_query(edit).await;
  });
}

fn confirm(prompt: &str) -> bool {
  web_sys::window()
    .and_then(|window| {
      window
        .confirm_with_message(prompt)
        .ok()
    })
    .unwrap_or(false)
}

#[function_component(App)]
pub fn app() -> Html {
  let trigger = use_force_update();
  let connected = use_memo((), {
    move |_| {
      load_config().map(|cfg| {
        taskdeck_core::connect(
          FetchTransport,
          cfg
        )
        .with_listener(move || {
          trigger.force_update()
        })
      })
    }
  });
  let session: Option<Session> =
    (*connected).as_ref().ok().cloned();

  {
    let session = session.clone();
    use_effect_with((), move |_| {
      if let Some(session) = session {
        spawn_local(async move {
          session.refresh().await;
        });
      }
    });
  }

  let banner_id = session
    .as_ref()
    .and_then(|s| {
      s.read(|c| {
        c.banner().map(|b| b.id)
      })
    });
  {
    let session = session.clone();
    use_effect_with(
      banner_id,
      move |banner_id| {
        if let (Some(session), Some(id)) =
          (session, *banner_id)
        {
          let delay = session
            .client()
            .config()
            .ui
            .banner_ms;
          spawn_local(async move {
            TimeoutFuture::new(delay)
              .await;
            session.dismiss_banner(id);
          });
        }
      }
    );
  }

  let on_status = session_callback(
    &session,
    |s, status: StatusFilter| {
      spawn_query_edit(
        s,
        QueryEdit::SetStatus(status)
      )
    }
  );
  let on_search = session_callback(
    &session,
    |s, text: String| {
      let ticket = s.search_input(text);
      let quiet_ms =
        s.read(|c| c.search_quiet_ms());
      let session = s.clone();
      spawn_local(async move {
        TimeoutFuture::new(quiet_ms).await;
        session
          .settle_search(ticket)
          .await;
      });
    }
  );
  let on_add_tag = session_callback(
    &session,
    |s, tag: String| {
      spawn_query_edit(
        s,
        QueryEdit::AddTag(tag)
      )
    }
  );
  let on_remove_tag = session_callback(
    &session,
    |s, tag: String| {
      spawn_query_edit(
        s,
        QueryEdit::RemoveTag(tag)
      )
    }
  );
  let on_page_size = session_callback(
    &session,
    |s, size: u32| {
      spawn_query_edit(
        s,
        QueryEdit::SetPageSize(size)
      )
    }
  );
  let on_page = session_callback(
    &session,
    |s, page: u32| {
      spawn_query_edit(
        s,
        QueryEdit::SetPage(page)
      )
    }
  );
  let on_clear = session_callback(
    &session,
    |s, (): ()| {
      spawn_query_edit(
        s,
        QueryEdit::Clear
      )
    }
  );
  let on_retry = session_callback(
    &session,
    |s, (): ()| {
      let session = s.clone();
      spawn_local(async move {
        session.refresh().await;
      });
    }
  );

  let on_new = session_callback(
    &session,
    |s, _: yew::MouseEvent| {
      s.update(|c| c.open_create());
    }
  );
  let on_edit = session_callback(
    &session,
    |s, id: TaskId| {
      let session = s.clone();
      spawn_local(async move {
        session.open_edit(&id).await;
      });
    }
  );
  let on_delete = session_callback(
    &session,
    |s, id: TaskId| {
      let session = s.clone();
      spawn_local(async move {
        if let Err(err) = session
          .delete(&id, confirm)
          .await
        {
          tracing::warn!(
            %id,
            error = %err,
            "delete failed"
          );
        }
      });
    }
  );
  let on_form_edit = session_callback(
    &session,
    |s, edit: FormEdit| {
      s.update(|c| c.edit_form(edit));
    }
  );
  let on_submit = session_callback(
    &session,
    |s, (): ()| {
      let session = s.clone();
      spawn_local(async move {
        if let Err(err) =
          session.submit().await
        {
          tracing::debug!(
            error = %err,
            "save did not complete"
          );
        }
      });
    }
  );
  let on_close = session_callback(
    &session,
    |s, (): ()| {
      s.update(|c| c.close_form());
    }
  );
  let on_banner_close = session_callback(
    &session,
    |s, id: u64| s.dismiss_banner(id)
  );

  let Some(session) = session else {
    let message = match &*connected {
      | Err(message) => message.clone(),
      | Ok(_) => String::new()
    };
    return html! {
        <main class="shell">
            <AlertBanner
                error={true}
                title="Configuration error"
                message={message}
            />
        </main>
    };
  };

  let (
    view,
    query,
    search_draft,
    page_sizes,
    form,
    banner
  ) = session.read(|c| {
    (
      c.view(),
      c.query().clone(),
      c.search_draft().to_string(),
      c.page_sizes().to_vec(),
      c.form().cloned(),
      c.banner().cloned()
    )
  });
  let deleting: BTreeSet<TaskId> =
    session.read(|c| {
      view
        .rows
        .iter()
        .filter(|task| {
          c.is_deleting(&task.id)
        })
        .map(|task| task.id.clone())
        .collect()
    });
  let controls = view.controls.clone();

  html! {
      <main class="shell">
          <header class="topbar">
              <h1>{ "Tasks" }</h1>
              <button class="btn primary" onclick={on_new}>{ "New task" }</button>
          </header>

          {
              match banner {
                  Some(banner) => {
                      let id = banner.id;
                      let on_banner_close = on_banner_close.clone();
                      html! {
                          <AlertBanner
                              error={banner.kind == BannerKind::Error}
                              title={banner.title}
                              message={banner.message}
                              on_close={Callback::from(move |_: ()| on_banner_close.emit(id))}
                          />
                      }
                  }
                  None => html! {}
              }
          }

          <FilterBar
              status={query.status}
              search={search_draft}
              tags={query.tags.iter().cloned().collect::<Vec<_>>()}
              page_size={query.page_size}
              page_sizes={page_sizes}
              total={view.total}
              is_fetching={view.is_fetching}
              on_status={on_status}
              on_search={on_search}
              on_add_tag={on_add_tag}
              on_remove_tag={on_remove_tag}
              on_page_size={on_page_size}
              on_clear={on_clear}
          />

          <TaskList
              view={view}
              deleting={deleting}
              on_edit={on_edit}
              on_delete={on_delete}
              on_retry={on_retry}
          />

          <PaginationBar controls={controls} on_page={on_page} />

          {
              match form {
                  Some(form) => html! {
                      <TaskModal
                          form={form}
                          on_edit={on_form_edit}
                          on_submit={on_submit}
                          on_close={on_close}
                      />
                  },
                  None => html! {}
              }
          }
      </main>
  }
}
