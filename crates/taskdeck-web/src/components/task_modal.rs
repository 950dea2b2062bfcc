use taskdeck_core::controller::{
  FormEdit,
  TaskForm
};
use taskdeck_shared::{
  TaskPriority,
  TaskStatus
};
use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  function_component,
  html
};

use super::AlertBanner;

const PRIORITIES: [TaskPriority; 3] = [
  TaskPriority::Low,
  TaskPriority::Med,
  TaskPriority::High
];

#[derive(Properties, PartialEq)]
pub struct TaskModalProps {
  pub form:      TaskForm,
  pub on_edit:   Callback<FormEdit>,
  pub on_submit: Callback<()>,
  pub on_close:  Callback<()>
}

#[function_component(TaskModal)]
pub fn task_modal(
  props: &TaskModalProps
) -> Html {
  let form = &props.form;
  let busy = form.busy;

  let on_title = {
    let on_edit = props.on_edit.clone();
    Callback::from(
      move |e: web_sys::InputEvent| {
        let input: web_sys::HtmlInputElement =
          e.target_unchecked_into();
        on_edit.emit(FormEdit::Title(
          input.value()
        ));
      }
    )
  };
  let on_description = {
    let on_edit = props.on_edit.clone();
    Callback::from(
      move |e: web_sys::InputEvent| {
        let input: web_sys::HtmlTextAreaElement =
          e.target_unchecked_into();
        on_edit.emit(
          FormEdit::Description(
            input.value()
          )
        );
      }
    )
  };
  let on_status = {
    let on_edit = props.on_edit.clone();
    Callback::from(
      move |e: web_sys::Event| {
        let select: web_sys::HtmlSelectElement =
          e.target_unchecked_into();
        if let Some(status) =
          TaskStatus::parse(
            &select.value()
          )
        {
          on_edit.emit(
            FormEdit::Status(status)
          );
        }
      }
    )
  };
  let on_priority = {
    let on_edit = props.on_edit.clone();
    Callback::from(
      move |e: web_sys::Event| {
        let select: web_sys::HtmlSelectElement =
          e.target_unchecked_into();
        on_edit.emit(
          FormEdit::Priority(
            TaskPriority::parse(
              &select.value()
            )
          )
        );
      }
    )
  };
  let on_tag_input = {
    let on_edit = props.on_edit.clone();
    Callback::from(
      move |e: web_sys::InputEvent| {
        let input: web_sys::HtmlInputElement =
          e.target_unchecked_into();
        on_edit.emit(
          FormEdit::TagInput(
            input.value()
          )
        );
      }
    )
  };
  let on_tag_keydown = {
    let on_edit = props.on_edit.clone();
    Callback::from(
      move |e: web_sys::KeyboardEvent| {
        if e.key() == "Enter" {
          e.prevent_default();
          on_edit.emit(FormEdit::AddTag);
        }
      }
    )
  };
  let on_add_tag = {
    let on_edit = props.on_edit.clone();
    move |_| on_edit.emit(FormEdit::AddTag)
  };

  let on_form_submit = {
    let on_submit =
      props.on_submit.clone();
    Callback::from(
      move |e: web_sys::SubmitEvent| {
        e.prevent_default();
        on_submit.emit(());
      }
    )
  };
  let on_keydown = {
    let on_close =
      props.on_close.clone();
    Callback::from(
      move |e: web_sys::KeyboardEvent| {
        if e.key() == "Escape" {
          on_close.emit(());
        }
      }
    )
  };
  let on_backdrop = {
    let on_close =
      props.on_close.clone();
    move |_| on_close.emit(())
  };
  let on_cancel = {
    let on_close =
      props.on_close.clone();
    move |_| on_close.emit(())
  };
  let on_dismiss_error = {
    let on_edit = props.on_edit.clone();
    Callback::from(move |_: ()| {
      on_edit.emit(FormEdit::DismissError)
    })
  };

  let selected_priority = form
    .priority
    .map(TaskPriority::as_str)
    .unwrap_or("");

  html! {
      <div class="modal-backdrop" onclick={on_backdrop} onkeydown={on_keydown}>
          <div
              class="modal"
              role="dialog"
              aria-modal="true"
              onclick={Callback::from(|e: yew::MouseEvent| e.stop_propagation())}
          >
              <div class="modal-header">{ form.heading() }</div>
              {
                  match form.error.clone() {
                      Some(message) => html! {
                          <AlertBanner
                              error={true}
                              title="Could not save task"
                              message={message}
                              on_close={on_dismiss_error}
                          />
                      },
                      None => html! {}
                  }
              }
              <form class="modal-body" onsubmit={on_form_submit}>
                  <label class="field">
                      <span>{ "Title" }</span>
                      <input
                          type="text"
                          required=true
                          disabled={busy}
                          value={form.title.clone()}
                          oninput={on_title}
                      />
                  </label>
                  <label class="field">
                      <span>{ "Description" }</span>
                      <textarea
                          rows="4"
                          disabled={busy}
                          value={form.description.clone()}
                          oninput={on_description}
                      />
                  </label>
                  <div class="field-row">
                      <label class="field">
                          <span>{ "Status" }</span>
                          <select disabled={busy} onchange={on_status}>
                              {
                                  for TaskStatus::ALL.iter().map(|status| html! {
                                      <option
                                          value={status.as_str()}
                                          selected={*status == form.status}
                                      >
                                          { status.label() }
                                      </option>
                                  })
                              }
                          </select>
                      </label>
                      <label class="field">
                          <span>{ "Priority" }</span>
                          <select disabled={busy} onchange={on_priority}>
                              <option value="" selected={selected_priority.is_empty()}>{ "None" }</option>
                              {
                                  for PRIORITIES.iter().map(|priority| html! {
                                      <option
                                          value={priority.as_str()}
                                          selected={selected_priority == priority.as_str()}
                                      >
                                          { priority.as_str() }
                                      </option>
                                  })
                              }
                          </select>
                      </label>
                  </div>
                  <div class="field">
                      <span>{ "Tags" }</span>
                      <div class="tag-editor">
                          {
                              for form.tags.iter().cloned().map(|tag| {
                                  let on_edit = props.on_edit.clone();
                                  let value = tag.clone();
                                  html! {
                                      <span class="chip">
                                          { tag }
                                          <button
                                              type="button"
                                              class="chip-remove"
                                              aria-label="Remove tag"
                                              disabled={busy}
                                              onclick={move |_| on_edit.emit(FormEdit::RemoveTag(value.clone()))}
                                          >
                                              { "×" }
                                          </button>
                                      </span>
                                  }
                              })
                          }
                          <input
                              type="text"
                              placeholder="work, home"
                              disabled={busy}
                              value={form.tag_input.clone()}
                              oninput={on_tag_input}
                              onkeydown={on_tag_keydown}
                          />
                          <button type="button" class="btn" disabled={busy} onclick={on_add_tag}>
                              { "Add" }
                          </button>
                      </div>
                  </div>
                  <div class="modal-actions">
                      <button type="button" class="btn ghost" disabled={busy} onclick={on_cancel}>
                          { "Cancel" }
                      </button>
                      <button type="submit" class="btn primary" disabled={!form.can_submit()}>
                          { if busy { "Saving…" } else { form.submit_label() } }
                      </button>
                  </div>
              </form>
          </div>
      </div>
  }
}
