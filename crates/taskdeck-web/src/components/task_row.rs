use taskdeck_core::task::{
  due_label,
  row_timestamp
};
use taskdeck_shared::{
  TaskDto,
  TaskId,
  TaskStatus
};
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct TaskRowProps {
  pub task:      TaskDto,
  pub deleting:  bool,
  pub on_edit:   Callback<TaskId>,
  pub on_delete: Callback<TaskId>
}

#[function_component(TaskRow)]
pub fn task_row(
  props: &TaskRowProps
) -> Html {
  let task = &props.task;

  let badge_class = match task.status {
    | TaskStatus::Todo => "badge todo",
    | TaskStatus::InProgress => {
      "badge in-progress"
    }
    | TaskStatus::Done => "badge done"
  };

  let on_edit = {
    let on_edit = props.on_edit.clone();
    let id = task.id.clone();
    move |_| on_edit.emit(id.clone())
  };
  let on_delete = {
    let on_delete =
      props.on_delete.clone();
    let id = task.id.clone();
    move |_| on_delete.emit(id.clone())
  };

  let description = task
    .description
    .as_deref()
    .map(str::trim)
    .filter(|text| !text.is_empty())
    .map(str::to_string);
  let stamp = row_timestamp(task)
    .unwrap_or_else(|| "—".to_string());
  let due = due_label(task)
    .unwrap_or_else(|| "—".to_string());
  let priority = task.priority.map(|p| {
    (
      format!("badge priority-{}", p.as_str()),
      p.as_str()
    )
  });

  html! {
      <tr class="task-row">
          <td>
              <div class="task-title">{ &task.title }</div>
              {
                  match description {
                      Some(text) => html! { <div class="task-subtitle">{ text }</div> },
                      None => html! {}
                  }
              }
          </td>
          <td>
              <span class={badge_class}>{ task.status.label() }</span>
              {
                  match priority {
                      Some((class, label)) => html! { <span class={class}>{ label }</span> },
                      None => html! {}
                  }
              }
          </td>
          <td>
              <div class="tag-list">
                  {
                      for task.tags.iter().map(|tag| html! {
                          <span class="chip">{ tag }</span>
                      })
                  }
              </div>
          </td>
          <td class="muted">{ due }</td>
          <td class="muted">{ stamp }</td>
          <td class="row-actions">
              <button class="btn" onclick={on_edit}>{ "Edit" }</button>
              <button
                  class="btn danger"
                  disabled={props.deleting}
                  onclick={on_delete}
              >
                  { if props.deleting { "Deleting…" } else { "Delete" } }
              </button>
          </td>
      </tr>
  }
}
