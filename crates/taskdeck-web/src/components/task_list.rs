use std::collections::BTreeSet;

use taskdeck_core::controller::{
  ListView,
  ViewStatus
};
use taskdeck_shared::TaskId;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

use super::TaskRow;

#[derive(Properties, PartialEq)]
pub struct TaskListProps {
  pub view:      ListView,
  pub deleting:  BTreeSet<TaskId>,
  pub on_edit:   Callback<TaskId>,
  pub on_delete: Callback<TaskId>,
  pub on_retry:  Callback<()>
}

#[function_component(TaskList)]
pub fn task_list(
  props: &TaskListProps
) -> Html {
  let view = &props.view;

  match &view.status {
    | ViewStatus::Loading
      if view.rows.is_empty() =>
    {
      html! { <div class="panel placeholder">{ "Loading tasks…" }</div> }
    }
    | ViewStatus::Error(message) => {
      let on_retry =
        props.on_retry.clone();
      html! {
          <div class="panel placeholder error" role="alert">
              <div>{ format!("Could not load tasks: {message}") }</div>
              <button class="btn" onclick={move |_| on_retry.emit(())}>{ "Retry" }</button>
          </div>
      }
    }
    | ViewStatus::Empty => {
      html! { <div class="panel placeholder">{ "No tasks match these filters." }</div> }
    }
    | _ => {
      html! {
          <div class={if view.is_fetching { "panel list fetching" } else { "panel list" }}>
              <table class="task-table">
                  <thead>
                      <tr>
                          <th>{ "Title" }</th>
                          <th>{ "Status" }</th>
                          <th>{ "Tags" }</th>
                          <th>{ "Due" }</th>
                          <th>{ "Updated" }</th>
                          <th></th>
                      </tr>
                  </thead>
                  <tbody>
                      {
                          for view.rows.iter().cloned().map(|task| html! {
                              <TaskRow
                                  key={task.id.as_str().to_string()}
                                  deleting={props.deleting.contains(&task.id)}
                                  task={task.clone()}
                                  on_edit={props.on_edit.clone()}
                                  on_delete={props.on_delete.clone()}
                              />
                          })
                      }
                  </tbody>
              </table>
          </div>
      }
    }
  }
}
