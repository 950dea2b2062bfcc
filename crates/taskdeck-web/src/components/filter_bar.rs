use taskdeck_core::query::StatusFilter;
use taskdeck_core::task::split_tags;
use taskdeck_shared::TaskStatus;
use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  function_component,
  html,
  use_state
};

#[derive(Properties, PartialEq)]
pub struct FilterBarProps {
  pub status:        StatusFilter,
  pub search:        String,
  pub tags:          Vec<String>,
  pub page_size:     u32,
  pub page_sizes:    Vec<u32>,
  pub total:         u64,
  pub is_fetching:   bool,
  pub on_status:
    Callback<StatusFilter>,
  pub on_search:     Callback<String>,
  pub on_add_tag:    Callback<String>,
  pub on_remove_tag: Callback<String>,
  pub on_page_size:  Callback<u32>,
  pub on_clear:      Callback<()>
}

#[function_component(FilterBar)]
pub fn filter_bar(
  props: &FilterBarProps
) -> Html {
  let tag_draft =
    use_state(String::new);

  let on_status_change = {
    let on_status =
      props.on_status.clone();
    Callback::from(
      move |e: web_sys::Event| {
        let select: web_sys::HtmlSelectElement =
          e.target_unchecked_into();
        on_status.emit(
          StatusFilter::parse(
            &select.value()
          )
        );
      }
    )
  };

  let on_search_input = {
    let on_search =
      props.on_search.clone();
    Callback::from(
      move |e: web_sys::InputEvent| {
        let input: web_sys::HtmlInputElement =
          e.target_unchecked_into();
        on_search.emit(input.value());
      }
    )
  };

  let on_tag_input = {
    let tag_draft = tag_draft.clone();
    Callback::from(
      move |e: web_sys::InputEvent| {
        let input: web_sys::HtmlInputElement =
          e.target_unchecked_into();
        tag_draft.set(input.value());
      }
    )
  };

  let commit_tags = {
    let tag_draft = tag_draft.clone();
    let on_add_tag =
      props.on_add_tag.clone();
    Callback::from(move |_: ()| {
      for tag in split_tags(&tag_draft)
      {
        on_add_tag.emit(tag);
      }
      tag_draft.set(String::new());
    })
  };

  let on_tag_keydown = {
    let commit_tags =
      commit_tags.clone();
    Callback::from(
      move |e: web_sys::KeyboardEvent| {
        if e.key() == "Enter" {
          e.prevent_default();
          commit_tags.emit(());
        }
      }
    )
  };

  let on_page_size_change = {
    let on_page_size =
      props.on_page_size.clone();
    Callback::from(
      move |e: web_sys::Event| {
        let select: web_sys::HtmlSelectElement =
          e.target_unchecked_into();
        if let Ok(size) =
          select.value().parse::<u32>()
        {
          on_page_size.emit(size);
        }
      }
    )
  };

  let on_clear = {
    let on_clear =
      props.on_clear.clone();
    let tag_draft = tag_draft.clone();
    Callback::from(move |_| {
      tag_draft.set(String::new());
      on_clear.emit(());
    })
  };

  let selected_status =
    props.status.as_str();
  let summary = if props.is_fetching {
    "Updating…".to_string()
  } else {
    format!("{} total", props.total)
  };

  html! {
      <div class="filter-bar">
          <label class="field">
              <span>{ "Status" }</span>
              <select onchange={on_status_change}>
                  <option value="all" selected={selected_status == "all"}>{ "All" }</option>
                  {
                      for TaskStatus::ALL.iter().map(|status| html! {
                          <option
                              value={status.as_str()}
                              selected={selected_status == status.as_str()}
                          >
                              { status.label() }
                          </option>
                      })
                  }
              </select>
          </label>

          <label class="field grow">
              <span>{ "Search" }</span>
              <input
                  type="search"
                  placeholder="Search title or description"
                  value={props.search.clone()}
                  oninput={on_search_input}
              />
          </label>

          <div class="field">
              <span>{ "Tags" }</span>
              <div class="tag-editor">
                  {
                      for props.tags.iter().cloned().map(|tag| {
                          let on_remove_tag = props.on_remove_tag.clone();
                          let value = tag.clone();
                          html! {
                              <span class="chip">
                                  { tag }
                                  <button
                                      class="chip-remove"
                                      aria-label="Remove tag"
                                      onclick={move |_| on_remove_tag.emit(value.clone())}
                                  >
                                      { "×" }
                                  </button>
                              </span>
                          }
                      })
                  }
                  <input
                      type="text"
                      placeholder="Add tag"
                      value={(*tag_draft).clone()}
                      oninput={on_tag_input}
                      onkeydown={on_tag_keydown}
                  />
                  <button class="btn" onclick={move |_| commit_tags.emit(())}>{ "Add" }</button>
              </div>
          </div>

          <label class="field">
              <span>{ "Per page" }</span>
              <select onchange={on_page_size_change}>
                  {
                      for props.page_sizes.iter().map(|size| html! {
                          <option
                              value={size.to_string()}
                              selected={*size == props.page_size}
                          >
                              { size.to_string() }
                          </option>
                      })
                  }
              </select>
          </label>

          <div class="filter-summary">
              <span class="muted">{ summary }</span>
              <button class="btn ghost" onclick={on_clear}>{ "Clear filters" }</button>
          </div>
      </div>
  }
}
