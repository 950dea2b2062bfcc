use taskdeck_core::pagination::PageControls;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct PaginationBarProps {
  pub controls: PageControls,
  pub on_page:  Callback<u32>
}

#[function_component(PaginationBar)]
pub fn pagination_bar(
  props: &PaginationBarProps
) -> Html {
  let controls = &props.controls;

  let on_prev = {
    let on_page = props.on_page.clone();
    let target =
      controls.page.saturating_sub(1);
    move |_| on_page.emit(target)
  };
  let on_next = {
    let on_page = props.on_page.clone();
    let target =
      controls.page.saturating_add(1);
    move |_| on_page.emit(target)
  };

  html! {
      <nav class="pagination" aria-label="Pagination">
          <button class="btn" disabled={!controls.prev_enabled} onclick={on_prev}>
              { "Previous" }
          </button>
          {
              for controls.pages.iter().copied().map(|page| {
                  let on_page = props.on_page.clone();
                  let current = page == controls.page;
                  html! {
                      <button
                          class={if current { "btn page current" } else { "btn page" }}
                          aria-current={if current { "page" } else { "false" }}
                          onclick={move |_| on_page.emit(page)}
                      >
                          { page.to_string() }
                      </button>
                  }
              })
          }
          <button class="btn" disabled={!controls.next_enabled} onclick={on_next}>
              { "Next" }
          </button>
          <span class="muted">{ controls.label() }</span>
      </nav>
  }
}
