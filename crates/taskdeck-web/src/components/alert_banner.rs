use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct AlertBannerProps {
  pub error:    bool,
  pub title:    String,
  #[prop_or_default]
  pub message:  String,
  #[prop_or_default]
  pub on_close: Option<Callback<()>>
}

#[function_component(AlertBanner)]
pub fn alert_banner(
  props: &AlertBannerProps
) -> Html {
  let (class, role) = if props.error {
    ("alert error", "alert")
  } else {
    ("alert success", "status")
  };

  html! {
      <div class={class} role={role}>
          <div class="alert-body">
              <div class="alert-title">{ &props.title }</div>
              {
                  if props.message.is_empty() {
                      html! {}
                  } else {
                      html! { <div class="alert-message">{ &props.message }</div> }
                  }
              }
          </div>
          {
              if let Some(on_close) = props.on_close.clone() {
                  html! {
                      <button
                          class="icon-btn"
                          aria-label="Close alert"
                          onclick={move |_| on_close.emit(())}
                      >
                          { "×" }
                      </button>
                  }
              } else {
                  html! {}
              }
          }
      </div>
  }
}
