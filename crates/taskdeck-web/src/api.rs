use async_trait::async_trait;
use gloo::net::http::{
  Request,
  RequestBuilder
};
use taskdeck_core::client::{
  HttpRequest,
  HttpResponse,
  Method,
  Transport
};
use taskdeck_core::config::Config;
use taskdeck_core::session::TaskSession;

pub type Session =
  TaskSession<FetchTransport>;

/// `fetch()`-backed transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl Transport for FetchTransport {
  async fn send(
    &self,
    request: HttpRequest
  ) -> Result<HttpResponse, String> {
    let builder = match request.method {
      | Method::Get => {
        Request::get(&request.url)
      }
      | Method::Post => {
        Request::post(&request.url)
      }
      | Method::Patch => {
        Request::patch(&request.url)
      }
      | Method::Delete => {
        Request::delete(&request.url)
      }
    }
    .header("Accept", "application/json");

    let response = match request.body {
      | Some(body) => {
        json_body(builder, body)?
          .send()
          .await
      }
      | None => builder.send().await
    }
    .map_err(|e| format!("{e}"))?;

    let status = response.status();
    let status_text =
      response.status_text();
    let body = response
      .text()
      .await
      .unwrap_or_default();

    Ok(HttpResponse {
      status,
      status_text,
      body
    })
  }
}

fn json_body(
  builder: RequestBuilder,
  body: String
) -> Result<Request, String> {
  builder
    .header(
      "Content-Type",
      "application/json"
    )
    .body(body)
    .map_err(|e| {
      format!(
        "failed to encode body: {e}"
      )
    })
}

/// Configuration baked in at build time:
/// `TASKDECK_API_BASE_URL=… trunk build`.
pub fn load_config()
-> Result<Config, String> {
  let overrides = [
    (
      "TASKDECK_API_BASE_URL",
      option_env!("TASKDECK_API_BASE_URL")
    ),
    (
      "TASKDECK_COLLECTION_PATH",
      option_env!(
        "TASKDECK_COLLECTION_PATH"
      )
    ),
    (
      "TASKDECK_TRAILING_SLASH",
      option_env!(
        "TASKDECK_TRAILING_SLASH"
      )
    ),
    (
      "TASKDECK_FILTER_MODE",
      option_env!("TASKDECK_FILTER_MODE")
    ),
    (
      "TASKDECK_PAGE_SIZE",
      option_env!("TASKDECK_PAGE_SIZE")
    ),
    (
      "TASKDECK_SEARCH_DEBOUNCE_MS",
      option_env!(
        "TASKDECK_SEARCH_DEBOUNCE_MS"
      )
    ),
    (
      "TASKDECK_BANNER_MS",
      option_env!("TASKDECK_BANNER_MS")
    )
  ];

  Config::from_overrides(
    overrides.into_iter().filter_map(
      |(key, value)| {
        value.map(|v| {
          (key.to_string(), v.to_string())
        })
      }
    )
  )
  .map_err(|e| format!("{e:#}"))
}
