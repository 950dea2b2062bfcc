use serde_json::Value;
use thiserror::Error;

pub const FALLBACK_MESSAGE: &str =
  "Something went wrong";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
  /// The server could not be reached.
  #[error("network error: {0}")]
  Network(String),

  /// The server answered with a non-2xx
  /// status.
  #[error("request failed ({status}): {message}")]
  Request { status: u16, message: String },

  /// A success body did not have the
  /// expected shape.
  #[error("could not decode response: {0}")]
  Parse(String),

  /// Rejected before any request was sent.
  #[error("invalid input: {0}")]
  Validation(String)
}

pub type Result<T> =
  std::result::Result<T, TaskError>;

impl TaskError {
  /// Text shown in the banner body.
  pub fn banner_message(&self) -> String {
    match self {
      | TaskError::Network(detail) => {
        format!(
          "Could not reach the server \
           ({detail})"
        )
      }
      | TaskError::Request {
        message,
        ..
      } => message.clone(),
      | TaskError::Parse(_) => {
        "The server sent an unexpected \
         response"
          .to_string()
      }
      | TaskError::Validation(message) => {
        message.clone()
      }
    }
  }

  /// Build a `Request` error from a
  /// non-2xx response.
  pub fn from_response(
    status: u16,
    status_text: &str,
    body: &str
  ) -> Self {
    TaskError::Request {
      status,
      message: extract_message(
        status_text,
        body
      )
    }
  }
}

/// Pick the most specific message a failed
/// response offers: a JSON `message`, then a
/// JSON `detail`, then the status text.
pub fn extract_message(
  status_text: &str,
  body: &str
) -> String {
  let parsed =
    serde_json::from_str::<Value>(body)
      .ok();

  if let Some(message) = parsed
    .as_ref()
    .and_then(|v| v.get("message"))
    .and_then(render_message)
  {
    return message;
  }

  if let Some(detail) = parsed
    .as_ref()
    .and_then(|v| v.get("detail"))
    .and_then(render_detail)
  {
    return detail;
  }

  let status_text = status_text.trim();
  if !status_text.is_empty() {
    return status_text.to_string();
  }

  FALLBACK_MESSAGE.to_string()
}

fn render_message(
  value: &Value
) -> Option<String> {
  match value {
    | Value::Null => None,
    | Value::String(s) => {
      let s = s.trim();
      (!s.is_empty())
        .then(|| s.to_string())
    }
    | other => Some(other.to_string())
  }
}

// FastAPI validation errors arrive as a
// list of `{ loc, msg, type }` objects.
fn render_detail(
  value: &Value
) -> Option<String> {
  match value {
    | Value::Array(items) => {
      let msgs: Vec<String> = items
        .iter()
        .filter_map(|item| {
          item
            .get("msg")
            .and_then(Value::as_str)
            .map(str::to_string)
        })
        .collect();
      if msgs.is_empty() {
        render_message(value)
      } else {
        Some(msgs.join("; "))
      }
    }
    | other => render_message(other)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn message_field_wins() {
    assert_eq!(
      extract_message(
        "Bad Request",
        r#"{"message":"title required","detail":"x"}"#
      ),
      "title required"
    );
  }

  #[test]
  fn fastapi_detail_list_is_joined() {
    let body = r#"{"detail":[{"loc":["body","title"],"msg":"field required"},{"msg":"too short"}]}"#;
    assert_eq!(
      extract_message(
        "Unprocessable Entity",
        body
      ),
      "field required; too short"
    );
  }

  #[test]
  fn non_string_message_is_rendered_as_json()
  {
    assert_eq!(
      extract_message(
        "",
        r#"{"message":{"title":"missing"}}"#
      ),
      r#"{"title":"missing"}"#
    );
  }

  #[test]
  fn falls_back_to_status_text_then_generic()
  {
    assert_eq!(
      extract_message(
        "Not Found",
        "<html>nope</html>"
      ),
      "Not Found"
    );
    assert_eq!(
      extract_message("", ""),
      FALLBACK_MESSAGE
    );
  }

  #[test]
  fn banner_message_per_variant() {
    let err = TaskError::from_response(
      400,
      "Bad Request",
      r#"{"message":"title required"}"#
    );
    assert_eq!(
      err.banner_message(),
      "title required"
    );
    assert!(
      TaskError::Network(
        "connection refused".into()
      )
      .banner_message()
      .contains("connection refused")
    );
  }
}
