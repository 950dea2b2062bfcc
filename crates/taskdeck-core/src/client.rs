use std::fmt;

use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use serde_json::Value;
use taskdeck_shared::{TaskCreate, TaskDto, TaskId, TaskPatch};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::envelope::{Envelope, normalize_envelope};
use crate::error::{Result, TaskError};
use crate::query::TaskQuery;
use crate::task::decode_task;

const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b',');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    /// JSON body, sent with `Content-Type: application/json`.
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One HTTP round trip. `Err` means the request never got an answer
/// (connection refused, DNS, CORS, aborted); any status code is `Ok`.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> std::result::Result<HttpResponse, String>;
}

/// CRUD against the task collection endpoint.
pub struct TaskClient<T> {
    transport: T,
    config: Config,
}

impl<T: Transport> TaskClient<T> {
    pub fn new(transport: T, config: Config) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// List tasks. With `Some(query)` the query is sent as parameters;
    /// with `None` the whole collection is requested. An undecodable
    /// success body yields an empty envelope instead of an error.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, query: Option<&TaskQuery>) -> Result<Envelope> {
        let mut url = self.config.collection_url();
        if let Some(query) = query {
            url.push_str(&encode_query(&query.to_params()));
        }
        let requested_size = query
            .map(|q| q.page_size)
            .unwrap_or(self.config.list.default_page_size);

        let response = self.round_trip(Method::Get, url, None).await?;
        match serde_json::from_str::<Value>(&response.body) {
            Ok(value) => Ok(normalize_envelope(&value, requested_size)),
            Err(err) => {
                warn!(error = %err, "list response was not JSON, using empty envelope");
                Ok(Envelope::empty())
            }
        }
    }

    #[tracing::instrument(skip(self, id), fields(id = %id))]
    pub async fn get(&self, id: &TaskId) -> Result<TaskDto> {
        let response = self
            .round_trip(Method::Get, self.config.item_url(id), None)
            .await?;
        decode_task(&response.body, Some(id))
    }

    #[tracing::instrument(skip(self, payload), fields(title = %payload.title))]
    pub async fn create(&self, payload: &TaskCreate) -> Result<TaskDto> {
        let body = to_json(payload)?;
        let response = self
            .round_trip(Method::Post, self.config.collection_url(), Some(body))
            .await?;
        let task = decode_task(&response.body, None)?;
        info!(id = %task.id, "task created");
        Ok(task)
    }

    #[tracing::instrument(skip(self, id, patch), fields(id = %id))]
    pub async fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<TaskDto> {
        let body = to_json(patch)?;
        let response = self
            .round_trip(Method::Patch, self.config.item_url(id), Some(body))
            .await?;
        let task = decode_task(&response.body, Some(id))?;
        info!(id = %task.id, "task updated");
        Ok(task)
    }

    #[tracing::instrument(skip(self, id), fields(id = %id))]
    pub async fn remove(&self, id: &TaskId) -> Result<()> {
        self.round_trip(Method::Delete, self.config.item_url(id), None)
            .await?;
        info!("task deleted");
        Ok(())
    }

    async fn round_trip(
        &self,
        method: Method,
        url: String,
        body: Option<String>,
    ) -> Result<HttpResponse> {
        debug!(%method, %url, "sending request");
        let response = self
            .transport
            .send(HttpRequest { method, url, body })
            .await
            .map_err(|err| {
                warn!(%method, error = %err, "transport failure");
                TaskError::Network(err)
            })?;

        if !response.is_success() {
            let err =
                TaskError::from_response(response.status, &response.status_text, &response.body);
            warn!(%method, status = response.status, error = %err, "request rejected");
            return Err(err);
        }
        debug!(%method, status = response.status, "request succeeded");
        Ok(response)
    }
}

fn to_json<S: Serialize>(payload: &S) -> Result<String> {
    serde_json::to_string(payload).map_err(|err| TaskError::Parse(err.to_string()))
}

fn encode_query(params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let pairs: Vec<String> = params
        .iter()
        .map(|(key, value)| format!("{key}={}", utf8_percent_encode(value, QUERY_VALUE)))
        .collect();
    format!("?{}", pairs.join("&"))
}
