pub mod cache;
pub mod client;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod envelope;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod query;
pub mod session;
pub mod task;

use tracing::info;

use crate::client::{
  TaskClient,
  Transport
};
use crate::config::Config;
use crate::session::TaskSession;

/// Build a session for `config` over
/// `transport`.
pub fn connect<T: Transport>(
  transport: T,
  config: Config
) -> TaskSession<T> {
  info!(
    collection = %config.collection_url(),
    mode = ?config.list.filter_mode,
    "starting task session"
  );
  TaskSession::new(TaskClient::new(
    transport, config
  ))
}
