use anyhow::{
  Context,
  anyhow,
  bail
};
use percent_encoding::{
  AsciiSet,
  CONTROLS,
  utf8_percent_encode
};
use serde::{
  Deserialize,
  Serialize
};
use taskdeck_shared::TaskId;
use tracing::{
  debug,
  info
};

const DEFAULTS_TOML: &str =
  include_str!("../assets/taskdeck.toml");

/// Environment variable names and the
/// config keys they override.
pub const ENV_OVERRIDES: &[(
  &str,
  &str
)] = &[
  (
    "TASKDECK_API_BASE_URL",
    "api.base_url"
  ),
  (
    "TASKDECK_COLLECTION_PATH",
    "api.collection_path"
  ),
  (
    "TASKDECK_TRAILING_SLASH",
    "api.trailing_slash"
  ),
  (
    "TASKDECK_FILTER_MODE",
    "list.filter_mode"
  ),
  (
    "TASKDECK_PAGE_SIZE",
    "list.default_page_size"
  ),
  (
    "TASKDECK_SEARCH_DEBOUNCE_MS",
    "ui.search_debounce_ms"
  ),
  ("TASKDECK_BANNER_MS", "ui.banner_ms")
];

const PATH_SEGMENT: &AsciiSet = &CONTROLS
  .add(b' ')
  .add(b'"')
  .add(b'#')
  .add(b'%')
  .add(b'/')
  .add(b'<')
  .add(b'>')
  .add(b'?')
  .add(b'`')
  .add(b'{')
  .add(b'}');

/// Where list filtering and pagination
/// happen.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
  /// Query parameters go to the backend,
  /// which returns one page.
  Server,
  /// The full collection is fetched once
  /// and filtered/sliced in memory.
  Local
}

impl FilterMode {
  fn parse(
    raw: &str
  ) -> anyhow::Result<Self> {
    match raw
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "server" => Ok(FilterMode::Server),
      | "local" | "client" => {
        Ok(FilterMode::Local)
      }
      | other => bail!(
        "unknown filter mode '{other}' \
         (expected server or local)"
      )
    }
  }
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
pub struct ApiConfig {
  #[serde(default)]
  pub base_url:        String,
  pub collection_path: String,
  #[serde(default)]
  pub trailing_slash:  bool
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
pub struct ListConfig {
  pub filter_mode:       FilterMode,
  pub page_sizes:        Vec<u32>,
  pub default_page_size: u32
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
pub struct UiConfig {
  pub search_debounce_ms: u32,
  pub banner_ms:          u32
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
pub struct Config {
  pub api:  ApiConfig,
  pub list: ListConfig,
  pub ui:   UiConfig
}

impl Config {
  /// The built-in defaults with no
  /// overrides applied.
  pub fn defaults() -> anyhow::Result<Self>
  {
    let cfg: Config =
      toml::from_str(DEFAULTS_TOML)
        .context(
          "failed to parse built-in \
           taskdeck.toml"
        )?;
    cfg.validate()?;
    Ok(cfg)
  }

  /// Defaults layered with `TASKDECK_*`
  /// variables from the process
  /// environment.
  #[tracing::instrument]
  pub fn load() -> anyhow::Result<Self> {
    Self::from_lookup(|var| {
      std::env::var(var).ok()
    })
  }

  /// Like [`Config::load`], reading the
  /// `TASKDECK_*` variables through
  /// `lookup`.
  pub fn from_lookup(
    lookup: impl Fn(&str) -> Option<String>
  ) -> anyhow::Result<Self> {
    let overrides = ENV_OVERRIDES
      .iter()
      .filter_map(|(var, _)| {
        lookup(var).map(|value| {
          (var.to_string(), value)
        })
      });
    Self::from_overrides(overrides)
  }

  /// Defaults layered with explicit
  /// pairs. Keys may be dotted config
  /// keys or `TASKDECK_*` names.
  pub fn from_overrides<I>(
    overrides: I
  ) -> anyhow::Result<Self>
  where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    let mut cfg = Self::defaults()?;
    for (key, value) in overrides {
      cfg.apply_override(&key, &value)?;
    }
    cfg.validate()?;
    info!(
      base_url = %cfg.api.base_url,
      mode = ?cfg.list.filter_mode,
      "configuration loaded"
    );
    Ok(cfg)
  }

  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    let key = ENV_OVERRIDES
      .iter()
      .find(|(var, _)| *var == key)
      .map(|(_, dotted)| *dotted)
      .unwrap_or(key);
    debug!(key, value, "applying override");

    match key {
      | "api.base_url" => {
        self.api.base_url =
          value.trim().to_string();
      }
      | "api.collection_path" => {
        self.api.collection_path =
          value.trim().to_string();
      }
      | "api.trailing_slash" => {
        self.api.trailing_slash =
          parse_bool(value).ok_or_else(
            || {
              anyhow!(
                "invalid boolean for \
                 {key}: {value}"
              )
            }
          )?;
      }
      | "list.filter_mode" => {
        self.list.filter_mode =
          FilterMode::parse(value)
            .with_context(|| {
              format!(
                "invalid value for {key}"
              )
            })?;
      }
      | "list.default_page_size" => {
        self.list.default_page_size =
          parse_number(key, value)?;
      }
      | "ui.search_debounce_ms" => {
        self.ui.search_debounce_ms =
          parse_number(key, value)?;
      }
      | "ui.banner_ms" => {
        self.ui.banner_ms =
          parse_number(key, value)?;
      }
      | other => {
        bail!(
          "unknown configuration key \
           '{other}'"
        )
      }
    }

    Ok(())
  }

  fn validate(&self) -> anyhow::Result<()> {
    if self.list.page_sizes.is_empty()
      || self
        .list
        .page_sizes
        .contains(&0)
    {
      bail!(
        "list.page_sizes must be \
         non-empty and positive"
      );
    }
    if !self
      .list
      .page_sizes
      .contains(
        &self.list.default_page_size
      )
    {
      bail!(
        "list.default_page_size {} is \
         not one of {:?}",
        self.list.default_page_size,
        self.list.page_sizes
      );
    }
    Ok(())
  }

  /// URL of the task collection, e.g.
  /// `https://host/v1/tasks`.
  pub fn collection_url(&self) -> String {
    let mut url = self.collection_root();
    if self.api.trailing_slash {
      url.push('/');
    }
    url
  }

  pub fn item_url(
    &self,
    id: &TaskId
  ) -> String {
    let mut url = format!(
      "{}/{}",
      self.collection_root(),
      utf8_percent_encode(
        id.as_str(),
        PATH_SEGMENT
      )
    );
    if self.api.trailing_slash {
      url.push('/');
    }
    url
  }

  fn collection_root(&self) -> String {
    let base = self
      .api
      .base_url
      .trim_end_matches('/');
    let path = self
      .api
      .collection_path
      .trim_matches('/');
    if path.is_empty() {
      return base.to_string();
    }
    format!("{base}/{path}")
  }
}

fn parse_number(
  key: &str,
  value: &str
) -> anyhow::Result<u32> {
  value.trim().parse::<u32>().with_context(
    || {
      format!(
        "invalid number for {key}: \
         {value}"
      )
    }
  )
}

fn parse_bool(raw: &str) -> Option<bool> {
  match raw
    .trim()
    .to_ascii_lowercase()
    .as_str()
  {
    | "1" | "true" | "yes" | "on" => {
      Some(true)
    }
    | "0" | "false" | "no" | "off" => {
      Some(false)
    }
    | _ => None
  }
}
