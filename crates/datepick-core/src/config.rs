use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::Context;
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{
  debug,
  info,
  warn
};

use crate::format::{
  DATE_TIME_FORMAT,
  Format
};
use crate::placement::Placement;
use crate::viewport::DEFAULT_MOBILE_BREAKPOINT;

pub const CONFIG_FILE: &str =
  "datepick.toml";
pub const CONFIG_ENV_VAR: &str =
  "DATEPICK_CONFIG";
pub const TIMEZONE_ENV_VAR: &str =
  "DATEPICK_TIMEZONE";

fn default_format() -> Format {
  Format::new(DATE_TIME_FORMAT)
}

fn default_week_start() -> String {
  "monday".to_string()
}

fn default_mobile_breakpoint() -> u32 {
  DEFAULT_MOBILE_BREAKPOINT
}

#[derive(
  Debug, Clone, PartialEq, Deserialize,
)]
pub struct PickerConfig {
  #[serde(default)]
  pub version:           u32,
  pub timezone:          Option<String>,
  #[serde(default = "default_format")]
  pub format:            Format,
  #[serde(default)]
  pub placement:         Placement,
  #[serde(
    default = "default_week_start"
  )]
  pub week_start:        String,
  #[serde(
    default = "default_mobile_breakpoint"
  )]
  pub mobile_breakpoint: u32
}

impl Default for PickerConfig {
  fn default() -> Self {
    Self {
      version:           1,
      timezone:          None,
      format:            default_format(),
      placement:         Placement::default(),
      week_start:        default_week_start(),
      mobile_breakpoint:
        default_mobile_breakpoint()
    }
  }
}

impl PickerConfig {
  pub fn from_toml(
    raw: &str
  ) -> anyhow::Result<Self> {
    let mut config =
      toml::from_str::<Self>(raw)
        .context(
          "failed parsing picker config"
        )?;
    config.sanitize();
    Ok(config)
  }

  /// Parses embedded config; broken
  /// input yields the defaults.
  #[must_use]
  pub fn from_toml_or_default(
    raw: &str
  ) -> Self {
    match Self::from_toml(raw) {
      | Ok(config) => {
        info!(
          version = config.version,
          timezone = ?config.timezone,
          format = %config.format,
          "loaded picker config"
        );
        config
      }
      | Err(error) => {
        tracing::error!(%error, "failed parsing picker config; using defaults");
        Self::default()
      }
    }
  }

  pub fn load_file(
    path: &Path
  ) -> anyhow::Result<Self> {
    let raw = fs::read_to_string(path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;
    let config = Self::from_toml(&raw)
      .with_context(|| {
        format!(
          "invalid config file {}",
          path.display()
        )
      })?;
    info!(file = %path.display(), "loaded picker config file");
    Ok(config)
  }

  /// `--config`, then the env var, then
  /// `./datepick.toml`; defaults when
  /// none exists.
  pub fn load(
    override_path: Option<&Path>
  ) -> anyhow::Result<Self> {
    if let Some(path) = override_path {
      return Self::load_file(path);
    }

    match config_path() {
      | Some(path) if path.exists() => {
        Self::load_file(&path)
      }
      | Some(path) => {
        debug!(
          file = %path.display(),
          "picker config file not found; using defaults"
        );
        Ok(Self::default())
      }
      | None => Ok(Self::default())
    }
  }

  pub fn sanitize(&mut self) {
    if !self.format.is_renderable() {
      warn!(
        format = %self.format,
        "unrenderable format in config; using default"
      );
      self.format = default_format();
    }

    if self.week_start.trim().is_empty()
    {
      self.week_start =
        default_week_start();
    }

    if self.mobile_breakpoint == 0 {
      self.mobile_breakpoint =
        default_mobile_breakpoint();
    }

    if self
      .timezone
      .as_deref()
      .is_some_and(|tz| tz.trim().is_empty())
    {
      self.timezone = None;
    }
  }

  /// First valid of: `explicit`, the env
  /// var, the config value, UTC.
  #[must_use]
  pub fn resolve_timezone(
    &self,
    explicit: Option<&str>
  ) -> Tz {
    let env = std::env::var(
      TIMEZONE_ENV_VAR
    )
    .ok();

    [
      (explicit, "cli"),
      (env.as_deref(), TIMEZONE_ENV_VAR),
      (self.timezone.as_deref(), "config")
    ]
    .into_iter()
    .find_map(|(raw, source)| {
      parse_timezone(raw?, source)
    })
    .unwrap_or(chrono_tz::UTC)
  }
}

fn config_path() -> Option<PathBuf> {
  if let Ok(raw) =
    std::env::var(CONFIG_ENV_VAR)
  {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
      return Some(PathBuf::from(
        trimmed
      ));
    }
  }

  std::env::current_dir()
    .ok()
    .map(|dir| dir.join(CONFIG_FILE))
}

/// Parses an IANA id; bad ids are logged
/// and skipped.
#[must_use]
pub fn parse_timezone(
  raw: &str,
  source: &str
) -> Option<Tz> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }

  match trimmed.parse::<Tz>() {
    | Ok(tz) => {
      debug!(
        source,
        timezone = %trimmed,
        "resolved picker timezone"
      );
      Some(tz)
    }
    | Err(err) => {
      tracing::error!(
        source,
        timezone = %trimmed,
        error = %err,
        "failed to parse timezone id"
      );
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::tempdir;

  use super::{
    PickerConfig,
    parse_timezone
  };
  use crate::format::DATE_TIME_FORMAT;
  use crate::placement::Placement;

  #[test]
  fn parses_full_config() {
    let config = PickerConfig::from_toml(
      r#"
version = 1
timezone = "Europe/Berlin"
format = "%d.%m.%Y %H:%M"
placement = "top-left"
week_start = "sunday"
mobile_breakpoint = 640
"#
    )
    .expect("parse config");

    assert_eq!(
      config.timezone.as_deref(),
      Some("Europe/Berlin")
    );
    assert_eq!(
      config.format.as_str(),
      "%d.%m.%Y %H:%M"
    );
    assert_eq!(
      config.placement,
      Placement::TopLeft
    );
    assert_eq!(config.mobile_breakpoint, 640);
    assert_eq!(
      config.resolve_timezone(Some(
        "Asia/Tokyo"
      )),
      chrono_tz::Asia::Tokyo
    );
  }

  #[test]
  fn sanitizes_broken_values() {
    let config = PickerConfig::from_toml(
      r#"
timezone = "  "
format = "%Q"
week_start = ""
mobile_breakpoint = 0
"#
    )
    .expect("parse config");

    assert_eq!(config.timezone, None);
    assert_eq!(
      config.format.as_str(),
      DATE_TIME_FORMAT
    );
    assert_eq!(config.week_start, "monday");
    assert_eq!(config.mobile_breakpoint, 500);
  }

  #[test]
  fn broken_toml_falls_back_to_defaults()
  {
    assert_eq!(
      PickerConfig::from_toml_or_default(
        "placement = [",
      ),
      PickerConfig::default()
    );
  }

  #[test]
  fn loads_config_from_file() {
    let temp = tempdir().expect("tempdir");
    let path =
      temp.path().join("datepick.toml");
    fs::write(
      &path,
      "placement = \"bottom-left\"\n"
    )
    .expect("write config");

    let config =
      PickerConfig::load(Some(path.as_path()))
        .expect("load config");
    assert_eq!(
      config.placement,
      Placement::BottomLeft
    );

    let missing = temp
      .path()
      .join("missing.toml");
    assert!(
      PickerConfig::load(Some(missing.as_path()))
        .is_err()
    );
  }

  #[test]
  fn invalid_timezone_ids_are_skipped() {
    assert!(
      parse_timezone("Mars/Olympus", "test")
        .is_none()
    );
    assert_eq!(
      parse_timezone(" UTC ", "test"),
      Some(chrono_tz::UTC)
    );
  }
}
