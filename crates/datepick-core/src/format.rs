use std::fmt::{
  self,
  Write
};

use chrono::TimeZone;
use chrono::format::{
  Item,
  StrftimeItems
};
use serde::{
  Deserialize,
  Serialize
};

pub const DATE_TIME_FORMAT: &str =
  "%Y-%m-%d %H:%M:%S";
pub const TIME_FORMAT: &str =
  "%H:%M:%S";

/// A strftime pattern handed unchanged
/// from the picker to the calendar.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct Format(String);

impl Default for Format {
  fn default() -> Self {
    Self(DATE_TIME_FORMAT.to_string())
  }
}

impl Format {
  pub fn new(
    pattern: impl Into<String>
  ) -> Self {
    Self(pattern.into())
  }

  #[must_use]
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Whether chrono can render this
  /// pattern at all.
  #[must_use]
  pub fn is_renderable(&self) -> bool {
    !self.0.trim().is_empty()
      && StrftimeItems::new(&self.0)
        .all(|item| {
          !matches!(item, Item::Error)
        })
  }

  /// Renders `dt`, falling back to
  /// `DATE_TIME_FORMAT` when the
  /// pattern is broken.
  pub fn render<Tz>(
    &self,
    dt: &chrono::DateTime<Tz>
  ) -> String
  where
    Tz: TimeZone,
    Tz::Offset: fmt::Display
  {
    if self.is_renderable() {
      let mut out = String::new();
      if write!(
        out,
        "{}",
        dt.format(&self.0)
      )
      .is_ok()
      {
        return out;
      }
    }

    tracing::warn!(
      format = %self.0,
      "unrenderable date format; using default"
    );
    dt.format(DATE_TIME_FORMAT)
      .to_string()
  }
}

impl fmt::Display for Format {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for Format {
  fn from(raw: &str) -> Self {
    Self::new(raw)
  }
}

impl From<String> for Format {
  fn from(raw: String) -> Self {
    Self(raw)
  }
}
