use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{
  Deserialize,
  Serialize
};

/// Where the popover opens relative to
/// its trigger.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
  BottomLeft,
  #[default]
  BottomRight,
  TopLeft,
  TopRight
}

impl Placement {
  #[must_use]
  pub fn as_key(self) -> &'static str {
    match self {
      | Self::BottomLeft => "bottom-left",
      | Self::BottomRight => "bottom-right",
      | Self::TopLeft => "top-left",
      | Self::TopRight => "top-right"
    }
  }
}

impl FromStr for Placement {
  type Err = anyhow::Error;

  fn from_str(
    raw: &str
  ) -> Result<Self, Self::Err> {
    match raw.trim() {
      | "bottom-left" => Ok(Self::BottomLeft),
      | "bottom-right" => {
        Ok(Self::BottomRight)
      }
      | "top-left" => Ok(Self::TopLeft),
      | "top-right" => Ok(Self::TopRight),
      | other => {
        Err(anyhow!(
          "unknown placement: {other}"
        ))
      }
    }
  }
}

impl fmt::Display for Placement {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_key())
  }
}

#[cfg(test)]
mod tests {
  use super::Placement;

  #[test]
  fn parses_kebab_case_names() {
    assert_eq!(
      " top-left ".parse::<Placement>().ok(),
      Some(Placement::TopLeft)
    );
    assert_eq!(
      Placement::default().to_string(),
      "bottom-right"
    );
    assert!(
      "middle".parse::<Placement>().is_err()
    );
  }
}
