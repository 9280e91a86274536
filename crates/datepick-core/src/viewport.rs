use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

pub const DEFAULT_MOBILE_BREAKPOINT: u32 =
  500;

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
  Mobile,
  #[default]
  Desktop
}

impl DeviceClass {
  #[must_use]
  pub fn detect(
    width: u32,
    user_agent: Option<&str>,
    breakpoint: u32
  ) -> Self {
    if width < breakpoint
      || user_agent
        .is_some_and(is_mobile_user_agent)
    {
      Self::Mobile
    } else {
      Self::Desktop
    }
  }

  #[must_use]
  pub fn is_mobile(self) -> bool {
    self == Self::Mobile
  }
}

fn mobile_user_agent_regex()
-> Option<&'static Regex> {
  static MOBILE_RE: OnceLock<
    Option<Regex>
  > = OnceLock::new();
  MOBILE_RE
    .get_or_init(|| {
      Regex::new(
        r"Mobi|Android|iPhone|iPad|iPod"
      )
      .map_err(|err| {
        tracing::error!(
          error = %err,
          "internal regex compile failure"
        );
      })
      .ok()
    })
    .as_ref()
}

fn is_mobile_user_agent(raw: &str) -> bool {
  mobile_user_agent_regex()
    .is_some_and(|re| re.is_match(raw))
}

/// The popover only carries a title on
/// narrow screens.
#[must_use]
pub fn popover_title(
  label: Option<&str>,
  device: DeviceClass
) -> Option<String> {
  if device.is_mobile() {
    label.map(str::to_string)
  } else {
    None
  }
}
