use std::sync::OnceLock;

use chrono_tz::Tz;
use datepick_core::config::PickerConfig;
use gloo::console::log;

const PICKER_CONFIG_TOML: &str =
  include_str!("../assets/datepick.toml");

pub fn picker_config()
-> &'static PickerConfig {
  static CONFIG: OnceLock<PickerConfig> =
    OnceLock::new();
  CONFIG.get_or_init(|| {
    PickerConfig::from_toml_or_default(
      PICKER_CONFIG_TOML
    )
  })
}

pub fn picker_timezone() -> Tz {
  picker_config().resolve_timezone(None)
}

pub fn ui_debug(
  event: &str,
  detail: &str
) {
  tracing::debug!(
    event, detail, "ui-debug"
  );
  log!(format!(
    "[ui-debug] {event}: {detail}"
  ));
}
