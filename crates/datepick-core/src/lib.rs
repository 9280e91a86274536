pub mod calendar;
pub mod cli;
pub mod config;
pub mod format;
pub mod instant;
pub mod listeners;
pub mod placement;
pub mod relay;
pub mod replay;
pub mod session;
pub mod simulated;
pub mod viewport;
pub mod visibility;

use std::ffi::OsString;

use clap::Parser;
use serde::Serialize;
use tracing::{
  debug,
  info
};

use crate::cli::Command;
use crate::config::PickerConfig;
use crate::format::Format;
use crate::instant::{
  Normalizer,
  RawDateInput
};

#[derive(Debug, Serialize)]
struct NormalizeReport {
  input:     String,
  timezone:  String,
  instant:   String,
  formatted: String,
  fell_back: bool
}

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli =
    cli::GlobalCli::parse_from(raw_args);

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting datepick CLI"
  );

  let config = PickerConfig::load(
    cli.config.as_deref()
  )?;
  let timezone = config.resolve_timezone(
    cli.timezone.as_deref()
  );
  debug!(timezone = %timezone, "resolved timezone");

  match cli.command {
    | Command::Normalize {
      input,
      format,
      json
    } => {
      let format = format
        .map(Format::new)
        .unwrap_or_else(|| {
          config.format.clone()
        });
      let normalizer =
        Normalizer::new(timezone);
      let raw =
        RawDateInput::from(input.clone());
      let fell_back = normalizer
        .try_normalize(&raw)
        .is_none();
      let instant =
        normalizer.normalize_now(&raw);

      let report = NormalizeReport {
        input,
        timezone: timezone.to_string(),
        instant: instant.to_string(),
        formatted: instant.format(&format),
        fell_back
      };

      if json {
        println!(
          "{}",
          serde_json::to_string_pretty(
            &report
          )?
        );
      } else {
        println!("{}", report.formatted);
        if report.fell_back {
          eprintln!(
            "note: {:?} did not parse; showing current time",
            report.input
          );
        }
      }
    }
    | Command::Replay { events, json } => {
      let transcript =
        replay::replay(&events);
      if json {
        println!(
          "{}",
          serde_json::to_string_pretty(
            &transcript
          )?
        );
      } else {
        for line in transcript.lines() {
          println!("{line}");
        }
      }
    }
  }

  info!("done");
  Ok(())
}
