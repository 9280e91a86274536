use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "datepick",
    version,
    about = "Normalize dates and replay date picker interactions",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[arg(long = "timezone", global = true)]
    pub timezone: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the instant the picker would show for INPUT.
    Normalize {
        input: String,

        #[arg(long = "format")]
        format: Option<String>,

        #[arg(long = "json")]
        json: bool,
    },
    /// Drive a headless picker through a list of events.
    ///
    /// Events: click, key:<KEY>, dismiss, select:<VALUE>, retarget,
    /// detach-trigger, unmount.
    Replay {
        #[arg(required = true, allow_hyphen_values = true)]
        events: Vec<ReplayStep>,

        #[arg(long = "json")]
        json: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayStep {
    Click,
    Key(String),
    Dismiss,
    Select(String),
    Retarget,
    DetachTrigger,
    Unmount,
}

impl std::str::FromStr for ReplayStep {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(key) = trimmed.strip_prefix("key:") {
            if key.is_empty() {
                return Err(anyhow!("expected key:<KEY>, got: {s}"));
            }
            return Ok(Self::Key(key.to_string()));
        }
        if let Some(value) = trimmed.strip_prefix("select:") {
            return Ok(Self::Select(value.to_string()));
        }

        match trimmed {
            "click" => Ok(Self::Click),
            "dismiss" => Ok(Self::Dismiss),
            "retarget" => Ok(Self::Retarget),
            "detach-trigger" => Ok(Self::DetachTrigger),
            "unmount" => Ok(Self::Unmount),
            other => Err(anyhow!("unknown replay event: {other}")),
        }
    }
}

impl std::fmt::Display for ReplayStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Click => f.write_str("click"),
            Self::Key(key) => write!(f, "key:{key}"),
            Self::Dismiss => f.write_str("dismiss"),
            Self::Select(value) => write!(f, "select:{value}"),
            Self::Retarget => f.write_str("retarget"),
            Self::DetachTrigger => f.write_str("detach-trigger"),
            Self::Unmount => f.write_str("unmount"),
        }
    }
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
