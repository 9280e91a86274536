use std::fmt;
use std::sync::OnceLock;

use chrono::{
  DateTime,
  FixedOffset,
  LocalResult,
  NaiveDate,
  NaiveDateTime,
  NaiveTime,
  TimeZone,
  Utc
};
use chrono_tz::Tz;
use regex::Regex;

use crate::format::Format;

/// A timezone-aware point in time that
/// is always valid.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
)]
pub struct Instant(DateTime<Tz>);

impl Instant {
  #[must_use]
  pub fn from_utc(
    utc: DateTime<Utc>,
    timezone: Tz
  ) -> Self {
    Self(utc.with_timezone(&timezone))
  }

  #[must_use]
  pub fn to_utc(&self) -> DateTime<Utc> {
    self.0.with_timezone(&Utc)
  }

  #[must_use]
  pub fn timezone(&self) -> Tz {
    self.0.timezone()
  }

  #[must_use]
  pub fn date(&self) -> NaiveDate {
    self.0.date_naive()
  }

  #[must_use]
  pub fn time(&self) -> NaiveTime {
    self.0.time()
  }

  #[must_use]
  pub fn in_timezone(
    &self,
    timezone: Tz
  ) -> Self {
    Self(self.0.with_timezone(&timezone))
  }

  #[must_use]
  pub fn format(
    &self,
    format: &Format
  ) -> String {
    format.render(&self.0)
  }

  /// Moves to `date`, keeping the wall
  /// clock time. Returns `self` when that
  /// local time does not exist on `date`.
  #[must_use]
  pub fn with_date(
    &self,
    date: NaiveDate
  ) -> Self {
    self
      .with_local(date.and_time(self.time()))
      .unwrap_or(*self)
  }

  /// Sets the wall clock time on the
  /// current date.
  #[must_use]
  pub fn with_time(
    &self,
    hour: u32,
    minute: u32,
    second: u32
  ) -> Self {
    NaiveTime::from_hms_opt(
      hour, minute, second
    )
    .and_then(|time| {
      self.with_local(
        self.date().and_time(time)
      )
    })
    .unwrap_or(*self)
  }

  fn with_local(
    &self,
    local: NaiveDateTime
  ) -> Option<Self> {
    resolve_local(
      self.timezone(),
      local
    )
    .map(Self)
  }
}

impl fmt::Display for Instant {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    write!(
      f,
      "{}",
      self.0.to_rfc3339()
    )
  }
}

/// A date-like value supplied by the
/// caller.
#[derive(Debug, Clone, PartialEq)]
pub enum RawDateInput {
  Text(String),
  Native(DateTime<Utc>),
  Instant(Instant)
}

impl From<&str> for RawDateInput {
  fn from(raw: &str) -> Self {
    Self::Text(raw.to_string())
  }
}

impl From<String> for RawDateInput {
  fn from(raw: String) -> Self {
    Self::Text(raw)
  }
}

impl From<DateTime<Utc>>
  for RawDateInput
{
  fn from(dt: DateTime<Utc>) -> Self {
    Self::Native(dt)
  }
}

impl From<Instant> for RawDateInput {
  fn from(instant: Instant) -> Self {
    Self::Instant(instant)
  }
}

impl fmt::Display for RawDateInput {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    match self {
      | Self::Text(raw) => f.write_str(raw),
      | Self::Native(dt) => {
        write!(f, "{}", dt.to_rfc3339())
      }
      | Self::Instant(instant) => {
        write!(f, "{instant}")
      }
    }
  }
}

/// Turns caller input into an
/// `Instant` in one timezone. Never
/// fails: unparseable input becomes
/// "now".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
  timezone: Tz
}

impl Normalizer {
  #[must_use]
  pub fn new(timezone: Tz) -> Self {
    Self { timezone }
  }

  #[must_use]
  pub fn timezone(&self) -> Tz {
    self.timezone
  }

  #[must_use]
  pub fn normalize(
    &self,
    input: &RawDateInput,
    now: DateTime<Utc>
  ) -> Instant {
    self.try_normalize(input).unwrap_or_else(
      || {
        tracing::debug!(
          input = %input,
          timezone = %self.timezone,
          "unparseable date input; falling back to now"
        );
        Instant::from_utc(
          now,
          self.timezone
        )
      }
    )
  }

  #[must_use]
  pub fn normalize_now(
    &self,
    input: &RawDateInput
  ) -> Instant {
    self.normalize(input, Utc::now())
  }

  /// `None` when the input does not
  /// parse.
  #[must_use]
  pub fn try_normalize(
    &self,
    input: &RawDateInput
  ) -> Option<Instant> {
    match input {
      | RawDateInput::Text(raw) => {
        parse_text(raw, self.timezone)
          .map(Instant)
      }
      | RawDateInput::Native(dt) => {
        Some(Instant::from_utc(
          *dt,
          self.timezone
        ))
      }
      | RawDateInput::Instant(instant) => {
        Some(
          instant
            .in_timezone(self.timezone)
        )
      }
    }
  }
}

/// Recomputes the instant only when the
/// input or timezone changes.
#[derive(Debug, Default)]
pub struct MemoizedInstant {
  cached:
    Option<((RawDateInput, Tz), Instant)>
}

impl MemoizedInstant {
  pub fn get(
    &mut self,
    normalizer: &Normalizer,
    input: &RawDateInput,
    now: DateTime<Utc>
  ) -> Instant {
    if let Some(((key_input, key_tz), instant)) =
      &self.cached
      && key_input == input
      && *key_tz == normalizer.timezone()
    {
      return *instant;
    }

    let instant =
      normalizer.normalize(input, now);
    self.cached = Some((
      (input.clone(), normalizer.timezone()),
      instant
    ));
    instant
  }
}

const OFFSET_FORMATS: [&str; 4] = [
  "%Y-%m-%d %H:%M:%S%.f%:z",
  "%Y-%m-%d %H:%M:%S%.f%z",
  "%Y-%m-%dT%H:%M%:z",
  "%Y-%m-%d %H:%M%:z"
];

/// Parses `raw` into `timezone`.
/// Text is read as wall clock time in
/// `timezone`. When it carries an offset,
/// its UTC digits are that wall clock.
#[must_use]
pub fn parse_text(
  raw: &str,
  timezone: Tz
) -> Option<DateTime<Tz>> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }

  let local = parse_with_offset(trimmed)
    .map(|fixed| fixed.naive_utc())
    .or_else(|| parse_loose_local(trimmed))
    .or_else(|| {
      DateTime::parse_from_rfc2822(trimmed)
        .ok()
        .map(|fixed| fixed.naive_utc())
    })?;

  resolve_local(timezone, local)
}

fn parse_with_offset(
  raw: &str
) -> Option<DateTime<FixedOffset>> {
  if let Ok(dt) =
    DateTime::parse_from_rfc3339(raw)
  {
    return Some(dt);
  }

  OFFSET_FORMATS.iter().find_map(
    |pattern| {
      DateTime::parse_from_str(
        raw, pattern
      )
      .ok()
    }
  )
}

fn loose_local_regex()
-> Option<&'static Regex> {
  static LOOSE_RE: OnceLock<
    Option<Regex>
  > = OnceLock::new();
  LOOSE_RE
    .get_or_init(|| {
      Regex::new(
        r"^(?P<year>\d{4})(?:[-/]?(?P<month>\d{1,2})(?:[-/]?(?P<day>\d{1,2})(?:[Tt\s]*(?P<hour>\d{1,2})(?::?(?P<minute>\d{1,2})(?::?(?P<second>\d{1,2})(?:[.,](?P<frac>\d{1,9}))?)?)?)?)?)?$",
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

fn parse_loose_local(
  raw: &str
) -> Option<NaiveDateTime> {
  let captures =
    loose_local_regex()?.captures(raw)?;
  let field = |name: &str, default: u32| {
    captures
      .name(name)
      .map_or(Some(default), |m| {
        m.as_str().parse::<u32>().ok()
      })
  };

  let year = captures
    .name("year")?
    .as_str()
    .parse::<i32>()
    .ok()?;
  let month = field("month", 1)?;
  let day = field("day", 1)?;
  let hour = field("hour", 0)?;
  let minute = field("minute", 0)?;
  let second = field("second", 0)?;
  let nanos = match captures.name("frac")
  {
    | Some(frac) => {
      let digits = frac.as_str();
      let padded = format!(
        "{digits:0<9}"
      );
      padded.parse::<u32>().ok()?
    }
    | None => 0
  };

  NaiveDate::from_ymd_opt(
    year, month, day
  )?
  .and_hms_nano_opt(
    hour, minute, second, nanos
  )
}

fn resolve_local(
  timezone: Tz,
  local: NaiveDateTime
) -> Option<DateTime<Tz>> {
  match timezone
    .from_local_datetime(&local)
  {
    | LocalResult::Single(dt) => Some(dt),
    | LocalResult::Ambiguous(
      first,
      second
    ) => {
      tracing::debug!(
        first = %first,
        second = %second,
        "ambiguous local datetime; using earliest"
      );
      Some(first.min(second))
    }
    | LocalResult::None => {
      tracing::debug!(
        local = %local,
        timezone = %timezone,
        "local datetime does not exist in timezone"
      );
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::{
    TimeZone,
    Timelike,
    Utc
  };
  use chrono_tz::Tz;

  use super::{
    MemoizedInstant,
    Normalizer,
    RawDateInput,
    parse_text
  };
  use crate::format::Format;

  fn berlin() -> Tz {
    "Europe/Berlin"
      .parse::<Tz>()
      .expect("valid tz")
  }

  fn fixed_now() -> chrono::DateTime<Utc> {
    Utc
      .with_ymd_and_hms(
        2026, 2, 17, 12, 0, 0
      )
      .single()
      .expect("valid now")
  }

  #[test]
  fn offset_text_reads_utc_digits_as_wall_clock()
  {
    let normalizer =
      Normalizer::new(berlin());
    let instant = normalizer.normalize(
      &RawDateInput::from(
        "2024-01-15T10:00:00Z"
      ),
      fixed_now()
    );
    assert_eq!(instant.time().hour(), 10);
    assert_eq!(
      instant.to_utc(),
      Utc
        .with_ymd_and_hms(
          2024, 1, 15, 9, 0, 0
        )
        .single()
        .expect("valid utc")
    );

    let shifted = normalizer.normalize(
      &RawDateInput::from(
        "2024-01-15T10:00:00+02:00"
      ),
      fixed_now()
    );
    assert_eq!(
      shifted.format(&Format::new(
        "%Y-%m-%d %H:%M"
      )),
      "2024-01-15 08:00"
    );
  }

  #[test]
  fn native_input_keeps_absolute_moment()
  {
    let native = Utc
      .with_ymd_and_hms(
        2024, 1, 15, 10, 0, 0
      )
      .single()
      .expect("valid utc");
    let instant =
      Normalizer::new(berlin()).normalize(
        &RawDateInput::from(native),
        fixed_now()
      );
    assert_eq!(instant.to_utc(), native);
    assert_eq!(instant.time().hour(), 11);
  }

  #[test]
  fn compact_dates_parse_without_separators()
  {
    let date_only =
      parse_text("20240115", berlin())
        .expect("parse compact date");
    assert_eq!(
      date_only
        .format("%Y-%m-%d %H:%M:%S")
        .to_string(),
      "2024-01-15 00:00:00"
    );

    let with_time = parse_text(
      "20240115T1030",
      berlin()
    )
    .expect("parse compact datetime");
    assert_eq!(
      with_time
        .format("%Y-%m-%d %H:%M")
        .to_string(),
      "2024-01-15 10:30"
    );
  }

  #[test]
  fn bare_local_text_is_wall_clock_in_timezone()
  {
    let parsed = parse_text(
      "2024-07-01 08:30",
      berlin()
    )
    .expect("parse local");
    assert_eq!(
      parsed
        .with_timezone(&Utc)
        .format("%Y-%m-%d %H:%M")
        .to_string(),
      "2024-07-01 06:30"
    );
  }

  #[test]
  fn partial_dates_default_missing_fields()
  {
    let parsed =
      parse_text("2024-03", chrono_tz::UTC)
        .expect("parse year-month");
    assert_eq!(
      parsed
        .format("%Y-%m-%d %H:%M:%S")
        .to_string(),
      "2024-03-01 00:00:00"
    );

    let with_frac = parse_text(
      "2024/03/05T07:08:09.25",
      chrono_tz::UTC
    )
    .expect("parse fractional");
    assert_eq!(
      with_frac.nanosecond(),
      250_000_000
    );
  }

  #[test]
  fn rfc2822_text_parses() {
    let parsed = parse_text(
      "Mon, 15 Jan 2024 10:00:00 +0000",
      chrono_tz::UTC
    )
    .expect("parse rfc2822");
    assert_eq!(
      parsed.format("%H:%M").to_string(),
      "10:00"
    );
  }

  #[test]
  fn rejects_garbage_and_out_of_range() {
    for raw in [
      "",
      "   ",
      "not-a-date",
      "2024-13-01",
      "2024-02-30",
      "2024-01-01 25:00"
    ] {
      assert!(
        parse_text(raw, chrono_tz::UTC)
          .is_none(),
        "expected {raw:?} to be rejected"
      );
    }
  }

  #[test]
  fn dst_gap_is_unparseable() {
    assert!(
      parse_text(
        "2024-03-31 02:30",
        berlin()
      )
      .is_none()
    );
  }

  #[test]
  fn invalid_text_falls_back_to_now() {
    let normalizer =
      Normalizer::new(berlin());
    let now = fixed_now();
    let instant = normalizer.normalize(
      &RawDateInput::from("not-a-date"),
      now
    );
    assert_eq!(instant.to_utc(), now);
    assert_eq!(instant.timezone(), berlin());
  }

  #[test]
  fn instant_input_is_rezoned() {
    let utc_normalizer =
      Normalizer::new(chrono_tz::UTC);
    let source = utc_normalizer.normalize(
      &RawDateInput::from(
        "2024-01-15T10:00:00Z"
      ),
      fixed_now()
    );
    let rezoned =
      Normalizer::new(berlin())
        .normalize(
          &RawDateInput::Instant(source),
          fixed_now()
        );
    assert_eq!(
      rezoned.to_utc(),
      source.to_utc()
    );
    assert_eq!(
      rezoned.format(&Format::new(
        "%H:%M"
      )),
      "11:00"
    );
  }

  #[test]
  fn memo_reuses_instant_until_input_changes()
  {
    let normalizer =
      Normalizer::new(chrono_tz::UTC);
    let mut memo =
      MemoizedInstant::default();
    let input =
      RawDateInput::from("garbage");

    let first = memo.get(
      &normalizer,
      &input,
      fixed_now()
    );
    let later = fixed_now()
      + chrono::Duration::minutes(5);
    let second =
      memo.get(&normalizer, &input, later);
    assert_eq!(first, second);

    let third = memo.get(
      &normalizer,
      &RawDateInput::from("garbage!"),
      later
    );
    assert_eq!(third.to_utc(), later);
  }

  #[test]
  fn with_date_keeps_wall_clock() {
    let instant = Normalizer::new(
      chrono_tz::UTC
    )
    .normalize(
      &RawDateInput::from(
        "2024-01-15 10:45:30"
      ),
      fixed_now()
    );
    let moved = instant.with_date(
      chrono::NaiveDate::from_ymd_opt(
        2024, 1, 20
      )
      .expect("valid date")
    );
    assert_eq!(
      moved.format(&Format::default()),
      "2024-01-20 10:45:30"
    );
    assert_eq!(
      moved
        .with_time(7, 5, 0)
        .format(&Format::default()),
      "2024-01-20 07:05:00"
    );
  }
}
