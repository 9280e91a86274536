use chrono::{
  Datelike,
  Duration,
  NaiveDate,
  Weekday
};
use serde::Serialize;

use crate::instant::Instant;

pub const GRID_CELLS: i64 = 42;

/// Which picker the calendar header
/// shows.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub enum CalendarView {
  #[default]
  Days,
  Months,
  Years
}

impl CalendarView {
  /// Clicking the year label.
  #[must_use]
  pub fn toggle_years(self) -> Self {
    match self {
      | Self::Years => Self::Days,
      | Self::Days | Self::Months => {
        Self::Years
      }
    }
  }

  #[must_use]
  pub fn after_year_pick(self) -> Self {
    Self::Months
  }

  #[must_use]
  pub fn after_month_pick(self) -> Self {
    Self::Days
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
)]
pub struct GridDay {
  pub date:          NaiveDate,
  pub outside_month: bool,
  pub is_selected:   bool,
  pub is_today:      bool
}

#[must_use]
pub fn week_start_day(raw: &str) -> Weekday {
  if raw
    .trim()
    .eq_ignore_ascii_case("sunday")
  {
    Weekday::Sun
  } else {
    Weekday::Mon
  }
}

#[must_use]
pub fn weekday_labels(
  week_start: Weekday
) -> [&'static str; 7] {
  match week_start {
    | Weekday::Sun => [
      "Su", "Mo", "Tu", "We", "Th", "Fr",
      "Sa"
    ],
    | _ => [
      "Mo", "Tu", "We", "Th", "Fr", "Sa",
      "Su"
    ]
  }
}

/// Six full weeks covering the month of
/// `focus`.
#[must_use]
pub fn month_grid(
  focus: NaiveDate,
  week_start: Weekday,
  selected: NaiveDate,
  today: NaiveDate
) -> Vec<GridDay> {
  let first = first_day_of_month(
    focus.year(),
    focus.month()
  );
  let grid_start =
    start_of_week(first, week_start);

  (0..GRID_CELLS)
    .map(|offset| {
      let date =
        add_days(grid_start, offset);
      GridDay {
        date,
        outside_month: date.month()
          != focus.month()
          || date.year() != focus.year(),
        is_selected: date == selected,
        is_today: date == today
      }
    })
    .collect()
}

/// Picks `day` in the calendar, keeping
/// the time of day.
#[must_use]
pub fn select_day(
  instant: &Instant,
  day: NaiveDate
) -> Instant {
  instant.with_date(day)
}

/// Reads `HH:MM` or `HH:MM:SS` from a
/// time input.
#[must_use]
pub fn parse_clock(
  raw: &str
) -> Option<(u32, u32, u32)> {
  let mut parts =
    raw.trim().split(':').map(|part| {
      part.parse::<u32>().ok()
    });
  let hour = parts.next()??;
  let minute = parts.next()??;
  let second =
    parts.next().unwrap_or(Some(0))?;
  if parts.next().is_some()
    || hour > 23
    || minute > 59
    || second > 59
  {
    return None;
  }
  Some((hour, minute, second))
}

#[must_use]
pub fn with_year(
  date: NaiveDate,
  year: i32
) -> NaiveDate {
  shift_months(
    date,
    (year - date.year()) * 12
  )
}

#[must_use]
pub fn with_month(
  date: NaiveDate,
  month: u32
) -> NaiveDate {
  shift_months(
    date,
    month as i32 - date.month() as i32
  )
}

/// A window of years around `focus`
/// for the year picker.
#[must_use]
pub fn year_range(
  focus: NaiveDate,
  span: i32
) -> Vec<i32> {
  let year = focus.year();
  (year.saturating_sub(span)
    ..=year.saturating_add(span))
    .collect()
}

#[must_use]
pub fn shift_months(
  date: NaiveDate,
  months: i32
) -> NaiveDate {
  let mut year = date.year();
  let mut month =
    date.month() as i32 + months;

  while month < 1 {
    month += 12;
    year = year.saturating_sub(1);
  }
  while month > 12 {
    month -= 12;
    year = year.saturating_add(1);
  }

  let month = month as u32;
  let day = date
    .day()
    .min(days_in_month(year, month));
  NaiveDate::from_ymd_opt(
    year, month, day
  )
  .unwrap_or(date)
}

#[must_use]
pub fn first_day_of_month(
  year: i32,
  month: u32
) -> NaiveDate {
  NaiveDate::from_ymd_opt(
    year, month, 1
  )
  .unwrap_or(NaiveDate::MIN)
}

#[must_use]
pub fn last_day_of_month(
  year: i32,
  month: u32
) -> NaiveDate {
  let (next_year, next_month) =
    if month >= 12 {
      (year.saturating_add(1), 1_u32)
    } else {
      (year, month + 1)
    };
  add_days(
    first_day_of_month(
      next_year, next_month
    ),
    -1
  )
}

#[must_use]
pub fn days_in_month(
  year: i32,
  month: u32
) -> u32 {
  last_day_of_month(year, month).day()
}

#[must_use]
pub fn add_days(
  date: NaiveDate,
  days: i64
) -> NaiveDate {
  date
    .checked_add_signed(Duration::days(
      days
    ))
    .unwrap_or(date)
}

#[must_use]
pub fn start_of_week(
  day: NaiveDate,
  week_start: Weekday
) -> NaiveDate {
  let day_idx = day
    .weekday()
    .num_days_from_monday()
    as i64;
  let start_idx = week_start
    .num_days_from_monday()
    as i64;
  let diff =
    (7 + day_idx - start_idx) % 7;
  add_days(day, -diff)
}

#[cfg(test)]
mod tests {
  use chrono::{
    NaiveDate,
    Weekday
  };

  use super::{
    CalendarView,
    GRID_CELLS,
    month_grid,
    parse_clock,
    shift_months,
    start_of_week,
    week_start_day
  };

  fn date(
    y: i32,
    m: u32,
    d: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d)
      .expect("valid date")
  }

  #[test]
  fn grid_starts_on_week_start() {
    let grid = month_grid(
      date(2024, 1, 15),
      Weekday::Mon,
      date(2024, 1, 15),
      date(2024, 1, 20)
    );
    assert_eq!(
      grid.len() as i64,
      GRID_CELLS
    );
    assert_eq!(grid[0].date, date(2024, 1, 1));
    assert!(!grid[0].outside_month);
    assert!(grid[41].outside_month);
    assert_eq!(
      grid
        .iter()
        .filter(|day| day.is_selected)
        .count(),
      1
    );
    assert!(
      grid
        .iter()
        .any(|day| day.is_today
          && day.date == date(2024, 1, 20))
    );
  }

  #[test]
  fn sunday_weeks_reach_back_into_previous_month()
  {
    let grid = month_grid(
      date(2024, 1, 15),
      week_start_day("Sunday"),
      date(2024, 1, 15),
      date(2024, 1, 15)
    );
    assert_eq!(
      grid[0].date,
      date(2023, 12, 31)
    );
    assert!(grid[0].outside_month);
  }

  #[test]
  fn shift_months_clamps_day() {
    assert_eq!(
      shift_months(date(2024, 1, 31), 1),
      date(2024, 2, 29)
    );
    assert_eq!(
      shift_months(date(2024, 1, 31), -2),
      date(2023, 11, 30)
    );
  }

  #[test]
  fn start_of_week_handles_same_day() {
    assert_eq!(
      start_of_week(
        date(2024, 1, 15),
        Weekday::Mon
      ),
      date(2024, 1, 15)
    );
  }

  #[test]
  fn parses_time_input_values() {
    assert_eq!(
      parse_clock("07:45"),
      Some((7, 45, 0))
    );
    assert_eq!(
      parse_clock("23:59:30"),
      Some((23, 59, 30))
    );
    for raw in ["", "24:00", "7", "1:2:3:4"]
    {
      assert_eq!(parse_clock(raw), None);
    }
  }

  #[test]
  fn header_view_cycle() {
    let view = CalendarView::default();
    let years = view.toggle_years();
    assert_eq!(years, CalendarView::Years);
    assert_eq!(
      years.after_year_pick(),
      CalendarView::Months
    );
    assert_eq!(
      years
        .after_year_pick()
        .after_month_pick(),
      CalendarView::Days
    );
    assert_eq!(
      years.toggle_years(),
      CalendarView::Days
    );
  }
}
