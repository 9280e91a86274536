use chrono::{
  Datelike,
  NaiveDate,
  Utc
};
use datepick_core::calendar::{
  CalendarView,
  month_grid,
  parse_clock,
  select_day,
  shift_months,
  week_start_day,
  weekday_labels,
  with_month,
  with_year,
  year_range
};
use datepick_core::format::{
  Format,
  TIME_FORMAT
};
use datepick_core::instant::Instant;
use web_sys::HtmlInputElement;
use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  classes,
  function_component,
  html,
  use_effect_with,
  use_state
};

const YEAR_SPAN: i32 = 7;

#[derive(Properties, PartialEq)]
pub struct CalendarProps {
  pub date:       Instant,
  pub format:     Format,
  #[prop_or_else(|| "monday".to_string())]
  pub week_start: String,
  pub on_change:  Callback<String>
}

#[function_component(Calendar)]
pub fn calendar(
  props: &CalendarProps
) -> Html {
  let focus = use_state(|| props.date.date());
  let view =
    use_state(CalendarView::default);

  {
    let focus = focus.clone();
    let view = view.clone();
    use_effect_with(
      props.date,
      move |date| {
        focus.set(date.date());
        view.set(CalendarView::Days);
        || ()
      }
    );
  }

  let today = Utc::now()
    .with_timezone(&props.date.timezone())
    .date_naive();
  let week_start =
    week_start_day(&props.week_start);

  let emit = {
    let on_change = props.on_change.clone();
    let format = props.format.clone();
    move |instant: Instant| {
      on_change.emit(instant.format(&format));
    }
  };

  let shift = |months: i32| {
    let focus = focus.clone();
    Callback::from(
      move |_: yew::MouseEvent| {
        focus.set(shift_months(
          *focus, months
        ));
      }
    )
  };

  let on_toggle_years = {
    let view = view.clone();
    Callback::from(
      move |_: yew::MouseEvent| {
        view.set(view.toggle_years());
      }
    )
  };

  let on_today = {
    let focus = focus.clone();
    let view = view.clone();
    Callback::from(
      move |_: yew::MouseEvent| {
        focus.set(today);
        view.set(CalendarView::Days);
      }
    )
  };

  let on_time_change = {
    let date = props.date;
    let emit = emit.clone();
    Callback::from(move |e: yew::Event| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      match parse_clock(&input.value()) {
        | Some((hour, minute, second)) => {
          emit(date.with_time(
            hour, minute, second
          ));
        }
        | None => {
          tracing::debug!(
            value = %input.value(),
            "ignoring unparseable time input"
          );
        }
      }
    })
  };

  let body = match *view {
    | CalendarView::Days => {
      render_days(
        *focus,
        week_start,
        props.date,
        today,
        &emit
      )
    }
    | CalendarView::Months => {
      html! {
          <div class="datepick-calendar-months">
              {
                  for (1_u32..=12).map(|month| {
                      let focus = focus.clone();
                      let view = view.clone();
                      let label = with_month(*focus, month).format("%b").to_string();
                      let active = focus.month() == month;
                      html! {
                          <button
                              type="button"
                              class={classes!("datepick-calendar-cell", active.then_some("active"))}
                              onclick={Callback::from(move |_: yew::MouseEvent| {
                                  focus.set(with_month(*focus, month));
                                  view.set(view.after_month_pick());
                              })}
                          >
                              { label }
                          </button>
                      }
                  })
              }
          </div>
      }
    }
    | CalendarView::Years => {
      html! {
          <div class="datepick-calendar-years">
              {
                  for year_range(*focus, YEAR_SPAN).into_iter().map(|year| {
                      let focus = focus.clone();
                      let view = view.clone();
                      let active = focus.year() == year;
                      html! {
                          <button
                              type="button"
                              class={classes!("datepick-calendar-cell", active.then_some("active"))}
                              onclick={Callback::from(move |_: yew::MouseEvent| {
                                  focus.set(with_year(*focus, year));
                                  view.set(view.after_year_pick());
                              })}
                          >
                              { year }
                          </button>
                      }
                  })
              }
          </div>
      }
    }
  };

  html! {
      <div class="datepick-calendar">
          <div class="datepick-calendar-header">
              <button type="button" class="btn" onclick={shift(-1)}>{ "‹" }</button>
              <button type="button" class="btn datepick-calendar-header__title" onclick={on_toggle_years}>
                  { focus.format("%B %Y").to_string() }
              </button>
              <button type="button" class="btn" onclick={shift(1)}>{ "›" }</button>
          </div>
          { body }
          <div class="datepick-calendar-footer">
              <input
                  class="datepick-calendar-time"
                  type="time"
                  step="1"
                  value={props.date.time().format(TIME_FORMAT).to_string()}
                  onchange={on_time_change}
              />
              <button type="button" class="btn" onclick={on_today}>{ "Today" }</button>
          </div>
      </div>
  }
}

fn render_days<F>(
  focus: NaiveDate,
  week_start: chrono::Weekday,
  selected: Instant,
  today: NaiveDate,
  emit: &F
) -> Html
where
  F: Fn(Instant) + Clone + 'static
{
  let grid = month_grid(
    focus,
    week_start,
    selected.date(),
    today
  );

  html! {
      <>
          <div class="datepick-calendar-weekdays">
              {
                  for weekday_labels(week_start).into_iter().map(|label| html! {
                      <div class="datepick-calendar-weekday">{ label }</div>
                  })
              }
          </div>
          <div class="datepick-calendar-days">
              {
                  for grid.into_iter().map(|day| {
                      let emit = emit.clone();
                      html! {
                          <button
                              type="button"
                              class={classes!(
                                  "datepick-calendar-cell",
                                  day.outside_month.then_some("outside"),
                                  day.is_selected.then_some("selected"),
                                  day.is_today.then_some("today")
                              )}
                              onclick={Callback::from(move |_: yew::MouseEvent| {
                                  emit(select_day(&selected, day.date));
                              })}
                          >
                              { day.date.day() }
                          </button>
                      }
                  })
              }
          </div>
      </>
  }
}
