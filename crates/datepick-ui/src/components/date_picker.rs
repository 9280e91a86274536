use std::rc::Rc;

use chrono_tz::Tz;
use datepick_core::format::Format;
use datepick_core::instant::{
  Normalizer,
  RawDateInput
};
use datepick_core::listeners::{
  EventHost,
  EventKind,
  HostEvent
};
use datepick_core::relay::relay_selection;
use datepick_core::viewport::popover_title;
use datepick_core::visibility::{
  Key,
  Visibility,
  VisibilityEvent
};
use yew::{
  Callback,
  Html,
  NodeRef,
  Properties,
  Reducible,
  function_component,
  html,
  use_effect_with,
  use_memo,
  use_reducer
};

use super::{
  Calendar,
  Popper
};
use crate::config::{
  picker_config,
  picker_timezone,
  ui_debug
};
use crate::dom::DomTarget;
use crate::hooks::use_device_class;

#[derive(Properties, PartialEq)]
pub struct DatePickerProps {
  pub date:       RawDateInput,
  pub target_ref: NodeRef,
  #[prop_or_else(default_format)]
  pub format:     Format,
  #[prop_or_default]
  pub label:      Option<String>,
  #[prop_or_default]
  pub timezone:   Option<Tz>,
  pub on_change:  Callback<String>
}

fn default_format() -> Format {
  picker_config().format.clone()
}

#[derive(
  Clone, Copy, Default, PartialEq,
)]
struct PickerVisibility(Visibility);

impl Reducible for PickerVisibility {
  type Action = VisibilityEvent;

  fn reduce(
    self: Rc<Self>,
    action: Self::Action
  ) -> Rc<Self> {
    let next = self.0.apply(&action);
    if next == self.0 {
      self
    } else {
      Rc::new(Self(next))
    }
  }
}

#[function_component(DatePicker)]
pub fn date_picker(
  props: &DatePickerProps
) -> Html {
  let config = picker_config();
  let visibility =
    use_reducer(PickerVisibility::default);
  let device = use_device_class(
    config.mobile_breakpoint
  );
  let timezone = props
    .timezone
    .unwrap_or_else(picker_timezone);
  let instant = use_memo(
    (props.date.clone(), timezone),
    |(date, timezone)| {
      Normalizer::new(*timezone)
        .normalize_now(date)
    }
  );

  {
    let dispatcher =
      visibility.dispatcher();
    use_effect_with(
      props.target_ref.clone(),
      move |target_ref| {
        let listener =
          DomTarget::from_node_ref(
            target_ref
          )
          .map(|target| {
            target.listen(
              EventKind::Click,
              Box::new(
                move |_: &HostEvent| {
                  dispatcher.dispatch(
                    VisibilityEvent::TriggerClick
                  );
                }
              )
            )
          });
        if listener.is_none() {
          ui_debug(
            "picker.trigger.missing",
            "trigger ref not attached; no click listener"
          );
        }
        move || drop(listener)
      }
    );
  }

  {
    let dispatcher =
      visibility.dispatcher();
    use_effect_with((), move |_| {
      let listener =
        DomTarget::document().map(
          |document| {
            document.listen(
              EventKind::KeyUp,
              Box::new(
                move |event: &HostEvent| {
                  if let Some(raw) =
                    event.key.as_deref()
                  {
                    dispatcher.dispatch(
                      VisibilityEvent::KeyUp(
                        Key::from_dom(raw)
                      )
                    );
                  }
                }
              )
            )
          }
        );
      move || drop(listener)
    });
  }

  let on_close = {
    let dispatcher =
      visibility.dispatcher();
    Callback::from(move |()| {
      dispatcher
        .dispatch(VisibilityEvent::Dismiss);
    })
  };

  let on_select = {
    let dispatcher =
      visibility.dispatcher();
    let on_change = props.on_change.clone();
    Callback::from(move |value: String| {
      ui_debug("picker.select", &value);
      let event = relay_selection(
        value,
        &|value: String| {
          on_change.emit(value);
        }
      );
      dispatcher.dispatch(event);
    })
  };

  html! {
      <Popper
          open={visibility.0.is_open()}
          button_ref={props.target_ref.clone()}
          placement={config.placement}
          on_close={on_close}
          title={popover_title(props.label.as_deref(), device)}
      >
          <Calendar
              date={*instant}
              format={props.format.clone()}
              week_start={config.week_start.clone()}
              on_change={on_select}
          />
      </Popper>
  }
}
