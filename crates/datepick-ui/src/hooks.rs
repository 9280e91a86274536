use datepick_core::listeners::{
  EventHost,
  EventKind,
  HostEvent
};
use datepick_core::viewport::DeviceClass;
use yew::{
  hook,
  use_effect_with,
  use_state_eq
};

use crate::dom::DomTarget;

fn current_device_class(
  breakpoint: u32
) -> DeviceClass {
  let Some(window) = web_sys::window()
  else {
    return DeviceClass::default();
  };

  let width = window
    .inner_width()
    .ok()
    .and_then(|value| value.as_f64())
    .map_or(u32::MAX, |width| {
      width.max(0.0) as u32
    });
  let user_agent = window
    .navigator()
    .user_agent()
    .ok();

  DeviceClass::detect(
    width,
    user_agent.as_deref(),
    breakpoint
  )
}

/// Tracks the device class across window
/// resizes.
#[hook]
pub fn use_device_class(
  breakpoint: u32
) -> DeviceClass {
  let device = use_state_eq(|| {
    current_device_class(breakpoint)
  });

  {
    let device = device.clone();
    use_effect_with(
      breakpoint,
      move |breakpoint| {
        let breakpoint = *breakpoint;
        device.set(current_device_class(
          breakpoint
        ));
        let listener = DomTarget::window()
          .map(|window| {
            window.listen(
              EventKind::Resize,
              Box::new(move |_: &HostEvent| {
                device.set(
                  current_device_class(
                    breakpoint
                  )
                );
              })
            )
          });
        move || drop(listener)
      }
    );
  }

  *device
}
