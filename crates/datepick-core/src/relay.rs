use crate::visibility::VisibilityEvent;

/// Receives the value picked in the
/// calendar.
pub trait ChangeSink {
  fn emit(&self, value: String);
}

impl<F> ChangeSink for F
where
  F: Fn(String)
{
  fn emit(&self, value: String) {
    self(value);
  }
}

/// Forwards `value` unchanged and hands
/// back the event that must follow it.
pub fn relay_selection<S>(
  value: String,
  sink: &S
) -> VisibilityEvent
where
  S: ChangeSink + ?Sized
{
  tracing::debug!(
    value = %value,
    "relaying calendar selection"
  );
  sink.emit(value);
  VisibilityEvent::Selected
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;

  use super::relay_selection;
  use crate::visibility::Visibility;

  #[test]
  fn forwards_once_then_closes() {
    let seen = RefCell::new(Vec::new());
    let event = relay_selection(
      "2024-01-20T10:00:00Z".to_string(),
      &|value: String| {
        seen.borrow_mut().push(value);
      }
    );

    assert_eq!(
      Visibility::Open.apply(&event),
      Visibility::Closed
    );
    assert_eq!(
      seen.into_inner(),
      vec![
        "2024-01-20T10:00:00Z".to_string()
      ]
    );
  }

  #[test]
  fn does_not_validate_the_value() {
    let seen = RefCell::new(Vec::new());
    relay_selection(
      "whatever".to_string(),
      &|value: String| {
        seen.borrow_mut().push(value);
      }
    );
    assert_eq!(
      seen.into_inner(),
      vec!["whatever".to_string()]
    );
  }
}
