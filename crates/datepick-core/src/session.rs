use std::cell::Cell;
use std::rc::Rc;

use crate::listeners::{
  EventHost,
  EventKind,
  HostEvent,
  ScopedListener,
  TargetId
};
use crate::relay::{
  ChangeSink,
  relay_selection
};
use crate::visibility::{
  Key,
  Visibility,
  VisibilityEvent
};

/// A mounted picker over any event
/// host: one trigger click listener,
/// one document keyup listener.
pub struct PickerSession<H>
where
  H: EventHost
{
  state:     Rc<Cell<Visibility>>,
  on_change: Rc<dyn ChangeSink>,
  trigger:   ScopedListener<H::Listener>,
  keyup:     ScopedListener<H::Listener>
}

/// Handler flipping `state` on each
/// trigger click.
pub fn trigger_click_handler(
  state: Rc<Cell<Visibility>>
) -> impl FnMut(&HostEvent) + 'static {
  move |event| {
    if event.kind == EventKind::Click {
      state.set(state.get().apply(
        &VisibilityEvent::TriggerClick
      ));
    }
  }
}

/// Handler closing on Escape/Enter.
pub fn key_up_handler(
  state: Rc<Cell<Visibility>>
) -> impl FnMut(&HostEvent) + 'static {
  move |event| {
    if let Some(raw) = event.key.as_deref()
    {
      state.set(state.get().apply(
        &VisibilityEvent::KeyUp(
          Key::from_dom(raw)
        )
      ));
    }
  }
}

impl<H> PickerSession<H>
where
  H: EventHost
{
  pub fn mount<S>(
    document: &H,
    trigger: Option<(TargetId, &H)>,
    on_change: S
  ) -> Self
  where
    S: ChangeSink + 'static
  {
    let mut session = Self {
      state:     Rc::new(Cell::new(
        Visibility::Closed
      )),
      on_change: Rc::new(on_change),
      trigger:   ScopedListener::new(
        "trigger-click"
      ),
      keyup:     ScopedListener::new(
        "document-keyup"
      )
    };

    let state = Rc::clone(&session.state);
    session.keyup.bind(
      Some((TargetId::DOCUMENT, document)),
      |document| {
        document.listen(
          EventKind::KeyUp,
          Box::new(key_up_handler(state))
        )
      }
    );
    session.retarget(trigger);

    tracing::info!(
      trigger = ?session.trigger.bound_to(),
      "mounted picker session"
    );
    session
  }

  /// Points the click listener at a new
  /// trigger. The keyup listener is left
  /// alone.
  pub fn retarget(
    &mut self,
    trigger: Option<(TargetId, &H)>
  ) {
    let state = Rc::clone(&self.state);
    self.trigger.bind(trigger, |host| {
      host.listen(
        EventKind::Click,
        Box::new(trigger_click_handler(
          state
        ))
      )
    });
  }

  /// Outside interaction reported by the
  /// popper.
  pub fn dismiss(&self) {
    self.state.set(
      self
        .state
        .get()
        .apply(&VisibilityEvent::Dismiss)
    );
  }

  /// A value confirmed in the calendar.
  pub fn select(
    &self,
    value: impl Into<String>
  ) {
    let event = relay_selection(
      value.into(),
      self.on_change.as_ref()
    );
    self.state.set(
      self.state.get().apply(&event)
    );
  }

  #[must_use]
  pub fn visibility(&self) -> Visibility {
    self.state.get()
  }

  #[must_use]
  pub fn trigger_target(
    &self
  ) -> Option<TargetId> {
    self.trigger.bound_to()
  }

  pub fn unmount(self) {
    drop(self);
  }

  fn release(&mut self) {
    self.trigger.release();
    self.keyup.release();
  }
}

impl<H> Drop for PickerSession<H>
where
  H: EventHost
{
  fn drop(&mut self) {
    if self.trigger.is_bound()
      || self.keyup.is_bound()
    {
      tracing::info!(
        state = %self.state.get(),
        "unmounting picker session"
      );
    }
    self.release();
  }
}

#[cfg(test)]
mod tests {
  use std::cell::{
    Cell,
    RefCell
  };
  use std::rc::Rc;

  use super::PickerSession;
  use crate::listeners::{
    EventKind,
    HostEvent
  };
  use crate::simulated::SimulatedPage;
  use crate::visibility::Visibility;

  #[test]
  fn keyup_ignored_while_closed() {
    let mut page = SimulatedPage::new();
    let button = page.create_element();
    let session = PickerSession::mount(
      page.document(),
      Some((button.id(), &button)),
      |_value: String| {}
    );

    page
      .document()
      .dispatch(&HostEvent::key_up("Enter"));
    assert_eq!(
      session.visibility(),
      Visibility::Closed
    );
  }

  #[test]
  fn retarget_moves_only_click_listener() {
    let mut page = SimulatedPage::new();
    let first = page.create_element();
    let second = page.create_element();
    let mut session =
      PickerSession::mount(
        page.document(),
        Some((first.id(), &first)),
        |_value: String| {}
      );

    session
      .retarget(Some((second.id(), &second)));
    assert_eq!(first.live_listeners(), 0);
    assert_eq!(second.live_listeners(), 1);
    assert_eq!(
      page
        .document()
        .live_listeners_of(EventKind::KeyUp),
      1
    );

    first.dispatch(&HostEvent::click());
    assert_eq!(
      session.visibility(),
      Visibility::Closed
    );
    second.dispatch(&HostEvent::click());
    assert_eq!(
      session.visibility(),
      Visibility::Open
    );
  }

  #[test]
  fn mount_without_trigger_still_listens_for_keys()
  {
    let page = SimulatedPage::new();
    let session = PickerSession::mount(
      page.document(),
      None,
      |_value: String| {}
    );
    assert_eq!(session.trigger_target(), None);
    assert_eq!(page.live_listeners(), 1);
  }

  #[test]
  fn dismiss_closes_without_emitting() {
    let mut page = SimulatedPage::new();
    let button = page.create_element();
    let emitted =
      Rc::new(RefCell::new(Vec::new()));
    let session = {
      let emitted = Rc::clone(&emitted);
      PickerSession::mount(
        page.document(),
        Some((button.id(), &button)),
        move |value: String| {
          emitted.borrow_mut().push(value);
        }
      )
    };

    button.dispatch(&HostEvent::click());
    session.dismiss();
    assert_eq!(
      session.visibility(),
      Visibility::Closed
    );
    assert!(emitted.borrow().is_empty());
  }

  #[test]
  fn select_emits_while_open_then_closes() {
    let mut page = SimulatedPage::new();
    let button = page.create_element();
    let state_slot: Rc<
      RefCell<Option<Rc<Cell<Visibility>>>>
    > = Rc::default();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let session = {
      let state_slot = Rc::clone(&state_slot);
      let seen = Rc::clone(&seen);
      PickerSession::mount(
        page.document(),
        Some((button.id(), &button)),
        move |value: String| {
          let state = state_slot
            .borrow()
            .as_ref()
            .map(|state| state.get());
          seen.borrow_mut().push((value, state));
        }
      )
    };
    *state_slot.borrow_mut() =
      Some(Rc::clone(&session.state));

    button.dispatch(&HostEvent::click());
    session.select("2024-01-20 10:00:00");

    assert_eq!(
      *seen.borrow(),
      vec![(
        "2024-01-20 10:00:00".to_string(),
        Some(Visibility::Open)
      )]
    );
    assert_eq!(
      session.visibility(),
      Visibility::Closed
    );
  }
}
