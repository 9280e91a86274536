use std::cell::RefCell;
use std::rc::{
  Rc,
  Weak
};

use crate::listeners::{
  EventHost,
  EventKind,
  Handler,
  HostEvent,
  TargetId
};

struct Entry {
  id:      u64,
  kind:    EventKind,
  handler: Rc<RefCell<Handler>>
}

#[derive(Default)]
struct Registry {
  next_id: u64,
  entries: Vec<Entry>
}

/// In-memory event target. Used to
/// drive a picker session without a
/// browser.
#[derive(Clone)]
pub struct SimulatedTarget {
  id:       TargetId,
  registry: Rc<RefCell<Registry>>
}

pub struct SimulatedListener {
  id:       u64,
  registry: Weak<RefCell<Registry>>
}

impl Drop for SimulatedListener {
  fn drop(&mut self) {
    if let Some(registry) =
      self.registry.upgrade()
    {
      registry
        .borrow_mut()
        .entries
        .retain(|entry| entry.id != self.id);
    }
  }
}

impl SimulatedTarget {
  #[must_use]
  pub fn new(id: TargetId) -> Self {
    Self {
      id,
      registry: Rc::default()
    }
  }

  #[must_use]
  pub fn id(&self) -> TargetId {
    self.id
  }

  /// Invokes every listener registered
  /// for the event kind and returns how
  /// many ran.
  pub fn dispatch(
    &self,
    event: &HostEvent
  ) -> usize {
    let handlers = self
      .registry
      .borrow()
      .entries
      .iter()
      .filter(|entry| {
        entry.kind == event.kind
      })
      .map(|entry| {
        Rc::clone(&entry.handler)
      })
      .collect::<Vec<_>>();

    for handler in &handlers {
      let mut handler = handler.borrow_mut();
      (*handler)(event);
    }

    tracing::trace!(
      target = %self.id,
      kind = %event.kind,
      invoked = handlers.len(),
      "dispatched simulated event"
    );
    handlers.len()
  }

  #[must_use]
  pub fn live_listeners(&self) -> usize {
    self.registry.borrow().entries.len()
  }

  #[must_use]
  pub fn live_listeners_of(
    &self,
    kind: EventKind
  ) -> usize {
    self
      .registry
      .borrow()
      .entries
      .iter()
      .filter(|entry| entry.kind == kind)
      .count()
  }
}

impl EventHost for SimulatedTarget {
  type Listener = SimulatedListener;

  fn listen(
    &self,
    kind: EventKind,
    handler: Handler
  ) -> SimulatedListener {
    let mut registry =
      self.registry.borrow_mut();
    registry.next_id += 1;
    let id = registry.next_id;
    registry.entries.push(Entry {
      id,
      kind,
      handler: Rc::new(RefCell::new(
        handler
      ))
    });

    SimulatedListener {
      id,
      registry: Rc::downgrade(
        &self.registry
      )
    }
  }
}

/// A document plus any number of
/// trigger elements.
pub struct SimulatedPage {
  document: SimulatedTarget,
  elements: Vec<SimulatedTarget>
}

impl Default for SimulatedPage {
  fn default() -> Self {
    Self::new()
  }
}

impl SimulatedPage {
  #[must_use]
  pub fn new() -> Self {
    Self {
      document: SimulatedTarget::new(
        TargetId::DOCUMENT
      ),
      elements: Vec::new()
    }
  }

  #[must_use]
  pub fn document(
    &self
  ) -> &SimulatedTarget {
    &self.document
  }

  /// Adds an element and returns it.
  pub fn create_element(
    &mut self
  ) -> SimulatedTarget {
    let id = TargetId(
      self.elements.len() as u64 + 1
    );
    let element =
      SimulatedTarget::new(id);
    self.elements.push(element.clone());
    element
  }

  /// Listeners still registered
  /// anywhere on the page.
  #[must_use]
  pub fn live_listeners(&self) -> usize {
    self.document.live_listeners()
      + self
        .elements
        .iter()
        .map(SimulatedTarget::live_listeners)
        .sum::<usize>()
  }
}

#[cfg(test)]
mod tests {
  use std::cell::Cell;
  use std::rc::Rc;

  use super::SimulatedPage;
  use crate::listeners::{
    EventHost,
    EventKind,
    HostEvent
  };

  #[test]
  fn dropping_listener_unregisters() {
    let mut page = SimulatedPage::new();
    let button = page.create_element();
    let hits = Rc::new(Cell::new(0));

    let listener = {
      let hits = Rc::clone(&hits);
      button.listen(
        EventKind::Click,
        Box::new(move |_: &HostEvent| {
          hits.set(hits.get() + 1);
        })
      )
    };

    assert_eq!(
      button.dispatch(&HostEvent::click()),
      1
    );
    assert_eq!(
      button.dispatch(&HostEvent::key_up(
        "Escape"
      )),
      0
    );
    drop(listener);
    assert_eq!(
      button.dispatch(&HostEvent::click()),
      0
    );
    assert_eq!(hits.get(), 1);
    assert_eq!(page.live_listeners(), 0);
  }
}
