use datepick_core::listeners::{
  EventHost,
  EventKind,
  Handler,
  HostEvent
};
use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{
  Element,
  Event,
  EventTarget,
  KeyboardEvent,
  Node
};
use yew::NodeRef;

/// A browser event target. Listeners are
/// `gloo` listeners, removed on drop.
#[derive(Clone)]
pub struct DomTarget(EventTarget);

impl DomTarget {
  pub fn document() -> Option<Self> {
    web_sys::window()
      .and_then(|window| window.document())
      .map(|document| Self(document.into()))
  }

  pub fn window() -> Option<Self> {
    web_sys::window()
      .map(|window| Self(window.into()))
  }

  pub fn from_node_ref(
    node_ref: &NodeRef
  ) -> Option<Self> {
    node_ref
      .get()
      .map(|node| Self(node.into()))
  }
}

impl EventHost for DomTarget {
  type Listener = EventListener;

  fn listen(
    &self,
    kind: EventKind,
    mut handler: Handler
  ) -> EventListener {
    EventListener::new(
      &self.0,
      kind.dom_name(),
      move |event| {
        handler(&host_event(kind, event));
      }
    )
  }
}

fn host_event(
  kind: EventKind,
  event: &Event
) -> HostEvent {
  HostEvent {
    kind,
    key: event
      .dyn_ref::<KeyboardEvent>()
      .map(KeyboardEvent::key)
  }
}

/// Whether the event started inside the
/// element behind `node_ref`.
pub fn event_within(
  event: &Event,
  node_ref: &NodeRef
) -> bool {
  let Some(container) =
    node_ref.cast::<Element>()
  else {
    return false;
  };

  event
    .target()
    .and_then(|target| {
      target.dyn_into::<Node>().ok()
    })
    .is_some_and(|node| {
      container.contains(Some(&node))
    })
}
