use std::fmt;

use serde::Serialize;

/// Events the picker subscribes to.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
  Click,
  KeyUp,
  MouseDown,
  TouchStart,
  Resize
}

impl EventKind {
  #[must_use]
  pub fn dom_name(self) -> &'static str {
    match self {
      | Self::Click => "click",
      | Self::KeyUp => "keyup",
      | Self::MouseDown => "mousedown",
      | Self::TouchStart => "touchstart",
      | Self::Resize => "resize"
    }
  }
}

impl fmt::Display for EventKind {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.dom_name())
  }
}

/// Host-neutral view of a dispatched
/// event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEvent {
  pub kind: EventKind,
  pub key:  Option<String>
}

impl HostEvent {
  #[must_use]
  pub fn click() -> Self {
    Self {
      kind: EventKind::Click,
      key:  None
    }
  }

  #[must_use]
  pub fn key_up(
    key: impl Into<String>
  ) -> Self {
    Self {
      kind: EventKind::KeyUp,
      key:  Some(key.into())
    }
  }
}

pub type Handler =
  Box<dyn FnMut(&HostEvent)>;

/// Something listeners can be attached
/// to. The returned listener owns the
/// registration and removes it when
/// dropped.
pub trait EventHost {
  type Listener;

  fn listen(
    &self,
    kind: EventKind,
    handler: Handler
  ) -> Self::Listener;
}

/// Identity of an externally owned
/// target.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
)]
pub struct TargetId(pub u64);

impl TargetId {
  pub const DOCUMENT: Self = Self(0);
}

impl fmt::Display for TargetId {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    write!(f, "target#{}", self.0)
  }
}

/// Holds at most one listener, tagged
/// with the target it was bound to.
pub struct ScopedListener<L> {
  label: &'static str,
  bound: Option<(TargetId, L)>
}

impl<L> ScopedListener<L> {
  #[must_use]
  pub fn new(label: &'static str) -> Self {
    Self {
      label,
      bound: None
    }
  }

  /// Rebinds to `target`. The old
  /// listener is released before
  /// `attach` runs; binding to the same
  /// target again is a no-op and a
  /// missing target only releases.
  pub fn bind<T, F>(
    &mut self,
    target: Option<(TargetId, T)>,
    attach: F
  ) where
    F: FnOnce(T) -> L
  {
    let Some((identity, host)) = target
    else {
      tracing::debug!(
        listener = self.label,
        "target missing; nothing to attach"
      );
      self.release();
      return;
    };

    if self.bound_to() == Some(identity) {
      return;
    }

    self.release();
    self.bound =
      Some((identity, attach(host)));
    tracing::debug!(
      listener = self.label,
      target = %identity,
      "attached listener"
    );
  }

  pub fn release(&mut self) {
    if let Some((identity, listener)) =
      self.bound.take()
    {
      drop(listener);
      tracing::debug!(
        listener = self.label,
        target = %identity,
        "released listener"
      );
    }
  }

  #[must_use]
  pub fn bound_to(
    &self
  ) -> Option<TargetId> {
    self
      .bound
      .as_ref()
      .map(|(identity, _)| *identity)
  }

  #[must_use]
  pub fn is_bound(&self) -> bool {
    self.bound.is_some()
  }
}

impl<L> Drop for ScopedListener<L> {
  fn drop(&mut self) {
    self.release();
  }
}
