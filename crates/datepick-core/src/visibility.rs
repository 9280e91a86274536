use std::fmt;

use serde::Serialize;

/// Open/closed state of the popover.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
  #[default]
  Closed,
  Open
}

#[derive(
  Debug, Clone, PartialEq, Eq, Hash,
)]
pub enum Key {
  Escape,
  Enter,
  Other(String)
}

impl Key {
  /// Maps a DOM `KeyboardEvent.key`
  /// value.
  #[must_use]
  pub fn from_dom(raw: &str) -> Self {
    match raw {
      | "Escape" | "Esc" => Self::Escape,
      | "Enter" => Self::Enter,
      | other => {
        Self::Other(other.to_string())
      }
    }
  }

  #[must_use]
  pub fn closes_popover(&self) -> bool {
    matches!(
      self,
      Self::Escape | Self::Enter
    )
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq, Hash,
)]
pub enum VisibilityEvent {
  TriggerClick,
  Dismiss,
  KeyUp(Key),
  Selected
}

impl Visibility {
  #[must_use]
  pub fn is_open(self) -> bool {
    self == Self::Open
  }

  #[must_use]
  pub fn toggled(self) -> Self {
    match self {
      | Self::Closed => Self::Open,
      | Self::Open => Self::Closed
    }
  }

  /// The whole transition table.
  #[must_use]
  pub fn apply(
    self,
    event: &VisibilityEvent
  ) -> Self {
    let next = match event {
      | VisibilityEvent::TriggerClick => {
        self.toggled()
      }
      | VisibilityEvent::Dismiss
      | VisibilityEvent::Selected => {
        Self::Closed
      }
      | VisibilityEvent::KeyUp(key)
        if key.closes_popover() =>
      {
        Self::Closed
      }
      | VisibilityEvent::KeyUp(_) => self
    };

    if next == self {
      tracing::trace!(
        state = %self,
        ?event,
        "visibility unchanged"
      );
    } else {
      tracing::debug!(
        from = %self,
        to = %next,
        ?event,
        "visibility transition"
      );
    }

    next
  }
}

impl fmt::Display for Visibility {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(match self {
      | Self::Closed => "closed",
      | Self::Open => "open"
    })
  }
}
