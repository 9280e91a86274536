use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::cli::ReplayStep;
use crate::listeners::HostEvent;
use crate::session::PickerSession;
use crate::simulated::{
  SimulatedPage,
  SimulatedTarget
};
use crate::visibility::Visibility;

#[derive(Debug, Clone, Serialize)]
pub struct ReplayEntry {
  pub step:           String,
  pub visibility:     Option<Visibility>,
  pub emitted:        Vec<String>,
  pub live_listeners: usize
}

#[derive(
  Debug, Clone, Default, Serialize,
)]
pub struct Transcript {
  pub entries: Vec<ReplayEntry>
}

impl Transcript {
  pub fn lines(
    &self
  ) -> impl Iterator<Item = String> + '_ {
    self.entries.iter().map(|entry| {
      let state = entry
        .visibility
        .map_or_else(
          || "unmounted".to_string(),
          |state| state.to_string()
        );
      let mut line = format!(
        "{:<32} state={state:<9} listeners={}",
        entry.step,
        entry.live_listeners
      );
      for value in &entry.emitted {
        line.push_str(&format!(
          " onChange({value:?})"
        ));
      }
      line
    })
  }
}

/// Mounts a picker on a fresh simulated
/// page and applies `steps` in order.
/// Steps after `unmount` still dispatch
/// to the page, so leaked listeners
/// would show up.
#[must_use]
pub fn replay(
  steps: &[ReplayStep]
) -> Transcript {
  let mut page = SimulatedPage::new();
  let mut trigger: Option<SimulatedTarget> =
    Some(page.create_element());
  let emitted =
    Rc::new(RefCell::new(Vec::new()));

  let mut session = {
    let emitted = Rc::clone(&emitted);
    Some(PickerSession::mount(
      page.document(),
      trigger
        .as_ref()
        .map(|el| (el.id(), el)),
      move |value: String| {
        emitted.borrow_mut().push(value);
      }
    ))
  };

  let mut transcript = Transcript {
    entries: vec![ReplayEntry {
      step:           "mount".to_string(),
      visibility:     session
        .as_ref()
        .map(PickerSession::visibility),
      emitted:        Vec::new(),
      live_listeners: page
        .live_listeners()
    }]
  };

  for step in steps {
    match step {
      | ReplayStep::Click => {
        if let Some(el) = &trigger {
          el.dispatch(&HostEvent::click());
        }
      }
      | ReplayStep::Key(key) => {
        page.document().dispatch(
          &HostEvent::key_up(key.as_str())
        );
      }
      | ReplayStep::Dismiss => {
        if let Some(session) = &session {
          session.dismiss();
        }
      }
      | ReplayStep::Select(value) => {
        if let Some(session) = &session {
          session.select(value.as_str());
        }
      }
      | ReplayStep::Retarget => {
        let next = page.create_element();
        if let Some(session) = &mut session
        {
          session.retarget(Some((
            next.id(),
            &next
          )));
        }
        trigger = Some(next);
      }
      | ReplayStep::DetachTrigger => {
        if let Some(session) = &mut session
        {
          session.retarget(None);
        }
      }
      | ReplayStep::Unmount => {
        if let Some(session) =
          session.take()
        {
          session.unmount();
        }
      }
    }

    transcript.entries.push(ReplayEntry {
      step:           step.to_string(),
      visibility:     session
        .as_ref()
        .map(PickerSession::visibility),
      emitted:        emitted
        .borrow_mut()
        .drain(..)
        .collect(),
      live_listeners: page
        .live_listeners()
    });
  }

  transcript
}
