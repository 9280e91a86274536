use datepick_core::listeners::EventKind;
use datepick_core::placement::Placement;
use gloo::events::EventListener;
use yew::{
  Callback,
  Html,
  NodeRef,
  Properties,
  classes,
  function_component,
  html,
  use_effect_with,
  use_node_ref
};

use crate::dom::event_within;

#[derive(Properties, PartialEq)]
pub struct PopperProps {
  pub open:       bool,
  pub button_ref: NodeRef,
  #[prop_or_default]
  pub placement:  Placement,
  pub on_close:   Callback<()>,
  #[prop_or_default]
  pub title:      Option<String>,
  #[prop_or_default]
  pub children:   Html
}

/// Floating container for the calendar.
/// Reports presses outside itself and
/// its button through `on_close`.
#[function_component(Popper)]
pub fn popper(
  props: &PopperProps
) -> Html {
  let popper_ref = use_node_ref();

  {
    let popper_ref = popper_ref.clone();
    let button_ref =
      props.button_ref.clone();
    let on_close = props.on_close.clone();
    use_effect_with(
      props.open,
      move |open| {
        let mut listeners = Vec::new();
        if *open
          && let Some(document) =
            web_sys::window().and_then(
              |window| window.document()
            )
        {
          for kind in [
            EventKind::MouseDown,
            EventKind::TouchStart
          ] {
            let popper_ref =
              popper_ref.clone();
            let button_ref =
              button_ref.clone();
            let on_close = on_close.clone();
            listeners.push(
              EventListener::new(
                &document,
                kind.dom_name(),
                move |event| {
                  // The trigger toggles on its
                  // own click.
                  if event_within(
                    event,
                    &popper_ref
                  ) || event_within(
                    event,
                    &button_ref
                  ) {
                    return;
                  }
                  tracing::debug!(
                    kind = %kind,
                    "outside interaction; closing popper"
                  );
                  on_close.emit(());
                }
              )
            );
          }
        }
        move || drop(listeners)
      }
    );
  }

  if !props.open {
    return html! {};
  }

  let on_close_click = {
    let on_close = props.on_close.clone();
    Callback::from(
      move |_: yew::MouseEvent| {
        on_close.emit(());
      }
    )
  };

  html! {
      <div
          ref={popper_ref}
          class={classes!(
              "datepick-popper",
              format!("datepick-popper_{}", props.placement.as_key()),
              props.title.is_some().then_some("datepick-popper_mobile")
          )}
      >
          {
              if let Some(title) = &props.title {
                  html! {
                      <div class="datepick-popper-header">
                          <div class="datepick-popper-header__title">{ title }</div>
                          <button
                              class="btn datepick-popper-header__close"
                              type="button"
                              onclick={on_close_click}
                          >
                              { "×" }
                          </button>
                      </div>
                  }
              } else {
                  html! {}
              }
          }
          { props.children.clone() }
      </div>
  }
}
