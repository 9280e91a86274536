use datepick_core::instant::RawDateInput;
use yew::{
  Callback,
  Html,
  function_component,
  html,
  use_node_ref,
  use_state
};

use crate::components::DatePicker;
use crate::config::ui_debug;

const INITIAL_VALUE: &str =
  "2024-01-15T10:00:00Z";
const MAX_LOG_LINES: usize = 8;

#[function_component(App)]
pub fn app() -> Html {
  let value = use_state(|| {
    INITIAL_VALUE.to_string()
  });
  let history =
    use_state(Vec::<String>::new);
  let trigger_ref = use_node_ref();

  let on_change = {
    let value = value.clone();
    let history = history.clone();
    Callback::from(move |next: String| {
      ui_debug("app.change", &next);
      let mut lines = (*history).clone();
      lines.insert(0, next.clone());
      lines.truncate(MAX_LOG_LINES);
      history.set(lines);
      value.set(next);
    })
  };

  html! {
      <main class="datepick-demo">
          <h1>{ "datepick" }</h1>
          <div class="datepick-demo__field">
              <button
                  ref={trigger_ref.clone()}
                  type="button"
                  class="btn datepick-demo__trigger"
              >
                  { (*value).clone() }
              </button>
              <DatePicker
                  date={RawDateInput::from((*value).clone())}
                  target_ref={trigger_ref}
                  label={Some("Select date".to_string())}
                  on_change={on_change}
              />
          </div>
          <ul class="datepick-demo__log">
              {
                  for history.iter().map(|line| html! {
                      <li>{ line }</li>
                  })
              }
          </ul>
      </main>
  }
}
