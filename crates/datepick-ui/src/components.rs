mod calendar;
mod date_picker;
mod popper;

pub use calendar::Calendar;
pub use date_picker::DatePicker;
pub use popper::Popper;
