//! Built-in field types.

mod checklist;
mod choice;
pub(crate) mod helpers;
mod text;

pub use checklist::{CHECKLIST_FIELD_TYPE, ChecklistControl};
pub use choice::{CHOICE_FIELD_TYPE, ChoiceControl};
pub use text::{TEXT_FIELD_TYPE, TextControl};
