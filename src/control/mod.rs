//! Field control lifecycle.

pub mod components;
mod engine;
mod error;
mod hooks;
mod print;

pub use engine::Control;
pub use error::ControlError;
pub use hooks::FieldControl;
pub use print::FIELD_FUNCTION_GROUP;
