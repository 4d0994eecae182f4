mod control;
mod print;
mod value;

pub use control::{Choice, ChoiceSet, ControlOptions, ControlState, FieldParameter};
pub use print::{FieldInfo, PrintCallerParams, PrintOverrides, PrintParams};
pub use value::{FieldValue, ValueKind};
