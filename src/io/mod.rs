mod format;
mod input;
mod output;

pub use format::DocumentFormat;
pub use input::{parse_document_str, serialize_document};
pub use output::{OutputDestination, OutputOptions, emit_text, text_to_plain};
