mod fields;
mod page;

pub use fields::{
    ChoiceMarks, choice_lines, config_error, config_invalid, control_frame, help_block, value_lines,
};
pub use page::{PageHeader, page_header, settings_lines};
