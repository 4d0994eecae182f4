//! Markup building blocks shared by controls and settings pages.
//!
//! Rendered output is a styled [`Text`]: the host decides whether to draw it in a
//! terminal frame or flatten it for batch printing.

mod components;

use ratatui::text::Text;

pub use components::{
    ChoiceMarks, PageHeader, choice_lines, config_error, config_invalid, control_frame, help_block,
    page_header, settings_lines, value_lines,
};

/// Rendered output of a control or settings page.
pub type Markup = Text<'static>;

/// Column width used when wrapping free text.
pub const DEFAULT_WRAP_WIDTH: usize = 72;
