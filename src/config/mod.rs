//! Layered configuration.
//!
//! Two merge shapes are used across the crate:
//! - control options: defaults deep-merged with caller options ([`deep_merge`])
//! - print parameters and settings: ordered scopes applied key by key
//!   ([`OverrideLayers`], [`overlay`])

mod layers;
mod merge;

pub use layers::{
    OverrideLayers, OverrideScope, default_print_params, field_function_id, resolve_print_params,
};
pub use merge::{deep_merge, overlay};
