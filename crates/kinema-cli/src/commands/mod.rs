//! CLI command implementations.

pub mod common;
pub mod presets;
pub mod simulate;
pub mod timing;
pub mod validate;
