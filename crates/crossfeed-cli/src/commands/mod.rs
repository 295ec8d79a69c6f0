//! CLI command implementations.

pub mod common;
pub mod presets;
pub mod process;
pub mod response;
