//! The state-to-raster pipeline: payload derivation, safe-zone validation,
//! debounced orchestration, and logo compositing.

pub mod content;
pub mod logo;
pub mod orchestrator;
pub mod safe_zone;
