//! QR Studio - live QR code generator with logo overlays
//!
//! This crate provides a reactive state-to-render pipeline for generating
//! scannable QR images: a change-observed form state, debounced render
//! orchestration, optional logo compositing, and download/clipboard actions.

pub mod actions;
pub mod cli;
pub mod core;
pub mod render;
pub mod state;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::{
    app::{App, ContentField, ControlEvent},
    config::AppConfig,
    error::{AppError, AppResult},
    models::{Color, FormState, Notification, QrKind, WifiSecurity},
};

pub use render::{
    content::payload,
    orchestrator::{secondary_edge, RasterSlots, UiEvent},
    safe_zone::{check as check_safe_zone, SafeZoneStatus},
};

pub use state::{ChangeEvent, Field, FieldValue, StateContainer};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
