//! Chart domain: document model, limit models, scales and formatting.

pub mod config;
pub mod format;
pub mod limits;
pub mod model;
pub mod platform;
pub mod scale;
