//! On-disk persistence: application configuration and exported text.

pub mod config;
pub mod text_export;
