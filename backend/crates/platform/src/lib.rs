//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - ClamAV daemon client (`zINSTREAM` / `zPING`)
//! - Uploaded image validation (MIME allow-list, size limit, virus scan)
//! - Script / SQL injection screening for free-text input
//! - Environment configuration helpers

pub mod clamav;
pub mod config;
pub mod image;
pub mod multipart;
pub mod sanitize;
