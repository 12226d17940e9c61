//! Modules layer - Infrastructure components for external integrations
//!
//! Object storage (MinIO) for photos and PDF rendering for report exports.

pub mod pdf;
pub mod storage;
