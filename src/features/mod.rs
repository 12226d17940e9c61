//! Features layer - one module per HTTP resource
//!
//! Each feature follows the same layout: dtos, handlers, models, routes and services.

pub mod items;
pub mod photos;
pub mod reports;
pub mod settings;
