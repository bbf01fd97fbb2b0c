//! Database and configuration models.

pub mod advocate;
pub mod config;
