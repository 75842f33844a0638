//! CLI command handlers

pub mod lookup;
pub mod trail;
