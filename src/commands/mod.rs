//! CLI commands

pub mod list;
pub mod regenerate;
pub mod show;
