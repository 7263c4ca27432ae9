//! Command-line surface.

pub mod commands;
