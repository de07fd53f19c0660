//! Subcommand implementations.

pub(crate) mod config;
pub(crate) mod open;
pub(crate) mod register;
pub(crate) mod resolve;
