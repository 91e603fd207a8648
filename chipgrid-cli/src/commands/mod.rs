//! CLI subcommands.

pub mod grid;
pub mod split;
