//! Tabletop character generator: parses an archetype catalog and composes
//! characters from two to four archetypes.

pub mod catalog;
pub mod cli;
pub mod compose;
pub mod config;
pub mod context;
pub mod render;
pub mod server;
