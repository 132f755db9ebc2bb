//! vrg: VergeOS command-line client
//!
//! Cloud snapshot management over the VergeOS v4 REST API, with a small
//! column-definition table formatter for human-readable output.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod snapshot;
pub mod table;
