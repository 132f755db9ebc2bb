//! Configuration sources: global file and environment.

pub mod environment;
pub mod global_file;
