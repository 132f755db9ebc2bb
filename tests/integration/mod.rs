//! Integration tests for the vrg command-line client

mod test_utils;

mod binary_exit_codes;
mod client_http;
mod config_loading;

pub use test_utils::with_xdg_env;
