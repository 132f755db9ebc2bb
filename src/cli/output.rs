//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::VrgError;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &VrgError) -> String {
    format!("Error: {}", e)
}

/// Process exit status for an error.
pub fn exit_code(e: &VrgError) -> i32 {
    e.exit_code()
}
