//! Process exit codes.

use exemplar_core::errors::error_code;
use exemplar_core::errors::ErrorCode;
use exemplar_core::ExemplarError;

pub const EXIT_SUCCESS: i32 = 0;

/// General error (unspecified).
pub const EXIT_ERROR: i32 = 1;

/// Missing or invalid configuration.
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Corpus validation found errors.
pub const EXIT_VALIDATION_FAILED: i32 = 5;

/// Bad arguments: unknown table, id out of range, unsupported option.
pub const EXIT_INVALID_INPUT: i32 = 6;

/// The vector store or an embedding provider could not be reached.
pub const EXIT_SERVICE_UNAVAILABLE: i32 = 7;

pub fn exit_code_for(err: &ExemplarError) -> i32 {
    match err.error_code() {
        error_code::CONFIG_ERROR => EXIT_CONFIG_ERROR,
        error_code::UNKNOWN_TABLE | error_code::CORPUS_ID_OUT_OF_RANGE => EXIT_INVALID_INPUT,
        error_code::STORE_UNAVAILABLE | error_code::PROVIDER_UNAVAILABLE => {
            EXIT_SERVICE_UNAVAILABLE
        }
        _ => EXIT_ERROR,
    }
}
