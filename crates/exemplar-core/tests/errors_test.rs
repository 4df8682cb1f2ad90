//! Error codes and aggregate conversions.

use exemplar_core::errors::{
    CorpusError, ErrorCode, ExemplarError, RetrievalError, SchemaError, StorageError,
    SynthesisError,
};

#[test]
fn subsystem_errors_convert_into_aggregate() {
    let err: ExemplarError = CorpusError::IdOutOfRange { id: 7, len: 3 }.into();
    assert_eq!(err.error_code(), "CORPUS_ID_OUT_OF_RANGE");
    assert!(err.to_string().contains("#7"));

    let err: ExemplarError = StorageError::MigrationFailed {
        version: 1,
        message: "boom".into(),
    }
    .into();
    assert_eq!(err.error_code(), "MIGRATION_FAILED");
}

#[test]
fn synthesis_error_delegates_schema_codes() {
    let err = SynthesisError::from(SchemaError::UnknownTable {
        table: "ghost".into(),
    });
    assert_eq!(err.error_code(), "UNKNOWN_TABLE");
    let err: ExemplarError = err.into();
    assert_eq!(err.error_code(), "UNKNOWN_TABLE");
}

#[test]
fn coded_string_prefixes_code() {
    let err = RetrievalError::SearchFailed {
        reason: "no such collection".into(),
    };
    assert_eq!(
        err.coded_string(),
        "[RETRIEVAL_ERROR] search failed: no such collection"
    );
}
