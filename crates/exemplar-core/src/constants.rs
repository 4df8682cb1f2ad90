/// Exemplar toolkit version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fixed row cap appended to every synthesized query.
pub const SYNTHESIS_ROW_LIMIT: usize = 200;

/// Alias prefix for tables in a synthesized query (`t0`, `t1`, ...).
pub const TABLE_ALIAS_PREFIX: &str = "t";

/// Example id returned when no index or no corpus is available.
pub const SENTINEL_EXAMPLE_ID: usize = 0;

/// Score paired with the sentinel id.
pub const SENTINEL_SCORE: f64 = 0.0;

/// Suffix appended to the corpus file name when a backup is written.
pub const CORPUS_BACKUP_EXTENSION: &str = "json.backup";

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV_VAR: &str = "EXEMPLAR_LOG";

/// Project-level config file name.
pub const CONFIG_FILE_NAME: &str = "exemplar.toml";
