// Single source of truth for all default values.

// --- Synthesis ---
pub const DEFAULT_ROW_LIMIT: usize = 200;
pub const DEFAULT_FALLBACK_QUESTION: &str = "Query the data";

// --- Embeddings ---
pub const DEFAULT_EMBEDDING_PROVIDER: &str = "tfidf";
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;
pub const DEFAULT_EMBEDDING_API_ENDPOINT: &str = "https://api.openai.com/v1/embeddings";
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_L1_CACHE_SIZE: u64 = 10_000;

// --- Retrieval ---
pub const DEFAULT_RETRIEVAL_BACKEND: &str = "durable";
pub const DEFAULT_CORPUS_PATH: &str = "fewshot/questions.json";
pub const DEFAULT_STORE_PATH: &str = ".vectordb";
pub const DEFAULT_COLLECTION: &str = "fewshot_examples";
pub const DEFAULT_K: usize = 1;

// --- Generation ---
pub const DEFAULT_GENERATION_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_GENERATION_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f64 = 0.0;
pub const DEFAULT_TOP_P: f64 = 1.0;
pub const DEFAULT_MAX_TOKENS: u32 = 800;
pub const DEFAULT_MAX_RETRIES: u32 = 50;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 2_000;

/// Recognised `[embedding] provider` values.
pub const EMBEDDING_PROVIDERS: &[&str] = &["tfidf", "api"];

/// Recognised `[retrieval] backend` values.
pub const RETRIEVAL_BACKENDS: &[&str] = &["durable", "ephemeral"];
