use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cosine similarity at or above which two articles are duplicates.
    pub similarity_threshold: f64,

    /// Embedding dimensionality for this deployment.
    pub embedding_dim: usize,
}

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.9;
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults. Panics with a clear message if a set var is unparseable.
    pub fn from_env() -> Self {
        Self {
            similarity_threshold: env::var("SIMILARITY_THRESHOLD")
                .map(|v| {
                    v.parse()
                        .expect("SIMILARITY_THRESHOLD must be a float in [-1, 1]")
                })
                .unwrap_or(DEFAULT_SIMILARITY_THRESHOLD),
            embedding_dim: env::var("EMBEDDING_DIM")
                .map(|v| v.parse().expect("EMBEDDING_DIM must be a positive integer"))
                .unwrap_or(DEFAULT_EMBEDDING_DIM),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
        }
    }
}
