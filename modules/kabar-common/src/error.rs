use thiserror::Error;

#[derive(Error, Debug)]
pub enum KabarError {
    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Scoring error: {0}")]
    Scoring(String),

    #[error("Classification error: {0}")]
    Classification(String),

    #[error("Clustering error: {0}")]
    Clustering(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
