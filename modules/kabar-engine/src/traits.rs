// Trait abstractions for the pipeline's external collaborators.
//
// Embeddings, bias/hoax/ideology scores, topic labels, and story copy all
// come from models or services this workspace does not own. Each concern is
// one narrow trait so the engine stays testable with deterministic mocks:
// no network, no model files, `cargo test` in seconds.

use anyhow::Result;
use async_trait::async_trait;

use kabar_common::{ArticleRecord, StoryCopy};

// ---------------------------------------------------------------------------
// TextEmbedder — embedding model
// ---------------------------------------------------------------------------

#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed multiple texts in a batch.
    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>>;
}

// ---------------------------------------------------------------------------
// ArticleScorer — bias / hoax / ideology classifiers
// ---------------------------------------------------------------------------

/// Scores normalized article text. Each score lands in [0, 1]; the scale's
/// meaning belongs to the model, not the pipeline.
#[async_trait]
pub trait ArticleScorer: Send + Sync {
    async fn bias(&self, text: &str) -> Result<f32>;

    async fn hoax(&self, text: &str) -> Result<f32>;

    async fn ideology(&self, text: &str) -> Result<f32>;
}

// ---------------------------------------------------------------------------
// TopicClassifier — pretrained clustering over embeddings
// ---------------------------------------------------------------------------

#[async_trait]
pub trait TopicClassifier: Send + Sync {
    /// Assign an embedding to one of the pretrained topic clusters.
    async fn classify(&self, embedding: &[f32]) -> Result<u8>;
}

// ---------------------------------------------------------------------------
// StoryComposer — LLM copywriting for a finished group
// ---------------------------------------------------------------------------

#[async_trait]
pub trait StoryComposer: Send + Sync {
    /// Write an aggregated title, summary, and analysis for one group of
    /// near-duplicate articles. Runs only after grouping completes.
    async fn compose(&self, articles: &[&ArticleRecord]) -> Result<StoryCopy>;
}
