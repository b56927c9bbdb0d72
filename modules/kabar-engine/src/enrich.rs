use std::sync::Arc;

use tracing::info;

use kabar_common::{ArticleRecord, KabarError};

use crate::clean::normalize_content;
use crate::traits::{ArticleScorer, TextEmbedder, TopicClassifier};

/// Work performed by one enrichment pass. A fully enriched batch reports
/// zeros everywhere; enrichment is idempotent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EnrichStats {
    pub cleaned: u32,
    pub embedded: u32,
    pub scored: u32,
    pub classified: u32,
}

/// Fills missing article features in place: normalized content, embedding,
/// bias/hoax/ideology scores, topic label. Compute-if-absent only: a value
/// that is already present is never recomputed or overwritten, so re-running
/// enrichment over a half-processed batch finishes the gaps and touches
/// nothing else.
pub struct Enricher {
    embedder: Arc<dyn TextEmbedder>,
    scorer: Arc<dyn ArticleScorer>,
    classifier: Arc<dyn TopicClassifier>,
}

impl Enricher {
    pub fn new(
        embedder: Arc<dyn TextEmbedder>,
        scorer: Arc<dyn ArticleScorer>,
        classifier: Arc<dyn TopicClassifier>,
    ) -> Self {
        Self {
            embedder,
            scorer,
            classifier,
        }
    }

    /// Enrich a batch. Any collaborator failure fails the whole batch:
    /// features written before the failure remain (they are valid), but the
    /// caller gets no partial success signal to persist group IDs from.
    pub async fn enrich(&self, articles: &mut [ArticleRecord]) -> Result<EnrichStats, KabarError> {
        let mut stats = EnrichStats::default();

        for article in articles.iter_mut() {
            if article.cleaned.is_none() {
                article.cleaned = Some(normalize_content(&article.content));
                stats.cleaned += 1;
            }
        }

        // Embeddings go to the model in one batch call; raw content, not
        // the normalized text, carries the semantics worth embedding.
        let missing: Vec<usize> = articles
            .iter()
            .enumerate()
            .filter(|(_, a)| a.embedding.is_none())
            .map(|(i, _)| i)
            .collect();
        if !missing.is_empty() {
            let texts: Vec<String> = missing.iter().map(|&i| articles[i].content.clone()).collect();
            let vectors = self
                .embedder
                .embed_batch(texts)
                .await
                .map_err(|e| KabarError::Embedding(e.to_string()))?;
            if vectors.len() != missing.len() {
                return Err(KabarError::Embedding(format!(
                    "batch embedding returned {} vectors for {} texts",
                    vectors.len(),
                    missing.len()
                )));
            }
            for (&index, vector) in missing.iter().zip(vectors) {
                articles[index].embedding = Some(vector);
                stats.embedded += 1;
            }
        }

        for article in articles.iter_mut() {
            let text = article.cleaned.clone().unwrap_or_default();
            let mut scored = false;
            if article.bias.is_none() {
                article.bias = Some(
                    self.scorer
                        .bias(&text)
                        .await
                        .map_err(|e| KabarError::Scoring(e.to_string()))?,
                );
                scored = true;
            }
            if article.hoax.is_none() {
                article.hoax = Some(
                    self.scorer
                        .hoax(&text)
                        .await
                        .map_err(|e| KabarError::Scoring(e.to_string()))?,
                );
                scored = true;
            }
            if article.ideology.is_none() {
                article.ideology = Some(
                    self.scorer
                        .ideology(&text)
                        .await
                        .map_err(|e| KabarError::Scoring(e.to_string()))?,
                );
                scored = true;
            }
            if scored {
                stats.scored += 1;
            }
        }

        for article in articles.iter_mut() {
            if article.topic.is_none() {
                if let Some(embedding) = article.embedding.clone() {
                    article.topic = Some(
                        self.classifier
                            .classify(&embedding)
                            .await
                            .map_err(|e| KabarError::Classification(e.to_string()))?,
                    );
                    stats.classified += 1;
                }
            }
        }

        info!(
            articles = articles.len(),
            cleaned = stats.cleaned,
            embedded = stats.embedded,
            scored = stats.scored,
            classified = stats.classified,
            "Enrichment pass complete"
        );

        Ok(stats)
    }
}
