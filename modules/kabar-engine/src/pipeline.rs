use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use kabar_cluster::{mode_label, partition, DedupConfig};
use kabar_common::{ArticleRecord, Config, IdeologyCounts, KabarError, StoryCopy, StoryDraft};

use crate::enrich::Enricher;
use crate::traits::{ArticleScorer, StoryComposer, TextEmbedder, TopicClassifier};

/// Orchestrates one batch end to end:
/// 1. Validate the batch
/// 2. Enrich missing features (compute-if-absent)
/// 3. Partition into duplicate groups
/// 4. Assemble one story draft per group
///
/// The caller persists the returned articles (now carrying group IDs) and
/// drafts, and is responsible for deriving `id_offset` from its store
/// (typically `1 + max stored group id`) under whatever locking keeps two
/// concurrent batches from colliding.
pub struct Pipeline {
    enricher: Enricher,
    composer: Arc<dyn StoryComposer>,
    similarity_threshold: f64,
    /// Deployment embedding dimensionality, enforced when known.
    expected_dim: Option<usize>,
}

/// Everything one run produces.
#[derive(Debug)]
pub struct PipelineOutcome {
    /// The input batch, enriched and carrying assigned `group_id`s.
    pub articles: Vec<ArticleRecord>,
    /// One draft per distinct group ID, ascending.
    pub stories: Vec<StoryDraft>,
    pub stats: PipelineStats,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PipelineStats {
    pub articles: usize,
    pub embedded: u32,
    pub scored: u32,
    pub classified: u32,
    pub similarity_edges: usize,
    pub duplicate_groups: usize,
    pub singletons: usize,
    pub stories_composed: u32,
    pub compose_fallbacks: u32,
}

impl std::fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Batch Run Complete ===")?;
        writeln!(f, "Articles:          {}", self.articles)?;
        writeln!(f, "Newly embedded:    {}", self.embedded)?;
        writeln!(f, "Newly scored:      {}", self.scored)?;
        writeln!(f, "Newly classified:  {}", self.classified)?;
        writeln!(f, "Similarity edges:  {}", self.similarity_edges)?;
        writeln!(f, "Duplicate groups:  {}", self.duplicate_groups)?;
        writeln!(f, "Singletons:        {}", self.singletons)?;
        writeln!(f, "Stories composed:  {}", self.stories_composed)?;
        writeln!(f, "Compose fallbacks: {}", self.compose_fallbacks)?;
        Ok(())
    }
}

impl Pipeline {
    pub fn new(
        embedder: Arc<dyn TextEmbedder>,
        scorer: Arc<dyn ArticleScorer>,
        classifier: Arc<dyn TopicClassifier>,
        composer: Arc<dyn StoryComposer>,
        similarity_threshold: f64,
    ) -> Self {
        Self {
            enricher: Enricher::new(embedder, scorer, classifier),
            composer,
            similarity_threshold,
            expected_dim: None,
        }
    }

    /// Build from the deployment config, enforcing its embedding
    /// dimensionality on every batch.
    pub fn from_config(
        embedder: Arc<dyn TextEmbedder>,
        scorer: Arc<dyn ArticleScorer>,
        classifier: Arc<dyn TopicClassifier>,
        composer: Arc<dyn StoryComposer>,
        config: &Config,
    ) -> Self {
        Self {
            enricher: Enricher::new(embedder, scorer, classifier),
            composer,
            similarity_threshold: config.similarity_threshold,
            expected_dim: Some(config.embedding_dim),
        }
    }

    /// Run one batch. An empty batch is a no-op, not an error. Group IDs
    /// are only written onto the articles after the whole partition
    /// succeeds; an error leaves every `group_id` as it came in.
    pub async fn run(
        &self,
        mut articles: Vec<ArticleRecord>,
        id_offset: i64,
    ) -> Result<PipelineOutcome, KabarError> {
        if articles.is_empty() {
            return Ok(PipelineOutcome {
                articles,
                stories: Vec::new(),
                stats: PipelineStats::default(),
            });
        }

        let mut seen_ids = HashSet::new();
        for article in &articles {
            if !seen_ids.insert(article.id) {
                return Err(KabarError::Validation(format!(
                    "duplicate article id {} in batch",
                    article.id
                )));
            }
        }

        let enrich_stats = self.enricher.enrich(&mut articles).await?;

        let embeddings: Vec<Vec<f32>> = articles
            .iter()
            .map(|a| {
                a.embedding
                    .clone()
                    .ok_or_else(|| KabarError::Embedding(format!("article {} has no embedding after enrichment", a.id)))
            })
            .collect::<Result<_, _>>()?;

        if let Some(expected) = self.expected_dim {
            for (article, embedding) in articles.iter().zip(&embeddings) {
                if embedding.len() != expected {
                    return Err(KabarError::Validation(format!(
                        "article {} embedding has {} dimensions, deployment expects {}",
                        article.id,
                        embedding.len(),
                        expected
                    )));
                }
            }
        }

        let config = DedupConfig {
            similarity_threshold: self.similarity_threshold,
            id_offset,
        };
        let parts = partition(&embeddings, &config)
            .map_err(|e| KabarError::Clustering(e.to_string()))?;

        for (article, &group_id) in articles.iter_mut().zip(&parts.group_ids) {
            article.group_id = Some(group_id);
        }

        let mut stats = PipelineStats {
            articles: articles.len(),
            embedded: enrich_stats.embedded,
            scored: enrich_stats.scored,
            classified: enrich_stats.classified,
            similarity_edges: parts.stats.similarity_edges,
            duplicate_groups: parts.stats.duplicate_groups,
            singletons: parts.stats.singletons,
            ..PipelineStats::default()
        };

        let mut stories = Vec::with_capacity(parts.groups.len());
        for group in &parts.groups {
            let members: Vec<&ArticleRecord> =
                group.members.iter().map(|&index| &articles[index]).collect();

            // Groups whose members were never classified have no labels to
            // reduce; the draft carries no topic rather than a fabricated one.
            let labels: Vec<u8> = members.iter().filter_map(|a| a.topic).collect();
            let topic = mode_label(&labels).ok();

            let ideology = IdeologyCounts::tally(members.iter().filter_map(|a| a.ideology.as_ref()));

            let copy = match self.composer.compose(&members).await {
                Ok(copy) => {
                    stats.stories_composed += 1;
                    copy
                }
                Err(e) => {
                    warn!(group_id = group.id, error = %e, "Story composition failed, using fallback copy");
                    stats.compose_fallbacks += 1;
                    fallback_copy(&members)
                }
            };

            stories.push(StoryDraft {
                group_id: group.id,
                member_ids: members.iter().map(|a| a.id).collect(),
                topic,
                title: copy.title,
                summary: copy.summary,
                analysis: copy.analysis,
                ideology,
                date: members.iter().filter_map(|a| a.date).max(),
                image: members.iter().find_map(|a| a.image.clone()),
            });
        }

        info!(
            articles = stats.articles,
            groups = stories.len(),
            duplicate_groups = stats.duplicate_groups,
            singletons = stats.singletons,
            "Batch grouped into stories"
        );

        Ok(PipelineOutcome {
            articles,
            stories,
            stats,
        })
    }
}

/// Copy used when the composer collaborator fails: the first member's own
/// title, a plain membership summary, no analysis.
fn fallback_copy(members: &[&ArticleRecord]) -> StoryCopy {
    let title = members
        .first()
        .map(|a| a.title.clone())
        .unwrap_or_else(|| "Untitled story".to_string());
    StoryCopy {
        title,
        summary: format!("Group of {} related articles.", members.len()),
        analysis: String::new(),
    }
}
