use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Article Types ---

/// One news article moving through the analysis pipeline.
///
/// Scalar analysis fields (`cleaned`, `embedding`, `bias`, `hoax`,
/// `ideology`, `topic`) are filled lazily by enrichment and never
/// overwritten once present. `group_id` is the only field a later run may
/// reassign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub id: i64,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    /// Normalized content, input to the scorers.
    #[serde(default)]
    pub cleaned: Option<String>,
    /// Fixed dimensionality per deployment (see `Config::embedding_dim`).
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
    /// Likelihood the article is written from a narrow point of view, [0,1].
    #[serde(default)]
    pub bias: Option<f32>,
    /// Likelihood the article lends itself to hoax rewrites, [0,1].
    #[serde(default)]
    pub hoax: Option<f32>,
    /// Writing-style ideology: 0 conservative .. 1 liberal.
    #[serde(default)]
    pub ideology: Option<f32>,
    /// Categorical topic-cluster label from the external classifier.
    #[serde(default)]
    pub topic: Option<u8>,
    /// Story group this article belongs to, assigned by de-duplication.
    #[serde(default)]
    pub group_id: Option<i64>,
}

impl ArticleRecord {
    /// A bare record carrying only the fields every article starts with.
    pub fn new(id: i64, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            source: None,
            url: None,
            image: None,
            date: None,
            cleaned: None,
            embedding: None,
            bias: None,
            hoax: None,
            ideology: None,
            topic: None,
            group_id: None,
        }
    }
}

// --- Ideology Types ---

/// Political lean bucket derived from the ideology score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdeologyLean {
    Liberal,
    Neutral,
    Conservative,
}

/// Score at or below this is counted as liberal.
pub const LIBERAL_MAX_SCORE: f32 = 0.25;
/// Score at or above this is counted as conservative.
pub const CONSERVATIVE_MIN_SCORE: f32 = 0.75;

impl IdeologyLean {
    pub fn from_score(score: f32) -> Self {
        if score <= LIBERAL_MAX_SCORE {
            IdeologyLean::Liberal
        } else if score >= CONSERVATIVE_MIN_SCORE {
            IdeologyLean::Conservative
        } else {
            IdeologyLean::Neutral
        }
    }
}

impl std::fmt::Display for IdeologyLean {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdeologyLean::Liberal => write!(f, "liberal"),
            IdeologyLean::Neutral => write!(f, "neutral"),
            IdeologyLean::Conservative => write!(f, "conservative"),
        }
    }
}

/// Per-story tally of member leanings. Unscored members are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeologyCounts {
    pub liberal: u32,
    pub neutral: u32,
    pub conservative: u32,
}

impl IdeologyCounts {
    pub fn tally<'a>(scores: impl IntoIterator<Item = &'a f32>) -> Self {
        let mut counts = Self::default();
        for score in scores {
            match IdeologyLean::from_score(*score) {
                IdeologyLean::Liberal => counts.liberal += 1,
                IdeologyLean::Neutral => counts.neutral += 1,
                IdeologyLean::Conservative => counts.conservative += 1,
            }
        }
        counts
    }
}

// --- Story Types ---

/// Headline copy for a story, written by the composer collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryCopy {
    pub title: String,
    pub summary: String,
    pub analysis: String,
}

/// One de-duplicated story, ready for the caller to persist.
///
/// `group_id` integrates with the caller's existing numbering (the pipeline
/// only ever continues from the injected offset). `member_ids` are article
/// IDs, in batch order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryDraft {
    pub group_id: i64,
    pub member_ids: Vec<i64>,
    /// Mode topic label across scored members; None when no member has one.
    pub topic: Option<u8>,
    pub title: String,
    pub summary: String,
    pub analysis: String,
    pub ideology: IdeologyCounts,
    pub date: Option<DateTime<Utc>>,
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lean_boundaries_are_inclusive() {
        assert_eq!(IdeologyLean::from_score(0.25), IdeologyLean::Liberal);
        assert_eq!(IdeologyLean::from_score(0.75), IdeologyLean::Conservative);
        assert_eq!(IdeologyLean::from_score(0.26), IdeologyLean::Neutral);
        assert_eq!(IdeologyLean::from_score(0.74), IdeologyLean::Neutral);
        assert_eq!(IdeologyLean::from_score(0.0), IdeologyLean::Liberal);
        assert_eq!(IdeologyLean::from_score(1.0), IdeologyLean::Conservative);
    }

    #[test]
    fn tally_skips_nothing_and_buckets_correctly() {
        let scores = [0.1, 0.25, 0.5, 0.75, 0.9];
        let counts = IdeologyCounts::tally(scores.iter());
        assert_eq!(
            counts,
            IdeologyCounts {
                liberal: 2,
                neutral: 1,
                conservative: 2,
            }
        );
    }

    #[test]
    fn tally_of_nothing_is_all_zero() {
        assert_eq!(
            IdeologyCounts::tally(std::iter::empty()),
            IdeologyCounts::default()
        );
    }
}
