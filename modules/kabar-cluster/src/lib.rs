//! Article de-duplication core.
//!
//! Pure, synchronous, in-memory: a batch of embeddings goes in, a partition
//! into duplicate groups with stable integer group IDs comes out. Pairwise
//! cosine similarity builds an undirected duplicate graph, connected
//! components become groups, and IDs continue from a caller-supplied offset
//! so new groups never collide with previously stored ones.
//!
//! Nothing here touches a store or a network; featurization happens before
//! this crate is called (see `kabar-engine`).

pub mod dedup;
pub mod error;
pub mod mode;
pub mod similarity;

pub use dedup::{assign_group_ids, partition, DedupConfig, DedupStats, DuplicateGraph, Partition, StoryGroup};
pub use error::ClusterError;
pub use mode::mode_label;
pub use similarity::{cosine_similarity, rank_similar, SimilarityMatrix};
