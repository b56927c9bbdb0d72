use std::collections::VecDeque;

use tracing::info;

use crate::error::ClusterError;
use crate::similarity::SimilarityMatrix;

/// Default cosine similarity at or above which two articles are duplicates.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.9;

/// Knobs for one de-duplication run.
#[derive(Debug, Clone, Copy)]
pub struct DedupConfig {
    /// Pairs at or above this similarity get an edge in the duplicate graph.
    pub similarity_threshold: f64,
    /// First group ID to hand out. Callers that persist IDs pass
    /// `1 + max stored id` so new groups never collide with old ones.
    pub id_offset: i64,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            id_offset: 0,
        }
    }
}

/// Undirected graph over batch indices: an edge means the pair reads as the
/// same underlying event. Edges carry no weight; only membership matters
/// downstream.
#[derive(Debug, Clone)]
pub struct DuplicateGraph {
    adjacency: Vec<Vec<usize>>,
    edge_count: usize,
}

impl DuplicateGraph {
    /// Scan the upper triangle of the similarity matrix and connect every
    /// pair at or above `threshold`. No self-loops.
    pub fn from_matrix(matrix: &SimilarityMatrix, threshold: f64) -> Result<Self, ClusterError> {
        if !(-1.0..=1.0).contains(&threshold) {
            return Err(ClusterError::InvalidThreshold(threshold));
        }

        let n = matrix.len();
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut edge_count = 0;

        for i in 0..n {
            for j in (i + 1)..n {
                if matrix.get(i, j) >= threshold {
                    adjacency[i].push(j);
                    adjacency[j].push(i);
                    edge_count += 1;
                }
            }
        }

        Ok(Self {
            adjacency,
            edge_count,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Connected components over the vertices that have at least one edge,
    /// via breadth-first search. Isolated vertices are left to the ID
    /// assigner as implicit singletons.
    ///
    /// Start vertices are scanned in ascending order, so components come
    /// out ordered by their minimum member index and the partition is
    /// deterministic for a given graph. Members are sorted ascending.
    pub fn connected_components(&self) -> Vec<Vec<usize>> {
        let n = self.adjacency.len();
        let mut visited = vec![false; n];
        let mut components = Vec::new();

        for start in 0..n {
            if visited[start] || self.adjacency[start].is_empty() {
                continue;
            }

            let mut component = Vec::new();
            let mut queue = VecDeque::from([start]);
            visited[start] = true;

            while let Some(vertex) = queue.pop_front() {
                component.push(vertex);
                for &neighbor in &self.adjacency[vertex] {
                    if !visited[neighbor] {
                        visited[neighbor] = true;
                        queue.push_back(neighbor);
                    }
                }
            }

            component.sort_unstable();
            components.push(component);
        }

        components
    }
}

/// Assign every vertex an integer group ID: components first, in the order
/// given, then each remaining vertex as its own singleton, all on one
/// counter starting at `offset`.
pub fn assign_group_ids(vertex_count: usize, components: &[Vec<usize>], offset: i64) -> Vec<i64> {
    let mut ids: Vec<Option<i64>> = vec![None; vertex_count];
    let mut next_id = offset;

    for component in components {
        for &vertex in component {
            ids[vertex] = Some(next_id);
        }
        next_id += 1;
    }

    ids.into_iter()
        .map(|id| {
            id.unwrap_or_else(|| {
                let singleton_id = next_id;
                next_id += 1;
                singleton_id
            })
        })
        .collect()
}

/// One duplicate group: a group ID and the batch indices it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryGroup {
    pub id: i64,
    pub members: Vec<usize>,
}

/// Result of one de-duplication run over a batch.
#[derive(Debug, Clone)]
pub struct Partition {
    /// Group ID per batch index, index-aligned with the input.
    pub group_ids: Vec<i64>,
    /// Groups in ascending ID order; members ascending within each.
    pub groups: Vec<StoryGroup>,
    pub stats: DedupStats,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupStats {
    pub articles: usize,
    pub similarity_edges: usize,
    pub duplicate_groups: usize,
    pub singletons: usize,
}

impl std::fmt::Display for DedupStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== De-duplication Complete ===")?;
        writeln!(f, "Articles:         {}", self.articles)?;
        writeln!(f, "Similarity edges: {}", self.similarity_edges)?;
        writeln!(f, "Duplicate groups: {}", self.duplicate_groups)?;
        writeln!(f, "Singletons:       {}", self.singletons)?;
        Ok(())
    }
}

/// Partition a batch of embeddings into duplicate groups.
///
/// The full pipeline: similarity matrix → duplicate graph → connected
/// components → group IDs. Articles transitively linked at the threshold
/// share a group even when their direct pairwise similarity falls below it
/// (similarity is not transitive; chains merge through intermediates).
///
/// An empty batch partitions into nothing, not an error.
pub fn partition(embeddings: &[Vec<f32>], config: &DedupConfig) -> Result<Partition, ClusterError> {
    if !(-1.0..=1.0).contains(&config.similarity_threshold) {
        return Err(ClusterError::InvalidThreshold(config.similarity_threshold));
    }

    let n = embeddings.len();
    if n == 0 {
        return Ok(Partition {
            group_ids: Vec::new(),
            groups: Vec::new(),
            stats: DedupStats::default(),
        });
    }

    let matrix = SimilarityMatrix::build(embeddings)?;
    let graph = DuplicateGraph::from_matrix(&matrix, config.similarity_threshold)?;
    let components = graph.connected_components();
    let group_ids = assign_group_ids(n, &components, config.id_offset);

    // Components take the low IDs in order; singletons continue the counter
    // in ascending vertex order, so building groups in that order keeps the
    // list ascending by ID.
    let mut groups: Vec<StoryGroup> = Vec::new();
    let mut next_id = config.id_offset;
    for component in &components {
        groups.push(StoryGroup {
            id: next_id,
            members: component.clone(),
        });
        next_id += 1;
    }
    let grouped: usize = components.iter().map(|c| c.len()).sum();
    for (vertex, &id) in group_ids.iter().enumerate() {
        if id >= next_id {
            groups.push(StoryGroup {
                id,
                members: vec![vertex],
            });
        }
    }
    debug_assert_eq!(grouped + (groups.len() - components.len()), n);

    let stats = DedupStats {
        articles: n,
        similarity_edges: graph.edge_count(),
        duplicate_groups: components.len(),
        singletons: n - grouped,
    };

    info!(
        articles = stats.articles,
        edges = stats.similarity_edges,
        duplicate_groups = stats.duplicate_groups,
        singletons = stats.singletons,
        threshold = config.similarity_threshold,
        "Batch partitioned into duplicate groups"
    );

    Ok(Partition {
        group_ids,
        groups,
        stats,
    })
}
