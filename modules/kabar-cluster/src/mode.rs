use std::collections::HashMap;
use std::hash::Hash;

use crate::error::ClusterError;

/// The most frequent label in a group, used to give every story one
/// representative topic.
///
/// Ties break toward the label that appears first in input order. A
/// HashMap-max reduction would pick arbitrarily among tied labels, so the
/// tally tracks first-seen positions. Empty input is an error; callers with
/// a group of zero resolved labels must pass a sentinel instead.
pub fn mode_label<T>(labels: &[T]) -> Result<T, ClusterError>
where
    T: Copy + Eq + Hash,
{
    if labels.is_empty() {
        return Err(ClusterError::EmptyInput);
    }

    let mut tally: HashMap<T, (usize, usize)> = HashMap::new();
    for (position, &label) in labels.iter().enumerate() {
        let entry = tally.entry(label).or_insert((0, position));
        entry.0 += 1;
    }

    let (label, _) = tally
        .into_iter()
        .max_by(|(_, (count_a, pos_a)), (_, (count_b, pos_b))| {
            count_a.cmp(count_b).then(pos_b.cmp(pos_a))
        })
        .expect("tally is non-empty");

    Ok(label)
}
