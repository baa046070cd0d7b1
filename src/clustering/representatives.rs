// Representative review selection: the members nearest their cluster centroid.

use super::euclidean_distance;
use crate::embedding::Embedding;

/// Default number of representatives per theme.
pub const DEFAULT_REPRESENTATIVES: usize = 3;

/// A cluster member chosen to represent its theme.
#[derive(Debug, Clone, PartialEq)]
pub struct Representative {
    /// Index into the original review list.
    pub index: usize,
    /// Euclidean distance from the member's embedding to the centroid.
    pub distance: f64,
}

/// Return the `min(n, members.len())` members closest to `centroid`,
/// nearest first. Equal distances keep their order in `members`.
///
/// `members` are indices into `embeddings`. An empty member list yields an
/// empty result.
pub fn select_representatives(
    members: &[usize],
    embeddings: &[Embedding],
    centroid: &[f64],
    n: usize,
) -> Vec<Representative> {
    let mut ranked: Vec<Representative> = members
        .iter()
        .filter_map(|&index| {
            embeddings.get(index).map(|e| Representative {
                index,
                distance: euclidean_distance(e, centroid),
            })
        })
        .collect();

    // sort_by is stable, so ties stay in member order.
    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ranked.truncate(n);
    ranked
}
