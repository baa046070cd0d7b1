// K-means clustering with seeded k-means++ initialisation.
//
// The seed is an explicit field, so identical input and identical settings
// always produce the identical partition. Several initialisations are drawn
// from the same seeded stream and the one with the lowest inertia wins.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::{centroid, squared_distance};
use crate::embedding::Embedding;

/// Default seed, matching the value the review pipeline has always used.
pub const DEFAULT_SEED: u64 = 42;

/// Why clustering could not run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClusteringError {
    #[error("Cannot cluster an empty set of embeddings")]
    InsufficientData,

    #[error("Requested zero clusters")]
    NoClusters,

    #[error("Embedding {index} has dimension {got}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        got: usize,
    },

    #[error("Embedding {index} contains a non-finite value")]
    NonFinite { index: usize },
}

/// K-means parameters.
#[derive(Debug, Clone)]
pub struct KMeans {
    /// Cap on assignment/update rounds per initialisation.
    pub max_iterations: usize,
    /// Number of independent k-means++ initialisations.
    pub restarts: usize,
    /// Seed for the initialisation RNG.
    pub seed: u64,
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            max_iterations: 300,
            restarts: 10,
            seed: DEFAULT_SEED,
        }
    }
}

/// A partition of the input embeddings.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    /// Cluster id in `[0, k)` for each input embedding, index-aligned.
    pub labels: Vec<usize>,
    /// One centroid per cluster id.
    pub centroids: Vec<Embedding>,
    /// Sum of squared distances from each embedding to its centroid.
    pub inertia: f64,
    /// Rounds run by the winning initialisation.
    pub iterations: usize,
}

impl Clustering {
    pub fn k(&self) -> usize {
        self.centroids.len()
    }

    /// Input indices assigned to `cluster_id`, ascending.
    pub fn members(&self, cluster_id: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|&(_, &label)| label == cluster_id)
            .map(|(i, _)| i)
            .collect()
    }

    /// Member count for every cluster id. Zero entries are empty clusters.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.k()];
        for &label in &self.labels {
            sizes[label] += 1;
        }
        sizes
    }
}

impl KMeans {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Partition `embeddings` into `k = min(requested, N)` clusters.
    pub fn fit(&self, embeddings: &[Embedding], requested: usize) -> Result<Clustering, ClusteringError> {
        if embeddings.is_empty() {
            return Err(ClusteringError::InsufficientData);
        }
        validate(embeddings)?;

        let k = requested.min(embeddings.len());
        if k == 0 {
            return Err(ClusteringError::NoClusters);
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut best: Option<Clustering> = None;

        for _ in 0..self.restarts.max(1) {
            let initial = seed_centroids(embeddings, k, &mut rng);
            let candidate = relax(embeddings, initial, self.max_iterations);
            // Strict comparison keeps the earliest run on ties.
            if best.as_ref().is_none_or(|b| candidate.inertia < b.inertia) {
                best = Some(candidate);
            }
        }

        let best = best.ok_or(ClusteringError::NoClusters)?;
        debug!(
            n = embeddings.len(),
            k = k,
            iterations = best.iterations,
            inertia = best.inertia,
            "K-means converged"
        );
        Ok(best)
    }
}

fn validate(embeddings: &[Embedding]) -> Result<(), ClusteringError> {
    let expected = embeddings[0].len();
    for (index, e) in embeddings.iter().enumerate() {
        if e.len() != expected {
            return Err(ClusteringError::DimensionMismatch {
                index,
                expected,
                got: e.len(),
            });
        }
        if e.iter().any(|x| !x.is_finite()) {
            return Err(ClusteringError::NonFinite { index });
        }
    }
    Ok(())
}

/// k-means++: first centroid uniform, each next one drawn with probability
/// proportional to its squared distance from the nearest chosen centroid.
fn seed_centroids(data: &[Embedding], k: usize, rng: &mut StdRng) -> Vec<Embedding> {
    let n = data.len();
    let first = rng.random_range(0..n);
    let mut centroids = vec![data[first].clone()];
    let mut closest: Vec<f64> = data
        .iter()
        .map(|p| squared_distance(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = closest.iter().sum();
        let next = if total > 0.0 {
            let mut target = rng.random::<f64>() * total;
            let mut chosen = None;
            let mut last_positive = 0;
            for (i, &d) in closest.iter().enumerate() {
                if d <= 0.0 {
                    continue;
                }
                last_positive = i;
                if target < d {
                    chosen = Some(i);
                    break;
                }
                target -= d;
            }
            chosen.unwrap_or(last_positive)
        } else {
            // Every point coincides with a chosen centroid.
            rng.random_range(0..n)
        };

        let c = data[next].clone();
        for (d, p) in closest.iter_mut().zip(data) {
            *d = d.min(squared_distance(p, &c));
        }
        centroids.push(c);
    }

    centroids
}

/// Lloyd iterations from the given starting centroids.
fn relax(data: &[Embedding], mut centroids: Vec<Embedding>, max_iterations: usize) -> Clustering {
    let dim = data[0].len();
    let mut labels = vec![usize::MAX; data.len()];
    let mut iterations = 0;

    for _ in 0..max_iterations.max(1) {
        iterations += 1;

        let mut changed = false;
        for (label, point) in labels.iter_mut().zip(data) {
            let nearest = nearest_centroid(point, &centroids);
            if *label != nearest {
                *label = nearest;
                changed = true;
            }
        }
        if !changed {
            break;
        }

        for (cluster_id, c) in centroids.iter_mut().enumerate() {
            let members = data
                .iter()
                .zip(&labels)
                .filter(|&(_, &l)| l == cluster_id)
                .map(|(p, _)| p.as_slice());
            // An emptied cluster keeps its previous centroid.
            if let Some(mean) = centroid(members, dim) {
                *c = mean;
            }
        }
    }

    let inertia = data
        .iter()
        .zip(&labels)
        .map(|(p, &l)| squared_distance(p, &centroids[l]))
        .sum();

    Clustering {
        labels,
        centroids,
        inertia,
        iterations,
    }
}

/// Index of the closest centroid; the lowest index wins ties.
pub fn nearest_centroid(point: &[f64], centroids: &[Embedding]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = squared_distance(point, c);
        if d < best_dist {
            best = i;
            best_dist = d;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> Vec<Embedding> {
        vec![
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![10.0, 10.0],
            vec![0.0, 0.1],
            vec![10.1, 10.0],
        ]
    }

    #[test]
    fn test_empty_input_is_insufficient_data() {
        let err = KMeans::default().fit(&[], 3).unwrap_err();
        assert_eq!(err, ClusteringError::InsufficientData);
    }

    #[test]
    fn test_zero_requested_is_rejected() {
        let err = KMeans::default().fit(&[vec![1.0]], 0).unwrap_err();
        assert_eq!(err, ClusteringError::NoClusters);
    }

    #[test]
    fn test_single_point_forms_one_cluster() {
        let c = KMeans::default().fit(&[vec![1.0, 2.0]], 3).unwrap();
        assert_eq!(c.k(), 1);
        assert_eq!(c.labels, vec![0]);
        assert_eq!(c.centroids[0], vec![1.0, 2.0]);
    }

    #[test]
    fn test_separated_blobs_split_cleanly() {
        let c = KMeans::default().fit(&blobs(), 2).unwrap();
        assert_eq!(c.k(), 2);
        assert_eq!(c.labels[0], c.labels[1]);
        assert_eq!(c.labels[0], c.labels[3]);
        assert_eq!(c.labels[2], c.labels[4]);
        assert_ne!(c.labels[0], c.labels[2]);
    }

    #[test]
    fn test_k_capped_at_point_count() {
        let c = KMeans::default().fit(&blobs()[..2], 5).unwrap();
        assert_eq!(c.k(), 2);
    }

    #[test]
    fn test_same_seed_same_partition() {
        let a = KMeans::with_seed(7).fit(&blobs(), 3).unwrap();
        let b = KMeans::with_seed(7).fit(&blobs(), 3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_centroids_are_member_means() {
        let data = blobs();
        let c = KMeans::default().fit(&data, 2).unwrap();
        for id in 0..c.k() {
            let members = c.members(id);
            let mean = centroid(members.iter().map(|&i| data[i].as_slice()), 2).unwrap();
            for (a, b) in mean.iter().zip(&c.centroids[id]) {
                assert!((a - b).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_duplicate_points_can_leave_empty_clusters() {
        let data = vec![vec![1.0, 1.0]; 3];
        let c = KMeans::default().fit(&data, 3).unwrap();
        assert_eq!(c.k(), 3);
        assert_eq!(c.labels, vec![0, 0, 0]);
        assert_eq!(c.cluster_sizes(), vec![3, 0, 0]);
    }

    #[test]
    fn test_nearest_centroid_tie_goes_to_lowest_index() {
        let centroids = vec![vec![-1.0], vec![1.0]];
        assert_eq!(nearest_centroid(&[0.0], &centroids), 0);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let err = KMeans::default()
            .fit(&[vec![1.0, 2.0], vec![1.0]], 2)
            .unwrap_err();
        assert_eq!(
            err,
            ClusteringError::DimensionMismatch {
                index: 1,
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn test_nan_rejected() {
        let err = KMeans::default()
            .fit(&[vec![1.0], vec![f64::NAN]], 2)
            .unwrap_err();
        assert_eq!(err, ClusteringError::NonFinite { index: 1 });
    }
}
