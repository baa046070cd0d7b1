// Unit tests for k-means partitioning and representative selection.
//
// Pure functions only: no embedder, no network.

use review_themes::clustering::kmeans::{ClusteringError, KMeans, DEFAULT_SEED};
use review_themes::clustering::representatives::select_representatives;
use review_themes::clustering::{centroid, euclidean_distance};

fn grid(n: usize) -> Vec<Vec<f64>> {
    (0..n)
        .map(|i| vec![(i % 4) as f64, (i / 4) as f64 * 0.5])
        .collect()
}

// ============================================================
// KMeans::fit: shape invariants
// ============================================================

#[test]
fn k_is_capped_at_point_count() {
    let data = grid(4);
    for requested in [1, 2, 4, 10] {
        let clustering = KMeans::default().fit(&data, requested).unwrap();
        assert_eq!(clustering.k(), requested.min(4));
    }
}

#[test]
fn every_point_gets_exactly_one_label() {
    let data = grid(13);
    let clustering = KMeans::default().fit(&data, 3).unwrap();
    assert_eq!(clustering.labels.len(), 13);
    assert!(clustering.labels.iter().all(|&l| l < 3));
    assert_eq!(clustering.cluster_sizes().iter().sum::<usize>(), 13);

    let mut seen: Vec<usize> = (0..3).flat_map(|c| clustering.members(c)).collect();
    seen.sort();
    assert_eq!(seen, (0..13).collect::<Vec<_>>());
}

#[test]
fn zero_clusters_rejected() {
    assert_eq!(
        KMeans::default().fit(&grid(3), 0).unwrap_err(),
        ClusteringError::NoClusters
    );
}

#[test]
fn empty_input_rejected() {
    assert_eq!(
        KMeans::default().fit(&[], 3).unwrap_err(),
        ClusteringError::InsufficientData
    );
}

// ============================================================
// KMeans::fit: determinism and quality
// ============================================================

#[test]
fn same_seed_same_partition() {
    let data = grid(16);
    let a = KMeans::with_seed(DEFAULT_SEED).fit(&data, 3).unwrap();
    let b = KMeans::with_seed(DEFAULT_SEED).fit(&data, 3).unwrap();
    assert_eq!(a.labels, b.labels);
    assert_eq!(a.centroids, b.centroids);
}

#[test]
fn separated_groups_are_recovered() {
    let mut data = Vec::new();
    for i in 0..5 {
        data.push(vec![0.0 + i as f64 * 0.01, 0.0]);
    }
    for i in 0..5 {
        data.push(vec![10.0 + i as f64 * 0.01, 10.0]);
    }

    let clustering = KMeans::default().fit(&data, 2).unwrap();
    let first = clustering.labels[0];
    assert!(clustering.labels[..5].iter().all(|&l| l == first));
    assert!(clustering.labels[5..].iter().all(|&l| l != first));
}

#[test]
fn centroids_are_member_means() {
    let data = vec![vec![0.0, 0.0], vec![2.0, 0.0], vec![100.0, 100.0]];
    let clustering = KMeans::default().fit(&data, 2).unwrap();
    for c in 0..clustering.k() {
        let members = clustering.members(c);
        if members.is_empty() {
            continue;
        }
        let mean = centroid(members.iter().map(|&i| data[i].as_slice()), 2).unwrap();
        assert!(euclidean_distance(&mean, &clustering.centroids[c]) < 1e-9);
    }
}

// ============================================================
// select_representatives
// ============================================================

#[test]
fn representatives_capped_and_sorted() {
    let data = vec![vec![4.0], vec![1.0], vec![3.0], vec![2.0], vec![0.5]];
    let reps = select_representatives(&[0, 1, 2, 3, 4], &data, &[0.0], 3);
    let indices: Vec<usize> = reps.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![4, 1, 3]);

    let two = select_representatives(&[0, 2], &data, &[0.0], 3);
    assert_eq!(two.len(), 2);
}

#[test]
fn representative_ties_keep_member_order() {
    let data = vec![vec![1.0], vec![-1.0], vec![1.0]];
    let reps = select_representatives(&[2, 0, 1], &data, &[0.0], 3);
    let indices: Vec<usize> = reps.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![2, 0, 1]);
}
