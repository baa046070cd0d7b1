// Theme discovery: k-means over review embeddings, then nearest-to-centroid
// selection of representative reviews.

pub mod kmeans;
pub mod representatives;

/// Squared Euclidean distance. Used for assignment, where the square root
/// doesn't change the ordering.
pub fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Euclidean distance between two vectors of equal length.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    squared_distance(a, b).sqrt()
}

/// Mean of the given vectors, or `None` when there are none.
pub fn centroid<'a, I>(vectors: I, dim: usize) -> Option<Vec<f64>>
where
    I: IntoIterator<Item = &'a [f64]>,
{
    let mut sum = vec![0.0_f64; dim];
    let mut count = 0usize;

    for v in vectors {
        for (acc, &x) in sum.iter_mut().zip(v) {
            *acc += x;
        }
        count += 1;
    }

    if count == 0 {
        return None;
    }

    let n = count as f64;
    for val in &mut sum {
        *val /= n;
    }
    Some(sum)
}
