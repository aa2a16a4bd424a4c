//! K-means clustering backends
//!
//! Both backends seed a `StdRng`, pick k distinct rows as starting
//! centroids, and alternate nearest-centroid assignment with mean updates.
//! A cluster that loses all its rows keeps its previous centroid.

use crate::config::SegmentationConfig;
use crate::error::SegmentationError;
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Passes run by [`FixedIterationKMeans`]
pub const FIXED_ITERATIONS: usize = 10;

/// Output of a clustering run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterAssignment {
    /// Cluster id per input row, in `0..k`
    pub labels: Vec<usize>,
    pub centroids: Vec<Vec<f64>>,
    pub iterations: usize,
    /// True when the final pass moved no rows
    pub converged: bool,
}

impl ClusterAssignment {
    pub fn k(&self) -> usize {
        self.centroids.len()
    }

    /// Row indices assigned to `cluster`
    pub fn rows_in(&self, cluster: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, &c)| c == cluster)
            .map(|(i, _)| i)
            .collect()
    }
}

pub trait Clusterer {
    fn name(&self) -> &'static str;

    fn cluster(&self, rows: &[Vec<f64>], k: usize) -> Result<ClusterAssignment, SegmentationError>;
}

/// Which clusterer a segmentation run constructs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusteringBackend {
    #[default]
    Lloyd,
    FixedIteration,
}

impl ClusteringBackend {
    pub fn build(self, config: &SegmentationConfig) -> Box<dyn Clusterer> {
        match self {
            ClusteringBackend::Lloyd => Box::new(LloydKMeans {
                max_iterations: config.max_iterations,
                seed: config.seed,
            }),
            ClusteringBackend::FixedIteration => Box::new(FixedIterationKMeans { seed: config.seed }),
        }
    }
}

/// Standard k-means: stops once no row changes cluster, or at the cap
#[derive(Debug, Clone, Copy)]
pub struct LloydKMeans {
    pub max_iterations: usize,
    pub seed: u64,
}

impl Clusterer for LloydKMeans {
    fn name(&self) -> &'static str {
        "lloyd"
    }

    fn cluster(&self, rows: &[Vec<f64>], k: usize) -> Result<ClusterAssignment, SegmentationError> {
        check_inputs(rows, k)?;
        let mut centroids = initial_centroids(rows, k, self.seed);
        let mut labels = vec![usize::MAX; rows.len()];
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations.max(1) {
            iterations += 1;
            if !assign(rows, &centroids, &mut labels) {
                converged = true;
                break;
            }
            update_centroids(rows, &labels, &mut centroids);
        }

        debug!("Lloyd k-means (k={}) stopped after {} iterations, converged={}", k, iterations, converged);
        Ok(ClusterAssignment {
            labels,
            centroids,
            iterations,
            converged,
        })
    }
}

/// Always runs [`FIXED_ITERATIONS`] passes with no convergence check
#[derive(Debug, Clone, Copy)]
pub struct FixedIterationKMeans {
    pub seed: u64,
}

impl Clusterer for FixedIterationKMeans {
    fn name(&self) -> &'static str {
        "fixed_iteration"
    }

    fn cluster(&self, rows: &[Vec<f64>], k: usize) -> Result<ClusterAssignment, SegmentationError> {
        check_inputs(rows, k)?;
        let mut centroids = initial_centroids(rows, k, self.seed);
        let mut labels = vec![usize::MAX; rows.len()];
        let mut changed = true;

        for _ in 0..FIXED_ITERATIONS {
            changed = assign(rows, &centroids, &mut labels);
            update_centroids(rows, &labels, &mut centroids);
        }

        debug!("Fixed-iteration k-means (k={}) ran {} passes", k, FIXED_ITERATIONS);
        Ok(ClusterAssignment {
            labels,
            centroids,
            iterations: FIXED_ITERATIONS,
            converged: !changed,
        })
    }
}

fn check_inputs(rows: &[Vec<f64>], k: usize) -> Result<(), SegmentationError> {
    if k == 0 {
        return Err(SegmentationError::ZeroClusters);
    }
    if rows.is_empty() {
        return Err(SegmentationError::EmptyInput);
    }
    if k > rows.len() {
        return Err(SegmentationError::TooFewPoints {
            points: rows.len(),
            clusters: k,
        });
    }
    Ok(())
}

/// k distinct rows sampled without replacement
fn initial_centroids(rows: &[Vec<f64>], k: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    rand::seq::index::sample(&mut rng, rows.len(), k)
        .into_iter()
        .map(|i| rows[i].clone())
        .collect()
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Index of the nearest centroid; ties go to the lowest index
fn nearest(row: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (c, centroid) in centroids.iter().enumerate() {
        let d = squared_distance(row, centroid);
        if d < best_distance {
            best_distance = d;
            best = c;
        }
    }
    best
}

/// Reassign every row, returning whether any label changed
fn assign(rows: &[Vec<f64>], centroids: &[Vec<f64>], labels: &mut [usize]) -> bool {
    let mut changed = false;
    for (row, label) in rows.iter().zip(labels.iter_mut()) {
        let c = nearest(row, centroids);
        if c != *label {
            *label = c;
            changed = true;
        }
    }
    changed
}

fn update_centroids(rows: &[Vec<f64>], labels: &[usize], centroids: &mut [Vec<f64>]) {
    let width = centroids.first().map(Vec::len).unwrap_or(0);
    let mut sums = vec![vec![0.0; width]; centroids.len()];
    let mut counts = vec![0usize; centroids.len()];

    for (row, &label) in rows.iter().zip(labels) {
        counts[label] += 1;
        for (sum, x) in sums[label].iter_mut().zip(row) {
            *sum += x;
        }
    }

    for ((centroid, sum), count) in centroids.iter_mut().zip(sums).zip(counts) {
        if count > 0 {
            *centroid = sum.into_iter().map(|s| s / count as f64).collect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blobs() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![10.0, 10.0],
            vec![10.0, 11.0],
        ]
    }

    fn assert_blobs_separated(result: &ClusterAssignment) {
        assert_eq!(result.labels[0], result.labels[1]);
        assert_eq!(result.labels[2], result.labels[3]);
        assert_ne!(result.labels[0], result.labels[2]);
    }

    #[test]
    fn test_lloyd_separates_blobs() {
        let result = LloydKMeans { max_iterations: 100, seed: 7 }.cluster(&two_blobs(), 2).unwrap();
        assert_blobs_separated(&result);
        assert!(result.converged);
        assert_eq!(result.k(), 2);
    }

    #[test]
    fn test_fixed_iteration_separates_blobs() {
        let result = FixedIterationKMeans { seed: 7 }.cluster(&two_blobs(), 2).unwrap();
        assert_blobs_separated(&result);
        assert_eq!(result.iterations, FIXED_ITERATIONS);
    }

    fn scattered_rows() -> Vec<Vec<f64>> {
        (0..40)
            .map(|i| vec![(i % 7) as f64, (i * 3 % 11) as f64, (i % 5) as f64])
            .collect()
    }

    #[test]
    fn test_deterministic_for_seed() {
        let rows = scattered_rows();
        let clusterer = FixedIterationKMeans { seed: 42 };

        let first = clusterer.cluster(&rows, 4).unwrap();
        let second = clusterer.cluster(&rows, 4).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_lloyd_deterministic_for_seed() {
        let rows = scattered_rows();
        let first = LloydKMeans { max_iterations: 100, seed: 42 }.cluster(&rows, 4).unwrap();
        let second = LloydKMeans { max_iterations: 100, seed: 42 }.cluster(&rows, 4).unwrap();

        assert_eq!(first, second);
        assert!(first.iterations <= 100);
    }

    #[test]
    fn test_rejects_bad_k() {
        let rows = two_blobs();
        let clusterer = FixedIterationKMeans { seed: 1 };
        assert_eq!(
            clusterer.cluster(&rows, 5),
            Err(SegmentationError::TooFewPoints { points: 4, clusters: 5 })
        );
        assert_eq!(clusterer.cluster(&rows, 0), Err(SegmentationError::ZeroClusters));
    }

    #[test]
    fn test_empty_cluster_keeps_centroid() {
        // Identical rows: every tie goes to cluster 0
        let rows = vec![vec![1.0, 1.0]; 3];
        let result = FixedIterationKMeans { seed: 3 }.cluster(&rows, 2).unwrap();

        assert_eq!(result.labels, vec![0, 0, 0]);
        assert_eq!(result.centroids[1], vec![1.0, 1.0]);
        assert!(result.rows_in(1).is_empty());
    }

    #[test]
    fn test_backend_builds_matching_clusterer() {
        let config = SegmentationConfig::default();
        assert_eq!(ClusteringBackend::Lloyd.build(&config).name(), "lloyd");
        assert_eq!(ClusteringBackend::FixedIteration.build(&config).name(), "fixed_iteration");
    }
}
