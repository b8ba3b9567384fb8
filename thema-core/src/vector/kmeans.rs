//! Cosine k-means over sparse TF-IDF vectors.
//!
//! Initialization picks `k` distinct random input vectors as centroids, so
//! results differ between runs unless the caller passes a seeded generator.
//! Each iteration assigns every vector to the most similar centroid (first
//! centroid wins ties) and recomputes centroids as elementwise means. The
//! loop stops after an iteration with no reassignment, or at the cap.

use rand::Rng;
use smallvec::SmallVec;

use crate::vector::similarity::cosine_similarity;
use crate::vector::SparseVector;

/// Cluster assignment produced by [`CosineKMeans::fit`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clustering {
    /// Cluster index for each input vector.
    pub labels: Vec<usize>,
    /// Final centroids, one per cluster.
    pub centroids: Vec<SparseVector>,
    /// Iterations actually run.
    pub iterations: usize,
}

impl Clustering {
    /// Number of clusters.
    #[inline]
    pub fn k(&self) -> usize {
        self.centroids.len()
    }

    /// Indices of the vectors assigned to `cluster`, in input order.
    pub fn members(&self, cluster: usize) -> impl Iterator<Item = usize> + '_ {
        self.labels
            .iter()
            .enumerate()
            .filter(move |&(_, &label)| label == cluster)
            .map(|(i, _)| i)
    }
}

/// K-means parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CosineKMeans {
    k: usize,
    max_iterations: usize,
}

impl CosineKMeans {
    /// Creates a clusterer requesting `k` clusters and at most `max_iterations` rounds.
    pub const fn new(k: usize, max_iterations: usize) -> Self {
        Self { k, max_iterations }
    }

    /// Clusters `vectors`.
    ///
    /// `k` is clamped into `1..=vectors.len()`. An empty input yields no
    /// labels and no centroids.
    pub fn fit<R>(&self, vectors: &[SparseVector], rng: &mut R) -> Clustering
    where
        R: Rng + ?Sized,
    {
        if vectors.is_empty() {
            return Clustering::default();
        }

        let k = self.k.clamp(1, vectors.len());
        let seeds: SmallVec<[usize; 8]> =
            rand::seq::index::sample(rng, vectors.len(), k).into_iter().collect();

        let mut centroids: Vec<SparseVector> = seeds.iter().map(|&i| vectors[i].clone()).collect();
        let mut labels = vec![0usize; vectors.len()];
        let mut iterations = 0;

        for _ in 0..self.max_iterations {
            iterations += 1;

            let mut changed = false;
            for (label, vector) in labels.iter_mut().zip(vectors) {
                let best = nearest_centroid(vector, &centroids);
                if *label != best {
                    *label = best;
                    changed = true;
                }
            }

            centroids = mean_centroids(vectors, &labels, k);

            if !changed {
                break;
            }
        }

        tracing::debug!(vectors = vectors.len(), k, iterations, "k-means finished");

        Clustering {
            labels,
            centroids,
            iterations,
        }
    }
}

/// Clusters `vectors` into at most `k` groups within `iterations` rounds.
pub fn kmeans<R>(vectors: &[SparseVector], k: usize, iterations: usize, rng: &mut R) -> Clustering
where
    R: Rng + ?Sized,
{
    CosineKMeans::new(k, iterations).fit(vectors, rng)
}

#[inline]
fn nearest_centroid(vector: &SparseVector, centroids: &[SparseVector]) -> usize {
    let mut best = 0;
    let mut best_sim = f64::NEG_INFINITY;
    for (c, centroid) in centroids.iter().enumerate() {
        let sim = cosine_similarity(vector, centroid);
        if sim > best_sim {
            best_sim = sim;
            best = c;
        }
    }
    best
}

fn mean_centroids(vectors: &[SparseVector], labels: &[usize], k: usize) -> Vec<SparseVector> {
    let mut sums = vec![SparseVector::default(); k];
    let mut counts = vec![0usize; k];

    for (vector, &label) in vectors.iter().zip(labels) {
        counts[label] += 1;
        let sum = &mut sums[label];
        for (term, &weight) in vector {
            *sum.entry(term.clone()).or_insert(0.0) += weight;
        }
    }

    sums.into_iter()
        .zip(counts)
        .map(|(mut sum, count)| {
            let divisor = count.max(1) as f64;
            for weight in sum.values_mut() {
                *weight /= divisor;
            }
            sum
        })
        .collect()
}
