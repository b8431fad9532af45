use crate::memory::*;

/// Euclidean distance between two points of identical dimensionality.
#[inline(always)]
pub fn euclidean_distance<T: Primitive>(a: &[T], b: &[T]) -> T {
    squared_euclidean(a, b).sqrt()
}

/// Matrix of euclidean distances between every sample and every centroid.
///
/// Stored row-major with one row per sample: `[<sample0: d(c0), d(c1), ...>, <sample1: ...>, ...]`
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceMatrix<T: Primitive> {
    sample_cnt: usize,
    k: usize,
    distances: Vec<T>,
}
impl<T: Primitive> DistanceMatrix<T> {
    pub(crate) fn from_rows(samples: &[T], centroids: &[T], sample_dims: usize) -> Self {
        let k = centroids.len() / sample_dims;
        let distances = samples.chunks_exact(sample_dims)
            .flat_map(move |s| centroids.chunks_exact(sample_dims).map(move |c| euclidean_distance(s, c)))
            .collect::<Vec<_>>();
        Self { sample_cnt: distances.len() / k, k, distances }
    }

    /// Amount of samples (rows)
    pub fn sample_cnt(&self) -> usize { self.sample_cnt }
    /// Amount of centroids (columns)
    pub fn k(&self) -> usize { self.k }

    /// Distance between sample **sample** and centroid **centroid**.
    pub fn get(&self, sample: usize, centroid: usize) -> T {
        self.distances[sample * self.k + centroid]
    }

    /// All centroid distances of sample **sample**.
    pub fn row(&self, sample: usize) -> &[T] {
        self.distances.nth_row(sample, self.k)
    }

    pub fn as_slice(&self) -> &[T] { &self.distances }

    /// Assignment step: map every sample to its nearest centroid.
    ///
    /// Equidistant centroids are resolved to the lowest centroid index, which makes the
    /// assignment deterministic and idempotent for a given matrix.
    pub fn assign(&self) -> Vec<usize> {
        self.distances.chunks_exact(self.k)
            .map(nearest)
            .collect()
    }
}

/// Index of the smallest value. Only a strictly smaller value replaces the current best,
/// so ties go to the lowest index.
#[inline(always)]
pub(crate) fn nearest<T: Primitive>(row: &[T]) -> usize {
    let mut best = (0, T::infinity());
    for (idx, &d) in row.iter().enumerate() {
        if d < best.1 {
            best = (idx, d);
        }
    }
    best.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_matrix_shape_and_values() {
        let samples = vec![0.0f64, 0.0, 3.0, 4.0, 6.0, 8.0];
        let centroids = vec![0.0f64, 0.0, 3.0, 4.0];
        let matrix = DistanceMatrix::from_rows(&samples, &centroids, 2);
        assert_eq!((matrix.sample_cnt(), matrix.k()), (3, 2));
        assert_eq!(matrix.as_slice(), &[0.0, 5.0, 5.0, 0.0, 10.0, 5.0]);
        assert_eq!(matrix.row(2), &[10.0, 5.0]);
        assert!(matrix.as_slice().iter().all(|&d| d >= 0.0));
    }

    #[test]
    fn triangle_inequality() {
        let a = [1.0f64, -2.0, 0.5];
        let b = [4.0f64, 2.0, -1.0];
        let c = [-3.0f64, 0.0, 2.0];
        assert!(euclidean_distance(&a, &c) <= euclidean_distance(&a, &b) + euclidean_distance(&b, &c));
        assert_eq!(euclidean_distance(&a, &a), 0.0);
    }

    #[test]
    fn assignment_ties_go_to_lowest_index() {
        // sample 1 is equidistant to both centroids
        let samples = vec![0.0f32, 1.0, 2.0];
        let centroids = vec![0.0f32, 2.0];
        let matrix = DistanceMatrix::from_rows(&samples, &centroids, 1);
        assert_eq!(matrix.assign(), vec![0, 0, 1]);
    }

    #[test]
    fn assignment_is_idempotent() {
        let samples = vec![0.1f64, 0.9, 5.0, 5.5, 9.9, 2.5];
        let centroids = vec![0.0f64, 5.0, 10.0];
        let matrix = DistanceMatrix::from_rows(&samples, &centroids, 1);
        let first = matrix.assign();
        assert_eq!(first, vec![0, 0, 1, 1, 2, 0]);
        assert_eq!(matrix.assign(), first);
    }
}
