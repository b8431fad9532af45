use crate::{align::Permutation, distances::DistanceMatrix, memory::*, AbortStrategy, KMeansError, RunWarning};
use rand::{prelude::*, RngCore};

pub type InitDoneCallbackFn<'a, T> = &'a (dyn Fn(&KMeansState<T>) + Sync);
pub type IterationDoneCallbackFn<'a, T> = &'a (dyn Fn(&KMeansState<T>, usize, T) + Sync);

/// Policy applied when a cluster did not receive any sample during an iteration, which would leave
/// its new centroid (the mean of zero samples) undefined.
///
/// Every occurrence is reported as [`RunWarning::EmptyCluster`], regardless of the policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EmptyClusterPolicy {
    /// The empty cluster keeps its centroid from the previous iteration.
    #[default]
    KeepPrevious,
    /// The sample with the highest distance to its centroid, that is not alone in its cluster,
    /// is moved into the empty cluster and becomes its centroid.
    ///
    /// This is the deterministic variant of re-seeding an empty cluster from another sample: no random
    /// number is drawn, the choice only depends on the current distances (ties go to the highest sample index).
    StealFarthest,
}

/// This is a structure holding the configuration options for k-means calculations, such as
/// the seed for the random number generator, the iteration limit, or a couple of callbacks, that can be set
/// to get status information from a running k-means calculation.
///
/// For a more detailed information about all possible options, have a look at [`KMeansConfigBuilder`].
pub struct KMeansConfig<'a, T: Primitive> {
    /// Callback that is called, when the initialization phase finished
    /// ## Arguments
    /// - **state**: Current [`KMeansState`] after the initialization
    pub(crate) init_done: InitDoneCallbackFn<'a, T>,
    /// Callback that is called after each iteration
    /// ## Arguments
    /// - **state**: Current[`KMeansState`] after the iteration
    /// - **iteration_id**: Number of the current iteration
    /// - **distsum**: New distance sum (**state** contains the distsum from the previous iteration)
    pub(crate) iteration_done: IterationDoneCallbackFn<'a, T>,
    /// Seed for the random number generator. Every calculation creates its own generator from it.
    pub(crate) seed: u64,
    /// Maximum amount of iterations
    pub(crate) max_iter: usize,
    /// The abort-strategy to use for the running calculation
    pub(crate) abort_strategy: AbortStrategy<T>,
    /// What to do with clusters that lost all of their samples
    pub(crate) empty_cluster_policy: EmptyClusterPolicy,
}
impl<'a, T: Primitive> Default for KMeansConfig<'a, T> {
    fn default() -> Self {
        Self {
            init_done: &|_| {},
            iteration_done: &|_,_,_| {},
            seed: 0,
            max_iter: 100,
            abort_strategy: AbortStrategy::default(),
            empty_cluster_policy: EmptyClusterPolicy::default(),
        }
    }
}
impl<'a, T: Primitive> KMeansConfig<'a, T> {
    /// Use the [`KMeansConfigBuilder`] to build a [`KMeansConfig`] instance.
    pub fn build() -> KMeansConfigBuilder<'a, T> {
        KMeansConfigBuilder { config: KMeansConfig::default() }
    }

    pub fn seed(&self) -> u64 { self.seed }
    pub fn max_iter(&self) -> usize { self.max_iter }
    pub fn abort_strategy(&self) -> AbortStrategy<T> { self.abort_strategy }
    pub fn empty_cluster_policy(&self) -> EmptyClusterPolicy { self.empty_cluster_policy }

    pub(crate) fn validate(&self) -> Result<(), KMeansError> {
        self.abort_strategy.validate()
    }

    /// Copy of this configuration with a different seed, sharing the callbacks.
    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            init_done: self.init_done,
            iteration_done: self.iteration_done,
            seed,
            max_iter: self.max_iter,
            abort_strategy: self.abort_strategy,
            empty_cluster_policy: self.empty_cluster_policy,
        }
    }
}
impl<'a, T: Primitive> std::fmt::Debug for KMeansConfig<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KMeansConfig")
            .field("seed", &self.seed)
            .field("max_iter", &self.max_iter)
            .field("abort_strategy", &self.abort_strategy)
            .field("empty_cluster_policy", &self.empty_cluster_policy)
            .finish()
    }
}

pub struct KMeansConfigBuilder<'a, T: Primitive> {
    config: KMeansConfig<'a, T>
}
impl<'a, T: Primitive> KMeansConfigBuilder<'a, T> {
    /// Set the callback that should be called after the centroid initialization, before the iteration starts.
    pub fn init_done(mut self, init_done: InitDoneCallbackFn<'a, T>) -> Self {
        self.config.init_done = init_done; self
    }
    /// Set the callback that should be called after each iteration during a running k-means calculation.
    pub fn iteration_done(mut self, iteration_done: IterationDoneCallbackFn<'a, T>) -> Self {
        self.config.iteration_done = iteration_done; self
    }
    /// Set the seed of the random number generator used in the k-means calculation.
    /// The same seed always yields the same result.
    /// ## Default
    /// `0`
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed; self
    }
    /// Set the maximum amount of iterations. A calculation hitting this limit is tagged
    /// with [`RunStatus::MaxItersReached`].
    /// ## Default
    /// `100`
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.config.max_iter = max_iter; self
    }
    /// Shorthand for [`AbortStrategy::CentroidShift`] with the given **tolerance**.
    pub fn tolerance(mut self, tolerance: T) -> Self {
        self.config.abort_strategy = AbortStrategy::CentroidShift { tolerance }; self
    }
    /// Set the abort-strategy to use during a running k-means calculation. For more information,
    /// see documentation of [`AbortStrategy`].
    /// ## Default
    /// [`AbortStrategy::CentroidShift`] `{ tolerance: 1e-4 }`
    pub fn abort_strategy(mut self, abort_strategy: AbortStrategy<T>) -> Self {
        self.config.abort_strategy = abort_strategy; self
    }
    /// Set the policy for clusters without any assigned sample.
    /// ## Default
    /// [`EmptyClusterPolicy::KeepPrevious`]
    pub fn empty_cluster_policy(mut self, policy: EmptyClusterPolicy) -> Self {
        self.config.empty_cluster_policy = policy; self
    }
    /// Return the internally built configuration structure.
    pub fn build(self) -> KMeansConfig<'a, T> { self.config }
}


/// Lifecycle of a k-means calculation. [`RunStatus::Converged`] and [`RunStatus::MaxItersReached`]
/// are terminal, every returned [`KMeansState`] carries one of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Initializing,
    Iterating,
    Converged,
    MaxItersReached,
}

/// This is the internally used data-structure, storing the current state during calculation, as
/// well as the final result, as returned by the API.
/// All mutations are done in this structure, making [`KMeans`] immutable, and therefore allowing
/// it to be used in parallel, without having to duplicate the input-data.
///
/// ## Generics
/// - **T**: Underlying primitive type that was used for the calculation
///
/// ## Fields
/// - **k**: The amount of clusters that were requested when calculating this k-means result
/// - **distsum**: The total sum of squared distances from all samples to their respective centroids (WCSS)
/// - **centroids**: Calculated cluster centers [row-major] = [<centroid0>,<centroid1>,<centroid2>,...]
/// - **centroid_frequency**: Amount of samples in each centroid
/// - **assignments**: Vector mapping each sample to its respective nearest cluster
/// - **centroid_distances**: Vector containing each sample's squared distance to its centroid
/// - **iterations**: Amount of iterations that were run
/// - **status**: Terminal state of the calculation
/// - **warnings**: Recoverable conditions that occurred while iterating
#[derive(Clone, Debug)]
pub struct KMeansState<T: Primitive> {
    pub k: usize,
    pub distsum: T,
    pub centroids: Vec<T>,
    pub centroid_frequency: Vec<usize>,
    pub assignments: Vec<usize>,
    pub centroid_distances: Vec<T>,
    pub iterations: usize,
    pub status: RunStatus,
    pub warnings: Vec<RunWarning>,

    pub(crate) sample_dims: usize,
}
impl<T: Primitive> KMeansState<T> {
    pub(crate) fn new(sample_cnt: usize, sample_dims: usize, k: usize) -> Self {
        Self {
            k,
            distsum: T::zero(),
            centroids: vec![T::zero(); sample_dims * k],
            centroid_frequency: vec![0usize; k],
            assignments: vec![0usize; sample_cnt],
            centroid_distances: vec![T::infinity(); sample_cnt],
            iterations: 0,
            status: RunStatus::Initializing,
            warnings: Vec::new(),
            sample_dims,
        }
    }
    pub(crate) fn set_centroid_from_iter(&mut self, idx: usize, src: impl Iterator<Item = T>) {
        self.centroids.set_nth_from_iter(idx, self.sample_dims, src);
    }

    pub fn sample_dims(&self) -> usize { self.sample_dims }

    /// Centroid of cluster **idx**
    pub fn centroid(&self, idx: usize) -> &[T] {
        self.centroids.nth_row(idx, self.sample_dims)
    }

    pub fn is_converged(&self) -> bool { self.status == RunStatus::Converged }

    /// Rename the clusters of this result according to **permutation** (old index `j` becomes `permutation[j]`).
    /// Sample memberships stay untouched, only the cluster names change.
    pub fn relabel(&self, permutation: &Permutation) -> Result<Self, KMeansError> {
        if permutation.len() != self.k {
            return Err(KMeansError::DimensionMismatch { expected: self.k, actual: permutation.len() });
        }
        let mut relabeled = self.clone();
        relabeled.assignments = permutation.apply(&self.assignments)?;
        for old in 0..self.k {
            let new = permutation[old];
            relabeled.centroid_frequency[new] = self.centroid_frequency[old];
            relabeled.centroids.set_nth_from_iter(new, self.sample_dims, self.centroid(old).iter().cloned());
        }
        Ok(relabeled)
    }
}


/// Entrypoint of this crate's API-Surface.
///
/// Create an instance of this struct, giving the samples you want to operate on. The primitive type
/// of the passed samples array will be the type used internaly for all calculations, as well as the result
/// as stored in the returned [`KMeansState`] structure. The samples are validated once here; all
/// calculations afterwards borrow them immutably.
///
/// ## Supported variants
/// - k-Means clustering (Lloyd) [`KMeans::kmeans_lloyd`]
/// - k-Means clustering (Lloyd, fused distance & assignment pass) [`KMeans::kmeans_fused`]
///
/// ## Supported initialization methods
/// - Random-Sample [`KMeans::init_random_sample`]
/// - Precomputed [`KMeans::init_precomputed`]
#[derive(Clone, Debug)]
pub struct KMeans<T: Primitive> {
    pub(crate) sample_cnt: usize,
    pub(crate) sample_dims: usize,
    pub(crate) samples: Vec<T>,
}
impl<T: Primitive> KMeans<T> {
    /// Create a new instance of the [`KMeans`] structure.
    ///
    /// ## Arguments
    /// - **samples**: Vector of samples [row-major] = [<sample0>,<sample1>,<sample2>,...]
    /// - **sample_cnt**: Amount of samples, contained in the passed **samples** vector
    /// - **sample_dims**: Amount of dimensions each sample from the **sample** vector has
    ///
    /// ## Errors
    /// - [`KMeansError::EmptyDataset`] if there are no samples or no dimensions
    /// - [`KMeansError::DimensionMismatch`] if `samples.len() != sample_cnt * sample_dims`
    /// - [`KMeansError::NonFiniteValue`] if a sample contains NaN or an infinite value
    pub fn new(samples: Vec<T>, sample_cnt: usize, sample_dims: usize) -> Result<Self, KMeansError> {
        if sample_cnt == 0 || sample_dims == 0 {
            return Err(KMeansError::EmptyDataset);
        }
        if samples.len() != sample_cnt * sample_dims {
            return Err(KMeansError::DimensionMismatch { expected: sample_cnt * sample_dims, actual: samples.len() });
        }
        if let Some(pos) = samples.iter().position(|v| !v.is_finite()) {
            return Err(KMeansError::NonFiniteValue { sample: pos / sample_dims, dim: pos % sample_dims });
        }
        Ok(Self { sample_cnt, sample_dims, samples })
    }

    /// Create a new instance from a list of equally sized rows.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self, KMeansError> {
        let sample_dims = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut samples = Vec::with_capacity(rows.len() * sample_dims);
        for row in rows {
            let row = row.as_ref();
            if row.len() != sample_dims {
                return Err(KMeansError::DimensionMismatch { expected: sample_dims, actual: row.len() });
            }
            samples.extend_from_slice(row);
        }
        Self::new(samples, rows.len(), sample_dims)
    }

    pub fn sample_cnt(&self) -> usize { self.sample_cnt }
    pub fn sample_dims(&self) -> usize { self.sample_dims }
    pub fn samples(&self) -> &[T] { &self.samples }

    /// Sample number **idx**
    pub fn sample(&self, idx: usize) -> &[T] {
        self.samples.nth_row(idx, self.sample_dims)
    }

    pub(crate) fn check_k(&self, k: usize) -> Result<(), KMeansError> {
        if k == 0 || k > self.sample_cnt {
            return Err(KMeansError::InvalidK { k, sample_cnt: self.sample_cnt });
        }
        Ok(())
    }

    pub(crate) fn check_centroids(&self, centroids: &[T]) -> Result<usize, KMeansError> {
        if centroids.is_empty() || centroids.len() % self.sample_dims != 0 {
            return Err(KMeansError::DimensionMismatch { expected: self.sample_dims, actual: centroids.len() });
        }
        Ok(centroids.len() / self.sample_dims)
    }

    /// Distance engine: euclidean distances between all samples and all **centroids**.
    ///
    /// ## Arguments
    /// - **centroids**: Centroids [row-major] with the same dimensionality as the samples
    ///
    /// ## Returns
    /// A `sample_cnt x k` [`DistanceMatrix`], or [`KMeansError::DimensionMismatch`] if the centroids
    /// can not be split into points of the sample dimensionality.
    pub fn distance_matrix(&self, centroids: &[T]) -> Result<DistanceMatrix<T>, KMeansError> {
        self.check_centroids(centroids)?;
        Ok(DistanceMatrix::from_rows(&self.samples, centroids, self.sample_dims))
    }

    /// Reassign every sample to its nearest centroid (ties go to the lowest index) and refresh the
    /// squared centroid distances.
    pub(crate) fn update_cluster_assignments(&self, state: &mut KMeansState<T>) {
        let centroids = &state.centroids;
        self.samples.chunks_exact(self.sample_dims)
            .zip(state.assignments.iter_mut())
            .zip(state.centroid_distances.iter_mut())
            .for_each(|((s, assignment), centroid_dist)| {
                let distances: Vec<T> = centroids.chunks_exact(self.sample_dims)
                    .map(|c| crate::distances::euclidean_distance(s, c))
                    .collect();
                *assignment = crate::distances::nearest(&distances);
                *centroid_dist = squared_euclidean(s, centroids.nth_row(*assignment, self.sample_dims));
            });
    }

    pub(crate) fn update_cluster_frequencies(&self, assignments: &[usize], centroid_frequency: &mut[usize]) -> usize {
        centroid_frequency.iter_mut().for_each(|v| *v = 0);
        let mut used_centroids_cnt = 0;
        assignments.iter().cloned()
            .for_each(|centroid_id| {
                if centroid_frequency[centroid_id] == 0 {
                    used_centroids_cnt += 1; // Count the amount of centroids with more than 0 samples
                }
                centroid_frequency[centroid_id] += 1;
            });
        used_centroids_cnt
    }

    /// Bring **state** in line with its centroids: labels, squared distances, frequencies and distsum
    /// are all recomputed from the current centroid set.
    pub(crate) fn finalize(&self, state: &mut KMeansState<T>) {
        self.update_cluster_assignments(state);
        self.update_cluster_frequencies(&state.assignments, &mut state.centroid_frequency);
        state.distsum = state.centroid_distances.iter().cloned().sum();
    }


    /// Normal K-Means algorithm implementation (Lloyd).
    ///
    /// Each iteration computes the full distance matrix, assigns every sample to its nearest centroid and
    /// moves every centroid into the mean of its samples, until the configured [`AbortStrategy`] is
    /// satisfied or the iteration limit is reached.
    ///
    /// ## Arguments
    /// - **k**: Amount of clusters to search for
    /// - **init**: Initialization-Method to use for the initialization of the **k** centroids
    /// - **config**: [`KMeansConfig`] instance, containing several configuration options for the calculation.
    ///
    /// ## Returns
    /// Instance of [`KMeansState`], containing the final state (result).
    ///
    /// ## Example
    /// ```rust
    /// use segmentation::*;
    ///
    /// let samples = vec![0.0f64, 0.0, 0.0, 1.0, 10.0, 0.0, 10.0, 1.0];
    /// let kmean = KMeans::new(samples, 4, 2).unwrap();
    /// let conf = KMeansConfig::build().seed(42).build();
    /// let result = kmean.kmeans_lloyd(2, KMeans::init_random_sample, &conf).unwrap();
    ///
    /// println!("Centroids: {:?}", result.centroids);
    /// println!("Cluster-Assignments: {:?}", result.assignments);
    /// println!("Error: {}", result.distsum);
    /// ```
    pub fn kmeans_lloyd<F>(&self, k: usize, init: F, config: &KMeansConfig<'_, T>) -> Result<KMeansState<T>, KMeansError>
                where F: FnOnce(&KMeans<T>, &mut KMeansState<T>, &mut dyn RngCore) -> Result<(), KMeansError> {
        crate::variants::Lloyd.calculate(self, k, init, config)
    }

    /// Lloyd's algorithm with the distance computation fused into the (parallel) assignment pass, so the
    /// distance matrix is never materialized. Same contract as [`KMeans::kmeans_lloyd`].
    pub fn kmeans_fused<F>(&self, k: usize, init: F, config: &KMeansConfig<'_, T>) -> Result<KMeansState<T>, KMeansError>
                where F: FnOnce(&KMeans<T>, &mut KMeansState<T>, &mut dyn RngCore) -> Result<(), KMeansError> {
        crate::variants::FusedLloyd.calculate(self, k, init, config)
    }

    /// Run Lloyd's algorithm with random-sample initialization and centroid-shift convergence.
    ///
    /// ## Arguments
    /// - **k**: Amount of clusters to search for
    /// - **seed**: Seed for the centroid initialization
    /// - **tolerance**: Centroid movement below which the calculation is considered converged
    /// - **max_iter**: Limit the maximum amount of iterations
    pub fn run(&self, k: usize, seed: u64, tolerance: T, max_iter: usize) -> Result<KMeansState<T>, KMeansError> {
        let conf = KMeansConfig::build()
            .seed(seed)
            .tolerance(tolerance)
            .max_iter(max_iter)
            .build();
        self.kmeans_lloyd(k, KMeans::init_random_sample, &conf)
    }

    /// Draw the **k** initial centroids [row-major] that a calculation seeded with **seed** would start from.
    pub fn initialize(&self, k: usize, seed: u64) -> Result<Vec<T>, KMeansError> {
        self.check_k(k)?;
        let mut state = KMeansState::new(self.sample_cnt, self.sample_dims, k);
        let mut rnd = rand::rngs::StdRng::seed_from_u64(seed);
        KMeans::init_random_sample(self, &mut state, &mut rnd)?;
        Ok(state.centroids)
    }

    /// Random sample initialization method (a.k.a. Forgy)
    ///
    /// ## Description
    /// This initialization method randomly selects k distinct samples as initial centroids (sampling without
    /// replacement).
    ///
    /// ## Note
    /// This method is not meant for direct invocation. Pass a reference to it, to an instance-method of [`KMeans`].
    pub fn init_random_sample(kmean: &KMeans<T>, state: &mut KMeansState<T>, rnd: &mut dyn RngCore) -> Result<(), KMeansError> {
        crate::inits::randomsample::calculate(kmean, state, rnd)
    }

    /// Precomputed initialization method
    ///
    /// ## Description
    /// Uses the given **centroids** [row-major] as initial centroids. There have to be exactly k of them,
    /// with the dimensionality of the samples.
    pub fn init_precomputed(centroids: Vec<T>) -> impl FnOnce(&KMeans<T>, &mut KMeansState<T>, &mut dyn RngCore) -> Result<(), KMeansError> {
        move |kmean, state, _| crate::inits::precomputed::calculate(kmean, state, centroids)
    }
}


/// A k-means implementation conforming to the run contract of this crate: seeded initialization, iteration
/// until the abort strategy or the iteration limit triggers, and labels consistent with the returned centroids.
///
/// Two conforming implementations produce the same partitions up to the naming of the clusters, which
/// can be reconciled with [`align`](crate::align::align).
pub trait Clusterer<T: Primitive> {
    /// Human readable name, used for logging.
    fn name(&self) -> &'static str;

    fn calculate<F>(&self, kmean: &KMeans<T>, k: usize, init: F, config: &KMeansConfig<'_, T>) -> Result<KMeansState<T>, KMeansError>
                where F: FnOnce(&KMeans<T>, &mut KMeansState<T>, &mut dyn RngCore) -> Result<(), KMeansError>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_validation() {
        assert_eq!(KMeans::<f64>::new(vec![], 0, 2).unwrap_err(), KMeansError::EmptyDataset);
        assert_eq!(
            KMeans::new(vec![1.0f64, 2.0, 3.0], 2, 2).unwrap_err(),
            KMeansError::DimensionMismatch { expected: 4, actual: 3 }
        );
        assert_eq!(
            KMeans::new(vec![1.0f32, 2.0, f32::NAN, 0.0], 2, 2).unwrap_err(),
            KMeansError::NonFiniteValue { sample: 1, dim: 0 }
        );
        assert_eq!(
            KMeans::from_rows(&[vec![1.0f64, 2.0], vec![3.0]]).unwrap_err(),
            KMeansError::DimensionMismatch { expected: 2, actual: 1 }
        );
        let kmean = KMeans::from_rows(&[[1.0f64, 2.0], [3.0, 4.0]]).unwrap();
        assert_eq!((kmean.sample_cnt(), kmean.sample_dims()), (2, 2));
        assert_eq!(kmean.sample(1), &[3.0, 4.0]);
    }

    #[test]
    fn invalid_k_is_rejected_before_computation() {
        let kmean = KMeans::from_rows(&[[0.0f64], [1.0], [2.0]]).unwrap();
        let calls = std::sync::atomic::AtomicUsize::new(0);
        let count = |_: &KMeansState<f64>| { calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst); };
        let conf = KMeansConfig::build().init_done(&count).build();
        assert_eq!(
            kmean.kmeans_lloyd(4, KMeans::init_random_sample, &conf).unwrap_err(),
            KMeansError::InvalidK { k: 4, sample_cnt: 3 }
        );
        assert_eq!(
            kmean.kmeans_lloyd(0, KMeans::init_random_sample, &conf).unwrap_err(),
            KMeansError::InvalidK { k: 0, sample_cnt: 3 }
        );
        assert_eq!(kmean.initialize(4, 0).unwrap_err(), KMeansError::InvalidK { k: 4, sample_cnt: 3 });
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[test]
    fn distance_matrix_dimension_mismatch() {
        let kmean = KMeans::from_rows(&[[0.0f64, 0.0], [1.0, 1.0]]).unwrap();
        assert!(matches!(kmean.distance_matrix(&[0.0, 0.0, 1.0]), Err(KMeansError::DimensionMismatch { .. })));
        assert!(matches!(kmean.distance_matrix(&[]), Err(KMeansError::DimensionMismatch { .. })));
        let matrix = kmean.distance_matrix(&[1.0, 1.0]).unwrap();
        assert_eq!(matrix.get(1, 0), 0.0);
        assert_approx_eq!(matrix.get(0, 0), 2.0f64.sqrt(), 1e-12);
    }

    #[test]
    fn config_builder() {
        let conf = KMeansConfig::<f64>::build()
            .seed(7)
            .max_iter(12)
            .tolerance(1e-6)
            .empty_cluster_policy(EmptyClusterPolicy::StealFarthest)
            .build();
        assert_eq!(conf.seed(), 7);
        assert_eq!(conf.max_iter(), 12);
        assert_eq!(conf.abort_strategy(), AbortStrategy::CentroidShift { tolerance: 1e-6 });
        assert_eq!(conf.empty_cluster_policy(), EmptyClusterPolicy::StealFarthest);
        assert_eq!(conf.with_seed(3).seed(), 3);

        let defaults = KMeansConfig::<f64>::default();
        assert_eq!((defaults.seed(), defaults.max_iter()), (0, 100));
        assert_eq!(defaults.abort_strategy(), AbortStrategy::CentroidShift { tolerance: 1e-4 });
        assert_eq!(defaults.empty_cluster_policy(), EmptyClusterPolicy::KeepPrevious);
    }

    #[test]
    fn invalid_tolerance_is_rejected() {
        let kmean = KMeans::from_rows(&[[0.0f64], [1.0]]).unwrap();
        let conf = KMeansConfig::build().tolerance(-1.0).build();
        assert!(matches!(kmean.kmeans_lloyd(1, KMeans::init_random_sample, &conf), Err(KMeansError::InvalidConfig(_))));
    }
}
