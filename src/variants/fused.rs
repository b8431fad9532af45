use crate::{api::Clusterer, memory::*, KMeans, KMeansConfig, KMeansError, KMeansState, RunStatus, RunWarning};
use log::{debug, warn};
use rand::{prelude::*, RngCore};
use rayon::prelude::*;

/// Lloyd's algorithm without a materialized distance matrix: every sample looks up its nearest centroid
/// directly (in parallel), the centroid sums are accumulated in a second, sequential pass.
///
/// Produces the same partitions as [`Lloyd`](super::Lloyd), which makes it useful as an independent
/// cross-check of that implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct FusedLloyd;

impl FusedLloyd {
    /// Returns the new distsum
    fn assign<T: Primitive>(data: &KMeans<T>, state: &mut KMeansState<T>) -> T {
        let (centroids, dims) = (&state.centroids, data.sample_dims);
        // manually calculate work-packet size, because rayon does not do static scheduling (which is more apropriate here)
        let work_packet_size = (data.sample_cnt / rayon::current_num_threads()).max(1);
        data.samples.par_chunks_exact(dims)
            .with_min_len(work_packet_size)
            .zip(state.assignments.par_iter_mut())
            .zip(state.centroid_distances.par_iter_mut())
            .for_each(|((s, assignment), centroid_dist)| {
                // compared on the euclidean distance like the distance matrix, so ties resolve identically
                let (best_idx, _, best_sq) = centroids.chunks_exact(dims)
                    .map(|c| squared_euclidean(s, c))
                    .enumerate()
                    .fold((0, T::infinity(), T::infinity()), |best, (idx, sq)| {
                        let d = sq.sqrt();
                        if d < best.1 { (idx, d, sq) } else { best }
                    });
                *assignment = best_idx;
                *centroid_dist = best_sq;
            });
        state.centroid_distances.iter().cloned().sum()
    }

    fn update_centroids<T: Primitive>(data: &KMeans<T>, state: &mut KMeansState<T>, iteration: usize, config: &KMeansConfig<'_, T>) -> Vec<T> {
        let dims = data.sample_dims;
        let mut new_centroids = vec![T::zero(); state.centroids.len()];
        state.centroid_frequency.iter_mut().for_each(|f| *f = 0);
        for (s, &centroid_id) in state.assignments.iter().enumerate() {
            state.centroid_frequency[centroid_id] += 1;
            for (c, sv) in new_centroids[centroid_id * dims..(centroid_id + 1) * dims].iter_mut().zip(data.sample(s)) {
                *c += sv;
            }
        }
        super::update_centroids(data, state, &mut new_centroids, iteration, config.empty_cluster_policy);
        new_centroids
    }
}

impl<T: Primitive> Clusterer<T> for FusedLloyd {
    fn name(&self) -> &'static str { "fused-lloyd" }

    fn calculate<F>(&self, data: &KMeans<T>, k: usize, init: F, config: &KMeansConfig<'_, T>) -> Result<KMeansState<T>, KMeansError>
                where F: FnOnce(&KMeans<T>, &mut KMeansState<T>, &mut dyn RngCore) -> Result<(), KMeansError> {
        data.check_k(k)?;
        config.validate()?;

        let mut state = KMeansState::new(data.sample_cnt, data.sample_dims, k);
        state.distsum = T::infinity();
        let mut rnd = StdRng::seed_from_u64(config.seed);
        init(data, &mut state, &mut rnd)?;
        data.check_centroids(&state.centroids)?;
        state.status = RunStatus::Iterating;
        debug!("{}: initialization of k={} completed (seed {})", Clusterer::<T>::name(self), k, config.seed);
        (config.init_done)(&state);

        let mut abort_strategy = config.abort_strategy.create_logic();
        let mut last_shift = T::infinity();
        while state.iterations < config.max_iter {
            let iteration = state.iterations + 1;
            let new_distsum = Self::assign(data, &mut state);
            let new_centroids = Self::update_centroids(data, &mut state, iteration, config);
            last_shift = super::centroid_shift(&state.centroids, &new_centroids);
            state.centroids = new_centroids;
            state.iterations = iteration;

            (config.iteration_done)(&state, iteration, new_distsum);
            let proceed = abort_strategy.next(last_shift, new_distsum);
            state.distsum = new_distsum;
            if !proceed {
                state.status = RunStatus::Converged;
                break;
            }
        }
        if state.status != RunStatus::Converged {
            state.status = RunStatus::MaxItersReached;
            let shift = last_shift.to_f64().unwrap_or(f64::INFINITY);
            warn!("k={}: no convergence after {} iterations (last shift {:e})", k, state.iterations, shift);
            state.warnings.push(RunWarning::NonConvergence { iterations: state.iterations, shift });
        }

        state.distsum = Self::assign(data, &mut state);
        data.update_cluster_frequencies(&state.assignments, &mut state.centroid_frequency);
        Ok(state)
    }
}


#[cfg(test)]
mod tests {
    use crate::*;

    fn blobs() -> KMeans<f64> {
        let centers = [[0.0, 0.0], [8.0, 1.0], [3.0, 9.0]];
        let rows: Vec<[f64; 2]> = (0..90)
            .map(|i| {
                let c = centers[i % 3];
                let x = i as f64;
                [c[0] + (x * 0.91).sin(), c[1] + (x * 1.7).cos()]
            })
            .collect();
        KMeans::from_rows(&rows).unwrap()
    }

    #[test]
    fn matches_lloyd() {
        let kmean = blobs();
        for seed in 0..8 {
            let conf = KMeansConfig::build().seed(seed).build();
            let lloyd = kmean.kmeans_lloyd(3, KMeans::init_random_sample, &conf).unwrap();
            let fused = kmean.kmeans_fused(3, KMeans::init_random_sample, &conf).unwrap();
            assert_eq!(lloyd.assignments, fused.assignments);
            assert_eq!(lloyd.iterations, fused.iterations);
            assert_eq!(lloyd.status, fused.status);
            for (l, f) in lloyd.centroids.iter().zip(fused.centroids.iter()) {
                assert_approx_eq!(l, f, 1e-9);
            }
            assert_approx_eq!(lloyd.distsum, fused.distsum, 1e-9);
        }
    }

    #[test]
    fn rounded_ties_resolve_like_lloyd() {
        // squared distances of sample 0: 4 + 2^-50 and 4, both euclidean distances round to 2.0
        let kmean = KMeans::from_rows(&[[0.0f64, 0.0], [2.0, -5.0]]).unwrap();
        let centroids = vec![2.0, 2.0f64.powi(-25), 2.0, 0.0];
        let matrix = kmean.distance_matrix(&centroids).unwrap();
        assert_eq!(matrix.get(0, 0), matrix.get(0, 1));

        let conf = KMeansConfig::build().max_iter(0).build();
        let lloyd = kmean.kmeans_lloyd(2, KMeans::init_precomputed(centroids.clone()), &conf).unwrap();
        let fused = kmean.kmeans_fused(2, KMeans::init_precomputed(centroids), &conf).unwrap();
        assert_eq!(lloyd.assignments, vec![0, 1]);
        assert_eq!(fused.assignments, lloyd.assignments);
        assert_eq!(fused.centroid_distances, lloyd.centroid_distances);
        assert_eq!(fused.distsum, lloyd.distsum);
    }

    #[test]
    fn empty_cluster_handling() {
        let kmean = KMeans::new(vec![1.0, 0.0, 2.0, 0.0, 3.0, 0.0], 3, 2).unwrap();
        let conf = KMeansConfig::build()
            .max_iter(1)
            .empty_cluster_policy(EmptyClusterPolicy::StealFarthest)
            .build();
        let res = kmean.kmeans_fused(2, KMeans::init_precomputed(vec![2.0, 0.0, 1337.0, 0.0]), &conf).unwrap();
        assert_eq!(res.distsum, 0.5);
        assert_eq!(&res.assignments, &[0, 0, 1]);
        assert_eq!(&res.centroids, &[1.5, 0.0, 3.0, 0.0]);
        assert_eq!(res.status, RunStatus::MaxItersReached);
    }
}
