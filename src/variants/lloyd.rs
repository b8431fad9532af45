use crate::{api::Clusterer, memory::*, KMeans, KMeansConfig, KMeansError, KMeansState, RunStatus, RunWarning};
use log::{debug, warn};
use rand::{prelude::*, RngCore};

/// Lloyd's algorithm, one phase per iteration: distance matrix -> assignment -> centroid update.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lloyd;

impl Lloyd {
    fn update_centroids<T: Primitive>(data: &KMeans<T>, state: &mut KMeansState<T>, iteration: usize, config: &KMeansConfig<'_, T>) -> Vec<T> {
        // Sum all samples in a cluster together into new_centroids
        let mut new_centroids = vec![T::zero(); state.centroids.len()];
        data.update_cluster_frequencies(&state.assignments, &mut state.centroid_frequency);
        data.samples.chunks_exact(data.sample_dims)
            .zip(state.assignments.iter().cloned())
            .for_each(|(s, centroid_id)| {
                new_centroids.nth_row_mut(centroid_id, data.sample_dims).iter_mut()
                    .zip(s.iter())
                    .for_each(|(c, sv)| *c += sv);
            });
        super::update_centroids(data, state, &mut new_centroids, iteration, config.empty_cluster_policy);
        new_centroids
    }
}

impl<T: Primitive> Clusterer<T> for Lloyd {
    fn name(&self) -> &'static str { "lloyd" }

    fn calculate<F>(&self, data: &KMeans<T>, k: usize, init: F, config: &KMeansConfig<'_, T>) -> Result<KMeansState<T>, KMeansError>
                where F: FnOnce(&KMeans<T>, &mut KMeansState<T>, &mut dyn RngCore) -> Result<(), KMeansError> {
        data.check_k(k)?;
        config.validate()?;

        let mut state = KMeansState::new(data.sample_cnt, data.sample_dims, k);
        state.distsum = T::infinity();

        // Initialize clusters and notify subscriber
        let mut rnd = StdRng::seed_from_u64(config.seed);
        init(data, &mut state, &mut rnd)?;
        data.check_centroids(&state.centroids)?;
        state.status = RunStatus::Iterating;
        debug!("{}: initialization of k={} completed (seed {})", Clusterer::<T>::name(self), k, config.seed);
        (config.init_done)(&state);
        let mut abort_strategy = config.abort_strategy.create_logic();

        let mut shift = T::infinity();
        for i in 1..=config.max_iter {
            let distances = data.distance_matrix(&state.centroids)?;
            state.assignments = distances.assign();
            drop(distances);
            let centroids = &state.centroids;
            state.centroid_distances.iter_mut()
                .zip(state.assignments.iter().enumerate())
                .for_each(|(cd, (s, &c))| {
                    *cd = squared_euclidean(data.sample(s), centroids.nth_row(c, data.sample_dims));
                });
            let new_distsum: T = state.centroid_distances.iter().cloned().sum();

            let new_centroids = Self::update_centroids(data, &mut state, i, config);
            shift = super::centroid_shift(&state.centroids, &new_centroids);
            state.centroids = new_centroids;
            state.iterations = i;

            // Notify subscriber about finished iteration
            debug!("Iteration {} - Error: {:.2} -> {:.2} | Improvement: {:.2} | Shift: {:.2e}",
                i, state.distsum, new_distsum, state.distsum - new_distsum, shift);
            (config.iteration_done)(&state, i, new_distsum);
            let proceed = abort_strategy.next(shift, new_distsum);
            state.distsum = new_distsum;
            if !proceed {
                state.status = RunStatus::Converged;
                break;
            }
        }

        if state.status != RunStatus::Converged {
            state.status = RunStatus::MaxItersReached;
            let shift = shift.to_f64().unwrap_or(f64::INFINITY);
            warn!("k={}: no convergence after {} iterations (last shift {:e})", k, state.iterations, shift);
            state.warnings.push(RunWarning::NonConvergence { iterations: state.iterations, shift });
        }

        // Labels have to match the returned centroids, not the ones before the last update
        data.finalize(&mut state);
        Ok(state)
    }
}
