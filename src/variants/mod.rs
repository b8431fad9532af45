mod fused;
mod lloyd;

pub use fused::FusedLloyd;
pub use lloyd::Lloyd;

use crate::{memory::*, EmptyClusterPolicy, KMeans, KMeansState, RunWarning};
use log::warn;

/// Euclidean norm of the movement of the whole centroid set.
pub(crate) fn centroid_shift<T: Primitive>(old: &[T], new: &[T]) -> T {
    squared_euclidean(old, new).sqrt()
}

/// Turn the per-cluster sums in **new_centroids** into means. `state.centroid_frequency` has to hold the amount of
/// samples summed up per cluster, `state.centroids` still holds the previous centroids.
///
/// Empty clusters are resolved with **policy** first, each of them is reported as [`RunWarning::EmptyCluster`].
pub(crate) fn update_centroids<T: Primitive>(
    data: &KMeans<T>, state: &mut KMeansState<T>, new_centroids: &mut [T], iteration: usize, policy: EmptyClusterPolicy,
) {
    let dims = data.sample_dims;
    if state.centroid_frequency.iter().any(|&f| f == 0) {
        resolve_empty_clusters(data, state, new_centroids, iteration, policy);
    }
    new_centroids.chunks_exact_mut(dims)
        .zip(state.centroids.chunks_exact(dims))
        .zip(state.centroid_frequency.iter().cloned())
        .for_each(|((nc, c), cfreq)| {
            if cfreq == 0 { // KeepPrevious
                nc.copy_from_slice(c);
            } else {
                let cfreq = T::from(cfreq).unwrap_or_else(T::one);
                nc.iter_mut().for_each(|v| *v /= cfreq);
            }
        });
}

fn resolve_empty_clusters<T: Primitive>(
    data: &KMeans<T>, state: &mut KMeansState<T>, new_centroids: &mut [T], iteration: usize, policy: EmptyClusterPolicy,
) {
    let dims = data.sample_dims;
    let mut distance_sorted_samples: Vec<usize> = (0..data.sample_cnt).collect();
    distance_sorted_samples.sort_by(|&i1, &i2| {
        state.centroid_distances[i1].partial_cmp(&state.centroid_distances[i2]).unwrap_or(std::cmp::Ordering::Equal)
    });

    for i in 0..state.k {
        if state.centroid_frequency[i] != 0 {
            continue;
        }
        warn!("Iteration {}: cluster {} has no samples, applying {:?}", iteration, i, policy);
        state.warnings.push(RunWarning::EmptyCluster { iteration, cluster: i });
        if policy != EmptyClusterPolicy::StealFarthest {
            continue;
        }
        // Find the sample with the highest distance to its centroid, that is not alone in its cluster
        let candidate = distance_sorted_samples.iter().rev().cloned()
            .find(|&s| state.centroid_frequency[state.assignments[s]] > 1);
        let sample_id = match candidate {
            Some(sample_id) => sample_id,
            None => continue, // only possible for k > sample_cnt, which is rejected upfront
        };
        let prev_centroid_id = state.assignments[sample_id];
        // Re-Assign found sample to centroid without any samples
        state.centroid_frequency[prev_centroid_id] -= 1;
        state.centroid_frequency[i] += 1;
        // Centroid is moved into the chosen point -> the points centroid distance is 0
        state.centroid_distances[sample_id] = T::zero();
        // new_centroids is a sum of all points within a centroid here.
        // Subtract chosen sample from its previous centroid
        new_centroids.nth_row_mut(prev_centroid_id, dims).iter_mut()
            .zip(data.sample(sample_id).iter())
            .for_each(|(cv, &sv)| { *cv -= sv; });
        // Chosen sample is single point in cluster -> set cluster's sum to chosen point
        new_centroids.set_nth_from_iter(i, dims, data.sample(sample_id).iter().cloned());
        state.assignments[sample_id] = i;
    }
}
