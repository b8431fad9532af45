//! Model-selection diagnostics: within-cluster sum of squares (WCSS / inertia) and silhouette scores,
//! evaluated over a range of k to find the elbow of the WCSS curve or the silhouette peak.

use crate::{api::Clusterer, distances::euclidean_distance, memory::*, variants::Lloyd, KMeans, KMeansConfig, KMeansError, KMeansState, RunStatus};
use log::{info, warn};
use rayon::prelude::*;

/// Diagnostics of a single clustering run.
#[derive(Clone, Debug, PartialEq)]
pub struct DiagnosticsEntry<T: Primitive> {
    pub k: usize,
    /// Within-cluster sum of squares of the final labels
    pub wcss: T,
    /// Mean silhouette coefficient, `None` where it is undefined (a single cluster, or every sample in its own cluster)
    pub silhouette: Option<T>,
    pub iterations: usize,
    pub status: RunStatus,
    /// Amount of recoverable conditions the run reported
    pub warnings: usize,
    /// Whether the kept run continued from the centroids of the previous k instead of a random sample
    pub warm_start: bool,
}

/// Diagnostics series, ordered by ascending k.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostics<T: Primitive> {
    entries: Vec<DiagnosticsEntry<T>>,
}
impl<T: Primitive> Diagnostics<T> {
    pub fn entries(&self) -> &[DiagnosticsEntry<T>] { &self.entries }
    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticsEntry<T>> { self.entries.iter() }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn get(&self, k: usize) -> Option<&DiagnosticsEntry<T>> {
        self.entries.iter().find(|e| e.k == k)
    }

    /// `(k, wcss)` pairs, for elbow plots.
    pub fn wcss_series(&self) -> Vec<(usize, T)> {
        self.entries.iter().map(|e| (e.k, e.wcss)).collect()
    }

    /// `(k, silhouette)` pairs of all k where the silhouette is defined.
    pub fn silhouette_series(&self) -> Vec<(usize, T)> {
        self.entries.iter().filter_map(|e| e.silhouette.map(|s| (e.k, s))).collect()
    }

    /// k at the elbow of the WCSS curve: the point where the decrease of WCSS slows down the most
    /// (largest second difference). Needs at least three entries.
    ///
    /// This is a heuristic hint, not a decision.
    pub fn elbow(&self) -> Option<usize> {
        self.entries.windows(3)
            .map(|w| (w[1].k, w[0].wcss - w[1].wcss - (w[1].wcss - w[2].wcss)))
            .fold(None, |best: Option<(usize, T)>, (k, bend)| match best {
                Some((_, b)) if !(bend > b) => best,
                _ => Some((k, bend)),
            })
            .map(|(k, _)| k)
    }

    /// k with the highest silhouette score (lowest k on ties).
    pub fn best_silhouette(&self) -> Option<(usize, T)> {
        self.silhouette_series().into_iter()
            .fold(None, |best: Option<(usize, T)>, (k, s)| match best {
                Some((_, b)) if !(s > b) => best,
                _ => Some((k, s)),
            })
    }
}

fn check_assignments<T: Primitive>(kmean: &KMeans<T>, assignments: &[usize], k: usize) -> Result<(), KMeansError> {
    if assignments.len() != kmean.sample_cnt {
        return Err(KMeansError::DimensionMismatch { expected: kmean.sample_cnt, actual: assignments.len() });
    }
    if let Some(&l) = assignments.iter().find(|&&l| l >= k) {
        return Err(KMeansError::LabelMismatch(format!("label {} out of range for k={}", l, k)));
    }
    Ok(())
}

/// Within-cluster sum of squares: the sum of squared distances between every sample and the centroid of its cluster.
pub fn wcss<T: Primitive>(kmean: &KMeans<T>, centroids: &[T], assignments: &[usize]) -> Result<T, KMeansError> {
    let k = kmean.check_centroids(centroids)?;
    check_assignments(kmean, assignments, k)?;
    Ok(kmean.samples.chunks_exact(kmean.sample_dims)
        .zip(assignments.iter())
        .map(|(s, &a)| squared_euclidean(s, centroids.nth_row(a, kmean.sample_dims)))
        .sum())
}

/// Silhouette coefficient of every sample.
///
/// `s(i) = (b(i) - a(i)) / max(a(i), b(i))`, where `a(i)` is the mean distance to the other members of the own
/// cluster and `b(i)` the mean distance to the members of the nearest other cluster. Samples that are alone in
/// their cluster get `0`.
///
/// ## Returns
/// `None` if fewer than two clusters are populated, or every sample forms its own cluster.
pub fn silhouette_samples<T: Primitive>(kmean: &KMeans<T>, assignments: &[usize], k: usize) -> Result<Option<Vec<T>>, KMeansError> {
    check_assignments(kmean, assignments, k)?;
    let mut cluster_sizes = vec![0usize; k];
    assignments.iter().for_each(|&a| cluster_sizes[a] += 1);
    let populated = cluster_sizes.iter().filter(|&&c| c > 0).count();
    if populated < 2 || populated == kmean.sample_cnt {
        return Ok(None);
    }

    let coefficients = (0..kmean.sample_cnt).map(|i| {
        let own = assignments[i];
        if cluster_sizes[own] == 1 {
            return T::zero();
        }
        // Sum of distances from sample i to all samples, per cluster
        let mut distsums = vec![T::zero(); k];
        let sample = kmean.sample(i);
        for (j, &cluster) in assignments.iter().enumerate() {
            if j != i {
                distsums[cluster] += euclidean_distance(sample, kmean.sample(j));
            }
        }
        let a = distsums[own] / T::from(cluster_sizes[own] - 1).unwrap_or_else(T::one);
        let b = (0..k)
            .filter(|&c| c != own && cluster_sizes[c] > 0)
            .map(|c| distsums[c] / T::from(cluster_sizes[c]).unwrap_or_else(T::one))
            .fold(T::infinity(), T::min);
        let max_ab = a.max(b);
        if max_ab > T::zero() { (b - a) / max_ab } else { T::zero() }
    }).collect();
    Ok(Some(coefficients))
}

/// Mean silhouette coefficient over all samples, within `[-1, 1]`, higher is better.
/// `None` where it is undefined, see [`silhouette_samples`].
pub fn silhouette_score<T: Primitive>(kmean: &KMeans<T>, assignments: &[usize], k: usize) -> Result<Option<T>, KMeansError> {
    Ok(silhouette_samples(kmean, assignments, k)?.map(|coefficients| {
        let cnt = T::from(coefficients.len()).unwrap_or_else(T::one);
        coefficients.into_iter().sum::<T>() / cnt
    }))
}

/// Initial centroids for **k** clusters: the final centroids of **previous**, extended by the samples that are
/// farthest away from the centroids picked so far (ties go to the lowest sample index).
fn extend_centroids<T: Primitive>(kmean: &KMeans<T>, previous: &KMeansState<T>, k: usize) -> Vec<T> {
    let mut centroids = previous.centroids.clone();
    let mut nearest = previous.centroid_distances.clone();
    for _ in previous.k..k {
        let (farthest, _) = nearest.iter().cloned().enumerate()
            .fold((0, T::neg_infinity()), |best, (s, d)| if d > best.1 { (s, d) } else { best });
        let added = kmean.sample(farthest);
        centroids.extend_from_slice(added);
        for (s, d) in nearest.iter_mut().enumerate() {
            *d = d.min(squared_euclidean(kmean.sample(s), added));
        }
    }
    centroids
}

/// Run [`Lloyd`] once per k in **k_range** and collect WCSS and silhouette.
///
/// Every k is calculated from a random sample of the configured seed. Except for the smallest k, it is
/// also calculated from the centroids of the previous k, extended by the samples farthest away from them.
/// Lloyd never increases the WCSS of its start, so keeping the better of both runs makes the WCSS
/// non-increasing over k.
///
/// ## Arguments
/// - **kmean**: Samples to cluster
/// - **k_range**: Values of k to evaluate, e.g. `1..=10`. Every k has to be within `[1, sample_cnt]`.
/// - **config**: Configuration shared by all runs (the seed included)
///
/// ## Returns
/// The [`Diagnostics`] series ordered by ascending k.
pub fn diagnostics<T: Primitive>(
    kmean: &KMeans<T>, k_range: impl IntoIterator<Item = usize>, config: &KMeansConfig<'_, T>,
) -> Result<Diagnostics<T>, KMeansError> {
    diagnostics_with(&Lloyd, kmean, k_range, config)
}

/// Same as [`diagnostics`], using the given [`Clusterer`] implementation.
///
/// The randomly initialized runs are calculated in parallel, the warm-started ones in order of k.
pub fn diagnostics_with<T: Primitive, C: Clusterer<T> + Sync>(
    clusterer: &C, kmean: &KMeans<T>, k_range: impl IntoIterator<Item = usize>, config: &KMeansConfig<'_, T>,
) -> Result<Diagnostics<T>, KMeansError> {
    let mut ks: Vec<usize> = k_range.into_iter().collect();
    ks.sort_unstable();
    ks.dedup();
    if ks.is_empty() {
        return Err(KMeansError::EmptyRange);
    }
    // fail before any run is started
    ks.iter().try_for_each(|&k| kmean.check_k(k))?;
    config.validate()?;

    let sampled = ks.par_iter()
        .map(|&k| clusterer.calculate(kmean, k, KMeans::init_random_sample, config))
        .collect::<Result<Vec<_>, KMeansError>>()?;

    let mut kept: Vec<(KMeansState<T>, bool)> = Vec::with_capacity(ks.len());
    for state in sampled {
        let chosen = match kept.last() {
            None => (state, false),
            Some((previous, _)) => {
                let init = KMeans::init_precomputed(extend_centroids(kmean, previous, state.k));
                let warm = clusterer.calculate(kmean, state.k, init, config)?;
                if warm.distsum < state.distsum { (warm, true) } else { (state, false) }
            }
        };
        if let Some((previous, _)) = kept.last() {
            if chosen.0.distsum > previous.distsum {
                warn!("{}: wcss increased from k={} ({:e}) to k={} ({:e})",
                    clusterer.name(), previous.k, previous.distsum, chosen.0.k, chosen.0.distsum);
            }
        }
        kept.push(chosen);
    }

    let entries = kept.par_iter()
        .map(|(state, warm_start)| {
            let silhouette = silhouette_score(kmean, &state.assignments, state.k)?;
            info!("{}: k={} wcss={:.4} silhouette={:?} after {} iterations ({:?}, warm start: {})",
                clusterer.name(), state.k, state.distsum, silhouette, state.iterations, state.status, warm_start);
            Ok(DiagnosticsEntry {
                k: state.k,
                wcss: state.distsum,
                silhouette,
                iterations: state.iterations,
                status: state.status,
                warnings: state.warnings.len(),
                warm_start: *warm_start,
            })
        })
        .collect::<Result<Vec<_>, KMeansError>>()?;
    Ok(Diagnostics { entries })
}
