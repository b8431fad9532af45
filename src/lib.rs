//! # segmentation - API documentation
//!
//! Seeded k-means clustering (Lloyd's algorithm) for segmentation analysis of numeric tabular data,
//! together with the tooling needed to pick and compare clusterings: label alignment between runs and
//! model-selection diagnostics (WCSS / silhouette) over a range of k.
//!
//! ## Design target
//! Every run is a pure function of its inputs: the dataset, k, the configuration, and an explicit seed.
//! There is no hidden global random state, so the same call always produces the same centroids, labels
//! and iteration count.
//! Samples are given as a plain row-major vector, instead of any high-level arithmetics / matrix crate
//! such as nalgebra or ndarray.
//!
//! ## Supported variants
//! - [`Lloyd`]: distance matrix, assignment and centroid update as separate phases
//! - [`FusedLloyd`]: same contract, distance and assignment fused into one parallel pass
//!
//! Both implement [`Clusterer`], so they are interchangeable wherever a clustering is run (e.g. in
//! [`diagnostics_with`]). Their results only differ in the naming of the clusters, if at all, which
//! [`align`] reconciles.
//!
//! ## Supported primitive types
//! - [`f32`]
//! - [`f64`]
//!
//! ## Example
//! ```rust
//! use segmentation::*;
//!
//! let table = Table::new()
//!     .with_text("region", vec!["n".into(), "n".into(), "s".into(), "s".into()])
//!     .with_numeric("income", vec![0.0, 0.0, 10.0, 10.0])
//!     .with_numeric("visits", vec![0.0, 1.0, 0.0, 1.0]);
//! let kmean: KMeans<f64> = FeatureSchema::numeric_columns(&table).unwrap().extract(&table).unwrap();
//!
//! let result = kmean.run(2, 7, 1e-4, 100).unwrap();
//! println!("Centroids: {:?}", result.centroids);
//! println!("Cluster-Assignments: {:?}", result.assignments);
//! println!("WCSS: {} after {} iterations ({:?})", result.distsum, result.iterations, result.status);
//! ```
//!
//! ## Example (using the status event callbacks)
//! ```rust
//! use segmentation::*;
//!
//! let (sample_cnt, sample_dims, k) = (2000, 8, 4);
//! let samples: Vec<f64> = (0..sample_cnt * sample_dims).map(|i| ((i * 7919) % 1000) as f64 / 1000.0).collect();
//! let kmean = KMeans::new(samples, sample_cnt, sample_dims).unwrap();
//!
//! let conf = KMeansConfig::build()
//!     .seed(1337)
//!     .max_iter(250)
//!     .init_done(&|_| println!("Initialization completed."))
//!     .iteration_done(&|s, nr, new_distsum|
//!         println!("Iteration {} - Error: {:.2} -> {:.2} | Improvement: {:.2}",
//!             nr, s.distsum, new_distsum, s.distsum - new_distsum))
//!     .build();
//! let result = kmean.kmeans_lloyd(k, KMeans::init_random_sample, &conf).unwrap();
//! for warning in &result.warnings {
//!     println!("{:?}", warning);
//! }
//! ```
//!
//! ## Short API-Overview / Description
//! Entry-point of the library is the [`KMeans`] struct. It takes over the sample data into its ownership
//! and validates it once (dimensions, finite values). Tabular input is turned into a [`KMeans`] dataset
//! through an explicit [`FeatureSchema`].
//!
//! The [`KMeans`] struct's instance-methods run the clustering variants. Calling such a method does not mutate
//! the dataset, so multiple runs can be done in parallel (which [`diagnostics`] does). Each run returns a
//! [`KMeansState`], whose [`RunStatus`] tells whether it converged, and whose [`RunWarning`]s list the
//! recoverable conditions (empty clusters, iteration limit) that occurred.
//!
//! Fatal input errors (invalid k, mismatching dimensions) are reported as [`KMeansError`] before any
//! computation starts.

#[macro_use] mod helpers;
mod memory;
mod api;
mod variants;
mod inits;
mod abort_strategy;
mod error;
pub mod distances;
pub mod align;
pub mod diagnostics;
pub mod schema;

pub use abort_strategy::AbortStrategy;
pub use api::{Clusterer, EmptyClusterPolicy, KMeans, KMeansConfig, KMeansConfigBuilder, KMeansState, RunStatus};
pub use error::{KMeansError, RunWarning};
pub use memory::Primitive;
pub use variants::{FusedLloyd, Lloyd};
pub use distances::DistanceMatrix;
pub use align::{align, align_state, Permutation};
pub use diagnostics::{diagnostics, diagnostics_with, silhouette_samples, silhouette_score, wcss, Diagnostics, DiagnosticsEntry};
pub use schema::{Column, FeatureSchema, Table};


#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::testing::assert_same_result;

    fn segments<T: Primitive>(sample_cnt: usize) -> KMeans<T> {
        let centers = [[1.0, 1.0, 0.0], [6.0, 2.0, 3.0], [2.0, 7.0, 5.0], [8.0, 8.0, 8.0]];
        let samples: Vec<T> = (0..sample_cnt)
            .flat_map(|i| {
                let c = centers[i % centers.len()];
                let x = i as f64;
                vec![c[0] + (x * 0.13).sin(), c[1] + (x * 0.29).cos(), c[2] + (x * 0.71).sin() * 0.5]
            })
            .map(|v| T::from(v).unwrap())
            .collect();
        KMeans::new(samples, sample_cnt, 3).unwrap()
    }

    fn implementations_agree<T: Primitive>(epsilon: T) {
        let kmean = segments::<T>(400);
        for seed in [0, 17, 4711] {
            let conf = KMeansConfig::build().seed(seed).build();
            let lloyd = Lloyd.calculate(&kmean, 4, KMeans::init_random_sample, &conf).unwrap();
            let fused = FusedLloyd.calculate(&kmean, 4, KMeans::init_random_sample, &conf).unwrap();
            assert_same_result(&lloyd, &fused, epsilon);
        }
    }
    #[test] fn implementations_agree_f64() { implementations_agree::<f64>(1e-9); }
    #[test] fn implementations_agree_f32() { implementations_agree::<f32>(1e-3); }

    #[test]
    fn table_to_diagnostics() {
        let mut table = Table::new().with_text("id", (0..200).map(|i| format!("c{}", i)).collect());
        let kmean = segments::<f64>(200);
        for (dim, name) in ["recency", "frequency", "monetary"].iter().enumerate() {
            table.push(*name, Column::Numeric((0..200).map(|s| kmean.sample(s)[dim]).collect()));
        }
        let extracted: KMeans<f64> = FeatureSchema::numeric_columns(&table).unwrap().extract(&table).unwrap();
        assert_eq!(extracted.samples(), kmean.samples());

        let diag = diagnostics(&extracted, 1..=6, &KMeansConfig::build().seed(3).build()).unwrap();
        assert_eq!(diag.len(), 6);
        assert!(diag.iter().all(|e| e.wcss >= 0.0));
        assert_eq!(diag.silhouette_series().len(), 5);
    }

    #[test]
    fn rerun_with_relabeled_result() {
        let kmean = segments::<f64>(100);
        let first = kmean.run(4, 1, 1e-4, 100).unwrap();
        let second = kmean.run(4, 2, 1e-4, 100).unwrap();
        let aligned = align_state(&first, &second).unwrap();
        assert!(align::disagreement(&first.assignments, &aligned.assignments) <= align::disagreement(&first.assignments, &second.assignments));
        let again = align_state(&first, &aligned).unwrap();
        assert_eq!(again.assignments, aligned.assignments);
    }
}
