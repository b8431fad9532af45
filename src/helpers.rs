#[cfg(test)]
macro_rules! assert_approx_eq {
	($left: expr, $right: expr, $tol: expr) => ({
		match ($left, $right, $tol) {
			(left_val , right_val, tol_val) => {
				let delta = (left_val - right_val).abs();
				if !(delta < tol_val) {
					panic!(
						"assertion failed: `(left ≈ right)` \
						(left: `{}`, right: `{}`) \
						with ∆={:1.1e} (allowed ∆={:e})",
						left_val , right_val, delta, tol_val
					)
				}
			}
		}
	});
	($left: expr, $right: expr) => (assert_approx_eq!(($left), ($right), 1e-15))
}

#[cfg(test)]
pub(crate) mod testing {
	use crate::{align::{align_state, disagreement}, KMeansState, Primitive};

	/// Assert that two runs found the same clustering, regardless of how the clusters are numbered.
	pub fn assert_same_result<T: Primitive>(should: &KMeansState<T>, actual: &KMeansState<T>, epsilon: T) {
		assert_eq!(should.k, actual.k, "different amount of clusters");
		let aligned = align_state(should, actual).unwrap();
		if disagreement(&should.assignments, &aligned.assignments) != 0 {
			panic!(
				"Cluster assignments differ after alignment.\nShould: {:?}\nActual: {:?}\nAligned: {:?}",
				should.assignments, actual.assignments, aligned.assignments
			);
		}
		assert_eq!(should.centroid_frequency, aligned.centroid_frequency);
		assert_approx_eq!(should.distsum, aligned.distsum, epsilon);
		for (idx, (s, a)) in should.centroids.iter().zip(aligned.centroids.iter()).enumerate() {
			if (*s - *a).abs() > epsilon {
				panic!("Centroid mismatch at idx {}. Actual: {} but should have been: {}", idx, a, s);
			}
		}
	}
}


#[cfg(test)]
mod tests {
	use crate::*;

	#[test]
	fn same_result_ignores_cluster_names() {
		let kmean = KMeans::from_rows(&[[0.0f64], [0.5], [9.0], [10.0], [20.0], [21.0]]).unwrap();
		let a = kmean.kmeans_lloyd(3, KMeans::init_precomputed(vec![0.0, 9.0, 20.0]), &KMeansConfig::default()).unwrap();
		let b = kmean.kmeans_lloyd(3, KMeans::init_precomputed(vec![21.0, 0.5, 10.0]), &KMeansConfig::default()).unwrap();
		assert_ne!(a.assignments, b.assignments);
		super::testing::assert_same_result(&a, &b, 1e-12);
	}

	#[test]
	#[should_panic]
	fn different_partitions_are_detected() {
		let kmean = KMeans::from_rows(&[[0.0f64], [1.0], [2.0], [3.0]]).unwrap();
		let a = kmean.kmeans_lloyd(2, KMeans::init_precomputed(vec![0.0, 3.0]), &KMeansConfig::default()).unwrap();
		let b = kmean.kmeans_lloyd(2, KMeans::init_precomputed(vec![0.0, 1.0]), &KMeansConfig::build().max_iter(0).build()).unwrap();
		super::testing::assert_same_result(&a, &b, 1e-12);
	}
}
