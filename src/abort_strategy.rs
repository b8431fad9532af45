use crate::{memory::*, KMeansError};

/// Enum with possible abort strategies.
/// These strategies specify when a running iteration (with the k-means calculation) is considered converged.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AbortStrategy<T: Primitive> {
	/// This strategy aborts the calculation as soon as the centroids moved less than **tolerance** within one
	/// iteration. Movement is the euclidean norm over the difference of the complete centroid set.
	/// ## Fields:
	/// - **tolerance**: Movement below which the centroids are considered converged (`shift < tolerance`)
	CentroidShift { tolerance: T },
	/// This strategy aborts the calculation directly after an iteration produced no improvement where `improvement > threshold`
	/// for the first time.
	/// ## Fields:
	/// - **threshold**: Threshold, used to detect an improvement (`improvement > threshold`)
	NoImprovement { threshold: T },
}
impl<T: Primitive> Default for AbortStrategy<T> {
	fn default() -> Self {
		AbortStrategy::CentroidShift { tolerance: T::from(1e-4).unwrap_or_else(T::epsilon) }
	}
}
impl<T: Primitive> AbortStrategy<T> {
	pub(crate) fn validate(&self) -> Result<(), KMeansError> {
		let (name, value) = match *self {
			AbortStrategy::CentroidShift{tolerance} => ("tolerance", tolerance),
			AbortStrategy::NoImprovement{threshold} => ("threshold", threshold),
		};
		if !value.is_finite() || value < T::zero() {
			return Err(KMeansError::InvalidConfig(format!("{} has to be finite and >= 0, got {}", name, value)));
		}
		Ok(())
	}

	pub(crate) fn create_logic(&self) -> Box<dyn AbortStrategyLogic<T>> {
		match *self {
			AbortStrategy::CentroidShift{tolerance} => Box::new(CentroidShiftLogic { tolerance }),
			AbortStrategy::NoImprovement{threshold} => Box::new(NoImprovementLogic {
				threshold,
				prev_error: T::infinity()
			})
		}
	}
}

pub(crate) trait AbortStrategyLogic<T: Primitive> {
	/// Function that has to be called once an iteration of the calculation ended.
	/// ## Arguments
	/// - **shift**: Movement of the centroids during this iteration
	/// - **error**: The new error (distsum), after an iteration
	/// ## Returns
	/// - **true** if the calculation should continue
	/// - **false** if the calculation converged
	fn next(&mut self, shift: T, error: T) -> bool;
}


pub(crate) struct CentroidShiftLogic<T: Primitive> {
	tolerance: T
}
impl<T: Primitive> AbortStrategyLogic<T> for CentroidShiftLogic<T> {
	fn next(&mut self, shift: T, _error: T) -> bool {
		!(shift < self.tolerance)
	}
}


pub(crate) struct NoImprovementLogic<T: Primitive> {
	threshold: T,
	prev_error: T
}
impl<T: Primitive> AbortStrategyLogic<T> for NoImprovementLogic<T> {
	fn next(&mut self, _shift: T, error: T) -> bool {
		let improvement = self.prev_error - error;
		self.prev_error = error;
		improvement > self.threshold
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	#[test] fn test_centroid_shift_f32() { test_centroid_shift::<f32>(); }
	#[test] fn test_centroid_shift_f64() { test_centroid_shift::<f64>(); }

	fn test_centroid_shift<T: Primitive>() {
		let error = T::from(10.0).unwrap();
		let mut abort_strategy = AbortStrategy::<T>::default().create_logic();
		assert_eq!(abort_strategy.next( T::from(1.0).unwrap(), error ), true);
		assert_eq!(abort_strategy.next( T::from(0.0001).unwrap(), error ), true);
		assert_eq!(abort_strategy.next( T::from(0.00009).unwrap(), error ), false);
		assert_eq!(abort_strategy.next( T::zero(), error ), false);

		// zero tolerance never converges, not even on zero movement
		let mut abort_strategy = AbortStrategy::CentroidShift { tolerance: T::zero() }.create_logic();
		assert_eq!(abort_strategy.next( T::zero(), error ), true);
	}

	#[test] fn test_no_improvement_f32() { test_no_improvement::<f32>(); }
	#[test] fn test_no_improvement_f64() { test_no_improvement::<f64>(); }

	fn test_no_improvement<T: Primitive>() {
		let shift = T::one();
		{
			let mut abort_strategy = AbortStrategy::NoImprovement { threshold: T::from(0.0005).unwrap() }.create_logic();
			assert_eq!(abort_strategy.next( shift, T::from(3000.0).unwrap() ), true);
			assert_eq!(abort_strategy.next( shift, T::from(3000.0).unwrap() ), false);
		}
		{
			let mut abort_strategy = AbortStrategy::NoImprovement { threshold: T::from(0.0005).unwrap() }.create_logic();
			assert_eq!(abort_strategy.next( shift, T::from(3000.0).unwrap() ), true);
			assert_eq!(abort_strategy.next( shift, T::from(2000.0).unwrap() ), true);
			assert_eq!(abort_strategy.next( shift, T::from(1999.99).unwrap() ), true);
			assert_eq!(abort_strategy.next( shift, T::from(1999.99999999).unwrap() ), false);
		}
	}

	#[test]
	fn validation() {
		assert!(AbortStrategy::<f64>::default().validate().is_ok());
		assert!(AbortStrategy::CentroidShift { tolerance: -1.0f64 }.validate().is_err());
		assert!(AbortStrategy::NoImprovement { threshold: f32::NAN }.validate().is_err());
	}
}
