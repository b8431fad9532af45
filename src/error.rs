use thiserror::Error;

/// Errors aborting a clustering operation before any result is produced.
///
/// Conditions a run recovers from (empty clusters, hitting the iteration limit) are not errors,
/// they are reported as [`RunWarning`]s on the returned state instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KMeansError {
    #[error("invalid k={k}: k has to be within [1, {sample_cnt}]")]
    InvalidK { k: usize, sample_cnt: usize },
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("dataset does not contain any samples or dimensions")]
    EmptyDataset,
    #[error("sample {sample} has a non-finite value in dimension {dim}")]
    NonFiniteValue { sample: usize, dim: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("label vectors can not be aligned: {0}")]
    LabelMismatch(String),
    #[error("diagnostics requested for an empty range of k")]
    EmptyRange,
    #[error("feature column `{0}` does not exist")]
    UnknownFeature(String),
    #[error("feature column `{0}` is not numeric")]
    NonNumericFeature(String),
    #[error("column `{column}` has {actual} rows, expected {expected}")]
    ColumnLengthMismatch { column: String, expected: usize, actual: usize },
}

/// Recoverable conditions that occurred during a run. The run still produced a valid result,
/// but it should be looked at with these in mind.
#[derive(Debug, Clone, PartialEq)]
pub enum RunWarning {
    /// No sample was assigned to **cluster** in **iteration**. The configured
    /// [`EmptyClusterPolicy`](crate::EmptyClusterPolicy) was applied.
    EmptyCluster { iteration: usize, cluster: usize },
    /// The iteration limit was reached before the abort strategy was satisfied.
    /// **shift** is the centroid movement of the last iteration.
    NonConvergence { iterations: usize, shift: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = KMeansError::InvalidK { k: 5, sample_cnt: 4 };
        assert_eq!(err.to_string(), "invalid k=5: k has to be within [1, 4]");
        let err = KMeansError::DimensionMismatch { expected: 2, actual: 3 };
        assert!(err.to_string().contains("expected 2, got 3"));
    }
}
