use crate::{memory::*, KMeans, KMeansError, KMeansState};

pub fn calculate<T: Primitive>(kmean: &KMeans<T>, state: &mut KMeansState<T>, computed: Vec<T>) -> Result<(), KMeansError> {
    let centroid_cnt = kmean.check_centroids(&computed)?;
    if centroid_cnt != state.k {
        return Err(KMeansError::DimensionMismatch { expected: state.k * kmean.sample_dims, actual: computed.len() });
    }
    if computed.iter().any(|v| !v.is_finite()) {
        return Err(KMeansError::InvalidConfig("precomputed centroids have to be finite".to_string()));
    }
    computed.chunks_exact(kmean.sample_dims).enumerate().for_each(|(ci, c)| {
        state.set_centroid_from_iter(ci, c.iter().cloned());
    });
    Ok(())
}
