use crate::{memory::*, KMeans, KMeansError, KMeansState};
use rand::{seq::index, RngCore};

pub fn calculate<T: Primitive>(kmean: &KMeans<T>, state: &mut KMeansState<T>, rnd: &mut dyn RngCore) -> Result<(), KMeansError> {
    kmean.check_k(state.k)?;
    index::sample(rnd, kmean.sample_cnt, state.k).into_iter()
        .enumerate()
        .for_each(|(ci, si)| { // Copy randomly chosen samples into state.centroids
            state.set_centroid_from_iter(ci, kmean.sample(si).iter().cloned());
        });
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::KMeans;

    fn samples() -> KMeans<f64> {
        let rows: Vec<[f64; 2]> = (0..20).map(|i| [i as f64, (i * i) as f64]).collect();
        KMeans::from_rows(&rows).unwrap()
    }

    #[test]
    fn selects_k_distinct_samples() {
        let kmean = samples();
        for k in 1..=kmean.sample_cnt() {
            let centroids = kmean.initialize(k, 1337).unwrap();
            assert_eq!(centroids.len(), k * kmean.sample_dims());
            let mut picked: Vec<usize> = centroids.chunks_exact(2)
                .map(|c| (0..kmean.sample_cnt()).find(|&s| kmean.sample(s) == c).expect("centroid is a sample"))
                .collect();
            picked.sort_unstable();
            picked.dedup();
            assert_eq!(picked.len(), k);
        }
    }

    #[test]
    fn same_seed_same_centroids() {
        let kmean = samples();
        assert_eq!(kmean.initialize(5, 42).unwrap(), kmean.initialize(5, 42).unwrap());
        let differing = (0..16u64).any(|seed| kmean.initialize(5, seed).unwrap() != kmean.initialize(5, 42).unwrap());
        assert!(differing);
    }
}
