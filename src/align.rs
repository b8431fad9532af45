//! Label alignment between two clusterings of the same samples.
//!
//! Cluster indices produced by independent runs are arbitrary. Two labelings describing the same groups can
//! use different names for them, e.g. `[0, 0, 1, 1]` and `[1, 1, 0, 0]`. [`align`] finds the renaming of the
//! second labeling that agrees best with the first one, by solving the assignment problem over a `k x k`
//! disagreement matrix with the Hungarian algorithm.

use crate::{memory::Primitive, KMeansError, KMeansState};
use std::ops::Index;

/// Bijective mapping of cluster indices `0..k`. Index `j` holds the new name of cluster `j`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Permutation(Vec<usize>);

impl Permutation {
    pub fn identity(k: usize) -> Self {
        Permutation((0..k).collect())
    }

    /// Validates that **mapping** contains every index of `0..mapping.len()` exactly once.
    pub fn new(mapping: Vec<usize>) -> Result<Self, KMeansError> {
        let mut seen = vec![false; mapping.len()];
        for &m in &mapping {
            if m >= mapping.len() || seen[m] {
                return Err(KMeansError::LabelMismatch(format!("{:?} is not a permutation", mapping)));
            }
            seen[m] = true;
        }
        Ok(Permutation(mapping))
    }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn as_slice(&self) -> &[usize] { &self.0 }

    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(i, &m)| i == m)
    }

    pub fn inverse(&self) -> Self {
        let mut inverse = vec![0; self.0.len()];
        self.0.iter().enumerate().for_each(|(i, &m)| inverse[m] = i);
        Permutation(inverse)
    }

    /// Rename every label of **labels**. Memberships stay the same, only the names change.
    pub fn apply(&self, labels: &[usize]) -> Result<Vec<usize>, KMeansError> {
        labels.iter()
            .map(|&l| self.0.get(l).cloned()
                .ok_or_else(|| KMeansError::LabelMismatch(format!("label {} out of range for k={}", l, self.0.len()))))
            .collect()
    }
}

impl Index<usize> for Permutation {
    type Output = usize;
    fn index(&self, idx: usize) -> &usize { &self.0[idx] }
}

fn check_labels(labels_a: &[usize], labels_b: &[usize], k: usize) -> Result<(), KMeansError> {
    if k == 0 {
        return Err(KMeansError::InvalidK { k, sample_cnt: labels_a.len() });
    }
    if labels_a.len() != labels_b.len() {
        return Err(KMeansError::LabelMismatch(format!("{} labels vs {} labels", labels_a.len(), labels_b.len())));
    }
    if let Some(&l) = labels_a.iter().chain(labels_b.iter()).find(|&&l| l >= k) {
        return Err(KMeansError::LabelMismatch(format!("label {} out of range for k={}", l, k)));
    }
    Ok(())
}

/// Disagreement matrix `cost[i][j]`: amount of samples where exactly one of "A labels it `i`" and
/// "B labels it `j`" holds. This is the number of samples that would disagree, if A-cluster `i` and
/// B-cluster `j` were the same group.
pub fn disagreement_matrix(labels_a: &[usize], labels_b: &[usize], k: usize) -> Result<Vec<Vec<usize>>, KMeansError> {
    check_labels(labels_a, labels_b, k)?;
    let mut both = vec![vec![0usize; k]; k];
    let (mut cnt_a, mut cnt_b) = (vec![0usize; k], vec![0usize; k]);
    for (&a, &b) in labels_a.iter().zip(labels_b.iter()) {
        both[a][b] += 1;
        cnt_a[a] += 1;
        cnt_b[b] += 1;
    }
    Ok((0..k)
        .map(|i| (0..k).map(|j| cnt_a[i] + cnt_b[j] - 2 * both[i][j]).collect())
        .collect())
}

/// Amount of samples with differing labels.
pub fn disagreement(labels_a: &[usize], labels_b: &[usize]) -> usize {
    labels_a.iter().zip(labels_b.iter()).filter(|(a, b)| a != b).count()
}

/// Find the renaming of **labels_b** that agrees best with **labels_a**.
///
/// ## Arguments
/// - **labels_a**: Reference labeling
/// - **labels_b**: Labeling to rename, same length as **labels_a**
/// - **k**: Amount of clusters, all labels have to be in `0..k`
///
/// ## Returns
/// A [`Permutation`] mapping B-cluster `j` onto A-cluster `perm[j]` with minimal total disagreement.
/// Among equally good permutations, the one keeping the most indices unchanged is chosen, so an
/// already aligned pair results in the identity.
pub fn align(labels_a: &[usize], labels_b: &[usize], k: usize) -> Result<Permutation, KMeansError> {
    let disagreement = disagreement_matrix(labels_a, labels_b, k)?;
    // rows: B clusters, columns: A clusters. Scaling by k+1 keeps the total disagreement dominant,
    // the +1 per renamed index only decides between otherwise equal matchings.
    let scale = (k + 1) as i64;
    let cost: Vec<Vec<i64>> = (0..k)
        .map(|j| (0..k).map(|i| scale * disagreement[i][j] as i64 + (i != j) as i64).collect())
        .collect();
    Permutation::new(hungarian(&cost))
}

/// Relabel **other** so that its clusters carry the names of the matching clusters in **reference**.
pub fn align_state<T: Primitive>(reference: &KMeansState<T>, other: &KMeansState<T>) -> Result<KMeansState<T>, KMeansError> {
    if reference.k != other.k {
        return Err(KMeansError::LabelMismatch(format!("k={} vs k={}", reference.k, other.k)));
    }
    let permutation = align(&reference.assignments, &other.assignments, other.k)?;
    other.relabel(&permutation)
}

/// Minimum cost perfect matching on a square cost matrix (Hungarian algorithm with potentials, O(n^3)).
/// Returns the column assigned to each row.
fn hungarian(cost: &[Vec<i64>]) -> Vec<usize> {
    let n = cost.len();
    let inf = i64::MAX / 4;
    // 1-based: index 0 is the virtual start column
    let (mut u, mut v) = (vec![0i64; n + 1], vec![0i64; n + 1]);
    let mut row_of_col = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for row in 1..=n {
        row_of_col[0] = row;
        let mut col0 = 0;
        let mut minv = vec![inf; n + 1];
        let mut used = vec![false; n + 1];
        loop {
            used[col0] = true;
            let row0 = row_of_col[col0];
            let (mut delta, mut col1) = (inf, 0);
            for col in 1..=n {
                if used[col] {
                    continue;
                }
                let cur = cost[row0 - 1][col - 1] - u[row0] - v[col];
                if cur < minv[col] {
                    minv[col] = cur;
                    way[col] = col0;
                }
                if minv[col] < delta {
                    delta = minv[col];
                    col1 = col;
                }
            }
            for col in 0..=n {
                if used[col] {
                    u[row_of_col[col]] += delta;
                    v[col] -= delta;
                } else {
                    minv[col] -= delta;
                }
            }
            col0 = col1;
            if row_of_col[col0] == 0 {
                break;
            }
        }
        // augment along the alternating path
        loop {
            let col1 = way[col0];
            row_of_col[col0] = row_of_col[col1];
            col0 = col1;
            if col0 == 0 {
                break;
            }
        }
    }

    let mut col_of_row = vec![0usize; n];
    for col in 1..=n {
        col_of_row[row_of_col[col] - 1] = col - 1;
    }
    col_of_row
}
