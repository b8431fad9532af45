use num::{Float, NumCast, Zero};
use std::{
    fmt::{Debug, Display, LowerExp},
    iter::Sum,
    ops::{AddAssign, DivAssign, SubAssign},
};

/// Floating point type the clustering engine can operate on.
pub trait Primitive: Float + NumCast + Zero + Sum + AddAssign + SubAssign + DivAssign
                + PartialOrd + Copy + Default + Display + Debug + Sync + Send + LowerExp + 'static
                + for<'a> AddAssign<&'a Self> {}
impl Primitive for f32 {}
impl Primitive for f64 {}

/// Row-major storage of equally sized points: `[<point0>,<point1>,<point2>,...]`
pub(crate) trait RowMajor<T> {
    fn nth_row(&self, idx: usize, dims: usize) -> &[T];
    fn nth_row_mut(&mut self, idx: usize, dims: usize) -> &mut [T];
    fn set_nth_from_iter(&mut self, idx: usize, dims: usize, src: impl Iterator<Item = T>) {
        self.nth_row_mut(idx, dims).iter_mut()
            .zip(src)
            .for_each(|(c, s)| *c = s);
    }
}
impl<T> RowMajor<T> for [T] {
    #[inline(always)]
    fn nth_row(&self, idx: usize, dims: usize) -> &[T] { &self[idx * dims..(idx + 1) * dims] }
    #[inline(always)]
    fn nth_row_mut(&mut self, idx: usize, dims: usize) -> &mut [T] { &mut self[idx * dims..(idx + 1) * dims] }
}

/// Squared euclidean distance between two points of identical dimensionality.
#[inline(always)]
pub(crate) fn squared_euclidean<T: Primitive>(a: &[T], b: &[T]) -> T {
    a.iter().zip(b.iter())
        .map(|(&av, &bv)| av - bv)      // <a> - <b>
        .map(|v| v * v)                 // <vec_components> ^2
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_access() {
        let mut rows = vec![0.0f64, 1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(rows.nth_row(1, 2), &[2.0, 3.0]);
        rows.set_nth_from_iter(2, 2, [7.0, 8.0].iter().cloned());
        assert_eq!(rows, vec![0.0, 1.0, 2.0, 3.0, 7.0, 8.0]);
    }

    #[test]
    fn squared_euclidean_distance() {
        assert_eq!(squared_euclidean(&[0.0f64, 0.0], &[3.0, 4.0]), 25.0);
        assert_eq!(squared_euclidean(&[1.5f32, -2.0], &[1.5, -2.0]), 0.0);
    }
}
