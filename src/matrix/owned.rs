use std::fmt::{Debug, Display};
use std::ops::{Add, Mul};

use num_traits::{One, Zero};

///
/// A dense matrix that owns its elements, stored in row-major order.
///
/// Throughout this crate, lattices and modules are given by the columns of
/// such a matrix, i.e. the `j`-th column contains the coordinates of the `j`-th
/// generator.
///
/// # Example
/// ```rust
/// # use feanor_number_field::matrix::*;
/// # use num_bigint::BigInt;
/// let A = OwnedMatrix::from_fn(2, 2, |i, j| BigInt::from(i + 2 * j));
/// let B = OwnedMatrix::<BigInt>::identity(2);
/// assert_eq!(A, A.mul(&B));
/// assert_eq!(vec![BigInt::from(2), BigInt::from(3)], A.col(1));
/// ```
///
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct OwnedMatrix<T> {
    data: Vec<T>,
    row_count: usize,
    col_count: usize
}

impl<T> OwnedMatrix<T> {

    ///
    /// Creates the `row_count x col_count` [`OwnedMatrix`] whose `(i, j)`-th entry
    /// is the output of the given function on `(i, j)`.
    ///
    pub fn from_fn<F>(row_count: usize, col_count: usize, mut f: F) -> Self
        where F: FnMut(usize, usize) -> T
    {
        let mut data = Vec::with_capacity(row_count * col_count);
        for i in 0..row_count {
            for j in 0..col_count {
                data.push(f(i, j));
            }
        }
        return OwnedMatrix { data, row_count, col_count };
    }

    ///
    /// Creates the matrix whose `j`-th column is `cols[j]`. All columns must have the
    /// given length.
    ///
    pub fn from_cols(row_count: usize, cols: Vec<Vec<T>>) -> Self
        where T: Clone
    {
        assert!(cols.iter().all(|c| c.len() == row_count));
        let col_count = cols.len();
        Self::from_fn(row_count, col_count, |i, j| cols[j][i].clone())
    }

    pub fn from_rows(rows: Vec<Vec<T>>) -> Self {
        let row_count = rows.len();
        let col_count = rows.first().map(|r| r.len()).unwrap_or(0);
        assert!(rows.iter().all(|r| r.len() == col_count));
        OwnedMatrix { data: rows.into_iter().flatten().collect(), row_count, col_count }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn col_count(&self) -> usize {
        self.col_count
    }

    pub fn at(&self, i: usize, j: usize) -> &T {
        debug_assert!(i < self.row_count && j < self.col_count);
        &self.data[i * self.col_count + j]
    }

    pub fn at_mut(&mut self, i: usize, j: usize) -> &mut T {
        debug_assert!(i < self.row_count && j < self.col_count);
        &mut self.data[i * self.col_count + j]
    }

    pub fn row(&self, i: usize) -> &[T] {
        &self.data[(i * self.col_count)..((i + 1) * self.col_count)]
    }

    pub fn col(&self, j: usize) -> Vec<T>
        where T: Clone
    {
        (0..self.row_count).map(|i| self.at(i, j).clone()).collect()
    }

    pub fn cols(&self) -> Vec<Vec<T>>
        where T: Clone
    {
        (0..self.col_count).map(|j| self.col(j)).collect()
    }

    pub fn set_col(&mut self, j: usize, values: Vec<T>) {
        assert_eq!(self.row_count, values.len());
        for (i, x) in values.into_iter().enumerate() {
            *self.at_mut(i, j) = x;
        }
    }

    pub fn swap_cols(&mut self, j1: usize, j2: usize) {
        if j1 == j2 {
            return;
        }
        for i in 0..self.row_count {
            self.data.swap(i * self.col_count + j1, i * self.col_count + j2);
        }
    }

    pub fn transpose(&self) -> Self
        where T: Clone
    {
        Self::from_fn(self.col_count, self.row_count, |i, j| self.at(j, i).clone())
    }

    pub fn map<U, F>(&self, mut f: F) -> OwnedMatrix<U>
        where F: FnMut(&T) -> U
    {
        OwnedMatrix { data: self.data.iter().map(|x| f(x)).collect(), row_count: self.row_count, col_count: self.col_count }
    }

    ///
    /// Returns the submatrix consisting of the given columns.
    ///
    pub fn restrict_cols(&self, cols: std::ops::Range<usize>) -> Self
        where T: Clone
    {
        Self::from_fn(self.row_count, cols.len(), |i, j| self.at(i, cols.start + j).clone())
    }
}

impl<T> OwnedMatrix<T>
    where T: Clone + Zero
{
    pub fn zero(row_count: usize, col_count: usize) -> Self {
        Self::from_fn(row_count, col_count, |_, _| T::zero())
    }
}

impl<T> OwnedMatrix<T>
    where T: Clone + Zero + One
{
    pub fn identity(n: usize) -> Self {
        Self::from_fn(n, n, |i, j| if i == j { T::one() } else { T::zero() })
    }
}

impl<T> OwnedMatrix<T>
    where T: Clone + Zero,
        for<'a> &'a T: Mul<&'a T, Output = T>,
        T: Add<T, Output = T>
{
    pub fn mul(&self, rhs: &OwnedMatrix<T>) -> OwnedMatrix<T> {
        assert_eq!(self.col_count, rhs.row_count);
        Self::from_fn(self.row_count, rhs.col_count, |i, j| {
            (0..self.col_count).fold(T::zero(), |acc, k| acc + self.at(i, k) * rhs.at(k, j))
        })
    }

    pub fn mul_vec(&self, rhs: &[T]) -> Vec<T> {
        assert_eq!(self.col_count, rhs.len());
        (0..self.row_count).map(|i| (0..self.col_count).fold(T::zero(), |acc, k| acc + self.at(i, k) * &rhs[k])).collect()
    }
}

impl<T: Display> Display for OwnedMatrix<T> {

    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let strings = self.data.iter().map(|x| format!("{}", x)).collect::<Vec<_>>();
        let width = strings.iter().map(|s| s.chars().count()).max().unwrap_or(1);
        for i in 0..self.row_count {
            write!(f, "[")?;
            for j in 0..self.col_count {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:>width$}", strings[i * self.col_count + j], width = width)?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

impl<T: Display> Debug for OwnedMatrix<T> {

    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        <Self as Display>::fmt(self, f)
    }
}

#[cfg(test)]
use num_bigint::BigInt;

#[test]
fn test_mul_and_transpose() {
    let a = OwnedMatrix::from_rows(vec![vec![BigInt::from(1), BigInt::from(2)], vec![BigInt::from(3), BigInt::from(4)]]);
    let b = OwnedMatrix::from_cols(2, vec![vec![BigInt::from(1), BigInt::from(0)], vec![BigInt::from(1), BigInt::from(1)]]);
    let expected = OwnedMatrix::from_rows(vec![vec![BigInt::from(1), BigInt::from(3)], vec![BigInt::from(3), BigInt::from(7)]]);
    assert_eq!(expected, a.mul(&b));
    assert_eq!(a, a.transpose().transpose());
    assert_eq!(vec![BigInt::from(3), BigInt::from(7)], a.mul_vec(&[BigInt::from(1), BigInt::from(1)]));
}

#[test]
fn test_swap_cols() {
    let mut a = OwnedMatrix::from_fn(2, 3, |i, j| BigInt::from(3 * i + j));
    a.swap_cols(0, 2);
    assert_eq!(&[BigInt::from(2), BigInt::from(1), BigInt::from(0)][..], a.row(0));
    assert_eq!(vec![BigInt::from(5), BigInt::from(4), BigInt::from(3)], a.row(1).to_vec());
}
