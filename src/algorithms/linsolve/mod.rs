use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};

use crate::matrix::OwnedMatrix;
use crate::rings::zn::Zn;

///
/// Contains the algorithm to compute the Hermite normal form of integer matrices,
/// which is used to represent orders and ideals.
///
pub mod hnf;

///
/// Result of trying to solve a linear system.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveResult<T> {
    /// The system has a unique solution, which is given
    Unique(Vec<T>),
    /// The system has no solution
    NoSolution,
    /// The system does not have a unique solution, since the matrix is singular
    Singular
}

impl<T> SolveResult<T> {

    pub fn unique(self) -> Option<Vec<T>> {
        match self {
            SolveResult::Unique(x) => Some(x),
            _ => None
        }
    }
}

///
/// Brings the given matrix into reduced row echelon form by Gauss-Jordan
/// elimination over `Q`, and returns the indices of the pivot columns.
///
fn rational_row_echelon(matrix: &mut OwnedMatrix<BigRational>) -> Vec<usize> {
    let (n, m) = (matrix.row_count(), matrix.col_count());
    let mut pivots = Vec::new();
    let mut row = 0;
    for col in 0..m {
        if row >= n {
            break;
        }
        let Some(pivot_row) = (row..n).find(|i| !matrix.at(*i, col).is_zero()) else {
            continue;
        };
        for j in 0..m {
            let tmp = matrix.at(pivot_row, j).clone();
            *matrix.at_mut(pivot_row, j) = matrix.at(row, j).clone();
            *matrix.at_mut(row, j) = tmp;
        }
        let inv = matrix.at(row, col).recip();
        for j in 0..m {
            *matrix.at_mut(row, j) = matrix.at(row, j) * &inv;
        }
        for i in 0..n {
            if i == row || matrix.at(i, col).is_zero() {
                continue;
            }
            let factor = matrix.at(i, col).clone();
            for j in 0..m {
                let subtract = &factor * matrix.at(row, j);
                *matrix.at_mut(i, j) = matrix.at(i, j) - subtract;
            }
        }
        pivots.push(col);
        row += 1;
    }
    return pivots;
}

pub fn rank(matrix: &OwnedMatrix<BigRational>) -> usize {
    rational_row_echelon(&mut matrix.clone()).len()
}

///
/// Solves the square system `A x = b` over `Q`.
///
pub fn solve_rational(matrix: &OwnedMatrix<BigRational>, rhs: &[BigRational]) -> SolveResult<BigRational> {
    let n = matrix.row_count();
    assert_eq!(n, matrix.col_count());
    assert_eq!(n, rhs.len());
    let mut augmented = OwnedMatrix::from_fn(n, n + 1, |i, j| if j < n { matrix.at(i, j).clone() } else { rhs[i].clone() });
    let pivots = rational_row_echelon(&mut augmented);
    if pivots.last() == Some(&n) {
        return SolveResult::NoSolution;
    }
    if pivots.len() < n {
        return SolveResult::Singular;
    }
    return SolveResult::Unique((0..n).map(|i| augmented.at(i, n).clone()).collect());
}

///
/// Computes the inverse of a square matrix over `Q`, if it exists.
///
pub fn invert_rational(matrix: &OwnedMatrix<BigRational>) -> Option<OwnedMatrix<BigRational>> {
    let n = matrix.row_count();
    assert_eq!(n, matrix.col_count());
    let mut augmented = OwnedMatrix::from_fn(n, 2 * n, |i, j| if j < n {
        matrix.at(i, j).clone()
    } else if j - n == i {
        BigRational::one()
    } else {
        BigRational::zero()
    });
    let pivots = rational_row_echelon(&mut augmented);
    if pivots.len() < n || pivots[n - 1] >= n {
        return None;
    }
    return Some(OwnedMatrix::from_fn(n, n, |i, j| augmented.at(i, n + j).clone()));
}

///
/// Computes the determinant of a square matrix over `Q`.
///
pub fn determinant(matrix: &OwnedMatrix<BigRational>) -> BigRational {
    let n = matrix.row_count();
    assert_eq!(n, matrix.col_count());
    let mut work = matrix.clone();
    let mut result = BigRational::one();
    for col in 0..n {
        let Some(pivot_row) = (col..n).find(|i| !work.at(*i, col).is_zero()) else {
            return BigRational::zero();
        };
        if pivot_row != col {
            for j in 0..n {
                let tmp = work.at(pivot_row, j).clone();
                *work.at_mut(pivot_row, j) = work.at(col, j).clone();
                *work.at_mut(col, j) = tmp;
            }
            result = -result;
        }
        let pivot = work.at(col, col).clone();
        result = result * &pivot;
        for i in (col + 1)..n {
            let factor = work.at(i, col) / &pivot;
            if factor.is_zero() {
                continue;
            }
            for j in col..n {
                let subtract = &factor * work.at(col, j);
                *work.at_mut(i, j) = work.at(i, j) - subtract;
            }
        }
    }
    return result;
}

///
/// Computes a basis of the right kernel `{ x | A x = 0 }` of the given matrix
/// over the prime field `Fp`. Entries of the input may be arbitrary integers.
///
pub fn kernel_mod_p(matrix: &OwnedMatrix<BigInt>, p: &BigInt) -> Vec<Vec<BigInt>> {
    let Fp = Zn::new(p.clone());
    let (n, m) = (matrix.row_count(), matrix.col_count());
    let mut work = matrix.map(|x| Fp.reduce(x));
    let mut pivots = Vec::new();
    let mut row = 0;
    for col in 0..m {
        if row >= n {
            break;
        }
        let Some(pivot_row) = (row..n).find(|i| !work.at(*i, col).is_zero()) else {
            continue;
        };
        for j in 0..m {
            let tmp = work.at(pivot_row, j).clone();
            *work.at_mut(pivot_row, j) = work.at(row, j).clone();
            *work.at_mut(row, j) = tmp;
        }
        let inv = Fp.invert(work.at(row, col)).expect("modulus is not prime");
        for j in 0..m {
            *work.at_mut(row, j) = Fp.mul(work.at(row, j), &inv);
        }
        for i in 0..n {
            if i == row || work.at(i, col).is_zero() {
                continue;
            }
            let factor = work.at(i, col).clone();
            for j in 0..m {
                let value = Fp.sub(work.at(i, j), &Fp.mul(&factor, work.at(row, j)));
                *work.at_mut(i, j) = value;
            }
        }
        pivots.push(col);
        row += 1;
    }
    let mut result = Vec::new();
    for free in (0..m).filter(|c| !pivots.contains(c)) {
        let mut x = vec![BigInt::zero(); m];
        x[free] = BigInt::one();
        for (r, pivot_col) in pivots.iter().enumerate() {
            x[*pivot_col] = Fp.negate(work.at(r, free));
        }
        result.push(x);
    }
    return result;
}

///
/// Computes the rank of the given integer matrix modulo the prime `p`.
///
pub fn rank_mod_p(matrix: &OwnedMatrix<BigInt>, p: &BigInt) -> usize {
    matrix.col_count() - kernel_mod_p(matrix, p).len()
}

#[cfg(test)]
fn rat(x: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(x))
}

#[test]
fn test_solve_rational() {
    let a = OwnedMatrix::from_rows(vec![vec![rat(2), rat(1)], vec![rat(1), rat(3)]]);
    let x = solve_rational(&a, &[rat(3), rat(5)]).unique().unwrap();
    assert_eq!(vec![BigRational::new(4.into(), 5.into()), BigRational::new(7.into(), 5.into())], x);
    let singular = OwnedMatrix::from_rows(vec![vec![rat(1), rat(2)], vec![rat(2), rat(4)]]);
    assert_eq!(SolveResult::NoSolution, solve_rational(&singular, &[rat(1), rat(1)]));
    assert_eq!(SolveResult::Singular, solve_rational(&singular, &[rat(1), rat(2)]));
}

#[test]
fn test_invert_and_determinant() {
    let a = OwnedMatrix::from_rows(vec![vec![rat(2), rat(1), rat(0)], vec![rat(1), rat(3), rat(1)], vec![rat(0), rat(1), rat(4)]]);
    let inv = invert_rational(&a).unwrap();
    assert_eq!(OwnedMatrix::identity(3), a.mul(&inv));
    assert_eq!(rat(18), determinant(&a));
    assert_eq!(3, rank(&a));
    let singular = OwnedMatrix::from_rows(vec![vec![rat(1), rat(2)], vec![rat(2), rat(4)]]);
    assert_eq!(None, invert_rational(&singular));
    assert_eq!(rat(0), determinant(&singular));
    assert_eq!(1, rank(&singular));
}

#[test]
fn test_kernel_mod_p() {
    let a = OwnedMatrix::from_rows(vec![vec![BigInt::from(1), BigInt::from(2), BigInt::from(3)], vec![BigInt::from(4), BigInt::from(5), BigInt::from(6)]]);
    let p = BigInt::from(3);
    let kernel = kernel_mod_p(&a, &p);
    assert_eq!(2, kernel.len());
    for x in &kernel {
        for value in a.mul_vec(x) {
            assert!((value % &p).is_zero());
        }
    }
    assert_eq!(1, kernel_mod_p(&a, &BigInt::from(7)).len());
    assert_eq!(2, rank_mod_p(&a, &BigInt::from(7)));
}
