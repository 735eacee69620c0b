use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use crate::integer::common_denominator;
use crate::matrix::OwnedMatrix;

///
/// Computes the Hermite normal form of the lattice spanned by the columns
/// of the given `n x m` integer matrix, which must have rank `n`.
///
/// The result is the unique upper triangular `n x n` matrix `H` whose columns
/// span the same lattice, with positive diagonal, and such that the entries
/// `H[i, j]` for `j > i` satisfy `0 <= H[i, j] < H[i, i]`.
///
/// Returns `None` if the columns do not span a lattice of full rank.
///
/// # Example
/// ```rust
/// # use feanor_number_field::matrix::*;
/// # use feanor_number_field::algorithms::linsolve::hnf::*;
/// # use num_bigint::BigInt;
/// let A = OwnedMatrix::from_rows(vec![
///     vec![BigInt::from(2), BigInt::from(1), BigInt::from(0)],
///     vec![BigInt::from(0), BigInt::from(1), BigInt::from(2)]
/// ]);
/// let H = hnf(&A).unwrap();
/// assert_eq!(OwnedMatrix::from_rows(vec![
///     vec![BigInt::from(2), BigInt::from(1)],
///     vec![BigInt::from(0), BigInt::from(1)]
/// ]), H);
/// ```
///
pub fn hnf(matrix: &OwnedMatrix<BigInt>) -> Option<OwnedMatrix<BigInt>> {
    let n = matrix.row_count();
    let mut remaining = matrix.cols();
    let mut result: Vec<Vec<BigInt>> = vec![Vec::new(); n];
    for i in (0..n).rev() {
        // eliminate row i in all but one column, by the Euclidean algorithm on columns
        loop {
            remaining.retain(|c| c.iter().any(|x| !x.is_zero()));
            let pivot = remaining.iter().enumerate()
                .filter(|(_, c)| !c[i].is_zero())
                .min_by(|(_, a), (_, b)| a[i].abs().cmp(&b[i].abs()))
                .map(|(index, _)| index)?;
            let pivot_col = remaining[pivot].clone();
            let mut done = true;
            for (index, col) in remaining.iter_mut().enumerate() {
                if index == pivot || col[i].is_zero() {
                    continue;
                }
                let factor = col[i].div_floor(&pivot_col[i]);
                for k in 0..=i {
                    col[k] -= &factor * &pivot_col[k];
                }
                if !col[i].is_zero() {
                    done = false;
                }
            }
            if done {
                let mut col = remaining.swap_remove(pivot);
                if col[i].is_negative() {
                    for x in col.iter_mut() {
                        *x = -&*x;
                    }
                }
                result[i] = col;
                break;
            }
        }
    }
    for j in 0..n {
        for i in (0..j).rev() {
            let factor = result[j][i].div_floor(&result[i][i]);
            if factor.is_zero() {
                continue;
            }
            for k in 0..=i {
                let subtract = &factor * &result[i][k];
                result[j][k] -= subtract;
            }
        }
    }
    return Some(OwnedMatrix::from_cols(n, result));
}

///
/// Computes the Hermite normal form of a full-rank `Z`-module in `Q^n`, given by
/// rational generators in the columns of the matrix. The result is returned as
/// `(H, d)`, such that the module is spanned by the columns of `H / d`, where `d`
/// is the common denominator of all generators.
///
pub fn hnf_rational(matrix: &OwnedMatrix<BigRational>) -> Option<(OwnedMatrix<BigInt>, BigInt)> {
    let d = common_denominator((0..matrix.row_count()).flat_map(|i| matrix.row(i).iter()));
    let d_rational = BigRational::from_integer(d.clone());
    let scaled = matrix.map(|x| (x * &d_rational).to_integer());
    return Some((hnf(&scaled)?, d));
}

///
/// Given a lattice in upper triangular Hermite normal form, checks whether the given
/// vector is contained in it, and returns the coordinates w.r.t. the columns of `H`
/// if this is the case.
///
pub fn hnf_coordinates(hnf: &OwnedMatrix<BigInt>, vector: &[BigInt]) -> Option<Vec<BigInt>> {
    let n = hnf.row_count();
    assert_eq!(n, vector.len());
    let mut remaining = vector.to_vec();
    let mut result = vec![BigInt::zero(); n];
    for i in (0..n).rev() {
        let (quo, rem) = remaining[i].div_rem(hnf.at(i, i));
        if !rem.is_zero() {
            return None;
        }
        for k in 0..=i {
            let subtract = &quo * hnf.at(k, i);
            remaining[k] -= subtract;
        }
        result[i] = quo;
    }
    return Some(result);
}

#[test]
fn test_hnf() {
    let a = OwnedMatrix::from_rows(vec![
        vec![BigInt::from(4), BigInt::from(6), BigInt::from(2)],
        vec![BigInt::from(0), BigInt::from(3), BigInt::from(3)]
    ]);
    let h = hnf(&a).unwrap();
    assert_eq!(OwnedMatrix::from_rows(vec![
        vec![BigInt::from(4), BigInt::from(2)],
        vec![BigInt::from(0), BigInt::from(3)]
    ]), h);

    let b = OwnedMatrix::from_rows(vec![
        vec![BigInt::from(2), BigInt::from(1)],
        vec![BigInt::from(0), BigInt::from(-1)]
    ]);
    assert_eq!(OwnedMatrix::from_rows(vec![
        vec![BigInt::from(2), BigInt::from(1)],
        vec![BigInt::from(0), BigInt::from(1)]
    ]), hnf(&b).unwrap());

    let degenerate = OwnedMatrix::from_rows(vec![
        vec![BigInt::from(1), BigInt::from(2)],
        vec![BigInt::from(2), BigInt::from(4)]
    ]);
    assert_eq!(None, hnf(&degenerate));
}

#[test]
fn test_hnf_rational() {
    // the lattice spanned by 1 and (1 + x)/2 in coordinates w.r.t. 1, x
    let half = BigRational::new(BigInt::from(1), BigInt::from(2));
    let a = OwnedMatrix::from_cols(2, vec![
        vec![BigRational::from_integer(BigInt::from(1)), BigRational::zero()],
        vec![half.clone(), half.clone()],
        vec![BigRational::zero(), BigRational::from_integer(BigInt::from(1))]
    ]);
    let (h, d) = hnf_rational(&a).unwrap();
    assert_eq!(BigInt::from(2), d);
    assert_eq!(OwnedMatrix::from_rows(vec![
        vec![BigInt::from(2), BigInt::from(1)],
        vec![BigInt::from(0), BigInt::from(1)]
    ]), h);
}

#[test]
fn test_hnf_coordinates() {
    let h = OwnedMatrix::from_rows(vec![
        vec![BigInt::from(2), BigInt::from(1)],
        vec![BigInt::from(0), BigInt::from(3)]
    ]);
    assert_eq!(Some(vec![BigInt::from(1), BigInt::from(2)]), hnf_coordinates(&h, &[BigInt::from(4), BigInt::from(6)]));
    assert_eq!(None, hnf_coordinates(&h, &[BigInt::from(1), BigInt::from(0)]));
    assert_eq!(None, hnf_coordinates(&h, &[BigInt::from(0), BigInt::from(1)]));
}
