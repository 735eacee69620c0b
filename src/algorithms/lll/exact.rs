use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use tracing::instrument;

use crate::error::{NumberFieldError, Result};
use crate::integer::rounded_div;
use crate::matrix::OwnedMatrix;

///
/// State of the integral LLL algorithm. With `d_0 = 1` and `d_(i + 1)` the determinant of
/// the Gram matrix of the first `i + 1` vectors, we store `lambda[k][j] = d_(j + 1) mu_kj`,
/// which are all integers.
///
struct IntegralGSO {
    d: Vec<BigInt>,
    lambda: Vec<Vec<BigInt>>
}

///
/// Replaces the `k`-th vector `b_k` by `b_k - q b_l` in the Gram matrix.
///
fn gram_subtract(gram: &mut OwnedMatrix<BigInt>, k: usize, l: usize, q: &BigInt) {
    let n = gram.row_count();
    let old_kl = gram.at(k, l).clone();
    for j in 0..n {
        if j != k {
            let value = gram.at(k, j) - q * gram.at(l, j);
            *gram.at_mut(j, k) = value.clone();
            *gram.at_mut(k, j) = value;
        }
    }
    let new_kk = gram.at(k, k) - q * (old_kl + gram.at(k, l));
    *gram.at_mut(k, k) = new_kk;
}

fn gram_swap(gram: &mut OwnedMatrix<BigInt>, k: usize, l: usize) {
    let n = gram.row_count();
    for j in 0..n {
        let tmp = gram.at(k, j).clone();
        *gram.at_mut(k, j) = gram.at(l, j).clone();
        *gram.at_mut(l, j) = tmp;
    }
    for j in 0..n {
        let tmp = gram.at(j, k).clone();
        *gram.at_mut(j, k) = gram.at(j, l).clone();
        *gram.at_mut(j, l) = tmp;
    }
}

fn transform_subtract(transform: &mut OwnedMatrix<BigInt>, k: usize, l: usize, q: &BigInt) {
    for i in 0..transform.row_count() {
        let value = transform.at(i, k) - q * transform.at(i, l);
        *transform.at_mut(i, k) = value;
    }
}

impl IntegralGSO {

    ///
    /// Size-reduces `b_k` w.r.t. `b_l`, i.e. ensures `|mu_kl| <= 1/2`.
    ///
    fn reduce(&mut self, gram: &mut OwnedMatrix<BigInt>, transform: &mut OwnedMatrix<BigInt>, k: usize, l: usize) {
        let denominator = &self.d[l + 1];
        if BigInt::from(2) * self.lambda[k][l].abs() <= *denominator {
            return;
        }
        let q = rounded_div(&self.lambda[k][l], denominator);
        gram_subtract(gram, k, l, &q);
        transform_subtract(transform, k, l, &q);
        self.lambda[k][l] -= &q * denominator;
        for i in 0..l {
            let correction = &q * &self.lambda[l][i];
            self.lambda[k][i] -= correction;
        }
    }

    ///
    /// Swaps `b_k` and `b_(k - 1)` and updates the values of `d` and `lambda`.
    ///
    fn swap(&mut self, gram: &mut OwnedMatrix<BigInt>, transform: &mut OwnedMatrix<BigInt>, k: usize, k_max: usize) {
        gram_swap(gram, k, k - 1);
        transform.swap_cols(k, k - 1);
        for j in 0..(k - 1) {
            let tmp = std::mem::take(&mut self.lambda[k][j]);
            self.lambda[k][j] = std::mem::replace(&mut self.lambda[k - 1][j], tmp);
        }
        let lambda = self.lambda[k][k - 1].clone();
        let B = (&self.d[k - 1] * &self.d[k + 1] + &lambda * &lambda) / &self.d[k];
        for i in (k + 1)..=k_max {
            let t = self.lambda[i][k].clone();
            self.lambda[i][k] = (&self.d[k + 1] * &self.lambda[i][k - 1] - &lambda * &t) / &self.d[k];
            self.lambda[i][k - 1] = (&B * &t + &lambda * &self.lambda[i][k]) / &self.d[k + 1];
        }
        self.d[k] = B;
    }

    ///
    /// Computes `d_(k + 1)` and `lambda[k][j]` for all `j < k`, from the Gram matrix.
    ///
    fn extend(&mut self, gram: &OwnedMatrix<BigInt>, k: usize) -> Result<()> {
        for j in 0..=k {
            let mut u = gram.at(k, j).clone();
            for i in 0..j {
                u = (&self.d[i + 1] * &u - &self.lambda[k][i] * &self.lambda[j][i]) / &self.d[i];
            }
            if j < k {
                self.lambda[k][j] = u;
            } else {
                if !u.is_positive() {
                    return Err(NumberFieldError::Bug("quadratic form is not positive definite".to_owned()));
                }
                self.d[k + 1] = u;
            }
        }
        return Ok(());
    }
}

///
/// LLL-reduces the lattice whose Gram matrix is given, using only integer arithmetic.
///
/// On return, `gram` contains the Gram matrix of the reduced basis, and the returned
/// unimodular matrix `U` contains the reduced basis vectors as columns, w.r.t. the
/// original basis; in other words, the new Gram matrix is `U^T G U`.
///
/// The reduced basis `b_0, ..., b_(n-1)` satisfies
///  - (size-reduced) `|mu_ij| <= 1/2` for `j < i`
///  - (Lovasz-condition) `|b_k*|^2 >= (delta - mu_k(k-1)^2) |b_(k-1)*|^2`
///
/// If `keep_first` is set, the first basis vector is never swapped, thus `b_0` is left
/// unchanged (and the Lovasz condition is not enforced for `k = 1`).
///
/// # Algorithm
///
/// This is the integral LLL algorithm, Algorithm 2.6.7 of Cohen's "A Course in
/// Computational Algebraic Number Theory". All Gram-Schmidt data is scaled by the
/// subdeterminants `d_i` of the Gram matrix, which makes it integral.
///
/// The Gram matrix must be positive definite, otherwise [`NumberFieldError::Bug`] is returned.
///
#[stability::unstable(feature = "enable")]
#[instrument(skip_all, level = "trace")]
pub fn lll_gram(gram: &mut OwnedMatrix<BigInt>, delta: &BigRational, keep_first: bool) -> Result<OwnedMatrix<BigInt>> {
    let n = gram.row_count();
    assert_eq!(n, gram.col_count());
    assert!(delta > &BigRational::new(BigInt::one(), BigInt::from(4)) && delta <= &BigRational::one());
    let mut transform = OwnedMatrix::<BigInt>::identity(n);
    if n == 0 {
        return Ok(transform);
    }
    let delta_num = delta.numer();
    let delta_den = delta.denom();
    let mut gso = IntegralGSO {
        d: vec![BigInt::one(); n + 1],
        lambda: vec![vec![BigInt::zero(); n]; n]
    };
    if !gram.at(0, 0).is_positive() {
        return Err(NumberFieldError::Bug("quadratic form is not positive definite".to_owned()));
    }
    gso.d[1] = gram.at(0, 0).clone();
    let mut k = 1;
    let mut k_max = 0;
    while k < n {
        if k > k_max {
            k_max = k;
            gso.extend(gram, k)?;
        }
        loop {
            gso.reduce(gram, &mut transform, k, k - 1);
            let lambda = &gso.lambda[k][k - 1];
            // Lovasz condition, multiplied by d_k^2 delta_den
            let lhs = delta_den * (&gso.d[k + 1] * &gso.d[k - 1] + lambda * lambda);
            let rhs = delta_num * &gso.d[k] * &gso.d[k];
            if lhs < rhs && !(keep_first && k == 1) {
                gso.swap(gram, &mut transform, k, k_max);
                k = usize::max(1, k - 1);
            } else {
                break;
            }
        }
        for l in (0..(k - 1)).rev() {
            gso.reduce(gram, &mut transform, k, l);
        }
        k += 1;
    }
    return Ok(transform);
}

///
/// LLL-reduces the lattice spanned by the (linearly independent) columns of the given
/// integer matrix, w.r.t. the standard inner product. Returns the reduced basis, again
/// as columns of a matrix.
///
#[stability::unstable(feature = "enable")]
pub fn lll_lattice(basis: &OwnedMatrix<BigInt>, delta: &BigRational) -> Result<OwnedMatrix<BigInt>> {
    let mut gram = basis.transpose().mul(basis);
    let transform = lll_gram(&mut gram, delta, false)?;
    return Ok(basis.mul(&transform));
}

#[cfg(test)]
use crate::tracing::LogAlgorithmSubscriber;
#[cfg(test)]
use crate::algorithms::lll::assert_lll_reduced;
#[cfg(test)]
use crate::algorithms::linsolve::determinant;

#[cfg(test)]
fn int_matrix(rows: &[&[i64]]) -> OwnedMatrix<BigInt> {
    OwnedMatrix::from_rows(rows.iter().map(|row| row.iter().map(|x| BigInt::from(*x)).collect()).collect())
}

#[test]
fn test_lll_lattice_2d() {
    LogAlgorithmSubscriber::init_test();
    let delta = BigRational::new(BigInt::from(9), BigInt::from(10));
    // columns (5, 11) and (9, 20) span Z^2
    let reduced = lll_lattice(&int_matrix(&[&[5, 9], &[11, 20]]), &delta).unwrap();
    let gram = reduced.transpose().mul(&reduced);
    assert_eq!(&BigInt::from(1), gram.at(0, 0));
    assert_eq!(&BigInt::from(1), gram.at(1, 1));

    let reduced = lll_lattice(&int_matrix(&[&[10, 27], &[8, 22]]), &delta).unwrap();
    let gram = reduced.transpose().mul(&reduced);
    assert_eq!(&BigInt::from(4), gram.at(0, 0));
    assert_eq!(&BigInt::from(5), gram.at(1, 1));
}

#[test]
fn test_lll_gram() {
    LogAlgorithmSubscriber::init_test();
    let delta = BigRational::new(BigInt::from(99), BigInt::from(100));
    let basis = int_matrix(&[&[1, -1, 3], &[1, 0, 5], &[1, 2, 6]]);
    let original_gram = basis.transpose().mul(&basis);
    let mut gram = original_gram.clone();
    let transform = lll_gram(&mut gram, &delta, false).unwrap();
    assert_eq!(gram, transform.transpose().mul(&original_gram).mul(&transform));
    assert!(determinant(&transform.map(|x| BigRational::from_integer(x.clone()))).abs().is_one());
    assert_lll_reduced(&gram, &delta, &BigRational::new(BigInt::from(1), BigInt::from(2)), false);
    // the shortest vector (0, 1, 0) has norm 1
    assert_eq!(&BigInt::from(1), gram.at(0, 0));
}

#[test]
fn test_lll_gram_keep_first() {
    LogAlgorithmSubscriber::init_test();
    let delta = BigRational::new(BigInt::from(99), BigInt::from(100));
    let basis = int_matrix(&[&[3, 1, 0], &[0, 1, 0], &[0, 0, 1]]);
    let original_gram = basis.transpose().mul(&basis);
    let mut gram = original_gram.clone();
    let transform = lll_gram(&mut gram, &delta, true).unwrap();
    assert_eq!(vec![BigInt::from(1), BigInt::from(0), BigInt::from(0)], transform.col(0));
    assert_eq!(&BigInt::from(9), gram.at(0, 0));
    assert_lll_reduced(&gram, &delta, &BigRational::new(BigInt::from(1), BigInt::from(2)), true);

    let mut gram = original_gram.clone();
    lll_gram(&mut gram, &delta, false).unwrap();
    assert_eq!(&BigInt::from(1), gram.at(0, 0));
}

#[test]
fn test_lll_gram_not_positive_definite() {
    LogAlgorithmSubscriber::init_test();
    let delta = BigRational::new(BigInt::from(3), BigInt::from(4));
    let mut gram = int_matrix(&[&[1, 1], &[1, 1]]);
    assert!(lll_gram(&mut gram, &delta, false).unwrap_err().is_bug());
}
