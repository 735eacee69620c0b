use num_bigint::BigInt;
use num_traits::Zero;
use tracing::instrument;

use crate::matrix::OwnedMatrix;
use crate::rings::approx_real::{ApproxRealField, NotEnoughPrecision};

const MAX_SWAPS: usize = 100000;
const MAX_SIZE_REDUCTION_ROUNDS: usize = 16;

///
/// The Gram-Schmidt coefficients `mu_ij` for `j < i` and the squared norms `|b_i*|^2`
/// of the first vectors of a basis.
///
struct GSOData<T> {
    mu: Vec<Vec<T>>,
    norms: Vec<T>
}

fn inner_product<R: ApproxRealField>(RR: &R, lhs: &[R::Element], rhs: &[R::Element]) -> R::Element {
    RR.sum(lhs.iter().zip(rhs.iter()).map(|(a, b)| RR.mul(a, b)))
}

///
/// Computes the Gram-Schmidt data of `cols[0..=k]`. Fails if the basis is (numerically)
/// linearly dependent, i.e. some `|b_i*|^2` is not significantly larger than the error
/// of computing it.
///
fn compute_gso<R: ApproxRealField>(RR: &R, cols: &[Vec<R::Element>], k: usize) -> Result<GSOData<R::Element>, NotEnoughPrecision> {
    let threshold = RR.pow2(-(RR.precision_bits() as i64) / 2);
    let mut mu: Vec<Vec<R::Element>> = Vec::with_capacity(k + 1);
    let mut norms: Vec<R::Element> = Vec::with_capacity(k + 1);
    // r[j] = <b_i, b_j*>
    for i in 0..=k {
        let mut r: Vec<R::Element> = Vec::with_capacity(i + 1);
        let mut mu_i: Vec<R::Element> = Vec::with_capacity(i);
        for j in 0..=i {
            let mut value = inner_product(RR, &cols[i], &cols[j]);
            for l in 0..j {
                let coeff = if j < i { &mu[j][l] } else { &mu_i[l] };
                value = RR.sub(&value, &RR.mul(coeff, &r[l]));
            }
            if j < i {
                mu_i.push(RR.div(&value, &norms[j]));
            } else {
                let length = inner_product(RR, &cols[i], &cols[i]);
                if !RR.is_gt(&value, &RR.mul(&length, &threshold)) {
                    return Err(NotEnoughPrecision);
                }
                norms.push(value.clone());
            }
            r.push(value);
        }
        mu.push(mu_i);
    }
    return Ok(GSOData { mu, norms });
}

fn transform_subtract(transform: &mut OwnedMatrix<BigInt>, k: usize, l: usize, q: &BigInt) {
    for i in 0..transform.row_count() {
        let value = transform.at(i, k) - q * transform.at(i, l);
        *transform.at_mut(i, k) = value;
    }
}

///
/// Computes the `j`-th column of `matrix * transform`.
///
fn transformed_column<R: ApproxRealField>(RR: &R, matrix: &OwnedMatrix<R::Element>, transform: &OwnedMatrix<BigInt>, j: usize) -> Vec<R::Element> {
    (0..matrix.row_count()).map(|i| RR.sum((0..matrix.col_count()).filter(|l| !transform.at(*l, j).is_zero()).map(|l| RR.mul_int(matrix.at(i, l), transform.at(l, j))))).collect()
}

///
/// LLL-reduces the lattice spanned by the columns of `matrix * transform`, where `matrix` is
/// a real matrix given by approximations, and `transform` is an integer matrix. All performed
/// operations are applied to `transform`, so on success, `matrix * transform` is a
/// `(delta, 0.51)`-LLL-reduced basis (up to numerical errors).
///
/// If `keep_first` is set, the first column of `transform` is never changed.
///
/// # Numerical stability
///
/// The Gram-Schmidt coefficients are always recomputed from scratch, and the basis vectors
/// are recomputed from `transform` after each size reduction step, which avoids accumulating
/// rounding errors. If the precision is not sufficient to find a reduced basis, this function
/// returns [`NotEnoughPrecision`]. In this case, `transform` still contains the progress made
/// so far, thus the computation can be continued with higher precision.
///
#[stability::unstable(feature = "enable")]
#[instrument(skip_all, level = "trace")]
pub fn lll_float<R>(RR: &R, matrix: &OwnedMatrix<R::Element>, transform: &mut OwnedMatrix<BigInt>, delta: f64, keep_first: bool) -> Result<(), NotEnoughPrecision>
    where R: ApproxRealField
{
    assert!(delta > 0.3 && delta < 1.);
    assert_eq!(matrix.col_count(), transform.row_count());
    let n = transform.col_count();
    let delta = RR.from_f64(delta);
    let eta = RR.from_f64(0.51);
    let mut cols = (0..n).map(|j| transformed_column(RR, matrix, transform, j)).collect::<Vec<_>>();
    let mut k = 1;
    let mut swaps = 0;
    while k < n {
        let mut rounds = 0;
        let gso = loop {
            let mut gso = compute_gso(RR, &cols, k)?;
            let mut changed = false;
            for j in (0..k).rev() {
                if !RR.is_gt(&RR.abs(&gso.mu[k][j]), &eta) {
                    continue;
                }
                let q = RR.round_to_integer(&gso.mu[k][j]).ok_or(NotEnoughPrecision)?;
                transform_subtract(transform, k, j, &q);
                let q_real = RR.from_int(&q);
                for i in 0..j {
                    let correction = RR.mul(&q_real, &gso.mu[j][i]);
                    gso.mu[k][i] = RR.sub(&gso.mu[k][i], &correction);
                }
                gso.mu[k][j] = RR.sub(&gso.mu[k][j], &q_real);
                changed = true;
            }
            if !changed {
                break gso;
            }
            cols[k] = transformed_column(RR, matrix, transform, k);
            rounds += 1;
            if rounds > MAX_SIZE_REDUCTION_ROUNDS {
                return Err(NotEnoughPrecision);
            }
        };
        let mu = &gso.mu[k][k - 1];
        let bound = RR.mul(&RR.sub(&delta, &RR.square(mu)), &gso.norms[k - 1]);
        if RR.is_lt(&gso.norms[k], &bound) && !(keep_first && k == 1) {
            swaps += 1;
            if swaps > MAX_SWAPS {
                return Err(NotEnoughPrecision);
            }
            transform.swap_cols(k, k - 1);
            cols.swap(k, k - 1);
            k = usize::max(k - 1, 1);
        } else {
            k += 1;
        }
    }
    return Ok(());
}

#[cfg(test)]
use num_rational::BigRational;
#[cfg(test)]
use num_traits::Signed;
#[cfg(test)]
use crate::tracing::LogAlgorithmSubscriber;
#[cfg(test)]
use crate::algorithms::lll::assert_lll_reduced;
#[cfg(test)]
use crate::algorithms::linsolve::determinant;
#[cfg(test)]
use crate::rings::approx_real::float::Real64;
#[cfg(test)]
use crate::rings::approx_real::bigfloat::BigFloatField;
#[cfg(test)]
use crate::rings::approx_real::run_at_precision;

#[cfg(test)]
fn check_float_lll<R: ApproxRealField>(RR: &R, rows: &[&[i64]]) -> OwnedMatrix<BigInt> {
    let basis = OwnedMatrix::from_rows(rows.iter().map(|row| row.iter().map(|x| BigInt::from(*x)).collect()).collect());
    let matrix = basis.map(|x| RR.from_int(x));
    let mut transform = OwnedMatrix::identity(basis.col_count());
    lll_float(RR, &matrix, &mut transform, 0.99, false).unwrap();
    assert!(determinant(&transform.map(|x| BigRational::from_integer(x.clone()))).abs() == BigRational::from_integer(BigInt::from(1)));
    let reduced = basis.mul(&transform);
    let gram = reduced.transpose().mul(&reduced);
    assert_lll_reduced(&gram, &BigRational::new(BigInt::from(98), BigInt::from(100)), &BigRational::new(BigInt::from(52), BigInt::from(100)), false);
    return gram;
}

#[test]
fn test_lll_float_2d() {
    LogAlgorithmSubscriber::init_test();
    let gram = check_float_lll(&Real64::RING, &[&[5, 9], &[11, 20]]);
    assert_eq!(&BigInt::from(1), gram.at(0, 0));
    assert_eq!(&BigInt::from(1), gram.at(1, 1));
    let gram = check_float_lll(&Real64::RING, &[&[10, 27], &[8, 22]]);
    assert_eq!(&BigInt::from(4), gram.at(0, 0));
    assert_eq!(&BigInt::from(5), gram.at(1, 1));
}

#[test]
fn test_lll_float_precision() {
    LogAlgorithmSubscriber::init_test();
    let basis = OwnedMatrix::from_rows(vec![
        vec![BigInt::from(1), BigInt::from(0), BigInt::from(0), BigInt::from(0), BigInt::from(0)],
        vec![BigInt::from(65208), BigInt::from(1), BigInt::from(0), BigInt::from(0), BigInt::from(0)],
        vec![BigInt::from(0), BigInt::from(65208), BigInt::from(1), BigInt::from(0), BigInt::from(0)],
        vec![BigInt::from(0), BigInt::from(0), BigInt::from(65208), BigInt::from(1), BigInt::from(0)],
        vec![BigInt::from(0), BigInt::from(0), BigInt::from(0), BigInt::from(65208), BigInt::from(999769)]
    ]);
    let mut transform = OwnedMatrix::<BigInt>::identity(5);
    run_at_precision(64, 4096, |precision| {
        let RR = BigFloatField::new(precision);
        let matrix = basis.map(|x| RR.from_int(x));
        lll_float(&RR, &matrix, &mut transform, 0.99, false)?;
        return Ok(());
    }).unwrap();
    assert!(determinant(&transform.map(|x| BigRational::from_integer(x.clone()))).abs() == BigRational::from_integer(BigInt::from(1)));
    let reduced = basis.mul(&transform);
    let gram = reduced.transpose().mul(&reduced);
    assert_lll_reduced(&gram, &BigRational::new(BigInt::from(98), BigInt::from(100)), &BigRational::new(BigInt::from(52), BigInt::from(100)), false);
    // LLL guarantees |b_0|^2 <= (delta - eta^2)^(-(n - 1)/2) det^(2/n)
    assert!(gram.at(0, 0) < &BigInt::from(480));
}

#[test]
fn test_lll_float_already_reduced() {
    LogAlgorithmSubscriber::init_test();
    let RR = Real64::RING;
    let basis = OwnedMatrix::from_rows(vec![vec![BigInt::from(10), BigInt::from(27)], vec![BigInt::from(8), BigInt::from(22)]]);
    let matrix = basis.map(|x| RR.from_int(x));
    let mut transform = OwnedMatrix::<BigInt>::identity(2);
    lll_float(&RR, &matrix, &mut transform, 0.99, false).unwrap();
    let first = transform.clone();
    lll_float(&RR, &matrix, &mut transform, 0.99, false).unwrap();
    assert_eq!(first, transform);
}

#[test]
fn test_lll_float_keep_first() {
    LogAlgorithmSubscriber::init_test();
    let RR = Real64::RING;
    let basis = OwnedMatrix::from_rows(vec![vec![3., 1., 0.], vec![0., 1., 0.], vec![0., 0., 1.]]);
    let mut transform = OwnedMatrix::<BigInt>::identity(3);
    lll_float(&RR, &basis, &mut transform, 0.99, true).unwrap();
    assert_eq!(vec![BigInt::from(1), BigInt::from(0), BigInt::from(0)], transform.col(0));
}

#[test]
fn test_lll_float_dependent() {
    LogAlgorithmSubscriber::init_test();
    let RR = Real64::RING;
    let basis = OwnedMatrix::from_rows(vec![vec![1., 2.], vec![1., 2.]]);
    let mut transform = OwnedMatrix::<BigInt>::identity(2);
    assert_eq!(Err(NotEnoughPrecision), lll_float(&RR, &basis, &mut transform, 0.99, false));
}
