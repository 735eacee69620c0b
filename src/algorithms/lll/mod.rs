use num_bigint::BigInt;
use num_rational::BigRational;
use tracing::{event, span, Level};

use crate::error::Result;
use crate::matrix::OwnedMatrix;
use crate::rings::approx_real::{run_at_precision, ApproxRealField, Retry};
use crate::rings::approx_real::bigfloat::BigFloat;
use crate::rings::extension::number_field::NumberField;

///
/// Contains [`float::lll_float()`], an implementation of LLL using approximate
/// real arithmetic.
///
pub mod float;
///
/// Contains [`exact::lll_gram()`], an implementation of LLL for integral quadratic
/// forms that only uses integer arithmetic.
///
pub mod exact;

const START_PRECISION: u64 = 64;

///
/// Parameters for [`reduce_basis()`].
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LllOptions {
    /// The parameter `delta` of the Lovasz condition, must be in `(1/4, 1)`
    pub delta: f64
}

impl Default for LllOptions {

    fn default() -> Self {
        LllOptions { delta: 0.99 }
    }
}

///
/// An LLL-reduced basis of the maximal order of a number field, w.r.t. the
/// `T2`-form `T2(x) = sum_sigma |sigma(x)|^2`.
///
#[derive(Debug, Clone)]
pub struct ReducedLattice {
    /// Unimodular matrix whose columns are the reduced basis vectors, in
    /// coordinates w.r.t. the integral basis
    pub transform: OwnedMatrix<BigInt>,
    /// If computed numerically, the real embedding matrix of the reduced basis, as in
    /// [`crate::rings::extension::embeddings::EmbeddingTable::real_matrix()`]
    pub embeddings: Option<OwnedMatrix<BigFloat>>
}

impl ReducedLattice {

    ///
    /// The `i`-th reduced basis vector, in coordinates w.r.t. the integral basis.
    ///
    pub fn vector(&self, i: usize) -> Vec<BigInt> {
        self.transform.col(i)
    }

    pub fn len(&self) -> usize {
        self.transform.col_count()
    }
}

///
/// Computes an LLL-reduced basis of the maximal order of the given number field, w.r.t.
/// the `T2`-form. The first basis vector `1` is kept fixed, since it is always among the
/// shortest vectors.
///
/// For totally real fields, the `T2`-form is the trace form `(x, y) -> Tr(xy)`, which is
/// integral, thus in this case, [`exact::lll_gram()`] is used. Otherwise, [`float::lll_float()`]
/// is applied to the real embedding matrix, starting at a low precision. If this fails,
/// the precision is increased, and the reduction continues from the already computed transform.
///
pub fn reduce_basis(field: &NumberField, options: &LllOptions) -> Result<ReducedLattice> {
    let n = field.degree();
    span!(Level::INFO, "reduce_basis", n = n, r1 = field.r1()).in_scope(|| {
        if field.is_totally_real() {
            let mut gram = field.trace_form().clone();
            let delta = BigRational::from_float(options.delta).unwrap_or_else(|| BigRational::new(BigInt::from(99), BigInt::from(100)));
            let transform = exact::lll_gram(&mut gram, &delta, true)?;
            event!(Level::INFO, "exact");
            return Ok(ReducedLattice { transform, embeddings: None });
        }
        let mut transform = OwnedMatrix::<BigInt>::identity(n);
        let embeddings = run_at_precision(START_PRECISION, field.max_precision(), |precision| {
            let table = field.embeddings(precision)?;
            let RR = table.real_field();
            let matrix = table.real_matrix();
            match float::lll_float(&RR, &matrix, &mut transform, options.delta, true) {
                Ok(()) => {},
                Err(_) => {
                    event!(Level::DEBUG, precision = precision, "lll_float failed");
                    return Err(Retry::NotEnoughPrecision);
                }
            }
            let transform_real = transform.map(|x| RR.from_int(x));
            Ok(OwnedMatrix::from_fn(n, n, |i, j| RR.sum((0..n).map(|k| RR.mul(matrix.at(i, k), transform_real.at(k, j))))))
        })?;
        event!(Level::INFO, "float");
        return Ok(ReducedLattice { transform, embeddings: Some(embeddings) });
    })
}

#[cfg(test)]
use num_traits::{Signed, Zero};
#[cfg(test)]
use crate::tracing::LogAlgorithmSubscriber;
#[cfg(test)]
use crate::rings::extension::number_field::{OrderOptions, OrderSource};
#[cfg(test)]
use crate::rings::poly::dense_poly::QPoly;

///
/// Checks that the basis with the given Gram matrix is `(delta, eta)`-LLL-reduced,
/// using exact rational arithmetic.
///
#[cfg(test)]
pub(crate) fn assert_lll_reduced(gram: &OwnedMatrix<BigInt>, delta: &BigRational, eta: &BigRational, keep_first: bool) {
    let n = gram.row_count();
    let mut mu = vec![vec![BigRational::zero(); n]; n];
    let mut norms: Vec<BigRational> = Vec::new();
    for i in 0..n {
        for j in 0..=i {
            let mut r = BigRational::from_integer(gram.at(i, j).clone());
            for l in 0..j {
                r -= &mu[j][l] * &mu[i][l] * &norms[l];
            }
            if j < i {
                mu[i][j] = r / &norms[j];
            } else {
                norms.push(r);
            }
        }
    }
    for i in 0..n {
        for j in 0..i {
            assert!(mu[i][j].abs() <= *eta, "not size-reduced at ({}, {})", i, j);
        }
    }
    for k in 1..n {
        if keep_first && k == 1 {
            continue;
        }
        assert!(norms[k] >= (delta - &mu[k][k - 1] * &mu[k][k - 1]) * &norms[k - 1], "Lovasz condition violated at {}", k);
    }
}

#[test]
fn test_reduce_basis_totally_real() {
    LogAlgorithmSubscriber::init_test();
    let K = NumberField::build(OrderSource::Polynomial(QPoly::from_ints(&[-1, -3, 0, 1])), &OrderOptions::default()).unwrap();
    let reduced = reduce_basis(&K, &LllOptions::default()).unwrap();
    assert!(reduced.embeddings.is_none());
    assert_eq!(vec![BigInt::from(1), BigInt::from(0), BigInt::from(0)], reduced.vector(0));
    let gram = reduced.transform.transpose().mul(K.trace_form()).mul(&reduced.transform);
    assert_lll_reduced(&gram, &BigRational::new(BigInt::from(99), BigInt::from(100)), &BigRational::new(BigInt::from(1), BigInt::from(2)), true);
}

#[test]
fn test_reduce_basis_complex() {
    LogAlgorithmSubscriber::init_test();
    // x^2 + 100x + 3001 has roots -50 +- i sqrt(501), thus the reduced basis should
    // contain theta + 50 with T2 = 2 * 501
    let K = NumberField::build(OrderSource::Polynomial(QPoly::from_ints(&[3001, 100, 1])), &OrderOptions::default()).unwrap();
    assert_eq!(0, K.r1());
    let reduced = reduce_basis(&K, &LllOptions::default()).unwrap();
    let embeddings = reduced.embeddings.as_ref().unwrap();
    assert_eq!(2, reduced.len());
    assert_eq!(vec![BigInt::from(1), BigInt::from(0)], reduced.vector(0));
    let RR = K.embeddings(64).unwrap().real_field();
    let t2 = RR.to_f64(&RR.add(&RR.square(embeddings.at(0, 1)), &RR.square(embeddings.at(1, 1))));
    assert!((t2 - 1002.).abs() < 1e-6);
    assert!(reduced.transform.at(1, 1).abs() == BigInt::from(1));
}

#[test]
fn test_reduce_basis_gaussian() {
    LogAlgorithmSubscriber::init_test();
    let K = NumberField::build(OrderSource::Polynomial(QPoly::from_ints(&[1, 0, 1])), &OrderOptions::default()).unwrap();
    let reduced = reduce_basis(&K, &LllOptions::default()).unwrap();
    assert_eq!(vec![BigInt::from(1), BigInt::from(0)], reduced.vector(0));
    assert_eq!(BigInt::from(0), *reduced.transform.at(0, 1));
    assert_eq!(BigInt::from(1), reduced.transform.at(1, 1).abs());
}

#[test]
fn test_reduce_basis_idempotent() {
    LogAlgorithmSubscriber::init_test();
    // Q(zeta_5) is totally complex, so this goes through the floating point reduction
    let K = NumberField::build(OrderSource::Polynomial(QPoly::from_ints(&[1, 1, 1, 1, 1])), &OrderOptions::default()).unwrap();
    let reduced = reduce_basis(&K, &LllOptions::default()).unwrap();
    assert!(reduced.embeddings.is_some());
    let table = K.embeddings(128).unwrap();
    let RR = table.real_field();
    let matrix = table.real_matrix();
    let transform_real = reduced.transform.map(|x| RR.from_int(x));
    let reduced_matrix = OwnedMatrix::from_fn(4, 4, |i, j| RR.sum((0..4).map(|k| RR.mul(matrix.at(i, k), transform_real.at(k, j)))));
    // reducing again with a slightly weaker Lovasz condition must not change anything
    let mut again = OwnedMatrix::<BigInt>::identity(4);
    float::lll_float(&RR, &reduced_matrix, &mut again, 0.98, true).unwrap();
    assert_eq!(OwnedMatrix::<BigInt>::identity(4), again);
}
