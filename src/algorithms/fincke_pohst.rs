use num_bigint::BigInt;
use num_traits::{One, Zero};
use tracing::{event, instrument, Level};

use crate::matrix::OwnedMatrix;
use crate::rings::approx_real::{ApproxRealField, NotEnoughPrecision};

///
/// Computes the decomposition `Q(x) = sum_i q_ii (x_i + sum_(j > i) q_ij x_j)^2` of a
/// positive definite quadratic form, as in Algorithm 2.7.6 of Cohen's "A Course in
/// Computational Algebraic Number Theory". The `q_ii` are stored on the diagonal and
/// the `q_ij` in the upper triangle of the result.
///
pub fn cholesky<R>(RR: &R, quadratic_form: &OwnedMatrix<R::Element>) -> Result<OwnedMatrix<R::Element>, NotEnoughPrecision>
    where R: ApproxRealField
{
    let n = quadratic_form.row_count();
    assert_eq!(n, quadratic_form.col_count());
    let mut q = quadratic_form.clone();
    for i in 0..n {
        if !RR.is_gt(q.at(i, i), &RR.zero()) {
            return Err(NotEnoughPrecision);
        }
        for j in (i + 1)..n {
            *q.at_mut(j, i) = q.at(i, j).clone();
            *q.at_mut(i, j) = RR.div(q.at(i, j), q.at(i, i));
        }
        for k in (i + 1)..n {
            for l in k..n {
                *q.at_mut(k, l) = RR.sub(q.at(k, l), &RR.mul(q.at(k, i), q.at(i, l)));
            }
        }
    }
    return Ok(q);
}

struct Enumeration<'a, R, F>
    where R: ApproxRealField
{
    RR: &'a R,
    q: OwnedMatrix<R::Element>,
    radius_sqr: R::Element,
    skip_prefix: usize,
    current: Vec<BigInt>,
    for_point: F,
    visited: usize
}

impl<'a, R, F> Enumeration<'a, R, F>
    where R: ApproxRealField,
        F: FnMut(&[BigInt], &R::Element) -> Option<R::Element>
{
    fn visit(&mut self, i: usize, used: R::Element) -> Result<(), NotEnoughPrecision> {
        let RR = self.RR;
        let n = self.current.len();
        let top_zero = self.current[(i + 1)..].iter().all(|x| x.is_zero());
        if top_zero && i < self.skip_prefix {
            return Ok(());
        }
        let slack = RR.sub(&self.radius_sqr, &used);
        if RR.is_neg(&slack) {
            return Ok(());
        }
        let center = RR.negate(&RR.sum(((i + 1)..n).map(|j| RR.mul_int(self.q.at(i, j), &self.current[j]))));
        let width = RR.sqrt(&RR.div(&slack, self.q.at(i, i)));
        let mut x = RR.round_to_integer(&RR.sub(&center, &width)).ok_or(NotEnoughPrecision)? - BigInt::one();
        let upper = RR.round_to_integer(&RR.add(&center, &width)).ok_or(NotEnoughPrecision)? + BigInt::one();
        if top_zero && x < BigInt::zero() {
            x = BigInt::zero();
        }
        while x <= upper {
            let difference = RR.sub(&RR.from_int(&x), &center);
            let total = RR.add(&used, &RR.mul(self.q.at(i, i), &RR.square(&difference)));
            if !RR.is_gt(&total, &self.radius_sqr) {
                self.current[i] = x.clone();
                if i == 0 {
                    if !self.current.iter().all(|c| c.is_zero()) {
                        self.visited += 1;
                        if let Some(new_radius_sqr) = (self.for_point)(&self.current, &total) {
                            self.radius_sqr = new_radius_sqr;
                        }
                    }
                } else {
                    self.visit(i - 1, total)?;
                }
            }
            x += 1;
        }
        self.current[i] = BigInt::zero();
        return Ok(());
    }
}

///
/// Uses the Fincke-Pohst algorithm to enumerate all nonzero integer vectors `x` with
/// `x^T Q x <= radius_sqr`, where `Q` is the given positive definite quadratic form.
///
/// Only one vector of each pair `x, -x` is enumerated, namely the one whose last nonzero
/// entry is positive. Vectors whose support is contained in the first `skip_prefix`
/// coordinates are skipped, together with their whole subtree of the enumeration.
///
/// For each vector, `for_point` is called with the vector and (an approximation to) its
/// norm. If it returns a value, this is used as the new `radius_sqr` for the remainder of
/// the enumeration, which can be used to speed up the search for short vectors once a
/// solution has been found.
///
/// It is strongly recommended to use this on a reduced quadratic form (e.g. LLL-reduced),
/// since this vastly improves performance.
///
#[stability::unstable(feature = "enable")]
#[instrument(skip_all, level = "trace")]
pub fn fincke_pohst<R, F>(RR: &R, quadratic_form: &OwnedMatrix<R::Element>, radius_sqr: R::Element, skip_prefix: usize, for_point: F) -> Result<(), NotEnoughPrecision>
    where R: ApproxRealField,
        F: FnMut(&[BigInt], &R::Element) -> Option<R::Element>
{
    let n = quadratic_form.row_count();
    if n == 0 {
        return Ok(());
    }
    let q = cholesky(RR, quadratic_form)?;
    let mut enumeration = Enumeration {
        RR,
        q,
        radius_sqr,
        skip_prefix,
        current: vec![BigInt::zero(); n],
        for_point,
        visited: 0
    };
    enumeration.visit(n - 1, RR.zero())?;
    event!(Level::TRACE, visited = enumeration.visited, "enumeration finished");
    return Ok(());
}

#[cfg(test)]
use crate::tracing::LogAlgorithmSubscriber;
#[cfg(test)]
use crate::rings::approx_real::float::Real64;

#[cfg(test)]
fn collect_points(form: &[[f64; 2]; 2], radius_sqr: f64, skip_prefix: usize) -> Vec<(i64, i64)> {
    let matrix = OwnedMatrix::from_rows(form.iter().map(|row| row.to_vec()).collect());
    let mut result = Vec::new();
    fincke_pohst(&Real64::RING, &matrix, radius_sqr, skip_prefix, |x, _| {
        result.push((i64::try_from(&x[0]).unwrap(), i64::try_from(&x[1]).unwrap()));
        None
    }).unwrap();
    result.sort();
    return result;
}

#[test]
fn test_fincke_pohst() {
    LogAlgorithmSubscriber::init_test();
    let identity = [[1., 0.], [0., 1.]];
    assert_eq!(vec![(0, 1), (1, 0)], collect_points(&identity, 1.5, 0));
    assert_eq!(vec![(-1, 1), (0, 1), (1, 0), (1, 1)], collect_points(&identity, 2.5, 0));
    assert_eq!(vec![(-1, 1), (0, 1), (1, 1)], collect_points(&identity, 2.5, 1));

    // the A2 lattice has 3 pairs of shortest vectors
    let a2 = [[2., -1.], [-1., 2.]];
    assert_eq!(vec![(0, 1), (1, 0), (1, 1)], collect_points(&a2, 2.5, 0));
}

#[test]
fn test_fincke_pohst_shrinking_radius() {
    LogAlgorithmSubscriber::init_test();
    let matrix = OwnedMatrix::from_rows(vec![vec![5., 1.], vec![1., 3.]]);
    let mut shortest = f64::INFINITY;
    let mut calls = 0;
    fincke_pohst(&Real64::RING, &matrix, 100., 0, |_, norm| {
        calls += 1;
        shortest = shortest.min(*norm);
        Some(shortest)
    }).unwrap();
    assert_eq!(3., shortest);
    assert!(calls < 10);
}

#[test]
fn test_cholesky() {
    LogAlgorithmSubscriber::init_test();
    let RR = Real64::RING;
    let matrix = OwnedMatrix::from_rows(vec![vec![4., 2.], vec![2., 3.]]);
    let q = cholesky(&RR, &matrix).unwrap();
    // 4x^2 + 4xy + 3y^2 = 4 (x + y/2)^2 + 2 y^2
    assert_eq!(4., *q.at(0, 0));
    assert_eq!(0.5, *q.at(0, 1));
    assert_eq!(2., *q.at(1, 1));
    assert_eq!(Err(NotEnoughPrecision), cholesky(&RR, &OwnedMatrix::from_rows(vec![vec![1., 1.], vec![1., 1.]])).map(|_| ()));
}
