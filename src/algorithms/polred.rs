use std::cmp::Ordering;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use tracing::{event, span, Level};

use crate::algorithms::fincke_pohst::fincke_pohst;
use crate::algorithms::linsolve::{invert_rational, rank};
use crate::algorithms::lll::{reduce_basis, LllOptions};
use crate::algorithms::resultant::integer_discriminant;
use crate::error::{NumberFieldError, Result};
use crate::matrix::OwnedMatrix;
use crate::rings::approx_real::{run_at_precision, ApproxRealField, NotEnoughPrecision, Retry};
use crate::rings::extension::embeddings::EmbeddingTable;
use crate::rings::extension::number_field::{NfEl, NumberField};
use crate::rings::poly::dense_poly::QPoly;

const RANDOM_TRIES_PER_DEGREE: usize = 20;
const MAX_POLREDBEST_ROUNDS: usize = 32;
const T2_RELATIVE_TOLERANCE: f64 = 1e-9;

///
/// Parameters for [`polred()`], [`polredbest()`] and [`polredabs()`].
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolredOptions {
    /// The precision (in bits) at which numerical computations are started
    pub precision: u64,
    /// Numerical computations fail with [`NumberFieldError::PrecisionExhausted`] if they
    /// do not succeed at this precision
    pub max_precision: u64,
    /// How many pseudo-random short vectors are tried to find a primitive element, if
    /// none of the reduced basis vectors and their sums and differences is primitive.
    /// Defaults to `20 n`
    pub random_tries: Option<usize>
}

impl Default for PolredOptions {

    fn default() -> Self {
        PolredOptions {
            precision: 64,
            max_precision: 1 << 14,
            random_tries: None
        }
    }
}

///
/// A defining polynomial of (a subfield of) a number field, found by one of the polred
/// variants.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// The characteristic polynomial of the generator if it is primitive, otherwise its
    /// minimal polynomial
    pub poly: QPoly,
    /// Coordinates of the generator w.r.t. the integral basis
    pub coords: Vec<BigInt>,
    /// The generator as polynomial in the root of the input polynomial of the field
    pub witness: QPoly,
    /// The value `T2(a) = sum_sigma |sigma(a)|^2` of the generator `a`
    pub t2: f64
}

impl Candidate {

    ///
    /// Expresses the root of the input polynomial of the field as polynomial in the generator
    /// of this candidate. Returns `None` if the generator is not primitive.
    ///
    pub fn inverse_witness(&self, field: &NumberField) -> Option<QPoly> {
        let generator = field.from_input_poly(&self.witness);
        field.express_in(&generator, &field.input_root())
    }

    ///
    /// The generator of this candidate, as element of the given field.
    ///
    pub fn generator(&self, field: &NumberField) -> NfEl {
        field.from_integral(&self.coords)
    }
}

///
/// Returns whether `f(x)` has to be replaced by `(-1)^d f(-x)` to become the canonical
/// representative, i.e. whether the highest coefficient `a_k` with `d - k` odd is positive.
///
fn needs_sign_flip(poly: &QPoly) -> bool {
    let Some(d) = poly.degree() else {
        return false;
    };
    for k in (0..d).rev().step_by(2) {
        let c = poly.coeff(k);
        if !c.is_zero() {
            return c.is_positive();
        }
    }
    return false;
}

fn flip_sign(poly: &QPoly) -> QPoly {
    let d = poly.degree().unwrap_or(0);
    let result = poly.negate_variable();
    if d % 2 == 1 {
        -&result
    } else {
        result
    }
}

fn order_key(poly: &QPoly) -> (BigInt, Vec<BigRational>, Vec<BigRational>) {
    let d = poly.degree().unwrap_or(0);
    let coeffs = poly.coeffs()[..d].iter().rev().cloned().collect::<Vec<_>>();
    let abs_coeffs = coeffs.iter().map(|c| c.abs()).collect();
    (integer_discriminant(poly).abs(), abs_coeffs, coeffs)
}

fn compare_polys(lhs: &QPoly, rhs: &QPoly) -> Ordering {
    order_key(lhs).cmp(&order_key(rhs))
}

fn smaller_coords(lhs: &[BigInt], rhs: &[BigInt]) -> bool {
    lhs.iter().map(|x| x.abs()).lt(rhs.iter().map(|x| x.abs()))
}

fn t2_of(table: &EmbeddingTable, coords: &[BigInt]) -> f64 {
    let RR = table.real_field();
    let CC = table.complex_field();
    RR.to_f64(&RR.sum(table.conjugate_values_int(coords).iter().map(|z| CC.abs_squared(z))))
}

fn make_candidate(field: &NumberField, table: &EmbeddingTable, poly: QPoly, mut coords: Vec<BigInt>) -> Candidate {
    let poly = if needs_sign_flip(&poly) {
        coords = coords.iter().map(|c| -c).collect();
        flip_sign(&poly)
    } else {
        poly
    };
    let witness = field.to_input_poly(&field.from_integral(&coords));
    let t2 = t2_of(table, &coords);
    return Candidate { poly, coords, witness, t2 };
}

///
/// Adds the candidate to the list, unless a candidate with the same polynomial is already
/// contained. In this case, the one with the smaller coordinate vector is kept.
///
fn insert_deduplicated(list: &mut Vec<Candidate>, candidate: Candidate) {
    if let Some(existing) = list.iter_mut().find(|c| c.poly == candidate.poly) {
        if smaller_coords(&candidate.coords, &existing.coords) {
            *existing = candidate;
        }
    } else {
        list.push(candidate);
    }
}

fn linear_candidate(field: &NumberField) -> Candidate {
    Candidate {
        poly: QPoly::indeterminate(),
        coords: vec![BigInt::zero(); field.degree()],
        witness: QPoly::zero(),
        t2: 0.
    }
}

///
/// For each vector of an LLL-reduced basis of the maximal order (w.r.t. the `T2`-form),
/// computes its characteristic polynomial, or its minimal polynomial if it does not
/// generate the field.
///
/// The polynomials are normalized w.r.t. the substitution `x -> -x` and duplicates are
/// removed, otherwise they are returned in the order of the reduced basis.
///
pub fn polred(field: &NumberField, options: &PolredOptions) -> Result<Vec<Candidate>> {
    let n = field.degree();
    if n == 1 {
        return Ok(vec![linear_candidate(field)]);
    }
    span!(Level::INFO, "polred", n = n).in_scope(|| {
        let reduced = reduce_basis(field, &LllOptions::default())?;
        let table = field.embeddings(options.precision)?;
        let mut result = Vec::new();
        for i in 0..n {
            let coords = reduced.vector(i);
            let poly = field.minpoly(&field.from_integral(&coords));
            insert_deduplicated(&mut result, make_candidate(field, &table, poly, coords));
        }
        event!(Level::INFO, candidates = result.len(), "polred");
        return Ok(result);
    })
}

///
/// Searches for a defining polynomial of the field with small discriminant, by considering
/// the vectors of a reduced basis and their pairwise sums and differences. If a polynomial
/// better than the current one is found, the field is rebased to it (keeping the maximal
/// order) and the search is repeated.
///
/// Polynomials are compared by the absolute value of their discriminant, then by the
/// absolute values of their coefficients (starting from the highest non-leading one).
///
pub fn polredbest(field: &NumberField, options: &PolredOptions) -> Result<Candidate> {
    let n = field.degree();
    if n == 1 {
        return Ok(linear_candidate(field));
    }
    span!(Level::INFO, "polredbest", n = n).in_scope(|| {
        let theta = field.theta();
        let (mut current_poly, mut generator) = if needs_sign_flip(field.poly()) {
            (flip_sign(field.poly()), field.negate(&theta))
        } else {
            (field.poly().clone(), theta.clone())
        };
        let mut current_field = if generator == theta {
            field.clone()
        } else {
            field.rebase(&current_poly, &generator)?
        };
        for round in 0..MAX_POLREDBEST_ROUNDS {
            let reduced = reduce_basis(&current_field, &LllOptions::default())?;
            let mut elements = (0..n).map(|i| reduced.vector(i)).collect::<Vec<_>>();
            for i in 0..n {
                for j in (i + 1)..n {
                    let (lhs, rhs) = (reduced.vector(i), reduced.vector(j));
                    elements.push(lhs.iter().zip(rhs.iter()).map(|(a, b)| a + b).collect());
                    elements.push(lhs.iter().zip(rhs.iter()).map(|(a, b)| a - b).collect());
                }
            }
            let mut best: Option<(QPoly, NfEl)> = None;
            for coords in elements {
                let mut element = current_field.from_integral(&coords);
                let mut poly = current_field.charpoly(&element);
                if !poly.is_squarefree() {
                    continue;
                }
                if needs_sign_flip(&poly) {
                    poly = flip_sign(&poly);
                    element = current_field.negate(&element);
                }
                if best.as_ref().map(|(best_poly, _)| compare_polys(&poly, best_poly) == Ordering::Less).unwrap_or(true) {
                    best = Some((poly, element));
                }
            }
            match best {
                Some((poly, element)) if compare_polys(&poly, &current_poly) == Ordering::Less => {
                    event!(Level::DEBUG, round = round, poly = %poly, "improved");
                    let g = current_field.to_poly(&element);
                    generator = field.from_poly(&g.compose_mod(&field.to_poly(&generator), field.poly()));
                    current_field = current_field.rebase(&poly, &element)?;
                    current_poly = poly;
                },
                _ => break
            }
        }
        let coords = field.to_integral(&generator).ok_or_else(|| NumberFieldError::Bug("polredbest generator is not integral".to_owned()))?;
        let table = field.embeddings(options.precision)?;
        let t2 = t2_of(&table, &coords);
        let witness = field.to_input_poly(&generator);
        event!(Level::INFO, poly = %current_poly, "polredbest");
        return Ok(Candidate { poly: current_poly, coords, witness, t2 });
    })
}

///
/// Computes the characteristic polynomial of the element with the given coordinates from
/// its conjugates, and rounds it to an integral polynomial. Also returns `T2` of the element.
///
fn numeric_charpoly(table: &EmbeddingTable, coords: &[BigInt]) -> std::result::Result<(QPoly, f64), NotEnoughPrecision> {
    let RR = table.real_field();
    let CC = table.complex_field();
    let values = table.conjugate_values_int(coords);
    let t2 = RR.to_f64(&RR.sum(values.iter().map(|z| CC.abs_squared(z))));
    let mut coeffs = vec![CC.one()];
    for z in &values {
        let mut next = vec![CC.zero(); coeffs.len() + 1];
        for (i, c) in coeffs.iter().enumerate() {
            next[i + 1] = CC.add(&next[i + 1], c);
            next[i] = CC.sub(&next[i], &CC.mul(z, c));
        }
        coeffs = next;
    }
    let tolerance = RR.pow2(-8);
    let mut result = Vec::with_capacity(coeffs.len());
    for c in &coeffs {
        let rounded = RR.round_to_integer(&c.re).ok_or(NotEnoughPrecision)?;
        if rounded.bits() + 16 > RR.precision_bits() {
            return Err(NotEnoughPrecision);
        }
        let error = RR.add(&RR.abs(&RR.sub(&c.re, &RR.from_int(&rounded))), &RR.abs(&c.im));
        if !RR.is_lt(&error, &tolerance) {
            return Err(NotEnoughPrecision);
        }
        result.push(rounded);
    }
    return Ok((QPoly::from_bigints(result), t2));
}

///
/// A primitive element found during the search for short generators, with its (exactly
/// verified) characteristic polynomial.
///
struct ShortElement {
    poly: QPoly,
    coords: Vec<BigInt>,
    t2: f64
}

///
/// Checks whether `transform * x` is a primitive element. The characteristic polynomial is
/// computed numerically and verified exactly, thus a wrong rounding only causes a retry with
/// higher precision.
///
fn evaluate_point(field: &NumberField, table: &EmbeddingTable, transform: &OwnedMatrix<BigInt>, x: &[BigInt]) -> std::result::Result<Option<ShortElement>, Retry> {
    let coords = transform.mul_vec(x);
    let (poly, t2) = numeric_charpoly(table, &coords)?;
    let element = field.to_poly(&field.from_integral(&coords));
    if !poly.compose_mod(&element, field.poly()).is_zero() {
        return Err(Retry::NotEnoughPrecision);
    }
    if !poly.is_squarefree() {
        return Ok(None);
    }
    return Ok(Some(ShortElement { poly, coords, t2 }));
}

fn within_tolerance(t2: f64, bound: f64) -> bool {
    t2 <= bound * (1. + T2_RELATIVE_TOLERANCE) + T2_RELATIVE_TOLERANCE
}

///
/// The vectors (w.r.t. the reduced basis) that are used to find a first bound for the
/// `T2`-norm of a primitive element.
///
fn seed_vectors(n: usize) -> Vec<Vec<BigInt>> {
    let unit = |i: usize| (0..n).map(|k| if k == i { BigInt::one() } else { BigInt::zero() }).collect::<Vec<_>>();
    let mut result = (1..n).map(unit).collect::<Vec<_>>();
    for i in 1..n {
        for j in (i + 1)..n {
            let (lhs, rhs) = (unit(i), unit(j));
            result.push(lhs.iter().zip(rhs.iter()).map(|(a, b)| a + b).collect());
            result.push(lhs.iter().zip(rhs.iter()).map(|(a, b)| a - b).collect());
        }
    }
    return result;
}

///
/// Finds the smallest `T2`-norm of a primitive element among the seed vectors, then random
/// short combinations, and finally the root `theta` of the defining polynomial.
///
fn seed_bound(field: &NumberField, table: &EmbeddingTable, transform: &OwnedMatrix<BigInt>, random_tries: usize) -> std::result::Result<f64, Retry> {
    let n = field.degree();
    let mut best: Option<f64> = None;
    for x in seed_vectors(n) {
        if let Some(element) = evaluate_point(field, table, transform, &x)? {
            best = Some(best.map(|b| b.min(element.t2)).unwrap_or(element.t2));
        }
    }
    if let Some(result) = best {
        return Ok(result);
    }
    let mut rng = oorandom::Rand64::new(n as u128);
    for _ in 0..random_tries {
        let x = (0..n).map(|_| BigInt::from(rng.rand_range(0..3) as i64 - 1)).collect::<Vec<_>>();
        if let Some(element) = evaluate_point(field, table, transform, &x)? {
            event!(Level::DEBUG, "primitive element found by random search");
            return Ok(element.t2);
        }
    }
    let inverse = invert_rational(&transform.map(|c| BigRational::from_integer(c.clone())))
        .ok_or_else(|| Retry::Abort(NumberFieldError::Bug("reduction transform is not invertible".to_owned())))?;
    let theta = inverse.mul_vec(&field.theta()).into_iter().map(|c| c.to_integer()).collect::<Vec<_>>();
    return match evaluate_point(field, table, transform, &theta)? {
        Some(element) => Ok(element.t2),
        None => Err(Retry::Abort(NumberFieldError::Bug("root of defining polynomial is not primitive".to_owned())))
    };
}

fn rational_rank(n: usize, elements: &[NfEl]) -> usize {
    rank(&OwnedMatrix::from_cols(n, elements.to_vec()))
}

///
/// Returns a `Q`-basis of the subfield generated by the given elements, by closing their
/// span under multiplication. Stops as soon as the rank reaches the degree of the field.
///
fn generated_subfield(field: &NumberField, generators: &[NfEl]) -> Vec<NfEl> {
    let n = field.degree();
    let mut basis = vec![field.one()];
    let try_insert = |basis: &mut Vec<NfEl>, x: NfEl| {
        basis.push(x);
        if rational_rank(n, basis) < basis.len() {
            basis.pop();
        }
    };
    for g in generators {
        try_insert(&mut basis, g.clone());
    }
    let mut i = 0;
    while i < basis.len() && basis.len() < n {
        for j in 0..=i {
            let product = field.mul(&basis[i], &basis[j]);
            try_insert(&mut basis, product);
            if basis.len() == n {
                return basis;
            }
        }
        i += 1;
    }
    return basis;
}

///
/// Reorders the columns of the reduction transform such that the first ones span a proper
/// subfield, and returns the new transform together with the number of these columns.
///
/// The reduced basis vectors are considered in order, and a vector is moved to the prefix
/// if it generates a proper subfield together with the vectors already in the prefix. The
/// first reduced basis vector is `1`, so the prefix is never empty.
///
fn subfield_prefix(field: &NumberField, transform: &OwnedMatrix<BigInt>) -> (OwnedMatrix<BigInt>, usize) {
    let n = field.degree();
    let vectors = transform.cols();
    debug_assert!(field.from_integral(&vectors[0]) == field.one());
    let mut prefix = vec![0];
    let mut rest = Vec::new();
    let mut subfield = vec![field.one()];
    for i in 1..n {
        let mut extended = subfield.clone();
        extended.push(field.from_integral(&vectors[i]));
        if rational_rank(n, &extended) == subfield.len() {
            prefix.push(i);
            continue;
        }
        let generated = generated_subfield(field, &extended);
        if generated.len() < n {
            subfield = generated;
            prefix.push(i);
        } else {
            rest.push(i);
        }
    }
    event!(Level::DEBUG, prefix = prefix.len(), subfield_degree = subfield.len(), "subfield prefix");
    let len = prefix.len();
    let cols = prefix.into_iter().chain(rest.into_iter()).map(|i| vectors[i].clone()).collect();
    return (OwnedMatrix::from_cols(n, cols), len);
}

///
/// Computes all defining polynomials of the field whose root `a` has minimal `T2(a)`,
/// among all primitive integral elements. They are normalized w.r.t. `x -> -x`, deduplicated
/// and sorted by discriminant and coefficient size.
///
/// # Algorithm
///
/// After reducing the basis of the maximal order, a first bound is found by testing small
/// vectors. Then all vectors of `T2`-norm below this bound are enumerated using [`fincke_pohst()`],
/// and the bound is decreased whenever a shorter primitive element is found. Before that, the
/// reduced basis vectors that lie in a common proper subfield are moved to the front, and all
/// vectors in their span are skipped during enumeration, since they are not primitive.
///
/// Characteristic polynomials are computed numerically and verified exactly. If numerical
/// errors prevent this, the computation is repeated with higher precision.
///
pub fn polredabs_all(field: &NumberField, options: &PolredOptions) -> Result<Vec<Candidate>> {
    let n = field.degree();
    if n == 1 {
        return Ok(vec![linear_candidate(field)]);
    }
    span!(Level::INFO, "polredabs", n = n).in_scope(|| {
        let reduced = reduce_basis(field, &LllOptions::default())?;
        let (transform, prefix) = subfield_prefix(field, &reduced.transform);
        let transform = &transform;
        let random_tries = options.random_tries.unwrap_or(RANDOM_TRIES_PER_DEGREE * n);
        let (table, found) = run_at_precision(options.precision, options.max_precision, |precision| {
            let table = field.embeddings(precision)?;
            let RR = table.real_field();
            let real_matrix = table.real_matrix();
            let embedding_matrix = OwnedMatrix::from_fn(n, n, |i, j| RR.sum((0..n).filter(|k| !transform.at(*k, j).is_zero()).map(|k| RR.mul_int(real_matrix.at(i, k), transform.at(k, j)))));
            let gram = OwnedMatrix::from_fn(n, n, |i, j| RR.sum((0..n).map(|k| RR.mul(embedding_matrix.at(k, i), embedding_matrix.at(k, j)))));

            let mut best = seed_bound(field, &table, transform, random_tries)?;
            event!(Level::DEBUG, bound = best, "initial bound");
            let radius = |bound: f64| RR.from_f64(bound * (1. + 2. * T2_RELATIVE_TOLERANCE) + 2. * T2_RELATIVE_TOLERANCE);
            let mut found: Vec<ShortElement> = Vec::new();
            let mut failure: Option<Retry> = None;
            fincke_pohst(&RR, &gram, radius(best), prefix, |x, _| {
                if failure.is_some() {
                    return None;
                }
                match evaluate_point(field, &table, transform, x) {
                    Err(e) => {
                        failure = Some(e);
                        return Some(RR.from_i64(-1));
                    },
                    Ok(None) => return None,
                    Ok(Some(element)) => {
                        if !within_tolerance(best, element.t2) {
                            best = element.t2;
                            found.retain(|e| within_tolerance(e.t2, best));
                            found.push(element);
                            return Some(radius(best));
                        } else if within_tolerance(element.t2, best) {
                            found.push(element);
                        }
                        return None;
                    }
                }
            })?;
            if let Some(e) = failure {
                return Err(e);
            }
            found.retain(|e| within_tolerance(e.t2, best));
            event!(Level::DEBUG, t2 = best, count = found.len(), precision = precision, "enumeration");
            return Ok((table, found));
        })?;
        let mut result = Vec::new();
        for element in found {
            insert_deduplicated(&mut result, make_candidate(field, &table, element.poly, element.coords));
        }
        result.sort_by(|lhs, rhs| compare_polys(&lhs.poly, &rhs.poly));
        event!(Level::INFO, candidates = result.len(), "polredabs");
        return Ok(result);
    })
}

///
/// Computes the canonical defining polynomial of the field, i.e. the first result of
/// [`polredabs_all()`]: among the characteristic polynomials of primitive integral elements
/// of minimal `T2`-norm, the one with smallest discriminant and coefficients.
///
pub fn polredabs(field: &NumberField, options: &PolredOptions) -> Result<Candidate> {
    polredabs_all(field, options)?.into_iter().next().ok_or_else(|| NumberFieldError::Bug("no primitive element of minimal norm found".to_owned()))
}

#[cfg(test)]
use crate::tracing::LogAlgorithmSubscriber;
#[cfg(test)]
use crate::rings::extension::number_field::{OrderOptions, OrderSource};

#[cfg(test)]
fn field(coeffs: &[i64]) -> NumberField {
    NumberField::build(OrderSource::Polynomial(QPoly::from_ints(coeffs)), &OrderOptions::default()).unwrap()
}

#[cfg(test)]
fn assert_valid_candidate(K: &NumberField, candidate: &Candidate) {
    let generator = K.from_input_poly(&candidate.witness);
    assert_eq!(candidate.generator(K), generator);
    assert_eq!(candidate.poly, K.charpoly(&generator));
    let inverse = candidate.inverse_witness(K).unwrap();
    let root = inverse.compose_mod(&K.to_poly(&generator), K.poly());
    assert_eq!(K.input_root(), K.from_poly(&root));
}

#[test]
fn test_sign_canonicalization() {
    assert!(needs_sign_flip(&QPoly::from_ints(&[-1, 1, 1])));
    assert!(!needs_sign_flip(&QPoly::from_ints(&[-1, -1, 1])));
    assert!(!needs_sign_flip(&QPoly::from_ints(&[1, 0, 1])));
    // x^3 + 2x + 5: the coefficient of x^0 decides
    assert!(needs_sign_flip(&QPoly::from_ints(&[5, 2, 0, 1])));
    assert_eq!(QPoly::from_ints(&[-5, 2, 0, 1]), flip_sign(&QPoly::from_ints(&[5, 2, 0, 1])));
    assert_eq!(QPoly::from_ints(&[-1, -1, 1]), flip_sign(&QPoly::from_ints(&[-1, 1, 1])));
}

#[test]
fn test_order_key() {
    // x^2 - x - 1 and x^2 - 3x + 1 both have discriminant 5
    assert_eq!(Ordering::Less, compare_polys(&QPoly::from_ints(&[-1, -1, 1]), &QPoly::from_ints(&[1, -3, 1])));
    assert_eq!(Ordering::Less, compare_polys(&QPoly::from_ints(&[-1, -1, 1]), &QPoly::from_ints(&[-5, 0, 1])));
    assert_eq!(Ordering::Less, compare_polys(&QPoly::from_ints(&[1, 0, 1]), &QPoly::from_ints(&[2, 0, 1])));
}

#[test]
fn test_polred() {
    LogAlgorithmSubscriber::init_test();
    let K = field(&[-5, 0, 1]);
    let result = polred(&K, &PolredOptions::default()).unwrap();
    assert_eq!(2, result.len());
    assert_eq!(QPoly::from_ints(&[-1, 1]), result[0].poly);
    assert_eq!(QPoly::from_ints(&[-1, -1, 1]), result[1].poly);
    assert!((result[1].t2 - 3.).abs() < 1e-9);
    assert_valid_candidate(&K, &result[1]);
}

#[test]
fn test_polredbest() {
    LogAlgorithmSubscriber::init_test();
    let K = field(&[-5, 0, 1]);
    let best = polredbest(&K, &PolredOptions::default()).unwrap();
    assert_eq!(QPoly::from_ints(&[-1, -1, 1]), best.poly);
    assert_valid_candidate(&K, &best);

    // x^2 + 1 cannot be improved
    let K = field(&[1, 0, 1]);
    let best = polredbest(&K, &PolredOptions::default()).unwrap();
    assert_eq!(QPoly::from_ints(&[1, 0, 1]), best.poly);
}

#[test]
fn test_polredabs_quadratic() {
    LogAlgorithmSubscriber::init_test();
    let options = PolredOptions::default();
    assert_eq!(QPoly::from_ints(&[-1, -1, 1]), polredabs(&field(&[-5, 0, 1]), &options).unwrap().poly);
    assert_eq!(QPoly::from_ints(&[1, 0, 1]), polredabs(&field(&[5, 4, 1]), &options).unwrap().poly);
    assert_eq!(QPoly::from_ints(&[1, -1, 1]), polredabs(&field(&[3, 0, 1]), &options).unwrap().poly);

    // 2x^2 - 1 defines Q(sqrt(2))
    let K = NumberField::build(OrderSource::Polynomial(QPoly::from_ints(&[-1, 0, 2])), &OrderOptions::default()).unwrap();
    let candidate = polredabs(&K, &options).unwrap();
    assert_eq!(QPoly::from_ints(&[-2, 0, 1]), candidate.poly);
    assert!((candidate.t2 - 4.).abs() < 1e-9);
    assert_valid_candidate(&K, &candidate);
}

#[test]
fn test_polredabs_cubic() {
    LogAlgorithmSubscriber::init_test();
    let options = PolredOptions::default();
    let K = field(&[-12, 0, 0, 1]);
    let all = polredabs_all(&K, &options).unwrap();
    let best = &all[0];
    assert_valid_candidate(&K, best);
    for candidate in &all {
        assert!((candidate.t2 - best.t2).abs() < 1e-6);
    }
    // no reduced basis vector is shorter
    for candidate in polred(&K, &options).unwrap() {
        if candidate.poly.degree() == Some(3) {
            assert!(best.t2 <= candidate.t2 + 1e-6);
        }
    }
    // the result defines the same field, and is a fixpoint
    let L = field_from(&best.poly);
    assert_eq!(K.discriminant(), L.discriminant());
    assert_eq!(best.poly, polredabs(&L, &options).unwrap().poly);
}

#[cfg(test)]
fn field_from(poly: &QPoly) -> NumberField {
    NumberField::build(OrderSource::Polynomial(poly.clone()), &OrderOptions::default()).unwrap()
}

#[test]
fn test_polred_linear() {
    LogAlgorithmSubscriber::init_test();
    let K = NumberField::build(OrderSource::Polynomial(QPoly::from_ints(&[-1, 2])), &OrderOptions::default()).unwrap();
    assert_eq!(QPoly::indeterminate(), polredabs(&K, &PolredOptions::default()).unwrap().poly);
    assert_eq!(QPoly::indeterminate(), polredbest(&K, &PolredOptions::default()).unwrap().poly);
}

#[test]
fn test_subfield_prefix() {
    LogAlgorithmSubscriber::init_test();
    // Z[zeta_8] has the orthogonal basis 1, zeta, i, zeta^3, and 1, i span Q(i)
    let K = field(&[1, 0, 0, 0, 1]);
    let reduced = reduce_basis(&K, &LllOptions::default()).unwrap();
    let (transform, prefix) = subfield_prefix(&K, &reduced.transform);
    assert_eq!(2, prefix);
    assert_eq!(QPoly::from_ints(&[1, 0, 1]), K.minpoly(&K.from_integral(&transform.col(1))));
    assert!(!K.is_primitive(&K.add(&K.from_integral(&transform.col(0)), &K.from_integral(&transform.col(1)))));
    assert!(K.is_primitive(&K.from_integral(&transform.col(2))));

    // Q(sqrt(2), sqrt(3)), whatever the prefix is, it spans a proper subfield
    let K = field(&[1, 0, -10, 0, 1]);
    let reduced = reduce_basis(&K, &LllOptions::default()).unwrap();
    let (transform, prefix) = subfield_prefix(&K, &reduced.transform);
    assert!(prefix >= 1 && prefix < 4);
    let prefix_elements = (0..prefix).map(|i| K.from_integral(&transform.col(i))).collect::<Vec<_>>();
    assert!(generated_subfield(&K, &prefix_elements).len() < 4);
    for element in &prefix_elements {
        assert!(!K.is_primitive(element));
    }
    assert_eq!(QPoly::from_ints(&[1, 0, -4, 0, 1]), polredabs(&K, &PolredOptions::default()).unwrap().poly);
}

#[test]
fn test_generated_subfield() {
    LogAlgorithmSubscriber::init_test();
    let K = field(&[1, 0, -10, 0, 1]);
    let theta = K.theta();
    // theta^2 = 5 + 2 sqrt(6)
    assert_eq!(2, generated_subfield(&K, &[K.mul(&theta, &theta)]).len());
    assert_eq!(4, generated_subfield(&K, &[theta]).len());
    assert_eq!(1, generated_subfield(&K, &[K.from_int(&BigInt::from(3))]).len());
}

#[test]
fn test_polredabs_totally_complex() {
    LogAlgorithmSubscriber::init_test();
    let options = PolredOptions::default();
    let K = field(&[1, 1, 1, 1, 1]);
    let all = polredabs_all(&K, &options).unwrap();
    let best = &all[0];
    assert_eq!(QPoly::from_ints(&[1, -1, 1, -1, 1]), best.poly);
    assert_valid_candidate(&K, best);
    assert!((best.t2 - 4.).abs() < 1e-6);
    // no primitive reduced basis vector is shorter
    for candidate in polred(&K, &options).unwrap() {
        if candidate.poly.degree() == Some(4) {
            assert!(best.t2 <= candidate.t2 + 1e-6);
        }
    }
    let L = field_from(&best.poly);
    assert_eq!(K.discriminant(), L.discriminant());
    assert_eq!(best.poly, polredabs(&L, &options).unwrap().poly);

    assert_eq!(QPoly::from_ints(&[1, 0, 0, 0, 1]), polredabs(&field(&[1, 0, 0, 0, 1]), &options).unwrap().poly);
}
