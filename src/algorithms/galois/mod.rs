use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use tracing::{event, span, Level};

use crate::algorithms::linsolve::invert_rational;
use crate::algorithms::lll::exact::lll_lattice;
use crate::error::{NumberFieldError, Result};
use crate::matrix::OwnedMatrix;
use crate::rings::approx_real::{run_at_precision, ApproxRealField, NotEnoughPrecision, Retry};
use crate::rings::approx_real::bigfloat::BigFloat;
use crate::rings::extension::embeddings::EmbeddingTable;
use crate::rings::extension::number_field::{NfEl, NumberField};
use crate::rings::float_complex::Complex;

///
/// Contains [`apply::apply()`], for applying automorphisms to elements, ideals and primes.
///
pub mod apply;
///
/// Contains [`ramification::frobenius()`] and [`ramification::ramification_groups()`].
///
pub mod ramification;

///
/// Safety margin (in bits) added to the scaling of the integer relation lattice.
///
const RELATION_SAFETY_BITS: f64 = 10.;
///
/// Extra precision (in bits) beyond the scaling of the relation lattice.
///
const RELATION_EXTRA_PRECISION: u64 = 32;
///
/// A computed conjugate is matched with a root only if the next closest root is
/// at least this many times as far away (in squared distance).
///
const ROOT_MATCH_RATIO: i64 = 16;

///
/// An automorphism of a number field `K = Q[X]/(T)`.
///
/// It can be given either as permutation `pi` of the roots of `T`, in the order of
/// [`EmbeddingTable::conjugates()`], such that `tau_k(sigma(theta)) = r_pi(k)` for the
/// `k`-th embedding `tau_k`; or as the image `sigma(theta)` of the root `theta` of `T`, in
/// coordinates w.r.t. the integral basis. Given the field, both forms can be converted into
/// each other.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Automorphism {
    Permutation(Vec<usize>),
    Algebraic(Vec<BigInt>)
}

fn unit_vector(n: usize, i: usize) -> Vec<BigInt> {
    let mut result = vec![BigInt::zero(); n];
    result[i] = BigInt::one();
    return result;
}

///
/// Checks whether `T(beta) = 0`, for `beta` given in integral basis coordinates.
///
fn is_root_of_poly(field: &NumberField, beta: &[BigInt]) -> bool {
    let beta_poly = field.order().int_to_poly(beta);
    field.poly().compose_mod(&beta_poly, field.poly()).is_zero()
}

///
/// Returns the matrix of the automorphism `theta -> beta` w.r.t. the integral basis.
/// Its `i`-th column is the image of the `i`-th basis element `w_i`, i.e. `w_i(beta)`.
///
pub(crate) fn substitution_matrix(field: &NumberField, beta: &[BigInt]) -> Result<OwnedMatrix<BigInt>> {
    let beta_poly = field.order().int_to_poly(beta);
    let cols = field.basis().iter().map(|w| field.to_integral(&field.from_poly(&w.compose_mod(&beta_poly, field.poly())))
        .ok_or_else(|| NumberFieldError::Bug("image of integral basis element is not integral".to_owned()))
    ).collect::<Result<Vec<_>>>()?;
    return Ok(OwnedMatrix::from_cols(field.degree(), cols));
}

///
/// Maps an element with rational coordinates by a matrix w.r.t. the integral basis.
///
pub(crate) fn map_element(matrix: &OwnedMatrix<BigInt>, x: &[BigRational]) -> NfEl {
    (0..matrix.row_count()).map(|i| x.iter().enumerate().fold(BigRational::zero(), |acc, (j, c)|
        acc + BigRational::from_integer(matrix.at(i, j).clone()) * c
    )).collect()
}

fn check_algebraic(field: &NumberField, beta: &[BigInt]) -> Result<()> {
    if beta.len() != field.degree() {
        return Err(NumberFieldError::DimensionMismatch { expected: field.degree(), actual: beta.len() });
    }
    if !is_root_of_poly(field, beta) {
        return Err(NumberFieldError::InvalidAutomorphism("image of theta is not a root of the defining polynomial".to_owned()));
    }
    return Ok(());
}

fn check_permutation(n: usize, permutation: &[usize]) -> Result<()> {
    if permutation.len() != n {
        return Err(NumberFieldError::DimensionMismatch { expected: n, actual: permutation.len() });
    }
    let mut seen = vec![false; n];
    for i in permutation {
        if *i >= n || seen[*i] {
            return Err(NumberFieldError::InvalidAutomorphism(format!("{:?} is not a permutation", permutation)));
        }
        seen[*i] = true;
    }
    return Ok(());
}

///
/// Computes the permutation of the roots induced by the automorphism `theta -> beta`,
/// by matching the conjugates of `beta` with the roots of `T`.
///
fn permutation_of(table: &EmbeddingTable, beta: &[BigInt]) -> std::result::Result<Vec<usize>, NotEnoughPrecision> {
    let RR = table.real_field();
    let CC = table.complex_field();
    let roots = table.conjugates();
    let n = roots.len();
    let ratio = RR.from_i64(ROOT_MATCH_RATIO);
    let mut used = vec![false; n];
    let mut result = Vec::with_capacity(n);
    for value in table.conjugate_values_int(beta) {
        let distances = roots.iter().map(|r| CC.abs_squared(&CC.sub(&value, r))).collect::<Vec<_>>();
        let best = (0..n).min_by(|i, j| RR.cmp(&distances[*i], &distances[*j])).ok_or(NotEnoughPrecision)?;
        let threshold = RR.mul(&ratio, &distances[best]);
        if (0..n).any(|j| j != best && !RR.is_gt(&distances[j], &threshold)) || used[best] {
            return Err(NotEnoughPrecision);
        }
        used[best] = true;
        result.push(best);
    }
    return Ok(result);
}

///
/// Recovers `beta = sigma(theta)` from the permutation of the roots, using that the traces
/// `Tr(beta w_j) = sum_k r_pi(k) tau_k(w_j)` are integers, and `beta = G^-1 t` for the
/// trace form `G`.
///
fn algebraic_from_permutation(field: &NumberField, table: &EmbeddingTable, permutation: &[usize]) -> std::result::Result<Vec<BigInt>, Retry> {
    let n = field.degree();
    let RR = table.real_field();
    let CC = table.complex_field();
    let roots = table.conjugates();
    let quarter = RR.from_f64(0.25);
    let not_an_automorphism = || Retry::Abort(NumberFieldError::InvalidAutomorphism(format!("permutation {:?} does not induce an automorphism", permutation)));
    let mut traces = Vec::with_capacity(n);
    for j in 0..n {
        let values = table.conjugate_values_int(&unit_vector(n, j));
        let magnitude: f64 = (0..n).map(|k| RR.to_f64(&CC.abs(&roots[permutation[k]])) * RR.to_f64(&CC.abs(&values[k]))).sum();
        if magnitude * 2f64.powi(8 - table.precision().min(2048) as i32) > 0.125 {
            return Err(Retry::NotEnoughPrecision);
        }
        let sum = (0..n).fold(CC.zero(), |acc, k| CC.add(&acc, &CC.mul(&roots[permutation[k]], &values[k])));
        let rounded = RR.round_to_integer(&sum.re).ok_or(NotEnoughPrecision)?;
        let error = RR.abs(&RR.sub(&sum.re, &RR.from_int(&rounded)));
        if RR.is_gt(&error, &quarter) || RR.is_gt(&RR.abs(&sum.im), &quarter) {
            return Err(not_an_automorphism());
        }
        traces.push(BigRational::from_integer(rounded));
    }
    let gram = field.trace_form().map(|x| BigRational::from_integer(x.clone()));
    let inverse = invert_rational(&gram).ok_or_else(|| NumberFieldError::Bug("trace form is singular".to_owned()))?;
    let beta = field.to_integral(&inverse.mul_vec(&traces)).ok_or_else(not_an_automorphism)?;
    if !is_root_of_poly(field, &beta) || permutation_of(table, &beta)? != permutation {
        return Err(not_an_automorphism());
    }
    return Ok(beta);
}

impl Automorphism {

    pub fn identity(field: &NumberField) -> Automorphism {
        Automorphism::Algebraic(field.to_integral(&field.theta()).unwrap_or_else(|| unreachable!("theta is integral")))
    }

    ///
    /// Returns `sigma(theta)` in integral basis coordinates.
    ///
    /// Fails with [`NumberFieldError::InvalidAutomorphism`] if the given data does not
    /// describe an automorphism of the field.
    ///
    pub fn to_algebraic(&self, field: &NumberField) -> Result<Vec<BigInt>> {
        match self {
            Automorphism::Algebraic(beta) => {
                check_algebraic(field, beta)?;
                return Ok(beta.clone());
            },
            Automorphism::Permutation(permutation) => {
                check_permutation(field.degree(), permutation)?;
                return run_at_precision(field.default_precision(), field.max_precision(), |precision| {
                    let table = field.embeddings(precision)?;
                    algebraic_from_permutation(field, &table, permutation)
                });
            }
        }
    }

    ///
    /// Returns the permutation `pi` of the roots with `tau_k(sigma(theta)) = r_pi(k)`.
    ///
    pub fn to_permutation(&self, field: &NumberField) -> Result<Vec<usize>> {
        match self {
            Automorphism::Permutation(permutation) => {
                check_permutation(field.degree(), permutation)?;
                // validates that the permutation is induced by an automorphism
                self.to_algebraic(field)?;
                return Ok(permutation.clone());
            },
            Automorphism::Algebraic(beta) => {
                check_algebraic(field, beta)?;
                return run_at_precision(field.default_precision(), field.max_precision(), |precision| {
                    let table = field.embeddings(precision)?;
                    Ok(permutation_of(&table, beta)?)
                });
            }
        }
    }
}

#[derive(Debug, Clone)]
struct GroupElement {
    algebraic: Vec<BigInt>,
    permutation: Vec<usize>,
    matrix: OwnedMatrix<BigInt>
}

///
/// The group of automorphisms of a number field, together with its multiplication table.
///
/// Elements are referred to by their index, and the identity always has index `0`.
/// If the field is Galois over `Q`, the group has exactly `[K : Q]` elements, otherwise
/// it is a proper subgroup of the Galois group of the normal closure.
///
#[derive(Debug, Clone)]
pub struct GaloisGroup {
    degree: usize,
    elements: Vec<GroupElement>,
    table: Vec<Vec<usize>>
}

impl GaloisGroup {

    ///
    /// Creates the group from the algebraic forms of its elements, where the first one
    /// must be the identity. The set is assumed to be closed under composition.
    ///
    fn from_algebraic(field: &NumberField, algebraic: Vec<Vec<BigInt>>) -> Result<GaloisGroup> {
        let matrices = algebraic.iter().map(|beta| substitution_matrix(field, beta)).collect::<Result<Vec<_>>>()?;
        let permutations = run_at_precision(field.default_precision(), field.max_precision(), |precision| {
            let table = field.embeddings(precision)?;
            algebraic.iter().map(|beta| permutation_of(&table, beta).map_err(Retry::from)).collect::<std::result::Result<Vec<_>, Retry>>()
        })?;
        let table = matrices.iter().map(|matrix| algebraic.iter().map(|beta| {
            let composed = matrix.mul_vec(beta);
            algebraic.iter().position(|x| *x == composed)
                .ok_or_else(|| NumberFieldError::Bug("automorphisms are not closed under composition".to_owned()))
        }).collect::<Result<Vec<_>>>()).collect::<Result<Vec<_>>>()?;
        let elements = algebraic.into_iter().zip(permutations).zip(matrices)
            .map(|((algebraic, permutation), matrix)| GroupElement { algebraic, permutation, matrix })
            .collect();
        return Ok(GaloisGroup { degree: field.degree(), elements, table });
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    ///
    /// Returns whether the field is Galois over `Q`, i.e. whether it has `[K : Q]` automorphisms.
    ///
    pub fn is_galois(&self) -> bool {
        self.elements.len() == self.degree
    }

    pub fn identity(&self) -> usize {
        0
    }

    pub fn automorphism(&self, i: usize) -> Automorphism {
        Automorphism::Algebraic(self.elements[i].algebraic.clone())
    }

    pub fn algebraic(&self, i: usize) -> &[BigInt] {
        &self.elements[i].algebraic
    }

    pub fn permutation(&self, i: usize) -> &[usize] {
        &self.elements[i].permutation
    }

    ///
    /// The matrix of the `i`-th automorphism w.r.t. the integral basis.
    ///
    pub fn substitution_matrix(&self, i: usize) -> &OwnedMatrix<BigInt> {
        &self.elements[i].matrix
    }

    ///
    /// Returns the index of `a o b`, i.e. first apply `b`, then `a`.
    ///
    pub fn compose(&self, a: usize, b: usize) -> usize {
        self.table[a][b]
    }

    pub fn inverse(&self, a: usize) -> usize {
        (0..self.len()).find(|b| self.table[a][*b] == 0).unwrap_or_else(|| unreachable!("finite group"))
    }

    ///
    /// The order of the `a`-th element in the group.
    ///
    pub fn order(&self, a: usize) -> usize {
        let mut current = a;
        let mut result = 1;
        while current != 0 {
            current = self.compose(a, current);
            result += 1;
        }
        return result;
    }

    ///
    /// Returns the index of the given automorphism, or `None` if it is not in the group.
    ///
    pub fn index_of(&self, field: &NumberField, automorphism: &Automorphism) -> Option<usize> {
        let beta = automorphism.to_algebraic(field).ok()?;
        self.elements.iter().position(|g| g.algebraic == beta)
    }

    pub fn apply_element(&self, i: usize, x: &[BigRational]) -> NfEl {
        map_element(&self.elements[i].matrix, x)
    }

    pub fn apply_integral(&self, i: usize, x: &[BigInt]) -> Vec<BigInt> {
        self.elements[i].matrix.mul_vec(x)
    }
}

///
/// Returns an upper bound on `log2 |b_i|` for the coordinates `b_i` of any automorphism image
/// `beta = sigma(theta)` w.r.t. the integral basis. Since `Tr(beta w_j) <= R sum_k |tau_k(w_j)|`
/// with `R = max_k |r_k|`, and `b = G^-1 (Tr(beta w_j))_j`, this follows from the entries of
/// the inverse trace form `G^-1`.
///
fn log2_coefficient_bound(field: &NumberField, table: &EmbeddingTable) -> Result<f64> {
    let n = field.degree();
    let RR = table.real_field();
    let CC = table.complex_field();
    let gram = field.trace_form().map(|x| BigRational::from_integer(x.clone()));
    let inverse = invert_rational(&gram).ok_or_else(|| NumberFieldError::Bug("trace form is singular".to_owned()))?;
    let root_bound = table.conjugates().iter().map(|r| RR.to_f64(&CC.abs(r))).fold(0., f64::max);
    let sums = (0..n).map(|j| table.conjugate_values_int(&unit_vector(n, j)).iter().map(|z| RR.to_f64(&CC.abs(z))).sum::<f64>()).collect::<Vec<_>>();
    let bound = (0..n).map(|i| (0..n).map(|j| inverse.at(i, j).to_f64().unwrap_or(f64::MAX).abs() * root_bound * sums[j]).sum::<f64>()).fold(1., f64::max);
    return Ok(bound.log2());
}

///
/// The scaling `log2 C` of the relation lattice that makes the relation of an automorphism
/// the shortest vector by a margin exceeding the LLL approximation factor.
///
fn relation_scale_bits(n: usize, log2_bound: f64) -> u64 {
    let n = n as f64;
    (n * (log2_bound.max(0.) + n / 2. + (n + 1.).log2() + RELATION_SAFETY_BITS)).ceil() as u64
}

///
/// Searches for `beta = sum_i b_i w_i` in the maximal order with `tau_0(beta) = target`, by
/// finding a short vector in the lattice spanned by the columns `(e_i, C tau_0(w_i))` and
/// `(e_n, -C target)`.
///
fn find_relation(field: &NumberField, table: &EmbeddingTable, target: &Complex<BigFloat>, scale_bits: u64) -> std::result::Result<Option<Vec<BigInt>>, Retry> {
    let n = field.degree();
    let RR = table.real_field();
    let values = table.basis_values(0);
    let use_imaginary = field.r1() == 0;
    let scale = RR.pow2(scale_bits as i64);
    let scaled = |x: &BigFloat| RR.round_to_integer(&RR.mul(x, &scale)).ok_or(NotEnoughPrecision);
    let rows = n + if use_imaginary { 3 } else { 2 };
    let mut cols = Vec::with_capacity(n + 1);
    for (i, value) in values.iter().enumerate() {
        let mut col = unit_vector(n + 1, i);
        col.push(scaled(&value.re)?);
        if use_imaginary {
            col.push(scaled(&value.im)?);
        }
        cols.push(col);
    }
    let mut col = unit_vector(n + 1, n);
    col.push(-scaled(&target.re)?);
    if use_imaginary {
        col.push(-scaled(&target.im)?);
    }
    cols.push(col);
    let delta = BigRational::new(BigInt::from(99), BigInt::from(100));
    let reduced = lll_lattice(&OwnedMatrix::from_cols(rows, cols), &delta)?;
    for col in reduced.cols() {
        if col[n].abs().is_one() {
            let beta = col[..n].iter().map(|c| c * &col[n]).collect::<Vec<_>>();
            if is_root_of_poly(field, &beta) {
                return Ok(Some(beta));
            }
        }
    }
    return Ok(None);
}

///
/// Adds all compositions of the given automorphisms, until the set is closed.
///
fn close_under_composition(field: &NumberField, elements: &mut Vec<Vec<BigInt>>) -> Result<()> {
    let mut checked = 0;
    while checked < elements.len() {
        let current = elements.len();
        let matrices = elements.iter().map(|beta| substitution_matrix(field, beta)).collect::<Result<Vec<_>>>()?;
        for a in 0..current {
            for b in 0..current {
                if a < checked && b < checked {
                    continue;
                }
                let composed = matrices[a].mul_vec(&elements[b]);
                if !elements.contains(&composed) {
                    if elements.len() >= field.degree() {
                        return Err(NumberFieldError::Bug("found more than [K : Q] automorphisms".to_owned()));
                    }
                    event!(Level::TRACE, "added composition");
                    elements.push(composed);
                }
            }
        }
        checked = current;
    }
    return Ok(());
}

///
/// Computes all automorphisms of the given number field.
///
/// # Algorithm
///
/// An automorphism is determined by the image `beta` of `theta`, which is a root of `T` in
/// `K`, thus `tau_0(beta) = r_j` for some root `r_j` of `T` and the first embedding `tau_0`.
/// For each root, we search for an integer relation between `r_j` and the values `tau_0(w_i)`
/// of the integral basis, using exact LLL on a scaled integer lattice. The scaling and the
/// precision are derived from an a-priori bound on the coordinates of `beta`.
///
/// Every candidate is verified exactly by checking `T(beta) = 0` in `K`, so the result never
/// contains wrong automorphisms. Finally, the set is closed under composition, and the
/// permutations and the multiplication table are computed.
///
pub fn galois_group(field: &NumberField) -> Result<GaloisGroup> {
    let n = field.degree();
    span!(Level::INFO, "galois_group", n = n).in_scope(|| {
        let identity = field.to_integral(&field.theta()).unwrap_or_else(|| unreachable!("theta is integral"));
        let table = field.embeddings(field.default_precision())?;
        let log2_bound = log2_coefficient_bound(field, &table)?;
        let scale_bits = relation_scale_bits(n, log2_bound);
        let CC = table.complex_field();
        let log2_values = table.basis_values(0).iter().map(|z| CC.real_field().to_f64(&CC.abs(z)).log2()).fold(0., f64::max);
        let start = scale_bits + log2_values.ceil() as u64 + RELATION_EXTRA_PRECISION;
        event!(Level::DEBUG, scale_bits = scale_bits, precision = start, "relation lattice");
        let mut found = run_at_precision(start, field.max_precision().max(start), |precision| {
            let table = field.embeddings(precision)?;
            let roots = table.conjugates();
            // a real embedding maps theta only to real roots
            let targets = if field.r1() > 0 { &roots[..field.r1()] } else { &roots[..] };
            let mut result = vec![identity.clone()];
            for target in targets {
                if let Some(beta) = find_relation(field, &table, target, scale_bits)? {
                    if !result.contains(&beta) {
                        result.push(beta);
                    }
                }
            }
            Ok(result)
        })?;
        close_under_composition(field, &mut found)?;
        let result = GaloisGroup::from_algebraic(field, found)?;
        event!(Level::INFO, order = result.len(), galois = result.is_galois(), "galois_group");
        return Ok(result);
    })
}

#[cfg(test)]
use crate::tracing::LogAlgorithmSubscriber;
#[cfg(test)]
use crate::rings::extension::number_field::{OrderOptions, OrderSource};
#[cfg(test)]
use crate::rings::poly::dense_poly::QPoly;

#[cfg(test)]
pub(crate) fn test_field(coeffs: &[i64]) -> NumberField {
    NumberField::build(OrderSource::Polynomial(QPoly::from_ints(coeffs)), &OrderOptions::default()).unwrap()
}

#[cfg(test)]
pub(crate) fn ints(values: &[i64]) -> Vec<BigInt> {
    values.iter().map(|x| BigInt::from(*x)).collect()
}

#[test]
fn test_galois_group_quadratic() {
    LogAlgorithmSubscriber::init_test();
    let K = test_field(&[1, 0, 1]);
    let G = galois_group(&K).unwrap();
    assert_eq!(2, G.len());
    assert!(G.is_galois());
    assert_eq!(ints(&[0, 1]), G.algebraic(0));
    assert_eq!(ints(&[0, -1]), G.algebraic(1));
    assert_eq!(&[0, 1], G.permutation(0));
    assert_eq!(&[1, 0], G.permutation(1));
    assert_eq!(0, G.compose(1, 1));
    assert_eq!(1, G.inverse(1));
    assert_eq!(2, G.order(1));
}

#[test]
fn test_galois_group_cyclotomic() {
    LogAlgorithmSubscriber::init_test();
    let K = test_field(&[1, 1, 1, 1, 1]);
    let G = galois_group(&K).unwrap();
    assert_eq!(4, G.len());
    let mut algebraic = (0..4).map(|i| G.algebraic(i).to_vec()).collect::<Vec<_>>();
    algebraic.sort();
    // theta -> theta^k for k = 1, 2, 3, 4
    let mut expected = vec![ints(&[0, 1, 0, 0]), ints(&[0, 0, 1, 0]), ints(&[0, 0, 0, 1]), ints(&[-1, -1, -1, -1])];
    expected.sort();
    assert_eq!(expected, algebraic);
    // cyclic of order 4
    assert_eq!(2, (0..4).filter(|i| G.order(*i) == 4).count());
    for a in 0..4 {
        assert_eq!(a, G.compose(a, 0));
        assert_eq!(a, G.compose(0, a));
        assert_eq!(0, G.compose(a, G.inverse(a)));
    }
}

#[test]
fn test_galois_group_biquadratic() {
    LogAlgorithmSubscriber::init_test();
    // Q(sqrt(2), sqrt(3)), with a maximal order different from Z[theta]
    let K = test_field(&[1, 0, -10, 0, 1]);
    let G = galois_group(&K).unwrap();
    assert_eq!(4, G.len());
    for a in 0..4 {
        assert_eq!(0, G.compose(a, a));
        for b in 0..4 {
            assert_eq!(G.compose(a, b), G.compose(b, a));
        }
    }
}

#[test]
fn test_galois_group_cyclic_cubic() {
    LogAlgorithmSubscriber::init_test();
    let K = test_field(&[-1, -3, 0, 1]);
    let G = galois_group(&K).unwrap();
    assert_eq!(3, G.len());
    assert_eq!(3, G.order(1));
    let x = K.from_int(&BigInt::from(5));
    assert_eq!(x, G.apply_element(1, &x));
    // the trace is invariant
    let theta = K.theta();
    assert_eq!(K.trace(&theta), K.trace(&G.apply_element(2, &theta)));
}

#[test]
fn test_galois_group_not_galois() {
    LogAlgorithmSubscriber::init_test();
    let K = test_field(&[-2, 0, 0, 1]);
    let G = galois_group(&K).unwrap();
    assert_eq!(1, G.len());
    assert!(!G.is_galois());
}

#[test]
fn test_automorphism_conversion() {
    LogAlgorithmSubscriber::init_test();
    let K = test_field(&[1, 1, 1, 1, 1]);
    let G = galois_group(&K).unwrap();
    for i in 0..G.len() {
        let permutation = G.automorphism(i).to_permutation(&K).unwrap();
        assert_eq!(G.permutation(i), &permutation[..]);
        assert_eq!(G.algebraic(i), &Automorphism::Permutation(permutation).to_algebraic(&K).unwrap()[..]);
        assert_eq!(Some(i), G.index_of(&K, &G.automorphism(i)));
    }
    assert_eq!(Some(0), G.index_of(&K, &Automorphism::identity(&K)));
}

#[test]
fn test_invalid_automorphism() {
    LogAlgorithmSubscriber::init_test();
    let K = test_field(&[1, 0, 1]);
    assert!(matches!(Automorphism::Permutation(vec![0, 0]).to_algebraic(&K), Err(NumberFieldError::InvalidAutomorphism(_))));
    assert!(matches!(Automorphism::Algebraic(ints(&[1, 1])).to_permutation(&K), Err(NumberFieldError::InvalidAutomorphism(_))));
    assert_eq!(Err(NumberFieldError::DimensionMismatch { expected: 2, actual: 3 }), Automorphism::Algebraic(ints(&[0, 1, 0])).to_algebraic(&K));

    let L = test_field(&[-2, 0, 0, 1]);
    // maps the real root to a complex one
    assert!(matches!(Automorphism::Permutation(vec![1, 0, 2]).to_algebraic(&L), Err(NumberFieldError::InvalidAutomorphism(_))));
}
