use std::cell::{OnceCell, RefCell};
use std::rc::Rc;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use tracing::{event, span, Level};

use crate::algorithms::int_factor::{factor, Factorization};
use crate::algorithms::linsolve::solve_rational;
use crate::algorithms::poly_factor::is_irreducible;
use crate::algorithms::resultant::integer_discriminant;
use crate::algorithms::round2::round2;
use crate::algorithms::sturm::count_real_roots;
use crate::error::{DegenerateKind, NumberFieldError, Result};
use crate::integer::{common_denominator, valuation};
use crate::matrix::OwnedMatrix;
use crate::rings::approx_real::run_at_precision;
use crate::rings::extension::embeddings::EmbeddingTable;
use crate::rings::extension::order::{integral, Order};
use crate::rings::poly::dense_poly::QPoly;

///
/// An element of a number field, given by its rational coordinates w.r.t.
/// the integral basis of the field.
///
pub type NfEl = Vec<BigRational>;

///
/// The input from which a [`NumberField`] is built.
///
#[derive(Debug, Clone, PartialEq)]
pub enum OrderSource {
    /// Compute the maximal order of the field defined by the given polynomial
    Polynomial(QPoly),
    /// Use the given basis as integral basis. The basis elements are polynomials in
    /// a root of `poly`, and the basis is only checked to generate an order containing
    /// the equation order, its maximality is trusted.
    WithBasis { poly: QPoly, basis: Vec<QPoly> }
}

///
/// Parameters for [`NumberField::build()`].
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderOptions {
    /// Whether a non-monic or non-integral polynomial may be transformed into a monic
    /// integral one by rescaling its root
    pub allow_rescale: bool,
    /// Primes at which the equation order is known to be maximal, Round 2 is skipped for them
    pub certified_primes: Vec<BigInt>,
    /// If set, the discriminant is only factored by trial division up to this bound and
    /// a bounded amount of further work; the result might then not be the maximal order
    pub factor_limit: Option<u64>,
    /// The default working precision (in bits) for numerical computations
    pub precision: u64,
    /// Numerical computations fail with [`NumberFieldError::PrecisionExhausted`] if they
    /// do not succeed at this precision
    pub max_precision: u64
}

impl Default for OrderOptions {

    fn default() -> Self {
        OrderOptions {
            allow_rescale: true,
            certified_primes: Vec::new(),
            factor_limit: None,
            precision: 128,
            max_precision: 1 << 14
        }
    }
}

///
/// A number field `K = Q[X]/(T)`, together with its maximal order, given by an
/// integral basis.
///
/// The defining polynomial `T` is monic and integral. If the field was created from
/// a non-monic polynomial `f`, then `T` is obtained by rescaling, i.e. the root `theta`
/// of `T` and the root `theta_in` of `f` satisfy `theta = s * theta_in`, where `s`
/// is given by [`NumberField::rescale_factor()`].
///
/// Elements are represented as [`NfEl`], i.e. by their rational coordinates w.r.t.
/// the integral basis. Data that is not needed by every computation (signature,
/// traces, embeddings) is computed on first use and cached, hence `NumberField` is
/// not `Sync`.
///
/// # Example
/// ```rust
/// # use feanor_number_field::rings::extension::number_field::*;
/// # use feanor_number_field::rings::poly::dense_poly::QPoly;
/// # use num_bigint::BigInt;
/// let K = NumberField::build(OrderSource::Polynomial(QPoly::from_ints(&[-5, 0, 1])), &OrderOptions::default()).unwrap();
/// assert_eq!(&BigInt::from(20), K.poly_discriminant());
/// assert_eq!(&BigInt::from(5), K.discriminant());
/// assert_eq!(&BigInt::from(2), K.index());
/// ```
///
#[derive(Debug, Clone)]
pub struct NumberField {
    input_poly: QPoly,
    rescale_factor: BigRational,
    order: Order,
    poly_discriminant: BigInt,
    discriminant: BigInt,
    index: BigInt,
    discriminant_factorization: Factorization,
    certified_primes: Vec<BigInt>,
    maximality_certified: bool,
    precision: u64,
    max_precision: u64,
    r1: OnceCell<usize>,
    power_sums: OnceCell<Vec<BigRational>>,
    trace_form: OnceCell<OwnedMatrix<BigInt>>,
    embeddings: RefCell<Option<Rc<EmbeddingTable>>>
}

///
/// Returns the smallest `L` such that `L^(n - i) a_i / a_n` is integral for all `i`.
///
fn primitive_to_monic(primitive: &[BigInt]) -> BigInt {
    let n = primitive.len() - 1;
    let mut result = BigInt::one();
    for (p, e) in factor(&primitive[n], None).primes {
        let mut k = 0;
        for i in 0..n {
            if primitive[i].is_zero() {
                continue;
            }
            let v = valuation(&primitive[i], &p).0;
            if e > v {
                k = k.max((e - v).div_ceil(n - i));
            }
        }
        result *= p.pow(k as u32);
    }
    return result;
}

///
/// Returns the largest `d` such that `d^(n - i)` divides `t_i` for all `i < n`.
///
fn normalize_integral(coeffs: &[BigInt]) -> BigInt {
    let n = coeffs.len() - 1;
    let g = coeffs[..n].iter().fold(BigInt::zero(), |acc, c| acc.gcd(c));
    if g.is_zero() {
        return BigInt::one();
    }
    let mut result = BigInt::one();
    for (p, _) in factor(&g, None).primes {
        let k = (0..n).filter(|i| !coeffs[*i].is_zero()).map(|i| valuation(&coeffs[i], &p).0 / (n - i)).min().unwrap_or(0);
        result *= p.pow(k as u32);
    }
    return result;
}

///
/// Transforms the given polynomial into a monic integral one `T`, by replacing
/// its root `theta_in` by `s * theta_in`. Returns `(T, s)`.
///
fn monic_integral(f: &QPoly, allow_rescale: bool) -> Result<(QPoly, BigRational)> {
    if f.is_monic() && f.is_integral() {
        return Ok((f.clone(), BigRational::one()));
    }
    if !allow_rescale {
        return Err(NumberFieldError::NonMonicInput);
    }
    let (_, primitive) = f.content_and_primitive();
    let n = primitive.len() - 1;
    let L = primitive_to_monic(&primitive);
    let mut coeffs = (0..n).map(|i| &primitive[i] * L.pow((n - i) as u32) / &primitive[n]).collect::<Vec<_>>();
    coeffs.push(BigInt::one());
    let d = if n > 1 { normalize_integral(&coeffs) } else { BigInt::one() };
    for i in 0..n {
        coeffs[i] = &coeffs[i] / d.pow((n - i) as u32);
    }
    let scale = BigRational::new(L, d);
    event!(Level::DEBUG, scale = %scale, "rescaled defining polynomial");
    return Ok((QPoly::from_bigints(coeffs), scale));
}

///
/// Factors `dK = dT / index^2`, using the factorization of `dT`.
///
fn factor_field_discriminant(dK: &BigInt, poly_discriminant_factorization: &Factorization) -> Factorization {
    let mut rest = dK.abs();
    let mut primes = Vec::new();
    for (p, _) in &poly_discriminant_factorization.primes {
        let (v, remaining) = valuation(&rest, p);
        if v > 0 {
            primes.push((p.clone(), v));
        }
        rest = remaining;
    }
    return Factorization { primes, cofactor: rest };
}

impl NumberField {

    ///
    /// Creates the number field defined by the given polynomial, and computes its
    /// maximal order (or uses the supplied integral basis).
    ///
    /// # Algorithm
    ///
    /// The polynomial is first made monic and integral (if allowed), and checked to be
    /// irreducible. Then the discriminant `dT` of the equation order is factored, and for
    /// each prime `p` with `p^2 | dT`, the order is enlarged to a `p`-maximal one using
    /// [`round2()`]. Finally, the basis is brought into Hermite normal form, which makes it
    /// triangular w.r.t. the power basis, with `basis[0] = 1`.
    ///
    pub fn build(source: OrderSource, options: &OrderOptions) -> Result<NumberField> {
        let (input_poly, supplied_basis) = match source {
            OrderSource::Polynomial(poly) => (poly, None),
            OrderSource::WithBasis { poly, basis } => (poly, Some(basis))
        };
        span!(Level::INFO, "build_number_field", degree = input_poly.degree().unwrap_or(0)).in_scope(|| {
            let n = match input_poly.degree() {
                None | Some(0) => return Err(NumberFieldError::ReducibleOrSingularInput(DegenerateKind::ZeroDegree)),
                Some(n) => n
            };
            let (T, rescale_factor) = monic_integral(&input_poly, options.allow_rescale)?;
            if !T.is_squarefree() {
                return Err(NumberFieldError::ReducibleOrSingularInput(DegenerateKind::NotSquarefree));
            }
            if !is_irreducible(&T) {
                return Err(NumberFieldError::ReducibleOrSingularInput(DegenerateKind::Reducible));
            }
            let poly_discriminant = integer_discriminant(&T);
            let dT_factorization = factor(&poly_discriminant, options.factor_limit);

            let (order, maximality_certified) = match supplied_basis {
                None => {
                    let mut order = Order::equation_order(T.clone());
                    for (p, e) in &dT_factorization.primes {
                        if *e >= 2 && !options.certified_primes.contains(p) {
                            order = round2(&order, p)?;
                        }
                    }
                    (order.hnf_normalized(), dT_factorization.is_complete())
                },
                Some(basis) => {
                    if basis.len() != n {
                        return Err(NumberFieldError::DimensionMismatch { expected: n, actual: basis.len() });
                    }
                    let inverse_scale = rescale_factor.recip();
                    let basis = basis.iter().map(|w| w.scale_variable(&inverse_scale)).collect();
                    let order = Order::new(T.clone(), basis).map_err(NumberFieldError::InvalidBasis)?;
                    if !(0..n).all(|i| order.contains(&QPoly::monomial(BigRational::one(), i))) {
                        return Err(NumberFieldError::InvalidBasis("basis does not generate a module containing the equation order".to_owned()));
                    }
                    (order.hnf_normalized(), true)
                }
            };
            let index = order.index().to_integer();
            let discriminant = &poly_discriminant / (&index * &index);
            let discriminant_factorization = factor_field_discriminant(&discriminant, &dT_factorization);
            let certified_primes = dT_factorization.primes.iter().map(|(p, _)| p.clone()).collect();
            event!(Level::INFO, index = %index, discriminant = %discriminant, "maximal_order");
            Ok(NumberField {
                input_poly,
                rescale_factor,
                order,
                poly_discriminant,
                discriminant,
                index,
                discriminant_factorization,
                certified_primes,
                maximality_certified,
                precision: options.precision,
                max_precision: options.max_precision.max(options.precision),
                r1: OnceCell::new(),
                power_sums: OnceCell::new(),
                trace_form: OnceCell::new(),
                embeddings: RefCell::new(None)
            })
        })
    }

    ///
    /// Creates the same field, but defined by the given polynomial, which must be the
    /// minimal polynomial of the (monic integral) element `generator`. The maximal order
    /// is reused, thus no Round 2 is necessary.
    ///
    pub fn rebase(&self, poly: &QPoly, generator: &NfEl) -> Result<NumberField> {
        let n = self.degree();
        if !(poly.is_monic() && poly.is_integral()) || poly.degree() != Some(n) {
            return Err(NumberFieldError::Bug("new defining polynomial must be monic integral of the same degree".to_owned()));
        }
        let Some(basis) = (0..n).map(|i| self.express_in(generator, &self.basis_vector(i))).collect::<Option<Vec<_>>>() else {
            return Err(NumberFieldError::Bug("new generator is not primitive".to_owned()));
        };
        let order = Order::new(poly.clone(), basis)
            .map_err(|e| NumberFieldError::Bug(format!("maximal order changed under rebasing: {}", e)))?
            .hnf_normalized();
        let poly_discriminant = integer_discriminant(poly);
        let index = order.index();
        if !index.is_integer() || BigRational::from_integer(poly_discriminant.clone()) != BigRational::from_integer(self.discriminant.clone()) * &index * &index {
            return Err(NumberFieldError::Bug("discriminant changed under rebasing".to_owned()));
        }
        let r1 = OnceCell::new();
        if let Some(value) = self.r1.get() {
            _ = r1.set(*value);
        }
        return Ok(NumberField {
            input_poly: poly.clone(),
            rescale_factor: BigRational::one(),
            order,
            poly_discriminant,
            discriminant: self.discriminant.clone(),
            index: index.to_integer(),
            discriminant_factorization: self.discriminant_factorization.clone(),
            certified_primes: self.certified_primes.clone(),
            maximality_certified: self.maximality_certified,
            precision: self.precision,
            max_precision: self.max_precision,
            r1,
            power_sums: OnceCell::new(),
            trace_form: OnceCell::new(),
            embeddings: RefCell::new(None)
        });
    }

    pub fn degree(&self) -> usize {
        self.order.degree()
    }

    ///
    /// The monic integral defining polynomial `T`.
    ///
    pub fn poly(&self) -> &QPoly {
        self.order.modulus()
    }

    ///
    /// The polynomial the field was created from.
    ///
    pub fn input_poly(&self) -> &QPoly {
        &self.input_poly
    }

    ///
    /// The factor `s` such that `theta = s * theta_in` for the root `theta` of [`NumberField::poly()`]
    /// and the root `theta_in` of [`NumberField::input_poly()`].
    ///
    pub fn rescale_factor(&self) -> &BigRational {
        &self.rescale_factor
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    ///
    /// The integral basis, as polynomials in the root of [`NumberField::poly()`].
    ///
    pub fn basis(&self) -> &[QPoly] {
        self.order.basis()
    }

    ///
    /// For each basis element, the smallest positive integer `d` such that `d w_i` has
    /// integral coefficients w.r.t. the power basis.
    ///
    pub fn basis_denominators(&self) -> Vec<BigInt> {
        self.basis().iter().map(|w| common_denominator(w.coeffs().iter())).collect()
    }

    ///
    /// The discriminant `dT` of the defining polynomial.
    ///
    pub fn poly_discriminant(&self) -> &BigInt {
        &self.poly_discriminant
    }

    ///
    /// The discriminant `dK` of the field, i.e. of the maximal order.
    ///
    pub fn discriminant(&self) -> &BigInt {
        &self.discriminant
    }

    ///
    /// The index `[O_K : Z[theta]]`, which satisfies `dT = dK index^2`.
    ///
    pub fn index(&self) -> &BigInt {
        &self.index
    }

    ///
    /// The (possibly partial) factorization of `|dK|`.
    ///
    pub fn discriminant_factorization(&self) -> &Factorization {
        &self.discriminant_factorization
    }

    ///
    /// The primes dividing `dK` that were found when factoring the discriminant.
    ///
    pub fn ramified_primes(&self) -> Vec<BigInt> {
        self.discriminant_factorization.primes.iter().map(|(p, _)| p.clone()).collect()
    }

    ///
    /// The primes at which the order is known to be maximal. If the discriminant
    /// was completely factored, this includes all primes dividing it. Otherwise, the
    /// primes dividing the unfactored cofactor of the discriminant are not included.
    ///
    pub fn certified_primes(&self) -> &[BigInt] {
        &self.certified_primes
    }

    ///
    /// Whether the computed order is known to be the maximal order. This is only `false`
    /// if a `factor_limit` was given and the discriminant could not be completely factored.
    ///
    pub fn is_maximality_certified(&self) -> bool {
        self.maximality_certified
    }

    pub fn default_precision(&self) -> u64 {
        self.precision
    }

    pub fn max_precision(&self) -> u64 {
        self.max_precision
    }

    ///
    /// The number of real embeddings.
    ///
    pub fn r1(&self) -> usize {
        *self.r1.get_or_init(|| count_real_roots(self.poly()))
    }

    ///
    /// The number of pairs of complex conjugate embeddings.
    ///
    pub fn r2(&self) -> usize {
        (self.degree() - self.r1()) / 2
    }

    pub fn signature(&self) -> (usize, usize) {
        (self.r1(), self.r2())
    }

    pub fn is_totally_real(&self) -> bool {
        self.r1() == self.degree()
    }

    pub fn zero(&self) -> NfEl {
        vec![BigRational::zero(); self.degree()]
    }

    pub fn one(&self) -> NfEl {
        self.from_poly(&QPoly::one())
    }

    pub fn basis_vector(&self, i: usize) -> NfEl {
        let mut result = self.zero();
        result[i] = BigRational::one();
        return result;
    }

    pub fn from_int(&self, x: &BigInt) -> NfEl {
        self.from_poly(&QPoly::constant(BigRational::from_integer(x.clone())))
    }

    ///
    /// The root `theta` of the defining polynomial `T`.
    ///
    pub fn theta(&self) -> NfEl {
        self.from_poly(&QPoly::indeterminate())
    }

    ///
    /// The root `theta_in = theta / s` of the input polynomial.
    ///
    pub fn input_root(&self) -> NfEl {
        self.from_poly(&QPoly::monomial(self.rescale_factor.recip(), 1))
    }

    ///
    /// Returns the element represented by the polynomial `f(theta)`, where `theta` is
    /// the root of [`NumberField::poly()`].
    ///
    pub fn from_poly(&self, f: &QPoly) -> NfEl {
        self.order.coordinates(f)
    }

    ///
    /// Returns the element represented by the polynomial `f(theta_in)`, where `theta_in`
    /// is the root of [`NumberField::input_poly()`].
    ///
    pub fn from_input_poly(&self, f: &QPoly) -> NfEl {
        self.from_poly(&f.scale_variable(&self.rescale_factor.recip()))
    }

    ///
    /// Returns the polynomial `f` of degree `< n` with `x = f(theta)`.
    ///
    pub fn to_poly(&self, x: &[BigRational]) -> QPoly {
        self.order.to_poly(x)
    }

    ///
    /// Returns the polynomial `f` of degree `< n` with `x = f(theta_in)`.
    ///
    pub fn to_input_poly(&self, x: &[BigRational]) -> QPoly {
        self.to_poly(x).scale_variable(&self.rescale_factor)
    }

    ///
    /// Converts coordinates w.r.t. the power basis `1, theta, ..., theta^(n-1)` into
    /// coordinates w.r.t. the integral basis.
    ///
    pub fn power_to_basis(&self, coeffs: &[BigRational]) -> NfEl {
        self.from_poly(&QPoly::from_coeffs(coeffs.to_vec()))
    }

    pub fn add(&self, lhs: &[BigRational], rhs: &[BigRational]) -> NfEl {
        lhs.iter().zip(rhs.iter()).map(|(a, b)| a + b).collect()
    }

    pub fn sub(&self, lhs: &[BigRational], rhs: &[BigRational]) -> NfEl {
        lhs.iter().zip(rhs.iter()).map(|(a, b)| a - b).collect()
    }

    pub fn negate(&self, x: &[BigRational]) -> NfEl {
        x.iter().map(|a| -a).collect()
    }

    pub fn scale(&self, x: &[BigRational], factor: &BigRational) -> NfEl {
        x.iter().map(|a| a * factor).collect()
    }

    pub fn mul(&self, lhs: &[BigRational], rhs: &[BigRational]) -> NfEl {
        self.order.mul(lhs, rhs)
    }

    pub fn pow(&self, x: &[BigRational], e: u64) -> NfEl {
        self.from_poly(&self.to_poly(x).pow_mod(e, self.poly()))
    }

    ///
    /// Returns the inverse of `x`, or `None` if `x` is zero.
    ///
    pub fn invert(&self, x: &[BigRational]) -> Option<NfEl> {
        self.to_poly(x).invert_mod(self.poly()).map(|f| self.from_poly(&f))
    }

    pub fn is_zero(&self, x: &[BigRational]) -> bool {
        x.iter().all(|c| c.is_zero())
    }

    ///
    /// Whether `x` is in the maximal order.
    ///
    pub fn is_integral(&self, x: &[BigRational]) -> bool {
        x.iter().all(|c| c.is_integer())
    }

    ///
    /// Returns the integer coordinates of `x`, if `x` is integral.
    ///
    pub fn to_integral(&self, x: &[BigRational]) -> Option<Vec<BigInt>> {
        integral(x.to_vec())
    }

    pub fn from_integral(&self, x: &[BigInt]) -> NfEl {
        x.iter().map(|c| BigRational::from_integer(c.clone())).collect()
    }

    ///
    /// The matrix of multiplication by `x`, w.r.t. the integral basis.
    ///
    pub fn mul_matrix(&self, x: &[BigRational]) -> OwnedMatrix<BigRational> {
        self.order.mul_matrix(x)
    }

    fn power_sums(&self) -> &[BigRational] {
        self.power_sums.get_or_init(|| self.poly().newton_power_sums(2 * self.degree() + 1))
    }

    fn trace_of_poly(&self, f: &QPoly) -> BigRational {
        let sums = self.power_sums();
        f.rem(self.poly()).coeffs().iter().enumerate().map(|(k, c)| c * &sums[k]).fold(BigRational::zero(), |a, b| a + b)
    }

    pub fn trace(&self, x: &[BigRational]) -> BigRational {
        self.trace_of_poly(&self.to_poly(x))
    }

    ///
    /// The characteristic polynomial of multiplication by `x`, computed exactly
    /// from the traces of the powers of `x`.
    ///
    pub fn charpoly(&self, x: &[BigRational]) -> QPoly {
        let n = self.degree();
        let f = self.to_poly(x);
        let mut sums = Vec::with_capacity(n + 1);
        sums.push(BigRational::from_integer(BigInt::from(n)));
        let mut power = QPoly::one();
        for _ in 0..n {
            power = power.mul_mod(&f, self.poly());
            sums.push(self.trace_of_poly(&power));
        }
        return QPoly::from_power_sums(&sums);
    }

    ///
    /// The minimal polynomial of `x` over `Q`, which is monic.
    ///
    pub fn minpoly(&self, x: &[BigRational]) -> QPoly {
        self.charpoly(x).squarefree_part()
    }

    pub fn norm(&self, x: &[BigRational]) -> BigRational {
        let constant = self.charpoly(x).coeff(0);
        if self.degree() % 2 == 0 {
            constant
        } else {
            -constant
        }
    }

    ///
    /// Whether `Q(x) = K`.
    ///
    pub fn is_primitive(&self, x: &[BigRational]) -> bool {
        self.charpoly(x).is_squarefree()
    }

    ///
    /// The Gram matrix `(Tr(w_i w_j))_ij` of the trace form w.r.t. the integral basis.
    /// It is integral and has determinant `dK`.
    ///
    pub fn trace_form(&self) -> &OwnedMatrix<BigInt> {
        self.trace_form.get_or_init(|| {
            let n = self.degree();
            let basis = self.basis();
            let mut result = OwnedMatrix::zero(n, n);
            for i in 0..n {
                for j in i..n {
                    let value = self.trace_of_poly(&(&basis[i] * &basis[j])).to_integer();
                    *result.at_mut(j, i) = value.clone();
                    *result.at_mut(i, j) = value;
                }
            }
            result
        })
    }

    ///
    /// Returns the polynomial `f` of degree `< n` with `x = f(alpha)`, or `None` if
    /// `alpha` does not generate the field.
    ///
    pub fn express_in(&self, alpha: &[BigRational], x: &[BigRational]) -> Option<QPoly> {
        let n = self.degree();
        let alpha = self.to_poly(alpha);
        let mut cols = Vec::with_capacity(n);
        let mut power = QPoly::one();
        for _ in 0..n {
            cols.push((0..n).map(|i| power.coeff(i)).collect::<Vec<_>>());
            power = power.mul_mod(&alpha, self.poly());
        }
        let target = self.to_poly(x);
        let rhs = (0..n).map(|i| target.coeff(i)).collect::<Vec<_>>();
        solve_rational(&OwnedMatrix::from_cols(n, cols), &rhs).unique().map(QPoly::from_coeffs)
    }

    ///
    /// Returns approximations to the embeddings of the field, with at least the given
    /// precision. The result is cached, and only recomputed if a higher precision is requested.
    ///
    pub fn embeddings(&self, precision: u64) -> Result<Rc<EmbeddingTable>> {
        let cached = self.embeddings.borrow().clone();
        if let Some(table) = cached {
            if table.precision() >= precision {
                return Ok(table);
            }
        }
        let r1 = self.r1();
        let table = run_at_precision(precision, self.max_precision.max(precision), |current| {
            Ok(EmbeddingTable::compute(self.poly(), self.basis(), r1, current)?)
        })?;
        let table = Rc::new(table);
        *self.embeddings.borrow_mut() = Some(table.clone());
        return Ok(table);
    }
}

#[cfg(test)]
use crate::tracing::LogAlgorithmSubscriber;
#[cfg(test)]
use crate::rings::approx_real::ApproxRealField;

#[cfg(test)]
fn build_default(coeffs: &[i64]) -> Result<NumberField> {
    NumberField::build(OrderSource::Polynomial(QPoly::from_ints(coeffs)), &OrderOptions::default())
}

#[cfg(test)]
fn rat(num: i64, den: i64) -> BigRational {
    BigRational::new(BigInt::from(num), BigInt::from(den))
}

#[test]
fn test_build_quadratic() {
    LogAlgorithmSubscriber::init_test();
    let K = build_default(&[-5, 0, 1]).unwrap();
    assert_eq!(&BigInt::from(20), K.poly_discriminant());
    assert_eq!(&BigInt::from(5), K.discriminant());
    assert_eq!(&BigInt::from(2), K.index());
    assert_eq!(&[QPoly::one(), QPoly::from_coeffs(vec![rat(1, 2), rat(1, 2)])][..], K.basis());
    assert_eq!(vec![BigInt::from(1), BigInt::from(2)], K.basis_denominators());
    assert_eq!(vec![BigInt::from(5)], K.ramified_primes());
    assert!(K.is_maximality_certified());
    assert_eq!((2, 0), K.signature());

    let K = build_default(&[1, 0, 1]).unwrap();
    assert_eq!(&BigInt::from(-4), K.discriminant());
    assert_eq!((0, 1), K.signature());
}

#[test]
fn test_build_cubic() {
    LogAlgorithmSubscriber::init_test();
    let K = build_default(&[-12, 0, 0, 1]).unwrap();
    assert_eq!(&BigInt::from(-3888), K.poly_discriminant());
    assert_eq!(&BigInt::from(-972), K.discriminant());
    assert_eq!(&BigInt::from(2), K.index());
    assert_eq!(1, K.r1());
    let factorization = K.discriminant_factorization();
    assert!(factorization.is_complete());
    assert_eq!(vec![(BigInt::from(2), 2), (BigInt::from(3), 5)], factorization.primes);
    for (i, w) in K.basis().iter().enumerate() {
        assert_eq!(Some(i), w.degree());
    }
}

#[test]
fn test_build_rescaled() {
    LogAlgorithmSubscriber::init_test();
    // 2x^2 - 1 has root 1/sqrt(2), rescaled to sqrt(2)
    let K = NumberField::build(OrderSource::Polynomial(QPoly::from_ints(&[-1, 0, 2])), &OrderOptions::default()).unwrap();
    assert_eq!(&QPoly::from_ints(&[-2, 0, 1]), K.poly());
    assert_eq!(&rat(2, 1), K.rescale_factor());
    assert_eq!(&BigInt::from(8), K.discriminant());
    let root = K.input_root();
    assert_eq!(QPoly::from_ints(&[0, 1]), K.to_input_poly(&root));
    assert_eq!(K.from_int(&BigInt::from(1)), K.mul(&K.scale(&root, &rat(2, 1)), &root));

    // 3x^2 - 2/3 has root sqrt(2)/3
    let K = NumberField::build(OrderSource::Polynomial(QPoly::from_coeffs(vec![rat(-2, 3), rat(0, 1), rat(3, 1)])), &OrderOptions::default()).unwrap();
    assert_eq!(&QPoly::from_ints(&[-2, 0, 1]), K.poly());
    assert_eq!(&rat(3, 1), K.rescale_factor());

    assert_eq!(
        Err(NumberFieldError::NonMonicInput),
        NumberField::build(OrderSource::Polynomial(QPoly::from_ints(&[-1, 0, 2])), &OrderOptions { allow_rescale: false, ..OrderOptions::default() }).map(|_| ())
    );
}

#[test]
fn test_build_degenerate() {
    LogAlgorithmSubscriber::init_test();
    assert_eq!(Err(NumberFieldError::ReducibleOrSingularInput(DegenerateKind::ZeroDegree)), build_default(&[3]).map(|_| ()));
    assert_eq!(Err(NumberFieldError::ReducibleOrSingularInput(DegenerateKind::NotSquarefree)), build_default(&[0, 0, 1]).map(|_| ()));
    assert_eq!(Err(NumberFieldError::ReducibleOrSingularInput(DegenerateKind::Reducible)), build_default(&[-1, 0, 1]).map(|_| ()));
    assert_eq!(Err(NumberFieldError::ReducibleOrSingularInput(DegenerateKind::Reducible)), build_default(&[2, 0, -3, 0, 1]).map(|_| ()));
}

#[test]
fn test_build_with_basis() {
    LogAlgorithmSubscriber::init_test();
    let poly = QPoly::from_ints(&[-5, 0, 1]);
    let K = NumberField::build(OrderSource::WithBasis { poly: poly.clone(), basis: vec![QPoly::one(), QPoly::from_coeffs(vec![rat(-1, 2), rat(1, 2)])] }, &OrderOptions::default()).unwrap();
    assert_eq!(&BigInt::from(5), K.discriminant());
    assert_eq!(&[QPoly::one(), QPoly::from_coeffs(vec![rat(1, 2), rat(1, 2)])][..], K.basis());

    assert_eq!(
        Err(NumberFieldError::DimensionMismatch { expected: 2, actual: 1 }),
        NumberField::build(OrderSource::WithBasis { poly: poly.clone(), basis: vec![QPoly::one()] }, &OrderOptions::default()).map(|_| ())
    );
    let result = NumberField::build(OrderSource::WithBasis { poly: poly.clone(), basis: vec![QPoly::one(), QPoly::from_coeffs(vec![rat(0, 1), rat(1, 2)])] }, &OrderOptions::default());
    assert!(matches!(result, Err(NumberFieldError::InvalidBasis(_))));
    let result = NumberField::build(OrderSource::WithBasis { poly: poly, basis: vec![QPoly::one(), QPoly::from_ints(&[0, 2])] }, &OrderOptions::default());
    assert!(matches!(result, Err(NumberFieldError::InvalidBasis(_))));
}

#[test]
fn test_element_arithmetic() {
    LogAlgorithmSubscriber::init_test();
    let K = build_default(&[-5, 0, 1]).unwrap();
    let phi = K.basis_vector(1);
    assert_eq!(rat(1, 1), K.trace(&phi));
    assert_eq!(rat(-1, 1), K.norm(&phi));
    assert_eq!(QPoly::from_ints(&[-1, -1, 1]), K.charpoly(&phi));
    assert_eq!(K.add(&phi, &K.one()), K.mul(&phi, &phi));
    assert_eq!(K.sub(&phi, &K.one()), K.invert(&phi).unwrap());
    assert_eq!(QPoly::from_ints(&[4, -4, 1]), K.charpoly(&K.from_int(&BigInt::from(2))));
    assert_eq!(QPoly::from_ints(&[-2, 1]), K.minpoly(&K.from_int(&BigInt::from(2))));
    assert!(K.is_primitive(&phi));
    assert!(!K.is_primitive(&K.one()));
    assert!(K.is_integral(&phi));
    assert!(!K.is_integral(&K.scale(&phi, &rat(1, 2))));

    let trace_form = K.trace_form();
    assert_eq!(&BigInt::from(2), trace_form.at(0, 0));
    assert_eq!(&BigInt::from(1), trace_form.at(0, 1));
    assert_eq!(&BigInt::from(3), trace_form.at(1, 1));

    let theta = K.theta();
    assert_eq!(Some(QPoly::from_ints(&[-1, 2])), K.express_in(&phi, &theta));
    assert_eq!(None, K.express_in(&K.one(), &theta));
}

#[test]
fn test_rebase() {
    LogAlgorithmSubscriber::init_test();
    let K = build_default(&[-5, 0, 1]).unwrap();
    let phi = K.basis_vector(1);
    let L = K.rebase(&K.charpoly(&phi), &phi).unwrap();
    assert_eq!(&QPoly::from_ints(&[-1, -1, 1]), L.poly());
    assert_eq!(&BigInt::from(1), L.index());
    assert_eq!(K.discriminant(), L.discriminant());
}

#[test]
fn test_embeddings_cached() {
    LogAlgorithmSubscriber::init_test();
    let K = build_default(&[-2, 0, 0, 1]).unwrap();
    let table = K.embeddings(64).unwrap();
    let RR = table.real_field();
    assert!((RR.to_f64(&table.real_roots()[0]) - 2f64.cbrt()).abs() < 1e-12);
    assert!(Rc::ptr_eq(&table, &K.embeddings(32).unwrap()));
    let finer = K.embeddings(256).unwrap();
    assert!(finer.precision() >= 256);
    assert!(!Rc::ptr_eq(&table, &finer));
}

#[test]
fn test_certified_primes() {
    LogAlgorithmSubscriber::init_test();
    // dT = 2^2 * 5 * 7 * 11
    let K = build_default(&[-385, 0, 1]).unwrap();
    assert_eq!(&[BigInt::from(2), BigInt::from(5), BigInt::from(7), BigInt::from(11)][..], K.certified_primes());

    // with limited factoring effort, only primes that were actually found are certified
    let options = OrderOptions { factor_limit: Some(3), ..OrderOptions::default() };
    let K = NumberField::build(OrderSource::Polynomial(QPoly::from_ints(&[-385, 0, 1])), &options).unwrap();
    let mut certified_part = BigInt::one();
    for p in K.certified_primes() {
        assert!(crate::algorithms::miller_rabin::is_prime(p, 16));
        let (e, _) = valuation(K.poly_discriminant(), p);
        assert!(e > 0);
        certified_part *= p.pow(e as u32);
    }
    assert_eq!(K.is_maximality_certified(), certified_part == K.poly_discriminant().abs());
}
