use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use tracing::{event, span, Level};

use crate::algorithms::cantor_zassenhaus::factor_over_prime_field;
use crate::algorithms::linsolve::hnf::{hnf, hnf_coordinates};
use crate::algorithms::linsolve::kernel_mod_p;
use crate::algorithms::miller_rabin::is_prime;
use crate::algorithms::resultant::integer_discriminant;
use crate::algorithms::round2::p_radical;
use crate::error::{NumberFieldError, Result};
use crate::integer::{common_denominator, reduce_mod, valuation as int_valuation};
use crate::matrix::OwnedMatrix;
use crate::rings::extension::number_field::NumberField;
use crate::rings::poly::dense_poly::QPoly;
use crate::rings::poly::zn_poly::{ZnPoly, ZnPolyRing};
use crate::rings::zn::Zn;

const MILLER_RABIN_ROUNDS: usize = 16;
const TWO_ELEMENT_TRIES: usize = 1000;
const PRIMITIVE_ELEMENT_TRIES: usize = 200;

///
/// A nonzero ideal of the maximal order of a number field, represented by the
/// Hermite normal form of its `Z`-basis, in coordinates w.r.t. the integral basis.
///
/// Optionally, a two-element representation `I = (a, alpha)` with `a` in `Z` is stored.
/// Two ideals are equal if and only if their Hermite normal forms are equal.
///
#[derive(Debug, Clone)]
pub struct Ideal {
    hnf: OwnedMatrix<BigInt>,
    two_element: Option<(BigInt, Vec<BigInt>)>
}

impl PartialEq for Ideal {

    fn eq(&self, other: &Self) -> bool {
        self.hnf == other.hnf
    }
}

impl Eq for Ideal {}

impl Ideal {

    ///
    /// Creates the ideal generated by the given integral elements.
    ///
    pub fn from_generators(field: &NumberField, generators: &[Vec<BigInt>]) -> Result<Ideal> {
        let n = field.degree();
        let mut cols = Vec::with_capacity(n * generators.len());
        for g in generators {
            if g.len() != n {
                return Err(NumberFieldError::DimensionMismatch { expected: n, actual: g.len() });
            }
            for i in 0..n {
                let mut unit = vec![BigInt::zero(); n];
                unit[i] = BigInt::one();
                cols.push(field.order().mul_integral(g, &unit));
            }
        }
        let matrix = OwnedMatrix::from_cols(n, cols);
        let hnf = hnf(&matrix).ok_or_else(|| NumberFieldError::Unsupported("the zero ideal cannot be represented".to_owned()))?;
        let two_element = match generators {
            [a, alpha] if a[1..].iter().all(|c| c.is_zero()) && a[0].is_positive() => Some((a[0].clone(), alpha.clone())),
            _ => None
        };
        return Ok(Ideal { hnf, two_element });
    }

    ///
    /// The principal ideal generated by the given integral element.
    ///
    pub fn principal(field: &NumberField, generator: &[BigInt]) -> Result<Ideal> {
        Ideal::from_generators(field, &[generator.to_vec()])
    }

    ///
    /// Creates an ideal from a matrix whose columns generate it as a `Z`-module.
    /// The columns are not checked to generate an ideal.
    ///
    pub(crate) fn from_lattice(matrix: &OwnedMatrix<BigInt>) -> Option<Ideal> {
        hnf(matrix).map(|hnf| Ideal { hnf, two_element: None })
    }

    ///
    /// The `Z`-basis of the ideal in Hermite normal form, i.e. an upper triangular
    /// matrix, whose columns are the coordinates of the basis elements.
    ///
    pub fn hnf(&self) -> &OwnedMatrix<BigInt> {
        &self.hnf
    }

    pub fn contains(&self, x: &[BigInt]) -> bool {
        hnf_coordinates(&self.hnf, x).is_some()
    }

    ///
    /// Returns whether the ideal contains the given (possibly non-integral) element.
    ///
    pub fn contains_element(&self, x: &[BigRational]) -> bool {
        x.iter().all(|c| c.is_integer()) && self.contains(&x.iter().map(|c| c.to_integer()).collect::<Vec<_>>())
    }

    ///
    /// The norm `[O : I]` of the ideal.
    ///
    pub fn norm(&self) -> BigInt {
        (0..self.hnf.row_count()).map(|i| self.hnf.at(i, i).abs()).fold(BigInt::one(), |a, b| a * b)
    }

    ///
    /// The positive generator of `I ∩ Z`.
    ///
    pub fn minimum(&self) -> BigInt {
        self.hnf.at(0, 0).abs()
    }

    pub fn mul(&self, field: &NumberField, other: &Ideal) -> Ideal {
        let n = field.degree();
        let mut cols = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                cols.push(field.order().mul_integral(&self.hnf.col(i), &other.hnf.col(j)));
            }
        }
        let hnf = hnf(&OwnedMatrix::from_cols(n, cols)).unwrap_or_else(|| unreachable!("product of nonzero ideals is nonzero"));
        return Ideal { hnf, two_element: None };
    }

    ///
    /// Returns a representation `I = (a, alpha)`, where `a` is the smallest positive integer
    /// in `I`. If no such representation is known, it is searched among small combinations of
    /// the basis of `I`.
    ///
    pub fn two_element(&self, field: &NumberField) -> Result<(BigInt, Vec<BigInt>)> {
        if let Some(result) = &self.two_element {
            return Ok(result.clone());
        }
        let n = field.degree();
        let a = self.minimum();
        let a_element = field.to_integral(&field.from_int(&a)).unwrap_or_else(|| unreachable!());
        let mut candidates = self.hnf.cols();
        let mut rng = oorandom::Rand64::new(a.bits() as u128 + n as u128);
        for _ in 0..TWO_ELEMENT_TRIES {
            candidates.push((0..n).fold(vec![BigInt::zero(); n], |acc, j| {
                let c = BigInt::from(rng.rand_range(0..7) as i64 - 3);
                acc.iter().zip(self.hnf.col(j).iter()).map(|(x, h)| x + &c * h).collect()
            }));
        }
        for alpha in candidates {
            if Ideal::from_generators(field, &[a_element.clone(), alpha.clone()])? == *self {
                return Ok((a, alpha));
            }
        }
        return Err(NumberFieldError::Bug("no two-element representation found".to_owned()));
    }
}

///
/// A prime ideal `P` of the maximal order, lying over the rational prime `p`.
///
/// Apart from the ideal itself, it stores a two-element representation `P = (p, alpha)`,
/// a uniformizer `pi` with `v_P(pi) = 1` and an anti-uniformizer `tau`, i.e. an integral
/// element with `tau P ⊆ pO` and `tau` not in `pO`. The latter is used to compute valuations.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prime {
    p: BigInt,
    e: usize,
    f: usize,
    ideal: Ideal,
    generator: Vec<BigInt>,
    uniformizer: Vec<BigInt>,
    anti_uniformizer: Vec<BigInt>
}

impl Prime {

    ///
    /// Creates a prime from the given data, and computes the anti-uniformizer.
    ///
    pub(crate) fn new(field: &NumberField, p: BigInt, e: usize, f: usize, generator: Vec<BigInt>, uniformizer: Vec<BigInt>) -> Result<Prime> {
        let n = field.degree();
        let p_element = field.to_integral(&field.from_int(&p)).unwrap_or_else(|| unreachable!());
        let mut ideal = Ideal::from_generators(field, &[p_element, generator.clone()])?;
        ideal.two_element = Some((p.clone(), generator.clone()));
        let anti_uniformizer = anti_uniformizer(field, &ideal, &p)?;
        if ideal.norm() != p.pow(f as u32) || e * f > n {
            return Err(NumberFieldError::Bug(format!("inconsistent prime ideal data over {}", p)));
        }
        return Ok(Prime { p, e, f, ideal, generator, uniformizer, anti_uniformizer });
    }

    pub fn p(&self) -> &BigInt {
        &self.p
    }

    ///
    /// The ramification index `e = v_P(p)`.
    ///
    pub fn e(&self) -> usize {
        self.e
    }

    ///
    /// The residue degree `f = [O/P : Fp]`.
    ///
    pub fn f(&self) -> usize {
        self.f
    }

    pub fn ideal(&self) -> &Ideal {
        &self.ideal
    }

    ///
    /// The element `alpha` with `P = (p, alpha)`.
    ///
    pub fn generator(&self) -> &[BigInt] {
        &self.generator
    }

    pub fn uniformizer(&self) -> &[BigInt] {
        &self.uniformizer
    }

    pub fn anti_uniformizer(&self) -> &[BigInt] {
        &self.anti_uniformizer
    }

    pub fn contains(&self, x: &[BigInt]) -> bool {
        self.ideal.contains(x)
    }
}

///
/// Computes an element `tau` of `O` with `tau P ⊆ pO` but `tau` not in `pO`, by solving the
/// linear system `tau beta_j = 0` in `O/pO` for the `Z`-basis `beta_j` of `P`.
///
pub(crate) fn anti_uniformizer(field: &NumberField, ideal: &Ideal, p: &BigInt) -> Result<Vec<BigInt>> {
    let n = field.degree();
    let mut rows = Vec::with_capacity(n * n);
    for j in 0..n {
        let beta = field.from_integral(&ideal.hnf().col(j));
        let matrix = field.mul_matrix(&beta);
        for i in 0..n {
            rows.push((0..n).map(|k| matrix.at(i, k).to_integer()).collect::<Vec<_>>());
        }
    }
    let kernel = kernel_mod_p(&OwnedMatrix::from_rows(rows), p);
    return kernel.into_iter()
        .map(|x| x.into_iter().map(|c| reduce_mod(&c, p)).collect::<Vec<_>>())
        .find(|x| x.iter().any(|c| !c.is_zero()))
        .ok_or_else(|| NumberFieldError::Bug("ideal is not contained in a prime over p".to_owned()));
}

///
/// Searches for an integral primitive element `alpha` with `p` not dividing `[O : Z[alpha]]`,
/// i.e. with `v_p(disc(charpoly(alpha))) = v_p(dK)`.
///
fn p_maximal_element(field: &NumberField, p: &BigInt) -> Option<(Vec<BigInt>, QPoly)> {
    let n = field.degree();
    let target = int_valuation(field.discriminant(), p).0;
    let theta = field.to_integral(&field.theta()).unwrap_or_else(|| unreachable!("theta is integral"));
    let mut candidates = vec![theta.clone()];
    candidates.extend((1..n).map(|i| field.to_integral(&field.basis_vector(i)).unwrap_or_else(|| unreachable!())));
    candidates.extend((1..n).map(|i| {
        let mut x = theta.clone();
        x[i] += 1;
        x
    }));
    let mut rng = oorandom::Rand64::new(p.bits() as u128);
    candidates.extend((0..PRIMITIVE_ELEMENT_TRIES).map(|_| (0..n).map(|_| BigInt::from(rng.rand_range(0..11) as i64 - 5)).collect()));
    for alpha in candidates {
        let charpoly = field.charpoly(&field.from_integral(&alpha));
        if !charpoly.is_squarefree() {
            continue;
        }
        if int_valuation(&integer_discriminant(&charpoly), p).0 == target {
            return Some((alpha, charpoly));
        }
    }
    return None;
}

///
/// Computes the prime ideals lying over `p`, together with their ramification indices
/// and residue degrees.
///
/// # Algorithm
///
/// This uses the theorem of Dedekind-Kummer: If `p` does not divide the index of `Z[alpha]`
/// in `O`, and `charpoly(alpha) = prod g_i^e_i mod p`, then the primes over `p` are exactly
/// `P_i = (p, g_i(alpha))`, with ramification index `e_i` and residue degree `deg(g_i)`.
///
/// If no suitable `alpha` is found, e.g. because `p` is a common index divisor of the
/// field, the primes are found by splitting `O/I_p` for the `p`-radical `I_p` directly.
///
pub fn prime_decomposition(field: &NumberField, p: &BigInt) -> Result<Vec<Prime>> {
    if !is_prime(p, MILLER_RABIN_ROUNDS) {
        return Err(NumberFieldError::NotPrime(p.clone()));
    }
    span!(Level::INFO, "prime_decomposition", p = %p).in_scope(|| {
        let n = field.degree();
        let result = match p_maximal_element(field, p) {
            Some((alpha, charpoly)) => dedekind_kummer(field, p, &alpha, &charpoly)?,
            None => {
                event!(Level::DEBUG, "no p-maximal element, splitting O/pO");
                primes_by_splitting(field, p)?
            }
        };
        let sum: usize = result.iter().map(|P| P.e * P.f).sum();
        if sum != n {
            return Err(NumberFieldError::Bug(format!("sum of e f over {} is {} instead of {}", p, sum, n)));
        }
        event!(Level::INFO, primes = result.len(), "prime_decomposition");
        return Ok(result);
    })
}

fn dedekind_kummer(field: &NumberField, p: &BigInt, alpha: &[BigInt], charpoly: &QPoly) -> Result<Vec<Prime>> {
    let alpha_poly = field.to_poly(&field.from_integral(alpha));
    let Fp = ZnPolyRing::new(Zn::new(p.clone()));
    let reduced = Fp.from_qpoly(charpoly).unwrap_or_else(|| unreachable!("charpoly of an integral element is integral"));
    let mut result = Vec::new();
    for (factor, e) in factor_over_prime_field(&Fp, &reduced) {
        let f = Fp.degree(&factor).unwrap_or(0);
        let lifted = Fp.lift_centered(&factor);
        let generator = field.to_integral(&field.from_poly(&lifted.compose_mod(&alpha_poly, field.poly())))
            .ok_or_else(|| NumberFieldError::Bug("generator of prime is not integral".to_owned()))?;
        let uniformizer = if e == 1 {
            field.to_integral(&field.from_int(p)).unwrap_or_else(|| unreachable!())
        } else {
            find_uniformizer(field, p, &generator)?
        };
        result.push(Prime::new(field, p.clone(), e, f, generator, uniformizer)?);
    }
    return Ok(result);
}

///
/// Computes the minimal polynomial over `Fp` of `b` in `O/J`, for an ideal `J` containing `pO`.
///
fn minpoly_mod_ideal(field: &NumberField, Fp: &ZnPolyRing, ideal: &Ideal, b: &[BigInt]) -> Result<ZnPoly> {
    let n = field.degree();
    let p = Fp.modulus();
    let mut powers = vec![field.to_integral(&field.one()).unwrap_or_else(|| unreachable!())];
    for m in 1..=n {
        let next = field.order().mul_integral(&powers[m - 1], b).into_iter().map(|c| reduce_mod(&c, p)).collect();
        powers.push(next);
        let cols = ideal.hnf().cols().into_iter().chain(powers.iter().cloned()).collect();
        let kernel = kernel_mod_p(&OwnedMatrix::from_cols(n, cols), p);
        // by minimality of m, every relation involving the powers involves b^m
        if let Some(relation) = kernel.into_iter().find(|x| x[n..].iter().any(|c| !reduce_mod(c, p).is_zero())) {
            return Ok(Fp.make_monic(&Fp.from_coeffs(&relation[n..])));
        }
    }
    return Err(NumberFieldError::Bug("element has no minimal polynomial modulo ideal".to_owned()));
}

///
/// Computes the prime ideals over `p` without using a primitive element.
///
/// # Algorithm
///
/// Let `I_p` be the `p`-radical, then `O/I_p` is a product of finite fields, one for each
/// prime over `p`. The elements `b` with `b^p = b` in `O/I_p` form a subalgebra `Fp^k`.
/// Starting with `J = I_p`, an ideal `J` is split into the ideals `J + (b - c)O`, where
/// `c` runs through the roots of the minimal polynomial of `b` in `O/J`. After doing this
/// for a basis of the subalgebra, all ideals are prime.
///
fn split_at_radical(field: &NumberField, p: &BigInt) -> Result<Vec<Ideal>> {
    let n = field.degree();
    let order = field.order();
    let radical = Ideal::from_lattice(&p_radical(order, p))
        .ok_or_else(|| NumberFieldError::Bug("p-radical has deficient rank".to_owned()))?;
    let one = field.to_integral(&field.one()).unwrap_or_else(|| unreachable!());
    let mut cols = (0..n).map(|i| {
        let mut unit = vec![BigInt::zero(); n];
        unit[i] = BigInt::one();
        let power = order.pow_mod_p(&unit, p, p);
        power.iter().zip(unit.iter()).map(|(a, b)| a - b).collect::<Vec<_>>()
    }).collect::<Vec<_>>();
    cols.extend(radical.hnf().cols());
    let splitting_elements = kernel_mod_p(&OwnedMatrix::from_cols(n, cols), p).into_iter()
        .map(|x| x[..n].iter().map(|c| reduce_mod(c, p)).collect::<Vec<_>>())
        .filter(|x| x.iter().any(|c| !c.is_zero()))
        .collect::<Vec<_>>();

    let Fp = ZnPolyRing::new(Zn::new(p.clone()));
    let mut parts = vec![radical];
    for b in &splitting_elements {
        let mut next = Vec::with_capacity(parts.len());
        for ideal in parts {
            let minpoly = minpoly_mod_ideal(field, &Fp, &ideal, b)?;
            if Fp.degree(&minpoly) == Some(1) {
                next.push(ideal);
                continue;
            }
            for (factor, _) in factor_over_prime_field(&Fp, &minpoly) {
                if Fp.degree(&factor) != Some(1) {
                    return Err(NumberFieldError::Bug("minimal polynomial does not split over Fp".to_owned()));
                }
                let c = reduce_mod(&-Fp.coeff(&factor, 0), p);
                let shifted = b.iter().zip(one.iter()).map(|(x, u)| x - &c * u).collect::<Vec<_>>();
                let mut generators = ideal.hnf().cols();
                generators.push(shifted);
                next.push(Ideal::from_generators(field, &generators)?);
            }
        }
        parts = next;
    }
    event!(Level::DEBUG, primes = parts.len(), splitting_elements = splitting_elements.len(), "split_at_radical");
    return Ok(parts);
}

fn primes_by_splitting(field: &NumberField, p: &BigInt) -> Result<Vec<Prime>> {
    let p_element = field.to_integral(&field.from_int(p)).unwrap_or_else(|| unreachable!());
    let mut result = Vec::new();
    for ideal in split_at_radical(field, p)? {
        let mut norm = ideal.norm();
        let mut f = 0;
        while norm > BigInt::one() {
            let (quotient, remainder) = norm.div_rem(p);
            if !remainder.is_zero() {
                return Err(NumberFieldError::Bug(format!("norm of prime over {} is not a power of {}", p, p)));
            }
            norm = quotient;
            f += 1;
        }
        let (_, generator) = ideal.two_element(field)?;
        let tau = anti_uniformizer(field, &ideal, p)?;
        let e = divide_out(field, &tau, p, p_element.clone()) as usize;
        let uniformizer = if e == 1 {
            p_element.clone()
        } else {
            find_uniformizer(field, p, &generator)?
        };
        result.push(Prime::new(field, p.clone(), e, f, generator, uniformizer)?);
    }
    result.sort_by_key(|P| (P.f, P.e));
    return Ok(result);
}

///
/// Finds an element of `P = (p, generator)` that is not in `P^2`.
///
fn find_uniformizer(field: &NumberField, p: &BigInt, generator: &[BigInt]) -> Result<Vec<BigInt>> {
    let p_element = field.to_integral(&field.from_int(p)).unwrap_or_else(|| unreachable!());
    let ideal = Ideal::from_generators(field, &[p_element.clone(), generator.to_vec()])?;
    let square = ideal.mul(field, &ideal);
    let shifted = generator.iter().zip(p_element.iter()).map(|(a, b)| a + b).collect::<Vec<_>>();
    let candidates = [generator.to_vec(), shifted].into_iter().chain(ideal.hnf().cols());
    for candidate in candidates {
        if !square.contains(&candidate) {
            return Ok(candidate);
        }
    }
    return Err(NumberFieldError::Bug("prime ideal equals its square".to_owned()));
}

///
/// Computes the valuation `v_P(x)` of an element of the field at the given prime,
/// or `None` if `x` is zero.
///
pub fn valuation(field: &NumberField, prime: &Prime, x: &[BigRational]) -> Option<i64> {
    if field.is_zero(x) {
        return None;
    }
    let d = common_denominator(x.iter());
    let mut y = x.iter().map(|c| (c * BigRational::from_integer(d.clone())).to_integer()).collect::<Vec<_>>();
    let (v_d, _) = int_valuation(&d, &prime.p);
    let mut result = -((prime.e * v_d) as i64);
    // content
    let (v_content, _) = int_valuation(&y.iter().fold(BigInt::zero(), |acc, c| acc.gcd(c)), &prime.p);
    if v_content > 0 {
        let factor = prime.p.pow(v_content as u32);
        y = y.iter().map(|c| c / &factor).collect();
        result += (prime.e * v_content) as i64;
    }
    return Some(result + divide_out(field, &prime.anti_uniformizer, &prime.p, y));
}

///
/// Computes `v_P(y)` for a nonzero integral `y`, by repeatedly replacing `y` with `tau y / p`
/// as long as this is integral, where `tau` is the anti-uniformizer of `P`.
///
fn divide_out(field: &NumberField, anti_uniformizer: &[BigInt], p: &BigInt, mut y: Vec<BigInt>) -> i64 {
    let mut result = 0;
    loop {
        let product = field.order().mul_integral(anti_uniformizer, &y);
        if product.iter().any(|c| !(c % p).is_zero()) {
            return result;
        }
        y = product.iter().map(|c| c / p).collect();
        result += 1;
    }
}

///
/// Computes the valuation `v_P(x)` of a nonzero integral element.
///
pub fn valuation_integral(field: &NumberField, prime: &Prime, x: &[BigInt]) -> Option<i64> {
    valuation(field, prime, &field.from_integral(x))
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
fn ints(values: &[i64]) -> Vec<BigInt> {
    values.iter().map(|x| BigInt::from(*x)).collect()
}

#[cfg(test)]
fn assert_product_is_p(K: &NumberField, primes: &[Prime], p: i64) {
    let mut product = Ideal::principal(K, &K.to_integral(&K.one()).unwrap()).unwrap();
    for P in primes {
        for _ in 0..P.e() {
            product = product.mul(K, P.ideal());
        }
    }
    assert_eq!(Ideal::principal(K, &K.to_integral(&K.from_int(&BigInt::from(p))).unwrap()).unwrap(), product);
}

#[test]
fn test_ideal_basics() {
    LogAlgorithmSubscriber::init_test();
    let K = field(&[1, 0, 1]);
    // (1 + i) has norm 2 and contains 2
    let I = Ideal::principal(&K, &ints(&[1, 1])).unwrap();
    assert_eq!(BigInt::from(2), I.norm());
    assert_eq!(BigInt::from(2), I.minimum());
    assert!(I.contains(&ints(&[2, 0])));
    assert!(I.contains(&ints(&[1, -1])));
    assert!(!I.contains(&ints(&[1, 0])));
    let (a, alpha) = I.two_element(&K).unwrap();
    assert_eq!(BigInt::from(2), a);
    assert_eq!(I, Ideal::from_generators(&K, &[ints(&[2, 0]), alpha]).unwrap());
    assert_eq!(Ideal::principal(&K, &ints(&[2, 0])).unwrap(), I.mul(&K, &I));
    assert!(Ideal::principal(&K, &ints(&[0, 0])).is_err());
}

#[test]
fn test_prime_decomposition_quadratic() {
    LogAlgorithmSubscriber::init_test();
    let K = field(&[-5, 0, 1]);
    // 5 is ramified, 11 splits, 2 is inert (even though it divides the index of Z[sqrt(5)])
    let primes = prime_decomposition(&K, &BigInt::from(5)).unwrap();
    assert_eq!(vec![(2, 1)], primes.iter().map(|P| (P.e(), P.f())).collect::<Vec<_>>());
    assert_product_is_p(&K, &primes, 5);

    let primes = prime_decomposition(&K, &BigInt::from(11)).unwrap();
    assert_eq!(vec![(1, 1), (1, 1)], primes.iter().map(|P| (P.e(), P.f())).collect::<Vec<_>>());
    assert_product_is_p(&K, &primes, 11);

    let primes = prime_decomposition(&K, &BigInt::from(2)).unwrap();
    assert_eq!(vec![(1, 2)], primes.iter().map(|P| (P.e(), P.f())).collect::<Vec<_>>());

    assert_eq!(Err(NumberFieldError::NotPrime(BigInt::from(15))), prime_decomposition(&K, &BigInt::from(15)));
}

#[test]
fn test_prime_decomposition_cubic() {
    LogAlgorithmSubscriber::init_test();
    let K = field(&[-12, 0, 0, 1]);
    for p in [2, 3, 5, 7, 13] {
        let primes = prime_decomposition(&K, &BigInt::from(p)).unwrap();
        assert_product_is_p(&K, &primes, p);
        for P in &primes {
            assert_eq!(Some(1), valuation_integral(&K, P, P.uniformizer()));
            assert_eq!(Some(P.e() as i64), valuation(&K, P, &K.from_int(&BigInt::from(p))));
        }
    }
    // 2 and 3 are totally ramified in Q(12^(1/3))
    assert_eq!(vec![(3, 1)], prime_decomposition(&K, &BigInt::from(3)).unwrap().iter().map(|P| (P.e(), P.f())).collect::<Vec<_>>());
}

#[test]
fn test_valuation() {
    LogAlgorithmSubscriber::init_test();
    let K = field(&[1, 0, 1]);
    let P = prime_decomposition(&K, &BigInt::from(2)).unwrap().remove(0);
    assert_eq!((2, 1), (P.e(), P.f()));
    assert_eq!(None, valuation(&K, &P, &K.zero()));
    assert_eq!(Some(2), valuation(&K, &P, &K.from_int(&BigInt::from(2))));
    assert_eq!(Some(1), valuation_integral(&K, &P, &ints(&[1, 1])));
    assert_eq!(Some(0), valuation_integral(&K, &P, &ints(&[1, 2])));
    // 1/(4 (1 + i)) has valuation -5
    let x = K.invert(&K.from_integral(&ints(&[4, 4]))).unwrap();
    assert_eq!(Some(-5), valuation(&K, &P, &x));
}

#[test]
fn test_prime_decomposition_common_index_divisor() {
    LogAlgorithmSubscriber::init_test();
    // Q(sqrt(-7), sqrt(17)), 2 splits completely, thus O/2O = F2^4 has no generator
    let K = field(&[576, 0, -20, 0, 1]);
    assert!(p_maximal_element(&K, &BigInt::from(2)).is_none());
    let primes = prime_decomposition(&K, &BigInt::from(2)).unwrap();
    assert_eq!(vec![(1, 1); 4], primes.iter().map(|P| (P.e(), P.f())).collect::<Vec<_>>());
    for i in 0..4 {
        for j in (i + 1)..4 {
            assert!(primes[i].ideal() != primes[j].ideal());
        }
    }
    assert_product_is_p(&K, &primes, 2);
    for P in &primes {
        assert_eq!(Some(1), valuation_integral(&K, P, P.uniformizer()));
        assert_eq!(Some(1), valuation(&K, P, &K.from_int(&BigInt::from(2))));
    }
}

#[test]
fn test_primes_by_splitting() {
    LogAlgorithmSubscriber::init_test();
    let K = field(&[-5, 0, 1]);
    for p in [2, 5, 11] {
        let expected = prime_decomposition(&K, &BigInt::from(p)).unwrap();
        let actual = primes_by_splitting(&K, &BigInt::from(p)).unwrap();
        assert_eq!(expected.len(), actual.len());
        for P in &actual {
            let Q = expected.iter().find(|Q| Q.ideal() == P.ideal()).unwrap();
            assert_eq!((Q.e(), Q.f()), (P.e(), P.f()));
        }
    }
    let K = field(&[-12, 0, 0, 1]);
    let primes = primes_by_splitting(&K, &BigInt::from(3)).unwrap();
    assert_eq!(vec![(3, 1)], primes.iter().map(|P| (P.e(), P.f())).collect::<Vec<_>>());
    assert_product_is_p(&K, &primes, 3);
}
