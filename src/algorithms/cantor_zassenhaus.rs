use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use num_bigint::BigInt;
use num_traits::{One, Zero, ToPrimitive};
use tracing::instrument;

use crate::integer::random_below;
use crate::rings::poly::zn_poly::{ZnPoly, ZnPolyRing};

use oorandom;

fn characteristic(poly_ring: &ZnPolyRing) -> &BigInt {
    poly_ring.modulus()
}

///
/// Computes the `p`-th root of a polynomial whose derivative vanishes, i.e.
/// which only has monomials of degree divisible by `p`.
///
fn pth_root(poly_ring: &ZnPolyRing, f: &ZnPoly) -> ZnPoly {
    let p = characteristic(poly_ring).to_usize().expect("polynomial with vanishing derivative over a huge prime field");
    let coeffs = f.iter().step_by(p).cloned().collect::<Vec<_>>();
    poly_ring.from_coeffs(&coeffs)
}

///
/// Computes the squarefree factorization of a nonzero polynomial over `Fp`, i.e. returns
/// pairwise coprime squarefree monic polynomials `g_i` with multiplicities `e_i` such
/// that `f = lc(f) prod g_i^(e_i)`.
///
pub fn squarefree_factorization(poly_ring: &ZnPolyRing, f: &ZnPoly) -> Vec<(ZnPoly, usize)> {
    assert!(!poly_ring.is_zero(f));
    let f = poly_ring.make_monic(f);
    let mut result = Vec::new();
    if poly_ring.degree(&f) == Some(0) {
        return result;
    }
    let derivative = poly_ring.derivative(&f);
    let p = characteristic(poly_ring).to_usize().unwrap_or(usize::MAX);
    if poly_ring.is_zero(&derivative) {
        for (g, e) in squarefree_factorization(poly_ring, &pth_root(poly_ring, &f)) {
            result.push((g, e * p));
        }
        return result;
    }
    let mut c = poly_ring.gcd(&f, &derivative);
    let mut w = poly_ring.div_rem(&f, &c).0;
    let mut i = 1;
    while !poly_ring.is_one(&w) {
        let y = poly_ring.gcd(&w, &c);
        let z = poly_ring.div_rem(&w, &y).0;
        if poly_ring.degree(&z).unwrap_or(0) > 0 {
            result.push((z, i));
        }
        i += 1;
        c = poly_ring.div_rem(&c, &y).0;
        w = y;
    }
    if poly_ring.degree(&c).unwrap_or(0) > 0 {
        for (g, e) in squarefree_factorization(poly_ring, &pth_root(poly_ring, &c)) {
            result.push((g, e * p));
        }
    }
    return result;
}

///
/// Computes the distinct degree factorization of a monic squarefree polynomial over `Fp`.
/// The `i`-th entry of the result is the product of all monic irreducible factors of
/// degree `i`, in particular the `0`-th entry is always `1`.
///
pub fn distinct_degree_factorization(poly_ring: &ZnPolyRing, f: &ZnPoly) -> Vec<ZnPoly> {
    let p = characteristic(poly_ring).clone();
    let mut f = poly_ring.make_monic(f);
    let mut result = vec![poly_ring.one()];
    let x = poly_ring.indeterminate();
    let mut x_power_q_mod_f = x.clone();
    while poly_ring.degree(&f).unwrap_or(0) > 0 {
        let d = result.len();
        if 2 * d > poly_ring.degree(&f).unwrap_or(0) {
            // the remaining part is irreducible
            let deg = poly_ring.degree(&f).unwrap_or(0);
            while result.len() < deg {
                result.push(poly_ring.one());
            }
            result.push(f);
            return result;
        }
        // technically, we could compute gcd(f, X^(p^d) - X) directly, but p^d is huge;
        // hence, we compute X^(p^d) mod f iteratively
        x_power_q_mod_f = poly_ring.pow_mod(&x_power_q_mod_f, &p, &f);
        let factor = poly_ring.gcd(&f, &poly_ring.sub(&x_power_q_mod_f, &x));
        if !poly_ring.is_one(&factor) {
            f = poly_ring.div_rem(&f, &factor).0;
            x_power_q_mod_f = poly_ring.rem(&x_power_q_mod_f, &f);
        }
        result.push(factor);
    }
    return result;
}

fn random_poly(poly_ring: &ZnPolyRing, rng: &mut oorandom::Rand64, degree: usize) -> ZnPoly {
    let mut coeffs = (0..degree).map(|_| random_below(rng, poly_ring.modulus())).collect::<Vec<_>>();
    coeffs.push(BigInt::one());
    poly_ring.from_coeffs(&coeffs)
}

///
/// Uses the Cantor-Zassenhaus algorithm to find a nontrivial factor of a monic polynomial `f`
/// over a finite field, that is squarefree and consists only of irreducible factors of
/// degree `d`.
///
/// # Algorithm
///
/// For odd `p`, the algorithm relies on the fact that for some polynomial `T` over `Fp` we have
/// ```text
/// T^q - T = T (T^((q - 1)/2) + 1) (T^((q - 1)/2) - 1)
/// ```
/// where `q = p^d`. Since `f` divides `T^q - T`, the polynomial `gcd(T^((q - 1)/2) - 1, f)` is
/// a nontrivial factor with probability about `1/2` for random `T`.
///
/// For `p = 2`, the middle factor is replaced by the trace map, i.e. we use
/// ```text
/// T^q - T = Tr(T) (Tr(T) + 1)    where Tr(T) = T + T^2 + T^4 + ... + T^(2^(d - 1))
/// ```
///
#[instrument(skip_all, level = "trace")]
pub fn cantor_zassenhaus(poly_ring: &ZnPolyRing, f: &ZnPoly, d: usize, rng: &mut oorandom::Rand64) -> ZnPoly {
    let deg = poly_ring.degree(f).expect("zero polynomial");
    assert!(deg % d == 0);
    assert!(deg > d);
    let p = characteristic(poly_ring).clone();
    let is_char_two = p == BigInt::from(2);
    let exp = if is_char_two { BigInt::zero() } else { (num_traits::pow(p.clone(), d) - BigInt::one()) / BigInt::from(2) };
    loop {
        let t = random_poly(poly_ring, rng, 2 * d - 1);
        let g = if is_char_two {
            let mut trace = poly_ring.rem(&t, f);
            let mut power = trace.clone();
            for _ in 1..d {
                power = poly_ring.mul_mod(&power, &power, f);
                trace = poly_ring.add(&trace, &power);
            }
            trace
        } else {
            poly_ring.sub(&poly_ring.pow_mod(&t, &exp, f), &poly_ring.one())
        };
        let factor = poly_ring.gcd(f, &g);
        let factor_deg = poly_ring.degree(&factor).unwrap_or(0);
        if !poly_ring.is_zero(&factor) && factor_deg > 0 && factor_deg < deg {
            return factor;
        }
    }
}

fn equal_degree_factorization(poly_ring: &ZnPolyRing, f: ZnPoly, d: usize, rng: &mut oorandom::Rand64, result: &mut Vec<ZnPoly>) {
    let deg = poly_ring.degree(&f).unwrap_or(0);
    if deg == 0 {
        return;
    }
    if deg == d {
        result.push(f);
        return;
    }
    let g = cantor_zassenhaus(poly_ring, &f, d, rng);
    let h = poly_ring.div_rem(&f, &g).0;
    equal_degree_factorization(poly_ring, g, d, rng, result);
    equal_degree_factorization(poly_ring, h, d, rng, result);
}

///
/// Factors a nonzero polynomial over a prime field `Fp` into monic irreducible factors.
///
/// The result contains each irreducible factor together with its multiplicity, sorted by
/// degree and then lexicographically. The leading coefficient is ignored.
///
#[instrument(skip_all, level = "trace")]
pub fn factor_over_prime_field(poly_ring: &ZnPolyRing, f: &ZnPoly) -> Vec<(ZnPoly, usize)> {
    let mut hasher = DefaultHasher::new();
    poly_ring.modulus().hash(&mut hasher);
    f.hash(&mut hasher);
    let mut rng = oorandom::Rand64::new(hasher.finish() as u128);

    let mut result = Vec::new();
    for (squarefree_part, multiplicity) in squarefree_factorization(poly_ring, f) {
        let distinct_degree = distinct_degree_factorization(poly_ring, &squarefree_part);
        for (d, part) in distinct_degree.into_iter().enumerate().skip(1) {
            let mut factors = Vec::new();
            equal_degree_factorization(poly_ring, part, d, &mut rng, &mut factors);
            result.extend(factors.into_iter().map(|g| (g, multiplicity)));
        }
    }
    result.sort_by(|(f, _), (g, _)| f.len().cmp(&g.len()).then_with(|| f.iter().rev().cmp(g.iter().rev())));
    return result;
}

///
/// Returns the degrees of the irreducible factors of `f` over `Fp`, assuming that `f` is
/// squarefree modulo `p`.
///
pub fn factor_degrees(poly_ring: &ZnPolyRing, f: &ZnPoly) -> Vec<usize> {
    let mut result = Vec::new();
    for (d, part) in distinct_degree_factorization(poly_ring, f).into_iter().enumerate().skip(1) {
        let count = poly_ring.degree(&part).unwrap_or(0) / d;
        result.extend(std::iter::repeat(d).take(count));
    }
    return result;
}

#[cfg(test)]
use crate::rings::zn::Zn;

#[cfg(test)]
fn ints(values: &[i64]) -> Vec<BigInt> {
    values.iter().map(|x| BigInt::from(*x)).collect()
}

#[test]
fn test_squarefree_factorization() {
    let ring = ZnPolyRing::new(Zn::new(BigInt::from(3)));
    let a = ring.from_coeffs(&ints(&[1, 1]));
    let b = ring.from_coeffs(&ints(&[1, 0, 1]));
    // (x + 1)^3 (x^2 + 1)^2 needs a p-th root
    let f = ring.mul(&ring.mul(&ring.mul(&a, &a), &ring.mul(&a, &b)), &b);
    let mut factorization = squarefree_factorization(&ring, &f);
    factorization.sort_by_key(|(_, e)| *e);
    assert_eq!(vec![(b, 2), (a, 3)], factorization);
}

#[test]
fn test_factor_over_prime_field() {
    let ring = ZnPolyRing::new(Zn::new(BigInt::from(11)));
    // x^4 + x^3 + x^2 + x + 1 splits completely modulo 11
    let f = ring.from_coeffs(&ints(&[1, 1, 1, 1, 1]));
    let factors = factor_over_prime_field(&ring, &f);
    assert_eq!(4, factors.len());
    assert!(factors.iter().all(|(g, e)| ring.degree(g) == Some(1) && *e == 1));
    let product = factors.iter().fold(ring.one(), |acc, (g, _)| ring.mul(&acc, g));
    assert_eq!(f, product);

    let ring = ZnPolyRing::new(Zn::new(BigInt::from(2)));
    // x^4 + x^3 + x^2 + x + 1 is irreducible modulo 2
    let f = ring.from_coeffs(&ints(&[1, 1, 1, 1, 1]));
    assert_eq!(vec![4], factor_degrees(&ring, &f));
    // x^6 - 1 = (x + 1)^2 (x^2 + x + 1)^2 modulo 2
    let f = ring.from_coeffs(&ints(&[1, 0, 0, 0, 0, 0, 1]));
    let factors = factor_over_prime_field(&ring, &f);
    assert_eq!(vec![(ring.from_coeffs(&ints(&[1, 1])), 2), (ring.from_coeffs(&ints(&[1, 1, 1])), 2)], factors);
}

#[test]
fn test_cantor_zassenhaus_char_two() {
    let ring = ZnPolyRing::new(Zn::new(BigInt::from(2)));
    // the product of the two irreducible cubics over F2
    let a = ring.from_coeffs(&ints(&[1, 1, 0, 1]));
    let b = ring.from_coeffs(&ints(&[1, 0, 1, 1]));
    let f = ring.mul(&a, &b);
    let mut rng = oorandom::Rand64::new(1);
    let g = cantor_zassenhaus(&ring, &f, 3, &mut rng);
    assert!(g == a || g == b);
}

#[test]
fn test_factor_large_prime() {
    let p = BigInt::from(1000000007);
    let ring = ZnPolyRing::new(Zn::new(p));
    // (x - 3)(x^2 + 1), where -1 is not a square modulo p = 3 mod 4
    let f = ring.mul(&ring.from_coeffs(&ints(&[-3, 1])), &ring.from_coeffs(&ints(&[1, 0, 1])));
    assert_eq!(vec![1, 2], factor_degrees(&ring, &f));
}
