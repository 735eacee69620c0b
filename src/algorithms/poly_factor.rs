use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Zero};
use tracing::{event, instrument, Level};

use crate::algorithms::cantor_zassenhaus::{factor_degrees, factor_over_prime_field};
use crate::algorithms::hensel::hensel_lift_factorization;
use crate::algorithms::resultant::integer_discriminant;
use crate::integer::enumerate_primes;
use crate::rings::poly::dense_poly::QPoly;
use crate::rings::poly::zn_poly::{ZnPoly, ZnPolyRing};
use crate::rings::zn::Zn;

const GOOD_PRIMES_TO_TRY: usize = 7;

///
/// Given the degrees of the irreducible factors of `f` modulo some prime, returns for
/// each `d` in `0..=deg(f)` whether some product of these factors has degree `d`.
///
fn possible_factor_degrees(degrees: &[usize], n: usize) -> Vec<bool> {
    let mut result = vec![false; n + 1];
    result[0] = true;
    for d in degrees {
        for k in (*d..=n).rev() {
            if result[k - d] {
                result[k] = true;
            }
        }
    }
    return result;
}

///
/// A bound on the absolute value of the coefficients of any monic factor of `f` over `Z`,
/// based on Mignotte's bound `|b_j| <= binom(m, j) |f|_2`.
///
fn factor_coefficient_bound(f: &QPoly) -> BigInt {
    let n = f.degree().unwrap_or(0);
    let norm_squared = f.coeffs().iter().map(|c| c.numer() * c.numer()).fold(BigInt::zero(), |a, b| a + b);
    (norm_squared.sqrt() + BigInt::one()) << n
}

fn product_of_subset(ring: &ZnPolyRing, factors: &[ZnPoly], subset: u64) -> ZnPoly {
    factors.iter().enumerate().filter(|(i, _)| (subset >> i) & 1 == 1).fold(ring.one(), |acc, (_, g)| ring.mul(&acc, g))
}

///
/// Checks whether a monic, squarefree integer polynomial is irreducible over `Q`.
///
/// # Algorithm
///
/// First, the polynomial is factored modulo a few primes not dividing its discriminant,
/// and the degrees of possible factors over `Z` are restricted to those that are consistent
/// with all these factorizations. Often, this is already sufficient to prove irreducibility.
/// Otherwise, the factorization modulo the best prime is lifted to a sufficiently large
/// power `p^e` and all products of subsets of factors with possible degree are checked for
/// being a factor over `Z`.
///
#[instrument(skip_all, level = "trace")]
pub fn is_irreducible(f: &QPoly) -> bool {
    assert!(f.is_monic() && f.is_integral());
    let n = f.degree().unwrap_or(0);
    if n <= 1 {
        return true;
    }
    let disc = integer_discriminant(f);
    assert!(!disc.is_zero(), "polynomial is not squarefree");

    let mut possible = vec![true; n + 1];
    let mut best: Option<(BigInt, usize)> = None;
    let mut good_primes = 0;
    for p in enumerate_primes(10000) {
        let p = BigInt::from(p);
        if disc.is_multiple_of(&p) {
            continue;
        }
        let Fp = ZnPolyRing::new(Zn::new(p.clone()));
        let Some(reduced) = Fp.from_qpoly(f) else { continue; };
        let degrees = factor_degrees(&Fp, &reduced);
        if degrees.len() == 1 {
            return true;
        }
        let here = possible_factor_degrees(&degrees, n);
        for d in 0..=n {
            possible[d] &= here[d];
        }
        if (1..n).all(|d| !possible[d]) {
            return true;
        }
        if best.as_ref().map(|(_, count)| degrees.len() < *count).unwrap_or(true) {
            best = Some((p, degrees.len()));
        }
        good_primes += 1;
        if good_primes >= GOOD_PRIMES_TO_TRY {
            break;
        }
    }

    let Some((p, factor_count)) = best else {
        return true;
    };
    event!(Level::TRACE, "recombination with p={} and {} factors", p, factor_count);
    let Fp = ZnPolyRing::new(Zn::new(p.clone()));
    let factors = factor_over_prime_field(&Fp, &Fp.from_qpoly(f).unwrap_or_default()).into_iter().map(|(g, _)| g).collect::<Vec<_>>();
    let bound = factor_coefficient_bound(f) * BigInt::from(2);
    let mut e = 1;
    let mut modulus = p.clone();
    while modulus <= bound {
        modulus *= &p;
        e += 1;
    }
    let lifted = hensel_lift_factorization(f, &factors, &p, e);
    let Zpe = ZnPolyRing::new(Zn::new(modulus));
    let r = lifted.len();
    assert!(r < 64);
    // a factor and its cofactor are both checked, thus it suffices to consider subsets
    // not containing the last factor
    for subset in 1..(1u64 << (r - 1)) {
        let degree = lifted.iter().enumerate().filter(|(i, _)| (subset >> i) & 1 == 1).map(|(_, g)| g.len() - 1).sum::<usize>();
        if !possible[degree] {
            continue;
        }
        let candidate = Zpe.lift_centered(&product_of_subset(&Zpe, &lifted, subset));
        if f.rem(&candidate).is_zero() {
            return false;
        }
    }
    return true;
}

#[test]
fn test_possible_factor_degrees() {
    assert_eq!(vec![true, true, false, true, true], possible_factor_degrees(&[1, 3], 4));
    assert_eq!(vec![true, false, true, false, true], possible_factor_degrees(&[2, 2], 4));
}

#[test]
fn test_is_irreducible() {
    assert!(is_irreducible(&QPoly::from_ints(&[-5, 0, 1])));
    assert!(is_irreducible(&QPoly::from_ints(&[-2, 0, 0, 1])));
    assert!(is_irreducible(&QPoly::from_ints(&[1, 1, 1, 1, 1])));
    assert!(!is_irreducible(&QPoly::from_ints(&[-4, 0, 1])));
    // x^4 + 1 is irreducible, but reducible modulo every prime
    assert!(is_irreducible(&QPoly::from_ints(&[1, 0, 0, 0, 1])));
    // (x^2 + 1)(x^2 + x + 1)
    assert!(!is_irreducible(&QPoly::from_ints(&[1, 1, 2, 1, 1])));
    // x^4 - 10x^2 + 1, the minimal polynomial of sqrt(2) + sqrt(3)
    assert!(is_irreducible(&QPoly::from_ints(&[1, 0, -10, 0, 1])));
    // (x^2 - 2)(x^2 - 3)
    assert!(!is_irreducible(&QPoly::from_ints(&[6, 0, -5, 0, 1])));
}
