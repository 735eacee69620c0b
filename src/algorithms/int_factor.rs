use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use tracing::instrument;

use crate::algorithms::miller_rabin::is_prime;
use crate::integer::{enumerate_primes, is_power};

const SMALL_PRIME_BOUND: u64 = 1000;

///
/// The result of a possibly incomplete factorization of an integer.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factorization {
    /// Prime factors with multiplicities, sorted by the prime
    pub primes: Vec<(BigInt, usize)>,
    /// The part of the input that could not be factored, or `1`
    pub cofactor: BigInt
}

impl Factorization {

    ///
    /// Returns whether the factorization is complete, i.e. there is no
    /// unfactored part.
    ///
    pub fn is_complete(&self) -> bool {
        self.cofactor.is_one()
    }
}

///
/// Pollard's rho method, with Brent's cycle detection.
///
/// `n` should be composite and not a perfect power. Returns a nontrivial
/// factor, or `None` if none was found within the given number of iterations
/// for all tried polynomials `x^2 + c`.
///
#[instrument(skip_all, level = "trace")]
fn pollard_brent(n: &BigInt, max_iterations: usize) -> Option<BigInt> {
    if n.is_even() {
        return Some(BigInt::from(2));
    }
    const BATCH: usize = 64;
    for c in 1..20u32 {
        let c = BigInt::from(c);
        let f = |x: &BigInt| (x * x + &c).mod_floor(n);
        let mut y = BigInt::from(2);
        let mut r = 1;
        let mut q = BigInt::one();
        let mut x;
        let mut ys;
        let mut g;
        let mut iterations = 0;
        loop {
            x = y.clone();
            for _ in 0..r {
                y = f(&y);
            }
            let mut k = 0;
            loop {
                ys = y.clone();
                for _ in 0..BATCH.min(r - k) {
                    y = f(&y);
                    q = (q * (&x - &y).abs()).mod_floor(n);
                }
                g = q.gcd(n);
                k += BATCH;
                if k >= r || !g.is_one() {
                    break;
                }
            }
            r *= 2;
            iterations += r;
            if !g.is_one() || iterations > max_iterations {
                break;
            }
        }
        if &g == n {
            loop {
                ys = f(&ys);
                g = (&x - &ys).abs().gcd(n);
                if !g.is_one() {
                    break;
                }
            }
        }
        if !g.is_one() && &g != n {
            return Some(g);
        }
    }
    return None;
}

fn merge_factor(result: &mut Vec<(BigInt, usize)>, p: BigInt, multiplicity: usize) {
    if let Some(entry) = result.iter_mut().find(|(q, _)| *q == p) {
        entry.1 += multiplicity;
    } else {
        result.push((p, multiplicity));
    }
}

fn factor_large(n: BigInt, multiplicity: usize, rho_iterations: Option<usize>, result: &mut Vec<(BigInt, usize)>, cofactor: &mut BigInt) {
    if n.is_one() {
        return;
    }
    if is_prime(&n, 10) {
        merge_factor(result, n, multiplicity);
        return;
    }
    if let Some((root, k)) = is_power(&n) {
        factor_large(root, multiplicity * k, rho_iterations, result, cofactor);
        return;
    }
    match pollard_brent(&n, rho_iterations.unwrap_or(usize::MAX)) {
        Some(d) => {
            let m = &n / &d;
            factor_large(d, multiplicity, rho_iterations, result, cofactor);
            factor_large(m, multiplicity, rho_iterations, result, cofactor);
        },
        None => {
            *cofactor *= num_traits::pow(n, multiplicity);
        }
    }
}

///
/// Factors the absolute value of the given nonzero integer.
///
/// If `effort` is `Some(limit)`, only trial division by primes below `limit` and a
/// bounded amount of Pollard-rho iterations are performed, and the remaining
/// part is returned as [`Factorization::cofactor`]. A cofactor that is prime
/// is still recognized as such.
///
#[instrument(skip_all, level = "trace")]
pub fn factor(n: &BigInt, effort: Option<u64>) -> Factorization {
    assert!(!n.is_zero());
    let mut n = n.abs();
    let mut result = Vec::new();
    let trial_bound = effort.map(|limit| limit.max(2)).unwrap_or(SMALL_PRIME_BOUND);
    for p in enumerate_primes(trial_bound) {
        let p = BigInt::from(p);
        let mut count = 0;
        loop {
            let (quo, rem) = n.div_rem(&p);
            if !rem.is_zero() {
                break;
            }
            n = quo;
            count += 1;
        }
        if count > 0 {
            result.push((p, count));
        }
        if n.is_one() {
            break;
        }
    }
    let mut cofactor = BigInt::one();
    let rho_iterations = effort.map(|limit| (limit as usize).saturating_mul(64));
    factor_large(n, 1, rho_iterations, &mut result, &mut cofactor);
    result.sort_by(|(p, _), (q, _)| p.cmp(q));
    return Factorization { primes: result, cofactor: cofactor };
}

#[test]
fn test_factor() {
    let f = |n: i64| factor(&BigInt::from(n), None).primes.into_iter().map(|(p, e)| (i64::try_from(p).unwrap(), e)).collect::<Vec<_>>();
    assert_eq!(vec![(3, 2), (5, 1), (29, 1)], f(3 * 3 * 5 * 29));
    assert_eq!(vec![(2, 8)], f(256));
    assert_eq!(vec![(1009, 2)], f(1009 * 1009));
    assert_eq!(Vec::<(i64, usize)>::new(), f(1));
    assert_eq!(Vec::<(i64, usize)>::new(), f(-1));
    assert_eq!(vec![(257, 1), (1009, 2)], f(257 * 1009 * 1009));
    assert_eq!(vec![(32771, 1), (65537, 1)], f(-32771 * 65537));

    let n = BigInt::from(1000003) * BigInt::from(1000033) * BigInt::from(1000037);
    let result = factor(&n, None);
    assert!(result.is_complete());
    assert_eq!(vec![(BigInt::from(1000003), 1), (BigInt::from(1000033), 1), (BigInt::from(1000037), 1)], result.primes);
}

#[test]
fn test_factor_partial() {
    let n = BigInt::from(4) * BigInt::from(1000003) * BigInt::from(1000033);
    let result = factor(&n, Some(100));
    assert_eq!(BigInt::from(2), result.primes[0].0);
    assert_eq!(2, result.primes[0].1);
    let product = result.primes.iter().fold(result.cofactor.clone(), |acc, (p, e)| acc * num_traits::pow(p.clone(), *e));
    assert_eq!(n, product);
}
