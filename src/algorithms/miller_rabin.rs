use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use oorandom;

use crate::integer::random_below;

const SMALL_PRIMES: [u32; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

///
/// Miller-Rabin primality test.
///
/// If n is a prime, this returns true.
/// If n is not a prime, this returns false with probability greater or
/// equal than 1 - 4^(-k). The bases are chosen by a deterministic pseudo-random
/// generator seeded from `n`, so the result is reproducible.
///
pub fn is_prime(n: &BigInt, k: usize) -> bool {
    if n <= &BigInt::one() {
        return false;
    }
    for p in SMALL_PRIMES {
        let p = BigInt::from(p);
        if n == &p {
            return true;
        }
        if n.is_multiple_of(&p) {
            return false;
        }
    }

    let n_minus_one = n - BigInt::one();
    let mut d = n_minus_one.clone();
    let mut s = 0;
    while d.is_even() {
        d >>= 1u32;
        s += 1;
    }

    let mut hasher = DefaultHasher::new();
    n.hash(&mut hasher);
    let mut rng = oorandom::Rand64::new(hasher.finish() as u128);
    let base_bound = n - BigInt::from(3);

    'test_base: for _ in 0..k {
        let a = random_below(&mut rng, &base_bound) + BigInt::from(2);
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = (&x * &x).mod_floor(n);
            if x == n_minus_one {
                continue 'test_base;
            }
        }
        return false;
    }
    return true;
}

///
/// Returns the smallest prime that is strictly larger than `n`.
///
pub fn next_prime(n: &BigInt) -> BigInt {
    let mut candidate = if n.is_negative() { BigInt::zero() } else { n.clone() } + BigInt::one();
    while !is_prime(&candidate, 10) {
        candidate += BigInt::one();
    }
    return candidate;
}

#[test]
fn test_is_prime() {
    assert!(is_prime(&BigInt::from(2), 5));
    assert!(is_prime(&BigInt::from(37), 5));
    assert!(is_prime(&BigInt::from(65537), 5));
    assert!(is_prime(&BigInt::from(1000000007), 5));
    assert!(!is_prime(&BigInt::from(1), 5));
    assert!(!is_prime(&BigInt::from(-7), 5));
    assert!(!is_prime(&BigInt::from(561), 5));
    assert!(!is_prime(&BigInt::from(1009 * 1009), 5));
    assert!(!is_prime(&(BigInt::from(32771) * BigInt::from(65537)), 5));
    let mersenne = (BigInt::one() << 127u32) - BigInt::one();
    assert!(is_prime(&mersenne, 10));
}

#[test]
fn test_next_prime() {
    assert_eq!(BigInt::from(2), next_prime(&BigInt::from(-3)));
    assert_eq!(BigInt::from(11), next_prime(&BigInt::from(7)));
    assert_eq!(BigInt::from(1009), next_prime(&BigInt::from(1000)));
}
