use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero, ToPrimitive};

///
/// Returns `(k, m)` such that `n = p^k * m` and `p` does not divide `m`.
///
/// `n` must be nonzero and `p` must be at least `2`.
///
pub fn valuation(n: &BigInt, p: &BigInt) -> (usize, BigInt) {
    assert!(!n.is_zero());
    assert!(p > &BigInt::one());
    let mut current = n.clone();
    let mut k = 0;
    loop {
        let (quo, rem) = current.div_rem(p);
        if !rem.is_zero() {
            return (k, current);
        }
        current = quo;
        k += 1;
    }
}

///
/// The `p`-adic valuation of a nonzero rational number.
///
pub fn rational_valuation(x: &BigRational, p: &BigInt) -> i64 {
    valuation(x.numer(), p).0 as i64 - valuation(x.denom(), p).0 as i64
}

///
/// Returns the floor of the `k`-th root of the nonnegative integer `n`.
///
pub fn root_floor(n: &BigInt, k: u32) -> BigInt {
    assert!(!n.is_negative());
    assert!(k >= 1);
    n.nth_root(k)
}

///
/// Returns `Some(sqrt(n))` if `n` is the square of an integer.
///
pub fn exact_sqrt(n: &BigInt) -> Option<BigInt> {
    if n.is_negative() {
        return None;
    }
    let root = n.sqrt();
    if &(&root * &root) == n {
        Some(root)
    } else {
        None
    }
}

///
/// If `n > 1` is a perfect power `m^k` with `k >= 2`, returns `(m, k)` for
/// the largest such `k`.
///
pub fn is_power(n: &BigInt) -> Option<(BigInt, usize)> {
    assert!(n > &BigInt::one());
    let bits = n.bits() as u32;
    for k in (2..=bits).rev() {
        let root = root_floor(n, k);
        if root > BigInt::one() && &num_traits::pow(root.clone(), k as usize) == n {
            return Some((root, k as usize));
        }
    }
    return None;
}

///
/// All primes `< bound`, by the sieve of Eratosthenes.
///
pub fn enumerate_primes(bound: u64) -> Vec<u64> {
    let bound = bound as usize;
    let mut is_composite = vec![false; bound];
    let mut result = Vec::new();
    for i in 2..bound {
        if !is_composite[i] {
            result.push(i as u64);
            let mut j = i * i;
            while j < bound {
                is_composite[j] = true;
                j += i;
            }
        }
    }
    return result;
}

///
/// Rounds the given rational number to the closest integer, rounding
/// halves away from zero.
///
pub fn round_rational(x: &BigRational) -> BigInt {
    x.round().to_integer()
}

///
/// Rounds `num / den` to the closest integer.
///
pub fn rounded_div(num: &BigInt, den: &BigInt) -> BigInt {
    round_rational(&BigRational::new(num.clone(), den.clone()))
}

///
/// Returns the representative of `x mod n` in `[0, n)`.
///
pub fn reduce_mod(x: &BigInt, n: &BigInt) -> BigInt {
    x.mod_floor(n)
}

///
/// Converts to `usize`, which is required for small quantities like degrees
/// or exponents that are computed as big integers.
///
pub fn to_usize(x: &BigInt) -> Option<usize> {
    x.to_usize()
}

///
/// The least common multiple of the denominators of the given rationals.
///
pub fn common_denominator<'a, I>(values: I) -> BigInt
    where I: IntoIterator<Item = &'a BigRational>
{
    values.into_iter().fold(BigInt::one(), |acc, x| acc.lcm(x.denom()))
}

///
/// Returns a pseudo-random integer in `[0, bound)`, drawn from the given generator.
///
pub fn random_below(rng: &mut oorandom::Rand64, bound: &BigInt) -> BigInt {
    assert!(bound.is_positive());
    let bytes = (bound.bits() as usize + 7) / 8 + 8;
    let digits = (0..bytes).map(|_| (rng.rand_u64() & 0xFF) as u8).collect::<Vec<_>>();
    return BigInt::from_bytes_le(num_bigint::Sign::Plus, &digits).mod_floor(bound);
}

#[cfg(test)]
use num_bigint::ToBigInt;

#[test]
fn test_valuation() {
    let n = BigInt::from(2 * 2 * 2 * 5 * 7);
    assert_eq!((3, BigInt::from(35)), valuation(&n, &BigInt::from(2)));
    assert_eq!((0, n.clone()), valuation(&n, &BigInt::from(3)));
    assert_eq!((1, BigInt::from(-56)), valuation(&-n, &BigInt::from(5)));
    assert_eq!(-2, rational_valuation(&BigRational::new(3.into(), 50.into()), &BigInt::from(5)));
}

#[test]
fn test_is_power() {
    assert_eq!(Some((BigInt::from(3), 4)), is_power(&BigInt::from(81)));
    assert_eq!(Some((BigInt::from(2), 10)), is_power(&BigInt::from(1024)));
    assert_eq!(None, is_power(&BigInt::from(12)));
    assert_eq!(Some(BigInt::from(1009)), exact_sqrt(&BigInt::from(1009 * 1009)));
    assert_eq!(None, exact_sqrt(&BigInt::from(20)));
    assert_eq!(None, exact_sqrt(&BigInt::from(-4)));
}

#[test]
fn test_rounding() {
    assert_eq!(BigInt::from(3), rounded_div(&BigInt::from(5), &BigInt::from(2)));
    assert_eq!(BigInt::from(-3), rounded_div(&BigInt::from(-5), &BigInt::from(2)));
    assert_eq!(BigInt::from(-1), rounded_div(&BigInt::from(-4), &BigInt::from(3)));
    assert_eq!(BigInt::from(3), reduce_mod(&BigInt::from(-4), &BigInt::from(7)));
    assert_eq!(vec![2, 3, 5, 7, 11, 13], enumerate_primes(17));
    assert_eq!(6.to_bigint().unwrap(), common_denominator(&[BigRational::new(1.into(), 2.into()), BigRational::new(1.into(), 3.into())]));
}
