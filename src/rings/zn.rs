use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

///
/// The ring `Z/nZ` for an arbitrary-size modulus `n >= 2`. Elements are
/// represented by their smallest nonnegative representative.
///
/// Most uses in this crate are with `n = p` prime or `n = p^k`, for computations
/// in residue fields of primes or during Hensel lifting.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Zn {
    modulus: BigInt
}

impl Zn {

    pub fn new(modulus: BigInt) -> Self {
        assert!(modulus > BigInt::one());
        Zn { modulus }
    }

    pub fn modulus(&self) -> &BigInt {
        &self.modulus
    }

    pub fn zero(&self) -> BigInt {
        BigInt::zero()
    }

    pub fn one(&self) -> BigInt {
        BigInt::one()
    }

    pub fn reduce(&self, x: &BigInt) -> BigInt {
        x.mod_floor(&self.modulus)
    }

    ///
    /// Maps `a/b` to `a * b^-1`, which requires `b` to be invertible modulo `n`.
    ///
    pub fn from_rational(&self, x: &BigRational) -> Option<BigInt> {
        let den_inv = self.invert(&self.reduce(x.denom()))?;
        Some(self.mul(&self.reduce(x.numer()), &den_inv))
    }

    pub fn add(&self, a: &BigInt, b: &BigInt) -> BigInt {
        let result = a + b;
        if result >= self.modulus { result - &self.modulus } else { result }
    }

    pub fn sub(&self, a: &BigInt, b: &BigInt) -> BigInt {
        let result = a - b;
        if result.is_negative() { result + &self.modulus } else { result }
    }

    pub fn negate(&self, a: &BigInt) -> BigInt {
        if a.is_zero() { BigInt::zero() } else { &self.modulus - a }
    }

    pub fn mul(&self, a: &BigInt, b: &BigInt) -> BigInt {
        (a * b).mod_floor(&self.modulus)
    }

    pub fn pow(&self, a: &BigInt, e: &BigInt) -> BigInt {
        assert!(!e.is_negative());
        a.modpow(e, &self.modulus)
    }

    ///
    /// Returns the inverse of `a`, if it is a unit.
    ///
    pub fn invert(&self, a: &BigInt) -> Option<BigInt> {
        let egcd = a.extended_gcd(&self.modulus);
        if egcd.gcd.is_one() {
            Some(self.reduce(&egcd.x))
        } else {
            None
        }
    }

    ///
    /// Returns the representative in `(-n/2, n/2]`.
    ///
    pub fn smallest_lift(&self, a: &BigInt) -> BigInt {
        let a = self.reduce(a);
        if &a + &a > self.modulus {
            a - &self.modulus
        } else {
            a
        }
    }
}

#[test]
fn test_zn_arithmetic() {
    let ring = Zn::new(BigInt::from(7));
    assert_eq!(BigInt::from(5), ring.reduce(&BigInt::from(-2)));
    assert_eq!(BigInt::from(1), ring.add(&BigInt::from(3), &BigInt::from(5)));
    assert_eq!(BigInt::from(5), ring.sub(&BigInt::from(3), &BigInt::from(5)));
    assert_eq!(BigInt::from(5), ring.invert(&BigInt::from(3)).unwrap());
    assert_eq!(BigInt::from(4), ring.from_rational(&BigRational::new(BigInt::from(1), BigInt::from(2))).unwrap());
    assert_eq!(BigInt::from(-3), ring.smallest_lift(&BigInt::from(4)));
    assert_eq!(BigInt::from(3), ring.smallest_lift(&BigInt::from(3)));
    assert_eq!(BigInt::from(1), ring.pow(&BigInt::from(3), &BigInt::from(6)));

    let ring = Zn::new(BigInt::from(9));
    assert_eq!(None, ring.invert(&BigInt::from(6)));
    assert_eq!(None, ring.from_rational(&BigRational::new(BigInt::from(1), BigInt::from(3))));
}
