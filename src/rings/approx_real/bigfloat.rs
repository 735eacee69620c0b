use std::cmp::Ordering;

use num_bigint::{BigInt, Sign};
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::ApproxRealField;

///
/// A binary floating point number `mantissa * 2^exponent`.
///
/// Elements are only meaningful together with the [`BigFloatField`] that
/// produced them, which determines the number of bits of the mantissa.
///
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BigFloat {
    mantissa: BigInt,
    exponent: i64
}

impl BigFloat {

    pub fn mantissa(&self) -> &BigInt {
        &self.mantissa
    }

    pub fn exponent(&self) -> i64 {
        self.exponent
    }

    ///
    /// Returns `e` such that `2^(e - 1) <= |self| < 2^e`, or `None` if `self` is zero.
    ///
    pub fn log2_ceil(&self) -> Option<i64> {
        if self.mantissa.is_zero() {
            None
        } else {
            Some(self.mantissa.bits() as i64 + self.exponent)
        }
    }
}

impl std::fmt::Display for BigFloat {

    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} * 2^{}", self.mantissa, self.exponent)
    }
}

///
/// An [`ApproxRealField`] whose elements are binary floating point numbers
/// with a mantissa of the given number of bits. All operations round to the
/// nearest representable value.
///
/// # Example
/// ```rust
/// # use feanor_number_field::rings::approx_real::*;
/// # use feanor_number_field::rings::approx_real::bigfloat::*;
/// # use num_bigint::BigInt;
/// let RR = BigFloatField::new(200);
/// let two = RR.from_i64(2);
/// let sqrt2 = RR.sqrt(&two);
/// let error = RR.abs(&RR.sub(&RR.mul(&sqrt2, &sqrt2), &two));
/// assert!(RR.is_lt(&error, &RR.pow2(-190)));
/// assert_eq!(Some(BigInt::from(1414213562)), RR.round_to_integer(&RR.mul_int(&sqrt2, &BigInt::from(1000000000))));
/// ```
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BigFloatField {
    precision: u64
}

impl BigFloatField {

    pub fn new(precision: u64) -> Self {
        assert!(precision >= 8);
        BigFloatField { precision }
    }

    fn normalize(&self, mut mantissa: BigInt, mut exponent: i64) -> BigFloat {
        if mantissa.is_zero() {
            return BigFloat { mantissa, exponent: 0 };
        }
        let bits = mantissa.bits();
        if bits > self.precision {
            let shift = bits - self.precision;
            mantissa = rounded_shift(&mantissa, shift);
            exponent += shift as i64;
        }
        return BigFloat { mantissa, exponent };
    }

    ///
    /// Rounds a value, possibly computed in a field with a different precision,
    /// to the precision of this field.
    ///
    pub fn round(&self, x: &BigFloat) -> BigFloat {
        self.normalize(x.mantissa.clone(), x.exponent)
    }
}

///
/// Computes `round(x / 2^shift)` for `shift > 0`, rounding halves up.
///
fn rounded_shift(x: &BigInt, shift: u64) -> BigInt {
    debug_assert!(shift > 0);
    (x + (BigInt::one() << ((shift - 1) as usize))) >> (shift as usize)
}

impl ApproxRealField for BigFloatField {

    type Element = BigFloat;

    fn precision_bits(&self) -> u64 {
        self.precision
    }

    fn zero(&self) -> BigFloat {
        BigFloat { mantissa: BigInt::zero(), exponent: 0 }
    }

    fn from_int(&self, x: &BigInt) -> BigFloat {
        self.normalize(x.clone(), 0)
    }

    fn from_f64(&self, x: f64) -> BigFloat {
        assert!(x.is_finite());
        if x == 0. {
            return self.zero();
        }
        let bits = x.to_bits();
        let negative = bits >> 63 == 1;
        let biased_exponent = ((bits >> 52) & 0x7ff) as i64;
        let fraction = bits & ((1u64 << 52) - 1);
        let (mantissa, exponent) = if biased_exponent == 0 {
            (fraction, -1074)
        } else {
            (fraction | (1u64 << 52), biased_exponent - 1075)
        };
        let mantissa = if negative { -BigInt::from(mantissa) } else { BigInt::from(mantissa) };
        self.normalize(mantissa, exponent)
    }

    fn to_f64(&self, x: &BigFloat) -> f64 {
        if x.mantissa.is_zero() {
            return 0.;
        }
        let bits = x.mantissa.bits();
        let (mantissa, exponent) = if bits > 60 {
            (&x.mantissa >> ((bits - 60) as usize), x.exponent + (bits - 60) as i64)
        } else {
            (x.mantissa.clone(), x.exponent)
        };
        let exponent = exponent.clamp(-2200, 2200) as i32;
        let value = mantissa.to_f64().unwrap_or(f64::NAN);
        value * 2f64.powi(exponent / 2) * 2f64.powi(exponent - exponent / 2)
    }

    fn add(&self, lhs: &BigFloat, rhs: &BigFloat) -> BigFloat {
        if lhs.mantissa.is_zero() {
            return rhs.clone();
        } else if rhs.mantissa.is_zero() {
            return lhs.clone();
        }
        let lhs_top = lhs.mantissa.bits() as i64 + lhs.exponent;
        let rhs_top = rhs.mantissa.bits() as i64 + rhs.exponent;
        // the smaller summand does not influence the rounded result
        if lhs_top > rhs_top + self.precision as i64 + 2 {
            return lhs.clone();
        } else if rhs_top > lhs_top + self.precision as i64 + 2 {
            return rhs.clone();
        }
        let exponent = lhs.exponent.min(rhs.exponent);
        let mantissa = (&lhs.mantissa << ((lhs.exponent - exponent) as usize)) + (&rhs.mantissa << ((rhs.exponent - exponent) as usize));
        self.normalize(mantissa, exponent)
    }

    fn sub(&self, lhs: &BigFloat, rhs: &BigFloat) -> BigFloat {
        self.add(lhs, &self.negate(rhs))
    }

    fn mul(&self, lhs: &BigFloat, rhs: &BigFloat) -> BigFloat {
        self.normalize(&lhs.mantissa * &rhs.mantissa, lhs.exponent + rhs.exponent)
    }

    fn div(&self, lhs: &BigFloat, rhs: &BigFloat) -> BigFloat {
        assert!(!rhs.mantissa.is_zero(), "division by zero");
        if lhs.mantissa.is_zero() {
            return self.zero();
        }
        let shift = (self.precision as i64 + rhs.mantissa.bits() as i64 - lhs.mantissa.bits() as i64 + 2).max(0);
        let mantissa = (&lhs.mantissa << (shift as usize)) / &rhs.mantissa;
        self.normalize(mantissa, lhs.exponent - rhs.exponent - shift)
    }

    fn negate(&self, x: &BigFloat) -> BigFloat {
        BigFloat { mantissa: -&x.mantissa, exponent: x.exponent }
    }

    fn sqrt(&self, x: &BigFloat) -> BigFloat {
        assert!(!x.mantissa.is_negative(), "square root of negative number");
        if x.mantissa.is_zero() {
            return self.zero();
        }
        let mut shift = (2 * self.precision as i64 + 2 - x.mantissa.bits() as i64).max(0);
        if (x.exponent - shift).rem_euclid(2) == 1 {
            shift += 1;
        }
        let mantissa = (&x.mantissa << (shift as usize)).sqrt();
        self.normalize(mantissa, (x.exponent - shift) / 2)
    }

    fn cmp(&self, lhs: &BigFloat, rhs: &BigFloat) -> Ordering {
        let difference = self.sub(lhs, rhs);
        match difference.mantissa.sign() {
            Sign::Minus => Ordering::Less,
            Sign::NoSign => Ordering::Equal,
            Sign::Plus => Ordering::Greater
        }
    }

    fn is_zero(&self, x: &BigFloat) -> bool {
        x.mantissa.is_zero()
    }

    fn is_neg(&self, x: &BigFloat) -> bool {
        x.mantissa.is_negative()
    }

    fn round_to_integer(&self, x: &BigFloat) -> Option<BigInt> {
        if x.exponent >= 0 {
            return Some(&x.mantissa << (x.exponent as usize));
        }
        let shift = x.exponent.unsigned_abs();
        if shift > x.mantissa.bits() + 1 {
            return Some(BigInt::zero());
        }
        return Some(rounded_shift(&x.mantissa, shift));
    }

    fn epsilon(&self) -> BigFloat {
        BigFloat { mantissa: BigInt::one(), exponent: 1 - self.precision as i64 }
    }

    fn pow2(&self, e: i64) -> BigFloat {
        BigFloat { mantissa: BigInt::one(), exponent: e }
    }
}

#[cfg(test)]
use num_rational::BigRational;

#[test]
fn test_arithmetic() {
    let RR = BigFloatField::new(100);
    let third = RR.from_rational(&BigRational::new(BigInt::from(1), BigInt::from(3)));
    let one = RR.mul_int(&third, &BigInt::from(3));
    assert!(RR.is_lt(&RR.abs(&RR.sub(&one, &RR.one())), &RR.pow2(-95)));
    assert_eq!(Some(BigInt::from(0)), RR.round_to_integer(&third));
    assert_eq!(Some(BigInt::from(-1)), RR.round_to_integer(&RR.negate(&RR.add(&third, &third))));

    let big = RR.pow2(200);
    let sum = RR.add(&big, &RR.one());
    assert_eq!(Ordering::Equal, RR.cmp(&sum, &big));
    let small_precision = BigFloatField::new(300);
    let sum = small_precision.add(&big, &small_precision.one());
    assert_eq!(Ordering::Greater, small_precision.cmp(&sum, &big));
}

#[test]
fn test_f64_conversion() {
    let RR = BigFloatField::new(64);
    for x in [1.5, -0.1, 3.0e100, -7.25e-200, 123456789.0] {
        assert_eq!(x, RR.to_f64(&RR.from_f64(x)));
    }
    assert_eq!(0., RR.to_f64(&RR.zero()));
}

#[test]
fn test_sqrt() {
    let RR = BigFloatField::new(128);
    let x = RR.from_i64(1 << 40);
    assert_eq!(Some(BigInt::from(1 << 20)), RR.round_to_integer(&RR.sqrt(&x)));
    let y = RR.sqrt(&RR.pow2(-41));
    let expected = RR.div(&RR.pow2(-20), &RR.sqrt(&RR.from_i64(2)));
    assert!(RR.is_lt(&RR.abs(&RR.sub(&y, &expected)), &RR.pow2(-140)));
}
