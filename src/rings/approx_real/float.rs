use std::cmp::Ordering;

use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive};

use super::ApproxRealField;

///
/// An [`ApproxRealField`] based on the primitive type [`f64`].
///
/// This is used for fast heuristic computations whose results are afterwards
/// refined or verified, e.g. initial approximations to the roots of polynomials.
///
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Real64;

impl Real64 {

    pub const RING: Real64 = Real64;
}

impl ApproxRealField for Real64 {

    type Element = f64;

    fn precision_bits(&self) -> u64 {
        f64::MANTISSA_DIGITS as u64
    }

    fn zero(&self) -> f64 {
        0.
    }

    fn one(&self) -> f64 {
        1.
    }

    fn from_int(&self, x: &BigInt) -> f64 {
        x.to_f64().unwrap_or(f64::NAN)
    }

    fn from_f64(&self, x: f64) -> f64 {
        x
    }

    fn to_f64(&self, x: &f64) -> f64 {
        *x
    }

    fn add(&self, lhs: &f64, rhs: &f64) -> f64 {
        lhs + rhs
    }

    fn sub(&self, lhs: &f64, rhs: &f64) -> f64 {
        lhs - rhs
    }

    fn mul(&self, lhs: &f64, rhs: &f64) -> f64 {
        lhs * rhs
    }

    fn div(&self, lhs: &f64, rhs: &f64) -> f64 {
        lhs / rhs
    }

    fn negate(&self, x: &f64) -> f64 {
        -x
    }

    fn sqrt(&self, x: &f64) -> f64 {
        x.sqrt()
    }

    fn cmp(&self, lhs: &f64, rhs: &f64) -> Ordering {
        lhs.partial_cmp(rhs).unwrap_or(Ordering::Equal)
    }

    fn is_zero(&self, x: &f64) -> bool {
        *x == 0.
    }

    fn is_neg(&self, x: &f64) -> bool {
        *x < 0.
    }

    fn round_to_integer(&self, x: &f64) -> Option<BigInt> {
        if x.is_finite() {
            BigInt::from_f64(x.round())
        } else {
            None
        }
    }

    fn epsilon(&self) -> f64 {
        f64::EPSILON
    }
}

#[test]
fn test_round_to_integer() {
    let RR = Real64::RING;
    assert_eq!(Some(BigInt::from(3)), RR.round_to_integer(&2.5));
    assert_eq!(Some(BigInt::from(-3)), RR.round_to_integer(&-2.7));
    assert_eq!(Some(BigInt::from(1) << 70), RR.round_to_integer(&2f64.powi(70)));
    assert_eq!(None, RR.round_to_integer(&f64::INFINITY));
    assert_eq!(None, RR.round_to_integer(&f64::NAN));
}
