use std::cmp::Ordering;
use std::fmt::Debug;

use num_bigint::BigInt;
use num_rational::BigRational;
use tracing::{event, Level};

use crate::error::{NumberFieldError, Result};

///
/// Contains [`float::Real64`] as implementation of [`ApproxRealField`]
/// based on the primitive type [`f64`].
///
pub mod float;

///
/// Contains [`bigfloat::BigFloatField`], an implementation of [`ApproxRealField`]
/// using binary floating point numbers with arbitrarily large mantissa.
///
pub mod bigfloat;

///
/// Zero-sized struct that can be used as error value to indicate that
/// the currently used [`ApproxRealField`] does not have sufficient precision
/// to perform the demanded computation.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct NotEnoughPrecision;

///
/// Trait for objects that represent approximations to the real numbers with
/// a fixed precision.
///
/// Apart from the arithmetic operations, the only way to get information out of
/// an element is by comparison, rounding or conversion to `f64`. In particular,
/// equality of elements is never checked directly, algorithms have to work with
/// explicit error bounds, e.g. relative to [`ApproxRealField::epsilon()`].
///
pub trait ApproxRealField {

    type Element: Clone + Debug;

    ///
    /// The number of bits of the mantissa of all elements.
    ///
    fn precision_bits(&self) -> u64;

    fn zero(&self) -> Self::Element;

    fn one(&self) -> Self::Element {
        self.from_int(&BigInt::from(1))
    }

    fn from_int(&self, x: &BigInt) -> Self::Element;

    fn from_rational(&self, x: &BigRational) -> Self::Element {
        self.div(&self.from_int(x.numer()), &self.from_int(x.denom()))
    }

    ///
    /// Converts the given finite floating point number into an element.
    ///
    fn from_f64(&self, x: f64) -> Self::Element;

    fn to_f64(&self, x: &Self::Element) -> f64;

    fn add(&self, lhs: &Self::Element, rhs: &Self::Element) -> Self::Element;

    fn sub(&self, lhs: &Self::Element, rhs: &Self::Element) -> Self::Element;

    fn mul(&self, lhs: &Self::Element, rhs: &Self::Element) -> Self::Element;

    ///
    /// Divides `lhs` by `rhs`. The divisor must not be zero.
    ///
    fn div(&self, lhs: &Self::Element, rhs: &Self::Element) -> Self::Element;

    fn negate(&self, x: &Self::Element) -> Self::Element;

    ///
    /// Computes (an approximation to) the unique real number `y >= 0` with `y^2 = x`.
    /// The given number must not be negative.
    ///
    fn sqrt(&self, x: &Self::Element) -> Self::Element;

    fn cmp(&self, lhs: &Self::Element, rhs: &Self::Element) -> Ordering;

    fn is_zero(&self, x: &Self::Element) -> bool;

    fn is_neg(&self, x: &Self::Element) -> bool;

    ///
    /// Returns the closest integer to the given number.
    ///
    /// If the given number is infinite or not a number, returns `None`.
    ///
    fn round_to_integer(&self, x: &Self::Element) -> Option<BigInt>;

    ///
    /// Returns the difference between one and the next larger
    /// representable number.
    ///
    fn epsilon(&self) -> Self::Element;

    fn abs(&self, x: &Self::Element) -> Self::Element {
        if self.is_neg(x) { self.negate(x) } else { x.clone() }
    }

    fn is_lt(&self, lhs: &Self::Element, rhs: &Self::Element) -> bool {
        self.cmp(lhs, rhs) == Ordering::Less
    }

    fn is_gt(&self, lhs: &Self::Element, rhs: &Self::Element) -> bool {
        self.cmp(lhs, rhs) == Ordering::Greater
    }

    fn from_i64(&self, x: i64) -> Self::Element {
        self.from_int(&BigInt::from(x))
    }

    fn mul_int(&self, x: &Self::Element, factor: &BigInt) -> Self::Element {
        self.mul(x, &self.from_int(factor))
    }

    fn square(&self, x: &Self::Element) -> Self::Element {
        self.mul(x, x)
    }

    fn sum<I>(&self, values: I) -> Self::Element
        where I: Iterator<Item = Self::Element>
    {
        values.fold(self.zero(), |acc, x| self.add(&acc, &x))
    }

    ///
    /// Computes `2^e` as element of this field.
    ///
    fn pow2(&self, e: i64) -> Self::Element {
        let power = BigInt::from(1) << (e.unsigned_abs() as usize);
        if e >= 0 {
            self.from_int(&power)
        } else {
            self.div(&self.one(), &self.from_int(&power))
        }
    }
}

///
/// Reason why a single attempt of a computation in [`run_at_precision()`] failed.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Retry {
    /// The computation should be repeated with higher precision
    NotEnoughPrecision,
    /// The computation failed independently of the precision
    Abort(NumberFieldError)
}

impl From<NotEnoughPrecision> for Retry {

    fn from(_: NotEnoughPrecision) -> Self {
        Retry::NotEnoughPrecision
    }
}

impl From<NumberFieldError> for Retry {

    fn from(err: NumberFieldError) -> Self {
        Retry::Abort(err)
    }
}

///
/// Runs the given computation with precision `start`, and repeats it with doubled
/// precision as long as it returns [`Retry::NotEnoughPrecision`]. If the precision
/// would exceed `max`, the computation fails with [`NumberFieldError::PrecisionExhausted`].
///
/// # Example
/// ```rust
/// # use feanor_number_field::rings::approx_real::*;
/// let result = run_at_precision(64, 1024, |precision| if precision < 256 {
///     Err(Retry::NotEnoughPrecision)
/// } else {
///     Ok(precision)
/// });
/// assert_eq!(Ok(256), result);
/// ```
///
pub fn run_at_precision<T, F>(start: u64, max: u64, mut f: F) -> Result<T>
    where F: FnMut(u64) -> std::result::Result<T, Retry>
{
    let mut precision = start.max(1);
    loop {
        match f(precision) {
            Ok(result) => return Ok(result),
            Err(Retry::Abort(err)) => return Err(err),
            Err(Retry::NotEnoughPrecision) => {
                if precision >= max {
                    return Err(NumberFieldError::PrecisionExhausted(max));
                }
                precision = (2 * precision).min(max);
                event!(Level::DEBUG, "increasing precision to {} bits", precision);
            }
        }
    }
}

#[cfg(test)]
use crate::tracing::LogAlgorithmSubscriber;

#[test]
fn test_run_at_precision() {
    LogAlgorithmSubscriber::init_test();
    let mut calls = Vec::new();
    let result: Result<u64> = run_at_precision(10, 100, |precision| {
        calls.push(precision);
        Err(Retry::NotEnoughPrecision)
    });
    assert_eq!(Err(NumberFieldError::PrecisionExhausted(100)), result);
    assert_eq!(vec![10, 20, 40, 80, 100], calls);

    let result: Result<u64> = run_at_precision(10, 100, |_| Err(Retry::Abort(NumberFieldError::NotGalois)));
    assert_eq!(Err(NumberFieldError::NotGalois), result);
}
