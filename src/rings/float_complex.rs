use crate::rings::approx_real::{ApproxRealField, NotEnoughPrecision};

///
/// A complex number, represented by its real and imaginary part.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Complex<T> {
    pub re: T,
    pub im: T
}

///
/// Approximate complex arithmetic over a given [`ApproxRealField`].
///
/// Since elements are approximations, there is no equality. Division by
/// (an approximation to) zero is reported as [`NotEnoughPrecision`].
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComplexField<R: ApproxRealField> {
    real: R
}

impl<R: ApproxRealField> ComplexField<R> {

    pub fn new(real: R) -> Self {
        ComplexField { real }
    }

    pub fn real_field(&self) -> &R {
        &self.real
    }

    pub fn zero(&self) -> Complex<R::Element> {
        Complex { re: self.real.zero(), im: self.real.zero() }
    }

    pub fn one(&self) -> Complex<R::Element> {
        Complex { re: self.real.one(), im: self.real.zero() }
    }

    pub fn from_real(&self, x: R::Element) -> Complex<R::Element> {
        Complex { re: x, im: self.real.zero() }
    }

    pub fn from_f64(&self, re: f64, im: f64) -> Complex<R::Element> {
        Complex { re: self.real.from_f64(re), im: self.real.from_f64(im) }
    }

    pub fn add(&self, lhs: &Complex<R::Element>, rhs: &Complex<R::Element>) -> Complex<R::Element> {
        Complex { re: self.real.add(&lhs.re, &rhs.re), im: self.real.add(&lhs.im, &rhs.im) }
    }

    pub fn sub(&self, lhs: &Complex<R::Element>, rhs: &Complex<R::Element>) -> Complex<R::Element> {
        Complex { re: self.real.sub(&lhs.re, &rhs.re), im: self.real.sub(&lhs.im, &rhs.im) }
    }

    pub fn negate(&self, x: &Complex<R::Element>) -> Complex<R::Element> {
        Complex { re: self.real.negate(&x.re), im: self.real.negate(&x.im) }
    }

    pub fn conjugate(&self, x: &Complex<R::Element>) -> Complex<R::Element> {
        Complex { re: x.re.clone(), im: self.real.negate(&x.im) }
    }

    pub fn mul(&self, lhs: &Complex<R::Element>, rhs: &Complex<R::Element>) -> Complex<R::Element> {
        let RR = &self.real;
        Complex {
            re: RR.sub(&RR.mul(&lhs.re, &rhs.re), &RR.mul(&lhs.im, &rhs.im)),
            im: RR.add(&RR.mul(&lhs.re, &rhs.im), &RR.mul(&lhs.im, &rhs.re))
        }
    }

    pub fn scale(&self, x: &Complex<R::Element>, factor: &R::Element) -> Complex<R::Element> {
        Complex { re: self.real.mul(&x.re, factor), im: self.real.mul(&x.im, factor) }
    }

    pub fn abs_squared(&self, x: &Complex<R::Element>) -> R::Element {
        self.real.add(&self.real.square(&x.re), &self.real.square(&x.im))
    }

    pub fn abs(&self, x: &Complex<R::Element>) -> R::Element {
        self.real.sqrt(&self.abs_squared(x))
    }

    pub fn div(&self, lhs: &Complex<R::Element>, rhs: &Complex<R::Element>) -> Result<Complex<R::Element>, NotEnoughPrecision> {
        let norm = self.abs_squared(rhs);
        if self.real.is_zero(&norm) {
            return Err(NotEnoughPrecision);
        }
        let numerator = self.mul(lhs, &self.conjugate(rhs));
        return Ok(Complex { re: self.real.div(&numerator.re, &norm), im: self.real.div(&numerator.im, &norm) });
    }

    pub fn inv(&self, x: &Complex<R::Element>) -> Result<Complex<R::Element>, NotEnoughPrecision> {
        self.div(&self.one(), x)
    }

    ///
    /// Converts an element into an element of another complex field, by going
    /// through `f64`. This is mainly used to get low-precision approximations.
    ///
    pub fn to_f64(&self, x: &Complex<R::Element>) -> (f64, f64) {
        (self.real.to_f64(&x.re), self.real.to_f64(&x.im))
    }

    ///
    /// Evaluates the polynomial with the given (real) coefficients, lowest degree first,
    /// at `z`.
    ///
    /// If `|z| > 1`, this evaluates the reversed polynomial at `1/z` instead and
    /// multiplies by `z^d`, which keeps the intermediate values small.
    ///
    pub fn evaluate_poly(&self, coeffs: &[R::Element], z: &Complex<R::Element>) -> Result<Complex<R::Element>, NotEnoughPrecision> {
        if coeffs.is_empty() {
            return Ok(self.zero());
        }
        if !self.real.is_gt(&self.abs_squared(z), &self.real.one()) {
            return Ok(self.horner(coeffs.iter().rev(), z));
        }
        let d = coeffs.len() - 1;
        let z_inv = self.inv(z)?;
        let reversed = self.horner(coeffs.iter(), &z_inv);
        return Ok(self.mul(&reversed, &self.pow(z, d)));
    }

    fn horner<'a, I>(&self, coeffs_from_top: I, z: &Complex<R::Element>) -> Complex<R::Element>
        where I: Iterator<Item = &'a R::Element>,
            R::Element: 'a
    {
        let mut result = self.zero();
        for c in coeffs_from_top {
            result = self.mul(&result, z);
            result.re = self.real.add(&result.re, c);
        }
        return result;
    }

    pub fn pow(&self, x: &Complex<R::Element>, mut e: usize) -> Complex<R::Element> {
        let mut result = self.one();
        let mut power = x.clone();
        while e > 0 {
            if e & 1 == 1 {
                result = self.mul(&result, &power);
            }
            e >>= 1;
            if e > 0 {
                power = self.mul(&power, &power);
            }
        }
        return result;
    }
}

#[cfg(test)]
use crate::rings::approx_real::float::Real64;
#[cfg(test)]
use crate::rings::approx_real::bigfloat::BigFloatField;

#[test]
fn test_mul_div() {
    let CC = ComplexField::new(Real64::RING);
    let i = CC.from_f64(0., 1.);
    let minus_one = CC.mul(&i, &i);
    assert!((minus_one.re + 1.).abs() < 1e-15 && minus_one.im.abs() < 1e-15);
    let x = CC.from_f64(3., 4.);
    assert!((CC.abs(&x) - 5.).abs() < 1e-15);
    let quotient = CC.div(&x, &i).unwrap();
    assert!((quotient.re - 4.).abs() < 1e-15 && (quotient.im + 3.).abs() < 1e-15);
    assert_eq!(Err(NotEnoughPrecision), CC.div(&x, &CC.zero()));
}

#[test]
fn test_evaluate_poly() {
    let CC = ComplexField::new(BigFloatField::new(100));
    let RR = *CC.real_field();
    // x^3 - 2x + 5
    let coeffs = [RR.from_i64(5), RR.from_i64(-2), RR.from_i64(0), RR.from_i64(1)];
    let small = CC.evaluate_poly(&coeffs, &CC.from_f64(0.5, 0.)).unwrap();
    assert!((RR.to_f64(&small.re) - 4.125).abs() < 1e-12);
    let large = CC.evaluate_poly(&coeffs, &CC.from_f64(0., 3.)).unwrap();
    // (3i)^3 - 6i + 5 = 5 - 33i
    assert!((RR.to_f64(&large.re) - 5.).abs() < 1e-12);
    assert!((RR.to_f64(&large.im) + 33.).abs() < 1e-12);
}
