use std::cmp::max;
use std::fmt::{Display, Formatter};
use std::ops::{Add, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

///
/// A univariate polynomial over the rationals, stored as dense vector of coefficients,
/// starting with the constant coefficient.
///
/// The vector of coefficients never has trailing zeros, thus the zero polynomial
/// is represented by the empty vector and equality of polynomials is equality of
/// the coefficient vectors.
///
/// # Example
/// ```
/// # use feanor_number_field::rings::poly::dense_poly::*;
/// let f = QPoly::from_ints(&[-5, 0, 1]);
/// let g = QPoly::from_ints(&[1, 1]);
/// assert_eq!(Some(2), f.degree());
/// assert_eq!(QPoly::from_ints(&[-4]), f.div_rem(&g).1);
/// assert_eq!("x^2 - 5", format!("{}", f));
/// ```
///
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct QPoly {
    coeffs: Vec<BigRational>
}

fn int(x: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(x))
}

impl QPoly {

    pub fn zero() -> Self {
        QPoly { coeffs: Vec::new() }
    }

    pub fn one() -> Self {
        Self::constant(BigRational::one())
    }

    ///
    /// The polynomial `x`.
    ///
    pub fn indeterminate() -> Self {
        QPoly { coeffs: vec![BigRational::zero(), BigRational::one()] }
    }

    pub fn constant(c: BigRational) -> Self {
        Self::from_coeffs(vec![c])
    }

    ///
    /// Returns `c x^k`.
    ///
    pub fn monomial(c: BigRational, k: usize) -> Self {
        let mut coeffs = vec![BigRational::zero(); k];
        coeffs.push(c);
        Self::from_coeffs(coeffs)
    }

    pub fn from_coeffs(mut coeffs: Vec<BigRational>) -> Self {
        while coeffs.last().map(|c| c.is_zero()).unwrap_or(false) {
            coeffs.pop();
        }
        QPoly { coeffs }
    }

    pub fn from_bigints(coeffs: Vec<BigInt>) -> Self {
        Self::from_coeffs(coeffs.into_iter().map(BigRational::from_integer).collect())
    }

    pub fn from_ints(coeffs: &[i64]) -> Self {
        Self::from_coeffs(coeffs.iter().map(|c| int(*c)).collect())
    }

    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn is_one(&self) -> bool {
        self.coeffs.len() == 1 && self.coeffs[0].is_one()
    }

    pub fn coeffs(&self) -> &[BigRational] {
        &self.coeffs
    }

    ///
    /// Returns the coefficient of `x^i`, which is zero if `i` exceeds the degree.
    ///
    pub fn coeff(&self, i: usize) -> BigRational {
        self.coeffs.get(i).cloned().unwrap_or_else(BigRational::zero)
    }

    ///
    /// Returns the leading coefficient, or `None` for the zero polynomial.
    ///
    pub fn lc(&self) -> Option<&BigRational> {
        self.coeffs.last()
    }

    pub fn is_monic(&self) -> bool {
        self.lc().map(|c| c.is_one()).unwrap_or(false)
    }

    pub fn is_integral(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_integer())
    }

    ///
    /// Returns the coefficients as integers, if they are all integral.
    ///
    pub fn integer_coeffs(&self) -> Option<Vec<BigInt>> {
        if self.is_integral() {
            Some(self.coeffs.iter().map(|c| c.to_integer()).collect())
        } else {
            None
        }
    }

    pub fn scale(&self, c: &BigRational) -> QPoly {
        if c.is_zero() {
            return QPoly::zero();
        }
        QPoly { coeffs: self.coeffs.iter().map(|a| a * c).collect() }
    }

    ///
    /// Divides by the leading coefficient. The zero polynomial is returned unchanged.
    ///
    pub fn make_monic(&self) -> QPoly {
        match self.lc() {
            Some(lc) => self.scale(&lc.recip()),
            None => QPoly::zero()
        }
    }

    ///
    /// Writes the polynomial as `c * f` with `f` primitive integral and with positive
    /// leading coefficient, and returns `(c, f)`.
    ///
    pub fn content_and_primitive(&self) -> (BigRational, Vec<BigInt>) {
        if self.is_zero() {
            return (BigRational::zero(), Vec::new());
        }
        let den = crate::integer::common_denominator(self.coeffs.iter());
        let cleared = self.coeffs.iter().map(|c| (c * BigRational::from_integer(den.clone())).to_integer()).collect::<Vec<_>>();
        let mut content = cleared.iter().fold(BigInt::zero(), |acc, c| acc.gcd(c));
        if cleared.last().map(|c| c.is_negative()).unwrap_or(false) {
            content = -content;
        }
        let primitive = cleared.iter().map(|c| c / &content).collect();
        return (BigRational::new(content, den), primitive);
    }

    pub fn derivative(&self) -> QPoly {
        QPoly::from_coeffs(self.coeffs.iter().enumerate().skip(1).map(|(i, c)| c * int(i as i64)).collect())
    }

    pub fn evaluate(&self, x: &BigRational) -> BigRational {
        let mut result = BigRational::zero();
        for c in self.coeffs.iter().rev() {
            result = result * x + c;
        }
        return result;
    }

    ///
    /// Computes `self(g)`.
    ///
    pub fn compose(&self, g: &QPoly) -> QPoly {
        let mut result = QPoly::zero();
        for c in self.coeffs.iter().rev() {
            result = &(&result * g) + &QPoly::constant(c.clone());
        }
        return result;
    }

    ///
    /// Computes `self(g) mod modulus`.
    ///
    pub fn compose_mod(&self, g: &QPoly, modulus: &QPoly) -> QPoly {
        let g = g.rem(modulus);
        let mut result = QPoly::zero();
        for c in self.coeffs.iter().rev() {
            result = (&(&result * &g) + &QPoly::constant(c.clone())).rem(modulus);
        }
        return result;
    }

    ///
    /// Computes `self(c x)`.
    ///
    pub fn scale_variable(&self, c: &BigRational) -> QPoly {
        let mut power = BigRational::one();
        let mut coeffs = Vec::with_capacity(self.coeffs.len());
        for a in &self.coeffs {
            coeffs.push(a * &power);
            power = power * c;
        }
        return QPoly::from_coeffs(coeffs);
    }

    ///
    /// Computes `self(-x)`.
    ///
    pub fn negate_variable(&self) -> QPoly {
        self.scale_variable(&int(-1))
    }

    ///
    /// Polynomial division with remainder. Panics if `rhs` is zero.
    ///
    pub fn div_rem(&self, rhs: &QPoly) -> (QPoly, QPoly) {
        let d = rhs.degree().expect("division by zero polynomial");
        let lc_inv = rhs.coeffs[d].recip();
        let mut rem = self.coeffs.clone();
        if rem.len() <= d {
            return (QPoly::zero(), self.clone());
        }
        let mut quo = vec![BigRational::zero(); rem.len() - d];
        for i in (0..quo.len()).rev() {
            let factor = &rem[i + d] * &lc_inv;
            if factor.is_zero() {
                continue;
            }
            for j in 0..=d {
                rem[i + j] = &rem[i + j] - &factor * &rhs.coeffs[j];
            }
            quo[i] = factor;
        }
        rem.truncate(d);
        return (QPoly::from_coeffs(quo), QPoly::from_coeffs(rem));
    }

    pub fn rem(&self, rhs: &QPoly) -> QPoly {
        if self.degree() < rhs.degree() {
            return self.clone();
        }
        self.div_rem(rhs).1
    }

    ///
    /// Returns the quotient if `rhs` divides `self`.
    ///
    pub fn checked_div(&self, rhs: &QPoly) -> Option<QPoly> {
        let (quo, rem) = self.div_rem(rhs);
        if rem.is_zero() {
            Some(quo)
        } else {
            None
        }
    }

    pub fn mul_mod(&self, rhs: &QPoly, modulus: &QPoly) -> QPoly {
        (self * rhs).rem(modulus)
    }

    pub fn pow_mod(&self, mut e: u64, modulus: &QPoly) -> QPoly {
        let mut result = QPoly::one().rem(modulus);
        let mut base = self.rem(modulus);
        while e > 0 {
            if e & 1 == 1 {
                result = result.mul_mod(&base, modulus);
            }
            base = base.mul_mod(&base, modulus);
            e >>= 1;
        }
        return result;
    }

    ///
    /// The monic greatest common divisor, or zero if both inputs are zero.
    ///
    pub fn gcd(&self, rhs: &QPoly) -> QPoly {
        let mut a = self.clone();
        let mut b = rhs.clone();
        while !b.is_zero() {
            let r = a.rem(&b);
            a = b;
            b = r;
        }
        return a.make_monic();
    }

    ///
    /// Returns `(g, s, t)` with `g = s * self + t * rhs` monic and the gcd of both.
    ///
    pub fn extended_gcd(&self, rhs: &QPoly) -> (QPoly, QPoly, QPoly) {
        let (mut a, mut b) = (self.clone(), rhs.clone());
        let (mut sa, mut ta) = (QPoly::one(), QPoly::zero());
        let (mut sb, mut tb) = (QPoly::zero(), QPoly::one());
        while !b.is_zero() {
            let (q, r) = a.div_rem(&b);
            let sr = &sa - &(&q * &sb);
            let tr = &ta - &(&q * &tb);
            a = std::mem::replace(&mut b, r);
            sa = std::mem::replace(&mut sb, sr);
            ta = std::mem::replace(&mut tb, tr);
        }
        match a.lc().cloned() {
            Some(lc) => {
                let inv = lc.recip();
                (a.scale(&inv), sa.scale(&inv), ta.scale(&inv))
            },
            None => (a, sa, ta)
        }
    }

    ///
    /// Returns the inverse of `self` modulo `modulus`, if it exists.
    ///
    pub fn invert_mod(&self, modulus: &QPoly) -> Option<QPoly> {
        let (g, s, _) = self.rem(modulus).extended_gcd(modulus);
        if g.is_one() {
            Some(s.rem(modulus))
        } else {
            None
        }
    }

    ///
    /// Returns `self / gcd(self, self')`, which has the same roots as `self`, but
    /// each with multiplicity one.
    ///
    pub fn squarefree_part(&self) -> QPoly {
        let g = self.gcd(&self.derivative());
        self.div_rem(&g).0.make_monic()
    }

    pub fn is_squarefree(&self) -> bool {
        self.gcd(&self.derivative()).degree() == Some(0)
    }

    ///
    /// The power sums `s_k = sum_i r_i^k` of the roots `r_i` of the polynomial, for
    /// `k = 0, ..., count - 1`, computed by Newton's identities.
    ///
    pub fn newton_power_sums(&self, count: usize) -> Vec<BigRational> {
        let n = self.degree().expect("zero polynomial has no roots");
        let f = self.make_monic();
        // with f = x^n + a_(n-1) x^(n-1) + ... + a_0, we use
        // s_k = -k a_(n-k) - sum_(i = 1)^(k - 1) a_(n-i) s_(k-i) for k <= n, and
        // s_k = -sum_(i = 1)^n a_(n-i) s_(k-i) for k > n
        let mut sums = Vec::with_capacity(count);
        for k in 0..count {
            if k == 0 {
                sums.push(int(n as i64));
                continue;
            }
            let mut s = if k <= n { -(f.coeff(n - k) * int(k as i64)) } else { BigRational::zero() };
            for i in 1..=k.min(n) {
                if i == k {
                    break;
                }
                s -= f.coeff(n - i) * &sums[k - i];
            }
            sums.push(s);
        }
        return sums;
    }

    ///
    /// Returns the monic polynomial with the given power sums of its roots, i.e.
    /// the inverse of [`QPoly::newton_power_sums()`]. `sums` must contain `s_0, ..., s_n`.
    ///
    pub fn from_power_sums(sums: &[BigRational]) -> QPoly {
        let n = sums.len() - 1;
        // e_k = (1/k) sum_(i = 1)^k (-1)^(i - 1) e_(k - i) s_i
        let mut e = vec![BigRational::one()];
        for k in 1..=n {
            let mut value = BigRational::zero();
            for i in 1..=k {
                let term = &e[k - i] * &sums[i];
                if i % 2 == 1 {
                    value += term;
                } else {
                    value -= term;
                }
            }
            e.push(value / int(k as i64));
        }
        let mut coeffs = vec![BigRational::zero(); n + 1];
        for k in 0..=n {
            coeffs[n - k] = if k % 2 == 0 { e[k].clone() } else { -e[k].clone() };
        }
        return QPoly::from_coeffs(coeffs);
    }

    ///
    /// The maximum of the absolute values of the coefficients.
    ///
    pub fn max_abs_coeff(&self) -> BigRational {
        self.coeffs.iter().map(|c| c.abs()).max().unwrap_or_else(BigRational::zero)
    }
}

impl<'a, 'b> Add<&'b QPoly> for &'a QPoly {
    type Output = QPoly;

    fn add(self, rhs: &'b QPoly) -> QPoly {
        let len = max(self.coeffs.len(), rhs.coeffs.len());
        QPoly::from_coeffs((0..len).map(|i| self.coeff(i) + rhs.coeff(i)).collect())
    }
}

impl<'a, 'b> Sub<&'b QPoly> for &'a QPoly {
    type Output = QPoly;

    fn sub(self, rhs: &'b QPoly) -> QPoly {
        let len = max(self.coeffs.len(), rhs.coeffs.len());
        QPoly::from_coeffs((0..len).map(|i| self.coeff(i) - rhs.coeff(i)).collect())
    }
}

impl<'a, 'b> Mul<&'b QPoly> for &'a QPoly {
    type Output = QPoly;

    fn mul(self, rhs: &'b QPoly) -> QPoly {
        if self.is_zero() || rhs.is_zero() {
            return QPoly::zero();
        }
        let mut coeffs = vec![BigRational::zero(); self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in rhs.coeffs.iter().enumerate() {
                coeffs[i + j] += a * b;
            }
        }
        QPoly::from_coeffs(coeffs)
    }
}

impl<'a> Neg for &'a QPoly {
    type Output = QPoly;

    fn neg(self) -> QPoly {
        QPoly { coeffs: self.coeffs.iter().map(|c| -c).collect() }
    }
}

impl Display for QPoly {

    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let mut first = true;
        for i in (0..self.coeffs.len()).rev() {
            let c = &self.coeffs[i];
            if c.is_zero() {
                continue;
            }
            let abs = c.abs();
            if first {
                if c.is_negative() {
                    write!(f, "-")?;
                }
            } else if c.is_negative() {
                write!(f, " - ")?;
            } else {
                write!(f, " + ")?;
            }
            first = false;
            if !abs.is_one() || i == 0 {
                write!(f, "{}", abs)?;
            }
            match i {
                0 => {},
                1 => write!(f, "x")?,
                _ => write!(f, "x^{}", i)?
            }
        }
        Ok(())
    }
}

#[cfg(test)]
fn rat(num: i64, den: i64) -> BigRational {
    BigRational::new(BigInt::from(num), BigInt::from(den))
}

#[test]
fn test_div_rem() {
    let f = QPoly::from_ints(&[1, 0, 3, 2]);
    let g = QPoly::from_ints(&[1, 2]);
    let (q, r) = f.div_rem(&g);
    assert_eq!(f, &(&q * &g) + &r);
    assert!(r.degree().unwrap_or(0) < 1);
    assert_eq!(QPoly::from_ints(&[-1, 1]), QPoly::from_ints(&[-1, 0, 1]).checked_div(&QPoly::from_ints(&[1, 1])).unwrap());
    assert_eq!(None, QPoly::from_ints(&[-1, 0, 1]).checked_div(&QPoly::from_ints(&[2, 1])));
}

#[test]
fn test_gcd() {
    let a = &QPoly::from_ints(&[-1, 1]) * &QPoly::from_ints(&[2, 0, 1]);
    let b = &QPoly::from_ints(&[-1, 1]) * &QPoly::from_ints(&[3, 1]);
    assert_eq!(QPoly::from_ints(&[-1, 1]), a.gcd(&b));
    let (g, s, t) = a.extended_gcd(&b);
    assert_eq!(g, &(&s * &a) + &(&t * &b));
    assert!(!(&a * &a).is_squarefree());
    assert_eq!(a, (&a * &a).squarefree_part());
}

#[test]
fn test_invert_mod() {
    let modulus = QPoly::from_ints(&[-2, 0, 0, 1]);
    let x = QPoly::indeterminate();
    let inv = x.invert_mod(&modulus).unwrap();
    assert_eq!(QPoly::monomial(rat(1, 2), 2), inv);
    assert!(x.mul_mod(&inv, &modulus).is_one());
    assert_eq!(None, QPoly::from_ints(&[-1, 1]).invert_mod(&QPoly::from_ints(&[-1, 0, 1])));
}

#[test]
fn test_power_sums() {
    // roots 1, 2, 3
    let f = &(&QPoly::from_ints(&[-1, 1]) * &QPoly::from_ints(&[-2, 1])) * &QPoly::from_ints(&[-3, 1]);
    let sums = f.newton_power_sums(5);
    assert_eq!(vec![int(3), int(6), int(14), int(36), int(98)], sums);
    assert_eq!(f, QPoly::from_power_sums(&sums[..4]));
}

#[test]
fn test_compose_and_scale() {
    let f = QPoly::from_ints(&[-5, 0, 1]);
    let g = QPoly::from_ints(&[1, 2]);
    assert_eq!(QPoly::from_ints(&[-4, 4, 4]), f.compose(&g));
    assert_eq!(QPoly::from_ints(&[-5, 0, 4]), f.scale_variable(&int(2)));
    assert_eq!(QPoly::from_ints(&[1, 1, 1]), QPoly::from_ints(&[1, -1, 1]).negate_variable());
    let (content, primitive) = QPoly::from_coeffs(vec![rat(-1, 2), rat(0, 1), rat(-3, 4)]).content_and_primitive();
    assert_eq!(rat(-1, 4), content);
    assert_eq!(vec![BigInt::from(2), BigInt::from(0), BigInt::from(3)], primitive);
}

#[test]
fn test_display() {
    assert_eq!("x^2 - x - 1", format!("{}", QPoly::from_ints(&[-1, -1, 1])));
    assert_eq!("-x^3 + 2x + 1/2", format!("{}", QPoly::from_coeffs(vec![rat(1, 2), int(2), int(0), int(-1)])));
    assert_eq!("0", format!("{}", QPoly::zero()));
}
