use num_bigint::BigInt;
use num_traits::{One, Zero};

use crate::rings::poly::dense_poly::QPoly;
use crate::rings::zn::Zn;

///
/// A polynomial over `Z/nZ`, as vector of coefficients starting with the constant
/// coefficient, without trailing zeros.
///
pub type ZnPoly = Vec<BigInt>;

///
/// The ring `(Z/nZ)[X]`. Elements are [`ZnPoly`]s, which are normalized by all
/// operations of this ring.
///
/// Division is only supported by polynomials whose leading coefficient is a unit,
/// thus if `n` is not a prime, the Euclidean algorithm ([`ZnPolyRing::gcd()`] and friends)
/// may panic.
///
#[derive(Clone, Debug)]
pub struct ZnPolyRing {
    base: Zn
}

impl ZnPolyRing {

    pub fn new(base: Zn) -> Self {
        ZnPolyRing { base }
    }

    pub fn base_ring(&self) -> &Zn {
        &self.base
    }

    pub fn modulus(&self) -> &BigInt {
        self.base.modulus()
    }

    fn normalize(&self, mut f: ZnPoly) -> ZnPoly {
        while f.last().map(|c| c.is_zero()).unwrap_or(false) {
            f.pop();
        }
        f
    }

    pub fn zero(&self) -> ZnPoly {
        Vec::new()
    }

    pub fn one(&self) -> ZnPoly {
        vec![BigInt::one()]
    }

    pub fn indeterminate(&self) -> ZnPoly {
        vec![BigInt::zero(), BigInt::one()]
    }

    pub fn from_coeffs(&self, coeffs: &[BigInt]) -> ZnPoly {
        self.normalize(coeffs.iter().map(|c| self.base.reduce(c)).collect())
    }

    ///
    /// Reduces a polynomial with rational coefficients, which requires all
    /// denominators to be units.
    ///
    pub fn from_qpoly(&self, f: &QPoly) -> Option<ZnPoly> {
        let coeffs = f.coeffs().iter().map(|c| self.base.from_rational(c)).collect::<Option<Vec<_>>>()?;
        Some(self.normalize(coeffs))
    }

    ///
    /// Lifts to an integer polynomial, with coefficients in `(-n/2, n/2]`.
    ///
    pub fn lift_centered(&self, f: &ZnPoly) -> QPoly {
        QPoly::from_bigints(f.iter().map(|c| self.base.smallest_lift(c)).collect())
    }

    pub fn degree(&self, f: &ZnPoly) -> Option<usize> {
        f.len().checked_sub(1)
    }

    pub fn is_zero(&self, f: &ZnPoly) -> bool {
        f.is_empty()
    }

    pub fn is_one(&self, f: &ZnPoly) -> bool {
        f.len() == 1 && f[0].is_one()
    }

    pub fn coeff(&self, f: &ZnPoly, i: usize) -> BigInt {
        f.get(i).cloned().unwrap_or_else(BigInt::zero)
    }

    pub fn add(&self, f: &ZnPoly, g: &ZnPoly) -> ZnPoly {
        let len = f.len().max(g.len());
        self.normalize((0..len).map(|i| self.base.add(&self.coeff(f, i), &self.coeff(g, i))).collect())
    }

    pub fn sub(&self, f: &ZnPoly, g: &ZnPoly) -> ZnPoly {
        let len = f.len().max(g.len());
        self.normalize((0..len).map(|i| self.base.sub(&self.coeff(f, i), &self.coeff(g, i))).collect())
    }

    pub fn scale(&self, f: &ZnPoly, c: &BigInt) -> ZnPoly {
        self.normalize(f.iter().map(|a| self.base.mul(a, c)).collect())
    }

    pub fn mul(&self, f: &ZnPoly, g: &ZnPoly) -> ZnPoly {
        if f.is_empty() || g.is_empty() {
            return Vec::new();
        }
        let mut result = vec![BigInt::zero(); f.len() + g.len() - 1];
        for (i, a) in f.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in g.iter().enumerate() {
                result[i + j] += a * b;
            }
        }
        self.normalize(result.iter().map(|c| self.base.reduce(c)).collect())
    }

    ///
    /// Polynomial division with remainder. The leading coefficient of `g` must be a unit.
    ///
    pub fn div_rem(&self, f: &ZnPoly, g: &ZnPoly) -> (ZnPoly, ZnPoly) {
        let d = self.degree(g).expect("division by zero polynomial");
        let lc_inv = self.base.invert(&g[d]).expect("leading coefficient is not a unit");
        if f.len() <= d {
            return (Vec::new(), f.clone());
        }
        let mut rem = f.clone();
        let mut quo = vec![BigInt::zero(); f.len() - d];
        for i in (0..quo.len()).rev() {
            let factor = self.base.mul(&rem[i + d], &lc_inv);
            if factor.is_zero() {
                continue;
            }
            for j in 0..=d {
                rem[i + j] = self.base.sub(&rem[i + j], &self.base.mul(&factor, &g[j]));
            }
            quo[i] = factor;
        }
        rem.truncate(d);
        return (self.normalize(quo), self.normalize(rem));
    }

    pub fn rem(&self, f: &ZnPoly, g: &ZnPoly) -> ZnPoly {
        if f.len() < g.len() {
            return f.clone();
        }
        self.div_rem(f, g).1
    }

    pub fn mul_mod(&self, f: &ZnPoly, g: &ZnPoly, modulus: &ZnPoly) -> ZnPoly {
        self.rem(&self.mul(f, g), modulus)
    }

    ///
    /// Computes `f^e mod modulus` by square-and-multiply.
    ///
    pub fn pow_mod(&self, f: &ZnPoly, e: &BigInt, modulus: &ZnPoly) -> ZnPoly {
        let mut result = self.rem(&self.one(), modulus);
        let base = self.rem(f, modulus);
        for i in (0..e.bits()).rev() {
            result = self.mul_mod(&result, &result, modulus);
            if e.bit(i) {
                result = self.mul_mod(&result, &base, modulus);
            }
        }
        return result;
    }

    pub fn derivative(&self, f: &ZnPoly) -> ZnPoly {
        self.normalize(f.iter().enumerate().skip(1).map(|(i, c)| self.base.mul(c, &BigInt::from(i))).collect())
    }

    pub fn make_monic(&self, f: &ZnPoly) -> ZnPoly {
        match f.last() {
            Some(lc) => {
                let inv = self.base.invert(lc).expect("leading coefficient is not a unit");
                self.scale(f, &inv)
            },
            None => Vec::new()
        }
    }

    ///
    /// The monic gcd. Requires the modulus to be prime.
    ///
    pub fn gcd(&self, f: &ZnPoly, g: &ZnPoly) -> ZnPoly {
        let mut a = f.clone();
        let mut b = g.clone();
        while !b.is_empty() {
            let r = self.rem(&a, &b);
            a = b;
            b = r;
        }
        return self.make_monic(&a);
    }

    ///
    /// Returns `(d, s, t)` with `d = s f + t g` the monic gcd. Requires the modulus
    /// to be prime.
    ///
    pub fn extended_gcd(&self, f: &ZnPoly, g: &ZnPoly) -> (ZnPoly, ZnPoly, ZnPoly) {
        let (mut a, mut b) = (f.clone(), g.clone());
        let (mut sa, mut ta) = (self.one(), self.zero());
        let (mut sb, mut tb) = (self.zero(), self.one());
        while !b.is_empty() {
            let (q, r) = self.div_rem(&a, &b);
            let sr = self.sub(&sa, &self.mul(&q, &sb));
            let tr = self.sub(&ta, &self.mul(&q, &tb));
            a = std::mem::replace(&mut b, r);
            sa = std::mem::replace(&mut sb, sr);
            ta = std::mem::replace(&mut tb, tr);
        }
        match a.last().cloned() {
            Some(lc) => {
                let inv = self.base.invert(&lc).expect("leading coefficient is not a unit");
                (self.scale(&a, &inv), self.scale(&sa, &inv), self.scale(&ta, &inv))
            },
            None => (a, sa, ta)
        }
    }

    ///
    /// Evaluates `f(g) mod modulus`.
    ///
    pub fn compose_mod(&self, f: &ZnPoly, g: &ZnPoly, modulus: &ZnPoly) -> ZnPoly {
        let mut result = self.zero();
        for c in f.iter().rev() {
            result = self.add(&self.mul_mod(&result, g, modulus), &self.from_coeffs(std::slice::from_ref(c)));
        }
        return result;
    }
}

#[cfg(test)]
fn ints(values: &[i64]) -> Vec<BigInt> {
    values.iter().map(|x| BigInt::from(*x)).collect()
}

#[test]
fn test_div_rem() {
    let ring = ZnPolyRing::new(Zn::new(BigInt::from(7)));
    let f = ring.from_coeffs(&ints(&[1, 2, 3, 4]));
    let g = ring.from_coeffs(&ints(&[3, 2]));
    let (q, r) = ring.div_rem(&f, &g);
    assert_eq!(f, ring.add(&ring.mul(&q, &g), &r));
    assert!(ring.degree(&r).unwrap_or(0) == 0);
}

#[test]
fn test_gcd() {
    let ring = ZnPolyRing::new(Zn::new(BigInt::from(5)));
    // (x - 1)(x - 2) and (x - 1)(x + 1)
    let f = ring.from_coeffs(&ints(&[2, -3, 1]));
    let g = ring.from_coeffs(&ints(&[-1, 0, 1]));
    assert_eq!(ring.from_coeffs(&ints(&[-1, 1])), ring.gcd(&f, &g));
    let (d, s, t) = ring.extended_gcd(&f, &g);
    assert_eq!(d, ring.add(&ring.mul(&s, &f), &ring.mul(&t, &g)));
}

#[test]
fn test_pow_mod() {
    let ring = ZnPolyRing::new(Zn::new(BigInt::from(2)));
    let modulus = ring.from_coeffs(&ints(&[1, 1, 0, 1]));
    let x = ring.indeterminate();
    // x^(2^3) = x in F_8 = F_2[x]/(x^3 + x + 1)
    assert_eq!(x, ring.pow_mod(&x, &BigInt::from(8), &modulus));
    assert_eq!(ring.one(), ring.pow_mod(&x, &BigInt::from(7), &modulus));
    assert_eq!(ring.one(), ring.pow_mod(&x, &BigInt::from(0), &modulus));
}

#[test]
fn test_lift_centered() {
    let ring = ZnPolyRing::new(Zn::new(BigInt::from(25)));
    let f = ring.from_coeffs(&ints(&[-1, 12, 1]));
    assert_eq!(QPoly::from_ints(&[-1, 12, 1]), ring.lift_centered(&f));
    assert_eq!(QPoly::from_ints(&[12, -12]), ring.lift_centered(&ring.from_coeffs(&ints(&[12, 13]))));
}
