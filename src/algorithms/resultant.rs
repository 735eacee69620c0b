use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero, Pow};

use crate::rings::poly::dense_poly::QPoly;

///
/// Computes the resultant of two polynomials over `Q`, using the Euclidean
/// algorithm over the field `Q`.
///
/// The resultant of two nonzero polynomials `f, g` is the determinant of their
/// Sylvester matrix. By convention, the resultant is zero if one of them is zero.
///
/// # Algorithm
///
/// We use the identities
/// ```text
///   res(f, g) = (-1)^(deg f deg g) res(g, f)
///   res(g, f) = lc(g)^(deg f - deg r) res(g, r)    where r = f mod g
///   res(f, c) = c^(deg f)                          for constant c
/// ```
///
pub fn resultant(f: &QPoly, g: &QPoly) -> BigRational {
    let mut a = f.clone();
    let mut b = g.clone();
    let mut factor = BigRational::one();
    loop {
        let (Some(deg_a), Some(deg_b)) = (a.degree(), b.degree()) else {
            return BigRational::zero();
        };
        if deg_b == 0 {
            return factor * Pow::pow(b.coeff(0), deg_a as u32);
        }
        if deg_a == 0 {
            return factor * Pow::pow(a.coeff(0), deg_b as u32);
        }
        let r = a.rem(&b);
        let Some(deg_r) = r.degree() else {
            return BigRational::zero();
        };
        if deg_a % 2 == 1 && deg_b % 2 == 1 {
            factor = -factor;
        }
        let lc_b = b.coeff(deg_b);
        factor = factor * Pow::pow(lc_b, (deg_a - deg_r) as u32);
        a = b;
        b = r;
    }
}

///
/// Computes the discriminant `(-1)^(n(n - 1)/2) res(f, f') / lc(f)` of a polynomial
/// of degree `n >= 1`.
///
pub fn discriminant(f: &QPoly) -> BigRational {
    let n = f.degree().expect("zero polynomial has no discriminant");
    assert!(n >= 1);
    if n == 1 {
        return BigRational::one();
    }
    let lc = f.coeff(n);
    let result = resultant(f, &f.derivative()) / lc;
    if (n * (n - 1) / 2) % 2 == 1 {
        -result
    } else {
        result
    }
}

///
/// The discriminant of an integral polynomial, as integer.
///
pub fn integer_discriminant(f: &QPoly) -> BigInt {
    debug_assert!(f.is_integral());
    discriminant(f).to_integer()
}

#[test]
fn test_resultant() {
    let f = QPoly::from_ints(&[-2, 0, 1]);
    let g = QPoly::from_ints(&[-3, 1]);
    // res(x^2 - 2, x - 3) = (3^2 - 2) up to sign conventions: prod g(roots of f)
    assert_eq!(BigRational::from_integer(BigInt::from(7)), resultant(&f, &g));
    assert_eq!(BigRational::from_integer(BigInt::from(7)), resultant(&g, &f));
    assert_eq!(BigRational::zero(), resultant(&f, &QPoly::from_ints(&[-4, 0, 2])));
    assert_eq!(BigRational::zero(), resultant(&f, &QPoly::zero()));
}

#[test]
fn test_discriminant() {
    assert_eq!(BigInt::from(20), integer_discriminant(&QPoly::from_ints(&[-5, 0, 1])));
    assert_eq!(BigInt::from(5), integer_discriminant(&QPoly::from_ints(&[-1, -1, 1])));
    assert_eq!(BigInt::from(-108), integer_discriminant(&QPoly::from_ints(&[-2, 0, 0, 1])));
    assert_eq!(BigInt::from(125), integer_discriminant(&QPoly::from_ints(&[1, 1, 1, 1, 1])));
    assert_eq!(BigInt::from(-4), integer_discriminant(&QPoly::from_ints(&[1, 0, 1])));
    // non-monic: disc(2x^2 + x - 1) = 1 + 8
    assert_eq!(BigInt::from(9), integer_discriminant(&QPoly::from_ints(&[-1, 1, 2])));
}
