use num_bigint::BigInt;

use crate::rings::poly::dense_poly::QPoly;
use crate::rings::poly::zn_poly::{ZnPoly, ZnPolyRing};
use crate::rings::zn::Zn;

///
/// Lifts a factorization `f = g h mod p` of a monic integer polynomial into monic
/// coprime factors to a factorization `f = G H mod p^e`.
///
/// # Algorithm
///
/// We use linear lifting: assuming `f = g h mod p^k`, write `f - g h = p^k c` and find
/// `sigma, tau` over `Fp` with `g sigma + h tau = c` and `deg tau < deg g`. Then
/// `(g + p^k tau)(h + p^k sigma) = f mod p^(k + 1)`.
///
pub fn hensel_lift(f: &QPoly, g: &ZnPoly, h: &ZnPoly, p: &BigInt, e: usize) -> (ZnPoly, ZnPoly) {
    assert!(f.is_monic());
    let Fp = ZnPolyRing::new(Zn::new(p.clone()));
    let (d, s, t) = Fp.extended_gcd(g, h);
    assert!(Fp.is_one(&d), "factors are not coprime modulo p");

    let f_int = f.integer_coeffs().expect("polynomial is not integral");
    let mut modulus = p.clone();
    let mut g = g.clone();
    let mut h = h.clone();
    for _ in 1..e {
        let next_modulus = &modulus * p;
        let Zpk = ZnPolyRing::new(Zn::new(next_modulus.clone()));
        let product = Zpk.mul(&g, &h);
        let difference = Zpk.sub(&Zpk.from_coeffs(&f_int), &product);
        // all coefficients of difference are divisible by modulus
        let c = Fp.from_coeffs(&difference.iter().map(|x| x / &modulus).collect::<Vec<_>>());
        let (q, tau) = Fp.div_rem(&Fp.mul(&t, &c), &g);
        let sigma = Fp.add(&Fp.mul(&s, &c), &Fp.mul(&q, &h));
        g = Zpk.add(&g, &Zpk.scale(&tau, &modulus));
        h = Zpk.add(&h, &Zpk.scale(&sigma, &modulus));
        modulus = next_modulus;
    }
    return (g, h);
}

///
/// Lifts a factorization of a monic integer polynomial `f` modulo `p` into pairwise coprime
/// monic factors to a factorization modulo `p^e`.
///
pub fn hensel_lift_factorization(f: &QPoly, factors: &[ZnPoly], p: &BigInt, e: usize) -> Vec<ZnPoly> {
    assert!(factors.len() >= 1);
    if factors.len() == 1 {
        let Zpe = ZnPolyRing::new(Zn::new(num_traits::pow(p.clone(), e)));
        return vec![Zpe.from_coeffs(&f.integer_coeffs().expect("polynomial is not integral"))];
    }
    let Fp = ZnPolyRing::new(Zn::new(p.clone()));
    let rest = factors[1..].iter().fold(Fp.one(), |acc, g| Fp.mul(&acc, g));
    let (g, h) = hensel_lift(f, &factors[0], &rest, p, e);
    let Zpe = ZnPolyRing::new(Zn::new(num_traits::pow(p.clone(), e)));
    let mut result = vec![g];
    result.extend(hensel_lift_factorization(&Zpe.lift_centered(&h), &factors[1..], p, e));
    return result;
}

#[cfg(test)]
fn ints(values: &[i64]) -> Vec<BigInt> {
    values.iter().map(|x| BigInt::from(*x)).collect()
}

#[test]
fn test_hensel_lift() {
    // x^2 - 2 = (x - 3)(x + 3) mod 7
    let f = QPoly::from_ints(&[-2, 0, 1]);
    let p = BigInt::from(7);
    let Fp = ZnPolyRing::new(Zn::new(p.clone()));
    let (g, h) = hensel_lift(&f, &Fp.from_coeffs(&ints(&[-3, 1])), &Fp.from_coeffs(&ints(&[3, 1])), &p, 4);
    let Z = ZnPolyRing::new(Zn::new(BigInt::from(7 * 7 * 7 * 7)));
    assert_eq!(Z.from_coeffs(&ints(&[-2, 0, 1])), Z.mul(&g, &h));
    assert_eq!(Some(1), Z.degree(&g));
    assert_eq!(Some(1), Z.degree(&h));
}

#[test]
fn test_hensel_lift_factorization() {
    // (x - 1)(x - 2)(x - 4) + 5 (x^2 + 1) splits into linear factors mod 5
    let f = &(&(&QPoly::from_ints(&[-1, 1]) * &QPoly::from_ints(&[-2, 1])) * &QPoly::from_ints(&[-4, 1])) + &QPoly::from_ints(&[5, 0, 5]);
    let p = BigInt::from(5);
    let Fp = ZnPolyRing::new(Zn::new(p.clone()));
    let factors = vec![Fp.from_coeffs(&ints(&[-1, 1])), Fp.from_coeffs(&ints(&[-2, 1])), Fp.from_coeffs(&ints(&[-4, 1]))];
    let lifted = hensel_lift_factorization(&f, &factors, &p, 5);
    assert_eq!(3, lifted.len());
    let Z = ZnPolyRing::new(Zn::new(BigInt::from(5 * 5 * 5 * 5 * 5)));
    let product = lifted.iter().fold(Z.one(), |acc, g| Z.mul(&acc, g));
    assert_eq!(Z.from_coeffs(&f.integer_coeffs().unwrap()), product);
    for (lifted_factor, factor) in lifted.iter().zip(factors.iter()) {
        assert_eq!(*factor, Fp.from_coeffs(lifted_factor));
    }
}
