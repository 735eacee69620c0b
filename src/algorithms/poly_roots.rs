use std::f64::consts::PI;

use tracing::{event, instrument, Level};

use crate::rings::approx_real::{ApproxRealField, NotEnoughPrecision};
use crate::rings::approx_real::bigfloat::{BigFloat, BigFloatField};
use crate::rings::approx_real::float::Real64;
use crate::rings::float_complex::{Complex, ComplexField};
use crate::rings::poly::dense_poly::QPoly;

const F64_ITERATIONS: usize = 500;

///
/// Returns `log2` of the Fujiwara bound `2 max_i |a_(n-i) / a_n|^(1/i)` on the absolute
/// value of the complex roots of `f`.
///
pub fn log2_root_bound(f: &QPoly) -> f64 {
    let n = f.degree().expect("zero polynomial has no roots");
    let log2 = |c: &num_rational::BigRational| if c.numer().bits() == 0 {
        f64::NEG_INFINITY
    } else {
        c.numer().bits() as f64 - c.denom().bits() as f64 + 1.
    };
    let lc = log2(&f.coeff(n));
    let mut result = f64::NEG_INFINITY;
    for i in 1..=n {
        let value = (log2(&f.coeff(n - i)) - lc + 1.) / i as f64;
        result = result.max(value);
    }
    return result.max(0.) + 1.;
}

///
/// Computes the Newton correction `f(z) / f'(z)`. If `|z| > 1`, this is computed
/// from the reversed polynomial at `1/z`, using `f(z) / f'(z) = z / (n - u g'(u) / g(u))`
/// where `u = 1/z` and `g` is the reversal of `f`.
///
fn newton_correction<R>(CC: &ComplexField<R>, coeffs: &[R::Element], derivative: &[R::Element], z: &Complex<R::Element>) -> Result<Complex<R::Element>, NotEnoughPrecision>
    where R: ApproxRealField
{
    let RR = CC.real_field();
    let n = coeffs.len() - 1;
    if !RR.is_gt(&CC.abs_squared(z), &RR.one()) {
        let value = CC.evaluate_poly(coeffs, z)?;
        let derivative_value = CC.evaluate_poly(derivative, z)?;
        return CC.div(&value, &derivative_value);
    }
    let u = CC.inv(z)?;
    let reversed = coeffs.iter().rev().cloned().collect::<Vec<_>>();
    let reversed_derivative = (1..=n).map(|i| RR.mul_int(&reversed[i], &(i as i64).into())).collect::<Vec<_>>();
    let g = CC.evaluate_poly(&reversed, &u)?;
    let g_prime = CC.evaluate_poly(&reversed_derivative, &u)?;
    let ratio = CC.div(&CC.mul(&u, &g_prime), &g)?;
    let denominator = CC.sub(&CC.from_real(RR.from_i64(n as i64)), &ratio);
    return CC.div(z, &denominator);
}

///
/// Performs Aberth-Ehrlich iterations until the maximal relative correction is
/// at most `2^-tolerance_bits`, or the iteration limit is reached.
///
/// Returns whether the iteration converged.
///
fn aberth_iterations<R>(CC: &ComplexField<R>, f: &QPoly, roots: &mut Vec<Complex<R::Element>>, tolerance_bits: i64, max_iterations: usize) -> Result<bool, NotEnoughPrecision>
    where R: ApproxRealField
{
    let RR = CC.real_field();
    let f = f.make_monic();
    let coeffs = f.coeffs().iter().map(|c| RR.from_rational(c)).collect::<Vec<_>>();
    let derivative = f.derivative().coeffs().iter().map(|c| RR.from_rational(c)).collect::<Vec<_>>();
    let tolerance = RR.pow2(-2 * tolerance_bits);
    let n = roots.len();
    for _ in 0..max_iterations {
        let mut converged = true;
        for k in 0..n {
            let newton = newton_correction(CC, &coeffs, &derivative, &roots[k])?;
            let mut repulsion = CC.zero();
            for j in 0..n {
                if j != k {
                    repulsion = CC.add(&repulsion, &CC.inv(&CC.sub(&roots[k], &roots[j]))?);
                }
            }
            let denominator = CC.sub(&CC.one(), &CC.mul(&newton, &repulsion));
            let correction = CC.div(&newton, &denominator)?;
            let size = CC.abs_squared(&roots[k]);
            let scale = if RR.is_gt(&size, &RR.one()) { size } else { RR.one() };
            if RR.is_gt(&CC.abs_squared(&correction), &RR.mul(&tolerance, &scale)) {
                converged = false;
            }
            roots[k] = CC.sub(&roots[k], &correction);
        }
        if converged {
            return Ok(true);
        }
    }
    return Ok(false);
}

fn initial_points(f: &QPoly) -> Vec<(f64, f64)> {
    let n = f.degree().unwrap_or(0);
    let radius = log2_root_bound(f).min(1000.).exp2() / 2.;
    (0..n).map(|k| {
        let angle = 2. * PI * k as f64 / n as f64 + 0.4;
        (radius * angle.cos(), radius * angle.sin())
    }).collect()
}

///
/// Computes approximations to all complex roots of the squarefree polynomial `f`
/// in the given [`BigFloatField`], with relative error about `2^-(precision - 32)`.
///
/// The roots are first approximated using `f64` arithmetic, and then refined using
/// Aberth-Ehrlich iterations in the given field. If this does not converge, or roots
/// cannot be separated, [`NotEnoughPrecision`] is returned.
///
#[instrument(skip_all, level = "trace")]
pub fn complex_roots(f: &QPoly, RR: BigFloatField) -> Result<Vec<Complex<BigFloat>>, NotEnoughPrecision> {
    let n = f.degree().expect("zero polynomial has no roots");
    if n == 1 {
        let f = f.make_monic();
        return Ok(vec![ComplexField::new(RR).from_real(RR.negate(&RR.from_rational(&f.coeff(0))))]);
    }
    let start = initial_points(f);

    let CC64 = ComplexField::new(Real64::RING);
    let mut seeds = start.iter().map(|(re, im)| CC64.from_f64(*re, *im)).collect::<Vec<_>>();
    let seed_result = aberth_iterations(&CC64, f, &mut seeds, 40, F64_ITERATIONS);
    if seed_result.is_err() || seeds.iter().any(|z| !z.re.is_finite() || !z.im.is_finite()) {
        event!(Level::TRACE, "f64 root approximation failed, starting from initial points");
        seeds = start.iter().map(|(re, im)| CC64.from_f64(*re, *im)).collect();
    }

    let CC = ComplexField::new(RR);
    let mut roots = seeds.iter().map(|z| CC.from_f64(z.re, z.im)).collect::<Vec<_>>();
    let precision = RR.precision_bits() as i64;
    let max_iterations = 4 * precision as usize + 100;
    if !aberth_iterations(&CC, f, &mut roots, precision - 32, max_iterations)? {
        return Err(NotEnoughPrecision);
    }

    // roots must be well-separated compared to the precision
    let separation = RR.pow2(-precision / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            let distance = CC.abs_squared(&CC.sub(&roots[i], &roots[j]));
            if RR.is_lt(&distance, &RR.square(&separation)) {
                return Err(NotEnoughPrecision);
            }
        }
    }
    return Ok(roots);
}

///
/// Splits the roots of a real polynomial with exactly `r1` real roots into the real
/// ones and one representative of each pair of complex conjugate roots, namely the one
/// with positive imaginary part.
///
/// The real roots are returned in ascending order and with imaginary part zero, the
/// complex roots are sorted by their real part.
///
pub fn classify_roots(RR: BigFloatField, mut roots: Vec<Complex<BigFloat>>, r1: usize) -> Result<(Vec<BigFloat>, Vec<Complex<BigFloat>>), NotEnoughPrecision> {
    let n = roots.len();
    assert!(r1 <= n && (n - r1) % 2 == 0);
    roots.sort_by(|a, b| RR.cmp(&RR.abs(&a.im), &RR.abs(&b.im)));
    let threshold = RR.pow2(-(RR.precision_bits() as i64) / 2);
    let mut reals = Vec::with_capacity(r1);
    let mut complex = Vec::with_capacity((n - r1) / 2);
    for (index, z) in roots.into_iter().enumerate() {
        let magnitude = RR.add(&RR.one(), &RR.abs(&z.re));
        let is_small = RR.is_lt(&RR.abs(&z.im), &RR.mul(&threshold, &magnitude));
        if index < r1 {
            if !is_small {
                return Err(NotEnoughPrecision);
            }
            reals.push(z.re);
        } else {
            if is_small {
                return Err(NotEnoughPrecision);
            }
            if !RR.is_neg(&z.im) {
                complex.push(z);
            }
        }
    }
    if complex.len() != (n - r1) / 2 {
        return Err(NotEnoughPrecision);
    }
    reals.sort_by(|a, b| RR.cmp(a, b));
    complex.sort_by(|a, b| RR.cmp(&a.re, &b.re).then_with(|| RR.cmp(&a.im, &b.im)));
    return Ok((reals, complex));
}

#[cfg(test)]
use crate::tracing::LogAlgorithmSubscriber;
#[cfg(test)]
use num_bigint::BigInt;

#[test]
fn test_complex_roots() {
    LogAlgorithmSubscriber::init_test();
    let RR = BigFloatField::new(128);
    // x^3 - 2
    let f = QPoly::from_ints(&[-2, 0, 0, 1]);
    let roots = complex_roots(&f, RR).unwrap();
    assert_eq!(3, roots.len());
    let (reals, complex) = classify_roots(RR, roots, 1).unwrap();
    assert_eq!(1, reals.len());
    assert_eq!(1, complex.len());
    let cube = RR.mul(&reals[0], &RR.mul(&reals[0], &reals[0]));
    assert!(RR.is_lt(&RR.abs(&RR.sub(&cube, &RR.from_i64(2))), &RR.pow2(-100)));
    assert!((RR.to_f64(&complex[0].re) + 0.6299605249474366).abs() < 1e-12);
    assert!((RR.to_f64(&complex[0].im) - 1.0911236359717214).abs() < 1e-12);
}

#[test]
fn test_roots_large_coefficients() {
    LogAlgorithmSubscriber::init_test();
    let RR = BigFloatField::new(128);
    // (x - 1000)(x - 1001)(x + 3)(x^2 + 1)
    let f = &(&(&QPoly::from_ints(&[-1000, 1]) * &QPoly::from_ints(&[-1001, 1])) * &QPoly::from_ints(&[3, 1])) * &QPoly::from_ints(&[1, 0, 1]);
    let (reals, complex) = classify_roots(RR, complex_roots(&f, RR).unwrap(), 3).unwrap();
    let reals = reals.iter().map(|x| RR.round_to_integer(x).unwrap()).collect::<Vec<_>>();
    assert_eq!(vec![BigInt::from(-3), BigInt::from(1000), BigInt::from(1001)], reals);
    assert!(RR.to_f64(&complex[0].re).abs() < 1e-20);
    assert!((RR.to_f64(&complex[0].im) - 1.).abs() < 1e-20);
}
