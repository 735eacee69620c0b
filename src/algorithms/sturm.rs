use num_rational::BigRational;
use num_traits::{Signed, Zero};

use crate::rings::poly::dense_poly::QPoly;

///
/// Computes the Sturm sequence `f, f', -rem(f, f'), ...` of the given polynomial.
///
pub fn sturm_sequence(f: &QPoly) -> Vec<QPoly> {
    let mut result = vec![f.clone(), f.derivative()];
    loop {
        let len = result.len();
        if result[len - 1].is_zero() {
            result.pop();
            return result;
        }
        let next = -&result[len - 2].rem(&result[len - 1]);
        result.push(next);
    }
}

fn sign_changes<I>(values: I) -> usize
    where I: Iterator<Item = i32>
{
    let mut last = 0;
    let mut changes = 0;
    for s in values.filter(|s| *s != 0) {
        if last != 0 && s != last {
            changes += 1;
        }
        last = s;
    }
    return changes;
}

fn sign(x: &BigRational) -> i32 {
    if x.is_zero() { 0 } else if x.is_positive() { 1 } else { -1 }
}

///
/// Returns the sign of `f(x)` for `x -> +infinity` resp. `x -> -infinity`.
///
fn sign_at_infinity(f: &QPoly, positive: bool) -> i32 {
    match f.degree() {
        None => 0,
        Some(d) => {
            let s = sign(&f.coeff(d));
            if positive || d % 2 == 0 { s } else { -s }
        }
    }
}

///
/// Counts the number of distinct real roots of `f`.
///
pub fn count_real_roots(f: &QPoly) -> usize {
    let sequence = sturm_sequence(f);
    let at_neg_inf = sign_changes(sequence.iter().map(|g| sign_at_infinity(g, false)));
    let at_pos_inf = sign_changes(sequence.iter().map(|g| sign_at_infinity(g, true)));
    return at_neg_inf - at_pos_inf;
}

///
/// Counts the number of distinct real roots of `f` in the half-open interval `(a, b]`.
///
pub fn count_real_roots_in(f: &QPoly, a: &BigRational, b: &BigRational) -> usize {
    assert!(a < b);
    let sequence = sturm_sequence(f);
    let at_a = sign_changes(sequence.iter().map(|g| sign(&g.evaluate(a))));
    let at_b = sign_changes(sequence.iter().map(|g| sign(&g.evaluate(b))));
    return at_a - at_b;
}

#[cfg(test)]
use num_bigint::BigInt;

#[test]
fn test_count_real_roots() {
    assert_eq!(2, count_real_roots(&QPoly::from_ints(&[-5, 0, 1])));
    assert_eq!(0, count_real_roots(&QPoly::from_ints(&[1, 0, 1])));
    assert_eq!(1, count_real_roots(&QPoly::from_ints(&[-2, 0, 0, 1])));
    assert_eq!(0, count_real_roots(&QPoly::from_ints(&[1, 1, 1, 1, 1])));
    assert_eq!(3, count_real_roots(&QPoly::from_ints(&[1, -3, 0, 1])));
    // (x - 1)^2 (x + 2) has two distinct real roots
    assert_eq!(2, count_real_roots(&QPoly::from_ints(&[2, -3, 0, 1])));
}

#[test]
fn test_count_real_roots_in() {
    let f = QPoly::from_ints(&[1, -3, 0, 1]);
    let r = |x: i64| BigRational::from_integer(BigInt::from(x));
    assert_eq!(1, count_real_roots_in(&f, &r(-2), &r(0)));
    assert_eq!(2, count_real_roots_in(&f, &r(0), &r(2)));
    assert_eq!(3, count_real_roots_in(&f, &r(-10), &r(10)));
}
