use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};
use tracing::{event, span, Level};

use crate::algorithms::linsolve::hnf::{hnf, hnf_coordinates};
use crate::algorithms::linsolve::kernel_mod_p;
use crate::error::{NumberFieldError, Result};
use crate::integer::reduce_mod;
use crate::matrix::OwnedMatrix;
use crate::rings::extension::order::Order;
use crate::rings::poly::dense_poly::QPoly;

///
/// Computes the Hermite normal form of the `Z`-module spanned by the given vectors
/// and by `p` times the unit vectors.
///
fn span_with_p_multiples(vectors: Vec<Vec<BigInt>>, p: &BigInt, n: usize) -> OwnedMatrix<BigInt> {
    let mut generators = vectors;
    for i in 0..n {
        let mut unit = vec![BigInt::zero(); n];
        unit[i] = p.clone();
        generators.push(unit);
    }
    // contains p * Z^n, thus has full rank
    hnf(&OwnedMatrix::from_cols(n, generators)).unwrap_or_else(|| unreachable!())
}

///
/// Computes the `p`-radical `I_p = { x in O | x^k in pO for some k }` of the order,
/// as the kernel of the map `x -> x^(p^j)` on `O/pO` for `p^j >= n`. The result is
/// returned as Hermite normal form of a basis in the coordinates of the order.
///
pub(crate) fn p_radical(order: &Order, p: &BigInt) -> OwnedMatrix<BigInt> {
    let n = order.degree();
    let mut q = p.clone();
    while q < BigInt::from(n) {
        q *= p;
    }
    let frobenius_cols = (0..n).map(|i| {
        let mut unit = vec![BigInt::zero(); n];
        unit[i] = BigInt::one();
        order.pow_mod_p(&unit, &q, p)
    }).collect::<Vec<_>>();
    let kernel = kernel_mod_p(&OwnedMatrix::from_cols(n, frobenius_cols), p);
    return span_with_p_multiples(kernel, p, n);
}

///
/// Computes the ring of multipliers `{ x in K | x I subset I }` of the ideal `I`
/// given by its Hermite normal form, assuming that `pO subset I`. The result is given
/// by a basis, as Hermite normal form matrix `H` such that the ring of multipliers is
/// spanned by the columns of `H / p`.
///
fn ring_of_multipliers(order: &Order, ideal: &OwnedMatrix<BigInt>, p: &BigInt) -> Result<OwnedMatrix<BigInt>> {
    let n = order.degree();
    // we compute U = { x in O | x I subset pI }, then the ring of multipliers is U / p
    let mut cols = Vec::with_capacity(n);
    for i in 0..n {
        let mut unit = vec![BigInt::zero(); n];
        unit[i] = BigInt::one();
        let mut col = Vec::with_capacity(n * n);
        for j in 0..n {
            let product = order.mul_integral(&unit, &ideal.col(j));
            let Some(coords) = hnf_coordinates(ideal, &product) else {
                return Err(NumberFieldError::Bug("p-radical is not an ideal".to_owned()));
            };
            col.extend(coords.into_iter().map(|c| reduce_mod(&c, p)));
        }
        cols.push(col);
    }
    let kernel = kernel_mod_p(&OwnedMatrix::from_cols(n * n, cols), p);
    return Ok(span_with_p_multiples(kernel, p, n));
}

///
/// Computes an order `O' >= O` that is `p`-maximal, i.e. whose index in the maximal order
/// is coprime to `p`, using the Round 2 algorithm by Pohst and Zassenhaus.
///
/// # Algorithm
///
/// Repeatedly compute the `p`-radical `I_p` of the current order and its ring of multipliers
/// `O' = { x in K | x I_p subset I_p }`. By the Pohst-Zassenhaus theorem, the order is
/// `p`-maximal if and only if `O' = O`, and otherwise `O'` is strictly larger.
///
/// The returned order has a basis in Hermite normal form.
///
#[stability::unstable(feature = "enable")]
pub fn round2(order: &Order, p: &BigInt) -> Result<Order> {
    span!(Level::INFO, "round2", p = %p, n = order.degree()).in_scope(|| {
        let n = order.degree();
        let p_rational = BigRational::from_integer(p.clone());
        let mut current = order.clone();
        let mut trivial = OwnedMatrix::<BigInt>::identity(n);
        for i in 0..n {
            *trivial.at_mut(i, i) = p.clone();
        }
        let mut iterations = 0;
        loop {
            let radical = p_radical(&current, p);
            let multipliers = ring_of_multipliers(&current, &radical, p)?;
            if multipliers == trivial {
                event!(Level::INFO, iterations = iterations, "p_maximal");
                return Ok(current);
            }
            iterations += 1;
            let generators = (0..n).map(|j| {
                let coords = multipliers.col(j).into_iter().map(|c| BigRational::from_integer(c) / &p_rational).collect::<Vec<_>>();
                current.to_poly(&coords)
            }).collect::<Vec<QPoly>>();
            current = Order::from_generators(current.modulus().clone(), &generators).map_err(|e| NumberFieldError::Bug(format!("ring of multipliers is not an order: {}", e)))?;
            event!(Level::INFO, index = %current.index(), "enlarged");
        }
    })
}

#[cfg(test)]
use crate::tracing::LogAlgorithmSubscriber;

#[test]
fn test_round2_quadratic() {
    LogAlgorithmSubscriber::init_test();
    let order = Order::equation_order(QPoly::from_ints(&[-5, 0, 1]));
    let maximal = round2(&order, &BigInt::from(2)).unwrap();
    assert_eq!(BigRational::from_integer(BigInt::from(2)), maximal.index());
    let half = BigRational::new(BigInt::from(1), BigInt::from(2));
    assert_eq!(&[QPoly::one(), QPoly::from_coeffs(vec![half.clone(), half])][..], maximal.basis());

    // Z[i] is already maximal
    let order = Order::equation_order(QPoly::from_ints(&[1, 0, 1]));
    let maximal = round2(&order, &BigInt::from(2)).unwrap();
    assert_eq!(BigRational::one(), maximal.index());
}

#[test]
fn test_round2_cubic() {
    LogAlgorithmSubscriber::init_test();
    // x^3 - 2 is 3-maximal, since it is 3-Eisenstein after substituting x -> x - 1
    let order = Order::equation_order(QPoly::from_ints(&[-2, 0, 0, 1]));
    assert_eq!(BigRational::one(), round2(&order, &BigInt::from(3)).unwrap().index());
    // x^3 - 12 has a root 12^(1/3), and 12^(2/3) / 2 = 18^(1/3) is integral
    let order = Order::equation_order(QPoly::from_ints(&[-12, 0, 0, 1]));
    let maximal = round2(&order, &BigInt::from(2)).unwrap();
    assert_eq!(BigRational::from_integer(BigInt::from(2)), maximal.index());
    assert!(maximal.contains(&QPoly::from_coeffs(vec![BigRational::zero(), BigRational::zero(), BigRational::new(BigInt::from(1), BigInt::from(2))])));
    // the index at 3 is trivial, since x^3 - 12 is 3-Eisenstein
    assert_eq!(BigRational::one(), round2(&order, &BigInt::from(3)).unwrap().index());
}
