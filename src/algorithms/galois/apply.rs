use num_bigint::BigInt;
use tracing::instrument;

use crate::algorithms::galois::{map_element, substitution_matrix, Automorphism};
use crate::error::{NumberFieldError, Result};
use crate::matrix::OwnedMatrix;
use crate::rings::extension::ideal::{Ideal, Prime};
use crate::rings::extension::number_field::{NfEl, NumberField};

///
/// An object on which automorphisms of a number field act.
///
#[derive(Debug, Clone, PartialEq)]
pub enum GaloisTarget {
    Element(NfEl),
    Ideal(Ideal),
    Prime(Prime)
}

///
/// Applies the given automorphism to an element, ideal or prime of the field.
///
/// For primes, the generator and uniformizer of the image are the images of the original
/// ones, and the anti-uniformizer is recomputed.
///
#[instrument(skip_all, level = "trace")]
pub fn apply(field: &NumberField, automorphism: &Automorphism, target: GaloisTarget) -> Result<GaloisTarget> {
    let beta = automorphism.to_algebraic(field)?;
    let matrix = substitution_matrix(field, &beta)?;
    return apply_matrix(field, &matrix, target);
}

///
/// Same as [`apply()`], for an automorphism given by its matrix w.r.t. the integral basis.
///
pub(crate) fn apply_matrix(field: &NumberField, matrix: &OwnedMatrix<BigInt>, target: GaloisTarget) -> Result<GaloisTarget> {
    let n = field.degree();
    match target {
        GaloisTarget::Element(x) => {
            if x.len() != n {
                return Err(NumberFieldError::DimensionMismatch { expected: n, actual: x.len() });
            }
            return Ok(GaloisTarget::Element(map_element(matrix, &x)));
        },
        GaloisTarget::Ideal(ideal) => {
            if ideal.hnf().row_count() != n {
                return Err(NumberFieldError::DimensionMismatch { expected: n, actual: ideal.hnf().row_count() });
            }
            let image = Ideal::from_lattice(&matrix.mul(ideal.hnf()))
                .ok_or_else(|| NumberFieldError::Bug("image of an ideal has deficient rank".to_owned()))?;
            return Ok(GaloisTarget::Ideal(image));
        },
        GaloisTarget::Prime(prime) => {
            if prime.generator().len() != n {
                return Err(NumberFieldError::DimensionMismatch { expected: n, actual: prime.generator().len() });
            }
            let generator = matrix.mul_vec(prime.generator());
            let uniformizer = matrix.mul_vec(prime.uniformizer());
            return Ok(GaloisTarget::Prime(Prime::new(field, prime.p().clone(), prime.e(), prime.f(), generator, uniformizer)?));
        }
    }
}

#[cfg(test)]
use num_rational::BigRational;
#[cfg(test)]
use crate::tracing::LogAlgorithmSubscriber;
#[cfg(test)]
use crate::algorithms::galois::{galois_group, ints, test_field};
#[cfg(test)]
use crate::rings::extension::ideal::{prime_decomposition, valuation};

#[cfg(test)]
fn rationals(values: &[i64]) -> NfEl {
    values.iter().map(|x| BigRational::from_integer(BigInt::from(*x))).collect()
}

#[test]
fn test_apply_element() {
    LogAlgorithmSubscriber::init_test();
    let K = test_field(&[1, 0, 1]);
    let conjugation = Automorphism::Permutation(vec![1, 0]);
    assert_eq!(Ok(GaloisTarget::Element(rationals(&[1, -2]))), apply(&K, &conjugation, GaloisTarget::Element(rationals(&[1, 2]))));
    assert_eq!(
        Err(NumberFieldError::DimensionMismatch { expected: 2, actual: 1 }),
        apply(&K, &conjugation, GaloisTarget::Element(rationals(&[1])))
    );

    // x^2 - 5 with maximal order Z[(1 + sqrt(5))/2]
    let K = test_field(&[-5, 0, 1]);
    let G = galois_group(&K).unwrap();
    let x = rationals(&[0, 1]);
    let image = match apply(&K, &G.automorphism(1), GaloisTarget::Element(x.clone())).unwrap() {
        GaloisTarget::Element(image) => image,
        _ => unreachable!()
    };
    // w + sigma(w) = 1
    assert_eq!(K.one(), K.add(&x, &image));
}

#[test]
fn test_apply_prime() {
    LogAlgorithmSubscriber::init_test();
    let K = test_field(&[1, 0, 1]);
    let conjugation = Automorphism::Algebraic(ints(&[0, -1]));
    let primes = prime_decomposition(&K, &BigInt::from(5)).unwrap();
    assert_eq!(2, primes.len());
    let image = match apply(&K, &conjugation, GaloisTarget::Prime(primes[0].clone())).unwrap() {
        GaloisTarget::Prime(image) => image,
        _ => unreachable!()
    };
    assert_eq!(primes[1].ideal(), image.ideal());
    assert_eq!(Some(1), valuation(&K, &image, &K.from_integral(image.uniformizer())));

    let image = apply(&K, &conjugation, GaloisTarget::Ideal(primes[1].ideal().clone())).unwrap();
    assert_eq!(GaloisTarget::Ideal(primes[0].ideal().clone()), image);

    // the ramified prime over 2 is fixed
    let ramified = prime_decomposition(&K, &BigInt::from(2)).unwrap();
    let image = apply(&K, &conjugation, GaloisTarget::Ideal(ramified[0].ideal().clone())).unwrap();
    assert_eq!(GaloisTarget::Ideal(ramified[0].ideal().clone()), image);
}
