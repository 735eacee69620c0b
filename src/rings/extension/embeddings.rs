use num_bigint::BigInt;
use num_rational::BigRational;
use tracing::instrument;

use crate::algorithms::poly_roots::{classify_roots, complex_roots, log2_root_bound};
use crate::matrix::OwnedMatrix;
use crate::rings::approx_real::{ApproxRealField, NotEnoughPrecision};
use crate::rings::approx_real::bigfloat::{BigFloat, BigFloatField};
use crate::rings::float_complex::{Complex, ComplexField};
use crate::rings::poly::dense_poly::QPoly;

const BASE_EXTRA_PRECISION: u64 = 32;

///
/// Approximations to the embeddings `K -> C` of a number field, together with
/// the values of the integral basis under each of them.
///
/// The embeddings are given by the roots of the defining polynomial `T`, in the
/// canonical order: first the `r1` real roots in ascending order, then one root
/// of each pair of complex conjugate roots (the one in the upper half plane), sorted
/// by real part. When all `n` conjugates are required, the order is
/// `[real roots, upper roots, conjugates of upper roots]`.
///
/// All values are computed with a working precision that is larger than the requested
/// precision by [`EmbeddingTable::extra_precision()`], to account for the loss of
/// precision when evaluating the basis at the roots.
///
#[derive(Debug, Clone)]
pub struct EmbeddingTable {
    precision: u64,
    extra_precision: u64,
    real_roots: Vec<BigFloat>,
    complex_roots: Vec<Complex<BigFloat>>,
    /// `values[k][i]` is the image of the `i`-th basis element under the `k`-th embedding,
    /// for `k < r1 + r2`
    values: Vec<Vec<Complex<BigFloat>>>
}

fn bits_of_rational(x: &BigRational) -> u64 {
    x.numer().bits().max(x.denom().bits())
}

///
/// Estimates how many bits are lost when evaluating the given basis at the roots of `T`.
///
fn estimate_extra_precision(T: &QPoly, basis: &[QPoly]) -> u64 {
    let n = T.degree().unwrap_or(0) as u64;
    let root_bits = log2_root_bound(T).ceil().max(0.) as u64;
    let coeff_bits = basis.iter().flat_map(|w| w.coeffs().iter()).map(bits_of_rational).max().unwrap_or(0);
    BASE_EXTRA_PRECISION + n * root_bits + coeff_bits
}

impl EmbeddingTable {

    ///
    /// Computes the embeddings of the number field generated by a root of `T` with `r1`
    /// real embeddings, and the images of the given basis elements.
    ///
    #[instrument(skip_all, level = "trace")]
    pub fn compute(T: &QPoly, basis: &[QPoly], r1: usize, precision: u64) -> Result<EmbeddingTable, NotEnoughPrecision> {
        let extra_precision = estimate_extra_precision(T, basis);
        let RR = BigFloatField::new(precision + extra_precision);
        let CC = ComplexField::new(RR);
        let roots = complex_roots(T, RR)?;
        let (real_roots, complex_roots) = classify_roots(RR, roots, r1)?;
        let coeffs = basis.iter().map(|w| w.coeffs().iter().map(|c| RR.from_rational(c)).collect::<Vec<_>>()).collect::<Vec<_>>();
        let values = real_roots.iter().map(|x| CC.from_real(x.clone())).chain(complex_roots.iter().cloned())
            .map(|z| coeffs.iter().map(|w| CC.evaluate_poly(w, &z)).collect::<Result<Vec<_>, _>>())
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(EmbeddingTable { precision, extra_precision, real_roots, complex_roots, values });
    }

    ///
    /// The precision requested when this table was computed. All values are correct
    /// up to a relative error of about `2^-precision`.
    ///
    pub fn precision(&self) -> u64 {
        self.precision
    }

    pub fn extra_precision(&self) -> u64 {
        self.extra_precision
    }

    ///
    /// The field in which all values of this table are given.
    ///
    pub fn real_field(&self) -> BigFloatField {
        BigFloatField::new(self.precision + self.extra_precision)
    }

    pub fn complex_field(&self) -> ComplexField<BigFloatField> {
        ComplexField::new(self.real_field())
    }

    pub fn r1(&self) -> usize {
        self.real_roots.len()
    }

    pub fn r2(&self) -> usize {
        self.complex_roots.len()
    }

    pub fn degree(&self) -> usize {
        self.r1() + 2 * self.r2()
    }

    pub fn real_roots(&self) -> &[BigFloat] {
        &self.real_roots
    }

    pub fn complex_roots(&self) -> &[Complex<BigFloat>] {
        &self.complex_roots
    }

    ///
    /// Returns all `n` roots of the defining polynomial, in the order
    /// `[real roots, upper roots, conjugates of upper roots]`.
    ///
    pub fn conjugates(&self) -> Vec<Complex<BigFloat>> {
        let CC = self.complex_field();
        self.real_roots.iter().map(|x| CC.from_real(x.clone()))
            .chain(self.complex_roots.iter().cloned())
            .chain(self.complex_roots.iter().map(|z| CC.conjugate(z)))
            .collect()
    }

    ///
    /// Returns the images of the basis elements under the `k`-th embedding, for `k < r1 + r2`.
    ///
    pub fn basis_values(&self, k: usize) -> &[Complex<BigFloat>] {
        &self.values[k]
    }

    ///
    /// Returns the images of the given element (in basis coordinates) under all `n`
    /// embeddings, in the same order as [`EmbeddingTable::conjugates()`].
    ///
    pub fn conjugate_values(&self, x: &[BigRational]) -> Vec<Complex<BigFloat>> {
        let RR = self.real_field();
        let coeffs = x.iter().map(|c| RR.from_rational(c)).collect::<Vec<_>>();
        self.conjugate_values_of(&coeffs)
    }

    ///
    /// Same as [`EmbeddingTable::conjugate_values()`], for elements with integer coordinates.
    ///
    pub fn conjugate_values_int(&self, x: &[BigInt]) -> Vec<Complex<BigFloat>> {
        let RR = self.real_field();
        let coeffs = x.iter().map(|c| RR.from_int(c)).collect::<Vec<_>>();
        self.conjugate_values_of(&coeffs)
    }

    fn conjugate_values_of(&self, coeffs: &[BigFloat]) -> Vec<Complex<BigFloat>> {
        let CC = self.complex_field();
        let half: Vec<Complex<BigFloat>> = self.values.iter().map(|row| {
            row.iter().zip(coeffs.iter()).fold(CC.zero(), |acc, (value, c)| CC.add(&acc, &CC.scale(value, c)))
        }).collect();
        let r1 = self.r1();
        let conjugated = half[r1..].iter().map(|z| CC.conjugate(z)).collect::<Vec<_>>();
        half.into_iter().chain(conjugated).collect()
    }

    ///
    /// Returns the real `n x n` matrix `M` whose `j`-th column contains the real embedding
    /// vector of the `j`-th basis element, i.e. the values under the real embeddings,
    /// followed by `sqrt(2) Re(z), sqrt(2) Im(z)` for the value `z` under each complex
    /// embedding. In particular, `M^T M` is the Gram matrix of the `T2`-form
    /// `T2(x) = sum_sigma |sigma(x)|^2` w.r.t. the basis.
    ///
    pub fn real_matrix(&self) -> OwnedMatrix<BigFloat> {
        let RR = self.real_field();
        let sqrt2 = RR.sqrt(&RR.from_i64(2));
        let n = self.degree();
        let r1 = self.r1();
        OwnedMatrix::from_fn(n, n, |row, col| if row < r1 {
            self.values[row][col].re.clone()
        } else {
            let k = r1 + (row - r1) / 2;
            let value = &self.values[k][col];
            if (row - r1) % 2 == 0 {
                RR.mul(&sqrt2, &value.re)
            } else {
                RR.mul(&sqrt2, &value.im)
            }
        })
    }

    ///
    /// Returns a table with the same embeddings, but the values rounded to a smaller
    /// precision. If the requested precision is not smaller, a copy is returned.
    ///
    pub fn truncate(&self, precision: u64) -> EmbeddingTable {
        if precision >= self.precision {
            return self.clone();
        }
        let RR = BigFloatField::new(precision + self.extra_precision);
        let round_complex = |z: &Complex<BigFloat>| Complex { re: RR.round(&z.re), im: RR.round(&z.im) };
        EmbeddingTable {
            precision,
            extra_precision: self.extra_precision,
            real_roots: self.real_roots.iter().map(|x| RR.round(x)).collect(),
            complex_roots: self.complex_roots.iter().map(round_complex).collect(),
            values: self.values.iter().map(|row| row.iter().map(round_complex).collect()).collect()
        }
    }
}

#[cfg(test)]
use crate::tracing::LogAlgorithmSubscriber;

#[test]
fn test_embeddings_quadratic() {
    LogAlgorithmSubscriber::init_test();
    let half = BigRational::new(BigInt::from(1), BigInt::from(2));
    let T = QPoly::from_ints(&[-5, 0, 1]);
    let basis = [QPoly::one(), QPoly::from_coeffs(vec![half.clone(), half])];
    let table = EmbeddingTable::compute(&T, &basis, 2, 100).unwrap();
    let RR = table.real_field();
    assert_eq!(2, table.r1());
    assert_eq!(0, table.r2());
    assert!((RR.to_f64(&table.real_roots()[0]) + 5f64.sqrt()).abs() < 1e-12);
    assert!((RR.to_f64(&table.basis_values(1)[1].re) - (1. + 5f64.sqrt()) / 2.).abs() < 1e-12);

    // T2 of the golden ratio is phi^2 + phi'^2 = 3
    let M = table.real_matrix();
    let t2 = RR.add(&RR.square(M.at(0, 1)), &RR.square(M.at(1, 1)));
    assert_eq!(Some(BigInt::from(3)), RR.round_to_integer(&t2));

    let truncated = table.truncate(60);
    assert_eq!(60, truncated.precision());
    assert!((truncated.real_field().to_f64(&truncated.real_roots()[1]) - 5f64.sqrt()).abs() < 1e-12);
}

#[test]
fn test_embeddings_complex() {
    LogAlgorithmSubscriber::init_test();
    // x^4 + 1, roots are the primitive 8-th roots of unity
    let T = QPoly::from_ints(&[1, 0, 0, 0, 1]);
    let basis = (0..4).map(|i| QPoly::monomial(BigRational::from_integer(BigInt::from(1)), i)).collect::<Vec<_>>();
    let table = EmbeddingTable::compute(&T, &basis, 0, 100).unwrap();
    let RR = table.real_field();
    assert_eq!(2, table.r2());
    let conjugates = table.conjugates();
    assert_eq!(4, conjugates.len());
    let s = 0.5f64.sqrt();
    assert!((RR.to_f64(&conjugates[0].re) + s).abs() < 1e-12);
    assert!((RR.to_f64(&conjugates[0].im) - s).abs() < 1e-12);
    assert!((RR.to_f64(&conjugates[1].re) - s).abs() < 1e-12);
    assert!((RR.to_f64(&conjugates[3].im) + s).abs() < 1e-12);

    // T2 is sum |x_i|^2 * 4 for x = sum x_i theta^i, since the power basis is orthogonal
    let M = table.real_matrix();
    for j in 0..4 {
        let t2 = RR.sum((0..4).map(|i| RR.square(M.at(i, j))));
        assert_eq!(Some(BigInt::from(4)), RR.round_to_integer(&t2));
    }
    let values = table.conjugate_values_int(&[BigInt::from(0), BigInt::from(0), BigInt::from(1), BigInt::from(0)]);
    // theta^2 = i for the first root
    assert!(RR.to_f64(&values[0].re).abs() < 1e-12);
    assert!((RR.to_f64(&values[0].im) + 1.).abs() < 1e-12 || (RR.to_f64(&values[0].im) - 1.).abs() < 1e-12);
}
