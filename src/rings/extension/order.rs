use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};

use crate::algorithms::linsolve::{determinant, invert_rational};
use crate::algorithms::linsolve::hnf::hnf_rational;
use crate::integer::reduce_mod;
use crate::matrix::OwnedMatrix;
use crate::rings::poly::dense_poly::QPoly;

///
/// A full-rank `Z`-submodule of `Q[X]/(T)` that is closed under multiplication and
/// contains `1`, i.e. an order of the number field defined by the monic integral
/// polynomial `T`.
///
/// The order is given by a `Z`-basis `w_0, ..., w_(n-1)`, represented as polynomials
/// of degree `< n`. Elements of the order are then represented by their integer
/// coordinates w.r.t. this basis, and multiplication is done using the precomputed
/// structure constants `w_i w_j = sum_k c_ijk w_k`.
///
#[derive(Clone, Debug)]
pub struct Order {
    modulus: QPoly,
    basis: Vec<QPoly>,
    basis_matrix: OwnedMatrix<BigRational>,
    inverse: OwnedMatrix<BigRational>,
    table: Vec<Vec<Vec<BigInt>>>
}

///
/// Returns the `n x n` matrix whose `j`-th column contains the coefficients
/// of `basis[j]`.
///
pub fn basis_matrix(basis: &[QPoly], n: usize) -> OwnedMatrix<BigRational> {
    OwnedMatrix::from_fn(n, basis.len(), |i, j| basis[j].coeff(i))
}

impl Order {

    ///
    /// Creates the order with the given basis. Returns `Err` with a description of the
    /// problem if the basis does not have full rank, or its `Z`-span is not closed under
    /// multiplication.
    ///
    pub fn new(modulus: QPoly, basis: Vec<QPoly>) -> Result<Order, String> {
        assert!(modulus.is_monic() && modulus.is_integral());
        let n = modulus.degree().unwrap_or(0);
        if basis.len() != n {
            return Err(format!("expected {} basis elements, got {}", n, basis.len()));
        }
        if let Some(i) = basis.iter().position(|w| w.degree().map(|d| d >= n).unwrap_or(false)) {
            return Err(format!("basis element {} is not reduced modulo the defining polynomial", i));
        }
        let matrix = basis_matrix(&basis, n);
        let Some(inverse) = invert_rational(&matrix) else {
            return Err("basis elements are linearly dependent".to_owned());
        };
        let mut order = Order { modulus, basis, basis_matrix: matrix, inverse, table: Vec::new() };
        let mut table = vec![vec![Vec::new(); n]; n];
        for i in 0..n {
            for j in i..n {
                let product = (&order.basis[i] * &order.basis[j]).rem(&order.modulus);
                let Some(coords) = integral(order.coordinates(&product)) else {
                    return Err(format!("product of basis elements {} and {} is not in the module", i, j));
                };
                table[j][i] = coords.clone();
                table[i][j] = coords;
            }
        }
        order.table = table;
        return Ok(order);
    }

    ///
    /// Returns the equation order `Z[X]/(T)` with basis `1, X, ..., X^(n-1)`.
    ///
    pub fn equation_order(modulus: QPoly) -> Order {
        let n = modulus.degree().unwrap_or(0);
        let basis = (0..n).map(|i| QPoly::monomial(BigRational::one(), i)).collect();
        Order::new(modulus, basis).unwrap_or_else(|e| panic!("equation order invalid: {}", e))
    }

    ///
    /// Computes the order generated as `Z`-module by the given elements, with basis
    /// in Hermite normal form. In particular, the `i`-th basis element will have degree `i`.
    ///
    pub fn from_generators(modulus: QPoly, generators: &[QPoly]) -> Result<Order, String> {
        let n = modulus.degree().unwrap_or(0);
        let reduced = generators.iter().map(|g| g.rem(&modulus)).collect::<Vec<_>>();
        let Some((H, d)) = hnf_rational(&basis_matrix(&reduced, n)) else {
            return Err("generators do not span a module of full rank".to_owned());
        };
        let d = BigRational::from_integer(d);
        let basis = (0..n).map(|j| QPoly::from_coeffs((0..n).map(|i| BigRational::from_integer(H.at(i, j).clone()) / &d).collect())).collect();
        return Order::new(modulus, basis);
    }

    ///
    /// Returns the same order, with basis in Hermite normal form.
    ///
    pub fn hnf_normalized(&self) -> Order {
        Order::from_generators(self.modulus.clone(), &self.basis).unwrap_or_else(|e| panic!("order became invalid: {}", e))
    }

    pub fn degree(&self) -> usize {
        self.basis.len()
    }

    pub fn modulus(&self) -> &QPoly {
        &self.modulus
    }

    pub fn basis(&self) -> &[QPoly] {
        &self.basis
    }

    pub fn basis_matrix(&self) -> &OwnedMatrix<BigRational> {
        &self.basis_matrix
    }

    ///
    /// The index `[O : Z[X]/(T)]`, which is always a positive integer if the order
    /// contains `X`, and in general rational.
    ///
    pub fn index(&self) -> BigRational {
        determinant(&self.basis_matrix).recip()
    }

    ///
    /// Returns the rational coordinates w.r.t. the basis of the order of the element
    /// of `Q[X]/(T)` represented by `f`.
    ///
    pub fn coordinates(&self, f: &QPoly) -> Vec<BigRational> {
        let n = self.degree();
        let reduced = f.rem(&self.modulus);
        let power_coords = (0..n).map(|i| reduced.coeff(i)).collect::<Vec<_>>();
        self.inverse.mul_vec(&power_coords)
    }

    pub fn to_poly(&self, x: &[BigRational]) -> QPoly {
        QPoly::from_coeffs(self.basis_matrix.mul_vec(x))
    }

    pub fn int_to_poly(&self, x: &[BigInt]) -> QPoly {
        self.to_poly(&x.iter().map(|c| BigRational::from_integer(c.clone())).collect::<Vec<_>>())
    }

    pub fn contains(&self, f: &QPoly) -> bool {
        self.coordinates(f).iter().all(|c| c.is_integer())
    }

    pub fn mul(&self, lhs: &[BigRational], rhs: &[BigRational]) -> Vec<BigRational> {
        let n = self.degree();
        let mut result = vec![BigRational::zero(); n];
        for i in 0..n {
            if lhs[i].is_zero() {
                continue;
            }
            for j in 0..n {
                if rhs[j].is_zero() {
                    continue;
                }
                let factor = &lhs[i] * &rhs[j];
                for k in 0..n {
                    if !self.table[i][j][k].is_zero() {
                        result[k] += &factor * BigRational::from_integer(self.table[i][j][k].clone());
                    }
                }
            }
        }
        return result;
    }

    pub fn mul_integral(&self, lhs: &[BigInt], rhs: &[BigInt]) -> Vec<BigInt> {
        let n = self.degree();
        let mut result = vec![BigInt::zero(); n];
        for i in 0..n {
            if lhs[i].is_zero() {
                continue;
            }
            for j in 0..n {
                if rhs[j].is_zero() {
                    continue;
                }
                let factor = &lhs[i] * &rhs[j];
                for k in 0..n {
                    if !self.table[i][j][k].is_zero() {
                        result[k] += &factor * &self.table[i][j][k];
                    }
                }
            }
        }
        return result;
    }

    ///
    /// Computes `x^e mod pO` for an element `x` of the order, given by its integer coordinates.
    /// All coordinates of the result are in `[0, p)`.
    ///
    pub fn pow_mod_p(&self, x: &[BigInt], e: &BigInt, p: &BigInt) -> Vec<BigInt> {
        // the first basis element need not be 1
        let mut result = integral(self.coordinates(&QPoly::one())).unwrap_or_else(|| panic!("order does not contain 1"));
        let reduce = |v: Vec<BigInt>| v.into_iter().map(|c| reduce_mod(&c, p)).collect::<Vec<_>>();
        let mut power = reduce(x.to_vec());
        let bits = e.bits();
        for i in 0..bits {
            if e.bit(i) {
                result = reduce(self.mul_integral(&result, &power));
            }
            if i + 1 < bits {
                power = reduce(self.mul_integral(&power, &power));
            }
        }
        return result;
    }

    ///
    /// The matrix of the `Z`-linear map `O -> O, y -> xy` w.r.t. the basis of the order.
    ///
    pub fn mul_matrix(&self, x: &[BigRational]) -> OwnedMatrix<BigRational> {
        let n = self.degree();
        let cols = (0..n).map(|j| {
            let mut unit = vec![BigRational::zero(); n];
            unit[j] = BigRational::one();
            self.mul(x, &unit)
        }).collect();
        OwnedMatrix::from_cols(n, cols)
    }
}

///
/// Returns the given rational vector as integer vector, if all entries are integral.
///
pub fn integral(x: Vec<BigRational>) -> Option<Vec<BigInt>> {
    if x.iter().all(|c| c.is_integer()) {
        Some(x.into_iter().map(|c| c.to_integer()).collect())
    } else {
        None
    }
}

#[cfg(test)]
use crate::tracing::LogAlgorithmSubscriber;

#[cfg(test)]
fn golden_ratio_order() -> Order {
    let half = BigRational::new(BigInt::from(1), BigInt::from(2));
    let modulus = QPoly::from_ints(&[-5, 0, 1]);
    Order::new(modulus, vec![QPoly::one(), QPoly::from_coeffs(vec![half.clone(), half])]).unwrap()
}

#[test]
fn test_order_new() {
    LogAlgorithmSubscriber::init_test();
    let order = golden_ratio_order();
    assert_eq!(BigRational::from_integer(BigInt::from(2)), order.index());
    // w^2 = w + 1
    assert_eq!(vec![BigInt::from(1), BigInt::from(1)], order.mul_integral(&[BigInt::from(0), BigInt::from(1)], &[BigInt::from(0), BigInt::from(1)]));
    assert!(order.contains(&QPoly::from_ints(&[0, 1])));
    assert!(!order.contains(&QPoly::from_coeffs(vec![BigRational::zero(), BigRational::new(BigInt::from(1), BigInt::from(2))])));

    let half = BigRational::new(BigInt::from(1), BigInt::from(2));
    // (1 + X)/2 is not integral over Z in Q(i)
    assert!(Order::new(QPoly::from_ints(&[1, 0, 1]), vec![QPoly::one(), QPoly::from_coeffs(vec![half.clone(), half])]).is_err());
    assert!(Order::new(QPoly::from_ints(&[1, 0, 1]), vec![QPoly::one(), QPoly::from_ints(&[2])]).is_err());
}

#[test]
fn test_from_generators() {
    LogAlgorithmSubscriber::init_test();
    let half = BigRational::new(BigInt::from(1), BigInt::from(2));
    let modulus = QPoly::from_ints(&[-5, 0, 1]);
    let order = Order::from_generators(modulus, &[QPoly::one(), QPoly::from_ints(&[0, 1]), QPoly::from_coeffs(vec![-half.clone(), half.clone()])]).unwrap();
    assert_eq!(&[QPoly::one(), QPoly::from_coeffs(vec![half.clone(), half])][..], order.basis());
}

#[test]
fn test_pow_mod_p() {
    LogAlgorithmSubscriber::init_test();
    let order = golden_ratio_order();
    // w^2 = w + 1, w^3 = 2w + 1, w^4 = 3w + 2, w^5 = 5w + 3
    let w = [BigInt::from(0), BigInt::from(1)];
    assert_eq!(vec![BigInt::from(3), BigInt::from(5)], order.pow_mod_p(&w, &BigInt::from(5), &BigInt::from(7)));
    assert_eq!(vec![BigInt::from(3), BigInt::from(0)], order.pow_mod_p(&w, &BigInt::from(5), &BigInt::from(5)));
}
