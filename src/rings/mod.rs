///
/// Contains [`poly::dense_poly::QPoly`] for polynomials over `Q`, and
/// [`poly::zn_poly::ZnPolyRing`] for polynomials over `Z/nZ`.
///
pub mod poly;
///
/// Contains [`zn::Zn`], the ring `Z/nZ` for arbitrary moduli.
///
pub mod zn;
///
/// Contains the trait [`approx_real::ApproxRealField`] for approximations to the real
/// numbers, together with implementations based on `f64` and on arbitrary-precision
/// floating point numbers.
///
pub mod approx_real;
///
/// Contains [`float_complex::ComplexField`], approximate complex arithmetic over an
/// [`approx_real::ApproxRealField`].
///
pub mod float_complex;
///
/// Contains number fields, their maximal orders, embeddings and ideals.
///
pub mod extension;
