///
/// Contains [`dense_poly::QPoly`], dense polynomials with rational coefficients.
///
pub mod dense_poly;
///
/// Contains [`zn_poly::ZnPolyRing`], the ring of polynomials over `Z/nZ`.
///
pub mod zn_poly;
