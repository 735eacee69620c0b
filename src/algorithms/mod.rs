///
/// Contains an implementation of the Miller-Rabin probabilistic primality test.
///
pub mod miller_rabin;
///
/// Contains an implementation of integer factoring by trial division and
/// Pollard's rho method.
///
pub mod int_factor;
///
/// Contains [`resultant::resultant()`] and discriminants of rational polynomials.
///
pub mod resultant;
///
/// Contains an implementation of Sturm sequences for counting real roots.
///
pub mod sturm;
///
/// Contains the Cantor-Zassenhaus algorithm for factoring polynomials over prime fields.
///
pub mod cantor_zassenhaus;
///
/// Contains Hensel lifting of factorizations modulo `p` to factorizations modulo `p^e`.
///
pub mod hensel;
///
/// Contains [`poly_factor::is_irreducible()`], an irreducibility test for integral polynomials.
///
pub mod poly_factor;
///
/// Contains [`poly_roots::complex_roots()`] for computing all complex roots of a
/// squarefree polynomial to a given precision.
///
pub mod poly_roots;
///
/// Contains algorithms for solving linear systems over `Q` and `Fp`, and for
/// computing Hermite normal forms.
///
pub mod linsolve;
///
/// Contains the Round 2 algorithm for computing `p`-maximal orders.
///
pub mod round2;
///
/// Contains implementations of the Lenstra-Lenstra-Lovasz algorithm for lattice basis
/// reduction.
///
pub mod lll;
///
/// Contains an implementation of the Fincke-Pohst algorithm for enumerating short
/// lattice vectors.
///
pub mod fincke_pohst;
///
/// Contains [`polred::polred()`], [`polred::polredbest()`] and [`polred::polredabs()`]
/// for computing small defining polynomials of number fields.
///
pub mod polred;
///
/// Contains [`galois::galois_group()`] and the action of automorphisms on elements,
/// ideals and primes.
///
pub mod galois;
