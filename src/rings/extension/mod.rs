///
/// Contains [`order::Order`], orders in a number field given by a `Z`-basis of
/// polynomials in the root of the defining polynomial.
///
pub mod order;
///
/// Contains [`number_field::NumberField`], a number field together with its
/// maximal order.
///
pub mod number_field;
///
/// Contains [`embeddings::EmbeddingTable`], the values of the integral basis under all
/// complex embeddings, to some precision.
///
pub mod embeddings;
///
/// Contains [`ideal::Ideal`] and [`ideal::Prime`], and the decomposition of rational primes.
///
pub mod ideal;
