#![allow(non_snake_case)]

//!
//! Computations in algebraic number fields `K = Q[X]/(T)`.
//!
//! The central object is [`rings::extension::number_field::NumberField`], which computes
//! the maximal order of `K` during construction (using the Round 2 algorithm). Based on
//! that, this crate provides
//!  - LLL-reduction of the integral basis w.r.t. the `T2`-form, see [`algorithms::lll`]
//!  - computation of small defining polynomials, see [`algorithms::polred`]
//!  - ideals, prime decomposition and valuations, see [`rings::extension::ideal`]
//!  - automorphisms, Frobenius elements and ramification groups, see [`algorithms::galois`]
//!
//! All operations are deterministic and return a [`error::Result`]. Numerical computations
//! are retried internally with increasing precision.
//!

///
/// Contains [`error::NumberFieldError`], the error type of all operations.
///
pub mod error;
///
/// Contains [`tracing::LogAlgorithmSubscriber`], a simple subscriber for the
/// `tracing` events and spans emitted by the algorithms of this crate.
///
pub mod tracing;
///
/// Contains utilities for arbitrary-precision integers.
///
pub mod integer;
///
/// Contains [`matrix::OwnedMatrix`], the dense matrix type used throughout the crate.
///
pub mod matrix;
pub mod algorithms;
pub mod rings;
