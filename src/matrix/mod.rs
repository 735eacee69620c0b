///
/// Contains [`owned::OwnedMatrix`], the dense matrix type used throughout the crate.
///
pub mod owned;

pub use owned::OwnedMatrix;
