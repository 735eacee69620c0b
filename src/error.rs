use num_bigint::BigInt;
use thiserror::Error;

///
/// The reason why a defining polynomial was rejected.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateKind {
    /// The polynomial is constant, i.e. does not define an extension of `Q`
    ZeroDegree,
    /// The polynomial shares a factor with its derivative
    NotSquarefree,
    /// The polynomial is squarefree, but has a nontrivial factor over `Q`
    Reducible
}

impl std::fmt::Display for DegenerateKind {

    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DegenerateKind::ZeroDegree => write!(f, "polynomial has degree <= 0"),
            DegenerateKind::NotSquarefree => write!(f, "polynomial is not squarefree"),
            DegenerateKind::Reducible => write!(f, "polynomial is reducible over Q")
        }
    }
}

///
/// Error type of all operations of this crate.
///
/// The variants fall into three classes:
///  - domain errors, which are caused by invalid input and can be checked for via
///    [`NumberFieldError::is_domain_error()`]
///  - [`NumberFieldError::PrecisionExhausted`], which is raised if a numerical
///    computation did not succeed even at the maximal allowed precision
///  - [`NumberFieldError::Bug`], which indicates that an internal invariant was
///    violated; this should never happen for valid input
///
/// Note that the internal "not enough precision" condition is never returned by
/// public functions, it is always handled by retrying at higher precision.
///
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberFieldError {
    #[error("the defining polynomial is not monic and integral, and rescaling was not allowed")]
    NonMonicInput,
    #[error("invalid defining polynomial: {0}")]
    ReducibleOrSingularInput(DegenerateKind),
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("invalid integral basis: {0}")]
    InvalidBasis(String),
    #[error("{0} is not a prime")]
    NotPrime(BigInt),
    #[error("the prime above {0} is ramified")]
    RamifiedPrime(BigInt),
    #[error("the number field is not Galois over Q")]
    NotGalois,
    #[error("invalid automorphism: {0}")]
    InvalidAutomorphism(String),
    #[error("invalid subgroup: {0}")]
    InvalidSubgroup(String),
    #[error("unsupported input: {0}")]
    Unsupported(String),
    #[error("computation did not succeed at the maximal precision of {0} bits")]
    PrecisionExhausted(u64),
    #[error("internal invariant violated: {0}")]
    Bug(String)
}

impl NumberFieldError {

    ///
    /// Returns whether this error is caused by invalid input.
    ///
    pub fn is_domain_error(&self) -> bool {
        !self.is_bug()
    }

    ///
    /// Returns whether this error indicates a defect, either in this crate or
    /// in data that the caller asserted to be correct (e.g. a supplied integral basis).
    ///
    pub fn is_bug(&self) -> bool {
        match self {
            NumberFieldError::Bug(_) | NumberFieldError::PrecisionExhausted(_) => true,
            _ => false
        }
    }
}

pub type Result<T> = std::result::Result<T, NumberFieldError>;

#[test]
fn test_error_classes() {
    assert!(NumberFieldError::NotGalois.is_domain_error());
    assert!(NumberFieldError::ReducibleOrSingularInput(DegenerateKind::Reducible).is_domain_error());
    assert!(NumberFieldError::Bug("frobenius".to_owned()).is_bug());
    assert!(NumberFieldError::PrecisionExhausted(4096).is_bug());
    assert_eq!("invalid defining polynomial: polynomial is not squarefree", format!("{}", NumberFieldError::ReducibleOrSingularInput(DegenerateKind::NotSquarefree)));
}
