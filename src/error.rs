use thiserror::Error;

///
/// Errors that can occur during ring arithmetic. None of them is recovered from
/// internally; every failing operation returns the error to its immediate caller.
///
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RingError {
    /// A ring was created with zero modulus, or something was divided by an exact zero.
    #[error("division by zero")]
    DivisionByZero,
    /// An operand (or a modulus) does not belong to the ring it was supposed to be taken from.
    #[error("operand does not belong to the expected ring")]
    TypeMismatch,
    /// The two operands of a binary operation live in different, incompatible parents.
    #[error("operands belong to rings with incompatible moduli")]
    IncompatibleModuli,
    /// The element is not a unit of its ring.
    #[error("element is not invertible")]
    NotInvertible,
    /// A division was requested to be exact, but the quotient does not exist.
    #[error("not an exact division")]
    NotExactDivision,
    /// No square root exists at the requested precision.
    #[error("element is not a square")]
    NotASquare,
    /// An integer argument was outside of its domain, e.g. a negative shift amount.
    #[error("{what} must be non-negative, got {value}")]
    Domain { what: &'static str, value: i64 },
    /// The requested precision model is not available.
    #[error("precision model {0} is not supported")]
    UnsupportedModel(&'static str)
}

pub type RingResult<T> = Result<T, RingError>;

///
/// Converts a signed integer argument into a `usize`, failing with [`RingError::Domain`]
/// if it is negative.
///
pub fn non_negative(what: &'static str, value: i64) -> RingResult<usize> {
    usize::try_from(value).map_err(|_| RingError::Domain { what, value })
}

#[test]
fn test_non_negative() {
    assert_eq!(Ok(5), non_negative("shift", 5));
    assert_eq!(Err(RingError::Domain { what: "shift", value: -1 }), non_negative("shift", -1));
    assert_eq!("shift must be non-negative, got -1", format!("{}", RingError::Domain { what: "shift", value: -1 }));
}
