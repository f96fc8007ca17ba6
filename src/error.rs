//! Value-domain conditions reported by element operations.

use crate::domains::DomainTag;

/// A recoverable condition signalled by an arithmetic or configuration call.
///
/// Caller defects, such as mixing prime-power elements with different moduli,
/// are not represented here: they panic.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("division is not exact")]
    NotExact,
    #[error("not a perfect square")]
    NotPerfectSquare,
    #[error("element is not invertible")]
    NotInvertible,
    #[error("{0} is not a prime")]
    InvalidPrime(u32),
    #[error("exponent must be at least 1, got {0}")]
    InvalidExponent(u32),
    #[error("could not parse integer: {0}")]
    Parse(String),
    #[error("{operation} is not supported in the {domain} domain")]
    Unsupported {
        operation: &'static str,
        domain: DomainTag,
    },
}
