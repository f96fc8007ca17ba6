//! Defines the domain tags and the element contract shared by all coefficient domains.
//!
//! Every element belongs to exactly one domain, identified by its [DomainTag]:
//! - The integers, with elements of type [IntegerElement](integer::IntegerElement).
//! - The prime-power rings `Z / p^k Z`, with elements of type [PrimePowerElement](prime_power::PrimePowerElement).
//!
//! The rationals, finite fields and Galois fields have tags, so that an enclosing
//! structure can order them, but no element type in this crate.
//!
//! Binary arithmetic comes in two families. The *same* family combines two elements
//! of the identical domain. The *coeff* family combines an element with a value from a
//! domain below it, a [Coeff], and carries a `symmetric` flag that selects the
//! representative of the result. Which family is used is decided by [DomainTag::dispatch].
pub mod integer;
pub mod prime_power;

use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;

use rug::Integer as MultiPrecisionInteger;

use crate::error::DomainError;
use integer::IntegerElement;

/// The smallest integer that is stored as an immediate.
pub const MIN_IMMEDIATE: i64 = -(1 << 60) + 2;
/// The largest integer that is stored as an immediate.
pub const MAX_IMMEDIATE: i64 = (1 << 60) - 2;

/// Returns `true` iff `n` fits the immediate range.
#[inline]
pub fn fits_immediate(n: i64) -> bool {
    (MIN_IMMEDIATE..=MAX_IMMEDIATE).contains(&n)
}

/// The domain an element belongs to. Domains are ordered by their numeric value,
/// which an enclosing structure uses to decide which operand is the coefficient.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum DomainTag {
    Integer = 1,
    Rational = 2,
    FiniteField = 3,
    GaloisField = 4,
    PrimePower = 5,
    Undefined = 32000,
}

/// How a binary operation between two tagged operands has to be evaluated.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Dispatch {
    /// Both operands are in the same domain.
    Same,
    /// The right operand is a coefficient of the left one.
    LhsOuter,
    /// The left operand is a coefficient of the right one.
    RhsOuter,
}

impl DomainTag {
    #[inline]
    pub fn value(self) -> i32 {
        self as i32
    }

    pub fn from_value(value: i32) -> Option<DomainTag> {
        match value {
            1 => Some(DomainTag::Integer),
            2 => Some(DomainTag::Rational),
            3 => Some(DomainTag::FiniteField),
            4 => Some(DomainTag::GaloisField),
            5 => Some(DomainTag::PrimePower),
            32000 => Some(DomainTag::Undefined),
            _ => None,
        }
    }

    /// Decide the calling convention for an operation on operands with tags `lhs` and `rhs`.
    #[inline]
    pub fn dispatch(lhs: DomainTag, rhs: DomainTag) -> Dispatch {
        match lhs.cmp(&rhs) {
            Ordering::Equal => Dispatch::Same,
            Ordering::Greater => Dispatch::LhsOuter,
            Ordering::Less => Dispatch::RhsOuter,
        }
    }
}

impl Display for DomainTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DomainTag::Integer => "integer",
            DomainTag::Rational => "rational",
            DomainTag::FiniteField => "finite field",
            DomainTag::GaloisField => "Galois field",
            DomainTag::PrimePower => "prime power",
            DomainTag::Undefined => "undefined",
        })
    }
}

/// The level of an element inside a composite structure. All coefficient
/// domains live at [Level::BASE].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Level(pub i32);

impl Level {
    pub const BASE: Level = Level(-32000);
    pub const QUOTIENT: Level = Level(32000);

    #[inline]
    pub fn is_base(self) -> bool {
        self == Level::BASE
    }
}

/// A coefficient operand: a value from a domain below the receiving element.
#[derive(Clone, Copy, Debug)]
pub enum Coeff<'a> {
    Immediate(i64),
    Integer(&'a IntegerElement),
}

impl Coeff<'_> {
    pub fn level_coeff(&self) -> DomainTag {
        DomainTag::Integer
    }

    pub fn to_multi_prec(&self) -> MultiPrecisionInteger {
        match self {
            Coeff::Immediate(n) => MultiPrecisionInteger::from(*n),
            Coeff::Integer(i) => i.as_multi_prec().clone(),
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Coeff::Immediate(n) => *n == 0,
            Coeff::Integer(i) => i.as_multi_prec().cmp0() == Ordering::Equal,
        }
    }
}

impl From<i64> for Coeff<'_> {
    fn from(value: i64) -> Self {
        Coeff::Immediate(value)
    }
}

impl<'a> From<&'a IntegerElement> for Coeff<'a> {
    fn from(value: &'a IntegerElement) -> Self {
        Coeff::Integer(value)
    }
}

/// The arithmetic and query contract of an element of a coefficient domain.
///
/// Elements have value semantics: every binary operation returns a newly owned
/// element and leaves its operands untouched. The division family reports
/// zero divisors and inexact divisions through [DomainError].
pub trait DomainElement: Clone + PartialEq + Eq + Hash + Debug + Display {
    /// The context needed to manufacture elements without an existing instance.
    type Domain: Clone;

    fn domain(&self) -> Self::Domain;
    fn level_coeff(&self) -> DomainTag;
    fn level(&self) -> Level {
        Level::BASE
    }
    fn class_name(&self) -> &'static str;

    fn gen_zero(domain: &Self::Domain) -> Self;
    fn gen_one(domain: &Self::Domain) -> Self;
    fn is_zero(&self) -> bool;
    fn is_one(&self) -> bool;
    /// Returns `true` iff the value fits the immediate range. This is only an
    /// optimization hint for an enclosing structure.
    fn is_imm(&self) -> bool;
    fn int_val(&self) -> Option<i64>;
    /// Reduce the value modulo the small prime `p` into `[0, p)`.
    fn int_mod(&self, p: u32) -> u32;
    fn sign(&self) -> i32;
    fn neg(&self) -> Self;

    /// Bring the stored value into the canonical representative of its domain.
    fn normalize_myself(&mut self) {}

    fn normalized(&self) -> Self {
        let mut c = self.clone();
        c.normalize_myself();
        c
    }

    /// Write the value followed by `separator` to `f`.
    fn print<W: std::fmt::Write>(&self, f: &mut W, separator: &str) -> std::fmt::Result {
        write!(f, "{}{}", self, separator)
    }

    fn compare_same(&self, other: &Self) -> Ordering;
    fn add_same(&self, other: &Self) -> Self;
    fn sub_same(&self, other: &Self) -> Self;
    fn mul_same(&self, other: &Self) -> Self;
    /// Exact division.
    fn divide_same(&self, other: &Self) -> Result<Self, DomainError>;
    /// Quotient, rounded towards zero.
    fn div_same(&self, other: &Self) -> Result<Self, DomainError>;
    /// Remainder of [DomainElement::div_same].
    fn mod_same(&self, other: &Self) -> Result<Self, DomainError>;
    /// Quotient, rounded towards negative infinity.
    fn floor_div_same(&self, other: &Self) -> Result<Self, DomainError>;
    /// Remainder of [DomainElement::floor_div_same].
    fn modulo_same(&self, other: &Self) -> Result<Self, DomainError>;
    /// Floored quotient and remainder, computed with a single division.
    fn divrem_same(&self, other: &Self) -> Result<(Self, Self), DomainError>;

    /// Like [DomainElement::divrem_same], but also report whether the division was exact.
    fn divrem_same_t(&self, other: &Self) -> Result<(Self, Self, bool), DomainError> {
        let (q, r) = self.divrem_same(other)?;
        let exact = r.is_zero();
        Ok((q, r, exact))
    }

    fn compare_coeff(&self, c: Coeff<'_>) -> Ordering;
    fn add_coeff(&self, c: Coeff<'_>, symmetric: bool) -> Self;
    fn sub_coeff(&self, c: Coeff<'_>, symmetric: bool) -> Self;
    fn mul_coeff(&self, c: Coeff<'_>, symmetric: bool) -> Self;
    fn divide_coeff(&self, c: Coeff<'_>, symmetric: bool) -> Result<Self, DomainError>;
    fn div_coeff(&self, c: Coeff<'_>, symmetric: bool) -> Result<Self, DomainError>;
    fn mod_coeff(&self, c: Coeff<'_>, symmetric: bool) -> Result<Self, DomainError>;
    fn floor_div_coeff(&self, c: Coeff<'_>, symmetric: bool) -> Result<Self, DomainError>;
    fn modulo_coeff(&self, c: Coeff<'_>, symmetric: bool) -> Result<Self, DomainError>;
    fn divrem_coeff(&self, c: Coeff<'_>, symmetric: bool) -> Result<(Self, Self), DomainError>;

    fn divrem_coeff_t(
        &self,
        c: Coeff<'_>,
        symmetric: bool,
    ) -> Result<(Self, Self, bool), DomainError> {
        let (q, r) = self.divrem_coeff(c, symmetric)?;
        let exact = r.is_zero();
        Ok((q, r, exact))
    }
}

#[cfg(test)]
mod test {
    use super::{fits_immediate, Dispatch, DomainTag, Level, MAX_IMMEDIATE, MIN_IMMEDIATE};

    #[test]
    fn dispatch() {
        assert_eq!(
            DomainTag::dispatch(DomainTag::Integer, DomainTag::Integer),
            Dispatch::Same
        );
        assert_eq!(
            DomainTag::dispatch(DomainTag::PrimePower, DomainTag::Integer),
            Dispatch::LhsOuter
        );
        assert_eq!(
            DomainTag::dispatch(DomainTag::Integer, DomainTag::PrimePower),
            Dispatch::RhsOuter
        );
        assert_eq!(
            DomainTag::dispatch(DomainTag::Undefined, DomainTag::GaloisField),
            Dispatch::LhsOuter
        );
    }

    #[test]
    fn tag_values() {
        for t in [
            DomainTag::Integer,
            DomainTag::Rational,
            DomainTag::FiniteField,
            DomainTag::GaloisField,
            DomainTag::PrimePower,
            DomainTag::Undefined,
        ] {
            assert_eq!(DomainTag::from_value(t.value()), Some(t));
        }
        assert_eq!(DomainTag::from_value(6), None);
        assert_eq!(DomainTag::PrimePower.to_string(), "prime power");
    }

    #[test]
    fn immediates() {
        assert!(fits_immediate(0));
        assert!(fits_immediate(MAX_IMMEDIATE));
        assert!(fits_immediate(MIN_IMMEDIATE));
        assert!(!fits_immediate(MAX_IMMEDIATE + 1));
        assert!(!fits_immediate(i64::MIN));
        assert!(Level::BASE < Level(0) && Level(0) < Level::QUOTIENT);
        assert!(Level::BASE.is_base());
    }
}
