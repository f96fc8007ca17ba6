//! The run-time element that client code holds.
//!
//! An [Element] is one of a small set of variants, one per implemented domain, plus an
//! immediate variant for integers that fit [MIN_IMMEDIATE](crate::domains::MIN_IMMEDIATE)
//! ..=[MAX_IMMEDIATE](crate::domains::MAX_IMMEDIATE). Every binary operation asks
//! [DomainTag::dispatch] whether the operands share a domain, in which case the *same*
//! family of the domain is used, or whether one of them is a coefficient of the other, in
//! which case the *coeff* family of the outer operand is used.
//!
//! ```
//! use canonical_form::{domains::prime_power::PrimePowerDomain, element::Element};
//!
//! let d = PrimePowerDomain::new(5, 2).unwrap();
//! let a = Element::from(d.element(7));
//! let b = Element::from(30);
//! assert_eq!((&a * &b).to_string(), "10");
//! ```

use std::{
    borrow::Cow,
    cmp::Ordering,
    fmt::{Display, Formatter},
    hash::{Hash, Hasher},
    ops::{Add, Mul, Neg, Sub},
    str::FromStr,
};

use rug::Integer as MultiPrecisionInteger;
use tracing::trace;

use crate::{
    domains::{
        fits_immediate,
        integer::IntegerElement,
        prime_power::PrimePowerElement,
        Coeff, Dispatch, DomainElement, DomainTag, Level,
    },
    error::DomainError,
};

/// An element of any of the implemented domains.
///
/// The `From` constructors store integers in the immediate range as [Element::Immediate]
/// and all other integers as [Element::Integer]. Equality and hashing compare integers by
/// value, so an element built directly from either variant behaves the same.
#[derive(Clone, Debug)]
pub enum Element {
    Immediate(i64),
    Integer(IntegerElement),
    PrimePower(PrimePowerElement),
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Element::Immediate(a), Element::Immediate(b)) => a == b,
            (Element::PrimePower(a), Element::PrimePower(b)) => a == b,
            (Element::PrimePower(_), _) | (_, Element::PrimePower(_)) => false,
            _ => self.integer() == other.integer(),
        }
    }
}

impl Eq for Element {}

impl Hash for Element {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.level_coeff().hash(state);
        match self {
            Element::Immediate(n) => n.hash(state),
            Element::Integer(i) => match i.to_i64() {
                Some(n) => n.hash(state),
                None => i.hash(state),
            },
            Element::PrimePower(p) => p.hash(state),
        }
    }
}

impl From<i64> for Element {
    #[inline]
    fn from(value: i64) -> Self {
        if fits_immediate(value) {
            Element::Immediate(value)
        } else {
            trace!(value, "promoting immediate to arbitrary precision");
            Element::Integer(IntegerElement::new(value))
        }
    }
}

impl From<i32> for Element {
    #[inline]
    fn from(value: i32) -> Self {
        Element::Immediate(value as i64)
    }
}

impl From<u32> for Element {
    #[inline]
    fn from(value: u32) -> Self {
        Element::Immediate(value as i64)
    }
}

impl From<IntegerElement> for Element {
    /// Convert to an element, demoting the value to an immediate if it fits.
    #[inline]
    fn from(value: IntegerElement) -> Self {
        match value.to_i64() {
            Some(n) if fits_immediate(n) => Element::Immediate(n),
            _ => Element::Integer(value),
        }
    }
}

impl From<MultiPrecisionInteger> for Element {
    #[inline]
    fn from(value: MultiPrecisionInteger) -> Self {
        IntegerElement::from(value).into()
    }
}

impl From<PrimePowerElement> for Element {
    #[inline]
    fn from(value: PrimePowerElement) -> Self {
        Element::PrimePower(value)
    }
}

impl TryFrom<Element> for IntegerElement {
    type Error = Element;

    fn try_from(value: Element) -> Result<Self, Self::Error> {
        match value {
            Element::Immediate(n) => Ok(IntegerElement::new(n)),
            Element::Integer(i) => Ok(i),
            e => Err(e),
        }
    }
}

impl TryFrom<Element> for PrimePowerElement {
    type Error = Element;

    fn try_from(value: Element) -> Result<Self, Self::Error> {
        match value {
            Element::PrimePower(p) => Ok(p),
            e => Err(e),
        }
    }
}

impl FromStr for Element {
    type Err = DomainError;

    /// Parse a decimal integer.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<IntegerElement>().map(Element::from)
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Element::Immediate(n) => Display::fmt(n, f),
            Element::Integer(i) => Display::fmt(i, f),
            Element::PrimePower(p) => Display::fmt(p, f),
        }
    }
}

/// The operands of a binary operation, after dispatch.
enum Operands<'a> {
    Immediates(i64, i64),
    Integers(Cow<'a, IntegerElement>, Cow<'a, IntegerElement>),
    PrimePowers(&'a PrimePowerElement, &'a PrimePowerElement),
    /// The right operand is a coefficient of the left one.
    LhsOuter(&'a PrimePowerElement, Coeff<'a>),
    /// The left operand is a coefficient of the right one.
    RhsOuter(Coeff<'a>, &'a PrimePowerElement),
}

fn operands<'a>(a: &'a Element, b: &'a Element) -> Operands<'a> {
    match DomainTag::dispatch(a.level_coeff(), b.level_coeff()) {
        Dispatch::Same => match (a, b) {
            (Element::Immediate(x), Element::Immediate(y)) => Operands::Immediates(*x, *y),
            (Element::PrimePower(x), Element::PrimePower(y)) => Operands::PrimePowers(x, y),
            _ => Operands::Integers(a.integer(), b.integer()),
        },
        Dispatch::LhsOuter => match a {
            Element::PrimePower(x) => Operands::LhsOuter(x, b.coeff()),
            _ => unreachable!("Only prime-power elements have coefficients"),
        },
        Dispatch::RhsOuter => match b {
            Element::PrimePower(y) => Operands::RhsOuter(a.coeff(), y),
            _ => unreachable!("Only prime-power elements have coefficients"),
        },
    }
}

/// Embed the coefficient `c` in the domain of `p`.
fn promote(c: Coeff<'_>, p: &PrimePowerElement) -> PrimePowerElement {
    p.domain().element(c.to_multi_prec())
}

/// Apply the symmetric preference of the domain of `p` to a result of the same family.
fn with_preference(mut p: PrimePowerElement) -> Element {
    if p.domain().is_symmetric() {
        p.normalize_myself();
    }
    Element::PrimePower(p)
}

macro_rules! division_op {
    ($(#[$attr: meta])* $name: ident, $same: ident, $coeff: ident) => {
        $(#[$attr])*
        pub fn $name(&self, other: &Element) -> Result<Element, DomainError> {
            match operands(self, other) {
                Operands::Immediates(a, b) => IntegerElement::new(a)
                    .$same(&IntegerElement::new(b))
                    .map(Element::from),
                Operands::Integers(a, b) => a.$same(&b).map(Element::from),
                Operands::PrimePowers(a, b) => a.$same(b).map(Element::from),
                Operands::LhsOuter(a, c) => a
                    .$coeff(c, a.domain().is_symmetric())
                    .map(Element::from),
                Operands::RhsOuter(c, b) => promote(c, b).$same(b).map(with_preference),
            }
        }
    };
}

impl Element {
    /// The value as an integer element. Must only be called on the integer domain.
    fn integer(&self) -> Cow<'_, IntegerElement> {
        match self {
            Element::Immediate(n) => Cow::Owned(IntegerElement::new(*n)),
            Element::Integer(i) => Cow::Borrowed(i),
            Element::PrimePower(_) => unreachable!("A prime-power element is not an integer"),
        }
    }

    /// The value as a coefficient. Must only be called on the integer domain.
    fn coeff(&self) -> Coeff<'_> {
        match self {
            Element::Immediate(n) => Coeff::Immediate(*n),
            Element::Integer(i) => Coeff::Integer(i),
            Element::PrimePower(_) => unreachable!("A prime-power element is never a coefficient"),
        }
    }

    pub fn level_coeff(&self) -> DomainTag {
        match self {
            Element::Immediate(_) | Element::Integer(_) => DomainTag::Integer,
            Element::PrimePower(_) => DomainTag::PrimePower,
        }
    }

    #[inline]
    pub fn level(&self) -> Level {
        Level::BASE
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            Element::Immediate(_) => "Immediate",
            Element::Integer(i) => i.class_name(),
            Element::PrimePower(p) => p.class_name(),
        }
    }

    /// The zero of the domain of `self`.
    pub fn gen_zero(&self) -> Element {
        match self {
            Element::PrimePower(p) => PrimePowerElement::gen_zero(&p.domain()).into(),
            _ => Element::Immediate(0),
        }
    }

    /// The one of the domain of `self`.
    pub fn gen_one(&self) -> Element {
        match self {
            Element::PrimePower(p) => PrimePowerElement::gen_one(&p.domain()).into(),
            _ => Element::Immediate(1),
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Element::Immediate(n) => *n == 0,
            Element::Integer(i) => i.is_zero(),
            Element::PrimePower(p) => p.is_zero(),
        }
    }

    pub fn is_one(&self) -> bool {
        match self {
            Element::Immediate(n) => *n == 1,
            Element::Integer(i) => i.is_one(),
            Element::PrimePower(p) => p.is_one(),
        }
    }

    pub fn is_imm(&self) -> bool {
        match self {
            Element::Immediate(n) => fits_immediate(*n),
            Element::Integer(i) => i.is_imm(),
            Element::PrimePower(p) => p.is_imm(),
        }
    }

    pub fn int_val(&self) -> Option<i64> {
        match self {
            Element::Immediate(n) => Some(*n),
            Element::Integer(i) => i.int_val(),
            Element::PrimePower(p) => p.int_val(),
        }
    }

    pub fn int_mod(&self, p: u32) -> u32 {
        match self {
            Element::Immediate(n) => {
                assert!(p != 0, "Cannot reduce modulo 0");
                n.rem_euclid(p as i64) as u32
            }
            Element::Integer(i) => i.int_mod(p),
            Element::PrimePower(pp) => pp.int_mod(p),
        }
    }

    pub fn sign(&self) -> i32 {
        match self {
            Element::Immediate(n) => n.signum() as i32,
            Element::Integer(i) => i.sign(),
            Element::PrimePower(p) => p.sign(),
        }
    }

    pub fn neg(&self) -> Element {
        match self {
            Element::Immediate(n) => match n.checked_neg() {
                Some(m) => Element::from(m),
                None => IntegerElement::from(-(*n as i128)).into(),
            },
            Element::Integer(i) => DomainElement::neg(i).into(),
            Element::PrimePower(p) => p.neg().into(),
        }
    }

    pub fn normalize_myself(&mut self) {
        if let Element::PrimePower(p) = self {
            p.normalize_myself();
        }
    }

    pub fn normalized(&self) -> Element {
        let mut c = self.clone();
        c.normalize_myself();
        c
    }

    /// Compute the exact square root of a perfect square integer.
    pub fn sqrt(&self) -> Result<Element, DomainError> {
        match self {
            Element::Immediate(n) => IntegerElement::new(*n).sqrt().map(Element::from),
            Element::Integer(i) => i.sqrt().map(Element::from),
            Element::PrimePower(_) => Err(DomainError::Unsupported {
                operation: "sqrt",
                domain: DomainTag::PrimePower,
            }),
        }
    }

    /// Write the value followed by `separator` to `f`.
    pub fn print<W: std::fmt::Write>(&self, f: &mut W, separator: &str) -> std::fmt::Result {
        match self {
            Element::Immediate(n) => write!(f, "{}{}", n, separator),
            Element::Integer(i) => i.print(f, separator),
            Element::PrimePower(p) => p.print(f, separator),
        }
    }

    pub fn compare(&self, other: &Element) -> Ordering {
        match operands(self, other) {
            Operands::Immediates(a, b) => a.cmp(&b),
            Operands::Integers(a, b) => a.compare_same(&b),
            Operands::PrimePowers(a, b) => a.compare_same(b),
            Operands::LhsOuter(a, c) => a.compare_coeff(c),
            Operands::RhsOuter(c, b) => b.compare_coeff(c).reverse(),
        }
    }

    pub fn add(&self, other: &Element) -> Element {
        match operands(self, other) {
            Operands::Immediates(a, b) => match a.checked_add(b) {
                Some(n) => Element::from(n),
                None => IntegerElement::from(a as i128 + b as i128).into(),
            },
            Operands::Integers(a, b) => a.add_same(&b).into(),
            Operands::PrimePowers(a, b) => a.add_same(b).into(),
            Operands::LhsOuter(a, c) => a.add_coeff(c, a.domain().is_symmetric()).into(),
            Operands::RhsOuter(c, b) => b.add_coeff(c, b.domain().is_symmetric()).into(),
        }
    }

    pub fn sub(&self, other: &Element) -> Element {
        match operands(self, other) {
            Operands::Immediates(a, b) => match a.checked_sub(b) {
                Some(n) => Element::from(n),
                None => IntegerElement::from(a as i128 - b as i128).into(),
            },
            Operands::Integers(a, b) => a.sub_same(&b).into(),
            Operands::PrimePowers(a, b) => a.sub_same(b).into(),
            Operands::LhsOuter(a, c) => a.sub_coeff(c, a.domain().is_symmetric()).into(),
            Operands::RhsOuter(c, b) => b.neg().add_coeff(c, b.domain().is_symmetric()).into(),
        }
    }

    pub fn mul(&self, other: &Element) -> Element {
        match operands(self, other) {
            Operands::Immediates(a, b) => IntegerElement::from(a as i128 * b as i128).into(),
            Operands::Integers(a, b) => a.mul_same(&b).into(),
            Operands::PrimePowers(a, b) => a.mul_same(b).into(),
            Operands::LhsOuter(a, c) => a.mul_coeff(c, a.domain().is_symmetric()).into(),
            Operands::RhsOuter(c, b) => b.mul_coeff(c, b.domain().is_symmetric()).into(),
        }
    }

    division_op!(
        /// Exact division.
        divide,
        divide_same,
        divide_coeff
    );
    division_op!(
        /// Quotient, rounded towards zero.
        div,
        div_same,
        div_coeff
    );
    division_op!(
        /// Remainder of [Element::div].
        rem,
        mod_same,
        mod_coeff
    );
    division_op!(
        /// Quotient, rounded towards negative infinity.
        floor_div,
        floor_div_same,
        floor_div_coeff
    );
    division_op!(
        /// Remainder of [Element::floor_div].
        modulo,
        modulo_same,
        modulo_coeff
    );

    /// Floored quotient and remainder.
    pub fn divrem(&self, other: &Element) -> Result<(Element, Element), DomainError> {
        let (q, r, _) = self.divrem_t(other)?;
        Ok((q, r))
    }

    /// Floored quotient and remainder, and whether the division was exact.
    pub fn divrem_t(&self, other: &Element) -> Result<(Element, Element, bool), DomainError> {
        let (q, r, exact) = match operands(self, other) {
            Operands::Immediates(a, b) => {
                let (q, r, exact) = IntegerElement::new(a).divrem_same_t(&IntegerElement::new(b))?;
                (q.into(), r.into(), exact)
            }
            Operands::Integers(a, b) => {
                let (q, r, exact) = a.divrem_same_t(&b)?;
                (q.into(), r.into(), exact)
            }
            Operands::PrimePowers(a, b) => {
                let (q, r, exact) = a.divrem_same_t(b)?;
                (q.into(), r.into(), exact)
            }
            Operands::LhsOuter(a, c) => {
                let (q, r, exact) = a.divrem_coeff_t(c, a.domain().is_symmetric())?;
                (q.into(), r.into(), exact)
            }
            Operands::RhsOuter(c, b) => {
                let (q, r, exact) = promote(c, b).divrem_same_t(b)?;
                (with_preference(q), with_preference(r), exact)
            }
        };

        Ok((q, r, exact))
    }
}

impl<'a, 'b> Add<&'b Element> for &'a Element {
    type Output = Element;

    #[inline]
    fn add(self, rhs: &'b Element) -> Element {
        Element::add(self, rhs)
    }
}

impl Add<Element> for Element {
    type Output = Element;

    #[inline]
    fn add(self, rhs: Element) -> Element {
        Element::add(&self, &rhs)
    }
}

impl<'a, 'b> Sub<&'b Element> for &'a Element {
    type Output = Element;

    #[inline]
    fn sub(self, rhs: &'b Element) -> Element {
        Element::sub(self, rhs)
    }
}

impl Sub<Element> for Element {
    type Output = Element;

    #[inline]
    fn sub(self, rhs: Element) -> Element {
        Element::sub(&self, &rhs)
    }
}

impl<'a, 'b> Mul<&'b Element> for &'a Element {
    type Output = Element;

    #[inline]
    fn mul(self, rhs: &'b Element) -> Element {
        Element::mul(self, rhs)
    }
}

impl Mul<Element> for Element {
    type Output = Element;

    #[inline]
    fn mul(self, rhs: Element) -> Element {
        Element::mul(&self, &rhs)
    }
}

impl<'a> Neg for &'a Element {
    type Output = Element;

    #[inline]
    fn neg(self) -> Element {
        Element::neg(self)
    }
}

impl Neg for Element {
    type Output = Element;

    #[inline]
    fn neg(self) -> Element {
        Element::neg(&self)
    }
}

#[cfg(test)]
mod test {
    use std::{
        cmp::Ordering,
        collections::hash_map::DefaultHasher,
        hash::{Hash, Hasher},
    };

    use super::Element;
    use crate::{
        domains::{
            integer::IntegerElement, prime_power::PrimePowerDomain, DomainTag, MAX_IMMEDIATE,
            MIN_IMMEDIATE,
        },
        error::DomainError,
    };

    #[test]
    fn immediates() {
        let a = Element::from(MAX_IMMEDIATE);
        let b = Element::from(1);

        let c = &a + &b;
        assert!(matches!(c, Element::Integer(_)));
        assert!(!c.is_imm());
        assert_eq!(&c - &b, a);
        assert!(matches!(&c - &b, Element::Immediate(_)));

        let d = &a * &a;
        assert_eq!(
            d,
            Element::from(IntegerElement::from(MAX_IMMEDIATE as i128 * MAX_IMMEDIATE as i128))
        );
        assert_eq!(d.divide(&a).unwrap(), a);

        assert!(matches!(Element::from(MIN_IMMEDIATE - 1), Element::Integer(_)));
        assert!(matches!(Element::from(i64::MIN), Element::Integer(_)));
        assert_eq!(-Element::from(5), Element::from(-5));
        assert_eq!(Element::from(-7).int_mod(3), 2);
        assert_eq!(Element::from(-7).sign(), -1);
    }

    #[test]
    fn immediates_at_the_machine_limits() {
        let max = Element::Immediate(i64::MAX);
        let min = Element::Immediate(i64::MIN);

        let c = &max + &Element::from(1);
        assert_eq!(c, Element::from(IntegerElement::from(i64::MAX as i128 + 1)));
        assert!(matches!(c, Element::Integer(_)));

        assert_eq!(
            &min - &Element::from(1),
            Element::from(IntegerElement::from(i64::MIN as i128 - 1))
        );
        assert_eq!(-&min, Element::from(IntegerElement::from(-(i64::MIN as i128))));
        assert_eq!(
            &max * &max,
            Element::from(IntegerElement::from(i64::MAX as i128 * i64::MAX as i128))
        );
        assert_eq!(&(&max + &min) + &Element::from(1), Element::from(0));
        assert!(matches!(&max - &max, Element::Immediate(0)));
        assert!(!max.is_imm());
        assert!(Element::Immediate(7).is_imm());
    }

    #[test]
    fn equality_by_value() {
        fn hash(e: &Element) -> u64 {
            let mut h = DefaultHasher::new();
            e.hash(&mut h);
            h.finish()
        }

        let direct = Element::Integer(IntegerElement::from(5));
        let demoted = Element::from(5);
        assert_eq!(direct.compare(&demoted), Ordering::Equal);
        assert_eq!(direct, demoted);
        assert_eq!(hash(&direct), hash(&demoted));

        let big = Element::from(IntegerElement::from(i64::MAX));
        assert_eq!(Element::Immediate(i64::MAX), big);
        assert_eq!(hash(&Element::Immediate(i64::MAX)), hash(&big));
        assert_ne!(Element::Immediate(4), direct);

        let d = PrimePowerDomain::new(7, 1).unwrap();
        let p = Element::from(d.element(5));
        assert_ne!(p, demoted);
        assert_eq!(p, Element::from(d.element(12)));
        assert_eq!(hash(&p), hash(&Element::from(d.element(-2))));
    }

    #[test]
    fn integer_division() {
        let a = Element::from(100);
        assert_eq!(a.divide(&Element::from(4)).unwrap(), Element::from(25));
        assert_eq!(a.divide(&Element::from(7)), Err(DomainError::NotExact));

        let (q, r, exact) = a.divrem_t(&Element::from(7)).unwrap();
        assert_eq!((q, r, exact), (Element::from(14), Element::from(2), false));

        let a = Element::from(-7);
        let b = Element::from(2);
        assert_eq!(a.div(&b).unwrap(), Element::from(-3));
        assert_eq!(a.rem(&b).unwrap(), Element::from(-1));
        assert_eq!(a.floor_div(&b).unwrap(), Element::from(-4));
        assert_eq!(a.modulo(&b).unwrap(), Element::from(1));
        assert_eq!(a.div(&Element::from(0)), Err(DomainError::DivisionByZero));
    }

    #[test]
    fn mixed_domains() {
        let d = PrimePowerDomain::new(5, 2).unwrap();
        let a = Element::from(d.element(7));
        let two = Element::from(2);
        let big: Element = "100000000000000000000000000001".parse().unwrap();

        assert_eq!(a.level_coeff(), DomainTag::PrimePower);
        assert_eq!((&a + &two).to_string(), "9");
        assert_eq!((&two + &a).to_string(), "9");
        assert_eq!((&a - &two).to_string(), "5");
        assert_eq!((&two - &a).to_string(), "20");
        assert_eq!((&a * &big).to_string(), "7");
        assert_eq!(a.divide(&two).unwrap().to_string(), "16");
        assert_eq!(two.divide(&a).unwrap().to_string(), "11");
        assert_eq!(a.compare(&Element::from(32)), Ordering::Equal);
        assert_eq!(Element::from(8).compare(&a), Ordering::Greater);

        let (q, r, exact) = a.divrem_t(&Element::from(10)).unwrap();
        assert!(!exact);
        assert_eq!(r.to_string(), "2");
        assert_eq!(&(&q * &Element::from(10)) + &r, a);

        assert_eq!(
            a.divide(&Element::from(25)),
            Err(DomainError::DivisionByZero)
        );
        assert!(a.sqrt().is_err());
    }

    #[test]
    fn symmetric_preference() {
        let d = PrimePowerDomain::new(5, 1).unwrap().with_symmetric(true);
        let a = Element::from(d.element(1));

        assert_eq!((&a + &Element::from(2)).to_string(), "-2");
        assert_eq!((&Element::from(2) - &a).to_string(), "1");
        assert_eq!(Element::from(3).divide(&a).unwrap().to_string(), "-2");
        // the same family keeps the standard representative
        assert_eq!((&a + &a).to_string(), "2");
        assert_eq!((&a + &a + a.clone()).normalized().to_string(), "-2");
    }

    #[test]
    fn generators_and_conversion() {
        let d = PrimePowerDomain::new(3, 4).unwrap();
        let a = Element::from(d.element(10));

        assert!(a.gen_zero().is_zero());
        assert!(a.gen_one().is_one());
        assert_eq!(&a + &a.gen_zero(), a);
        assert_eq!(&a * &a.gen_one(), a);
        assert_eq!(a.gen_zero().level_coeff(), DomainTag::PrimePower);
        assert!(Element::from(3).gen_zero().is_zero());

        assert!(IntegerElement::try_from(a.clone()).is_err());
        assert_eq!(
            IntegerElement::try_from(Element::from(-4)).unwrap(),
            IntegerElement::from(-4)
        );
        assert!(crate::domains::prime_power::PrimePowerElement::try_from(a).is_ok());

        assert_eq!(Element::from(49).sqrt().unwrap(), Element::from(7));
        assert_eq!(Element::from(50).sqrt(), Err(DomainError::NotPerfectSquare));

        let mut s = String::new();
        Element::from(-3).print(&mut s, "; ").unwrap();
        assert_eq!(s, "-3; ");
    }
}
