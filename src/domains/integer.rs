use std::{
    cmp::Ordering,
    fmt::{Display, Formatter},
    ops::{Add, Mul, Neg, Sub},
    str::FromStr,
};

use rand::Rng;
use rug::{ops::Pow, Complete, Integer as MultiPrecisionInteger};

use crate::error::DomainError;

use super::{fits_immediate, Coeff, DomainElement, DomainTag};

/// The integer domain.
pub type Z = IntegerDomain;
/// The integer domain.
pub const Z: IntegerDomain = IntegerDomain::new();

/// The integer domain. It carries no state, every [IntegerElement] knows all
/// there is to know about its value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct IntegerDomain;

impl Default for IntegerDomain {
    fn default() -> Self {
        Self::new()
    }
}

impl IntegerDomain {
    pub const fn new() -> IntegerDomain {
        IntegerDomain
    }

    #[inline]
    pub fn zero(&self) -> IntegerElement {
        IntegerElement::gen_zero(self)
    }

    #[inline]
    pub fn one(&self) -> IntegerElement {
        IntegerElement::gen_one(self)
    }

    pub fn element<T: Into<IntegerElement>>(&self, value: T) -> IntegerElement {
        value.into()
    }

    /// Sample an integer uniformly from `range.0..range.1`.
    ///
    /// Panics when the range is empty, i.e. when `range.0 >= range.1`.
    pub fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> IntegerElement {
        assert!(
            range.0 < range.1,
            "Cannot sample from the empty range {}..{}",
            range.0,
            range.1
        );
        let r = rng.gen_range(range.0..range.1);
        IntegerElement::new(r)
    }
}

impl Display for IntegerDomain {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Z")
    }
}

/// An arbitrary-precision integer.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct IntegerElement(MultiPrecisionInteger);

macro_rules! from_with_cast {
    ($($base: ty),*) => {
        $(
            impl From<$base> for IntegerElement {
                #[inline]
                fn from(value: $base) -> Self {
                    IntegerElement(MultiPrecisionInteger::from(value))
                }
            }

            impl PartialEq<$base> for IntegerElement {
                #[inline]
                fn eq(&self, other: &$base) -> bool {
                    self.0 == *other
                }
            }
        )*
    };
}

from_with_cast!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128);

impl From<MultiPrecisionInteger> for IntegerElement {
    #[inline]
    fn from(n: MultiPrecisionInteger) -> Self {
        IntegerElement(n)
    }
}

impl FromStr for IntegerElement {
    type Err = DomainError;

    /// Parse a decimal integer with an optional sign.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix(&['+', '-'][..]).unwrap_or(s);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::Parse(s.to_owned()));
        }

        s.parse::<MultiPrecisionInteger>()
            .map(IntegerElement)
            .map_err(|e| DomainError::Parse(format!("{}: {}", s, e)))
    }
}

impl std::fmt::Debug for IntegerElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Display for IntegerElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

#[inline]
fn check_divisor(b: &MultiPrecisionInteger) -> Result<(), DomainError> {
    if b.cmp0() == Ordering::Equal {
        Err(DomainError::DivisionByZero)
    } else {
        Ok(())
    }
}

fn divide_exact(
    a: &MultiPrecisionInteger,
    b: &MultiPrecisionInteger,
) -> Result<MultiPrecisionInteger, DomainError> {
    check_divisor(b)?;
    if !a.is_divisible(b) {
        return Err(DomainError::NotExact);
    }
    Ok(a.clone().div_exact(b))
}

fn div_rem_trunc(
    a: &MultiPrecisionInteger,
    b: &MultiPrecisionInteger,
) -> Result<(MultiPrecisionInteger, MultiPrecisionInteger), DomainError> {
    check_divisor(b)?;
    Ok(a.clone().div_rem(b.clone()))
}

fn div_rem_floor(
    a: &MultiPrecisionInteger,
    b: &MultiPrecisionInteger,
) -> Result<(MultiPrecisionInteger, MultiPrecisionInteger), DomainError> {
    check_divisor(b)?;
    Ok(a.clone().div_rem_floor(b.clone()))
}

impl IntegerElement {
    pub fn new(num: i64) -> IntegerElement {
        IntegerElement(MultiPrecisionInteger::from(num))
    }

    #[inline]
    pub fn as_multi_prec(&self) -> &MultiPrecisionInteger {
        &self.0
    }

    #[inline]
    pub fn to_multi_prec(self) -> MultiPrecisionInteger {
        self.0
    }

    #[inline]
    pub fn to_i64(&self) -> Option<i64> {
        self.0.to_i64()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.cmp0() == Ordering::Less
    }

    pub fn abs(&self) -> IntegerElement {
        IntegerElement(self.0.clone().abs())
    }

    pub fn pow(&self, e: u32) -> IntegerElement {
        IntegerElement(self.0.clone().pow(e))
    }

    /// The non-negative greatest common divisor.
    pub fn gcd_same(&self, other: &IntegerElement) -> IntegerElement {
        IntegerElement(self.0.clone().gcd(&other.0))
    }

    /// Compute the exact square root of a perfect square.
    pub fn sqrt(&self) -> Result<IntegerElement, DomainError> {
        if !self.0.is_perfect_square() {
            return Err(DomainError::NotPerfectSquare);
        }
        Ok(IntegerElement(self.0.clone().sqrt()))
    }
}

impl DomainElement for IntegerElement {
    type Domain = IntegerDomain;

    #[inline]
    fn domain(&self) -> IntegerDomain {
        Z
    }

    #[inline]
    fn level_coeff(&self) -> DomainTag {
        DomainTag::Integer
    }

    fn class_name(&self) -> &'static str {
        "IntegerElement"
    }

    #[inline]
    fn gen_zero(_domain: &IntegerDomain) -> Self {
        IntegerElement(MultiPrecisionInteger::new())
    }

    #[inline]
    fn gen_one(_domain: &IntegerDomain) -> Self {
        IntegerElement(MultiPrecisionInteger::from(1))
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.0.cmp0() == Ordering::Equal
    }

    #[inline]
    fn is_one(&self) -> bool {
        self.0 == 1
    }

    fn is_imm(&self) -> bool {
        self.0.to_i64().map(fits_immediate).unwrap_or(false)
    }

    fn int_val(&self) -> Option<i64> {
        self.0.to_i64()
    }

    fn int_mod(&self, p: u32) -> u32 {
        assert!(p != 0, "Cannot reduce modulo 0");
        self.0.mod_u(p)
    }

    fn sign(&self) -> i32 {
        match self.0.cmp0() {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        }
    }

    fn neg(&self) -> Self {
        IntegerElement(-self.0.clone())
    }

    fn compare_same(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }

    fn add_same(&self, other: &Self) -> Self {
        IntegerElement((&self.0 + &other.0).complete())
    }

    fn sub_same(&self, other: &Self) -> Self {
        IntegerElement((&self.0 - &other.0).complete())
    }

    fn mul_same(&self, other: &Self) -> Self {
        IntegerElement((&self.0 * &other.0).complete())
    }

    fn divide_same(&self, other: &Self) -> Result<Self, DomainError> {
        divide_exact(&self.0, &other.0).map(IntegerElement)
    }

    fn div_same(&self, other: &Self) -> Result<Self, DomainError> {
        div_rem_trunc(&self.0, &other.0).map(|(q, _)| IntegerElement(q))
    }

    fn mod_same(&self, other: &Self) -> Result<Self, DomainError> {
        div_rem_trunc(&self.0, &other.0).map(|(_, r)| IntegerElement(r))
    }

    fn floor_div_same(&self, other: &Self) -> Result<Self, DomainError> {
        div_rem_floor(&self.0, &other.0).map(|(q, _)| IntegerElement(q))
    }

    fn modulo_same(&self, other: &Self) -> Result<Self, DomainError> {
        div_rem_floor(&self.0, &other.0).map(|(_, r)| IntegerElement(r))
    }

    fn divrem_same(&self, other: &Self) -> Result<(Self, Self), DomainError> {
        div_rem_floor(&self.0, &other.0).map(|(q, r)| (IntegerElement(q), IntegerElement(r)))
    }

    fn compare_coeff(&self, c: Coeff<'_>) -> Ordering {
        match c {
            Coeff::Immediate(n) => self.0.partial_cmp(&n).unwrap_or(Ordering::Equal),
            Coeff::Integer(i) => self.0.cmp(&i.0),
        }
    }

    // Integers have no modulus, so `symmetric` does not affect the coefficient family.

    fn add_coeff(&self, c: Coeff<'_>, _symmetric: bool) -> Self {
        match c {
            Coeff::Immediate(n) => IntegerElement((&self.0 + n).complete()),
            Coeff::Integer(i) => self.add_same(i),
        }
    }

    fn sub_coeff(&self, c: Coeff<'_>, _symmetric: bool) -> Self {
        match c {
            Coeff::Immediate(n) => IntegerElement((&self.0 - n).complete()),
            Coeff::Integer(i) => self.sub_same(i),
        }
    }

    fn mul_coeff(&self, c: Coeff<'_>, _symmetric: bool) -> Self {
        match c {
            Coeff::Immediate(n) => IntegerElement((&self.0 * n).complete()),
            Coeff::Integer(i) => self.mul_same(i),
        }
    }

    fn divide_coeff(&self, c: Coeff<'_>, _symmetric: bool) -> Result<Self, DomainError> {
        divide_exact(&self.0, &c.to_multi_prec()).map(IntegerElement)
    }

    fn div_coeff(&self, c: Coeff<'_>, _symmetric: bool) -> Result<Self, DomainError> {
        div_rem_trunc(&self.0, &c.to_multi_prec()).map(|(q, _)| IntegerElement(q))
    }

    fn mod_coeff(&self, c: Coeff<'_>, _symmetric: bool) -> Result<Self, DomainError> {
        div_rem_trunc(&self.0, &c.to_multi_prec()).map(|(_, r)| IntegerElement(r))
    }

    fn floor_div_coeff(&self, c: Coeff<'_>, _symmetric: bool) -> Result<Self, DomainError> {
        div_rem_floor(&self.0, &c.to_multi_prec()).map(|(q, _)| IntegerElement(q))
    }

    fn modulo_coeff(&self, c: Coeff<'_>, _symmetric: bool) -> Result<Self, DomainError> {
        div_rem_floor(&self.0, &c.to_multi_prec()).map(|(_, r)| IntegerElement(r))
    }

    fn divrem_coeff(&self, c: Coeff<'_>, _symmetric: bool) -> Result<(Self, Self), DomainError> {
        div_rem_floor(&self.0, &c.to_multi_prec())
            .map(|(q, r)| (IntegerElement(q), IntegerElement(r)))
    }
}

impl<'a, 'b> Add<&'b IntegerElement> for &'a IntegerElement {
    type Output = IntegerElement;

    #[inline]
    fn add(self, rhs: &'b IntegerElement) -> IntegerElement {
        self.add_same(rhs)
    }
}

impl Add<IntegerElement> for IntegerElement {
    type Output = IntegerElement;

    #[inline]
    fn add(self, rhs: IntegerElement) -> IntegerElement {
        IntegerElement(self.0 + rhs.0)
    }
}

impl<'a, 'b> Sub<&'b IntegerElement> for &'a IntegerElement {
    type Output = IntegerElement;

    #[inline]
    fn sub(self, rhs: &'b IntegerElement) -> IntegerElement {
        self.sub_same(rhs)
    }
}

impl Sub<IntegerElement> for IntegerElement {
    type Output = IntegerElement;

    #[inline]
    fn sub(self, rhs: IntegerElement) -> IntegerElement {
        IntegerElement(self.0 - rhs.0)
    }
}

impl<'a, 'b> Mul<&'b IntegerElement> for &'a IntegerElement {
    type Output = IntegerElement;

    #[inline]
    fn mul(self, rhs: &'b IntegerElement) -> IntegerElement {
        self.mul_same(rhs)
    }
}

impl Mul<IntegerElement> for IntegerElement {
    type Output = IntegerElement;

    #[inline]
    fn mul(self, rhs: IntegerElement) -> IntegerElement {
        IntegerElement(self.0 * rhs.0)
    }
}

impl<'a> Neg for &'a IntegerElement {
    type Output = IntegerElement;

    #[inline]
    fn neg(self) -> IntegerElement {
        DomainElement::neg(self)
    }
}

impl Neg for IntegerElement {
    type Output = IntegerElement;

    #[inline]
    fn neg(self) -> IntegerElement {
        IntegerElement(-self.0)
    }
}
