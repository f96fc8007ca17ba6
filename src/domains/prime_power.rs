//! The prime-power rings `Z / p^k Z`.
//!
//! A [PrimePowerDomain] holds the modulus `p^k` and is shared by all of its elements.
//! Elements are stored as a representative in `[0, p^k)` and can be brought into the
//! symmetric range `(-p^k/2, p^k/2]` with [DomainElement::normalize_myself].
//!
//! A process-wide default domain can be configured with [set_prime_power]. It must be set
//! before any element is built through [PrimePowerElement::from_global]. Redefining it does
//! not touch elements that already exist: they keep the modulus they were built with and are
//! stale with respect to the new default.

use std::{
    cmp::Ordering,
    fmt::{Display, Formatter},
    hash::{Hash, Hasher},
    str::FromStr,
    sync::{Arc, PoisonError, RwLock},
};

use once_cell::sync::Lazy;
use rand::Rng;
use rug::{
    integer::{IsPrime, Order},
    ops::Pow,
    Complete, Integer as MultiPrecisionInteger,
};
use tracing::{debug, warn};

use crate::error::DomainError;

use super::{integer::IntegerElement, Coeff, DomainElement, DomainTag};

static PRIME_POWER: Lazy<RwLock<Option<PrimePowerDomain>>> = Lazy::new(|| RwLock::new(None));

/// Set the process-wide prime power `p^k` used by [PrimePowerElement::from_global].
///
/// Elements built before this call keep their old modulus.
pub fn set_prime_power(p: u32, k: u32) -> Result<PrimePowerDomain, DomainError> {
    let domain = PrimePowerDomain::new(p, k)?;
    PrimePowerDomain::set_global(domain.clone());
    Ok(domain)
}

/// The prime of the process-wide prime power.
pub fn get_p() -> u32 {
    PrimePowerDomain::global().get_p()
}

/// The exponent of the process-wide prime power.
pub fn get_k() -> u32 {
    PrimePowerDomain::global().get_k()
}

struct Modulus {
    prime: u32,
    exponent: u32,
    modulus: MultiPrecisionInteger,
    half: MultiPrecisionInteger,
}

/// The ring `Z / p^k Z` for a prime `p` and an exponent `k >= 1`.
///
/// Cloning is cheap: all clones share the same modulus.
#[derive(Clone)]
pub struct PrimePowerDomain {
    modulus: Arc<Modulus>,
    symmetric: bool,
}

impl PrimePowerDomain {
    /// Create the ring `Z / p^k Z`. The prime is checked with a probabilistic primality test.
    pub fn new(p: u32, k: u32) -> Result<PrimePowerDomain, DomainError> {
        if MultiPrecisionInteger::from(p).is_probably_prime(30) == IsPrime::No {
            return Err(DomainError::InvalidPrime(p));
        }
        if k == 0 {
            return Err(DomainError::InvalidExponent(k));
        }

        let modulus = MultiPrecisionInteger::from(p).pow(k);
        let half = (&modulus / 2u32).complete();
        debug!(prime = p, exponent = k, %modulus, "created prime-power domain");

        Ok(PrimePowerDomain {
            modulus: Arc::new(Modulus {
                prime: p,
                exponent: k,
                modulus,
                half,
            }),
            symmetric: false,
        })
    }

    /// Set whether the run-time dispatch asks for symmetric representatives
    /// when it combines elements of this domain with coefficients.
    pub fn with_symmetric(mut self, symmetric: bool) -> PrimePowerDomain {
        self.symmetric = symmetric;
        self
    }

    #[inline]
    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    #[inline]
    pub fn get_p(&self) -> u32 {
        self.modulus.prime
    }

    #[inline]
    pub fn get_k(&self) -> u32 {
        self.modulus.exponent
    }

    /// The modulus `p^k`.
    #[inline]
    pub fn modulus(&self) -> &MultiPrecisionInteger {
        &self.modulus.modulus
    }

    /// `p^k / 2`, rounded down.
    #[inline]
    pub fn half_modulus(&self) -> &MultiPrecisionInteger {
        &self.modulus.half
    }

    /// Make `domain` the process-wide default.
    pub fn set_global(domain: PrimePowerDomain) {
        let mut global = PRIME_POWER.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(old) = global.as_ref() {
            let outstanding = Arc::strong_count(&old.modulus) - 1;
            if outstanding > 0 && *old != domain {
                warn!(
                    old = %old,
                    new = %domain,
                    outstanding,
                    "redefining the prime power while elements of the old one are alive"
                );
            }
        }

        debug!(domain = %domain, "setting the global prime power");
        *global = Some(domain);
    }

    /// The process-wide default, if it has been set.
    pub fn try_global() -> Option<PrimePowerDomain> {
        PRIME_POWER
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The process-wide default. Panics if [set_prime_power] has not been called.
    pub fn global() -> PrimePowerDomain {
        match Self::try_global() {
            Some(d) => d,
            None => panic!("The prime power has not been set: call set_prime_power first"),
        }
    }

    /// Create an element, reducing `value` into `[0, p^k)`.
    pub fn element<T: Into<MultiPrecisionInteger>>(&self, value: T) -> PrimePowerElement {
        PrimePowerElement {
            value: self.reduce(value.into()),
            domain: self.clone(),
        }
    }

    /// Create an element from a decimal string.
    pub fn parse(&self, s: &str) -> Result<PrimePowerElement, DomainError> {
        let i: IntegerElement = s.parse()?;
        Ok(self.element(i.to_multi_prec()))
    }

    #[inline]
    pub fn zero(&self) -> PrimePowerElement {
        PrimePowerElement::gen_zero(self)
    }

    #[inline]
    pub fn one(&self) -> PrimePowerElement {
        PrimePowerElement::gen_one(self)
    }

    /// Sample an element uniformly from the ring.
    pub fn sample(&self, rng: &mut impl rand::RngCore) -> PrimePowerElement {
        let limbs = self.modulus.modulus.significant_bits() as usize / 64 + 2;
        let digits: Vec<u64> = (0..limbs).map(|_| rng.gen()).collect();
        self.element(MultiPrecisionInteger::from_digits(&digits, Order::Lsf))
    }

    /// The representative of `a` in `[0, p^k)`.
    fn reduce(&self, mut a: MultiPrecisionInteger) -> MultiPrecisionInteger {
        a %= &self.modulus.modulus;
        if a.cmp0() == Ordering::Less {
            a += &self.modulus.modulus;
        }
        a
    }

    /// The representative of `a` in `(-p^k/2, p^k/2]`.
    fn symmetric_reduce(&self, a: MultiPrecisionInteger) -> MultiPrecisionInteger {
        let a = self.reduce(a);
        if a > self.modulus.half {
            a - &self.modulus.modulus
        } else {
            a
        }
    }

    fn finish(&self, value: MultiPrecisionInteger, symmetric: bool) -> PrimePowerElement {
        let value = if symmetric {
            self.symmetric_reduce(value)
        } else {
            self.reduce(value)
        };

        PrimePowerElement {
            value,
            domain: self.clone(),
        }
    }

    /// Write a nonzero `b` as `p^j * u` with `u` a unit and `j < k`.
    fn split_divisor(
        &self,
        b: &MultiPrecisionInteger,
    ) -> Result<(u32, MultiPrecisionInteger), DomainError> {
        let b = self.reduce(b.clone());
        if b.cmp0() == Ordering::Equal {
            return Err(DomainError::DivisionByZero);
        }

        let (u, j) = b.remove_factor(&MultiPrecisionInteger::from(self.modulus.prime));
        Ok((j, u))
    }

    /// Compute `q` and `r` in `[0, p^j)` such that `a = b * q + r mod p^k`,
    /// where `p^j` is the largest power of `p` dividing `b`.
    fn div_rem(
        &self,
        a: &MultiPrecisionInteger,
        b: &MultiPrecisionInteger,
    ) -> Result<(MultiPrecisionInteger, MultiPrecisionInteger), DomainError> {
        let (j, u) = self.split_divisor(b)?;
        let a = self.reduce(a.clone());

        let pj = MultiPrecisionInteger::from(self.modulus.prime).pow(j);
        let r = (&a % &pj).complete();
        let num = (a - &r).div_exact(&pj);

        let inv = u
            .invert(&self.modulus.modulus)
            .map_err(|_| DomainError::NotInvertible)?;

        Ok((self.reduce(num * inv), r))
    }

    fn assert_same(&self, other: &PrimePowerDomain) {
        if self != other {
            panic!(
                "Cannot combine elements of different prime-power domains: {} and {}",
                self, other
            );
        }
    }
}

impl PartialEq for PrimePowerDomain {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.modulus, &other.modulus)
            || (self.modulus.prime == other.modulus.prime
                && self.modulus.exponent == other.modulus.exponent)
    }
}

impl Eq for PrimePowerDomain {}

impl std::fmt::Debug for PrimePowerDomain {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrimePowerDomain")
            .field("p", &self.modulus.prime)
            .field("k", &self.modulus.exponent)
            .field("symmetric", &self.symmetric)
            .finish()
    }
}

impl Display for PrimePowerDomain {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Z/{}^{}", self.modulus.prime, self.modulus.exponent)
    }
}

/// A residue modulo `p^k`.
#[derive(Clone)]
pub struct PrimePowerElement {
    value: MultiPrecisionInteger,
    domain: PrimePowerDomain,
}

impl PrimePowerElement {
    pub fn new<T: Into<MultiPrecisionInteger>>(
        domain: &PrimePowerDomain,
        value: T,
    ) -> PrimePowerElement {
        domain.element(value)
    }

    /// Create an element of the process-wide prime-power domain.
    pub fn from_global<T: Into<MultiPrecisionInteger>>(value: T) -> PrimePowerElement {
        PrimePowerDomain::global().element(value)
    }

    /// The stored representative. It is in `[0, p^k)` unless the element has been
    /// normalized to the symmetric range.
    #[inline]
    pub fn value(&self) -> &MultiPrecisionInteger {
        &self.value
    }

    /// The representative in `[0, p^k)`.
    pub fn to_integer(&self) -> IntegerElement {
        self.domain.reduce(self.value.clone()).into()
    }

    /// The representative in `(-p^k/2, p^k/2]`.
    pub fn to_symmetric_integer(&self) -> IntegerElement {
        self.domain.symmetric_reduce(self.value.clone()).into()
    }

    /// The largest `j <= k` such that `p^j` divides the element.
    pub fn valuation(&self) -> u32 {
        let v = self.domain.reduce(self.value.clone());
        if v.cmp0() == Ordering::Equal {
            return self.domain.get_k();
        }
        v.remove_factor(&MultiPrecisionInteger::from(self.domain.get_p()))
            .1
    }

    /// Returns `true` iff the element is a unit of the ring.
    pub fn is_unit(&self) -> bool {
        !self.value.is_divisible_u(self.domain.get_p())
    }

    pub fn inverse(&self) -> Result<PrimePowerElement, DomainError> {
        if !self.is_unit() {
            return Err(DomainError::NotInvertible);
        }

        let v = self.domain.reduce(self.value.clone());
        let inv = v
            .invert(self.domain.modulus())
            .map_err(|_| DomainError::NotInvertible)?;
        Ok(self.domain.finish(inv, false))
    }

    pub fn pow(&self, mut e: u64) -> PrimePowerElement {
        let d = &self.domain;
        let mut base = d.reduce(self.value.clone());
        let mut result = d.reduce(MultiPrecisionInteger::from(1));

        while e > 0 {
            if e & 1 == 1 {
                result = d.reduce(result * &base);
            }
            base = d.reduce((&base * &base).complete());
            e >>= 1;
        }

        d.finish(result, false)
    }

    fn standard(&self) -> MultiPrecisionInteger {
        self.domain.reduce(self.value.clone())
    }
}

impl FromStr for PrimePowerElement {
    type Err = DomainError;

    /// Parse a decimal integer into the process-wide prime-power domain.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrimePowerDomain::global().parse(s)
    }
}

impl PartialEq for PrimePowerElement {
    fn eq(&self, other: &Self) -> bool {
        self.domain == other.domain && self.standard() == other.standard()
    }
}

impl Eq for PrimePowerElement {}

impl Hash for PrimePowerElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.domain.get_p().hash(state);
        self.domain.get_k().hash(state);
        self.standard().hash(state);
    }
}

impl std::fmt::Debug for PrimePowerElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} % {}", self.value, self.domain.modulus())
    }
}

impl Display for PrimePowerElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.value, f)
    }
}

impl DomainElement for PrimePowerElement {
    type Domain = PrimePowerDomain;

    fn domain(&self) -> PrimePowerDomain {
        self.domain.clone()
    }

    #[inline]
    fn level_coeff(&self) -> DomainTag {
        DomainTag::PrimePower
    }

    fn class_name(&self) -> &'static str {
        "PrimePowerElement"
    }

    fn gen_zero(domain: &PrimePowerDomain) -> Self {
        domain.element(0)
    }

    fn gen_one(domain: &PrimePowerDomain) -> Self {
        domain.element(1)
    }

    #[inline]
    fn is_zero(&self) -> bool {
        self.value.cmp0() == Ordering::Equal
    }

    fn is_one(&self) -> bool {
        self.standard() == 1
    }

    #[inline]
    fn is_imm(&self) -> bool {
        false
    }

    fn int_val(&self) -> Option<i64> {
        self.domain.symmetric_reduce(self.value.clone()).to_i64()
    }

    fn int_mod(&self, p: u32) -> u32 {
        assert!(p != 0, "Cannot reduce modulo 0");
        self.standard().mod_u(p)
    }

    /// The sign of the symmetric representative.
    fn sign(&self) -> i32 {
        match self.domain.symmetric_reduce(self.value.clone()).cmp0() {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        }
    }

    fn neg(&self) -> Self {
        self.domain.finish(-self.value.clone(), false)
    }

    /// Bring the value into `(-p^k/2, p^k/2]`. The representative `p^k/2`
    /// of an even modulus stays positive.
    fn normalize_myself(&mut self) {
        let v = std::mem::take(&mut self.value);
        self.value = self.domain.symmetric_reduce(v);
    }

    fn compare_same(&self, other: &Self) -> Ordering {
        self.domain.assert_same(&other.domain);
        self.standard().cmp(&other.standard())
    }

    fn add_same(&self, other: &Self) -> Self {
        self.domain.assert_same(&other.domain);
        self.domain
            .finish((&self.value + &other.value).complete(), false)
    }

    fn sub_same(&self, other: &Self) -> Self {
        self.domain.assert_same(&other.domain);
        self.domain
            .finish((&self.value - &other.value).complete(), false)
    }

    fn mul_same(&self, other: &Self) -> Self {
        self.domain.assert_same(&other.domain);
        self.domain
            .finish((&self.value * &other.value).complete(), false)
    }

    fn divide_same(&self, other: &Self) -> Result<Self, DomainError> {
        self.domain.assert_same(&other.domain);
        let (q, r) = self.domain.div_rem(&self.value, &other.value)?;
        if r.cmp0() != Ordering::Equal {
            return Err(DomainError::NotExact);
        }
        Ok(self.domain.finish(q, false))
    }

    // In Z / p^k Z the truncated and floored conventions coincide.

    fn div_same(&self, other: &Self) -> Result<Self, DomainError> {
        self.divrem_same(other).map(|(q, _)| q)
    }

    fn mod_same(&self, other: &Self) -> Result<Self, DomainError> {
        self.divrem_same(other).map(|(_, r)| r)
    }

    fn floor_div_same(&self, other: &Self) -> Result<Self, DomainError> {
        self.div_same(other)
    }

    fn modulo_same(&self, other: &Self) -> Result<Self, DomainError> {
        self.mod_same(other)
    }

    fn divrem_same(&self, other: &Self) -> Result<(Self, Self), DomainError> {
        self.domain.assert_same(&other.domain);
        let (q, r) = self.domain.div_rem(&self.value, &other.value)?;
        Ok((self.domain.finish(q, false), self.domain.finish(r, false)))
    }

    fn compare_coeff(&self, c: Coeff<'_>) -> Ordering {
        self.standard()
            .cmp(&self.domain.reduce(c.to_multi_prec()))
    }

    fn add_coeff(&self, c: Coeff<'_>, symmetric: bool) -> Self {
        self.domain
            .finish(c.to_multi_prec() + &self.value, symmetric)
    }

    fn sub_coeff(&self, c: Coeff<'_>, symmetric: bool) -> Self {
        self.domain
            .finish(self.value.clone() - c.to_multi_prec(), symmetric)
    }

    fn mul_coeff(&self, c: Coeff<'_>, symmetric: bool) -> Self {
        self.domain
            .finish(c.to_multi_prec() * &self.value, symmetric)
    }

    fn divide_coeff(&self, c: Coeff<'_>, symmetric: bool) -> Result<Self, DomainError> {
        let (q, r) = self.domain.div_rem(&self.value, &c.to_multi_prec())?;
        if r.cmp0() != Ordering::Equal {
            return Err(DomainError::NotExact);
        }
        Ok(self.domain.finish(q, symmetric))
    }

    fn div_coeff(&self, c: Coeff<'_>, symmetric: bool) -> Result<Self, DomainError> {
        self.divrem_coeff(c, symmetric).map(|(q, _)| q)
    }

    fn mod_coeff(&self, c: Coeff<'_>, symmetric: bool) -> Result<Self, DomainError> {
        self.divrem_coeff(c, symmetric).map(|(_, r)| r)
    }

    fn floor_div_coeff(&self, c: Coeff<'_>, symmetric: bool) -> Result<Self, DomainError> {
        self.div_coeff(c, symmetric)
    }

    fn modulo_coeff(&self, c: Coeff<'_>, symmetric: bool) -> Result<Self, DomainError> {
        self.mod_coeff(c, symmetric)
    }

    fn divrem_coeff(&self, c: Coeff<'_>, symmetric: bool) -> Result<(Self, Self), DomainError> {
        let (q, r) = self.domain.div_rem(&self.value, &c.to_multi_prec())?;
        Ok((
            self.domain.finish(q, symmetric),
            self.domain.finish(r, symmetric),
        ))
    }
}

#[cfg(test)]
mod test {
    use std::cmp::Ordering;

    use super::{set_prime_power, PrimePowerDomain, PrimePowerElement};
    use crate::{
        domains::{Coeff, DomainElement, DomainTag},
        error::DomainError,
    };

    #[test]
    fn construction() {
        let d = PrimePowerDomain::new(3, 3).unwrap();
        assert_eq!(*d.modulus(), 27);
        assert_eq!(*d.half_modulus(), 13);
        assert_eq!((d.get_p(), d.get_k()), (3, 3));

        assert_eq!(*d.element(-1).value(), 26);
        assert_eq!(*d.element(55).value(), 1);
        assert_eq!(*d.parse("-28").unwrap().value(), 26);
        assert!(d.parse("x").is_err());

        assert_eq!(
            PrimePowerDomain::new(9, 2).err(),
            Some(DomainError::InvalidPrime(9))
        );
        assert_eq!(
            PrimePowerDomain::new(1, 2).err(),
            Some(DomainError::InvalidPrime(1))
        );
        assert_eq!(
            PrimePowerDomain::new(7, 0).err(),
            Some(DomainError::InvalidExponent(0))
        );
    }

    #[test]
    fn symmetric_normalization() {
        let d = PrimePowerDomain::new(5, 1).unwrap();
        let mut a = d.element(3);
        a.normalize_myself();
        assert_eq!(*a.value(), -2);
        assert_eq!(a, d.element(3));
        assert_eq!(a.sign(), -1);
        assert_eq!(a.int_val(), Some(-2));
        assert_eq!(a.int_mod(5), 3);

        a.normalize_myself();
        assert_eq!(*a.value(), -2);

        // the boundary p^k/2 of an even modulus stays positive
        let d = PrimePowerDomain::new(2, 2).unwrap();
        let mut a = d.element(2);
        a.normalize_myself();
        assert_eq!(*a.value(), 2);
        assert_eq!(a.sign(), 1);
        let mut a = d.element(3);
        a.normalize_myself();
        assert_eq!(*a.value(), -1);

        let d = PrimePowerDomain::new(7, 2).unwrap();
        for i in 0..49 {
            let s = d.element(i).normalized();
            assert!(*s.value() > -25 && *s.value() <= 24);
            assert_eq!(s.normalized().value(), s.value());
        }
    }

    #[test]
    fn ring_ops() {
        let d = PrimePowerDomain::new(3, 2).unwrap();
        let a = d.element(7);
        let b = d.element(5);

        assert_eq!(*a.add_same(&b).value(), 3);
        assert_eq!(*a.sub_same(&b).value(), 2);
        assert_eq!(*b.sub_same(&a).value(), 7);
        assert_eq!(*a.mul_same(&b).value(), 8);
        assert_eq!(*a.neg().value(), 2);
        assert_eq!(a.compare_same(&b), Ordering::Greater);
        assert_eq!(a.add_same(&d.zero()), a);
        assert_eq!(a.mul_same(&d.one()), a);
        assert!(d.zero().is_zero());
        assert!(d.one().is_one());
        assert!(!a.is_imm());
        assert_eq!(a.level_coeff(), DomainTag::PrimePower);
        assert_eq!(*a.pow(3).value(), 1);
        assert_eq!(*a.pow(0).value(), 1);
    }

    #[test]
    fn coeff_ops() {
        let d = PrimePowerDomain::new(5, 1).unwrap();
        let a = d.element(4);

        assert_eq!(*a.add_coeff(Coeff::Immediate(3), false).value(), 2);
        assert_eq!(*a.add_coeff(Coeff::Immediate(-1), true).value(), -2);
        assert_eq!(*a.sub_coeff(Coeff::Immediate(6), false).value(), 3);
        assert_eq!(*a.mul_coeff(Coeff::Immediate(2), true).value(), -2);
        assert_eq!(*a.divide_coeff(Coeff::Immediate(3), false).unwrap().value(), 3);
        assert_eq!(a.compare_coeff(Coeff::Immediate(9)), Ordering::Equal);
        assert_eq!(
            a.divide_coeff(Coeff::Immediate(10), false),
            Err(DomainError::DivisionByZero)
        );
    }

    #[test]
    fn symmetric_coeff_division() {
        let d = PrimePowerDomain::new(5, 2).unwrap();
        let a = d.element(7);

        // 7 / 2 = 16 and 7 / 3 = 19 cross 25/2
        assert_eq!(*a.divide_coeff(Coeff::Immediate(2), false).unwrap().value(), 16);
        assert_eq!(*a.divide_coeff(Coeff::Immediate(2), true).unwrap().value(), -9);
        assert_eq!(*a.divide_coeff(Coeff::Immediate(3), true).unwrap().value(), -6);
        assert_eq!(*a.div_coeff(Coeff::Immediate(3), true).unwrap().value(), -6);
        assert!(a.mod_coeff(Coeff::Immediate(3), true).unwrap().is_zero());

        let (q, r) = a.divrem_coeff(Coeff::Immediate(10), true).unwrap();
        assert_eq!(*q.value(), -12);
        assert_eq!(*r.value(), 2);
        assert_eq!(q.mul_coeff(Coeff::Immediate(10), false).add_same(&r), a);

        let (q, r, exact) = a.divrem_coeff_t(Coeff::Immediate(10), true).unwrap();
        assert_eq!(*q.value(), -12);
        assert_eq!(*r.value(), 2);
        assert!(!exact);
        let (q, _, exact) = a.divrem_coeff_t(Coeff::Immediate(-3), true).unwrap();
        assert!(exact);
        assert_eq!(*q.value(), 6);

        assert_eq!(
            a.divide_coeff(Coeff::Immediate(10), true),
            Err(DomainError::NotExact)
        );
        assert_eq!(
            a.divrem_coeff_t(Coeff::Immediate(50), true),
            Err(DomainError::DivisionByZero)
        );
    }

    #[test]
    fn division() {
        let d = PrimePowerDomain::new(3, 3).unwrap();

        for a in 0..27 {
            for b in 1..27 {
                let (ea, eb) = (d.element(a), d.element(b));
                let (q, r, exact) = ea.divrem_same_t(&eb).unwrap();
                assert_eq!(eb.mul_same(&q).add_same(&r), ea);
                assert_eq!(exact, r.is_zero());

                let pj = 3i64.pow(eb.valuation());
                assert!(*r.value() >= 0 && *r.value() < pj);

                match ea.divide_same(&eb) {
                    Ok(q2) => {
                        assert!(exact);
                        assert_eq!(q2, q);
                    }
                    Err(e) => {
                        assert_eq!(e, DomainError::NotExact);
                        assert!(!exact);
                    }
                }
            }

            assert_eq!(
                d.element(a).div_same(&d.zero()),
                Err(DomainError::DivisionByZero)
            );
        }

        let (q, r, exact) = d.element(10).divrem_same_t(&d.element(6)).unwrap();
        assert!(!exact);
        assert_eq!(*r.value(), 1);
        assert_eq!(d.element(6).mul_same(&q).add_same(&r), d.element(10));
    }

    #[test]
    fn inverse() {
        let d = PrimePowerDomain::new(2, 5).unwrap();
        for i in (1..32).step_by(2) {
            let a = d.element(i);
            assert!(a.is_unit());
            assert!(a.mul_same(&a.inverse().unwrap()).is_one());
        }
        assert_eq!(d.element(4).inverse(), Err(DomainError::NotInvertible));
        assert_eq!(d.element(4).valuation(), 2);
        assert_eq!(d.zero().valuation(), 5);
    }

    #[test]
    #[should_panic]
    fn mixed_moduli() {
        let a = PrimePowerDomain::new(3, 2).unwrap().element(1);
        let b = PrimePowerDomain::new(3, 3).unwrap().element(1);
        a.add_same(&b);
    }

    #[test]
    fn global() {
        assert!(set_prime_power(4, 1).is_err());

        let d = set_prime_power(5, 1).unwrap();
        assert_eq!((super::get_p(), super::get_k()), (5, 1));
        let a = PrimePowerElement::from_global(13);
        assert_eq!(*a.value(), 3);
        assert_eq!("-1".parse::<PrimePowerElement>().unwrap().value(), &4);

        set_prime_power(7, 2).unwrap();
        assert_eq!(PrimePowerDomain::global().get_p(), 7);
        assert_eq!(a.domain(), d);
        assert_eq!(*a.add_same(&a).value(), 1);
        assert_eq!(*PrimePowerElement::from_global(50).value(), 1);
    }
}
