//! Canonical-form coefficient domains: arbitrary-precision integers and the prime-power
//! rings `Z / p^k Z`, behind one element contract.
//!
//! Elements of the same domain are combined with the *same* family of operations,
//! and an element is combined with a value of a lower domain through the *coeff* family.
//! The run-time [Element](element::Element) picks the family from the [domain tags](domains::DomainTag)
//! of its operands.
//!
//! For example:
//!
//! ```
//! use canonical_form::{domains::prime_power::PrimePowerDomain, element::Element};
//!
//! fn main() {
//!     let d = PrimePowerDomain::new(3, 2).unwrap().with_symmetric(true);
//!     let a = Element::from(d.element(5));
//!     let b: Element = "1000000000000000000000000".parse().unwrap();
//!
//!     let c = &a + &b;
//!     println!("{} + {} = {} (mod {})", a, b, c, d);
//! }
//! ```

pub mod domains;
pub mod element;
pub mod error;

pub use domains::{
    integer::{IntegerDomain, IntegerElement, Z},
    prime_power::{get_k, get_p, set_prime_power, PrimePowerDomain, PrimePowerElement},
    Coeff, DomainElement, DomainTag, Level,
};
pub use element::Element;
pub use error::DomainError;
