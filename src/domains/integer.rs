use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use rand::Rng;
use rug::{ops::Pow, Complete, Integer as MultiPrecisionInteger};

use super::{EuclideanDomain, Ring};

/// The integer ring.
pub const Z: IntegerRing = IntegerRing::new();

/// The integer ring.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct IntegerRing;

impl IntegerRing {
    pub const fn new() -> IntegerRing {
        IntegerRing
    }
}

impl Display for IntegerRing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("ℤ")
    }
}

/// An integer that is machine-sized when it fits and arbitrary-precision
/// when it does not.
///
/// The representation is canonical: `Large` never holds a value that fits
/// in an `i64`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Integer {
    Natural(i64),
    Large(MultiPrecisionInteger),
}

impl Integer {
    pub fn new(n: i64) -> Integer {
        Integer::Natural(n)
    }

    /// Wrap a multi-precision integer, downgrading it when it fits.
    pub fn from_large(n: MultiPrecisionInteger) -> Integer {
        if let Some(n) = n.to_i64() {
            Integer::Natural(n)
        } else {
            Integer::Large(n)
        }
    }

    pub fn to_large(&self) -> MultiPrecisionInteger {
        match self {
            Integer::Natural(n) => MultiPrecisionInteger::from(*n),
            Integer::Large(n) => n.clone(),
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Integer::Natural(0))
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Integer::Natural(1))
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Integer::Natural(n) => *n < 0,
            Integer::Large(n) => *n < 0,
        }
    }

    pub fn add(&self, other: &Integer) -> Integer {
        if let (Integer::Natural(a), Integer::Natural(b)) = (self, other) {
            if let Some(r) = a.checked_add(*b) {
                return Integer::Natural(r);
            }
        }
        Integer::from_large(self.to_large() + other.to_large())
    }

    pub fn sub(&self, other: &Integer) -> Integer {
        if let (Integer::Natural(a), Integer::Natural(b)) = (self, other) {
            if let Some(r) = a.checked_sub(*b) {
                return Integer::Natural(r);
            }
        }
        Integer::from_large(self.to_large() - other.to_large())
    }

    pub fn mul(&self, other: &Integer) -> Integer {
        if let (Integer::Natural(a), Integer::Natural(b)) = (self, other) {
            if let Some(r) = a.checked_mul(*b) {
                return Integer::Natural(r);
            }
        }
        Integer::from_large(self.to_large() * other.to_large())
    }

    pub fn neg(&self) -> Integer {
        match self {
            Integer::Natural(n) => {
                if let Some(r) = n.checked_neg() {
                    Integer::Natural(r)
                } else {
                    Integer::Large(-MultiPrecisionInteger::from(*n))
                }
            }
            Integer::Large(n) => Integer::from_large((-n).complete()),
        }
    }

    /// Truncated division with remainder. Panics on division by zero.
    pub fn quot_rem(&self, other: &Integer) -> (Integer, Integer) {
        if other.is_zero() {
            panic!("integer division by zero");
        }

        if let (Integer::Natural(a), Integer::Natural(b)) = (self, other) {
            if let (Some(q), Some(r)) = (a.checked_div(*b), a.checked_rem(*b)) {
                return (Integer::Natural(q), Integer::Natural(r));
            }
        }

        let (q, r) = self.to_large().div_rem(other.to_large());
        (Integer::from_large(q), Integer::from_large(r))
    }

    /// Division rounded to the nearest integer, ties away from zero.
    pub fn div_round(&self, other: &Integer) -> Integer {
        let (q, _) = self.to_large().div_rem_round(other.to_large());
        Integer::from_large(q)
    }

    pub fn gcd(&self, other: &Integer) -> Integer {
        if let (Integer::Natural(a), Integer::Natural(b)) = (self, other) {
            let g = gcd_unsigned(a.unsigned_abs(), b.unsigned_abs());
            if g <= i64::MAX as u64 {
                return Integer::Natural(g as i64);
            }
        }
        Integer::from_large(self.to_large().gcd(&other.to_large()))
    }

    /// The exact quotient `self / other`, or `None` when `other` does not
    /// divide `self`.
    pub fn try_div(&self, other: &Integer) -> Option<Integer> {
        if other.is_zero() {
            return None;
        }

        if let (Integer::Natural(a), Integer::Natural(b)) = (self, other) {
            if let (Some(q), Some(r)) = (a.checked_div(*b), a.checked_rem(*b)) {
                return if r == 0 { Some(Integer::Natural(q)) } else { None };
            }
        }

        let a = self.to_large();
        let b = other.to_large();
        if a.is_divisible(&b) {
            Some(Integer::from_large(a.div_exact(&b)))
        } else {
            None
        }
    }

    pub fn pow(&self, e: u64) -> Integer {
        let e = u32::try_from(e).expect("exponent of integer power too large");
        if let Integer::Natural(n) = self {
            if let Some(r) = n.checked_pow(e) {
                return Integer::Natural(r);
            }
        }
        Integer::from_large(self.to_large().pow(e))
    }
}

fn gcd_unsigned(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer::Natural(value)
    }
}

impl From<i32> for Integer {
    fn from(value: i32) -> Self {
        Integer::Natural(value as i64)
    }
}

impl From<u64> for Integer {
    fn from(value: u64) -> Self {
        if value <= i64::MAX as u64 {
            Integer::Natural(value as i64)
        } else {
            Integer::Large(MultiPrecisionInteger::from(value))
        }
    }
}

impl From<MultiPrecisionInteger> for Integer {
    fn from(value: MultiPrecisionInteger) -> Self {
        Integer::from_large(value)
    }
}

impl PartialOrd for Integer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Integer {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Integer::Natural(a), Integer::Natural(b)) => a.cmp(b),
            (Integer::Natural(a), Integer::Large(b)) => a.partial_cmp(b).unwrap(),
            (Integer::Large(a), Integer::Natural(b)) => a.partial_cmp(b).unwrap(),
            (Integer::Large(a), Integer::Large(b)) => a.cmp(b),
        }
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Integer::Natural(n) => Display::fmt(n, f),
            Integer::Large(n) => Display::fmt(n, f),
        }
    }
}

impl std::fmt::Debug for Integer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Ring for IntegerRing {
    type Element = Integer;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.add(b)
    }

    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.sub(b)
    }

    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.mul(b)
    }

    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = a.add(b);
    }

    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = a.sub(b);
    }

    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = a.mul(b);
    }

    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a = a.add(&b.mul(c));
    }

    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a = a.sub(&b.mul(c));
    }

    fn neg(&self, a: &Self::Element) -> Self::Element {
        a.neg()
    }

    fn zero(&self) -> Self::Element {
        Integer::Natural(0)
    }

    fn one(&self) -> Self::Element {
        Integer::Natural(1)
    }

    fn nth(&self, n: u64) -> Self::Element {
        n.into()
    }

    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element {
        b.pow(e)
    }

    fn is_zero(a: &Self::Element) -> bool {
        a.is_zero()
    }

    fn is_one(&self, a: &Self::Element) -> bool {
        a.is_one()
    }

    fn characteristic(&self) -> u64 {
        0
    }

    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        a.try_div(b)
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        Integer::Natural(rng.gen_range(range.0..=range.1))
    }
}

impl EuclideanDomain for IntegerRing {
    fn rem(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.quot_rem(b).1
    }

    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        a.quot_rem(b)
    }

    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        a.gcd(b)
    }
}
