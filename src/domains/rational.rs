use std::fmt::{Display, Formatter};

use rand::Rng;
use rug::{ops::Pow, Complete, Rational as MultiPrecisionRational};

use super::integer::Integer;
use super::{EuclideanDomain, Field, Ring};

/// The field of rational numbers.
pub const Q: RationalField = RationalField::new();

/// The field of rational numbers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct RationalField;

impl RationalField {
    pub const fn new() -> RationalField {
        RationalField
    }
}

impl Display for RationalField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("ℚ")
    }
}

/// An arbitrary-precision rational number, kept in lowest terms with a
/// positive denominator.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Rational(MultiPrecisionRational);

impl Rational {
    /// Create the fraction `num / den`. Panics when `den` is zero.
    pub fn new(num: i64, den: i64) -> Rational {
        if den == 0 {
            panic!("rational with zero denominator");
        }
        Rational(MultiPrecisionRational::from((num, den)))
    }

    pub fn zero() -> Rational {
        Rational(MultiPrecisionRational::new())
    }

    pub fn one() -> Rational {
        Rational(MultiPrecisionRational::from(1))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_one(&self) -> bool {
        self.0 == 1
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    pub fn numerator(&self) -> Integer {
        Integer::from_large(self.0.numer().clone())
    }

    pub fn denominator(&self) -> Integer {
        Integer::from_large(self.0.denom().clone())
    }

    pub fn inv(&self) -> Rational {
        if self.is_zero() {
            panic!("inverse of zero");
        }
        Rational(self.0.clone().recip())
    }

    pub fn pow(&self, e: u64) -> Rational {
        let e = u32::try_from(e).expect("exponent of rational power too large");
        Rational(self.0.clone().pow(e))
    }
}

impl From<i64> for Rational {
    fn from(value: i64) -> Self {
        Rational(MultiPrecisionRational::from(value))
    }
}

impl From<i32> for Rational {
    fn from(value: i32) -> Self {
        Rational(MultiPrecisionRational::from(value))
    }
}

impl From<(i64, i64)> for Rational {
    fn from((num, den): (i64, i64)) -> Self {
        Rational::new(num, den)
    }
}

impl From<Integer> for Rational {
    fn from(value: Integer) -> Self {
        Rational(MultiPrecisionRational::from(value.to_large()))
    }
}

impl Display for Rational {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::fmt::Debug for Rational {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Ring for RationalField {
    type Element = Rational;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        Rational((&a.0 + &b.0).complete())
    }

    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        Rational((&a.0 - &b.0).complete())
    }

    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        Rational((&a.0 * &b.0).complete())
    }

    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        a.0 += &b.0;
    }

    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        a.0 -= &b.0;
    }

    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        a.0 *= &b.0;
    }

    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        a.0 += (&b.0 * &c.0).complete();
    }

    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        a.0 -= (&b.0 * &c.0).complete();
    }

    fn neg(&self, a: &Self::Element) -> Self::Element {
        Rational((-&a.0).complete())
    }

    fn zero(&self) -> Self::Element {
        Rational::zero()
    }

    fn one(&self) -> Self::Element {
        Rational::one()
    }

    fn nth(&self, n: u64) -> Self::Element {
        Rational(MultiPrecisionRational::from(n))
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
        if b.is_zero() {
            None
        } else {
            Some(self.div(a, b))
        }
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        rng.gen_range(range.0..=range.1).into()
    }
}

impl EuclideanDomain for RationalField {
    fn rem(&self, _a: &Self::Element, _b: &Self::Element) -> Self::Element {
        Rational::zero()
    }

    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        (self.div(a, b), Rational::zero())
    }

    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        if a.is_zero() && b.is_zero() {
            Rational::zero()
        } else {
            Rational::one()
        }
    }
}

impl Field for RationalField {
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        Rational((&a.0 / &b.0).complete())
    }

    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        a.0 /= &b.0;
    }

    fn inv(&self, a: &Self::Element) -> Self::Element {
        a.inv()
    }
}
