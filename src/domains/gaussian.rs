use std::fmt::{Display, Formatter};

use rand::Rng;

use super::integer::Integer;
use super::{EuclideanDomain, Ring};

/// The ring of Gaussian integers `ℤ[i]`.
pub const ZI: GaussianIntegerRing = GaussianIntegerRing::new();

/// The ring of Gaussian integers `ℤ[i]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct GaussianIntegerRing;

impl GaussianIntegerRing {
    pub const fn new() -> GaussianIntegerRing {
        GaussianIntegerRing
    }
}

impl Display for GaussianIntegerRing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("ℤ[i]")
    }
}

/// A Gaussian integer `re + im·i`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GaussianInteger {
    pub re: Integer,
    pub im: Integer,
}

impl GaussianInteger {
    pub fn new(re: Integer, im: Integer) -> GaussianInteger {
        GaussianInteger { re, im }
    }

    pub fn is_zero(&self) -> bool {
        self.re.is_zero() && self.im.is_zero()
    }

    pub fn conjugate(&self) -> GaussianInteger {
        GaussianInteger::new(self.re.clone(), self.im.neg())
    }

    /// The field norm `re² + im²`.
    pub fn norm(&self) -> Integer {
        self.re.mul(&self.re).add(&self.im.mul(&self.im))
    }
}

impl From<i64> for GaussianInteger {
    fn from(value: i64) -> Self {
        GaussianInteger::new(value.into(), Integer::Natural(0))
    }
}

impl From<(i64, i64)> for GaussianInteger {
    fn from((re, im): (i64, i64)) -> Self {
        GaussianInteger::new(re.into(), im.into())
    }
}

impl Display for GaussianInteger {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.im.is_zero() {
            Display::fmt(&self.re, f)
        } else if self.re.is_zero() {
            write!(f, "{}i", self.im)
        } else if self.im.is_negative() {
            write!(f, "{}{}i", self.re, self.im)
        } else {
            write!(f, "{}+{}i", self.re, self.im)
        }
    }
}

impl std::fmt::Debug for GaussianInteger {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Ring for GaussianIntegerRing {
    type Element = GaussianInteger;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        GaussianInteger::new(a.re.add(&b.re), a.im.add(&b.im))
    }

    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        GaussianInteger::new(a.re.sub(&b.re), a.im.sub(&b.im))
    }

    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        GaussianInteger::new(
            a.re.mul(&b.re).sub(&a.im.mul(&b.im)),
            a.re.mul(&b.im).add(&a.im.mul(&b.re)),
        )
    }

    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.add(a, b);
    }

    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.sub(a, b);
    }

    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.mul(a, b);
    }

    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a = self.add(a, &self.mul(b, c));
    }

    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a = self.sub(a, &self.mul(b, c));
    }

    fn neg(&self, a: &Self::Element) -> Self::Element {
        GaussianInteger::new(a.re.neg(), a.im.neg())
    }

    fn zero(&self) -> Self::Element {
        GaussianInteger::new(Integer::Natural(0), Integer::Natural(0))
    }

    fn one(&self) -> Self::Element {
        GaussianInteger::new(Integer::Natural(1), Integer::Natural(0))
    }

    fn nth(&self, n: u64) -> Self::Element {
        GaussianInteger::new(n.into(), Integer::Natural(0))
    }

    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element {
        let mut acc = self.one();
        for _ in 0..e {
            self.mul_assign(&mut acc, b);
        }
        acc
    }

    fn is_zero(a: &Self::Element) -> bool {
        a.is_zero()
    }

    fn is_one(&self, a: &Self::Element) -> bool {
        a.re.is_one() && a.im.is_zero()
    }

    fn characteristic(&self) -> u64 {
        0
    }

    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        if b.is_zero() {
            return None;
        }

        // a/b = a·conj(b)/norm(b); the quotient is a Gaussian integer
        // exactly when the norm divides both components
        let norm = b.norm();
        let num = self.mul(a, &b.conjugate());
        let re = num.re.try_div(&norm)?;
        let im = num.im.try_div(&norm)?;
        Some(GaussianInteger::new(re, im))
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        GaussianInteger::new(
            Integer::Natural(rng.gen_range(range.0..=range.1)),
            Integer::Natural(rng.gen_range(range.0..=range.1)),
        )
    }
}

impl EuclideanDomain for GaussianIntegerRing {
    fn rem(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        self.quot_rem(a, b).1
    }

    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        if b.is_zero() {
            panic!("Gaussian integer division by zero");
        }

        // rounding to the nearest lattice point keeps the remainder norm
        // below the divisor norm
        let norm = b.norm();
        let num = self.mul(a, &b.conjugate());
        let q = GaussianInteger::new(num.re.div_round(&norm), num.im.div_round(&norm));
        let r = self.sub(a, &self.mul(&q, b));
        (q, r)
    }

    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        let mut a = a.clone();
        let mut b = b.clone();
        while !b.is_zero() {
            let r = self.rem(&a, &b);
            a = b;
            b = r;
        }
        a
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mul() {
        let a: GaussianInteger = (1, 2).into();
        let b: GaussianInteger = (3, -1).into();
        assert_eq!(ZI.mul(&a, &b), (5, 5).into());
    }

    #[test]
    fn exact_division() {
        let a: GaussianInteger = (5, 5).into();
        let b: GaussianInteger = (1, 2).into();
        assert_eq!(ZI.try_div(&a, &b), Some((3, -1).into()));
        assert_eq!(ZI.try_div(&b, &a), None);
    }

    #[test]
    fn euclidean() {
        let a: GaussianInteger = (7, 3).into();
        let b: GaussianInteger = (2, 1).into();
        let (q, r) = ZI.quot_rem(&a, &b);
        assert_eq!(ZI.add(&ZI.mul(&q, &b), &r), a);
        assert!(r.norm() < b.norm());
    }

    #[test]
    fn gcd_of_common_factor() {
        let g: GaussianInteger = (1, 1).into();
        let a = ZI.mul(&g, &(3, 2).into());
        let b = ZI.mul(&g, &(1, -4).into());
        let d = ZI.gcd(&a, &b);
        // the gcd is determined up to units
        assert!(ZI.try_div(&d, &g).is_some());
        assert!(ZI.try_div(&a, &d).is_some() && ZI.try_div(&b, &d).is_some());
    }
}
