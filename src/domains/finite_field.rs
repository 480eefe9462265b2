use std::fmt::{Display, Formatter};

use rand::Rng;

use super::{EuclideanDomain, Field, Ring};

/// A prime field with a 64-bit characteristic.
///
/// Elements are stored reduced, in `0..p`. The primality of the modulus is
/// the caller's responsibility.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Zp64 {
    prime: u64,
}

impl Zp64 {
    pub fn new(prime: u64) -> Zp64 {
        assert!(prime > 1, "the modulus must be at least 2");
        Zp64 { prime }
    }

    pub fn get_prime(&self) -> u64 {
        self.prime
    }

    /// Map an integer into the field.
    pub fn to_element(&self, n: i64) -> u64 {
        n.rem_euclid(self.prime as i64) as u64
    }
}

impl Display for Zp64 {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ℤ/{}", self.prime)
    }
}

impl Ring for Zp64 {
    type Element = u64;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        ((*a as u128 + *b as u128) % self.prime as u128) as u64
    }

    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        self.add(a, &self.neg(b))
    }

    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        ((*a as u128 * *b as u128) % self.prime as u128) as u64
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
        if *a == 0 {
            0
        } else {
            self.prime - a
        }
    }

    fn zero(&self) -> Self::Element {
        0
    }

    fn one(&self) -> Self::Element {
        1
    }

    fn nth(&self, n: u64) -> Self::Element {
        n % self.prime
    }

    fn pow(&self, b: &Self::Element, mut e: u64) -> Self::Element {
        let mut base = *b;
        let mut acc = 1;
        while e > 0 {
            if e & 1 == 1 {
                acc = self.mul(&acc, &base);
            }
            base = self.mul(&base, &base);
            e >>= 1;
        }
        acc
    }

    fn is_zero(a: &Self::Element) -> bool {
        *a == 0
    }

    fn is_one(&self, a: &Self::Element) -> bool {
        *a == 1
    }

    fn characteristic(&self) -> u64 {
        self.prime
    }

    fn try_div(&self, a: &Self::Element, b: &Self::Element) -> Option<Self::Element> {
        if *b == 0 {
            None
        } else {
            Some(self.div(a, b))
        }
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        self.to_element(rng.gen_range(range.0..=range.1))
    }
}

impl EuclideanDomain for Zp64 {
    fn rem(&self, _a: &Self::Element, _b: &Self::Element) -> Self::Element {
        0
    }

    fn quot_rem(&self, a: &Self::Element, b: &Self::Element) -> (Self::Element, Self::Element) {
        (self.div(a, b), 0)
    }

    fn gcd(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        if *a == 0 && *b == 0 {
            0
        } else {
            1
        }
    }
}

impl Field for Zp64 {
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        self.mul(a, &self.inv(b))
    }

    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.div(a, b);
    }

    fn inv(&self, a: &Self::Element) -> Self::Element {
        assert!(*a != 0, "inverse of zero");

        // extended Euclidean algorithm
        let mut t = (0i128, 1i128);
        let mut r = (self.prime as i128, *a as i128);
        while r.1 != 0 {
            let q = r.0 / r.1;
            t = (t.1, t.0 - q * t.1);
            r = (r.1, r.0 - q * r.1);
        }
        debug_assert!(r.0 == 1, "the modulus is not prime");

        t.0.rem_euclid(self.prime as i128) as u64
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn inverse() {
        let field = Zp64::new(17);
        for a in 1..17 {
            assert_eq!(field.mul(&a, &field.inv(&a)), 1);
        }
    }

    #[test]
    fn pow() {
        let field = Zp64::new(17);
        // Fermat
        for a in 1..17 {
            assert_eq!(field.pow(&a, 16), 1);
        }
        assert_eq!(field.pow(&3, 0), 1);
    }

    #[test]
    fn negative_lift() {
        let field = Zp64::new(7);
        assert_eq!(field.to_element(-1), 6);
        assert_eq!(field.sub(&2, &5), 4);
    }
}
