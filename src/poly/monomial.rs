//! Exponent-vector operations and single terms.

use smallvec::SmallVec;

use crate::domains::Ring;

use super::{Exponent, INLINED_EXPONENTS};

/// A dense exponent vector.
pub type Exponents<E> = SmallVec<[E; INLINED_EXPONENTS]>;

/// Returns true iff the monomial `d` divides the monomial `m`.
#[inline]
pub fn monomial_divides<E: Exponent>(d: &[E], m: &[E]) -> bool {
    d.iter().zip(m).all(|(a, b)| a <= b)
}

/// The exact quotient `m / d`, or `None` when `d` does not divide `m`.
pub fn monomial_div<E: Exponent>(m: &[E], d: &[E]) -> Option<Exponents<E>> {
    if monomial_divides(d, m) {
        Some(m.iter().zip(d).map(|(a, b)| *a - *b).collect())
    } else {
        None
    }
}

#[inline]
pub fn monomial_mul<E: Exponent>(a: &[E], b: &[E]) -> Exponents<E> {
    a.iter()
        .zip(b)
        .map(|(e1, e2)| e1.checked_add(e2).expect("overflow in adding exponents"))
        .collect()
}

#[inline]
pub fn monomial_lcm<E: Exponent>(a: &[E], b: &[E]) -> Exponents<E> {
    a.iter().zip(b).map(|(e1, e2)| *e1.max(e2)).collect()
}

/// The pair `(lcm(a,b)/a, lcm(a,b)/b)`.
pub fn lcm_multipliers<E: Exponent>(a: &[E], b: &[E]) -> (Exponents<E>, Exponents<E>) {
    let lcm = monomial_lcm(a, b);
    (
        lcm.iter().zip(a).map(|(e1, e2)| *e1 - *e2).collect(),
        lcm.iter().zip(b).map(|(e1, e2)| *e1 - *e2).collect(),
    )
}

/// The sum of the exponents.
#[inline]
pub fn total_degree<E: Exponent>(m: &[E]) -> u32 {
    m.iter().map(|e| e.to_u32()).sum()
}

/// The total degree of `lcm(a, b)`, without materialising the lcm.
#[inline]
pub fn lcm_degree<E: Exponent>(a: &[E], b: &[E]) -> u32 {
    a.iter().zip(b).map(|(e1, e2)| e1.max(e2).to_u32()).sum()
}

/// A single term: a coefficient times a monomial.
#[derive(Clone, Debug)]
pub struct Term<R: Ring, E: Exponent> {
    pub coefficient: R::Element,
    pub exponents: Exponents<E>,
    pub ring: R,
}

impl<R: Ring, E: Exponent> Term<R, E> {
    #[inline]
    pub fn new(coefficient: R::Element, exponents: Exponents<E>, ring: R) -> Term<R, E> {
        Term {
            coefficient,
            exponents,
            ring,
        }
    }

    pub fn mul(&self, other: &Term<R, E>) -> Term<R, E> {
        Term {
            coefficient: self.ring.mul(&self.coefficient, &other.coefficient),
            exponents: monomial_mul(&self.exponents, &other.exponents),
            ring: self.ring.clone(),
        }
    }

    /// The exact quotient `self / other`: both the monomial and the
    /// coefficient must divide.
    pub fn try_div(&self, other: &Term<R, E>) -> Option<Term<R, E>> {
        let exponents = monomial_div(&self.exponents, &other.exponents)?;
        let coefficient = self.ring.try_div(&self.coefficient, &other.coefficient)?;
        Some(Term {
            coefficient,
            exponents,
            ring: self.ring.clone(),
        })
    }

    pub fn neg(mut self) -> Term<R, E> {
        self.coefficient = self.ring.neg(&self.coefficient);
        self
    }
}

impl<R: Ring, E: Exponent> PartialEq for Term<R, E> {
    fn eq(&self, other: &Self) -> bool {
        self.ring == other.ring
            && self.coefficient == other.coefficient
            && self.exponents == other.exponents
    }
}
