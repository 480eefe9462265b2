//! Elements of free modules over a polynomial ring, and the trait that lets
//! the division and Buchberger machinery treat polynomials and module
//! vectors uniformly.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use crate::domains::Ring;

use super::monomial::{Exponents, Term};
use super::polynomial::MultivariatePolynomial;
use super::{Exponent, MonomialOrder};

/// The position of a leading term inside a module element: the leading row
/// paired with the leading monomial of that row.
///
/// Signatures are ordered row-first, where a *smaller* row ranks *higher*,
/// then by the monomial order within the row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature<E: Exponent> {
    pub row: usize,
    pub exponents: Exponents<E>,
}

impl<E: Exponent> Signature<E> {
    pub fn new(row: usize, exponents: Exponents<E>) -> Signature<E> {
        Signature { row, exponents }
    }

    pub fn cmp<O: MonomialOrder>(&self, other: &Self) -> Ordering {
        other
            .row
            .cmp(&self.row)
            .then_with(|| O::cmp(&self.exponents, &other.exponents))
    }
}

/// Anything the reducer and the Buchberger engine can work on: a polynomial
/// (a single row) or a module vector (indexed rows).
pub trait VectorLike<R: Ring, E: Exponent, O: MonomialOrder>: Clone + Sized {
    /// Assemble an element from its rows.
    fn from_rows(rows: Vec<MultivariatePolynomial<R, E, O>>) -> Self;

    fn rows(&self) -> &[MultivariatePolynomial<R, E, O>];

    fn into_rows(self) -> Vec<MultivariatePolynomial<R, E, O>>;

    #[inline]
    fn nrows(&self) -> usize {
        self.rows().len()
    }

    #[inline]
    fn ring(&self) -> &R {
        &self.rows()[0].ring
    }

    #[inline]
    fn nvars(&self) -> usize {
        self.rows()[0].nvars
    }

    fn is_zero(&self) -> bool {
        self.rows().iter().all(|r| r.is_zero())
    }

    fn zero_like(&self) -> Self {
        Self::from_rows(self.rows().iter().map(|r| r.zero()).collect())
    }

    /// The smallest index of a nonzero row, `None` for the zero element.
    fn leading_row(&self) -> Option<usize> {
        self.rows().iter().position(|r| !r.is_zero())
    }

    /// The polynomial at the leading row.
    fn leading_poly(&self) -> Option<&MultivariatePolynomial<R, E, O>> {
        self.rows().iter().find(|r| !r.is_zero())
    }

    /// The leading term of the leading row.
    fn leading_term(&self) -> Option<Term<R, E>> {
        self.leading_poly().map(|p| p.leading_term())
    }

    fn signature(&self) -> Option<Signature<E>> {
        let row = self.leading_row()?;
        Some(Signature::new(row, self.rows()[row].max_exp().into()))
    }

    fn add(self, other: Self) -> Self {
        debug_assert_eq!(self.nrows(), other.nrows());
        Self::from_rows(
            self.into_rows()
                .into_iter()
                .zip(other.into_rows())
                .map(|(a, b)| a.add(b))
                .collect(),
        )
    }

    fn neg(self) -> Self {
        Self::from_rows(self.into_rows().into_iter().map(|r| r.neg()).collect())
    }

    fn sub(self, other: Self) -> Self {
        self.add(other.neg())
    }

    fn mul_term(&self, term: &Term<R, E>) -> Self {
        Self::from_rows(self.rows().iter().map(|r| r.mul_term(term)).collect())
    }

    /// Whether two elements live in the same module over the same ring.
    fn compatible_with(&self, other: &Self) -> bool {
        self.ring() == other.ring()
            && self.nvars() == other.nvars()
            && self.nrows() == other.nrows()
    }
}

impl<R: Ring, E: Exponent, O: MonomialOrder> VectorLike<R, E, O>
    for MultivariatePolynomial<R, E, O>
{
    fn from_rows(mut rows: Vec<MultivariatePolynomial<R, E, O>>) -> Self {
        debug_assert_eq!(rows.len(), 1);
        rows.pop().unwrap()
    }

    #[inline]
    fn rows(&self) -> &[MultivariatePolynomial<R, E, O>] {
        std::slice::from_ref(self)
    }

    fn into_rows(self) -> Vec<MultivariatePolynomial<R, E, O>> {
        vec![self]
    }
}

/// A fixed-length vector of polynomials, an element of a free module.
#[derive(Clone, Debug)]
pub struct ModuleVector<R: Ring, E: Exponent = u16, O: MonomialOrder = super::GrevLexOrder> {
    pub rows: Vec<MultivariatePolynomial<R, E, O>>,
}

impl<R: Ring, E: Exponent, O: MonomialOrder> ModuleVector<R, E, O> {
    /// Create a module vector from its rows. The vector must have at least
    /// one row and all rows must share the ring and variable count.
    pub fn new(rows: Vec<MultivariatePolynomial<R, E, O>>) -> Self {
        assert!(!rows.is_empty(), "module vector without rows");
        assert!(
            rows.windows(2)
                .all(|w| w[0].ring == w[1].ring && w[0].nvars == w[1].nvars),
            "module vector with mismatched rows"
        );
        ModuleVector { rows }
    }

    /// The zero vector of length `len`.
    pub fn zero(ring: &R, nvars: usize, len: usize) -> Self {
        assert!(len > 0, "module vector without rows");
        ModuleVector {
            rows: (0..len)
                .map(|_| MultivariatePolynomial::new(ring, nvars))
                .collect(),
        }
    }

    /// The unit vector with `poly` at `row`.
    pub fn unit(poly: MultivariatePolynomial<R, E, O>, row: usize, len: usize) -> Self {
        let mut v = Self::zero(&poly.ring, poly.nvars, len);
        v.rows[row] = poly;
        v
    }
}

impl<R: Ring, E: Exponent, O: MonomialOrder> VectorLike<R, E, O> for ModuleVector<R, E, O> {
    fn from_rows(rows: Vec<MultivariatePolynomial<R, E, O>>) -> Self {
        debug_assert!(!rows.is_empty());
        ModuleVector { rows }
    }

    #[inline]
    fn rows(&self) -> &[MultivariatePolynomial<R, E, O>] {
        &self.rows
    }

    fn into_rows(self) -> Vec<MultivariatePolynomial<R, E, O>> {
        self.rows
    }
}

impl<R: Ring, E: Exponent, O: MonomialOrder> PartialEq for ModuleVector<R, E, O> {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
    }
}

impl<R: Ring, E: Exponent, O: MonomialOrder> Display for ModuleVector<R, E, O> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("(")?;
        for (i, r) in self.rows.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            Display::fmt(r, f)?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod test {
    use smallvec::smallvec;

    use crate::domains::rational::{Rational, Q};
    use crate::poly::GrevLexOrder;

    use super::*;

    type Poly = MultivariatePolynomial<crate::domains::rational::RationalField, u16, GrevLexOrder>;

    fn xy_ring() -> Poly {
        MultivariatePolynomial::new(&Q, 2)
    }

    #[test]
    fn leading_row_skips_zero_rows() {
        let zero = xy_ring();
        let v = ModuleVector::new(vec![zero.zero(), zero.variable(1)]);
        assert_eq!(v.leading_row(), Some(1));
        assert_eq!(
            v.signature().unwrap(),
            Signature::new(1, smallvec![0, 1])
        );

        let z = ModuleVector::<_, u16, super::GrevLexOrder>::zero(&Q, 2, 3);
        assert!(VectorLike::is_zero(&z));
        assert_eq!(z.leading_row(), None);
    }

    #[test]
    fn signature_order_ranks_smaller_row_higher() {
        let a: Signature<u16> = Signature::new(0, smallvec![0, 1]);
        let b = Signature::new(1, smallvec![5, 5]);
        assert_eq!(a.cmp::<GrevLexOrder>(&b), Ordering::Greater);

        let c = Signature::new(1, smallvec![0, 2]);
        assert_eq!(b.cmp::<GrevLexOrder>(&c), Ordering::Greater);
    }

    #[test]
    fn rowwise_arithmetic() {
        let zero = xy_ring();
        let x = zero.variable(0);
        let y = zero.variable(1);

        let v = ModuleVector::new(vec![x.clone(), y.clone()]);
        let w = ModuleVector::new(vec![x.clone().neg(), y.clone()]);
        let s = v.clone().add(w);
        assert!(s.rows[0].is_zero());
        assert_eq!(s.rows[1], y.mul_term(&Term::new(Rational::from(2), smallvec![0, 0], Q)));

        let polyview: &[Poly] = v.rows();
        assert_eq!(polyview.len(), 2);
    }
}
