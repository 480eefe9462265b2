//! Multivariate polynomials with terms kept sorted under a monomial order.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

use crate::domains::Ring;

use super::monomial::{monomial_mul, Term};
use super::{Exponent, GrevLexOrder, MonomialOrder};

/// A multivariate polynomial.
///
/// The i-th term is stored as `coefficients[i]` and
/// `exponents[i * nvars..(i + 1) * nvars]`. Terms have distinct monomials,
/// nonzero coefficients, and are sorted ascending under `O`, so that the
/// leading term is the last one.
#[derive(Clone, Debug)]
pub struct MultivariatePolynomial<R: Ring, E: Exponent = u16, O: MonomialOrder = GrevLexOrder> {
    pub coefficients: Vec<R::Element>,
    pub exponents: Vec<E>,
    pub nvars: usize,
    pub ring: R,
    pub(crate) _phantom: PhantomData<O>,
}

impl<R: Ring, E: Exponent, O: MonomialOrder> MultivariatePolynomial<R, E, O> {
    /// Constructs a zero polynomial.
    #[inline]
    pub fn new(ring: &R, nvars: usize) -> Self {
        Self {
            coefficients: vec![],
            exponents: vec![],
            nvars,
            ring: ring.clone(),
            _phantom: PhantomData,
        }
    }

    /// Constructs a zero polynomial, inheriting the ring and variable count
    /// from `self`.
    #[inline]
    pub fn zero(&self) -> Self {
        Self::new(&self.ring, self.nvars)
    }

    /// Constructs a zero polynomial with capacity for `cap` terms,
    /// inheriting the ring and variable count from `self`.
    #[inline]
    pub fn zero_with_capacity(&self, cap: usize) -> Self {
        Self {
            coefficients: Vec::with_capacity(cap),
            exponents: Vec::with_capacity(cap * self.nvars),
            nvars: self.nvars,
            ring: self.ring.clone(),
            _phantom: PhantomData,
        }
    }

    /// Constructs a constant polynomial, inheriting the ring and variable
    /// count from `self`.
    pub fn constant(&self, coeff: R::Element) -> Self {
        if R::is_zero(&coeff) {
            return self.zero();
        }

        Self {
            coefficients: vec![coeff],
            exponents: vec![E::zero(); self.nvars],
            nvars: self.nvars,
            ring: self.ring.clone(),
            _phantom: PhantomData,
        }
    }

    /// Constructs a polynomial with a single term, inheriting the ring and
    /// variable count from `self`.
    pub fn monomial(&self, coeff: R::Element, exponents: Vec<E>) -> Self {
        debug_assert_eq!(self.nvars, exponents.len());

        if R::is_zero(&coeff) {
            return self.zero();
        }

        Self {
            coefficients: vec![coeff],
            exponents,
            nvars: self.nvars,
            ring: self.ring.clone(),
            _phantom: PhantomData,
        }
    }

    /// Constructs the polynomial `x_var`, inheriting the ring and variable
    /// count from `self`.
    pub fn variable(&self, var: usize) -> Self {
        assert!(var < self.nvars, "variable index out of range");
        let mut exp = vec![E::zero(); self.nvars];
        exp[var] = E::one();
        self.monomial(self.ring.one(), exp)
    }

    /// Builds a polynomial from an unsorted list of `(coefficient, exponents)`
    /// pairs. Terms with equal monomials are merged and zero terms dropped.
    pub fn from_terms(ring: &R, nvars: usize, terms: Vec<(R::Element, Vec<E>)>) -> Self {
        let mut sorted_index: Vec<_> = (0..terms.len()).collect();
        sorted_index.sort_by(|a, b| O::cmp(&terms[*a].1, &terms[*b].1));

        let mut res = Self {
            coefficients: Vec::with_capacity(terms.len()),
            exponents: Vec::with_capacity(terms.len() * nvars),
            nvars,
            ring: ring.clone(),
            _phantom: PhantomData,
        };

        for i in sorted_index {
            let (coeff, exp) = &terms[i];
            assert_eq!(exp.len(), nvars, "term with wrong number of exponents");

            if res.nterms() > 0 && res.exponents(res.nterms() - 1) == exp.as_slice() {
                let last = res.nterms() - 1;
                res.ring.add_assign(&mut res.coefficients[last], coeff);
                if R::is_zero(&res.coefficients[last]) {
                    res.coefficients.pop();
                    res.exponents.truncate(last * nvars);
                }
            } else if !R::is_zero(coeff) {
                res.coefficients.push(coeff.clone());
                res.exponents.extend_from_slice(exp);
            }
        }

        res
    }

    /// Like [`Self::from_terms`], inheriting the ring and variable count
    /// from `self`.
    pub fn from_terms_like(&self, terms: Vec<(R::Element, Vec<E>)>) -> Self {
        Self::from_terms(&self.ring, self.nvars, terms)
    }

    /// Returns the number of terms.
    #[inline]
    pub fn nterms(&self) -> usize {
        self.coefficients.len()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.coefficients.is_empty()
    }

    pub fn is_one(&self) -> bool {
        self.nterms() == 1
            && self.ring.is_one(&self.coefficients[0])
            && self.exponents.iter().all(|x| x.is_zero())
    }

    pub fn is_constant(&self) -> bool {
        self.is_zero() || (self.nterms() == 1 && self.exponents.iter().all(|x| x.is_zero()))
    }

    /// Returns the exponent slice of the i-th term.
    #[inline]
    pub fn exponents(&self, index: usize) -> &[E] {
        &self.exponents[index * self.nvars..(index + 1) * self.nvars]
    }

    /// Returns the coefficient of the i-th term.
    #[inline]
    pub fn coefficient(&self, index: usize) -> &R::Element {
        &self.coefficients[index]
    }

    /// The leading coefficient. Panics when the polynomial is zero.
    #[inline]
    pub fn max_coeff(&self) -> &R::Element {
        self.coefficients.last().unwrap()
    }

    /// The leading exponents. Panics when the polynomial is zero.
    #[inline]
    pub fn max_exp(&self) -> &[E] {
        assert!(!self.is_zero(), "leading monomial of zero polynomial");
        self.exponents((self.nterms()) - 1)
    }

    /// The leading term. Panics when the polynomial is zero.
    pub fn leading_term(&self) -> Term<R, E> {
        Term::new(
            self.max_coeff().clone(),
            self.max_exp().into(),
            self.ring.clone(),
        )
    }

    /// Iterate over the terms, in ascending order.
    pub fn terms(&self) -> impl Iterator<Item = (&R::Element, &[E])> {
        (0..self.nterms()).map(move |i| (&self.coefficients[i], self.exponents(i)))
    }

    pub fn neg(mut self) -> Self {
        for c in &mut self.coefficients {
            *c = self.ring.neg(c);
        }
        self
    }

    /// Add two polynomials, merging the sorted term lists.
    pub fn add(mut self, mut other: Self) -> Self {
        if self.is_zero() {
            return other;
        }
        if other.is_zero() {
            return self;
        }
        debug_assert_eq!(self.nvars, other.nvars);

        let mut res = self.zero_with_capacity(self.nterms() + other.nterms());

        let mut i = 0;
        let mut j = 0;
        while i < self.nterms() && j < other.nterms() {
            match O::cmp(self.exponents(i), other.exponents(j)) {
                Ordering::Less => {
                    let c = std::mem::replace(&mut self.coefficients[i], self.ring.zero());
                    res.coefficients.push(c);
                    res.exponents.extend_from_slice(self.exponents(i));
                    i += 1;
                }
                Ordering::Greater => {
                    let c = std::mem::replace(&mut other.coefficients[j], self.ring.zero());
                    res.coefficients.push(c);
                    res.exponents.extend_from_slice(other.exponents(j));
                    j += 1;
                }
                Ordering::Equal => {
                    let mut c = std::mem::replace(&mut self.coefficients[i], self.ring.zero());
                    self.ring.add_assign(&mut c, &other.coefficients[j]);
                    if !R::is_zero(&c) {
                        res.coefficients.push(c);
                        res.exponents.extend_from_slice(self.exponents(i));
                    }
                    i += 1;
                    j += 1;
                }
            }
        }

        while i < self.nterms() {
            let c = std::mem::replace(&mut self.coefficients[i], self.ring.zero());
            res.coefficients.push(c);
            res.exponents.extend_from_slice(self.exponents(i));
            i += 1;
        }

        while j < other.nterms() {
            let c = std::mem::replace(&mut other.coefficients[j], self.ring.zero());
            res.coefficients.push(c);
            res.exponents.extend_from_slice(other.exponents(j));
            j += 1;
        }

        res
    }

    pub fn sub(self, other: Self) -> Self {
        self.add(other.neg())
    }

    /// Multiply by a single term.
    pub fn mul_term(&self, term: &Term<R, E>) -> Self {
        debug_assert_eq!(self.nvars, term.exponents.len());

        let mut res = self.zero_with_capacity(self.nterms());
        for (coeff, exp) in self.terms() {
            let c = self.ring.mul(coeff, &term.coefficient);
            if !R::is_zero(&c) {
                res.coefficients.push(c);
                res.exponents
                    .extend_from_slice(&monomial_mul(exp, &term.exponents));
            }
        }
        res
    }

    /// Multiply two polynomials.
    pub fn mul(&self, other: &Self) -> Self {
        let mut res = self.zero();
        for (coeff, exp) in other.terms() {
            let term = Term::new(coeff.clone(), exp.into(), self.ring.clone());
            res = res.add(self.mul_term(&term));
        }
        res
    }
}

impl<R: Ring, E: Exponent, O: MonomialOrder> PartialEq for MultivariatePolynomial<R, E, O> {
    fn eq(&self, other: &Self) -> bool {
        self.ring == other.ring
            && self.nvars == other.nvars
            && self.coefficients == other.coefficients
            && self.exponents == other.exponents
    }
}

impl<R: Ring, E: Exponent, O: MonomialOrder> Display for MultivariatePolynomial<R, E, O> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }

        for (i, index) in (0..self.nterms()).rev().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }

            let coeff = &self.coefficients[index];
            let exp = self.exponents(index);

            if exp.iter().all(|e| e.is_zero()) {
                write!(f, "{}", coeff)?;
                continue;
            }

            let mut first = if self.ring.is_one(coeff) {
                true
            } else {
                write!(f, "{}", coeff)?;
                false
            };

            for (var, e) in exp.iter().enumerate() {
                if e.is_zero() {
                    continue;
                }
                if !first {
                    f.write_str("*")?;
                }
                first = false;
                if e.to_u32() == 1 {
                    write!(f, "x{}", var)?;
                } else {
                    write!(f, "x{}^{}", var, e)?;
                }
            }
        }

        Ok(())
    }
}
