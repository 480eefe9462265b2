//! Multivariate division of polynomials and module vectors.

use ahash::HashMap;

use crate::domains::Ring;

use super::module::VectorLike;
use super::monomial::Term;
use super::polynomial::MultivariatePolynomial;
use super::{Exponent, MonomialOrder};

/// The outcome of reducing an element against a set of divisors.
#[derive(Clone, Debug, PartialEq)]
pub enum Reduction<V> {
    /// No term of the element was divisible by any divisor.
    Unchanged,
    /// The element was reduced to the (nonzero) contained value.
    Reduced(V),
    /// The element was reduced to zero.
    Zero,
}

impl<V> Reduction<V> {
    pub fn is_zero(&self) -> bool {
        matches!(self, Reduction::Zero)
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, Reduction::Unchanged)
    }
}

/// Attempt to cancel the leading term of `f` with `g`.
///
/// Succeeds when the leading rows coincide, the leading monomial of `g`
/// divides the one of `f` and the leading coefficient divides exactly;
/// returns the quotient term and the remainder.
pub fn lead_div_rem<R: Ring, E: Exponent, O: MonomialOrder, V: VectorLike<R, E, O>>(
    f: &V,
    g: &V,
) -> Option<(Term<R, E>, V)> {
    if f.leading_row()? != g.leading_row()? {
        return None;
    }
    let q = f.leading_term()?.try_div(&g.leading_term()?)?;
    let r = f.clone().sub(g.mul_term(&q));
    Some((q, r))
}

/// Attempt to cancel *any* term of `f` with the leading term of `g`,
/// scanning from the largest monomial down. Used for tail reduction.
pub fn div_rem_any<R: Ring, E: Exponent, O: MonomialOrder, V: VectorLike<R, E, O>>(
    f: &V,
    g: &V,
) -> Option<(Term<R, E>, V)> {
    let gr = g.leading_row()?;
    let gt = g.leading_term()?;

    let frow = &f.rows()[gr];
    for i in (0..frow.nterms()).rev() {
        let t = Term::new(
            frow.coefficient(i).clone(),
            frow.exponents(i).into(),
            frow.ring.clone(),
        );
        if let Some(q) = t.try_div(&gt) {
            let r = f.clone().sub(g.mul_term(&q));
            return Some((q, r));
        }
    }

    None
}

/// Accumulate a quotient term for divisor `key` into a sparse quotient row.
pub(crate) fn accumulate_quotient<R: Ring, E: Exponent, O: MonomialOrder>(
    quotients: &mut HashMap<usize, MultivariatePolynomial<R, E, O>>,
    key: usize,
    q: &Term<R, E>,
    template: &MultivariatePolynomial<R, E, O>,
) {
    let entry = quotients.entry(key).or_insert_with(|| template.zero());
    let q_poly = template.monomial(q.coefficient.clone(), q.exponents.to_vec());
    *entry = std::mem::replace(entry, template.zero()).add(q_poly);
}

/// Reduce `f` against the divisors `gs`, greedily: after every successful
/// division the cursor restarts at the first divisor.
///
/// With `lead_only`, only leading terms are cancelled; otherwise a full
/// normal form is computed. Quotients are accumulated per divisor key when
/// requested.
pub(crate) fn reduce_vec<R: Ring, E: Exponent, O: MonomialOrder, V: VectorLike<R, E, O>>(
    f: &V,
    gs: &[(usize, &V)],
    lead_only: bool,
    mut quotients: Option<&mut HashMap<usize, MultivariatePolynomial<R, E, O>>>,
) -> Reduction<V> {
    if f.is_zero() || gs.is_empty() {
        return Reduction::Unchanged;
    }

    let template = f.rows()[0].zero();
    let mut r = f.clone();
    let mut changed = false;

    // leading terms first: each success strictly lowers the signature
    let mut cursor = 0;
    while cursor < gs.len() && !r.is_zero() {
        match lead_div_rem(&r, gs[cursor].1) {
            Some((q, reduced)) => {
                r = reduced;
                changed = true;
                if let Some(quot) = quotients.as_deref_mut() {
                    accumulate_quotient(quot, gs[cursor].0, &q, &template);
                }
                cursor = 0;
            }
            None => cursor += 1,
        }
    }

    if !lead_only {
        let mut cursor = 0;
        while cursor < gs.len() && !r.is_zero() {
            match div_rem_any(&r, gs[cursor].1) {
                Some((q, reduced)) => {
                    r = reduced;
                    changed = true;
                    if let Some(quot) = quotients.as_deref_mut() {
                        accumulate_quotient(quot, gs[cursor].0, &q, &template);
                    }
                    cursor = 0;
                }
                None => cursor += 1,
            }
        }
    }

    if !changed {
        Reduction::Unchanged
    } else if r.is_zero() {
        Reduction::Zero
    } else {
        Reduction::Reduced(r)
    }
}

/// The remainder of dividing `f` by the elements of `gs`.
///
/// No leading monomial of any `gs[i]` divides any monomial of the result.
/// `rem(f, &[])` is `f` itself.
pub fn rem<R: Ring, E: Exponent, O: MonomialOrder, V: VectorLike<R, E, O>>(f: &V, gs: &[V]) -> V {
    let refs: Vec<(usize, &V)> = gs.iter().enumerate().collect();
    match reduce_vec(f, &refs, false, None) {
        Reduction::Unchanged => f.clone(),
        Reduction::Reduced(r) => r,
        Reduction::Zero => f.zero_like(),
    }
}

/// Divide `f` by the elements of `gs`, returning the quotient row and the
/// remainder, with `f = r + Σ qᵢ·gs[i]`.
pub fn divrem<R: Ring, E: Exponent, O: MonomialOrder, V: VectorLike<R, E, O>>(
    f: &V,
    gs: &[V],
) -> (Vec<MultivariatePolynomial<R, E, O>>, V) {
    let refs: Vec<(usize, &V)> = gs.iter().enumerate().collect();
    let mut quotients = HashMap::default();
    let r = match reduce_vec(f, &refs, false, Some(&mut quotients)) {
        Reduction::Unchanged => f.clone(),
        Reduction::Reduced(r) => r,
        Reduction::Zero => f.zero_like(),
    };

    let template = f.rows()[0].zero();
    let q = (0..gs.len())
        .map(|i| quotients.remove(&i).unwrap_or_else(|| template.zero()))
        .collect();

    (q, r)
}

/// The number of divisors of a monomial, saturating.
pub(crate) fn divisor_count<E: Exponent>(m: &[E]) -> u64 {
    m.iter()
        .fold(1u64, |acc, e| acc.saturating_mul(e.to_u32() as u64 + 1))
}

/// Visit every divisor of the monomial `m`, in odometer order. Stops and
/// returns `true` as soon as `visit` does.
pub(crate) fn for_each_divisor<E: Exponent>(
    m: &[E],
    mut visit: impl FnMut(&[E]) -> bool,
) -> bool {
    let mut current = vec![E::zero(); m.len()];
    loop {
        if visit(&current) {
            return true;
        }

        // advance the odometer over the nonzero positions
        let mut k = 0;
        loop {
            if k == m.len() {
                return false;
            }
            if m[k].is_zero() {
                k += 1;
                continue;
            }
            if current[k] < m[k] {
                current[k] += E::one();
                break;
            }
            current[k] = E::zero();
            k += 1;
        }
    }
}
