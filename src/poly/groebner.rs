//! Gröbner bases of ideals and submodules via Buchberger's algorithm, with
//! optional transformation matrices and syzygy computation.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

use ahash::{HashMap, HashSet};
use thiserror::Error;
use tracing::debug;

use crate::domains::{EuclideanDomain, Field, Ring};

use super::module::{Signature, VectorLike};
use super::monomial::{
    lcm_degree, lcm_multipliers, monomial_div, monomial_divides, monomial_lcm, Exponents, Term,
};
use super::polynomial::MultivariatePolynomial;
use super::reduce::{
    accumulate_quotient, div_rem_any, divisor_count, divrem, for_each_divisor, reduce_vec, rem,
    Reduction,
};
use super::{Exponent, GrevLexOrder, MonomialOrder};

/// Errors reported by the Gröbner basis layer.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GroebnerError {
    /// No generators were provided where at least one is required.
    #[error("no generators were provided")]
    EmptyInput,
    /// The generators do not live in a common module over a common ring.
    #[error("the inputs do not live in a common polynomial module")]
    IncompatibleRings,
    /// A syzygy computation was handed a set that is not a Gröbner basis.
    #[error("the input is not a Gröbner basis")]
    NotAGroebnerBasis,
    /// The computation was cancelled cooperatively.
    #[error("the computation was cancelled")]
    Cancelled,
}

/// The engine that carries out the computation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Backend {
    /// Single-threaded, deterministic.
    #[default]
    Sequential,
    /// A pool of worker threads over a shared basis.
    Parallel,
}

/// A callback receiving `(loops, basis_size, queue_size)`.
pub type ProgressCallback = Arc<dyn Fn(usize, usize, usize) + Send + Sync>;

/// Options for [`groebner_basis`] and [`groebner_transformation`].
#[derive(Clone, Default)]
pub struct GroebnerOptions {
    /// Discard pairs whose lcm degree exceeds this cap.
    pub max_degree: Option<u32>,
    /// Maintain the matrix mapping basis elements back to the inputs.
    /// Implied by [`groebner_transformation`]; [`groebner_basis`] discards
    /// the matrix either way.
    pub with_transformation: bool,
    pub backend: Backend,
    /// Number of worker threads for the parallel backend; 0 picks the
    /// available parallelism.
    pub threads: usize,
    pub progress: Option<ProgressCallback>,
    /// Cooperative cancellation flag; when it becomes true the engine stops
    /// and reports [`GroebnerError::Cancelled`].
    pub cancel: Option<Arc<AtomicBool>>,
}

impl GroebnerOptions {
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|c| c.load(AtomicOrdering::Relaxed))
            .unwrap_or(false)
    }

    pub(crate) fn num_threads(&self) -> usize {
        if self.threads > 0 {
            self.threads
        } else {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        }
    }
}

impl std::fmt::Debug for GroebnerOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroebnerOptions")
            .field("max_degree", &self.max_degree)
            .field("with_transformation", &self.with_transformation)
            .field("backend", &self.backend)
            .field("threads", &self.threads)
            .field("progress", &self.progress.is_some())
            .field("cancel", &self.cancel.is_some())
            .finish()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Stats {
    pub loops: usize,
    /// Pairs discarded by the product criterion.
    pub saved: usize,
    pub reductions_to_zero: usize,
}

/// A sparse row of the transformation matrix: input column to coefficient.
pub(crate) type TransformationRow<R, E, O> = HashMap<usize, MultivariatePolynomial<R, E, O>>;

/// A min-priority queue of unordered index pairs keyed by lcm degree, with a
/// membership mirror for the product criterion.
pub(crate) struct PairQueue {
    heap: BinaryHeap<Reverse<(u32, usize, usize)>>,
    set: HashSet<(usize, usize)>,
}

impl PairQueue {
    pub fn new() -> PairQueue {
        PairQueue {
            heap: BinaryHeap::new(),
            set: HashSet::default(),
        }
    }

    pub fn push(&mut self, i: usize, j: usize, degree: u32) {
        let pair = (i.min(j), i.max(j));
        if self.set.insert(pair) {
            self.heap.push(Reverse((degree, pair.0, pair.1)));
        }
    }

    pub fn contains(&self, i: usize, j: usize) -> bool {
        self.set.contains(&(i.min(j), i.max(j)))
    }

    /// Pop the next pair whose two components are both still alive.
    pub fn pop(&mut self, alive: impl Fn(usize) -> bool) -> Option<(usize, usize)> {
        while let Some(Reverse((_, i, j))) = self.heap.pop() {
            self.set.remove(&(i, j));
            if alive(i) && alive(j) {
                return Some((i, j));
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.set.clear();
    }
}

/// The multipliers `(m_a, m_b)` with `m_a·t_a = m_b·t_b = lcm(t_a, t_b)`,
/// including the coefficient factors that make the cancellation exact.
pub(crate) fn spair_terms<R: EuclideanDomain, E: Exponent>(
    ta: &Term<R, E>,
    tb: &Term<R, E>,
) -> (Term<R, E>, Term<R, E>) {
    let (ea, eb) = lcm_multipliers(&ta.exponents, &tb.exponents);
    let ring = ta.ring.clone();
    let g = ring.gcd(&ta.coefficient, &tb.coefficient);
    let ca = ring.quot_rem(&tb.coefficient, &g).0;
    let cb = ring.quot_rem(&ta.coefficient, &g).0;
    (
        Term::new(ca, ea, ring.clone()),
        Term::new(cb, eb, ring),
    )
}

/// The growing basis of a Buchberger run.
///
/// Every element has a *stable index*, the slot it was inserted at; removed
/// elements leave a `None` tombstone so that stable indices stay valid.
/// `sort_order` lists the live stable indices sorted by leading signature,
/// which makes the divisor lookup a binary search.
pub(crate) struct BasisState<R: Ring, E: Exponent, O: MonomialOrder, V: VectorLike<R, E, O>> {
    pub ring: R,
    pub nvars: usize,
    /// The number of original inputs; the column count of the
    /// transformation matrix.
    pub ninputs: usize,
    pub elements: Vec<Option<V>>,
    pub lms: Vec<Option<Signature<E>>>,
    pub transformation: Option<Vec<TransformationRow<R, E, O>>>,
    pub sort_order: Vec<usize>,
}

impl<R: EuclideanDomain, E: Exponent, O: MonomialOrder, V: VectorLike<R, E, O>>
    BasisState<R, E, O, V>
{
    pub fn new(ring: R, nvars: usize, ninputs: usize, with_transformation: bool) -> Self {
        BasisState {
            ring,
            nvars,
            ninputs,
            elements: vec![],
            lms: vec![],
            transformation: with_transformation.then(Vec::new),
            sort_order: vec![],
        }
    }

    pub fn template(&self) -> MultivariatePolynomial<R, E, O> {
        MultivariatePolynomial::new(&self.ring, self.nvars)
    }

    #[inline]
    pub fn alive(&self, ix: usize) -> bool {
        self.elements[ix].is_some()
    }

    pub fn live_count(&self) -> usize {
        self.sort_order.len()
    }

    fn sort_position(&self, sig: &Signature<E>) -> usize {
        self.sort_order.partition_point(|&s| {
            self.lms[s].as_ref().unwrap().cmp::<O>(sig) == Ordering::Less
        })
    }

    /// Insert a nonzero element and return its stable index.
    pub fn insert(&mut self, v: V, row: Option<TransformationRow<R, E, O>>) -> usize {
        let ix = self.elements.len();
        let sig = v.signature().unwrap();
        let pos = self.sort_position(&sig);
        self.sort_order.insert(pos, ix);
        self.elements.push(Some(v));
        self.lms.push(Some(sig));
        if let Some(tr) = &mut self.transformation {
            tr.push(row.unwrap_or_default());
        }
        ix
    }

    /// Take an element out of the basis, keeping its stable slot reserved.
    pub fn detach(&mut self, ix: usize) -> V {
        self.sort_order.retain(|&s| s != ix);
        self.lms[ix] = None;
        self.elements[ix].take().unwrap()
    }

    /// Put an element back at its reserved stable slot.
    pub fn attach(&mut self, ix: usize, v: V) {
        let sig = v.signature().unwrap();
        let pos = self.sort_position(&sig);
        self.sort_order.insert(pos, ix);
        self.lms[ix] = Some(sig);
        self.elements[ix] = Some(v);
    }

    /// Find a live element whose leading term divides the given leading
    /// term: either by enumerating the divisors of the monomial and binary
    /// searching the sorted leading terms, or by a linear scan when the
    /// divisor enumeration would be larger.
    pub fn find_lead_reducer(
        &self,
        sig: &Signature<E>,
        lc: &R::Element,
    ) -> Option<(usize, Term<R, E>)> {
        if self.sort_order.is_empty() {
            return None;
        }

        if divisor_count(&sig.exponents) <= 2 * self.sort_order.len() as u64 + 16 {
            let mut found = None;
            for_each_divisor(&sig.exponents, |d| {
                let target = Signature::new(sig.row, Exponents::from_slice(d));
                let start = self.sort_order.partition_point(|&s| {
                    self.lms[s].as_ref().unwrap().cmp::<O>(&target) == Ordering::Less
                });
                for &s in &self.sort_order[start..] {
                    if self.lms[s].as_ref().unwrap().cmp::<O>(&target) != Ordering::Equal {
                        break;
                    }
                    let g_lc = self.elements[s].as_ref().unwrap().leading_term().unwrap();
                    if let Some(qc) = self.ring.try_div(lc, &g_lc.coefficient) {
                        let qm: Exponents<E> = sig
                            .exponents
                            .iter()
                            .zip(d)
                            .map(|(a, b)| *a - *b)
                            .collect();
                        found = Some((s, Term::new(qc, qm, self.ring.clone())));
                        return true;
                    }
                }
                false
            });
            found
        } else {
            for &s in &self.sort_order {
                let lm = self.lms[s].as_ref().unwrap();
                if lm.row == sig.row && monomial_divides(&lm.exponents, &sig.exponents) {
                    let g_lc = self.elements[s].as_ref().unwrap().leading_term().unwrap();
                    if let Some(qc) = self.ring.try_div(lc, &g_lc.coefficient) {
                        let qm = monomial_div(&sig.exponents, &lm.exponents).unwrap();
                        return Some((s, Term::new(qc, qm, self.ring.clone())));
                    }
                }
            }
            None
        }
    }

    /// Reduce `f` to normal form against the live elements, leading terms
    /// first, then every remaining term.
    pub fn normal_form(
        &self,
        f: &V,
        mut quotients: Option<&mut TransformationRow<R, E, O>>,
    ) -> Reduction<V> {
        if f.is_zero() {
            return Reduction::Zero;
        }

        let template = self.template();
        let mut r = f.clone();
        let mut changed = false;

        loop {
            if r.is_zero() {
                return Reduction::Zero;
            }
            let sig = r.signature().unwrap();
            let lc = r.leading_term().unwrap().coefficient;
            let Some((s, q)) = self.find_lead_reducer(&sig, &lc) else {
                break;
            };
            r = r.sub(self.elements[s].as_ref().unwrap().mul_term(&q));
            changed = true;
            if let Some(quot) = quotients.as_deref_mut() {
                accumulate_quotient(quot, s, &q, &template);
            }
        }

        let mut cursor = 0;
        while cursor < self.sort_order.len() && !r.is_zero() {
            let s = self.sort_order[cursor];
            match div_rem_any(&r, self.elements[s].as_ref().unwrap()) {
                Some((q, reduced)) => {
                    r = reduced;
                    changed = true;
                    if let Some(quot) = quotients.as_deref_mut() {
                        accumulate_quotient(quot, s, &q, &template);
                    }
                    cursor = 0;
                }
                None => cursor += 1,
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

    /// The row `m_a·tr[i] − m_b·tr[j]`.
    fn row_combination(
        &self,
        i: usize,
        j: usize,
        ma: &Term<R, E>,
        mb: &Term<R, E>,
    ) -> TransformationRow<R, E, O> {
        let tr = self.transformation.as_ref().unwrap();
        let mut row = TransformationRow::default();
        for (col, p) in &tr[i] {
            row.insert(*col, p.mul_term(ma));
        }
        for (col, p) in &tr[j] {
            let entry = row.entry(*col).or_insert_with(|| self.template());
            *entry = std::mem::replace(entry, self.template()).sub(p.mul_term(mb));
        }
        row.retain(|_, p| !p.is_zero());
        row
    }

    /// Apply `row -= Σ_k quotients[k]·tr[k]`.
    fn apply_quotients_to_row(
        &self,
        row: &mut TransformationRow<R, E, O>,
        quotients: &TransformationRow<R, E, O>,
    ) {
        let Some(tr) = self.transformation.as_ref() else {
            return;
        };
        for (k, qk) in quotients {
            for (col, p) in &tr[*k] {
                let entry = row.entry(*col).or_insert_with(|| self.template());
                *entry = std::mem::replace(entry, self.template()).sub(qk.mul(p));
            }
        }
        row.retain(|_, p| !p.is_zero());
    }

    /// Fold reduction quotients into the transformation row of `target`.
    fn update_transformation(&mut self, target: usize, quotients: &TransformationRow<R, E, O>) {
        if self.transformation.is_none() || quotients.is_empty() {
            return;
        }
        let mut row = std::mem::take(&mut self.transformation.as_mut().unwrap()[target]);
        self.apply_quotients_to_row(&mut row, quotients);
        self.transformation.as_mut().unwrap()[target] = row;
    }

    /// Clone the live elements in sorted order, together with the current
    /// element count, for lock-free reduction in the parallel engine.
    pub fn snapshot(&self) -> (usize, Vec<(usize, V)>) {
        (
            self.elements.len(),
            self.sort_order
                .iter()
                .map(|&s| (s, self.elements[s].as_ref().unwrap().clone()))
                .collect(),
        )
    }

    /// The surviving elements, in insertion order, with the transformation
    /// rows flattened to dense rows of `ninputs` columns.
    pub fn into_basis(self) -> (Vec<V>, Option<Vec<Vec<MultivariatePolynomial<R, E, O>>>>) {
        let template = self.template();
        let ncols = self.ninputs;
        let mut basis = vec![];
        let mut matrix = self.transformation.as_ref().map(|_| vec![]);

        for (ix, e) in self.elements.iter().enumerate() {
            let Some(e) = e else { continue };
            basis.push(e.clone());
            if let (Some(matrix), Some(tr)) = (&mut matrix, &self.transformation) {
                let row = &tr[ix];
                matrix.push(
                    (0..ncols)
                        .map(|col| row.get(&col).cloned().unwrap_or_else(|| template.zero()))
                        .collect::<Vec<_>>(),
                );
            }
        }

        (basis, matrix)
    }
}

/// Validate the inputs and build the initial state: drop zero inputs, seed
/// unit transformation rows, inter-reduce the survivors and fill the pair
/// queue. Returns `None` when no nonzero generators remain.
pub(crate) fn initialize<R, E, O, V>(
    gens: &[V],
    options: &GroebnerOptions,
    with_transformation: bool,
) -> Result<Option<(BasisState<R, E, O, V>, PairQueue)>, GroebnerError>
where
    R: EuclideanDomain,
    E: Exponent,
    O: MonomialOrder,
    V: VectorLike<R, E, O>,
{
    for w in gens.windows(2) {
        if !w[0].compatible_with(&w[1]) {
            return Err(GroebnerError::IncompatibleRings);
        }
    }

    let Some(first) = gens.iter().find(|g| !g.is_zero()) else {
        return Ok(None);
    };

    let mut state: BasisState<R, E, O, V> = BasisState::new(
        first.ring().clone(),
        first.nvars(),
        gens.len(),
        with_transformation,
    );

    for (col, g) in gens.iter().enumerate() {
        if g.is_zero() {
            continue;
        }
        let row = with_transformation.then(|| {
            let mut row = TransformationRow::default();
            row.insert(col, state.template().constant(state.ring.one()));
            row
        });
        state.insert(g.clone(), row);
    }

    // inter-reduce the inputs
    for ix in 0..state.elements.len() {
        if !state.alive(ix) {
            continue;
        }
        let f = state.detach(ix);
        let mut quotients = TransformationRow::default();
        let red = state.normal_form(&f, with_transformation.then_some(&mut quotients));
        state.update_transformation(ix, &quotients);
        match red {
            Reduction::Unchanged => state.attach(ix, f),
            Reduction::Reduced(r) => state.attach(ix, r),
            Reduction::Zero => {}
        }
    }

    let mut queue = PairQueue::new();
    let live: Vec<usize> = state.sort_order.clone();
    for (a, &i) in live.iter().enumerate() {
        for &j in &live[a + 1..] {
            enqueue_pair(&state, &mut queue, i, j, options);
        }
    }

    Ok(Some((state, queue)))
}

/// Enqueue the pair `(i, j)` unless the leading rows differ or the lcm
/// degree exceeds the cap.
pub(crate) fn enqueue_pair<R, E, O, V>(
    state: &BasisState<R, E, O, V>,
    queue: &mut PairQueue,
    i: usize,
    j: usize,
    options: &GroebnerOptions,
) where
    R: EuclideanDomain,
    E: Exponent,
    O: MonomialOrder,
    V: VectorLike<R, E, O>,
{
    let (si, sj) = (
        state.lms[i].as_ref().unwrap(),
        state.lms[j].as_ref().unwrap(),
    );
    if si.row != sj.row {
        return;
    }
    let degree = lcm_degree(&si.exponents, &sj.exponents);
    if options.max_degree.is_some_and(|cap| degree > cap) {
        return;
    }
    queue.push(i, j, degree);
}

/// Whether the pair `(i, j)` can be discarded: a third live element with the
/// same leading row divides the lcm of the pair, and both of its pairs with
/// `i` and `j` have already left the queue.
pub(crate) fn product_criterion<R, E, O, V>(
    state: &BasisState<R, E, O, V>,
    queue: &PairQueue,
    i: usize,
    j: usize,
) -> bool
where
    R: EuclideanDomain,
    E: Exponent,
    O: MonomialOrder,
    V: VectorLike<R, E, O>,
{
    let (si, sj) = (
        state.lms[i].as_ref().unwrap(),
        state.lms[j].as_ref().unwrap(),
    );
    let lcm = monomial_lcm(&si.exponents, &sj.exponents);

    for &l in &state.sort_order {
        if l == i || l == j {
            continue;
        }
        let sl = state.lms[l].as_ref().unwrap();
        if sl.row == si.row
            && monomial_divides(&sl.exponents, &lcm)
            && !queue.contains(i, l)
            && !queue.contains(j, l)
        {
            return true;
        }
    }
    false
}

#[derive(Debug)]
pub(crate) struct BuchbergerOutput<R: Ring, E: Exponent, O: MonomialOrder, V> {
    pub basis: Vec<V>,
    pub transformation: Option<Vec<Vec<MultivariatePolynomial<R, E, O>>>>,
    pub stats: Stats,
}

/// The sequential Buchberger driver.
pub(crate) fn buchberger<R, E, O, V>(
    gens: &[V],
    options: &GroebnerOptions,
    with_transformation: bool,
) -> Result<BuchbergerOutput<R, E, O, V>, GroebnerError>
where
    R: EuclideanDomain,
    E: Exponent,
    O: MonomialOrder,
    V: VectorLike<R, E, O>,
{
    let Some((mut state, mut queue)) = initialize(gens, options, with_transformation)? else {
        return Ok(BuchbergerOutput {
            basis: vec![],
            transformation: with_transformation.then(Vec::new),
            stats: Stats::default(),
        });
    };

    debug!(
        inputs = gens.len(),
        live = state.live_count(),
        pairs = queue.len(),
        "starting Buchberger"
    );

    let mut stats = Stats::default();

    while let Some((i, j)) = queue.pop(|ix| state.alive(ix)) {
        if options.is_cancelled() {
            return Err(GroebnerError::Cancelled);
        }

        stats.loops += 1;
        if let Some(cb) = &options.progress {
            cb(stats.loops, state.live_count(), queue.len());
        }
        if stats.loops % 1000 == 999 {
            debug!(
                loops = stats.loops,
                basis = state.live_count(),
                pairs = queue.len(),
                saved = stats.saved,
                "Buchberger progress"
            );
        }

        if product_criterion(&state, &queue, i, j) {
            stats.saved += 1;
            continue;
        }

        let (s, ma, mb) = {
            let a = state.elements[i].as_ref().unwrap();
            let b = state.elements[j].as_ref().unwrap();
            let (ma, mb) = spair_terms(&a.leading_term().unwrap(), &b.leading_term().unwrap());
            (a.mul_term(&ma).sub(b.mul_term(&mb)), ma, mb)
        };

        let mut quotients = TransformationRow::default();
        let red = state.normal_form(&s, with_transformation.then_some(&mut quotients));
        let s_red = match red {
            Reduction::Zero => {
                stats.reductions_to_zero += 1;
                continue;
            }
            Reduction::Unchanged => s,
            Reduction::Reduced(r) => r,
        };

        let row = with_transformation.then(|| {
            let mut row = state.row_combination(i, j, &ma, &mb);
            state.apply_quotients_to_row(&mut row, &quotients);
            row
        });
        let new_ix = state.insert(s_red, row);

        interreduce_against(&mut state, new_ix, with_transformation);

        let others: Vec<usize> = state
            .sort_order
            .iter()
            .copied()
            .filter(|&s| s != new_ix)
            .collect();
        for other in others {
            enqueue_pair(&state, &mut queue, other, new_ix, options);
        }
    }

    debug!(
        loops = stats.loops,
        saved = stats.saved,
        reductions_to_zero = stats.reductions_to_zero,
        basis = state.live_count(),
        "Buchberger done"
    );

    let (basis, transformation) = state.into_basis();
    Ok(BuchbergerOutput {
        basis,
        transformation,
        stats,
    })
}

/// Re-run every live element through reduction against the newly inserted
/// element only; when that hint changes an element, it is fully reduced
/// against the whole basis. Elements reducing to zero are removed.
fn interreduce_against<R, E, O, V>(
    state: &mut BasisState<R, E, O, V>,
    new_ix: usize,
    with_transformation: bool,
) where
    R: EuclideanDomain,
    E: Exponent,
    O: MonomialOrder,
    V: VectorLike<R, E, O>,
{
    let live: Vec<usize> = state.sort_order.clone();
    for ix in live {
        if ix == new_ix || !state.alive(ix) {
            continue;
        }

        let mut quotients = TransformationRow::default();
        let red = {
            let f = state.elements[ix].as_ref().unwrap();
            let hint = state.elements[new_ix].as_ref().unwrap();
            reduce_vec(
                f,
                &[(new_ix, hint)],
                false,
                with_transformation.then_some(&mut quotients),
            )
        };
        if red.is_unchanged() {
            continue;
        }

        let _original = state.detach(ix);
        state.update_transformation(ix, &quotients);

        let r = match red {
            Reduction::Zero => continue,
            Reduction::Reduced(r) => r,
            Reduction::Unchanged => unreachable!(),
        };

        // the hint changed the element: take it to a full normal form
        let mut quotients = TransformationRow::default();
        match state.normal_form(&r, with_transformation.then_some(&mut quotients)) {
            Reduction::Zero => {
                state.update_transformation(ix, &quotients);
            }
            Reduction::Unchanged => state.attach(ix, r),
            Reduction::Reduced(r2) => {
                state.update_transformation(ix, &quotients);
                state.attach(ix, r2);
            }
        }
    }
}

/// Compute a Gröbner basis of the ideal or submodule generated by `gens`.
///
/// Zero generators are dropped; an input without nonzero generators yields
/// an empty basis. The order of the returned elements is unspecified; see
/// [`GroebnerBasis::sort_reduced`] for a canonical ordering.
pub fn groebner_basis<R, E, O, V>(
    gens: &[V],
    options: &GroebnerOptions,
) -> Result<Vec<V>, GroebnerError>
where
    R: EuclideanDomain + Send + Sync,
    R::Element: Send + Sync,
    E: Exponent,
    O: MonomialOrder,
    V: VectorLike<R, E, O> + Send + Sync,
{
    match options.backend {
        Backend::Sequential => Ok(buchberger(gens, options, options.with_transformation)?.basis),
        Backend::Parallel => super::parallel::buchberger_parallel(gens, options),
    }
}

/// Compute a Gröbner basis together with the transformation matrix `T`
/// satisfying `basis[i] = Σ_j T[i][j]·gens[j]`.
///
/// The matrix has one row per basis element and one column per input
/// generator. This always runs the sequential engine.
pub fn groebner_transformation<R, E, O, V>(
    gens: &[V],
    options: &GroebnerOptions,
) -> Result<(Vec<V>, Vec<Vec<MultivariatePolynomial<R, E, O>>>), GroebnerError>
where
    R: EuclideanDomain,
    E: Exponent,
    O: MonomialOrder,
    V: VectorLike<R, E, O>,
{
    if gens.is_empty() {
        return Err(GroebnerError::EmptyInput);
    }

    let out = buchberger(gens, options, true)?;
    Ok((out.basis, out.transformation.unwrap()))
}

/// Compute a spanning set of syzygies of a Gröbner basis `gs`: rows `s`
/// with `Σ_k s[k]·gs[k] = 0`.
///
/// Every S-polynomial must reduce to zero against `gs`, otherwise
/// [`GroebnerError::NotAGroebnerBasis`] is reported. Both the raw pair
/// syzygies and their reductions against the running set are kept, so the
/// result is spanning but not minimal.
pub fn syzygies<R, E, O, V>(
    gs: &[V],
) -> Result<Vec<Vec<MultivariatePolynomial<R, E, O>>>, GroebnerError>
where
    R: EuclideanDomain,
    E: Exponent,
    O: MonomialOrder,
    V: VectorLike<R, E, O>,
{
    for w in gs.windows(2) {
        if !w[0].compatible_with(&w[1]) {
            return Err(GroebnerError::IncompatibleRings);
        }
    }

    let Some(first) = gs.iter().find(|g| !g.is_zero()) else {
        return Ok(vec![]);
    };
    let template = first.rows()[0].zero();
    let n = gs.len();

    let mut relations: Vec<super::module::ModuleVector<R, E, O>> = vec![];

    for i in 0..n {
        for j in i + 1..n {
            let (Some(si), Some(sj)) = (gs[i].signature(), gs[j].signature()) else {
                continue;
            };
            if si.row != sj.row {
                continue;
            }

            let (ma, mb) = spair_terms(
                &gs[i].leading_term().unwrap(),
                &gs[j].leading_term().unwrap(),
            );
            let s = gs[i].mul_term(&ma).sub(gs[j].mul_term(&mb));
            let (mut q, r) = divrem(&s, gs);
            if !r.is_zero() {
                return Err(GroebnerError::NotAGroebnerBasis);
            }

            // q·gs = s = ma·gs[i] − mb·gs[j], so shifting the multipliers
            // into the row yields a relation
            q[i] = std::mem::replace(&mut q[i], template.zero())
                .sub(template.monomial(ma.coefficient.clone(), ma.exponents.to_vec()));
            q[j] = std::mem::replace(&mut q[j], template.zero())
                .add(template.monomial(mb.coefficient.clone(), mb.exponents.to_vec()));
            let syzygy = super::module::ModuleVector::new(q);

            let reduced = rem(&syzygy, &relations);
            if !VectorLike::is_zero(&reduced) {
                relations.push(reduced);
            }
            relations.push(syzygy);
        }
    }

    Ok(relations.into_iter().map(|v| v.into_rows()).collect())
}

/// A computed Gröbner basis, with utilities to minimise and order it.
pub struct GroebnerBasis<
    R: Ring,
    E: Exponent = u16,
    O: MonomialOrder = GrevLexOrder,
    V = MultivariatePolynomial<R, E, O>,
> {
    pub system: Vec<V>,
    _phantom: PhantomData<fn() -> (R, E, O)>,
}

impl<R, E, O, V> GroebnerBasis<R, E, O, V>
where
    R: EuclideanDomain,
    E: Exponent,
    O: MonomialOrder,
    V: VectorLike<R, E, O>,
{
    pub fn from_system(system: Vec<V>) -> Self {
        GroebnerBasis {
            system,
            _phantom: PhantomData,
        }
    }

    /// Whether every S-polynomial of `system` reduces to zero against it.
    pub fn is_groebner_basis(system: &[V]) -> bool {
        for (i, a) in system.iter().enumerate() {
            for b in &system[i + 1..] {
                let (Some(sa), Some(sb)) = (a.signature(), b.signature()) else {
                    continue;
                };
                if sa.row != sb.row {
                    continue;
                }
                let (ma, mb) = spair_terms(&a.leading_term().unwrap(), &b.leading_term().unwrap());
                let s = a.mul_term(&ma).sub(b.mul_term(&mb));
                if !rem(&s, system).is_zero() {
                    return false;
                }
            }
        }
        true
    }

    /// Sort a basis descending by leading signature.
    pub fn sort_reduced(system: &mut [V]) {
        system.sort_by(|a, b| {
            match (a.signature(), b.signature()) {
                (Some(sa), Some(sb)) => sb.cmp::<O>(&sa),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        });
    }
}

impl<R, E, O, V> GroebnerBasis<R, E, O, V>
where
    R: EuclideanDomain + Send + Sync,
    R::Element: Send + Sync,
    E: Exponent,
    O: MonomialOrder,
    V: VectorLike<R, E, O> + Send + Sync,
{
    /// Construct a Gröbner basis for the ideal or submodule generated by
    /// `gens`.
    pub fn new(gens: &[V], options: &GroebnerOptions) -> Result<Self, GroebnerError> {
        Ok(Self::from_system(groebner_basis(gens, options)?))
    }
}

impl<R, E, O, V> GroebnerBasis<R, E, O, V>
where
    R: Field,
    E: Exponent,
    O: MonomialOrder,
    V: VectorLike<R, E, O>,
{
    /// The minimal, fully inter-reduced, monic form of the basis, sorted
    /// descending by leading signature.
    pub fn reduce_basis(self) -> Self {
        let n = self.system.len();
        let mut keep = vec![true; n];
        'l1: for i in 0..n {
            let Some(si) = self.system[i].signature() else {
                keep[i] = false;
                continue;
            };
            for j in 0..n {
                if i == j || !keep[j] {
                    continue;
                }
                let Some(sj) = self.system[j].signature() else {
                    continue;
                };
                if sj.row == si.row && monomial_divides(&sj.exponents, &si.exponents) {
                    keep[i] = false;
                    continue 'l1;
                }
            }
        }

        let mut survivors: Vec<V> = self
            .system
            .into_iter()
            .zip(keep)
            .filter_map(|(v, k)| k.then_some(v))
            .collect();

        let mut reduced = vec![];
        for i in 0..survivors.len() {
            survivors.swap(0, i);
            let h = rem(&survivors[0], &survivors[1..]);
            if h.is_zero() {
                continue;
            }
            let ring = h.ring().clone();
            let inv = ring.inv(&h.leading_term().unwrap().coefficient);
            let nvars = h.nvars();
            reduced.push(h.mul_term(&Term::new(
                inv,
                smallvec::smallvec![E::zero(); nvars],
                ring,
            )));
        }

        Self::sort_reduced(&mut reduced);
        Self::from_system(reduced)
    }
}

#[cfg(test)]
mod test {
    use crate::domains::rational::{Rational, Q};
    use crate::poly::GrevLexOrder;

    use super::*;

    type QPoly = MultivariatePolynomial<crate::domains::rational::RationalField, u16, GrevLexOrder>;

    fn qpoly(nvars: usize, terms: Vec<(i64, Vec<u16>)>) -> QPoly {
        MultivariatePolynomial::from_terms(
            &Q,
            nvars,
            terms
                .into_iter()
                .map(|(c, e)| (Rational::from(c), e))
                .collect(),
        )
    }

    #[test]
    fn pair_queue_orders_by_degree() {
        let mut q = PairQueue::new();
        q.push(0, 1, 7);
        q.push(2, 0, 3);
        q.push(1, 2, 5);
        assert!(q.contains(1, 0));

        assert_eq!(q.pop(|_| true), Some((0, 2)));
        assert_eq!(q.pop(|_| true), Some((1, 2)));
        assert!(!q.contains(2, 1));
        assert_eq!(q.pop(|ix| ix != 1), None);
    }

    #[test]
    fn pair_queue_dedups() {
        let mut q = PairQueue::new();
        q.push(0, 1, 2);
        q.push(1, 0, 2);
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn product_criterion_saves_pairs() {
        // the S-polynomials of a monomial ideal all reduce to zero, and at
        // least the last pair is discarded by the criterion
        let gens = [
            qpoly(3, vec![(1, vec![1, 1, 0])]),
            qpoly(3, vec![(1, vec![1, 0, 1])]),
            qpoly(3, vec![(1, vec![0, 1, 1])]),
        ];
        let out = buchberger(&gens, &GroebnerOptions::default(), false).unwrap();
        assert_eq!(out.basis.len(), 3);
        assert!(out.stats.saved >= 1);
        assert_eq!(out.stats.loops, 3);
    }

    #[test]
    fn max_degree_caps_pairs() {
        let gens = [
            qpoly(2, vec![(1, vec![2, 0]), (-1, vec![0, 1])]),
            qpoly(2, vec![(1, vec![3, 0]), (-1, vec![1, 0])]),
        ];
        let options = GroebnerOptions {
            max_degree: Some(0),
            ..Default::default()
        };
        // no pair survives the cap, so the basis is the inter-reduced input
        let out = buchberger(&gens, &options, false).unwrap();
        assert_eq!(out.basis.len(), 2);
        assert_eq!(out.stats.loops, 0);
    }

    #[test]
    fn cancellation() {
        let cancel = Arc::new(AtomicBool::new(true));
        let gens = [
            qpoly(2, vec![(1, vec![2, 0]), (-1, vec![0, 1])]),
            qpoly(2, vec![(1, vec![3, 0]), (-1, vec![1, 0])]),
        ];
        let options = GroebnerOptions {
            cancel: Some(cancel),
            ..Default::default()
        };
        assert_eq!(
            buchberger(&gens, &options, false).unwrap_err(),
            GroebnerError::Cancelled
        );
    }

    #[test]
    fn progress_callback_runs() {
        let count = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let c = count.clone();
        let gens = [
            qpoly(2, vec![(1, vec![2, 0]), (-1, vec![0, 1])]),
            qpoly(2, vec![(1, vec![3, 0]), (-1, vec![1, 0])]),
        ];
        let options = GroebnerOptions {
            progress: Some(Arc::new(move |_, _, _| {
                c.fetch_add(1, AtomicOrdering::Relaxed);
            })),
            ..Default::default()
        };
        buchberger(&gens, &options, false).unwrap();
        assert!(count.load(AtomicOrdering::Relaxed) > 0);
    }
}
