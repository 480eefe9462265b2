//! The thread-parallel Buchberger engine: a pool of workers over a shared
//! basis guarded by a reader-writer lock, reducing S-polynomials against
//! cloned snapshots so that no lock is held during the expensive division.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Mutex, RwLock};
use std::time::Duration;

use tracing::debug;

use crate::domains::EuclideanDomain;

use super::groebner::{
    enqueue_pair, initialize, product_criterion, spair_terms, BasisState, GroebnerError,
    GroebnerOptions, PairQueue,
};
use super::module::VectorLike;
use super::reduce::{lead_div_rem, reduce_vec, Reduction};
use super::{Exponent, MonomialOrder};

struct Shared<'a, R, E, O, V>
where
    R: EuclideanDomain,
    E: Exponent,
    O: MonomialOrder,
    V: VectorLike<R, E, O>,
{
    /// Elements, leading terms and sort order are one logical object.
    basis: RwLock<BasisState<R, E, O, V>>,
    queue: Mutex<PairQueue>,
    options: &'a GroebnerOptions,
    /// Pairs popped but not yet folded back into the basis; the queue may
    /// only be considered drained when this is zero.
    in_flight: AtomicUsize,
    cancelled: AtomicBool,
    saved: AtomicUsize,
    reductions_to_zero: AtomicUsize,
}

/// Reduce `f` against a snapshot of the basis. `None` means zero.
fn reduce_snapshot<R, E, O, V>(f: &V, snapshot: &[(usize, V)]) -> Option<V>
where
    R: EuclideanDomain,
    E: Exponent,
    O: MonomialOrder,
    V: VectorLike<R, E, O>,
{
    if f.is_zero() {
        return None;
    }
    let refs: Vec<(usize, &V)> = snapshot.iter().map(|(ix, v)| (*ix, v)).collect();
    match reduce_vec(f, &refs, false, None) {
        Reduction::Unchanged => Some(f.clone()),
        Reduction::Reduced(r) => Some(r),
        Reduction::Zero => None,
    }
}

fn worker<R, E, O, V>(shared: &Shared<R, E, O, V>)
where
    R: EuclideanDomain,
    E: Exponent,
    O: MonomialOrder,
    V: VectorLike<R, E, O>,
{
    let mut loops = 0usize;

    loop {
        if shared.options.is_cancelled() {
            shared.cancelled.store(true, AtomicOrdering::Relaxed);
        }
        if shared.cancelled.load(AtomicOrdering::Relaxed) {
            shared.queue.lock().unwrap().clear();
            return;
        }

        // pop a pair; the product criterion is evaluated while the queue
        // and basis are both held, so membership is consistent
        let spoly = {
            let basis = shared.basis.write().unwrap();
            let mut queue = shared.queue.lock().unwrap();
            let mut spoly = None;
            while let Some((i, j)) = queue.pop(|ix| basis.alive(ix)) {
                if product_criterion(&basis, &queue, i, j) {
                    shared.saved.fetch_add(1, AtomicOrdering::Relaxed);
                    continue;
                }
                let a = basis.elements[i].as_ref().unwrap();
                let b = basis.elements[j].as_ref().unwrap();
                let (ma, mb) =
                    spair_terms(&a.leading_term().unwrap(), &b.leading_term().unwrap());
                shared.in_flight.fetch_add(1, AtomicOrdering::SeqCst);
                spoly = Some(a.mul_term(&ma).sub(b.mul_term(&mb)));
                break;
            }
            spoly
        };

        let Some(spoly) = spoly else {
            if shared.in_flight.load(AtomicOrdering::SeqCst) == 0 {
                return;
            }
            // another worker may still append elements and pairs
            std::thread::sleep(Duration::from_micros(200));
            continue;
        };

        let (mut snapshot_len, mut snapshot) = {
            let basis = shared.basis.read().unwrap();
            basis.snapshot()
        };
        let mut current = reduce_snapshot(&spoly, &snapshot);

        loop {
            let mut basis = shared.basis.write().unwrap();

            if let Some(cur) = &current {
                // other workers may have appended elements meanwhile; a
                // lead division against them means the snapshot is stale
                let stale = (snapshot_len..basis.elements.len()).any(|ix| {
                    basis.alive(ix)
                        && lead_div_rem(cur, basis.elements[ix].as_ref().unwrap()).is_some()
                });
                if stale {
                    (snapshot_len, snapshot) = basis.snapshot();
                    drop(basis);
                    let cur = current.take().unwrap();
                    current = reduce_snapshot(&cur, &snapshot);
                    continue;
                }
            }

            match current.take() {
                Some(v) => {
                    let new_ix = basis.insert(v, None);
                    let mut queue = shared.queue.lock().unwrap();
                    let others: Vec<usize> = basis
                        .sort_order
                        .iter()
                        .copied()
                        .filter(|&s| s != new_ix)
                        .collect();
                    for other in others {
                        enqueue_pair(&basis, &mut queue, other, new_ix, shared.options);
                    }
                }
                None => {
                    shared
                        .reductions_to_zero
                        .fetch_add(1, AtomicOrdering::Relaxed);
                }
            }
            break;
        }

        shared.in_flight.fetch_sub(1, AtomicOrdering::SeqCst);

        loops += 1;
        if loops % 1000 == 999 {
            let (basis_size, queue_size) = {
                let basis = shared.basis.read().unwrap();
                let queue = shared.queue.lock().unwrap();
                (basis.live_count(), queue.len())
            };
            debug!(loops, basis_size, queue_size, "parallel Buchberger progress");
            if let Some(cb) = &shared.options.progress {
                cb(loops, basis_size, queue_size);
            }
        }
    }
}

/// The parallel Buchberger driver. Behaves like the sequential engine,
/// except that older basis elements are not inter-reduced against new ones
/// and the result order depends on scheduling.
pub(crate) fn buchberger_parallel<R, E, O, V>(
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
    let Some((state, queue)) = initialize(gens, options, false)? else {
        return Ok(vec![]);
    };

    let shared = Shared {
        basis: RwLock::new(state),
        queue: Mutex::new(queue),
        options,
        in_flight: AtomicUsize::new(0),
        cancelled: AtomicBool::new(false),
        saved: AtomicUsize::new(0),
        reductions_to_zero: AtomicUsize::new(0),
    };

    let threads = options.num_threads();
    debug!(threads, inputs = gens.len(), "starting parallel Buchberger");

    std::thread::scope(|scope| {
        for _ in 0..threads {
            scope.spawn(|| worker(&shared));
        }
    });

    if shared.cancelled.load(AtomicOrdering::Relaxed) {
        return Err(GroebnerError::Cancelled);
    }

    debug!(
        saved = shared.saved.load(AtomicOrdering::Relaxed),
        reductions_to_zero = shared.reductions_to_zero.load(AtomicOrdering::Relaxed),
        "parallel Buchberger done"
    );

    let state = shared.basis.into_inner().unwrap();
    let (basis, _) = state.into_basis();
    Ok(basis)
}

#[cfg(test)]
mod test {
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    use crate::domains::rational::{Rational, Q};
    use crate::poly::groebner::{Backend, GroebnerBasis, GroebnerOptions};
    use crate::poly::polynomial::MultivariatePolynomial;
    use crate::poly::{rem, GrevLexOrder};

    use super::*;

    type QPoly = MultivariatePolynomial<crate::domains::rational::RationalField, u16, GrevLexOrder>;

    fn qpoly(terms: Vec<(i64, Vec<u16>)>) -> QPoly {
        MultivariatePolynomial::from_terms(
            &Q,
            2,
            terms
                .into_iter()
                .map(|(c, e)| (Rational::from(c), e))
                .collect(),
        )
    }

    #[test]
    fn matches_sequential_basis() {
        let gens = [
            qpoly(vec![(1, vec![2, 0]), (-1, vec![0, 1])]),
            qpoly(vec![(1, vec![3, 0]), (-1, vec![1, 0])]),
        ];

        let options = GroebnerOptions {
            backend: Backend::Parallel,
            threads: 4,
            ..Default::default()
        };
        let parallel = buchberger_parallel(&gens, &options).unwrap();

        let sequential =
            crate::poly::groebner::groebner_basis(&gens, &GroebnerOptions::default()).unwrap();

        // both are bases of the same ideal: each side reduces to zero
        // against the other
        for p in &parallel {
            assert!(rem(p, &sequential).is_zero());
        }
        for p in &sequential {
            assert!(rem(p, &parallel).is_zero());
        }
        assert!(GroebnerBasis::is_groebner_basis(&parallel));
    }

    #[test]
    fn cancellation_reports_no_result() {
        let gens = [
            qpoly(vec![(1, vec![2, 0]), (-1, vec![0, 1])]),
            qpoly(vec![(1, vec![3, 0]), (-1, vec![1, 0])]),
        ];
        let options = GroebnerOptions {
            backend: Backend::Parallel,
            threads: 2,
            cancel: Some(Arc::new(AtomicBool::new(true))),
            ..Default::default()
        };
        assert_eq!(
            buchberger_parallel(&gens, &options).unwrap_err(),
            GroebnerError::Cancelled
        );
    }
}
