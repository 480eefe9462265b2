use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use idealica::domains::finite_field::Zp64;
use idealica::domains::gaussian::{GaussianInteger, GaussianIntegerRing, ZI};
use idealica::domains::integer::{Integer, IntegerRing, Z};
use idealica::domains::rational::{Rational, RationalField, Q};
use idealica::domains::Ring;
use idealica::poly::module::ModuleVector;
use idealica::poly::monomial::monomial_divides;
use idealica::poly::polynomial::MultivariatePolynomial;
use idealica::poly::{GrevLexOrder, LexOrder};
use idealica::{
    divrem, groebner_basis, groebner_transformation, rem, syzygies, GroebnerBasis, GroebnerError,
    GroebnerOptions,
};

type QPoly = MultivariatePolynomial<RationalField, u16, GrevLexOrder>;
type QPolyLex = MultivariatePolynomial<RationalField, u16, LexOrder>;
type ZPoly = MultivariatePolynomial<IntegerRing, u16, GrevLexOrder>;
type GPoly = MultivariatePolynomial<GaussianIntegerRing, u16, GrevLexOrder>;
type FPoly = MultivariatePolynomial<Zp64, u16, GrevLexOrder>;

fn qp(nvars: usize, terms: Vec<(i64, Vec<u16>)>) -> QPoly {
    MultivariatePolynomial::from_terms(
        &Q,
        nvars,
        terms
            .into_iter()
            .map(|(c, e)| (Rational::from(c), e))
            .collect(),
    )
}

fn qp_lex(nvars: usize, terms: Vec<(i64, Vec<u16>)>) -> QPolyLex {
    MultivariatePolynomial::from_terms(
        &Q,
        nvars,
        terms
            .into_iter()
            .map(|(c, e)| (Rational::from(c), e))
            .collect(),
    )
}

fn zp(nvars: usize, terms: Vec<(i64, Vec<u16>)>) -> ZPoly {
    MultivariatePolynomial::from_terms(
        &Z,
        nvars,
        terms
            .into_iter()
            .map(|(c, e)| (Integer::from(c), e))
            .collect(),
    )
}

/// The reduced Gröbner basis of `[x^2 - y, x^3 - x]` in degrevlex.
#[test]
fn textbook_ideal() {
    let f1 = qp(2, vec![(1, vec![2, 0]), (-1, vec![0, 1])]);
    let f2 = qp(2, vec![(1, vec![3, 0]), (-1, vec![1, 0])]);

    let basis = groebner_basis(&[f1.clone(), f2.clone()], &GroebnerOptions::default()).unwrap();
    assert!(GroebnerBasis::is_groebner_basis(&basis));
    assert!(rem(&f1, &basis).is_zero());
    assert!(rem(&f2, &basis).is_zero());

    let reduced = GroebnerBasis::from_system(basis.clone()).reduce_basis().system;
    assert_eq!(
        reduced,
        vec![
            qp(2, vec![(1, vec![2, 0]), (-1, vec![0, 1])]),
            qp(2, vec![(1, vec![1, 1]), (-1, vec![1, 0])]),
            qp(2, vec![(1, vec![0, 2]), (-1, vec![0, 1])]),
        ]
    );

    // rem(x^3, B) = x and rem(y^2 - y, B) = 0
    let x3 = qp(2, vec![(1, vec![3, 0])]);
    assert_eq!(rem(&x3, &basis), qp(2, vec![(1, vec![1, 0])]));
    let y2y = qp(2, vec![(1, vec![0, 2]), (-1, vec![0, 1])]);
    assert!(rem(&y2y, &basis).is_zero());
}

#[test]
fn already_a_basis() {
    let f1 = qp(2, vec![(1, vec![1, 0]), (-1, vec![0, 0])]);
    let f2 = qp(2, vec![(1, vec![0, 1])]);

    let basis = groebner_basis(&[f1.clone(), f2.clone()], &GroebnerOptions::default()).unwrap();
    assert_eq!(basis, vec![f1, f2]);

    // xy - y lies in the ideal
    let f = qp(2, vec![(1, vec![1, 1]), (-1, vec![0, 1])]);
    assert!(rem(&f, &basis).is_zero());
}

/// A linear system in lex order: the basis lead terms are the variables and
/// the transformation matrix reconstructs each basis element.
#[test]
fn linear_system_with_transformation() {
    let gens = [
        qp_lex(3, vec![(1, vec![1, 0, 0]), (1, vec![0, 1, 0]), (1, vec![0, 0, 1]), (-6, vec![0, 0, 0])]),
        qp_lex(3, vec![(1, vec![1, 0, 0]), (2, vec![0, 1, 0]), (3, vec![0, 0, 1]), (-14, vec![0, 0, 0])]),
        qp_lex(3, vec![(1, vec![1, 0, 0]), (3, vec![0, 1, 0]), (6, vec![0, 0, 1]), (-25, vec![0, 0, 0])]),
    ];

    let (basis, matrix) = groebner_transformation(&gens, &GroebnerOptions::default()).unwrap();
    assert_eq!(matrix.len(), basis.len());

    for (b, row) in basis.iter().zip(&matrix) {
        assert_eq!(row.len(), gens.len());
        let mut acc = b.zero();
        for (coeff, gen) in row.iter().zip(&gens) {
            acc = acc.add(coeff.mul(gen));
        }
        assert_eq!(&acc, b);
    }

    // the solution is x = 1, y = 2, z = 3
    let reduced = GroebnerBasis::from_system(basis).reduce_basis().system;
    assert_eq!(
        reduced,
        vec![
            qp_lex(3, vec![(1, vec![1, 0, 0]), (-1, vec![0, 0, 0])]),
            qp_lex(3, vec![(1, vec![0, 1, 0]), (-2, vec![0, 0, 0])]),
            qp_lex(3, vec![(1, vec![0, 0, 1]), (-3, vec![0, 0, 0])]),
        ]
    );
}

/// `x^2 + 1` over the Gaussian integers is its own basis.
#[test]
fn gaussian_integer_univariate() {
    let g: GPoly = MultivariatePolynomial::from_terms(
        &ZI,
        1,
        vec![
            (GaussianInteger::from(1), vec![2]),
            (GaussianInteger::from(1), vec![0]),
        ],
    );

    let basis = groebner_basis(&[g.clone()], &GroebnerOptions::default()).unwrap();
    assert_eq!(basis, vec![g.clone()]);

    let x = g.variable(0);
    assert_eq!(rem(&x, &basis), x);
    assert!(rem(&g, &basis).is_zero());

    // (x - i)(x + i) = x^2 + 1 reduces to zero as well
    let x_minus_i = g.from_terms_like(vec![
        (GaussianInteger::from(1), vec![1]),
        (GaussianInteger::from((0, -1)), vec![0]),
    ]);
    let x_plus_i = g.from_terms_like(vec![
        (GaussianInteger::from(1), vec![1]),
        (GaussianInteger::from((0, 1)), vec![0]),
    ]);
    assert!(rem(&x_minus_i.mul(&x_plus_i), &basis).is_zero());
}

/// Module generators with distinct leading rows have no S-pairs.
#[test]
fn module_row_mismatch() {
    let zero: QPoly = MultivariatePolynomial::new(&Q, 2);
    let g1 = ModuleVector::new(vec![zero.variable(0), zero.zero()]);
    let g2 = ModuleVector::new(vec![zero.zero(), zero.variable(1)]);

    let basis = groebner_basis(&[g1.clone(), g2.clone()], &GroebnerOptions::default()).unwrap();
    assert_eq!(basis, vec![g1, g2]);
}

#[test]
fn module_basis_reduces_members() {
    let zero: QPoly = MultivariatePolynomial::new(&Q, 2);
    let x = zero.variable(0);
    let y = zero.variable(1);

    // (x, y) and (x, x) share the leading row
    let g1 = ModuleVector::new(vec![x.clone(), y.clone()]);
    let g2 = ModuleVector::new(vec![x.clone(), x.clone()]);

    let basis = groebner_basis(&[g1.clone(), g2.clone()], &GroebnerOptions::default()).unwrap();
    assert!(GroebnerBasis::is_groebner_basis(&basis));
    for g in [&g1, &g2] {
        let r = rem(g, &basis);
        assert!(idealica::poly::module::VectorLike::is_zero(&r));
    }
}

#[test]
fn zeros_and_duplicates_are_sanitised() {
    let f = qp(2, vec![(1, vec![1, 1]), (1, vec![0, 0])]);
    let zero = f.zero();

    let basis = groebner_basis(&[zero, f.clone(), f.clone()], &GroebnerOptions::default()).unwrap();
    assert_eq!(basis, vec![f]);
}

#[test]
fn empty_input() {
    let empty: [QPoly; 0] = [];
    assert_eq!(
        groebner_basis(&empty, &GroebnerOptions::default()).unwrap(),
        vec![]
    );
    assert_eq!(
        groebner_transformation(&empty, &GroebnerOptions::default()).unwrap_err(),
        GroebnerError::EmptyInput
    );
}

#[test]
fn divrem_invariant_over_integers() {
    // reductions over ℤ only happen when the coefficient divides
    let two_x = zp(2, vec![(2, vec![1, 0])]);
    let three_y = zp(2, vec![(3, vec![0, 1])]);
    let basis = groebner_basis(&[two_x.clone(), three_y.clone()], &GroebnerOptions::default())
        .unwrap();

    let f = zp(2, vec![(6, vec![1, 1]), (1, vec![1, 0])]);
    let (q, r) = divrem(&f, &basis);
    let mut acc = r.clone();
    for (qi, gi) in q.iter().zip(&basis) {
        acc = acc.add(qi.mul(gi));
    }
    assert_eq!(acc, f);
    assert_eq!(r, zp(2, vec![(1, vec![1, 0])]));
}

#[test]
fn normal_form_is_permutation_invariant() {
    let f1 = qp(2, vec![(1, vec![2, 0]), (-1, vec![0, 1])]);
    let f2 = qp(2, vec![(1, vec![3, 0]), (-1, vec![1, 0])]);
    let basis = groebner_basis(&[f1, f2], &GroebnerOptions::default()).unwrap();

    let f = qp(
        2,
        vec![(1, vec![5, 0]), (1, vec![0, 5]), (1, vec![1, 1]), (7, vec![0, 0])],
    );

    let mut permuted = basis.clone();
    permuted.reverse();
    assert_eq!(rem(&f, &basis), rem(&f, &permuted));

    // idempotence
    let r = rem(&f, &basis);
    assert_eq!(rem(&r, &basis), r);
}

#[test]
fn basis_of_basis_has_same_leading_ideal() {
    let f1 = qp(2, vec![(1, vec![2, 0]), (-1, vec![0, 1])]);
    let f2 = qp(2, vec![(1, vec![3, 0]), (-1, vec![1, 0])]);

    let b1 = groebner_basis(&[f1, f2], &GroebnerOptions::default()).unwrap();
    let b2 = groebner_basis(&b1, &GroebnerOptions::default()).unwrap();

    let r1 = GroebnerBasis::from_system(b1).reduce_basis().system;
    let r2 = GroebnerBasis::from_system(b2).reduce_basis().system;
    assert_eq!(r1, r2);
}

#[test]
fn syzygies_annihilate_the_basis() {
    let f1 = qp(2, vec![(1, vec![2, 0]), (-1, vec![0, 1])]);
    let f2 = qp(2, vec![(1, vec![3, 0]), (-1, vec![1, 0])]);
    let basis = groebner_basis(&[f1, f2], &GroebnerOptions::default()).unwrap();

    let relations = syzygies(&basis).unwrap();
    assert!(!relations.is_empty());
    for row in &relations {
        assert_eq!(row.len(), basis.len());
        let mut acc = basis[0].zero();
        for (coeff, gen) in row.iter().zip(&basis) {
            acc = acc.add(coeff.mul(gen));
        }
        assert!(acc.is_zero());
    }
}

#[test]
fn syzygies_reject_non_basis() {
    let f1 = qp(2, vec![(1, vec![2, 0]), (-1, vec![0, 1])]);
    let f2 = qp(2, vec![(1, vec![3, 0]), (-1, vec![1, 0])]);
    assert_eq!(
        syzygies(&[f1, f2]).unwrap_err(),
        GroebnerError::NotAGroebnerBasis
    );
}

#[test]
fn finite_field_basis() {
    let field = Zp64::new(17);

    let f1: FPoly = MultivariatePolynomial::from_terms(
        &field,
        2,
        vec![(1, vec![2, 0]), (1, vec![0, 1])],
    );
    let f2 = f1.from_terms_like(vec![(1, vec![0, 2]), (1, vec![1, 0])]);

    let basis = groebner_basis(&[f1.clone(), f2.clone()], &GroebnerOptions::default()).unwrap();
    assert!(GroebnerBasis::is_groebner_basis(&basis));
    assert!(rem(&f1, &basis).is_zero());
    assert!(rem(&f2, &basis).is_zero());
}

/// A random polynomial in two variables, with coefficients drawn through
/// the ring's sampler.
fn random_poly(field: &Zp64, rng: &mut StdRng, nterms: usize, max_deg: u16) -> FPoly {
    let terms = (0..nterms)
        .map(|_| {
            let exponents = (0..2).map(|_| rng.gen_range(0..=max_deg)).collect();
            (field.sample(rng, (0, 16)), exponents)
        })
        .collect();
    MultivariatePolynomial::from_terms(field, 2, terms)
}

#[test]
fn random_division_invariant() {
    let field = Zp64::new(17);
    let mut rng = StdRng::seed_from_u64(0x1dea);

    for _ in 0..24 {
        let f = random_poly(&field, &mut rng, 6, 4);
        let gs: Vec<FPoly> = (0..3).map(|_| random_poly(&field, &mut rng, 3, 3)).collect();

        let (q, r) = divrem(&f, &gs);

        // f = r + sum q_i g_i
        let mut acc = r.clone();
        for (qi, gi) in q.iter().zip(&gs) {
            acc = acc.add(qi.mul(gi));
        }
        assert_eq!(acc, f);

        // no monomial of the remainder is divisible by a leading monomial
        for g in gs.iter().filter(|g| !g.is_zero()) {
            for (_, exp) in r.terms() {
                assert!(!monomial_divides(g.max_exp(), exp));
            }
        }

        assert_eq!(rem(&r, &gs), r);
    }
}

#[test]
fn random_ideal_members_reduce_to_zero() {
    let field = Zp64::new(17);
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..12 {
        let gens: Vec<FPoly> = (0..2).map(|_| random_poly(&field, &mut rng, 3, 3)).collect();
        let basis = groebner_basis(&gens, &GroebnerOptions::default()).unwrap();

        // a random element of the ideal
        let mut f = MultivariatePolynomial::new(&field, 2);
        for g in &gens {
            f = f.add(random_poly(&field, &mut rng, 2, 2).mul(g));
        }
        assert!(rem(&f, &basis).is_zero());

        for g in &gens {
            assert!(rem(g, &basis).is_zero());
        }
    }
}

#[test]
fn random_normal_forms_agree_across_divisor_order() {
    let field = Zp64::new(17);
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..8 {
        let gens: Vec<FPoly> = (0..2).map(|_| random_poly(&field, &mut rng, 3, 3)).collect();
        let basis = groebner_basis(&gens, &GroebnerOptions::default()).unwrap();
        if basis.is_empty() {
            continue;
        }

        let f = random_poly(&field, &mut rng, 6, 5);
        let nf = rem(&f, &basis);

        let mut reversed = basis.clone();
        reversed.reverse();
        assert_eq!(rem(&f, &reversed), nf);

        let mut rotated = basis.clone();
        rotated.rotate_left(1);
        assert_eq!(rem(&f, &rotated), nf);

        assert_eq!(rem(&nf, &basis), nf);
    }
}
