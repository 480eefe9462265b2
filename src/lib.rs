//! Idealica computes Gröbner bases of polynomial ideals and of submodules of
//! free modules over multivariate polynomial rings.
//!
//! It provides
//! - Abstractions over rings, Euclidean domains and fields, with arbitrary-precision
//!   integers, rationals, Gaussian integers and prime fields built in
//! - Multivariate polynomials and free-module vectors, sorted under a pluggable
//!   monomial order (graded reverse lexicographic and lexicographic)
//! - Multivariate division with remainder and quotients ([`rem`], [`divrem`])
//! - A Buchberger engine with pair scheduling, the product criterion and an
//!   optional transformation matrix mapping the basis back to the inputs
//! - A thread-parallel engine variant and a syzygy computation
//!
//! # Example
//! Compute a Gröbner basis over the rationals:
//!
//! ```rust
//! use idealica::domains::rational::Q;
//! use idealica::poly::groebner::{groebner_basis, GroebnerOptions};
//! use idealica::poly::polynomial::MultivariatePolynomial;
//! use idealica::poly::GrevLexOrder;
//! use idealica::rem;
//!
//! // x^2 - y and x^3 - x in Q[x, y]
//! let f1: MultivariatePolynomial<_, u16, GrevLexOrder> = MultivariatePolynomial::from_terms(
//!     &Q,
//!     2,
//!     vec![(1.into(), vec![2, 0]), ((-1).into(), vec![0, 1])],
//! );
//! let f2 = f1.from_terms_like(vec![(1.into(), vec![3, 0]), ((-1).into(), vec![1, 0])]);
//!
//! let basis = groebner_basis(&[f1.clone(), f2], &GroebnerOptions::default()).unwrap();
//! assert!(rem(&f1, &basis).is_zero());
//! ```

pub mod domains;
pub mod poly;

pub use poly::groebner::{
    groebner_basis, groebner_transformation, syzygies, Backend, GroebnerBasis, GroebnerError,
    GroebnerOptions,
};
pub use poly::reduce::{divrem, rem, Reduction};
