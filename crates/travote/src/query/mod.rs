//! Backend-neutral predicates and the equality filters requests can carry.
//!
//! A [`Predicate`] is an AND of typed [`Clause`]s. Values never pass through string
//! formatting: clauses compile straight to polars expressions with literal operands.

mod filter;
mod predicate;

pub use filter::{CountryFilter, PlaceFilter};
pub use predicate::{Clause, Field, Predicate};
