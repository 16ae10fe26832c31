use std::fmt;

use polars::prelude::*;

use crate::geo::NormalizedRange;

/// Columns a clause may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Abbr,
    Name,
    Category,
    Lat,
    Long,
}

impl Field {
    pub fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Abbr => "abbr",
            Self::Name => "name",
            Self::Category => "category",
            Self::Lat => "lat",
            Self::Long => "long",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// `field == value`
    Equals { field: Field, value: String },
    /// `low <= field <= high`
    Range(NormalizedRange),
    /// Either range matches. Both ranges are expected to be on the same field.
    Either(NormalizedRange, NormalizedRange),
}

impl Clause {
    pub fn equals(field: Field, value: impl Into<String>) -> Self {
        Self::Equals {
            field,
            value: value.into(),
        }
    }

    pub fn to_expr(&self) -> Expr {
        match self {
            Self::Equals { field, value } => col(field.column()).eq(lit(value.clone())),
            Self::Range(range) => range_expr(range),
            Self::Either(first, second) => range_expr(first).or(range_expr(second)),
        }
    }
}

fn range_expr(range: &NormalizedRange) -> Expr {
    let column = range.field().column();
    col(column)
        .gt_eq(lit(range.low()))
        .and(col(column).lt_eq(lit(range.high())))
}

/// Conjunction of clauses. An empty predicate matches every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn and(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn and_maybe(self, clause: Option<Clause>) -> Self {
        match clause {
            Some(clause) => self.and(clause),
            None => self,
        }
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn into_clauses(self) -> Vec<Clause> {
        self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn to_expr(&self) -> Expr {
        self.clauses
            .iter()
            .map(Clause::to_expr)
            .reduce(|acc, e| acc.and(e))
            .unwrap_or_else(|| lit(true))
    }
}

impl From<Clause> for Predicate {
    fn from(clause: Clause) -> Self {
        Self::all().and(clause)
    }
}
