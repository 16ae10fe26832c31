use std::collections::HashMap;

use super::{Clause, Field};

/// Optional equality restriction on places.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PlaceFilter {
    /// Places whose `abbr` (region code) matches.
    ByRegion(String),
    ByCategory(String),
    ById(String),
    /// No equality restriction.
    #[default]
    Any,
}

impl PlaceFilter {
    /// Pick a filter from request parameters. `abbr` wins over `category`, which wins
    /// over `id`. Blank values are ignored.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        if let Some(abbr) = non_blank(params, "abbr") {
            Self::ByRegion(abbr)
        } else if let Some(category) = non_blank(params, "category") {
            Self::ByCategory(category)
        } else if let Some(id) = non_blank(params, "id") {
            Self::ById(id)
        } else {
            Self::Any
        }
    }

    pub fn clause(&self) -> Option<Clause> {
        match self {
            Self::ByRegion(abbr) => Some(Clause::equals(Field::Abbr, abbr.as_str())),
            Self::ByCategory(category) => Some(Clause::equals(Field::Category, category.as_str())),
            Self::ById(id) => Some(Clause::equals(Field::Id, id.as_str())),
            Self::Any => None,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

/// Optional equality restriction on countries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CountryFilter {
    ByAbbr(String),
    ByName(String),
    #[default]
    Any,
}

impl CountryFilter {
    /// `abbr` wins over `name`. Blank values are ignored.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        if let Some(abbr) = non_blank(params, "abbr") {
            Self::ByAbbr(abbr)
        } else if let Some(name) = non_blank(params, "name") {
            Self::ByName(name)
        } else {
            Self::Any
        }
    }

    pub fn clause(&self) -> Option<Clause> {
        match self {
            Self::ByAbbr(abbr) => Some(Clause::equals(Field::Abbr, abbr.as_str())),
            Self::ByName(name) => Some(Clause::equals(Field::Name, name.as_str())),
            Self::Any => None,
        }
    }
}

fn non_blank(params: &HashMap<String, String>, key: &str) -> Option<String> {
    params
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}
