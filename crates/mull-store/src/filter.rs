//! Compiles CLI-style relay filters into a parameterised SQL predicate.
//!
//! `country` and `city` are overloaded: a 2-letter country or 3-letter city
//! binds to the code column with an exact match, anything else to a
//! case-insensitive "contains" match on the name column. The remaining
//! filters are exact, case-insensitive equality. Values only ever travel as
//! bound parameters; column names come from [`Column`].

use mull_shared::RelayError;
use rusqlite::types::Value;

use crate::models::Column;

/// Optional criteria for `mull query`. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFilter {
    pub country: Option<String>,
    pub city: Option<String>,
    pub provider: Option<String>,
    pub active: Option<bool>,
    pub owned: Option<bool>,
    pub daita: Option<bool>,
}

/// How a clause compares its column with the bound value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// `col COLLATE NOCASE = ?`
    Exact,
    /// `col LIKE ? ESCAPE '\'` with the value wrapped in `%...%`.
    Contains,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub column: Column,
    pub kind: MatchKind,
    pub value: Value,
}

impl Clause {
    fn exact(column: Column, value: Value) -> Self {
        Self {
            column,
            kind: MatchKind::Exact,
            value,
        }
    }

    fn contains(column: Column, needle: &str) -> Self {
        Self {
            column,
            kind: MatchKind::Contains,
            value: Value::Text(format!("%{}%", escape_like(needle))),
        }
    }

    fn sql(&self) -> String {
        match self.kind {
            MatchKind::Exact => format!("{} COLLATE NOCASE = ?", self.column.name()),
            MatchKind::Contains => format!("{} LIKE ? ESCAPE '\\'", self.column.name()),
        }
    }
}

/// Clauses joined with `AND`, plus their positional values.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFilter {
    clauses: Vec<Clause>,
}

impl CompiledFilter {
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Predicate text for a `WHERE` clause.
    pub fn predicate(&self) -> String {
        self.clauses
            .iter()
            .map(Clause::sql)
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    /// Values in the same order as the `?` placeholders.
    pub fn params(&self) -> Vec<Value> {
        self.clauses.iter().map(|c| c.value.clone()).collect()
    }
}

/// Compile `filter`. Fails with `EmptyQuery` when nothing was given.
pub fn compile(filter: &QueryFilter) -> Result<CompiledFilter, RelayError> {
    let mut clauses = Vec::new();

    if let Some(country) = present(&filter.country) {
        clauses.push(if country.chars().count() == 2 {
            Clause::exact(Column::CountryCode, Value::Text(country.to_string()))
        } else {
            Clause::contains(Column::CountryName, country)
        });
    }

    if let Some(city) = present(&filter.city) {
        clauses.push(if city.chars().count() == 3 {
            Clause::exact(Column::CityCode, Value::Text(city.to_string()))
        } else {
            Clause::contains(Column::CityName, city)
        });
    }

    if let Some(provider) = present(&filter.provider) {
        clauses.push(Clause::exact(
            Column::Provider,
            Value::Text(provider.to_string()),
        ));
    }

    for (column, flag) in [
        (Column::Active, filter.active),
        (Column::Owned, filter.owned),
        (Column::Daita, filter.daita),
    ] {
        if let Some(flag) = flag {
            clauses.push(Clause::exact(column, Value::Integer(i64::from(flag))));
        }
    }

    if clauses.is_empty() {
        return Err(RelayError::EmptyQuery);
    }
    Ok(CompiledFilter { clauses })
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only(filter: QueryFilter) -> Clause {
        let compiled = compile(&filter).unwrap();
        assert_eq!(compiled.clauses().len(), 1);
        compiled.clauses()[0].clone()
    }

    #[test]
    fn two_letter_country_is_code() {
        let c = only(QueryFilter {
            country: Some("us".into()),
            ..Default::default()
        });
        assert_eq!(c.column, Column::CountryCode);
        assert_eq!(c.kind, MatchKind::Exact);
        assert_eq!(c.value, Value::Text("us".into()));
    }

    #[test]
    fn longer_country_is_partial_name() {
        let c = only(QueryFilter {
            country: Some("united".into()),
            ..Default::default()
        });
        assert_eq!(c.column, Column::CountryName);
        assert_eq!(c.kind, MatchKind::Contains);
        assert_eq!(c.value, Value::Text("%united%".into()));
    }

    #[test]
    fn city_code_versus_name() {
        let code = only(QueryFilter {
            city: Some("arn".into()),
            ..Default::default()
        });
        assert_eq!(code.column, Column::CityCode);
        assert_eq!(code.kind, MatchKind::Exact);

        let name = only(QueryFilter {
            city: Some("pa".into()),
            ..Default::default()
        });
        assert_eq!(name.column, Column::CityName);
        assert_eq!(name.kind, MatchKind::Contains);

        let name = only(QueryFilter {
            city: Some("paris".into()),
            ..Default::default()
        });
        assert_eq!(name.column, Column::CityName);
    }

    #[test]
    fn flags_bind_integers() {
        let compiled = compile(&QueryFilter {
            active: Some(true),
            owned: Some(false),
            daita: Some(true),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            compiled.params(),
            vec![Value::Integer(1), Value::Integer(0), Value::Integer(1)]
        );
        assert_eq!(
            compiled.predicate(),
            "active COLLATE NOCASE = ? AND owned COLLATE NOCASE = ? AND daita COLLATE NOCASE = ?"
        );
    }

    #[test]
    fn values_never_reach_sql_text() {
        let hostile = "x' OR 1=1 --";
        let compiled = compile(&QueryFilter {
            country: Some(hostile.into()),
            provider: Some(hostile.into()),
            ..Default::default()
        })
        .unwrap();
        assert!(!compiled.predicate().contains("OR 1=1"));
        assert_eq!(
            compiled.predicate(),
            "country_name LIKE ? ESCAPE '\\' AND provider COLLATE NOCASE = ?"
        );
        assert_eq!(compiled.params().len(), 2);
    }

    #[test]
    fn empty_criteria_rejected() {
        assert_eq!(compile(&QueryFilter::default()), Err(RelayError::EmptyQuery));
        assert_eq!(
            compile(&QueryFilter {
                country: Some("  ".into()),
                ..Default::default()
            }),
            Err(RelayError::EmptyQuery)
        );
    }

    #[test]
    fn like_metacharacters_escaped() {
        assert_eq!(escape_like(r"50%_a\b"), r"50\%\_a\\b");
    }
}
