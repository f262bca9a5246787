// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Conjunctive `WHERE` predicates over the `items` table.
//!
//! Clauses are recorded as typed `(column, comparison, value)` triples and
//! only turned into SQL by [`Predicate::render`], which numbers the
//! placeholders from the clause positions. Values never enter the SQL text;
//! columns and operators come from closed enums.

use chrono::{DateTime, Utc};
use rusqlite::ParamsFromIter;
use rusqlite::types::Value;

use crate::db::format_timestamp;
use crate::models::ItemType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Date,
    Type,
    Category,
}

impl Column {
    const fn as_sql(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Type => "type",
            Self::Category => "category",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    AtLeast,
    AtMost,
    Equals,
}

impl Comparison {
    const fn as_sql(self) -> &'static str {
        match self {
            Self::AtLeast => ">=",
            Self::AtMost => "<=",
            Self::Equals => "=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Clause {
    column: Column,
    comparison: Comparison,
    value: Value,
}

/// Optional item filters. Every present field contributes one clause.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub r#type: Option<ItemType>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clauses are appended in the order from, to, type, category.
    pub fn from_filter(filter: &ItemFilter) -> Self {
        let mut predicate = Self::new();
        if let Some(from) = &filter.from {
            predicate.push(Column::Date, Comparison::AtLeast, format_timestamp(from));
        }
        if let Some(to) = &filter.to {
            predicate.push(Column::Date, Comparison::AtMost, format_timestamp(to));
        }
        if let Some(kind) = filter.r#type {
            predicate.push(Column::Type, Comparison::Equals, kind.as_str());
        }
        if let Some(category) = &filter.category {
            predicate.push(Column::Category, Comparison::Equals, category.as_str());
        }
        predicate
    }

    pub fn push(
        &mut self,
        column: Column,
        comparison: Comparison,
        value: impl Into<String>,
    ) -> &mut Self {
        self.clauses.push(Clause {
            column,
            comparison,
            value: Value::Text(value.into()),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// An empty predicate renders to an empty fragment (match everything).
    pub fn render(&self) -> Fragment {
        if self.clauses.is_empty() {
            return Fragment::default();
        }
        let conditions: Vec<String> = self
            .clauses
            .iter()
            .enumerate()
            .map(|(idx, clause)| {
                format!(
                    "{} {} ?{}",
                    clause.column.as_sql(),
                    clause.comparison.as_sql(),
                    idx + 1
                )
            })
            .collect();
        Fragment {
            sql: format!("WHERE {}", conditions.join(" AND ")),
            args: self.clauses.iter().map(|c| c.value.clone()).collect(),
        }
    }
}

/// Rendered predicate: `?N` placeholders in `sql` line up with `args[N - 1]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub sql: String,
    pub args: Vec<Value>,
}

impl Fragment {
    pub fn params(&self) -> ParamsFromIter<std::slice::Iter<'_, Value>> {
        rusqlite::params_from_iter(self.args.iter())
    }
}
