// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    Date,
    Amount,
    Category,
}

impl SortColumn {
    const fn as_sql(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Amount => "amount",
            Self::Category => "category",
        }
    }

    fn lookup(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "date" => Some(Self::Date),
            "amount" => Some(Self::Amount),
            "category" => Some(Self::Category),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Asc,
    #[default]
    Desc,
}

impl Direction {
    const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    fn lookup(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sort {
    pub column: SortColumn,
    pub direction: Direction,
}

impl Sort {
    /// Unknown keys or directions fall back to the defaults (`date`,
    /// `desc`) instead of failing.
    pub fn resolve(sort_by: Option<&str>, sort_order: Option<&str>) -> Self {
        Self {
            column: sort_by.and_then(SortColumn::lookup).unwrap_or_default(),
            direction: sort_order.and_then(Direction::lookup).unwrap_or_default(),
        }
    }

    /// Insertion order (`rowid`) breaks ties so equal keys list stably.
    pub fn order_clause(&self) -> String {
        let dir = self.direction.as_sql();
        format!("ORDER BY {} {dir}, rowid {dir}", self.column.as_sql())
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column.as_sql(), self.direction.as_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_date_desc() {
        assert_eq!(
            Sort::resolve(None, None),
            Sort {
                column: SortColumn::Date,
                direction: Direction::Desc
            }
        );
    }

    #[test]
    fn bogus_values_fall_back_softly() {
        let sort = Sort::resolve(Some("bogus"), Some("BOGUS"));
        assert_eq!(sort.column, SortColumn::Date);
        assert_eq!(sort.direction, Direction::Desc);
    }

    #[test]
    fn allow_listed_values_are_case_insensitive() {
        let sort = Sort::resolve(Some("Amount"), Some("ASC"));
        assert_eq!(sort.order_clause(), "ORDER BY amount ASC, rowid ASC");
        let sort = Sort::resolve(Some("category"), Some("asc"));
        assert_eq!(sort.to_string(), "category ASC");
    }

    #[test]
    fn caller_text_never_reaches_order_clause() {
        let sort = Sort::resolve(Some("amount; DROP TABLE items"), Some("asc --"));
        assert_eq!(sort.order_clause(), "ORDER BY date DESC, rowid DESC");
    }
}
