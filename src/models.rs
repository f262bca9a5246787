// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::money::Money;
use crate::utils::parse_timestamp;

pub const MIN_CATEGORY_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Income,
    Expense,
}

impl ItemType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(ValidationError::InvalidType(s.to_string())),
        }
    }
}

impl ToSql for ItemType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ItemType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub id: Uuid,
    pub r#type: ItemType,
    pub amount: Money,
    pub date: DateTime<Utc>,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated item waiting for the store to assign its id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub r#type: ItemType,
    pub amount: Money,
    pub date: DateTime<Utc>,
    pub category: String,
}

impl NewItem {
    pub fn from_raw(
        r#type: &str,
        amount: &str,
        date: &str,
        category: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            r#type: r#type.parse()?,
            amount: amount.parse()?,
            date: parse_timestamp("date", date)?.with_timezone(&Utc),
            category: validate_category(category)?,
        })
    }
}

/// Fields to change on an existing item; `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub r#type: Option<ItemType>,
    pub amount: Option<Money>,
    pub date: Option<DateTime<Utc>>,
    pub category: Option<String>,
}

impl ItemPatch {
    pub fn from_raw(
        r#type: Option<&str>,
        amount: Option<&str>,
        date: Option<&str>,
        category: Option<&str>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            r#type: r#type.map(str::parse::<ItemType>).transpose()?,
            amount: amount.map(str::parse::<Money>).transpose()?,
            date: date
                .map(|d| parse_timestamp("date", d).map(|ts| ts.with_timezone(&Utc)))
                .transpose()?,
            category: category.map(validate_category).transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.r#type.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.category.is_none()
    }
}

pub fn validate_category(raw: &str) -> Result<String, ValidationError> {
    let category = raw.trim();
    if category.chars().count() < MIN_CATEGORY_LEN {
        return Err(ValidationError::InvalidCategory {
            value: category.to_string(),
            min: MIN_CATEGORY_LEN,
        });
    }
    Ok(category.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_item_validates_every_field() {
        let item = NewItem::from_raw("Expense", "10.00", "2024-01-01T12:00:00+02:00", " Food ")
            .unwrap();
        assert_eq!(item.r#type, ItemType::Expense);
        assert_eq!(item.amount.minor_units(), 1_000);
        assert_eq!(item.date.to_rfc3339(), "2024-01-01T10:00:00+00:00");
        assert_eq!(item.category, "Food");

        assert!(matches!(
            NewItem::from_raw("gift", "1", "2024-01-01", "Food"),
            Err(ValidationError::InvalidType(_))
        ));
        assert!(matches!(
            NewItem::from_raw("income", "1,5", "2024-01-01", "Food"),
            Err(ValidationError::InvalidAmount(_))
        ));
        assert!(matches!(
            NewItem::from_raw("income", "1", "2024-01-01", "ab"),
            Err(ValidationError::InvalidCategory { .. })
        ));
    }

    #[test]
    fn patch_keeps_absent_fields_absent() {
        let patch = ItemPatch::from_raw(None, None, None, Some("Food")).unwrap();
        assert_eq!(patch.category.as_deref(), Some("Food"));
        assert!(patch.r#type.is_none() && patch.amount.is_none() && patch.date.is_none());
        assert!(ItemPatch::default().is_empty());
    }
}
