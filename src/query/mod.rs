// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod predicate;
pub mod request;
pub mod sort;

pub use predicate::{Fragment, ItemFilter, Predicate};
pub use request::{AnalyticsRange, AnalyticsRequest, ListRequest};
pub use sort::{Direction, Sort, SortColumn};
