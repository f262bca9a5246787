// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Continuous (linear interpolation) percentile exposed to SQL as the
//! ordered-set aggregate `percentile_cont(value, fraction)`.

use rusqlite::functions::{Aggregate, Context};

/// Percentile of an ascending slice, interpolating between the two order
/// statistics around rank `fraction * (n - 1)`. `None` for an empty slice.
pub fn continuous_percentile(sorted: &[i64], fraction: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = fraction.clamp(0.0, 1.0) * last as f64;
    let lower = rank.floor() as usize;
    let upper = (rank.ceil() as usize).min(last);
    let low = sorted[lower] as f64;
    let high = sorted[upper] as f64;
    Some(low + (high - low) * (rank - lower as f64))
}

#[derive(Default)]
pub struct Samples {
    values: Vec<i64>,
    fraction: Option<f64>,
}

pub struct PercentileCont;

impl Aggregate<Samples, Option<f64>> for PercentileCont {
    fn init(&self, _: &mut Context<'_>) -> rusqlite::Result<Samples> {
        Ok(Samples::default())
    }

    fn step(&self, ctx: &mut Context<'_>, acc: &mut Samples) -> rusqlite::Result<()> {
        let fraction: f64 = ctx.get(1)?;
        if !(0.0..=1.0).contains(&fraction) {
            return Err(rusqlite::Error::UserFunctionError(
                format!("percentile fraction {fraction} is outside [0, 1]").into(),
            ));
        }
        acc.fraction = Some(fraction);
        // NULL inputs are ignored, as with the built-in aggregates
        if let Some(value) = ctx.get::<Option<i64>>(0)? {
            acc.values.push(value);
        }
        Ok(())
    }

    fn finalize(&self, _: &mut Context<'_>, acc: Option<Samples>) -> rusqlite::Result<Option<f64>> {
        let Some(mut acc) = acc else {
            return Ok(None);
        };
        let Some(fraction) = acc.fraction else {
            return Ok(None);
        };
        acc.values.sort_unstable();
        Ok(continuous_percentile(&acc.values, fraction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_between_order_statistics() {
        let values = [100, 200, 300, 400];
        assert_eq!(continuous_percentile(&values, 0.5), Some(250.0));
        let p90 = continuous_percentile(&values, 0.9).unwrap();
        assert!((p90 - 370.0).abs() < 1e-9);
        assert_eq!(continuous_percentile(&values, 0.0), Some(100.0));
        assert_eq!(continuous_percentile(&values, 1.0), Some(400.0));
    }

    #[test]
    fn single_and_empty_inputs() {
        assert_eq!(continuous_percentile(&[1_000], 0.9), Some(1_000.0));
        assert_eq!(continuous_percentile(&[], 0.5), None);
    }

    #[test]
    fn median_of_odd_count_is_middle_value() {
        assert_eq!(continuous_percentile(&[-500, 10, 20_000], 0.5), Some(10.0));
    }
}
