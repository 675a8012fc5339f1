//! Count normalization with Lidstone (add-γ) smoothing.

use crate::error::{HmmError, Result};

/// Maximum deviation from 1.0 tolerated for a probability row.
pub const ROW_SUM_TOLERANCE: f64 = 1e-9;

/// Normalizes a row of counts into probabilities with add-`gamma` smoothing.
///
/// `p[i] = (counts[i] + gamma) / (total + gamma * counts.len())`
///
/// With `gamma == 0` this is the plain relative frequency. A row whose
/// smoothed denominator is zero (no observations and no smoothing mass)
/// becomes uniform, so every row stays a proper distribution.
#[must_use]
pub fn lidstone(counts: &[u64], gamma: f64) -> Vec<f64> {
    let bins = counts.len();
    if bins == 0 {
        return Vec::new();
    }

    let total: u64 = counts.iter().sum();
    let denom = total as f64 + gamma * bins as f64;
    if denom <= 0.0 {
        return vec![1.0 / bins as f64; bins];
    }

    counts
        .iter()
        .map(|&c| (c as f64 + gamma) / denom)
        .collect()
}

/// Sum of a probability row.
#[must_use]
pub fn row_sum(row: &[f64]) -> f64 {
    row.iter().sum()
}

/// Checks that `row` is a distribution summing to one within [`ROW_SUM_TOLERANCE`].
///
/// # Errors
///
/// Returns `HmmError::NumericDegeneracy` naming `table` and `index`.
pub fn check_row(table: &'static str, index: usize, row: &[f64]) -> Result<()> {
    let sum = row_sum(row);
    if (sum - 1.0).abs() > ROW_SUM_TOLERANCE || !sum.is_finite() {
        return Err(HmmError::NumericDegeneracy {
            table,
            row: index,
            sum,
        });
    }
    Ok(())
}

/// Checks every `width`-sized row of a row-major table.
pub fn check_table(table: &'static str, values: &[f64], width: usize) -> Result<()> {
    if width == 0 {
        return Ok(());
    }
    for (i, row) in values.chunks(width).enumerate() {
        check_row(table, i, row)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_gamma_is_relative_frequency() {
        let p = lidstone(&[2, 1, 1], 0.0);
        assert_eq!(p, vec![0.5, 0.25, 0.25]);
    }

    #[test]
    fn smoothing_reserves_mass_for_unseen() {
        let p = lidstone(&[3, 0, 0, 1], 0.1);
        assert!(p.iter().all(|&x| x > 0.0));
        assert!((row_sum(&p) - 1.0).abs() < ROW_SUM_TOLERANCE);
        assert!((p[1] - 0.1 / 4.4).abs() < 1e-12);
    }

    #[test]
    fn empty_row_without_smoothing_is_uniform() {
        let p = lidstone(&[0, 0, 0, 0], 0.0);
        assert_eq!(p, vec![0.25; 4]);
    }

    #[test]
    fn empty_bins() {
        assert!(lidstone(&[], 1.0).is_empty());
    }

    #[test]
    fn check_row_flags_bad_sum() {
        assert!(check_row("initial", 0, &[0.5, 0.5]).is_ok());
        match check_row("transition", 2, &[0.5, 0.6]) {
            Err(HmmError::NumericDegeneracy { table, row, .. }) => {
                assert_eq!(table, "transition");
                assert_eq!(row, 2);
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(check_row("initial", 0, &[f64::NAN, 1.0]).is_err());
    }

    #[test]
    fn check_table_reports_row_index() {
        let table = [0.5, 0.5, 0.2, 0.2];
        match check_table("emission", &table, 2) {
            Err(HmmError::NumericDegeneracy { row, .. }) => assert_eq!(row, 1),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
