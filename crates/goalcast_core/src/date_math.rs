//! Whole-month date arithmetic for the projection grid.
//!
//! The engine works on a monthly lattice: every point lives at a (year, month)
//! cell and carries a `"YYYY-MM"` key. Doing the arithmetic on a flat month
//! index avoids `jiff::Span` allocation and normalisation in the hot
//! projection loops.

use jiff::civil::Date;

/// Add `n` calendar months to a (year, month) cell.
#[inline]
pub fn add_months(year: i16, month: i8, n: i32) -> (i16, i8) {
    let total = i32::from(year) * 12 + i32::from(month) - 1 + n;
    (
        total.div_euclid(12) as i16,
        (total.rem_euclid(12) + 1) as i8,
    )
}

/// Number of months from cell `(y1, m1)` to cell `(y2, m2)` (positive when
/// the second cell is later).
#[inline]
pub fn months_between(y1: i16, m1: i8, y2: i16, m2: i8) -> i32 {
    (i32::from(y2) - i32::from(y1)) * 12 + (i32::from(m2) - i32::from(m1))
}

/// Canonical `"YYYY-MM"` key for a month cell.
#[inline]
pub fn month_key(year: i16, month: i8) -> String {
    format!("{year:04}-{month:02}")
}

/// Month cell of a civil date.
#[inline]
pub fn month_cell(date: Date) -> (i16, i8) {
    (date.year(), date.month())
}

/// Flat month index (months since year 0) — a monotonic numeric time axis
/// for sampling geometry.
#[inline]
pub fn month_index(year: i16, month: i8) -> i32 {
    i32::from(year) * 12 + i32::from(month) - 1
}
