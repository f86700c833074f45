//! User input parsing and validation.
//!
//! Everything a stepper receives has passed through here first. Validation
//! failures are `VizError::InvalidInput` with a message fit for display.

use crate::config::InputLimits;
use crate::error::{VizError, VizResult};

/// Parse a comma- and/or whitespace-separated list of integers.
///
/// # Errors
///
/// Returns `InvalidInput` for non-numeric tokens, an empty list, too many
/// values or values whose magnitude exceeds the limits.
pub fn parse_values(text: &str, limits: &InputLimits) -> VizResult<Vec<i64>> {
    let mut values = Vec::new();
    for token in text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        let value: i64 = token
            .parse()
            .map_err(|_| VizError::invalid_input(format!("'{token}' is not an integer")))?;
        values.push(value);
    }
    validate_values(&values, limits)?;
    Ok(values)
}

/// Check a value array against the limits.
///
/// # Errors
///
/// Returns `InvalidInput` when the array is empty, longer than `max_len`, or
/// holds a value outside `±max_abs_value`.
pub fn validate_values(values: &[i64], limits: &InputLimits) -> VizResult<()> {
    if values.is_empty() {
        return Err(VizError::invalid_input("enter at least one number"));
    }
    if values.len() > limits.max_len {
        return Err(VizError::invalid_input(format!(
            "at most {} numbers are allowed, got {}",
            limits.max_len,
            values.len()
        )));
    }
    for &value in values {
        validate_value(value, limits)?;
    }
    Ok(())
}

/// Check a single value (target, key, inserted element) against the limits.
///
/// # Errors
///
/// Returns `InvalidInput` if `|value| > max_abs_value`.
pub fn validate_value(value: i64, limits: &InputLimits) -> VizResult<()> {
    if value.unsigned_abs() > limits.max_abs_value.unsigned_abs() {
        return Err(VizError::invalid_input(format!(
            "{value} is outside the allowed range ±{}",
            limits.max_abs_value
        )));
    }
    Ok(())
}

/// Require a non-decreasing array (binary search precondition).
///
/// # Errors
///
/// Returns `InvalidInput` naming the first out-of-order position.
pub fn require_sorted(values: &[i64]) -> VizResult<()> {
    if let Some(i) = values.windows(2).position(|w| w[0] > w[1]) {
        return Err(VizError::invalid_input(format!(
            "array must be sorted: {} at index {} is greater than {}",
            values[i],
            i,
            values[i + 1]
        )));
    }
    Ok(())
}

/// Require that every value is non-negative.
///
/// # Errors
///
/// Returns `InvalidInput` naming the first negative value.
pub fn require_non_negative(values: &[i64]) -> VizResult<()> {
    match values.iter().find(|&&v| v < 0) {
        Some(v) => Err(VizError::invalid_input(format!(
            "values must be non-negative, found {v}"
        ))),
        None => Ok(()),
    }
}

/// Parse a square matrix written as JSON, e.g. `[[1,2],[3,4]]`.
///
/// # Errors
///
/// Returns `InvalidInput` for malformed JSON, ragged or non-square rows, an
/// empty matrix, or a side longer than `max_matrix_dim`.
pub fn parse_matrix(text: &str, limits: &InputLimits) -> VizResult<Vec<Vec<i64>>> {
    let rows: Vec<Vec<i64>> = serde_json::from_str(text)
        .map_err(|e| VizError::invalid_input(format!("matrix must be a JSON array of rows: {e}")))?;
    validate_matrix(&rows, limits)?;
    Ok(rows)
}

/// Check that a matrix is non-empty, square and within limits.
///
/// # Errors
///
/// Returns `InvalidInput` describing the first problem found.
pub fn validate_matrix(rows: &[Vec<i64>], limits: &InputLimits) -> VizResult<()> {
    validate_grid(rows, limits)?;
    let n = rows.len();
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n) {
        return Err(VizError::invalid_input(format!(
            "matrix must be square: row {i} has {} entries, expected {n}",
            row.len()
        )));
    }
    Ok(())
}

/// Check that a matrix is non-empty, rectangular and within limits. Rows and
/// columns are each bounded by `max_matrix_dim`.
///
/// # Errors
///
/// Returns `InvalidInput` describing the first problem found.
pub fn validate_grid(rows: &[Vec<i64>], limits: &InputLimits) -> VizResult<()> {
    let Some(first) = rows.first() else {
        return Err(VizError::invalid_input("matrix is empty"));
    };
    let cols = first.len();
    if cols == 0 {
        return Err(VizError::invalid_input("matrix rows are empty"));
    }
    let side = rows.len().max(cols);
    if side > limits.max_matrix_dim {
        return Err(VizError::invalid_input(format!(
            "matrix side {side} exceeds the maximum of {}",
            limits.max_matrix_dim
        )));
    }
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
        return Err(VizError::invalid_input(format!(
            "matrix rows must have equal length: row {i} has {} entries, expected {cols}",
            row.len()
        )));
    }
    for row in rows {
        for &value in row {
            validate_value(value, limits)?;
        }
    }
    Ok(())
}
