//! Input checks shared by the facades

use niaga_core::{NiagaError, NiagaResult, Rupiah};

/// Largest unit count accepted for stock and cart quantities
pub(crate) const MAX_UNITS: i64 = 1_000_000_000;

/// Trimmed value of a required text field
pub(crate) fn required(field: &str, value: &str) -> NiagaResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(NiagaError::invalid_input(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn positive_amount(field: &str, amount: Rupiah) -> NiagaResult<()> {
    if !amount.is_positive() {
        return Err(NiagaError::invalid_input(format!(
            "{} must be greater than zero",
            field
        )));
    }
    amount_in_range(field, amount)
}

pub(crate) fn non_negative_amount(field: &str, amount: Rupiah) -> NiagaResult<()> {
    if amount.is_negative() {
        return Err(NiagaError::invalid_input(format!("{} cannot be negative", field)));
    }
    amount_in_range(field, amount)
}

fn amount_in_range(field: &str, amount: Rupiah) -> NiagaResult<()> {
    if amount > Rupiah::MAX_INPUT {
        return Err(NiagaError::invalid_input(format!(
            "{} cannot exceed {}",
            field,
            Rupiah::MAX_INPUT
        )));
    }
    Ok(())
}

pub(crate) fn non_negative_count(field: &str, count: i64) -> NiagaResult<()> {
    if count < 0 {
        return Err(NiagaError::invalid_input(format!("{} cannot be negative", field)));
    }
    count_in_range(field, count)
}

pub(crate) fn count_in_range(field: &str, count: i64) -> NiagaResult<()> {
    if count > MAX_UNITS {
        return Err(NiagaError::invalid_input(format!(
            "{} cannot exceed {} units",
            field, MAX_UNITS
        )));
    }
    Ok(())
}

/// Finite and strictly positive
pub(crate) fn positive_quantity(field: &str, quantity: f64) -> NiagaResult<()> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err(NiagaError::invalid_input(format!(
            "{} must be greater than zero",
            field
        )));
    }
    Ok(())
}

/// Within `0..=100`
pub(crate) fn percentage(field: &str, value: f64) -> NiagaResult<()> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(NiagaError::invalid_input(format!(
            "{} must be between 0 and 100",
            field
        )));
    }
    Ok(())
}

/// Case-insensitive substring match; an empty needle matches everything
pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}
