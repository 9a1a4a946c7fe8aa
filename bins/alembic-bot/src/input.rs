//! Parsing numeric chat input.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputFormatError {
    #[error("expected {expected} number(s) separated by spaces, got {got}")]
    WrongCount { expected: usize, got: usize },
    #[error("'{0}' is not a number")]
    NotANumber(String),
}

/// Parse exactly `N` whitespace-separated numbers. A comma is accepted as
/// the decimal separator.
pub fn parse_numbers<const N: usize>(text: &str) -> Result<[f64; N], InputFormatError> {
    let normalized = text.replace(',', ".");
    let tokens: Vec<&str> = normalized.split_whitespace().collect();
    if tokens.len() != N {
        return Err(InputFormatError::WrongCount {
            expected: N,
            got: tokens.len(),
        });
    }

    let mut values = [0.0; N];
    for (slot, token) in values.iter_mut().zip(&tokens) {
        *slot = token
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| InputFormatError::NotANumber(token.to_string()))?;
    }
    Ok(values)
}
