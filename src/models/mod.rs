//! Request and response records for every RoEx endpoint.

pub mod analysis;
pub mod cleanup;
pub mod common;
pub mod enhance;
pub mod mastering;
pub mod mixing;
pub mod upload;

use crate::errors::{Result, RoexError};

/// Fails with [`RoexError::Validation`] when `value` is outside `lo..=hi`.
pub(crate) fn check_range(name: &str, value: f64, lo: f64, hi: f64, unit: &str) -> Result<()> {
    if (lo..=hi).contains(&value) {
        return Ok(());
    }
    let unit = if unit.is_empty() {
        String::new()
    } else {
        format!(" {unit}")
    };
    Err(RoexError::Validation(format!(
        "{name} must be between {lo:?} and {hi:?}{unit}, got {value:?}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_message_includes_bounds() {
        let err = check_range("EQ gain", 25.0, -20.0, 20.0, "dB").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid input: EQ gain must be between -20.0 and 20.0 dB, got 25.0"
        );
    }

    #[test]
    fn nan_is_out_of_range() {
        assert!(check_range("ratio", f64::NAN, 1.0, 20.0, "").is_err());
    }
}
