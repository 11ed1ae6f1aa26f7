//! Reference-number formatting.

/// Placeholder shown when a movement has no reference number.
pub const MISSING_REFERENCE: &str = "---";

/// Formats an optional reference number for display.
///
/// Present numbers are zero-padded to three digits (wider numbers are kept
/// whole); absent ones render as [`MISSING_REFERENCE`].
#[must_use]
pub fn format_reference(reference_number: Option<i32>) -> String {
    match reference_number {
        Some(number) => format!("{number:03}"),
        None => MISSING_REFERENCE.to_string(),
    }
}
