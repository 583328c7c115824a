//! Byte comparison.

use aws_lc_rs::constant_time;

/// Compares two byte slices in time independent of their contents.
///
/// Slices of different length compare unequal.
#[must_use]
pub fn bytes_equal(a: &[u8], b: &[u8]) -> bool {
    constant_time::verify_slices_are_equal(a, b).is_ok()
}
