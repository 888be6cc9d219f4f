//! Bounds-checked byte range extraction.

use crate::ExtractError;

/// Borrow `length` bytes starting at `offset`.
///
/// Fails with [`ExtractError::OutOfBounds`] when the range reaches past the
/// end of `buffer` (or `offset + length` overflows).
pub fn slice(buffer: &[u8], offset: usize, length: usize) -> Result<&[u8], ExtractError> {
    let out_of_bounds = || ExtractError::OutOfBounds {
        offset,
        length,
        available: buffer.len(),
    };
    let end = offset.checked_add(length).ok_or_else(out_of_bounds)?;
    buffer.get(offset..end).ok_or_else(out_of_bounds)
}

/// Copy `length` bytes starting at `offset` out of `buffer`.
///
/// Used both to pull a compressed region out of a container image and to
/// split a decompressed blob into individual ROM files.
pub fn cut(buffer: &[u8], offset: usize, length: usize) -> Result<Vec<u8>, ExtractError> {
    slice(buffer, offset, length).map(<[u8]>::to_vec)
}

#[cfg(test)]
#[path = "tests/region_tests.rs"]
mod tests;
