//! Utility functions

/// Saturating addition: overflow yields `u32::MAX`
#[inline]
pub const fn sat_add(x: u32, y: u32) -> u32 {
    match x.checked_add(y) {
        Some(sum) => sum,
        None => u32::MAX,
    }
}

/// Saturating subtraction: underflow yields 0
#[inline]
pub const fn sat_sub(x: u32, y: u32) -> u32 {
    match x.checked_sub(y) {
        Some(diff) => diff,
        None => 0,
    }
}

/// Saturating multiplication: overflow yields `u32::MAX`
#[inline]
pub const fn sat_mul(x: u32, y: u32) -> u32 {
    match x.checked_mul(y) {
        Some(product) => product,
        None => u32::MAX,
    }
}

/// Clamp a `u64` into `u32`, saturating at `u32::MAX`
#[inline]
pub const fn clamp_u32(x: u64) -> u32 {
    if x > u32::MAX as u64 { u32::MAX } else { x as u32 }
}

/// Cut `s` to at most `max_len` bytes without splitting a UTF-8 sequence,
/// never cutting into the first `keep` bytes
pub fn truncate_at_boundary(s: &mut String, max_len: usize, keep: usize) {
    let mut cut = max_len.max(keep);
    if s.len() <= cut {
        return;
    }
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    s.truncate(cut);
}
