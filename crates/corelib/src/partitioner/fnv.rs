//! 32-bit FNV hashing.
//!
//! Starting from `FNV_BASIS`, every octet of the key is folded in with
//! `hash = (hash ^ octet) * FNV_PRIME`.
//! Identifiers computed from this hash may already be persisted, so the
//! arithmetic must stay bit-for-bit compatible: 32-bit wrapping multiply,
//! result reinterpreted as a signed 32-bit value.

/// FNV offset basis.
pub const FNV_BASIS: u32 = 0x811c_9dc5;

/// FNV prime, `(1 << 24) + 0x193`.
pub const FNV_PRIME: u32 = (1 << 24) + 0x193;

/// Hashes `key` into a signed 32-bit value.
///
/// The low 32 bits of a 64-bit accumulator depend only on the low 32 bits of
/// its operands, so wrapping `u32` arithmetic gives the same narrowed result.
#[inline]
pub fn fnv_hash(key: &[u8]) -> i32 {
    let hash = key.iter().fold(FNV_BASIS, |hash, &byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    });
    hash as i32
}

/// Absolute value that stays total on `i32::MIN`.
///
/// `i32::MIN` has no positive counterpart; it maps to `i32::MAX`.
#[inline]
pub fn saturating_abs(value: i32) -> i32 {
    if value == i32::MIN {
        i32::MAX
    } else {
        value.abs()
    }
}
