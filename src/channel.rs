//! Channel scaling between the narrow (8 bpc) and wide (16 bpc) canonical
//! pixels.
//!
//! Widening never zero-pads: an N-bit value is left-aligned and its low bits
//! are filled by repeating its high bits, so full scale maps to full scale
//! (`0xFF` → `0xFFFF`, `0x1F` in five bits → `0xFF`). Narrowing truncates.

use crate::format::Format;

/// Replicate an unsigned `from`-bit value to `to` bits.
///
/// ```
/// use packpix::channel::replicate;
/// assert_eq!(replicate(0x1F, 5, 8), 0xFF);
/// assert_eq!(replicate(0b10, 2, 8), 0b1010_1010);
/// assert_eq!(replicate(0x3FF, 10, 16), 0xFFFF);
/// assert_eq!(replicate(1, 1, 16), 0xFFFF);
/// ```
#[inline(always)]
pub const fn replicate(value: u32, from: u32, to: u32) -> u32 {
    if from == 0 {
        return 0;
    }
    if from >= to {
        return value >> (from - to);
    }
    let mut out = value << (to - from);
    let mut filled = from;
    while filled < to {
        out |= out >> filled;
        filled *= 2;
    }
    out
}

/// Widen one narrow canonical pixel, given the significant bits of each
/// channel (`[a, r, g, b]`, see [`Format::channel_bits`]).
#[inline(always)]
pub const fn expand_with(argb: u32, bits: [u8; 4]) -> u64 {
    let a = widen_channel(argb >> 24, bits[0], 0xFFFF);
    let r = widen_channel(argb >> 16, bits[1], 0);
    let g = widen_channel(argb >> 8, bits[2], 0);
    let b = widen_channel(argb, bits[3], 0);
    (a << 48) | (r << 32) | (g << 16) | b
}

#[inline(always)]
const fn widen_channel(c8: u32, bits: u8, absent: u64) -> u64 {
    if bits == 0 {
        return absent;
    }
    let bits = bits as u32;
    let field = (c8 & 0xFF) >> (8 - bits);
    replicate(field, bits, 16) as u64
}

/// Widen one narrow canonical pixel of `format`.
#[inline]
pub const fn expand_one(argb: u32, format: Format) -> u64 {
    expand_with(argb, format.channel_bits())
}

/// Narrow one wide canonical pixel by keeping the high byte of each channel.
#[inline(always)]
pub const fn contract_one(argb64: u64) -> u32 {
    (((argb64 >> 56) & 0xFF) << 24
        | ((argb64 >> 40) & 0xFF) << 16
        | ((argb64 >> 24) & 0xFF) << 8
        | ((argb64 >> 8) & 0xFF)) as u32
}

/// Widen `src` into `dst` (`min(len)` pixels).
pub fn expand(dst: &mut [u64], src: &[u32], format: Format) {
    let bits = format.channel_bits();
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = expand_with(s, bits);
    }
}

/// Widen `n` narrow pixels stored in the first `n` 32-bit lanes of `buf`.
///
/// Walks from the end: wide slot `i` overlaps lanes `2i` and `2i + 1`, which
/// are never below `i`, so every narrow value is read before it is overwritten.
pub fn expand_in_place(buf: &mut [u64], n: usize, format: Format) {
    let bits = format.channel_bits();
    for i in (0..n).rev() {
        let narrow = bytemuck::cast_slice::<u64, u32>(buf)[i];
        buf[i] = expand_with(narrow, bits);
    }
}

/// Narrow `src` into `dst` (`min(len)` pixels).
pub fn contract(dst: &mut [u32], src: &[u64]) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = contract_one(s);
    }
}
