//! Palettes for the indexed formats.
//!
//! Fetch is a table lookup. Store goes the other way through inverse tables
//! of 32768 entries: the 8 and 4 bpp indexed formats key by the 15-bit RGB of
//! the pixel, `g1` keys by a 15-bit luma. Storing is lossy; fetching what was
//! stored returns the palette's nearest entry, not the original color.

use alloc::boxed::Box;
use alloc::vec;

use crate::channel::replicate;
use crate::error::AccessError;

/// Number of palette entries.
pub const PALETTE_LEN: usize = 256;
/// Number of entries in a palette's inverse table.
pub const INVERSE_LEN: usize = 1 << 15;

/// 15-bit RGB key (5 bits per channel) of a canonical pixel.
#[inline(always)]
pub const fn rgb15(argb: u32) -> usize {
    (((argb >> 3) & 0x001F) | ((argb >> 6) & 0x03E0) | ((argb >> 9) & 0x7C00)) as usize
}

/// 15-bit luma key of a canonical pixel, `(153 r + 301 g + 58 b) / 4`.
#[inline(always)]
pub const fn y15(argb: u32) -> usize {
    let r = (argb >> 16) & 0xFF;
    let g = (argb >> 8) & 0xFF;
    let b = argb & 0xFF;
    ((r * 153 + g * 301 + b * 58) >> 2) as usize
}

/// A 256-entry palette with its inverse lookup tables.
#[derive(Clone, PartialEq, Eq)]
pub struct Palette {
    entries: [u32; PALETTE_LEN],
    // keyed by rgb15
    inverse: Box<[u8]>,
    // keyed by y15
    luma: Box<[u8]>,
}

impl Palette {
    /// Build a color palette. The RGB inverse picks the entry nearest in
    /// squared RGB distance. Entries past `entries.len()` are transparent
    /// black and are never chosen.
    pub fn color(entries: &[u32]) -> Self {
        let (table, used) = fill_entries(entries);
        let mut inverse = vec![0u8; INVERSE_LEN].into_boxed_slice();
        if used > 0 {
            for (key, slot) in inverse.iter_mut().enumerate() {
                let (r, g, b) = key_color(key);
                *slot = nearest(&table[..used], |e| {
                    let dr = ((e >> 16) & 0xFF) as i32 - r;
                    let dg = ((e >> 8) & 0xFF) as i32 - g;
                    let db = (e & 0xFF) as i32 - b;
                    (dr * dr + dg * dg + db * db) as u32
                });
            }
        }
        let luma = luma_inverse(&table[..used]);
        Self {
            entries: table,
            inverse,
            luma,
        }
    }

    /// Build a gray palette. Both inverses match by luma, so a colored
    /// pixel stores as the nearest gray level.
    pub fn gray(entries: &[u32]) -> Self {
        let (table, used) = fill_entries(entries);
        let luma = luma_inverse(&table[..used]);
        let mut inverse = vec![0u8; INVERSE_LEN].into_boxed_slice();
        for (key, slot) in inverse.iter_mut().enumerate() {
            let (r, g, b) = key_color(key);
            let argb = ((r as u32) << 16) | ((g as u32) << 8) | b as u32;
            *slot = luma[y15(argb)];
        }
        Self {
            entries: table,
            inverse,
            luma,
        }
    }

    /// Use a caller-built RGB inverse, which must have [`INVERSE_LEN`]
    /// entries. The luma inverse is derived from `entries`.
    pub fn from_parts(entries: [u32; PALETTE_LEN], inverse: Box<[u8]>) -> Result<Self, AccessError> {
        if inverse.len() != INVERSE_LEN {
            return Err(AccessError::PaletteSize {
                expected: INVERSE_LEN,
                actual: inverse.len(),
            });
        }
        let luma = luma_inverse(&entries);
        Ok(Self {
            entries,
            inverse,
            luma,
        })
    }

    pub fn entries(&self) -> &[u32; PALETTE_LEN] {
        &self.entries
    }

    /// Canonical color of `index`.
    #[inline(always)]
    pub fn entry(&self, index: u32) -> u32 {
        self.entries[index as usize & (PALETTE_LEN - 1)]
    }

    /// Palette index for a canonical color, keyed by its 15-bit RGB.
    #[inline(always)]
    pub fn index_rgb(&self, argb: u32) -> u8 {
        self.inverse[rgb15(argb)]
    }

    /// Palette index for a canonical color, keyed by its 15-bit luma.
    #[inline(always)]
    pub fn index_luma(&self, argb: u32) -> u8 {
        self.luma[y15(argb)]
    }
}

impl core::fmt::Debug for Palette {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Palette")
            .field("entries", &&self.entries[..])
            .finish_non_exhaustive()
    }
}

fn fill_entries(entries: &[u32]) -> ([u32; PALETTE_LEN], usize) {
    let used = entries.len().min(PALETTE_LEN);
    let mut table = [0u32; PALETTE_LEN];
    table[..used].copy_from_slice(&entries[..used]);
    (table, used)
}

fn key_color(key: usize) -> (i32, i32, i32) {
    (
        replicate(((key >> 10) & 0x1F) as u32, 5, 8) as i32,
        replicate(((key >> 5) & 0x1F) as u32, 5, 8) as i32,
        replicate((key & 0x1F) as u32, 5, 8) as i32,
    )
}

fn luma_inverse(entries: &[u32]) -> Box<[u8]> {
    let mut luma = vec![0u8; INVERSE_LEN].into_boxed_slice();
    if !entries.is_empty() {
        for (level, slot) in luma.iter_mut().enumerate() {
            *slot = nearest(entries, |e| (y15(e) as i32 - level as i32).unsigned_abs());
        }
    }
    luma
}

fn nearest(entries: &[u32], distance: impl Fn(u32) -> u32) -> u8 {
    let mut best = 0;
    let mut best_distance = u32::MAX;
    for (i, &e) in entries.iter().enumerate() {
        let d = distance(e);
        if d < best_distance {
            best = i;
            best_distance = d;
        }
    }
    best as u8
}
