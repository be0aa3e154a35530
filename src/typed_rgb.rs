//! Row access using [`rgb`] crate pixel types.
//!
//! Canonical pixels are packed integers; these helpers unpack them into
//! `Rgba<u8>` (narrow) and `Rgba<u16>` (wide) and back.
//!
//! ```rust
//! use packpix::{Format, Image, typed_rgb};
//! use rgb::Rgba;
//!
//! let mut img = Image::new(Format::A4r4g4b4, 2, 1, vec![0u32; 1]).unwrap();
//! typed_rgb::store_rgba8_row(&mut img, 0, 0, &[Rgba::new(255, 0, 136, 255); 2]).unwrap();
//!
//! let mut row = [Rgba::new(0u8, 0, 0, 0); 2];
//! typed_rgb::fetch_rgba8_row(&img, 0, 0, &mut row);
//! assert_eq!(row[1], Rgba::new(255, 0, 136, 255));
//! ```

use rgb::Rgba;

use crate::AccessError;
use crate::image::Image;

/// Pixels staged per call into the underlying row accessors.
const CHUNK: usize = 64;

// ---------------------------------------------------------------------------
// Single pixels
// ---------------------------------------------------------------------------

#[inline]
pub fn argb_to_rgba8(argb: u32) -> Rgba<u8> {
    let [a, r, g, b] = argb.to_be_bytes();
    Rgba::new(r, g, b, a)
}

#[inline]
pub fn rgba8_to_argb(px: Rgba<u8>) -> u32 {
    u32::from_be_bytes([px.a, px.r, px.g, px.b])
}

#[inline]
pub fn argb64_to_rgba16(argb: u64) -> Rgba<u16> {
    Rgba::new((argb >> 32) as u16, (argb >> 16) as u16, argb as u16, (argb >> 48) as u16)
}

#[inline]
pub fn rgba16_to_argb64(px: Rgba<u16>) -> u64 {
    (px.a as u64) << 48 | (px.r as u64) << 32 | (px.g as u64) << 16 | px.b as u64
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// Fetch `out.len()` pixels of row `y` from column `x`.
pub fn fetch_rgba8_row<B: AsRef<[u32]>>(img: &Image<B>, x: u32, y: u32, out: &mut [Rgba<u8>]) {
    let mut stage = [0u32; CHUNK];
    let mut col = x;
    for chunk in out.chunks_mut(CHUNK) {
        let stage = &mut stage[..chunk.len()];
        img.fetch_scanline(col, y, stage);
        for (d, &s) in chunk.iter_mut().zip(stage.iter()) {
            *d = argb_to_rgba8(s);
        }
        col += chunk.len() as u32;
    }
}

/// Fetch `out.len()` pixels of row `y` from column `x` at 16 bits per channel.
pub fn fetch_rgba16_row<B: AsRef<[u32]>>(img: &Image<B>, x: u32, y: u32, out: &mut [Rgba<u16>]) {
    let mut stage = [0u64; CHUNK];
    let mut col = x;
    for chunk in out.chunks_mut(CHUNK) {
        let stage = &mut stage[..chunk.len()];
        img.fetch_scanline_64(col, y, stage);
        for (d, &s) in chunk.iter_mut().zip(stage.iter()) {
            *d = argb64_to_rgba16(s);
        }
        col += chunk.len() as u32;
    }
}

/// Store `pixels` into row `y` from column `x`.
pub fn store_rgba8_row<B: AsRef<[u32]> + AsMut<[u32]>>(
    img: &mut Image<B>,
    x: u32,
    y: u32,
    pixels: &[Rgba<u8>],
) -> Result<(), AccessError> {
    let mut stage = [0u32; CHUNK];
    let mut col = x;
    for chunk in pixels.chunks(CHUNK) {
        let stage = &mut stage[..chunk.len()];
        for (d, &s) in stage.iter_mut().zip(chunk) {
            *d = rgba8_to_argb(s);
        }
        img.store_scanline(col, y, stage)?;
        col += chunk.len() as u32;
    }
    Ok(())
}

/// Store `pixels` into row `y` from column `x` at 16 bits per channel.
pub fn store_rgba16_row<B: AsRef<[u32]> + AsMut<[u32]>>(
    img: &mut Image<B>,
    x: u32,
    y: u32,
    pixels: &[Rgba<u16>],
) -> Result<(), AccessError> {
    let mut stage = [0u64; CHUNK];
    let mut col = x;
    for chunk in pixels.chunks(CHUNK) {
        let stage = &mut stage[..chunk.len()];
        for (d, &s) in stage.iter_mut().zip(chunk) {
            *d = rgba16_to_argb64(s);
        }
        img.store_scanline_64(col, y, stage)?;
        col += chunk.len() as u32;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
