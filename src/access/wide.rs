//! Formats with channels wider than 8 bits (`a2b10g10r10`, `x2b10g10r10`).
//!
//! These are native at 16 bits per channel. Narrow fetch decodes wide and
//! keeps the high byte of each channel, so it loses precision; narrow store
//! widens each pixel first and goes through the wide encoder.

use super::{Binding, FormatInfo, SENTINEL, Surface, SurfaceMut, fetch_each, fetch_raw, store_raw};
use crate::channel::{contract_one, expand_one, replicate};
use crate::error::AccessError;
use crate::format::{Channel, Format, Layout};

pub(super) const fn info<B: Binding>(format: Format) -> FormatInfo {
    FormatInfo {
        format,
        fetch_scanline_32: fetch_scanline_32::<B>,
        fetch_scanline_64: fetch_scanline_64::<B>,
        fetch_pixels_32: fetch_pixels_32::<B>,
        fetch_pixels_64: fetch_pixels_64::<B>,
        store_scanline_32: Some(store_scanline_32::<B>),
        store_scanline_64: Some(store_scanline_64::<B>),
    }
}

/// Decode a raw value to a wide canonical pixel. Absent alpha is opaque.
#[inline(always)]
pub(crate) fn decode_wide(layout: Layout, raw: u32) -> u64 {
    let a = if layout.a.is_present() {
        widen16(layout.a, raw)
    } else {
        0xFFFF
    };
    a << 48 | widen16(layout.r, raw) << 32 | widen16(layout.g, raw) << 16 | widen16(layout.b, raw)
}

/// Encode a wide canonical pixel, keeping the top bits of each channel.
#[inline(always)]
pub(crate) fn encode_wide(layout: Layout, argb64: u64) -> u32 {
    narrow16(layout.a, argb64 >> 48)
        | narrow16(layout.r, argb64 >> 32)
        | narrow16(layout.g, argb64 >> 16)
        | narrow16(layout.b, argb64)
}

#[inline(always)]
fn widen16(c: Channel, raw: u32) -> u64 {
    replicate(c.extract(raw), c.width as u32, 16) as u64
}

#[inline(always)]
fn narrow16(c: Channel, c16: u64) -> u32 {
    if !c.is_present() {
        return 0;
    }
    c.place(((c16 & 0xFFFF) >> (16 - c.width as u32)) as u32)
}

fn fetch_scanline_64<B: Binding>(s: &Surface<'_>, x: u32, y: u32, out: &mut [u64]) {
    let mem = B::memory(s.fns);
    let layout = s.geom.format.layout();
    let row = s.geom.row_byte(y);
    let x = x as usize;
    for (i, px) in out.iter_mut().enumerate() {
        *px = decode_wide(layout, fetch_raw::<_, 32>(&mem, s.bytes, row, x + i));
    }
}

fn fetch_scanline_32<B: Binding>(s: &Surface<'_>, x: u32, y: u32, out: &mut [u32]) {
    let mem = B::memory(s.fns);
    let layout = s.geom.format.layout();
    let row = s.geom.row_byte(y);
    let x = x as usize;
    for (i, px) in out.iter_mut().enumerate() {
        *px = contract_one(decode_wide(layout, fetch_raw::<_, 32>(&mem, s.bytes, row, x + i)));
    }
}

fn fetch_pixels_32<B: Binding>(s: &Surface<'_>, buf: &mut [u32]) {
    let mem = B::memory(s.fns);
    let layout = s.geom.format.layout();
    fetch_each(buf, |x, y| {
        let raw = fetch_raw::<_, 32>(&mem, s.bytes, s.geom.row_byte(y), x as usize);
        contract_one(decode_wide(layout, raw))
    });
}

fn fetch_pixels_64<B: Binding>(s: &Surface<'_>, buf: &mut [u64]) {
    let mem = B::memory(s.fns);
    let layout = s.geom.format.layout();
    for i in 0..buf.len() {
        let lanes = bytemuck::cast_slice::<u64, u32>(buf);
        let (x, y) = (lanes[2 * i], lanes[2 * i + 1]);
        buf[i] = if x == SENTINEL || y == SENTINEL {
            0
        } else {
            decode_wide(layout, fetch_raw::<_, 32>(&mem, s.bytes, s.geom.row_byte(y), x as usize))
        };
    }
}

fn store_scanline_64<B: Binding>(
    s: &mut SurfaceMut<'_>,
    x: u32,
    y: u32,
    values: &[u64],
) -> Result<(), AccessError> {
    let mem = B::memory(s.fns);
    let layout = s.geom.format.layout();
    let row = s.geom.row_byte(y);
    let x = x as usize;
    for (i, &v) in values.iter().enumerate() {
        store_raw::<_, 32>(&mem, s.bytes, row, x + i, encode_wide(layout, v));
    }
    Ok(())
}

fn store_scanline_32<B: Binding>(s: &mut SurfaceMut<'_>, x: u32, y: u32, values: &[u32]) {
    let mem = B::memory(s.fns);
    let format = s.geom.format;
    let layout = format.layout();
    let row = s.geom.row_byte(y);
    let x = x as usize;
    for (i, &v) in values.iter().enumerate() {
        store_raw::<_, 32>(&mem, s.bytes, row, x + i, encode_wide(layout, expand_one(v, format)));
    }
}
