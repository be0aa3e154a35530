//! YCbCr formats. Both are fetch-only.
//!
//! Conversion is BT.601 studio range in 16.16 fixed point; results are
//! clamped to a byte and alpha is opaque.

use super::{Binding, FormatInfo, Geometry, Surface, bridge, fetch_each};
use crate::format::Format;
use crate::memory::{Memory, Width};

pub(super) const fn yuy2_info<B: Binding>(format: Format) -> FormatInfo {
    FormatInfo {
        format,
        fetch_scanline_32: yuy2_fetch_scanline::<B>,
        fetch_scanline_64: bridge::fetch_scanline_64::<B>,
        fetch_pixels_32: yuy2_fetch_pixels::<B>,
        fetch_pixels_64: bridge::fetch_pixels_64::<B>,
        store_scanline_32: None,
        store_scanline_64: None,
    }
}

pub(super) const fn yv12_info<B: Binding>(format: Format) -> FormatInfo {
    FormatInfo {
        format,
        fetch_scanline_32: yv12_fetch_scanline::<B>,
        fetch_scanline_64: bridge::fetch_scanline_64::<B>,
        fetch_pixels_32: yv12_fetch_pixels::<B>,
        fetch_pixels_64: bridge::fetch_pixels_64::<B>,
        store_scanline_32: None,
        store_scanline_64: None,
    }
}

/// Convert one sample, with `y`, `u` and `v` already offset to zero.
#[inline(always)]
pub(crate) fn ycbcr_to_argb(y: i32, u: i32, v: i32) -> u32 {
    let r = 0x012b27 * y + 0x019a2e * v;
    let g = 0x012b27 * y - 0x00d0f2 * v - 0x00647e * u;
    let b = 0x012b27 * y + 0x0206a2 * u;
    0xFF00_0000 | top_byte(r) << 16 | top_byte(g) << 8 | top_byte(b)
}

#[inline(always)]
fn top_byte(c: i32) -> u32 {
    if c < 0 {
        0
    } else if c >= 0x100_0000 {
        0xFF
    } else {
        (c >> 16) as u32
    }
}

// ---------------------------------------------------------------------------
// YUY2: bytes Y0 U Y1 V, two pixels sharing one chroma pair
// ---------------------------------------------------------------------------

#[inline(always)]
fn yuy2_pixel<M: Memory>(mem: &M, bytes: &[u8], row: usize, x: usize) -> u32 {
    let pair = row + ((x << 1) & !3);
    let y = mem.read(bytes, row + (x << 1), Width::U8) as i32 - 16;
    let u = mem.read(bytes, pair + 1, Width::U8) as i32 - 128;
    let v = mem.read(bytes, pair + 3, Width::U8) as i32 - 128;
    ycbcr_to_argb(y, u, v)
}

fn yuy2_fetch_scanline<B: Binding>(s: &Surface<'_>, x: u32, y: u32, out: &mut [u32]) {
    let mem = B::memory(s.fns);
    let row = s.geom.row_byte(y);
    let x = x as usize;
    for (i, px) in out.iter_mut().enumerate() {
        *px = yuy2_pixel(&mem, s.bytes, row, x + i);
    }
}

fn yuy2_fetch_pixels<B: Binding>(s: &Surface<'_>, buf: &mut [u32]) {
    let mem = B::memory(s.fns);
    fetch_each(buf, |x, y| yuy2_pixel(&mem, s.bytes, s.geom.row_byte(y), x as usize));
}

// ---------------------------------------------------------------------------
// YV12: Y plane, then V and U planes at half resolution in both directions
// ---------------------------------------------------------------------------

/// Byte offsets of the Y, U and V rows that hold image row `line`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Yv12Rows {
    pub y: usize,
    pub u: usize,
    pub v: usize,
}

/// Word offsets of the V and U planes relative to row 0.
///
/// With a negative stride row 0 is the last row of the Y plane in memory,
/// and the chroma planes follow the first row.
pub(crate) const fn yv12_plane_offsets(stride: isize, height: u32) -> (isize, isize) {
    let h = height as isize;
    if stride < 0 {
        let v = ((-stride) >> 1) * ((h - 1) >> 1) - stride;
        let u = v + ((-stride) >> 1) * (h >> 1);
        (v, u)
    } else {
        let v = stride * h;
        (v, v + (v >> 2))
    }
}

#[inline(always)]
pub(crate) fn yv12_rows(geom: &Geometry, line: u32) -> Yv12Rows {
    let (v_plane, u_plane) = yv12_plane_offsets(geom.stride, geom.height);
    let origin = geom.origin as isize;
    let chroma = (geom.stride >> 1) * (line as isize >> 1);
    Yv12Rows {
        y: geom.row_byte(line),
        u: ((origin + u_plane + chroma) * 4) as usize,
        v: ((origin + v_plane + chroma) * 4) as usize,
    }
}

#[inline(always)]
fn yv12_pixel<M: Memory>(mem: &M, bytes: &[u8], rows: Yv12Rows, x: usize) -> u32 {
    let y = mem.read(bytes, rows.y + x, Width::U8) as i32 - 16;
    let u = mem.read(bytes, rows.u + (x >> 1), Width::U8) as i32 - 128;
    let v = mem.read(bytes, rows.v + (x >> 1), Width::U8) as i32 - 128;
    ycbcr_to_argb(y, u, v)
}

fn yv12_fetch_scanline<B: Binding>(s: &Surface<'_>, x: u32, y: u32, out: &mut [u32]) {
    let mem = B::memory(s.fns);
    let rows = yv12_rows(&s.geom, y);
    let x = x as usize;
    for (i, px) in out.iter_mut().enumerate() {
        *px = yv12_pixel(&mem, s.bytes, rows, x + i);
    }
}

fn yv12_fetch_pixels<B: Binding>(s: &Surface<'_>, buf: &mut [u32]) {
    let mem = B::memory(s.fns);
    fetch_each(buf, |x, y| yv12_pixel(&mem, s.bytes, yv12_rows(&s.geom, y), x as usize));
}
