//! Palette formats: `c8 g8 x4c4 x4g4 c4 g4 g1`.

use super::{Binding, FormatInfo, Surface, SurfaceMut, bridge, fetch_each, fetch_raw, store_raw};
use crate::format::Format;
use crate::palette::Palette;

pub(super) const fn info<B: Binding, const BPP: u32>(format: Format) -> FormatInfo {
    FormatInfo {
        format,
        fetch_scanline_32: fetch_scanline::<B, BPP>,
        fetch_scanline_64: bridge::fetch_scanline_64::<B>,
        fetch_pixels_32: fetch_pixels::<B, BPP>,
        fetch_pixels_64: bridge::fetch_pixels_64::<B>,
        store_scanline_32: Some(store_scanline::<B, BPP>),
        store_scanline_64: Some(bridge::store_scanline_64::<B>),
    }
}

fn fetch_scanline<B: Binding, const BPP: u32>(s: &Surface<'_>, x: u32, y: u32, out: &mut [u32]) {
    let mem = B::memory(s.fns);
    let palette = s.palette();
    let row = s.geom.row_byte(y);
    let x = x as usize;
    for (i, px) in out.iter_mut().enumerate() {
        *px = palette.entry(fetch_raw::<_, BPP>(&mem, s.bytes, row, x + i));
    }
}

fn fetch_pixels<B: Binding, const BPP: u32>(s: &Surface<'_>, buf: &mut [u32]) {
    let mem = B::memory(s.fns);
    let palette = s.palette();
    fetch_each(buf, |x, y| {
        palette.entry(fetch_raw::<_, BPP>(&mem, s.bytes, s.geom.row_byte(y), x as usize))
    });
}

fn store_scanline<B: Binding, const BPP: u32>(s: &mut SurfaceMut<'_>, x: u32, y: u32, values: &[u32]) {
    let mem = B::memory(s.fns);
    let palette = s.palette.expect("indexed formats are only bound with a palette");
    let row = s.geom.row_byte(y);
    let x = x as usize;
    for (i, &v) in values.iter().enumerate() {
        store_raw::<_, BPP>(&mem, s.bytes, row, x + i, index_of::<BPP>(palette, v));
    }
}

/// A 1 bpp pixel is set when the palette's nearest gray is not entry 0.
#[inline(always)]
fn index_of<const BPP: u32>(palette: &Palette, argb: u32) -> u32 {
    if BPP == 1 {
        (palette.index_luma(argb) != 0) as u32
    } else {
        palette.index_rgb(argb) as u32
    }
}
