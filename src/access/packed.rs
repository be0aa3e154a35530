//! Direct-color formats of up to 8 bits per channel.
//!
//! One routine per operation covers every layout: the raw unit is read at
//! the format's depth and each channel is replicated to 8 bits.

use super::{Binding, FormatInfo, Surface, SurfaceMut, bridge, decode, encode, fetch_each, fetch_raw, store_raw};
use crate::format::Format;

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
    let layout = s.geom.format.layout();
    let row = s.geom.row_byte(y);
    let x = x as usize;
    for (i, px) in out.iter_mut().enumerate() {
        *px = decode(layout, fetch_raw::<_, BPP>(&mem, s.bytes, row, x + i));
    }
}

fn fetch_pixels<B: Binding, const BPP: u32>(s: &Surface<'_>, buf: &mut [u32]) {
    let mem = B::memory(s.fns);
    let layout = s.geom.format.layout();
    fetch_each(buf, |x, y| {
        decode(layout, fetch_raw::<_, BPP>(&mem, s.bytes, s.geom.row_byte(y), x as usize))
    });
}

fn store_scanline<B: Binding, const BPP: u32>(s: &mut SurfaceMut<'_>, x: u32, y: u32, values: &[u32]) {
    let mem = B::memory(s.fns);
    let layout = s.geom.format.layout();
    let row = s.geom.row_byte(y);
    let x = x as usize;
    for (i, &v) in values.iter().enumerate() {
        store_raw::<_, BPP>(&mem, s.bytes, row, x + i, encode(layout, v));
    }
}
