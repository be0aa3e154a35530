//! Wide access for formats whose channels fit in 8 bits.
//!
//! Scanline fetch decodes narrow into the caller's buffer, viewed as 32-bit
//! lanes, then widens in place. Store narrows into a temporary row and hands it to
//! the format's narrow store.

use alloc::vec::Vec;

use super::{Binding, SENTINEL, Surface, SurfaceMut};
use crate::channel;
use crate::error::AccessError;

pub(super) fn fetch_scanline_64<B: Binding>(s: &Surface<'_>, x: u32, y: u32, out: &mut [u64]) {
    let n = out.len();
    let fetch = B::entry(s.geom.format).fetch_scanline_32;
    fetch(s, x, y, &mut bytemuck::cast_slice_mut::<u64, u32>(out)[..n]);
    channel::expand_in_place(out, n, s.geom.format);
}

/// The coordinate pairs sit in the 32-bit lanes of `buf`. Each pair is
/// consumed before its slot receives the widened result, and a sentinel
/// pair stays 0 rather than widening to opaque black.
pub(super) fn fetch_pixels_64<B: Binding>(s: &Surface<'_>, buf: &mut [u64]) {
    let fetch = B::entry(s.geom.format).fetch_pixels_32;
    let bits = s.geom.format.channel_bits();
    for i in 0..buf.len() {
        let lanes = bytemuck::cast_slice::<u64, u32>(buf);
        let mut pair = [lanes[2 * i], lanes[2 * i + 1]];
        buf[i] = if pair.contains(&SENTINEL) {
            0
        } else {
            fetch(s, &mut pair);
            channel::expand_with(pair[0], bits)
        };
    }
}

pub(super) fn store_scanline_64<B: Binding>(
    s: &mut SurfaceMut<'_>,
    x: u32,
    y: u32,
    values: &[u64],
) -> Result<(), AccessError> {
    let Some(store) = B::entry(s.geom.format).store_scanline_32 else {
        return Err(AccessError::ReadOnlyFormat(s.geom.format));
    };
    let narrow = contract_row(values)?;
    store(s, x, y, &narrow);
    Ok(())
}

/// Narrow a row into a fresh buffer, reporting allocation failure instead of
/// aborting.
fn contract_row(values: &[u64]) -> Result<Vec<u32>, AccessError> {
    let mut narrow = Vec::new();
    if narrow.try_reserve_exact(values.len()).is_err() {
        log::warn!("wide store of {} pixels: staging allocation failed", values.len());
        return Err(AccessError::OutOfMemory {
            pixels: values.len(),
        });
    }
    narrow.resize(values.len(), 0);
    channel::contract(&mut narrow, values);
    Ok(narrow)
}
