// ---------------------------------------------------------------------------
// Per-format accessor routines and the registry that binds them.
//
// Every routine is generic over a `Binding`, which supplies the memory
// strategy (direct slice access or caller-supplied functions). The registry
// instantiates each routine once per binding, giving two immutable tables
// built at compile time. Packed routines are also generic over bits per
// pixel so each instantiation reads its units directly.
// ---------------------------------------------------------------------------

use crate::error::AccessError;
use crate::format::{Channel, Format, FormatKind, Layout};
use crate::memory::{AccessFns, Direct, Indirect, Memory, Width};
use crate::palette::Palette;

mod bridge;
mod indexed;
mod packed;
mod wide;
mod yuv;

pub(crate) use yuv::yv12_plane_offsets;

#[cfg(test)]
mod tests;

/// Coordinate value marking a pixel that should not be fetched.
///
/// A random fetch whose x or y is `SENTINEL` produces 0 for that pixel.
pub const SENTINEL: u32 = 0xFFFF_FFFF;

// ===========================================================================
// Surfaces
// ===========================================================================

/// Where the rows of an image live inside its buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Geometry {
    pub format: Format,
    pub width: u32,
    pub height: u32,
    /// Words from one row to the next. Negative for bottom-up images.
    pub stride: isize,
    /// Word index of row 0.
    pub origin: usize,
}

impl Geometry {
    /// Word index of the start of row `y`.
    #[inline(always)]
    pub fn row_word(&self, y: u32) -> usize {
        (self.origin as isize + y as isize * self.stride) as usize
    }

    /// Byte offset of the start of row `y`.
    #[inline(always)]
    pub fn row_byte(&self, y: u32) -> usize {
        self.row_word(y) * 4
    }
}

/// Read-only view of an image for fetch routines.
pub(crate) struct Surface<'a> {
    pub geom: Geometry,
    pub bytes: &'a [u8],
    pub palette: Option<&'a Palette>,
    pub fns: Option<&'a AccessFns>,
}

/// Writable view of an image for store routines.
pub(crate) struct SurfaceMut<'a> {
    pub geom: Geometry,
    pub bytes: &'a mut [u8],
    pub palette: Option<&'a Palette>,
    pub fns: Option<&'a AccessFns>,
}

impl Surface<'_> {
    #[inline(always)]
    fn palette(&self) -> &Palette {
        self.palette
            .expect("indexed formats are only bound with a palette")
    }
}

// ===========================================================================
// Registry
// ===========================================================================

/// Fetch `out.len()` narrow pixels of row `y`, starting at column `x`.
pub(crate) type FetchScanline32 = fn(&Surface<'_>, u32, u32, &mut [u32]);
/// Fetch `out.len()` wide pixels of row `y`, starting at column `x`.
pub(crate) type FetchScanline64 = fn(&Surface<'_>, u32, u32, &mut [u64]);
/// Random fetch; `buf` holds `(x, y)` pairs and receives `buf.len() / 2`
/// narrow results at its front.
pub(crate) type FetchPixels32 = fn(&Surface<'_>, &mut [u32]);
/// Random fetch; the 32-bit lanes of `buf` hold `(x, y)` pairs and `buf`
/// receives `buf.len()` wide results.
pub(crate) type FetchPixels64 = fn(&Surface<'_>, &mut [u64]);
/// Store `values` into row `y`, starting at column `x`.
pub(crate) type StoreScanline32 = fn(&mut SurfaceMut<'_>, u32, u32, &[u32]);
/// Store wide `values` into row `y`, starting at column `x`.
pub(crate) type StoreScanline64 = fn(&mut SurfaceMut<'_>, u32, u32, &[u64]) -> Result<(), AccessError>;

/// The accessor set of one format under one binding.
#[derive(Clone, Copy)]
pub(crate) struct FormatInfo {
    pub format: Format,
    pub fetch_scanline_32: FetchScanline32,
    pub fetch_scanline_64: FetchScanline64,
    pub fetch_pixels_32: FetchPixels32,
    pub fetch_pixels_64: FetchPixels64,
    /// `None` for fetch-only formats.
    pub store_scanline_32: Option<StoreScanline32>,
    pub store_scanline_64: Option<StoreScanline64>,
}

impl core::fmt::Debug for FormatInfo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FormatInfo")
            .field("format", &self.format)
            .field("writable", &self.store_scanline_32.is_some())
            .finish_non_exhaustive()
    }
}

/// Chooses the memory strategy for a set of accessors.
pub(crate) trait Binding: 'static {
    type Mem<'a>: Memory;

    fn memory(fns: Option<&AccessFns>) -> Self::Mem<'_>;

    /// This binding's registry entry for `format`.
    fn entry(format: Format) -> &'static FormatInfo;
}

pub(crate) struct DirectBinding;
pub(crate) struct IndirectBinding;

impl Binding for DirectBinding {
    type Mem<'a> = Direct;

    #[inline(always)]
    fn memory(_: Option<&AccessFns>) -> Self::Mem<'_> {
        Direct
    }

    fn entry(format: Format) -> &'static FormatInfo {
        &DIRECT[format.index()]
    }
}

impl Binding for IndirectBinding {
    type Mem<'a> = Indirect<'a>;

    #[inline(always)]
    fn memory(fns: Option<&AccessFns>) -> Self::Mem<'_> {
        Indirect::new(fns.expect("indirect accessors are only bound with access functions"))
    }

    fn entry(format: Format) -> &'static FormatInfo {
        &INDIRECT[format.index()]
    }
}

/// Accessors that read the buffer directly.
pub(crate) static DIRECT: [FormatInfo; Format::COUNT] = table::<DirectBinding>();
/// Accessors that route every memory access through [`AccessFns`].
pub(crate) static INDIRECT: [FormatInfo; Format::COUNT] = table::<IndirectBinding>();

/// Look up the accessor set for `format`.
#[inline]
pub(crate) fn accessors(format: Format, indirect: bool) -> &'static FormatInfo {
    if indirect {
        IndirectBinding::entry(format)
    } else {
        DirectBinding::entry(format)
    }
}

const fn table<B: Binding>() -> [FormatInfo; Format::COUNT] {
    let mut table = [info::<B>(Format::A8r8g8b8); Format::COUNT];
    let mut i = 1;
    while i < Format::COUNT {
        table[i] = info::<B>(Format::ALL[i]);
        i += 1;
    }
    table
}

const fn info<B: Binding>(format: Format) -> FormatInfo {
    match format.kind() {
        FormatKind::Argb if format.is_wide() => wide::info::<B>(format),
        FormatKind::Argb => match format.bpp() {
            32 => packed::info::<B, 32>(format),
            24 => packed::info::<B, 24>(format),
            16 => packed::info::<B, 16>(format),
            8 => packed::info::<B, 8>(format),
            4 => packed::info::<B, 4>(format),
            1 => packed::info::<B, 1>(format),
            _ => panic!("no packed accessors for this depth"),
        },
        FormatKind::Color | FormatKind::Gray => match format.bpp() {
            8 => indexed::info::<B, 8>(format),
            4 => indexed::info::<B, 4>(format),
            1 => indexed::info::<B, 1>(format),
            _ => panic!("no indexed accessors for this depth"),
        },
        FormatKind::Yuy2 => yuv::yuy2_info::<B>(format),
        FormatKind::Yv12 => yuv::yv12_info::<B>(format),
    }
}

// ===========================================================================
// Unit access
// ===========================================================================

/// Read the raw value of pixel `x` in the row starting at byte `row`.
///
/// Values are assembled little-endian. 4 bpp pixels share a byte, the even
/// pixel in the low nibble; 1 bpp pixels share a 32-bit word, pixel 0 in
/// its least significant bit.
#[inline(always)]
pub(crate) fn fetch_raw<M: Memory, const BPP: u32>(mem: &M, bytes: &[u8], row: usize, x: usize) -> u32 {
    match BPP {
        32 => mem.read(bytes, row + x * 4, Width::U32),
        24 => {
            let o = row + x * 3;
            mem.read(bytes, o, Width::U8)
                | mem.read(bytes, o + 1, Width::U8) << 8
                | mem.read(bytes, o + 2, Width::U8) << 16
        }
        16 => mem.read(bytes, row + x * 2, Width::U16),
        8 => mem.read(bytes, row + x, Width::U8),
        4 => {
            let byte = mem.read(bytes, row + (x >> 1), Width::U8);
            if x & 1 == 0 { byte & 0xF } else { byte >> 4 }
        }
        1 => {
            let word = mem.read(bytes, row + (x >> 5) * 4, Width::U32);
            (word >> (x & 31)) & 1
        }
        _ => unreachable!(),
    }
}

/// Write the raw value of pixel `x`. Sub-byte depths read, modify and write
/// back their unit, leaving the neighboring pixels alone.
#[inline(always)]
pub(crate) fn store_raw<M: Memory, const BPP: u32>(
    mem: &M,
    bytes: &mut [u8],
    row: usize,
    x: usize,
    value: u32,
) {
    match BPP {
        32 => mem.write(bytes, row + x * 4, Width::U32, value),
        24 => {
            let o = row + x * 3;
            mem.write(bytes, o, Width::U8, value & 0xFF);
            mem.write(bytes, o + 1, Width::U8, (value >> 8) & 0xFF);
            mem.write(bytes, o + 2, Width::U8, (value >> 16) & 0xFF);
        }
        16 => mem.write(bytes, row + x * 2, Width::U16, value & 0xFFFF),
        8 => mem.write(bytes, row + x, Width::U8, value & 0xFF),
        4 => {
            let o = row + (x >> 1);
            let byte = mem.read(bytes, o, Width::U8);
            let byte = if x & 1 == 0 {
                (byte & 0xF0) | (value & 0xF)
            } else {
                (byte & 0x0F) | ((value & 0xF) << 4)
            };
            mem.write(bytes, o, Width::U8, byte);
        }
        1 => {
            let o = row + (x >> 5) * 4;
            let mask = 1u32 << (x & 31);
            let word = mem.read(bytes, o, Width::U32);
            let word = if value & 1 != 0 { word | mask } else { word & !mask };
            mem.write(bytes, o, Width::U32, word);
        }
        _ => unreachable!(),
    }
}

/// Run a random fetch over `(x, y)` pairs, writing result `i` over the
/// front of the buffer. Pairs are consumed before their slot is reused.
#[inline(always)]
pub(crate) fn fetch_each(buf: &mut [u32], mut fetch: impl FnMut(u32, u32) -> u32) {
    for i in 0..buf.len() / 2 {
        let x = buf[2 * i];
        let y = buf[2 * i + 1];
        buf[i] = if x == SENTINEL || y == SENTINEL {
            0
        } else {
            fetch(x, y)
        };
    }
}

// ===========================================================================
// Channel packing
// ===========================================================================

/// Decode a raw direct-color value to a narrow canonical pixel.
#[inline(always)]
pub(crate) fn decode(layout: Layout, raw: u32) -> u32 {
    let a = if layout.a.is_present() {
        widen(layout.a, raw)
    } else {
        0xFF
    };
    a << 24 | widen(layout.r, raw) << 16 | widen(layout.g, raw) << 8 | widen(layout.b, raw)
}

/// Encode a narrow canonical pixel, keeping the top bits of each channel.
/// Channels the format lacks, padding included, are written as zero.
#[inline(always)]
pub(crate) fn encode(layout: Layout, argb: u32) -> u32 {
    narrow(layout.a, argb >> 24)
        | narrow(layout.r, argb >> 16)
        | narrow(layout.g, argb >> 8)
        | narrow(layout.b, argb)
}

#[inline(always)]
fn widen(c: Channel, raw: u32) -> u32 {
    crate::channel::replicate(c.extract(raw), c.width as u32, 8)
}

#[inline(always)]
fn narrow(c: Channel, c8: u32) -> u32 {
    if !c.is_present() {
        return 0;
    }
    c.place((c8 & 0xFF) >> (8 - c.width as u32))
}
