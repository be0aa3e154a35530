extern crate alloc;
use super::*;
use crate::palette::Palette;
use alloc::{vec, vec::Vec};

// --- Helpers ---

fn row_geom(format: Format, len: usize) -> Geometry {
    Geometry {
        format,
        width: 0,
        height: 1,
        stride: (len / 4) as isize,
        origin: 0,
    }
}

fn fetch_with(
    format: Format,
    bytes: &[u8],
    palette: Option<&Palette>,
    fns: Option<&AccessFns>,
    x: u32,
    n: usize,
) -> Vec<u32> {
    let s = Surface {
        geom: row_geom(format, bytes.len()),
        bytes,
        palette,
        fns,
    };
    let mut out = vec![0u32; n];
    (accessors(format, fns.is_some()).fetch_scanline_32)(&s, x, 0, &mut out);
    out
}

fn fetch(format: Format, bytes: &[u8], n: usize) -> Vec<u32> {
    fetch_with(format, bytes, None, None, 0, n)
}

fn fetch_64(format: Format, bytes: &[u8], palette: Option<&Palette>, n: usize) -> Vec<u64> {
    let s = Surface {
        geom: row_geom(format, bytes.len()),
        bytes,
        palette,
        fns: None,
    };
    let mut out = vec![0u64; n];
    (accessors(format, false).fetch_scanline_64)(&s, 0, 0, &mut out);
    out
}

fn store_with(
    format: Format,
    bytes: &mut [u8],
    palette: Option<&Palette>,
    fns: Option<&AccessFns>,
    x: u32,
    values: &[u32],
) {
    let mut s = SurfaceMut {
        geom: row_geom(format, bytes.len()),
        bytes,
        palette,
        fns,
    };
    let store = accessors(format, fns.is_some())
        .store_scanline_32
        .expect("writable format");
    store(&mut s, x, 0, values);
}

fn store(format: Format, bytes: &mut [u8], x: u32, values: &[u32]) {
    store_with(format, bytes, None, None, x, values)
}

fn store_64(format: Format, bytes: &mut [u8], values: &[u64]) -> Result<(), AccessError> {
    let mut s = SurfaceMut {
        geom: row_geom(format, bytes.len()),
        bytes,
        palette: None,
        fns: None,
    };
    let store = accessors(format, false)
        .store_scanline_64
        .expect("writable format");
    store(&mut s, 0, 0, values)
}

/// Two rows of eight pixels, 32 bytes apart. Leaves room for the chroma
/// planes of `yv12` in a 128-byte buffer.
fn grid<'a>(
    format: Format,
    bytes: &'a [u8],
    palette: Option<&'a Palette>,
    fns: Option<&'a AccessFns>,
) -> Surface<'a> {
    Surface {
        geom: Geometry {
            format,
            width: 8,
            height: 2,
            stride: 8,
            origin: 0,
        },
        bytes,
        palette,
        fns,
    }
}

/// Every 16-bit pattern, one per pixel.
fn all_u16() -> Vec<u8> {
    (0..=u16::MAX).flat_map(u16::to_le_bytes).collect()
}

/// Sixteen 4 bpp pixels holding 0..16 in order.
fn all_u4() -> Vec<u8> {
    (0..8u8).map(|j| (2 * j) | ((2 * j + 1) << 4)).collect()
}

fn used_bits(format: Format) -> u32 {
    let l = format.layout();
    [l.a, l.r, l.g, l.b]
        .iter()
        .filter(|c| c.is_present())
        .fold(0, |m, c| m | (((1u64 << c.width) - 1) << c.shift) as u32)
}

const SAMPLES_32: [u32; 8] = [
    0x1234_5678,
    0x0000_0000,
    0xFFFF_FFFF,
    0x80FF_0001,
    0x7F00_FF80,
    0xDEAD_BEEF,
    0x0102_0304,
    0xC0FF_EE00,
];

// --- Reference decoders, straight-line per format ---

fn e1(v: u32) -> u32 {
    if v & 1 != 0 { 0xFF } else { 0 }
}
fn e2(v: u32) -> u32 {
    (v & 3) * 0x55
}
fn e3(v: u32) -> u32 {
    let v = v & 7;
    (v << 5) | (v << 2) | (v >> 1)
}
fn e4(v: u32) -> u32 {
    (v & 15) * 0x11
}
fn e5(v: u32) -> u32 {
    let v = v & 31;
    (v << 3) | (v >> 2)
}
fn e6(v: u32) -> u32 {
    let v = v & 63;
    (v << 2) | (v >> 4)
}

fn argb(a: u32, r: u32, g: u32, b: u32) -> u32 {
    (a << 24) | (r << 16) | (g << 8) | b
}

fn ref_16(format: Format, p: u32) -> u32 {
    match format {
        Format::R5g6b5 => argb(0xFF, e5(p >> 11), e6(p >> 5), e5(p)),
        Format::B5g6r5 => argb(0xFF, e5(p), e6(p >> 5), e5(p >> 11)),
        Format::A1r5g5b5 => argb(e1(p >> 15), e5(p >> 10), e5(p >> 5), e5(p)),
        Format::X1r5g5b5 => argb(0xFF, e5(p >> 10), e5(p >> 5), e5(p)),
        Format::A1b5g5r5 => argb(e1(p >> 15), e5(p), e5(p >> 5), e5(p >> 10)),
        Format::X1b5g5r5 => argb(0xFF, e5(p), e5(p >> 5), e5(p >> 10)),
        Format::A4r4g4b4 => argb(e4(p >> 12), e4(p >> 8), e4(p >> 4), e4(p)),
        Format::X4r4g4b4 => argb(0xFF, e4(p >> 8), e4(p >> 4), e4(p)),
        Format::A4b4g4r4 => argb(e4(p >> 12), e4(p), e4(p >> 4), e4(p >> 8)),
        Format::X4b4g4r4 => argb(0xFF, e4(p), e4(p >> 4), e4(p >> 8)),
        _ => unreachable!("{format}"),
    }
}

fn ref_8(format: Format, p: u32) -> u32 {
    match format {
        Format::A8 => p << 24,
        Format::R3g3b2 => argb(0xFF, e3(p >> 5), e3(p >> 2), e2(p)),
        Format::B2g3r3 => argb(0xFF, e3(p), e3(p >> 3), e2(p >> 6)),
        Format::A2r2g2b2 => argb(e2(p >> 6), e2(p >> 4), e2(p >> 2), e2(p)),
        Format::A2b2g2r2 => argb(e2(p >> 6), e2(p), e2(p >> 2), e2(p >> 4)),
        Format::X4a4 => e4(p) << 24,
        _ => unreachable!("{format}"),
    }
}

fn ref_4(format: Format, p: u32) -> u32 {
    match format {
        Format::A4 => e4(p) << 24,
        Format::R1g2b1 => argb(0xFF, e1(p >> 3), e2(p >> 1), e1(p)),
        Format::B1g2r1 => argb(0xFF, e1(p), e2(p >> 1), e1(p >> 3)),
        Format::A1r1g1b1 => argb(e1(p >> 3), e1(p >> 2), e1(p >> 1), e1(p)),
        Format::A1b1g1r1 => argb(e1(p >> 3), e1(p), e1(p >> 1), e1(p >> 2)),
        _ => unreachable!("{format}"),
    }
}

fn ref_32(format: Format, p: u32) -> u32 {
    match format {
        Format::A8r8g8b8 => p,
        Format::X8r8g8b8 => 0xFF00_0000 | p,
        Format::A8b8g8r8 => (p & 0xFF00_FF00) | ((p >> 16) & 0xFF) | ((p & 0xFF) << 16),
        Format::X8b8g8r8 => 0xFF00_0000 | ((p >> 16) & 0xFF) | (p & 0xFF00) | ((p & 0xFF) << 16),
        Format::B8g8r8a8 => p.swap_bytes(),
        Format::B8g8r8x8 => 0xFF00_0000 | p.swap_bytes(),
        _ => unreachable!("{format}"),
    }
}

fn ref_store_a2b10g10r10(v: u64) -> u32 {
    (((v >> 32) & 0xc000_0000)
        | ((v >> 38) & 0x3ff)
        | ((v >> 12) & 0xf_fc00)
        | ((v << 14) & 0x3ff0_0000)) as u32
}

fn narrow_direct_formats() -> impl Iterator<Item = Format> {
    Format::ALL
        .iter()
        .copied()
        .filter(|f| f.kind() == FormatKind::Argb && !f.is_wide())
}

// --- Narrow fetch against the references ---

#[test]
fn fetch_16bpp_exhaustive() {
    let bytes = all_u16();
    for &f in Format::ALL.iter().filter(|f| f.bpp() == 16 && f.kind() == FormatKind::Argb) {
        let got = fetch(f, &bytes, 1 << 16);
        for p in 0..(1u32 << 16) {
            assert_eq!(got[p as usize], ref_16(f, p), "{f} raw {p:#06x}");
        }
    }
}

#[test]
fn fetch_8bpp_exhaustive() {
    let bytes: Vec<u8> = (0..=255u8).collect();
    for &f in Format::ALL.iter().filter(|f| f.bpp() == 8 && f.kind() == FormatKind::Argb) {
        let got = fetch(f, &bytes, 256);
        for p in 0..256u32 {
            assert_eq!(got[p as usize], ref_8(f, p), "{f} raw {p:#04x}");
        }
    }
}

#[test]
fn fetch_4bpp_exhaustive() {
    let bytes = all_u4();
    for &f in Format::ALL.iter().filter(|f| f.bpp() == 4 && f.kind() == FormatKind::Argb) {
        let got = fetch(f, &bytes, 16);
        for p in 0..16u32 {
            assert_eq!(got[p as usize], ref_4(f, p), "{f} raw {p:#x}");
        }
    }
}

#[test]
fn fetch_4bpp_even_pixel_is_low_nibble() {
    let got = fetch(Format::A4, &[0xF0, 0x00, 0x00, 0x00], 2);
    assert_eq!(got, [0x0000_0000, 0xFF00_0000]);
}

#[test]
fn fetch_1bpp_is_lsb_first_per_word() {
    // pixel 0 is bit 0 of word 0, pixel 33 is bit 1 of word 1
    let bytes = [0x01, 0x00, 0x00, 0x80, 0x02, 0x00, 0x00, 0x00];
    let got = fetch(Format::A1, &bytes, 64);
    for (x, px) in got.iter().enumerate() {
        let set = matches!(x, 0 | 31 | 33);
        assert_eq!(*px, if set { 0xFF00_0000 } else { 0 }, "pixel {x}");
    }
}

#[test]
fn fetch_32bpp_samples() {
    let bytes: Vec<u8> = SAMPLES_32.iter().flat_map(|p| p.to_le_bytes()).collect();
    for &f in Format::ALL.iter().filter(|f| f.bpp() == 32 && !f.is_wide()) {
        let got = fetch(f, &bytes, SAMPLES_32.len());
        for (i, &p) in SAMPLES_32.iter().enumerate() {
            assert_eq!(got[i], ref_32(f, p), "{f} raw {p:#010x}");
        }
    }
}

#[test]
fn fetch_24bpp_reads_three_bytes() {
    let bytes = [0x33, 0x22, 0x11, 0xCC, 0xBB, 0xAA];
    assert_eq!(fetch(Format::R8g8b8, &bytes, 2), [0xFF11_2233, 0xFFAA_BBCC]);
    assert_eq!(fetch(Format::B8g8r8, &bytes, 2), [0xFF33_2211, 0xFFCC_BBAA]);
}

#[test]
fn fetch_from_offset_column() {
    let bytes: Vec<u8> = SAMPLES_32.iter().flat_map(|p| p.to_le_bytes()).collect();
    let got = fetch_with(Format::A8r8g8b8, &bytes, None, None, 3, 2);
    assert_eq!(got, [SAMPLES_32[3], SAMPLES_32[4]]);
}

#[test]
fn empty_scanline_touches_nothing() {
    assert!(fetch(Format::R5g6b5, &[], 0).is_empty());
    let mut bytes: Vec<u8> = vec![];
    store(Format::R5g6b5, &mut bytes, 0, &[]);
}

// --- Narrow store ---

#[test]
fn store_inverts_fetch_16bpp_exhaustive() {
    let bytes = all_u16();
    for &f in Format::ALL.iter().filter(|f| f.bpp() == 16 && f.kind() == FormatKind::Argb) {
        let fetched = fetch(f, &bytes, 1 << 16);
        let mut out = vec![0u8; bytes.len()];
        store(f, &mut out, 0, &fetched);
        let mask = used_bits(f);
        for (p, got) in out.chunks_exact(2).enumerate() {
            let got = u16::from_le_bytes([got[0], got[1]]) as u32;
            assert_eq!(got, p as u32 & mask, "{f} raw {p:#06x}");
        }
    }
}

#[test]
fn store_inverts_fetch_small_depths() {
    for f in narrow_direct_formats().filter(|f| f.bpp() <= 8) {
        let bytes: Vec<u8> = match f.bpp() {
            8 => (0..=255u8).collect(),
            4 => all_u4(),
            _ => vec![0xA5, 0x0F, 0xF0, 0x3C],
        };
        let n = bytes.len() * 8 / f.bpp() as usize;
        let fetched = fetch(f, &bytes, n);
        let mut out = vec![0u8; bytes.len()];
        store(f, &mut out, 0, &fetched);
        let mask = used_bits(f);
        let expected: Vec<u8> = match f.bpp() {
            8 => bytes.iter().map(|&b| b & mask as u8).collect(),
            4 => bytes.iter().map(|&b| b & ((mask | mask << 4) as u8)).collect(),
            _ => bytes.clone(),
        };
        assert_eq!(out, expected, "{f}");
    }
}

#[test]
fn store_inverts_fetch_32bpp_and_24bpp() {
    let bytes: Vec<u8> = SAMPLES_32.iter().flat_map(|p| p.to_le_bytes()).collect();
    for f in narrow_direct_formats().filter(|f| f.bpp() >= 24) {
        let n = bytes.len() / (f.bpp() as usize / 8);
        let fetched = fetch(f, &bytes, n);
        let mut out = vec![0u8; bytes.len()];
        store(f, &mut out, 0, &fetched);
        if f.bpp() == 24 {
            let used = n * 3;
            assert_eq!(out[..used], bytes[..used], "{f}");
            continue;
        }
        let mask = used_bits(f);
        for (i, got) in out.chunks_exact(4).enumerate() {
            let got = u32::from_le_bytes([got[0], got[1], got[2], got[3]]);
            assert_eq!(got, SAMPLES_32[i] & mask, "{f}");
        }
    }
}

#[test]
fn x_formats_fetch_opaque_and_store_zero_padding() {
    let mut bytes = [0xFFu8; 4];
    store(Format::X8r8g8b8, &mut bytes, 0, &[0xAABB_CCDD]);
    assert_eq!(u32::from_le_bytes(bytes), 0x00BB_CCDD);
    assert_eq!(fetch(Format::X8r8g8b8, &bytes, 1), [0xFFBB_CCDD]);

    for f in narrow_direct_formats().filter(|f| !f.has_alpha()) {
        let bytes = vec![0xFFu8; 8];
        for px in fetch(f, &bytes, 1) {
            assert_eq!(px >> 24, 0xFF, "{f}");
        }
    }
}

#[test]
fn x_formats_store_ignore_alpha() {
    let opaque = Format::ALL
        .iter()
        .copied()
        .filter(|f| f.kind() == FormatKind::Argb && !f.has_alpha());
    for f in opaque {
        for &rgb in &[0x00BB_CCDDu32, 0x0012_3456, 0x00FF_00FF] {
            let mut first = [0u8; 4];
            store(f, &mut first, 0, &[rgb]);
            for alpha in [0x01u32, 0x55, 0xAA, 0xFF] {
                let mut bytes = [0u8; 4];
                store(f, &mut bytes, 0, &[alpha << 24 | rgb]);
                assert_eq!(bytes, first, "{f} rgb {rgb:#08x} alpha {alpha:#04x}");
            }
        }
    }
}

#[test]
fn alpha_only_formats_fetch_black() {
    for f in [Format::A8, Format::X4a4, Format::A4, Format::A1] {
        let bytes = vec![0xFFu8; 4];
        assert_eq!(fetch(f, &bytes, 1), [0xFF00_0000], "{f}");
    }
}

#[test]
fn store_keeps_top_bits() {
    let mut bytes = [0u8; 2];
    // red 0xFF -> 31, green 0x84 -> 33, blue 0x07 -> 0
    store(Format::R5g6b5, &mut bytes, 0, &[0x00FF_8407]);
    assert_eq!(u16::from_le_bytes(bytes), (31 << 11) | (33 << 5));
}

#[test]
fn store_4bpp_leaves_neighbors() {
    let mut bytes = [0xABu8, 0xCD];
    store(Format::A4, &mut bytes, 1, &[0x5000_0000]);
    assert_eq!(bytes, [0x5B, 0xCD]);
    store(Format::A4, &mut bytes, 2, &[0xFFFF_FFFF, 0x0000_0000]);
    assert_eq!(bytes, [0x5B, 0x0F]);
}

#[test]
fn store_1bpp_leaves_neighbors() {
    let mut bytes = [0xFFu8; 8];
    store(Format::A1, &mut bytes, 5, &[0x7FFF_FFFF]);
    assert_eq!(bytes, [0xDF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
    let mut bytes = [0u8; 8];
    store(Format::A1, &mut bytes, 31, &[0x8000_0000, 0x8000_0000]);
    assert_eq!(bytes, [0, 0, 0, 0x80, 0x01, 0, 0, 0]);
}

// --- Indexed ---

fn test_palette() -> Palette {
    // exact 5-bit colors so the inverse maps each entry to itself
    let entries: Vec<u32> = (0..16u32)
        .map(|i| argb(0x80 + i, e5(i), e5(31 - i), e5(i * 2)))
        .collect();
    Palette::color(&entries)
}

#[test]
fn indexed_fetch_reads_palette() {
    let palette = test_palette();
    let bytes = [5u8, 0, 15, 3];
    let got = fetch_with(Format::C8, &bytes, Some(&palette), None, 0, 4);
    let e = palette.entries();
    assert_eq!(got, [e[5], e[0], e[15], e[3]]);

    let got = fetch_with(Format::C4, &[0x5A], Some(&palette), None, 0, 2);
    assert_eq!(got, [e[10], e[5]]);
}

#[test]
fn indexed_store_finds_entries() {
    let palette = test_palette();
    let values: Vec<u32> = palette.entries()[..16].to_vec();
    for f in [Format::C8, Format::X4c4, Format::C4, Format::G8, Format::G4, Format::X4g4] {
        let mut bytes = vec![0u8; 16];
        store_with(f, &mut bytes, Some(&palette), None, 0, &values);
        let back = fetch_with(f, &bytes, Some(&palette), None, 0, 16);
        assert_eq!(back, values, "{f}");
    }
}

#[test]
fn indexed_store_ignores_alpha() {
    let palette = test_palette();
    let mut bytes = [0u8; 2];
    let color = palette.entries()[7] & 0x00FF_FFFF;
    store_with(Format::C8, &mut bytes, Some(&palette), None, 0, &[color, color | 0xFF00_0000]);
    assert_eq!(bytes, [7, 7]);
}

#[test]
fn g1_stores_by_luma() {
    let palette = Palette::gray(&[0xFF00_0000, 0xFFFF_FFFF]);
    let mut bytes = [0u8; 4];
    store_with(
        Format::G1,
        &mut bytes,
        Some(&palette),
        None,
        0,
        &[0xFFFF_FFFF, 0xFF00_0000, 0xFF00_FF00, 0xFF00_00FF],
    );
    assert_eq!(bytes[0], 0b0101);
    let back = fetch_with(Format::G1, &bytes, Some(&palette), None, 0, 4);
    assert_eq!(back, [0xFFFF_FFFF, 0xFF00_0000, 0xFFFF_FFFF, 0xFF00_0000]);
}

// --- YUV ---

#[test]
fn yuy2_converts_bt601() {
    let bytes = [235, 128, 16, 128, 16, 128, 235, 255];
    let got = fetch(Format::Yuy2, &bytes, 4);
    assert_eq!(got, [0xFFFF_FFFF, 0xFF00_0000, 0xFFCB_0000, 0xFFFF_98FF]);
}

#[test]
fn yuy2_pairs_share_chroma() {
    // pixel 1 takes U and V from the pair starting at byte 0
    let bytes = [16, 128, 16, 255, 16, 128, 16, 128];
    let got = fetch_with(Format::Yuy2, &bytes, None, None, 1, 2);
    assert_eq!(got, [0xFFCB_0000, 0xFF00_0000]);
}

#[test]
fn yuv_formats_are_fetch_only() {
    for f in [Format::Yuy2, Format::Yv12] {
        for indirect in [false, true] {
            let info = accessors(f, indirect);
            assert!(info.store_scanline_32.is_none(), "{f}");
            assert!(info.store_scanline_64.is_none(), "{f}");
        }
    }
}

fn yv12_buffer(rows: [[u8; 4]; 2], y_words: [usize; 2]) -> Vec<u8> {
    let mut bytes = vec![0u8; 24];
    for (row, &w) in rows.iter().zip(&y_words) {
        bytes[w * 4..w * 4 + 4].copy_from_slice(row);
    }
    // V plane at word 4, U plane at word 5
    bytes[16] = 128;
    bytes[17] = 255;
    bytes[20] = 128;
    bytes[21] = 128;
    bytes
}

fn yv12_fetch_all(bytes: &[u8], stride: isize, origin: usize) -> [[u32; 4]; 2] {
    let geom = Geometry {
        format: Format::Yv12,
        width: 4,
        height: 2,
        stride,
        origin,
    };
    let s = Surface {
        geom,
        bytes,
        palette: None,
        fns: None,
    };
    let mut out = [[0u32; 4]; 2];
    for (y, row) in out.iter_mut().enumerate() {
        (accessors(Format::Yv12, false).fetch_scanline_32)(&s, 0, y as u32, row);
    }
    out
}

const YV12_EXPECTED: [[u32; 4]; 2] = [
    [0xFFFF_FFFF, 0xFFFF_FFFF, 0xFFCB_0000, 0xFFCB_0000],
    [0xFF00_0000, 0xFF00_0000, 0xFFFF_98FF, 0xFFFF_98FF],
];

#[test]
fn yv12_top_down() {
    let rows = [[235, 235, 16, 16], [16, 16, 235, 235]];
    let bytes = yv12_buffer(rows, [0, 2]);
    assert_eq!(yuv::yv12_plane_offsets(2, 2), (4, 5));
    assert_eq!(yv12_fetch_all(&bytes, 2, 0), YV12_EXPECTED);
}

#[test]
fn yv12_bottom_up() {
    let rows = [[235, 235, 16, 16], [16, 16, 235, 235]];
    let bytes = yv12_buffer(rows, [2, 0]);
    // planes are placed relative to row 0, which sits at word 2
    assert_eq!(yuv::yv12_plane_offsets(-2, 2), (2, 3));
    assert_eq!(yv12_fetch_all(&bytes, -2, 2), YV12_EXPECTED);
}

#[test]
fn yv12_plane_offsets_follow_height() {
    assert_eq!(yuv::yv12_plane_offsets(4, 6), (24, 30));
    // bottom-up, odd height: V follows row 0 after (h-1)/2 chroma rows
    assert_eq!(yuv::yv12_plane_offsets(-4, 5), (2 * 2 + 4, 8 + 2 * 2));
}

// --- Random access ---

#[test]
fn fetch_pixels_honors_sentinel() {
    let bytes: Vec<u8> = [0x1111_1111u32, 0x2222_2222, 0x3333_3333, 0x4444_4444]
        .iter()
        .flat_map(|p| p.to_le_bytes())
        .collect();
    let s = Surface {
        geom: Geometry {
            format: Format::A8r8g8b8,
            width: 2,
            height: 2,
            stride: 2,
            origin: 0,
        },
        bytes: &bytes,
        palette: None,
        fns: None,
    };
    let mut buf = [0, 0, SENTINEL, 0, 1, 1, 0, SENTINEL, 0, 1];
    (DIRECT[Format::A8r8g8b8.index()].fetch_pixels_32)(&s, &mut buf);
    assert_eq!(buf[..5], [0x1111_1111, 0, 0x4444_4444, 0, 0x3333_3333]);
}

#[test]
fn fetch_pixels_every_format_matches_scanline() {
    let bytes: Vec<u8> = (0..128u32).map(|i| (i * 37 + 11) as u8).collect();
    let palette = test_palette();
    for &f in Format::ALL {
        let s = grid(f, &bytes, Some(&palette), None);
        let info = accessors(f, false);
        for y in 0..2u32 {
            let mut row = [0u32; 8];
            (info.fetch_scanline_32)(&s, 0, y, &mut row);
            let mut buf: Vec<u32> = (0..8u32).flat_map(|x| [x, y]).collect();
            (info.fetch_pixels_32)(&s, &mut buf);
            assert_eq!(buf[..8], row, "{f}");

            let mut wide_row = [0u64; 8];
            (info.fetch_scanline_64)(&s, 0, y, &mut wide_row);
            let mut wide = vec![0u64; 8];
            let lanes = bytemuck::cast_slice_mut::<u64, u32>(&mut wide);
            for x in 0..8u32 {
                lanes[2 * x as usize] = x;
                lanes[2 * x as usize + 1] = y;
            }
            (info.fetch_pixels_64)(&s, &mut wide);
            assert_eq!(wide, wide_row, "{f}");
        }
    }
}

#[test]
fn fetch_pixels_64_honors_sentinel() {
    let bytes = [0xFFu8; 8];
    for f in [Format::R5g6b5, Format::A2b10g10r10] {
        let s = Surface {
            geom: row_geom(f, bytes.len()),
            bytes: &bytes,
            palette: None,
            fns: None,
        };
        let mut buf = vec![0u64; 2];
        bytemuck::cast_slice_mut::<u64, u32>(&mut buf).copy_from_slice(&[SENTINEL, 0, 0, 0]);
        (accessors(f, false).fetch_pixels_64)(&s, &mut buf);
        assert_eq!(buf, [0, u64::MAX], "{f}");
    }
}

// --- Wide ---

/// Byte-wide channels widen by repeating the byte; absent alpha is opaque.
fn ref_wide_bytes(argb: u32) -> u64 {
    let [a, r, g, b] = argb.to_be_bytes().map(|c| c as u64 * 0x0101);
    (a << 48) | (r << 32) | (g << 16) | b
}

fn w1(v: u32) -> u64 {
    if v & 1 != 0 { 0xFFFF } else { 0 }
}
fn w4(v: u32) -> u64 {
    (v & 15) as u64 * 0x1111
}
fn w5(v: u32) -> u64 {
    let v = (v & 31) as u64;
    (v << 11) | (v << 6) | (v << 1) | (v >> 4)
}
fn w6(v: u32) -> u64 {
    let v = (v & 63) as u64;
    (v << 10) | (v << 4) | (v >> 2)
}

fn argb64(a: u64, r: u64, g: u64, b: u64) -> u64 {
    (a << 48) | (r << 32) | (g << 16) | b
}

fn ref_wide_16(format: Format, p: u32) -> u64 {
    match format {
        Format::R5g6b5 => argb64(0xFFFF, w5(p >> 11), w6(p >> 5), w5(p)),
        Format::A1r5g5b5 => argb64(w1(p >> 15), w5(p >> 10), w5(p >> 5), w5(p)),
        Format::X1b5g5r5 => argb64(0xFFFF, w5(p), w5(p >> 5), w5(p >> 10)),
        Format::A4r4g4b4 => argb64(w4(p >> 12), w4(p >> 8), w4(p >> 4), w4(p)),
        _ => unreachable!("{format}"),
    }
}

#[test]
fn wide_fetch_16bpp_replicates_each_field() {
    let bytes = all_u16();
    for f in [Format::R5g6b5, Format::A1r5g5b5, Format::X1b5g5r5, Format::A4r4g4b4] {
        let got = fetch_64(f, &bytes, None, 1 << 16);
        for p in 0..(1u32 << 16) {
            assert_eq!(got[p as usize], ref_wide_16(f, p), "{f} raw {p:#06x}");
        }
    }
}

#[test]
fn wide_fetch_repeats_bytes_of_byte_channel_formats() {
    let bytes: Vec<u8> = (0..128u32).map(|i| (i * 73 + 5) as u8).collect();
    let palette = test_palette();
    let byte_channels = |f: &&Format| f.channel_bits().iter().all(|&b| b == 0 || b == 8);
    for &f in Format::ALL.iter().filter(|f| !f.is_wide()).filter(byte_channels) {
        let s = grid(f, &bytes, Some(&palette), None);
        let info = accessors(f, false);
        let mut narrow = [0u32; 8];
        (info.fetch_scanline_32)(&s, 0, 1, &mut narrow);
        let mut wide = [0u64; 8];
        (info.fetch_scanline_64)(&s, 0, 1, &mut wide);
        assert_eq!(wide, narrow.map(ref_wide_bytes), "{f}");
    }
}

#[test]
fn a2b10g10r10_decodes_ten_bits() {
    let raw: [u32; 3] = [0xC000_03FF, 0x2000_0000, 0x0000_0000];
    let bytes: Vec<u8> = raw.iter().flat_map(|p| p.to_le_bytes()).collect();
    let got = fetch_64(Format::A2b10g10r10, &bytes, None, 3);
    assert_eq!(got[0], 0xFFFF_FFFF_0000_0000);
    assert_eq!(got[1], 0x0000_0000_0000_8020);
    assert_eq!(got[2], 0);

    let got = fetch_64(Format::X2b10g10r10, &bytes, None, 3);
    assert_eq!(got[1], 0xFFFF_0000_0000_8020);

    // narrow access keeps the high byte
    assert_eq!(fetch(Format::A2b10g10r10, &bytes, 3), [0xFFFF_0000, 0x0000_0080, 0]);
}

#[test]
fn a2b10g10r10_store_packs_top_bits() {
    let values = [
        0xFFFF_FFFF_FFFF_FFFFu64,
        0x1234_5678_9ABC_DEF0,
        0x8000_0040_FFC0_0000,
        0,
    ];
    let mut out = vec![0u8; values.len() * 4];
    store_64(Format::A2b10g10r10, &mut out, &values).unwrap();
    for (i, got) in out.chunks_exact(4).enumerate() {
        let got = u32::from_le_bytes([got[0], got[1], got[2], got[3]]);
        assert_eq!(got, ref_store_a2b10g10r10(values[i]), "{:#018x}", values[i]);
    }

    store_64(Format::X2b10g10r10, &mut out, &values).unwrap();
    let first = u32::from_le_bytes([out[0], out[1], out[2], out[3]]);
    assert_eq!(first, 0x3FFF_FFFF);
}

#[test]
fn wide_store_round_trips_native_precision() {
    let raw: Vec<u32> = (0..64u32).map(|i| i.wrapping_mul(0x9E37_79B9)).collect();
    let bytes: Vec<u8> = raw.iter().flat_map(|p| p.to_le_bytes()).collect();
    let wide = fetch_64(Format::A2b10g10r10, &bytes, None, raw.len());
    let mut out = vec![0u8; bytes.len()];
    store_64(Format::A2b10g10r10, &mut out, &wide).unwrap();
    assert_eq!(out, bytes);
}

#[test]
fn narrow_store_of_wide_format_widens_first() {
    let mut bytes = [0u8; 4];
    store(Format::A2b10g10r10, &mut bytes, 0, &[0xFFFF_0000]);
    assert_eq!(u32::from_le_bytes(bytes), 0xC000_03FF);
    assert_eq!(fetch(Format::A2b10g10r10, &bytes, 1), [0xFFFF_0000]);
}

#[test]
fn wide_store_through_bridge() {
    let values = [0x1234_5678_9ABC_DEF0u64, u64::MAX];
    let mut bytes = [0u8; 8];
    store_64(Format::A8r8g8b8, &mut bytes, &values).unwrap();
    assert_eq!(fetch(Format::A8r8g8b8, &bytes, 2), [0x1256_9ADE, 0xFFFF_FFFF]);

    let mut bytes = [0u8; 4];
    store_64(Format::R5g6b5, &mut bytes, &[u64::MAX, 0xFFFF_0000_0000_0000]).unwrap();
    assert_eq!(bytes, [0xFF, 0xFF, 0x00, 0x00]);
}

// --- Indirection ---

#[test]
fn indirect_matches_direct_for_every_format() {
    let bytes: Vec<u8> = (0..128u32).map(|i| (i * 151 + 7) as u8).collect();
    let palette = test_palette();
    let fns = AccessFns::little_endian();
    for &f in Format::ALL {
        let direct_surface = grid(f, &bytes, Some(&palette), None);
        let indirect_surface = grid(f, &bytes, Some(&palette), Some(&fns));
        for y in 0..2u32 {
            let mut direct = [0u32; 6];
            let mut indirect = [0u32; 6];
            (accessors(f, false).fetch_scanline_32)(&direct_surface, 1, y, &mut direct);
            (accessors(f, true).fetch_scanline_32)(&indirect_surface, 1, y, &mut indirect);
            assert_eq!(direct, indirect, "{f}");
        }

        if !f.is_writable() {
            continue;
        }
        let values = fetch_with(f, &bytes, Some(&palette), None, 1, 6);
        let mut a = bytes.clone();
        let mut b = bytes.clone();
        store_with(f, &mut a, Some(&palette), None, 3, &values);
        store_with(f, &mut b, Some(&palette), Some(&fns), 3, &values);
        assert_eq!(a, b, "{f}");
    }
}

#[test]
fn indirect_big_endian_reads_swapped_units() {
    let fns = AccessFns::big_endian();
    let bytes = [0xF8, 0x00, 0x07, 0xE0];
    let got = fetch_with(Format::R5g6b5, &bytes, None, Some(&fns), 0, 2);
    assert_eq!(got, [0xFFFF_0000, 0xFF00_FF00]);

    let mut out = [0u8; 4];
    store_with(Format::R5g6b5, &mut out, None, Some(&fns), 0, &got);
    assert_eq!(out, bytes);
}

#[test]
fn tables_cover_every_format_in_order() {
    for (i, &f) in Format::ALL.iter().enumerate() {
        assert_eq!(DIRECT[i].format, f);
        assert_eq!(INDIRECT[i].format, f);
        assert_eq!(DIRECT[i].store_scanline_32.is_some(), f.is_writable(), "{f}");
    }
}
