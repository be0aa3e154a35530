//! Images: a word buffer plus the geometry and accessors to read it.

use alloc::sync::Arc;

use crate::access::{FormatInfo, Geometry, Surface, SurfaceMut, accessors, yv12_plane_offsets};
use crate::error::AccessError;
use crate::format::{Format, FormatKind};
use crate::memory::AccessFns;
use crate::palette::Palette;

/// Pixels of one [`Format`] stored in a buffer of 32-bit words.
///
/// Rows start on word boundaries, `stride` words apart. Packed values are
/// little-endian in memory whatever the host, so the buffer is best thought
/// of as bytes that happen to be word-aligned.
///
/// Fetch takes `&self` and never fails. Store needs a writable buffer and
/// fails only for fetch-only formats or, for wide stores, when the staging
/// row cannot be allocated.
#[derive(Clone, Debug)]
pub struct Image<B> {
    geom: Geometry,
    palette: Option<Arc<Palette>>,
    fns: Option<AccessFns>,
    accessors: &'static FormatInfo,
    bits: B,
}

/// Configures an [`Image`] before binding it to a buffer.
///
/// ```
/// use packpix::{Format, ImageBuilder};
///
/// // Two rows of r5g6b5, stored bottom-up.
/// let bits = vec![0xFFFF_FFFFu32, 0x0000_0000];
/// let img = ImageBuilder::new(Format::R5g6b5, 2, 2)
///     .stride(-1)
///     .build(bits)
///     .unwrap();
/// assert_eq!(img.fetch_pixel(0, 0), 0xFF00_0000);
/// assert_eq!(img.fetch_pixel(0, 1), 0xFFFF_FFFF);
/// ```
#[derive(Clone, Debug)]
#[must_use]
pub struct ImageBuilder {
    format: Format,
    width: u32,
    height: u32,
    stride: Option<isize>,
    origin: Option<usize>,
    palette: Option<Arc<Palette>>,
    fns: Option<AccessFns>,
}

impl ImageBuilder {
    pub fn new(format: Format, width: u32, height: u32) -> Self {
        Self {
            format,
            width,
            height,
            stride: None,
            origin: None,
            palette: None,
            fns: None,
        }
    }

    /// Words between rows. Negative strides walk backwards through the
    /// buffer. Defaults to [`Format::min_stride`].
    pub fn stride(mut self, stride: isize) -> Self {
        self.stride = Some(stride);
        self
    }

    /// Word index of row 0. Defaults to 0, or to the last row's position
    /// when the stride is negative.
    pub fn origin(mut self, origin: usize) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Palette for the indexed formats. Ignored by the others.
    pub fn palette(mut self, palette: impl Into<Arc<Palette>>) -> Self {
        self.palette = Some(palette.into());
        self
    }

    /// Route every memory access through `fns`.
    pub fn access_fns(mut self, fns: AccessFns) -> Self {
        self.fns = Some(fns);
        self
    }

    /// Check the configuration against `bits` and bind the accessors.
    pub fn build<B: AsRef<[u32]>>(self, bits: B) -> Result<Image<B>, AccessError> {
        let Self {
            format,
            width,
            height,
            stride,
            origin,
            palette,
            fns,
        } = self;

        if width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(AccessError::DimensionsTooLarge { width, height });
        }
        if format.is_indexed() && palette.is_none() {
            return Err(AccessError::MissingPalette(format));
        }

        let min = format.min_stride(width);
        let stride = stride.unwrap_or(min as isize);
        if stride.unsigned_abs() < min {
            return Err(AccessError::InvalidStride { stride, width });
        }
        let origin = origin.unwrap_or(if stride < 0 && height > 0 {
            (height as usize - 1) * stride.unsigned_abs()
        } else {
            0
        });

        let geom = Geometry {
            format,
            width,
            height,
            stride,
            origin,
        };
        check_extent(&geom, bits.as_ref().len())?;

        let indirect = fns.is_some();
        log::debug!(
            "bound {} accessors for {width}x{height} {format}",
            if indirect { "indirect" } else { "direct" }
        );
        Ok(Image {
            geom,
            palette,
            fns,
            accessors: accessors(format, indirect),
            bits,
        })
    }
}

/// Every word a fetch of the full image may touch must lie in `0..len`.
fn check_extent(geom: &Geometry, len: usize) -> Result<(), AccessError> {
    if geom.width == 0 || geom.height == 0 {
        return Ok(());
    }
    let origin = geom.origin as i128;
    let stride = geom.stride as i128;
    let (w, h) = (geom.width as i128, geom.height as i128);

    let mut spans = [(0i128, 0i128); 3];
    let planes = if geom.format.kind() == FormatKind::Yv12 {
        let (v, u) = yv12_plane_offsets(geom.stride, geom.height);
        let chroma_rows = (h + 1) / 2;
        let chroma_words = ((w + 1) / 2 + 3) / 4;
        spans[0] = rows_span(origin, h, stride, (w + 3) / 4);
        spans[1] = rows_span(origin + v as i128, chroma_rows, stride >> 1, chroma_words);
        spans[2] = rows_span(origin + u as i128, chroma_rows, stride >> 1, chroma_words);
        &spans[..]
    } else {
        let row_words = (w * geom.format.bpp() as i128 + 31) / 32;
        spans[0] = rows_span(origin, h, stride, row_words);
        &spans[..1]
    };

    for &(low, high) in planes {
        if low < 0 {
            return Err(AccessError::InvalidOrigin {
                origin: geom.origin,
                stride: geom.stride,
            });
        }
        if high > len as i128 {
            return Err(AccessError::BufferTooSmall {
                needed: high as usize,
                actual: len,
            });
        }
    }
    Ok(())
}

/// First and one-past-last word of `rows` rows of `row_words` words.
fn rows_span(first: i128, rows: i128, step: i128, row_words: i128) -> (i128, i128) {
    let last = first + (rows - 1) * step;
    (first.min(last), first.max(last) + row_words)
}

impl<B: AsRef<[u32]>> Image<B> {
    /// A top-down image with rows packed at the minimum stride.
    pub fn new(format: Format, width: u32, height: u32, bits: B) -> Result<Self, AccessError> {
        ImageBuilder::new(format, width, height).build(bits)
    }

    pub fn format(&self) -> Format {
        self.geom.format
    }

    pub fn width(&self) -> u32 {
        self.geom.width
    }

    pub fn height(&self) -> u32 {
        self.geom.height
    }

    /// Words between rows.
    pub fn stride(&self) -> isize {
        self.geom.stride
    }

    /// Word index of row 0.
    pub fn origin(&self) -> usize {
        self.geom.origin
    }

    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_deref()
    }

    pub fn access_fns(&self) -> Option<&AccessFns> {
        self.fns.as_ref()
    }

    /// Whether memory access goes through [`AccessFns`].
    pub fn is_indirect(&self) -> bool {
        self.fns.is_some()
    }

    pub fn bits(&self) -> &[u32] {
        self.bits.as_ref()
    }

    pub fn into_bits(self) -> B {
        self.bits
    }

    fn surface(&self) -> Surface<'_> {
        Surface {
            geom: self.geom,
            bytes: bytemuck::cast_slice(self.bits.as_ref()),
            palette: self.palette.as_deref(),
            fns: self.fns.as_ref(),
        }
    }

    /// Fetch `out.len()` pixels of row `y` from column `x` as narrow ARGB.
    ///
    /// Coordinates are not range-checked beyond what slice indexing
    /// guarantees; reading outside the image returns whatever the buffer
    /// holds there, or panics past its end.
    #[inline]
    pub fn fetch_scanline(&self, x: u32, y: u32, out: &mut [u32]) {
        (self.accessors.fetch_scanline_32)(&self.surface(), x, y, out)
    }

    /// Fetch `out.len()` pixels of row `y` from column `x` as wide ARGB.
    #[inline]
    pub fn fetch_scanline_64(&self, x: u32, y: u32, out: &mut [u64]) {
        (self.accessors.fetch_scanline_64)(&self.surface(), x, y, out)
    }

    /// Random fetch. `buf` holds `(x, y)` pairs; pixel `i` of the result
    /// overwrites `buf[i]`, so `buf[..buf.len() / 2]` holds the pixels
    /// afterwards. A pair with either coordinate equal to
    /// [`SENTINEL`](crate::SENTINEL) yields 0.
    ///
    /// ```
    /// use packpix::{Format, Image, SENTINEL};
    ///
    /// let img = Image::new(Format::A8r8g8b8, 2, 1, vec![0x1111_1111u32, 0x2222_2222]).unwrap();
    /// let mut buf = [1, 0, SENTINEL, 0, 0, 0];
    /// img.fetch_pixels(&mut buf);
    /// assert_eq!(buf[..3], [0x2222_2222, 0, 0x1111_1111]);
    /// ```
    #[inline]
    pub fn fetch_pixels(&self, buf: &mut [u32]) {
        (self.accessors.fetch_pixels_32)(&self.surface(), buf)
    }

    /// Wide random fetch. The 32-bit lanes of `buf` hold `(x, y)` pairs,
    /// pair `i` in lanes `2i` and `2i + 1`; each element becomes a pixel.
    #[inline]
    pub fn fetch_pixels_64(&self, buf: &mut [u64]) {
        (self.accessors.fetch_pixels_64)(&self.surface(), buf)
    }

    /// Fetch the narrow pixel at `(x, y)`.
    pub fn fetch_pixel(&self, x: u32, y: u32) -> u32 {
        let mut buf = [x, y];
        self.fetch_pixels(&mut buf);
        buf[0]
    }
}

impl<B: AsRef<[u32]> + AsMut<[u32]>> Image<B> {
    pub fn bits_mut(&mut self) -> &mut [u32] {
        self.bits.as_mut()
    }

    fn surface_mut(&mut self) -> SurfaceMut<'_> {
        SurfaceMut {
            geom: self.geom,
            bytes: bytemuck::cast_slice_mut(self.bits.as_mut()),
            palette: self.palette.as_deref(),
            fns: self.fns.as_ref(),
        }
    }

    /// Store narrow `values` into row `y` from column `x`.
    ///
    /// Channels the format lacks are dropped; indexed formats store the
    /// palette's nearest entry.
    pub fn store_scanline(&mut self, x: u32, y: u32, values: &[u32]) -> Result<(), AccessError> {
        let Some(store) = self.accessors.store_scanline_32 else {
            log::warn!("store to fetch-only format {}", self.geom.format);
            return Err(AccessError::ReadOnlyFormat(self.geom.format));
        };
        store(&mut self.surface_mut(), x, y, values);
        Ok(())
    }

    /// Store wide `values` into row `y` from column `x`.
    ///
    /// Formats without native wide storage narrow through a temporary row;
    /// if that allocation fails nothing is written.
    pub fn store_scanline_64(&mut self, x: u32, y: u32, values: &[u64]) -> Result<(), AccessError> {
        let Some(store) = self.accessors.store_scanline_64 else {
            log::warn!("store to fetch-only format {}", self.geom.format);
            return Err(AccessError::ReadOnlyFormat(self.geom.format));
        };
        store(&mut self.surface_mut(), x, y, values)
    }
}
