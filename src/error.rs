use crate::format::Format;

/// Errors from building images and storing pixels.
///
/// Fetching never fails: a bound image always has a fetch routine, and the
/// buffer was checked against the geometry when the image was built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum AccessError {
    /// The temporary row for a wide store could not be allocated. Nothing
    /// was written.
    #[error("out of memory allocating a {pixels}-pixel staging row")]
    OutOfMemory { pixels: usize },

    #[error("{0} is fetch-only")]
    ReadOnlyFormat(Format),

    #[error("{0} is indexed and needs a palette")]
    MissingPalette(Format),

    #[error("palette inverse table has {actual} entries, expected {expected}")]
    PaletteSize { expected: usize, actual: usize },

    #[error("buffer too small: need {needed} words, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("stride of {stride} words is too small for {width} pixels")]
    InvalidStride { stride: isize, width: u32 },

    /// Some row would start before the beginning of the buffer.
    #[error("origin {origin} with stride {stride} puts rows before the buffer")]
    InvalidOrigin { origin: usize, stride: isize },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("dimension mismatch: expected {expected_width}x{expected_height}, got {width}x{height}")]
    DimensionMismatch {
        expected_width: usize,
        expected_height: usize,
        width: usize,
        height: usize,
    },
}
