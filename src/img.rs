//! Whole-image fetch and store using [`imgref`] types.
//!
//! ```rust
//! use imgref::ImgVec;
//! use packpix::{Format, Image, img};
//!
//! let src = ImgVec::new(vec![0xFF00_FF00u32; 6], 3, 2);
//! let mut packed = Image::new(Format::R5g6b5, 3, 2, vec![0u32; 4]).unwrap();
//! img::store_image(&mut packed, src.as_ref()).unwrap();
//!
//! let back = img::fetch_image(&packed);
//! assert_eq!(back.buf(), &[0xFF00_FF00u32; 6][..]);
//! ```

use alloc::vec;

use imgref::{ImgRef, ImgVec};

use crate::AccessError;
use crate::image::Image;

/// Fetch every row as narrow ARGB into a tightly packed image.
pub fn fetch_image<B: AsRef<[u32]>>(img: &Image<B>) -> ImgVec<u32> {
    let mut dst = blank::<u32, _>(img);
    for (y, row) in dst.rows_mut().enumerate() {
        img.fetch_scanline(0, y as u32, row);
    }
    dst
}

/// Fetch every row as wide ARGB into a tightly packed image.
pub fn fetch_image_64<B: AsRef<[u32]>>(img: &Image<B>) -> ImgVec<u64> {
    let mut dst = blank::<u64, _>(img);
    for (y, row) in dst.rows_mut().enumerate() {
        img.fetch_scanline_64(0, y as u32, row);
    }
    dst
}

/// A tightly packed destination. A zero-width image keeps a stride of one,
/// which imgref requires.
fn blank<T: Copy + Default, B: AsRef<[u32]>>(img: &Image<B>) -> ImgVec<T> {
    let (w, h) = (img.width() as usize, img.height() as usize);
    let stride = w.max(1);
    ImgVec::new_stride(vec![T::default(); stride * h], w, h, stride)
}

/// Store narrow ARGB `src` over the whole of `img`. Dimensions must match.
pub fn store_image<B: AsRef<[u32]> + AsMut<[u32]>>(
    img: &mut Image<B>,
    src: ImgRef<'_, u32>,
) -> Result<(), AccessError> {
    check_dimensions(img, src.width(), src.height())?;
    for (y, row) in src.rows().enumerate() {
        img.store_scanline(0, y as u32, row)?;
    }
    Ok(())
}

/// Store wide ARGB `src` over the whole of `img`. Dimensions must match.
pub fn store_image_64<B: AsRef<[u32]> + AsMut<[u32]>>(
    img: &mut Image<B>,
    src: ImgRef<'_, u64>,
) -> Result<(), AccessError> {
    check_dimensions(img, src.width(), src.height())?;
    for (y, row) in src.rows().enumerate() {
        img.store_scanline_64(0, y as u32, row)?;
    }
    Ok(())
}

fn check_dimensions<B: AsRef<[u32]>>(img: &Image<B>, width: usize, height: usize) -> Result<(), AccessError> {
    let (expected_width, expected_height) = (img.width() as usize, img.height() as usize);
    if (width, height) != (expected_width, expected_height) {
        return Err(AccessError::DimensionMismatch {
            expected_width,
            expected_height,
            width,
            height,
        });
    }
    Ok(())
}
