//! # packpix
//!
//! Read and write pixels stored in packed memory formats as canonical ARGB.
//!
//! Every supported [`Format`] converts to and from two canonical forms:
//!
//! - **narrow**: `u32`, 8 bits per channel, `A R G B` from the most
//!   significant byte down;
//! - **wide**: `u64`, 16 bits per channel in the same order.
//!
//! Formats cover 32, 24, 16, 8, 4 and 1 bpp direct color, palette and gray
//! indexed formats, 10-bit-per-channel `a2b10g10r10`, and fetch-only YUY2 and
//! YV12. Channels narrower than 8 (or 16) bits are widened by bit
//! replication, so full scale stays full scale.
//!
//! ```rust
//! use packpix::{Format, Image};
//!
//! let mut img = Image::new(Format::R5g6b5, 2, 1, vec![0u32; 1]).unwrap();
//! img.store_scanline(0, 0, &[0xFFFF_0000, 0xFF00_00FF]).unwrap();
//!
//! let mut row = [0u32; 2];
//! img.fetch_scanline(0, 0, &mut row);
//! assert_eq!(row, [0xFFFF_0000, 0xFF00_00FF]);
//!
//! let mut wide = [0u64; 2];
//! img.fetch_scanline_64(0, 0, &mut wide);
//! assert_eq!(wide[1], 0xFFFF_0000_0000_FFFF);
//! ```
//!
//! Memory access is direct by default. Images built with [`AccessFns`] route
//! every load and store through them instead; see [`memory`].
//!
//! ## Feature flags
//!
//! - **`std`** (default): `std` support for `log` and the error type.
//! - **`rgb`**: Row helpers using [`rgb`] pixel types (`Rgba<u8>`,
//!   `Rgba<u16>`).
//! - **`imgref`**: Whole-image fetch and store using [`imgref`] types.
//!   Implies `rgb`.

#![no_std]
#![forbid(unsafe_code)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

mod access;
pub mod channel;
mod error;
mod format;
mod image;
pub mod memory;
mod palette;

pub use access::SENTINEL;
pub use error::AccessError;
pub use format::{Channel, Format, FormatKind, Layout};
pub use image::{Image, ImageBuilder};
pub use memory::{AccessFns, Width};
pub use palette::{INVERSE_LEN, PALETTE_LEN, Palette};

#[cfg(feature = "rgb")]
pub mod typed_rgb;

#[cfg(feature = "imgref")]
pub mod img;
