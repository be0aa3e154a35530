//! How accessor routines touch pixel memory.
//!
//! Every load and store of raw pixel data goes through a [`Memory`]
//! implementation. [`Direct`] reads the slice itself; [`Indirect`] hands
//! each access to caller-supplied [`AccessFns`], for storage that needs
//! byte swapping, auditing or any other treatment ordinary loads can't give.
//! An image picks one of the two when it is built and keeps it.

use alloc::sync::Arc;
use core::fmt;

/// Size of one memory access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Width {
    U8,
    U16,
    U32,
}

impl Width {
    pub const fn bytes(self) -> usize {
        match self {
            Width::U8 => 1,
            Width::U16 => 2,
            Width::U32 => 4,
        }
    }
}

/// A strategy for reading and writing units of pixel memory.
///
/// `offset` is a byte offset into `bits`. Multi-byte units are little-endian
/// for [`Direct`]; other implementations define their own order.
pub trait Memory {
    fn read(&self, bits: &[u8], offset: usize, width: Width) -> u32;
    fn write(&self, bits: &mut [u8], offset: usize, width: Width, value: u32);
}

/// Plain slice access.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Direct;

impl Memory for Direct {
    #[inline(always)]
    fn read(&self, bits: &[u8], offset: usize, width: Width) -> u32 {
        read_le(bits, offset, width)
    }

    #[inline(always)]
    fn write(&self, bits: &mut [u8], offset: usize, width: Width, value: u32) {
        write_le(bits, offset, width, value)
    }
}

#[inline(always)]
fn read_le(bits: &[u8], offset: usize, width: Width) -> u32 {
    match width {
        Width::U8 => bits[offset] as u32,
        Width::U16 => {
            let b = &bits[offset..offset + 2];
            u16::from_le_bytes([b[0], b[1]]) as u32
        }
        Width::U32 => {
            let b = &bits[offset..offset + 4];
            u32::from_le_bytes([b[0], b[1], b[2], b[3]])
        }
    }
}

#[inline(always)]
fn write_le(bits: &mut [u8], offset: usize, width: Width, value: u32) {
    match width {
        Width::U8 => bits[offset] = value as u8,
        Width::U16 => bits[offset..offset + 2].copy_from_slice(&(value as u16).to_le_bytes()),
        Width::U32 => bits[offset..offset + 4].copy_from_slice(&value.to_le_bytes()),
    }
}

fn read_be(bits: &[u8], offset: usize, width: Width) -> u32 {
    match width {
        Width::U8 => bits[offset] as u32,
        Width::U16 => {
            let b = &bits[offset..offset + 2];
            u16::from_be_bytes([b[0], b[1]]) as u32
        }
        Width::U32 => {
            let b = &bits[offset..offset + 4];
            u32::from_be_bytes([b[0], b[1], b[2], b[3]])
        }
    }
}

fn write_be(bits: &mut [u8], offset: usize, width: Width, value: u32) {
    match width {
        Width::U8 => bits[offset] = value as u8,
        Width::U16 => bits[offset..offset + 2].copy_from_slice(&(value as u16).to_be_bytes()),
        Width::U32 => bits[offset..offset + 4].copy_from_slice(&value.to_be_bytes()),
    }
}

type ReadFn = dyn Fn(&[u8], usize, Width) -> u32 + Send + Sync;
type WriteFn = dyn Fn(&mut [u8], usize, Width, u32) + Send + Sync;

/// A caller-supplied pair of memory access functions.
///
/// ```
/// use packpix::{AccessFns, Format, ImageBuilder};
///
/// // 16-bit pixels stored big-endian.
/// let bits = vec![0xF800_F800u32.to_be(); 1];
/// let img = ImageBuilder::new(Format::R5g6b5, 2, 1)
///     .access_fns(AccessFns::big_endian())
///     .build(bits)
///     .unwrap();
/// let mut row = [0u32; 2];
/// img.fetch_scanline(0, 0, &mut row);
/// assert_eq!(row, [0xFFFF_0000; 2]);
/// ```
#[derive(Clone)]
pub struct AccessFns {
    read: Arc<ReadFn>,
    write: Arc<WriteFn>,
}

impl AccessFns {
    pub fn new<R, W>(read: R, write: W) -> Self
    where
        R: Fn(&[u8], usize, Width) -> u32 + Send + Sync + 'static,
        W: Fn(&mut [u8], usize, Width, u32) + Send + Sync + 'static,
    {
        Self {
            read: Arc::new(read),
            write: Arc::new(write),
        }
    }

    /// Little-endian access, equivalent to [`Direct`] but routed through
    /// function calls.
    pub fn little_endian() -> Self {
        Self::new(read_le, write_le)
    }

    /// Multi-byte units stored most significant byte first.
    pub fn big_endian() -> Self {
        Self::new(read_be, write_be)
    }

    #[inline]
    pub fn read(&self, bits: &[u8], offset: usize, width: Width) -> u32 {
        (self.read)(bits, offset, width)
    }

    #[inline]
    pub fn write(&self, bits: &mut [u8], offset: usize, width: Width, value: u32) {
        (self.write)(bits, offset, width, value)
    }
}

impl fmt::Debug for AccessFns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessFns").finish_non_exhaustive()
    }
}

/// Routes every access through an [`AccessFns`] pair.
#[derive(Clone, Copy, Debug)]
pub struct Indirect<'a> {
    fns: &'a AccessFns,
}

impl<'a> Indirect<'a> {
    pub fn new(fns: &'a AccessFns) -> Self {
        Self { fns }
    }
}

impl Memory for Indirect<'_> {
    #[inline]
    fn read(&self, bits: &[u8], offset: usize, width: Width) -> u32 {
        self.fns.read(bits, offset, width)
    }

    #[inline]
    fn write(&self, bits: &mut [u8], offset: usize, width: Width, value: u32) {
        self.fns.write(bits, offset, width, value)
    }
}
