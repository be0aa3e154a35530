//! Format tags and the channel-layout descriptors behind them.
//!
//! Every [`Format`] is a fixed bit layout. Packed formats are read as a
//! little-endian integer of `bpp` bits (for 1 and 4 bpp, see
//! [`crate::access`]) and their channels are named most-significant first:
//! `r5g6b5` keeps red in bits 11..16, green in 5..11, blue in 0..5.

use core::fmt;

/// What a format's raw bits mean.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormatKind {
    /// Direct color, described by a [`Layout`].
    Argb,
    /// Index into a color [`Palette`](crate::Palette).
    Color,
    /// Index into a gray [`Palette`](crate::Palette).
    Gray,
    /// Packed 4:2:2 YCbCr, bytes `Y0 U Y1 V`.
    Yuy2,
    /// Planar 4:2:0 YCbCr: full-size Y plane, then quarter-size V and U planes.
    Yv12,
}

/// One channel's bit field inside a packed pixel. `width == 0` means absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Channel {
    pub shift: u8,
    pub width: u8,
}

impl Channel {
    pub const NONE: Channel = Channel { shift: 0, width: 0 };

    #[inline(always)]
    pub const fn new(shift: u8, width: u8) -> Self {
        Self { shift, width }
    }

    #[inline(always)]
    pub const fn is_present(self) -> bool {
        self.width != 0
    }

    #[inline(always)]
    const fn mask(self) -> u32 {
        if self.width >= 32 {
            u32::MAX
        } else {
            (1u32 << self.width) - 1
        }
    }

    /// Extract the raw field from a packed pixel.
    #[inline(always)]
    pub const fn extract(self, packed: u32) -> u32 {
        (packed >> self.shift) & self.mask()
    }

    /// Place an already-narrowed field value at this channel's position.
    #[inline(always)]
    pub const fn place(self, field: u32) -> u32 {
        (field & self.mask()) << self.shift
    }
}

/// Channel positions of a direct-color format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Layout {
    pub a: Channel,
    pub r: Channel,
    pub g: Channel,
    pub b: Channel,
}

impl Layout {
    /// Layout of the canonical narrow pixel itself.
    pub const ARGB32: Layout = Layout::new(
        Channel::new(24, 8),
        Channel::new(16, 8),
        Channel::new(8, 8),
        Channel::new(0, 8),
    );

    pub const NONE: Layout = Layout::new(Channel::NONE, Channel::NONE, Channel::NONE, Channel::NONE);

    pub const fn new(a: Channel, r: Channel, g: Channel, b: Channel) -> Self {
        Self { a, r, g, b }
    }
}

const fn ch(shift: u8, width: u8) -> Channel {
    Channel::new(shift, width)
}

const NO: Channel = Channel::NONE;

macro_rules! formats {
    ($($(#[$doc:meta])* $variant:ident = $name:literal, $bpp:literal, $kind:ident, [$a:expr, $r:expr, $g:expr, $b:expr];)*) => {
        /// A supported pixel format.
        ///
        /// The set is closed: anything that is a `Format` has exactly one
        /// accessor entry, so there is no "unsupported format" error at runtime.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum Format {
            $($(#[$doc])* $variant,)*
        }

        impl Format {
            /// Every format, in registry order.
            pub const ALL: &'static [Format] = &[$(Format::$variant,)*];

            /// Bits per pixel (12 for `yv12`, averaged over its three planes).
            pub const fn bpp(self) -> u32 {
                match self {
                    $(Format::$variant => $bpp,)*
                }
            }

            pub const fn kind(self) -> FormatKind {
                match self {
                    $(Format::$variant => FormatKind::$kind,)*
                }
            }

            /// Channel positions. [`Layout::NONE`] for palette and YUV formats.
            pub const fn layout(self) -> Layout {
                match self {
                    $(Format::$variant => Layout::new($a, $r, $g, $b),)*
                }
            }

            /// Lowercase tag, e.g. `"a8r8g8b8"`.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Format::$variant => $name,)*
                }
            }
        }
    };
}

formats! {
    // 32 bpp
    A8r8g8b8 = "a8r8g8b8", 32, Argb, [ch(24, 8), ch(16, 8), ch(8, 8), ch(0, 8)];
    X8r8g8b8 = "x8r8g8b8", 32, Argb, [NO, ch(16, 8), ch(8, 8), ch(0, 8)];
    A8b8g8r8 = "a8b8g8r8", 32, Argb, [ch(24, 8), ch(0, 8), ch(8, 8), ch(16, 8)];
    X8b8g8r8 = "x8b8g8r8", 32, Argb, [NO, ch(0, 8), ch(8, 8), ch(16, 8)];
    B8g8r8a8 = "b8g8r8a8", 32, Argb, [ch(0, 8), ch(8, 8), ch(16, 8), ch(24, 8)];
    B8g8r8x8 = "b8g8r8x8", 32, Argb, [NO, ch(8, 8), ch(16, 8), ch(24, 8)];

    // 24 bpp
    R8g8b8 = "r8g8b8", 24, Argb, [NO, ch(16, 8), ch(8, 8), ch(0, 8)];
    B8g8r8 = "b8g8r8", 24, Argb, [NO, ch(0, 8), ch(8, 8), ch(16, 8)];

    // 16 bpp
    R5g6b5 = "r5g6b5", 16, Argb, [NO, ch(11, 5), ch(5, 6), ch(0, 5)];
    B5g6r5 = "b5g6r5", 16, Argb, [NO, ch(0, 5), ch(5, 6), ch(11, 5)];
    A1r5g5b5 = "a1r5g5b5", 16, Argb, [ch(15, 1), ch(10, 5), ch(5, 5), ch(0, 5)];
    X1r5g5b5 = "x1r5g5b5", 16, Argb, [NO, ch(10, 5), ch(5, 5), ch(0, 5)];
    A1b5g5r5 = "a1b5g5r5", 16, Argb, [ch(15, 1), ch(0, 5), ch(5, 5), ch(10, 5)];
    X1b5g5r5 = "x1b5g5r5", 16, Argb, [NO, ch(0, 5), ch(5, 5), ch(10, 5)];
    A4r4g4b4 = "a4r4g4b4", 16, Argb, [ch(12, 4), ch(8, 4), ch(4, 4), ch(0, 4)];
    X4r4g4b4 = "x4r4g4b4", 16, Argb, [NO, ch(8, 4), ch(4, 4), ch(0, 4)];
    A4b4g4r4 = "a4b4g4r4", 16, Argb, [ch(12, 4), ch(0, 4), ch(4, 4), ch(8, 4)];
    X4b4g4r4 = "x4b4g4r4", 16, Argb, [NO, ch(0, 4), ch(4, 4), ch(8, 4)];

    // 8 bpp
    A8 = "a8", 8, Argb, [ch(0, 8), NO, NO, NO];
    R3g3b2 = "r3g3b2", 8, Argb, [NO, ch(5, 3), ch(2, 3), ch(0, 2)];
    B2g3r3 = "b2g3r3", 8, Argb, [NO, ch(0, 3), ch(3, 3), ch(6, 2)];
    A2r2g2b2 = "a2r2g2b2", 8, Argb, [ch(6, 2), ch(4, 2), ch(2, 2), ch(0, 2)];
    A2b2g2r2 = "a2b2g2r2", 8, Argb, [ch(6, 2), ch(0, 2), ch(2, 2), ch(4, 2)];
    C8 = "c8", 8, Color, [NO, NO, NO, NO];
    G8 = "g8", 8, Gray, [NO, NO, NO, NO];
    /// Palette index in the whole byte; the high nibble is expected to be zero.
    X4c4 = "x4c4", 8, Color, [NO, NO, NO, NO];
    /// Gray palette index in the whole byte; the high nibble is expected to be zero.
    X4g4 = "x4g4", 8, Gray, [NO, NO, NO, NO];
    X4a4 = "x4a4", 8, Argb, [ch(0, 4), NO, NO, NO];

    // 4 bpp
    A4 = "a4", 4, Argb, [ch(0, 4), NO, NO, NO];
    R1g2b1 = "r1g2b1", 4, Argb, [NO, ch(3, 1), ch(1, 2), ch(0, 1)];
    B1g2r1 = "b1g2r1", 4, Argb, [NO, ch(0, 1), ch(1, 2), ch(3, 1)];
    A1r1g1b1 = "a1r1g1b1", 4, Argb, [ch(3, 1), ch(2, 1), ch(1, 1), ch(0, 1)];
    A1b1g1r1 = "a1b1g1r1", 4, Argb, [ch(3, 1), ch(0, 1), ch(1, 1), ch(2, 1)];
    C4 = "c4", 4, Color, [NO, NO, NO, NO];
    G4 = "g4", 4, Gray, [NO, NO, NO, NO];

    // 1 bpp
    A1 = "a1", 1, Argb, [ch(0, 1), NO, NO, NO];
    G1 = "g1", 1, Gray, [NO, NO, NO, NO];

    // 10 bits per channel; narrow access to these loses precision.
    A2b10g10r10 = "a2b10g10r10", 32, Argb, [ch(30, 2), ch(0, 10), ch(10, 10), ch(20, 10)];
    X2b10g10r10 = "x2b10g10r10", 32, Argb, [NO, ch(0, 10), ch(10, 10), ch(20, 10)];

    // YUV, fetch only
    Yuy2 = "yuy2", 16, Yuy2, [NO, NO, NO, NO];
    Yv12 = "yv12", 12, Yv12, [NO, NO, NO, NO];
}

impl Format {
    /// Number of formats in the registry.
    pub const COUNT: usize = Format::ALL.len();

    /// Registry slot of this format.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether the raw bits carry an alpha channel.
    ///
    /// Palette formats report `true`: their entries carry alpha.
    pub const fn has_alpha(self) -> bool {
        match self.kind() {
            FormatKind::Argb => self.layout().a.is_present(),
            FormatKind::Color | FormatKind::Gray => true,
            FormatKind::Yuy2 | FormatKind::Yv12 => false,
        }
    }

    /// Whether any channel is wider than 8 bits, making narrow access lossy.
    pub const fn is_wide(self) -> bool {
        let l = self.layout();
        l.a.width > 8 || l.r.width > 8 || l.g.width > 8 || l.b.width > 8
    }

    /// Whether the format reads through a palette.
    pub const fn is_indexed(self) -> bool {
        matches!(self.kind(), FormatKind::Color | FormatKind::Gray)
    }

    /// Whether pixels of this format can be stored. YUV formats are fetch-only.
    pub const fn is_writable(self) -> bool {
        !matches!(self.kind(), FormatKind::Yuy2 | FormatKind::Yv12)
    }

    /// The smallest row stride, in 32-bit words, for `width` pixels.
    ///
    /// For `yv12` this is the Y plane's stride, kept even so each chroma
    /// plane gets half of it.
    ///
    /// ```
    /// use packpix::Format;
    /// assert_eq!(Format::R8g8b8.min_stride(4), 3);
    /// assert_eq!(Format::Yv12.min_stride(13), 4);
    /// ```
    pub const fn min_stride(self, width: u32) -> usize {
        match self.kind() {
            FormatKind::Yv12 => {
                let words = (width as usize).div_ceil(4);
                words + (words & 1)
            }
            _ => (width as u64 * self.bpp() as u64).div_ceil(32) as usize,
        }
    }

    /// Significant bits per canonical 8-bit channel, `[a, r, g, b]`.
    ///
    /// This is what the wide bridge replicates from when it widens a narrow
    /// pixel of this format: an `r5g6b5` red of `0xF8` came from five bits,
    /// so its 16-bit value is rebuilt from those five. Zero means the format
    /// has no such channel. Palette and YUV formats produce full 8-bit colors.
    pub const fn channel_bits(self) -> [u8; 4] {
        match self.kind() {
            FormatKind::Argb => {
                let l = self.layout();
                [
                    min8(l.a.width),
                    min8(l.r.width),
                    min8(l.g.width),
                    min8(l.b.width),
                ]
            }
            FormatKind::Color | FormatKind::Gray => [8, 8, 8, 8],
            FormatKind::Yuy2 | FormatKind::Yv12 => [0, 8, 8, 8],
        }
    }
}

const fn min8(w: u8) -> u8 {
    if w > 8 { 8 } else { w }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
