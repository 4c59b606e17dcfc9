//! Pixel format descriptor table.

use core::fmt;

/// Pixel layout of a [`PixelBuffer`](crate::PixelBuffer).
///
/// Every format stores one byte per channel, so the channel count is also
/// the number of bytes per pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PixelFormat {
    /// Single coverage channel.
    Mask = 1,
    /// Red, green, blue.
    Rgb = 3,
    /// Red, green, blue, alpha.
    #[default]
    Rgba = 4,
}

impl PixelFormat {
    /// All formats, smallest first.
    pub const ALL: [PixelFormat; 3] = [PixelFormat::Mask, PixelFormat::Rgb, PixelFormat::Rgba];

    /// Bytes per pixel.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        self as usize
    }

    /// Number of channels.
    #[inline]
    pub const fn channels(self) -> usize {
        self.bytes_per_pixel()
    }

    /// Whether the last channel is alpha.
    #[inline]
    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::Rgba)
    }

    /// Symbolic name reported to texture hosts.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mask => "mask",
            Self::Rgb => "rgb",
            Self::Rgba => "rgba",
        }
    }

    /// Resolve a host-supplied format name.
    ///
    /// Only `"rgb"` and `"mask"` select those formats. Anything else,
    /// including `"rgba"` and unknown names, falls back to [`Rgba`](Self::Rgba).
    /// Matching is case-sensitive.
    pub fn from_name(name: &str) -> Self {
        match name {
            "rgb" => Self::Rgb,
            "mask" => Self::Mask,
            _ => Self::Rgba,
        }
    }

    /// Resolve an optional format name; `None` means [`Rgba`](Self::Rgba).
    pub fn from_name_or_default(name: Option<&str>) -> Self {
        name.map(Self::from_name).unwrap_or_default()
    }

    /// Row stride in bytes for `width` pixels. `None` on overflow.
    #[inline]
    pub const fn stride(self, width: u32) -> Option<usize> {
        (width as usize).checked_mul(self.bytes_per_pixel())
    }

    /// Total bytes for a `width` × `height` image. `None` on overflow.
    pub const fn buffer_len(self, width: u32, height: u32) -> Option<usize> {
        match self.stride(width) {
            Some(stride) => stride.checked_mul(height as usize),
            None => None,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn bytes_per_pixel() {
        assert_eq!(PixelFormat::Mask.bytes_per_pixel(), 1);
        assert_eq!(PixelFormat::Rgb.bytes_per_pixel(), 3);
        assert_eq!(PixelFormat::Rgba.bytes_per_pixel(), 4);
        for format in PixelFormat::ALL {
            assert_eq!(format.channels(), format.bytes_per_pixel());
        }
    }

    #[test]
    fn default_is_rgba() {
        assert_eq!(PixelFormat::default(), PixelFormat::Rgba);
        assert_eq!(PixelFormat::from_name_or_default(None), PixelFormat::Rgba);
    }

    #[test]
    fn names_round_trip() {
        for format in PixelFormat::ALL {
            assert_eq!(PixelFormat::from_name(format.name()), format);
        }
    }

    #[test]
    fn unknown_names_fall_back_to_rgba() {
        assert_eq!(PixelFormat::from_name("bgra"), PixelFormat::Rgba);
        assert_eq!(PixelFormat::from_name(""), PixelFormat::Rgba);
        // Host comparison is exact.
        assert_eq!(PixelFormat::from_name("RGB"), PixelFormat::Rgba);
        assert_eq!(PixelFormat::from_name("Mask"), PixelFormat::Rgba);
    }

    #[test]
    fn alpha() {
        assert!(!PixelFormat::Mask.has_alpha());
        assert!(!PixelFormat::Rgb.has_alpha());
        assert!(PixelFormat::Rgba.has_alpha());
    }

    #[test]
    fn stride_and_len() {
        assert_eq!(PixelFormat::Rgb.stride(10), Some(30));
        assert_eq!(PixelFormat::Mask.stride(7), Some(7));
        assert_eq!(PixelFormat::Rgba.buffer_len(3, 2), Some(24));
        assert_eq!(PixelFormat::Mask.buffer_len(1, 1), Some(1));
    }

    #[cfg(target_pointer_width = "32")]
    #[test]
    fn buffer_len_overflow() {
        assert_eq!(PixelFormat::Rgba.stride(u32::MAX), None);
        assert_eq!(PixelFormat::Mask.buffer_len(u32::MAX, u32::MAX), None);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn buffer_len_overflow() {
        assert_eq!(
            PixelFormat::Mask.buffer_len(u32::MAX, u32::MAX),
            Some(18_446_744_065_119_617_025)
        );
        assert_eq!(PixelFormat::Rgba.buffer_len(u32::MAX, u32::MAX), None);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", PixelFormat::Rgb), "rgb");
        assert_eq!(format!("{}", PixelFormat::Rgba), "rgba");
    }
}
