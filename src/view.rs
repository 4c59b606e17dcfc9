//! Typed views over a buffer's bytes.
//!
//! Uses `imgref::ImgRef` for the 2D layout and `rgb` pixel types, so a
//! [`PixelBuffer`](crate::PixelBuffer) can be handed to code that speaks
//! those crates without copying.

use alloc::vec::Vec;
use core::fmt;

use imgref::{ImgRef, ImgVec};
use rgb::{FromSlice, Rgb, Rgba};

use crate::PixelFormat;

/// Borrowed, typed view of a pixel buffer.
///
/// The variant matches the buffer's [`PixelFormat`]. Rows are tightly
/// packed, so stride equals width.
#[derive(Clone, Copy)]
pub enum PixelView<'a> {
    /// One coverage byte per pixel.
    Mask(ImgRef<'a, u8>),
    Rgb(ImgRef<'a, Rgb<u8>>),
    Rgba(ImgRef<'a, Rgba<u8>>),
}

impl<'a> PixelView<'a> {
    /// Reinterpret `data` as `width` × `height` pixels of `format`.
    ///
    /// # Panics
    ///
    /// Panics if `data` is shorter than the image.
    pub(crate) fn new(data: &'a [u8], width: u32, height: u32, format: PixelFormat) -> Self {
        let (w, h) = (width as usize, height as usize);
        match format {
            PixelFormat::Mask => PixelView::Mask(ImgRef::new(data, w, h)),
            PixelFormat::Rgb => PixelView::Rgb(ImgRef::new(data.as_rgb(), w, h)),
            PixelFormat::Rgba => PixelView::Rgba(ImgRef::new(data.as_rgba(), w, h)),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        match self {
            PixelView::Mask(img) => img.width() as u32,
            PixelView::Rgb(img) => img.width() as u32,
            PixelView::Rgba(img) => img.width() as u32,
        }
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        match self {
            PixelView::Mask(img) => img.height() as u32,
            PixelView::Rgb(img) => img.height() as u32,
            PixelView::Rgba(img) => img.height() as u32,
        }
    }

    /// Format of the underlying buffer.
    pub fn format(&self) -> PixelFormat {
        match self {
            PixelView::Mask(_) => PixelFormat::Mask,
            PixelView::Rgb(_) => PixelFormat::Rgb,
            PixelView::Rgba(_) => PixelFormat::Rgba,
        }
    }

    /// Whether the view carries an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.format().has_alpha()
    }

    /// Convert to RGBA8, allocating a new image.
    ///
    /// A mask becomes white with the mask as alpha.
    /// RGB gets A=255.
    pub fn to_rgba8(&self) -> ImgVec<Rgba<u8>> {
        let (w, h) = (self.width() as usize, self.height() as usize);
        let rgba: Vec<Rgba<u8>> = match self {
            PixelView::Mask(img) => img
                .pixels()
                .map(|a| Rgba {
                    r: 255,
                    g: 255,
                    b: 255,
                    a,
                })
                .collect(),
            PixelView::Rgb(img) => img
                .pixels()
                .map(|p| Rgba {
                    r: p.r,
                    g: p.g,
                    b: p.b,
                    a: 255,
                })
                .collect(),
            PixelView::Rgba(img) => img.pixels().collect(),
        };
        ImgVec::new(rgba, w, h)
    }
}

impl fmt::Debug for PixelView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = match self {
            PixelView::Mask(_) => "Mask",
            PixelView::Rgb(_) => "Rgb",
            PixelView::Rgba(_) => "Rgba",
        };
        write!(
            f,
            "PixelView::{}({}x{})",
            variant,
            self.width(),
            self.height()
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::{PixelBuffer, PixelFormat};
    use alloc::format;

    #[test]
    fn variant_follows_format() {
        for format in PixelFormat::ALL {
            let buf = PixelBuffer::new(3, 2, format).unwrap();
            let view = buf.view();
            assert_eq!(view.format(), format);
            assert_eq!((view.width(), view.height()), (3, 2));
            assert_eq!(view.has_alpha(), format == PixelFormat::Rgba);
        }
    }

    #[test]
    fn rgb_view_reads_written_pixels() {
        let mut buf = PixelBuffer::new(2, 2, PixelFormat::Rgb).unwrap();
        buf.set_pixel(2, 1, &[1.0, 0.0, 1.0]);
        let crate::PixelView::Rgb(img) = buf.view() else {
            panic!("expected an RGB view");
        };
        let px = img.pixels().nth(1).unwrap();
        assert_eq!((px.r, px.g, px.b), (255, 0, 255));
    }

    #[test]
    fn mask_to_rgba8_uses_coverage_as_alpha() {
        let mut buf = PixelBuffer::new(2, 1, PixelFormat::Mask).unwrap();
        buf.set_pixel(1, 1, &[1.0]);
        let rgba = buf.view().to_rgba8();
        assert_eq!((rgba.width(), rgba.height()), (2, 1));
        let px = &rgba.buf()[0];
        assert_eq!((px.r, px.g, px.b, px.a), (255, 255, 255, 255));
        let px = &rgba.buf()[1];
        assert_eq!((px.r, px.g, px.b, px.a), (255, 255, 255, 0));
    }

    #[test]
    fn rgb_to_rgba8_is_opaque() {
        let mut buf = PixelBuffer::new(1, 1, PixelFormat::Rgb).unwrap();
        buf.set_pixel(1, 1, &[0.2, 0.4, 0.6]);
        let rgba = buf.view().to_rgba8();
        let px = &rgba.buf()[0];
        assert_eq!((px.r, px.g, px.b, px.a), (51, 102, 153, 255));
    }

    #[test]
    fn rgba_to_rgba8_copies() {
        let mut buf = PixelBuffer::new(1, 2, PixelFormat::Rgba).unwrap();
        buf.set_pixel(1, 2, &[0.0, 1.0, 0.0, 0.2]);
        let rgba = buf.view().to_rgba8();
        let px = &rgba.buf()[1];
        assert_eq!((px.r, px.g, px.b, px.a), (0, 255, 0, 51));
    }

    #[test]
    fn debug_format() {
        let buf = PixelBuffer::new(3, 2, PixelFormat::Mask).unwrap();
        assert_eq!(format!("{:?}", buf.view()), "PixelView::Mask(3x2)");
    }
}
