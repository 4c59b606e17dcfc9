//! Owned pixel buffer with per-pixel access.
//!
//! [`PixelBuffer`] owns a tightly packed, row-major byte store whose layout is
//! fixed by its [`PixelFormat`]. Pixel coordinates are 1-based at this API
//! boundary, matching what scripting hosts pass in, and converted exactly once
//! by [`to_index`]. Out-of-range access is a normal outcome: reads come back
//! empty and writes are dropped.

use alloc::vec::Vec;
use core::fmt;

use log::{debug, trace};

use crate::PixelFormat;
use crate::limits::{BufferLimits, LimitExceeded};
use crate::view::PixelView;

// ---------------------------------------------------------------------------
// BufferError
// ---------------------------------------------------------------------------

/// Errors from pixel buffer operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum BufferError {
    /// Width or height is below 1, too large for `u32`, or the byte size
    /// overflows.
    #[error("width or height is not positive or causes overflow")]
    InvalidDimensions,
    /// Pixel coordinate is outside the buffer.
    #[error("pixel coordinate is outside the buffer")]
    OutOfRange,
    /// The backing store could not be allocated.
    #[error("failed to allocate the backing store")]
    AllocationFailed,
    /// A configured [`BufferLimits`] was exceeded.
    #[error(transparent)]
    Limit(#[from] LimitExceeded),
}

// ---------------------------------------------------------------------------
// Coordinate and color conversion
// ---------------------------------------------------------------------------

/// Convert a 1-based coordinate to a 0-based index within `extent`.
///
/// Returns `None` when the converted index falls outside `[0, extent)`.
#[inline]
pub fn to_index(coord: i64, extent: u32) -> Option<usize> {
    let index = coord.checked_sub(1)?;
    if (0..i64::from(extent)).contains(&index) {
        Some(index as usize)
    } else {
        None
    }
}

/// Quantize a normalized channel value to a byte.
///
/// The value is scaled by 255, clamped to `[0, 255]`, then truncated.
/// NaN stores 0.
#[inline]
pub fn quantize(value: f64) -> u8 {
    (value * 255.0).clamp(0.0, 255.0) as u8
}

/// Normalize a stored byte to `[0.0, 1.0]`.
#[inline]
pub fn dequantize(byte: u8) -> f64 {
    f64::from(byte) / 255.0
}

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

/// Normalized channel values of one pixel.
///
/// Holds exactly `bytes_per_pixel` values for an in-range read and nothing
/// for an out-of-range one.
#[derive(Clone, Copy, Default, PartialEq)]
pub struct Channels {
    values: [f64; 4],
    len: u8,
}

impl Channels {
    /// No channels; the result of an out-of-range read.
    pub const EMPTY: Self = Self {
        values: [0.0; 4],
        len: 0,
    };

    fn from_bytes(bytes: &[u8]) -> Self {
        let mut channels = Self::EMPTY;
        for (slot, &byte) in channels.values.iter_mut().zip(bytes) {
            *slot = dequantize(byte);
            channels.len += 1;
        }
        channels
    }

    /// Number of channel values.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Whether the read was out of range.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Channel values in stored order.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values[..self.len()]
    }

    /// Iterate channel values in stored order.
    pub fn iter(&self) -> core::slice::Iter<'_, f64> {
        self.as_slice().iter()
    }
}

impl<'a> IntoIterator for &'a Channels {
    type Item = &'a f64;
    type IntoIter = core::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for Channels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

// ---------------------------------------------------------------------------
// PixelBuffer
// ---------------------------------------------------------------------------

/// Owned, zero-initialized pixel buffer.
///
/// The backing store always holds exactly `width * height * bytes_per_pixel`
/// bytes with a row stride of `width * bytes_per_pixel`. The format is fixed
/// at construction; only [`resize`](Self::resize) changes the dimensions.
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
    format: PixelFormat,
    limits: BufferLimits,
}

impl PixelBuffer {
    /// Allocate a zero-filled buffer.
    ///
    /// # Errors
    ///
    /// [`BufferError::InvalidDimensions`] if either dimension is below 1, does
    /// not fit in `u32`, or the byte size overflows.
    /// [`BufferError::AllocationFailed`] if the store cannot be allocated.
    pub fn new(width: i64, height: i64, format: PixelFormat) -> Result<Self, BufferError> {
        Self::with_limits(width, height, format, BufferLimits::none())
    }

    /// Allocate a zero-filled buffer, enforcing `limits` now and on every
    /// later resize.
    ///
    /// # Errors
    ///
    /// As [`new`](Self::new), plus [`BufferError::Limit`] if the dimensions
    /// exceed `limits`.
    pub fn with_limits(
        width: i64,
        height: i64,
        format: PixelFormat,
        limits: BufferLimits,
    ) -> Result<Self, BufferError> {
        let (width, height, len) = checked_dimensions(width, height, format)?;
        limits.check(width, height, format)?;
        let data = alloc_zeroed(len)?;
        debug!("created {width}x{height} {format} pixel buffer ({len} bytes)");
        Ok(Self {
            data,
            width,
            height,
            format,
            limits,
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel format.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Bytes per pixel.
    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }

    /// Byte stride between row starts.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * self.bytes_per_pixel()
    }

    /// Limits enforced on resize.
    #[inline]
    pub fn limits(&self) -> BufferLimits {
        self.limits
    }

    /// The whole backing store, row-major from the top-left pixel.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Typed view over the backing store.
    pub fn view(&self) -> PixelView<'_> {
        PixelView::new(&self.data, self.width, self.height, self.format)
    }

    /// Byte offset of the pixel at 1-based (`x`, `y`).
    ///
    /// # Errors
    ///
    /// [`BufferError::OutOfRange`] if the pixel lies outside the buffer.
    pub fn pixel_offset(&self, x: i64, y: i64) -> Result<usize, BufferError> {
        let col = to_index(x, self.width).ok_or(BufferError::OutOfRange)?;
        let row = to_index(y, self.height).ok_or(BufferError::OutOfRange)?;
        Ok(row * self.stride() + col * self.bytes_per_pixel())
    }

    /// Raw bytes of the pixel at 1-based (`x`, `y`).
    pub fn pixel_bytes(&self, x: i64, y: i64) -> Option<&[u8]> {
        let offset = self.pixel_offset(x, y).ok()?;
        Some(&self.data[offset..offset + self.bytes_per_pixel()])
    }

    /// Raw bytes of 1-based row `y`.
    pub fn row(&self, y: i64) -> Option<&[u8]> {
        let row = to_index(y, self.height)?;
        let stride = self.stride();
        let start = row * stride;
        Some(&self.data[start..start + stride])
    }

    /// Read the pixel at 1-based (`x`, `y`) as normalized channel values.
    ///
    /// Out-of-range coordinates yield [`Channels::EMPTY`].
    pub fn get_pixel(&self, x: i64, y: i64) -> Channels {
        match self.pixel_bytes(x, y) {
            Some(bytes) => Channels::from_bytes(bytes),
            None => {
                trace!("get_pixel({x}, {y}) outside {}x{}", self.width, self.height);
                Channels::EMPTY
            }
        }
    }

    /// Write normalized channel values to the pixel at 1-based (`x`, `y`).
    ///
    /// Only the leading `values.len()` channels are written; values past the
    /// channel count are ignored. Out-of-range coordinates are a no-op.
    pub fn set_pixel(&mut self, x: i64, y: i64, values: &[f64]) {
        self.set_pixel_channels(x, y, values.iter().copied().map(Some));
    }

    /// Write channel values where a `None` entry leaves that channel as is.
    ///
    /// This is the host-facing form of [`set_pixel`](Self::set_pixel):
    /// non-numeric host values arrive as `None`.
    pub fn set_pixel_channels<I>(&mut self, x: i64, y: i64, values: I)
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let Ok(offset) = self.pixel_offset(x, y) else {
            trace!("set_pixel({x}, {y}) outside {}x{}", self.width, self.height);
            return;
        };
        let bpp = self.bytes_per_pixel();
        write_channels(&mut self.data[offset..offset + bpp], values);
    }

    /// Write the same channel values to every pixel.
    pub fn fill(&mut self, values: &[f64]) {
        let bpp = self.bytes_per_pixel();
        for pixel in self.data.chunks_exact_mut(bpp) {
            write_channels(pixel, values.iter().copied().map(Some));
        }
    }

    /// Zero every byte without reallocating.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Replace the backing store with a zero-filled one of the new size.
    ///
    /// Prior contents are discarded and the format is kept. The new store is
    /// allocated before the old one is released, so on any error the buffer
    /// is left exactly as it was.
    ///
    /// # Errors
    ///
    /// [`BufferError::InvalidDimensions`], [`BufferError::Limit`], or
    /// [`BufferError::AllocationFailed`].
    pub fn resize(&mut self, width: i64, height: i64) -> Result<(), BufferError> {
        let (width, height, len) = checked_dimensions(width, height, self.format)?;
        self.limits.check(width, height, self.format)?;
        let data = alloc_zeroed(len)?;
        debug!(
            "resized {} pixel buffer {}x{} -> {width}x{height}",
            self.format, self.width, self.height
        );
        self.data = data;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Release the buffer. Consumes `self`, so it cannot be used afterwards.
    pub fn dispose(self) {
        debug!("disposed {}x{} {} pixel buffer", self.width, self.height, self.format);
    }

    /// Consume the buffer and return the backing store.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PixelBuffer({}x{}, {})", self.width, self.height, self.format)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Validate host dimensions and compute the store size.
fn checked_dimensions(
    width: i64,
    height: i64,
    format: PixelFormat,
) -> Result<(u32, u32, usize), BufferError> {
    let positive = |v: i64| u32::try_from(v).ok().filter(|&v| v > 0);
    let width = positive(width).ok_or(BufferError::InvalidDimensions)?;
    let height = positive(height).ok_or(BufferError::InvalidDimensions)?;
    let len = format
        .buffer_len(width, height)
        .filter(|&len| len <= isize::MAX as usize)
        .ok_or(BufferError::InvalidDimensions)?;
    Ok((width, height, len))
}

fn alloc_zeroed(len: usize) -> Result<Vec<u8>, BufferError> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| BufferError::AllocationFailed)?;
    data.resize(len, 0);
    Ok(data)
}

fn write_channels<I>(pixel: &mut [u8], values: I)
where
    I: IntoIterator<Item = Option<f64>>,
{
    for (byte, value) in pixel.iter_mut().zip(values) {
        if let Some(value) = value {
            *byte = quantize(value);
        }
    }
}
