//! In-memory bitmap textures with per-pixel access.
//!
//! This crate provides the owned side of an external texture: a mutable pixel
//! buffer that a scripting or rendering host can read, write and resize.
//!
//! - [`PixelBuffer`] — zero-initialized byte store with 1-based pixel access
//! - [`PixelFormat`] — mask, RGB or RGBA, one byte per channel
//! - [`BufferLimits`] — caps on dimensions and memory
//! - [`PixelView`] — zero-copy `imgref`/`rgb` view of the bytes
//! - [`TextureHost`] / [`Field`] / [`Method`] — the capability set a host binds to
//! - [`new_texture`] — construction from a host options record
//!
//! # Example
//!
//! ```
//! use memtexture::{PixelBuffer, PixelFormat};
//!
//! let mut buf = PixelBuffer::new(2, 2, PixelFormat::Rgba)?;
//! buf.set_pixel(1, 1, &[1.0, 0.0, 0.0, 1.0]);
//! assert_eq!(buf.get_pixel(1, 1).as_slice(), &[1.0, 0.0, 0.0, 1.0]);
//! assert_eq!(buf.get_pixel(2, 2).as_slice(), &[0.0; 4]);
//! assert!(buf.get_pixel(3, 1).is_empty());
//!
//! buf.resize(4, 4)?;
//! assert!(buf.data().iter().all(|&b| b == 0));
//! # Ok::<(), memtexture::BufferError>(())
//! ```

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

mod buffer;
mod format;
mod host;
mod limits;
mod view;

pub use buffer::{BufferError, Channels, PixelBuffer, dequantize, quantize, to_index};
pub use format::PixelFormat;
pub use host::{
    Field, HostValue, Method, TextureHost, TextureOptions, new_texture, new_texture_with_limits,
};
pub use limits::{BufferLimits, LimitExceeded};
pub use view::PixelView;

// Re-exports for callers working with typed views.
pub use imgref::{ImgRef, ImgVec};
pub use rgb;
pub use rgb::{Rgb, Rgba};
