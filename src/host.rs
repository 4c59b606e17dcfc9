//! Texture host interface.
//!
//! A scripting or rendering host binds to a texture once and then works
//! through a fixed capability set: dimension, format and byte accessors, a
//! name lookup for the script-visible fields, and a disposal hook.
//! [`PixelBuffer`] implements that set as [`TextureHost`].
//!
//! Host calls carry loosely typed [`HostValue`] arguments. Malformed input
//! never fails loudly: bad coordinates or dimensions turn into no-ops or
//! empty results, which is what existing scripts expect.
//!
//! # Example
//!
//! ```
//! use memtexture::{Field, HostValue, Method, TextureHost, TextureOptions, new_texture};
//!
//! let options = TextureOptions::new().with_width(2).with_height(2);
//! let mut texture = new_texture(&options).unwrap();
//!
//! let Some(Field::Method(set)) = texture.field("setPixel") else { unreachable!() };
//! let args: [HostValue; 6] = [1.into(), 1.into(), 1.0.into(), 0.0.into(), 0.0.into(), 1.0.into()];
//! texture.call(set, &args);
//!
//! let out = texture.call(Method::GetPixel, &[1.into(), 1.into()]);
//! assert_eq!(out, [HostValue::Number(1.0), 0.0.into(), 0.0.into(), 1.0.into()]);
//! assert!(texture.field("pixels").is_none());
//! ```

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use log::{debug, trace, warn};

use crate::{BufferError, BufferLimits, PixelBuffer, PixelFormat};

// ---------------------------------------------------------------------------
// HostValue
// ---------------------------------------------------------------------------

/// Dynamically typed value exchanged with a host.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum HostValue {
    #[default]
    Nil,
    Bool(bool),
    Integer(i64),
    Number(f64),
    String(String),
    /// Ordered sequence, e.g. a script array.
    List(Vec<HostValue>),
}

impl HostValue {
    /// Numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match *self {
            HostValue::Integer(v) => Some(v as f64),
            HostValue::Number(v) => Some(v),
            _ => None,
        }
    }

    /// Integer value, if this is a number. Fractions truncate toward zero;
    /// NaN and infinities are not integers.
    pub fn as_integer(&self) -> Option<i64> {
        match *self {
            HostValue::Integer(v) => Some(v),
            HostValue::Number(v) if v.is_finite() => Some(v as i64),
            _ => None,
        }
    }

    /// String contents, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            HostValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this is [`HostValue::Nil`].
    pub fn is_nil(&self) -> bool {
        matches!(self, HostValue::Nil)
    }
}

impl From<bool> for HostValue {
    fn from(v: bool) -> Self {
        HostValue::Bool(v)
    }
}

impl From<i32> for HostValue {
    fn from(v: i32) -> Self {
        HostValue::Integer(v.into())
    }
}

impl From<i64> for HostValue {
    fn from(v: i64) -> Self {
        HostValue::Integer(v)
    }
}

impl From<f64> for HostValue {
    fn from(v: f64) -> Self {
        HostValue::Number(v)
    }
}

impl From<&str> for HostValue {
    fn from(v: &str) -> Self {
        HostValue::String(v.into())
    }
}

impl From<String> for HostValue {
    fn from(v: String) -> Self {
        HostValue::String(v)
    }
}

impl From<Vec<HostValue>> for HostValue {
    fn from(v: Vec<HostValue>) -> Self {
        HostValue::List(v)
    }
}

// ---------------------------------------------------------------------------
// Field / Method
// ---------------------------------------------------------------------------

/// Callable operations a host can look up by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    /// `getPixel(x, y)`: channel values, or nothing when out of range.
    GetPixel,
    /// `setPixel(x, y, c1, c2, ...)` or `setPixel(x, y, {c1, c2, ...})`.
    SetPixel,
    /// `resize(width, height)`: clears the texture.
    Resize,
}

impl Method {
    /// Script-visible name.
    pub const fn name(self) -> &'static str {
        match self {
            Method::GetPixel => "getPixel",
            Method::SetPixel => "setPixel",
            Method::Resize => "resize",
        }
    }

    /// Resolve a script-visible method name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "getPixel" => Some(Method::GetPixel),
            "setPixel" => Some(Method::SetPixel),
            "resize" => Some(Method::Resize),
            _ => None,
        }
    }

    /// Run this method against `buffer` with host arguments.
    ///
    /// Arguments exclude the texture itself. Returns the values handed back
    /// to the host; only [`GetPixel`](Method::GetPixel) returns any.
    pub fn call(self, buffer: &mut PixelBuffer, args: &[HostValue]) -> Vec<HostValue> {
        let int_arg = |i: usize| args.get(i).and_then(HostValue::as_integer);
        match self {
            Method::GetPixel => {
                let (Some(x), Some(y)) = (int_arg(0), int_arg(1)) else {
                    return Vec::new();
                };
                buffer
                    .get_pixel(x, y)
                    .iter()
                    .map(|&v| HostValue::Number(v))
                    .collect()
            }
            Method::SetPixel => {
                let (Some(x), Some(y)) = (int_arg(0), int_arg(1)) else {
                    return Vec::new();
                };
                match args.get(2) {
                    Some(first) if first.as_number().is_some() => {
                        buffer.set_pixel_channels(x, y, args[2..].iter().map(HostValue::as_number));
                    }
                    Some(HostValue::List(items)) => {
                        buffer.set_pixel_channels(x, y, items.iter().map(HostValue::as_number));
                    }
                    Some(first) if !first.is_nil() => {
                        trace!("setPixel({x}, {y}) with non-numeric channel value");
                    }
                    _ => trace!("setPixel({x}, {y}) without channel values"),
                }
                Vec::new()
            }
            Method::Resize => {
                let (Some(width), Some(height)) = (int_arg(0), int_arg(1)) else {
                    return Vec::new();
                };
                match buffer.resize(width, height) {
                    Ok(()) => {}
                    Err(BufferError::InvalidDimensions) => {
                        trace!("resize({width}, {height}) ignored");
                    }
                    Err(e) => warn!("resize({width}, {height}) failed: {e}"),
                }
                Vec::new()
            }
        }
    }
}

/// Result of a host field lookup.
#[derive(Clone, Debug, PartialEq)]
pub enum Field {
    /// A callable the host should bind and invoke through [`Method::call`].
    Method(Method),
    /// A plain value.
    Value(HostValue),
}

impl Field {
    /// Look up a script-visible field of a texture with `format`.
    ///
    /// Recognizes `getPixel`, `setPixel`, `resize` and `format`. Any other
    /// name is not found.
    pub fn lookup(name: &str, format: PixelFormat) -> Option<Self> {
        if name == "format" {
            return Some(Field::Value(format.name().into()));
        }
        match Method::from_name(name) {
            Some(method) => Some(Field::Method(method)),
            None => {
                trace!("unknown texture field {name:?}");
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// TextureHost
// ---------------------------------------------------------------------------

/// Capabilities a rendering host queries on an external texture.
///
/// Object safe; hosts typically keep a `Box<dyn TextureHost>`.
pub trait TextureHost {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Raw pixel bytes, tightly packed rows from the top-left.
    ///
    /// The borrow ends before the next resize or finalize.
    fn bitmap(&self) -> &[u8];

    /// Pixel format, used to pick an upload path.
    fn format(&self) -> PixelFormat;

    /// Look up a script-visible field by name.
    fn field(&self, name: &str) -> Option<Field>;

    /// Invoke a method previously returned by [`field`](Self::field).
    fn call(&mut self, method: Method, args: &[HostValue]) -> Vec<HostValue>;

    /// Disposal hook. Consumes the texture, so it runs at most once.
    fn finalize(self: Box<Self>);
}

impl TextureHost for PixelBuffer {
    fn width(&self) -> u32 {
        PixelBuffer::width(self)
    }

    fn height(&self) -> u32 {
        PixelBuffer::height(self)
    }

    fn bitmap(&self) -> &[u8] {
        self.data()
    }

    fn format(&self) -> PixelFormat {
        PixelBuffer::format(self)
    }

    fn field(&self, name: &str) -> Option<Field> {
        Field::lookup(name, PixelBuffer::format(self))
    }

    fn call(&mut self, method: Method, args: &[HostValue]) -> Vec<HostValue> {
        method.call(self, args)
    }

    fn finalize(self: Box<Self>) {
        (*self).dispose();
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Construction record passed by a host.
///
/// `width` and `height` must be positive numbers. `format` selects `"rgb"`
/// or `"mask"`; anything else, including absent, means RGBA.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextureOptions {
    pub width: Option<HostValue>,
    pub height: Option<HostValue>,
    pub format: Option<HostValue>,
}

impl TextureOptions {
    /// Empty options. Not enough to create a texture on their own.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the width.
    pub fn with_width(mut self, width: impl Into<HostValue>) -> Self {
        self.width = Some(width.into());
        self
    }

    /// Set the height.
    pub fn with_height(mut self, height: impl Into<HostValue>) -> Self {
        self.height = Some(height.into());
        self
    }

    /// Set the format name.
    pub fn with_format(mut self, format: impl Into<HostValue>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Collect options from a host record. Unrecognized keys are ignored.
    pub fn from_fields<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, HostValue)>,
    {
        let mut options = Self::new();
        for (key, value) in fields {
            match key {
                "width" => options.width = Some(value),
                "height" => options.height = Some(value),
                "format" => options.format = Some(value),
                _ => {}
            }
        }
        options
    }

    /// Requested dimensions, if both are positive numbers.
    pub fn dimensions(&self) -> Option<(i64, i64)> {
        let positive = |v: &Option<HostValue>| {
            v.as_ref()
                .and_then(HostValue::as_integer)
                .filter(|&v| v > 0)
        };
        Some((positive(&self.width)?, positive(&self.height)?))
    }

    /// Resolved pixel format.
    pub fn pixel_format(&self) -> PixelFormat {
        PixelFormat::from_name_or_default(self.format.as_ref().and_then(HostValue::as_str))
    }
}

/// Create a zero-filled texture from host options.
///
/// Returns `None` when width or height is missing or not positive, or the
/// buffer cannot be allocated. The host sees an absent value, not an error.
pub fn new_texture(options: &TextureOptions) -> Option<PixelBuffer> {
    new_texture_with_limits(options, BufferLimits::none())
}

/// [`new_texture`] with [`BufferLimits`] enforced now and on resize.
pub fn new_texture_with_limits(
    options: &TextureOptions,
    limits: BufferLimits,
) -> Option<PixelBuffer> {
    let Some((width, height)) = options.dimensions() else {
        debug!("texture options without positive width and height");
        return None;
    };
    match PixelBuffer::with_limits(width, height, options.pixel_format(), limits) {
        Ok(buffer) => Some(buffer),
        Err(BufferError::InvalidDimensions) => {
            debug!("texture dimensions {width}x{height} rejected");
            None
        }
        Err(e) => {
            warn!("cannot create {width}x{height} texture: {e}");
            None
        }
    }
}
