//! 2D textures.
//!
//! A [`Texture`] is created from raw texels that have already been decoded (e.g. with the `image`
//! crate). The texels are uploaded once; the caller’s buffer can be dropped right after
//! [`Texture::new`] returns.

use std::error;
use std::fmt;

use crate::backend::texture::Texture as TextureBackend;
use crate::binding::Handle;
use crate::context::GraphicsContext;

/// How to wrap texture coordinates while sampling textures.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Wrap {
  /// Coordinates outside of *[0;1]* are clamped to either *0* or *1*.
  ClampToEdge,
  /// Coordinates are repeated if they lay outside of *[0;1]*.
  Repeat,
  /// Same as `Repeat` but alternating between *[0;1]* and *[1;0]*.
  MirroredRepeat,
}

/// Minification filter.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MinFilter {
  /// Nearest interpolation.
  Nearest,
  /// Linear interpolation between surrounding pixels.
  Linear,
  /// Nearest mipmap, nearest interpolation.
  NearestMipmapNearest,
  /// Nearest mipmap, linear interpolation.
  NearestMipmapLinear,
  /// Linear interpolation between two mipmaps sampled with a nearest filter.
  LinearMipmapNearest,
  /// Linear interpolation between two mipmaps sampled with a linear filter.
  LinearMipmapLinear,
}

/// Magnification filter.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MagFilter {
  /// Nearest interpolation.
  Nearest,
  /// Linear interpolation between surrounding pixels.
  Linear,
}

/// A sampler is used to tell how textures should be sampled.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Sampler {
  /// How should we wrap around the *s* sampling coordinate?
  pub wrap_s: Wrap,
  /// How should we wrap around the *t* sampling coordinate?
  pub wrap_t: Wrap,
  /// Minification filter.
  pub min_filter: MinFilter,
  /// Magnification filter.
  pub mag_filter: MagFilter,
}

/// Repeat on both axes, trilinear minification and linear magnification.
impl Default for Sampler {
  fn default() -> Self {
    Sampler {
      wrap_s: Wrap::Repeat,
      wrap_t: Wrap::Repeat,
      min_filter: MinFilter::LinearMipmapLinear,
      mag_filter: MagFilter::Linear,
    }
  }
}

/// Whether mipmaps should be generated.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum GenMipmaps {
  /// Mipmaps should be generated after upload.
  Yes,
  /// Never generate mipmaps.
  No,
}

/// Texel formats.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PixelFormat {
  /// 8-bit red, green and blue channels.
  RGB8,
  /// 8-bit red, green, blue and alpha channels.
  RGBA8,
}

impl PixelFormat {
  /// Bytes per texel.
  pub fn channels(self) -> usize {
    match self {
      PixelFormat::RGB8 => 3,
      PixelFormat::RGBA8 => 4,
    }
  }
}

impl fmt::Display for PixelFormat {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      PixelFormat::RGB8 => f.write_str("RGB8"),
      PixelFormat::RGBA8 => f.write_str("RGBA8"),
    }
  }
}

/// Errors that might happen when working with textures.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TextureError {
  /// The texel buffer size doesn’t match the texture size.
  NotEnoughTexels {
    /// Expected number of bytes.
    expected: usize,
    /// Provided number of bytes.
    provided: usize,
  },
  /// A texture cannot be empty.
  EmptySize([u32; 2]),
  /// The backend failed to create the texture.
  CreationFailed(String),
}

impl TextureError {
  /// Create a backend creation error.
  pub fn creation_failed(reason: impl Into<String>) -> Self {
    TextureError::CreationFailed(reason.into())
  }
}

impl fmt::Display for TextureError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      TextureError::NotEnoughTexels { expected, provided } => write!(
        f,
        "texel size mismatch: expected {} bytes, provided {}",
        expected, provided
      ),
      TextureError::EmptySize([w, h]) => write!(f, "empty texture size {}×{}", w, h),
      TextureError::CreationFailed(ref e) => write!(f, "texture creation failed: {}", e),
    }
  }
}

impl error::Error for TextureError {}

/// A 2D texture.
///
/// The driver object is released when the texture is dropped.
pub struct Texture<B>
where
  B: ?Sized + TextureBackend,
{
  repr: B::TextureRepr,
  size: [u32; 2],
  format: PixelFormat,
}

impl<B> Texture<B>
where
  B: ?Sized + TextureBackend,
{
  /// Create a texture and upload `texels`, row by row, bottom row first.
  pub fn new<C>(
    ctx: &mut C,
    size: [u32; 2],
    format: PixelFormat,
    sampler: Sampler,
    gen_mipmaps: GenMipmaps,
    texels: &[u8],
  ) -> Result<Self, TextureError>
  where
    C: GraphicsContext<Backend = B>,
  {
    let [width, height] = size;

    if width == 0 || height == 0 {
      return Err(TextureError::EmptySize(size));
    }

    let expected = width as usize * height as usize * format.channels();

    if texels.len() != expected {
      return Err(TextureError::NotEnoughTexels {
        expected,
        provided: texels.len(),
      });
    }

    let repr = unsafe {
      ctx
        .backend()
        .new_texture(size, format, sampler, gen_mipmaps, texels)?
    };

    Ok(Texture { repr, size, format })
  }

  /// Size of the texture.
  pub fn size(&self) -> [u32; 2] {
    self.size
  }

  /// Texel format.
  pub fn format(&self) -> PixelFormat {
    self.format
  }

  /// Driver name of the texture.
  pub fn handle(&self) -> Handle {
    unsafe { B::texture_handle(&self.repr) }
  }

  /// Bind the texture to a texture unit and return the texture previously bound there.
  pub fn bind<C>(&self, ctx: &mut C, unit: u32) -> Handle
  where
    C: GraphicsContext<Backend = B>,
  {
    unsafe { ctx.backend().bind_texture(unit, self.handle()) }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn channels() {
    assert_eq!(PixelFormat::RGB8.channels(), 3);
    assert_eq!(PixelFormat::RGBA8.channels(), 4);
  }

  #[test]
  fn default_sampler_repeats() {
    let sampler = Sampler::default();

    assert_eq!(sampler.wrap_s, Wrap::Repeat);
    assert_eq!(sampler.wrap_t, Wrap::Repeat);
    assert_eq!(sampler.min_filter, MinFilter::LinearMipmapLinear);
  }
}
