//! Texture backend interface.

use crate::binding::Handle;
use crate::texture::{GenMipmaps, PixelFormat, Sampler, TextureError};

/// 2D textures.
pub unsafe trait Texture {
  /// Backend representation of a texture.
  type TextureRepr;

  /// Create a texture and upload its base level.
  ///
  /// `texels` is guaranteed to hold exactly `width * height * format.channels()` bytes.
  unsafe fn new_texture(
    &mut self,
    size: [u32; 2],
    format: PixelFormat,
    sampler: Sampler,
    gen_mipmaps: GenMipmaps,
    texels: &[u8],
  ) -> Result<Self::TextureRepr, TextureError>;

  /// Driver name of a texture.
  unsafe fn texture_handle(texture: &Self::TextureRepr) -> Handle;

  /// Bind a texture to a texture unit and return the texture previously bound to that unit.
  unsafe fn bind_texture(&mut self, unit: u32, texture: Handle) -> Handle;
}
