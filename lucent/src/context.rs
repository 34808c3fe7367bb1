//! Graphics context.
//!
//! A graphics context is an object that abstracts all the low-level operations that happen on a
//! graphics device. This crate doesn’t create such contexts: surface crates (`lucent-glfw`) and
//! `lucent-headless` do.
//!
//! # On context and threads
//!
//!   - An object which type implements `GraphicsContext` must be `!Send` and `!Sync`. Backends keep
//!     their state behind `Rc<RefCell<_>>`, which makes that automatic.
//!   - The OpenGL backend only allows a single context per thread.

use crate::backend::pipeline::Pipeline as PipelineBackend;
use crate::backend::shader::Shader as ShaderBackend;
use crate::backend::tess::Tess as TessBackend;
use crate::backend::texture::Texture as TextureBackend;
use crate::pipeline::{PipelineState, Viewport};
use crate::shader::ProgramBuilder;
use crate::tess::TessBuilder;
use crate::texture::{GenMipmaps, PixelFormat, Sampler, Texture, TextureError};

/// Class of graphics context.
///
/// Such a context must not be Send nor Sync, which means that you cannot share it between
/// threads in any way (move / borrow).
pub unsafe trait GraphicsContext: Sized {
  /// Backend this context drives.
  type Backend: ?Sized;

  /// Access the backend.
  fn backend(&mut self) -> &mut Self::Backend;

  /// Create a shader program builder.
  fn new_shader_program(&mut self) -> ProgramBuilder<Self>
  where
    Self::Backend: ShaderBackend,
  {
    ProgramBuilder::new(self)
  }

  /// Create a tessellation builder.
  fn new_tess(&mut self) -> TessBuilder<Self>
  where
    Self::Backend: TessBackend,
  {
    TessBuilder::new(self)
  }

  /// Create a texture from raw texels.
  fn new_texture(
    &mut self,
    size: [u32; 2],
    format: PixelFormat,
    sampler: Sampler,
    gen_mipmaps: GenMipmaps,
    texels: &[u8],
  ) -> Result<Texture<Self::Backend>, TextureError>
  where
    Self::Backend: TextureBackend,
  {
    Texture::new(self, size, format, sampler, gen_mipmaps, texels)
  }

  /// Current viewport.
  fn viewport(&mut self) -> Viewport
  where
    Self::Backend: PipelineBackend,
  {
    unsafe { self.backend().viewport() }
  }

  /// Replace the viewport and return the previous one.
  fn set_viewport(&mut self, viewport: Viewport) -> Viewport
  where
    Self::Backend: PipelineBackend,
  {
    unsafe { self.backend().set_viewport(viewport) }
  }

  /// Apply a pipeline state: set its viewport, then clear the color buffer with its clear color.
  fn clear(&mut self, state: &PipelineState)
  where
    Self::Backend: PipelineBackend,
  {
    let backend = self.backend();

    unsafe {
      if let Some(viewport) = state.viewport() {
        backend.set_viewport(viewport);
      }

      if let Some(&color) = state.clear_color() {
        backend.set_clear_color(color);
        backend.clear_color_buffer();
      }
    }
  }
}
