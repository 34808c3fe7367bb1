use crate::gl33::{state::GLState, GL33};
use gl::{self, types::*};
use lucent::{
  backend::texture::Texture as TextureBackend,
  binding::Handle,
  texture::{GenMipmaps, MagFilter, MinFilter, PixelFormat, Sampler, TextureError, Wrap},
};
use std::{cell::RefCell, os::raw::c_void, rc::Rc};

// unit used to configure and upload new textures
const UPLOAD_UNIT: u32 = 0;

/// A 2D OpenGL texture object.
#[derive(Debug)]
pub struct Texture {
  pub(crate) handle: GLuint, // handle to the GPU texture object
  state: Rc<RefCell<GLState>>,
}

impl Drop for Texture {
  fn drop(&mut self) {
    unsafe {
      self.state.borrow_mut().unbind_texture(self.handle);
      gl::DeleteTextures(1, &self.handle);
    }

    log::trace!("released texture #{}", self.handle);
  }
}

unsafe impl TextureBackend for GL33 {
  type TextureRepr = Texture;

  unsafe fn new_texture(
    &mut self,
    size: [u32; 2],
    format: PixelFormat,
    sampler: Sampler,
    gen_mipmaps: GenMipmaps,
    texels: &[u8],
  ) -> Result<Self::TextureRepr, TextureError> {
    let mut handle: GLuint = 0;
    gl::GenTextures(1, &mut handle);

    if handle == 0 {
      return Err(TextureError::creation_failed("unable to create texture"));
    }

    let texture = Texture {
      handle,
      state: self.state.clone(),
    };

    let previous = self.state.borrow_mut().bind_texture(UPLOAD_UNIT, handle);

    apply_sampler_to_texture(sampler);

    let (iformat, format_) = opengl_pixel_format(format);
    set_unpack_alignment(size[0] as usize * format.channels());

    gl::TexImage2D(
      gl::TEXTURE_2D,
      0,
      iformat as GLint,
      size[0] as GLsizei,
      size[1] as GLsizei,
      0,
      format_,
      gl::UNSIGNED_BYTE,
      texels.as_ptr() as *const c_void,
    );

    if gen_mipmaps == GenMipmaps::Yes {
      gl::GenerateMipmap(gl::TEXTURE_2D);
    }

    self.state.borrow_mut().bind_texture(UPLOAD_UNIT, previous);

    match gl::GetError() {
      gl::NO_ERROR => {
        log::debug!(
          "created {}×{} {} texture #{}",
          size[0],
          size[1],
          format,
          handle
        );
        Ok(texture)
      }

      e => Err(TextureError::creation_failed(format!(
        "driver error {:#x}",
        e
      ))),
    }
  }

  unsafe fn texture_handle(texture: &Self::TextureRepr) -> Handle {
    Handle::new(texture.handle)
  }

  unsafe fn bind_texture(&mut self, unit: u32, texture: Handle) -> Handle {
    Handle::new(self.state.borrow_mut().bind_texture(unit, texture.raw()))
  }
}

fn apply_sampler_to_texture(sampler: Sampler) {
  unsafe {
    gl::TexParameteri(
      gl::TEXTURE_2D,
      gl::TEXTURE_WRAP_S,
      opengl_wrap(sampler.wrap_s) as GLint,
    );
    gl::TexParameteri(
      gl::TEXTURE_2D,
      gl::TEXTURE_WRAP_T,
      opengl_wrap(sampler.wrap_t) as GLint,
    );
    gl::TexParameteri(
      gl::TEXTURE_2D,
      gl::TEXTURE_MIN_FILTER,
      opengl_min_filter(sampler.min_filter) as GLint,
    );
    gl::TexParameteri(
      gl::TEXTURE_2D,
      gl::TEXTURE_MAG_FILTER,
      opengl_mag_filter(sampler.mag_filter) as GLint,
    );
  }
}

fn opengl_wrap(wrap: Wrap) -> GLenum {
  match wrap {
    Wrap::ClampToEdge => gl::CLAMP_TO_EDGE,
    Wrap::Repeat => gl::REPEAT,
    Wrap::MirroredRepeat => gl::MIRRORED_REPEAT,
  }
}

fn opengl_min_filter(filter: MinFilter) -> GLenum {
  match filter {
    MinFilter::Nearest => gl::NEAREST,
    MinFilter::Linear => gl::LINEAR,
    MinFilter::NearestMipmapNearest => gl::NEAREST_MIPMAP_NEAREST,
    MinFilter::NearestMipmapLinear => gl::NEAREST_MIPMAP_LINEAR,
    MinFilter::LinearMipmapNearest => gl::LINEAR_MIPMAP_NEAREST,
    MinFilter::LinearMipmapLinear => gl::LINEAR_MIPMAP_LINEAR,
  }
}

fn opengl_mag_filter(filter: MagFilter) -> GLenum {
  match filter {
    MagFilter::Nearest => gl::NEAREST,
    MagFilter::Linear => gl::LINEAR,
  }
}

// (internal format, format)
fn opengl_pixel_format(pf: PixelFormat) -> (GLenum, GLenum) {
  match pf {
    PixelFormat::RGB8 => (gl::RGB8, gl::RGB),
    PixelFormat::RGBA8 => (gl::RGBA8, gl::RGBA),
  }
}

// set the unpack alignment for uploading aligned texels
fn set_unpack_alignment(row_bytes: usize) {
  let unpack_alignment = match row_bytes % 8 {
    0 => 8,
    4 => 4,
    2 | 6 => 2,
    _ => 1,
  };

  unsafe { gl::PixelStorei(gl::UNPACK_ALIGNMENT, unpack_alignment) };
}
