use std::cell::RefCell;
use std::rc::Rc;

use lucent::backend::texture::Texture as TextureBackend;
use lucent::binding::Handle;
use lucent::texture::{GenMipmaps, PixelFormat, Sampler, TextureError};

use crate::state::HeadlessState;
use crate::Headless;

/// A recorded texture.
#[derive(Debug)]
pub struct Texture {
  name: u32,
  sampler: Sampler,
  mipmaps: bool,
  state: Rc<RefCell<HeadlessState>>,
}

impl Texture {
  /// Sampler the texture was created with.
  pub fn sampler(&self) -> Sampler {
    self.sampler
  }

  /// Whether mipmaps were generated.
  pub fn has_mipmaps(&self) -> bool {
    self.mipmaps
  }
}

impl Drop for Texture {
  fn drop(&mut self) {
    self.state.borrow_mut().delete_texture(self.name);
  }
}

unsafe impl TextureBackend for Headless {
  type TextureRepr = Texture;

  unsafe fn new_texture(
    &mut self,
    _: [u32; 2],
    _: PixelFormat,
    sampler: Sampler,
    gen_mipmaps: GenMipmaps,
    _: &[u8],
  ) -> Result<Self::TextureRepr, TextureError> {
    let name = self.state.borrow_mut().create_texture();

    Ok(Texture {
      name,
      sampler,
      mipmaps: gen_mipmaps == GenMipmaps::Yes,
      state: self.state.clone(),
    })
  }

  unsafe fn texture_handle(texture: &Self::TextureRepr) -> Handle {
    Handle::new(texture.name)
  }

  unsafe fn bind_texture(&mut self, unit: u32, texture: Handle) -> Handle {
    Handle::new(self.state.borrow_mut().bind_texture(unit, texture.raw()))
  }
}
