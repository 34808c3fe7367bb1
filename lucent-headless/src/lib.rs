//! A lucent backend that records instead of rendering.
//!
//! [`Headless`] implements every backend trait of lucent without touching a GPU. It keeps track of
//! the objects a driver would allocate (stages, programs, vertex arrays, buffers, textures), of the
//! context-global binding slots and of every draw call, uniform write and clear. Shader stages are
//! validated with a small GLSL front-end (see [`glsl`]) so that compilation and link failures
//! produce the same kind of diagnostics a driver would.
//!
//! Everything recorded is exposed through [`HeadlessContext::state`], which makes this backend a
//! good fit for testing code that is generic over lucent backends.

pub mod glsl;
mod pipeline;
mod shader;
mod state;
mod tess;
mod texture;

pub use self::shader::{Program, Stage};
pub use self::state::{DrawCall, HeadlessState, UniformValue};
pub use self::tess::VertexArray;
pub use self::texture::Texture;

use lucent::context::GraphicsContext;
use lucent::pipeline::Viewport;
use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// The recording backend.
#[derive(Debug)]
pub struct Headless {
  pub(crate) state: Rc<RefCell<HeadlessState>>,
}

impl Headless {
  /// Create a backend whose default framebuffer has the given size.
  pub fn new(width: u32, height: u32) -> Self {
    Headless {
      state: Rc::new(RefCell::new(HeadlessState::new(Viewport::whole(
        width, height,
      )))),
    }
  }
}

/// A graphics context driving a [`Headless`] backend.
#[derive(Debug)]
pub struct HeadlessContext {
  backend: Headless,
}

impl HeadlessContext {
  /// Create a context whose default framebuffer has the given size.
  pub fn new(width: u32, height: u32) -> Self {
    HeadlessContext {
      backend: Headless::new(width, height),
    }
  }

  /// Everything recorded so far.
  pub fn state(&self) -> Ref<HeadlessState> {
    self.backend.state.borrow()
  }

  /// Forget recorded draw calls and clears, keeping objects and bindings.
  pub fn reset_frame(&mut self) {
    self.backend.state.borrow_mut().reset_frame();
  }
}

unsafe impl GraphicsContext for HeadlessContext {
  type Backend = Headless;

  fn backend(&mut self) -> &mut Self::Backend {
    &mut self.backend
  }
}
