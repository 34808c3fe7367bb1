//! Graphics state.

use gl::types::*;
use std::cell::RefCell;
use std::error;
use std::fmt;
use std::marker::PhantomData;

// TLS synchronization barrier for `GLState`.
thread_local!(static TLS_ACQUIRE_GFX_STATE: RefCell<Option<()>> = RefCell::new(Some(())));

/// Cached value.
///
/// A cached value is used to prevent issuing costly GPU commands if we know the target value is
/// already set to what the command tries to set. An empty cache is always considered stale.
#[derive(Debug)]
struct Cached<T>(Option<T>)
where
  T: PartialEq;

impl<T> Cached<T>
where
  T: PartialEq,
{
  fn new(initial: T) -> Self {
    Cached(Some(initial))
  }

  fn set(&mut self, value: T) {
    self.0 = Some(value);
  }

  fn get(&self) -> Option<&T> {
    self.0.as_ref()
  }

  /// Check if the cached value is invalid regarding a value.
  fn is_invalid(&self, new_val: &T) -> bool {
    match &self.0 {
      Some(ref t) => t != new_val,
      _ => true,
    }
  }
}

/// The graphics state.
///
/// This type represents the current state of a given graphics context: every binding slot the
/// backend touches. It acts as a forward-gate to the driver but adds a small cache layer over it
/// to prevent from issuing the same API call (with the same parameters). Every `bind_*` and
/// `use_*` method returns the previous occupant of the slot.
#[derive(Debug)]
pub struct GLState {
  _a: PhantomData<*const ()>, // !Send and !Sync

  // viewport
  viewport: Cached<[GLint; 4]>,

  // clear buffers
  clear_color: Cached<[GLfloat; 4]>,

  // texture
  current_texture_unit: Cached<GLenum>,
  bound_textures: Vec<GLuint>,

  // array buffer
  bound_array_buffer: GLuint,

  // element buffer
  bound_element_array_buffer: GLuint,

  // vertex array
  bound_vertex_array: GLuint,

  // shader program
  current_program: GLuint,
}

impl GLState {
  /// Create a new `GLState`.
  ///
  /// > Note: keep in mind you can create only one per thread.
  pub(crate) fn new() -> Result<Self, StateQueryError> {
    TLS_ACQUIRE_GFX_STATE.with(|rc| {
      let mut inner = rc.borrow_mut();

      match *inner {
        Some(_) => {
          inner.take();
          Self::get_from_context()
        }

        None => Err(StateQueryError::UnavailableGLState),
      }
    })
  }

  /// Get a `GLState` from the current OpenGL context.
  fn get_from_context() -> Result<Self, StateQueryError> {
    unsafe {
      let viewport = Cached::new(get_ctx_viewport()?);
      let clear_color = Cached::new(get_ctx_clear_color()?);
      let current_texture_unit = Cached::new(get_ctx_current_texture_unit()?);
      let bound_textures = vec![0; 16]; // 16 is the fragment stage minimal requirement
      let bound_array_buffer = get_ctx_bound_buffer(gl::ARRAY_BUFFER_BINDING)?;
      let bound_element_array_buffer = 0;
      let bound_vertex_array = get_ctx_bound_vertex_array()?;
      let current_program = get_ctx_current_program()?;

      Ok(GLState {
        _a: PhantomData,
        viewport,
        clear_color,
        current_texture_unit,
        bound_textures,
        bound_array_buffer,
        bound_element_array_buffer,
        bound_vertex_array,
        current_program,
      })
    }
  }

  pub(crate) unsafe fn viewport(&mut self) -> [GLint; 4] {
    match self.viewport.get() {
      Some(&viewport) => viewport,

      None => {
        let viewport = get_ctx_viewport().unwrap_or_default();
        self.viewport.set(viewport);
        viewport
      }
    }
  }

  pub(crate) unsafe fn set_viewport(&mut self, viewport: [GLint; 4]) -> [GLint; 4] {
    let previous = self.viewport();

    if self.viewport.is_invalid(&viewport) {
      gl::Viewport(viewport[0], viewport[1], viewport[2], viewport[3]);
      self.viewport.set(viewport);
    }

    previous
  }

  pub(crate) unsafe fn set_clear_color(&mut self, clear_color: [GLfloat; 4]) {
    if self.clear_color.is_invalid(&clear_color) {
      gl::ClearColor(
        clear_color[0],
        clear_color[1],
        clear_color[2],
        clear_color[3],
      );
      self.clear_color.set(clear_color);
    }
  }

  pub(crate) unsafe fn set_texture_unit(&mut self, unit: u32) {
    let unit = unit as GLenum;

    if self.current_texture_unit.is_invalid(&unit) {
      gl::ActiveTexture(gl::TEXTURE0 + unit);
      self.current_texture_unit.set(unit);
    }
  }

  /// Bind a 2D texture to a unit and return the texture previously bound there.
  pub(crate) unsafe fn bind_texture(&mut self, unit: u32, handle: GLuint) -> GLuint {
    self.set_texture_unit(unit);

    let unit = unit as usize;

    match self.bound_textures.get(unit).cloned() {
      Some(handle_) if handle != handle_ => {
        gl::BindTexture(gl::TEXTURE_2D, handle);
        self.bound_textures[unit] = handle;
        handle_
      }

      None => {
        gl::BindTexture(gl::TEXTURE_2D, handle);

        // not enough registered texture units; let’s grow a bit more
        self.bound_textures.resize(unit + 1, 0);
        self.bound_textures[unit] = handle;
        0
      }

      _ => handle, // cached
    }
  }

  /// Forget a deleted texture: every unit it was bound to is now empty.
  pub(crate) fn unbind_texture(&mut self, handle: GLuint) {
    for t in self.bound_textures.iter_mut().filter(|t| **t == handle) {
      *t = 0;
    }
  }

  pub(crate) unsafe fn bind_array_buffer(&mut self, handle: GLuint, bind: Bind) -> GLuint {
    let previous = self.bound_array_buffer;

    if bind == Bind::Forced || previous != handle {
      gl::BindBuffer(gl::ARRAY_BUFFER, handle);
      self.bound_array_buffer = handle;
    }

    previous
  }

  pub(crate) unsafe fn bind_element_array_buffer(&mut self, handle: GLuint, bind: Bind) {
    if bind == Bind::Forced || self.bound_element_array_buffer != handle {
      gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, handle);
      self.bound_element_array_buffer = handle;
    }
  }

  /// Forget a deleted buffer.
  pub(crate) fn unbind_buffer(&mut self, handle: GLuint) {
    if self.bound_array_buffer == handle {
      self.bound_array_buffer = 0;
    } else if self.bound_element_array_buffer == handle {
      self.bound_element_array_buffer = 0;
    }
  }

  pub(crate) fn bound_vertex_array(&self) -> GLuint {
    self.bound_vertex_array
  }

  pub(crate) unsafe fn bind_vertex_array(&mut self, handle: GLuint, bind: Bind) -> GLuint {
    let previous = self.bound_vertex_array;

    if bind == Bind::Forced || previous != handle {
      gl::BindVertexArray(handle);
      self.bound_vertex_array = handle;

      // the element buffer binding is part of the vertex array state
      self.bound_element_array_buffer = 0;
    }

    previous
  }

  /// Forget a deleted vertex array.
  pub(crate) fn unbind_vertex_array(&mut self, handle: GLuint) {
    vacate(&mut self.bound_vertex_array, handle);
  }

  pub(crate) fn current_program(&self) -> GLuint {
    self.current_program
  }

  pub(crate) unsafe fn use_program(&mut self, handle: GLuint) -> GLuint {
    let previous = self.current_program;

    if previous != handle {
      gl::UseProgram(handle);
      self.current_program = handle;
    }

    previous
  }

  /// Stop using a program about to be deleted.
  ///
  /// A deleted program stays in use until another one replaces it, so the driver is told to use
  /// no program at all.
  pub(crate) unsafe fn unuse_program(&mut self, handle: GLuint) {
    if vacate(&mut self.current_program, handle) {
      gl::UseProgram(0);
    }
  }
}

// Empty a binding slot if it holds `handle`; return whether it did.
fn vacate(slot: &mut GLuint, handle: GLuint) -> bool {
  if handle != 0 && *slot == handle {
    *slot = 0;
    true
  } else {
    false
  }
}

/// Should the binding be cached or forced to the provided value?
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Bind {
  Forced,
  Cached,
}

/// An error that might happen when the context is queried.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StateQueryError {
  /// The [`GLState`] object is unavailable.
  ///
  /// That might occur if the current thread doesn’t support allocating a new graphics state. It
  /// might happen if you try to have more than one state on the same thread, for instance.
  UnavailableGLState,
  /// The driver reported an error while the state was queried.
  DriverError(GLenum),
}

impl fmt::Display for StateQueryError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StateQueryError::UnavailableGLState => write!(f, "unavailable graphics state"),
      StateQueryError::DriverError(ref e) => write!(f, "driver error while querying state: {}", e),
    }
  }
}

impl error::Error for StateQueryError {}

unsafe fn check_driver_error() -> Result<(), StateQueryError> {
  match gl::GetError() {
    gl::NO_ERROR => Ok(()),
    e => Err(StateQueryError::DriverError(e)),
  }
}

unsafe fn get_ctx_viewport() -> Result<[GLint; 4], StateQueryError> {
  let mut data = [0; 4];
  gl::GetIntegerv(gl::VIEWPORT, data.as_mut_ptr());
  check_driver_error().map(|_| data)
}

unsafe fn get_ctx_clear_color() -> Result<[GLfloat; 4], StateQueryError> {
  let mut data = [0.; 4];
  gl::GetFloatv(gl::COLOR_CLEAR_VALUE, data.as_mut_ptr());
  check_driver_error().map(|_| data)
}

unsafe fn get_ctx_current_texture_unit() -> Result<GLenum, StateQueryError> {
  let mut active_texture = gl::TEXTURE0 as GLint;
  gl::GetIntegerv(gl::ACTIVE_TEXTURE, &mut active_texture);
  check_driver_error().map(|_| active_texture as GLenum - gl::TEXTURE0)
}

unsafe fn get_ctx_bound_buffer(binding: GLenum) -> Result<GLuint, StateQueryError> {
  let mut bound = 0 as GLint;
  gl::GetIntegerv(binding, &mut bound);
  check_driver_error().map(|_| bound as GLuint)
}

unsafe fn get_ctx_bound_vertex_array() -> Result<GLuint, StateQueryError> {
  let mut bound = 0 as GLint;
  gl::GetIntegerv(gl::VERTEX_ARRAY_BINDING, &mut bound);
  check_driver_error().map(|_| bound as GLuint)
}

unsafe fn get_ctx_current_program() -> Result<GLuint, StateQueryError> {
  let mut used = 0 as GLint;
  gl::GetIntegerv(gl::CURRENT_PROGRAM, &mut used);
  check_driver_error().map(|_| used as GLuint)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn vacating_the_current_program() {
    let mut current = 3;

    assert!(!vacate(&mut current, 4));
    assert_eq!(current, 3);

    // the driver must be told to stop using the deleted program
    assert!(vacate(&mut current, 3));
    assert_eq!(current, 0);

    // nothing left to stop using
    assert!(!vacate(&mut current, 3));
    assert!(!vacate(&mut current, 0));
  }

  #[test]
  fn empty_cache_is_stale() {
    let mut cached = Cached(None);
    assert!(cached.is_invalid(&[0, 0, 800, 600]));

    cached.set([0, 0, 800, 600]);
    assert!(!cached.is_invalid(&[0, 0, 800, 600]));
    assert!(cached.is_invalid(&[0, 0, 1024, 768]));
  }
}
