use gl::types::*;
use std::cell::RefCell;
use std::mem;
use std::os::raw::c_void;
use std::ptr;
use std::rc::Rc;

use crate::gl33::state::{Bind, GLState};
use crate::gl33::GL33;
use lucent::backend::tess::Tess as TessBackend;
use lucent::binding::Handle;
use lucent::tess::{Mode, TessError, VertexLayout};

// A buffer object, released (and forgotten by the state) on drop.
#[derive(Debug)]
struct Buffer {
  handle: GLuint,
  state: Rc<RefCell<GLState>>,
}

impl Buffer {
  unsafe fn new<T>(state: &Rc<RefCell<GLState>>, data: &[T]) -> Result<Self, TessError> {
    let mut handle: GLuint = 0;
    gl::GenBuffers(1, &mut handle);

    if handle == 0 {
      return Err(TessError::creation_failed("unable to create buffer"));
    }

    // force binding as it’s meaningful when a vao is bound
    state.borrow_mut().bind_array_buffer(handle, Bind::Forced);

    gl::BufferData(
      gl::ARRAY_BUFFER,
      mem::size_of_val(data) as GLsizeiptr,
      data.as_ptr() as *const c_void,
      gl::STATIC_DRAW,
    );

    Ok(Buffer {
      handle,
      state: state.clone(),
    })
  }
}

impl Drop for Buffer {
  fn drop(&mut self) {
    unsafe {
      self.state.borrow_mut().unbind_buffer(self.handle);
      gl::DeleteBuffers(1, &self.handle);
    }
  }
}

/// A vertex array object along with its vertex and index buffers.
#[derive(Debug)]
pub struct VertexArray {
  mode: GLenum,
  vert_nb: usize,
  vao: GLuint,
  _vertex_buffer: Buffer,
  index_buffer: Option<Buffer>,
  state: Rc<RefCell<GLState>>,
}

impl Drop for VertexArray {
  fn drop(&mut self) {
    unsafe {
      self.state.borrow_mut().unbind_vertex_array(self.vao);
      gl::DeleteVertexArrays(1, &self.vao);
    }

    log::trace!("released vertex array #{}", self.vao);
  }
}

unsafe impl TessBackend for GL33 {
  type TessRepr = VertexArray;

  unsafe fn new_tess(
    &mut self,
    vertices: &[f32],
    layout: &VertexLayout,
    indices: Option<&[u32]>,
    mode: Mode,
  ) -> Result<Self::TessRepr, TessError> {
    let mut vao: GLuint = 0;
    gl::GenVertexArrays(1, &mut vao);

    if vao == 0 {
      return Err(TessError::creation_failed("unable to create vertex array"));
    }

    let (previous_vao, previous_array_buffer) = {
      let mut gfx_st = self.state.borrow_mut();
      let previous_array_buffer = gfx_st.bind_array_buffer(0, Bind::Cached);

      // force binding the vertex array so that previously bound vertex arrays (possibly the same
      // handle) don’t prevent us from binding here
      let previous_vao = gfx_st.bind_vertex_array(vao, Bind::Forced);

      (previous_vao, previous_array_buffer)
    };

    let buffers = Buffer::new(&self.state, vertices).and_then(|vertex_buffer| {
      set_vertex_pointers(layout);

      let index_buffer = match indices {
        Some(indices) => {
          let buffer = Buffer::new(&self.state, indices)?;

          // the element binding is recorded by the vertex array
          self
            .state
            .borrow_mut()
            .bind_element_array_buffer(buffer.handle, Bind::Forced);

          Some(buffer)
        }

        None => None,
      };

      Ok((vertex_buffer, index_buffer))
    });

    {
      let mut gfx_st = self.state.borrow_mut();
      gfx_st.bind_vertex_array(previous_vao, Bind::Cached);
      gfx_st.bind_array_buffer(previous_array_buffer, Bind::Cached);
    }

    let (vertex_buffer, index_buffer) = match buffers {
      Ok(buffers) => buffers,

      Err(e) => {
        self.state.borrow_mut().unbind_vertex_array(vao);
        gl::DeleteVertexArrays(1, &vao);
        return Err(e);
      }
    };

    let vert_nb = indices.map_or(vertices.len() / layout.components(), <[u32]>::len);

    log::debug!("created vertex array #{} ({} vertices)", vao, vert_nb);

    Ok(VertexArray {
      mode: opengl_mode(mode),
      vert_nb,
      vao,
      _vertex_buffer: vertex_buffer,
      index_buffer,
      state: self.state.clone(),
    })
  }

  unsafe fn vertex_array_handle(tess: &Self::TessRepr) -> Handle {
    Handle::new(tess.vao)
  }

  unsafe fn bound_vertex_array(&self) -> Handle {
    Handle::new(self.state.borrow().bound_vertex_array())
  }

  unsafe fn bind_vertex_array(&mut self, vertex_array: Handle) -> Handle {
    Handle::new(
      self
        .state
        .borrow_mut()
        .bind_vertex_array(vertex_array.raw(), Bind::Cached),
    )
  }

  unsafe fn render(&mut self, tess: &Self::TessRepr) {
    let vert_nb = tess.vert_nb as GLsizei;

    if tess.index_buffer.is_some() {
      gl::DrawElements(tess.mode, vert_nb, gl::UNSIGNED_INT, ptr::null());
    } else {
      gl::DrawArrays(tess.mode, 0, vert_nb);
    }
  }
}

// Set the vertex attribute pointers of the currently bound array buffer. Attributes are packed in
// declaration order; the stride is the size of a whole vertex.
unsafe fn set_vertex_pointers(layout: &VertexLayout) {
  let stride = layout.stride() as GLsizei;

  for (attrib, off) in layout.offsets() {
    gl::VertexAttribPointer(
      attrib.index,
      attrib.components as GLint,
      gl::FLOAT,
      gl::FALSE,
      stride,
      ptr::null::<c_void>().add(off),
    );
    gl::EnableVertexAttribArray(attrib.index);
  }
}

fn opengl_mode(mode: Mode) -> GLenum {
  match mode {
    Mode::Point => gl::POINTS,
    Mode::Line => gl::LINES,
    Mode::LineStrip => gl::LINE_STRIP,
    Mode::Triangle => gl::TRIANGLES,
    Mode::TriangleFan => gl::TRIANGLE_FAN,
    Mode::TriangleStrip => gl::TRIANGLE_STRIP,
  }
}
