use std::cell::RefCell;
use std::rc::Rc;

use lucent::backend::tess::Tess as TessBackend;
use lucent::binding::Handle;
use lucent::tess::{Mode, TessError, VertexLayout};

use crate::state::HeadlessState;
use crate::Headless;

/// A recorded vertex array along with its buffers.
#[derive(Debug)]
pub struct VertexArray {
  vao: u32,
  buffers: Vec<u32>,
  mode: Mode,
  vert_nb: usize,
  indexed: bool,
  state: Rc<RefCell<HeadlessState>>,
}

impl Drop for VertexArray {
  fn drop(&mut self) {
    let mut st = self.state.borrow_mut();

    for &buffer in &self.buffers {
      st.delete_buffer(buffer);
    }

    st.delete_vertex_array(self.vao);
  }
}

unsafe impl TessBackend for Headless {
  type TessRepr = VertexArray;

  unsafe fn new_tess(
    &mut self,
    vertices: &[f32],
    layout: &VertexLayout,
    indices: Option<&[u32]>,
    mode: Mode,
  ) -> Result<Self::TessRepr, TessError> {
    let mut st = self.state.borrow_mut();
    let vao = st.create_vertex_array();
    let mut buffers = vec![st.create_buffer()];

    if indices.is_some() {
      buffers.push(st.create_buffer());
    }

    let vert_nb = indices.map_or(vertices.len() / layout.components(), <[u32]>::len);

    Ok(VertexArray {
      vao,
      buffers,
      mode,
      vert_nb,
      indexed: indices.is_some(),
      state: self.state.clone(),
    })
  }

  unsafe fn vertex_array_handle(tess: &Self::TessRepr) -> Handle {
    Handle::new(tess.vao)
  }

  unsafe fn bound_vertex_array(&self) -> Handle {
    self.state.borrow().bound_vertex_array()
  }

  unsafe fn bind_vertex_array(&mut self, vertex_array: Handle) -> Handle {
    Handle::new(
      self
        .state
        .borrow_mut()
        .bind_vertex_array(vertex_array.raw()),
    )
  }

  unsafe fn render(&mut self, tess: &Self::TessRepr) {
    self
      .state
      .borrow_mut()
      .record_draw(tess.mode, tess.vert_nb, tess.indexed);
  }
}
