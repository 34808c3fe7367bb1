//! Tessellation backend interface.

use crate::binding::Handle;
use crate::tess::{Mode, TessError, VertexLayout};

/// Vertex arrays and draw calls.
pub unsafe trait Tess {
  /// Backend representation of a tessellation (vertex array plus its buffers).
  type TessRepr;

  /// Upload vertices (and optional indices) and record the attribute layout in a new vertex array.
  ///
  /// The vertex array and array buffer bindings in place before the call must be restored.
  unsafe fn new_tess(
    &mut self,
    vertices: &[f32],
    layout: &VertexLayout,
    indices: Option<&[u32]>,
    mode: Mode,
  ) -> Result<Self::TessRepr, TessError>;

  /// Driver name of the vertex array.
  unsafe fn vertex_array_handle(tess: &Self::TessRepr) -> Handle;

  /// Currently bound vertex array.
  unsafe fn bound_vertex_array(&self) -> Handle;

  /// Bind a vertex array and return the previously bound one.
  unsafe fn bind_vertex_array(&mut self, vertex_array: Handle) -> Handle;

  /// Issue a single draw call covering the whole tessellation.
  ///
  /// The tessellation’s vertex array is bound when this is called.
  unsafe fn render(&mut self, tess: &Self::TessRepr);
}
