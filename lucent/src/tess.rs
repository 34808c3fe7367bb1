//! GPU geometries.
//!
//! A tessellation ([`Tess`]) is a vertex array object along with the buffers it reads from. It is
//! built once with a [`TessBuilder`] and then rendered as many times as needed, each render being
//! a single draw call covering all of its vertices (or indices, for indexed tessellations).
//!
//! Vertices are flat `f32` slices; a [`VertexLayout`] says how each vertex is split into
//! attributes. Attributes are packed contiguously in the order they are declared, so
//! `[3, 3, 2]` components describe a `position: vec3, color: vec3, uv: vec2` vertex of 8 floats.

use std::error;
use std::fmt;

use crate::backend::tess::Tess as TessBackend;
use crate::binding::Handle;
use crate::context::GraphicsContext;

/// Primitive mode.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Mode {
  /// A single point.
  Point,
  /// A line, defined by two points.
  Line,
  /// A strip line: every new vertex extends the previous segment.
  LineStrip,
  /// A triangle, defined by three points.
  Triangle,
  /// A triangle fan: every new vertex forms a triangle with the first and the previous vertices.
  TriangleFan,
  /// A triangle strip: every new vertex forms a triangle with the two previous vertices.
  TriangleStrip,
}

/// A single float vertex attribute.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct VertexAttrib {
  /// Attribute location, as in `layout (location = N)`.
  pub index: u32,
  /// Number of `f32` components, between 1 and 4.
  pub components: usize,
}

impl VertexAttrib {
  /// Create an attribute.
  pub const fn new(index: u32, components: usize) -> Self {
    VertexAttrib { index, components }
  }
}

/// Layout of an interleaved vertex.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VertexLayout {
  attribs: Vec<VertexAttrib>,
}

impl VertexLayout {
  /// Empty layout.
  pub fn new() -> Self {
    Self::default()
  }

  /// Layout with consecutive locations starting at 0, one attribute per component count.
  pub fn packed(components: &[usize]) -> Self {
    components
      .iter()
      .enumerate()
      .fold(Self::new(), |layout, (i, &c)| {
        layout.attrib(VertexAttrib::new(i as u32, c))
      })
  }

  /// Append an attribute.
  pub fn attrib(mut self, attrib: VertexAttrib) -> Self {
    self.attribs.push(attrib);
    self
  }

  /// Declared attributes.
  pub fn attribs(&self) -> &[VertexAttrib] {
    &self.attribs
  }

  /// Number of floats per vertex.
  pub fn components(&self) -> usize {
    self.attribs.iter().map(|a| a.components).sum()
  }

  /// Size of a vertex in bytes.
  pub fn stride(&self) -> usize {
    self.components() * std::mem::size_of::<f32>()
  }

  /// Attributes paired with their byte offset in the vertex.
  pub fn offsets(&self) -> impl Iterator<Item = (VertexAttrib, usize)> + '_ {
    self.attribs.iter().scan(0, |offset, &a| {
      let current = *offset;
      *offset += a.components * std::mem::size_of::<f32>();
      Some((a, current))
    })
  }
}

/// Errors that can occur when building a tessellation.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TessError {
  /// No vertices were provided.
  NoVertices,
  /// The layout is empty, has an attribute with an invalid component count, or doesn’t divide the
  /// vertex data evenly. Carries the number of floats provided.
  IncoherentLayout(usize),
  /// An index refers to a vertex that doesn’t exist. Carries the index and the vertex count.
  IndexOutOfRange(u32, usize),
  /// The backend failed to create its objects.
  CreationFailed(String),
}

impl TessError {
  /// Create a backend creation error.
  pub fn creation_failed(reason: impl Into<String>) -> Self {
    TessError::CreationFailed(reason.into())
  }
}

impl fmt::Display for TessError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      TessError::NoVertices => f.write_str("no vertices provided"),
      TessError::IncoherentLayout(len) => {
        write!(f, "vertex layout doesn’t match {} provided floats", len)
      }
      TessError::IndexOutOfRange(index, vert_nb) => write!(
        f,
        "index {} out of range for {} vertices",
        index, vert_nb
      ),
      TessError::CreationFailed(ref reason) => write!(f, "cannot create tessellation: {}", reason),
    }
  }
}

impl error::Error for TessError {}

/// Build a [`Tess`].
pub struct TessBuilder<'a, C>
where
  C: GraphicsContext,
{
  ctx: &'a mut C,
  vertices: Vec<f32>,
  layout: VertexLayout,
  indices: Option<Vec<u32>>,
  mode: Mode,
}

impl<'a, C> TessBuilder<'a, C>
where
  C: GraphicsContext,
  C::Backend: TessBackend,
{
  /// Create a builder. The default mode is [`Mode::Triangle`].
  pub fn new(ctx: &'a mut C) -> Self {
    TessBuilder {
      ctx,
      vertices: Vec::new(),
      layout: VertexLayout::new(),
      indices: None,
      mode: Mode::Triangle,
    }
  }

  /// Set the vertex data and its layout.
  pub fn set_vertices(mut self, vertices: &[f32], layout: VertexLayout) -> Self {
    self.vertices = vertices.to_vec();
    self.layout = layout;
    self
  }

  /// Set indices; the tessellation is then rendered with an indexed draw.
  pub fn set_indices(mut self, indices: &[u32]) -> Self {
    self.indices = Some(indices.to_vec());
    self
  }

  /// Set the primitive mode.
  pub fn set_mode(mut self, mode: Mode) -> Self {
    self.mode = mode;
    self
  }

  /// Validate the input and upload it.
  pub fn build(self) -> Result<Tess<C::Backend>, TessError> {
    if self.vertices.is_empty() {
      return Err(TessError::NoVertices);
    }

    let components = self.layout.components();
    let coherent = components > 0
      && self
        .layout
        .attribs()
        .iter()
        .all(|a| (1..=4).contains(&a.components))
      && self.vertices.len() % components == 0;

    if !coherent {
      return Err(TessError::IncoherentLayout(self.vertices.len()));
    }

    let vert_nb = self.vertices.len() / components;

    if let Some(ref indices) = self.indices {
      if let Some(&index) = indices.iter().find(|&&i| i as usize >= vert_nb) {
        return Err(TessError::IndexOutOfRange(index, vert_nb));
      }
    }

    let elem_nb = self.indices.as_ref().map_or(vert_nb, Vec::len);

    let repr = unsafe {
      self.ctx.backend().new_tess(
        &self.vertices,
        &self.layout,
        self.indices.as_deref(),
        self.mode,
      )?
    };

    Ok(Tess {
      repr,
      mode: self.mode,
      vert_nb: elem_nb,
    })
  }
}

/// A GPU geometry.
///
/// Driver objects are released when the tessellation is dropped.
pub struct Tess<B>
where
  B: ?Sized + TessBackend,
{
  repr: B::TessRepr,
  mode: Mode,
  vert_nb: usize,
}

impl<B> Tess<B>
where
  B: ?Sized + TessBackend,
{
  /// Number of vertices (or indices) a render covers.
  pub fn vert_nb(&self) -> usize {
    self.vert_nb
  }

  /// Primitive mode.
  pub fn mode(&self) -> Mode {
    self.mode
  }

  /// Driver name of the vertex array.
  pub fn handle(&self) -> Handle {
    unsafe { B::vertex_array_handle(&self.repr) }
  }

  /// Issue a single draw call.
  ///
  /// The vertex array bound before the call is bound again afterwards.
  pub fn render<C>(&self, ctx: &mut C)
  where
    C: GraphicsContext<Backend = B>,
  {
    unsafe {
      let backend = ctx.backend();
      let previous = backend.bind_vertex_array(B::vertex_array_handle(&self.repr));
      backend.render(&self.repr);
      backend.bind_vertex_array(previous);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn packed_layout_offsets() {
    let layout = VertexLayout::packed(&[3, 3, 2]);
    let offsets: Vec<_> = layout.offsets().map(|(a, o)| (a.index, o)).collect();

    assert_eq!(layout.components(), 8);
    assert_eq!(layout.stride(), 32);
    assert_eq!(offsets, vec![(0, 0), (1, 12), (2, 24)]);
  }

  #[test]
  fn empty_layout() {
    let layout = VertexLayout::new();

    assert_eq!(layout.components(), 0);
    assert_eq!(layout.offsets().count(), 0);
  }
}
