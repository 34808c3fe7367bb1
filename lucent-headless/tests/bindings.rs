use lucent::context::GraphicsContext;
use lucent::pipeline::{PipelineState, Viewport};
use lucent::tess::{Mode, TessError, VertexLayout};
use lucent::texture::{GenMipmaps, PixelFormat, Sampler, TextureError};
use lucent_headless::HeadlessContext;

const TRIANGLE: [f32; 9] = [0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.25, 0.5, 0.0];

#[test]
fn render_restores_vertex_array() {
  let mut ctx = HeadlessContext::new(800, 600);
  let a = ctx
    .new_tess()
    .set_vertices(&TRIANGLE, VertexLayout::packed(&[3]))
    .build()
    .unwrap();
  let b = ctx
    .new_tess()
    .set_vertices(&TRIANGLE, VertexLayout::packed(&[3]))
    .build()
    .unwrap();

  unsafe {
    use lucent::backend::tess::Tess as _;
    ctx.backend().bind_vertex_array(b.handle());
  }

  a.render(&mut ctx);

  let state = ctx.state();
  assert_eq!(state.draw_calls().len(), 1);
  assert_eq!(state.draw_calls()[0].vertex_array, a.handle());
  assert_eq!(state.draw_calls()[0].count, 3);
  assert_eq!(state.draw_calls()[0].mode, Mode::Triangle);
  assert_eq!(state.bound_vertex_array(), b.handle());
}

#[test]
fn indexed_tess_draws_indices() {
  let mut ctx = HeadlessContext::new(800, 600);
  let quad = [
    0.5, 0.5, 0.0, 0.5, -0.5, 0.0, -0.5, -0.5, 0.0, -0.5, 0.5, 0.0,
  ];
  let tess = ctx
    .new_tess()
    .set_vertices(&quad, VertexLayout::packed(&[3]))
    .set_indices(&[0, 1, 3, 1, 2, 3])
    .build()
    .unwrap();

  assert_eq!(tess.vert_nb(), 6);
  assert_eq!(ctx.state().live_buffers(), 2);

  tess.render(&mut ctx);

  let draw = ctx.state().draw_calls()[0];
  assert!(draw.indexed);
  assert_eq!(draw.count, 6);
}

#[test]
fn tess_validation() {
  let mut ctx = HeadlessContext::new(800, 600);

  let empty = ctx.new_tess().build().err();
  assert_eq!(empty, Some(TessError::NoVertices));

  let incoherent = ctx
    .new_tess()
    .set_vertices(&TRIANGLE[..8], VertexLayout::packed(&[3]))
    .build()
    .err();
  assert_eq!(incoherent, Some(TessError::IncoherentLayout(8)));

  let out_of_range = ctx
    .new_tess()
    .set_vertices(&TRIANGLE, VertexLayout::packed(&[3]))
    .set_indices(&[0, 1, 3])
    .build()
    .err();
  assert_eq!(out_of_range, Some(TessError::IndexOutOfRange(3, 3)));

  assert_eq!(ctx.state().live_vertex_arrays(), 0);
}

#[test]
fn dropping_tess_releases_objects() {
  let mut ctx = HeadlessContext::new(800, 600);

  {
    let _tess = ctx
      .new_tess()
      .set_vertices(&TRIANGLE, VertexLayout::packed(&[3]))
      .set_mode(Mode::LineStrip)
      .build()
      .unwrap();

    assert_eq!(ctx.state().live_vertex_arrays(), 1);
  }

  assert_eq!(ctx.state().live_vertex_arrays(), 0);
  assert_eq!(ctx.state().live_buffers(), 0);
}

#[test]
fn texture_bind_returns_previous() {
  let mut ctx = HeadlessContext::new(800, 600);
  let texels = [255u8; 2 * 2 * 3];
  let a = ctx
    .new_texture(
      [2, 2],
      PixelFormat::RGB8,
      Sampler::default(),
      GenMipmaps::Yes,
      &texels,
    )
    .unwrap();
  let b = ctx
    .new_texture(
      [2, 2],
      PixelFormat::RGB8,
      Sampler::default(),
      GenMipmaps::No,
      &texels,
    )
    .unwrap();

  assert!(a.bind(&mut ctx, 0).is_none());
  assert_eq!(b.bind(&mut ctx, 0), a.handle());
  assert!(a.bind(&mut ctx, 1).is_none());
  assert_eq!(ctx.state().bound_texture(0), b.handle());

  drop(b);

  assert!(ctx.state().bound_texture(0).is_none());
  assert_eq!(ctx.state().live_textures(), 1);
}

#[test]
fn texture_size_mismatch() {
  let mut ctx = HeadlessContext::new(800, 600);
  let err = ctx
    .new_texture(
      [2, 2],
      PixelFormat::RGBA8,
      Sampler::default(),
      GenMipmaps::No,
      &[0; 12],
    )
    .err();

  assert_eq!(
    err,
    Some(TextureError::NotEnoughTexels {
      expected: 16,
      provided: 12
    })
  );
  assert_eq!(ctx.state().live_textures(), 0);
}

#[test]
fn viewport_returns_previous() {
  let mut ctx = HeadlessContext::new(800, 600);
  let previous = ctx.set_viewport(Viewport::whole(1024, 768));

  assert_eq!(previous, Viewport::whole(800, 600));
  assert_eq!(ctx.viewport(), Viewport::whole(1024, 768));
}

#[test]
fn clear_applies_pipeline_state() {
  let mut ctx = HeadlessContext::new(800, 600);

  ctx.clear(&PipelineState::new().set_clear_color([0.2, 0.3, 0.3, 1.0]));
  ctx.clear(&PipelineState::new());

  let state = ctx.state();
  assert_eq!(state.clears(), 1);
  assert_eq!(state.clear_color(), [0.2, 0.3, 0.3, 1.0]);
  assert_eq!(state.viewport(), Viewport::whole(800, 600));
}
