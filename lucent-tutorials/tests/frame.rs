use image::ImageError;
use lucent::binding::Handle;
use lucent::context::GraphicsContext;
use lucent::pipeline::Viewport;
use lucent::shader::StageType;
use lucent::tess::Mode;
use lucent_headless::{Headless, HeadlessContext, UniformValue};
use lucent_tutorials::{
  colored_triangle, hello_triangle, textured_quad, two_triangles, InputAction, LoopFeedback,
  PlatformServices, Tutorial, TutorialError,
};
use std::iter;
use std::path::{Path, PathBuf};

struct TestPlatform {
  shaders: PathBuf,
  textures: PathBuf,
}

impl TestPlatform {
  fn new(textures: &Path) -> Self {
    TestPlatform {
      shaders: Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders"),
      textures: textures.to_owned(),
    }
  }
}

impl PlatformServices for TestPlatform {
  type FetchError = ImageError;

  fn shader_path(&self, name: &str) -> PathBuf {
    self.shaders.join(name)
  }

  fn fetch_texture(&mut self, name: &str) -> Result<image::RgbImage, Self::FetchError> {
    Ok(image::open(self.textures.join(name))?.flipv().to_rgb8())
  }
}

fn bootstrap<T>(ctx: &mut HeadlessContext, textures: &Path) -> Result<T, TutorialError>
where
  T: Tutorial<Headless>,
{
  T::bootstrap(&mut TestPlatform::new(textures), ctx)
}

#[test]
fn hello_triangle_frame_draws_once_and_restores_bindings() {
  let dir = tempfile::tempdir().unwrap();
  let mut ctx = HeadlessContext::new(800, 600);
  let mut tutorial: hello_triangle::LocalTutorial<Headless> =
    bootstrap(&mut ctx, dir.path()).unwrap();

  let program_before = ctx.state().current_program();
  let vao_before = ctx.state().bound_vertex_array();
  let viewport_before = ctx.viewport();

  let feedback = tutorial.render_frame(0., iter::empty(), &mut ctx);
  assert_eq!(feedback, LoopFeedback::Continue);

  let state = ctx.state();
  assert_eq!(state.draw_calls().len(), 1);

  let draw = state.draw_calls()[0];
  assert_eq!(draw.count, 3);
  assert_eq!(draw.mode, Mode::Triangle);
  assert!(!draw.indexed);
  assert!(!draw.program.is_none());
  assert!(!draw.vertex_array.is_none());

  assert_eq!(state.clears(), 1);
  assert_eq!(state.clear_color(), [0.2, 0.3, 0.3, 1.0]);
  assert_eq!(state.current_program(), program_before);
  assert_eq!(state.bound_vertex_array(), vao_before);
  assert_eq!(state.viewport(), viewport_before);
}

#[test]
fn resize_action_updates_viewport() {
  let dir = tempfile::tempdir().unwrap();
  let mut ctx = HeadlessContext::new(800, 600);
  let mut tutorial: hello_triangle::LocalTutorial<Headless> =
    bootstrap(&mut ctx, dir.path()).unwrap();

  let resized = InputAction::Resized {
    width: 1024,
    height: 768,
  };
  let feedback = tutorial.render_frame(0., iter::once(resized), &mut ctx);

  assert_eq!(feedback, LoopFeedback::Continue);
  assert_eq!(ctx.state().viewport(), Viewport::whole(1024, 768));
}

#[test]
fn quit_action_exits_without_drawing() {
  let dir = tempfile::tempdir().unwrap();
  let mut ctx = HeadlessContext::new(800, 600);
  let mut tutorial: hello_triangle::LocalTutorial<Headless> =
    bootstrap(&mut ctx, dir.path()).unwrap();

  let feedback = tutorial.render_frame(0., iter::once(InputAction::Quit), &mut ctx);

  assert_eq!(feedback, LoopFeedback::Exit);
  assert!(ctx.state().draw_calls().is_empty());
}

#[test]
fn two_triangles_draw_twice() {
  let dir = tempfile::tempdir().unwrap();
  let mut ctx = HeadlessContext::new(800, 600);
  let mut tutorial: two_triangles::LocalTutorial<Headless> =
    bootstrap(&mut ctx, dir.path()).unwrap();

  tutorial.render_frame(0., iter::empty(), &mut ctx);

  let state = ctx.state();
  let draws = state.draw_calls();
  assert_eq!(draws.len(), 2);
  assert_ne!(draws[0].vertex_array, draws[1].vertex_array);
  assert_eq!(draws[0].program, draws[1].program);
  assert!(state.current_program().is_none());
}

#[test]
fn colored_triangle_writes_offset() {
  let dir = tempfile::tempdir().unwrap();
  let mut ctx = HeadlessContext::new(800, 600);
  let mut tutorial: colored_triangle::LocalTutorial<Headless> =
    bootstrap(&mut ctx, dir.path()).unwrap();

  tutorial.render_frame(0., iter::empty(), &mut ctx);

  let state = ctx.state();
  let program = state.draw_calls()[0].program;
  assert_eq!(
    state.uniform_value(program, "xOffset"),
    Some(UniformValue::Float(0.))
  );
}

#[test]
fn missing_shader_directory_fails_bootstrap() {
  struct NoShaders;

  impl PlatformServices for NoShaders {
    type FetchError = ImageError;

    fn shader_path(&self, name: &str) -> PathBuf {
      Path::new("/nonexistent").join(name)
    }

    fn fetch_texture(&mut self, name: &str) -> Result<image::RgbImage, Self::FetchError> {
      Ok(image::open(name)?.to_rgb8())
    }
  }

  let mut ctx = HeadlessContext::new(800, 600);
  let result = colored_triangle::LocalTutorial::<Headless>::bootstrap(&mut NoShaders, &mut ctx);

  assert!(matches!(result, Err(TutorialError::Program(_))));
  assert_eq!(ctx.state().compile_attempts(StageType::VertexShader), 0);
  assert_eq!(ctx.state().live_programs(), 0);
}

#[test]
fn textured_quad_falls_back_to_placeholder() {
  let dir = tempfile::tempdir().unwrap();
  let mut ctx = HeadlessContext::new(800, 600);
  let mut tutorial: textured_quad::LocalTutorial<Headless> =
    bootstrap(&mut ctx, dir.path()).unwrap();

  assert_eq!(tutorial.texture().size(), [1, 1]);

  tutorial.render_frame(0., iter::empty(), &mut ctx);

  let state = ctx.state();
  let draw = state.draw_calls()[0];
  assert!(draw.indexed);
  assert_eq!(draw.count, 6);
  assert_eq!(
    state.uniform_value(draw.program, "texture1"),
    Some(UniformValue::Int(0))
  );
  assert_eq!(state.bound_texture(0), tutorial.texture().handle());
}

#[test]
fn textured_quad_uploads_fetched_image() {
  let dir = tempfile::tempdir().unwrap();
  let img = image::RgbImage::from_pixel(4, 2, image::Rgb([200, 100, 50]));
  img
    .save(dir.path().join(textured_quad::TEXTURE_NAME))
    .unwrap();

  let mut ctx = HeadlessContext::new(800, 600);
  let tutorial: textured_quad::LocalTutorial<Headless> = bootstrap(&mut ctx, dir.path()).unwrap();

  assert_eq!(tutorial.texture().size(), [4, 2]);
  assert_eq!(ctx.state().live_textures(), 1);

  drop(tutorial);

  let state = ctx.state();
  assert_eq!(state.live_textures(), 0);
  assert_eq!(state.live_programs(), 0);
  assert_eq!(state.live_vertex_arrays(), 0);
  assert_eq!(state.bound_texture(0), Handle::NONE);
}

#[test]
fn textured_quad_loads_shipped_texture() {
  let shipped = Path::new(env!("CARGO_MANIFEST_DIR")).join("textures");
  let mut ctx = HeadlessContext::new(800, 600);
  let tutorial: textured_quad::LocalTutorial<Headless> = bootstrap(&mut ctx, &shipped).unwrap();

  assert_eq!(tutorial.texture().size(), [128, 128]);
  assert_eq!(ctx.state().live_textures(), 1);
}
