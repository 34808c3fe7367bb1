//! A triangle with a color per vertex, interpolated by the rasterizer.
//!
//! Positions and colors are interleaved in a single buffer. Shaders are read from `shader.vs` and
//! `shader.fs`, and the vertex stage shifts the triangle horizontally by the `xOffset` uniform,
//! which is updated every frame.

use crate::shared::{frame_state, handle_actions};
use crate::{InputAction, LoopFeedback, PlatformServices, Tutorial, TutorialBackend, TutorialError};
use lucent::context::GraphicsContext;
use lucent::shader::Program;
use lucent::tess::{Tess, VertexLayout};

#[rustfmt::skip]
const VERTICES: [f32; 18] = [
  // positions      // colors
   0.5, -0.5, 0.0,  1.0, 0.0, 0.0, // bottom right
  -0.5, -0.5, 0.0,  0.0, 1.0, 0.0, // bottom left
   0.0,  0.5, 0.0,  0.0, 0.0, 1.0, // top
];

/// Amplitude of the horizontal motion.
const MAX_OFFSET: f32 = 0.5;

pub struct LocalTutorial<B>
where
  B: TutorialBackend,
{
  program: Program<B>,
  triangle: Tess<B>,
}

impl<B> Tutorial<B> for LocalTutorial<B>
where
  B: TutorialBackend,
{
  fn bootstrap(
    platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = B>,
  ) -> Result<Self, TutorialError> {
    let program = context.new_shader_program().from_files(
      platform.shader_path("shader.vs"),
      platform.shader_path("shader.fs"),
    )?;
    let triangle = context
      .new_tess()
      .set_vertices(&VERTICES, VertexLayout::packed(&[3, 3]))
      .build()?;

    Ok(LocalTutorial { program, triangle })
  }

  fn render_frame(
    &mut self,
    time: f32,
    actions: impl Iterator<Item = InputAction>,
    context: &mut impl GraphicsContext<Backend = B>,
  ) -> LoopFeedback {
    if handle_actions(actions, context) == LoopFeedback::Exit {
      return LoopFeedback::Exit;
    }

    context.clear(&frame_state());

    let triangle = &self.triangle;
    self.program.shade(context, |ctx, program| {
      program.set_float(ctx, "xOffset", MAX_OFFSET * time.sin());
      triangle.render(ctx);
    });

    LoopFeedback::Continue
  }
}
