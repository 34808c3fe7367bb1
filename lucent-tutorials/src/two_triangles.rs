//! Two triangles side by side, each one living in its own vertex array and drawn with its own draw
//! call.

use crate::hello_triangle::{FS, VS};
use crate::shared::{frame_state, handle_actions};
use crate::{InputAction, LoopFeedback, PlatformServices, Tutorial, TutorialBackend, TutorialError};
use lucent::context::GraphicsContext;
use lucent::shader::Program;
use lucent::tess::{Tess, VertexLayout};

const RIGHT_VERTICES: [f32; 9] = [0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.25, 0.5, 0.0];

// mirror of the right triangle
const LEFT_VERTICES: [f32; 9] = [0.0, 0.0, 0.0, -0.5, 0.0, 0.0, -0.25, 0.5, 0.0];

pub struct LocalTutorial<B>
where
  B: TutorialBackend,
{
  program: Program<B>,
  triangles: [Tess<B>; 2],
}

impl<B> Tutorial<B> for LocalTutorial<B>
where
  B: TutorialBackend,
{
  fn bootstrap(
    _platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = B>,
  ) -> Result<Self, TutorialError> {
    let program = context.new_shader_program().from_strings(VS, FS)?;
    let right = context
      .new_tess()
      .set_vertices(&RIGHT_VERTICES, VertexLayout::packed(&[3]))
      .build()?;
    let left = context
      .new_tess()
      .set_vertices(&LEFT_VERTICES, VertexLayout::packed(&[3]))
      .build()?;

    Ok(LocalTutorial {
      program,
      triangles: [right, left],
    })
  }

  fn render_frame(
    &mut self,
    _time: f32,
    actions: impl Iterator<Item = InputAction>,
    context: &mut impl GraphicsContext<Backend = B>,
  ) -> LoopFeedback {
    if handle_actions(actions, context) == LoopFeedback::Exit {
      return LoopFeedback::Exit;
    }

    context.clear(&frame_state());

    let triangles = &self.triangles;
    self.program.shade(context, |ctx, _| {
      for triangle in triangles {
        triangle.render(ctx);
      }
    });

    LoopFeedback::Continue
  }
}
