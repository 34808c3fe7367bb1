//! The hello world of the series: a single orange triangle.
//!
//! The shaders are compiled from strings embedded in the program. The vertex stage passes the
//! position through and the fragment stage outputs a fixed color.

use crate::shared::{frame_state, handle_actions};
use crate::{InputAction, LoopFeedback, PlatformServices, Tutorial, TutorialBackend, TutorialError};
use lucent::context::GraphicsContext;
use lucent::shader::Program;
use lucent::tess::{Tess, VertexLayout};

pub const VS: &str = "#version 330 core
layout (location = 0) in vec3 aPos;
void main()
{
   gl_Position = vec4(aPos.x, aPos.y, aPos.z, 1.0);
}
";

pub const FS: &str = "#version 330 core
out vec4 FragColor;
void main()
{
   FragColor = vec4(1.0f, 0.5f, 0.2f, 1.0f);
}
";

// left, right, top
pub const VERTICES: [f32; 9] = [0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.25, 0.5, 0.0];

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
    _platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = B>,
  ) -> Result<Self, TutorialError> {
    let program = context.new_shader_program().from_strings(VS, FS)?;
    let triangle = context
      .new_tess()
      .set_vertices(&VERTICES, VertexLayout::packed(&[3]))
      .build()?;

    Ok(LocalTutorial { program, triangle })
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

    let triangle = &self.triangle;
    self.program.shade(context, |ctx, _| triangle.render(ctx));

    LoopFeedback::Continue
  }
}
