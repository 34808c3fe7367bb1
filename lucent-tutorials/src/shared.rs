//! Bits every tutorial uses.

use crate::{InputAction, LoopFeedback};
use lucent::backend::pipeline::Pipeline as PipelineBackend;
use lucent::context::GraphicsContext;
use lucent::pipeline::{PipelineState, Viewport};

/// Color the back buffer is cleared with before each frame.
pub const CLEAR_COLOR: [f32; 4] = [0.2, 0.3, 0.3, 1.0];

/// Pipeline state applied at the beginning of each frame.
pub fn frame_state() -> PipelineState {
  PipelineState::new().set_clear_color(CLEAR_COLOR)
}

/// Apply the actions every tutorial reacts to the same way.
///
/// A resize makes the viewport cover the whole new framebuffer; a quit request stops the loop.
pub fn handle_actions<C>(actions: impl Iterator<Item = InputAction>, context: &mut C) -> LoopFeedback
where
  C: GraphicsContext,
  C::Backend: PipelineBackend,
{
  for action in actions {
    match action {
      InputAction::Quit => return LoopFeedback::Exit,

      InputAction::Resized { width, height } => {
        log::debug!("new framebuffer size: {}×{}", width, height);
        context.set_viewport(Viewport::whole(width, height));
      }
    }
  }

  LoopFeedback::Continue
}
