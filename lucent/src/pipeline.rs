//! Pipeline state.
//!
//! The introductory programs only need two pieces of framebuffer state: the color the back buffer
//! is cleared with at the start of each frame and the viewport. Both are described with a
//! [`PipelineState`] and applied with [`GraphicsContext::clear`](crate::context::GraphicsContext::clear).

/// Viewport rectangle, in pixels.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Viewport {
  /// Lower-left X.
  pub x: i32,
  /// Lower-left Y.
  pub y: i32,
  /// Width.
  pub width: u32,
  /// Height.
  pub height: u32,
}

impl Viewport {
  /// Viewport covering a whole framebuffer of the given size.
  pub fn whole(width: u32, height: u32) -> Self {
    Viewport {
      x: 0,
      y: 0,
      width,
      height,
    }
  }
}

/// Framebuffer state applied when clearing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PipelineState {
  /// Color to clear the color buffer with. `None` leaves the buffer untouched.
  pub clear_color: Option<[f32; 4]>,
  /// Viewport to set before clearing. `None` keeps the current one.
  pub viewport: Option<Viewport>,
}

impl PipelineState {
  /// State that neither clears nor changes the viewport.
  pub fn new() -> Self {
    Self::default()
  }

  /// Get the clear color, if any.
  pub fn clear_color(&self) -> Option<&[f32; 4]> {
    self.clear_color.as_ref()
  }

  /// Set the clear color.
  pub fn set_clear_color(self, clear_color: impl Into<Option<[f32; 4]>>) -> Self {
    Self {
      clear_color: clear_color.into(),
      ..self
    }
  }

  /// Get the viewport, if any.
  pub fn viewport(&self) -> Option<Viewport> {
    self.viewport
  }

  /// Set the viewport.
  pub fn set_viewport(self, viewport: impl Into<Option<Viewport>>) -> Self {
    Self {
      viewport: viewport.into(),
      ..self
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn builder() {
    let state = PipelineState::new()
      .set_clear_color([0.2, 0.3, 0.3, 1.0])
      .set_viewport(Viewport::whole(800, 600));

    assert_eq!(state.clear_color(), Some(&[0.2, 0.3, 0.3, 1.0]));
    assert_eq!(state.viewport().map(|v| (v.width, v.height)), Some((800, 600)));
    assert_eq!(PipelineState::new().clear_color(), None);
  }
}
