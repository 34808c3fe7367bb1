//! Pipeline backend interface.

use crate::pipeline::Viewport;

/// Clearing and viewport control.
pub unsafe trait Pipeline {
  /// Current viewport.
  unsafe fn viewport(&self) -> Viewport;

  /// Replace the viewport and return the previous one.
  unsafe fn set_viewport(&mut self, viewport: Viewport) -> Viewport;

  /// Set the color used to clear the color buffer.
  unsafe fn set_clear_color(&mut self, color: [f32; 4]);

  /// Clear the color buffer of the back buffer.
  unsafe fn clear_color_buffer(&mut self);
}
