use lucent::backend::pipeline::Pipeline as PipelineBackend;
use lucent::pipeline::Viewport;

use crate::Headless;

unsafe impl PipelineBackend for Headless {
  unsafe fn viewport(&self) -> Viewport {
    self.state.borrow().viewport()
  }

  unsafe fn set_viewport(&mut self, viewport: Viewport) -> Viewport {
    self.state.borrow_mut().set_viewport(viewport)
  }

  unsafe fn set_clear_color(&mut self, color: [f32; 4]) {
    self.state.borrow_mut().set_clear_color(color);
  }

  unsafe fn clear_color_buffer(&mut self) {
    self.state.borrow_mut().record_clear();
  }
}
