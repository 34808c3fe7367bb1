use gl::types::*;

use crate::gl33::GL33;
use lucent::backend::pipeline::Pipeline as PipelineBackend;
use lucent::pipeline::Viewport;

unsafe impl PipelineBackend for GL33 {
  unsafe fn viewport(&self) -> Viewport {
    from_gl_viewport(self.state.borrow_mut().viewport())
  }

  unsafe fn set_viewport(&mut self, viewport: Viewport) -> Viewport {
    let previous = self.state.borrow_mut().set_viewport([
      viewport.x as GLint,
      viewport.y as GLint,
      viewport.width as GLint,
      viewport.height as GLint,
    ]);

    from_gl_viewport(previous)
  }

  unsafe fn set_clear_color(&mut self, color: [f32; 4]) {
    self.state.borrow_mut().set_clear_color(color);
  }

  unsafe fn clear_color_buffer(&mut self) {
    gl::Clear(gl::COLOR_BUFFER_BIT);
  }
}

fn from_gl_viewport([x, y, w, h]: [GLint; 4]) -> Viewport {
  Viewport {
    x,
    y,
    width: w.max(0) as u32,
    height: h.max(0) as u32,
  }
}
